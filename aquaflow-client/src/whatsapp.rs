//! WhatsApp deep links and message templates

use chrono::NaiveDate;
use shared::models::Student;
use shared::money::format_brl;
use shared::phone::normalize_whatsapp;
use url::Url;

const WA_ME: &str = "https://wa.me";

/// `https://wa.me/<phone>?text=<message>` with the phone normalized
///
/// Returns `None` when the phone has no digits at all.
pub fn deep_link(phone: &str, message: &str) -> Option<Url> {
    if !phone.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let mut url = Url::parse(WA_ME).ok()?;
    url.set_path(&normalize_whatsapp(phone));
    url.query_pairs_mut().append_pair("text", message);
    Some(url)
}

/// Deep link for a student, `None` without a registered phone
pub fn student_link(student: &Student, message: &str) -> Option<Url> {
    deep_link(student.whatsapp.as_deref()?, message)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Contract renewal proposal for a student whose contract is ending
pub fn renewal_proposal(student: &Student) -> String {
    let end = student
        .effective_contract_end()
        .map(format_date)
        .unwrap_or_else(|| "em breve".to_string());
    format!(
        "Olá {name}!\n\n\
         Seu contrato de {class} vence em {end}.\n\n\
         Queremos continuar com você na nossa equipe!\n\n\
         Preparamos uma proposta especial de renovação:\n\
         - Manutenção do valor atual: {fee}\n\
         - Flexibilidade de horários\n\
         - Acompanhamento personalizado\n\n\
         Vamos conversar sobre a renovação? Estamos à disposição!",
        name = student.first_name(),
        class = student.class_type.label().to_lowercase(),
        fee = format_brl(student.monthly_fee),
    )
}

/// Friendly reminder before the due date
pub fn due_reminder(student: &Student, due: NaiveDate) -> String {
    format!(
        "Olá {name}! Passando para lembrar que sua mensalidade de {class} \
         no valor de {fee} vence em {due}. Obrigado!",
        name = student.first_name(),
        class = student.class_type.label().to_lowercase(),
        fee = format_brl(student.monthly_fee),
        due = format_date(due),
    )
}

/// Notice for a student with a late payment
pub fn overdue_notice(student: &Student, days_late: i64) -> String {
    let days = if days_late == 1 {
        "1 dia".to_string()
    } else {
        format!("{days_late} dias")
    };
    format!(
        "Olá {name}! Identificamos que sua mensalidade de {fee} está em aberto há {days}. \
         Se já realizou o pagamento, por favor desconsidere esta mensagem. \
         Qualquer dúvida, estamos à disposição!",
        name = student.first_name(),
        fee = format_brl(student.monthly_fee),
    )
}
