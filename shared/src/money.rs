//! Currency formatting (BRL)

use rust_decimal::{Decimal, RoundingStrategy};

/// Format as Brazilian reais: `R$ 1.234,56`
///
/// ```
/// use rust_decimal::Decimal;
/// use shared::money::format_brl;
///
/// assert_eq!(format_brl(Decimal::new(123456, 2)), "R$ 1.234,56");
/// ```
pub fn format_brl(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{sign}R$ {grouped},{frac_part}")
}
