//! aquaflow - terminal front-end for the AquaFlow backend

use anyhow::{Context, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use aquaflow_client::dashboard::{self, EXPIRING_WINDOW_DAYS, Urgency};
use aquaflow_client::grid::percent_bar;
use aquaflow_client::guard::LOGIN_ROUTE;
use aquaflow_client::{
    Api, AuthStore, ClientConfig, ClientError, Dashboard, EnrollmentError, EnrollmentManager,
    Navigator, NetworkHttpClient, RouterGuard, ScheduleGrid, Session, whatsapp,
};
use shared::models::{MonthlyReportQuery, ReferenceMonth, StudentFilter};
use shared::money::format_brl;
use shared::phone::format_br_phone;

#[derive(Parser)]
#[command(name = "aquaflow")]
#[command(about = "AquaFlow Pro swimming school dashboard")]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "AQUAFLOW_API_URL")]
    api_url: Option<String>,
    /// Directory holding the persisted session
    #[arg(long, global = true, env = "AQUAFLOW_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "AQUAFLOW_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    /// Overview cards and expiring contracts
    Dashboard {
        /// Reference date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Weekly schedule grid
    Grid,
    /// Student list
    Students {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = false)]
        inactive: bool,
    },
    /// Students with no payment in the last 45 days
    Delinquent,
    /// Contracts ending soon, with WhatsApp renewal links
    Expiring {
        #[arg(long, default_value_t = EXPIRING_WINDOW_DAYS)]
        days: u32,
    },
    /// Financial summary of a reference month (YYYY-MM)
    Finance {
        #[arg(long)]
        month: Option<ReferenceMonth>,
    },
    /// Payment totals grouped by month and method
    Report {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// Session roster management
    Enroll {
        #[command(subcommand)]
        command: EnrollCommand,
    },
}

#[derive(Subcommand)]
enum EnrollCommand {
    Show { session: i64 },
    Admit { session: i64, student: Option<i64> },
    Remove { session: i64, student: i64 },
}

/// Prints where a browser would navigate
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: &str) {
        if route == LOGIN_ROUTE {
            eprintln!("Sessão expirada. Faça login novamente: aquaflow login --email <email>");
        } else {
            eprintln!("-> {route}");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aquaflow=info,aquaflow_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().context("invalid client configuration")?;
    if let Some(url) = cli.api_url {
        config.base_url = url;
    }
    if let Some(dir) = cli.storage_dir {
        config = config.with_storage_dir(dir);
    }

    let session = Session::restore_from(&config.storage_dir);
    let api = Api::new(NetworkHttpClient::new(&config, session.clone())?);
    let guard = RouterGuard::new(session, TerminalNavigator);

    let result = run(cli.command, &api, &guard).await;
    match result {
        Err(e) => {
            if let Some(client) = e.downcast_ref::<ClientError>() {
                guard.poll();
                bail!("{}", client.notice());
            }
            if let Some(enrollment) = e.downcast_ref::<EnrollmentError>() {
                guard.poll();
                bail!("{}", enrollment.notice());
            }
            Err(e)
        }
        Ok(()) => Ok(()),
    }
}

async fn run(
    command: Commands,
    api: &Api,
    guard: &RouterGuard<TerminalNavigator>,
) -> anyhow::Result<()> {
    let today = Local::now().date_naive();

    match command {
        Commands::Login { email, password } => {
            let auth = AuthStore::new(api.clone());
            if !auth.login(&email, &password).await {
                bail!(auth.notice().unwrap_or_else(|| "Falha no login".to_string()));
            }
            if let Some(user) = auth.user() {
                println!("Bem-vindo, {} ({})", user.full_name, user.role.as_str());
            }
            return Ok(());
        }
        Commands::Logout => {
            AuthStore::new(api.clone()).logout()?;
            println!("Sessão encerrada");
            return Ok(());
        }
        _ => {}
    }

    if !guard.authorize("/") {
        bail!("não autenticado");
    }

    match command {
        Commands::Login { .. } | Commands::Logout => {}
        Commands::Whoami => {
            let user = AuthStore::new(api.clone()).refresh_user().await?;
            println!("{} <{}> - {}", user.full_name, user.email, user.role.as_str());
        }
        Commands::Dashboard { date } => {
            let data = Dashboard::new(api.clone()).load(date.unwrap_or(today)).await?;
            let o = &data.overview;
            println!("Total de alunos:     {}", o.total_students);
            println!("Alunos ativos:       {}", o.active_students);
            println!("Inadimplentes:       {}", o.delinquent_count);
            println!("Receita (30 dias):   {}", format_brl(o.revenue_last_30_days));
            println!("Adimplência:         {}%", o.on_time_rate);
            println!("Ocupação média:      {}", percent_bar(o.average_occupancy));
            println!();
            println!("Contratos expirando ({}):", data.expiring.len());
            for c in &data.expiring {
                println!(
                    "  {:<30} {}  {:>10}  {}",
                    c.student.full_name,
                    c.end.format("%d/%m/%Y"),
                    c.days_label(),
                    urgency_label(c.urgency)
                );
            }
        }
        Commands::Grid => {
            let grid = ScheduleGrid::build(api.schedules().full_grid().await?);
            for c in grid.collisions() {
                eprintln!(
                    "aviso: horários {} e {} ocupam {} {}",
                    c.kept_id,
                    c.dropped_id,
                    c.weekday.label(),
                    c.start_time.format("%H:%M")
                );
            }
            print!("{}", grid.render());
        }
        Commands::Students { search, inactive } => {
            let filter = StudentFilter {
                active: Some(!inactive),
                class_type: None,
            };
            let students = api.students().list(&filter).await?;
            let term = search.unwrap_or_default();
            for s in dashboard::filter_students(&students, &term) {
                println!(
                    "{:>5}  {:<30} {:<15} {:>12}  venc. dia {:<2}  {}",
                    s.id,
                    s.full_name,
                    s.class_type.label(),
                    format_brl(s.monthly_fee),
                    s.due_day,
                    s.whatsapp.as_deref().map(format_br_phone).unwrap_or_default()
                );
            }
        }
        Commands::Delinquent => {
            for s in api.students().delinquent().await? {
                let days = dashboard::days_overdue(&s, today);
                let link = whatsapp::student_link(&s, &whatsapp::overdue_notice(&s, days));
                println!(
                    "{:<30} {:>12}  {}",
                    s.full_name,
                    format_brl(s.monthly_fee),
                    link.map(String::from).unwrap_or_else(|| "sem WhatsApp".to_string())
                );
            }
        }
        Commands::Expiring { days } => {
            let contracts = Dashboard::new(api.clone()).expiring_contracts(days, today).await?;
            for c in contracts {
                let link = whatsapp::student_link(&c.student, &whatsapp::renewal_proposal(&c.student));
                println!(
                    "{:<30} {:>10}  {}",
                    c.student.full_name,
                    c.days_label(),
                    link.map(String::from)
                        .unwrap_or_else(|| "Aluno não possui WhatsApp cadastrado".to_string())
                );
            }
        }
        Commands::Finance { month } => {
            let month = month.unwrap_or_else(|| ReferenceMonth::of(today));
            let summary = Dashboard::new(api.clone()).financial_summary(month).await?;
            println!("Mês de referência:  {}", summary.month);
            println!("Receita total:      {}", format_brl(summary.confirmed_total));
            println!("Receita do mês:     {}", format_brl(summary.month_revenue));
            println!("Pendente:           {}", format_brl(summary.pending_total));
            println!("Inadimplentes:      {}", summary.delinquent_count);
        }
        Commands::Report { year, month } => {
            let query = MonthlyReportQuery { year, month };
            for row in api.payments().monthly_report(&query).await? {
                println!(
                    "{}  {:<18} {:>4}  {:>14}",
                    row.reference_month,
                    row.method.label(),
                    row.count,
                    format_brl(row.total)
                );
            }
        }
        Commands::Enroll { command } => enroll(command, api).await?,
    }
    Ok(())
}

async fn enroll(command: EnrollCommand, api: &Api) -> anyhow::Result<()> {
    let session_id = match &command {
        EnrollCommand::Show { session }
        | EnrollCommand::Admit { session, .. }
        | EnrollCommand::Remove { session, .. } => *session,
    };
    let mut manager = EnrollmentManager::new(api.clone(), session_id);
    manager.load().await?;

    match command {
        EnrollCommand::Show { .. } => {}
        EnrollCommand::Admit { student, .. } => {
            manager.admit(student).await?;
            println!("Aluno adicionado ao horário");
        }
        EnrollCommand::Remove { student, .. } => {
            manager.remove(student).await?;
            println!("Aluno removido do horário");
        }
    }

    if let Some(e) = manager.reload_error() {
        eprintln!("Lista não atualizada: {}", e.notice());
    }

    if let Some(view) = manager.view() {
        let occupancy = view.occupancy();
        println!(
            "{} {} - {}/{} {}",
            view.capacity.weekday.label(),
            view.capacity.start_time.format("%H:%M"),
            occupancy.enrolled,
            occupancy.capacity,
            percent_bar(occupancy.percent)
        );
        for s in &view.enrolled {
            println!("  [x] {:>5} {}", s.id, s.full_name);
        }
        for s in view.available_students() {
            println!("  [ ] {:>5} {}", s.id, s.full_name);
        }
    }
    Ok(())
}

fn urgency_label(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Critical => "URGENTE",
        Urgency::Warning => "atenção",
        Urgency::Normal => "",
    }
}
