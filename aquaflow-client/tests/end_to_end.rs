//! Client against the in-process mock backend

use std::sync::Arc;

use aquaflow_client::{
    Api, AuthStorage, AuthStore, ClientConfig, ClientError, Dashboard, EnrollmentError,
    EnrollmentManager, Navigator, NetworkHttpClient, RouterGuard, ScheduleGrid, Session,
};
use aquaflow_mock::{MockConfig, MockServer};
use chrono::{Local, NaiveTime};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use shared::ErrorCode;
use shared::models::{
    ClassType, MonthlyReportQuery, PaymentCreate, PaymentFilter, PaymentMethod, PaymentStatus,
    ReferenceMonth, SessionCreate, StudentCreate, Weekday,
};
use tempfile::TempDir;

const ADMIN_EMAIL: &str = "admin@aquaflow.com";
const ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone, Default)]
struct Recorder(Arc<Mutex<Vec<String>>>);

impl Navigator for Recorder {
    fn navigate(&self, route: &str) {
        self.0.lock().push(route.to_string());
    }
}

impl Recorder {
    fn routes(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

fn api(server: &MockServer, dir: &TempDir) -> Api {
    let config = ClientConfig::new(server.base_url()).with_storage_dir(dir.path());
    let session = Session::new(AuthStorage::new(dir.path()));
    Api::new(NetworkHttpClient::new(&config, session).unwrap())
}

async fn logged_in(server: &MockServer, dir: &TempDir) -> Api {
    let api = api(server, dir);
    assert!(AuthStore::new(api.clone()).login(ADMIN_EMAIL, ADMIN_PASSWORD).await);
    api
}

async fn create_student(api: &Api, name: &str) -> i64 {
    api.students()
        .create(&StudentCreate::new(name, ClassType::Swimming, Decimal::from(150), 10))
        .await
        .unwrap()
        .id
}

async fn create_session(api: &Api, capacity: u32) -> i64 {
    api.schedules()
        .create(
            &SessionCreate::new(
                Weekday::Tuesday,
                NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                ClassType::Swimming,
            )
            .with_capacity(capacity),
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_login_persists_and_logout_clears() {
    let server = MockServer::spawn(MockConfig::default()).await.unwrap();
    let dir = TempDir::new().unwrap();
    let store = AuthStore::new(api(&server, &dir));

    assert!(store.login(ADMIN_EMAIL, ADMIN_PASSWORD).await);
    assert!(store.is_authenticated());
    assert_eq!(store.user().unwrap().email, ADMIN_EMAIL);
    assert!(store.session().storage().unwrap().exists());

    // A fresh process picks the session back up
    let restored = Session::restore_from(dir.path());
    assert!(restored.is_authenticated());
    assert_eq!(restored.token(), store.session().token());

    store.logout().unwrap();
    assert!(!store.is_authenticated());
    assert!(!store.session().storage().unwrap().exists());
    assert!(!store.session().redirect_pending());
    assert!(!Session::restore_from(dir.path()).is_authenticated());
}

#[tokio::test]
async fn test_login_failure_keeps_notice_without_redirect() {
    let server = MockServer::spawn(MockConfig::default()).await.unwrap();
    let dir = TempDir::new().unwrap();
    let store = AuthStore::new(api(&server, &dir));

    assert!(!store.login(ADMIN_EMAIL, "errada").await);
    assert!(!store.is_authenticated());
    assert!(!store.is_loading());
    assert_eq!(store.notice().as_deref(), Some("Email ou senha incorretos"));
    assert!(!store.session().redirect_pending());
}

#[tokio::test]
async fn test_restore_without_token_is_unauthenticated() {
    let dir = TempDir::new().unwrap();
    let session = Session::restore_from(dir.path());
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());

    let guard = RouterGuard::new(session, Recorder::default());
    assert!(guard.authorize("/login"));
    assert!(!guard.authorize("/alunos"));
    assert_eq!(guard.navigator().routes(), ["/login"]);
}

#[tokio::test]
async fn test_refresh_token_replaces_token() {
    let server = MockServer::spawn(MockConfig::default()).await.unwrap();
    let dir = TempDir::new().unwrap();
    let api = logged_in(&server, &dir).await;
    let store = AuthStore::new(api.clone());

    store.refresh_token().await.unwrap();
    assert!(store.is_authenticated());
    let me = store.refresh_user().await.unwrap();
    assert_eq!(me.email, ADMIN_EMAIL);
}

#[tokio::test]
async fn test_concurrent_unauthorized_redirects_once() {
    let server = MockServer::spawn(MockConfig::default()).await.unwrap();
    let dir = TempDir::new().unwrap();
    let api = logged_in(&server, &dir).await;

    let session = api.session().clone();
    let user = session.user().unwrap();
    session.establish(user, "not-a-real-token".into()).unwrap();

    let guard = RouterGuard::new(session.clone(), Recorder::default());
    let students = api.students();
    let payments = api.payments();
    let schedules = api.schedules();
    let filter = PaymentFilter::default();
    let (a, b, c) = futures::join!(
        students.list_active(),
        payments.list(&filter),
        schedules.full_grid(),
    );

    for result in [a.map(|_| ()), b.map(|_| ()), c.map(|_| ())] {
        assert!(matches!(guard.route(result), Err(ClientError::Unauthorized)));
    }
    assert_eq!(guard.navigator().routes(), ["/login"]);
    assert!(!session.is_authenticated());
    assert!(session.token().is_none());
    assert!(!session.storage().unwrap().exists());
}

#[tokio::test]
async fn test_enrollment_flow() {
    let server = MockServer::spawn(MockConfig::default()).await.unwrap();
    let dir = TempDir::new().unwrap();
    let api = logged_in(&server, &dir).await;

    let ana = create_student(&api, "Ana Souza").await;
    let bia = create_student(&api, "Bia Lima").await;
    let session_id = create_session(&api, 2).await;

    let mut manager = EnrollmentManager::new(api.clone(), session_id);
    assert!(matches!(manager.admit(Some(ana)).await, Err(EnrollmentError::NotLoaded)));

    manager.load().await.unwrap();
    assert_eq!(manager.available_students().len(), 2);
    assert!(matches!(
        manager.admit(None).await,
        Err(EnrollmentError::NoStudentSelected)
    ));

    let receipt = manager.admit(Some(ana)).await.unwrap();
    assert_eq!(receipt.message, "Aluno adicionado ao horário com sucesso");
    let view = manager.view().unwrap();
    assert_eq!(view.capacity.enrolled, 1);
    assert!(view.is_enrolled(ana));
    assert_eq!(manager.available_students().len(), 1);

    // Rejected locally, nothing sent
    let dup = manager.admit(Some(ana)).await.unwrap_err();
    assert!(matches!(dup, EnrollmentError::AlreadyEnrolled { .. }));
    assert!(dup.is_local());

    let missing = manager.remove(bia).await.unwrap_err();
    assert!(matches!(missing, EnrollmentError::NotEnrolled { .. }));

    manager.remove(ana).await.unwrap();
    assert_eq!(manager.view().unwrap().capacity.enrolled, 0);
}

#[tokio::test]
async fn test_last_seat_race_has_one_winner() {
    let server = MockServer::spawn(MockConfig::default()).await.unwrap();
    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();
    let api_a = logged_in(&server, &dir_a).await;
    let api_b = logged_in(&server, &dir_b).await;

    let ana = create_student(&api_a, "Ana Souza").await;
    let bia = create_student(&api_a, "Bia Lima").await;
    let session_id = create_session(&api_a, 1).await;

    let mut desk_a = EnrollmentManager::new(api_a, session_id);
    let mut desk_b = EnrollmentManager::new(api_b, session_id);
    desk_a.load().await.unwrap();
    desk_b.load().await.unwrap();

    let (a, b) = tokio::join!(desk_a.admit(Some(ana)), desk_b.admit(Some(bia)));
    let lost = match (a, b) {
        (Ok(_), Err(e)) | (Err(e), Ok(_)) => e,
        other => panic!("expected exactly one admission, got {other:?}"),
    };

    match lost {
        EnrollmentError::Client(ClientError::Api { status, code, detail }) => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(code, Some(ErrorCode::SessionFull));
            assert_eq!(detail, "Horário já está com capacidade máxima (1 alunos)");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    desk_a.load().await.unwrap();
    assert_eq!(desk_a.view().unwrap().capacity.enrolled, 1);
}

#[tokio::test]
async fn test_dashboard_and_grid() {
    let server = MockServer::spawn(MockConfig::default()).await.unwrap();
    let dir = TempDir::new().unwrap();
    let api = logged_in(&server, &dir).await;
    let today = Local::now().date_naive();

    let ana = create_student(&api, "Ana Souza").await;
    create_student(&api, "Bia Lima").await;
    let session_id = create_session(&api, 4).await;
    api.schedules().admit(session_id, ana).await.unwrap();
    api.payments()
        .create(&PaymentCreate {
            student_id: ana,
            amount: Decimal::from(150),
            paid_on: today,
            reference_month: ReferenceMonth::of(today),
            method: PaymentMethod::Pix,
            status: PaymentStatus::Confirmed,
            notes: None,
        })
        .await
        .unwrap();

    let data = Dashboard::new(api.clone()).load(today).await.unwrap();
    assert_eq!(data.overview.total_students, 2);
    assert_eq!(data.overview.active_students, 2);
    assert_eq!(data.overview.delinquent_count, 1);
    assert_eq!(data.overview.revenue_last_30_days, Decimal::from(150));
    assert_eq!(data.overview.delinquency_rate, Decimal::from(50));
    assert_eq!(data.overview.on_time_rate, Decimal::from(50));
    assert_eq!(data.overview.average_occupancy, Decimal::from(25));

    let summary = Dashboard::new(api.clone())
        .financial_summary(ReferenceMonth::of(today))
        .await
        .unwrap();
    assert_eq!(summary.month_revenue, Decimal::from(150));
    assert_eq!(summary.pending_total, Decimal::ZERO);

    let grid = ScheduleGrid::build(api.schedules().full_grid().await.unwrap());
    let slot = grid
        .get(Weekday::Tuesday, NaiveTime::from_hms_opt(18, 0, 0).unwrap())
        .unwrap();
    assert_eq!(slot.students.len(), 1);
    assert!(grid.collisions().is_empty());
}

#[tokio::test]
async fn test_monthly_report_over_http() {
    let server = MockServer::spawn(MockConfig::default()).await.unwrap();
    let dir = TempDir::new().unwrap();
    let api = logged_in(&server, &dir).await;
    let ana = create_student(&api, "Ana Souza").await;

    let march = ReferenceMonth::new(2024, 3).unwrap();
    for (method, amount) in [(PaymentMethod::Pix, 150), (PaymentMethod::Pix, 120), (PaymentMethod::Cash, 90)] {
        api.payments()
            .create(&PaymentCreate {
                student_id: ana,
                amount: Decimal::from(amount),
                paid_on: march.first_day(),
                reference_month: march,
                method,
                status: PaymentStatus::Confirmed,
                notes: None,
            })
            .await
            .unwrap();
    }

    let rows = api
        .payments()
        .monthly_report(&MonthlyReportQuery::for_month(march))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    let pix = rows.iter().find(|r| r.method == PaymentMethod::Pix).unwrap();
    assert_eq!(pix.count, 2);
    assert_eq!(pix.total, Decimal::from(270));

    let err = api.students().get(999).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.notice(), "Aluno não encontrado");
}
