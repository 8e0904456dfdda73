//! Top-level router guard
//!
//! The HTTP layer only clears the session on `401` and flags a pending
//! redirect; the guard is the one place that actually navigates. Because the
//! flag is consumed on read, any number of concurrent `401`s produce a single
//! navigation to the login route.

use crate::session::Session;
use crate::{ClientError, ClientResult};

pub const LOGIN_ROUTE: &str = "/login";

/// Routes reachable without a session
pub const PUBLIC_ROUTES: [&str; 2] = [LOGIN_ROUTE, "/landing"];

/// Something that can change the current route
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

#[derive(Debug, Clone)]
pub struct RouterGuard<N> {
    session: Session,
    navigator: N,
}

impl<N: Navigator> RouterGuard<N> {
    pub fn new(session: Session, navigator: N) -> Self {
        Self { session, navigator }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn is_public(route: &str) -> bool {
        PUBLIC_ROUTES.contains(&route)
    }

    /// Perform a pending session-expiry redirect; returns whether it navigated
    pub fn poll(&self) -> bool {
        if self.session.take_redirect() {
            tracing::info!(route = LOGIN_ROUTE, "Session expired, redirecting");
            self.navigator.navigate(LOGIN_ROUTE);
            return true;
        }
        false
    }

    /// Pass a result through, redirecting if it was a `401`
    pub fn route<T>(&self, result: ClientResult<T>) -> ClientResult<T> {
        if matches!(result, Err(ClientError::Unauthorized)) {
            self.poll();
        }
        result
    }

    /// Whether `route` may be shown; unauthenticated visits to protected
    /// routes are sent to the login route
    pub fn authorize(&self, route: &str) -> bool {
        if Self::is_public(route) || self.session.is_authenticated() {
            return true;
        }
        // Drop any pending expiry so it does not redirect a second time
        self.session.take_redirect();
        self.navigator.navigate(LOGIN_ROUTE);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl Navigator for Recorder {
        fn navigate(&self, route: &str) {
            self.0.lock().push(route.to_string());
        }
    }

    #[test]
    fn test_nothing_pending() {
        let guard = RouterGuard::new(Session::in_memory(), Recorder::default());
        assert!(!guard.poll());
        assert!(guard.route(Ok::<_, ClientError>(1)).is_ok());
        assert!(guard.navigator().0.lock().is_empty());
    }

    #[test]
    fn test_many_unauthorized_results_redirect_once() {
        let session = Session::in_memory();
        let user = shared::models::User {
            id: 1,
            email: "admin@aquaflow.com".into(),
            username: "admin".into(),
            full_name: "Admin".into(),
            role: shared::models::Role::Admin,
            is_active: true,
            is_superuser: true,
            created_at: chrono::NaiveDateTime::default(),
            updated_at: None,
            last_login: None,
        };
        session.establish(user, "t".into()).unwrap();
        let generation = session.credentials().generation;

        let recorder = Recorder::default();
        let guard = RouterGuard::new(session.clone(), recorder.clone());
        for _ in 0..3 {
            session.expire(generation);
            let _ = guard.route(Err::<(), _>(ClientError::Unauthorized));
        }
        assert_eq!(recorder.0.lock().len(), 1);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_protected_route_requires_session() {
        let recorder = Recorder::default();
        let guard = RouterGuard::new(Session::in_memory(), recorder.clone());
        assert!(guard.authorize("/login"));
        assert!(!guard.authorize("/alunos"));
        assert_eq!(*recorder.0.lock(), vec!["/login".to_string()]);
    }
}
