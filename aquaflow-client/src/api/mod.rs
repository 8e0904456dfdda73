//! Typed resource APIs over [`HttpClient`]
//!
//! ```no_run
//! # async fn run() -> aquaflow_client::ClientResult<()> {
//! use aquaflow_client::{Api, ClientConfig, NetworkHttpClient, Session};
//! use shared::models::StudentFilter;
//!
//! let config = ClientConfig::from_env()?;
//! let session = Session::restore_from(&config.storage_dir);
//! let api = Api::new(NetworkHttpClient::new(&config, session)?);
//! let students = api.students().list(&StudentFilter::default()).await?;
//! # let _ = students;
//! # Ok(())
//! # }
//! ```

mod auth;
mod instructors;
mod payments;
mod plans;
mod schedules;
mod students;
mod users;

pub use auth::AuthApi;
pub use instructors::InstructorsApi;
pub use payments::PaymentsApi;
pub use plans::PlansApi;
pub use schedules::SchedulesApi;
pub use students::StudentsApi;
pub use users::UsersApi;

use std::sync::Arc;

use crate::http::{HttpClient, NetworkHttpClient};
use crate::session::Session;

/// Entry point to all resource APIs; clones share the same HTTP client
#[derive(Debug)]
pub struct Api<C = NetworkHttpClient> {
    http: Arc<C>,
}

impl<C> Clone for Api<C> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
        }
    }
}

impl<C: HttpClient> Api<C> {
    pub fn new(http: C) -> Self {
        Self {
            http: Arc::new(http),
        }
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    pub fn session(&self) -> &Session {
        self.http.session()
    }

    pub fn auth(&self) -> AuthApi<'_, C> {
        AuthApi::new(&self.http)
    }

    pub fn students(&self) -> StudentsApi<'_, C> {
        StudentsApi::new(&self.http)
    }

    pub fn payments(&self) -> PaymentsApi<'_, C> {
        PaymentsApi::new(&self.http)
    }

    pub fn schedules(&self) -> SchedulesApi<'_, C> {
        SchedulesApi::new(&self.http)
    }

    pub fn instructors(&self) -> InstructorsApi<'_, C> {
        InstructorsApi::new(&self.http)
    }

    pub fn plans(&self) -> PlansApi<'_, C> {
        PlansApi::new(&self.http)
    }

    pub fn users(&self) -> UsersApi<'_, C> {
        UsersApi::new(&self.http)
    }
}
