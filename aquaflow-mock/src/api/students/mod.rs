//! Student API (`/alunos`)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_staff;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/alunos", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/inadimplentes", get(handler::delinquent))
        .route("/contratos-expirando", get(handler::expiring))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/pagamentos", get(handler::payments))
        .route_layer(middleware::from_fn(require_staff))
}
