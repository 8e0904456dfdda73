//! Payment API (`/pagamentos`)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_staff;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/pagamentos", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/relatorio-mensal", get(handler::monthly_report))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route_layer(middleware::from_fn(require_staff))
}
