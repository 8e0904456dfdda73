//! Schedule API (`/horarios`)
//!
//! | Path | Method |
//! |------|--------|
//! | /horarios | GET, POST |
//! | /horarios/grade-completa | GET |
//! | /horarios/{id} | GET, PUT, DELETE |
//! | /horarios/{id}/vagas | GET |
//! | /horarios/{id}/alunos/{aluno_id} | POST, DELETE |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_staff;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/horarios", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/grade-completa", get(handler::full_grid))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/vagas", get(handler::capacity))
        .route(
            "/{id}/alunos/{aluno_id}",
            post(handler::admit).delete(handler::remove),
        )
        .route_layer(middleware::from_fn(require_staff))
}
