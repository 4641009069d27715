//! Orders API
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /api/orders | POST | place an order |
//! | /api/orders | GET | list orders |
//! | /api/orders/batch-process | POST | place several orders |
//! | /api/orders/{id} | GET / PUT / DELETE | read / replace lines / delete |
//! | /api/orders/{id}/close | POST | close |
//! | /api/orders/{id}/history | GET | status history |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::place).get(handler::list))
        .route("/batch-process", post(handler::place_batch))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/close", post(handler::close))
        .route("/{id}/history", get(handler::history))
}
