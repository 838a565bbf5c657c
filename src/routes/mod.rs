pub mod contact;
pub mod envelope;

use axum::Router;
use axum::routing::post;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new().route(
        "/api/contact",
        post(contact::submit).options(contact::preflight),
    )
}
