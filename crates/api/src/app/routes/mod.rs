use axum::{routing::get, Router};

pub mod categories;
pub mod overview;
pub mod products;
pub mod system;

/// Router for the inventory screens.
pub fn router() -> Router {
    Router::new()
        .route("/overview", get(overview::get_overview))
        .nest("/categories", categories::router())
        .nest("/products", products::router())
}
