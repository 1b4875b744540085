use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{config::Config, AppState};

pub mod reports;

pub fn routes(config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .merge(reports::routes(config))
}

async fn health_check() -> &'static str {
    "OK"
}
