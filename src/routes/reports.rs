use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::Method,
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    config::Config,
    error::AppError,
    models::{BatchReport, UploadedFile},
    services::report,
    AppState,
};

pub fn routes(config: &Config) -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/reports/black-and-white", post(analyze_report))
        .layer(cors)
        // The limit covers the whole multipart body; individual files are
        // checked against max_file_size in the handler.
        .layer(DefaultBodyLimit::max(config.max_file_size.saturating_mul(16)))
}

#[axum::debug_handler]
async fn analyze_report(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<BatchReport>, AppError> {
    let start = std::time::Instant::now();

    let mut initial_files = Vec::new();
    let mut final_files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let part_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(|name| name.to_string());
        let data = field.bytes().await?;

        let Some(file_name) = file_name else {
            tracing::warn!("multipart part {:?} has no file name, ignoring", part_name);
            continue;
        };

        if data.len() > state.config.max_file_size {
            return Err(AppError::InvalidInput(format!(
                "{} exceeds the {} byte upload limit",
                file_name, state.config.max_file_size
            )));
        }

        let upload = UploadedFile {
            name: file_name,
            data,
        };

        match part_name.as_str() {
            "initial" => initial_files.push(upload),
            "final" => final_files.push(upload),
            other => {
                tracing::warn!("ignoring multipart part with unknown name {:?}", other);
            }
        }
    }

    tracing::info!(
        "received {} initial and {} final uploads",
        initial_files.len(),
        final_files.len()
    );

    let batch = report::analyze_batch(&initial_files, &final_files);

    tracing::info!(
        "batch processed in {:?}: {} records, {} failures, {} charts",
        start.elapsed(),
        batch.records.len(),
        batch.failures.len(),
        batch.charts.len()
    );

    Ok(Json(batch))
}
