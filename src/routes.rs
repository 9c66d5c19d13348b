// src/routes.rs

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::{
    error::AppError,
    export::{ExportError, ExportFormat},
    fetch::TableSource,
    render,
    report::build_report,
    state::AppState,
};

pub async fn home_handler() -> Html<String> {
    Html(render::home_page().into_string())
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "votereport"
    }))
}

pub async fn user_handler<S: TableSource>(
    State(state): State<Arc<AppState<S>>>,
    Path(user_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let entry = state.cache.get_entry().await?;
    let report = build_report(&entry.table, &user_id)?;

    info!(
        %user_id,
        voted_yes = report.voted_yes,
        voted_no = report.voted_no,
        "report page"
    );
    Ok(Html(render::user_page(&report, entry.fetched_at).into_string()))
}

pub async fn excel_handler<S: TableSource>(
    State(state): State<Arc<AppState<S>>>,
    Path(user_id): Path<String>,
) -> Result<Response, AppError> {
    download(state, user_id, ExportFormat::Excel).await
}

pub async fn pdf_handler<S: TableSource>(
    State(state): State<Arc<AppState<S>>>,
    Path(user_id): Path<String>,
) -> Result<Response, AppError> {
    download(state, user_id, ExportFormat::Pdf).await
}

pub async fn not_found_handler() -> AppError {
    AppError::RouteNotFound
}

async fn download<S: TableSource>(
    state: Arc<AppState<S>>,
    user_id: String,
    format: ExportFormat,
) -> Result<Response, AppError> {
    let table = state.cache.get_table().await?;
    let report = build_report(&table, &user_id)?;
    let filename = format.filename(&user_id);
    let font = state.pdf_font.clone();

    // encoding is CPU-bound, keep it off the reactor
    let bytes = tokio::task::spawn_blocking(move || {
        format.encode(&report.user_id, &report.non_voters, &font)
    })
    .await
    .map_err(ExportError::from)??;

    info!(%user_id, ?format, bytes = bytes.len(), "export served");
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
