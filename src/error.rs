// src/error.rs

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, info};

use crate::{export::ExportError, fetch::FetchError, render, report::ReportError};

pub const MSG_FETCH_FAILED: &str = "⚠️ שגיאה בטעינת הנתונים.";
pub const MSG_USER_NOT_FOUND: &str = "⚠️ לא נמצאו נתונים למשתמש זה.";
pub const MSG_PAGE_NOT_FOUND: &str = "⚠️ הדף המבוקש לא נמצא.";
pub const MSG_INTERNAL: &str = "⚠️ אירעה שגיאה פנימית.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("no such route")]
    RouteNotFound,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Report(ReportError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Localized text shown to the user. Never includes the error detail.
    pub fn message(&self) -> &'static str {
        match self {
            AppError::Fetch(_) => MSG_FETCH_FAILED,
            AppError::Report(ReportError::NotFound { .. }) => MSG_USER_NOT_FOUND,
            AppError::Export(_) => MSG_INTERNAL,
            AppError::RouteNotFound => MSG_PAGE_NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            info!(error = %self, "request rejected");
        }

        let page = render::message_page(self.message()).into_string();
        (status, Html(page)).into_response()
    }
}
