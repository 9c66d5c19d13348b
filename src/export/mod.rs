// src/export/mod.rs

//! Serializers for the non-voter listing. Both take the same rows and
//! differ only in container format.

use thiserror::Error;

use crate::report::NonVoter;

pub mod excel;
pub mod pdf;

pub use pdf::PdfFont;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("excel encoding failed: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),

    #[error("pdf encoding failed: {0}")]
    Pdf(String),

    #[error("pdf font could not be embedded: {0}")]
    Font(String),

    #[error("export task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Excel,
    Pdf,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// Download name, `user_<id>_data.<ext>`. Characters that are unsafe in a
    /// header value or a file name are replaced with `_`.
    pub fn filename(&self, user_id: &str) -> String {
        let safe: String = user_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("user_{}_data.{}", safe, self.extension())
    }

    pub fn encode(
        &self,
        user_id: &str,
        rows: &[NonVoter],
        font: &PdfFont,
    ) -> Result<Vec<u8>, ExportError> {
        match self {
            ExportFormat::Excel => excel::encode(rows),
            ExportFormat::Pdf => pdf::encode(user_id, rows, font),
        }
    }
}
