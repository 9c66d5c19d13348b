// src/table.rs

use serde::{Deserialize, Serialize};

/// Header names every sheet must carry, in any order.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "user_id",
    "ID",
    "Last_Name",
    "First_Name",
    "Phone",
    "City",
    "Branch",
    "Vote",
];

/// One row of the voting sheet. Fields are matched by header name, so the
/// column order of the sheet does not matter; extra columns are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub user_id: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Last_Name")]
    pub last_name: String,
    #[serde(rename = "First_Name")]
    pub first_name: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Branch")]
    pub branch: String,
    #[serde(rename = "Vote")]
    pub vote: String,
}

impl VoteRecord {
    /// The vote value as compared by the report: trimmed and lowercased.
    pub fn normalized_vote(&self) -> String {
        self.vote.trim().to_lowercase()
    }
}

/// The whole sheet, rows kept in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Header names as they appeared in the CSV, after trimming.
    pub headers: Vec<String>,
    pub rows: Vec<VoteRecord>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First of [`REQUIRED_COLUMNS`] absent from the headers.
    pub fn missing_column(&self) -> Option<&'static str> {
        REQUIRED_COLUMNS
            .into_iter()
            .find(|required| !self.headers.iter().any(|h| h == required))
    }
}
