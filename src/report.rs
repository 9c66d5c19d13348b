// src/report.rs

use serde::Serialize;
use thiserror::Error;

use crate::table::{Table, VoteRecord};

/// Columns of the non-voter listing, in display and export order.
pub const NON_VOTER_COLUMNS: [&str; 6] = ["ID", "Last_Name", "First_Name", "Phone", "City", "Branch"];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReportError {
    #[error("no rows for user {user_id}")]
    NotFound { user_id: String },
}

/// A record whose vote is "no", reduced to the exported columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NonVoter {
    pub id: String,
    pub last_name: String,
    pub first_name: String,
    pub phone: String,
    pub city: String,
    pub branch: String,
}

impl NonVoter {
    /// Cell values in [`NON_VOTER_COLUMNS`] order.
    pub fn cells(&self) -> [&str; 6] {
        [
            self.id.as_str(),
            self.last_name.as_str(),
            self.first_name.as_str(),
            self.phone.as_str(),
            self.city.as_str(),
            self.branch.as_str(),
        ]
    }
}

impl From<&VoteRecord> for NonVoter {
    fn from(r: &VoteRecord) -> Self {
        Self {
            id: r.id.clone(),
            last_name: r.last_name.clone(),
            first_name: r.first_name.clone(),
            phone: r.phone.clone(),
            city: r.city.clone(),
            branch: r.branch.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportResult {
    pub user_id: String,
    pub total_rows: usize,
    pub voted_yes: usize,
    pub voted_no: usize,
    pub non_voters: Vec<NonVoter>,
}

/// Summarize the rows belonging to `user_id`.
///
/// Votes are compared after trimming and lowercasing; anything other than
/// "yes" or "no" counts toward neither total.
pub fn build_report(table: &Table, user_id: &str) -> Result<ReportResult, ReportError> {
    let mut total_rows = 0;
    let mut voted_yes = 0;
    let mut voted_no = 0;
    let mut non_voters = Vec::new();

    for row in table.rows.iter().filter(|r| r.user_id == user_id) {
        total_rows += 1;
        match row.normalized_vote().as_str() {
            "yes" => voted_yes += 1,
            "no" => {
                voted_no += 1;
                non_voters.push(NonVoter::from(row));
            }
            _ => {}
        }
    }

    if total_rows == 0 {
        return Err(ReportError::NotFound {
            user_id: user_id.to_string(),
        });
    }

    Ok(ReportResult {
        user_id: user_id.to_string(),
        total_rows,
        voted_yes,
        voted_no,
        non_voters,
    })
}
