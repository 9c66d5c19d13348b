// src/render.rs

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::{
    export::ExportFormat,
    report::{ReportResult, NON_VOTER_COLUMNS},
};

const STYLE: &str = "
body { font-family: Arial, sans-serif; margin: 2em; }
table { border-collapse: collapse; margin-top: 1em; }
th, td { border: 1px solid #999; padding: 4px 10px; }
th { background-color: #f0f0f0; }
.counts span { margin-left: 2em; font-weight: bold; }
.downloads a { margin-left: 1.5em; }
.muted { color: #777; font-size: 0.9em; }
";

/// Percent-encoded absolute path built from raw segments. Only RFC 3986
/// unreserved bytes pass through.
pub fn route_path(segments: &[&str]) -> String {
    let mut path = String::new();
    for segment in segments {
        path.push('/');
        for byte in segment.bytes() {
            if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
                path.push(byte as char);
            } else {
                let _ = write!(path, "%{:02X}", byte);
            }
        }
    }
    path
}

pub fn download_path(format: ExportFormat, user_id: &str) -> String {
    let kind = match format {
        ExportFormat::Excel => "excel",
        ExportFormat::Pdf => "pdf",
    };
    route_path(&["download", kind, user_id])
}

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="he" dir="rtl" {
            head {
                meta charset="UTF-8";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body { (body) }
        }
    }
}

pub fn home_page() -> Markup {
    layout(
        "מערכת הצבעות",
        html! {
            h1 { "✅ המערכת פועלת!" }
            p {
                "לצפייה בנתוני משתמש יש לגשת לכתובת "
                code { "/user/<מספר משתמש>" }
            }
            ul {
                li { a href="/health" { "בדיקת תקינות" } }
            }
        },
    )
}

pub fn user_page(report: &ReportResult, fetched_at: DateTime<Utc>) -> Markup {
    let title = format!("נתוני הצבעה עבור משתמש {}", report.user_id);
    layout(
        &title,
        html! {
            h1 { (title) }
            div class="counts" {
                span { "✅ הצביעו: " (report.voted_yes) }
                span { "❌ טרם הצביעו: " (report.voted_no) }
            }
            div class="downloads" {
                a href=(download_path(ExportFormat::Excel, &report.user_id)) { "📥 הורדה לאקסל" }
                a href=(download_path(ExportFormat::Pdf, &report.user_id)) { "📄 הורדה ל-PDF" }
            }
            @if report.non_voters.is_empty() {
                p { "🎉 כל המשתמשים ברשימה הצביעו." }
            } @else {
                h2 { "רשימת משתמשים שטרם הצביעו" }
                table {
                    thead {
                        tr {
                            @for column in NON_VOTER_COLUMNS {
                                th { (column) }
                            }
                        }
                    }
                    tbody {
                        @for row in &report.non_voters {
                            tr {
                                @for cell in row.cells() {
                                    td { (cell) }
                                }
                            }
                        }
                    }
                }
            }
            p class="muted" {
                "הנתונים עודכנו לאחרונה: " (fetched_at.format("%Y-%m-%d %H:%M:%S UTC"))
            }
        },
    )
}

/// Short page carrying a single user-facing message.
pub fn message_page(message: &str) -> Markup {
    layout(message, html! { h2 { (message) } })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NonVoter;

    fn report(non_voters: Vec<NonVoter>) -> ReportResult {
        ReportResult {
            user_id: "17".to_string(),
            total_rows: 3,
            voted_yes: 2,
            voted_no: non_voters.len(),
            non_voters,
        }
    }

    #[test]
    fn test_route_path_escapes_segments() {
        assert_eq!(route_path(&["user", "42"]), "/user/42");
        assert_eq!(route_path(&["user", "a b/c"]), "/user/a%20b%2Fc");
        assert_eq!(route_path(&["user", "א"]), "/user/%D7%90");
        assert_eq!(route_path(&["user", "x-1_y.z~"]), "/user/x-1_y.z~");
        assert_eq!(download_path(ExportFormat::Pdf, "9"), "/download/pdf/9");
    }

    #[test]
    fn test_user_page_lists_non_voters() {
        let nv = NonVoter {
            id: "5".to_string(),
            last_name: "<Cohen>".to_string(),
            first_name: "Dana".to_string(),
            phone: "050".to_string(),
            city: "חיפה".to_string(),
            branch: "North".to_string(),
        };
        let html = user_page(&report(vec![nv]), Utc::now()).into_string();

        assert!(html.contains("נתוני הצבעה עבור משתמש 17"));
        assert!(html.contains("✅ הצביעו: 2"));
        assert!(html.contains("טרם הצביעו: 1"));
        assert!(html.contains("<th>Last_Name</th>"));
        assert!(html.contains("<td>חיפה</td>"));
        assert!(html.contains("&lt;Cohen&gt;"));
        assert!(html.contains(r#"href="/download/excel/17""#));
        assert!(html.contains(r#"href="/download/pdf/17""#));
    }

    #[test]
    fn test_user_page_without_non_voters() {
        let html = user_page(&report(vec![]), Utc::now()).into_string();
        assert!(!html.contains("<table>"));
        assert!(html.contains("כל המשתמשים ברשימה הצביעו"));
    }

    #[test]
    fn test_pages_are_rtl_hebrew() {
        let html = home_page().into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="he" dir="rtl">"#));
        assert!(message_page("⚠️ x").into_string().contains("<h2>⚠️ x</h2>"));
    }
}
