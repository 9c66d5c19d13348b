// src/fetch/parse.rs

use csv::{ReaderBuilder, StringRecord};
use thiserror::Error;

use crate::table::{Table, VoteRecord, REQUIRED_COLUMNS};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("sheet body is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("sheet body is not a readable vote table: {0}")]
    Csv(#[from] csv::Error),

    #[error("sheet is missing required column {0:?}")]
    MissingColumn(&'static str),
}

/// Decode a CSV export of the voting sheet.
///
/// A leading byte-order mark is tolerated, header names are trimmed before
/// they are matched against [`VoteRecord`] fields. Every column in
/// [`REQUIRED_COLUMNS`] must be present even when there are no data rows.
pub fn parse_table(body: &[u8]) -> Result<Table, ParseError> {
    let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);
    let text = std::str::from_utf8(body)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: StringRecord = reader.headers()?.iter().map(str::trim).collect();
    reader.set_headers(headers.clone());

    let mut table = Table {
        headers: headers.iter().map(str::to_string).collect(),
        rows: Vec::new(),
    };
    if let Some(column) = table.missing_column() {
        return Err(ParseError::MissingColumn(column));
    }

    table.rows = reader
        .deserialize::<VoteRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "user_id,ID,Last_Name,First_Name,Phone,City,Branch,Vote\n\
                         1,100,Cohen,Dana,050-1111111,Haifa,North,Yes\n\
                         1,101,Levi,Avi,050-2222222,Haifa,North,no\n\
                         2,102,Mizrahi,Noa,050-3333333,Eilat,South,no\n";

    #[test]
    fn test_parse_plain_sheet() {
        let table = parse_table(SHEET.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.headers.len(), 8);
        assert_eq!(table.rows[1].last_name, "Levi");
        assert_eq!(table.rows[2].user_id, "2");
    }

    #[test]
    fn test_bom_is_tolerated() {
        let mut body = UTF8_BOM.to_vec();
        body.extend_from_slice(SHEET.as_bytes());
        let table = parse_table(&body).unwrap();
        assert_eq!(table.headers[0], "user_id");
        assert_eq!(table.rows[0].user_id, "1");
    }

    #[test]
    fn test_headers_are_trimmed() {
        let body = " user_id , ID,Last_Name ,First_Name,Phone,City,Branch, Vote \n\
                    7,1,A,B,C,D,E,yes\n";
        let table = parse_table(body.as_bytes()).unwrap();
        assert_eq!(table.headers[0], "user_id");
        assert_eq!(table.headers[7], "Vote");
        assert_eq!(table.rows[0].vote, "yes");
    }

    #[test]
    fn test_column_order_and_extra_columns() {
        let body = "Vote,Branch,Extra,City,Phone,First_Name,Last_Name,ID,user_id\n\
                    \"No\",\"מא גזר\",x,\"רחובות\",\"054\",\"משה\",\"כהן\",\"9\",\"3\"\n";
        let table = parse_table(body.as_bytes()).unwrap();
        let row = &table.rows[0];
        assert_eq!(row.user_id, "3");
        assert_eq!(row.id, "9");
        assert_eq!(row.branch, "מא גזר");
        assert_eq!(row.vote, "No");
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let body = "user_id,ID,Last_Name,First_Name,Phone,City,Branch\n1,2,3,4,5,6,7\n";
        assert!(matches!(
            parse_table(body.as_bytes()),
            Err(ParseError::MissingColumn("Vote"))
        ));
    }

    #[test]
    fn test_missing_column_without_rows_is_an_error() {
        assert!(matches!(
            parse_table(b"user_id,ID\n"),
            Err(ParseError::MissingColumn("Last_Name"))
        ));
        assert!(matches!(
            parse_table(b"ID,Last_Name,First_Name,Phone,City,Branch,Vote\n"),
            Err(ParseError::MissingColumn("user_id"))
        ));
    }

    #[test]
    fn test_header_only_sheet_is_empty() {
        let table = parse_table(b"user_id,ID,Last_Name,First_Name,Phone,City,Branch,Vote\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.missing_column(), None);
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let body = b"user_id,ID\n\xff\xfe,1\n";
        assert!(matches!(parse_table(body), Err(ParseError::Encoding(_))));
    }

    #[test]
    fn test_empty_cells_are_empty_strings() {
        let body = "user_id,ID,Last_Name,First_Name,Phone,City,Branch,Vote\n5,1,,,,,,\n";
        let table = parse_table(body.as_bytes()).unwrap();
        assert_eq!(table.rows[0].vote, "");
        assert_eq!(table.rows[0].phone, "");
    }
}
