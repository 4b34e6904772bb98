//! Record model
//!
//! A [`SourceRow`] is one line of the export artifact exactly as read. Binding it
//! produces a typed [`Record`], or a [`RowBindingError`] when a value cannot be
//! coerced. Bound records are turned into [`SqlValue`] parameters for the insert.

use crate::domain::errors::RowBindingError;
use crate::domain::ids::RecordId;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Column order of the export artifact header
pub const ARTIFACT_HEADER: [&str; 3] = ["ID", "STATUS_DATE", "RATING"];

/// Number of bound parameters per record
pub const COLUMNS_PER_RECORD: usize = 3;

/// One artifact row before any coercion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRow {
    #[serde(rename = "ID")]
    pub id: String,

    #[serde(rename = "STATUS_DATE")]
    pub status_date: String,

    #[serde(rename = "RATING")]
    pub rating: String,
}

impl SourceRow {
    pub fn new(
        id: impl Into<String>,
        status_date: impl Into<String>,
        rating: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            status_date: status_date.into(),
            rating: rating.into(),
        }
    }
}

/// A synchronized row, ready to be bound into the target table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    pub status_date: NaiveDateTime,
    /// `None` when the source value was empty
    pub rating: Option<i64>,
}

impl Record {
    /// Parameters in insert column order: id, status_date, rating
    pub fn to_params(&self) -> [SqlValue; COLUMNS_PER_RECORD] {
        [
            SqlValue::Text(self.id.as_str().to_string()),
            SqlValue::Timestamp(self.status_date),
            match self.rating {
                Some(rating) => SqlValue::BigInt(rating),
                None => SqlValue::Null,
            },
        ]
    }
}

impl TryFrom<&SourceRow> for Record {
    type Error = RowBindingError;

    fn try_from(row: &SourceRow) -> Result<Self, Self::Error> {
        let id = RecordId::new(row.id.as_str()).map_err(|_| RowBindingError::EmptyId)?;

        let status_date =
            parse_status_date(&row.status_date).ok_or_else(|| RowBindingError::InvalidStatusDate {
                id: row.id.clone(),
                value: row.status_date.clone(),
            })?;

        let rating = parse_rating(&row.rating).map_err(|_| RowBindingError::InvalidRating {
            id: row.id.clone(),
            value: row.rating.clone(),
        })?;

        Ok(Self {
            id,
            status_date,
            rating,
        })
    }
}

/// Coerces a rating column: empty is null, anything else must be an integer
/// exactly as read, with no surrounding whitespace
pub fn parse_rating(value: &str) -> Result<Option<i64>, std::num::ParseIntError> {
    if value.is_empty() {
        return Ok(None);
    }
    value.parse::<i64>().map(Some)
}

/// Parses the timestamp shapes produced by the source export
///
/// Accepts `YYYY-MM-DD HH:MM:SS[.f]`, the same with a `T` separator, and a bare date.
pub fn parse_status_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// A bound statement parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Timestamp(NaiveDateTime),
    BigInt(i64),
    Null,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("", None ; "empty is null")]
    #[test_case("7", Some(7) ; "integer")]
    #[test_case("-3", Some(-3) ; "negative")]
    fn test_parse_rating(value: &str, expected: Option<i64>) {
        assert_eq!(parse_rating(value).unwrap(), expected);
    }

    #[test_case("x1" ; "alpha prefix")]
    #[test_case("7.5" ; "decimal")]
    #[test_case("   " ; "blank but not empty")]
    #[test_case(" 12 " ; "padded")]
    #[test_case("12\t" ; "trailing tab")]
    fn test_parse_rating_rejects(value: &str) {
        assert!(parse_rating(value).is_err());
    }

    #[test]
    fn test_parse_status_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(parse_status_date("2024-01-05 10:30:00"), Some(expected));
        assert_eq!(parse_status_date("2024-01-05T10:30:00"), Some(expected));
        assert_eq!(
            parse_status_date("2024-01-05 10:30:00.250000").map(|d| d.and_utc().timestamp_subsec_millis()),
            Some(250)
        );
        assert_eq!(
            parse_status_date("2024-01-05"),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_status_date("05/01/2024"), None);
        assert_eq!(parse_status_date(""), None);
    }

    #[test]
    fn test_bind_record_with_null_rating() {
        let row = SourceRow::new("A1", "2024-02-01 08:00:00", "");
        let record = Record::try_from(&row).unwrap();

        assert_eq!(record.id.as_str(), "A1");
        assert_eq!(record.rating, None);

        let params = record.to_params();
        assert_eq!(params[0], SqlValue::Text("A1".to_string()));
        assert!(matches!(params[1], SqlValue::Timestamp(_)));
        assert_eq!(params[2], SqlValue::Null);
    }

    #[test]
    fn test_bind_record_with_rating() {
        let row = SourceRow::new("A2", "2024-02-01 08:00:00", "7");
        let record = Record::try_from(&row).unwrap();
        assert_eq!(record.rating, Some(7));
        assert_eq!(record.to_params()[2], SqlValue::BigInt(7));
    }

    #[test]
    fn test_bind_record_errors() {
        let bad_rating = SourceRow::new("A3", "2024-02-01 08:00:00", "x1");
        assert_eq!(
            Record::try_from(&bad_rating),
            Err(RowBindingError::InvalidRating {
                id: "A3".to_string(),
                value: "x1".to_string()
            })
        );

        let bad_date = SourceRow::new("A4", "yesterday", "1");
        assert!(matches!(
            Record::try_from(&bad_date),
            Err(RowBindingError::InvalidStatusDate { .. })
        ));

        let no_id = SourceRow::new("", "2024-02-01", "1");
        assert_eq!(Record::try_from(&no_id), Err(RowBindingError::EmptyId));
    }
}
