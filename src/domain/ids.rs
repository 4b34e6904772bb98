//! Domain identifier types with validation
//!
//! Newtype wrappers that keep record keys and SQL object names from being mixed up
//! with arbitrary strings. `SqlIdentifier` is the only way a table or view name
//! reaches SQL text, and it is validated when constructed.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Record identifier newtype wrapper
///
/// The `ID` column of a synchronized row. Must be non-empty.
///
/// # Examples
///
/// ```
/// use tableswap::domain::ids::RecordId;
/// use std::str::FromStr;
///
/// let id = RecordId::from_str("A-1001").unwrap();
/// assert_eq!(id.as_str(), "A-1001");
/// assert!(RecordId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a new RecordId, rejecting empty or whitespace-only input
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Record ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the record ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
            .expect("identifier pattern is a valid regex")
    })
}

/// A validated SQL object name (table or view), optionally schema-qualified
///
/// Identifiers cannot be bound as query parameters, so they are restricted to
/// `[A-Za-z_][A-Za-z0-9_]*` with at most one `schema.` prefix and always rendered
/// double-quoted via [`SqlIdentifier::quoted`].
///
/// # Examples
///
/// ```
/// use tableswap::domain::ids::SqlIdentifier;
///
/// let table = SqlIdentifier::new("analytics.table_blue").unwrap();
/// assert_eq!(table.quoted(), "\"analytics\".\"table_blue\"");
/// assert!(SqlIdentifier::new("t; DROP TABLE x").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SqlIdentifier(String);

impl SqlIdentifier {
    /// Creates a new identifier, rejecting anything outside the allowed grammar
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.len() > 127 || !identifier_pattern().is_match(&name) {
            return Err(format!(
                "'{name}' is not a valid SQL identifier (expected [schema.]name using letters, digits and underscores)"
            ));
        }
        Ok(Self(name))
    }

    /// Returns the identifier as written in configuration
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Renders the identifier for SQL text, quoting each dotted part
    pub fn quoted(&self) -> String {
        self.0
            .split('.')
            .map(|part| format!("\"{part}\""))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for SqlIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SqlIdentifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SqlIdentifier {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SqlIdentifier> for String {
    fn from(value: SqlIdentifier) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_record_id_valid() {
        let id = RecordId::new("12345").unwrap();
        assert_eq!(id.as_str(), "12345");
        assert_eq!(id.to_string(), "12345");
        assert_eq!(id.into_inner(), "12345");
    }

    #[test]
    fn test_record_id_empty() {
        assert!(RecordId::new("").is_err());
        assert!(RecordId::new("   ").is_err());
    }

    #[test_case("table_blue" ; "plain")]
    #[test_case("_staging1" ; "leading underscore")]
    #[test_case("analytics.table_green" ; "schema qualified")]
    fn test_identifier_accepts(name: &str) {
        assert!(SqlIdentifier::new(name).is_ok());
    }

    #[test_case("" ; "empty")]
    #[test_case("1table" ; "leading digit")]
    #[test_case("table-blue" ; "hyphen")]
    #[test_case("a.b.c" ; "two qualifiers")]
    #[test_case("x\"; DROP TABLE y; --" ; "injection")]
    #[test_case("my view" ; "space")]
    fn test_identifier_rejects(name: &str) {
        assert!(SqlIdentifier::new(name).is_err());
    }

    #[test]
    fn test_identifier_quoting() {
        assert_eq!(SqlIdentifier::new("my_view").unwrap().quoted(), "\"my_view\"");
        assert_eq!(
            SqlIdentifier::new("public.TABLE_BLUE").unwrap().quoted(),
            "\"public\".\"TABLE_BLUE\""
        );
    }

    #[test]
    fn test_identifier_deserialize_validates() {
        #[derive(Deserialize)]
        struct Holder {
            name: SqlIdentifier,
        }

        let ok: Holder = toml::from_str("name = \"table_blue\"").unwrap();
        assert_eq!(ok.name.as_str(), "table_blue");

        let bad = toml::from_str::<Holder>("name = \"bad name\"");
        assert!(bad.is_err());
    }
}
