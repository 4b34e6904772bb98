//! Blue/green designation model
//!
//! Exactly one of the two target tables is active at any time. The other one is
//! the load target of the next run. [`TargetTables`] is the closed mapping from a
//! designation to the table it names; SQL only ever sees one of those two tables.

use crate::domain::ids::SqlIdentifier;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which of the two target tables a value refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Designation {
    /// Active by convention when nothing has been persisted yet
    #[default]
    Blue,
    Green,
}

impl Designation {
    /// The other designation
    pub fn toggle(self) -> Self {
        match self {
            Designation::Blue => Designation::Green,
            Designation::Green => Designation::Blue,
        }
    }

    /// Persisted form
    pub fn as_str(&self) -> &'static str {
        match self {
            Designation::Blue => "BLUE",
            Designation::Green => "GREEN",
        }
    }
}

impl fmt::Display for Designation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Designation {
    type Err = String;

    /// Case-insensitive; also accepts the `TABLE_BLUE`/`TABLE_GREEN` legacy form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BLUE" | "TABLE_BLUE" => Ok(Designation::Blue),
            "GREEN" | "TABLE_GREEN" => Ok(Designation::Green),
            other => Err(format!(
                "Unknown designation '{other}'. Must be one of: BLUE, GREEN"
            )),
        }
    }
}

/// The two target tables, addressed only through a [`Designation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTables {
    blue: SqlIdentifier,
    green: SqlIdentifier,
}

impl TargetTables {
    /// Creates the mapping; the two names must differ
    pub fn new(blue: SqlIdentifier, green: SqlIdentifier) -> Result<Self, String> {
        if blue == green {
            return Err(format!(
                "Blue and green tables must be different, both are '{blue}'"
            ));
        }
        Ok(Self { blue, green })
    }

    /// Table backing the given designation
    pub fn table_for(&self, designation: Designation) -> &SqlIdentifier {
        match designation {
            Designation::Blue => &self.blue,
            Designation::Green => &self.green,
        }
    }

    /// Both tables, blue first
    pub fn both(&self) -> [(Designation, &SqlIdentifier); 2] {
        [
            (Designation::Blue, &self.blue),
            (Designation::Green, &self.green),
        ]
    }
}
