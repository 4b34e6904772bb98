//! PostgreSQL parameter models
//!
//! Maps domain [`SqlValue`]s onto driver parameters and defines the DDL of the
//! designation table.

use crate::domain::{SqlIdentifier, SqlValue};
use tokio_postgres::types::ToSql;

/// A boxed driver parameter
pub type PgParam = Box<dyn ToSql + Sync + Send>;

/// Converts one value into a driver parameter
///
/// `Null` is sent as a typed `BIGINT` null; rating is the only nullable column.
pub fn to_pg_param(value: &SqlValue) -> PgParam {
    match value {
        SqlValue::Text(text) => Box::new(text.clone()),
        SqlValue::Timestamp(ts) => Box::new(*ts),
        SqlValue::BigInt(n) => Box::new(*n),
        SqlValue::Null => Box::new(None::<i64>),
    }
}

/// Flattens row-major values into a parameter list, preserving order
pub fn flatten_params(rows: &[Vec<SqlValue>]) -> Vec<PgParam> {
    rows.iter().flatten().map(to_pg_param).collect()
}

/// DDL for the key-value table backing the designation store
pub fn key_value_table_ddl(table: &SqlIdentifier) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\
            item_key TEXT PRIMARY KEY, \
            item_value TEXT NOT NULL, \
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now())",
        table.quoted()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_flatten_params_keeps_row_major_order() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let rows = vec![
            vec![
                SqlValue::Text("a".to_string()),
                SqlValue::Timestamp(ts),
                SqlValue::Null,
            ],
            vec![
                SqlValue::Text("b".to_string()),
                SqlValue::Timestamp(ts),
                SqlValue::BigInt(3),
            ],
        ];

        let params = flatten_params(&rows);
        assert_eq!(params.len(), 6);
        assert_eq!(format!("{:?}", params[3]), format!("{:?}", "b".to_string()));
        assert_eq!(format!("{:?}", params[5]), "3");
        assert_eq!(format!("{:?}", params[2]), "None");
    }

    #[test]
    fn test_key_value_ddl() {
        let kv = key_value_table_ddl(&SqlIdentifier::new("sync_designation").unwrap());
        assert!(kv.contains("item_key TEXT PRIMARY KEY"));
    }
}
