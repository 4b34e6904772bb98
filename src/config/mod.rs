//! Configuration management for tableswap.
//!
//! Configuration is read from a TOML file with:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `TABLESWAP_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation that enumerates every missing or invalid field
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tableswap::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("tableswap.toml")?;
//! println!("Batch size: {}", config.export.batch_size);
//! println!("View: {}", config.target.view_name);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [source]
//! server = "sql.internal.example.com"
//! database = "Sales"
//! username = "reader"
//! password = "${SOURCE_DB_PASSWORD}"
//!
//! [export]
//! artifact_path = "/var/lib/tableswap/DATA.csv"
//! command = ["/opt/tableswap/export.sh"]
//! batch_size = 250
//!
//! [target]
//! connection_string = "${TARGET_DATABASE_URL}"
//! blue_table = "table_blue"
//! green_table = "table_green"
//! view_name = "my_view"
//!
//! [notification]
//! webhook_url = "https://hooks.example.com/tableswap"
//!
//! [lifecycle]
//! terminate_command = ["sudo", "shutdown", "-h", "now"]
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_str};
pub use schema::{
    ApplicationConfig, DesignationConfig, ExportConfig, LifecycleConfig, LoggingConfig,
    NotificationConfig, SourceConfig, SyncConfig, TargetConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
