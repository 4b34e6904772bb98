//! Result type alias for tableswap

use super::errors::SyncError;

/// Result type alias for tableswap operations
///
/// # Examples
///
/// ```
/// use tableswap::domain::result::Result;
/// use tableswap::domain::errors::SyncError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SyncError::Export("artifact missing".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SyncError>;
