//! Result type alias for Warden
//!
//! This module provides a convenient Result type alias that uses WardenError
//! as the error type.

use super::errors::WardenError;

/// Result type alias for Warden operations
///
/// # Examples
///
/// ```
/// use warden::domain::result::Result;
/// use warden::domain::errors::WardenError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(WardenError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, WardenError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::WardenError;

    #[test]
    fn test_result_ok() {
        let result: Result<i32> = Ok(42);
        assert!(result.is_ok());
        if let Ok(value) = result {
            assert_eq!(value, 42);
        }
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(WardenError::Other("boom".to_string()));
        assert!(result.is_err());
    }
}
