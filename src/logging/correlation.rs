//! Correlation ID generation

use uuid::Uuid;

/// Generate a new correlation ID using UUID v4
///
/// One ID is minted per session and sent with every backend request so the
/// server side can tie a user's calls together.
///
/// # Examples
///
/// ```
/// use pingpad::logging::generate_correlation_id;
///
/// let id = generate_correlation_id();
/// assert!(!id.is_empty());
/// ```
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}
