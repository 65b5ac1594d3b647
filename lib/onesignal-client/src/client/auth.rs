use std::fmt;

use http::HeaderValue;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::Error;

/// Secure wrapper for the REST API key that automatically zeroes memory on drop.
///
/// The wrapped value is redacted in `Debug` output and masked in `Display`
/// so credentials never leak into logs in full.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Creates a new secure string from the provided value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner string value.
    ///
    /// The returned reference should not be stored for extended periods
    /// to minimize exposure time of sensitive data.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masks sensitive data for display/logging purposes.
    fn mask(value: &str) -> String {
        if value.len() <= 8 {
            "***".to_string()
        } else {
            format!("{}...{}", &value[..4], &value[value.len() - 4..])
        }
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::mask(&self.0))
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

/// Construction-time credentials for the OneSignal REST API.
///
/// Holds the REST API key (sent on every request as an `Authorization`
/// header) and the application id (embedded in URL paths and notification
/// payloads). Credentials are immutable once created; there is no token
/// refresh or expiry handling.
///
/// # Example
///
/// ```rust
/// use onesignal_client::Credentials;
///
/// let credentials = Credentials::new("your-rest-api-key", "your-app-id");
/// assert_eq!(credentials.app_id(), "your-app-id");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: SecureString,
    app_id: String,
}

impl Credentials {
    /// Creates credentials from a REST API key and an application id.
    pub fn new(api_key: impl Into<SecureString>, app_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            app_id: app_id.into(),
        }
    }

    /// The application id these credentials are scoped to.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Builds the `Authorization` header value.
    ///
    /// OneSignal REST keys are sent verbatim after the `Basic ` prefix;
    /// there is no username:password pair and no base64 step.
    pub(crate) fn authorization(&self) -> Result<HeaderValue, Error> {
        let header_value = format!("Basic {}", self.api_key.as_str());
        let mut value = HeaderValue::from_str(&header_value)?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("app_id", &self.app_id)
            .finish()
    }
}
