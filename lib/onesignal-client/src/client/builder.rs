use http::Uri;
use http::uri::Scheme;

use super::{Client, Credentials, Error};

/// Builder for [`Client`] instances.
///
/// Defaults target the production service at `https://onesignal.com:443`;
/// the scheme, host and port can be overridden, which the tests use to
/// point the client at a local mock server.
///
/// # Example
///
/// ```rust
/// use onesignal_client::{Client, Credentials};
///
/// # fn example() -> Result<(), onesignal_client::Error> {
/// let client = Client::builder(Credentials::new("rest-api-key", "app-id")).build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    http: reqwest::Client,
    scheme: Scheme,
    host: String,
    port: u16,
    credentials: Credentials,
}

impl ClientBuilder {
    pub(crate) fn new(credentials: Credentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            scheme: Scheme::HTTPS,
            host: "onesignal.com".to_string(),
            port: 443,
            credentials,
        }
    }

    /// Sets the scheme (HTTP or HTTPS).
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the hostname.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Supplies a pre-configured `reqwest::Client`, e.g. with timeouts or
    /// proxy settings. The library imposes no timeout of its own.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Assembles the base URI and builds the [`Client`].
    ///
    /// # Errors
    ///
    /// Fails with [`Error::HttpError`] when the configured scheme, host and
    /// port do not form a valid URI.
    pub fn build(self) -> Result<Client, Error> {
        let Self {
            http,
            scheme,
            host,
            port,
            credentials,
        } = self;

        let base_uri = Uri::builder()
            .scheme(scheme)
            .authority(format!("{host}:{port}"))
            .path_and_query("/")
            .build()?;

        Ok(Client {
            http,
            base_uri,
            credentials,
        })
    }
}
