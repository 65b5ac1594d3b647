/// Errors that can occur when using the OneSignal [`Client`](super::Client).
///
/// Validation failures are raised before any network call; transport and
/// decoding failures are surfaced unchanged. A non-2xx HTTP status is *not*
/// an error: it comes back as a regular [`ApiResponse`](super::ApiResponse)
/// with the status set, leaving interpretation to the caller.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum Error {
    /// Network or protocol failure from the underlying reqwest transport.
    Transport(reqwest::Error),

    /// URL parsing error when constructing a request URL.
    UrlError(url::ParseError),

    /// HTTP protocol error from the http crate.
    ///
    /// Occurs when assembling the base URI violates HTTP constraints.
    HttpError(http::Error),

    /// Invalid HTTP header value.
    ///
    /// Occurs when the API key contains characters that cannot be sent
    /// in an `Authorization` header.
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// A required input is missing or malformed.
    ///
    /// Raised by payload construction before any request is issued.
    #[display("Invalid {field}: {message}")]
    #[from(skip)]
    Validation {
        /// Name of the offending input field.
        field: &'static str,
        /// Description of what is wrong with it.
        message: String,
    },

    /// The response body claimed to be JSON but failed to parse.
    #[display("Failed to decode response body as JSON: {error}\n{body}")]
    #[from(skip)]
    Decode {
        /// The underlying JSON parsing error.
        error: serde_json::Error,
        /// The response body that failed to parse.
        body: String,
    },
}
