use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Uri};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

mod auth;
pub use self::auth::{Credentials, SecureString};

mod builder;
pub use self::builder::ClientBuilder;

mod error;
pub use self::error::Error;

pub mod payload;
use self::payload::Endpoint;
pub use self::payload::{CreateUser, PushNotification, Subscription, UserAlias};

mod response;
pub use self::response::{ApiResponse, ResponseBody};

#[cfg(test)]
mod integration_tests;

/// Client for the OneSignal REST API.
///
/// Owns a base URI, [`Credentials`] and a `reqwest::Client`, and exposes one
/// async method per API operation. Requests carry the fixed
/// `Content-Type`/`Accept` JSON headers and a `Basic` authorization header
/// built from the API key. Non-2xx responses are returned as normal
/// [`ApiResponse`] values; the client never retries.
///
/// # Example
///
/// ```rust,no_run
/// use onesignal_client::{Client, CreateUser, Credentials, UserAlias};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), onesignal_client::Error> {
/// let client = Client::builder(Credentials::new("rest-api-key", "app-id")).build()?;
///
/// let response = client
///     .create_user(&CreateUser::new(UserAlias::external_id("user_1")))
///     .await?;
/// println!("created with status {}", response.status());
/// # Ok(())
/// # }
/// ```
///
/// # Concurrency
///
/// The client holds no mutable state; it is cheap to clone and safe to share
/// across tasks, with `reqwest::Client` providing connection pooling.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_uri: Uri,
    credentials: Credentials,
}

impl Client {
    /// Starts building a client for the given credentials.
    pub fn builder(credentials: Credentials) -> ClientBuilder {
        ClientBuilder::new(credentials)
    }

    /// The application id this client is scoped to.
    pub fn app_id(&self) -> &str {
        self.credentials.app_id()
    }
}

// Operations
impl Client {
    /// Creates a user. `POST /api/v1/apps/{app_id}/users`.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] when the alias id is empty, otherwise transport
    /// or decode failures.
    pub async fn create_user(&self, request: &CreateUser) -> Result<ApiResponse, Error> {
        let payload = payload::user_create_payload(request)?;
        self.execute(Endpoint::CreateUser, Some(payload)).await
    }

    /// Views a user by alias. `GET /api/v1/apps/{app_id}/users/by/{label}/{id}`.
    pub async fn view_user(&self, alias: &UserAlias) -> Result<ApiResponse, Error> {
        self.execute(Endpoint::ViewUser(alias), None).await
    }

    /// Deletes a user by alias. `DELETE /api/v1/apps/{app_id}/users/by/{label}/{id}`.
    pub async fn delete_user(&self, alias: &UserAlias) -> Result<ApiResponse, Error> {
        self.execute(Endpoint::DeleteUser(alias), None).await
    }

    /// Creates a subscription for an existing user.
    /// `POST /api/v1/apps/{app_id}/users/by/{label}/{id}/subscriptions`.
    pub async fn create_subscription(
        &self,
        alias: &UserAlias,
        subscription: &Subscription,
    ) -> Result<ApiResponse, Error> {
        let payload = payload::subscription_payload(subscription);
        self.execute(Endpoint::CreateSubscription(alias), Some(payload))
            .await
    }

    /// Sends a push notification. `POST /api/v1/notifications`.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] when the target list or contents is empty,
    /// otherwise transport or decode failures.
    pub async fn send_push_notification(
        &self,
        notification: &PushNotification,
    ) -> Result<ApiResponse, Error> {
        let payload =
            payload::push_notification_payload(notification, self.credentials.app_id())?;
        self.execute(Endpoint::SendPushNotification, Some(payload))
            .await
    }
}

// Diagnostics
impl Client {
    /// Checks whether the configured app id is accepted by the service.
    ///
    /// Creates a throwaway random-alias user, views it, and reports whether
    /// both calls came back 2xx. The throwaway user is deleted on every exit
    /// path, including when an intermediate call fails.
    ///
    /// # Errors
    ///
    /// Transport or decode failures from the probe calls; the cleanup delete
    /// still runs first.
    pub async fn check_app_id_valid(&self) -> Result<bool, Error> {
        let alias = UserAlias::throwaway();
        let probe = self.probe_create_and_view(&alias).await;
        self.cleanup_throwaway(&alias).await;
        probe
    }

    /// Checks whether the configured API key is accepted by the service.
    ///
    /// Creates a throwaway random-alias user and reports whether the service
    /// answered with something other than 401/403. The throwaway user is
    /// deleted on every exit path.
    ///
    /// # Errors
    ///
    /// Transport or decode failures from the probe call; the cleanup delete
    /// still runs first.
    pub async fn check_api_key_valid(&self) -> Result<bool, Error> {
        let alias = UserAlias::throwaway();
        let created = self.create_user(&CreateUser::new(alias.clone())).await;
        self.cleanup_throwaway(&alias).await;
        let created = created?;
        Ok(!matches!(created.status(), 401 | 403))
    }

    async fn probe_create_and_view(&self, alias: &UserAlias) -> Result<bool, Error> {
        let created = self.create_user(&CreateUser::new(alias.clone())).await?;
        if !created.is_success() {
            return Ok(false);
        }
        let viewed = self.view_user(alias).await?;
        Ok(viewed.is_success())
    }

    /// Deletion failures must not mask the probe outcome, so they are only
    /// logged here.
    async fn cleanup_throwaway(&self, alias: &UserAlias) {
        if let Err(error) = self.delete_user(alias).await {
            warn!(%error, alias_id = alias.id(), "failed to delete throwaway user");
        }
    }
}

// Transport
impl Client {
    async fn execute(
        &self,
        endpoint: Endpoint<'_>,
        payload: Option<Value>,
    ) -> Result<ApiResponse, Error> {
        let url = self.endpoint_url(&endpoint)?;
        let mut request = reqwest::Request::new(endpoint.method(), url);
        let headers = request.headers_mut();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, self.credentials.authorization()?);
        if let Some(payload) = payload {
            *request.body_mut() = Some(reqwest::Body::from(payload.to_string()));
        }

        debug!(method = %request.method(), url = %request.url(), "sending request");
        let response = self.http.execute(request).await?;
        debug!(status = %response.status(), "received response");

        ApiResponse::from_reqwest(response).await
    }

    fn endpoint_url(&self, endpoint: &Endpoint<'_>) -> Result<Url, Error> {
        let path = endpoint.path(self.credentials.app_id());
        let base = self.base_uri.to_string();
        let url = format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(url.parse::<Url>()?)
    }
}
