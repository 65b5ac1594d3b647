//! # OneSignal Client
//!
//! A client for the [OneSignal](https://onesignal.com) REST API: create and
//! view users, attach subscriptions, and send push notifications.
//!
//! The crate is a thin mapping from typed request values to the service's
//! JSON payload shapes. Payload construction is pure and validated up
//! front; the [`Client`] adds credential injection and an HTTP transport on
//! top, and every response is normalized into a uniform
//! [`ApiResponse`] (status, headers, decoded body). Non-2xx statuses are
//! passed through for the caller to interpret, never turned into errors.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use onesignal_client::{
//!     Client, CreateUser, Credentials, PushNotification, Subscription, SubscriptionChannel,
//!     UserAlias,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), onesignal_client::Error> {
//! let client = Client::builder(Credentials::new("rest-api-key", "app-id")).build()?;
//!
//! let alias = UserAlias::external_id("user_1");
//! client.create_user(&CreateUser::new(alias.clone())).await?;
//! client
//!     .create_subscription(
//!         &alias,
//!         &Subscription::new(SubscriptionChannel::AndroidPush, "device-token"),
//!     )
//!     .await?;
//!
//! let response = client
//!     .send_push_notification(
//!         &PushNotification::new(["user_1"]).with_content("en", "hello"),
//!     )
//!     .await?;
//! assert!(response.is_success());
//! # Ok(())
//! # }
//! ```
//!
//! ## What this crate does not do
//!
//! No retries, no caching, no persistence, no timeout policy (configure the
//! supplied `reqwest::Client` instead), and no interpretation of non-2xx
//! statuses.

mod client;

pub use self::client::payload::{
    self, ChannelCategory, CreateUser, PushNotification, Subscription, SubscriptionChannel,
    UserAlias,
};
pub use self::client::{
    ApiResponse, Client, ClientBuilder, Credentials, Error, ResponseBody, SecureString,
};
