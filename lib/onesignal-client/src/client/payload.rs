//! Typed request values and their canonical JSON payloads.
//!
//! Every function in this module is pure: identical input produces
//! byte-identical serialized JSON (object keys keep insertion order).
//! Validation happens here, before any network call.

use std::fmt;
use std::str::FromStr;

use http::Method;
use indexmap::IndexMap;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde_json::{Map, Value};

use super::Error;

/// The alias label OneSignal treats as the caller-side user id.
pub const DEFAULT_ALIAS_LABEL: &str = "external_id";

/// Characters escaped when an alias label or id is spliced into a URL path.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// A caller-chosen `(label, id)` pair identifying a user to the service,
/// as an alternative to an internal user id.
///
/// # Example
///
/// ```rust
/// use onesignal_client::UserAlias;
///
/// let alias = UserAlias::external_id("user_1");
/// assert_eq!(alias.label(), "external_id");
/// assert_eq!(alias.id(), "user_1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAlias {
    label: String,
    id: String,
}

impl UserAlias {
    /// Creates an alias with a custom label.
    pub fn new(label: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            id: id.into(),
        }
    }

    /// Creates an alias under the default `external_id` label.
    pub fn external_id(id: impl Into<String>) -> Self {
        Self::new(DEFAULT_ALIAS_LABEL, id)
    }

    /// A random `external_id` alias, used by the diagnostic helpers for
    /// throwaway users.
    pub(crate) fn throwaway() -> Self {
        Self::external_id(uuid::Uuid::new_v4().to_string())
    }

    /// The alias label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The alias id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Delivery medium of a [`Subscription`], as the closed set of names the
/// service accepts for the `type` field.
///
/// Parsing an unknown name with [`FromStr`] fails with
/// [`Error::Validation`]; there is no way to construct an out-of-set value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionChannel {
    /// `Email`
    Email,
    /// `SMS`
    Sms,
    /// `iOSPush`
    IosPush,
    /// `AndroidPush`
    AndroidPush,
    /// `HuaweiPush`
    HuaweiPush,
    /// `FireOSPush`
    FireOsPush,
    /// `WindowsPush`
    WindowsPush,
    /// `MacOSPush`
    MacOsPush,
    /// `ChromeExtensionPush`
    ChromeExtensionPush,
    /// `ChromePush`
    ChromePush,
    /// `SafariLegacyPush`
    SafariLegacyPush,
    /// `FirefoxPush`
    FirefoxPush,
    /// `SafariPush`
    SafariPush,
}

/// Coarse grouping of [`SubscriptionChannel`] values.
///
/// Purely informational for callers; nothing beyond the flat channel
/// enumeration is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelCategory {
    /// Desktop operating-system push.
    Os,
    /// Browser push.
    Web,
    /// Mobile platform push.
    Mobile,
    /// Everything else (email, SMS).
    Other,
}

impl ChannelCategory {
    /// The lowercase name used in the service documentation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Os => "os",
            Self::Web => "web",
            Self::Mobile => "mobile",
            Self::Other => "other",
        }
    }
}

impl SubscriptionChannel {
    /// All channels the service accepts.
    pub const ALL: [Self; 13] = [
        Self::Email,
        Self::Sms,
        Self::IosPush,
        Self::AndroidPush,
        Self::HuaweiPush,
        Self::FireOsPush,
        Self::WindowsPush,
        Self::MacOsPush,
        Self::ChromeExtensionPush,
        Self::ChromePush,
        Self::SafariLegacyPush,
        Self::FirefoxPush,
        Self::SafariPush,
    ];

    /// The exact name sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Sms => "SMS",
            Self::IosPush => "iOSPush",
            Self::AndroidPush => "AndroidPush",
            Self::HuaweiPush => "HuaweiPush",
            Self::FireOsPush => "FireOSPush",
            Self::WindowsPush => "WindowsPush",
            Self::MacOsPush => "MacOSPush",
            Self::ChromeExtensionPush => "ChromeExtensionPush",
            Self::ChromePush => "ChromePush",
            Self::SafariLegacyPush => "SafariLegacyPush",
            Self::FirefoxPush => "FirefoxPush",
            Self::SafariPush => "SafariPush",
        }
    }

    /// The informational category this channel belongs to.
    pub fn category(self) -> ChannelCategory {
        match self {
            Self::WindowsPush | Self::MacOsPush => ChannelCategory::Os,
            Self::ChromeExtensionPush
            | Self::ChromePush
            | Self::SafariLegacyPush
            | Self::FirefoxPush
            | Self::SafariPush => ChannelCategory::Web,
            Self::IosPush | Self::AndroidPush | Self::HuaweiPush | Self::FireOsPush => {
                ChannelCategory::Mobile
            }
            Self::Email | Self::Sms => ChannelCategory::Other,
        }
    }
}

impl fmt::Display for SubscriptionChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionChannel {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.as_str() == value)
            .ok_or_else(|| Error::Validation {
                field: "type",
                message: format!("unknown subscription channel: {value}"),
            })
    }
}

/// Parameters for creating a user.
///
/// `tags` and `subscriptions` are omitted from the payload entirely when
/// empty; the service treats the presence of those keys as meaningful.
///
/// # Example
///
/// ```rust
/// use onesignal_client::{CreateUser, Subscription, SubscriptionChannel, UserAlias};
///
/// let request = CreateUser::new(UserAlias::external_id("user_1"))
///     .with_language("fr")
///     .with_tag("plan", "premium")
///     .with_subscription(Subscription::new(SubscriptionChannel::AndroidPush, "tok123"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CreateUser {
    alias: UserAlias,
    language: String,
    tags: IndexMap<String, String>,
    subscriptions: Vec<Subscription>,
}

impl CreateUser {
    /// Creates a user-creation request with the default language (`en`),
    /// no tags and no subscriptions.
    pub fn new(alias: UserAlias) -> Self {
        Self {
            alias,
            language: "en".to_string(),
            tags: IndexMap::new(),
            subscriptions: Vec::new(),
        }
    }

    /// Overrides the user language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Adds a single tag. Tags keep insertion order.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Appends a subscription to create along with the user.
    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.subscriptions.push(subscription);
        self
    }

    /// The alias this user will be created under.
    pub fn alias(&self) -> &UserAlias {
        &self.alias
    }
}

/// Parameters for creating a subscription.
///
/// # Example
///
/// ```rust
/// use onesignal_client::{Subscription, SubscriptionChannel};
///
/// let subscription = Subscription::new(SubscriptionChannel::IosPush, "device-token")
///     .with_session_time(120);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    channel: SubscriptionChannel,
    token: String,
    enabled: bool,
    session_time: u32,
    session_count: u32,
    extra: IndexMap<String, Value>,
}

impl Subscription {
    /// Creates a subscription with the service defaults: enabled, a
    /// 60-second session time and a session count of one.
    pub fn new(channel: SubscriptionChannel, token: impl Into<String>) -> Self {
        Self {
            channel,
            token: token.into(),
            enabled: true,
            session_time: 60,
            session_count: 1,
            extra: IndexMap::new(),
        }
    }

    /// Overrides whether the subscription starts enabled.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Overrides the reported session time, in seconds.
    pub fn with_session_time(mut self, session_time: u32) -> Self {
        self.session_time = session_time;
        self
    }

    /// Overrides the reported session count.
    pub fn with_session_count(mut self, session_count: u32) -> Self {
        self.session_count = session_count;
        self
    }

    /// Adds an extra field to the subscription object.
    ///
    /// Extra fields are merged last, so they overwrite the defaults when
    /// the keys collide (last write wins).
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Parameters for sending a push notification.
///
/// The target list is a sequence of `external_id` alias ids; the historical
/// "bare string" input shape is unrepresentable here by construction.
///
/// # Example
///
/// ```rust
/// use onesignal_client::PushNotification;
///
/// let notification = PushNotification::new(["user_1", "user_2"])
///     .with_content("en", "hello")
///     .with_heading("en", "greetings");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PushNotification {
    to: Vec<String>,
    channel: String,
    contents: IndexMap<String, String>,
    headings: IndexMap<String, String>,
    data: IndexMap<String, Value>,
}

impl PushNotification {
    /// Creates a notification for the given `external_id` alias ids on the
    /// default `push` channel.
    pub fn new<I, S>(to: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            to: to.into_iter().map(Into::into).collect(),
            channel: "push".to_string(),
            contents: IndexMap::new(),
            headings: IndexMap::new(),
            data: IndexMap::new(),
        }
    }

    /// Overrides the target channel.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// Adds a localized message body. At least one is required.
    pub fn with_content(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.contents.insert(locale.into(), text.into());
        self
    }

    /// Adds a localized heading.
    pub fn with_heading(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.headings.insert(locale.into(), text.into());
        self
    }

    /// Adds a custom data field.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// One logical API operation, resolved at compile time to its HTTP method
/// and URL path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Endpoint<'a> {
    CreateUser,
    ViewUser(&'a UserAlias),
    DeleteUser(&'a UserAlias),
    CreateSubscription(&'a UserAlias),
    SendPushNotification,
}

impl Endpoint<'_> {
    pub(crate) fn method(&self) -> Method {
        match self {
            Self::CreateUser | Self::CreateSubscription(_) | Self::SendPushNotification => {
                Method::POST
            }
            Self::ViewUser(_) => Method::GET,
            Self::DeleteUser(_) => Method::DELETE,
        }
    }

    pub(crate) fn path(&self, app_id: &str) -> String {
        let app = encode_segment(app_id);
        match self {
            Self::CreateUser => format!("/api/v1/apps/{app}/users"),
            Self::ViewUser(alias) | Self::DeleteUser(alias) => {
                format!(
                    "/api/v1/apps/{app}/users/by/{}/{}",
                    encode_segment(alias.label()),
                    encode_segment(alias.id())
                )
            }
            Self::CreateSubscription(alias) => {
                format!(
                    "/api/v1/apps/{app}/users/by/{}/{}/subscriptions",
                    encode_segment(alias.label()),
                    encode_segment(alias.id())
                )
            }
            Self::SendPushNotification => "/api/v1/notifications".to_string(),
        }
    }
}

fn subscription_fields(subscription: &Subscription) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(
        "type".to_string(),
        Value::String(subscription.channel.as_str().to_string()),
    );
    fields.insert("token".to_string(), Value::String(subscription.token.clone()));
    fields.insert("enabled".to_string(), Value::Bool(subscription.enabled));
    fields.insert("session_time".to_string(), Value::from(subscription.session_time));
    fields.insert(
        "session_count".to_string(),
        Value::from(subscription.session_count),
    );
    // Merged last: extra keys overwrite the defaults.
    for (key, value) in &subscription.extra {
        fields.insert(key.clone(), value.clone());
    }
    fields
}

/// Builds the user-creation payload.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the alias id is empty.
pub fn user_create_payload(request: &CreateUser) -> Result<Value, Error> {
    if request.alias.id().is_empty() {
        return Err(Error::Validation {
            field: "alias_id",
            message: "alias id must not be empty".to_string(),
        });
    }

    let mut properties = Map::new();
    properties.insert(
        "language".to_string(),
        Value::String(request.language.clone()),
    );
    if !request.tags.is_empty() {
        let tags = request
            .tags
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();
        properties.insert("tags".to_string(), Value::Object(tags));
    }

    let mut identity = Map::new();
    identity.insert(
        request.alias.label().to_string(),
        Value::String(request.alias.id().to_string()),
    );

    let mut payload = Map::new();
    payload.insert("properties".to_string(), Value::Object(properties));
    payload.insert("identity".to_string(), Value::Object(identity));
    if !request.subscriptions.is_empty() {
        let subscriptions = request
            .subscriptions
            .iter()
            .map(|subscription| Value::Object(subscription_fields(subscription)))
            .collect();
        payload.insert("subscriptions".to_string(), Value::Array(subscriptions));
    }

    Ok(Value::Object(payload))
}

/// Builds the subscription-creation payload.
///
/// The channel set is enforced by [`SubscriptionChannel`] itself, so this
/// function has no failure mode.
pub fn subscription_payload(subscription: &Subscription) -> Value {
    let mut payload = Map::new();
    payload.insert(
        "subscription".to_string(),
        Value::Object(subscription_fields(subscription)),
    );
    Value::Object(payload)
}

/// Builds the push-notification payload.
///
/// `headings` and `data` contents are flattened into the top level of the
/// payload, not nested under their own keys; the service relies on that
/// historical shape.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the target list or `contents` is
/// empty.
pub fn push_notification_payload(
    request: &PushNotification,
    app_id: &str,
) -> Result<Value, Error> {
    if request.to.is_empty() {
        return Err(Error::Validation {
            field: "to",
            message: "at least one target alias id is required".to_string(),
        });
    }
    if request.contents.is_empty() {
        return Err(Error::Validation {
            field: "contents",
            message: "at least one localized message is required".to_string(),
        });
    }

    let mut include_aliases = Map::new();
    include_aliases.insert(
        DEFAULT_ALIAS_LABEL.to_string(),
        Value::Array(request.to.iter().cloned().map(Value::String).collect()),
    );

    let mut payload = Map::new();
    payload.insert("include_aliases".to_string(), Value::Object(include_aliases));
    payload.insert(
        "target_channel".to_string(),
        Value::String(request.channel.clone()),
    );
    let contents = request
        .contents
        .iter()
        .map(|(locale, text)| (locale.clone(), Value::String(text.clone())))
        .collect();
    payload.insert("contents".to_string(), Value::Object(contents));
    for (locale, heading) in &request.headings {
        payload.insert(locale.clone(), Value::String(heading.clone()));
    }
    for (key, value) in &request.data {
        payload.insert(key.clone(), value.clone());
    }
    payload.insert("app_id".to_string(), Value::String(app_id.to_string()));

    Ok(Value::Object(payload))
}
