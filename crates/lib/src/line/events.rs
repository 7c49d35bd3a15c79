//! Webhook payload types (one event per inbound notification).

use serde::Deserialize;

/// One webhook event. Only `message` events carrying a text message are
/// actionable; everything else (follow, sticker, image, postback, …) is
/// skipped silently. Events are parsed per batch, are immutable, and are
/// dropped once dispatch completes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    /// Event kind: "message", "follow", "unfollow", "postback", …
    #[serde(rename = "type")]
    pub typ: String,

    /// Single-use reply handle. Expiry and reuse are the platform's concern,
    /// not the dispatcher's.
    #[serde(default)]
    pub reply_token: Option<String>,

    /// Present on message events.
    #[serde(default)]
    pub message: Option<EventMessage>,
}

/// The message portion of a message event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
    /// Message kind: "text", "image", "sticker", …
    #[serde(rename = "type")]
    pub typ: String,

    /// Raw user-submitted text; present only when the kind is "text".
    #[serde(default)]
    pub text: Option<String>,
}
