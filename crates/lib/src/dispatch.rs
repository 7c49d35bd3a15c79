//! Per-event translation dispatch and batch processing.
//!
//! Each webhook event is handled independently: filter to text messages,
//! classify the language pair, call the translation provider, and reply.
//! Every failure that can still produce a user-facing reply is absorbed
//! here. Only malformed events and reply-delivery failures escape, and the
//! batch processor turns those into a null outcome for that position without
//! touching sibling events.

use crate::classify::{self, ClassifyPolicy, LanguagePair};
use crate::line::{ReplyError, ReplyMessage, WebhookEvent};
use crate::translate::TranslateError;
use async_trait::async_trait;
use futures_util::future::join_all;
use serde::Serialize;

/// Prompt sent when a text message is empty or whitespace-only.
pub const EMPTY_INPUT_PROMPT: &str = "กรุณาส่งข้อความที่ต้องการแปลค่ะ";

/// Sent when the provider answered but carried no translated text.
pub const UNTRANSLATABLE_REPLY: &str = "ไม่สามารถแปลข้อความนี้ได้ในขณะนี้";

/// Sent when the provider call failed outright.
pub const PROVIDER_FAILURE_REPLY: &str =
    "ขออภัย เกิดข้อผิดพลาดในการแปล โปรดลองอีกครั้งในภายหลัง";

/// Sent when a my→th result looks like the provider fell back to English:
/// Burmese→English works, Burmese→Thai does not yet.
pub const BURMESE_THAI_UNSUPPORTED_REPLY: &str =
    "ขออภัย รองรับการแปลภาษาพม่าเป็นอังกฤษ แต่ยังไม่รองรับการแปลภาษาพม่าเป็นไทย";

/// Translation provider seam. `Ok(None)` means the provider answered but the
/// translated-text field was absent.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<Option<String>, TranslateError>;
}

/// Reply delivery seam (the LINE reply API in production).
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn reply(&self, reply_token: &str, message: &ReplyMessage) -> Result<(), ReplyError>;
}

/// What happened to one event. Serializes as a camelCase string in the
/// webhook response's results array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    /// Not an actionable text message; no reply sent, not an error.
    Skipped,
    /// Translated and replied.
    Replied,
    /// Empty input; replied with the fixed prompt, no provider call made.
    RepliedWithPrompt,
    /// Provider failed; replied with the fixed apology.
    RepliedWithError,
}

/// Dispatch failure that could not produce a user-facing reply.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("message event has no reply token")]
    MissingReplyToken,
    #[error("reply delivery failed: {0}")]
    ReplyDelivery(#[from] ReplyError),
}

/// Handle one event end to end. Provider failures are absorbed into a
/// fallback reply; reply-delivery failures propagate to the batch level.
pub async fn dispatch_event(
    policy: ClassifyPolicy,
    translator: &dyn Translator,
    sender: &dyn ReplySender,
    event: &WebhookEvent,
) -> Result<Outcome, DispatchError> {
    if event.typ != "message" {
        return Ok(Outcome::Skipped);
    }
    let Some(message) = &event.message else {
        return Ok(Outcome::Skipped);
    };
    if message.typ != "text" {
        return Ok(Outcome::Skipped);
    }
    let reply_token = event
        .reply_token
        .as_deref()
        .ok_or(DispatchError::MissingReplyToken)?;
    let text = message.text.as_deref().unwrap_or("");

    if text.trim().is_empty() {
        sender
            .reply(reply_token, &ReplyMessage::text(EMPTY_INPUT_PROMPT))
            .await?;
        return Ok(Outcome::RepliedWithPrompt);
    }

    let pair = classify::classify(policy, text);
    match translator.translate(text, pair.source, pair.target).await {
        Ok(translated) => {
            let reply_text = match translated {
                Some(t) => apply_fallback_guard(policy, pair, t),
                None => UNTRANSLATABLE_REPLY.to_string(),
            };
            sender
                .reply(reply_token, &ReplyMessage::text(reply_text))
                .await?;
            Ok(Outcome::Replied)
        }
        Err(e) => {
            log::warn!("translation {}→{} failed: {}", pair.source, pair.target, e);
            sender
                .reply(reply_token, &ReplyMessage::text(PROVIDER_FAILURE_REPLY))
                .await?;
            Ok(Outcome::RepliedWithError)
        }
    }
}

/// Replace a my→th result that looks like a silent English fallback with the
/// fixed apology. Only the three-way policy requests my→th, so the guard is
/// inert under the binary policy.
fn apply_fallback_guard(policy: ClassifyPolicy, pair: LanguagePair, translated: String) -> String {
    if policy == ClassifyPolicy::ThreeWayThMyEn
        && pair.source == "my"
        && pair.target == "th"
        && classify::looks_like_english_fallback(&translated)
    {
        log::debug!("my→th result looks like an English fallback, substituting apology");
        return BURMESE_THAI_UNSUPPORTED_REPLY.to_string();
    }
    translated
}

/// Run dispatch over a validated events array, concurrently and
/// independently. The result vector is positional: malformed events and
/// reply-delivery failures become `None` without affecting siblings. The
/// batch-shape check itself (is `events` a JSON array at all) belongs to the
/// gateway, before this is called.
pub async fn process_batch(
    policy: ClassifyPolicy,
    translator: &dyn Translator,
    sender: &dyn ReplySender,
    events: &[serde_json::Value],
) -> Vec<Option<Outcome>> {
    join_all(events.iter().map(|raw| async move {
        let event: WebhookEvent = match serde_json::from_value(raw.clone()) {
            Ok(e) => e,
            Err(e) => {
                log::warn!("skipping malformed event: {}", e);
                return None;
            }
        };
        match dispatch_event(policy, translator, sender, &event).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                log::warn!("event dispatch failed: {}", e);
                None
            }
        }
    }))
    .await
}
