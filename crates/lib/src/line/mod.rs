//! LINE Messaging API channel: webhook wire types, signature verification,
//! and the reply client.

mod client;
mod events;
pub mod signature;

pub use client::{LineClient, ReplyError, ReplyMessage};
pub use events::{EventMessage, WebhookEvent};
