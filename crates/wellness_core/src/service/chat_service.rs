//! Support chat conversation.
//!
//! # Responsibility
//! - Validate and record user messages.
//! - Pick the bot reply and hand it back for delayed delivery.
//!
//! # Invariants
//! - The transcript is append-only and in delivery order.
//! - A rejected message leaves the transcript untouched.
//! - Message text is never written to logs; only lengths are.

use crate::model::input::InputError;
use crate::rules::responder::respond;
use chrono::{DateTime, FixedOffset};
use log::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<FixedOffset>,
}

/// Bot reply chosen for a message but not yet shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReply {
    /// User message this reply answers.
    pub in_reply_to: Uuid,
    pub text: &'static str,
}

#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a user message and returns the reply to deliver later.
    ///
    /// Surrounding whitespace is trimmed before storing and matching.
    pub fn submit(
        &mut self,
        text: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<PendingReply, InputError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(InputError::EmptyMessage);
        }

        let message = self.push(text.to_string(), Sender::User, now);
        info!(
            "event=chat_submit module=chat status=ok chars={}",
            text.chars().count()
        );
        Ok(PendingReply {
            in_reply_to: message.id,
            text: respond(text),
        })
    }

    /// Appends a previously chosen reply to the transcript.
    pub fn deliver(&mut self, reply: PendingReply, now: DateTime<FixedOffset>) -> &ChatMessage {
        self.push(reply.text.to_string(), Sender::Bot, now)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, text: String, sender: Sender, now: DateTime<FixedOffset>) -> &ChatMessage {
        self.messages.push(ChatMessage {
            id: Uuid::new_v4(),
            text,
            sender,
            timestamp: now,
        });
        let last = self.messages.len() - 1;
        &self.messages[last]
    }
}

#[cfg(test)]
mod tests {
    use super::{Conversation, Sender};
    use crate::model::input::InputError;
    use crate::rules::responder::{FALLBACK_RESPONSE, STRESS_RESPONSE};
    use chrono::{DateTime, Duration, FixedOffset};

    fn t0() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-02-14T18:30:00+05:30").unwrap()
    }

    #[test]
    fn blank_message_is_rejected() {
        let mut chat = Conversation::new();
        assert_eq!(chat.submit("   \n", t0()), Err(InputError::EmptyMessage));
        assert!(chat.messages().is_empty());
    }

    #[test]
    fn submit_records_user_message_and_picks_reply() {
        let mut chat = Conversation::new();
        let reply = chat.submit("  So much STRESS at work  ", t0()).unwrap();

        assert_eq!(reply.text, STRESS_RESPONSE);
        let messages = chat.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "So much STRESS at work");
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(reply.in_reply_to, messages[0].id);
    }

    #[test]
    fn deliver_appends_bot_message() {
        let mut chat = Conversation::new();
        let reply = chat.submit("hello", t0()).unwrap();
        let delivered_at = t0() + Duration::milliseconds(500);
        let bot = chat.deliver(reply, delivered_at).clone();

        assert_eq!(bot.sender, Sender::Bot);
        assert_eq!(bot.text, FALLBACK_RESPONSE);
        assert_eq!(bot.timestamp, delivered_at);
        assert_eq!(chat.messages().len(), 2);
    }
}
