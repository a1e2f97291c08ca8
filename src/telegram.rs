//! Telegram notification delivery via teloxide.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ChatId;

use crate::errors::RsiWatchError;
use crate::logger::{self, LogTag};
use crate::monitor::Notifier;

#[derive(Debug)]
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    /// Create a notifier from a bot token and a chat id string. Both come
    /// from the environment and are validated here, before the loop starts.
    pub fn new(bot_token: &str, chat_id: &str) -> Result<Self, RsiWatchError> {
        if bot_token.is_empty() {
            return Err(RsiWatchError::configuration("Telegram bot token is empty"));
        }
        if chat_id.is_empty() {
            return Err(RsiWatchError::configuration("Telegram chat id is empty"));
        }

        let chat_id_parsed: i64 = chat_id.parse().map_err(|e| {
            RsiWatchError::configuration(format!("invalid chat id '{}': {}", chat_id, e))
        })?;

        Ok(Self {
            bot: Bot::new(bot_token),
            chat_id: ChatId(chat_id_parsed),
        })
    }

    /// Send a plain text message to the configured chat.
    pub async fn send_message(&self, message: &str) -> Result<(), RsiWatchError> {
        self.bot
            .send_message(self.chat_id, message)
            .await
            .map_err(|e| RsiWatchError::network("api.telegram.org", e.to_string()))?;

        logger::debug(
            LogTag::Telegram,
            &format!("sent Telegram notification (length={})", message.len()),
        );
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> Result<(), RsiWatchError> {
        self.send_message(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_credentials() {
        assert!(matches!(
            TelegramNotifier::new("", "123"),
            Err(RsiWatchError::Configuration { .. })
        ));
        assert!(matches!(
            TelegramNotifier::new("token", ""),
            Err(RsiWatchError::Configuration { .. })
        ));
    }

    #[test]
    fn rejects_non_numeric_chat_id() {
        let err = TelegramNotifier::new("token", "@channel").unwrap_err();
        assert!(err.to_string().contains("@channel"));
    }

    #[test]
    fn accepts_negative_group_chat_ids() {
        assert!(TelegramNotifier::new("token", "-1001234567890").is_ok());
    }
}
