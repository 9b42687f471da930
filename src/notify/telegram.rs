// src/notify/telegram.rs

//! Telegram notification sink.
//!
//! Sends one Markdown message per new record through the Bot API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::AnimalRecord;
use crate::notify::Notifier;

const API_BASE: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Telegram bot sink.
pub struct TelegramNotifier {
    client: Client,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Result<Self> {
        let token = token.into();
        let chat_id = chat_id.into();
        if token.is_empty() || chat_id.is_empty() {
            return Err(AppError::config(
                "Telegram bot token and chat id must both be provided",
            ));
        }

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            token,
            chat_id,
        })
    }

    fn api_url(&self) -> String {
        format!("{}/bot{}/sendMessage", API_BASE, self.token)
    }

    fn format_message(animal: &AnimalRecord) -> String {
        let mut message = format!(
            "{} *Nieuw dier beschikbaar*\n\n*Naam:* {}\n*ID:* {}\n",
            animal.animal_type.emoji(),
            animal.name,
            animal.id
        );
        if let Some(site) = &animal.site {
            message.push_str(&format!("*Locatie:* {}\n", site));
        } else if let Some(location) = &animal.location {
            message.push_str(&format!("*Locatie:* {}\n", location));
        }
        message.push_str(&format!("*Status:* {}\n", animal.availability));
        message.push_str(&format!("\n{}", animal.profile_url));
        message
    }

    async fn send(&self, animal: &AnimalRecord) -> Result<()> {
        let payload = json!({
            "chat_id": self.chat_id,
            "text": Self::format_message(animal),
            "parse_mode": "Markdown",
            "disable_web_page_preview": false,
        });

        self.client
            .post(self.api_url())
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn notify(&self, batch: &[AnimalRecord]) -> Result<()> {
        let mut sent = 0usize;
        let mut failed = 0usize;

        for animal in batch {
            match self.send(animal).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    failed += 1;
                    // Strip the URL from the error so the bot token never
                    // lands in the logs.
                    let e = match e {
                        AppError::Http(e) => AppError::Http(e.without_url()),
                        other => other,
                    };
                    log::warn!(
                        "Failed to send Telegram notification for {}: {}",
                        animal.name,
                        e
                    );
                }
            }
        }

        if sent == 0 && failed > 0 {
            return Err(AppError::notify(
                "telegram",
                format!("all {} messages failed", failed),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnimalType, Availability};

    #[test]
    fn test_rejects_missing_credentials() {
        assert!(TelegramNotifier::new("", "12345").is_err());
        assert!(TelegramNotifier::new("token", "").is_err());
    }

    #[test]
    fn test_message_format() {
        let animal = AnimalRecord {
            id: 42,
            name: "Mia".into(),
            animal_type: AnimalType::Katten,
            site: Some("deKuipershoek".into()),
            location: None,
            availability: Availability::Available,
            photo_url: None,
            profile_url: "https://example.com/asieldier/katten/42-mia".into(),
        };

        let message = TelegramNotifier::format_message(&animal);
        assert!(message.starts_with("🐱 *Nieuw dier beschikbaar*"));
        assert!(message.contains("*Naam:* Mia"));
        assert!(message.contains("*ID:* 42"));
        assert!(message.contains("*Locatie:* deKuipershoek"));
        assert!(message.contains("*Status:* available"));
        assert!(message.ends_with("https://example.com/asieldier/katten/42-mia"));
    }
}
