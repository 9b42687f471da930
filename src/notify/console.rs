// src/notify/console.rs

//! Console notification sink.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::AnimalRecord;
use crate::notify::Notifier;

/// Prints one alert line per new record. Cannot fail.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn notify(&self, batch: &[AnimalRecord]) -> Result<()> {
        for animal in batch {
            println!("[NEW] {} — {}", animal.name, animal.profile_url);
        }
        Ok(())
    }
}
