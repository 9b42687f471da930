// src/notify/mod.rs

//! Notification sinks and fan-out dispatch.
//!
//! Sinks are polymorphic over a single capability: deliver a batch of new
//! records. Delivery is best-effort and non-transactional with respect to
//! the seen-set update; a failing sink never prevents the other sinks from
//! running and never escalates to a scan failure.

pub mod console;
pub mod desktop;
pub mod telegram;

use async_trait::async_trait;

pub use console::ConsoleNotifier;
pub use desktop::DesktopNotifier;
pub use telegram::TelegramNotifier;

use crate::error::Result;
use crate::models::AnimalRecord;

/// A notification sink.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short sink name used in log messages.
    fn name(&self) -> &'static str;

    /// Deliver a batch of newly-appeared records.
    async fn notify(&self, batch: &[AnimalRecord]) -> Result<()>;
}

/// Result of fanning one batch out to all configured sinks.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub delivered: usize,
    pub failed: usize,
}

/// Invoke each sink in turn with the full batch, isolating failures.
pub async fn dispatch(sinks: &[Box<dyn Notifier>], batch: &[AnimalRecord]) -> DispatchOutcome {
    let mut outcome = DispatchOutcome::default();

    for sink in sinks {
        match sink.notify(batch).await {
            Ok(()) => outcome.delivered += 1,
            Err(e) => {
                outcome.failed += 1;
                log::error!("Notification sink '{}' failed: {}", sink.name(), e);
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::AppError;
    use crate::models::{AnimalType, Availability};

    fn record(id: u64) -> AnimalRecord {
        AnimalRecord {
            id,
            name: format!("Dier {}", id),
            animal_type: AnimalType::Katten,
            site: None,
            location: None,
            availability: Availability::Available,
            photo_url: None,
            profile_url: format!("https://example.com/asieldier/katten/{}-dier", id),
        }
    }

    /// Records the ids of every batch it receives into a shared log.
    struct RecordingNotifier {
        batches: Arc<Mutex<Vec<Vec<u64>>>>,
    }

    impl RecordingNotifier {
        fn new() -> (Self, Arc<Mutex<Vec<Vec<u64>>>>) {
            let batches = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    batches: Arc::clone(&batches),
                },
                batches,
            )
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn notify(&self, batch: &[AnimalRecord]) -> Result<()> {
            self.batches
                .lock()
                .unwrap()
                .push(batch.iter().map(|r| r.id).collect());
            Ok(())
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn notify(&self, _batch: &[AnimalRecord]) -> Result<()> {
            Err(AppError::notify("failing", "boom"))
        }
    }

    #[tokio::test]
    async fn test_failing_sink_is_isolated() {
        let (first, first_batches) = RecordingNotifier::new();
        let (third, third_batches) = RecordingNotifier::new();

        let sinks: Vec<Box<dyn Notifier>> =
            vec![Box::new(first), Box::new(FailingNotifier), Box::new(third)];
        let batch: Vec<_> = [1, 2, 3].map(record).into();

        let outcome = dispatch(&sinks, &batch).await;
        assert_eq!(
            outcome,
            DispatchOutcome {
                delivered: 2,
                failed: 1
            }
        );

        // Both surviving sinks observed the full batch despite the failure
        // in between.
        for batches in [first_batches, third_batches] {
            assert_eq!(*batches.lock().unwrap(), vec![vec![1, 2, 3]]);
        }
    }

    #[tokio::test]
    async fn test_no_sinks_is_a_no_op() {
        let outcome = dispatch(&[], &[record(1)]).await;
        assert_eq!(outcome, DispatchOutcome::default());
    }
}
