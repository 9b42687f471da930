// src/pipeline/monitor.rs

//! Monitor orchestration.
//!
//! One cycle = scan → delta → dispatch → persist. Two modes: run-once
//! (cycle failure is fatal to the process) and interval (cycle failure is
//! logged and the loop waits for the next tick; one bad cycle must not kill
//! a long-running monitor).

use std::time::Duration;

use crate::error::Result;
use crate::models::SearchQuery;
use crate::notify::{Notifier, dispatch};
use crate::pipeline::SeenSet;
use crate::services::{PageFetcher, Pager};
use crate::storage::SeenStore;

/// Orchestrates scan cycles for one query.
pub struct Monitor<F> {
    pager: Pager<F>,
    query: SearchQuery,
    store: SeenStore,
    sinks: Vec<Box<dyn Notifier>>,
}

impl<F: PageFetcher> Monitor<F> {
    pub fn new(
        pager: Pager<F>,
        query: SearchQuery,
        store: SeenStore,
        sinks: Vec<Box<dyn Notifier>>,
    ) -> Self {
        Self {
            pager,
            query,
            store,
            sinks,
        }
    }

    /// Run a single cycle. Returns the number of new records found.
    pub async fn run_once(&self) -> Result<usize> {
        let mut seen = self.store.load().await;
        self.cycle(&mut seen).await
    }

    /// Run cycles at the given interval until the process is terminated.
    ///
    /// The seen-set is loaded once and lives in memory across ticks; it is
    /// re-persisted after every successful cycle.
    pub async fn run_interval(&self, interval: Duration) -> Result<()> {
        log::info!(
            "Monitoring {} every {}s...",
            self.query.describe(),
            interval.as_secs()
        );

        let mut seen = self.store.load().await;
        loop {
            if let Err(e) = self.cycle(&mut seen).await {
                log::error!("Scan failed: {}. Retrying at next tick.", e);
            }
            tokio::time::sleep(interval).await;
        }
    }

    async fn cycle(&self, seen: &mut SeenSet) -> Result<usize> {
        let records = self.pager.fetch_all(&self.query).await?;

        let key = self.query.store_key();
        let new_records = seen.delta(&key, &records);

        if new_records.is_empty() {
            log::info!("No new {} found.", self.query.animal_type.english());
        } else {
            log::info!(
                "{} new {} found",
                new_records.len(),
                self.query.animal_type.english()
            );
            let outcome = dispatch(&self.sinks, &new_records).await;
            if outcome.failed > 0 {
                log::warn!(
                    "{} of {} notification sinks failed",
                    outcome.failed,
                    outcome.failed + outcome.delivered
                );
            }
        }

        // Persist regardless of notification outcome: re-delivering every
        // cycle for an already-seen animal is worse than an occasional
        // missed notification.
        if let Err(e) = self.store.save(seen).await {
            log::warn!(
                "Failed to persist seen store {}: {}. New animals may be re-notified next cycle.",
                self.store.path().display(),
                e
            );
        }

        Ok(new_records.len())
    }
}
