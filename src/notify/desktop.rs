// src/notify/desktop.rs

//! Desktop notification sink via `notify-send`.

use std::env;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::Result;
use crate::models::AnimalRecord;
use crate::notify::Notifier;

const PROGRAM: &str = "notify-send";

/// Sends one desktop notification per new record.
///
/// The `notify-send` binary is located on PATH at construction time; when it
/// is absent the sink is a silent no-op rather than an error.
#[derive(Debug)]
pub struct DesktopNotifier {
    program: Option<PathBuf>,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        let program = locate_notify_send();
        if program.is_none() {
            log::debug!("{} not found on PATH, desktop notifications disabled", PROGRAM);
        }
        Self { program }
    }

    /// Whether a notification facility was found at construction.
    pub fn is_available(&self) -> bool {
        self.program.is_some()
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

fn locate_notify_send() -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(PROGRAM))
        .find(|candidate| candidate.is_file())
}

#[async_trait]
impl Notifier for DesktopNotifier {
    fn name(&self) -> &'static str {
        "desktop"
    }

    async fn notify(&self, batch: &[AnimalRecord]) -> Result<()> {
        let Some(program) = &self.program else {
            return Ok(());
        };

        for animal in batch {
            let title = format!("{} Nieuw dier beschikbaar", animal.animal_type.emoji());
            let body = format!("{}\n{}", animal.name, animal.profile_url);

            let status = Command::new(program)
                .arg(&title)
                .arg(&body)
                .arg("--icon=dialog-information")
                .arg("--app-name=Dierenasiel Alert")
                .status()
                .await;

            // Console output still shows the alert, so a broken desktop
            // facility is only worth a warning.
            match status {
                Ok(status) if !status.success() => {
                    log::warn!("{} exited with {} for {}", PROGRAM, status, animal.name);
                }
                Err(e) => {
                    log::warn!("Failed to run {} for {}: {}", PROGRAM, animal.name, e);
                }
                Ok(_) => {}
            }
        }
        Ok(())
    }
}
