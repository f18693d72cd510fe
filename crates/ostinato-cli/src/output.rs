//! Progress rendering for installer events.

use indicatif::{ProgressBar, ProgressStyle};
use ostinato_installer::{InstallEvent, InstallPhase, ProgressSender};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Spawn a renderer task consuming installer progress events.
///
/// Returns the sender to hand to the installer and a handle to await
/// once the install finishes, so the final bar state is flushed.
pub fn spawn_renderer() -> (ProgressSender, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<InstallEvent>();

    let handle = tokio::spawn(async move {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg} ({pos} done)")
                .expect("valid template"),
        );
        bar.enable_steady_tick(Duration::from_millis(80));

        while let Some(event) = rx.recv().await {
            match event.phase {
                InstallPhase::Queued => {}
                InstallPhase::Downloading => {
                    bar.set_message(format!("downloading {}", event.name));
                }
                InstallPhase::Verifying => {
                    bar.set_message(format!("verifying {}", event.name));
                }
                InstallPhase::Extracting => {
                    bar.set_message(format!("extracting {}", event.name));
                }
                InstallPhase::Recorded => {
                    bar.inc(1);
                    bar.println(format!("  + {}", event.name));
                }
                InstallPhase::Failed { kind } => {
                    bar.println(format!("  ! {} failed ({kind})", event.name));
                }
            }
        }

        bar.finish_and_clear();
    });

    (tx, handle)
}
