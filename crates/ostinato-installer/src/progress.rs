//! Per-package install progress events.

use tokio::sync::mpsc::UnboundedSender;

/// Phase of a single package's install lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallPhase {
    /// Waiting for a worker slot.
    Queued,
    /// Fetching the dist archive.
    Downloading,
    /// Verifying the archive digest.
    Verifying,
    /// Extracting into the vendor tree.
    Extracting,
    /// Lock record produced; terminal.
    Recorded,
    /// Terminal failure, carrying the causal error kind.
    Failed {
        /// Error kind label (see `InstallError::kind`).
        kind: &'static str,
    },
}

/// A progress event emitted by the installer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallEvent {
    /// Package name.
    pub name: String,
    /// New phase.
    pub phase: InstallPhase,
}

/// Channel end the installer publishes events on.
pub type ProgressSender = UnboundedSender<InstallEvent>;

/// Emit an event, ignoring a disconnected receiver.
pub(crate) fn emit(sender: Option<&ProgressSender>, name: &str, phase: InstallPhase) {
    if let Some(sender) = sender {
        let _ = sender.send(InstallEvent {
            name: name.to_string(),
            phase,
        });
    }
}
