//! Command implementations.

pub mod init;
pub mod install;
pub mod require;
pub mod update;

use crate::output;
use crate::workspace::Workspace;
use ostinato_autoloader::Generator;
use ostinato_installer::Installer;
use ostinato_manifest::{Lockfile, Manifest};
use ostinato_registry::RegistryClient;

/// Build an installer for the workspace with progress rendering
/// attached.
pub(crate) fn installer_for(
    workspace: &Workspace,
) -> (Installer, tokio::task::JoinHandle<()>) {
    let (events, renderer) = output::spawn_renderer();
    let installer = Installer::new(RegistryClient::default(), workspace.vendor_dir())
        .with_events(events);
    (installer, renderer)
}

/// Generate the autoload glue unless the caller opted out.
pub(crate) fn generate_autoload(
    workspace: &Workspace,
    lock: &Lockfile,
    manifest: &Manifest,
    skip: bool,
) -> anyhow::Result<()> {
    if skip {
        return Ok(());
    }
    Generator::new(workspace.vendor_dir()).generate(lock, manifest)?;
    println!("Autoload files generated");
    Ok(())
}
