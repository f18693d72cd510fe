//! `ostinato install`: install from the lockfile, resolving only when no
//! lockfile exists.

use crate::commands::{generate_autoload, installer_for};
use crate::workspace::Workspace;
use anyhow::Context;
use clap::Args;
use ostinato_manifest::{Lockfile, LockfileName};

#[derive(Debug, Clone, Args)]
pub struct InstallArgs {
    /// Skip dev dependencies.
    #[arg(long)]
    pub no_dev: bool,

    /// Skip autoloader generation.
    #[arg(long)]
    pub no_autoloader: bool,

    /// Write the canonical composer.lock name on a fresh resolve.
    #[arg(long)]
    pub canonical_lock: bool,
}

pub async fn run(workspace: &Workspace, args: &InstallArgs) -> anyhow::Result<()> {
    let manifest = workspace
        .load_manifest()
        .context("composer.json not found in working directory")?;

    let (installer, renderer) = installer_for(workspace);
    let include_dev = !args.no_dev;

    let lock = if let Some(lock_path) = workspace.existing_lock_path() {
        println!("Installing from {}", lock_path.display());
        let lock = Lockfile::load(&lock_path)?;
        installer.install_from_lock(&lock, include_dev).await?;
        lock
    } else {
        println!("No lockfile found, resolving dependencies");
        let mut lock = installer.install(&manifest, include_dev).await?;
        let name = if args.canonical_lock {
            LockfileName::Canonical
        } else {
            LockfileName::Alternate
        };
        let lock_path = workspace.lock_write_path(name);
        lock.save(&lock_path)?;
        println!("Lockfile written to {}", lock_path.display());
        lock
    };

    drop(installer);
    renderer.await.ok();

    generate_autoload(workspace, &lock, &manifest, args.no_autoloader)?;
    println!("Install complete");
    Ok(())
}
