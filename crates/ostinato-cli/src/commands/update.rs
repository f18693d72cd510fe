//! `ostinato update`: re-resolve against the manifest and rewrite the
//! lockfile.

use crate::commands::{generate_autoload, installer_for};
use crate::workspace::Workspace;
use anyhow::Context;
use clap::Args;
use ostinato_manifest::LockfileName;

#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    /// Skip dev dependencies.
    #[arg(long)]
    pub no_dev: bool,

    /// Skip autoloader generation.
    #[arg(long)]
    pub no_autoloader: bool,

    /// Write the canonical composer.lock name when no lockfile exists.
    #[arg(long)]
    pub canonical_lock: bool,
}

pub async fn run(workspace: &Workspace, args: &UpdateArgs) -> anyhow::Result<()> {
    let manifest = workspace
        .load_manifest()
        .context("composer.json not found in working directory")?;

    let (installer, renderer) = installer_for(workspace);
    let mut lock = installer.install(&manifest, !args.no_dev).await?;
    drop(installer);
    renderer.await.ok();

    let name = if args.canonical_lock {
        LockfileName::Canonical
    } else {
        LockfileName::Alternate
    };
    let lock_path = workspace.lock_write_path(name);
    lock.save(&lock_path)?;
    println!("Lockfile updated at {}", lock_path.display());

    generate_autoload(workspace, &lock, &manifest, args.no_autoloader)?;
    println!("Update complete");
    Ok(())
}
