//! `ostinato require`: add packages to the manifest and install them.

use crate::commands::{generate_autoload, installer_for};
use crate::workspace::Workspace;
use clap::Args;
use ostinato_manifest::{Manifest, LockfileName};

#[derive(Debug, Clone, Args)]
pub struct RequireArgs {
    /// Packages to add, as `vendor/name` or `vendor/name:constraint`.
    #[arg(required = true)]
    pub packages: Vec<String>,

    /// Add to require-dev instead of require.
    #[arg(long)]
    pub dev: bool,

    /// Skip autoloader generation.
    #[arg(long)]
    pub no_autoloader: bool,
}

/// Split a `vendor/name[:constraint]` argument; a missing constraint
/// means any version.
fn parse_requirement(arg: &str) -> (String, String) {
    match arg.split_once(':') {
        Some((name, constraint)) => (name.to_string(), constraint.to_string()),
        None => (arg.to_string(), "*".to_string()),
    }
}

pub async fn run(workspace: &Workspace, args: &RequireArgs) -> anyhow::Result<()> {
    let manifest_path = workspace.manifest_path();
    let mut manifest = if manifest_path.is_file() {
        workspace.load_manifest()?
    } else {
        println!("Creating new composer.json");
        Manifest::default()
    };

    for package in &args.packages {
        let (name, constraint) = parse_requirement(package);
        let section = if args.dev { "require-dev" } else { "require" };
        println!("Adding {name}:{constraint} to {section}");
        if args.dev {
            manifest.require_dev.insert(name, constraint);
        } else {
            manifest.require.insert(name, constraint);
        }
    }

    manifest.save(&manifest_path)?;
    println!("composer.json updated");

    let (installer, renderer) = installer_for(workspace);
    let mut lock = installer.install(&manifest, true).await?;
    drop(installer);
    renderer.await.ok();

    let lock_path = workspace.lock_write_path(LockfileName::Alternate);
    lock.save(&lock_path)?;
    println!("Lockfile written to {}", lock_path.display());

    generate_autoload(workspace, &lock, &manifest, args.no_autoloader)?;
    println!("Packages installed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirement_with_constraint() {
        assert_eq!(
            parse_requirement("monolog/monolog:^3.0"),
            ("monolog/monolog".to_string(), "^3.0".to_string())
        );
    }

    #[test]
    fn requirement_without_constraint_is_any() {
        assert_eq!(
            parse_requirement("monolog/monolog"),
            ("monolog/monolog".to_string(), "*".to_string())
        );
    }
}
