//! `ostinato init`: create a basic composer.json.

use crate::workspace::Workspace;
use anyhow::bail;
use clap::Args;
use ostinato_manifest::{Author, Manifest};

#[derive(Debug, Clone, Args)]
pub struct InitArgs {
    /// Package name (`vendor/name`).
    #[arg(long)]
    pub name: Option<String>,

    /// Package description.
    #[arg(long)]
    pub description: Option<String>,

    /// Author name.
    #[arg(long)]
    pub author_name: Option<String>,

    /// Author email.
    #[arg(long)]
    pub author_email: Option<String>,
}

pub fn run(workspace: &Workspace, args: &InitArgs) -> anyhow::Result<()> {
    let manifest_path = workspace.manifest_path();
    if manifest_path.is_file() {
        bail!("composer.json already exists");
    }

    let mut manifest = Manifest {
        name: args.name.clone(),
        description: args.description.clone(),
        package_type: Some("project".to_string()),
        ..Manifest::default()
    };
    manifest
        .require
        .insert("php".to_string(), ">=7.4".to_string());
    if let Some(author_name) = &args.author_name {
        manifest.authors.push(Author {
            name: author_name.clone(),
            email: args.author_email.clone(),
            ..Author::default()
        });
    }

    manifest.save(&manifest_path)?;
    println!("composer.json created at {}", manifest_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_manifest_with_php_requirement() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path());
        let args = InitArgs {
            name: Some("acme/app".into()),
            description: None,
            author_name: Some("A. Dev".into()),
            author_email: Some("dev@acme.test".into()),
        };

        run(&workspace, &args).unwrap();

        let manifest = workspace.load_manifest().unwrap();
        assert_eq!(manifest.name.as_deref(), Some("acme/app"));
        assert_eq!(manifest.require["php"], ">=7.4");
        assert_eq!(manifest.authors[0].name, "A. Dev");
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("composer.json"), "{}").unwrap();
        let workspace = Workspace::new(dir.path());
        let args = InitArgs {
            name: None,
            description: None,
            author_name: None,
            author_email: None,
        };
        assert!(run(&workspace, &args).is_err());
    }
}
