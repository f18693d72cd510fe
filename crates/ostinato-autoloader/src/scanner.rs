//! Classmap scanning: walk directories and extract PHP class names.

use regex::Regex;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::trace;
use walkdir::WalkDir;

static NAMESPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"namespace\s+([A-Za-z0-9_\\]+)\s*;").expect("valid regex")
});

static DEFINITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:class|interface|trait)\s+([A-Za-z0-9_]+)").expect("valid regex")
});

/// Extract the fully-qualified name of the first class, interface, or
/// trait declared in a PHP source.
#[must_use]
pub fn extract_class_name(content: &str) -> Option<String> {
    let definition = DEFINITION_RE.captures(content)?.get(1)?.as_str().to_string();
    match NAMESPACE_RE.captures(content).and_then(|c| c.get(1)) {
        Some(namespace) => Some(format!("{}\\{definition}", namespace.as_str())),
        None => Some(definition),
    }
}

/// Recursively scan `dirs` for `.php` files and build a class name to
/// file path table. Later directories never overwrite earlier entries
/// for the same class, and the output is sorted by class name.
#[must_use]
pub fn build_classmap(dirs: &[PathBuf]) -> BTreeMap<String, PathBuf> {
    let mut classmap = BTreeMap::new();

    for dir in dirs {
        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().is_none_or(|ext| ext != "php")
            {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(path) else {
                continue;
            };
            if let Some(class) = extract_class_name(&content) {
                trace!(class = %class, file = %path.display(), "classmap entry");
                classmap.entry(class).or_insert_with(|| path.to_path_buf());
            }
        }
    }

    classmap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaced_class() {
        let src = "<?php\n\nnamespace Acme\\Log;\n\nclass Logger\n{\n}\n";
        assert_eq!(extract_class_name(src).as_deref(), Some("Acme\\Log\\Logger"));
    }

    #[test]
    fn global_class() {
        let src = "<?php\nclass Standalone {}\n";
        assert_eq!(extract_class_name(src).as_deref(), Some("Standalone"));
    }

    #[test]
    fn interface_and_trait() {
        assert_eq!(
            extract_class_name("<?php\nnamespace A;\ninterface Writer {}").as_deref(),
            Some("A\\Writer")
        );
        assert_eq!(
            extract_class_name("<?php\ntrait Loggable {}").as_deref(),
            Some("Loggable")
        );
    }

    #[test]
    fn plain_script_has_no_class() {
        assert_eq!(extract_class_name("<?php\necho 'hello';\n"), None);
    }

    #[test]
    fn builds_sorted_classmap() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir_all(src.join("Sub")).unwrap();
        std::fs::write(
            src.join("Zeta.php"),
            "<?php\nnamespace Acme;\nclass Zeta {}\n",
        )
        .unwrap();
        std::fs::write(
            src.join("Sub/Alpha.php"),
            "<?php\nnamespace Acme\\Sub;\nclass Alpha {}\n",
        )
        .unwrap();
        std::fs::write(src.join("notes.txt"), "not php").unwrap();

        let classmap = build_classmap(&[src.clone()]);
        let classes: Vec<&String> = classmap.keys().collect();
        assert_eq!(classes, vec!["Acme\\Sub\\Alpha", "Acme\\Zeta"]);
        assert_eq!(classmap["Acme\\Zeta"], src.join("Zeta.php"));
    }

    #[test]
    fn first_definition_wins_on_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::create_dir_all(&a).unwrap();
        std::fs::create_dir_all(&b).unwrap();
        std::fs::write(a.join("Dup.php"), "<?php\nclass Dup {}\n").unwrap();
        std::fs::write(b.join("Dup.php"), "<?php\nclass Dup {}\n").unwrap();

        let classmap = build_classmap(&[a.clone(), b]);
        assert_eq!(classmap["Dup"], a.join("Dup.php"));
    }
}
