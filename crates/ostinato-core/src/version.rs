//! Composer-compatible version parsing.
//!
//! Registry version strings are close to semver but not exactly: they may
//! carry a leading `v`, omit minor/patch components, or name a dev branch
//! (`dev-master`). This module normalizes such strings into [`semver::Version`]
//! values so comparison follows standard semver precedence.

use crate::error::VersionError;
use semver::Version;

/// Parse a registry version string into a [`Version`].
///
/// A leading `v`/`V` is stripped and missing minor/patch components are
/// padded with zeroes (`1.2` becomes `1.2.0`). Strings beginning with
/// `dev-` are rejected with [`VersionError::DevVersion`], which callers
/// treat as "skip this candidate" rather than a failure.
///
/// # Examples
///
/// ```
/// use ostinato_core::parse_version;
///
/// let v = parse_version("v1.2.3").unwrap();
/// assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
///
/// assert!(parse_version("dev-main").is_err());
/// ```
///
/// # Errors
///
/// Returns [`VersionError::DevVersion`] for `dev-*` input and
/// [`VersionError::Parse`] for anything semver cannot digest.
pub fn parse_version(input: &str) -> Result<Version, VersionError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(VersionError::parse(input, "empty version string"));
    }
    if trimmed.starts_with("dev-") {
        return Err(VersionError::DevVersion(trimmed.to_string()));
    }

    let bare = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    let padded = pad_release(bare);
    Version::parse(&padded).map_err(|e| VersionError::parse(input, e.to_string()))
}

/// Pad a partial release like `1` or `1.2` out to a full `x.y.z` triple,
/// leaving any pre-release or build suffix untouched.
fn pad_release(input: &str) -> String {
    let split_at = input.find(['-', '+']).unwrap_or(input.len());
    let (core, suffix) = input.split_at(split_at);

    if core.is_empty() || !core.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return input.to_string();
    }

    match core.matches('.').count() {
        0 => format!("{core}.0.0{suffix}"),
        1 => format!("{core}.0{suffix}"),
        _ => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_triple() {
        let v = parse_version("1.2.3").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
    }

    #[test]
    fn leading_v_stripped() {
        assert_eq!(parse_version("v1.2.3").unwrap(), parse_version("1.2.3").unwrap());
        assert_eq!(parse_version("V2.0.0").unwrap(), parse_version("2.0.0").unwrap());
    }

    #[test]
    fn partial_versions_padded() {
        assert_eq!(parse_version("1").unwrap(), Version::new(1, 0, 0));
        assert_eq!(parse_version("1.2").unwrap(), Version::new(1, 2, 0));
    }

    #[test]
    fn prerelease_suffix_survives_padding() {
        let v = parse_version("1.0-beta").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 0, 0));
        assert_eq!(v.pre.as_str(), "beta");
    }

    #[test]
    fn build_metadata() {
        let v = parse_version("1.0.0+build.7").unwrap();
        assert_eq!(v.build.as_str(), "build.7");
    }

    #[test]
    fn dev_versions_rejected() {
        let err = parse_version("dev-main").unwrap_err();
        assert!(err.is_dev_version());
        assert!(parse_version("dev-feature/foo").unwrap_err().is_dev_version());
    }

    #[test]
    fn garbage_rejected() {
        assert!(!parse_version("not-a-version").unwrap_err().is_dev_version());
        assert!(parse_version("").is_err());
    }

    #[test]
    fn ordering_is_semver_precedence() {
        let stable = parse_version("1.0.0").unwrap();
        let rc = parse_version("1.0.0-rc.1").unwrap();
        let next = parse_version("1.0.1").unwrap();
        assert!(rc < stable);
        assert!(stable < next);
    }
}
