//! Version selection against a constraint ledger.

use crate::config::ResolverConfig;
use crate::types::ResolveError;
use ostinato_core::{Constraint, parse_version};
use ostinato_manifest::VersionMetadata;
use semver::Version;
use tracing::{debug, warn};

/// Select the best version of `name` from registry `versions` against the
/// full constraint `ledger`.
///
/// Candidates are the parseable non-dev versions, sorted descending.
/// When `grouped` is set (a disjunctive constraint was expanded for this
/// name), the grouped-by-major heuristic runs first. Otherwise the first
/// candidate satisfying every parsed ledger constraint wins; when none
/// does, a best-effort fallback scores candidates by how many constraints
/// they satisfy and admits the winner only under the policy encoded in
/// [`fallback_admissible`].
pub(crate) fn select_version(
    name: &str,
    versions: &[VersionMetadata],
    ledger: &[String],
    grouped: bool,
    config: &ResolverConfig,
) -> Result<(Version, VersionMetadata), ResolveError> {
    let mut candidates: Vec<(Version, &VersionMetadata)> = versions
        .iter()
        .filter_map(|m| parse_version(&m.version).ok().map(|v| (v, m)))
        .collect();

    if candidates.is_empty() {
        return Err(ResolveError::NoVersions {
            name: name.to_string(),
        });
    }

    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    let constraints: Vec<Constraint> = ledger
        .iter()
        .filter_map(|raw| match Constraint::parse(raw) {
            Ok(c) => Some(c),
            Err(e) => {
                warn!(package = %name, constraint = %raw, error = %e,
                    "skipping malformed constraint");
                None
            }
        })
        .collect();

    if grouped
        && let Some((version, metadata)) = select_grouped_by_major(&candidates, &constraints)
    {
        debug!(package = %name, version = %version, "selected via major grouping");
        return Ok((version, metadata.clone()));
    }

    if let Some((version, metadata)) = candidates
        .iter()
        .find(|(v, _)| constraints.iter().all(|c| c.matches(v)))
    {
        return Ok((version.clone(), (*metadata).clone()));
    }

    // Best-effort fallback: score by satisfied-constraint count. The
    // candidates are already sorted descending, so the first hit at the
    // maximum score is also the highest-versioned one.
    let scores: Vec<usize> = candidates
        .iter()
        .map(|(v, _)| constraints.iter().filter(|c| c.matches(v)).count())
        .collect();
    let best_score = scores.iter().copied().max().unwrap_or(0);
    let (version, metadata) = candidates
        .iter()
        .zip(&scores)
        .find(|(_, score)| **score == best_score)
        .map(|((v, m), _)| (v.clone(), (*m).clone()))
        .expect("candidates are non-empty");

    let total = constraints.len();
    if fallback_admissible(name, best_score, total, config) {
        warn!(
            package = %name,
            version = %version,
            satisfied = best_score,
            total,
            "accepting under-satisfied version"
        );
        return Ok((version, metadata));
    }

    Err(ResolveError::Infeasible {
        name: name.to_string(),
        constraints: ledger.to_vec(),
    })
}

/// The fallback admission policy.
///
/// `illuminate/*` components are always co-versioned through the
/// framework's `replace` set, so a partial score there is noise. For
/// everything else a strict-list entry refuses relaxation outright, two
/// constraints tolerate one miss, and three or more require at least 60%
/// satisfaction (never fewer than two).
fn fallback_admissible(name: &str, score: usize, total: usize, config: &ResolverConfig) -> bool {
    if score == total {
        return true;
    }
    if name.starts_with("illuminate/") {
        return true;
    }
    if config.is_strict(name) {
        return false;
    }
    match total {
        2 => score >= 1,
        t if t >= 3 => score >= (3 * t).div_ceil(5).max(2),
        _ => false,
    }
}

/// Grouped-by-major selection, applied after a `||` constraint has been
/// expanded into per-disjunct ledger entries.
///
/// Candidates are grouped by major version and the groups walked in
/// ascending order, because older majors typically satisfy the widest
/// fan-in of reverse dependencies. Within a group only the constraints
/// that intersect the group matter (an expanded disjunct pinning another
/// major must not veto this one); the newest candidate satisfying all of
/// them wins. Groups no constraint cares about are skipped.
fn select_grouped_by_major<'a>(
    candidates: &[(Version, &'a VersionMetadata)],
    constraints: &[Constraint],
) -> Option<(Version, &'a VersionMetadata)> {
    if constraints.is_empty() {
        return None;
    }

    let mut majors: Vec<u64> = candidates.iter().map(|(v, _)| v.major).collect();
    majors.sort_unstable();
    majors.dedup();

    for major in majors {
        let group: Vec<&(Version, &VersionMetadata)> = candidates
            .iter()
            .filter(|(v, _)| v.major == major)
            .collect();

        let relevant: Vec<&Constraint> = constraints
            .iter()
            .filter(|c| group.iter().any(|(v, _)| c.matches(v)))
            .collect();
        if relevant.is_empty() {
            continue;
        }

        // Candidates arrive sorted descending, so the first match in the
        // group is the newest one.
        if let Some((version, metadata)) = group
            .iter()
            .find(|(v, _)| relevant.iter().all(|c| c.matches(v)))
        {
            return Some((version.clone(), *metadata));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(version: &str) -> VersionMetadata {
        VersionMetadata {
            name: "test/pkg".into(),
            version: version.into(),
            ..VersionMetadata::default()
        }
    }

    fn metas(versions: &[&str]) -> Vec<VersionMetadata> {
        versions.iter().map(|v| meta(v)).collect()
    }

    fn ledger(entries: &[&str]) -> Vec<String> {
        entries.iter().map(ToString::to_string).collect()
    }

    fn select(
        name: &str,
        versions: &[&str],
        entries: &[&str],
        grouped: bool,
    ) -> Result<Version, ResolveError> {
        let versions = metas(versions);
        select_version(
            name,
            &versions,
            &ledger(entries),
            grouped,
            &ResolverConfig::default(),
        )
        .map(|(v, _)| v)
    }

    #[test]
    fn newest_satisfying_wins() {
        let v = select("acme/log", &["0.9.0", "1.0.0", "1.2.3", "2.0.0"], &["^1.0"], false)
            .unwrap();
        assert_eq!(v.to_string(), "1.2.3");
    }

    #[test]
    fn dev_and_invalid_versions_dropped() {
        let v = select("acme/log", &["dev-main", "garbage", "1.0.0"], &["*"], false).unwrap();
        assert_eq!(v.to_string(), "1.0.0");
    }

    #[test]
    fn only_dev_versions_is_no_versions() {
        let err = select("acme/log", &["dev-main", "dev-develop"], &["*"], false).unwrap_err();
        assert!(matches!(err, ResolveError::NoVersions { .. }));
    }

    #[test]
    fn leading_v_does_not_alter_comparison() {
        let versions = metas(&["v1.0.0", "v1.5.0", "1.4.0"]);
        let (v, m) = select_version(
            "acme/log",
            &versions,
            &ledger(&["^1.0"]),
            false,
            &ResolverConfig::default(),
        )
        .unwrap();
        assert_eq!(v, Version::new(1, 5, 0));
        assert_eq!(m.version, "v1.5.0");
    }

    #[test]
    fn malformed_ledger_entry_skipped() {
        let v = select(
            "acme/log",
            &["1.0.0", "2.0.0"],
            &["^1.0", "what even is this"],
            false,
        )
        .unwrap();
        assert_eq!(v, Version::new(1, 0, 0));
    }

    #[test]
    fn fallback_three_constraints_full_satisfaction_available() {
        // Exactly one candidate satisfies 3/3: take it.
        let v = select(
            "acme/wide",
            &["1.2.0", "1.3.0", "1.4.0", "1.5.0"],
            &["^1.2", "^1.3", "^1.5"],
            false,
        )
        .unwrap();
        assert_eq!(v, Version::new(1, 5, 0));
    }

    #[test]
    fn fallback_accepts_best_partial_above_threshold() {
        // Best is 1.4.0 at 2/3; threshold ceil(0.6 * 3) = 2.
        let v = select(
            "acme/wide",
            &["1.2.0", "1.3.0", "1.4.0"],
            &["^1.2", "^1.3", "^1.5"],
            false,
        )
        .unwrap();
        assert_eq!(v, Version::new(1, 4, 0));
    }

    #[test]
    fn fallback_two_constraints_tolerates_one_miss() {
        let v = select("acme/either", &["1.0.0", "2.0.0"], &["^1.0", "^2.0"], false).unwrap();
        assert_eq!(v, Version::new(2, 0, 0));
    }

    #[test]
    fn strict_package_refuses_fallback() {
        // Two independent constraints, no disjunction expanded: the
        // strict list denies relaxation outright.
        let err =
            select("nesbot/carbon", &["2.72.1", "3.8.4"], &["^2.0", "^3.0"], false).unwrap_err();
        assert!(matches!(err, ResolveError::Infeasible { .. }));
    }

    #[test]
    fn illuminate_components_always_admitted() {
        let v = select(
            "illuminate/support",
            &["9.0.0", "10.0.0"],
            &["^9.0", "^10.0", "^11.0"],
            false,
        )
        .unwrap();
        assert_eq!(v, Version::new(10, 0, 0));
    }

    #[test]
    fn grouped_selection_prefers_older_major() {
        // Expanded disjuncts plus a transitive pin on the 2.x line.
        let v = select(
            "nesbot/carbon",
            &["2.66.0", "2.72.1", "3.0.0", "3.8.4"],
            &["^2.67", "^3.0", "^2.66"],
            true,
        )
        .unwrap();
        assert_eq!(v, Version::new(2, 72, 1));
    }

    #[test]
    fn grouped_selection_skips_uninhabited_majors() {
        // Nothing pins 2.x, so the 3.x group must win even though the
        // walk prefers older majors.
        let v = select("nesbot/carbon", &["2.72.1", "3.0.0", "3.8.4"], &["^3.0"], true).unwrap();
        assert_eq!(v, Version::new(3, 8, 4));
    }

    #[test]
    fn grouped_selection_falls_back_when_no_group_hits() {
        // Both constraints pin the 1.x line but disagree, so the group
        // yields no hit and selection falls through to the fallback
        // policy (2 constraints, one miss tolerated).
        let v = select(
            "acme/split",
            &["1.5.0", "1.9.0", "2.4.0"],
            &["~1.5.0", "~1.9.0"],
            true,
        )
        .unwrap();
        assert_eq!(v, Version::new(1, 9, 0));
    }

    #[test]
    fn threshold_math() {
        let config = ResolverConfig::default();
        // ceil(0.6 * 5) = 3
        assert!(fallback_admissible("a/b", 3, 5, &config));
        assert!(!fallback_admissible("a/b", 2, 5, &config));
        // floor never drops below 2
        assert!(!fallback_admissible("a/b", 1, 3, &config));
        assert!(fallback_admissible("a/b", 2, 3, &config));
        // single unsatisfied constraint is never admissible
        assert!(!fallback_admissible("a/b", 0, 1, &config));
    }
}
