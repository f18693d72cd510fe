//! Composer-compatible version constraint parsing and evaluation.
//!
//! Constraints supported:
//! - Exact: `1.0.0` (bare versions match exactly)
//! - Comparators: `=`, `>`, `>=`, `<`, `<=`
//! - Caret: `^1.2.3` (>=1.2.3 <2.0.0, standard semver zero-major rules)
//! - Tilde: `~1.2.3` (>=1.2.3 <1.3.0)
//! - Wildcards: `*`, `1.*`, `1.2.x`
//! - Hyphen ranges: `1.0.0 - 2.0.0`
//! - AND via whitespace: `>=1.0 <2.0`
//! - OR via `|` or `||`: `^1.0 || ^2.0`
//!
//! Composer spells disjunction as `|`, `|`-with-spaces, or `||`; parsing
//! canonicalizes every spelling to ` || ` before compiling each disjunct
//! onto a [`semver::VersionReq`]. Evaluation short-circuits across
//! disjuncts.

use crate::error::ConstraintError;
use semver::{Version, VersionReq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A parsed version constraint.
///
/// Keeps the original string (for lockfile echo and diagnostics), the
/// canonical normalized form, and one compiled [`VersionReq`] per `||`
/// disjunct.
#[derive(Debug, Clone)]
pub struct Constraint {
    raw: String,
    normalized: String,
    disjuncts: Vec<Disjunct>,
}

#[derive(Debug, Clone)]
struct Disjunct {
    text: String,
    req: VersionReq,
}

impl Constraint {
    /// Parse a Composer constraint string.
    ///
    /// # Examples
    ///
    /// ```
    /// use ostinato_core::{Constraint, parse_version};
    ///
    /// let c = Constraint::parse("^1.2 || ^2.0").unwrap();
    /// assert!(c.matches(&parse_version("1.9.0").unwrap()));
    /// assert!(c.matches(&parse_version("2.3.1").unwrap()));
    /// assert!(!c.matches(&parse_version("3.0.0").unwrap()));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError`] when a disjunct cannot be compiled.
    pub fn parse(input: &str) -> Result<Self, ConstraintError> {
        let normalized = normalize(input);

        let mut disjuncts = Vec::new();
        for part in normalized.split(" || ") {
            let req = compile_disjunct(part)
                .map_err(|message| ConstraintError::new(input, message))?;
            disjuncts.push(Disjunct {
                text: part.to_string(),
                req,
            });
        }

        Ok(Self {
            raw: input.to_string(),
            normalized,
            disjuncts,
        })
    }

    /// A constraint matching every version (`>=0.0.0`).
    #[must_use]
    pub fn any() -> Self {
        Self::parse("*").expect("wildcard constraint is always valid")
    }

    /// Check whether a version satisfies this constraint.
    ///
    /// Disjuncts are evaluated left to right, short-circuiting on the
    /// first match.
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        self.disjuncts.iter().any(|d| d.req.matches(version))
    }

    /// The original constraint string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The canonical normalized form (` || ` separators, collapsed
    /// whitespace).
    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Whether this constraint contains a `||` disjunction.
    #[must_use]
    pub fn is_disjunctive(&self) -> bool {
        self.disjuncts.len() > 1
    }

    /// The normalized text of each disjunct, in order.
    ///
    /// Used by the resolver to expand disjunctive constraints into
    /// separate ledger entries for flagged packages.
    pub fn disjunct_strings(&self) -> impl Iterator<Item = &str> {
        self.disjuncts.iter().map(|d| d.text.as_str())
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for Constraint {}

impl FromStr for Constraint {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Constraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Constraint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Canonicalize a raw constraint string.
///
/// Normalization steps, in order:
/// 1. `*` and the empty string become `>=0.0.0`.
/// 2. Surrounding whitespace is trimmed.
/// 3. The disjunction spellings ` || `, ` | `, and bare `|` collapse to
///    the canonical ` || ` separator. A bare `|` never folds an existing
///    `||` into `|||`.
/// 4. Runs of whitespace collapse to a single space.
fn normalize(input: &str) -> String {
    let s = input.trim();
    if s.is_empty() || s == "*" {
        return ">=0.0.0".to_string();
    }

    let s = s.replace(" || ", "||").replace(" | ", "||");

    let mut joined = String::with_capacity(s.len() + 8);
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '|' {
            joined.push_str("||");
            if chars.peek() == Some(&'|') {
                chars.next();
            }
        } else {
            joined.push(c);
        }
    }

    let spaced = joined.replace("||", " || ");

    let mut out = String::with_capacity(spaced.len());
    let mut in_space = false;
    for c in spaced.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out.trim().to_string()
}

/// Compile a single (disjunction-free) constraint onto a [`VersionReq`].
fn compile_disjunct(input: &str) -> Result<VersionReq, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty constraint part".to_string());
    }

    // Hyphen range: "1.0.0 - 2.0.0"
    if let Some((lower, upper)) = input.split_once(" - ") {
        let lower = strip_v(lower.trim());
        let upper_bound = hyphen_upper_bound(upper.trim())?;
        let req = format!(">={lower}, {upper_bound}");
        return VersionReq::parse(&req).map_err(|e| e.to_string());
    }

    // Comparators AND together, separated by whitespace (or commas, an
    // alternate Composer spelling). An operator split from its operand
    // ("> 1.0") is re-merged first.
    let cleaned = input.replace(',', " ");
    let mut tokens: Vec<String> = Vec::new();
    let mut parts = cleaned.split(' ').filter(|p| !p.is_empty()).peekable();
    while let Some(part) = parts.next() {
        if matches!(part, ">" | "<" | ">=" | "<=" | "=" | "^" | "~")
            && let Some(next) = parts.peek()
        {
            tokens.push(format!("{part}{next}"));
            parts.next();
            continue;
        }
        tokens.push(part.to_string());
    }

    let comparators: Vec<String> = tokens
        .iter()
        .map(|t| comparator_token(t))
        .collect::<Result<_, _>>()?;

    VersionReq::parse(&comparators.join(", ")).map_err(|e| e.to_string())
}

/// Map one Composer comparator token onto semver req syntax.
///
/// Bare versions mean an exact match in Composer, so they gain a leading
/// `=`; caret, tilde, comparators, and wildcard forms pass through with
/// any `v` prefix stripped from the operand.
fn comparator_token(token: &str) -> Result<String, String> {
    if token == "*" {
        return Ok("*".to_string());
    }
    if token.ends_with(".*") || token.ends_with(".x") || token.ends_with(".X") {
        return Ok(token.to_string());
    }

    for op in ["^", "~", ">=", "<=", ">", "<", "==", "="] {
        if let Some(rest) = token.strip_prefix(op) {
            let op = if op == "==" { "=" } else { op };
            return Ok(format!("{op}{}", strip_v(rest.trim())));
        }
    }

    // Bare version: exact match.
    Ok(format!("={}", strip_v(token)))
}

fn strip_v(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}

/// Upper bound of a hyphen range.
///
/// A full `x.y.z` upper bound is inclusive; a partial one widens to the
/// next release at its precision (`2.0` allows any `2.0.x`, `2` allows any
/// `2.x`), matching Composer's hyphen-range semantics.
fn hyphen_upper_bound(upper: &str) -> Result<String, String> {
    let upper = strip_v(upper);
    let numeric = upper.chars().all(|c| c.is_ascii_digit() || c == '.');
    if !numeric {
        return Ok(format!("<={upper}"));
    }

    let parts: Vec<&str> = upper.split('.').collect();
    let parse = |s: &str| {
        s.parse::<u64>()
            .map_err(|_| format!("invalid hyphen range bound: {upper}"))
    };
    match parts.as_slice() {
        [major] => Ok(format!("<{}.0.0", parse(major)? + 1)),
        [major, minor] => Ok(format!("<{}.{}.0", major, parse(minor)? + 1)),
        _ => Ok(format!("<={upper}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::parse_version;
    use proptest::prelude::*;
    use test_case::test_case;

    fn v(s: &str) -> Version {
        parse_version(s).unwrap()
    }

    mod normalization {
        use super::*;

        #[test]
        fn wildcard_and_empty() {
            assert_eq!(normalize("*"), ">=0.0.0");
            assert_eq!(normalize(""), ">=0.0.0");
            assert_eq!(normalize("   "), ">=0.0.0");
        }

        #[test]
        fn disjunction_spellings_collapse() {
            assert_eq!(normalize("^1.0 || ^2.0"), "^1.0 || ^2.0");
            assert_eq!(normalize("^1.0 | ^2.0"), "^1.0 || ^2.0");
            assert_eq!(normalize("^1.0|^2.0"), "^1.0 || ^2.0");
        }

        #[test]
        fn double_pipe_does_not_fold_to_triple() {
            assert_eq!(normalize("^1.0||^2.0"), "^1.0 || ^2.0");
            assert!(!normalize("^1.0||^2.0").contains("|||"));
        }

        #[test]
        fn whitespace_runs_collapse() {
            assert_eq!(normalize(">=1.0   <2.0"), ">=1.0 <2.0");
            assert_eq!(normalize("  ^1.2  "), "^1.2");
        }
    }

    #[test_case("^1.0.0", "1.0.0", true ; "caret matches minimum")]
    #[test_case("^1.0.0", "1.99.4", true ; "caret matches higher minor")]
    #[test_case("^1.0.0", "2.0.0", false ; "caret rejects next major")]
    #[test_case("^0.1.2", "0.1.9", true ; "caret zero major matches patch")]
    #[test_case("^0.1.2", "0.2.0", false ; "caret zero major excludes next minor")]
    #[test_case("~1.2.3", "1.2.9", true ; "tilde matches higher patch")]
    #[test_case("~1.2.3", "1.3.0", false ; "tilde rejects next minor")]
    #[test_case(">=1.0.0", "1.0.0", true ; "gte matches exact")]
    #[test_case(">=1.0.0", "0.9.9", false ; "gte rejects lower")]
    #[test_case("<2.0.0", "1.9.9", true ; "lt matches lower")]
    #[test_case("<2.0.0", "2.0.0", false ; "lt rejects boundary")]
    #[test_case("<=2.0.0", "2.0.0", true ; "lte includes boundary")]
    #[test_case("1.2.3", "1.2.3", true ; "bare version matches exactly")]
    #[test_case("1.2.3", "1.2.4", false ; "bare version rejects other patch")]
    #[test_case("*", "99.0.0", true ; "wildcard matches everything")]
    #[test_case("1.2.*", "1.2.7", true ; "patch wildcard matches")]
    #[test_case("1.2.*", "1.3.0", false ; "patch wildcard rejects next minor")]
    #[test_case("1.x", "1.9.0", true ; "x wildcard matches")]
    #[test_case("1.x", "2.0.0", false ; "x wildcard rejects next major")]
    fn matching(constraint: &str, version: &str, expected: bool) {
        let c = Constraint::parse(constraint).unwrap();
        assert_eq!(
            c.matches(&v(version)),
            expected,
            "constraint {constraint} vs {version}"
        );
    }

    #[test]
    fn empty_string_matches_everything() {
        let c = Constraint::parse("").unwrap();
        assert!(c.matches(&v("0.0.1")));
        assert!(c.matches(&v("42.7.3")));
        assert_eq!(c.normalized(), ">=0.0.0");
    }

    #[test]
    fn whitespace_and() {
        let c = Constraint::parse(">=1.0 <2.0").unwrap();
        assert!(c.matches(&v("1.5.0")));
        assert!(!c.matches(&v("2.0.0")));
        assert!(!c.matches(&v("0.9.0")));
    }

    #[test]
    fn comma_and() {
        let c = Constraint::parse(">=1.0, <2.0").unwrap();
        assert!(c.matches(&v("1.5.0")));
        assert!(!c.matches(&v("2.0.0")));
    }

    #[test]
    fn split_operator_and_operand() {
        let c = Constraint::parse(">= 1.0 < 2.0").unwrap();
        assert!(c.matches(&v("1.5.0")));
        assert!(!c.matches(&v("2.1.0")));
    }

    #[test]
    fn disjunction_short_circuits_left_to_right() {
        let c = Constraint::parse("^1.0 || ^2.0").unwrap();
        assert!(c.is_disjunctive());
        assert!(c.matches(&v("1.5.0")));
        assert!(c.matches(&v("2.5.0")));
        assert!(!c.matches(&v("3.0.0")));
    }

    #[test]
    fn single_pipe_disjunction() {
        let c = Constraint::parse("^1.0 | ^2.0").unwrap();
        assert!(c.matches(&v("2.5.0")));
        assert_eq!(c.disjunct_strings().count(), 2);
    }

    #[test]
    fn disjunct_strings_preserve_order() {
        let c = Constraint::parse("^2.67 || ^3.0").unwrap();
        let parts: Vec<&str> = c.disjunct_strings().collect();
        assert_eq!(parts, vec!["^2.67", "^3.0"]);
    }

    #[test]
    fn hyphen_range() {
        let c = Constraint::parse("1.0.0 - 2.0.0").unwrap();
        assert!(c.matches(&v("1.0.0")));
        assert!(c.matches(&v("1.5.3")));
        assert!(c.matches(&v("2.0.0")));
        assert!(!c.matches(&v("2.0.1")));
    }

    #[test]
    fn hyphen_range_partial_upper() {
        let c = Constraint::parse("1.0 - 2.0").unwrap();
        assert!(c.matches(&v("2.0.9")));
        assert!(!c.matches(&v("2.1.0")));
    }

    #[test]
    fn v_prefix_in_operand() {
        let c = Constraint::parse("^v1.2.0").unwrap();
        assert!(c.matches(&v("1.3.0")));
        let c = Constraint::parse("v1.2.3").unwrap();
        assert!(c.matches(&v("1.2.3")));
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(Constraint::parse("not a constraint").is_err());
        assert!(Constraint::parse("^").is_err());
        assert!(Constraint::parse(">=").is_err());
    }

    #[test]
    fn serde_roundtrip_keeps_raw_string() {
        let c = Constraint::parse("^1.0 || ^2.0").unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"^1.0 || ^2.0\"");
        let back: Constraint = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }

    proptest! {
        /// The wildcard constraint accepts any release version.
        #[test]
        fn prop_wildcard_matches_all(major in 0u64..50, minor in 0u64..50, patch in 0u64..200) {
            let c = Constraint::any();
            prop_assert!(c.matches(&Version::new(major, minor, patch)));
        }

        /// Caret always accepts its own lower bound and rejects the next major.
        #[test]
        fn prop_caret_bounds(major in 1u64..20, minor in 0u64..30, patch in 0u64..30) {
            let c = Constraint::parse(&format!("^{major}.{minor}.{patch}")).unwrap();
            prop_assert!(c.matches(&Version::new(major, minor, patch)));
            prop_assert!(!c.matches(&Version::new(major + 1, 0, 0)));
        }

        /// Reparsing the normalized form is semantically equivalent on a
        /// sampled version universe.
        #[test]
        fn prop_normalized_reparse_equivalent(
            major in 1u64..10,
            minor in 0u64..10,
            v_major in 0u64..12,
            v_minor in 0u64..12,
            v_patch in 0u64..12,
        ) {
            let raw = format!("^{major}.{minor} || ~{major}.{minor}.0");
            let c1 = Constraint::parse(&raw).unwrap();
            let c2 = Constraint::parse(c1.normalized()).unwrap();
            let probe = Version::new(v_major, v_minor, v_patch);
            prop_assert_eq!(c1.matches(&probe), c2.matches(&probe));
        }

        /// Parsing never panics on arbitrary input.
        #[test]
        fn prop_parse_no_panic(s in ".{0,40}") {
            let _ = Constraint::parse(&s);
        }
    }
}
