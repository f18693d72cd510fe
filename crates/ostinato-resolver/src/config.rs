//! Resolver configuration.
//!
//! The two package lists here are a pragmatic admission of bugs in the
//! real package ecosystem. They are data, not code: callers can audit and
//! override them.

/// Configuration for a resolution pass.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Packages for which best-effort fallback selection is refused,
    /// because a silently mismatched version breaks at runtime.
    pub strict: Vec<String>,

    /// Packages whose `||` constraints are split into separate ledger
    /// entries so grouped-by-major selection can fire. These are names
    /// chronically split across major lines through different reverse
    /// dependencies.
    pub expand_disjunctions: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strict: vec!["nesbot/carbon".to_string()],
            expand_disjunctions: vec!["nesbot/carbon".to_string()],
        }
    }
}

impl ResolverConfig {
    /// Whether fallback selection is refused for `name`.
    #[must_use]
    pub fn is_strict(&self, name: &str) -> bool {
        self.strict.iter().any(|n| n == name)
    }

    /// Whether `||` constraints on `name` expand into separate ledger
    /// entries.
    #[must_use]
    pub fn expands_disjunctions(&self, name: &str) -> bool {
        self.expand_disjunctions.iter().any(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_flag_carbon() {
        let config = ResolverConfig::default();
        assert!(config.is_strict("nesbot/carbon"));
        assert!(config.expands_disjunctions("nesbot/carbon"));
        assert!(!config.is_strict("monolog/monolog"));
    }

    #[test]
    fn lists_are_overridable() {
        let config = ResolverConfig {
            strict: vec![],
            expand_disjunctions: vec!["acme/timelib".to_string()],
        };
        assert!(!config.is_strict("nesbot/carbon"));
        assert!(config.expands_disjunctions("acme/timelib"));
    }
}
