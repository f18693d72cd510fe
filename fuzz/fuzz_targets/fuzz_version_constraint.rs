#![no_main]

use libfuzzer_sys::fuzz_target;
use ostinato_core::{Constraint, parse_version};
use semver::Version;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Version parsing must never panic.
        let _ = parse_version(s);

        // Constraint parsing must never panic, and a parsed constraint
        // must evaluate cleanly against a spread of versions.
        if let Ok(constraint) = Constraint::parse(s) {
            let probes = [
                Version::new(0, 0, 0),
                Version::new(0, 1, 0),
                Version::new(1, 0, 0),
                Version::new(1, 2, 3),
                Version::new(2, 0, 0),
                Version::new(99, 99, 99),
            ];
            for version in &probes {
                let _ = constraint.matches(version);
            }

            // Normalization must be reparseable.
            let normalized = constraint.normalized().to_string();
            let _ = Constraint::parse(&normalized);
        }
    }
});
