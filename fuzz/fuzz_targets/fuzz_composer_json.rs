#![no_main]

use libfuzzer_sys::fuzz_target;
use ostinato_manifest::{Manifest, to_json_pretty};

fuzz_target!(|data: &[u8]| {
    // Tolerant decoding must never panic, whatever shape arrives.
    if let Ok(manifest) = Manifest::from_slice(data) {
        // A decoded manifest must re-serialize and re-parse.
        if let Ok(serialized) = to_json_pretty(&manifest) {
            let reparsed = Manifest::from_slice(serialized.as_bytes())
                .expect("serialized manifest must reparse");
            let _ = reparsed;
        }
    }
});
