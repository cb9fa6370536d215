#![no_main]

use libfuzzer_sys::fuzz_target;
use vtc_facture::config::Configuration;

fuzz_target!(|data: &[u8]| {
    // Arbitrary config.json contents: parse, validate, re-save must not panic.
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = serde_json::from_str::<Configuration>(s) {
            let _ = config.validate();
            let _ = config.appearance.primary_rgb();
            let _ = config.billing.tax_rate();
            let _ = serde_json::to_string(&config);
        }
    }
});
