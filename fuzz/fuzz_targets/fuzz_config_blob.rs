//! Fuzz target: stored config blob decoding
//!
//! Writes arbitrary bytes as the persisted config and loads it back.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - A blob that loads successfully always passes `validate()`
//! - `load_or_default` always yields a valid config
//!
//! cargo fuzz run fuzz_config_blob

#![no_main]

use libfuzzer_sys::fuzz_target;
use rollershutter::adapters::nvs::{self, NvsAdapter};
use rollershutter::app::ports::ConfigPort;

fuzz_target!(|data: &[u8]| {
    let Ok(store) = NvsAdapter::new() else {
        return;
    };
    store.sim_write_raw(data);

    if let Ok(cfg) = store.load() {
        assert!(cfg.validate().is_ok(), "loaded config must validate");
    }
    assert!(nvs::load_or_default(&store).validate().is_ok());
});
