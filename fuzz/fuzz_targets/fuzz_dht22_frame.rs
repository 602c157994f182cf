//! Fuzz target: `dht22::decode_frame`
//!
//! Invariants checked:
//! - No panics under any 5-byte frame
//! - Accepted frames always carry a valid checksum and in-range values
//!
//! cargo fuzz run fuzz_dht22_frame

#![no_main]

use aqmon::sensors::dht22::decode_frame;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|frame: [u8; 5]| {
    if let Ok(r) = decode_frame(frame) {
        let sum = frame[..4].iter().fold(0u8, |a, &b| a.wrapping_add(b));
        assert_eq!(sum, frame[4], "accepted frame with bad checksum");
        assert!((0.0..=100.0).contains(&r.humidity_pct));
        assert!((-40.0..=80.0).contains(&r.temperature_c));
    }
});
