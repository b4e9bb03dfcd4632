#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use wavwash_core::{extract, is_valid_wav};

fuzz_target!(|data: &[u8]| {
    let mut cursor = Cursor::new(data);
    let valid = is_valid_wav(&mut cursor);

    if let Ok(audio) = extract(&mut cursor) {
        assert!(valid);
        for channel in &audio.channels {
            assert_eq!(channel.len(), audio.number_of_samples);
        }
    }
});
