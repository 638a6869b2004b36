#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use voxcade_archive::Archive;

// Arbitrary bytes must parse or fail with an error, never panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(archive) = Archive::parse(Path::new("fuzz.data"), data) {
        for entry in archive.entries() {
            let _ = archive.open_entry(&entry.relative_path);
        }
        let _ = archive.list_word_names();
        let _ = archive.list_background_candidates();
    }
});
