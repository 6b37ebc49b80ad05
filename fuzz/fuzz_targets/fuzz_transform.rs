#![no_main]

use libfuzzer_sys::fuzz_target;

// Accepts arbitrary bytes, treats them as declaration source, and runs the
// parse -> transform -> print chain. Goal: no panics, even on malformed input.
fuzz_target!(|data: &[u8]| {
    if let Ok(src) = std::str::from_utf8(data) {
        if let Ok(file) = tsconfig_types_core::parse(src) {
            if let Ok(out) = tsconfig_types_core::transform(&file, &Default::default()) {
                let _ = tsconfig_types_core::print(&out);
            }
        }
    }
});
