#![no_main]

use libfuzzer_sys::fuzz_target;
use sqlscope_core::segment_statements;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let expected = usize::from(data[0] % 16);
    if let Ok(sql) = std::str::from_utf8(&data[1..]) {
        assert_eq!(segment_statements(sql, expected).len(), expected);
    }
});
