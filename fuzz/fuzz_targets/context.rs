#![no_main]

use libfuzzer_sys::fuzz_target;
use sqlscope_core::analyze_context;

fuzz_target!(|data: &[u8]| {
    // First two bytes pick the cursor; the rest is the SQL buffer.
    if data.len() < 2 {
        return;
    }
    let cursor = u16::from_le_bytes([data[0], data[1]]) as usize;
    if let Ok(sql) = std::str::from_utf8(&data[2..]) {
        let context = analyze_context(sql, cursor);
        assert!(context.statement_span.end <= sql.len());
    }
});
