#![no_main]
use archivist::{DateTime, Timestamp};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() >= 8 {
        let seconds = i64::from_le_bytes([
            data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7],
        ]);

        let ts = Timestamp::from_seconds(seconds % 300_000_000_000_000);
        let text = ts.to_string();
        assert_eq!(text.parse::<Timestamp>().unwrap(), ts);
    }

    if let Ok(txt) = std::str::from_utf8(data) {
        if let Ok(dt) = DateTime::parse(txt) {
            assert_eq!(DateTime::parse(&dt.to_string()).unwrap(), dt);
        }
    }
});
