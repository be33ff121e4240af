#![no_main]
use archivist::{decode_bytes, transcode, UtfType};
use libfuzzer_sys::fuzz_target;

const ENCODINGS: [UtfType; 5] = [
    UtfType::Utf8,
    UtfType::Utf16Le,
    UtfType::Utf16Be,
    UtfType::Utf32Le,
    UtfType::Utf32Be,
];

fuzz_target!(|data: &[u8]| {
    for from in ENCODINGS {
        let text = decode_bytes(data, from, '?');
        for to in ENCODINGS {
            let encoded = transcode(text.as_bytes(), UtfType::Utf8, to, '?');
            assert_eq!(decode_bytes(&encoded, to, '?'), text);
        }
    }
});
