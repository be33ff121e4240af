//! Decoding and encoding between UTF-8, UTF-16 and UTF-32 with error symbol
//! substitution.

use std::borrow::Cow;

/// The symbol substituted for every malformed unit or sequence
pub const DEFAULT_ERROR_SYMBOL: char = '?';

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];
const UTF32LE_BOM: &[u8] = &[0xFF, 0xFE, 0x00, 0x00];
const UTF32BE_BOM: &[u8] = &[0x00, 0x00, 0xFE, 0xFF];

/// A unicode transformation format together with its byte order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UtfType {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl UtfType {
    /// The byte order mark that announces this encoding
    ///
    /// ```
    /// use archivist::UtfType;
    /// assert_eq!(UtfType::Utf8.bom(), &[0xEF, 0xBB, 0xBF]);
    /// assert_eq!(UtfType::Utf16Be.bom(), &[0xFE, 0xFF]);
    /// ```
    pub fn bom(self) -> &'static [u8] {
        match self {
            UtfType::Utf8 => UTF8_BOM,
            UtfType::Utf16Le => UTF16LE_BOM,
            UtfType::Utf16Be => UTF16BE_BOM,
            UtfType::Utf32Le => UTF32LE_BOM,
            UtfType::Utf32Be => UTF32BE_BOM,
        }
    }

    /// Number of bytes in one code unit
    pub fn unit_size(self) -> usize {
        match self {
            UtfType::Utf8 => 1,
            UtfType::Utf16Le | UtfType::Utf16Be => 2,
            UtfType::Utf32Le | UtfType::Utf32Be => 4,
        }
    }

    /// Detect the encoding from a leading byte order mark
    ///
    /// ```
    /// use archivist::UtfType;
    /// assert_eq!(UtfType::detect_bom(&[0xFF, 0xFE, 0x41, 0x00]), Some(UtfType::Utf16Le));
    /// assert_eq!(UtfType::detect_bom(&[0xFF, 0xFE, 0x00, 0x00]), Some(UtfType::Utf32Le));
    /// assert_eq!(UtfType::detect_bom(b"plain"), None);
    /// ```
    pub fn detect_bom(data: &[u8]) -> Option<UtfType> {
        // the utf-32le mark starts with the utf-16le mark so it is probed first
        [
            UtfType::Utf32Le,
            UtfType::Utf32Be,
            UtfType::Utf8,
            UtfType::Utf16Le,
            UtfType::Utf16Be,
        ]
        .into_iter()
        .find(|x| data.starts_with(x.bom()))
    }
}

/// Iterator decoding UTF-8 bytes into characters
///
/// Each malformed sequence (invalid lead byte, missing continuation byte,
/// overlong form, encoded surrogate, or a truncated tail) yields exactly one
/// error symbol and decoding resumes after it.
///
/// ```
/// use archivist::Utf8Decoder;
/// let decoded: String = Utf8Decoder::new(b"a\xffb\xe2\x82", '_').collect();
/// assert_eq!(decoded, "a_b_");
/// ```
#[derive(Debug, Clone)]
pub struct Utf8Decoder<'a> {
    data: &'a [u8],
    error_symbol: char,
}

impl<'a> Utf8Decoder<'a> {
    pub fn new(data: &'a [u8], error_symbol: char) -> Self {
        Utf8Decoder { data, error_symbol }
    }

    /// Bytes not yet decoded
    pub fn remainder(&self) -> &'a [u8] {
        self.data
    }
}

impl<'a> Iterator for Utf8Decoder<'a> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let (&lead, rest) = self.data.split_first()?;
        if lead < 0x80 {
            self.data = rest;
            return Some(char::from(lead));
        }

        let (len, min, init) = match lead {
            0xC2..=0xDF => (2, 0x80, u32::from(lead & 0x1F)),
            0xE0..=0xEF => (3, 0x800, u32::from(lead & 0x0F)),
            0xF0..=0xF4 => (4, 0x1_0000, u32::from(lead & 0x07)),
            _ => {
                self.data = rest;
                return Some(self.error_symbol);
            }
        };

        let mut cp = init;
        for i in 1..len {
            match self.data.get(i) {
                Some(&b) if b & 0xC0 == 0x80 => cp = (cp << 6) | u32::from(b & 0x3F),
                _ => {
                    self.data = &self.data[i..];
                    return Some(self.error_symbol);
                }
            }
        }

        self.data = &self.data[len..];
        if cp < min {
            return Some(self.error_symbol);
        }

        Some(char::from_u32(cp).unwrap_or(self.error_symbol))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        ((self.data.len() + 3) / 4, Some(self.data.len()))
    }
}

/// Iterator decoding UTF-16 code units into characters
///
/// A lone or misordered surrogate yields one error symbol per offending unit.
///
/// ```
/// use archivist::Utf16Decoder;
/// let units = [0xD83D, 0xDE00];
/// let decoded: String = Utf16Decoder::new(&units, '?').collect();
/// assert_eq!(decoded, "\u{1F600}");
/// ```
#[derive(Debug, Clone)]
pub struct Utf16Decoder<'a> {
    data: &'a [u16],
    error_symbol: char,
}

impl<'a> Utf16Decoder<'a> {
    pub fn new(data: &'a [u16], error_symbol: char) -> Self {
        Utf16Decoder { data, error_symbol }
    }

    /// Code units not yet decoded
    pub fn remainder(&self) -> &'a [u16] {
        self.data
    }
}

impl<'a> Iterator for Utf16Decoder<'a> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let (&unit, rest) = self.data.split_first()?;
        match unit {
            0xD800..=0xDBFF => match rest.first() {
                Some(&low @ 0xDC00..=0xDFFF) => {
                    self.data = &rest[1..];
                    let cp = 0x1_0000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                    Some(char::from_u32(cp).unwrap_or(self.error_symbol))
                }
                _ => {
                    self.data = rest;
                    Some(self.error_symbol)
                }
            },
            0xDC00..=0xDFFF => {
                self.data = rest;
                Some(self.error_symbol)
            }
            _ => {
                self.data = rest;
                Some(char::from_u32(u32::from(unit)).unwrap_or(self.error_symbol))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        ((self.data.len() + 1) / 2, Some(self.data.len()))
    }
}

/// Iterator decoding UTF-32 code units into characters
///
/// Surrogates and values beyond U+10FFFF yield one error symbol each.
#[derive(Debug, Clone)]
pub struct Utf32Decoder<'a> {
    data: &'a [u32],
    error_symbol: char,
}

impl<'a> Utf32Decoder<'a> {
    pub fn new(data: &'a [u32], error_symbol: char) -> Self {
        Utf32Decoder { data, error_symbol }
    }
}

impl<'a> Iterator for Utf32Decoder<'a> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let (&unit, rest) = self.data.split_first()?;
        self.data = rest;
        Some(char::from_u32(unit).unwrap_or(self.error_symbol))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.data.len(), Some(self.data.len()))
    }
}

/// Decode UTF-8 bytes, borrowing the input when it is already well formed
///
/// ```
/// use archivist::decode_utf8;
/// assert_eq!(decode_utf8("Jåhkåmåhkke".as_bytes(), '?'), "Jåhkåmåhkke");
/// assert_eq!(decode_utf8(b"\xc3", '?'), "?");
/// ```
pub fn decode_utf8(data: &[u8], error_symbol: char) -> Cow<str> {
    match std::str::from_utf8(data) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => Cow::Owned(Utf8Decoder::new(data, error_symbol).collect()),
    }
}

/// Decode UTF-16 code units into a string
pub fn decode_utf16(data: &[u16], error_symbol: char) -> String {
    Utf16Decoder::new(data, error_symbol).collect()
}

/// Decode UTF-32 code units into a string
pub fn decode_utf32(data: &[u32], error_symbol: char) -> String {
    Utf32Decoder::new(data, error_symbol).collect()
}

/// Encode characters as UTF-16 code units, appending to `out`
pub fn encode_utf16<I: IntoIterator<Item = char>>(chars: I, out: &mut Vec<u16>) {
    let mut buf = [0u16; 2];
    for c in chars {
        out.extend_from_slice(c.encode_utf16(&mut buf));
    }
}

/// Encode characters as UTF-32 code units, appending to `out`
pub fn encode_utf32<I: IntoIterator<Item = char>>(chars: I, out: &mut Vec<u32>) {
    out.extend(chars.into_iter().map(u32::from));
}

/// Decode bytes in the given encoding into a string
///
/// A trailing partial code unit counts as one malformed unit.
///
/// ```
/// use archivist::{decode_bytes, UtfType};
/// let data = [0x3D, 0xD8, 0x00, 0xDE, 0x41];
/// assert_eq!(decode_bytes(&data, UtfType::Utf16Le, '?'), "\u{1F600}?");
/// ```
pub fn decode_bytes(data: &[u8], encoding: UtfType, error_symbol: char) -> Cow<str> {
    match encoding {
        UtfType::Utf8 => decode_utf8(data, error_symbol),
        UtfType::Utf16Le | UtfType::Utf16Be => {
            let chunks = data.chunks_exact(2);
            let partial = !chunks.remainder().is_empty();
            let units: Vec<u16> = if encoding == UtfType::Utf16Le {
                chunks.map(|x| u16::from_le_bytes([x[0], x[1]])).collect()
            } else {
                chunks.map(|x| u16::from_be_bytes([x[0], x[1]])).collect()
            };

            let mut result = decode_utf16(&units, error_symbol);
            if partial {
                result.push(error_symbol);
            }
            Cow::Owned(result)
        }
        UtfType::Utf32Le | UtfType::Utf32Be => {
            let chunks = data.chunks_exact(4);
            let partial = !chunks.remainder().is_empty();
            let units: Vec<u32> = if encoding == UtfType::Utf32Le {
                chunks
                    .map(|x| u32::from_le_bytes([x[0], x[1], x[2], x[3]]))
                    .collect()
            } else {
                chunks
                    .map(|x| u32::from_be_bytes([x[0], x[1], x[2], x[3]]))
                    .collect()
            };

            let mut result = decode_utf32(&units, error_symbol);
            if partial {
                result.push(error_symbol);
            }
            Cow::Owned(result)
        }
    }
}

/// Encode text into bytes of the given encoding, appending to `out`
pub fn encode_bytes(text: &str, encoding: UtfType, out: &mut Vec<u8>) {
    match encoding {
        UtfType::Utf8 => out.extend_from_slice(text.as_bytes()),
        UtfType::Utf16Le => text.encode_utf16().for_each(|x| out.extend(x.to_le_bytes())),
        UtfType::Utf16Be => text.encode_utf16().for_each(|x| out.extend(x.to_be_bytes())),
        UtfType::Utf32Le => text.chars().for_each(|x| out.extend(u32::from(x).to_le_bytes())),
        UtfType::Utf32Be => text.chars().for_each(|x| out.extend(u32::from(x).to_be_bytes())),
    }
}

/// Re-encode bytes from one encoding into another
///
/// ```
/// use archivist::{transcode, UtfType};
/// let utf16 = transcode("hé".as_bytes(), UtfType::Utf8, UtfType::Utf16Be, '?');
/// assert_eq!(utf16, vec![0x00, 0x68, 0x00, 0xE9]);
/// ```
pub fn transcode(data: &[u8], from: UtfType, to: UtfType, error_symbol: char) -> Vec<u8> {
    let text = decode_bytes(data, from, error_symbol);
    let mut out = Vec::with_capacity(text.len() * to.unit_size());
    encode_bytes(&text, to, &mut out);
    out
}

/// Decode a stream that may begin with a byte order mark
///
/// Streams without a mark must be valid UTF-8, otherwise `None` is returned.
pub(crate) fn decode_stream(data: &[u8], error_symbol: char) -> Option<(Cow<str>, UtfType)> {
    match UtfType::detect_bom(data) {
        Some(encoding) => {
            let body = &data[encoding.bom().len()..];
            Some((decode_bytes(body, encoding, error_symbol), encoding))
        }
        None => std::str::from_utf8(data)
            .ok()
            .map(|x| (Cow::Borrowed(x), UtfType::Utf8)),
    }
}

/// Encode text for a stream, optionally preceded by a byte order mark
pub(crate) fn encode_stream(text: &str, encoding: UtfType, write_bom: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * encoding.unit_size() + 4);
    if write_bom {
        out.extend_from_slice(encoding.bom());
    }
    encode_bytes(text, encoding, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use rstest::*;

    #[test]
    fn surrogate_pair_roundtrip() {
        let mut units = Vec::new();
        encode_utf16("\u{1F600}".chars(), &mut units);
        assert_eq!(units, vec![0xD83D, 0xDE00]);
        assert_eq!(decode_utf16(&units, '?'), "\u{1F600}");
    }

    #[test]
    fn misordered_surrogates_are_replaced_individually() {
        let mut units = vec![0xDFFF, 0xDC00];
        units.extend("test".encode_utf16());
        units.extend([0xDFFF, 0xDC00]);
        assert_eq!(decode_utf16(&units, '_'), "__test__");
    }

    #[test]
    fn trailing_high_surrogate() {
        let mut units: Vec<u16> = "test".encode_utf16().collect();
        units.push(0xD83D);
        assert_eq!(decode_utf16(&units, '_'), "test_");
    }

    #[test]
    fn high_surrogate_followed_by_regular_unit() {
        let units = [0xD83D, u16::from(b'a')];
        assert_eq!(decode_utf16(&units, '?'), "?a");
    }

    #[rstest]
    #[case(b"\x80", "?")]
    #[case(b"\xc0\xaf", "??")]
    #[case(b"\xe0\x80\x80", "?")]
    #[case(b"\xed\xa0\x80", "?")]
    #[case(b"\xf4\x90\x80\x80", "?")]
    #[case(b"\xf5abc", "?abc")]
    #[case(b"ab\xe2\x82", "ab?")]
    #[case(b"\xe2\x82a", "?a")]
    #[case(b"\xf0\x9f\x98\x80", "\u{1F600}")]
    fn utf8_malformed_sequences(#[case] input: &[u8], #[case] expected: &str) {
        let decoded: String = Utf8Decoder::new(input, '?').collect();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn utf32_invalid_scalars() {
        let units = [0x41, 0xD800, 0x11_0000, 0x1F600];
        assert_eq!(decode_utf32(&units, '?'), "A??\u{1F600}");
    }

    #[test]
    fn decoders_are_restartable() {
        let units = [0x48, 0x69];
        let decoder = Utf16Decoder::new(&units, '?');
        let first: String = decoder.clone().collect();
        let second: String = decoder.collect();
        assert_eq!(first, second);
    }

    #[rstest]
    #[case(UtfType::Utf8)]
    #[case(UtfType::Utf16Le)]
    #[case(UtfType::Utf16Be)]
    #[case(UtfType::Utf32Le)]
    #[case(UtfType::Utf32Be)]
    fn stream_bom_detection(#[case] encoding: UtfType) {
        let data = encode_stream("{\"a\": \"ö\"}", encoding, true);
        let (text, detected) = decode_stream(&data, '?').unwrap();
        assert_eq!(detected, encoding);
        assert_eq!(text, "{\"a\": \"ö\"}");
    }

    #[test]
    fn stream_without_bom_must_be_utf8() {
        assert!(decode_stream(b"abc", '?').is_some());
        assert!(decode_stream(b"a\x00\xffb", '?').is_none());
    }

    #[test]
    fn odd_trailing_byte_is_malformed() {
        assert_eq!(decode_bytes(&[0x00, 0x41, 0x00], UtfType::Utf16Be, '?'), "A?");
    }

    #[quickcheck]
    fn utf16_roundtrip(text: String) -> bool {
        let mut units = Vec::new();
        encode_utf16(text.chars(), &mut units);
        decode_utf16(&units, '?') == text
    }

    #[quickcheck]
    fn utf32_bytes_roundtrip(text: String) -> bool {
        let bytes = transcode(text.as_bytes(), UtfType::Utf8, UtfType::Utf32Be, '?');
        transcode(&bytes, UtfType::Utf32Be, UtfType::Utf8, '?') == text.as_bytes()
    }

    #[quickcheck]
    fn utf8_decoder_matches_lossy_on_valid(text: String) -> bool {
        Utf8Decoder::new(text.as_bytes(), '?').collect::<String>() == text
    }
}
