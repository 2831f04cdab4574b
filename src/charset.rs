//! The character set key and the conversion operations built around it.
//!
//! A [`CharacterSet`] is a small key identifying one of the supported
//! repertoires. Keys for the Japanese ISO 2022 sets may be OR-combined
//! (JIS X 0201 + JIS X 0208 + JIS X 0212), and an ISO 2022 flag bit marks
//! keys whose byte stream carries designation escapes. Conversion reports
//! errors as byte offsets: every operation returns the position of the
//! first undecodable input, which equals the input length on success.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use snafu::{ensure, Backtrace, ResultExt, Snafu};
use tracing::warn;

use crate::codec;
use crate::fold;
use crate::iso2022;
use crate::registry;
use crate::utf8::{self, ErrorMode};

/// A character repertoire from the Specific Character Set defined terms,
/// identified by a compact key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharacterSet(u8);

impl CharacterSet {
    /// The default repertoire (ISO 646 / US-ASCII).
    pub const ISO_IR_6: CharacterSet = CharacterSet(0x00);
    /// JIS X 0201: romaji with half-width katakana.
    pub const ISO_IR_13: CharacterSet = CharacterSet(0x01);
    /// ISO 8859-1, latin-1, western europe.
    pub const ISO_IR_100: CharacterSet = CharacterSet(0x08);
    /// ISO 8859-2, latin-2, central europe.
    pub const ISO_IR_101: CharacterSet = CharacterSet(0x09);
    /// ISO 8859-3, latin-3, maltese.
    pub const ISO_IR_109: CharacterSet = CharacterSet(0x0A);
    /// ISO 8859-4, latin-4, baltic.
    pub const ISO_IR_110: CharacterSet = CharacterSet(0x0B);
    /// ISO 8859-5, cyrillic.
    pub const ISO_IR_144: CharacterSet = CharacterSet(0x0C);
    /// ISO 8859-6, arabic.
    pub const ISO_IR_127: CharacterSet = CharacterSet(0x0D);
    /// ISO 8859-7, greek.
    pub const ISO_IR_126: CharacterSet = CharacterSet(0x0E);
    /// ISO 8859-8, hebrew.
    pub const ISO_IR_138: CharacterSet = CharacterSet(0x0F);
    /// ISO 8859-9, latin-5, turkish.
    pub const ISO_IR_148: CharacterSet = CharacterSet(0x10);
    /// ISO 8859-10, latin-6, nordic.
    pub const X_LATIN6: CharacterSet = CharacterSet(0x11);
    /// ISO 8859-11, thai.
    pub const ISO_IR_166: CharacterSet = CharacterSet(0x12);
    /// ISO 8859-13, latin-7, baltic rim.
    pub const X_LATIN7: CharacterSet = CharacterSet(0x13);
    /// ISO 8859-14, latin-8, celtic.
    pub const X_LATIN8: CharacterSet = CharacterSet(0x14);
    /// ISO 8859-15, latin-9, western europe.
    pub const X_LATIN9: CharacterSet = CharacterSet(0x15);
    /// ISO 8859-16, latin-10, south-east europe.
    pub const X_LATIN10: CharacterSet = CharacterSet(0x16);
    /// EUC-KR, korean.
    pub const X_EUCKR: CharacterSet = CharacterSet(0x18);
    /// GB2312, simplified chinese.
    pub const X_GB2312: CharacterSet = CharacterSet(0x19);
    /// US-ASCII with ISO 2022 escapes.
    pub const ISO_2022_IR_6: CharacterSet = CharacterSet(0x20);
    /// JIS X 0201 with ISO 2022 escapes.
    pub const ISO_2022_IR_13: CharacterSet = CharacterSet(0x21);
    /// JIS X 0208 with ISO 2022 escapes.
    pub const ISO_2022_IR_87: CharacterSet = CharacterSet(0x22);
    /// JIS X 0212 with ISO 2022 escapes.
    pub const ISO_2022_IR_159: CharacterSet = CharacterSet(0x24);
    /// ISO 8859-1 with ISO 2022 escapes.
    pub const ISO_2022_IR_100: CharacterSet = CharacterSet(0x28);
    /// ISO 8859-2 with ISO 2022 escapes.
    pub const ISO_2022_IR_101: CharacterSet = CharacterSet(0x29);
    /// ISO 8859-3 with ISO 2022 escapes.
    pub const ISO_2022_IR_109: CharacterSet = CharacterSet(0x2A);
    /// ISO 8859-4 with ISO 2022 escapes.
    pub const ISO_2022_IR_110: CharacterSet = CharacterSet(0x2B);
    /// ISO 8859-5 with ISO 2022 escapes.
    pub const ISO_2022_IR_144: CharacterSet = CharacterSet(0x2C);
    /// ISO 8859-6 with ISO 2022 escapes.
    pub const ISO_2022_IR_127: CharacterSet = CharacterSet(0x2D);
    /// ISO 8859-7 with ISO 2022 escapes.
    pub const ISO_2022_IR_126: CharacterSet = CharacterSet(0x2E);
    /// ISO 8859-8 with ISO 2022 escapes.
    pub const ISO_2022_IR_138: CharacterSet = CharacterSet(0x2F);
    /// ISO 8859-9 with ISO 2022 escapes.
    pub const ISO_2022_IR_148: CharacterSet = CharacterSet(0x30);
    /// ISO 8859-11 with ISO 2022 escapes.
    pub const ISO_2022_IR_166: CharacterSet = CharacterSet(0x32);
    /// KS X 1001 designated to G1 (korean).
    pub const ISO_2022_IR_149: CharacterSet = CharacterSet(0x38);
    /// GB2312 designated to G1 (chinese).
    pub const ISO_2022_IR_58: CharacterSet = CharacterSet(0x39);
    /// Unicode in UTF-8.
    pub const ISO_IR_192: CharacterSet = CharacterSet(0x40);
    /// GB18030, chinese.
    pub const GB18030: CharacterSet = CharacterSet(0x41);
    /// GBK, the two-byte subset of GB18030.
    pub const GBK: CharacterSet = CharacterSet(0x42);
    /// Big5 with the ETEN extensions, traditional chinese.
    pub const X_BIG5: CharacterSet = CharacterSet(0x43);
    /// Shift_JIS in its Windows-31J form.
    pub const X_SJIS: CharacterSet = CharacterSet(0x44);
    /// EUC-JP, japanese.
    pub const X_EUCJP: CharacterSet = CharacterSet(0x45);
    /// KOI8, cyrillic.
    pub const X_KOI8: CharacterSet = CharacterSet(0x46);
    /// Windows code page 874, thai.
    pub const X_CP874: CharacterSet = CharacterSet(0x47);
    /// Windows code page 1250, central europe.
    pub const X_CP1250: CharacterSet = CharacterSet(0x48);
    /// Windows code page 1251, cyrillic.
    pub const X_CP1251: CharacterSet = CharacterSet(0x49);
    /// Windows code page 1252, western europe.
    pub const X_CP1252: CharacterSet = CharacterSet(0x4A);
    /// Windows code page 1253, greek.
    pub const X_CP1253: CharacterSet = CharacterSet(0x4B);
    /// Windows code page 1254, turkish.
    pub const X_CP1254: CharacterSet = CharacterSet(0x4C);
    /// Windows code page 1255, hebrew.
    pub const X_CP1255: CharacterSet = CharacterSet(0x4D);
    /// Windows code page 1256, arabic.
    pub const X_CP1256: CharacterSet = CharacterSet(0x4E);
    /// Windows code page 1257, baltic rim.
    pub const X_CP1257: CharacterSet = CharacterSet(0x4F);
    /// Windows code page 1258, vietnamese.
    pub const X_CP1258: CharacterSet = CharacterSet(0x50);
    /// An unrecognised character set; decodes as ASCII.
    pub const UNKNOWN: CharacterSet = CharacterSet(0xFF);

    /// The flag bit marking ISO 2022 escape handling.
    pub(crate) const ISO_2022_FLAG: u8 = 0x20;
    /// Mask that strips the ISO 2022 flag off a key.
    pub(crate) const ISO_2022_BASE_MASK: u8 = 0x1F;
    /// The OR-combinable Japanese base keys.
    pub(crate) const JP_BASE_MASK: u8 = 0x07;
    /// Largest key that takes part in ISO 2022 designation handling.
    pub(crate) const ISO_2022_MAX_KEY: u8 = 0x3F;

    /// Build a character set from a raw key.
    pub const fn from_key(key: u8) -> Self {
        CharacterSet(key)
    }

    /// The raw key.
    pub const fn key(self) -> u8 {
        self.0
    }

    /// Whether every key bit of `other` is present in `self`; meaningful
    /// for the OR-combinable Japanese keys.
    pub const fn contains(self, other: CharacterSet) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether the byte stream carries ISO 2022 designation escapes.
    pub const fn is_iso2022(self) -> bool {
        self.0 & Self::ISO_2022_FLAG != 0
    }

    /// Whether this is one of the ISO 8859 sets.
    pub const fn is_iso8859(self) -> bool {
        self.0 >= Self::ISO_IR_100.0 && self.0 <= Self::X_LATIN10.0
    }

    /// Resolve a Specific Character Set value: backslash-separated defined
    /// terms, or any common alias of a supported encoding. Unrecognised
    /// values yield [`CharacterSet::UNKNOWN`].
    pub fn from_code(code: &str) -> Self {
        registry::key_from_code(code)
    }

    /// Render the key back to its Specific Character Set value. The
    /// default repertoire renders as the empty string.
    pub fn code(&self) -> String {
        registry::code_string(*self)
    }

    /// Convert to UTF-8, returning the output bytes and the offset of the
    /// first undecodable input byte (the input length when everything
    /// decoded).
    ///
    /// The output is valid UTF-8 except under [`ErrorMode::Escape`], which
    /// preserves undecodable source bytes as UTF-16 low surrogates, and
    /// for UTF-8 input whose lone surrogates pass through (flagged by the
    /// returned offset).
    pub fn to_utf8(&self, text: &[u8], mode: ErrorMode) -> (Vec<u8>, usize) {
        let mut out = Vec::new();
        let n = self.any_to_utf8(text, &mut out, mode);
        (out, n)
    }

    /// Convert UTF-8 input to this character set, returning the encoded
    /// bytes and the offset of the first inconvertible input byte.
    ///
    /// Characters without an encoding go through a last-chance pass that
    /// maps typographic punctuation to its ASCII equivalent; anything
    /// still left becomes `?` and an error.
    pub fn from_utf8(&self, text: &[u8]) -> (Vec<u8>, usize) {
        let mut out = Vec::new();
        let n = self.from_utf8_dispatch(text, &mut out);
        (out, n)
    }

    /// Strict decoding front end: replacement characters are still used in
    /// the output, but any undecodable input reports an error.
    pub fn decode(&self, text: &[u8]) -> Result<String, DecodeTextError> {
        let (out, n) = self.to_utf8(text, ErrorMode::Replace);
        ensure!(n >= text.len(), UndecodableInputSnafu { offset: n });
        String::from_utf8(out).context(InvalidOutputSnafu)
    }

    /// Strict encoding front end over [`CharacterSet::from_utf8`].
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, EncodeTextError> {
        let (out, n) = self.from_utf8(text.as_bytes());
        ensure!(n >= text.len(), EncodeTextSnafu { offset: n });
        Ok(out)
    }

    /// Case-fold the text, converting it to UTF-8 first if needed.
    /// Folding follows the Unicode case folding data (full mappings, so
    /// one character may become up to three).
    pub fn case_folded(&self, text: &[u8]) -> String {
        let converted;
        let bytes = if *self == Self::ISO_IR_192 {
            text
        } else {
            let mut buf = Vec::new();
            self.any_to_utf8(text, &mut buf, ErrorMode::Replace);
            converted = buf;
            &converted
        };

        let mut out = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            let mut code = utf8::next_code(bytes, &mut i);
            if code == utf8::TRUNCATED {
                continue;
            }
            if code == utf8::MALFORMED || (0xD800..=0xDFFF).contains(&code) {
                code = 0xFFFD;
            }
            fold::fold_into(code, &mut out);
        }
        into_string_lossy(out)
    }

    /// Decode to UTF-8 that is safe to print on a console or log: C0 and
    /// C1 controls, DEL, the backslash, and any byte the character set
    /// could not decode are rewritten as `\nnn` octal escapes.
    pub fn to_safe_utf8(&self, text: &[u8]) -> String {
        let mut s = Vec::new();
        self.any_to_utf8(text, &mut s, ErrorMode::Escape);

        let mut t: Vec<u8> = Vec::new();
        let mut run = 0; // start of the pending untouched run
        let mut i = 0;
        while i < s.len() {
            let start = i;
            let a = s[i];
            i += 1;
            if a < 0x20 || a == 0x7F || a == b'\\' {
                t.extend_from_slice(&s[run..start]);
                utf8::push_octal(&mut t, a);
                run = i;
            } else if a & 0xC0 == 0xC0 && i < s.len() {
                let b = s[i];
                i += 1;
                if a == 0xC2 && b < 0xA0 {
                    // C1 control
                    t.extend_from_slice(&s[run..start]);
                    utf8::push_octal(&mut t, b);
                    run = i;
                } else if a & 0xE0 == 0xE0 && i < s.len() {
                    let c = s[i];
                    i += 1;
                    if a == 0xED && b & 0xE0 == 0xA0 {
                        // a surrogate: either an escaped source byte, or a
                        // stray surrogate that cannot stay in the string
                        let d = (u16::from(b & 0x0F) << 6) | u16::from(c & 0x3F);
                        t.extend_from_slice(&s[run..start]);
                        if b & 0xF0 == 0xB0 && d <= 0xFF {
                            utf8::push_octal(&mut t, d as u8);
                        } else {
                            utf8::push_octal(&mut t, a);
                            utf8::push_octal(&mut t, b);
                            utf8::push_octal(&mut t, c);
                        }
                        run = i;
                    } else if a & 0xF0 == 0xF0 && i < s.len() {
                        i += 1;
                    }
                }
            }
        }

        t.extend_from_slice(&s[run..]);
        into_string_lossy(t)
    }

    /// Offset of the next backslash that is a real value delimiter: a
    /// `0x5C` octet inside a multi-byte character, an escape sequence or a
    /// single-shifted character does not count.
    pub fn next_backslash(&self, text: &[u8]) -> usize {
        let mut i = 0;
        match *self {
            Self::GB18030 | Self::GBK => {
                while i < text.len() && text[i] != 0 {
                    if text[i] >= 0x81 {
                        i += 1;
                        if i < text.len() && text[i] >= 0x21 {
                            i += 1;
                        }
                    } else if text[i] != b'\\' {
                        i += 1;
                    } else {
                        break;
                    }
                }
            }
            Self::X_SJIS => {
                while i < text.len() && text[i] != 0 {
                    let x = text[i];
                    if (0x81..=0x9F).contains(&x) || (0xE0..=0xFC).contains(&x) {
                        i += 1;
                        if i < text.len()
                            && (0x40..=0xFC).contains(&text[i])
                            && text[i] != 0x7F
                        {
                            i += 1;
                        }
                    } else if x != b'\\' {
                        i += 1;
                    } else {
                        break;
                    }
                }
            }
            Self::X_BIG5 => {
                while i < text.len() && text[i] != 0 {
                    let x = text[i];
                    if (0x81..=0xFE).contains(&x) {
                        i += 1;
                        if i < text.len()
                            && ((0x40..=0x7E).contains(&text[i])
                                || (0xA1..=0xFE).contains(&text[i]))
                        {
                            i += 1;
                        }
                    } else if x != b'\\' {
                        i += 1;
                    } else {
                        break;
                    }
                }
            }
            _ if self.is_iso2022() => {
                return iso2022::next_backslash(text);
            }
            _ => {
                while i < text.len() && text[i] != 0 && text[i] != b'\\' {
                    i += 1;
                }
            }
        }
        i
    }

    /// Number of value delimiters in the text, honoring multi-byte
    /// boundaries the same way [`CharacterSet::next_backslash`] does.
    pub fn count_backslashes(&self, text: &[u8]) -> usize {
        let mut count = 0;
        let mut i = 0;
        while i < text.len() && text[i] != 0 {
            i += self.next_backslash(&text[i..]);
            if i < text.len() && text[i] == b'\\' {
                i += 1;
                count += 1;
            }
        }
        count
    }

    /// Decode under any key, dispatching to the right codec.
    pub(crate) fn any_to_utf8(self, text: &[u8], out: &mut Vec<u8>, mode: ErrorMode) -> usize {
        if self == Self::ISO_IR_6 {
            utf8::ascii_to_utf8(text, out, mode)
        } else if self.is_iso2022() {
            iso2022::to_utf8(self, text, out, mode)
        } else if self.is_iso8859() {
            codec::singlebyte::iso8859_to_utf8(self, text, out, mode)
        } else {
            match self {
                Self::X_EUCKR => codec::korean::euckr_to_utf8(text, out, mode),
                Self::X_GB2312 => codec::simpchinese::gb2312_to_utf8(text, out, mode),
                Self::ISO_IR_192 => utf8::utf8_to_utf8(text, out, mode),
                Self::GB18030 => codec::simpchinese::gb18030_to_utf8(text, out, mode),
                Self::GBK => codec::simpchinese::gbk_to_utf8(text, out, mode),
                Self::X_BIG5 => codec::tradchinese::big5_to_utf8(text, out, mode),
                Self::X_EUCJP => codec::japanese::eucjp_to_utf8(text, out, mode),
                Self::X_SJIS => codec::japanese::sjis_to_utf8(text, out, mode),
                _ => codec::singlebyte::to_utf8(self, text, out, mode),
            }
        }
    }

    /// Encode under any key, dispatching to the right codec.
    pub(crate) fn from_utf8_dispatch(self, text: &[u8], out: &mut Vec<u8>) -> usize {
        if self.is_iso2022() {
            iso2022::from_utf8(self, text, out)
        } else {
            match self {
                Self::X_EUCKR => codec::korean::utf8_to_euckr(text, out),
                Self::X_GB2312 => codec::simpchinese::utf8_to_gb2312(text, out),
                Self::ISO_IR_192 => utf8::utf8_to_utf8(text, out, ErrorMode::Replace),
                Self::GB18030 => codec::simpchinese::utf8_to_gb18030(text, out),
                Self::GBK => codec::simpchinese::utf8_to_gbk(text, out),
                Self::X_BIG5 => codec::tradchinese::utf8_to_big5(text, out),
                Self::X_EUCJP => codec::japanese::utf8_to_eucjp(text, out),
                Self::X_SJIS => codec::japanese::utf8_to_sjis(text, out),
                _ => codec::singlebyte::from_utf8(self, text, out),
            }
        }
    }
}

impl Default for CharacterSet {
    fn default() -> Self {
        CharacterSet::ISO_IR_6
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.code();
        if s.is_empty() {
            f.write_str(if *self == Self::ISO_IR_6 {
                "ISO_IR 6"
            } else {
                "Unknown"
            })
        } else if s.starts_with('\\') {
            write!(f, "ISO 2022 IR 6{}", s)
        } else {
            f.write_str(&s)
        }
    }
}

impl FromStr for CharacterSet {
    type Err = ParseCharacterSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cs = CharacterSet::from_code(s);
        ensure!(
            cs != CharacterSet::UNKNOWN,
            ParseCharacterSetSnafu { value: s }
        );
        Ok(cs)
    }
}

fn into_string_lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Could not decode text under the declared character set.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum DecodeTextError {
    /// The input contained a byte sequence with no decoding.
    #[snafu(display("undecodable input at byte offset {}", offset))]
    UndecodableInput { offset: usize, backtrace: Backtrace },
    /// The decoded output was not valid UTF-8 (lone surrogates).
    #[snafu(display("decoded text is not valid UTF-8"))]
    InvalidOutput {
        source: std::string::FromUtf8Error,
        backtrace: Backtrace,
    },
}

/// Could not encode text into the requested character set.
#[derive(Debug, Snafu)]
#[snafu(display("no encoding for character at byte offset {}", offset))]
pub struct EncodeTextError {
    offset: usize,
    backtrace: Backtrace,
}

/// An unrecognised Specific Character Set value.
#[derive(Debug, Snafu)]
#[snafu(display("unrecognized specific character set {:?}", value))]
pub struct ParseCharacterSetError {
    value: String,
    backtrace: Backtrace,
}

// The process-wide default, for records that carry no Specific Character
// Set of their own. Callers are expected to set these at startup.
static GLOBAL_DEFAULT: AtomicU8 = AtomicU8::new(0);
static GLOBAL_OVERRIDE: AtomicBool = AtomicBool::new(false);

/// The character set assumed when none is declared.
pub fn global_default() -> CharacterSet {
    CharacterSet::from_key(GLOBAL_DEFAULT.load(Ordering::Relaxed))
}

/// Set the character set assumed when none is declared.
pub fn set_global_default(cs: CharacterSet) {
    GLOBAL_DEFAULT.store(cs.key(), Ordering::Relaxed);
}

/// Whether the global default overrides declared character sets as well.
pub fn global_override() -> bool {
    GLOBAL_OVERRIDE.load(Ordering::Relaxed)
}

/// Make the global default override declared character sets, for files
/// whose declarations are known to be wrong.
pub fn set_global_override(enable: bool) {
    if enable {
        warn!("overriding declared character sets with the global default");
    }
    GLOBAL_OVERRIDE.store(enable, Ordering::Relaxed);
}

/// The character set to use for a record, given its declared value.
pub fn effective_character_set(declared: Option<CharacterSet>) -> CharacterSet {
    match declared {
        Some(cs) if !global_override() => cs,
        _ => global_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(CharacterSet::ISO_IR_6.to_string(), "ISO_IR 6");
        assert_eq!(CharacterSet::ISO_IR_144.to_string(), "ISO_IR 144");
        assert_eq!(CharacterSet::UNKNOWN.to_string(), "Unknown");
        assert_eq!(
            CharacterSet::ISO_2022_IR_87.to_string(),
            "ISO 2022 IR 6\\ISO 2022 IR 87"
        );
    }

    #[test]
    fn from_str_rejects_unknown() {
        assert!("ISO_IR 100".parse::<CharacterSet>().is_ok());
        assert!("bogus".parse::<CharacterSet>().is_err());
    }

    #[test]
    fn strict_decode_reports_offsets() {
        let cs = CharacterSet::ISO_IR_6;
        assert_eq!(cs.decode(b"plain text").unwrap(), "plain text");
        match cs.decode(b"ab\x80cd") {
            Err(DecodeTextError::UndecodableInput { offset, .. }) => assert_eq!(offset, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn strict_encode_reports_offsets() {
        let cs = CharacterSet::ISO_IR_100;
        assert_eq!(cs.encode("café").unwrap(), b"caf\xE9");
        assert!(cs.encode("ab\u{4E00}").is_err());
    }

    #[test]
    fn case_folding_through_a_legacy_set() {
        let cs = CharacterSet::ISO_IR_100;
        assert_eq!(cs.case_folded(b"Caf\xC9"), "café");
        assert_eq!(CharacterSet::ISO_IR_192.case_folded("Straße".as_bytes()), "strasse");
    }

    #[test]
    fn case_folding_is_idempotent() {
        let cs = CharacterSet::ISO_IR_192;
        let once = cs.case_folded("MIXED Case ÆØÅ ΣΤΙΓΜΑΣ".as_bytes());
        let twice = cs.case_folded(once.as_bytes());
        assert_eq!(once, twice);
    }

    #[test]
    fn safe_utf8_escapes_controls_and_bad_bytes() {
        let cs = CharacterSet::ISO_IR_6;
        assert_eq!(cs.to_safe_utf8(b"a\\b\x07c"), "a\\134b\\007c");
        assert_eq!(cs.to_safe_utf8(b"ab\x80"), "ab\\200");
    }

    #[test]
    fn safe_utf8_keeps_valid_text() {
        let cs = CharacterSet::X_SJIS;
        assert_eq!(cs.to_safe_utf8(&[0x82, 0xA0]), "あ");
    }

    #[test]
    fn backslash_scan_per_encoding() {
        // the second byte of a GB18030 character may be 0x5C
        let cs = CharacterSet::GB18030;
        assert_eq!(cs.next_backslash(&[0xC4, 0x5C, 0x41]), 3);
        assert_eq!(cs.next_backslash(&[0xC4, 0x5C, 0x5C, 0x41]), 2);
        // same for Shift_JIS
        let cs = CharacterSet::X_SJIS;
        assert_eq!(cs.next_backslash(&[0x81, 0x5C, 0x5C]), 2);
        // but latin-1 backslashes are all delimiters
        let cs = CharacterSet::ISO_IR_100;
        assert_eq!(cs.next_backslash(&[0xC4, 0x5C, 0x41]), 1);
    }

    #[test]
    fn backslash_counting() {
        let cs = CharacterSet::X_SJIS;
        assert_eq!(cs.count_backslashes(b"one\\two\\three"), 2);
        assert_eq!(cs.count_backslashes(&[0x81, 0x5C, 0x5C, 0x41]), 1);
    }

    #[test]
    fn global_default_plumbing() {
        assert_eq!(effective_character_set(None), global_default());
        assert_eq!(
            effective_character_set(Some(CharacterSet::ISO_IR_144)),
            CharacterSet::ISO_IR_144
        );
    }
}
