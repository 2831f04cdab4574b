//! Single-byte character sets, including the ISO 8859 family.

use crate::charset::CharacterSet;
use crate::table::{CompressedTable, ReverseTable, UNMAPPED};
use crate::tables;
use crate::utf8::{self, ErrorMode};

/// Table-driven byte-to-code-point decoding.
pub(crate) fn to_utf8(
    cs: CharacterSet,
    text: &[u8],
    out: &mut Vec<u8>,
    mode: ErrorMode,
) -> usize {
    let data = tables::table_for(cs).unwrap_or(tables::TABLE_ASCII);
    let table = CompressedTable::new(data);
    let mut err: Option<usize> = None;
    for (i, &b) in text.iter().enumerate() {
        let code = table.get(u16::from(b));
        if code == UNMAPPED {
            err.get_or_insert(i);
            utf8::push_bad(out, &text[i..i + 1], mode);
        } else {
            utf8::push_code(out, u32::from(code));
        }
    }
    err.map_or(text.len(), |e| e)
}

/// Encode UTF-8 into a single-byte repertoire, with last-chance
/// substitution for anything the table cannot express.
pub(crate) fn from_utf8(cs: CharacterSet, text: &[u8], out: &mut Vec<u8>) -> usize {
    let data = tables::reverse_for(cs).unwrap_or(tables::RV_ASCII);
    let table = ReverseTable::new(data);
    let mut err: Option<usize> = None;
    let mut i = 0;
    while i < text.len() {
        let last = i;
        let code = utf8::next_code(text, &mut i);
        let t = table.get(code);
        if t < UNMAPPED {
            out.push(t as u8);
        } else if !utf8::last_chance(text, last, out) {
            err.get_or_insert(last);
        }
    }
    err.map_or(text.len(), |e| e)
}

/// Substitutions from the Windows code pages for bytes 0x80..=0x9F, used
/// when decoding strings that claim an ISO 8859 set but were produced on
/// Windows.
static WINDOWS_CODES: [u16; 32] = [
    0x20AC, 0xFFFD, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160,
    0x2039, 0x0152, 0xFFFD, 0x017D, 0xFFFD, 0xFFFD, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022,
    0x2013, 0x2014, 0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0xFFFD, 0x017E, 0x0178,
];

/// Bitmap of the `WINDOWS_CODES` entries recognised for a character set.
fn windows_codes_used(cs: CharacterSet) -> u32 {
    match cs {
        CharacterSet::ISO_IR_100 => 0xDFFE_5FFD, // CP1252, latin-1
        CharacterSet::ISO_IR_148 => 0x9FFE_1FFD, // CP1254, turkish
        CharacterSet::ISO_IR_166 => 0x00FE_0021, // CP874, thai
        _ => 0,
    }
}

/// Decode an ISO 8859 set, consulting the Windows code-page substitutions
/// for the C1 range.
pub(crate) fn iso8859_to_utf8(
    cs: CharacterSet,
    text: &[u8],
    out: &mut Vec<u8>,
    mode: ErrorMode,
) -> usize {
    let data = tables::table_for(cs).unwrap_or(tables::TABLE_ASCII);
    let table = CompressedTable::new(data);
    let used = windows_codes_used(cs);
    let mut err: Option<usize> = None;
    for (i, &b) in text.iter().enumerate() {
        if b & 0x80 == 0 {
            out.push(b);
            continue;
        }
        let mut code = table.get(u16::from(b));
        if b < 0xA0 {
            let w = b - 0x80;
            if (1u32 << w) & used != 0 {
                code = WINDOWS_CODES[w as usize];
            }
        }
        if code == UNMAPPED {
            err.get_or_insert(i);
            utf8::push_bad(out, &text[i..i + 1], mode);
        } else {
            utf8::push_code(out, u32::from(code));
        }
    }
    err.map_or(text.len(), |e| e)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(cs: CharacterSet, text: &[u8]) -> (String, usize) {
        let mut out = Vec::new();
        let n = iso8859_to_utf8(cs, text, &mut out, ErrorMode::Replace);
        (String::from_utf8(out).unwrap(), n)
    }

    #[test]
    fn latin_1() {
        let (s, n) = decode(CharacterSet::ISO_IR_100, b"caf\xE9");
        assert_eq!(s, "café");
        assert_eq!(n, 4);
    }

    #[test]
    fn cyrillic() {
        let (s, n) = decode(CharacterSet::ISO_IR_144, b"\xBC\xE0\xB2\xE0");
        assert_eq!(s, "МрВр");
        assert_eq!(n, 4);
    }

    #[test]
    fn windows_extensions_in_c1_range() {
        // CP1252 euro sign and en dash are honoured for latin-1
        let (s, n) = decode(CharacterSet::ISO_IR_100, b"\x80\x96");
        assert_eq!(s, "\u{20AC}\u{2013}");
        assert_eq!(n, 2);
        // but not for latin-2, which keeps the C1 controls
        let (s, _) = decode(CharacterSet::ISO_IR_101, b"\x80");
        assert_eq!(s, "\u{0080}");
    }

    #[test]
    fn thai() {
        let (s, n) = decode(CharacterSet::ISO_IR_166, b"\xA1\xD4");
        assert_eq!(s, "\u{0E01}\u{0E34}");
        assert_eq!(n, 2);
    }

    #[test]
    fn unmapped_byte_reports_position() {
        // 0xA5 is unassigned in ISO 8859-3
        let (s, n) = decode(CharacterSet::ISO_IR_109, b"ab\xA5cd");
        assert_eq!(s, "ab\u{FFFD}cd");
        assert_eq!(n, 2);
    }

    #[test]
    fn greek_round_trip() {
        let mut bytes = Vec::new();
        let n = from_utf8(CharacterSet::ISO_IR_126, "αβγΩ".as_bytes(), &mut bytes);
        assert_eq!(n, "αβγΩ".len());
        let (s, _) = decode(CharacterSet::ISO_IR_126, &bytes);
        assert_eq!(s, "αβγΩ");
    }

    #[test]
    fn last_chance_substitution_on_encode() {
        let mut bytes = Vec::new();
        let text = "a\u{201C}b\u{201D}\u{2026}";
        let n = from_utf8(CharacterSet::ISO_IR_100, text.as_bytes(), &mut bytes);
        assert_eq!(n, text.len());
        assert_eq!(bytes, b"a\"b\"...");
    }

    #[test]
    fn unencodable_reports_position() {
        let mut bytes = Vec::new();
        let text = "ab\u{4E00}cd";
        let n = from_utf8(CharacterSet::ISO_IR_100, text.as_bytes(), &mut bytes);
        assert_eq!(bytes, b"ab?cd");
        assert_eq!(n, 2);
    }
}
