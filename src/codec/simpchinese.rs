//! Simplified Chinese: GB2312, GBK, and GB18030 with its four-byte plane.

use crate::table::{CompressedTable, ReverseTable, UNMAPPED};
use crate::tables;
use crate::utf8::{self, ErrorMode};

const NOT_MAPPED: u32 = UNMAPPED as u32;

/// Table key for a two-byte sequence, covering the GB2312 rows and the
/// GBK regions 3, 4 and 5.
fn two_byte_key(x: u16, y: u16) -> u16 {
    let mut b = y;
    if b > 0x7F {
        b -= 1;
    }
    if x < 0xA1 {
        (x - 0x81) * 190 + (b - 0x40) + 8836
    } else if y < 0xA1 {
        (x - 0xA1) * 96 + (b - 0x40) + 8836 + 6080
    } else {
        (x - 0xA1) * 94 + (y - 0xA1)
    }
}

/// The two-byte codes assigned to code points beyond the BMP.
fn astral_code(t: u16) -> Option<u32> {
    tables::GB18030_ASTRAL
        .binary_search_by_key(&t, |p| p.0)
        .ok()
        .map(|i| tables::GB18030_ASTRAL[i].1)
}

fn astral_key(code: u32) -> Option<u16> {
    tables::GB18030_ASTRAL
        .iter()
        .find(|p| p.1 == code)
        .map(|p| p.0)
}

/// Write a two-byte code for table key `t` (< 23940).
fn push_two_byte(out: &mut Vec<u8>, t: u16) {
    let (x, y) = if t < 8836 {
        (0xA1 + (t / 94) as u8, 0xA1 + (t % 94) as u8)
    } else if t < 8836 + 6080 {
        let t = t - 8836;
        let mut y = 0x40 + (t % 190) as u8;
        if y >= 0x7F {
            y += 1;
        }
        (0x81 + (t / 190) as u8, y)
    } else {
        let t = t - (8836 + 6080);
        let mut y = 0x40 + (t % 96) as u8;
        if y >= 0x7F {
            y += 1;
        }
        (0xA1 + (t / 96) as u8, y)
    };
    out.push(x);
    out.push(y);
}

/// Decode GB2312.
pub(crate) fn gb2312_to_utf8(text: &[u8], out: &mut Vec<u8>, mode: ErrorMode) -> usize {
    let table = CompressedTable::new(tables::TABLE_GB2312);
    let mut err: Option<usize> = None;
    let mut i = 0;
    while i < text.len() {
        let last = i;
        let c = text[i];
        i += 1;
        if c & 0x80 == 0 {
            out.push(c);
            continue;
        }
        let mut code = NOT_MAPPED;
        let a = u16::from(c);
        if (0xA1..0xFF).contains(&a) && i < text.len() {
            let b = u16::from(text[i]);
            if (0xA1..0xFF).contains(&b) {
                code = u32::from(table.get((a - 0xA1) * 94 + (b - 0xA1)));
                i += 1;
            }
        }
        if code == NOT_MAPPED {
            utf8::push_bad(out, &text[last..i], mode);
            err.get_or_insert(last);
        } else {
            utf8::push_code(out, code);
        }
    }
    err.map_or(text.len(), |e| e)
}

/// Encode UTF-8 as GB2312.
pub(crate) fn utf8_to_gb2312(text: &[u8], out: &mut Vec<u8>) -> usize {
    let table = ReverseTable::new(tables::RV_GB18030);
    let table2 = ReverseTable::new(tables::RV_GB2312);
    let mut err: Option<usize> = None;
    let mut i = 0;
    while i < text.len() {
        let last = i;
        let code = utf8::next_code(text, &mut i);
        if code < 0x80 {
            out.push(code as u8);
            continue;
        }
        let mut t = table.get(code);
        if t >= 8836 {
            // compatibility mappings restricted to the GB2312 rows
            t = table2.get(code);
        }
        if t < 8836 {
            out.push(0xA1 + (t / 94) as u8);
            out.push(0xA1 + (t % 94) as u8);
            continue;
        }
        if !utf8::last_chance(text, last, out) {
            err.get_or_insert(last);
        }
    }
    err.map_or(text.len(), |e| e)
}

/// Decode GBK (two-byte only).
pub(crate) fn gbk_to_utf8(text: &[u8], out: &mut Vec<u8>, mode: ErrorMode) -> usize {
    let table = CompressedTable::new(tables::TABLE_GB18030);
    let mut err: Option<usize> = None;
    let mut i = 0;
    while i < text.len() {
        let last = i;
        let c = text[i];
        i += 1;
        if c & 0x80 == 0 {
            out.push(c);
            continue;
        }
        let mut code = NOT_MAPPED;
        let a = u16::from(c);
        if (0x81..0xFF).contains(&a) && i < text.len() {
            let b = u16::from(text[i]);
            if (0x40..0xFF).contains(&b) && b != 0x7F {
                let t = two_byte_key(a, b);
                code = u32::from(table.get(t));
                if code == NOT_MAPPED {
                    if let Some(astral) = astral_code(t) {
                        code = astral;
                    }
                }
                i += 1;
            }
        }
        if code == NOT_MAPPED {
            utf8::push_bad(out, &text[last..i], mode);
            err.get_or_insert(last);
        } else {
            utf8::push_code(out, code);
        }
    }
    err.map_or(text.len(), |e| e)
}

/// Encode UTF-8 as GBK.
pub(crate) fn utf8_to_gbk(text: &[u8], out: &mut Vec<u8>) -> usize {
    let table = ReverseTable::new(tables::RV_GB18030);
    let table2 = ReverseTable::new(tables::RV_GBK);
    let mut err: Option<usize> = None;
    let mut i = 0;
    while i < text.len() {
        let last = i;
        let code = utf8::next_code(text, &mut i);
        if code < 0x80 {
            out.push(code as u8);
            continue;
        }
        let mut t = table.get(code);
        if t == UNMAPPED {
            t = match astral_key(code) {
                Some(t) => t,
                None => 23940,
            };
        }
        if t > 23940 {
            // a GB18030 code too large for GBK; try the GBK-only mappings
            t = table2.get(code);
        }
        if t < 23940 {
            push_two_byte(out, t);
            continue;
        }
        if !utf8::last_chance(text, last, out) {
            err.get_or_insert(last);
        }
    }
    err.map_or(text.len(), |e| e)
}

/// Decode GB18030, including the four-byte codes.
pub(crate) fn gb18030_to_utf8(text: &[u8], out: &mut Vec<u8>, mode: ErrorMode) -> usize {
    let table = CompressedTable::new(tables::TABLE_GB18030);
    let mut err: Option<usize> = None;
    let mut i = 0;
    while i < text.len() {
        let last = i;
        let c = text[i];
        i += 1;
        if c & 0x80 == 0 {
            out.push(c);
            continue;
        }
        if i == text.len() {
            err.get_or_insert(last);
            break;
        }
        let mut code = NOT_MAPPED;
        let a0 = u16::from(c);
        if (0x81..0xFF).contains(&a0) {
            let b0 = u16::from(text[i]);
            if (0x30..0xFF).contains(&b0) && b0 != 0x7F {
                i += 1;
                if b0 >= 0x40 {
                    // two-byte character
                    let t = two_byte_key(a0, b0);
                    code = u32::from(table.get(t));
                    if code == NOT_MAPPED {
                        if let Some(astral) = astral_code(t) {
                            code = astral;
                        }
                    }
                } else if i + 1 < text.len()
                    && (0x81..0xFF).contains(&u16::from(text[i]))
                    && text[i + 1].is_ascii_digit()
                {
                    // four-byte character
                    let x = u16::from(text[i]);
                    let y = u16::from(text[i + 1]);
                    i += 2;
                    let a = (a0 - 0x81) * 10 + (b0 - 0x30);
                    let b = u32::from((x - 0x81) * 10 + (y - 0x30));
                    if a < 32 {
                        // BMP tail of the table
                        let t = u32::from(a) * 1260 + b + 23940;
                        code = u32::from(table.get(t as u16));
                    } else if a >= 150 {
                        // beyond the BMP, by plain arithmetic
                        let g = u32::from(a - 150) * 1260 + b;
                        if g <= 0xF_FFFF {
                            code = g + 0x1_0000;
                        }
                    }
                }
            }
        }
        // the four-byte code 84 31 A4 37 is the valid encoding of U+FFFD
        if code == NOT_MAPPED
            && !(i - last >= 4 && text[last..last + 4] == [0x84, 0x31, 0xA4, 0x37])
        {
            utf8::push_bad(out, &text[last..i], mode);
            err.get_or_insert(last);
        } else {
            utf8::push_code(out, code);
        }
    }
    err.map_or(text.len(), |e| e)
}

/// Encode UTF-8 as GB18030. Everything below U+10000 has either a two- or
/// four-byte code; the rest is reached by offset arithmetic.
pub(crate) fn utf8_to_gb18030(text: &[u8], out: &mut Vec<u8>) -> usize {
    let table = ReverseTable::new(tables::RV_GB18030);
    let mut err: Option<usize> = None;
    let mut i = 0;
    while i < text.len() {
        let last = i;
        let code = utf8::next_code(text, &mut i);
        if code < 0x80 {
            out.push(code as u8);
            continue;
        }

        let t4;
        if code <= 0xFFFD {
            let t = table.get(code);
            if t < 23940 {
                push_two_byte(out, t);
                continue;
            }
            if t == UNMAPPED {
                // nothing encodes the surrogate range
                if !utf8::last_chance(text, last, out) {
                    err.get_or_insert(last);
                }
                continue;
            }
            t4 = u32::from(t) - 23940;
        } else if code >= 0x1_0000 {
            if let Some(t) = astral_key(code) {
                // two-byte compatibility code
                push_two_byte(out, t);
                continue;
            }
            t4 = code - 0x1_0000 + 150 * 1260;
        } else {
            // the decoder sentinels have no encoding
            if !utf8::last_chance(text, last, out) {
                err.get_or_insert(last);
            }
            continue;
        }

        let a = t4 / 1260;
        let b = t4 % 1260;
        out.push(0x81 + (a / 10) as u8);
        out.push(0x30 + (a % 10) as u8);
        out.push(0x81 + (b / 10) as u8);
        out.push(0x30 + (b % 10) as u8);
    }
    err.map_or(text.len(), |e| e)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip_gb18030(text: &str) -> Vec<u8> {
        let mut bytes = Vec::new();
        assert_eq!(utf8_to_gb18030(text.as_bytes(), &mut bytes), text.len());
        let mut back = Vec::new();
        assert_eq!(
            gb18030_to_utf8(&bytes, &mut back, ErrorMode::Replace),
            bytes.len()
        );
        assert_eq!(back, text.as_bytes());
        bytes
    }

    #[test]
    fn gb2312_hanzi() {
        let mut out = Vec::new();
        let n = gb2312_to_utf8(&[0xD6, 0xD0, 0xCE, 0xC4], &mut out, ErrorMode::Replace);
        assert_eq!(n, 4);
        assert_eq!(out, "中文".as_bytes());
    }

    #[test]
    fn gb2312_round_trip() {
        let text = "简体字，中文。";
        let mut bytes = Vec::new();
        assert_eq!(utf8_to_gb2312(text.as_bytes(), &mut bytes), text.len());
        let mut back = Vec::new();
        assert_eq!(gb2312_to_utf8(&bytes, &mut back, ErrorMode::Replace), bytes.len());
        assert_eq!(back, text.as_bytes());
    }

    #[test]
    fn gbk_region_3() {
        // U+4E02 is in GBK region 3 but not GB2312
        let text = "\u{4E02}";
        let mut bytes = Vec::new();
        assert_eq!(utf8_to_gbk(text.as_bytes(), &mut bytes), text.len());
        assert_eq!(bytes[0], 0x81);
        let mut back = Vec::new();
        assert_eq!(gbk_to_utf8(&bytes, &mut back, ErrorMode::Replace), bytes.len());
        assert_eq!(back, text.as_bytes());
    }

    #[test]
    fn gb18030_four_byte_bmp() {
        // hebrew alef has no two-byte code, so it takes the four-byte form
        let bytes = round_trip_gb18030("\u{05D0}");
        assert_eq!(bytes.len(), 4);
    }

    #[test]
    fn gb18030_beyond_bmp() {
        let bytes = round_trip_gb18030("\u{1F30D}");
        assert_eq!(bytes.len(), 4);
        assert!(bytes[0] >= 0x90);
    }

    #[test]
    fn canonical_replacement_code_is_not_an_error() {
        let mut out = Vec::new();
        let n = gb18030_to_utf8(&[0x84, 0x31, 0xA4, 0x37], &mut out, ErrorMode::Replace);
        assert_eq!(n, 4);
        assert_eq!(out, "\u{FFFD}".as_bytes());
    }

    #[test]
    fn replacement_character_encodes_canonically() {
        let mut out = Vec::new();
        let n = utf8_to_gb18030("\u{FFFD}".as_bytes(), &mut out);
        assert_eq!(n, 3);
        assert_eq!(out, &[0x84, 0x31, 0xA4, 0x37]);
    }

    #[test]
    fn truncated_two_byte_reports_error() {
        let mut out = Vec::new();
        let n = gb18030_to_utf8(&[0x41, 0xB0], &mut out, ErrorMode::Replace);
        assert_eq!(n, 1);
        assert_eq!(out, b"A");
    }
}
