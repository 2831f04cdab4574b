//! Traditional Chinese: Big5 with the ETEN extensions.

use crate::table::{CompressedTable, ReverseTable, UNMAPPED};
use crate::tables;
use crate::utf8::{self, ErrorMode};

const NOT_MAPPED: u32 = UNMAPPED as u32;

/// Table keys whose code points lie beyond the BMP.
fn astral_code(t: u16) -> Option<u32> {
    tables::BIG5_ASTRAL
        .binary_search_by_key(&t, |p| p.0)
        .ok()
        .map(|i| tables::BIG5_ASTRAL[i].1)
}

fn astral_key(code: u32) -> Option<u16> {
    tables::BIG5_ASTRAL
        .iter()
        .find(|p| p.1 == code)
        .map(|p| p.0)
}

/// Decode Big5.
pub(crate) fn big5_to_utf8(text: &[u8], out: &mut Vec<u8>, mode: ErrorMode) -> usize {
    let table = CompressedTable::new(tables::TABLE_BIG5);
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
        let x = u16::from(c);
        if (0x81..=0xFE).contains(&x) && i < text.len() {
            let y = u16::from(text[i]);
            if (0x40..=0x7E).contains(&y) || (0xA1..=0xFE).contains(&y) {
                i += 1;
                let offset = if y < 0x7F { 0x40 } else { 0x62 };
                let t = (x - 0x81) * 157 + (y - offset);
                code = match astral_code(t) {
                    Some(astral) => astral,
                    None => u32::from(table.get(t)),
                };
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

/// Encode UTF-8 as Big5.
pub(crate) fn utf8_to_big5(text: &[u8], out: &mut Vec<u8>) -> usize {
    let table = ReverseTable::new(tables::RV_BIG5);
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
        if t >= UNMAPPED {
            // the table stops at the BMP; a few compatibility codes live
            // beyond it
            if let Some(key) = astral_key(code) {
                t = key;
            }
        }
        if t < 19782 {
            let x = 0x81 + (t / 157) as u8;
            let mut y = 0x40 + (t % 157) as u8;
            if y >= 0x7F {
                y += 0x22;
            }
            out.push(x);
            out.push(y);
            continue;
        }
        if !utf8::last_chance(text, last, out) {
            err.get_or_insert(last);
        }
    }
    err.map_or(text.len(), |e| e)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(text: &str) -> Vec<u8> {
        let mut bytes = Vec::new();
        assert_eq!(utf8_to_big5(text.as_bytes(), &mut bytes), text.len());
        let mut back = Vec::new();
        assert_eq!(big5_to_utf8(&bytes, &mut back, ErrorMode::Replace), bytes.len());
        assert_eq!(back, text.as_bytes());
        bytes
    }

    #[test]
    fn common_hanzi() {
        let bytes = round_trip("中文字");
        assert_eq!(&bytes[..2], &[0xA4, 0xA4]);
    }

    #[test]
    fn low_and_high_trail_bytes() {
        // trail bytes straddle the 0x7E/0xA1 gap
        round_trip("一乙丁");
    }

    #[test]
    fn unmapped_byte_pair() {
        let mut out = Vec::new();
        let n = big5_to_utf8(&[0xA4, 0xA4, 0x80, 0x41], &mut out, ErrorMode::Replace);
        assert_eq!(n, 2);
        assert_eq!(out, "中\u{FFFD}A".as_bytes());
    }

    #[test]
    fn symbol_rows() {
        round_trip("，。？±");
    }
}
