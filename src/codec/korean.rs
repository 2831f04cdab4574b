//! Korean: EUC-KR over KS X 1001, with the CP949 hangul extensions and the
//! 8-byte jamo sequences used for syllables that KS X 1001 cannot compose.

use crate::table::{CompressedTable, ReverseTable, UNMAPPED};
use crate::tables;
use crate::utf8::{self, ErrorMode};

const NOT_MAPPED: u32 = UNMAPPED as u32;

/// Jamo-row offsets of the 19 leading consonants.
static JAMO_L: [u8; 19] = [
    0, 1, 3, 6, 7, 8, 16, 17, 18, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29,
];
/// Jamo-row offsets of the 27 trailing consonants; index 0 is the filler.
static JAMO_T: [u8; 28] = [
    51, 0, 1, 2, 3, 4, 5, 6, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 19, 20, 21, 22, 23, 25, 26,
    27, 28, 29,
];
/// Leading-consonant index + 1 for each jamo-row byte, 0 when the byte is
/// not a leading consonant.
static JAMO_L_INV: [u8; 52] = [
    1, 2, 0, 3, 0, 0, 4, 5, 6, 0, 0, 0, 0, 0, 0, 0, 7, 8, 9, 0, 10, 11, 12, 13, 14, 15, 16, 17,
    18, 19, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 20,
];
/// Trailing-consonant index + 1 for each jamo-row byte.
static JAMO_T_INV: [u8; 52] = [
    2, 3, 4, 5, 6, 7, 8, 0, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 0, 19, 20, 21, 22, 23, 0, 24,
    25, 26, 27, 28, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
];

/// The 2350 precomposed KS X 1001 hangul, in table order (ascending).
fn hangul_block() -> &'static [u16] {
    &CompressedTable::new(tables::TABLE_EUCKR).block(1410)[..2350]
}

/// Decode EUC-KR (and CP949 for compatibility).
pub(crate) fn euckr_to_utf8(text: &[u8], out: &mut Vec<u8>, mode: ErrorMode) -> usize {
    let table = CompressedTable::new(tables::TABLE_EUCKR);
    let hangul = hangul_block();

    let mut err: Option<usize> = None;
    let mut i = 0;
    while i < text.len() {
        let last = i;
        let mut code = NOT_MAPPED;
        let x = u16::from(text[i]);
        i += 1;
        if x <= 0x7F {
            code = u32::from(x);
        } else if (0x81..0xFF).contains(&x) && i < text.len() {
            let y = u16::from(text[i]);
            if x >= 0xA1 && (0xA1..0xFF).contains(&y) {
                code = u32::from(table.get((x - 0xA1) * 94 + (y - 0xA1)));
                i += 1;

                // hangul spelled as an 8-byte jamo sequence?
                if x == 0xA4
                    && y == 0xD4
                    && text.len() - i >= 6
                    && text[i] == 0xA4
                    && text[i + 1] >= 0xA1
                    && text[i + 2] == 0xA4
                    && text[i + 3] >= 0xA1
                    && text[i + 4] == 0xA4
                    && text[i + 5] >= 0xA1
                {
                    let y1 = text[i + 1];
                    let y2 = text[i + 3];
                    let y3 = text[i + 5];
                    if (0xA1..=0xD4).contains(&y1)
                        && JAMO_L_INV[(y1 - 0xA1) as usize] != 0
                        && (0xBF..=0xD4).contains(&y2)
                        && (0xA1..=0xD4).contains(&y3)
                        && JAMO_T_INV[(y3 - 0xA1) as usize] != 0
                    {
                        i += 6;
                        let l = u32::from(JAMO_L_INV[(y1 - 0xA1) as usize]) - 1;
                        let v = u32::from(y2) - 0xBF;
                        let t = u32::from(JAMO_T_INV[(y3 - 0xA1) as usize]) - 1;
                        if l < 19 && v < 21 {
                            code = 0xAC00 + (l * 21 + v) * 28 + t;
                            if hangul.binary_search(&(code as u16)).is_ok() {
                                // the syllable has a precomposed KS X 1001
                                // form, so decode the sequence as
                                // compatibility jamo to keep it byte-exact
                                utf8::push_code(out, 0x3164);
                                utf8::push_code(out, 0x3090 + u32::from(y1));
                                utf8::push_code(out, 0x3090 + u32::from(y2));
                                code = 0x3090 + u32::from(y3);
                            }
                        } else if l < 19 || v < 21 || t > 0 {
                            // partial syllable, decomposed with fillers
                            code = if l < 19 { 0x1100 + l } else { 0x115F };
                            utf8::push_code(out, code);
                            code = if v < 21 { 0x1161 + v } else { 0x1160 };
                            if t > 0 {
                                utf8::push_code(out, code);
                                code = 0x11A7 + t;
                            }
                        } else {
                            // nothing but fillers
                            utf8::push_code(out, 0x3164);
                            utf8::push_code(out, 0x3164);
                            utf8::push_code(out, 0x3164);
                            code = 0x3164;
                        }
                    }
                }
            } else if (0x41..=0x5A).contains(&y)
                || (0x61..=0x7A).contains(&y)
                || (0x81..0xFF).contains(&y)
            {
                // CP949 hangul extension
                let a = x - 0x81;
                let mut b = y - 0x41;
                if b >= 26 {
                    b -= 6;
                    if b >= 52 {
                        b -= 6;
                    }
                }
                let idx = if a < 32 { a * 178 + b } else { a * 84 + b + 3008 };
                if idx < 8822 {
                    code = u32::from(table.get(idx + 8836));
                    i += 1;
                }
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

/// Encode UTF-8 as EUC-KR; hangul outside KS X 1001 become 8-byte jamo
/// sequences.
pub(crate) fn utf8_to_euckr(text: &[u8], out: &mut Vec<u8>) -> usize {
    let table = ReverseTable::new(tables::RV_EUCKR);

    let mut err: Option<usize> = None;
    let mut i = 0;
    while i < text.len() {
        let last = i;
        let code = utf8::next_code(text, &mut i);
        if code < 0x80 {
            out.push(code as u8);
            continue;
        }
        let t = table.get(code);
        if t < 8836 {
            out.push(0xA1 + (t / 94) as u8);
            out.push(0xA1 + (t % 94) as u8);
            continue;
        }
        if (0xAC00..=0xD7A3).contains(&code) {
            let z = code - 0xAC00;
            let t = z % 28;
            let z = z / 28;
            let v = z % 21;
            let l = z / 21;
            out.push(0xA4);
            out.push(0xD4);
            out.push(0xA4);
            out.push(0xA1 + JAMO_L[l as usize]);
            out.push(0xA4);
            out.push(0xBF + v as u8);
            out.push(0xA4);
            out.push(0xA1 + JAMO_T[t as usize]);
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
        assert_eq!(utf8_to_euckr(text.as_bytes(), &mut bytes), text.len());
        let mut back = Vec::new();
        assert_eq!(euckr_to_utf8(&bytes, &mut back, ErrorMode::Replace), bytes.len());
        assert_eq!(back, text.as_bytes());
        bytes
    }

    #[test]
    fn ks_x_1001_hangul_is_two_bytes() {
        let bytes = round_trip("한국어");
        assert_eq!(bytes, &[0xC7, 0xD1, 0xB1, 0xB9, 0xBE, 0xEE]);
    }

    #[test]
    fn missing_syllable_uses_jamo_sequence() {
        // U+BD81 has no precomposed form in KS X 1001
        let bytes = round_trip("\u{BD81}");
        assert_eq!(bytes, &[0xA4, 0xD4, 0xA4, 0xB2, 0xA4, 0xCC, 0xA4, 0xA1]);
    }

    #[test]
    fn jamo_sequence_for_present_syllable_stays_byte_exact() {
        // a sequence composing 학, which does exist in KS X 1001: the
        // decoder must emit compatibility jamo so the bytes survive
        let bytes = [0xA4, 0xD4, 0xA4, 0xBE, 0xA4, 0xBF, 0xA4, 0xA1];
        let mut decoded = Vec::new();
        assert_eq!(euckr_to_utf8(&bytes, &mut decoded, ErrorMode::Replace), 8);
        let s = String::from_utf8(decoded.clone()).unwrap();
        assert_eq!(s, "\u{3164}\u{314E}\u{314F}\u{3131}");
        let mut back = Vec::new();
        assert_eq!(utf8_to_euckr(&decoded, &mut back), decoded.len());
        assert_eq!(back, bytes);
    }

    #[test]
    fn cp949_extension_decodes() {
        // 0x81 0x41 is the first Unified Hangul Code extension slot
        let mut out = Vec::new();
        let n = euckr_to_utf8(&[0x81, 0x41], &mut out, ErrorMode::Replace);
        assert_eq!(n, 2);
        let s = String::from_utf8(out).unwrap();
        let c = s.chars().next().unwrap() as u32;
        assert!((0xAC00..=0xD7A3).contains(&c));
    }

    #[test]
    fn hanja_and_symbols() {
        round_trip("漢字±×");
    }
}
