//! Japanese character sets: Shift_JIS in its Windows-31J form, EUC-JP, and
//! the JIS X 0201/0208/0212 helper shared with the ISO 2022 machinery.

use crate::charset::CharacterSet;
use crate::table::{CompressedTable, JisxReverseTable, ReverseTable, UNMAPPED};
use crate::tables;
use crate::utf8::{self, ErrorMode};

const NOT_MAPPED: u32 = UNMAPPED as u32;

/// Decode Shift_JIS (CP932).
pub(crate) fn sjis_to_utf8(text: &[u8], out: &mut Vec<u8>, mode: ErrorMode) -> usize {
    let table = CompressedTable::new(tables::TABLE_SJIS);
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
        if (0xA1..=0xDF).contains(&x) {
            // half-width katakana
            code = u32::from(x) + 0xFEC0;
        } else if x != 0x80 && x != 0xA0 && x <= 0xFC && i < text.len() {
            let y = u16::from(text[i]);
            if (0x40..=0xFC).contains(&y) && y != 0x7F {
                let (row_half, cell) = if y < 0x9F {
                    (0, y - if y < 0x7F { 0x40 } else { 0x41 })
                } else {
                    (1, y - 0x9F)
                };
                let lead_rows = if x <= 0x9F { x - 0x81 } else { x - 0xC1 };
                let a = lead_rows * 2 + row_half;
                code = u32::from(table.get(a * 94 + cell));
                i += 1;
                if x == 0x81 {
                    // code page 932 values for the lead 0x81 punctuation
                    code = match y {
                        0x5C => 0x2015, // HORIZONTAL BAR
                        0x5F => 0xFF3C, // FULLWIDTH REVERSE SOLIDUS
                        0x60 => 0xFF5E, // FULLWIDTH TILDE
                        0x61 => 0x2225, // PARALLEL TO
                        0x7C => 0xFF0D, // FULLWIDTH HYPHEN-MINUS
                        0x91 => 0xFFE0, // FULLWIDTH CENT SIGN
                        0x92 => 0xFFE1, // FULLWIDTH POUND SIGN
                        0xCA => 0xFFE2, // FULLWIDTH NOT SIGN
                        _ => code,
                    };
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

/// Encode UTF-8 as Shift_JIS (CP932).
pub(crate) fn utf8_to_sjis(text: &[u8], out: &mut Vec<u8>) -> usize {
    let table = JisxReverseTable::new(tables::RV_JISX);
    let table2 = ReverseTable::new(tables::RV_SJIS);
    let mut err: Option<usize> = None;
    let mut i = 0;
    while i < text.len() {
        let last = i;
        let code = utf8::next_code(text, &mut i);
        if code < 0x80 {
            // ASCII proper, not JIS X 0201 romaji
            out.push(code as u8);
            continue;
        }
        if (0xFF61..=0xFF9F).contains(&code) {
            out.push((code - 0xFEC0) as u8);
            continue;
        }
        // JIS X 0208 if below 8836; JIS X 0212 has no Shift_JIS form, so
        // those fall back to the CP932 compatibility table
        let mut t = table.get(code);
        if t >= 8836 {
            t = table2.get(code);
        }
        if t < 11280 {
            let x = t / 94;
            let y = t % 94;
            let mut trail = y as u8;
            if x & 1 == 0 {
                trail += 0x40;
                if trail >= 0x7F {
                    trail += 1;
                }
            } else {
                trail += 0x9F;
            }
            let mut lead = 0x81 + (x / 2) as u8;
            if lead >= 0xA0 {
                lead += 64;
            }
            out.push(lead);
            out.push(trail);
            continue;
        }
        if !utf8::last_chance(text, last, out) {
            err.get_or_insert(last);
        }
    }
    err.map_or(text.len(), |e| e)
}

/// Decode EUC-JP (JIS X 0201, 0208 and 0212 over the UNIX packing).
pub(crate) fn eucjp_to_utf8(text: &[u8], out: &mut Vec<u8>, mode: ErrorMode) -> usize {
    let jisx0208 = CompressedTable::new(tables::TABLE_JISX0208);
    let jisx0212 = CompressedTable::new(tables::TABLE_JISX0212);
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
        if (0x80..0xFF).contains(&x) && i < text.len() {
            let y = u16::from(text[i]);
            if (0xA1..0xFF).contains(&y) {
                if x >= 0xA1 {
                    code = u32::from(jisx0208.get((x - 0xA1) * 94 + (y - 0xA1)));
                    i += 1;
                } else if x == 0x8F {
                    if i + 1 == text.len() {
                        break;
                    }
                    let y2 = u16::from(text[i + 1]);
                    if (0xA1..0xFF).contains(&y2) {
                        code = u32::from(jisx0212.get((y - 0xA1) * 94 + (y2 - 0xA1)));
                        i += 2;
                    }
                } else if x == 0x8E && y <= 0xDF {
                    code = u32::from(y) + 0xFEC0;
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
    err.map_or(i, |e| e)
}

/// Encode UTF-8 as EUC-JP.
pub(crate) fn utf8_to_eucjp(text: &[u8], out: &mut Vec<u8>) -> usize {
    let table = JisxReverseTable::new(tables::RV_JISX);
    let mut err: Option<usize> = None;
    let mut i = 0;
    while i < text.len() {
        let last = i;
        let code = utf8::next_code(text, &mut i);
        if code < 0x80 {
            out.push(code as u8);
            continue;
        }
        if (0xFF61..=0xFF9F).contains(&code) {
            out.push(0x8E);
            out.push((code - 0xFEC0) as u8);
            continue;
        }
        let mut t = table.get(code);
        if t < 2 * 8836 {
            if t >= 8836 {
                // JIS X 0212 takes a 0x8F prefix byte
                out.push(0x8F);
                t -= 8836;
            }
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

/// Decode one ISO 2022 segment with the given G0 and G1 designations.
/// This is the helper behind iso-2022-jp-2 and the G0 forms of the Korean
/// and Chinese 94×94 sets.
pub(crate) fn jisx_to_utf8(
    cs_gl: CharacterSet,
    cs_gr: CharacterSet,
    text: &[u8],
    out: &mut Vec<u8>,
    mode: ErrorMode,
) -> usize {
    let data = tables::table_for(cs_gl).unwrap_or(tables::TABLE_ASCII);
    let table = CompressedTable::new(data);
    let multibyte = matches!(
        cs_gl,
        CharacterSet::ISO_2022_IR_87
            | CharacterSet::ISO_2022_IR_159
            | CharacterSet::ISO_2022_IR_149
            | CharacterSet::ISO_2022_IR_58
    );

    let mut err: Option<usize> = None;
    let mut i = 0;
    while i < text.len() {
        let last = i;
        let mut code = NOT_MAPPED;
        let mut a = u16::from(text[i]);
        i += 1;
        if (0x21..0x7F).contains(&a) {
            let mut good = true;
            if multibyte {
                if i < text.len() && (0x21..0x7F).contains(&text[i]) {
                    let b = u16::from(text[i]);
                    i += 1;
                    a = (a - 0x21) * 94 + (b - 0x21);
                } else {
                    good = false;
                }
            } else if cs_gl == CharacterSet::ISO_2022_IR_13 {
                // half-width katakana designated to GL
                a += 0x80;
            }
            if good {
                code = u32::from(table.get(a));
            }
        } else if a <= 0x7F {
            // control codes, space, delete
            code = u32::from(a);
        } else if cs_gr == CharacterSet::ISO_IR_13 && (0xA1..=0xDF).contains(&a) {
            // half-width katakana in GR
            code = u32::from(a) + 0xFEC0;
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

/// Encode UTF-8 as ISO-2022-JP, emitting designator escapes as the
/// repertoire switches between JIS X 0201/ASCII, JIS X 0208 and JIS X 0212.
pub(crate) fn utf8_to_jisx(cs: CharacterSet, text: &[u8], out: &mut Vec<u8>) -> usize {
    let table = JisxReverseTable::new(tables::RV_JISX);
    let table2 = ReverseTable::new(tables::RV_SJIS);

    let has_0201 = cs.contains(CharacterSet::ISO_IR_13);
    let has_0208 = cs.contains(CharacterSet::ISO_2022_IR_87);
    let has_0212 = cs.contains(CharacterSet::ISO_2022_IR_159);
    let esc_base: &[u8] = if has_0201 { b"\x1B(J" } else { b"\x1B(B" };
    const ESC_0208: &[u8] = b"\x1B$B";
    const ESC_0212: &[u8] = b"\x1B$(D";

    // 0 = base set, 1 = JIS X 0208, 2 = JIS X 0212
    let mut state = 0u8;
    let mut err: Option<usize> = None;
    let mut i = 0;
    while i < text.len() {
        let last = i;
        let mut code = utf8::next_code(text, &mut i);
        if has_0201 {
            if (0xFF61..=0xFF9F).contains(&code) {
                out.push((code - 0xFEC0) as u8);
                continue;
            }
            // JIS X 0201 lacks backslash and tilde; their fullwidth forms
            // live in JIS X 0208/0212, and yen and macron take their slots
            if code == u32::from(b'\\') && has_0208 {
                code = 0xFF3C; // FULLWIDTH REVERSE SOLIDUS
            } else if code == u32::from(b'~') && has_0212 {
                code = 0xFF5E; // FULLWIDTH TILDE
            } else if code == 0xA5 && !has_0208 {
                code = u32::from(b'\\'); // YEN SIGN
            } else if code == 0x203E && !has_0212 {
                code = u32::from(b'~'); // MACRON
            }
        }

        if code < 0x80 {
            if state != 0 {
                out.extend_from_slice(esc_base);
                state = 0;
            }
            out.push(code as u8);
            continue;
        }

        if has_0208 || has_0212 {
            let mut t = table.get(code);
            if (8836..2 * 8836).contains(&t) && has_0212 {
                t -= 8836;
                if state != 2 {
                    out.extend_from_slice(ESC_0212);
                    state = 2;
                }
            } else if has_0208 {
                if t >= 8836
                    && ((0xFF61..=0xFF9F).contains(&code)
                        || code == 0xFF5E
                        || code == 0x5861
                        || code == 0x9830)
                {
                    // JIS X 0208 compatibility mappings
                    t = table2.get(code);
                }
                if t < 8836 && state != 1 {
                    out.extend_from_slice(ESC_0208);
                    state = 1;
                }
            }
            if t < 8836 {
                out.push(0x21 + (t / 94) as u8);
                out.push(0x21 + (t % 94) as u8);
                continue;
            }
        }

        // conversion failed; the replacement is ASCII, so restore the base
        // set first and roll the escape back if nothing was written
        let lastsize = out.len();
        out.extend_from_slice(esc_base);
        if !utf8::last_chance(text, last, out) {
            err.get_or_insert(last);
        }
        if out.len() == lastsize + 3 {
            out.truncate(lastsize);
        } else {
            state = 0;
        }
    }

    if state != 0 {
        out.extend_from_slice(esc_base);
    }
    err.map_or(text.len(), |e| e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sjis_hiragana() {
        let mut out = Vec::new();
        let n = sjis_to_utf8(&[0x82, 0xA0, 0x82, 0xA2, 0x82, 0xA4], &mut out, ErrorMode::Replace);
        assert_eq!(n, 6);
        assert_eq!(out, "あいう".as_bytes());
    }

    #[test]
    fn sjis_half_width_katakana() {
        let mut out = Vec::new();
        let n = sjis_to_utf8(&[0xB1, 0xB2], &mut out, ErrorMode::Replace);
        assert_eq!(n, 2);
        assert_eq!(out, "\u{FF71}\u{FF72}".as_bytes());
    }

    #[test]
    fn sjis_cp932_punctuation() {
        let mut out = Vec::new();
        sjis_to_utf8(&[0x81, 0x60], &mut out, ErrorMode::Replace);
        assert_eq!(out, "\u{FF5E}".as_bytes());
    }

    #[test]
    fn sjis_round_trip() {
        let text = "日本語とカタカナ、ｶﾀｶﾅ";
        let mut bytes = Vec::new();
        assert_eq!(utf8_to_sjis(text.as_bytes(), &mut bytes), text.len());
        let mut back = Vec::new();
        assert_eq!(sjis_to_utf8(&bytes, &mut back, ErrorMode::Replace), bytes.len());
        assert_eq!(back, text.as_bytes());
    }

    #[test]
    fn eucjp_all_three_repertoires() {
        // hiragana (0208), half-width katakana (0201), and a 0212 kanji
        let mut bytes = Vec::new();
        let text = "あ\u{FF71}\u{4E02}";
        assert_eq!(utf8_to_eucjp(text.as_bytes(), &mut bytes), text.len());
        assert_eq!(&bytes[..2], &[0xA4, 0xA2]);
        assert_eq!(bytes[2], 0x8E);
        assert_eq!(bytes[4], 0x8F);
        let mut back = Vec::new();
        assert_eq!(eucjp_to_utf8(&bytes, &mut back, ErrorMode::Replace), bytes.len());
        assert_eq!(back, text.as_bytes());
    }

    #[test]
    fn eucjp_truncated_input() {
        let mut out = Vec::new();
        let n = eucjp_to_utf8(&[0x41, 0xA4], &mut out, ErrorMode::Replace);
        assert_eq!(n, 1);
        assert_eq!(out, "A\u{FFFD}".as_bytes());
    }

    #[test]
    fn jisx_encoder_emits_designators() {
        let mut out = Vec::new();
        let cs = CharacterSet::from_key(
            CharacterSet::ISO_2022_IR_87.key() | CharacterSet::ISO_2022_IR_6.key(),
        );
        let n = utf8_to_jisx(cs, "日本語ABC".as_bytes(), &mut out);
        assert_eq!(n, "日本語ABC".len());
        assert!(out.starts_with(b"\x1B$B"));
        assert!(out.ends_with(b"\x1B(BABC"));
    }

    #[test]
    fn jisx_yen_takes_the_backslash_slot() {
        // in plain JIS X 0201, the yen sign is the 0x5C code
        let mut out = Vec::new();
        let n = utf8_to_jisx(CharacterSet::ISO_2022_IR_13, "\u{00A5}".as_bytes(), &mut out);
        assert_eq!(n, "\u{00A5}".len());
        assert_eq!(out, b"\\");
    }

    #[test]
    fn jisx_backslash_becomes_fullwidth_with_0208() {
        let cs = CharacterSet::from_key(
            CharacterSet::ISO_IR_13.key() | CharacterSet::ISO_2022_IR_87.key(),
        );
        let mut out = Vec::new();
        let n = utf8_to_jisx(cs, b"\\", &mut out);
        assert_eq!(n, 1);
        // the fullwidth reverse solidus, in JIS X 0208 via its escape
        assert!(out.starts_with(b"\x1B$B"));
    }

    #[test]
    fn jisx_segment_decoding() {
        let mut out = Vec::new();
        let n = jisx_to_utf8(
            CharacterSet::ISO_2022_IR_87,
            CharacterSet::ISO_IR_6,
            &[0x46, 0x7C, 0x4B, 0x5C],
            &mut out,
            ErrorMode::Replace,
        );
        assert_eq!(n, 4);
        assert_eq!(out, "日本".as_bytes());
    }
}
