//! UTF-8 primitives shared by all the decoders and encoders.
//!
//! The code point decoder reports two distinguished values instead of
//! failing: [`MALFORMED`] for an illegal sequence and [`TRUNCATED`] for a
//! well-formed prefix cut short by the end of input. Outer passes decide
//! what to do with them according to the [`ErrorMode`].

/// An illegal UTF-8 sequence (bad lead, overlong form, stray continuation
/// byte, value out of range).
pub(crate) const MALFORMED: u32 = 0xFFFF;
/// A multi-byte sequence that ran off the end of the input.
pub(crate) const TRUNCATED: u32 = 0xFFFE;

/// How undecodable input bytes are rendered in the UTF-8 output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMode {
    /// Drop the offending bytes.
    Ignore,
    /// Replace each offending sequence with U+FFFD.
    Replace,
    /// Keep each offending byte as the UTF-16 low surrogate U+DC00 + byte.
    ///
    /// The surrogates are not valid UTF-8, but they preserve the source
    /// bytes for diagnostics and can be rewritten later (see
    /// `CharacterSet::to_safe_utf8`).
    Escape,
}

/// Append one code point in UTF-8. Values beyond U+10FFFF are written as
/// the replacement character.
pub(crate) fn push_code(out: &mut Vec<u8>, code: u32) {
    if code <= 0x007F {
        out.push(code as u8);
    } else if code <= 0x07FF {
        out.push(0xC0 | (code >> 6) as u8);
        out.push(0x80 | (code & 0x3F) as u8);
    } else if code <= 0xFFFF {
        out.push(0xE0 | (code >> 12) as u8);
        out.push(0x80 | ((code >> 6) & 0x3F) as u8);
        out.push(0x80 | (code & 0x3F) as u8);
    } else if code <= 0x10_FFFF {
        out.push(0xF0 | (code >> 18) as u8);
        out.push(0x80 | ((code >> 12) & 0x3F) as u8);
        out.push(0x80 | ((code >> 6) & 0x3F) as u8);
        out.push(0x80 | (code & 0x3F) as u8);
    } else {
        out.extend_from_slice("\u{FFFD}".as_bytes());
    }
}

/// Decode one UTF-8 sequence starting at `*pos` (which must be in bounds)
/// and advance `*pos` past it.
///
/// Returns [`MALFORMED`] or [`TRUNCATED`] for bad input; bytes of an
/// invalid sequence that could not belong to it are left unconsumed. A
/// correctly encoded UTF-16 surrogate pair is combined into one code point
/// beyond the BMP; an isolated low surrogate decodes to itself.
pub(crate) fn next_code(text: &[u8], pos: &mut usize) -> u32 {
    let n = text.len();
    let mut i = *pos;
    let mut code = u32::from(text[i]);
    i += 1;

    if code & 0x80 != 0 {
        // 0 = malformed, negative = truncated, positive = good so far
        let mut good: i32 = 0;
        if code & 0xE0 == 0xC0 {
            // two bytes, U+0080 to U+07FF
            code = (code & 0x1F) << 6;
            if code & 0x0780 != 0 {
                good = -1;
                if i < n {
                    let s = u32::from(text[i]);
                    good = i32::from(s & 0xC0 == 0x80);
                    i += good as usize;
                    code |= s & 0x3F;
                }
            }
        } else if code & 0xF0 == 0xE0 {
            // three bytes, U+0800 to U+FFFF
            good = -1;
            if i < n {
                code = (code & 0x0F) << 6;
                let s = u32::from(text[i]);
                good = i32::from((code | (s & 0x20)) != 0 && s & 0xC0 == 0x80);
                if good != 0 {
                    good = -1;
                    i += 1;
                    code = (code | (s & 0x3F)) << 6;
                    if i < n {
                        let s = u32::from(text[i]);
                        good = i32::from(s & 0xC0 == 0x80);
                        i += good as usize;
                        code |= s & 0x3F;
                        if code & 0xFC00 == 0xD800 && good != 0 {
                            // high surrogate; pair it with a low surrogate
                            good = 0;
                            if i == n {
                                good = -1;
                            } else if text[i] == 0xED {
                                if i + 1 == n {
                                    good = -1;
                                } else if text[i + 1] & 0xF0 == 0xB0 {
                                    if i + 2 == n {
                                        good = -1;
                                    } else if text[i + 2] & 0xC0 == 0x80 {
                                        good = 1;
                                        code &= 0x03FF;
                                        code = (code << 4) | u32::from(text[i + 1] & 0x0F);
                                        code = (code << 6) | u32::from(text[i + 2] & 0x3F);
                                        code += 0x1_0000;
                                        i += 3;
                                    }
                                }
                            }
                        }
                    }
                }
            }
        } else if code & 0xF8 == 0xF0 {
            // four bytes, U+10000 to U+10FFFF
            good = -1;
            if i < n {
                code = (code & 0x07) << 6;
                let s = u32::from(text[i]);
                good = i32::from((code | (s & 0x30)) != 0 && s & 0xC0 == 0x80);
                if good != 0 {
                    good = -1;
                    i += 1;
                    if i < n {
                        code = (code | (s & 0x3F)) << 6;
                        let s = u32::from(text[i]);
                        good = i32::from(s & 0xC0 == 0x80);
                        if good != 0 {
                            good = -1;
                            i += 1;
                            if i < n {
                                code = (code | (s & 0x3F)) << 6;
                                let s = u32::from(text[i]);
                                good = i32::from(s & 0xC0 == 0x80);
                                i += good as usize;
                                code |= s & 0x3F;
                                if good != 0 && code > 0x10_FFFF {
                                    good = 0;
                                }
                            }
                        }
                    }
                }
            }
        }

        if good == 0 {
            code = MALFORMED;
        } else if good < 0 {
            code = TRUNCATED;
        }
    }

    *pos = i;
    code
}

/// Render an undecodable input run according to the error mode.
pub(crate) fn push_bad(out: &mut Vec<u8>, bad: &[u8], mode: ErrorMode) {
    match mode {
        ErrorMode::Ignore => {}
        ErrorMode::Replace => push_code(out, 0xFFFD),
        ErrorMode::Escape => {
            for &b in bad {
                push_code(out, 0xDC00 + u32::from(b));
            }
        }
    }
}

/// Validate UTF-8 input, writing a cleaned-up copy to `out`.
///
/// Genuine U+FFFE and U+FFFF in the input pass through; the same values
/// coming from the decoder sentinels mark errors. Surrogates (paired or
/// lone) pass through but flag the error position.
pub(crate) fn utf8_to_utf8(text: &[u8], out: &mut Vec<u8>, mode: ErrorMode) -> usize {
    let mut err: Option<usize> = None;
    let mut i = 0;
    while i < text.len() {
        let last = i;
        let code = next_code(text, &mut i);
        let n = i - last;
        let literal_noncharacter = n == 3
            && text[last] == 0xEF
            && text[last + 1] == 0xBF
            && u32::from(text[last + 2]) == (code ^ 0xFF40);
        if (TRUNCATED..=MALFORMED).contains(&code) && !literal_noncharacter {
            if code == MALFORMED {
                push_bad(out, &text[last..i], mode);
            }
            err.get_or_insert(last);
        } else {
            if n == 6 || code & 0xF800 == 0xD800 {
                // surrogates survive the round trip but are not clean UTF-8
                err.get_or_insert(last);
            }
            push_code(out, code);
        }
    }
    err.map_or(text.len(), |e| e)
}

/// Decode input expected to be ASCII.
pub(crate) fn ascii_to_utf8(text: &[u8], out: &mut Vec<u8>, mode: ErrorMode) -> usize {
    if text.is_ascii() {
        out.extend_from_slice(text);
        return text.len();
    }
    let mut err: Option<usize> = None;
    for (i, &b) in text.iter().enumerate() {
        if b <= 0x7F {
            out.push(b);
        } else {
            push_bad(out, &text[i..i + 1], mode);
            err.get_or_insert(i);
        }
    }
    err.map_or(text.len(), |e| e)
}

/// Decode a segment whose designated character set is unknown, assuming an
/// ISO-2022 94-character replacement set: controls and space survive,
/// everything graphic is undecodable. Always reports an error at offset 0.
pub(crate) fn unknown_to_utf8(text: &[u8], out: &mut Vec<u8>, mode: ErrorMode) {
    for (i, &b) in text.iter().enumerate() {
        if (0x21..0x7F).contains(&b) || b > 0x7F {
            push_bad(out, &text[i..i + 1], mode);
        } else {
            push_code(out, u32::from(b));
        }
    }
}

/// Substitute an inconvertible character with its closest ASCII form.
///
/// This runs after every other conversion attempt has failed, and mops up
/// the punctuation that "smart" text entry systems produce: wide or narrow
/// spaces, soft hyphens and invisible spaces, dashes, smart quotes,
/// ellipses, the fraction slash and the swung dash. The swung dash matters
/// for Japanese: JIS X 0201 + JIS X 0208 has no plain tilde, so swung dash
/// is its round-trip image. Everything else becomes `?` and an error;
/// the truncation sentinel vanishes but still counts as an error.
pub(crate) fn last_chance(text: &[u8], pos: usize, out: &mut Vec<u8>) -> bool {
    let mut i = pos;
    let code = next_code(text, &mut i);

    let (replacement, ok): (&str, bool) = match code {
        0xA0 | 0x2000..=0x200A | 0x202F => (" ", true),
        0xAD | 0x200B..=0x200D | 0x2060 => ("", true),
        0x2010..=0x2014 => ("-", true),
        0x2015 => ("--", true),
        0x2018..=0x201B => ("'", true),
        0x201C..=0x201F => ("\"", true),
        0x2026 => ("...", true),
        0x2044 => ("/", true),
        0x2053 => ("~", true),
        TRUNCATED => ("", false),
        _ => ("?", false),
    };

    out.extend_from_slice(replacement.as_bytes());
    ok
}

/// Append the octal escape `\nnn` for one byte.
pub(crate) fn push_octal(out: &mut Vec<u8>, b: u8) {
    out.push(b'\\');
    out.push(b'0' + (b >> 6));
    out.push(b'0' + ((b >> 3) & 7));
    out.push(b'0' + (b & 7));
}

/// Record the earliest error position.
pub(crate) fn set_error(err: &mut usize, pos: usize) {
    if pos < *err {
        *err = pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_one(text: &[u8]) -> (u32, usize) {
        let mut pos = 0;
        let code = next_code(text, &mut pos);
        (code, pos)
    }

    #[test]
    fn decodes_all_lengths() {
        assert_eq!(decode_one(b"A"), (0x41, 1));
        assert_eq!(decode_one(&[0xC3, 0xA9]), (0xE9, 2));
        assert_eq!(decode_one(&[0xE3, 0x81, 0x82]), (0x3042, 3));
        assert_eq!(decode_one(&[0xF0, 0x9F, 0x92, 0x96]), (0x1F496, 4));
    }

    #[test]
    fn rejects_overlong_forms() {
        assert_eq!(decode_one(&[0xC0, 0xAF]).0, MALFORMED);
        assert_eq!(decode_one(&[0xC1, 0xBF]).0, MALFORMED);
        assert_eq!(decode_one(&[0xE0, 0x9F, 0xBF]).0, MALFORMED);
        assert_eq!(decode_one(&[0xF0, 0x8F, 0xBF, 0xBF]).0, MALFORMED);
    }

    #[test]
    fn distinguishes_truncation_from_malformation() {
        assert_eq!(decode_one(&[0xE3, 0x81]).0, TRUNCATED);
        assert_eq!(decode_one(&[0xC3]).0, TRUNCATED);
        assert_eq!(decode_one(&[0x80]).0, MALFORMED);
        assert_eq!(decode_one(&[0xFE]).0, MALFORMED);
    }

    #[test]
    fn combines_encoded_surrogate_pairs() {
        // U+D83D U+DC96 encoded separately should combine to U+1F496
        let cesu = [0xED, 0xA0, 0xBD, 0xED, 0xB2, 0x96];
        assert_eq!(decode_one(&cesu), (0x1F496, 6));
    }

    #[test]
    fn lone_low_surrogate_decodes_to_itself() {
        assert_eq!(decode_one(&[0xED, 0xB0, 0x80]), (0xDC00, 3));
    }

    #[test]
    fn lone_high_surrogate_is_malformed() {
        assert_eq!(decode_one(&[0xED, 0xA0, 0xBD, 0x41]).0, MALFORMED);
    }

    #[test]
    fn validation_pass_flags_but_keeps_noncharacters() {
        let mut out = Vec::new();
        let n = utf8_to_utf8(&[0xEF, 0xBF, 0xBE], &mut out, ErrorMode::Replace);
        assert_eq!(n, 3);
        assert_eq!(out, &[0xEF, 0xBF, 0xBE]);
    }

    #[test]
    fn validation_pass_replaces_bad_bytes() {
        let mut out = Vec::new();
        let n = utf8_to_utf8(b"a\xFFb", &mut out, ErrorMode::Replace);
        assert_eq!(n, 1);
        assert_eq!(out, "a\u{FFFD}b".as_bytes());
    }

    #[test]
    fn escape_mode_stores_source_bytes() {
        let mut out = Vec::new();
        let n = utf8_to_utf8(b"\xFF", &mut out, ErrorMode::Escape);
        assert_eq!(n, 0);
        let mut pos = 0;
        assert_eq!(next_code(&out, &mut pos), 0xDCFF);
    }

    #[test]
    fn last_chance_punctuation() {
        let check = |input: &str, expected: &str, ok: bool| {
            let mut out = Vec::new();
            assert_eq!(last_chance(input.as_bytes(), 0, &mut out), ok);
            assert_eq!(out, expected.as_bytes());
        };
        check("\u{2019}", "'", true);
        check("\u{201C}", "\"", true);
        check("\u{2026}", "...", true);
        check("\u{2015}", "--", true);
        check("\u{2053}", "~", true);
        check("\u{00A0}", " ", true);
        check("\u{00AD}", "", true);
        check("\u{2044}", "/", true);
        check("\u{4E00}", "?", false);
    }

    #[test]
    fn octal_escapes() {
        let mut out = Vec::new();
        push_octal(&mut out, 0x07);
        push_octal(&mut out, b'\\');
        assert_eq!(out, b"\\007\\134");
    }
}
