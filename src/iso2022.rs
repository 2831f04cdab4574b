//! ISO 2022 escape handling: character set designations, single shifts,
//! and the decoder and encoder built on them.
//!
//! SI/SO locking shifts are rejected, so this cannot read iso-2022-cn or
//! iso-2022-kr proper; it expects DICOM's 8-bit convention where the high
//! bit carries the shift status. A `CR LF` line ending resets the
//! designations to the initial state implied by the declared key.

use tracing::warn;

use crate::charset::CharacterSet;
use crate::codec::{japanese, korean, simpchinese};
use crate::registry;
use crate::utf8::{self, ErrorMode};

/// Designation state of one decoding pass.
#[derive(Debug, Clone)]
pub(crate) struct DesignationState {
    /// Character sets designated to G0 through G3.
    g: [CharacterSet; 4],
    /// Whether each slot holds a multi-byte set.
    multibyte: [bool; 4],
    /// Whether each slot holds a 96-character set (0xA0..=0xFF in GR).
    charset96: [bool; 4],
    /// Set when the declared key is not an ISO 2022 encoding at all; the
    /// whole stream is handed to that character set instead.
    alternate: Option<CharacterSet>,
}

impl Default for DesignationState {
    fn default() -> Self {
        DesignationState {
            g: [
                CharacterSet::ISO_2022_IR_6,
                CharacterSet::UNKNOWN,
                CharacterSet::UNKNOWN,
                CharacterSet::UNKNOWN,
            ],
            multibyte: [false; 4],
            charset96: [false; 4],
            alternate: None,
        }
    }
}

/// The initial designations for a declared key. DICOM does not start from
/// a blank slate: declaring ISO 2022 IR 13 designates JIS X 0201 to G1
/// (and its romaji half to G0) before any escape is seen.
fn init_state(cs: CharacterSet) -> DesignationState {
    let key = cs.key();
    let mut st = DesignationState::default();

    if key <= CharacterSet::ISO_2022_MAX_KEY {
        let mut g1 = key & CharacterSet::ISO_2022_BASE_MASK;
        if g1 >= CharacterSet::X_EUCKR.key() {
            // korean and chinese G1 sets are 94×94
            st.multibyte[1] = true;
        } else if g1 >= CharacterSet::ISO_IR_100.key() {
            // the ISO 8859 sets have 96 graphic characters
            st.charset96[1] = true;
        }
        if g1 <= CharacterSet::JP_BASE_MASK {
            // JIS X 0208 and 0212 wait for their escapes; only JIS X 0201
            // is designated up front
            g1 &= CharacterSet::ISO_IR_13.key();
            if g1 == CharacterSet::ISO_IR_13.key() {
                st.g[0] = CharacterSet::ISO_IR_13;
            }
        }
        st.g[1] = CharacterSet::from_key(g1);
    } else {
        st.alternate = Some(CharacterSet::from_key(key & !CharacterSet::ISO_2022_FLAG));
    }
    st
}

/// Length of an escape sequence, not counting the ESC byte: an optional
/// CSI parameter run, an intermediate run, then one final byte.
pub(crate) fn escape_len(text: &[u8]) -> usize {
    let mut l = 0;
    if !text.is_empty() && text[0] == b'[' {
        l += 1;
        while l < text.len() && (0x30..=0x3F).contains(&text[l]) {
            l += 1;
        }
    }
    while l < text.len() && (0x20..=0x2F).contains(&text[l]) {
        l += 1;
    }
    if l < text.len() && (0x40..=0x7E).contains(&text[l]) {
        l + 1
    } else {
        0
    }
}

/// Classification of one escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EscapeKind {
    /// Designate a character set to G0..G3; the final byte names it.
    Designate(usize),
    /// SS2 or SS3: apply G2 or G3 to the next character only.
    SingleShift(usize),
    /// Identify revised registration; legal only directly before another
    /// escape.
    Irr,
    /// An escape with no ISO 2022 meaning; echoed verbatim.
    Other,
    /// Everything rejected: announcers, control-set designations, locking
    /// shifts, other coding systems, malformed sequences.
    Error,
}

/// Classify an escape and update the per-slot designation flags.
pub(crate) fn classify_escape(esc: &[u8], st: &mut DesignationState) -> EscapeKind {
    match esc.len() {
        1 => match esc[0] {
            b'N' => EscapeKind::SingleShift(2),
            b'O' => EscapeKind::SingleShift(3),
            // locking shifts
            b'n' | b'o' | b'~' | b'}' | b'|' => EscapeKind::Error,
            _ => EscapeKind::Other,
        },
        2 => match esc[0] {
            b' ' | b'!' | b'"' | b'\'' | b',' | b'%' => EscapeKind::Error,
            b'&' => EscapeKind::Irr,
            b'$' => {
                st.multibyte[0] = true;
                EscapeKind::Designate(0)
            }
            b'(' => {
                st.multibyte[0] = false;
                EscapeKind::Designate(0)
            }
            b')' => {
                st.multibyte[1] = false;
                st.charset96[1] = false;
                EscapeKind::Designate(1)
            }
            b'*' => {
                st.multibyte[2] = false;
                st.charset96[2] = false;
                EscapeKind::Designate(2)
            }
            b'+' => {
                st.multibyte[3] = false;
                st.charset96[3] = false;
                EscapeKind::Designate(3)
            }
            b'-' => {
                st.multibyte[1] = false;
                st.charset96[1] = true;
                EscapeKind::Designate(1)
            }
            b'.' => {
                st.multibyte[2] = false;
                st.charset96[2] = true;
                EscapeKind::Designate(2)
            }
            b'/' => {
                st.multibyte[3] = false;
                st.charset96[3] = true;
                EscapeKind::Designate(3)
            }
            _ => EscapeKind::Other,
        },
        3 if esc[0] == b'$' => match esc[1] {
            b'(' => {
                st.multibyte[0] = true;
                EscapeKind::Designate(0)
            }
            b')' => {
                st.multibyte[1] = true;
                st.charset96[1] = false;
                EscapeKind::Designate(1)
            }
            b'*' => {
                st.multibyte[2] = true;
                st.charset96[2] = false;
                EscapeKind::Designate(2)
            }
            b'+' => {
                st.multibyte[3] = true;
                st.charset96[3] = false;
                EscapeKind::Designate(3)
            }
            b'-' => {
                st.multibyte[1] = true;
                st.charset96[1] = true;
                EscapeKind::Designate(1)
            }
            b'.' => {
                st.multibyte[2] = true;
                st.charset96[2] = true;
                EscapeKind::Designate(2)
            }
            b'/' => {
                st.multibyte[3] = true;
                st.charset96[3] = true;
                EscapeKind::Designate(3)
            }
            _ => EscapeKind::Error,
        },
        // other coding systems (such as UTF-8 via ESC %/I) are not taken
        3 if esc[0] == b'%' && esc[1] == b'/' => EscapeKind::Error,
        0 => EscapeKind::Error,
        _ => match esc[0] {
            0x20..=0x2F => EscapeKind::Error,
            _ => EscapeKind::Other,
        },
    }
}

/// Decode text that switches character sets with ISO 2022 escapes.
pub(crate) fn to_utf8(cs: CharacterSet, text: &[u8], out: &mut Vec<u8>, mode: ErrorMode) -> usize {
    let mut st = init_state(cs);
    let l = text.len();
    let mut n = l;
    let mut i = 0;

    while i < l {
        // scan to the next ESC or line control
        let mut j = i;
        while j < l {
            let b = text[j];
            if b == 0x1B || (0x0A..=0x0F).contains(&b) {
                break;
            }
            j += 1;
        }

        if i < j {
            let seg = &text[i..j];
            let m;
            if let Some(alt) = st.alternate {
                m = alt.any_to_utf8(seg, out, mode);
            } else if st.g[0] == CharacterSet::ISO_2022_IR_6 && st.g[1] != CharacterSet::ISO_IR_13
            {
                // G0 is plain ASCII; the segment is governed by G1
                let g1 = CharacterSet::from_key(st.g[1].key() & CharacterSet::ISO_2022_BASE_MASK);
                m = g1.any_to_utf8(seg, out, mode);
            } else if matches!(
                st.g[0],
                CharacterSet::ISO_IR_13
                    | CharacterSet::ISO_2022_IR_6
                    | CharacterSet::ISO_2022_IR_13
                    | CharacterSet::ISO_2022_IR_87
                    | CharacterSet::ISO_2022_IR_159
                    | CharacterSet::ISO_2022_IR_149
                    | CharacterSet::ISO_2022_IR_58
            ) {
                m = japanese::jisx_to_utf8(st.g[0], st.g[1], seg, out, mode);
            } else if st.multibyte[0] {
                // an unsupported multi-byte set in G0: keep only controls
                utf8::unknown_to_utf8(seg, out, mode);
                m = 0;
            } else {
                // some unrecognised ISO 646 variant; read it as ASCII
                m = utf8::ascii_to_utf8(seg, out, mode);
            }
            if m != j - i {
                utf8::set_error(&mut n, i + m);
            }
        }

        // pass control bytes through; CR LF resets the designations
        i = j;
        let mut prev = 0u8;
        while i < l && (0x0A..=0x0F).contains(&text[i]) {
            if text[i] == 0x0E || text[i] == 0x0F {
                // SI/SO shifting is not permitted
                utf8::set_error(&mut n, i);
            } else if prev == b'\r' && text[i] == b'\n' {
                st = init_state(cs);
            }
            prev = text[i];
            i += 1;
        }
        if j < i {
            out.extend_from_slice(&text[j..i]);
        }

        // escape sequences
        while i < l && text[i] == 0x1B {
            let save = i;
            i += 1;
            let len = escape_len(&text[i..]);
            let esc = &text[i..i + len];
            i += len;

            if st.alternate.is_some() {
                // the stream is not ISO 2022; hand escapes through
                out.push(0x1B);
                out.extend_from_slice(esc);
                break;
            }

            let mut fail = false;
            let mut shift = 0;
            match classify_escape(esc, &mut st) {
                EscapeKind::Designate(slot) => {
                    st.g[slot] = registry::charset_for_escape(esc);
                    fail = st.g[slot] == CharacterSet::UNKNOWN;
                }
                EscapeKind::SingleShift(slot) => {
                    shift = slot;
                    fail = st.g[slot] == CharacterSet::UNKNOWN;
                }
                EscapeKind::Irr => {
                    // ESC &@ may announce a revised registration for the
                    // escape that follows it
                    fail = esc.get(1) != Some(&b'@') || i == l || text[i] != 0x1B;
                }
                EscapeKind::Other => {
                    out.push(0x1B);
                    out.extend_from_slice(esc);
                }
                EscapeKind::Error => fail = true,
            }

            if !fail && shift != 0 {
                // single shift: decode one character from G2 or G3
                fail = true;
                if i < l {
                    let count = if st.multibyte[shift] { 2 } else { 1 };
                    let charset96 = st.charset96[shift];
                    let mut shifted = [0u8; 2];
                    let mut k = 0;
                    while i < l && k < count {
                        let gr = text[i] | 0x80;
                        if (0xA1..=0xFE).contains(&gr) || (charset96 && gr >= 0xA0) {
                            shifted[k] = gr;
                            i += 1;
                            k += 1;
                        } else {
                            break;
                        }
                    }
                    if k > 0 {
                        fail = false;
                        let m = st.g[shift].any_to_utf8(&shifted[..k], out, mode);
                        if m != count {
                            utf8::set_error(&mut n, i - k + m);
                        }
                    }
                }
            }

            if fail {
                // echo the rejected escape and flag its position
                warn!("unsupported escape sequence at offset {}", save);
                out.push(0x1B);
                out.extend_from_slice(esc);
                utf8::set_error(&mut n, save);
            }
        }
    }

    n
}

/// Encode UTF-8 under an ISO 2022 key.
pub(crate) fn from_utf8(cs: CharacterSet, text: &[u8], out: &mut Vec<u8>) -> usize {
    let key = cs.key();

    // iso-2022-jp and friends
    if key & (CharacterSet::JP_BASE_MASK | CharacterSet::ISO_2022_FLAG) == key {
        return japanese::utf8_to_jisx(cs, text, out);
    }

    // korean and chinese G1 designations, emitted line by line
    if cs == CharacterSet::ISO_2022_IR_149 || cs == CharacterSet::ISO_2022_IR_58 {
        let escape: &[u8] = if cs == CharacterSet::ISO_2022_IR_58 {
            b"\x1B$)A"
        } else {
            b"\x1B$)C"
        };
        let l = text.len();
        let mut n = l;
        let mut i = 0;
        while i < l {
            let mut j = i;
            let mut seen = 0u8;
            while j < l && !is_end_line(text[j]) {
                seen |= text[j];
                j += 1;
            }
            while j < l && is_end_line(text[j]) {
                j += 1;
            }
            let line = &text[i..j];
            if seen & 0x80 == 0 {
                // plain ASCII lines need no designator
                out.extend_from_slice(line);
            } else {
                out.extend_from_slice(escape);
                let m = if cs == CharacterSet::ISO_2022_IR_58 {
                    simpchinese::utf8_to_gb2312(line, out)
                } else {
                    korean::utf8_to_euckr(line, out)
                };
                if m < line.len() {
                    utf8::set_error(&mut n, i + m);
                }
            }
            i = j;
        }
        return n;
    }

    // single-byte sets carry no escapes at all
    crate::codec::singlebyte::from_utf8(
        CharacterSet::from_key(key ^ CharacterSet::ISO_2022_FLAG),
        text,
        out,
    )
}

fn is_end_line(b: u8) -> bool {
    (0x0A..=0x0D).contains(&b)
}

/// The ISO 2022 arm of the backslash scan: escapes, single-shifted
/// characters and G0 multi-byte pairs never contain a value delimiter.
/// This must track designations the same way the decoder does.
pub(crate) fn next_backslash(text: &[u8]) -> usize {
    let mut st = DesignationState::default();
    let mut g2 = CharacterSet::UNKNOWN;
    let mut g3 = CharacterSet::UNKNOWN;
    let mut shiftcount = 0usize;
    let mut charset96 = false;

    let mut i = 0;
    while i < text.len() && text[i] != 0 {
        let b = text[i];
        if b == 0x1B {
            i += 1;
            shiftcount = 0;
            let len = escape_len(&text[i..]);
            let esc = &text[i..i + len];
            match classify_escape(esc, &mut st) {
                EscapeKind::Designate(2) => g2 = registry::charset_for_escape(esc),
                EscapeKind::Designate(3) => g3 = registry::charset_for_escape(esc),
                EscapeKind::SingleShift(2) => {
                    if g2 != CharacterSet::UNKNOWN {
                        shiftcount = if st.multibyte[2] { 2 } else { 1 };
                        charset96 = st.charset96[2];
                    }
                }
                EscapeKind::SingleShift(3) => {
                    if g3 != CharacterSet::UNKNOWN {
                        shiftcount = if st.multibyte[3] { 2 } else { 1 };
                        charset96 = st.charset96[3];
                    }
                }
                _ => {}
            }
            // walk the escape, but never past a backslash inside it
            for _ in 0..len {
                if text[i] == b'\\' {
                    break;
                }
                i += 1;
            }
        } else if is_end_line(b) {
            let mut prev = text[i];
            i += 1;
            while i < text.len() && is_end_line(text[i]) {
                if prev == b'\r' && text[i] == b'\n' {
                    st = DesignationState::default();
                    g2 = CharacterSet::UNKNOWN;
                    g3 = CharacterSet::UNKNOWN;
                    shiftcount = 0;
                }
                prev = text[i];
                i += 1;
            }
        } else if shiftcount > 0 {
            // octets of a single-shifted character
            let gl = b & 0x7F;
            if (0x21..=0x7E).contains(&gl) || (charset96 && gl >= 0x20) {
                i += 1;
                shiftcount -= 1;
            } else {
                shiftcount = 0;
            }
        } else if st.multibyte[0] {
            // with a multi-byte G0 set, a backslash octet is half a
            // character
            i += 1;
        } else if b != b'\\' {
            i += 1;
        } else {
            break;
        }
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(cs: CharacterSet, text: &[u8]) -> (Vec<u8>, usize) {
        let mut out = Vec::new();
        let n = to_utf8(cs, text, &mut out, ErrorMode::Replace);
        (out, n)
    }

    #[test]
    fn iso_2022_jp_segments() {
        let cs = CharacterSet::from_code("ISO 2022 IR 87");
        let bytes = b"\x1B$B\x46\x7C\x4B\x5C\x38\x6C\x1B(BASCII";
        let (out, n) = decode(cs, bytes);
        assert_eq!(n, bytes.len());
        assert_eq!(out, "日本語ASCII".as_bytes());
    }

    #[test]
    fn iso_2022_jp_round_trip() {
        let cs = CharacterSet::from_code("ISO 2022 IR 87");
        let text = "日本語ASCII、つづく";
        let mut bytes = Vec::new();
        assert_eq!(from_utf8(cs, text.as_bytes(), &mut bytes), text.len());
        let (out, n) = decode(cs, &bytes);
        assert_eq!(n, bytes.len());
        assert_eq!(out, text.as_bytes());
    }

    #[test]
    fn katakana_designations() {
        // IR 13: G1 is JIS X 0201 katakana, G0 its romaji half
        let cs = CharacterSet::from_code("ISO 2022 IR 13");
        let (out, n) = decode(cs, &[0xB6, 0xC0, 0xB6, 0xC5, 0x41]);
        assert_eq!(n, 5);
        assert_eq!(out, "ｶﾀｶﾅA".as_bytes());
    }

    #[test]
    fn korean_g1_designation() {
        let cs = CharacterSet::from_code("\\ISO 2022 IR 149");
        let bytes = b"\x1B$)C\xC7\xD1\xB1\xB9";
        let (out, n) = decode(cs, bytes);
        assert_eq!(n, bytes.len());
        assert_eq!(out, "한국".as_bytes());
    }

    #[test]
    fn korean_encoder_prepends_designator_per_line() {
        let cs = CharacterSet::from_code("\\ISO 2022 IR 149");
        let mut bytes = Vec::new();
        let text = "한국\r\nabc\r\n한";
        assert_eq!(from_utf8(cs, text.as_bytes(), &mut bytes), text.len());
        let s = bytes;
        assert!(s.starts_with(b"\x1B$)C"));
        // the pure-ASCII line takes no escape; the next hangul line does
        assert_eq!(&s[8..15], b"\r\nabc\r\n");
        assert_eq!(&s[15..19], b"\x1B$)C");
    }

    #[test]
    fn crlf_resets_designations() {
        let cs = CharacterSet::from_code("ISO 2022 IR 87");
        // LF alone keeps the JIS X 0208 designation
        let (out, n) = decode(cs, b"\x1B$B\x46\x7C\n\x46\x7C");
        assert_eq!(n, 8);
        assert_eq!(out, "日\n日".as_bytes());
        // CR LF drops back to ASCII, making the same bytes letters
        let (out, n) = decode(cs, b"\x1B$B\x46\x7C\r\n\x46\x7C");
        assert_eq!(n, 9);
        assert_eq!(out, "日\r\nF|".as_bytes());
    }

    #[test]
    fn si_so_rejected() {
        let cs = CharacterSet::from_code("\\ISO 2022 IR 149");
        let (_, n) = decode(cs, b"ab\x0Ecd");
        assert_eq!(n, 2);
    }

    #[test]
    fn unknown_escape_is_echoed_and_flagged() {
        let cs = CharacterSet::from_code("ISO 2022 IR 87");
        let (out, n) = decode(cs, b"ab\x1B(Xcd");
        assert_eq!(n, 2);
        assert_eq!(out, b"ab\x1B(Xcd");
    }

    #[test]
    fn single_shift_latin() {
        // designate ISO 8859-1 to G2, then shift one character in
        let cs = CharacterSet::from_code("ISO 2022 IR 100");
        let bytes = b"a\x1B.A\x1BN\x69b";
        let (out, n) = decode(cs, bytes);
        assert_eq!(n, bytes.len());
        assert_eq!(out, "aéb".as_bytes());
    }

    #[test]
    fn backslash_scan_skips_escapes_and_shifts() {
        // the 0x5C octets inside the kanji pair are not delimiters
        let bytes = b"\x1B$B\x4B\x5C\x1B(B\\x";
        assert_eq!(next_backslash(bytes), 8);
    }
}
