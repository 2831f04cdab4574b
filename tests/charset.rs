//! End-to-end tests over the public character set API.

use dicom_charset::{CharacterSet, ErrorMode};

fn round_trip(cs: CharacterSet, text: &str) -> Vec<u8> {
    let (bytes, n) = cs.from_utf8(text.as_bytes());
    assert_eq!(n, text.len(), "encoding {:?} under {}", text, cs);
    let (back, n) = cs.to_utf8(&bytes, ErrorMode::Replace);
    assert_eq!(n, bytes.len(), "decoding {:?} under {}", bytes, cs);
    assert_eq!(back, text.as_bytes());
    bytes
}

#[test]
fn resolution_and_rendering() {
    let cs = CharacterSet::from_code("ISO 2022 IR 100\\ISO 2022 IR 144");
    assert!(cs.is_iso2022());
    // the first value fixes the initial G1 designation
    assert_eq!(
        cs.key() & 0x1F,
        CharacterSet::ISO_IR_100.key(),
        "initial designation comes from the first value"
    );
    // and resolve(render(key)) is the identity
    assert_eq!(CharacterSet::from_code(&cs.code()), cs);

    for code in [
        "ISO_IR 100",
        "ISO_IR 192",
        "GB18030",
        "GBK",
        "\\ISO 2022 IR 149",
        "\\ISO 2022 IR 58",
        "ISO 2022 IR 13\\ISO 2022 IR 87",
    ]
    .iter()
    {
        let cs = CharacterSet::from_code(code);
        assert_ne!(cs, CharacterSet::UNKNOWN, "{}", code);
        assert_eq!(CharacterSet::from_code(&cs.code()), cs, "{}", code);
    }
}

#[test]
fn shift_jis_decoding() {
    let cs = CharacterSet::from_code("sjis");
    let (out, n) = cs.to_utf8(&[0x82, 0xA0, 0x82, 0xA2, 0x82, 0xA4], ErrorMode::Replace);
    assert_eq!(n, 6);
    assert_eq!(out, "あいう".as_bytes());
}

#[test]
fn euc_kr_hangul_forms() {
    let cs = CharacterSet::from_code("euc-kr");

    // a syllable with a precomposed KS X 1001 code stays two bytes
    let (bytes, n) = cs.from_utf8("한".as_bytes());
    assert_eq!(n, 3);
    assert_eq!(bytes, &[0xC7, 0xD1]);

    // one without gets the 8-byte jamo spelling, and comes back composed
    let (bytes, n) = cs.from_utf8("\u{BD81}".as_bytes());
    assert_eq!(n, 3);
    assert_eq!(bytes, &[0xA4, 0xD4, 0xA4, 0xB2, 0xA4, 0xCC, 0xA4, 0xA1]);
    let (back, n) = cs.to_utf8(&bytes, ErrorMode::Replace);
    assert_eq!(n, 8);
    assert_eq!(back, "\u{BD81}".as_bytes());
}

#[test]
fn gb18030_canonical_replacement() {
    let cs = CharacterSet::from_code("GB18030");
    let (out, n) = cs.to_utf8(&[0x84, 0x31, 0xA4, 0x37], ErrorMode::Replace);
    assert_eq!(n, 4, "the canonical U+FFFD code is not an error");
    assert_eq!(out, "\u{FFFD}".as_bytes());
}

#[test]
fn iso_2022_jp_mixing() {
    let cs = CharacterSet::from_code("\\ISO 2022 IR 87");
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"\x1B$B");
    bytes.extend_from_slice(&[0x46, 0x7C, 0x4B, 0x5C, 0x38, 0x6C]);
    bytes.extend_from_slice(b"\x1B(B");
    bytes.extend_from_slice(b"ASCII");
    let (out, n) = cs.to_utf8(&bytes, ErrorMode::Replace);
    assert_eq!(n, bytes.len());
    assert_eq!(out, "日本語ASCII".as_bytes());
}

#[test]
fn case_folding() {
    let cs = CharacterSet::from_code("ISO_IR 192");
    assert_eq!(cs.case_folded("Straße".as_bytes()), "strasse");
    assert_eq!(cs.case_folded("ΑΒΓ".as_bytes()), "αβγ");
}

#[test]
fn backslash_scanning() {
    let cs = CharacterSet::from_code("GB18030");
    // 0x5C as the trail byte of a double-byte character is skipped; the
    // next free-standing backslash is the delimiter
    assert_eq!(cs.next_backslash(&[0xC4, 0x5C, 0x5C, 0x41]), 2);
    assert_eq!(cs.count_backslashes(&[0xC4, 0x5C, 0x5C, 0x41]), 1);
    // with no real delimiter the scan runs to the end
    assert_eq!(cs.next_backslash(&[0xC4, 0x5C, 0x41]), 3);
}

#[test]
fn console_safe_escaping() {
    let cs = CharacterSet::from_code("ISO_IR 192");
    assert_eq!(cs.to_safe_utf8(b"a\\b\x07c"), "a\\134b\\007c");
}

#[test]
fn byte_round_trips_through_utf8() {
    // byte strings representable in the encoding survive decode + encode
    let cases: &[(&str, &[u8])] = &[
        ("ISO_IR 100", b"caf\xE9 au lait"),
        ("ISO_IR 144", b"\xBF\xE0\xDE\xD4\xDD"),
        ("ISO_IR 126", b"\xC4\xE5\xEB\xF4\xDF\xEF"),
        ("sjis", &[0x93, 0xFA, 0x96, 0x7B, 0x8C, 0xEA, 0xB1]),
        ("euc-kr", &[0xC7, 0xD1, 0xB1, 0xB9, 0xBE, 0xEE]),
        ("gb18030", &[0xD6, 0xD0, 0xCE, 0xC4, 0x81, 0x30, 0x84, 0x36]),
        ("big5", &[0xA4, 0xA4, 0xA4, 0xE5]),
        ("euc-jp", &[0xA4, 0xCB, 0xA4, 0xDB, 0xA4, 0xF3, 0x8E, 0xB6]),
    ];
    for (code, bytes) in cases {
        let cs = CharacterSet::from_code(code);
        let (utf8, n) = cs.to_utf8(bytes, ErrorMode::Replace);
        assert_eq!(n, bytes.len(), "decode {:?} under {}", bytes, cs);
        let (back, n) = cs.from_utf8(&utf8);
        assert_eq!(n, utf8.len(), "encode back under {}", cs);
        assert_eq!(&back, bytes, "round trip under {}", cs);
    }
}

#[test]
fn text_round_trips_through_legacy_sets() {
    round_trip(CharacterSet::from_code("ISO_IR 101"), "Příliš žluťoučký");
    round_trip(CharacterSet::from_code("ISO_IR 144"), "Пациент жив");
    round_trip(CharacterSet::from_code("ISO_IR 166"), "ภาษาไทย");
    round_trip(CharacterSet::from_code("sjis"), "画像診断、ﾒﾓ");
    round_trip(CharacterSet::from_code("euc-kr"), "영상의학과 \u{BD81}");
    round_trip(CharacterSet::from_code("gbk"), "影像诊断");
    round_trip(CharacterSet::from_code("gb18030"), "影像诊断\u{1F30D}");
    round_trip(CharacterSet::from_code("big5"), "影像診斷");
    round_trip(
        CharacterSet::from_code("ISO 2022 IR 13\\ISO 2022 IR 87"),
        "ﾔﾏﾀﾞ^ﾀﾛｳ=山田^太郎",
    );
    round_trip(CharacterSet::from_code("\\ISO 2022 IR 149"), "김희중");
}

#[test]
fn error_modes() {
    let cs = CharacterSet::from_code("ISO_IR 6");
    let (out, n) = cs.to_utf8(b"a\x80b", ErrorMode::Ignore);
    assert_eq!((out.as_slice(), n), (b"ab".as_ref(), 1));
    let (out, n) = cs.to_utf8(b"a\x80b", ErrorMode::Replace);
    assert_eq!((out.as_slice(), n), ("a\u{FFFD}b".as_bytes(), 1));
    let (out, n) = cs.to_utf8(b"a\x80b", ErrorMode::Escape);
    assert_eq!(n, 1);
    // the escaped form keeps the source byte recoverable
    assert_eq!(out, [b'a', 0xED, 0xB2, 0x80, b'b']);
}

#[test]
fn truncated_multibyte_is_distinguished() {
    let cs = CharacterSet::from_code("ISO_IR 192");
    // truncated at end of input: soft error, loop ends cleanly
    let (out, n) = cs.to_utf8(b"ab\xE3\x81", ErrorMode::Replace);
    assert_eq!(n, 2);
    assert_eq!(out, b"ab");
    // malformed in the middle: replaced
    let (out, n) = cs.to_utf8(b"ab\xE3\x81c", ErrorMode::Replace);
    assert_eq!(n, 2);
    assert_eq!(out, "ab\u{FFFD}c".as_bytes());
}

#[test]
fn strict_wrappers() {
    let cs = CharacterSet::from_code("ISO_IR 100");
    assert_eq!(cs.decode(b"M\xFCller").unwrap(), "Müller");
    assert!(cs.decode(&[0xA5, 0xFF]).is_ok()); // all of latin-1 decodes
    assert!(CharacterSet::from_code("ISO_IR 6").decode(b"\xFF").is_err());
    assert!(cs.encode("日本語").is_err());
}

#[test]
fn display_names() {
    assert_eq!(CharacterSet::from_code("").to_string(), "ISO_IR 6");
    assert_eq!(
        CharacterSet::from_code("\\ISO 2022 IR 149").to_string(),
        "ISO 2022 IR 6\\ISO 2022 IR 149"
    );
    assert_eq!(CharacterSet::from_code("nonsense").to_string(), "Unknown");
}
