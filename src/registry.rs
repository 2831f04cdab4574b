//! The character set registry: defined terms, common aliases, and ISO 2022
//! escape codes, with the parsing and rendering of Specific Character Set
//! values.

use crate::charset::CharacterSet;

/// One registered character set.
pub(crate) struct CharsetRow {
    /// The key, possibly carrying the ISO 2022 flag.
    pub key: CharacterSet,
    /// How this row participates in multi-valued Specific Character Set
    /// values: 0 = first position only, 1 = replaces from the second
    /// position, 2 = combines from the second or third position.
    pub flags: u8,
    /// The DICOM defined term.
    pub term: &'static str,
    /// The defined term of the ISO 2022 variant, when one exists.
    pub term_ext: &'static str,
    /// The ISO 2022 escape code that designates this set.
    pub escape: &'static [u8],
    /// Common names accepted as a fallback, all pre-case-folded.
    pub aliases: &'static [&'static str],
}

const ISO_IR_6_NAMES: &[&str] = &[
    "ansi_x3.4-1968",
    "ansi_x3.4-1986",
    "ascii",
    "iso-ir-6",
    "iso646-us",
    "us-ascii",
];

const ISO_IR_100_NAMES: &[&str] = &[
    "cp819",
    "csisolatin1",
    "ibm819",
    "iso-8859-1",
    "iso-ir-100",
    "iso8859-1",
    "iso88591",
    "iso_8859-1",
    "iso_8859-1:1987",
    "l1",
    "latin1",
    // documented but incorrect defined term
    "iso-ir 100",
];

const ISO_IR_101_NAMES: &[&str] = &[
    "csisolatin2",
    "iso-8859-2",
    "iso-ir-101",
    "iso8859-2",
    "iso88592",
    "iso_8859-2",
    "iso_8859-2:1987",
    "l2",
    "latin2",
    "iso-ir 101",
];

const ISO_IR_109_NAMES: &[&str] = &[
    "csisolatin3",
    "iso-8859-3",
    "iso-ir-109",
    "iso8859-3",
    "iso88593",
    "iso_8859-3",
    "iso_8859-3:1988",
    "l3",
    "latin3",
    "iso-ir 109",
];

const ISO_IR_110_NAMES: &[&str] = &[
    "csisolatin4",
    "iso-8859-4",
    "iso-ir-110",
    "iso8859-4",
    "iso88594",
    "iso_8859-4",
    "iso_8859-4:1988",
    "l4",
    "latin4",
    "iso-ir 110",
];

const ISO_IR_144_NAMES: &[&str] = &[
    "csisolatincyrillic",
    "cyrillic",
    "iso-8859-5",
    "iso-ir-144",
    "iso8859-5",
    "iso88595",
    "iso_8859-5",
    "iso_8859-5:1988",
    "iso-ir 144",
];

const ISO_IR_127_NAMES: &[&str] = &[
    "arabic",
    "asmo-708",
    "csiso88596e",
    "csiso88596i",
    "csisolatinarabic",
    "ecma-114",
    "iso-8859-6",
    "iso-8859-6-e",
    "iso-8859-6-i",
    "iso-ir-127",
    "iso8859-6",
    "iso88596",
    "iso_8859-6",
    "iso_8859-6:1987",
    "iso-ir 127",
];

const ISO_IR_126_NAMES: &[&str] = &[
    "csisolatingreek",
    "ecma-118",
    "elot_928",
    "greek",
    "greek8",
    "iso-8859-7",
    "iso-ir-126",
    "iso8859-7",
    "iso88597",
    "iso_8859-7",
    "iso_8859-7:1987",
    "sun_eu_greek",
    "iso-ir 126",
];

const ISO_IR_138_NAMES: &[&str] = &[
    "csiso88598e",
    "csisolatinhebrew",
    "hebrew",
    "iso-8859-8",
    "iso-8859-8-e",
    "iso-ir-138",
    "iso8859-8",
    "iso88598",
    "iso_8859-8",
    "iso_8859-8:1988",
    "iso-ir 138",
];

const ISO_IR_148_NAMES: &[&str] = &[
    "csisolatin5",
    "iso-8859-9",
    "iso-ir-148",
    "iso8859-9",
    "iso88599",
    "iso_8859-9",
    "iso_8859-9:1989",
    "l5",
    "latin5",
    "iso-ir 148",
];

const ISO_IR_166_NAMES: &[&str] = &[
    "dos-874",
    "iso-8859-11",
    "iso-ir-166",
    "iso8859-11",
    "iso885911",
    "tis-620",
];

const ISO_IR_13_NAMES: &[&str] = &["iso-ir-13", "iso-ir-14", "jis_x0201", "x0201"];

const ISO_2022_NAMES: &[&str] = &["iso-2022"];

const LATIN6_NAMES: &[&str] = &[
    "csisolatin6",
    "iso-8859-10",
    "iso-ir-157",
    "iso8859-10",
    "iso885910",
    "iso_8859-10",
    "l6",
    "latin6",
];

const LATIN7_NAMES: &[&str] = &[
    "csisolatin7",
    "iso-8859-13",
    "iso-ir-179",
    "iso8859-13",
    "iso885913",
    "iso_8859-13",
    "l7",
    "latin7",
];

const LATIN8_NAMES: &[&str] = &[
    "csisolatin8",
    "iso-8859-14",
    "iso-ir-199",
    "iso8859-14",
    "iso885914",
    "iso_8859-14",
    "l8",
    "latin8",
];

const LATIN9_NAMES: &[&str] = &[
    "csisolatin9",
    "iso-8859-15",
    "iso-ir-203",
    "iso8859-15",
    "iso885915",
    "iso_8859-15",
    "l9",
    "latin9",
];

const LATIN10_NAMES: &[&str] = &[
    "csisolatin10",
    "iso-8859-16",
    "iso-ir-226",
    "iso8859-16",
    "iso885916",
    "iso_8859-16",
    "l10",
    "latin10",
];

const ISO_IR_192_NAMES: &[&str] = &[
    "iso-ir-192",
    "unicode-1-1-utf-8",
    "utf-8",
    "utf8",
    "iso 2022 ir 192",
];

const GB18030_NAMES: &[&str] = &["gb18030"];

const GBK_NAMES: &[&str] = &["chinese", "gbk", "x-gbk", "iso 2022 gbk"];

const ISO_IR_58_NAMES: &[&str] = &[
    "csgb2312",
    "csiso58gb231280",
    "gb2312",
    "gb_2312",
    "gb_2312-80",
    "iso-ir-58",
    "iso 2022 gb2312",
];

const EUCKR_NAMES: &[&str] = &["cseuckr", "euc-kr", "windows-949"];

const ISO_IR_149_NAMES: &[&str] = &[
    "csksc56011987",
    "iso-ir-149",
    "iso_ir 149",
    "korean",
    "ks_c_5601-1987",
    "ks_c_5601-1989",
    "ksc5601",
    "ksc_5601",
];

const ISO_IR_87_NAMES: &[&str] = &[
    "csiso2022jp",
    "iso-2022-jp",
    "iso-ir-87",
    "iso2022_jp",
    "jis",
];

const ISO_IR_159_NAMES: &[&str] = &[
    "iso-2022-jp-1",
    "iso-2022-jp-2",
    "iso-ir-159",
    "iso2022_jp_1",
    "iso2022_jp_2",
];

const CP874_NAMES: &[&str] = &["windows-874"];
const CP1250_NAMES: &[&str] = &["cp1250", "windows-1250", "x-cp1250"];
const CP1251_NAMES: &[&str] = &["cp1251", "windows-1251", "x-cp1251"];
const CP1252_NAMES: &[&str] = &["cp1252", "windows-1252", "x-cp1252"];
const CP1253_NAMES: &[&str] = &["cp1253", "windows-1253", "x-cp1253"];
const CP1254_NAMES: &[&str] = &["cp1254", "windows-1254", "x-cp1254"];
const CP1255_NAMES: &[&str] = &["cp1255", "windows-1255", "x-cp1255"];
const CP1256_NAMES: &[&str] = &["cp1256", "windows-1256", "x-cp1256"];
const CP1257_NAMES: &[&str] = &["cp1257", "windows-1257", "x-cp1257"];
const CP1258_NAMES: &[&str] = &["cp1258", "windows-1258", "x-cp1258"];

const BIG5_NAMES: &[&str] = &[
    "b5",
    "big5",
    "big5-eten",
    "cn-big5",
    "csbig5",
    "x-x-big5",
    "iso 2022 b5",
    "iso 2022 big5",
];

const SJIS_NAMES: &[&str] = &[
    "csshiftjis",
    "ms932",
    "ms_kanji",
    "shift-jis",
    "shift_jis",
    "sjis",
    "windows-31j",
    "x-sjis",
];

const EUCJP_NAMES: &[&str] = &["cseucpkdfmtjapanese", "euc-jp", "x-euc-jp"];

const KOI8_NAMES: &[&str] = &["koi", "koi8"];

/// The registered character sets: the sets defined by the DICOM standard
/// plus the ones that turn up in legacy files.
pub(crate) static CHARSETS: [CharsetRow; 48] = [
    // the default repertoire
    row(CharacterSet::ISO_IR_6, 0, "ISO_IR 6", "ISO 2022 IR 6", b"", ISO_IR_6_NAMES),
    // the ISO 8859 sets, designated to G1
    row(CharacterSet::ISO_IR_100, 0, "ISO_IR 100", "ISO 2022 IR 100", b"-A", ISO_IR_100_NAMES),
    row(CharacterSet::ISO_IR_101, 0, "ISO_IR 101", "ISO 2022 IR 101", b"-B", ISO_IR_101_NAMES),
    row(CharacterSet::ISO_IR_109, 0, "ISO_IR 109", "ISO 2022 IR 109", b"-C", ISO_IR_109_NAMES),
    row(CharacterSet::ISO_IR_110, 0, "ISO_IR 110", "ISO 2022 IR 110", b"-D", ISO_IR_110_NAMES),
    row(CharacterSet::ISO_IR_144, 0, "ISO_IR 144", "ISO 2022 IR 144", b"-L", ISO_IR_144_NAMES),
    row(CharacterSet::ISO_IR_127, 0, "ISO_IR 127", "ISO 2022 IR 127", b"-G", ISO_IR_127_NAMES),
    row(CharacterSet::ISO_IR_126, 0, "ISO_IR 126", "ISO 2022 IR 126", b"-F", ISO_IR_126_NAMES),
    row(CharacterSet::ISO_IR_138, 0, "ISO_IR 138", "ISO 2022 IR 138", b"-H", ISO_IR_138_NAMES),
    row(CharacterSet::ISO_IR_148, 0, "ISO_IR 148", "ISO 2022 IR 148", b"-M", ISO_IR_148_NAMES),
    row(CharacterSet::ISO_IR_166, 0, "ISO_IR 166", "ISO 2022 IR 166", b"-T", ISO_IR_166_NAMES),
    // the ISO 2022 encodings of JIS
    row(CharacterSet::ISO_IR_13, 0, "ISO_IR 13", "ISO 2022 IR 13", b")I", ISO_IR_13_NAMES),
    row(CharacterSet::ISO_IR_13, 0, "ISO_IR 14", "ISO 2022 IR 14", b"(J", &[]),
    row(CharacterSet::ISO_IR_13, 0, "ISO_IR 14", "ISO 2022 IR 14", b"(H", &[]), // obsolete
    row(CharacterSet::ISO_2022_IR_6, 0, "ISO_IR 6", "ISO 2022 IR 6", b"(B", ISO_2022_NAMES),
    row(CharacterSet::ISO_2022_IR_13, 0, "ISO_IR 13", "ISO 2022 IR 13", b"(I", &[]),
    row(CharacterSet::ISO_2022_IR_87, 2, "ISO_IR 87", "ISO 2022 IR 87", b"$B", ISO_IR_87_NAMES),
    row(CharacterSet::ISO_2022_IR_87, 2, "ISO_IR 87", "ISO 2022 IR 87", b"$@", &[]), // obsolete
    row(CharacterSet::ISO_2022_IR_159, 2, "ISO_IR 159", "ISO 2022 IR 159", b"$(D", ISO_IR_159_NAMES),
    // other sets usable with ISO 2022
    row(CharacterSet::ISO_2022_IR_58, 1, "ISO_IR 58", "ISO 2022 IR 58", b"$A", ISO_IR_58_NAMES),
    row(CharacterSet::ISO_2022_IR_58, 1, "ISO_IR 58", "ISO 2022 IR 58", b"$(A", &[]),
    row(CharacterSet::X_GB2312, 1, "ISO_IR 58", "ISO 2022 IR 58", b"$)A", &[]),
    row(CharacterSet::ISO_2022_IR_149, 1, "ISO_IR 149", "ISO 2022 IR 149", b"$(C", ISO_IR_149_NAMES),
    row(CharacterSet::X_EUCKR, 1, "ISO_IR 149", "ISO 2022 IR 149", b"$)C", EUCKR_NAMES),
    // sets that iso-2022-jp-2 designates to G2
    row(CharacterSet::ISO_IR_100, 0, "ISO_IR 100", "ISO 2022 IR 100", b".A", ISO_IR_100_NAMES),
    row(CharacterSet::ISO_IR_126, 0, "ISO_IR 126", "ISO 2022 IR 126", b".F", ISO_IR_126_NAMES),
    // not ISO 2022 at all
    row(CharacterSet::ISO_IR_192, 0, "ISO_IR 192", "", b"%/I", ISO_IR_192_NAMES),
    row(CharacterSet::GB18030, 0, "GB18030", "", b"", GB18030_NAMES),
    row(CharacterSet::GBK, 0, "GBK", "", b"", GBK_NAMES),
    // the remainder are not DICOM standard
    row(CharacterSet::X_LATIN6, 0, "latin6", "", b"-V", LATIN6_NAMES),
    row(CharacterSet::X_LATIN7, 0, "latin7", "", b"-Y", LATIN7_NAMES),
    row(CharacterSet::X_LATIN8, 0, "latin8", "", b"-_", LATIN8_NAMES),
    row(CharacterSet::X_LATIN9, 0, "latin9", "", b"-b", LATIN9_NAMES),
    row(CharacterSet::X_LATIN10, 0, "latin10", "", b"-f", LATIN10_NAMES),
    row(CharacterSet::X_CP874, 0, "cp874", "", b"", CP874_NAMES),
    row(CharacterSet::X_CP1250, 0, "cp1250", "", b"", CP1250_NAMES),
    row(CharacterSet::X_CP1251, 0, "cp1251", "", b"", CP1251_NAMES),
    row(CharacterSet::X_CP1252, 0, "cp1252", "", b"", CP1252_NAMES),
    row(CharacterSet::X_CP1253, 0, "cp1253", "", b"", CP1253_NAMES),
    row(CharacterSet::X_CP1254, 0, "cp1254", "", b"", CP1254_NAMES),
    row(CharacterSet::X_CP1255, 0, "cp1255", "", b"", CP1255_NAMES),
    row(CharacterSet::X_CP1256, 0, "cp1256", "", b"", CP1256_NAMES),
    row(CharacterSet::X_CP1257, 0, "cp1257", "", b"", CP1257_NAMES),
    row(CharacterSet::X_CP1258, 0, "cp1258", "", b"", CP1258_NAMES),
    row(CharacterSet::X_BIG5, 0, "big5", "", b"", BIG5_NAMES),
    row(CharacterSet::X_SJIS, 0, "sjis", "", b"", SJIS_NAMES),
    row(CharacterSet::X_EUCJP, 0, "euc-jp", "", b"", EUCJP_NAMES),
    row(CharacterSet::X_KOI8, 0, "koi8", "", b"", KOI8_NAMES),
];

const fn row(
    key: CharacterSet,
    flags: u8,
    term: &'static str,
    term_ext: &'static str,
    escape: &'static [u8],
    aliases: &'static [&'static str],
) -> CharsetRow {
    CharsetRow {
        key,
        flags,
        term,
        term_ext,
        escape,
        aliases,
    }
}

/// The character set designated by an escape sequence, or `UNKNOWN`.
pub(crate) fn charset_for_escape(esc: &[u8]) -> CharacterSet {
    for r in CHARSETS.iter() {
        if r.escape.len() >= esc.len() && !esc.is_empty() && &r.escape[..esc.len()] == esc {
            return r.key;
        }
    }
    CharacterSet::UNKNOWN
}

/// Parse a Specific Character Set value: backslash-separated defined
/// terms, falling back to a case-insensitive search of the common names.
pub(crate) fn key_from_code(code: &str) -> CharacterSet {
    let mut key = CharacterSet::UNKNOWN.key();
    let mut found = false;

    let mut parts: Vec<&str> = code.split('\\').collect();
    if code.ends_with('\\') {
        parts.pop();
    }

    for (n, raw) in parts.iter().enumerate() {
        let value = raw.trim_matches(' ');
        if value.is_empty() {
            found = true;
            key = CharacterSet::ISO_IR_6.key();
            continue;
        }
        found = false;
        for r in CHARSETS.iter() {
            let mut iso2022flag = 0;
            if r.term == value {
                found = true;
            } else if !r.term_ext.is_empty() && r.term_ext == value {
                found = true;
                iso2022flag = CharacterSet::ISO_2022_FLAG;
            }
            if found {
                if n == 0 {
                    // the first value selects the initial designations
                    key = r.key.key() | iso2022flag;
                } else if r.flags == 1 {
                    // multi-byte sets in G1 replace the previous value
                    key = r.key.key() | CharacterSet::ISO_2022_FLAG;
                } else if r.flags == 2 {
                    // JIS X 0208 and 0212 combine with JIS X 0201 and
                    // with each other
                    key = (key & CharacterSet::JP_BASE_MASK)
                        | r.key.key()
                        | CharacterSet::ISO_2022_FLAG;
                }
                break;
            }
        }
    }

    if !found && !code.is_empty() {
        let lowered = CharacterSet::ISO_IR_6.case_folded(code.as_bytes());
        for r in CHARSETS.iter() {
            if r.aliases.iter().any(|a| *a == lowered) {
                key = r.key.key();
                // JIS X 0212 always implies JIS X 0208
                if key == CharacterSet::ISO_2022_IR_159.key() {
                    key |= CharacterSet::ISO_2022_IR_87.key();
                }
                found = true;
                break;
            }
        }
    }

    if !found && !code.is_empty() {
        tracing::warn!("unrecognized specific character set {:?}", code);
    }
    CharacterSet::from_key(key)
}

/// Render a key back to its Specific Character Set value. The default
/// repertoire renders as the empty string.
pub(crate) fn code_string(cs: CharacterSet) -> String {
    let mut key = cs.key();
    let mut value = String::new();

    for r in CHARSETS.iter() {
        if key == 0 {
            break;
        }
        let rk = r.key.key();
        let mut matched = false;
        if key == key & (CharacterSet::JP_BASE_MASK | CharacterSet::ISO_2022_FLAG)
            && key != CharacterSet::ISO_2022_FLAG
        {
            // the JIS sets can combine; emit and clear one bit at a time
            if rk & key == rk && rk | CharacterSet::ISO_2022_FLAG != CharacterSet::ISO_2022_FLAG {
                matched = true;
                key ^= rk & !CharacterSet::ISO_2022_FLAG;
                if key == CharacterSet::ISO_2022_FLAG {
                    key = 0;
                }
            }
        } else if r.flags == 0 && value.is_empty() {
            matched = if cs.is_iso2022() {
                rk == key & CharacterSet::ISO_2022_BASE_MASK
            } else {
                rk == key
            };
            if matched {
                key = 0;
            }
        } else if r.flags == 1 && value.is_empty() {
            matched = rk == key | CharacterSet::ISO_2022_FLAG;
            if matched {
                key = 0;
            }
        }

        if matched {
            if cs.is_iso2022() {
                if r.flags == 1 || r.flags == 2 {
                    // multi-byte ISO 2022 terms go in the second value
                    value.push('\\');
                }
                value.push_str(r.term_ext);
            } else {
                value.push_str(r.term);
            }
        }
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defined_terms_resolve() {
        assert_eq!(key_from_code("ISO_IR 100"), CharacterSet::ISO_IR_100);
        assert_eq!(key_from_code("ISO_IR 192"), CharacterSet::ISO_IR_192);
        assert_eq!(key_from_code("GB18030"), CharacterSet::GB18030);
        assert_eq!(key_from_code(""), CharacterSet::ISO_IR_6);
        assert_eq!(key_from_code("  ISO_IR 144  "), CharacterSet::ISO_IR_144);
    }

    #[test]
    fn iso_2022_terms_set_the_flag() {
        let cs = key_from_code("ISO 2022 IR 100");
        assert!(cs.is_iso2022());
        assert_eq!(
            cs.key() & CharacterSet::ISO_2022_BASE_MASK,
            CharacterSet::ISO_IR_100.key()
        );
    }

    #[test]
    fn multi_valued_korean() {
        let cs = key_from_code("\\ISO 2022 IR 149");
        assert_eq!(cs, CharacterSet::ISO_2022_IR_149);
        assert_eq!(code_string(cs), "\\ISO 2022 IR 149");
        assert_eq!(key_from_code(&code_string(cs)), cs);
    }

    #[test]
    fn japanese_terms_combine() {
        let cs = key_from_code("ISO 2022 IR 13\\ISO 2022 IR 87");
        assert!(cs.is_iso2022());
        assert!(cs.contains(CharacterSet::ISO_IR_13));
        assert!(cs.contains(CharacterSet::ISO_2022_IR_87));
        assert_eq!(code_string(cs), "ISO 2022 IR 13\\ISO 2022 IR 87");

        let full = key_from_code("ISO 2022 IR 13\\ISO 2022 IR 87\\ISO 2022 IR 159");
        assert_eq!(
            code_string(full),
            "ISO 2022 IR 13\\ISO 2022 IR 87\\ISO 2022 IR 159"
        );
        assert_eq!(key_from_code(&code_string(full)), full);
    }

    #[test]
    fn aliases_resolve_case_insensitively() {
        assert_eq!(key_from_code("UTF-8"), CharacterSet::ISO_IR_192);
        assert_eq!(key_from_code("Shift_JIS"), CharacterSet::X_SJIS);
        assert_eq!(key_from_code("EUC-KR"), CharacterSet::X_EUCKR);
        assert_eq!(key_from_code("Latin1"), CharacterSet::ISO_IR_100);
        assert_eq!(key_from_code("windows-1252"), CharacterSet::X_CP1252);
    }

    #[test]
    fn jis_x_0212_alias_implies_0208() {
        let cs = key_from_code("iso-2022-jp-2");
        assert!(cs.contains(CharacterSet::ISO_2022_IR_159));
        assert!(cs.contains(CharacterSet::ISO_2022_IR_87));
    }

    #[test]
    fn unknown_names_yield_unknown() {
        assert_eq!(key_from_code("no-such-charset"), CharacterSet::UNKNOWN);
    }

    #[test]
    fn escape_codes_resolve() {
        assert_eq!(charset_for_escape(b"$B"), CharacterSet::ISO_2022_IR_87);
        assert_eq!(charset_for_escape(b"$@"), CharacterSet::ISO_2022_IR_87);
        assert_eq!(charset_for_escape(b"$(D"), CharacterSet::ISO_2022_IR_159);
        assert_eq!(charset_for_escape(b"$)C"), CharacterSet::X_EUCKR);
        assert_eq!(charset_for_escape(b"-A"), CharacterSet::ISO_IR_100);
        assert_eq!(charset_for_escape(b"(J"), CharacterSet::ISO_IR_13);
        assert_eq!(charset_for_escape(b"(X"), CharacterSet::UNKNOWN);
    }

    #[test]
    fn default_repertoire_renders_empty() {
        assert_eq!(code_string(CharacterSet::ISO_IR_6), "");
        assert_eq!(code_string(CharacterSet::ISO_IR_144), "ISO_IR 144");
    }
}
