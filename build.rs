//! Build-time generation of the character set lookup tables.
//!
//! Every byte-table mapping used by the crate, in both directions, is packed
//! into the compressed format read by `src/table.rs`: a header
//! `[M, H 0..M, N]`, three parallel arrays of `N` range records (range starts,
//! linear offsets, dense offsets) and a flat region of dense values. The
//! mapping data itself comes from the rust-encoding index crates; layouts
//! (94×94 linearisation, GBK region packing, CP949 extension packing, CP932
//! rows, Big5 157-column rows) are the ones expected by the codecs.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use encoding_index_japanese::{jis0208, jis0212};
use encoding_index_korean::euc_kr;
use encoding_index_simpchinese::{gb18030, gb18030_ranges};
use encoding_index_singlebyte::{
    iso_8859_10, iso_8859_13, iso_8859_14, iso_8859_15, iso_8859_16, iso_8859_2, iso_8859_3,
    iso_8859_4, iso_8859_5, iso_8859_6, iso_8859_7, iso_8859_8, koi8_r, windows_1250,
    windows_1251, windows_1252, windows_1253, windows_1254, windows_1255, windows_1256,
    windows_1257, windows_1258, windows_874,
};
use encoding_index_tradchinese::big5;

/// The absent-value sentinel shared with the lookup code.
const RCHAR: u16 = 0xFFFD;

/// Minimum length for a linearly compressed range.
const LINEAR_MIN: usize = 8;
/// Unmapped gaps shorter than this are absorbed into dense ranges.
const GAP_MIN: usize = 8;

#[derive(Clone, Copy, PartialEq)]
enum Kind {
    Absent,
    Linear,
    Dense,
}

/// Length of the maximal step-one run starting at `s` within `[s, e)`.
fn linear_run(values: &[u16], s: usize, e: usize) -> usize {
    if values[s] == RCHAR {
        return 1;
    }
    let base = values[s] as usize;
    let mut l = 1;
    while s + l < e {
        let want = base + l;
        if want > 0xFFFF || values[s + l] == RCHAR || values[s + l] as usize != want {
            break;
        }
        l += 1;
    }
    l
}

fn segment_run(values: &[u16], s: usize, e: usize, ranges: &mut Vec<(usize, usize, Kind)>) {
    let mut k = s;
    let mut dense_start: Option<usize> = None;
    while k < e {
        let l = linear_run(values, k, e);
        if l >= LINEAR_MIN {
            if let Some(ds) = dense_start.take() {
                ranges.push((ds, k, Kind::Dense));
            }
            ranges.push((k, k + l, Kind::Linear));
        } else if dense_start.is_none() {
            dense_start = Some(k);
        }
        k += l;
    }
    if let Some(ds) = dense_start {
        ranges.push((ds, e, Kind::Dense));
    }
}

/// Pack `values` (indexed by key, `RCHAR` = absent) into the compressed
/// format. `hot_keys` selects the ranges probed before the binary search;
/// `keep_dense` intervals are never linearised or split so that
/// `CompressedTable::block` can hand out their dense region verbatim.
fn pack(values: &[u16], hot_keys: &[usize], keep_dense: &[(usize, usize)]) -> Vec<u16> {
    let n = values.len();
    assert!(n <= 0xFFFF);
    let in_dense = |k: usize| keep_dense.iter().any(|&(a, b)| k >= a && k < b);

    let mut covered: Vec<bool> = (0..n).map(|k| values[k] != RCHAR || in_dense(k)).collect();
    // absorb short interior gaps so they land in dense ranges
    let mut k = 0;
    while k < n {
        if covered[k] {
            k += 1;
            continue;
        }
        let start = k;
        while k < n && !covered[k] {
            k += 1;
        }
        if start > 0 && k < n && k - start < GAP_MIN {
            for c in covered[start..k].iter_mut() {
                *c = true;
            }
        }
    }

    let mut ranges: Vec<(usize, usize, Kind)> = Vec::new();
    let mut k = 0;
    while k < n {
        if !covered[k] {
            let s = k;
            while k < n && !covered[k] {
                k += 1;
            }
            ranges.push((s, k, Kind::Absent));
            continue;
        }
        let s = k;
        let mut e = k;
        while e < n && covered[e] {
            e += 1;
        }
        let mut cuts = vec![s, e];
        for &(a, b) in keep_dense {
            if a > s && a < e {
                cuts.push(a);
            }
            if b > s && b < e {
                cuts.push(b);
            }
        }
        cuts.sort_unstable();
        cuts.dedup();
        for w in cuts.windows(2) {
            let (ss, ee) = (w[0], w[1]);
            if in_dense(ss) {
                ranges.push((ss, ee, Kind::Dense));
            } else {
                segment_run(values, ss, ee, &mut ranges);
            }
        }
        k = e;
    }
    // catch-all so that keys past the table resolve to the sentinel
    if ranges.last().map(|r| r.2) != Some(Kind::Absent) {
        ranges.push((n, n, Kind::Absent));
    }

    let nr = ranges.len();
    let mut starts = Vec::with_capacity(nr);
    let mut linear = Vec::with_capacity(nr);
    let mut doff = Vec::with_capacity(nr);
    let mut dense: Vec<u16> = Vec::new();
    for &(s, e, kind) in &ranges {
        starts.push(s as u16);
        match kind {
            Kind::Absent => {
                linear.push(RCHAR);
                doff.push(RCHAR);
            }
            Kind::Linear => {
                linear.push(values[s]);
                doff.push(RCHAR);
            }
            Kind::Dense => {
                assert!(dense.len() < RCHAR as usize);
                linear.push(RCHAR);
                doff.push(dense.len() as u16);
                dense.extend_from_slice(&values[s..e]);
            }
        }
    }
    assert!(dense.len() < RCHAR as usize);

    let mut words = Vec::with_capacity(2 + hot_keys.len() + 3 * nr + dense.len());
    words.push(hot_keys.len() as u16);
    for &h in hot_keys {
        let idx = starts.partition_point(|&s| (s as usize) <= h) - 1;
        words.push(idx as u16);
    }
    words.push(nr as u16);
    words.extend_from_slice(&starts);
    words.extend_from_slice(&linear);
    words.extend_from_slice(&doff);
    words.extend_from_slice(&dense);
    words
}

/// Clamp an index-crate code to the BMP, mapping the unmapped marker and
/// anything astral to the sentinel.
fn bmp(code: u32) -> u16 {
    if code >= 0xFFFF {
        RCHAR
    } else {
        code as u16
    }
}

// Assigned pointer ranges of the multi-byte indices; the index functions
// are only defined inside these bounds. The Big5 range is additionally
// restricted to the rows above the Hong Kong supplementary area, giving
// the plain Big5 + ETEN repertoire.
const JIS0208_PTRS: (usize, usize) = (0, 11104);
const JIS0212_PTRS: (usize, usize) = (108, 7211);
const EUCKR_PTRS: (usize, usize) = (0, 23750);
const BIG5_PTRS: (usize, usize) = (5024, 19782);

fn jis0208_at(ptr: usize) -> u16 {
    if (JIS0208_PTRS.0..JIS0208_PTRS.1).contains(&ptr) {
        bmp(jis0208::forward(ptr as u16) as u32)
    } else {
        RCHAR
    }
}

fn jis0212_at(ptr: usize) -> u16 {
    if (JIS0212_PTRS.0..JIS0212_PTRS.1).contains(&ptr) {
        bmp(jis0212::forward(ptr as u16) as u32)
    } else {
        RCHAR
    }
}

fn euckr_at(ptr: usize) -> u16 {
    if (EUCKR_PTRS.0..EUCKR_PTRS.1).contains(&ptr) {
        bmp(euc_kr::forward(ptr as u16) as u32)
    } else {
        RCHAR
    }
}

fn big5_at(ptr: usize) -> u32 {
    if (BIG5_PTRS.0..BIG5_PTRS.1).contains(&ptr) {
        big5::forward(ptr as u16) as u32
    } else {
        0xFFFF
    }
}

/// Full 256-entry table: ASCII identity below 0x80, index data above.
fn single_byte(forward: fn(u8) -> u16) -> Vec<u16> {
    let mut v: Vec<u16> = (0..0x80u16).collect();
    v.extend((0x80..=0xFFu16).map(|b| bmp(forward(b as u8) as u32)));
    v
}

/// Like `single_byte`, but with C1 controls passed through and index data
/// only for 0xA0..=0xFF (used for the ISO 8859 sets whose index crate entry
/// is the corresponding Windows code page).
fn single_byte_gr(forward: fn(u8) -> u16) -> Vec<u16> {
    let mut v: Vec<u16> = (0..0xA0u16).collect();
    v.extend((0xA0..=0xFFu16).map(|b| bmp(forward(b as u8) as u32)));
    v
}

fn ascii() -> Vec<u16> {
    (0..0x80u16).collect()
}

fn latin1() -> Vec<u16> {
    (0..=0xFFu16).collect()
}

/// JIS X 0201: romaji in GL (yen and overline replacing backslash and
/// tilde), half-width katakana in GR.
fn jisx0201() -> Vec<u16> {
    let mut v = vec![RCHAR; 0xE0];
    for b in 0..0x80u16 {
        v[b as usize] = match b {
            0x5C => 0x00A5,
            0x7E => 0x203E,
            _ => b,
        };
    }
    for b in 0xA1..=0xDFusize {
        v[b] = b as u16 + 0xFEC0;
    }
    v
}

/// JIS X 0208 as a 94×94 table, row-major from GL bytes.
fn table_jisx0208() -> Vec<u16> {
    (0..94 * 94).map(jis0208_at).collect()
}

fn table_jisx0212() -> Vec<u16> {
    (0..94 * 94).map(jis0212_at).collect()
}

/// CP932 rows: JIS X 0208 plus the NEC/IBM extension rows, with the
/// user-defined leads 0xF0..=0xF9 mapped onto the private use area.
fn table_sjis() -> Vec<u16> {
    (0..120 * 94)
        .map(|t| {
            if (8836..=10715).contains(&t) {
                0xE000 + (t as u16 - 8836)
            } else {
                jis0208_at(t)
            }
        })
        .collect()
}

/// EUC-KR: KS X 1001 in the first 94×94 block, then the CP949 hangul
/// extension packed the way the Korean codec indexes it.
fn table_euckr() -> Vec<u16> {
    let mut v = Vec::with_capacity(8836 + 8822);
    for a in 0..94usize {
        for b in 0..94usize {
            v.push(euckr_at((a + 32) * 190 + (b + 96)));
        }
    }
    for ext in 0..8822usize {
        let (a, b) = if ext < 5696 {
            (ext / 178, ext % 178)
        } else {
            ((ext - 3008) / 84, (ext - 3008) % 84)
        };
        let mut trail = 0x41 + b;
        if b >= 26 {
            trail += 6;
        }
        if b >= 52 {
            trail += 6;
        }
        v.push(euckr_at(a * 190 + (trail - 0x41)));
    }
    v
}

/// GB2312 as a 94×94 table (the GB18030 index restricted to GR rows).
fn table_gb2312() -> Vec<u16> {
    let mut v = Vec::with_capacity(8836);
    for a in 0..94usize {
        for b in 0..94usize {
            let ptr = (a + 32) * 190 + (b + 96);
            v.push(bmp(gb18030::forward(ptr as u16) as u32));
        }
    }
    v
}

/// GB18030: GB2312 region, GBK region 3, GBK regions 4 and 5, then the
/// four-byte codes whose linear index stays below 32×1260 (the BMP tail).
fn table_gb18030() -> Vec<u16> {
    let mut v = table_gb2312();
    for k in 0..6080usize {
        // leads 0x81..=0xA0: the two-byte pointer space is already linear here
        v.push(bmp(gb18030::forward(k as u16) as u32));
    }
    for k in 0..9024usize {
        let a = k / 96;
        let col = k % 96;
        let ptr = (a + 32) * 190 + col;
        v.push(bmp(gb18030::forward(ptr as u16) as u32));
    }
    for ptr in 0..32 * 1260u32 {
        let code = gb18030_ranges::forward(ptr);
        if code == 0xFFFF_FFFF || code > 0xFFFF {
            v.push(RCHAR);
        } else {
            v.push(code as u16);
        }
    }
    v
}

/// Big5 with the ETEN extensions; the two-letter replacement markers and
/// anything astral are left to the codec.
fn table_big5() -> Vec<u16> {
    (0..19782usize)
        .map(|t| {
            let code = big5_at(t);
            if code < 4 {
                RCHAR
            } else {
                bmp(code)
            }
        })
        .collect()
}

/// Reverse a forward table: code point → lowest key.
fn reverse_of(forward: &[u16]) -> Vec<u16> {
    let mut rev = vec![RCHAR; 0xFFFE];
    for (t, &code) in forward.iter().enumerate() {
        let c = code as usize;
        if code != RCHAR && c < 0xFFFE && rev[c] == RCHAR {
            rev[c] = t as u16;
        }
    }
    rev
}

/// JIS X 0208 and 0212 reverse: 0208 keys win, 0212 keys are offset by 8836.
fn rev_jisx(t0208: &[u16], t0212: &[u16]) -> Vec<u16> {
    let mut rev = reverse_of(t0208);
    for (t, &code) in t0212.iter().enumerate() {
        let c = code as usize;
        if code != RCHAR && c < 0xFFFE && rev[c] == RCHAR {
            rev[c] = (t + 8836) as u16;
        }
    }
    rev
}

/// Full-width counterparts of the half-width forms U+FF61..=U+FF9F, used to
/// give the CP932 reverse table its best-fit katakana entries.
const FULLWIDTH_KATAKANA: [u16; 63] = [
    0x3002, 0x300C, 0x300D, 0x3001, 0x30FB, 0x30F2, 0x30A1, 0x30A3, 0x30A5, 0x30A7, 0x30A9,
    0x30E3, 0x30E5, 0x30E7, 0x30C3, 0x30FC, 0x30A2, 0x30A4, 0x30A6, 0x30A8, 0x30AA, 0x30AB,
    0x30AD, 0x30AF, 0x30B1, 0x30B3, 0x30B5, 0x30B7, 0x30B9, 0x30BB, 0x30BD, 0x30BF, 0x30C1,
    0x30C4, 0x30C6, 0x30C8, 0x30CA, 0x30CB, 0x30CC, 0x30CD, 0x30CE, 0x30CF, 0x30D2, 0x30D5,
    0x30D8, 0x30DB, 0x30DE, 0x30DF, 0x30E0, 0x30E1, 0x30E2, 0x30E4, 0x30E6, 0x30E8, 0x30E9,
    0x30EA, 0x30EB, 0x30EC, 0x30ED, 0x30EF, 0x30F3, 0x309B, 0x309C,
];

fn rev_sjis(sjis: &[u16]) -> Vec<u16> {
    let mut rev = reverse_of(sjis);
    for (i, &full) in FULLWIDTH_KATAKANA.iter().enumerate() {
        let half = 0xFF61 + i;
        if rev[half] == RCHAR && rev[full as usize] != RCHAR {
            rev[half] = rev[full as usize];
        }
    }
    rev
}

/// Big5 reverse: ETEN-region pointers only, first pointer wins except for
/// the six code points whose canonical encoding is the last pointer.
fn rev_big5() -> Vec<u16> {
    const LAST_WINS: [u32; 6] = [0x2550, 0x255E, 0x2561, 0x256A, 0x5341, 0x5345];
    let mut rev = vec![RCHAR; 0xFFFE];
    for ptr in 5024..19782usize {
        let code = big5_at(ptr);
        if code < 4 || code >= 0xFFFE {
            continue;
        }
        let c = code as usize;
        if rev[c] == RCHAR || LAST_WINS.contains(&code) {
            rev[c] = ptr as u16;
        }
    }
    rev
}

fn rev_gb18030(gb18030_full: &[u16]) -> Vec<u16> {
    let mut rev = reverse_of(gb18030_full);
    // the canonical four-byte encoding of U+FFFD cannot live in the forward
    // table (its value collides with the sentinel), so place it by hand
    for ptr in 0..32 * 1260u32 {
        if gb18030_ranges::forward(ptr) == 0xFFFD {
            rev[0xFFFD] = 23940 + ptr as u16;
            break;
        }
    }
    rev
}

fn emit(out: &mut String, name: &str, words: &[u16]) {
    writeln!(out, "pub static {}: &[u16] = &[", name).unwrap();
    for chunk in words.chunks(12) {
        let line: Vec<String> = chunk.iter().map(|w| w.to_string()).collect();
        writeln!(out, "    {},", line.join(", ")).unwrap();
    }
    writeln!(out, "];").unwrap();
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let t_jisx0208 = table_jisx0208();
    let t_jisx0212 = table_jisx0212();
    let t_sjis = table_sjis();
    let t_euckr = table_euckr();
    let t_gb2312 = table_gb2312();
    let t_gb18030 = table_gb18030();
    let t_big5 = table_big5();

    let single: &[(&str, &str, Vec<u16>)] = &[
        ("ASCII", "RV_ASCII", ascii()),
        ("JISX0201", "RV_JISX0201", jisx0201()),
        ("ISO8859_1", "RV_ISO8859_1", latin1()),
        ("ISO8859_2", "RV_ISO8859_2", single_byte(iso_8859_2::forward)),
        ("ISO8859_3", "RV_ISO8859_3", single_byte(iso_8859_3::forward)),
        ("ISO8859_4", "RV_ISO8859_4", single_byte(iso_8859_4::forward)),
        ("ISO8859_5", "RV_ISO8859_5", single_byte(iso_8859_5::forward)),
        ("ISO8859_6", "RV_ISO8859_6", single_byte(iso_8859_6::forward)),
        ("ISO8859_7", "RV_ISO8859_7", single_byte(iso_8859_7::forward)),
        ("ISO8859_8", "RV_ISO8859_8", single_byte(iso_8859_8::forward)),
        ("ISO8859_9", "RV_ISO8859_9", single_byte_gr(windows_1254::forward)),
        ("ISO8859_10", "RV_ISO8859_10", single_byte(iso_8859_10::forward)),
        ("ISO8859_11", "RV_ISO8859_11", single_byte_gr(windows_874::forward)),
        ("ISO8859_13", "RV_ISO8859_13", single_byte(iso_8859_13::forward)),
        ("ISO8859_14", "RV_ISO8859_14", single_byte(iso_8859_14::forward)),
        ("ISO8859_15", "RV_ISO8859_15", single_byte(iso_8859_15::forward)),
        ("ISO8859_16", "RV_ISO8859_16", single_byte(iso_8859_16::forward)),
        ("KOI8", "RV_KOI8", single_byte(koi8_r::forward)),
        ("CP874", "RV_CP874", single_byte(windows_874::forward)),
        ("CP1250", "RV_CP1250", single_byte(windows_1250::forward)),
        ("CP1251", "RV_CP1251", single_byte(windows_1251::forward)),
        ("CP1252", "RV_CP1252", single_byte(windows_1252::forward)),
        ("CP1253", "RV_CP1253", single_byte(windows_1253::forward)),
        ("CP1254", "RV_CP1254", single_byte(windows_1254::forward)),
        ("CP1255", "RV_CP1255", single_byte(windows_1255::forward)),
        ("CP1256", "RV_CP1256", single_byte(windows_1256::forward)),
        ("CP1257", "RV_CP1257", single_byte(windows_1257::forward)),
        ("CP1258", "RV_CP1258", single_byte(windows_1258::forward)),
    ];

    let mut out = String::new();
    out.push_str("// Generated by build.rs; do not edit.\n\n");

    for (fwd_name, rev_name, values) in single {
        emit(&mut out, &format!("TABLE_{}", fwd_name), &pack(values, &[], &[]));
        emit(&mut out, rev_name, &pack(&reverse_of(values), &[], &[]));
    }

    emit(&mut out, "TABLE_JISX0208", &pack(&t_jisx0208, &[1410], &[]));
    emit(&mut out, "TABLE_JISX0212", &pack(&t_jisx0212, &[1410], &[]));
    emit(&mut out, "TABLE_SJIS", &pack(&t_sjis, &[1410], &[]));
    emit(
        &mut out,
        "TABLE_EUCKR",
        &pack(&t_euckr, &[1410], &[(1410, 3760)]),
    );
    emit(&mut out, "TABLE_GB2312", &pack(&t_gb2312, &[1410], &[]));
    emit(&mut out, "TABLE_GB18030", &pack(&t_gb18030, &[1410], &[]));
    emit(&mut out, "TABLE_BIG5", &pack(&t_big5, &[5495], &[]));

    emit(
        &mut out,
        "RV_JISX",
        &pack(&rev_jisx(&t_jisx0208, &t_jisx0212), &[0x4E00], &[]),
    );
    emit(&mut out, "RV_SJIS", &pack(&rev_sjis(&t_sjis), &[0x4E00], &[]));
    emit(
        &mut out,
        "RV_EUCKR",
        &pack(&reverse_of(&t_euckr), &[0xAC00], &[]),
    );
    emit(
        &mut out,
        "RV_GB2312",
        &pack(&reverse_of(&t_gb2312), &[0x4E00], &[]),
    );
    emit(
        &mut out,
        "RV_GBK",
        &pack(&reverse_of(&t_gb18030[..23940]), &[0x4E00], &[]),
    );
    emit(
        &mut out,
        "RV_GB18030",
        &pack(&rev_gb18030(&t_gb18030), &[0x4E00], &[]),
    );
    emit(&mut out, "RV_BIG5", &pack(&rev_big5(), &[0x4E00], &[]));

    emit_pairs(&mut out, "GB18030_ASTRAL", &gb18030_astral());
    emit_pairs(&mut out, "BIG5_ASTRAL", &big5_astral());

    let out_dir = env::var("OUT_DIR").unwrap();
    fs::write(Path::new(&out_dir).join("tables.rs"), out).unwrap();
}

/// Two-byte GB18030 codes whose code points lie beyond the BMP, as
/// (table key, code point) pairs for the codec to special-case.
fn gb18030_astral() -> Vec<(u16, u32)> {
    let mut pairs = Vec::new();
    for ptr in 0..23940usize {
        let code = gb18030::forward(ptr as u16) as u32;
        if code > 0xFFFF && code != 0xFFFF_FFFF {
            let lead = 0x81 + ptr / 190;
            let col = ptr % 190;
            let t = if lead < 0xA1 {
                8836 + ptr
            } else if col < 96 {
                14916 + (lead - 0xA1) * 96 + col
            } else {
                (lead - 0xA1) * 94 + (col - 96)
            };
            pairs.push((t as u16, code));
        }
    }
    pairs.sort_unstable();
    pairs
}

/// ETEN-region Big5 codes beyond the BMP, as (table key, code point) pairs.
fn big5_astral() -> Vec<(u16, u32)> {
    let mut pairs = Vec::new();
    let mut seen = std::collections::BTreeSet::new();
    for ptr in 5024..19782usize {
        let code = big5_at(ptr);
        if code > 0xFFFF && seen.insert(code) {
            pairs.push((ptr as u16, code));
        }
    }
    pairs.sort_unstable();
    pairs
}

fn emit_pairs(out: &mut String, name: &str, pairs: &[(u16, u32)]) {
    writeln!(out, "pub static {}: &[(u16, u32)] = &[", name).unwrap();
    for (t, code) in pairs {
        writeln!(out, "    ({}, {}),", t, code).unwrap();
    }
    writeln!(out, "];").unwrap();
}
