//! The generated lookup-table data and its per-key registry.
//!
//! The data is produced by `build.rs` from the published index tables and
//! packed in the compressed format read by [`crate::table`].

use crate::charset::CharacterSet;

include!(concat!(env!("OUT_DIR"), "/tables.rs"));

/// The byte-to-code-point table for a key, when one exists.
pub(crate) fn table_for(cs: CharacterSet) -> Option<&'static [u16]> {
    match cs {
        CharacterSet::ISO_IR_6 | CharacterSet::ISO_2022_IR_6 => Some(TABLE_ASCII),
        CharacterSet::ISO_IR_13 | CharacterSet::ISO_2022_IR_13 => Some(TABLE_JISX0201),
        CharacterSet::ISO_IR_100 => Some(TABLE_ISO8859_1),
        CharacterSet::ISO_IR_101 => Some(TABLE_ISO8859_2),
        CharacterSet::ISO_IR_109 => Some(TABLE_ISO8859_3),
        CharacterSet::ISO_IR_110 => Some(TABLE_ISO8859_4),
        CharacterSet::ISO_IR_144 => Some(TABLE_ISO8859_5),
        CharacterSet::ISO_IR_127 => Some(TABLE_ISO8859_6),
        CharacterSet::ISO_IR_126 => Some(TABLE_ISO8859_7),
        CharacterSet::ISO_IR_138 => Some(TABLE_ISO8859_8),
        CharacterSet::ISO_IR_148 => Some(TABLE_ISO8859_9),
        CharacterSet::X_LATIN6 => Some(TABLE_ISO8859_10),
        CharacterSet::ISO_IR_166 => Some(TABLE_ISO8859_11),
        CharacterSet::X_LATIN7 => Some(TABLE_ISO8859_13),
        CharacterSet::X_LATIN8 => Some(TABLE_ISO8859_14),
        CharacterSet::X_LATIN9 => Some(TABLE_ISO8859_15),
        CharacterSet::X_LATIN10 => Some(TABLE_ISO8859_16),
        CharacterSet::X_EUCKR | CharacterSet::ISO_2022_IR_149 => Some(TABLE_EUCKR),
        CharacterSet::X_GB2312 | CharacterSet::ISO_2022_IR_58 => Some(TABLE_GB2312),
        CharacterSet::ISO_2022_IR_87 => Some(TABLE_JISX0208),
        CharacterSet::ISO_2022_IR_159 => Some(TABLE_JISX0212),
        CharacterSet::GB18030 | CharacterSet::GBK => Some(TABLE_GB18030),
        CharacterSet::X_BIG5 => Some(TABLE_BIG5),
        CharacterSet::X_SJIS => Some(TABLE_SJIS),
        CharacterSet::X_KOI8 => Some(TABLE_KOI8),
        CharacterSet::X_CP874 => Some(TABLE_CP874),
        CharacterSet::X_CP1250 => Some(TABLE_CP1250),
        CharacterSet::X_CP1251 => Some(TABLE_CP1251),
        CharacterSet::X_CP1252 => Some(TABLE_CP1252),
        CharacterSet::X_CP1253 => Some(TABLE_CP1253),
        CharacterSet::X_CP1254 => Some(TABLE_CP1254),
        CharacterSet::X_CP1255 => Some(TABLE_CP1255),
        CharacterSet::X_CP1256 => Some(TABLE_CP1256),
        CharacterSet::X_CP1257 => Some(TABLE_CP1257),
        CharacterSet::X_CP1258 => Some(TABLE_CP1258),
        _ => None,
    }
}

/// The code-point-to-byte table for a key, when one exists.
pub(crate) fn reverse_for(cs: CharacterSet) -> Option<&'static [u16]> {
    match cs {
        CharacterSet::ISO_IR_6 | CharacterSet::ISO_2022_IR_6 => Some(RV_ASCII),
        CharacterSet::ISO_IR_13 | CharacterSet::ISO_2022_IR_13 => Some(RV_JISX0201),
        CharacterSet::ISO_IR_100 => Some(RV_ISO8859_1),
        CharacterSet::ISO_IR_101 => Some(RV_ISO8859_2),
        CharacterSet::ISO_IR_109 => Some(RV_ISO8859_3),
        CharacterSet::ISO_IR_110 => Some(RV_ISO8859_4),
        CharacterSet::ISO_IR_144 => Some(RV_ISO8859_5),
        CharacterSet::ISO_IR_127 => Some(RV_ISO8859_6),
        CharacterSet::ISO_IR_126 => Some(RV_ISO8859_7),
        CharacterSet::ISO_IR_138 => Some(RV_ISO8859_8),
        CharacterSet::ISO_IR_148 => Some(RV_ISO8859_9),
        CharacterSet::X_LATIN6 => Some(RV_ISO8859_10),
        CharacterSet::ISO_IR_166 => Some(RV_ISO8859_11),
        CharacterSet::X_LATIN7 => Some(RV_ISO8859_13),
        CharacterSet::X_LATIN8 => Some(RV_ISO8859_14),
        CharacterSet::X_LATIN9 => Some(RV_ISO8859_15),
        CharacterSet::X_LATIN10 => Some(RV_ISO8859_16),
        CharacterSet::X_KOI8 => Some(RV_KOI8),
        CharacterSet::X_CP874 => Some(RV_CP874),
        CharacterSet::X_CP1250 => Some(RV_CP1250),
        CharacterSet::X_CP1251 => Some(RV_CP1251),
        CharacterSet::X_CP1252 => Some(RV_CP1252),
        CharacterSet::X_CP1253 => Some(RV_CP1253),
        CharacterSet::X_CP1254 => Some(RV_CP1254),
        CharacterSet::X_CP1255 => Some(RV_CP1255),
        CharacterSet::X_CP1256 => Some(RV_CP1256),
        CharacterSet::X_CP1257 => Some(RV_CP1257),
        CharacterSet::X_CP1258 => Some(RV_CP1258),
        _ => None,
    }
}
