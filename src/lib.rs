#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]
//! DICOM specific character set decoding and encoding.
//!
//! This crate converts text between UTF-8 and the character repertoires
//! that DICOM data sets declare through Specific Character Set (0008,0005):
//!
//! - ISO 8859-1 through 8859-16
//! - JIS X 0201-1976, JIS X 0208-1990 and JIS X 0212-1990 for Japanese
//! - KS X 1001 (registered as ISO-IR 149) for Korean
//! - TIS 620-2533 (ISO-IR 166) for Thai
//! - GB2312, GBK and GB18030 for Chinese
//! - ISO 10646 in its UTF-8 form (ISO-IR 192)
//!
//! plus encodings that only turn up undeclared in legacy files (Shift_JIS,
//! EUC-JP, Big5, KOI8 and the common Windows code pages). The ISO 2022
//! escape-based forms that mix these repertoires within one value are
//! handled in both directions.
//!
//! Conversion never fails outright: undecodable bytes are dropped,
//! replaced or preserved according to an [`ErrorMode`], and every
//! operation also reports the byte offset of the first offending input.
//! Strict `Result`-returning wrappers sit on top for callers that want an
//! error instead.
//!
//! ```
//! use dicom_charset::CharacterSet;
//!
//! let cs = CharacterSet::from_code("ISO_IR 100");
//! assert_eq!(cs.decode(b"caf\xE9").unwrap(), "café");
//! assert_eq!(cs.encode("café").unwrap(), b"caf\xE9");
//! ```

mod charset;
mod codec;
mod fold;
mod iso2022;
mod registry;
mod table;
mod tables;
mod utf8;

pub use charset::{
    effective_character_set, global_default, global_override, set_global_default,
    set_global_override, CharacterSet, DecodeTextError, EncodeTextError, ParseCharacterSetError,
};
pub use utf8::ErrorMode;
