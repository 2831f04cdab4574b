//! Unicode case folding.
//!
//! `fold_into` appends the full case folding of one code point (one to
//! three code points) as UTF-8. The mappings follow the Unicode 8.0
//! CaseFolding data, dispatched by range with small tables for the
//! irregular stretches.

use crate::utf8::push_code;

/// Append the case folding of `code` to `out`.
pub(crate) fn fold_into(code: u32, out: &mut Vec<u8>) {
    let mut code = code;
    let mut code2 = 0;
    let mut code3 = 0;

    if code <= 0x7F {
        if (0x41..=0x5A).contains(&code) {
            // ascii uppercase
            code += 0x20;
        }
    } else if code <= 0xFF {
        if (0xC0..=0xDE).contains(&code) && code != 0xD7 {
            // latin-1 uppercase
            code += 0x20;
        } else if code == 0xDF {
            // s-sharp
            code = u32::from(b's');
            code2 = u32::from(b's');
        } else if code == 0xB5 {
            // micro sign folds to greek mu
            code = 0x03BC;
        }
    } else if code <= 0x017F {
        if (0x0100..=0x012F).contains(&code) {
            code |= 0x0001;
        } else if code == 0x0130 {
            // I with dot above
            code = u32::from(b'i');
            code2 = 0x0307;
        } else if (0x0132..=0x0137).contains(&code) {
            code |= 0x0001;
        } else if (0x0139..=0x0148).contains(&code) {
            code += code & 0x0001;
        } else if code == 0x0149 {
            // 'n splits into two characters
            code = 0x02BC;
            code2 = u32::from(b'n');
        } else if (0x014A..=0x0177).contains(&code) {
            code |= 0x0001;
        } else if code == 0x0178 {
            code = 0xFF;
        } else if (0x0179..=0x017E).contains(&code) {
            code += code & 0x0001;
        } else if code == 0x017F {
            // long s
            code = u32::from(b's');
        }
    } else if code <= 0x036F {
        if (0x0180..=0x01CA).contains(&code) {
            const TABLE: [u16; 75] = [
                0x0180, 0x0253, 0x0183, 0x0183, 0x0185, 0x0185, 0x0254, 0x0188, 0x0188, 0x0256,
                0x0257, 0x018C, 0x018C, 0x018D, 0x01DD, 0x0259, 0x025B, 0x0192, 0x0192, 0x0260,
                0x0263, 0x0195, 0x0269, 0x0268, 0x0199, 0x0199, 0x019A, 0x019B, 0x026F, 0x0272,
                0x019E, 0x0275, 0x01A1, 0x01A1, 0x01A3, 0x01A3, 0x01A5, 0x01A5, 0x0280, 0x01A8,
                0x01A8, 0x0283, 0x01AA, 0x01AB, 0x01AD, 0x01AD, 0x0288, 0x01B0, 0x01B0, 0x028A,
                0x028B, 0x01B4, 0x01B4, 0x01B6, 0x01B6, 0x0292, 0x01B9, 0x01B9, 0x01BA, 0x01BB,
                0x01BD, 0x01BD, 0x01BE, 0x01BF, 0x01C0, 0x01C1, 0x01C2, 0x01C3, 0x01C6, 0x01C6,
                0x01C6, 0x01C9, 0x01C9, 0x01C9, 0x01CC,
            ];
            code = u32::from(TABLE[(code - 0x0180) as usize]);
        } else if (0x01CB..=0x01DC).contains(&code) {
            code += code & 0x0001;
        } else if (0x01DE..=0x01EF).contains(&code) {
            code |= 0x0001;
        } else if code == 0x01F0 {
            code = 0x006A;
            code2 = 0x030C;
        } else if (0x01F1..=0x024F).contains(&code) {
            const TABLE: [u16; 96] = [
                0x01F0, 0x01F3, 0x01F3, 0x01F3, 0x01F5, 0x01F5, 0x0195, 0x01BF, 0x01F9, 0x01F9,
                0x01FB, 0x01FB, 0x01FD, 0x01FD, 0x01FF, 0x01FF, 0x0201, 0x0201, 0x0203, 0x0203,
                0x0205, 0x0205, 0x0207, 0x0207, 0x0209, 0x0209, 0x020B, 0x020B, 0x020D, 0x020D,
                0x020F, 0x020F, 0x0211, 0x0211, 0x0213, 0x0213, 0x0215, 0x0215, 0x0217, 0x0217,
                0x0219, 0x0219, 0x021B, 0x021B, 0x021D, 0x021D, 0x021F, 0x021F, 0x019E, 0x0221,
                0x0223, 0x0223, 0x0225, 0x0225, 0x0227, 0x0227, 0x0229, 0x0229, 0x022B, 0x022B,
                0x022D, 0x022D, 0x022F, 0x022F, 0x0231, 0x0231, 0x0233, 0x0233, 0x0234, 0x0235,
                0x0236, 0x0237, 0x0238, 0x0239, 0x2C65, 0x023C, 0x023C, 0x019A, 0x2C66, 0x023F,
                0x0240, 0x0242, 0x0242, 0x0180, 0x0289, 0x028C, 0x0247, 0x0247, 0x0249, 0x0249,
                0x024B, 0x024B, 0x024D, 0x024D, 0x024F, 0x024F,
            ];
            code = u32::from(TABLE[(code - 0x01F0) as usize]);
        } else if code == 0x0345 {
            // combining greek ypogegrammeni
            code = 0x03B9;
        }
    } else if code <= 0x03FF {
        if (0x0370..=0x038F).contains(&code) {
            const TABLE: [u16; 32] = [
                0x0371, 0x0371, 0x0373, 0x0373, 0x0374, 0x0375, 0x0377, 0x0377, 0x0378, 0x0379,
                0x037A, 0x037B, 0x037C, 0x037D, 0x037E, 0x03F3, 0x0380, 0x0381, 0x0382, 0x0383,
                0x0384, 0x0385, 0x03AC, 0x0387, 0x03AD, 0x03AE, 0x03AF, 0x038B, 0x03CC, 0x038D,
                0x03CD, 0x03CE,
            ];
            code = u32::from(TABLE[(code - 0x0370) as usize]);
        } else if (0x0391..=0x03A1).contains(&code) || (0x03A3..=0x03AB).contains(&code) {
            code += 0x20;
        } else if code == 0x0390 {
            code = 0x03B9;
            code2 = 0x0308;
            code3 = 0x0301;
        } else if code == 0x03B0 {
            code = 0x03C5;
            code2 = 0x0308;
            code3 = 0x0301;
        } else if code == 0x03C2 {
            code += 0x01;
        } else if (0x03CF..=0x03D6).contains(&code) {
            const TABLE: [u16; 8] = [
                0x03D7, 0x03B2, 0x03B8, 0x03D2, 0x03D3, 0x03D4, 0x03C6, 0x03C0,
            ];
            code = u32::from(TABLE[(code - 0x03CF) as usize]);
        } else if (0x03D8..=0x03EF).contains(&code) {
            code |= 0x0001;
        } else if (0x03F0..=0x03FF).contains(&code) {
            const TABLE: [u16; 16] = [
                0x03BA, 0x03C1, 0x03F2, 0x03F3, 0x03B8, 0x03B5, 0x03F6, 0x03F8, 0x03F8, 0x03F2,
                0x03FB, 0x03FB, 0x03FC, 0x037B, 0x037C, 0x037D,
            ];
            code = u32::from(TABLE[(code - 0x03F0) as usize]);
        }
    } else if code <= 0x052F {
        if (0x0400..=0x040F).contains(&code) {
            code += 0x50;
        } else if (0x0410..=0x042F).contains(&code) {
            code += 0x20;
        } else if (0x0460..=0x0481).contains(&code) || (0x048A..=0x04BF).contains(&code) {
            code |= 0x0001;
        } else if code == 0x04C0 {
            code = 0x04CF;
        } else if (0x04C1..=0x04CE).contains(&code) {
            code += code & 0x0001;
        } else if (0x04D0..=0x052F).contains(&code) {
            code |= 0x0001;
        }
    } else if code <= 0x1000 {
        if (0x0531..=0x0556).contains(&code) {
            // armenian
            code += 0x30;
        } else if code == 0x0587 {
            code = 0x0565;
            code2 = 0x0582;
        }
    } else if code <= 0x13FF {
        if (0x10A0..=0x10C5).contains(&code) || code == 0x10C7 || code == 0x10CD {
            // georgian
            code += 0x1C60;
        } else if (0x13F8..=0x13FD).contains(&code) {
            // cherokee
            code -= 0x08;
        }
    } else if code <= 0x1EFF {
        if (0x1E00..=0x1E95).contains(&code) {
            code |= 0x0001;
        } else if (0x1E96..=0x1E9B).contains(&code) {
            const TABLE: [u16; 6] = [0x68, 0x74, 0x77, 0x79, 0x61, 0x1E61];
            const TABLE2: [u16; 6] = [0x0331, 0x0308, 0x030A, 0x030A, 0x02BE, 0];
            code2 = u32::from(TABLE2[(code - 0x1E96) as usize]);
            code = u32::from(TABLE[(code - 0x1E96) as usize]);
        } else if code == 0x1E9E {
            // capital s-sharp
            code = u32::from(b's');
            code2 = u32::from(b's');
        } else if (0x1EA0..=0x1EFE).contains(&code) {
            code |= 0x0001;
        }
    } else if code <= 0x1FFF {
        if (0x1F08..=0x1F0F).contains(&code)
            || (0x1F18..=0x1F1D).contains(&code)
            || (0x1F28..=0x1F2F).contains(&code)
            || (0x1F38..=0x1F3F).contains(&code)
            || (0x1F48..=0x1F4D).contains(&code)
        {
            code -= 0x08;
        } else if (0x1F50..=0x1F56).contains(&code) && code & 0x1 == 0 {
            const TABLE3: [u16; 7] = [0, 0, 0x0300, 0, 0x0301, 0, 0x0342];
            code3 = u32::from(TABLE3[(code - 0x1F50) as usize]);
            code2 = 0x0313;
            code = 0x03C5;
        } else if ((0x1F59..=0x1F5F).contains(&code) && code & 0x1 != 0)
            || (0x1F68..=0x1F6F).contains(&code)
        {
            code -= 0x08;
        } else if (0x1F80..=0x1FAF).contains(&code) {
            code2 = 0x03B9;
            if code <= 0x1F87 {
                code -= 0x80;
            } else if code <= 0x1F8F {
                code -= 0x88;
            } else if code <= 0x1F97 {
                code -= 0x70;
            } else if code <= 0x1F9F {
                code -= 0x78;
            } else if code <= 0x1FA7 {
                code -= 0x40;
            } else {
                code -= 0x48;
            }
        } else if (0x1FB2..=0x1FFC).contains(&code) {
            const TABLE: [u16; 75] = [
                0x1F70, 0x03B1, 0x03AC, 0x1FB5, 0x03B1, 0x03B1, 0x1FB0, 0x1FB1, 0x1F70, 0x1F71,
                0x03B1, 0x1FBD, 0x03B9, 0x1FBF, 0x1FC0, 0x1FC1, 0x1F74, 0x03B7, 0x03AE, 0x1FC5,
                0x03B7, 0x03B7, 0x1F72, 0x1F73, 0x1F74, 0x1F75, 0x03B7, 0x1FCD, 0x1FCE, 0x1FCF,
                0x1FD0, 0x1FD1, 0x03B9, 0x03B9, 0x1FD4, 0x1FD5, 0x03B9, 0x03B9, 0x1FD0, 0x1FD1,
                0x1F76, 0x1F77, 0x1FDC, 0x1FDD, 0x1FDE, 0x1FDF, 0x1FE0, 0x1FE1, 0x03C5, 0x03C5,
                0x03C1, 0x1FE5, 0x03C5, 0x03C5, 0x1FE0, 0x1FE1, 0x1F7A, 0x1F7B, 0x1FE5, 0x1FED,
                0x1FEE, 0x1FEF, 0x1FF0, 0x1FF1, 0x1F7C, 0x03C9, 0x03CE, 0x1FF5, 0x03C9, 0x03C9,
                0x1F78, 0x1F79, 0x1F7C, 0x1F7D, 0x03C9,
            ];
            if code <= 0x1FB4
                || code == 0x1FBC
                || (0x1FC2..=0x1FC4).contains(&code)
                || code == 0x1FCC
                || (0x1FF2..=0x1FF4).contains(&code)
                || code == 0x1FFC
            {
                code2 = 0x03B9;
            } else if code == 0x1FB6
                || code == 0x1FC6
                || code == 0x1FD6
                || code == 0x1FE6
                || code == 0x1FF6
            {
                code2 = 0x0342;
            } else if code == 0x1FB7 || code == 0x1FC7 || code == 0x1FF7 {
                code2 = 0x0342;
                code3 = 0x03B9;
            } else if (0x1FD2..=0x1FD3).contains(&code) {
                code2 = 0x0308;
                code3 = code - (0x1FD2 - 0x0300);
            } else if code == 0x1FD7 || code == 0x1FE7 {
                code2 = 0x0308;
                code3 = 0x0342;
            } else if (0x1FE2..=0x1FE3).contains(&code) {
                code2 = 0x0308;
                code3 = code - (0x1FE2 - 0x0300);
            } else if code == 0x1FE4 {
                code2 = 0x0313;
            }
            code = u32::from(TABLE[(code - 0x1FB2) as usize]);
        }
    } else if code <= 0x24FF {
        if code == 0x2126 {
            // ohm sign
            code = 0x03C9;
        } else if code == 0x212A {
            // kelvin sign
            code = u32::from(b'k');
        } else if code == 0x212B {
            // angstrom sign
            code = 0xE5;
        } else if code == 0x2132 {
            code = 0x214E;
        } else if (0x2160..=0x216F).contains(&code) {
            code += 0x10;
        } else if code == 0x2183 {
            code += 0x01;
        } else if (0x24B6..=0x24CF).contains(&code) {
            code += 0x1A;
        }
    } else if code <= 0x2CFF {
        if (0x2C00..=0x2C2E).contains(&code) {
            // glagolitic
            code += 0x30;
        } else if (0x2C60..=0x2C7F).contains(&code) {
            const TABLE: [u16; 32] = [
                0x2C61, 0x2C61, 0x026B, 0x1D7D, 0x027D, 0x2C65, 0x2C66, 0x2C68, 0x2C68, 0x2C6A,
                0x2C6A, 0x2C6C, 0x2C6C, 0x0251, 0x0271, 0x0250, 0x0252, 0x2C71, 0x2C73, 0x2C73,
                0x2C74, 0x2C76, 0x2C76, 0x2C77, 0x2C78, 0x2C79, 0x2C7A, 0x2C7B, 0x2C7C, 0x2C7D,
                0x023F, 0x0240,
            ];
            code = u32::from(TABLE[(code - 0x2C60) as usize]);
        } else if (0x2C80..=0x2CF3).contains(&code) {
            // coptic
            if code <= 0x2CE3 {
                code |= 0x0001;
            } else if code == 0x2CEB || code == 0x2CED || code == 0x2CF2 {
                code += 0x0001;
            }
        }
    } else if code <= 0x9FFF {
        // cjk ideograms
    } else if code <= 0xABFF {
        if (0xA640..=0xA66D).contains(&code) || (0xA680..=0xA69B).contains(&code) {
            code |= 0x0001;
        } else if (0xA722..=0xA76F).contains(&code) && code != 0xA730 {
            code |= 0x0001;
        } else if (0xA779..=0xA77C).contains(&code) {
            code += code & 0x0001;
        } else if code == 0xA77D {
            code = 0x1D79;
        } else if (0xA77E..=0xA787).contains(&code) {
            code |= 0x0001;
        } else if code == 0xA78B {
            code += 0x0001;
        } else if code == 0xA78D {
            code = 0x0265;
        } else if (0xA790..=0xA7A9).contains(&code) && code != 0xA794 {
            code |= 0x0001;
        } else if (0xA7AA..=0xA7B6).contains(&code) {
            const TABLE: [u16; 13] = [
                0x0266, 0x025C, 0x0261, 0x026C, 0xA7AE, 0xA7AF, 0x029E, 0x0287, 0x029D, 0xAB53,
                0xA7B5, 0xA7B5, 0xA7B7,
            ];
            code = u32::from(TABLE[(code - 0xA7AA) as usize]);
        } else if (0xAB70..=0xABBF).contains(&code) {
            // cherokee
            code -= 0x97D0;
        }
    } else if code <= 0xFAFF {
        // hangul, cjk, private use
    } else if code <= 0xFBFF {
        if (0xFB00..=0xFB06).contains(&code) {
            // latin ligatures
            if code <= 0xFB04 {
                if code == 0xFB01 {
                    code2 = u32::from(b'i');
                } else if code == 0xFB02 {
                    code2 = u32::from(b'l');
                } else {
                    code2 = u32::from(b'f');
                    if code == 0xFB03 {
                        code3 = u32::from(b'i');
                    } else if code == 0xFB04 {
                        code3 = u32::from(b'l');
                    }
                }
                code = u32::from(b'f');
            } else {
                code = u32::from(b's');
                code2 = u32::from(b't');
            }
        } else if (0xFB13..=0xFB17).contains(&code) {
            // armenian ligatures
            const TABLE: [u16; 5] = [0x0574, 0x0574, 0x0574, 0x057E, 0x0574];
            const TABLE2: [u16; 5] = [0x0576, 0x0565, 0x056B, 0x0576, 0x056D];
            code2 = u32::from(TABLE2[(code - 0xFB13) as usize]);
            code = u32::from(TABLE[(code - 0xFB13) as usize]);
        }
    } else if code <= 0xFFFF {
        if (0xFF21..=0xFF3A).contains(&code) {
            // wide latin uppercase
            code += 0x20;
        }
    } else if (0x10400..=0x10427).contains(&code) {
        // deseret
        code += 0x28;
    } else if (0x10C80..=0x10CB2).contains(&code) {
        // old hungarian
        code += 0x40;
    } else if (0x118A0..=0x118BF).contains(&code) {
        // warang citi
        code += 0x20;
    }

    push_code(out, code);
    if code2 != 0 {
        push_code(out, code2);
        if code3 != 0 {
            push_code(out, code3);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folded(text: &str) -> String {
        let mut out = Vec::new();
        for c in text.chars() {
            fold_into(c as u32, &mut out);
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn ascii_and_latin1() {
        assert_eq!(folded("Hello, World"), "hello, world");
        assert_eq!(folded("Straße"), "strasse");
        assert_eq!(folded("ÀÉÎÕÜ"), "àéîõü");
        assert_eq!(folded("×"), "×");
        assert_eq!(folded("µ"), "μ");
    }

    #[test]
    fn expansions() {
        assert_eq!(folded("ẞ"), "ss");
        assert_eq!(folded("ŉ"), "\u{02BC}n");
        assert_eq!(folded("ﬃ"), "ffi");
        assert_eq!(folded("ﬅ"), "st");
        assert_eq!(folded("և"), "եւ");
        assert_eq!(folded("ΰ"), "\u{03C5}\u{0308}\u{0301}");
    }

    #[test]
    fn greek_iota_subscript() {
        assert_eq!(folded("ᾈ"), "\u{1F00}\u{03B9}");
        assert_eq!(folded("ῌ"), "\u{03B7}\u{03B9}");
        // perispomeni forms keep their three-way expansion
        assert_eq!(folded("\u{1FB7}"), "\u{03B1}\u{0342}\u{03B9}");
        assert_eq!(folded("\u{1FC7}"), "\u{03B7}\u{0342}\u{03B9}");
        assert_eq!(folded("\u{1FB6}"), "\u{03B1}\u{0342}");
    }

    #[test]
    fn cyrillic_armenian_georgian() {
        assert_eq!(folded("БЮɁ"), "бюɂ");
        assert_eq!(folded("Ш"), "ш");
        assert_eq!(folded("Ա"), "ա");
        assert_eq!(folded("Ⴀ"), "ⴀ");
    }

    #[test]
    fn symbols_and_wide_forms() {
        assert_eq!(folded("Ω"), "ω"); // ohm sign
        assert_eq!(folded("K"), "k"); // kelvin sign
        assert_eq!(folded("Å"), "å"); // angstrom sign
        assert_eq!(folded("Ⅰ"), "ⅰ");
        assert_eq!(folded("Ⓐ"), "ⓐ");
        assert_eq!(folded("ＡＺ"), "ａｚ");
    }

    #[test]
    fn beyond_bmp() {
        assert_eq!(folded("\u{10400}"), "\u{10428}"); // deseret
        assert_eq!(folded("\u{10C80}"), "\u{10CC0}"); // old hungarian
        assert_eq!(folded("\u{118A0}"), "\u{118C0}"); // warang citi
    }

    #[test]
    fn folding_is_idempotent() {
        let samples = "Hello Straße ΐΰ ᾈῌ ﬃﬅ Ω K Å Ⅰ Ⓐ ＡＺ БЮ Ա Ⴀ ᏸᏻ ꭰ";
        let once = folded(samples);
        let twice = folded(&once);
        assert_eq!(once, twice);
    }
}
