//! Metrics of the three standard Times faces used on pages.
//!
//! Page text is set in the PDF base-14 fonts with WinAnsi encoding, so no font files are
//! embedded. Widths are the Adobe AFM advances in thousandths of an em.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// A standard Times face.
pub enum BaseFont {
    /// Body text and page numbers.
    TimesRoman,
    /// Drop caps and the cover title.
    TimesBold,
    /// Missing-image placeholders.
    TimesItalic,
}

impl BaseFont {
    /// All faces, in resource order.
    pub const ALL: [BaseFont; 3] = [Self::TimesRoman, Self::TimesBold, Self::TimesItalic];

    /// PostScript name written as `/BaseFont`.
    pub fn postscript_name(self) -> &'static str {
        match self {
            Self::TimesRoman => "Times-Roman",
            Self::TimesBold => "Times-Bold",
            Self::TimesItalic => "Times-Italic",
        }
    }

    /// Name of the font in page resources.
    pub fn resource_name(self) -> &'static str {
        match self {
            Self::TimesRoman => "F1",
            Self::TimesBold => "F2",
            Self::TimesItalic => "F3",
        }
    }

    /// Cap height as a fraction of the font size.
    pub fn cap_height(self) -> f64 {
        match self {
            Self::TimesRoman => 0.662,
            Self::TimesBold => 0.676,
            Self::TimesItalic => 0.653,
        }
    }

    /// Ascender as a fraction of the font size.
    pub fn ascent(self) -> f64 {
        0.683
    }

    /// Descender depth as a positive fraction of the font size.
    pub fn descent(self) -> f64 {
        0.217
    }

    /// Advance of one WinAnsi byte, in thousandths of an em.
    pub fn byte_width(self, b: u8) -> u16 {
        match b {
            0x20..=0x7E => self.ascii_table()[usize::from(b - 0x20)],
            0x80..=0x9F => self.special_width(b),
            0xA0 => 250,
            0xA1..=0xBF => self.latin1_symbol_table()[usize::from(b - 0xA1)],
            0xC0..=0xFF => match latin1_base_letter(b) {
                Some(base) => self.ascii_table()[usize::from(base - 0x20)],
                None => self.latin1_letter_width(b),
            },
            _ => 500,
        }
    }

    /// Width of `text` at `size` points, after WinAnsi encoding.
    pub fn text_width(self, text: &str, size: f64) -> f64 {
        let units: u32 = text
            .chars()
            .map(|ch| u32::from(self.byte_width(win_ansi_byte(ch))))
            .sum();
        f64::from(units) * size / 1000.0
    }

    fn ascii_table(self) -> &'static [u16; 95] {
        match self {
            Self::TimesRoman => &TIMES_ROMAN_ASCII,
            Self::TimesBold => &TIMES_BOLD_ASCII,
            Self::TimesItalic => &TIMES_ITALIC_ASCII,
        }
    }

    fn latin1_symbol_table(self) -> &'static [u16; 31] {
        match self {
            Self::TimesRoman => &TIMES_ROMAN_LATIN1_SYMBOLS,
            Self::TimesBold => &TIMES_BOLD_LATIN1_SYMBOLS,
            Self::TimesItalic => &TIMES_ITALIC_LATIN1_SYMBOLS,
        }
    }

    /// Latin-1 letters and operators with no unaccented ASCII counterpart.
    fn latin1_letter_width(self, b: u8) -> u16 {
        match (self, b) {
            // Æ æ
            (Self::TimesBold, 0xC6) => 1000,
            (_, 0xC6) => 889,
            (Self::TimesBold, 0xE6) => 722,
            (_, 0xE6) => 667,
            // Ð ð
            (_, 0xD0) => 722,
            (_, 0xF0) => 500,
            // × ÷
            (Self::TimesRoman, 0xD7 | 0xF7) => 564,
            (Self::TimesBold, 0xD7 | 0xF7) => 570,
            (Self::TimesItalic, 0xD7 | 0xF7) => 675,
            // Þ þ
            (Self::TimesRoman, 0xDE) => 556,
            (_, 0xDE) => 611,
            (Self::TimesBold, 0xFE) => 556,
            (_, 0xFE) => 500,
            // ß
            (Self::TimesBold, 0xDF) => 556,
            (_, 0xDF) => 500,
            _ => 500,
        }
    }

    fn special_width(self, b: u8) -> u16 {
        match (self, b) {
            (_, 0x91 | 0x92 | 0x82 | 0x8B | 0x9B) => 333,
            (Self::TimesRoman, 0x93 | 0x94 | 0x84) => 444,
            (Self::TimesBold, 0x93 | 0x94 | 0x84) => 500,
            (Self::TimesItalic, 0x93 | 0x94 | 0x84) => 556,
            (_, 0x95) => 350,
            (_, 0x96) => 500,
            (Self::TimesItalic, 0x97 | 0x85) => 889,
            (_, 0x97 | 0x85 | 0x89) => 1000,
            (Self::TimesBold, 0x99) => 1000,
            (_, 0x99) => 980,
            _ => 500,
        }
    }
}

/// WinAnsi code of `ch`; unmappable characters become `?`.
pub fn win_ansi_byte(ch: char) -> u8 {
    let cp = u32::from(ch);
    match cp {
        0x20..=0x7E | 0xA0..=0xFF => cp as u8,
        _ => match ch {
            '\t' | '\n' | '\r' => b' ',
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            _ => b'?',
        },
    }
}

/// Encode `text` for a WinAnsi `Tj` operand.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

/// Unaccented ASCII letter sharing the advance of a Latin-1 letter.
fn latin1_base_letter(b: u8) -> Option<u8> {
    let base = match b {
        0xC0..=0xC5 => b'A',
        0xC7 => b'C',
        0xC8..=0xCB => b'E',
        0xCC..=0xCF => b'I',
        0xD1 => b'N',
        0xD2..=0xD6 | 0xD8 => b'O',
        0xD9..=0xDC => b'U',
        0xDD => b'Y',
        0xE0..=0xE5 => b'a',
        0xE7 => b'c',
        0xE8..=0xEB => b'e',
        0xEC..=0xEF => b'i',
        0xF1 => b'n',
        0xF2..=0xF6 | 0xF8 => b'o',
        0xF9..=0xFC => b'u',
        0xFD | 0xFF => b'y',
        _ => return None,
    };
    Some(base)
}

const TIMES_ROMAN_ASCII: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

const TIMES_BOLD_ASCII: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

const TIMES_ITALIC_ASCII: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 675, 675, 675, 500,
    920, 611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
    611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389, 278, 389, 422, 500,
    333, 500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500,
    500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
];

/// Widths of 0xA1..=0xBF, from `exclamdown` to `questiondown`.
const TIMES_ROMAN_LATIN1_SYMBOLS: [u16; 31] = [
    333, 500, 500, 500, 500, 200, 500, 333, 760, 276, 500, 564, 333, 760, 333, 400,
    564, 300, 300, 333, 500, 453, 250, 333, 300, 310, 500, 750, 750, 750, 444,
];

const TIMES_BOLD_LATIN1_SYMBOLS: [u16; 31] = [
    333, 500, 500, 500, 500, 220, 500, 333, 747, 300, 500, 570, 333, 747, 333, 400,
    570, 300, 300, 333, 556, 540, 250, 333, 300, 330, 500, 750, 750, 750, 500,
];

const TIMES_ITALIC_LATIN1_SYMBOLS: [u16; 31] = [
    389, 500, 500, 500, 500, 275, 500, 333, 760, 276, 500, 675, 333, 760, 333, 400,
    675, 300, 300, 333, 500, 523, 250, 333, 300, 310, 500, 750, 750, 750, 500,
];

#[cfg(test)]
#[path = "../../tests/unit/document/metrics.rs"]
mod tests;
