//! Names that `UnicodeData.txt` leaves to be derived.
//!
//! Large blocks (CJK ideographs, Tangut ideographs, Hangul syllables) are
//! listed as a `<Label, First>` / `<Label, Last>` pair instead of one line
//! per character. Their names follow rules NR1 and NR2 of the Unicode
//! standard, section 4.8.

const HANGUL_BASE: u32 = 0xAC00;
const HANGUL_COUNT: u32 = 11172;
const JAMO_V_COUNT: u32 = 21;
const JAMO_T_COUNT: u32 = 28;
const JAMO_N_COUNT: u32 = JAMO_V_COUNT * JAMO_T_COUNT;

const JAMO_L: [&str; 19] = [
    "G", "GG", "N", "D", "DD", "R", "M", "B", "BB", "S", "SS", "", "J", "JJ",
    "C", "K", "T", "P", "H",
];

const JAMO_V: [&str; 21] = [
    "A", "AE", "YA", "YAE", "EO", "E", "YEO", "YE", "O", "WA", "WAE", "OE",
    "YO", "U", "WEO", "WE", "WI", "YU", "EU", "YI", "I",
];

const JAMO_T: [&str; 28] = [
    "", "G", "GG", "GS", "N", "NJ", "NH", "D", "L", "LG", "LM", "LB", "LS",
    "LT", "LP", "LH", "M", "B", "BS", "S", "SS", "NG", "J", "C", "K", "T",
    "P", "H",
];

/// How the characters of a First/Last range are named
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedRange {
    CjkIdeograph,
    TangutIdeograph,
    HangulSyllable,
}

impl DerivedRange {
    /// Recognise the label of a range marker such as
    /// `CJK Ideograph Extension A`; ranges without names (private use,
    /// surrogates) give `None`
    pub fn from_label(label: &str) -> Option<Self> {
        if label.starts_with("CJK Ideograph") {
            Some(Self::CjkIdeograph)
        } else if label.starts_with("Tangut Ideograph") {
            Some(Self::TangutIdeograph)
        } else if label == "Hangul Syllable" {
            Some(Self::HangulSyllable)
        } else {
            None
        }
    }

    /// Name of `code_point` inside this range
    pub fn name(self, code_point: u32) -> Option<String> {
        match self {
            Self::CjkIdeograph => Some(format!("CJK UNIFIED IDEOGRAPH-{code_point:04X}")),
            Self::TangutIdeograph => Some(format!("TANGUT IDEOGRAPH-{code_point:04X}")),
            Self::HangulSyllable => hangul_syllable_name(code_point),
        }
    }
}

/// `HANGUL SYLLABLE` plus the short names of the syllable's jamo
pub fn hangul_syllable_name(code_point: u32) -> Option<String> {
    let index = code_point.checked_sub(HANGUL_BASE)?;
    if index >= HANGUL_COUNT {
        return None;
    }

    let l = (index / JAMO_N_COUNT) as usize;
    let v = ((index % JAMO_N_COUNT) / JAMO_T_COUNT) as usize;
    let t = (index % JAMO_T_COUNT) as usize;
    Some(format!(
        "HANGUL SYLLABLE {}{}{}",
        JAMO_L[l], JAMO_V[v], JAMO_T[t]
    ))
}
