//! Telugu → ITRANS romanization table
//!
//! Covers the assigned letters of the Telugu block (U+0C00–U+0C7F) that occur
//! in running text. Fraction signs, the nukta and the tuumu marks are left out
//! and rejected by the caller as unsupported.

/// Role a Telugu code point plays in syllable assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Glyph {
    /// Independent vowel letter
    Vowel(&'static str),
    /// Consonant carrying an inherent `a` until a sign or virama follows
    Consonant(&'static str),
    /// Dependent vowel sign replacing the inherent `a`
    VowelSign(&'static str),
    /// Halant: suppresses the inherent `a`
    Virama,
    /// Anusvara, visarga, candrabindu
    Modifier(&'static str),
    /// Avagraha, digits
    Symbol(&'static str),
    /// Length marks and joiners: no romanized output
    Silent,
}

pub(crate) fn classify(ch: char) -> Option<Glyph> {
    use Glyph::*;

    let glyph = match ch {
        '\u{0C00}' | '\u{0C01}' => Modifier(".N"),
        '\u{0C02}' | '\u{0C04}' => Modifier("M"),
        '\u{0C03}' => Modifier("H"),

        '\u{0C05}' => Vowel("a"),
        '\u{0C06}' => Vowel("A"),
        '\u{0C07}' => Vowel("i"),
        '\u{0C08}' => Vowel("I"),
        '\u{0C09}' => Vowel("u"),
        '\u{0C0A}' => Vowel("U"),
        '\u{0C0B}' => Vowel("RRi"),
        '\u{0C0C}' => Vowel("LLi"),
        '\u{0C0E}' => Vowel("e"),
        '\u{0C0F}' => Vowel("E"),
        '\u{0C10}' => Vowel("ai"),
        '\u{0C12}' => Vowel("o"),
        '\u{0C13}' => Vowel("O"),
        '\u{0C14}' => Vowel("au"),
        '\u{0C60}' => Vowel("RRI"),
        '\u{0C61}' => Vowel("LLI"),

        '\u{0C15}' => Consonant("k"),
        '\u{0C16}' => Consonant("kh"),
        '\u{0C17}' => Consonant("g"),
        '\u{0C18}' => Consonant("gh"),
        '\u{0C19}' => Consonant("~N"),
        '\u{0C1A}' => Consonant("ch"),
        '\u{0C1B}' => Consonant("Ch"),
        '\u{0C1C}' => Consonant("j"),
        '\u{0C1D}' => Consonant("jh"),
        '\u{0C1E}' => Consonant("~n"),
        '\u{0C1F}' => Consonant("T"),
        '\u{0C20}' => Consonant("Th"),
        '\u{0C21}' => Consonant("D"),
        '\u{0C22}' => Consonant("Dh"),
        '\u{0C23}' => Consonant("N"),
        '\u{0C24}' => Consonant("t"),
        '\u{0C25}' => Consonant("th"),
        '\u{0C26}' => Consonant("d"),
        '\u{0C27}' => Consonant("dh"),
        '\u{0C28}' => Consonant("n"),
        '\u{0C2A}' => Consonant("p"),
        '\u{0C2B}' => Consonant("ph"),
        '\u{0C2C}' => Consonant("b"),
        '\u{0C2D}' => Consonant("bh"),
        '\u{0C2E}' => Consonant("m"),
        '\u{0C2F}' => Consonant("y"),
        '\u{0C30}' => Consonant("r"),
        '\u{0C31}' | '\u{0C5A}' => Consonant("R"),
        '\u{0C32}' => Consonant("l"),
        '\u{0C33}' => Consonant("L"),
        '\u{0C34}' => Consonant("zh"),
        '\u{0C35}' => Consonant("v"),
        '\u{0C36}' => Consonant("sh"),
        '\u{0C37}' => Consonant("Sh"),
        '\u{0C38}' => Consonant("s"),
        '\u{0C39}' => Consonant("h"),
        '\u{0C58}' => Consonant("ts"),
        '\u{0C59}' => Consonant("dz"),

        '\u{0C3E}' => VowelSign("A"),
        '\u{0C3F}' => VowelSign("i"),
        '\u{0C40}' => VowelSign("I"),
        '\u{0C41}' => VowelSign("u"),
        '\u{0C42}' => VowelSign("U"),
        '\u{0C43}' => VowelSign("RRi"),
        '\u{0C44}' => VowelSign("RRI"),
        '\u{0C46}' => VowelSign("e"),
        '\u{0C47}' => VowelSign("E"),
        '\u{0C48}' => VowelSign("ai"),
        '\u{0C4A}' => VowelSign("o"),
        '\u{0C4B}' => VowelSign("O"),
        '\u{0C4C}' => VowelSign("au"),
        '\u{0C62}' => VowelSign("LLi"),
        '\u{0C63}' => VowelSign("LLI"),

        '\u{0C4D}' => Virama,

        '\u{0C3D}' => Symbol(".a"),
        '\u{0C66}' => Symbol("0"),
        '\u{0C67}' => Symbol("1"),
        '\u{0C68}' => Symbol("2"),
        '\u{0C69}' => Symbol("3"),
        '\u{0C6A}' => Symbol("4"),
        '\u{0C6B}' => Symbol("5"),
        '\u{0C6C}' => Symbol("6"),
        '\u{0C6D}' => Symbol("7"),
        '\u{0C6E}' => Symbol("8"),
        '\u{0C6F}' => Symbol("9"),
        // Dandas are shared with Devanagari but common in Telugu verse
        '\u{0964}' => Symbol("|"),
        '\u{0965}' => Symbol("||"),

        '\u{0C55}' | '\u{0C56}' | '\u{200C}' | '\u{200D}' => Silent,

        _ => return None,
    };

    Some(glyph)
}

/// Non-Telugu characters carried through unchanged
pub(crate) fn is_passthrough(ch: char) -> bool {
    ch.is_ascii()
        || ch.is_whitespace()
        || matches!(
            ch,
            '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' | '\u{2013}' | '\u{2014}' | '\u{2026}'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_consonant_is_romanized_to_ascii() {
        for cp in 0x0C15u32..=0x0C39 {
            let ch = char::from_u32(cp).unwrap();
            if let Some(Glyph::Consonant(roman)) = classify(ch) {
                assert!(roman.is_ascii(), "{:?} -> {:?}", ch, roman);
                assert!(!roman.is_empty());
            }
        }
    }

    #[test]
    fn test_unassigned_code_points_are_unclassified() {
        assert_eq!(classify('\u{0C0D}'), None);
        assert_eq!(classify('\u{0C11}'), None);
        assert_eq!(classify('\u{0C29}'), None);
        assert_eq!(classify('\u{0C78}'), None);
    }

    #[test]
    fn test_joiners_are_silent() {
        assert_eq!(classify('\u{200C}'), Some(Glyph::Silent));
        assert_eq!(classify('\u{200D}'), Some(Glyph::Silent));
    }

    #[test]
    fn test_passthrough_covers_ascii_and_typographic_quotes() {
        assert!(is_passthrough('a'));
        assert!(is_passthrough(','));
        assert!(is_passthrough('\u{00A0}'));
        assert!(is_passthrough('\u{201C}'));
        assert!(!is_passthrough('\u{0915}'));
    }
}
