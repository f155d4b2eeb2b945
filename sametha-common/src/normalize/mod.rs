//! Text normalization for duplicate detection
//!
//! Two canonical forms are produced:
//! - plain: lowercase, trimmed, internal whitespace collapsed to single spaces
//! - comparable: NFC-composed source-script text romanized to ITRANS, then plain
//!
//! Comparison keys are always computed on demand from the stored raw text.

mod telugu;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use self::telugu::Glyph;

/// Script the proverbs are written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceScript {
    #[default]
    Telugu,
}

impl fmt::Display for SourceScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceScript::Telugu => write!(f, "telugu"),
        }
    }
}

impl FromStr for SourceScript {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "telugu" | "te" => Ok(SourceScript::Telugu),
            other => Err(format!("unsupported source script: {}", other)),
        }
    }
}

/// Why a string could not be romanized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransliterationError {
    #[error("unsupported character {ch:?} at byte {offset}")]
    UnsupportedCharacter { ch: char, offset: usize },

    #[error("vowel sign or virama {ch:?} at byte {offset} has no preceding consonant")]
    OrphanSign { ch: char, offset: usize },
}

/// Lowercase, trim, and collapse whitespace runs to a single space.
///
/// Total and idempotent; applies to any input including the empty string.
pub fn normalize_plain(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Romanize `text` from `script` into ITRANS.
///
/// ASCII, whitespace and common typographic punctuation pass through, so mixed
/// Telugu/English input romanizes cleanly. Input is expected to be NFC already;
/// use [`to_comparable_form`] for raw user input.
pub fn transliterate(text: &str, script: SourceScript) -> Result<String, TransliterationError> {
    match script {
        SourceScript::Telugu => transliterate_telugu(text),
    }
}

fn transliterate_telugu(text: &str) -> Result<String, TransliterationError> {
    let mut out = String::with_capacity(text.len());
    // Set after a consonant until a vowel sign or virama decides its vowel
    let mut inherent_a = false;

    for (offset, ch) in text.char_indices() {
        match telugu::classify(ch) {
            Some(Glyph::Consonant(roman)) => {
                if inherent_a {
                    out.push('a');
                }
                out.push_str(roman);
                inherent_a = true;
            }
            Some(Glyph::VowelSign(roman)) => {
                if !inherent_a {
                    return Err(TransliterationError::OrphanSign { ch, offset });
                }
                out.push_str(roman);
                inherent_a = false;
            }
            Some(Glyph::Virama) => {
                if !inherent_a {
                    return Err(TransliterationError::OrphanSign { ch, offset });
                }
                inherent_a = false;
            }
            Some(Glyph::Silent) => {}
            Some(Glyph::Vowel(roman))
            | Some(Glyph::Modifier(roman))
            | Some(Glyph::Symbol(roman)) => {
                if inherent_a {
                    out.push('a');
                    inherent_a = false;
                }
                out.push_str(roman);
            }
            None if telugu::is_passthrough(ch) => {
                if inherent_a {
                    out.push('a');
                    inherent_a = false;
                }
                out.push(ch);
            }
            None => return Err(TransliterationError::UnsupportedCharacter { ch, offset }),
        }
    }

    if inherent_a {
        out.push('a');
    }

    Ok(out)
}

/// Canonical (NFC) composition, so visually identical strings share one
/// code point sequence
pub fn compose(text: &str) -> String {
    text.nfc().collect()
}

/// Plain form of NFC-composed `text`; the key used for translated text
pub fn normalize_composed(text: &str) -> String {
    normalize_plain(&compose(text))
}

/// Canonical comparison form of source-script text.
///
/// Never fails: input that cannot be romanized degrades to the plain form of
/// the NFC-composed text.
pub fn to_comparable_form(text: &str, script: SourceScript) -> String {
    let composed = compose(text);

    match transliterate(&composed, script) {
        Ok(romanized) => normalize_plain(&romanized),
        Err(e) => {
            debug!(error = %e, %script, "Transliteration failed, comparing plain text");
            normalize_plain(&composed)
        }
    }
}
