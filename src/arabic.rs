//! Arabic transcript normalization.
//!
//! Whisper's Arabic output is inconsistent about diacritics, hamza carriers,
//! and a handful of high-frequency words. We normalize transcripts into a
//! plain, searchable form:
//!
//! 1. strip diacritics (tashkeel)
//! 2. fold alef-with-hamza forms into bare alef
//! 3. fold hamza carriers into a bare hamza
//! 4. collapse whitespace runs and trim
//! 5. apply a fixed table of common recognition fixes
//!
//! Step 5 runs after the folding steps on purpose: folding removes hamzas
//! everywhere, and the table restores them for common pronouns where they are
//! known to belong.
//!
//! This is applied only to transcripts whose resolved language is Arabic, and
//! never after translation (translated output is English).

use std::sync::LazyLock;

use regex::Regex;

use crate::segments::{Segment, Transcript};

/// Tashkeel marks (fathatan through wavy hamza, plus superscript alef).
static DIACRITICS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{064B}-\u{065F}\u{0670}]").expect("diacritics pattern"));

/// Alef with hamza above/below and alef madda, plus bare alef.
static ALEF_FORMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[إأآا]").expect("alef pattern"));

/// Hamza on waw or ya carriers.
static HAMZA_FORMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[ؤئ]").expect("hamza pattern"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Fixed corrections for recognition mistakes Whisper makes often in Arabic.
const REPLACEMENTS: &[(&str, &str)] = &[
    // ta marbuta heard as ha
    ("اه ", "اة "),
    (" ه ", " ة "),
    // common phrase correction
    ("هذه", "هذا"),
    // restore the hamza on common pronouns after alef folding
    ("انا", "أنا"),
    ("انت", "أنت"),
];

/// Normalize one piece of Arabic text.
///
/// Empty input passes through unchanged.
pub fn normalize_arabic_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = DIACRITICS.replace_all(text, "");
    let text = ALEF_FORMS.replace_all(&text, "ا");
    let text = HAMZA_FORMS.replace_all(&text, "ء");
    let text = WHITESPACE.replace_all(&text, " ");
    let mut text = text.trim().to_owned();

    for (from, to) in REPLACEMENTS {
        text = text.replace(from, to);
    }

    text
}

/// Normalize every segment of a transcript in place, then rebuild the full
/// text from the normalized segments so the two never disagree.
pub fn normalize_transcript(transcript: &mut Transcript) {
    for segment in &mut transcript.segments {
        normalize_segment(segment);
    }
    transcript.rebuild_text();
}

fn normalize_segment(segment: &mut Segment) {
    segment.text = normalize_arabic_text(&segment.text);
}
