// src/detect/matcher.rs
//! Shared text matching primitives for rule evaluation.
//!
//! Matching is case-insensitive against a normalized view of the text, but
//! reported evidence is always the literal substring of the *original*
//! requirement text.

/// Normalizes text for comparison: lowercase, whitespace collapsed to
/// single spaces, trimmed.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Finds `term` in `text` as a whole word, ignoring ASCII case. Returns the
/// matching slice of the original text.
///
/// Whitespace is collapsed on both sides before matching, so a multi-word
/// term matches across any internal run of whitespace; the returned
/// evidence span still covers the original text verbatim, run included.
#[must_use]
pub fn find_term<'a>(text: &'a str, term: &str) -> Option<&'a str> {
    let needle = normalize(term);
    if needle.is_empty() {
        return None;
    }

    // Collapsed, lowercased haystack plus a byte map back into `text`.
    // ASCII lowercasing keeps byte lengths, so every haystack byte has an
    // exact original offset.
    let mut haystack = String::with_capacity(text.len());
    let mut offsets: Vec<usize> = Vec::with_capacity(text.len() + 1);
    let mut in_whitespace = false;
    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if !in_whitespace && !haystack.is_empty() {
                haystack.push(' ');
                offsets.push(idx);
            }
            in_whitespace = true;
        } else {
            in_whitespace = false;
            haystack.push(ch.to_ascii_lowercase());
            for off in 0..ch.len_utf8() {
                offsets.push(idx + off);
            }
        }
    }
    offsets.push(text.len());

    let mut from = 0;
    while let Some(pos) = haystack[from..].find(&needle) {
        let start = from + pos;
        let end = start + needle.len();
        if is_word_boundary(&haystack, start, end) {
            return Some(&text[offsets[start]..offsets[end]]);
        }
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// Returns true if any of the terms occurs in the text as a whole word.
#[must_use]
pub fn contains_any(text: &str, terms: &[String]) -> bool {
    terms.iter().any(|t| find_term(text, t).is_some())
}

fn is_word_boundary(haystack: &str, start: usize, end: usize) -> bool {
    let before_ok = start == 0
        || haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
    let after_ok = end == haystack.len()
        || haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
    before_ok && after_ok
}

/// Word-bigram Dice coefficient between two normalized texts, in `0.0..=1.0`.
/// Deterministic and cheap; used for duplicate-requirement detection.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let bigrams = |s: &str| -> Vec<(String, String)> {
        let words: Vec<&str> = s.split(' ').collect();
        words
            .windows(2)
            .map(|w| (w[0].to_string(), w[1].to_string()))
            .collect()
    };

    let na = normalize(a);
    let nb = normalize(b);
    if na == nb {
        return 1.0;
    }

    let ba = bigrams(&na);
    let bb = bigrams(&nb);
    if ba.is_empty() || bb.is_empty() {
        return 0.0;
    }

    let mut remaining = bb.clone();
    let mut shared = 0usize;
    for gram in &ba {
        if let Some(idx) = remaining.iter().position(|g| g == gram) {
            remaining.swap_remove(idx);
            shared += 1;
        }
    }

    (2.0 * shared as f64) / (ba.len() + bb.len()) as f64
}

/// Renders a rule message template, interpolating `{evidence}` and
/// `{other}` placeholders.
#[must_use]
pub fn render_message(template: &str, evidence: &str, other: Option<&str>) -> String {
    let mut rendered = template.replace("{evidence}", evidence);
    if let Some(other) = other {
        rendered = rendered.replace("{other}", other);
    }
    rendered
}
