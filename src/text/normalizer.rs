//! Token normalization for speakable text.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::numbers::number_to_words;

/// A run of 2-5 capitals preceded by start, whitespace or `(`.
/// `\b` on the right also covers a closing parenthesis.
static ACRONYM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|\s|\()([A-Z]{2,5})\b").expect("acronym pattern is valid"));

/// Normalize a fragment into text the synthesizer reads naturally.
///
/// Digit-only tokens (ignoring surrounding `.`, `,` and `;`) are spelled out,
/// short all-caps runs are letter-spaced, hyphens become spaces and the
/// result ends with exactly one period.
///
/// # Example
/// ```ignore
/// assert_eq!(normalize("I have 12 cats and work at NASA."), "I have twelve cats and work at N A S A.");
/// ```
pub fn normalize(fragment: &str) -> String {
    let joined = fragment.split_whitespace().map(normalize_token).collect::<Vec<_>>().join(" ");
    let spaced = joined.replace('-', " ");
    format!("{}.", spaced.trim_end_matches('.'))
}

/// Normalize a single whitespace-free token.
fn normalize_token(token: &str) -> Cow<'_, str> {
    let stripped = token.trim_matches(|c| matches!(c, '.' | ',' | ';'));
    if !stripped.is_empty() && stripped.bytes().all(|b| b.is_ascii_digit()) {
        // Punctuation around the number is dropped with it
        Cow::Owned(number_to_words(stripped))
    } else {
        space_acronyms(token)
    }
}

/// Insert single spaces between the letters of short all-caps runs.
///
/// A run of 2 to 5 uppercase ASCII letters qualifies when it starts the text
/// or follows whitespace or `(`, and ends at a word boundary or `)`. Anything
/// around the run is left as is, so `"(NASA's)"` becomes `"(N A S A's)"`.
pub fn space_acronyms(text: &str) -> Cow<'_, str> {
    ACRONYM.replace_all(text, |caps: &Captures| {
        let letters: Vec<String> = caps[2].chars().map(String::from).collect();
        format!("{}{}", &caps[1], letters.join(" "))
    })
}
