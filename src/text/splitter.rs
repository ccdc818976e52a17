//! Sentence fragment splitting.

/// Minimum trimmed length for a fragment to be narrated.
const MIN_FRAGMENT_CHARS: usize = 2;

/// Lazy iterator over the narratable fragments of one line.
///
/// Created fresh for every line by [`split_line`].
pub struct Fragments<'a> {
    parts: std::str::Split<'a, char>,
}

impl<'a> Iterator for Fragments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        // Short remainders (single letters, the trailing newline) are dropped
        self.parts.by_ref().map(str::trim).find(|part| part.chars().count() >= MIN_FRAGMENT_CHARS)
    }
}

/// Split a source line on periods into trimmed fragments.
///
/// Fragments shorter than two characters after trimming are skipped without
/// leaving a placeholder.
///
/// # Arguments
/// * `line` - A raw line from the source document, newline included or not
pub fn split_line(line: &str) -> Fragments<'_> {
    Fragments { parts: line.split('.') }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(line: &str) -> Vec<&str> {
        split_line(line).collect()
    }

    #[test]
    fn test_splits_on_periods() {
        assert_eq!(collect("First one. Second one.\n"), vec!["First one", "Second one"]);
    }

    #[test]
    fn test_drops_short_fragments() {
        // "a" and the newline remainder are both too short
        assert_eq!(collect("Hello. a. World.\n"), vec!["Hello", "World"]);
    }

    #[test]
    fn test_two_characters_is_enough() {
        assert_eq!(collect("Hi."), vec!["Hi"]);
    }

    #[test]
    fn test_blank_line_yields_nothing() {
        assert!(collect("\n").is_empty());
        assert!(collect("").is_empty());
        assert!(collect("...").is_empty());
    }

    #[test]
    fn test_decimal_numbers_are_split() {
        assert_eq!(collect("Pi is 3.14 roughly"), vec!["Pi is 3", "14 roughly"]);
    }

    #[test]
    fn test_line_without_period() {
        assert_eq!(collect("  no terminator here  \n"), vec!["no terminator here"]);
    }
}
