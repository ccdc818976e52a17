//! Cardinal number spelling for digit-only tokens.

const UNITS: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven", "twelve", "thirteen", "fourteen", "fifteen",
    "sixteen", "seventeen", "eighteen", "nineteen",
];

const TENS: [&str; 10] = ["", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety"];

/// Names of the thousand groups, indexed by group position (0 = units).
const SCALES: [&str; 12] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
    "sextillion",
    "septillion",
    "octillion",
    "nonillion",
    "decillion",
];

/// Spell a string of ASCII digits as an English cardinal number.
///
/// Hundreds take "and" before a non-zero remainder, thousand groups are
/// separated by ", ", and a trailing group below one hundred is joined with
/// "and" (`1005` -> "one thousand and five"). Leading zeros are ignored.
/// Numbers too long to name are read digit by digit.
///
/// Input that is empty or contains anything but ASCII digits is returned
/// unchanged.
pub fn number_to_words(digits: &str) -> String {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return digits.to_string();
    }

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return UNITS[0].to_string();
    }

    if significant.len() > SCALES.len() * 3 {
        return digits.bytes().map(|b| UNITS[(b - b'0') as usize]).collect::<Vec<_>>().join(" ");
    }

    // Thousand groups, least significant first
    let bytes = significant.as_bytes();
    let groups: Vec<u16> = bytes
        .rchunks(3)
        .map(|chunk| chunk.iter().fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0')))
        .collect();

    let mut spoken: Vec<(usize, u16, String)> = Vec::new();
    for (position, &value) in groups.iter().enumerate().rev() {
        if value == 0 {
            continue;
        }
        let mut words = group_to_words(value);
        if position > 0 {
            words.push(' ');
            words.push_str(SCALES[position]);
        }
        spoken.push((position, value, words));
    }

    let mut result = String::new();
    for (i, (position, value, words)) in spoken.iter().enumerate() {
        if i > 0 {
            let is_small_tail = *position == 0 && *value < 100;
            result.push_str(if is_small_tail { " and " } else { ", " });
        }
        result.push_str(words);
    }
    result
}

/// Spell a value in `1..=999`.
fn group_to_words(value: u16) -> String {
    let hundreds = value / 100;
    let rest = value % 100;

    match (hundreds, rest) {
        (0, rest) => tens_to_words(rest),
        (h, 0) => format!("{} hundred", UNITS[h as usize]),
        (h, rest) => format!("{} hundred and {}", UNITS[h as usize], tens_to_words(rest)),
    }
}

/// Spell a value in `0..=99`.
fn tens_to_words(value: u16) -> String {
    if value < 20 {
        return UNITS[value as usize].to_string();
    }
    let (tens, units) = ((value / 10) as usize, (value % 10) as usize);
    if units == 0 { TENS[tens].to_string() } else { format!("{}-{}", TENS[tens], UNITS[units]) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_numbers() {
        assert_eq!(number_to_words("0"), "zero");
        assert_eq!(number_to_words("7"), "seven");
        assert_eq!(number_to_words("12"), "twelve");
        assert_eq!(number_to_words("19"), "nineteen");
        assert_eq!(number_to_words("20"), "twenty");
        assert_eq!(number_to_words("42"), "forty-two");
    }

    #[test]
    fn test_hundreds() {
        assert_eq!(number_to_words("100"), "one hundred");
        assert_eq!(number_to_words("123"), "one hundred and twenty-three");
        assert_eq!(number_to_words("909"), "nine hundred and nine");
    }

    #[test]
    fn test_thousand_groups() {
        assert_eq!(number_to_words("1000"), "one thousand");
        assert_eq!(number_to_words("1005"), "one thousand and five");
        assert_eq!(number_to_words("1100"), "one thousand, one hundred");
        assert_eq!(number_to_words("1234"), "one thousand, two hundred and thirty-four");
        assert_eq!(number_to_words("2000000"), "two million");
        assert_eq!(number_to_words("1000001"), "one million and one");
        assert_eq!(number_to_words("3000400"), "three million, four hundred");
    }

    #[test]
    fn test_years_read_as_cardinals() {
        assert_eq!(number_to_words("1984"), "one thousand, nine hundred and eighty-four");
    }

    #[test]
    fn test_leading_zeros() {
        assert_eq!(number_to_words("007"), "seven");
        assert_eq!(number_to_words("000"), "zero");
    }

    #[test]
    fn test_huge_numbers_read_digit_by_digit() {
        let digits = "1".repeat(37);
        let words = number_to_words(&digits);
        assert_eq!(words.split(' ').count(), 37);
        assert!(words.split(' ').all(|w| w == "one"));
    }

    #[test]
    fn test_largest_named_scale() {
        let digits = format!("1{}", "0".repeat(33));
        assert_eq!(number_to_words(&digits), "one decillion");
    }

    #[test]
    fn test_non_digits_pass_through() {
        assert_eq!(number_to_words("12a"), "12a");
        assert_eq!(number_to_words(""), "");
    }
}
