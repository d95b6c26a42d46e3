//! EU-locale numeric parsing and formatting.
//!
//! BOQ exports from Czech/Slovak estimating tools write `1 234,56`:
//! spaces (often non-breaking) group thousands, `.` may group thousands
//! as well, and `,` is the decimal separator. An empty cell or a dash is
//! "no value", never zero.

/// Tokens that mean "no value" rather than zero.
const EMPTY_TOKENS: [&str; 4] = ["", "-", "–", "—"];

/// Outcome of parsing one numeric cell.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberToken {
    /// Cell was empty or a dash placeholder.
    Absent,
    /// A finite number.
    Value(f64),
    /// Cell held something, but not a number; the raw text is kept so
    /// downstream validation can report it.
    Invalid(String),
}

impl NumberToken {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// Parses a cell under EU locale rules.
pub fn parse_eu(raw: &str) -> NumberToken {
    let stripped: String = raw
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '\u{a0}' && *ch != '\u{202f}')
        .collect();

    if EMPTY_TOKENS.contains(&stripped.as_str()) {
        return NumberToken::Absent;
    }

    let candidate = if stripped.contains(',') {
        // comma decimal, any dots are grouping
        stripped.replace('.', "").replace(',', ".")
    } else if is_dot_grouped(&stripped) {
        stripped.replace('.', "")
    } else {
        stripped.clone()
    };

    match candidate.parse::<f64>() {
        Ok(value) if value.is_finite() => NumberToken::Value(value),
        _ => NumberToken::Invalid(raw.trim().to_string()),
    }
}

/// `1.234.567` — dots used purely as thousands grouping.
fn is_dot_grouped(s: &str) -> bool {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let mut parts = unsigned.split('.');
    let Some(head) = parts.next() else {
        return false;
    };
    if head.is_empty() || head.len() > 3 || !head.chars().all(|ch| ch.is_ascii_digit()) {
        return false;
    }
    let mut groups = 0;
    for part in parts {
        if part.len() != 3 || !part.chars().all(|ch| ch.is_ascii_digit()) {
            return false;
        }
        groups += 1;
    }
    groups > 0
}

/// Formats a value back into the same locale: space-grouped integer part,
/// comma decimal separator, trailing zeros trimmed.
pub fn format_eu(value: f64) -> String {
    let formatted = format!("{value:.6}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (trimmed, None),
    };

    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::new();
    let len = digits.len();
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped},{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_eu_grouped_decimal() {
        assert_eq!(parse_eu("1 234,56"), NumberToken::Value(1234.56));
        assert_eq!(parse_eu("1\u{a0}234,56"), NumberToken::Value(1234.56));
        assert_eq!(parse_eu("1.234,56"), NumberToken::Value(1234.56));
    }

    #[test]
    fn comma_is_decimal_separator() {
        assert_eq!(parse_eu("150,5"), NumberToken::Value(150.5));
        assert_eq!(parse_eu("0,001"), NumberToken::Value(0.001));
    }

    #[test]
    fn dot_grouping_without_comma() {
        assert_eq!(parse_eu("1.234.567"), NumberToken::Value(1_234_567.0));
        // a lone dot that is not grouping reads as a decimal point
        assert_eq!(parse_eu("150.5"), NumberToken::Value(150.5));
        assert_eq!(parse_eu("1234"), NumberToken::Value(1234.0));
    }

    #[test]
    fn empty_tokens_are_absent_not_zero() {
        for token in ["", "-", "–", "—", " ", " - "] {
            assert_eq!(parse_eu(token), NumberToken::Absent, "token {token:?}");
        }
    }

    #[test]
    fn garbage_is_invalid_with_raw_preserved() {
        assert_eq!(
            parse_eu("cca 15"),
            NumberToken::Invalid("cca 15".to_string())
        );
        assert_eq!(parse_eu("1,2,3"), NumberToken::Invalid("1,2,3".to_string()));
    }

    #[test]
    fn negative_values_parse() {
        assert_eq!(parse_eu("-1 234,5"), NumberToken::Value(-1234.5));
    }

    #[test]
    fn format_round_trips_the_spec_literal() {
        assert_eq!(format_eu(1234.56), "1 234,56");
        assert_eq!(parse_eu(&format_eu(1234.56)), NumberToken::Value(1234.56));
    }

    #[test]
    fn format_trims_trailing_zeros() {
        assert_eq!(format_eu(150.0), "150");
        assert_eq!(format_eu(0.5), "0,5");
        assert_eq!(format_eu(-1234567.25), "-1 234 567,25");
    }
}
