// Parsing of the model's numeric resume score.

pub const MAX_SCORE: u8 = 100;

/// Reads a 0-100 score from a model reply.
///
/// The whole trimmed reply is tried first, then the first run of digits
/// ("Score: 85/100" gives 85). Values above 100 are clamped; a reply with
/// no number scores 0.
pub fn parse_score(text: &str) -> u8 {
    let trimmed = text.trim();
    let value = trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| first_integer(trimmed));
    match value {
        Some(v) => v.clamp(0, i64::from(MAX_SCORE)) as u8,
        None => 0,
    }
}

fn first_integer(text: &str) -> Option<i64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    // Absurdly long digit runs overflow i64; treat them as the maximum.
    Some(digits.parse::<i64>().unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_number() {
        assert_eq!(parse_score("85"), 85);
        assert_eq!(parse_score("  72\n"), 72);
    }

    #[test]
    fn test_clamped() {
        assert_eq!(parse_score("150"), 100);
        assert_eq!(parse_score("-5"), 0);
        assert_eq!(parse_score("99999999999999999999999"), 100);
    }

    #[test]
    fn test_number_inside_text() {
        assert_eq!(parse_score("Score: 78/100"), 78);
        assert_eq!(parse_score("I'd rate this 64."), 64);
    }

    #[test]
    fn test_no_number_is_zero() {
        assert_eq!(parse_score("excellent"), 0);
        assert_eq!(parse_score(""), 0);
    }
}
