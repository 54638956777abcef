//! Reference answer validator.

use super::types::{AnswerValidator, Problem};
use crate::core::constants::NUMERIC_ANSWER_TOLERANCE;

/// Numeric answers match within a tolerance, fractions compare by value and
/// anything else falls back to a case-insensitive string match.
///
/// Multiple-choice problems also accept the option letter (`"b"` for the
/// second option) when the submission is not itself the answer.
#[derive(Debug, Clone, Copy)]
pub struct StandardAnswerValidator {
    pub tolerance: f64,
}

impl Default for StandardAnswerValidator {
    fn default() -> Self {
        Self {
            tolerance: NUMERIC_ANSWER_TOLERANCE,
        }
    }
}

impl AnswerValidator for StandardAnswerValidator {
    fn validate(&self, problem: &Problem, submitted: &str) -> bool {
        let submitted = submitted.trim();
        if submitted.is_empty() {
            return false;
        }

        // The literal answer wins over an option letter
        if self.answers_match(&problem.answer, submitted) {
            return true;
        }

        self.resolve_option_letter(problem, submitted)
            .is_some_and(|option| self.answers_match(&problem.answer, option))
    }
}

impl StandardAnswerValidator {
    pub fn answers_match(&self, expected: &str, submitted: &str) -> bool {
        match (parse_number(expected), parse_number(submitted)) {
            (Some(a), Some(b)) => (a - b).abs() <= self.tolerance + f64::EPSILON,
            _ => normalize(expected) == normalize(submitted),
        }
    }

    fn resolve_option_letter<'p>(&self, problem: &'p Problem, submitted: &str) -> Option<&'p str> {
        if !problem.is_multiple_choice {
            return None;
        }
        let options = problem.options.as_ref()?;

        let mut chars = submitted.chars();
        let letter = chars.next()?.to_ascii_lowercase();
        if chars.next().is_some() || !letter.is_ascii_lowercase() {
            return None;
        }

        let index = (letter as u8 - b'a') as usize;
        options.get(index).map(String::as_str)
    }
}

/// Parses integers, decimals, simple fractions (`3/4`) and mixed numbers
/// (`1 1/2`, `-2 3/4`). Thousands separators are ignored.
pub fn parse_number(input: &str) -> Option<f64> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }

    let (negative, body) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, cleaned.as_str()),
    };

    let value = match body.split_once(' ') {
        Some((whole, fraction)) => {
            let whole: f64 = whole.parse().ok()?;
            let fraction = parse_fraction(fraction.trim())?;
            if whole < 0.0 || fraction < 0.0 {
                return None;
            }
            whole + fraction
        }
        None if body.contains('/') => parse_fraction(body)?,
        None => body.parse::<f64>().ok()?,
    };

    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

fn parse_fraction(input: &str) -> Option<f64> {
    let (numerator, denominator) = input.split_once('/')?;
    let numerator: f64 = numerator.trim().parse().ok()?;
    let denominator: f64 = denominator.trim().parse().ok()?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

fn normalize(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(expected: &str, submitted: &str) -> bool {
        let problem = Problem::new("?", expected, "test");
        StandardAnswerValidator::default().validate(&problem, submitted)
    }

    #[test]
    fn test_exact_integer() {
        assert!(check("42", "42"));
        assert!(check("42", " 42 "));
        assert!(!check("42", "41"));
    }

    #[test]
    fn test_numeric_tolerance() {
        assert!(check("3.14", "3.145"));
        assert!(check("0.5", "0.51"));
        assert!(!check("0.5", "0.52"));
    }

    #[test]
    fn test_fractions_compare_by_value() {
        assert!(check("1/2", "0.5"));
        assert!(check("0.75", "3/4"));
        assert!(check("2/4", "1/2"));
        assert!(check("1 1/2", "3/2"));
        assert!(check("-1/4", "-0.25"));
        assert!(!check("1/3", "0.3"));
    }

    #[test]
    fn test_thousands_separator() {
        assert!(check("1000", "1,000"));
    }

    #[test]
    fn test_case_insensitive_fallback() {
        assert!(check("Triangle", "triangle"));
        assert!(check("right  angle", "Right Angle"));
        assert!(!check("square", "circle"));
    }

    #[test]
    fn test_empty_answer_is_incorrect() {
        assert!(!check("0", ""));
        assert!(!check("0", "   "));
    }

    #[test]
    fn test_non_numeric_against_numeric_is_incorrect() {
        assert!(!check("12", "twelve"));
        assert!(!check("1/0", "1"));
    }

    #[test]
    fn test_multiple_choice_letter() {
        let problem = Problem::new("Which is prime?", "7", "primes").with_options(vec![
            "4".to_string(),
            "7".to_string(),
            "9".to_string(),
        ]);
        let validator = StandardAnswerValidator::default();
        assert!(validator.validate(&problem, "b"));
        assert!(validator.validate(&problem, "B"));
        assert!(validator.validate(&problem, "7"));
        assert!(!validator.validate(&problem, "a"));
        assert!(!validator.validate(&problem, "z"));
    }

    #[test]
    fn test_letter_options_accept_the_option_text() {
        let problem = Problem::new("Which vowel comes first?", "a", "letters").with_options(vec![
            "b".to_string(),
            "a".to_string(),
            "c".to_string(),
        ]);
        let validator = StandardAnswerValidator::default();
        assert!(validator.validate(&problem, "a"));
        assert!(validator.validate(&problem, "A"));
        // "b" still works as the letter of the second option
        assert!(validator.validate(&problem, "b"));
        assert!(!validator.validate(&problem, "c"));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("5"), Some(5.0));
        assert_eq!(parse_number("-2.5"), Some(-2.5));
        assert_eq!(parse_number("- 3/4"), Some(-0.75));
        assert_eq!(parse_number("2 1/4"), Some(2.25));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("1/0"), None);
        assert_eq!(parse_number(""), None);
    }
}
