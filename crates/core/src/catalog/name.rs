//! Display-name validation for catalog services.

use crate::error::HotelError;
use crate::sanitize::Sanitizer;

/// Shortest accepted name, in characters.
pub const MIN_NAME_CHARS: usize = 2;
/// Longest accepted name, in characters.
pub const MAX_NAME_CHARS: usize = 80;

/// Words that never belong in a guest-facing catalog: placeholder markers
/// and profanity.
const DISALLOWED_WORDS: &[&str] = &[
    "test", "dummy", "lorem", "ipsum", "xxx", "asdf", "qwerty", "fuck", "shit", "merde",
    "putain", "connard",
];

/// Sanitizes and validates a service name.
///
/// Words are compared case-insensitively on alphanumeric boundaries, so
/// "Contest dinner" passes while "Test dinner" does not.
///
/// # Errors
///
/// Returns `HotelError::InvalidName` if the cleaned name is too short, has
/// no letter, or contains a disallowed word.
pub fn validate_service_name(sanitizer: &dyn Sanitizer, raw: &str) -> Result<String, HotelError> {
    // Sanitize one char past the limit so over-long input is reported, not cut.
    let name = sanitizer.sanitize(raw, MAX_NAME_CHARS + 1);
    let chars = name.chars().count();

    if chars < MIN_NAME_CHARS {
        return Err(HotelError::InvalidName(format!(
            "name must be at least {MIN_NAME_CHARS} characters"
        )));
    }
    if chars > MAX_NAME_CHARS {
        return Err(HotelError::InvalidName(format!(
            "name must be at most {MAX_NAME_CHARS} characters"
        )));
    }
    if !name.chars().any(char::is_alphabetic) {
        return Err(HotelError::InvalidName(
            "name must contain at least one letter".to_string(),
        ));
    }
    if let Some(word) = name
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .find(|word| DISALLOWED_WORDS.contains(&word.as_str()))
    {
        return Err(HotelError::InvalidName(format!(
            "name contains the disallowed word {word:?}"
        )));
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::MarkupSanitizer;

    fn validate(raw: &str) -> Result<String, HotelError> {
        validate_service_name(&MarkupSanitizer, raw)
    }

    #[test]
    fn test_valid_names_are_cleaned() {
        assert_eq!(validate("  Petit  déjeuner ").unwrap(), "Petit déjeuner");
        assert_eq!(validate("<i>Spa</i> access").unwrap(), "Spa access");
        assert_eq!(validate("Contest dinner").unwrap(), "Contest dinner");
    }

    #[test]
    fn test_length_limits() {
        assert!(validate("A").is_err());
        assert!(validate("<b></b>x").is_err());
        assert!(validate(&"a".repeat(80)).is_ok());
        assert!(matches!(
            validate(&"a".repeat(81)),
            Err(HotelError::InvalidName(_))
        ));
    }

    #[test]
    fn test_disallowed_words() {
        assert!(validate("Test breakfast").is_err());
        assert!(validate("Breakfast (DUMMY)").is_err());
        assert!(validate("lorem-ipsum").is_err());
    }

    #[test]
    fn test_requires_a_letter() {
        assert!(validate("123").is_err());
        assert!(validate("1st floor parking").is_ok());
    }
}
