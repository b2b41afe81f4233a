//! Free-text sanitization.

/// Cleans user-supplied text before it is validated or stored.
pub trait Sanitizer: Send + Sync {
    /// Returns `input` stripped of markup and control characters, with
    /// whitespace collapsed, trimmed, and truncated to `max_chars`.
    fn sanitize(&self, input: &str, max_chars: usize) -> String;
}

/// Default sanitizer: drops anything between `<` and `>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupSanitizer;

impl Sanitizer for MarkupSanitizer {
    fn sanitize(&self, input: &str, max_chars: usize) -> String {
        let mut out = String::with_capacity(input.len());
        let mut in_tag = false;
        let mut pending_space = false;

        for c in input.chars() {
            match c {
                '<' => in_tag = true,
                '>' if in_tag => {
                    in_tag = false;
                    pending_space = true;
                }
                _ if in_tag => {}
                c if c.is_whitespace() => pending_space = true,
                c if c.is_control() => {}
                c => {
                    if pending_space && !out.is_empty() {
                        out.push(' ');
                    }
                    pending_space = false;
                    out.push(c);
                }
            }
        }

        match out.char_indices().nth(max_chars) {
            Some((cut, _)) => out[..cut].trim_end().to_string(),
            None => out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(input: &str) -> String {
        MarkupSanitizer.sanitize(input, 80)
    }

    #[test]
    fn test_strips_markup() {
        assert_eq!(clean("<b>Late</b> checkout"), "Late checkout");
        assert_eq!(clean("<script>alert(1)</script>Spa"), "alert(1) Spa");
        assert_eq!(clean("Room<br/>service"), "Room service");
    }

    #[test]
    fn test_collapses_whitespace_and_controls() {
        assert_eq!(clean("  Mini \t\n bar  "), "Mini bar");
        assert_eq!(clean("Park\u{0007}ing"), "Parking");
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        assert_eq!(MarkupSanitizer.sanitize("Petit-déjeuner", 8), "Petit-dé");
        assert_eq!(MarkupSanitizer.sanitize("ab cd", 3), "ab");
    }
}
