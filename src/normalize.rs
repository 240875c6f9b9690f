//! Line scrubbing and whitespace tokenization.
//!
//! Only lowercase ASCII letters, space, hyphen and apostrophe survive
//! normalization. Everything else is deleted outright (not replaced by a
//! space), so `"don't!"` becomes `"don't"` and `"e-mail"` stays one token.

/// Characters allowed inside a normalized line. Space is the token separator.
pub const TOKEN_CHARACTERS: &str = " abcdefghijklmnopqrstuvwxyz-'";

fn is_token_char(c: char) -> bool {
    TOKEN_CHARACTERS.contains(c)
}

/// Lowercase ASCII and drop every character outside [`TOKEN_CHARACTERS`].
pub fn normalize_line(raw: &str) -> String {
    raw.chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(|&c| is_token_char(c))
        .collect()
}

/// Split a normalized line on spaces, skipping empty tokens.
pub fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    line.split(' ').filter(|token| !token.is_empty())
}

/// A token the index accepts: non-empty, no separators, only token characters.
pub fn is_valid_token(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c != ' ' && is_token_char(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_and_lowercases() {
        assert_eq!(normalize_line("The Cat, sat!"), "the cat sat");
        assert_eq!(normalize_line("Don't e-Mail 42 times."), "don't e-mail  times");
        assert_eq!(normalize_line("tab\there\r"), "tabhere");
        assert_eq!(normalize_line("café naïve"), "caf nave");
    }

    #[test]
    fn blank_after_normalization() {
        assert_eq!(normalize_line("12345 !?"), " ");
        assert_eq!(tokenize(&normalize_line("12345 !?")).count(), 0);
        assert_eq!(normalize_line(""), "");
    }

    #[test]
    fn tokenizes_on_spaces_only() {
        let tokens: Vec<_> = tokenize("  the  cat's -- e-mail ").collect();
        assert_eq!(tokens, ["the", "cat's", "--", "e-mail"]);
    }

    #[test]
    fn token_character_set_matches_filter() {
        for c in TOKEN_CHARACTERS.chars() {
            assert!(is_token_char(c), "{c:?} should be accepted");
        }
        assert!(!is_token_char('A'));
        assert!(!is_token_char('\t'));
    }

    #[test]
    fn validates_tokens() {
        assert!(is_valid_token("cat"));
        assert!(is_valid_token("don't"));
        assert!(is_valid_token("-"));
        assert!(!is_valid_token(""));
        assert!(!is_valid_token("two words"));
        assert!(!is_valid_token("Cat"));
        assert!(!is_valid_token("c4t"));
    }
}
