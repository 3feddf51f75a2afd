//! Lexical classification of single argument tokens.
//!
//! Classification looks only at the token's shape. Whether a `--name`
//! token is a flag or takes a value is decided later by the parser using
//! its [`OptionRegistry`](super::OptionRegistry).

/// The lexical shape of one argument token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// `--` on its own: everything after it is positional.
    EndOfOptions,
    /// `--name=value`. The value is everything after the first `=`.
    Assignment {
        /// Raw name without the leading dashes.
        name: &'a str,
        /// Raw value, possibly empty.
        value: &'a str,
    },
    /// `--name` without a value.
    Long(&'a str),
    /// `-abc`: one flag per letter.
    ShortGroup(&'a str),
    /// Anything else.
    Bare(&'a str),
}

/// Classifies a raw token by shape.
///
/// # Examples
///
/// ```
/// use shellkit::args::{classify, Token};
///
/// assert_eq!(classify("--out=a=b"), Token::Assignment { name: "out", value: "a=b" });
/// assert_eq!(classify("-xvf"), Token::ShortGroup("xvf"));
/// assert_eq!(classify("-1"), Token::Bare("-1"));
/// ```
#[must_use]
pub fn classify(raw: &str) -> Token<'_> {
    if raw == "--" {
        return Token::EndOfOptions;
    }

    if let Some(rest) = raw.strip_prefix("--") {
        return match rest.split_once('=') {
            Some((name, value)) if !name.is_empty() => Token::Assignment { name, value },
            // `--=x` has no name to assign to
            Some(_) => Token::Bare(raw),
            None => Token::Long(rest),
        };
    }

    if let Some(rest) = raw.strip_prefix('-') {
        if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Token::ShortGroup(rest);
        }
    }

    Token::Bare(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_of_options() {
        assert_eq!(classify("--"), Token::EndOfOptions);
    }

    #[test]
    fn test_assignment_splits_on_first_equals() {
        assert_eq!(
            classify("--filter=a=b"),
            Token::Assignment {
                name: "filter",
                value: "a=b"
            }
        );
    }

    #[test]
    fn test_assignment_with_empty_value() {
        assert_eq!(
            classify("--name="),
            Token::Assignment {
                name: "name",
                value: ""
            }
        );
    }

    #[test]
    fn test_assignment_without_name_is_bare() {
        assert_eq!(classify("--=value"), Token::Bare("--=value"));
    }

    #[test]
    fn test_long_option() {
        assert_eq!(classify("--dry-run"), Token::Long("dry-run"));
    }

    #[test]
    fn test_short_group() {
        assert_eq!(classify("-abc"), Token::ShortGroup("abc"));
        assert_eq!(classify("-V"), Token::ShortGroup("V"));
    }

    #[test]
    fn test_single_dash_non_letters_are_bare() {
        assert_eq!(classify("-"), Token::Bare("-"));
        assert_eq!(classify("-1"), Token::Bare("-1"));
        assert_eq!(classify("-x=3"), Token::Bare("-x=3"));
        assert_eq!(classify("-é"), Token::Bare("-é"));
    }

    #[test]
    fn test_plain_words_are_bare() {
        assert_eq!(classify("file.txt"), Token::Bare("file.txt"));
        assert_eq!(classify(""), Token::Bare(""));
    }
}
