//! logos-based route template tokenizer.
//!
//! A template such as `/users/:id/posts` lexes into separators, named
//! parameters and literal segments. Token priority follows logos rules:
//!
//! 1. Longest match wins (`a:b` is one [`Token::Literal`], not `a` + `:b`)
//! 2. For equal length matches, earlier-defined variants win
//!
//! A lone `:` matches nothing and surfaces as a lexing error.

use logos::Logos;

/// Route template token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    /// `/` segment separator.
    #[token("/")]
    Slash,

    /// Named parameter: `:id`, `:slug`.
    #[regex(r":[^/]+")]
    Param,

    /// Literal segment text. May contain `:` after the first character.
    #[regex(r"[^/:][^/]*")]
    Literal,
}

/// A lexing failure at a byte offset in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// Byte offset of the unlexable text.
    pub offset: usize,
    /// The text that failed to lex.
    pub text: String,
}

/// Tokenize a route template into `(Token, text)` pairs.
///
/// A single unlexable span fails the whole template.
pub fn tokenize(input: &str) -> Result<Vec<(Token, String)>, LexError> {
    let mut out = Vec::new();
    for (result, span) in Token::lexer(input).spanned() {
        match result {
            Ok(token) => out.push((token, input[span].to_string())),
            Err(()) => {
                return Err(LexError {
                    offset: span.start,
                    text: input[span].to_string(),
                })
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input)
            .expect("template should lex")
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_root() {
        assert_eq!(tokens("/"), vec![Token::Slash]);
    }

    #[test]
    fn test_literal_and_param() {
        assert_eq!(
            tokenize("/users/:id").unwrap(),
            vec![
                (Token::Slash, "/".into()),
                (Token::Literal, "users".into()),
                (Token::Slash, "/".into()),
                (Token::Param, ":id".into()),
            ]
        );
    }

    #[test]
    fn test_colon_inside_literal() {
        assert_eq!(
            tokenize("/a:b").unwrap(),
            vec![(Token::Slash, "/".into()), (Token::Literal, "a:b".into())]
        );
    }

    #[test]
    fn test_repeated_slashes() {
        assert_eq!(
            tokens("//home//"),
            vec![
                Token::Slash,
                Token::Slash,
                Token::Literal,
                Token::Slash,
                Token::Slash,
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(tokens("").is_empty());
    }

    #[test]
    fn test_lone_colon_is_error() {
        let err = tokenize("/users/:").unwrap_err();
        assert_eq!(err.offset, 7);
        assert_eq!(err.text, ":");
    }
}
