//! Tokenizer for arithmetic input.

use crate::calculator::Number;
use crate::error::EvalError;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(Number),
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", crate::calculator::format_number(*n)),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::StarStar => f.write_str("**"),
            Token::Slash => f.write_str("/"),
            Token::Percent => f.write_str("%"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

/// Split input into tokens, rejecting anything outside the arithmetic
/// alphabet.
pub fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => tokens.push(Token::Number(number(input, start, &mut chars)?)),
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                if matches!(chars.peek(), Some((_, '*'))) {
                    chars.next();
                    tokens.push(Token::StarStar);
                } else {
                    tokens.push(Token::Star);
                }
            }
            '/' => {
                chars.next();
                if matches!(chars.peek(), Some((_, '/'))) {
                    return Err(EvalError::Disallowed("floor division".into()));
                }
                tokens.push(Token::Slash);
            }
            '%' => {
                chars.next();
                tokens.push(Token::Percent);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            c if c.is_alphabetic() || c == '_' => {
                let name: String = take_while(&mut chars, |c| c.is_alphanumeric() || c == '_');
                return Err(EvalError::Disallowed(format!("name `{}`", name)));
            }
            '\'' | '"' => return Err(EvalError::Disallowed("string literal".into())),
            '[' | ']' | '{' | '}' | ',' => {
                return Err(EvalError::Disallowed("collection literal".into()))
            }
            '<' | '>' | '=' | '!' => return Err(EvalError::Disallowed("comparison".into())),
            '&' | '|' | '^' | '~' => {
                return Err(EvalError::Disallowed("bitwise operator".into()))
            }
            other => {
                return Err(EvalError::Syntax(format!(
                    "unexpected character `{}`",
                    other
                )))
            }
        }
    }

    Ok(tokens)
}

fn take_while(chars: &mut Peekable<CharIndices<'_>>, pred: impl Fn(char) -> bool) -> String {
    let mut out = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if !pred(c) {
            break;
        }
        out.push(c);
        chars.next();
    }
    out
}

/// Lex `digits ['.' digits] [exponent]` or `'.' digits [exponent]`.
fn number(
    input: &str,
    start: usize,
    chars: &mut Peekable<CharIndices<'_>>,
) -> Result<Number, EvalError> {
    let mut end = start;
    let mut is_float = false;
    let mut digits = 0usize;

    while let Some(&(_, c)) = chars.peek() {
        match c {
            '0'..='9' => digits += 1,
            '.' if !is_float => is_float = true,
            _ => break,
        }
        bump(chars, &mut end);
    }

    if digits == 0 {
        return Err(EvalError::Syntax("stray `.`".into()));
    }

    // Exponent only when followed by digits; otherwise the `e` starts a name.
    if let Some(&(_, 'e' | 'E')) = chars.peek() {
        let rest = &input[end..];
        let sign_len = usize::from(matches!(rest.chars().nth(1), Some('+' | '-')));
        let exp_digits = rest
            .chars()
            .skip(1 + sign_len)
            .take_while(|c| c.is_ascii_digit())
            .count();
        if exp_digits > 0 {
            is_float = true;
            for _ in 0..(1 + sign_len + exp_digits) {
                bump(chars, &mut end);
            }
        }
    }

    let literal = &input[start..end];
    if !is_float {
        if let Ok(n) = literal.parse::<i64>() {
            return Ok(Number::Int(n));
        }
    }

    let value: f64 = literal
        .parse()
        .map_err(|_| EvalError::Syntax(format!("bad number `{}`", literal)))?;
    if value.is_finite() {
        Ok(Number::Float(value))
    } else {
        Err(EvalError::Overflow)
    }
}

fn bump(chars: &mut Peekable<CharIndices<'_>>, end: &mut usize) {
    if let Some((i, c)) = chars.next() {
        *end = i + c.len_utf8();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators() {
        let tokens = tokenize("1 + 2 ** 3 % (4 / 5) * -6").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(Number::Int(1)),
                Token::Plus,
                Token::Number(Number::Int(2)),
                Token::StarStar,
                Token::Number(Number::Int(3)),
                Token::Percent,
                Token::LParen,
                Token::Number(Number::Int(4)),
                Token::Slash,
                Token::Number(Number::Int(5)),
                Token::RParen,
                Token::Star,
                Token::Minus,
                Token::Number(Number::Int(6)),
            ]
        );
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(tokenize("12.5").unwrap(), vec![Token::Number(Number::Float(12.5))]);
        assert_eq!(tokenize(".5").unwrap(), vec![Token::Number(Number::Float(0.5))]);
        assert_eq!(tokenize("5.").unwrap(), vec![Token::Number(Number::Float(5.0))]);
        assert_eq!(tokenize("1e3").unwrap(), vec![Token::Number(Number::Float(1000.0))]);
        assert_eq!(tokenize("2E-2").unwrap(), vec![Token::Number(Number::Float(0.02))]);
    }

    #[test]
    fn test_huge_integer_becomes_float() {
        let tokens = tokenize("123456789012345678901234").unwrap();
        assert!(matches!(tokens[0], Token::Number(Number::Float(_))));
    }

    #[test]
    fn test_rejects_names() {
        assert_eq!(
            tokenize("a+1"),
            Err(EvalError::Disallowed("name `a`".into()))
        );
        assert!(matches!(tokenize("2e"), Err(EvalError::Disallowed(_))));
        assert!(matches!(tokenize("1 .real"), Err(EvalError::Syntax(_))));
    }

    #[test]
    fn test_rejects_other_constructs() {
        assert!(matches!(tokenize("'x'"), Err(EvalError::Disallowed(_))));
        assert!(matches!(tokenize("[1,2,3]"), Err(EvalError::Disallowed(_))));
        assert!(matches!(tokenize("1 < 2"), Err(EvalError::Disallowed(_))));
        assert!(matches!(tokenize("7 // 2"), Err(EvalError::Disallowed(_))));
        assert!(matches!(tokenize("2 ^ 3"), Err(EvalError::Disallowed(_))));
        assert!(matches!(tokenize("1 $ 2"), Err(EvalError::Syntax(_))));
    }
}
