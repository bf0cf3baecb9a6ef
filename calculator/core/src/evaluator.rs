//! Arithmetic Evaluator
//!
//! Closed-grammar evaluator for the calculator keypad. The display string is
//! first normalized (`×`, `÷`, `^` become `*`, `/`, `**`), then checked
//! against the accepted character set and parsed with a recursive-descent
//! parser. Nothing outside the grammar below is ever interpreted.
//!
//! # Grammar
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('**' unary)?
//! primary := NUMBER | '(' expr ')'
//! NUMBER  := (digits ['.' digits] | '.' digits) [('e' | 'E') ['+' | '-'] digits]
//! ```
//!
//! The exponent suffix only exists so a result shown in exponent form
//! (`1e+21`) can be evaluated again; the keypad has no `e` key.
//!
//! `**` is right-associative and binds tighter than unary minus, so
//! `-2**2` is `-4` and `2**-1` is `0.5`.

use thiserror::Error;

/// Maximum nesting of parentheses and unary operators
pub const MAX_NESTING_DEPTH: usize = 256;

/// Errors produced while evaluating an expression
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Nothing to evaluate
    #[error("empty expression")]
    Empty,

    /// Character outside the arithmetic grammar
    #[error("forbidden character {found:?} at position {position}")]
    ForbiddenCharacter {
        /// Offending character
        found: char,
        /// Character index in the normalized input
        position: usize,
    },

    /// Malformed numeric literal such as `1.2.3` or `.`
    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    /// Token that cannot appear where it was found
    #[error("unexpected {found} at position {position}")]
    UnexpectedToken {
        /// Description of the token
        found: String,
        /// Character index in the normalized input
        position: usize,
    },

    /// Input ended in the middle of an expression
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// Missing or surplus parenthesis
    #[error("unbalanced parentheses")]
    UnbalancedParens,

    /// Expression nests deeper than [`MAX_NESTING_DEPTH`]
    #[error("expression nested too deeply")]
    TooDeep,

    /// Result is infinite or NaN (division by zero, overflow)
    #[error("result is not a finite number")]
    NonFinite,
}

/// Map display glyphs onto evaluator operators
pub fn normalize(display: &str) -> String {
    display
        .replace('×', "*")
        .replace('÷', "/")
        .replace('^', "**")
}

/// Normalize, evaluate and format a display string
///
/// This is the pure function behind the `=` key: the same input always
/// yields the same result string.
pub fn calculate(display: &str) -> Result<String, EvalError> {
    let value = evaluate(&normalize(display))?;
    Ok(format_number(value))
}

/// Evaluate a normalized arithmetic expression
pub fn evaluate(input: &str) -> Result<f64, EvalError> {
    reject_forbidden(input)?;

    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalError::Empty);
    }

    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;

    if let Some(token) = parser.peek() {
        return Err(match token.kind {
            TokenKind::RParen => EvalError::UnbalancedParens,
            _ => parser.unexpected(token),
        });
    }

    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite)
    }
}

/// Render a result the way the display shows it
///
/// Integral values carry no fractional part, `-0` collapses to `0`, and
/// everything else uses the shortest representation that round-trips.
/// Magnitudes at or above `1e21` or below `1e-6` switch to exponent form
/// (`1e+21`, `1.5e-7`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{value}");
    }

    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

fn reject_forbidden(input: &str) -> Result<(), EvalError> {
    for (position, c) in input.chars().enumerate() {
        let allowed = c.is_ascii_digit()
            || matches!(
                c,
                '.' | '+' | '-' | '*' | '/' | '(' | ')' | 'e' | 'E' | ' ' | '\t' | '\n' | '\r'
            );
        if !allowed {
            return Err(EvalError::ForbiddenCharacter { found: c, position });
        }
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum TokenKind {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Pow,
    LParen,
    RParen,
}

#[derive(Clone, Copy, Debug)]
struct Token {
    kind: TokenKind,
    position: usize,
}

fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let position = i;

        let kind = match c {
            ' ' | '\t' | '\n' | '\r' => {
                i += 1;
                continue;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                i += exponent_len(&chars[i..]);
                let literal: String = chars[start..i].iter().collect();
                tokens.push(Token {
                    kind: TokenKind::Number(parse_number(&literal)?),
                    position,
                });
                continue;
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                i += 1;
                TokenKind::Pow
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            other => {
                return Err(EvalError::ForbiddenCharacter {
                    found: other,
                    position,
                })
            }
        };

        tokens.push(Token { kind, position });
        i += 1;
    }

    Ok(tokens)
}

/// Length of an exponent suffix (`e+21`, `E-7`, `e3`) at the start of `rest`
fn exponent_len(rest: &[char]) -> usize {
    if !matches!(rest.first(), Some('e' | 'E')) {
        return 0;
    }
    let sign = usize::from(matches!(rest.get(1), Some('+' | '-')));
    let digits = rest[1 + sign..]
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if digits == 0 {
        0
    } else {
        1 + sign + digits
    }
}

fn parse_number(literal: &str) -> Result<f64, EvalError> {
    let mantissa = literal.split(['e', 'E']).next().unwrap_or(literal);
    let dots = mantissa.matches('.').count();
    let has_digit = mantissa.chars().any(|c| c.is_ascii_digit());
    if dots > 1 || !has_digit {
        return Err(EvalError::InvalidNumber(literal.to_string()));
    }

    literal
        .parse::<f64>()
        .map_err(|_| EvalError::InvalidNumber(literal.to_string()))
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn unexpected(&self, token: Token) -> EvalError {
        let found = match token.kind {
            TokenKind::Number(n) => format!("number {}", format_number(n)),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Pow => "'**'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
        };
        EvalError::UnexpectedToken {
            found,
            position: token.position,
        }
    }

    fn enter(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(EvalError::TooDeep);
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Plus => {
                    self.pos += 1;
                    value += self.term()?;
                }
                TokenKind::Minus => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.unary()?;
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Star => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                TokenKind::Slash => {
                    self.pos += 1;
                    value /= self.unary()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        match self.peek().map(|t| t.kind) {
            Some(TokenKind::Minus) => {
                self.pos += 1;
                self.enter()?;
                let value = self.unary()?;
                self.leave();
                Ok(-value)
            }
            Some(TokenKind::Plus) => {
                self.pos += 1;
                self.enter()?;
                let value = self.unary()?;
                self.leave();
                Ok(value)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, EvalError> {
        let base = self.primary()?;
        if matches!(self.peek().map(|t| t.kind), Some(TokenKind::Pow)) {
            self.pos += 1;
            self.enter()?;
            let exponent = self.unary()?;
            self.leave();
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, EvalError> {
        let token = self.next().ok_or(EvalError::UnexpectedEnd)?;
        match token.kind {
            TokenKind::Number(n) => Ok(n),
            TokenKind::LParen => {
                self.enter()?;
                let value = self.expr()?;
                self.leave();
                match self.next() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(value),
                    Some(other) => Err(self.unexpected(other)),
                    None => Err(EvalError::UnbalancedParens),
                }
            }
            _ => Err(self.unexpected(token)),
        }
    }
}
