//! Boolean conditions attached to dependency references.
//!
//! Grammar (loosest binding first):
//!
//! ```text
//! or   := and (("||" | "OR") and)*
//! and  := atom (("&&" | "AND") atom)*
//! atom := "true" | "false" | identifier | "(" or ")"
//! ```
//!
//! Identifiers name boolean context parameters. An unset name reads as `false`.

use std::fmt;

use thiserror::Error;

/// Parse failure for a condition string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid condition '{input}': {reason}")]
pub struct ExpressionError {
    pub input: String,
    pub reason: String,
}

/// A parsed boolean condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(bool),
    Var(String),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn parse(input: &str) -> Result<Self, ExpressionError> {
        let tokens = tokenize(input)?;
        let mut parser = Parser {
            input,
            tokens,
            pos: 0,
        };
        let expr = parser.or()?;
        if let Some(tok) = parser.peek() {
            return Err(parser.error(format!("unexpected '{tok}'")));
        }
        Ok(expr)
    }

    /// Evaluate against a boolean lookup; unknown names are `false`.
    pub fn evaluate<F>(&self, lookup: &F) -> bool
    where
        F: Fn(&str) -> Option<bool>,
    {
        match self {
            Self::Literal(b) => *b,
            Self::Var(name) => lookup(name).unwrap_or(false),
            Self::And(l, r) => l.evaluate(lookup) && r.evaluate(lookup),
            Self::Or(l, r) => l.evaluate(lookup) || r.evaluate(lookup),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(b) => write!(f, "{b}"),
            Self::Var(name) => write!(f, "{name}"),
            Self::And(l, r) => write!(f, "({l} && {r})"),
            Self::Or(l, r) => write!(f, "({l} || {r})"),
        }
    }
}

// ── Lexing ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    True,
    False,
    And,
    Or,
    LParen,
    RParen,
    Ident(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::And => write!(f, "&&"),
            Self::Or => write!(f, "||"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::Ident(name) => write!(f, "{name}"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExpressionError> {
    let err = |reason: String| ExpressionError {
        input: input.to_owned(),
        reason,
    };

    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            '&' | '|' => match chars.next() {
                Some((_, n)) if n == c => {
                    tokens.push(if c == '&' { Token::And } else { Token::Or })
                }
                _ => return Err(err(format!("lone '{c}' at offset {i}"))),
            },
            c if c.is_alphanumeric() || c == '_' => {
                let mut word = String::from(c);
                while let Some(&(_, n)) = chars.peek() {
                    if n.is_alphanumeric() || n == '_' {
                        word.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(match word.as_str() {
                    "true" => Token::True,
                    "false" => Token::False,
                    "AND" => Token::And,
                    "OR" => Token::Or,
                    _ => Token::Ident(word),
                });
            }
            other => return Err(err(format!("unexpected character '{other}' at offset {i}"))),
        }
    }

    if tokens.is_empty() {
        return Err(err("empty condition".into()));
    }
    Ok(tokens)
}

// ── Parsing ───────────────────────────────────────────────────────────────────

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn error(&self, reason: String) -> ExpressionError {
        ExpressionError {
            input: self.input.to_owned(),
            reason,
        }
    }

    fn or(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.and()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.atom()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let rhs = self.atom()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn atom(&mut self) -> Result<Expr, ExpressionError> {
        match self.next() {
            Some(Token::True) => Ok(Expr::Literal(true)),
            Some(Token::False) => Ok(Expr::Literal(false)),
            Some(Token::Ident(name)) => Ok(Expr::Var(name)),
            Some(Token::LParen) => {
                let inner = self.or()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(self.error("missing ')'".into())),
                }
            }
            Some(tok) => Err(self.error(format!("unexpected '{tok}'"))),
            None => Err(self.error("unexpected end of condition".into())),
        }
    }
}
