use crate::tokens::tokenize;
use crate::types::{Int, Value};
use regex::Regex;
use std::fmt;

pub type Result<T = Value> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    MalformedLiteral(String),
    UnterminatedText(String),
    UnbalancedGroup(String),
    TooDeep(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedLiteral(s) => write!(f, "malformed literal: {}", s),
            Error::UnterminatedText(s) => write!(f, "unterminated text literal: {}", s),
            Error::UnbalancedGroup(s) => write!(f, "unbalanced parenthesis group: {}", s),
            Error::TooDeep(depth) => write!(f, "form nested deeper than {} levels", depth),
        }
    }
}

impl std::error::Error for Error {}

lazy_static! {
    static ref INTEGER_RE: Regex = Regex::new(r"^-?[0-9]+$").unwrap();
    static ref FLOAT_RE: Regex = Regex::new(r"^-?[0-9]+\.[0-9]+$").unwrap();
}

/// Bound on paren nesting. Every level re-tokenizes and recurses, so the
/// reader gives up before the host stack does.
pub const MAX_READ_DEPTH: usize = 256;

/// Reads one form into a value tree.
pub fn read_form(input: &str) -> Result {
    parse(input.trim(), 0)
}

fn parse(text: &str, depth: usize) -> Result {
    if depth > MAX_READ_DEPTH {
        return Err(Error::TooDeep(MAX_READ_DEPTH));
    }
    let text = strip_enclosing_parens(text).trim();
    if is_text_literal(text) {
        return Ok(Value::Text(text[1..text.len() - 1].to_string()));
    }
    if text.starts_with('"') && !text.contains(char::is_whitespace) {
        return Err(Error::MalformedLiteral(text.into()));
    }
    if INTEGER_RE.is_match(text) {
        return text
            .parse::<Int>()
            .map(Value::Integer)
            .map_err(|_| Error::MalformedLiteral(text.into()));
    }
    if FLOAT_RE.is_match(text) {
        return text
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| Error::MalformedLiteral(text.into()));
    }
    match text {
        "t" => return Ok(Value::Boolean(true)),
        "f" => return Ok(Value::Boolean(false)),
        _ => (),
    }
    if !text.is_empty() && !text.contains(char::is_whitespace) && !text.contains('(') {
        return Ok(Value::new_symbol(text));
    }
    let tokens = tokenize(text)?;
    if let [only] = tokens.as_slice() {
        // Neither splitting nor unwrapping makes progress, so recursing
        // would never terminate.
        if only == text && strip_enclosing_parens(text) == text {
            return Err(Error::MalformedLiteral(text.into()));
        }
    }
    log::trace!("read list of {} tokens from {}", tokens.len(), text);
    tokens
        .iter()
        .map(|token| parse(token, depth + 1))
        .collect::<Result<Vec<_>>>()
        .map(Value::wrap_list)
}

fn is_text_literal(text: &str) -> bool {
    text.len() >= 2
        && text.starts_with('"')
        && text.ends_with('"')
        && !text[1..text.len() - 1].contains('"')
}

/// Drops one pair of parentheses, but only when the opening one is closed by
/// the final character: `(a) (b)` is left alone.
fn strip_enclosing_parens(text: &str) -> &str {
    if !(text.starts_with('(') && text.ends_with(')')) {
        return text;
    }
    let mut depth = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => (),
        }
        if depth == 0 {
            return match i == text.len() - 1 {
                true => &text[1..i],
                false => text,
            };
        }
    }
    text
}
