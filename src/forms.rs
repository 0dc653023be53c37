//! Slicing raw source text into independent top-level forms.

use itertools::Itertools;
use regex::Regex;

/// Blanks out comment lines (first non-space character is `;`), collapses
/// every whitespace run to a single space and trims the result.
pub fn normalize(source: &str) -> String {
    lazy_static! {
        static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    }
    let uncommented = source
        .lines()
        .map(|line| match line.trim_start().starts_with(';') {
            true => "",
            false => line,
        })
        .join("\n");
    WHITESPACE_RE
        .replace_all(&uncommented, " ")
        .trim()
        .to_string()
}

/// Splits normalized text into paren-balanced top-level forms. Text outside
/// any parentheses is dropped, as is a trailing form that never closes.
pub fn split_forms(text: &str) -> Vec<String> {
    let mut forms = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => {
                if depth == 0 {
                    current.clear();
                }
                depth += 1;
                current.push(c);
            }
            ')' if depth > 0 => {
                depth -= 1;
                current.push(c);
                if depth == 0 {
                    forms.push(std::mem::take(&mut current));
                }
            }
            // A stray close paren at top level has nothing to close.
            ')' => (),
            _ if depth > 0 => current.push(c),
            _ => (),
        }
    }
    if depth > 0 {
        log::warn!("dropping unbalanced form: {}", current);
    }
    forms
}

pub fn split_source(source: &str) -> Vec<String> {
    split_forms(&normalize(source))
}

/// Opening minus closing parentheses. Callers accumulating input lines keep
/// reading while this is positive.
pub fn paren_balance(text: &str) -> isize {
    text.chars().fold(0, |balance, c| match c {
        '(' => balance + 1,
        ')' => balance - 1,
        _ => balance,
    })
}
