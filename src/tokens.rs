use crate::forms::paren_balance;
use crate::reader::Error;

fn opens_text(token: &str) -> bool {
    token.starts_with('"') && !token[1..].contains('"')
}

fn closes_text(token: &str) -> bool {
    token.ends_with('"')
}

fn opens_group(token: &str) -> bool {
    token.starts_with('(') && paren_balance(token) > 0
}

/// Splits on whitespace, then glues back together the pieces of quoted
/// literals that contained spaces and of parenthesized groups.
pub(crate) fn tokenize(input: &str) -> Result<Vec<String>, Error> {
    let mut tokens = Vec::new();
    let mut pieces = input.split_whitespace();
    while let Some(piece) = pieces.next() {
        let mut token = piece.to_string();
        if opens_text(piece) {
            loop {
                let next = pieces
                    .next()
                    .ok_or_else(|| Error::UnterminatedText(token.clone()))?;
                token.push(' ');
                token.push_str(next);
                if closes_text(next) {
                    break;
                }
            }
        } else if opens_group(piece) {
            let mut depth = paren_balance(piece);
            while depth > 0 {
                let next = pieces
                    .next()
                    .ok_or_else(|| Error::UnbalancedGroup(token.clone()))?;
                token.push(' ');
                token.push_str(next);
                depth += paren_balance(next);
            }
        }
        tokens.push(token);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_tokens() {
        assert_eq!(tokenize("+ 1 2").unwrap(), vec!["+", "1", "2"]);
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn merges_quoted_literals() {
        assert_eq!(
            tokenize(r#"print "hello big world" 3"#).unwrap(),
            vec!["print", r#""hello big world""#, "3"]
        );
    }

    #[test]
    fn merges_groups() {
        assert_eq!(
            tokenize("defn square (x) (* x (+ x 1))").unwrap(),
            vec!["defn", "square", "(x)", "(* x (+ x 1))"]
        );
        assert_eq!(
            tokenize("if ((f x) y) z").unwrap(),
            vec!["if", "((f x) y)", "z"]
        );
    }

    #[test]
    fn unterminated_text_fails() {
        match tokenize(r#"+ 1 "unterminated"#) {
            Err(Error::UnterminatedText(t)) => assert_eq!(t, r#""unterminated"#),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unbalanced_group_fails() {
        match tokenize("first (list 1 2") {
            Err(Error::UnbalancedGroup(t)) => assert_eq!(t, "(list 1 2"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
