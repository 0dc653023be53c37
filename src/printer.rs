use crate::types::Value;
use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrintMode {
    /// Text keeps its quotes, so the output reads back as the same value.
    ReadableRepresentation,
    /// Text is written bare, nil writes nothing and lists are spread into
    /// their elements, the way `print` shows them.
    Directly,
}

pub fn pr_str(value: &Value, mode: PrintMode) -> String {
    match value {
        Value::Nil => match mode {
            PrintMode::ReadableRepresentation => String::from("nil"),
            PrintMode::Directly => String::new(),
        },
        Value::Symbol(name) => name.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(x) => float_repr(*x),
        Value::Boolean(true) => String::from("t"),
        Value::Boolean(false) => String::from("f"),
        Value::Text(s) => match mode {
            PrintMode::ReadableRepresentation => format!("\"{}\"", s),
            PrintMode::Directly => s.clone(),
        },
        Value::List(elements) => {
            let inner = elements.iter().map(|e| pr_str(e, mode)).join(" ");
            match mode {
                PrintMode::ReadableRepresentation => format!("({})", inner),
                PrintMode::Directly => inner,
            }
        }
        Value::Closure(c) => c.to_string(),
    }
}

fn float_repr(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 {
        format!("{:.1}", x)
    } else {
        x.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", pr_str(self, PrintMode::ReadableRepresentation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_form;
    use crate::types::Symbol;

    #[test]
    fn literals_round_trip() {
        for literal in &["42", "-3", "2.5", "-0.125", "t", "f", r#""two words""#] {
            let value = read_form(literal).unwrap();
            let printed = pr_str(&value, PrintMode::ReadableRepresentation);
            assert_eq!(read_form(&printed).unwrap(), value);
        }
    }

    #[test]
    fn floats_keep_a_fraction() {
        assert_eq!(pr_str(&Value::Float(4.0), PrintMode::Directly), "4.0");
        assert_eq!(pr_str(&Value::Float(3.5), PrintMode::Directly), "3.5");
    }

    #[test]
    fn modes_differ_on_text_and_nil() {
        let list = Value::wrap_list(vec![Value::Text("a".into()), Value::Nil]);
        assert_eq!(pr_str(&list, PrintMode::ReadableRepresentation), r#"("a" nil)"#);
        assert_eq!(pr_str(&list, PrintMode::Directly), "a ");
    }

    #[test]
    fn direct_mode_flattens_nested_lists() {
        let nested = read_form("(1 (2 (3 \"x\")) ())").unwrap();
        assert_eq!(pr_str(&nested, PrintMode::Directly), "1 2 3 x ");
        assert_eq!(
            pr_str(&nested, PrintMode::ReadableRepresentation),
            r#"(1 (2 (3 "x")) ())"#
        );
    }

    #[test]
    fn closures() {
        let f = Value::new_closure(
            vec![Symbol::from("a"), Symbol::from("b")],
            Value::new_symbol("a"),
        );
        assert_eq!(f.to_string(), "#<fn (a b)>");
    }
}
