//! Operators that receive their operand forms unevaluated.

use crate::evaluator::{eval, follow_aliases, Context, Error, Result};
use crate::types::{truthy, Arity, Symbol, Value};

pub type SpecialForm = fn(&[Value], &mut Context) -> Result;

pub fn lookup(name: &Symbol) -> Option<SpecialForm> {
    let form: SpecialForm = match name.as_str() {
        "if" => apply_if,
        "while" => apply_while,
        "def" => apply_def,
        "fn" => apply_fn,
        "defn" => apply_defn,
        _ => return None,
    };
    Some(form)
}

pub fn apply_if(args: &[Value], ctx: &mut Context) -> Result {
    Arity::Between(2..=3).validate_for(args.len(), "if")?;
    let condition = eval(&args[0], ctx)?;
    if truthy(&condition) {
        eval(&args[1], ctx)
    } else if args.len() == 3 {
        eval(&args[2], ctx)
    } else {
        Ok(Value::Nil)
    }
}

pub fn apply_while(args: &[Value], ctx: &mut Context) -> Result {
    Arity::exactly(2).validate_for(args.len(), "while")?;
    let mut last = Value::Nil;
    while truthy(&eval(&args[0], ctx)?) {
        last = eval(&args[1], ctx)?;
    }
    Ok(last)
}

/// Binds the name to the unevaluated expression, so every later reference
/// evaluates it afresh.
pub fn apply_def(args: &[Value], ctx: &mut Context) -> Result {
    Arity::exactly(2).validate_for(args.len(), "def")?;
    let name = binding_name(&args[0], ctx)?;
    log::debug!("define {} as {}", name, args[1]);
    ctx.env.set(name, args[1].clone());
    Ok(Value::Nil)
}

pub fn apply_fn(args: &[Value], ctx: &mut Context) -> Result {
    Arity::exactly(2).validate_for(args.len(), "fn")?;
    let parameters = closure_parameters(&args[0], ctx)?;
    Ok(Value::new_closure(parameters, args[1].clone()))
}

pub fn apply_defn(args: &[Value], ctx: &mut Context) -> Result {
    Arity::exactly(3).validate_for(args.len(), "defn")?;
    let name = binding_name(&args[0], ctx)?;
    let parameters = closure_parameters(&args[1], ctx)?;
    let closure = Value::new_closure(parameters, args[2].clone());
    log::debug!("define {} as {}", name, closure);
    ctx.env.set(name, closure.clone());
    Ok(closure)
}

// A symbol names the end of its alias chain, so `(def a b)` followed by
// `(def a 1)` binds `b`, while a symbol bound to an ordinary value is simply
// rebound. Any other form has to evaluate to a symbol.
fn binding_name(form: &Value, ctx: &mut Context) -> Result<Symbol> {
    match form {
        Value::Symbol(symbol) => follow_aliases(symbol, ctx.env).map(|(last, _)| last),
        _ => match eval(form, ctx)? {
            Value::Symbol(symbol) => Ok(symbol),
            other => Err(Error::NotASymbol(other.to_string())),
        },
    }
}

// The reader turns `(x)` into the bare symbol `x`, and a parameter list such
// as `(a b)` would fail if evaluated as a call, so forms made only of symbols
// are taken as written. Anything else is evaluated.
fn closure_parameters(form: &Value, ctx: &mut Context) -> Result<Vec<Symbol>> {
    if let Some(parameters) = literal_parameters(form) {
        return Ok(parameters);
    }
    let evaluated = eval(form, ctx)?;
    literal_parameters(&evaluated).ok_or_else(|| Error::NotASymbol(evaluated.to_string()))
}

fn literal_parameters(form: &Value) -> Option<Vec<Symbol>> {
    match form {
        Value::Symbol(symbol) => Some(vec![symbol.clone()]),
        Value::List(items) => items
            .iter()
            .map(|item| item.as_symbol().cloned())
            .collect(),
        _ => None,
    }
}
