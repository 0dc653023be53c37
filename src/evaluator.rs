use crate::console::Console;
use crate::environment::Environment;
use crate::types::{self, strip_array, BadArgCount, Closure, Symbol, Value};
use crate::stack::ensure_sufficient_stack;
use crate::{core, reader, special_forms};
use itertools::Itertools;
use std::collections::HashSet;
use std::fmt;

/// Default bound on nested `eval` calls. The stack grows on demand, so this
/// only stops runaway recursion from eating all memory. A non-tail call costs
/// two or three levels per user-level call.
pub const MAX_EVAL_DEPTH: usize = 100_000;

pub type Result<T = Value> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    NotCallable(String),
    BadArgCount(BadArgCount),
    EmptyList(&'static str),
    TypeMismatch {
        operation: &'static str,
        operands: String,
    },
    NotASymbol(String),
    IntegerOverflow(&'static str),
    CyclicBinding(Symbol),
    RecursionLimit(usize),
    ReadError(reader::Error),
    IOError(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotCallable(op) => write!(f, "'{}' is not a function", op),
            Error::BadArgCount(e) => write!(f, "{}", e),
            Error::EmptyList(op) => write!(f, "{}: empty list", op),
            Error::TypeMismatch {
                operation,
                operands,
            } => write!(f, "type mismatch: cannot apply {} to {}", operation, operands),
            Error::NotASymbol(v) => write!(f, "cannot bind to non-symbol {}", v),
            Error::IntegerOverflow(op) => write!(f, "integer overflow in {}", op),
            Error::CyclicBinding(s) => write!(f, "symbol '{}' is bound in a cycle", s),
            Error::RecursionLimit(depth) => {
                write!(f, "evaluation nested deeper than {} levels", depth)
            }
            Error::ReadError(e) => write!(f, "read error: {}", e),
            Error::IOError(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::IOError(e)
    }
}

impl From<reader::Error> for Error {
    fn from(e: reader::Error) -> Self {
        Self::ReadError(e)
    }
}

impl From<BadArgCount> for Error {
    fn from(e: BadArgCount) -> Self {
        Self::BadArgCount(e)
    }
}

pub(crate) fn type_mismatch(operation: &'static str, operands: &[&Value]) -> Error {
    Error::TypeMismatch {
        operation,
        operands: operands.iter().join(" and "),
    }
}

/// Everything one evaluation needs: the shared bindings, the console and the
/// current nesting depth.
pub struct Context<'a> {
    pub env: &'a mut Environment,
    pub console: &'a mut dyn Console,
    depth: usize,
    max_depth: usize,
}

impl<'a> Context<'a> {
    pub fn new(env: &'a mut Environment, console: &'a mut dyn Console, max_depth: usize) -> Self {
        Self {
            env,
            console,
            depth: 0,
            max_depth,
        }
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(Error::RecursionLimit(self.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

pub fn eval(ast: &Value, ctx: &mut Context) -> Result {
    ctx.enter()?;
    let result = ensure_sufficient_stack(|| eval_internal(ast, ctx));
    ctx.leave();
    result
}

fn eval_internal(ast: &Value, ctx: &mut Context) -> Result {
    log::trace!("eval {}", ast);
    match ast {
        Value::Symbol(symbol) => match follow_aliases(symbol, ctx.env)? {
            (last, None) => Ok(Value::Symbol(last)),
            (_, Some(bound)) => eval(&bound, ctx),
        },
        Value::List(list) if !list.is_empty() => eval_call(strip_array(list), ctx),
        _ => Ok(ast.clone()),
    }
}

/// Walks a chain of symbol-to-symbol bindings. Returns the last symbol in the
/// chain together with the non-symbol value it is bound to, if any.
pub(crate) fn follow_aliases(
    symbol: &Symbol,
    env: &Environment,
) -> Result<(Symbol, Option<Value>)> {
    let mut seen = HashSet::new();
    let mut current = symbol.clone();
    loop {
        match env.get(&current) {
            None => return Ok((current, None)),
            Some(Value::Symbol(next)) => {
                let next = next.clone();
                seen.insert(current);
                if seen.contains(&next) {
                    return Err(Error::CyclicBinding(next));
                }
                current = next;
            }
            Some(bound) => return Ok((current, Some(bound.clone()))),
        }
    }
}

fn eval_call(argv: &[Value], ctx: &mut Context) -> Result {
    let (head, args) = match argv.split_first() {
        Some(split) => split,
        None => return Ok(Value::new_list()),
    };
    if let Value::Symbol(name) = head {
        if let Some(form) = special_forms::lookup(name) {
            log::trace!("special form {}", name);
            return form(args, ctx);
        }
    }
    let callable = eval(head, ctx)?;
    let evaluated = evaluate_sequence_elementwise(args, ctx)?;
    apply(&callable, &evaluated, ctx)
}

pub fn evaluate_sequence_elementwise(seq: &[Value], ctx: &mut Context) -> Result<Vec<Value>> {
    seq.iter().map(|obj| eval(obj, ctx)).collect()
}

pub fn apply(callable: &Value, args: &[Value], ctx: &mut Context) -> Result {
    match callable {
        Value::Symbol(name) => match core::lookup(name) {
            Some(func) => call_primitive(func, args, ctx),
            None => Err(Error::NotCallable(name.to_string())),
        },
        Value::Closure(closure) => call_closure(closure, args, ctx),
        other => Err(Error::NotCallable(other.to_string())),
    }
}

pub(crate) fn pretty_print_args(args: &[Value]) -> String {
    match args.len() {
        0 => "no args".into(),
        _ => args.iter().join(" "),
    }
}

pub fn call_primitive(func: &types::PrimitiveFn, args: &[Value], ctx: &mut Context) -> Result {
    let args = match func.normalizes {
        true => strip_array(args),
        false => args,
    };
    func.arity.validate_for(args.len(), func.name)?;
    log::trace!("call {} with {}", func.name, pretty_print_args(args));
    let result = (func.fn_ptr)(args, ctx);
    match &result {
        Ok(val) => log::trace!("call to {} resulted in {}", func.name, val),
        Err(e) => log::trace!("call to {} failed: {}", func.name, e),
    }
    result
}

/// Binds parameters straight into the shared environment, overwriting any
/// existing binding of the same name, then evaluates the body there.
fn call_closure(func: &Closure, args: &[Value], ctx: &mut Context) -> Result {
    log::trace!("call {} with {}", func, pretty_print_args(args));
    types::Arity::exactly(func.parameters.len()).validate_for(args.len(), "closure")?;
    for (key, value) in func.parameters.iter().zip(args) {
        log::debug!("bind parameter {} = {}", key, value);
        ctx.env.set(key.clone(), value.clone());
    }
    eval(&func.body, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::reader::read_form;

    fn run(env: &mut Environment, text: &str) -> Result {
        let mut console = ScriptedConsole::default();
        let mut ctx = Context::new(env, &mut console, MAX_EVAL_DEPTH);
        eval(&read_form(text)?, &mut ctx)
    }

    #[test]
    fn self_evaluating() {
        let mut env = Environment::new();
        assert_eq!(run(&mut env, "7").unwrap(), Value::Integer(7));
        assert_eq!(run(&mut env, "()").unwrap(), Value::new_list());
        assert_eq!(run(&mut env, "unbound").unwrap(), Value::new_symbol("unbound"));
    }

    #[test]
    fn symbols_resolve_transitively() {
        let mut env = Environment::new();
        env.set("a", Value::new_symbol("b"));
        env.set("b", Value::new_symbol("c"));
        env.set("c", Value::Integer(3));
        assert_eq!(run(&mut env, "a").unwrap(), Value::Integer(3));
    }

    #[test]
    fn bound_lists_are_reevaluated() {
        let mut env = Environment::new();
        env.set("sum", read_form("(+ 1 2)").unwrap());
        assert_eq!(run(&mut env, "sum").unwrap(), Value::Integer(3));
    }

    #[test]
    fn alias_cycles_fail() {
        let mut env = Environment::new();
        env.set("a", Value::new_symbol("b"));
        env.set("b", Value::new_symbol("a"));
        assert!(matches!(run(&mut env, "a"), Err(Error::CyclicBinding(_))));
        env.set("s", Value::new_symbol("s"));
        assert!(matches!(run(&mut env, "s"), Err(Error::CyclicBinding(_))));
    }

    #[test]
    fn wrapper_lists_are_unwrapped_before_calling() {
        let mut env = Environment::new();
        assert_eq!(run(&mut env, "((+ 1 2))").unwrap(), Value::Integer(3));
    }

    #[test]
    fn not_callable_names_the_operator() {
        let mut env = Environment::new();
        match run(&mut env, "(frobnicate 1 2)") {
            Err(Error::NotCallable(op)) => assert_eq!(op, "frobnicate"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(run(&mut env, "(1 2)"), Err(Error::NotCallable(_))));
    }

    #[test]
    fn closure_arity_is_checked() {
        let mut env = Environment::new();
        run(&mut env, "(defn add (a b) (+ a b))").unwrap();
        assert!(matches!(run(&mut env, "(add 1)"), Err(Error::BadArgCount(_))));
        assert!(matches!(run(&mut env, "(add 1 2 3)"), Err(Error::BadArgCount(_))));
        assert_eq!(run(&mut env, "(add 1 2)").unwrap(), Value::Integer(3));
    }

    #[test]
    fn recursion_limit() {
        let mut env = Environment::new();
        let mut console = ScriptedConsole::default();
        run(&mut env, "(defn down (n) (down (- n 1)))").unwrap();
        let form = read_form("(down 1)").unwrap();
        let mut ctx = Context::new(&mut env, &mut console, 64);
        assert!(matches!(eval(&form, &mut ctx), Err(Error::RecursionLimit(64))));
    }

    #[test]
    fn deep_non_tail_recursion() {
        let mut env = Environment::new();
        run(&mut env, "(defn down (n) (if (< n 1) 0 (down (- n 1))))").unwrap();
        assert_eq!(run(&mut env, "(down 255)").unwrap(), Value::Integer(0));
        assert_eq!(run(&mut env, "(down 5000)").unwrap(), Value::Integer(0));
    }
}
