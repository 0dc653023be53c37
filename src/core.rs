use crate::evaluator::{self, type_mismatch, Context, Error};
use crate::printer::{self, PrintMode};
use crate::types::{Arity, Int, PrimitiveFn, Symbol, Value};
use crate::{forms, reader};
use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::HashMap;

const PRINT: PrimitiveFn = PrimitiveFn {
    name: "print",
    fn_ptr: print_,
    arity: Arity::at_least(0),
    normalizes: false,
};

fn print_(args: &[Value], ctx: &mut Context) -> evaluator::Result {
    let text = args
        .iter()
        .map(|arg| printer::pr_str(arg, PrintMode::Directly))
        .join(" ");
    ctx.console.write_line(&text)?;
    Ok(Value::Nil)
}

const FIRST: PrimitiveFn = PrimitiveFn {
    name: "first",
    fn_ptr: first_,
    arity: Arity::at_least(0),
    normalizes: true,
};

fn first_(args: &[Value], _ctx: &mut Context) -> evaluator::Result {
    args.first().cloned().ok_or(Error::EmptyList("first"))
}

const LAST: PrimitiveFn = PrimitiveFn {
    name: "last",
    fn_ptr: last_,
    arity: Arity::at_least(0),
    normalizes: true,
};

fn last_(args: &[Value], _ctx: &mut Context) -> evaluator::Result {
    args.last().cloned().ok_or(Error::EmptyList("last"))
}

const REST: PrimitiveFn = PrimitiveFn {
    name: "rest",
    fn_ptr: rest_,
    arity: Arity::at_least(0),
    normalizes: true,
};

fn rest_(args: &[Value], _ctx: &mut Context) -> evaluator::Result {
    match args.split_first() {
        Some((_, rest)) => Ok(Value::wrap_list(rest.to_vec())),
        None => Err(Error::EmptyList("rest")),
    }
}

const LIST: PrimitiveFn = PrimitiveFn {
    name: "list",
    fn_ptr: list_,
    arity: Arity::at_least(0),
    normalizes: false,
};

fn list_(args: &[Value], _ctx: &mut Context) -> evaluator::Result {
    Ok(Value::wrap_list(args.to_vec()))
}

const READ: PrimitiveFn = PrimitiveFn {
    name: "read",
    fn_ptr: read_,
    arity: Arity::exactly(0),
    normalizes: false,
};

fn read_(_args: &[Value], ctx: &mut Context) -> evaluator::Result {
    Ok(match ctx.console.read_line()? {
        Some(line) => Value::Text(line),
        None => Value::Nil,
    })
}

const EVAL: PrimitiveFn = PrimitiveFn {
    name: "eval",
    fn_ptr: eval_,
    arity: Arity::exactly(1),
    normalizes: true,
};

fn eval_(args: &[Value], ctx: &mut Context) -> evaluator::Result {
    match &args[0] {
        Value::Text(source) => {
            let form = reader::read_form(&forms::normalize(source))?;
            log::info!("call from program to eval with {}", form);
            evaluator::eval(&form, ctx)
        }
        other => Err(type_mismatch("eval", &[other])),
    }
}

const ATOM_TEST: PrimitiveFn = PrimitiveFn {
    name: "atom?",
    fn_ptr: atom_test_,
    arity: Arity::exactly(1),
    normalizes: false,
};

fn atom_test_(args: &[Value], _ctx: &mut Context) -> evaluator::Result {
    Ok(Value::Boolean(!args[0].is_list()))
}

const DO: PrimitiveFn = PrimitiveFn {
    name: "do",
    fn_ptr: do_,
    arity: Arity::at_least(0),
    normalizes: false,
};

fn do_(args: &[Value], _ctx: &mut Context) -> evaluator::Result {
    Ok(args.last().cloned().unwrap_or(Value::Nil))
}

fn numeric(
    name: &'static str,
    x: &Value,
    y: &Value,
    int_op: fn(Int, Int) -> Option<Int>,
    float_op: fn(f64, f64) -> f64,
) -> evaluator::Result {
    if let (Value::Integer(a), Value::Integer(b)) = (x, y) {
        return int_op(*a, *b)
            .map(Value::Integer)
            .ok_or(Error::IntegerOverflow(name));
    }
    match (x.as_float(), y.as_float()) {
        (Some(a), Some(b)) => Ok(Value::Float(float_op(a, b))),
        _ => Err(type_mismatch(name, &[x, y])),
    }
}

fn add(x: &Value, y: &Value) -> evaluator::Result {
    match (x, y) {
        (Value::Text(a), Value::Text(b)) => Ok(Value::Text(format!("{}{}", a, b))),
        (Value::List(a), Value::List(b)) => Ok(Value::wrap_list(
            a.iter().chain(b.iter()).cloned().collect(),
        )),
        _ => numeric("+", x, y, Int::checked_add, |a, b| a + b),
    }
}

fn sub(x: &Value, y: &Value) -> evaluator::Result {
    numeric("-", x, y, Int::checked_sub, |a, b| a - b)
}

fn mul(x: &Value, y: &Value) -> evaluator::Result {
    numeric("*", x, y, Int::checked_mul, |a, b| a * b)
}

// Always floating point, whatever the operand types.
fn div(x: &Value, y: &Value) -> evaluator::Result {
    match (x.as_float(), y.as_float()) {
        (Some(a), Some(b)) => Ok(Value::Float(a / b)),
        _ => Err(type_mismatch("/", &[x, y])),
    }
}

fn eq(x: &Value, y: &Value) -> evaluator::Result {
    Ok(Value::Boolean(x == y))
}

fn ne(x: &Value, y: &Value) -> evaluator::Result {
    Ok(Value::Boolean(x != y))
}

fn lt(x: &Value, y: &Value) -> evaluator::Result {
    x.partial_compare(y)
        .map(|ordering| Value::Boolean(ordering == Ordering::Less))
        .ok_or_else(|| type_mismatch("<", &[x, y]))
}

macro_rules! binary_primitive {
    ($SYMBOL:tt, $NAME:ident, normalizes: $NORMALIZES:expr) => {
        paste::item! {
            fn [<call_ $NAME:lower>](args: &[Value], _ctx: &mut Context) -> evaluator::Result {
                [<$NAME:lower>](&args[0], &args[1])
            }

            const $NAME: PrimitiveFn = PrimitiveFn {
                name: stringify!($SYMBOL),
                fn_ptr: [<call_ $NAME:lower>],
                arity: Arity::exactly(2),
                normalizes: $NORMALIZES,
            };
        }
    };
}

binary_primitive!(+, ADD, normalizes: true);
binary_primitive!(-, SUB, normalizes: true);
binary_primitive!(*, MUL, normalizes: true);
binary_primitive!(/, DIV, normalizes: true);
binary_primitive!(=, EQ, normalizes: false);
binary_primitive!(!=, NE, normalizes: false);
binary_primitive!(<, LT, normalizes: false);

static PRIMITIVES: &[PrimitiveFn] = &[
    // Input and output
    PRINT,
    READ,
    // Working with lists
    FIRST,
    LAST,
    REST,
    LIST,
    // Arithmetic
    ADD,
    SUB,
    MUL,
    DIV,
    // Comparisons
    EQ,
    NE,
    LT,
    // Other
    ATOM_TEST,
    EVAL,
    DO,
];

type Namespace = HashMap<&'static str, &'static PrimitiveFn>;
lazy_static! {
    pub static ref CORE: Namespace = PRIMITIVES.iter().map(|func| (func.name, func)).collect();
}

pub fn lookup(name: &Symbol) -> Option<&'static PrimitiveFn> {
    CORE.get(name.as_str()).copied()
}
