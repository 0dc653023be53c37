use rlsp::console::ScriptedConsole;
use rlsp::evaluator;
use rlsp::interpreter::{self, Interpreter};
use rlsp::reader;
use rlsp::types::Symbol;
use rlsp::Value;

fn session() -> Interpreter<ScriptedConsole> {
    Interpreter::new(ScriptedConsole::default())
}

fn eval_all(interp: &mut Interpreter<ScriptedConsole>, source: &str) -> Value {
    interp
        .run_until_error(source)
        .unwrap_or_else(|failure| panic!("{}", failure))
        .pop()
        .unwrap_or(Value::Nil)
}

fn int_list(values: &[i64]) -> Value {
    Value::wrap_list(values.iter().copied().map(Value::Integer).collect())
}

#[test]
fn definitions_persist() {
    let mut interp = session();
    interp.evaluate("(def x 5)").unwrap();
    assert_eq!(interp.evaluate("x").unwrap(), Value::Integer(5));
    assert_eq!(interp.evaluate("x").unwrap(), Value::Integer(5));
}

#[test]
fn arithmetic() {
    let mut interp = session();
    assert_eq!(interp.evaluate("(+ 1 2)").unwrap(), Value::Integer(3));
    assert_eq!(interp.evaluate("(/ 7 2)").unwrap(), Value::Float(3.5));
}

#[test]
fn named_functions() {
    let mut interp = session();
    let result = eval_all(&mut interp, "(defn square (x) (* x x)) (square 5)");
    assert_eq!(result, Value::Integer(25));
}

#[test]
fn anonymous_functions() {
    let mut interp = session();
    let result = eval_all(&mut interp, "(def add (fn (a b) (+ a b))) (add 2 3)");
    assert_eq!(result, Value::Integer(5));
}

#[test]
fn conditionals() {
    let mut interp = session();
    assert_eq!(
        interp.evaluate(r#"(if (< 1 2) "yes" "no")"#).unwrap(),
        Value::Text("yes".into())
    );
    assert_eq!(
        interp.evaluate(r#"(if (< 2 1) "yes")"#).unwrap(),
        Value::Nil
    );
}

#[test]
fn lists() {
    let mut interp = session();
    assert_eq!(interp.evaluate("(list 1 2 3)").unwrap(), int_list(&[1, 2, 3]));
    assert_eq!(
        interp.evaluate("(first (list 1 2 3))").unwrap(),
        Value::Integer(1)
    );
    assert_eq!(
        interp.evaluate("(rest (list 1 2 3))").unwrap(),
        int_list(&[2, 3])
    );
}

#[test]
fn parameters_leak_into_the_shared_environment() {
    let mut interp = session();
    eval_all(&mut interp, "(defn f (x) x) (f 9)");
    assert_eq!(
        interp.environment().get(&Symbol::from("x")),
        Some(&Value::Integer(9))
    );
    assert_eq!(interp.evaluate("x").unwrap(), Value::Integer(9));
}

#[test]
fn parameters_overwrite_globals() {
    let mut interp = session();
    let result = eval_all(&mut interp, "(def n 100) (defn id (n) n) (id 1) n");
    assert_eq!(result, Value::Integer(1));
}

#[test]
fn unterminated_text_is_a_parse_error() {
    let mut interp = session();
    assert!(matches!(
        interp.evaluate(r#"(+ 1 "unterminated"#),
        Err(interpreter::Error::Read(_))
    ));
}

#[test]
fn recursion() {
    let mut interp = session();
    let source = "
        ; factorial, no tail calls
        (defn fact (n)
          (if (< n 2)
              1
              (* n (fact (- n 1)))))
        (fact 10)
    ";
    let results = interp.run_source(source);
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].as_ref().unwrap(), &Value::Integer(3_628_800));
}

#[test]
fn deep_recursion() {
    let mut interp = session();
    let source = "
        (defn sum-to (n)
          (if (< n 1)
              0
              (+ n (sum-to (- n 1)))))
        (sum-to 1000)
    ";
    assert_eq!(eval_all(&mut interp, source), Value::Integer(500_500));
}

#[test]
fn deeply_nested_input_is_a_parse_error() {
    let mut interp = session();
    let form = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
    assert!(matches!(
        interp.evaluate(&form),
        Err(interpreter::Error::Read(reader::Error::TooDeep(_)))
    ));
    assert_eq!(interp.evaluate("(+ 1 2)").unwrap(), Value::Integer(3));
}

#[test]
fn print_spreads_lists() {
    let mut interp = session();
    interp.evaluate(r#"(print "sum:" (list 1 "a"))"#).unwrap();
    interp.evaluate("(print (list 1 (list 2 3)))").unwrap();
    assert_eq!(
        interp.console().output(),
        &["sum: 1 a".to_string(), "1 2 3".to_string()]
    );
}

#[test]
fn print_and_read_use_the_console() {
    let mut interp = Interpreter::new(ScriptedConsole::new(vec!["Ada"]));
    let source = r#"
        (defn greet (name) (print "hello" name))
        (greet ((read)))
    "#;
    eval_all(&mut interp, source);
    assert_eq!(interp.console().output(), &["hello Ada".to_string()]);
}

#[test]
fn meta_circular_eval() {
    let mut interp = session();
    eval_all(&mut interp, r#"(def code "(* 6 7)")"#);
    assert_eq!(interp.evaluate("(eval code)").unwrap(), Value::Integer(42));
}

#[test]
fn symbols_without_bindings_are_literals() {
    let mut interp = session();
    assert_eq!(
        interp.evaluate("(list red green)").unwrap(),
        Value::wrap_list(vec![Value::new_symbol("red"), Value::new_symbol("green")])
    );
    assert_eq!(
        interp.evaluate("(= red red)").unwrap(),
        Value::Boolean(true)
    );
}

#[test]
fn counting_loop() {
    let mut interp = Interpreter::new(ScriptedConsole::default());
    let source = "
        (defn set-i (i) i)
        (set-i 0)
        (while (< i 3)
          (do (print i) (set-i (+ i 1))))
    ";
    let last = eval_all(&mut interp, source);
    assert_eq!(last, Value::Integer(3));
    assert_eq!(
        interp.console().output(),
        &["0".to_string(), "1".to_string(), "2".to_string()]
    );
}

#[test]
fn failing_forms_do_not_end_the_session() {
    let mut interp = session();
    let results = interp.run_source("(def x 2) (undefined-fn x) (* x 3)");
    match &results[1] {
        Err(interpreter::Error::Eval(evaluator::Error::NotCallable(op))) => {
            assert_eq!(op, "undefined-fn")
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(results[2].as_ref().unwrap(), &Value::Integer(6));
}
