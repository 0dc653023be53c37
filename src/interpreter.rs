use crate::console::Console;
use crate::environment::Environment;
use crate::evaluator::{self, Context, MAX_EVAL_DEPTH};
use crate::{forms, reader, Value};
use std::fmt;

pub type Result = std::result::Result<Value, Error>;

#[derive(Debug)]
pub enum Error {
    Read(reader::Error),
    Eval(evaluator::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Read(e) => write!(f, "parse error: {}", e),
            Error::Eval(e) => write!(f, "runtime error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

/// The first failing form of a batch run.
#[derive(Debug)]
pub struct FormFailure {
    /// Zero-based position of the form in the source.
    pub index: usize,
    pub form: String,
    pub error: Error,
}

impl fmt::Display for FormFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "form {} `{}`: {}", self.index + 1, self.form, self.error)
    }
}

/// One session: a persistent environment plus the console that `read` and
/// `print` talk to.
pub struct Interpreter<C: Console> {
    env: Environment,
    console: C,
    max_depth: usize,
}

impl<C: Console> Interpreter<C> {
    pub fn new(console: C) -> Self {
        Self {
            env: Environment::new(),
            console,
            max_depth: MAX_EVAL_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn read(form_text: &str) -> Result {
        reader::read_form(form_text).map_err(Error::Read)
    }

    pub fn eval(&mut self, ast: &Value) -> Result {
        let mut ctx = Context::new(&mut self.env, &mut self.console, self.max_depth);
        evaluator::eval(ast, &mut ctx).map_err(Error::Eval)
    }

    /// Reads and evaluates one form against the session environment.
    pub fn evaluate(&mut self, form_text: &str) -> Result {
        log::debug!("evaluate {}", form_text);
        let ast = Self::read(form_text)?;
        self.eval(&ast)
    }

    /// Evaluates every top-level form of `source` in order. A failing form
    /// does not stop the ones after it.
    pub fn run_source(&mut self, source: &str) -> Vec<Result> {
        forms::split_source(source)
            .iter()
            .map(|form| self.evaluate(form))
            .collect()
    }

    /// Like `run_source`, but stops at the first failing form.
    pub fn run_until_error(
        &mut self,
        source: &str,
    ) -> std::result::Result<Vec<Value>, FormFailure> {
        let mut values = Vec::new();
        for (index, form) in forms::split_source(source).into_iter().enumerate() {
            match self.evaluate(&form) {
                Ok(value) => values.push(value),
                Err(error) => return Err(FormFailure { index, form, error }),
            }
        }
        Ok(values)
    }

    /// Interactive input: like `run_source`, except that text holding no
    /// parenthesized form at all is evaluated as a single bare atom.
    pub fn run_line(&mut self, line: &str) -> Vec<Result> {
        let normalized = forms::normalize(line);
        let split = forms::split_forms(&normalized);
        if split.is_empty() && !normalized.is_empty() {
            return vec![self.evaluate(&normalized)];
        }
        split.iter().map(|form| self.evaluate(form)).collect()
    }
}
