use crate::console::{Console, StdConsole};
use crate::interpreter::{FormFailure, Interpreter};
use crate::printer::{self, PrintMode};
use crate::{forms, Value, VERSION};
use ansi_term::Colour::Red;
use linefeed::{DefaultTerminal, Interface, ReadResult, Terminal};
use std::io::{self, Read};
use std::path::PathBuf;
use std::rc::Rc;
use std::{fmt, fs};

pub const PROMPT: &str = "rlsp> ";
const CONTINUATION_PROMPT: &str = "  ... ";

#[derive(Debug)]
pub enum Error {
    IOError(io::Error),
    Usage(String),
    Failed(FormFailure),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IOError(e) => write!(f, "io error: {}", e),
            Error::Usage(msg) => write!(f, "{}\nusage: rlsp [--keep-going] [FILE]", msg),
            Error::Failed(failure) => write!(f, "{}", failure),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::IOError(e)
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Options {
    /// Report failing forms and carry on instead of stopping at the first.
    pub keep_going: bool,
    pub script: Option<PathBuf>,
}

/// `args` includes the program name, as `std::env::args` yields it.
pub fn parse_args(args: &[String]) -> Result<Options, Error> {
    let mut options = Options::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "-k" | "--keep-going" => options.keep_going = true,
            flag if flag.starts_with('-') => {
                return Err(Error::Usage(format!("unknown option {}", flag)))
            }
            path => match options.script {
                Some(_) => return Err(Error::Usage("expected at most one file".into())),
                None => options.script = Some(PathBuf::from(path)),
            },
        }
    }
    Ok(options)
}

pub fn launch(args: Vec<String>) -> Result<(), Error> {
    let options = parse_args(&args)?;
    match &options.script {
        Some(path) => {
            log::info!("running {}", path.display());
            let source = fs::read_to_string(path)?;
            run_batch(&source, options.keep_going)
        }
        None if !atty::is(atty::Stream::Stdin) => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            run_batch(&source, options.keep_going)
        }
        None => {
            let interface = Rc::new(setup()?);
            repl(&interface);
            save_history(&interface)?;
            Ok(())
        }
    }
}

/// Runs a whole program. Results are not printed; only `print` produces
/// output. Without `keep_going` the first failing form aborts the run.
pub fn run_batch(source: &str, keep_going: bool) -> Result<(), Error> {
    let mut interpreter = Interpreter::new(StdConsole);
    if !keep_going {
        return interpreter
            .run_until_error(source)
            .map(|_| ())
            .map_err(Error::Failed);
    }
    for (index, result) in interpreter.run_source(source).into_iter().enumerate() {
        if let Err(e) = result {
            report_error(&format!("form {}: {}", index + 1, e));
        }
    }
    Ok(())
}

pub fn report_error(message: &str) {
    match atty::is(atty::Stream::Stderr) {
        true => eprintln!("{}", Red.paint(message)),
        false => eprintln!("{}", message),
    }
}

pub fn setup() -> io::Result<Interface<DefaultTerminal>> {
    let interface = Interface::new("rlsp")?;
    interface.set_prompt(PROMPT)?;
    if let Some(path) = history_path() {
        interface.load_history(path).ok();
    };
    Ok(interface)
}

fn history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|mut path| {
        path.push(".rlsp_history");
        path
    })
}

pub fn save_history<T: Terminal>(interface: &Interface<T>) -> io::Result<()> {
    match history_path() {
        Some(path) => interface.save_history(path),
        None => Ok(()),
    }
}

fn next_line<T: Terminal>(interface: &Interface<T>) -> io::Result<Option<String>> {
    loop {
        match interface.read_line()? {
            ReadResult::Eof => return Ok(None),
            ReadResult::Input(line) => return Ok(Some(line)),
            ReadResult::Signal(sig) => writeln!(interface, "Received signal {:?}", sig)?,
        }
    }
}

/// Keeps reading lines until every open parenthesis is closed.
fn read_balanced<T: Terminal>(interface: &Interface<T>) -> io::Result<Option<String>> {
    let mut text = match next_line(interface)? {
        Some(line) => line,
        None => return Ok(None),
    };
    interface.set_prompt(CONTINUATION_PROMPT)?;
    while forms::paren_balance(&forms::normalize(&text)) > 0 {
        match next_line(interface)? {
            Some(more) => {
                text.push('\n');
                text.push_str(&more);
            }
            None => break,
        }
    }
    interface.set_prompt(PROMPT)?;
    Ok(Some(text))
}

/// Console for `read` and `print` while the REPL owns the terminal.
pub struct TerminalConsole<T: Terminal> {
    interface: Rc<Interface<T>>,
}

impl<T: Terminal> TerminalConsole<T> {
    pub fn new(interface: Rc<Interface<T>>) -> Self {
        Self { interface }
    }
}

impl<T: Terminal> Console for TerminalConsole<T> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.interface.set_prompt("")?;
        let line = next_line(&self.interface);
        self.interface.set_prompt(PROMPT)?;
        line
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.interface, "{}", line)
    }
}

pub fn repl<T: Terminal>(interface: &Rc<Interface<T>>) {
    writeln!(interface, "rlsp version {}", VERSION).ok();
    let mut interpreter = Interpreter::new(TerminalConsole::new(Rc::clone(interface)));
    loop {
        let text = match read_balanced(interface) {
            Ok(Some(text)) => text,
            Ok(None) => break,
            Err(e) => {
                writeln!(interface, "Error: {}", e).ok();
                break;
            }
        };
        if !text.trim().is_empty() {
            interface.add_history_unique(text.clone());
        }
        for result in interpreter.run_line(&text) {
            match result {
                Ok(Value::Nil) => (),
                Ok(value) => {
                    writeln!(interface, "{}", printer::pr_str(&value, PrintMode::Directly)).ok();
                }
                Err(e) => {
                    writeln!(interface, "{}", Red.paint(format!("\t{}", e))).ok();
                }
            }
        }
    }
}
