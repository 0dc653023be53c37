use rlsp::cmdline;
use std::process;

fn main() {
    pretty_env_logger::init();
    let args = std::env::args().collect();
    if let Err(e) = cmdline::launch(args) {
        cmdline::report_error(&e.to_string());
        process::exit(1);
    }
}
