use std::fs;

use clap::Parser;
use jsinterp::{InterpreterOptions, JsInterpreter};
use tracing_subscriber::EnvFilter;

/// jsinterp runs one function of a script snippet and prints its result as
/// JSON.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells jsinterp to read the script from a file instead of taking it
    /// inline.
    #[arg(short, long)]
    file: bool,

    /// Maximum depth of nested script calls.
    #[arg(long, default_value_t = 100)]
    max_call_depth: usize,

    /// The script, or a path to it with `--file`.
    contents: String,

    /// The top-level function to call.
    function: String,

    /// Arguments to pass, each a JSON literal (`3`, `"abc"`, `[1,2]`).
    args: Vec<String>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env())
                                     .with_writer(std::io::stderr)
                                     .try_init();
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let script = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
                                              eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                                                        &args.contents);
                                              std::process::exit(1);
                                          })
    } else {
        args.contents
    };

    let call_args: Vec<serde_json::Value> = args.args
                                                .iter()
                                                .map(|arg| {
                                                    serde_json::from_str(arg).unwrap_or_else(|e| {
                                                        eprintln!("Argument '{arg}' is not valid JSON: {e}");
                                                        std::process::exit(1);
                                                    })
                                                })
                                                .collect();

    let options = InterpreterOptions { max_call_depth: args.max_call_depth };
    let result = JsInterpreter::with_options(&script, options).and_then(|interp| {
                     interp.extract_function(&args.function)?.call_json(&call_args)
                 });

    match result {
        Ok(value) => println!("{value}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    }
}
