//! Mkc CLI
//!
//! Inspect and run `$(shell ...)` fast paths.

use mkc::commands::{eval_command, explain_command, parse_options, CliOptions};
use mkc::init_tracing;

const OPTIONS_HELP: &str = "\
Options:
  --root=<dir>          Directory to run in and index (default: .)
  --var NAME=VALUE      Define a variable; digits define $(N)
  --shell-date=<ts>     Timestamp for `date +FORMAT` (YYYY-MM-DD[ HH:MM:SS])
  --leaf-name=<name>    Leaf file name findleaves may answer (repeatable)";

fn print_usage() {
    println!("mkc - make $(shell ...) fast paths");
    println!();
    println!("Usage: mkc <command> [options] <shell command...>");
    println!();
    println!("Commands:");
    println!("  explain    Show the pattern and node a command compacts to");
    println!("  eval       Compact and evaluate a command, printing its output");
    println!("  help       Show this message");
    println!();
    println!("{OPTIONS_HELP}");
}

fn options_or_exit(command: &str, args: &[String]) -> CliOptions {
    match parse_options(args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("Usage: mkc {command} [options] <shell command...>");
            eprintln!();
            eprintln!("{OPTIONS_HELP}");
            std::process::exit(1);
        }
    }
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "explain" => {
            let options = options_or_exit(command, &args[2..]);
            match explain_command(&options) {
                Ok(explanation) => println!("{explanation}"),
                Err(err) => {
                    eprintln!("error: {err}");
                    std::process::exit(1);
                }
            }
        }
        "eval" => {
            let options = options_or_exit(command, &args[2..]);
            match eval_command(&options) {
                Ok(output) => println!("{output}"),
                Err(err) => {
                    eprintln!("error: {err}");
                    std::process::exit(1);
                }
            }
        }
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
