mod debug_report;

use std::io::{self, IsTerminal, Read};
use timepat::{ParseDetails, Pattern};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let pattern = match Pattern::compile(&config.pattern) {
        Ok(pattern) => pattern,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    match pattern.parse_verbose(&config.input) {
        Ok(details) => print_outcome(&config, &details),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn print_outcome(config: &CliConfig, details: &ParseDetails) {
    if config.verbose {
        debug_report::print_run(&config.pattern, &config.input, details, config.color);
    } else {
        println!("{}", details.value.to_rfc3339());
    }
}

struct CliConfig {
    pattern: String,
    input: String,
    verbose: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut pattern: Option<String> = None;
    let mut input: Option<String> = None;
    let mut verbose = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("timepat {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--verbose" | "-v" => verbose = true,
            "--color" => color = true,
            "--no-color" => color = false,
            "--pattern" | "-p" => {
                let value = args.next().ok_or_else(|| "error: --pattern expects a value".to_string())?;
                if pattern.is_some() {
                    return Err("error: pattern provided multiple times".to_string());
                }
                pattern = Some(value);
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--pattern=") => {
                let value = arg.trim_start_matches("--pattern=");
                if pattern.is_some() {
                    return Err("error: pattern provided multiple times".to_string());
                }
                pattern = Some(value.to_string());
            }
            _ if arg.starts_with("--input=") => {
                let value = arg.trim_start_matches("--input=");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value.to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    let pattern = match pattern {
        Some(value) => value,
        None => return Err(format!("error: no pattern provided\n\n{}", help_text())),
    };

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };
    let input = input.trim_end_matches(['\r', '\n']).to_string();

    if input.is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { pattern, input, verbose, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "timepat {version}

Pattern-driven timestamp parsing CLI.

Usage:
  timepat --pattern <pattern> [OPTIONS] [--] <input...>
  timepat --pattern <pattern> [OPTIONS] --input <text>

Options:
  -p, --pattern <pattern>    Format pattern, e.g. 'dd/MMMM/yyyy:HH:mm:ss Z'.
  -i, --input <text>         Timestamp text to decode. If omitted, reads
                             remaining args or stdin when no args are provided.
  -v, --verbose              Print the per-token span report instead of just
                             the decoded value.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  Input did not match the pattern.
  2  Invalid arguments or invalid pattern.
",
        version = env!("CARGO_PKG_VERSION")
    )
}
