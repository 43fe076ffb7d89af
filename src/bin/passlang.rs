//! Command-line interface for passlang
//!
//! This binary compiles a passlang expression and prints the resulting
//! checks, wiring in a demo check constructor over a fixed set of worlds.
//!
//! Usage:
//!   passlang run `<expression>` --checks `<n>` [--format `<format>`]  - Generate checks
//!   passlang tokens `<expression>` [--format `<format>`]            - Print the token stream

use clap::{Arg, Command};
use rand::Rng;

use passlang::passlang::formats::{format_checks, format_tokens, OutputFormat};
use passlang::passlang::interpreter::{Check, CheckConstructor, RangeSampler};
use passlang::passlang::lexer::tokenize;
use passlang::{generate_checks, EvalError, RANDOM_PLACEHOLDER};

/// The demo world roster. Hmok is closed to visitors, so the constructor
/// never picks it when randomizing a placeholder world.
const WORLDS: &[&str] = &[
    "Fostral", "Glorx", "Necross", "Xplo", "Khox", "Boozeena", "Weexow", "Hmok", "Threall",
    "Arkonoy",
];
const HMOK: i64 = 7;

/// Coordinates run over a 2048 x 2048 grid.
const WORLD_EXTENT: i64 = 2048;

fn main() {
    let matches = Command::new("passlang")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile passlang expressions into generated checks")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Generate checks from an expression")
                .arg(
                    Arg::new("expression")
                        .help("The passlang expression to compile")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("checks")
                        .long("checks")
                        .short('c')
                        .help("Value of the built-in n variable")
                        .default_value("7"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('simple' or 'json')")
                        .default_value("simple"),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the token stream of an expression")
                .arg(
                    Arg::new("expression")
                        .help("The passlang expression to tokenize")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('simple' or 'json')")
                        .default_value("simple"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let expression = run_matches.get_one::<String>("expression").unwrap();
            let checks = run_matches.get_one::<String>("checks").unwrap();
            let format = run_matches.get_one::<String>("format").unwrap();
            handle_run_command(expression, checks, format);
        }
        Some(("tokens", tokens_matches)) => {
            let expression = tokens_matches.get_one::<String>("expression").unwrap();
            let format = tokens_matches.get_one::<String>("format").unwrap();
            handle_tokens_command(expression, format);
        }
        _ => unreachable!(),
    }
}

/// Handle the run command
fn handle_run_command(expression: &str, checks: &str, format: &str) {
    let number_of_checks: i64 = checks.parse().unwrap_or_else(|_| {
        eprintln!("Error: --checks takes an integer, got '{}'", checks);
        std::process::exit(1);
    });
    let format = parse_format(format);

    let result = generate_checks(
        number_of_checks,
        expression,
        demo_check_constructor(),
        demo_range_sampler(),
    );

    match result {
        Ok(checks) => match format_checks(&checks, format) {
            Ok(output) => println!("{}", output),
            Err(e) => exit_with(&e.to_string()),
        },
        Err(e) => exit_with(&e.to_string()),
    }
}

/// Handle the tokens command
fn handle_tokens_command(expression: &str, format: &str) {
    let format = parse_format(format);
    let tokens = tokenize(expression);
    match format_tokens(&tokens, format) {
        Ok(output) => println!("{}", output),
        Err(e) => exit_with(&e.to_string()),
    }
}

fn parse_format(format: &str) -> OutputFormat {
    OutputFormat::from_string(format).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    })
}

fn exit_with(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

/// The demo constructor: placeholders become a random non-Hmok world and
/// random coordinates; everything is then bounds-checked.
fn demo_check_constructor() -> CheckConstructor<'static> {
    let mut rng = rand::thread_rng();
    Box::new(move |world, x, y| {
        let world = if world == RANDOM_PLACEHOLDER {
            let mut candidate = rng.gen_range(0..WORLDS.len() as i64);
            while candidate == HMOK {
                candidate = rng.gen_range(0..WORLDS.len() as i64);
            }
            candidate
        } else {
            world
        };
        let x = if x == RANDOM_PLACEHOLDER {
            rng.gen_range(0..WORLD_EXTENT)
        } else {
            x
        };
        let y = if y == RANDOM_PLACEHOLDER {
            rng.gen_range(0..WORLD_EXTENT)
        } else {
            y
        };

        if world < 0 || world >= WORLDS.len() as i64 {
            return Err(EvalError::Constructor(format!(
                "world value {} out of bounds",
                world
            )));
        }
        if x < 0 {
            return Err(EvalError::Constructor(format!("x value {} out of bounds", x)));
        }
        if y < 0 {
            return Err(EvalError::Constructor(format!("y value {} out of bounds", y)));
        }

        Ok(Check { world, x, y })
    })
}

fn demo_range_sampler() -> RangeSampler<'static> {
    let mut rng = rand::thread_rng();
    Box::new(move |low, high| rng.gen_range(low..=high))
}
