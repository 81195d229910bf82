use clap::{Parser as ClapParser, Subcommand};
use stamen::cli::{self, CliError, EvalOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "stamen")]
#[command(about = "Stamen - compile and evaluate expressions and Mustache templates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression and print the result as JSON
    Eval {
        /// The expression to evaluate
        expression: String,

        /// Variables as a JSON object (reads from stdin if not provided)
        #[arg(short, long)]
        vars: Option<String>,

        /// Convert mismatched operand types instead of failing
        #[arg(long = "unsafe")]
        type_unsafe: bool,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print the postfix stream and variables of an expression
    Compile {
        /// The expression to compile
        expression: String,
    },

    /// Print the parsed tree of a Mustache template as JSON
    Template {
        /// The template text (reads from stdin if not provided)
        text: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Eval {
            expression,
            vars,
            type_unsafe,
            pretty,
        } => run_eval(expression, vars, type_unsafe, pretty),
        Commands::Compile { expression } => run_compile(&expression),
        Commands::Template { text, pretty } => run_template(text, pretty),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Reads stdin when it is piped, like the input of a filter.
fn read_stdin() -> Result<Option<String>, CliError> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(Some(buffer))
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }?;
    println!("{}", json);
    Ok(())
}

fn run_eval(
    expression: String,
    vars: Option<String>,
    type_unsafe: bool,
    pretty: bool,
) -> Result<(), CliError> {
    let variables = match vars {
        Some(s) => Some(s),
        None => read_stdin()?.filter(|s| !s.trim().is_empty()),
    };

    let options = EvalOptions {
        expression,
        variables,
        type_safe: !type_unsafe,
    };
    print_json(&cli::execute_eval(&options)?, pretty)
}

fn run_compile(expression: &str) -> Result<(), CliError> {
    let result = cli::execute_compile(expression)?;
    println!("{}", result.postfix.join(" "));
    println!("variables: {}", result.variables.join(", "));
    Ok(())
}

fn run_template(text: Option<String>, pretty: bool) -> Result<(), CliError> {
    let text = match text {
        Some(text) => text,
        None => read_stdin()?.unwrap_or_default(),
    };
    print_json(&cli::execute_template(&text)?, pretty)
}
