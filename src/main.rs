// jack-parser: build and print the parse tree of one Jack class

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use crossterm::style::Stylize;

use jack_parser::{parse_source, parse_tokens, ParseTree, Token};

/// How the parse tree is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Indented, one node per line
    Tree,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "jack-parser",
    version,
    about = "Parse a single Jack class and print its parse tree."
)]
struct Args {
    /// Jack source file. Without it, a built-in `class MyClass { }` token list is parsed.
    file: Option<PathBuf>,

    /// Output format for the tree
    #[arg(long, value_enum, default_value_t = OutputFormat::Tree)]
    format: OutputFormat,

    /// Print node counts per label after the tree
    #[arg(long)]
    stats: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> jack_parser::Result<()> {
    let tree = match &args.file {
        Some(path) => {
            tracing::info!("Parsing {}...", path.display());
            let source = fs::read_to_string(path)?;
            parse_source(&source)?
        }
        None => {
            tracing::info!("No input file, parsing the built-in demo class");
            parse_tokens(demo_tokens())?
        }
    };

    tracing::info!(
        "Parsed successfully. Tree has {} nodes.",
        tree.node_count()
    );

    match args.format {
        OutputFormat::Tree => print!("{tree}"),
        OutputFormat::Json => println!("{}", tree.to_json()?),
    }

    if args.stats {
        print_stats(&tree);
    }

    Ok(())
}

/// Tokens for:
///
/// ```text
/// class MyClass {
///
/// }
/// ```
fn demo_tokens() -> Vec<Token> {
    vec![
        Token::keyword("class"),
        Token::identifier("MyClass"),
        Token::symbol("{"),
        Token::symbol("}"),
    ]
}

fn print_stats(tree: &ParseTree) {
    let mut counts: Vec<(&str, usize)> = tree.label_counts().into_iter().collect();
    counts.sort_unstable();

    println!();
    for (label, count) in counts {
        println!("{label:<16} {count}");
    }
    println!("{:<16} {}", "total", tree.node_count());
}
