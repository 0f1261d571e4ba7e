use clap::{Parser, Subcommand, ValueEnum};
use kumiki::block::IdAllocator;
use kumiki::prelude::*;
use serde::Serialize;
use std::fs;
use std::time::Instant;

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeCli {
    Rule,
    Action,
}

impl From<ModeCli> for DslMode {
    fn from(mode: ModeCli) -> Self {
        match mode {
            ModeCli::Rule => DslMode::Rule,
            ModeCli::Action => DslMode::Action,
        }
    }
}

/// Formats, inspects and checks rule/action DSL documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a document and print the regenerated text
    Fmt {
        #[command(flatten)]
        input: InputArgs,
        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print the parsed block tree as JSON
    Tree {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Report dropped lines and verify that regeneration is stable
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(clap::Args, Debug)]
struct InputArgs {
    /// Path to the DSL document
    path: String,

    /// Document mode; detected from the first keyword when omitted
    #[arg(short, long, value_enum)]
    mode: Option<ModeCli>,

    /// Path to an EditorMeta JSON file; read from the document header when omitted
    #[arg(long)]
    meta: Option<String>,
}

#[derive(Serialize)]
struct TreeReport {
    mode: DslMode,
    meta: EditorMeta,
    statements: Vec<BlockView>,
    preconditions: Vec<BlockView>,
    skipped: Vec<kumiki::dsl::SkippedLine>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Fmt { input, output } => run_fmt(input, output),
        Command::Tree { input } => run_tree(input),
        Command::Check { input } => run_check(input),
    }
}

fn run_fmt(input: InputArgs, output: Option<String>) {
    let session = open_session(&input);
    let text = session.generated_text();
    match output {
        Some(path) => {
            fs::write(&path, format!("{}\n", text)).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write output file '{}': {}", path, e))
            });
            println!("Formatted document written to '{}'", path);
        }
        None => println!("{}", text),
    }
}

fn run_tree(input: InputArgs) {
    let session = open_session(&input);
    let report = TreeReport {
        mode: session.mode(),
        meta: session.meta().clone(),
        statements: session.statement_views(),
        preconditions: session.precondition_views(),
        skipped: session.skipped_lines().to_vec(),
    };
    let json = serde_json::to_string_pretty(&report)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize tree: {}", e)));
    println!("{}", json);
}

fn run_check(input: InputArgs) {
    let start = Instant::now();
    let session = open_session(&input);

    let skipped = session.skipped_lines();
    if skipped.is_empty() {
        println!("All lines recognised.");
    } else {
        println!("{} line(s) dropped by the parser:", skipped.len());
        for line in skipped {
            println!("  {:>4} | {}", line.line, line.text);
        }
    }

    let first = session.generated_text();
    let mut ids = IdAllocator::new();
    let reparsed = parse(first, session.mode(), &mut ids);
    let second = generate(
        session.mode(),
        session.meta(),
        &reparsed.statements,
        &reparsed.preconditions,
    );

    println!("\n--- Summary ---");
    println!("Statements:     {}", session.statements().len());
    println!("Preconditions:  {}", session.preconditions().len());
    println!("Checked in:     {:?}", start.elapsed());

    if first != second {
        exit_with_error("Regenerated text is not stable across a parse/generate cycle.");
    }
    println!("Round trip:     stable");
}

fn open_session(input: &InputArgs) -> EditorSession {
    let text = fs::read_to_string(&input.path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read DSL file '{}': {}", input.path, e))
    });

    let mode = input.mode.map(DslMode::from).unwrap_or_else(|| detect_mode(&text));
    let meta = match &input.meta {
        Some(path) => {
            let json = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read meta file '{}': {}", path, e))
            });
            serde_json::from_str(&json)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse meta JSON: {}", e)))
        }
        None => parse_meta(&text, mode).unwrap_or_else(|| {
            log::warn!("no {} header found in '{}', using defaults", mode, input.path);
            EditorMeta::default()
        }),
    };

    EditorSession::builder(mode, meta).with_source(text).build()
}

fn detect_mode(text: &str) -> DslMode {
    let first = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with("//"));
    match first {
        Some(line) if line.starts_with("ACTION") => DslMode::Action,
        _ => DslMode::Rule,
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
