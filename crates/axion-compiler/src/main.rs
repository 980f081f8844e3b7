//! Axion Compiler
//!
//! Command-line interface for the Axion front end.

use ariadne::{Color, Label, Report, ReportKind, Source};
use axion_ast::dump::dump;
use axion_ast::OutputLang;
use axion_compiler::{Compiler, ProcessedUnit, ProcessingMode, ProcessingOptions};
use axion_diagnostics::{Blame, BlameList, BlameSeverity};
use axion_parser::DEFAULT_MAX_DEPTH;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "axion")]
#[command(version)]
#[command(about = "The Axion language front end", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log pipeline progress (overrides AXION_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable coloured diagnostics
    #[arg(long, global = true)]
    no_color: bool,

    /// Maximum syntactic nesting depth
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Lex source file and display tokens
    Lex {
        /// Source file to lex
        file: PathBuf,
    },
    /// Parse source file and report blames
    Parse {
        /// Source file to parse
        file: PathBuf,
        /// Print the syntax tree
        #[arg(short, long)]
        tree: bool,
    },
    /// Translate source file to another language
    Transpile {
        /// Source file to translate
        file: PathBuf,
        /// Output language
        #[arg(short, long, value_enum, default_value_t = Lang::Csharp)]
        lang: Lang,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Leave out the `using` prelude
        #[arg(long)]
        no_usings: bool,
    },
    /// Print source file in canonical Axion layout
    Reformat {
        /// Source file to reformat
        file: PathBuf,
        /// Rewrite the file in place
        #[arg(short, long)]
        write: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Lang {
    Axion,
    Csharp,
}

impl From<Lang> for OutputLang {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::Axion => OutputLang::Axion,
            Lang::Csharp => OutputLang::CSharp,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut options = ProcessingOptions {
        max_nesting_depth: cli.max_depth,
        color: !cli.no_color,
        ..ProcessingOptions::default()
    };
    let (file, output, in_place, tree) = match cli.command {
        Commands::Lex { file } => {
            options.mode = ProcessingMode::Lex;
            (file, None, false, false)
        }
        Commands::Parse { file, tree } => {
            options.mode = ProcessingMode::Parse;
            (file, None, false, tree)
        }
        Commands::Transpile {
            file,
            lang,
            output,
            no_usings,
        } => {
            options.mode = ProcessingMode::Transpile;
            options.output = lang.into();
            options.using_prelude = !no_usings;
            (file, output, false, false)
        }
        Commands::Reformat { file, write } => {
            options.mode = ProcessingMode::Reformat;
            (file, None, write, false)
        }
    };

    let source = match fs::read_to_string(&file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let filename = file.display().to_string();

    let compiler = Compiler::new(options.clone());
    let unit = match compiler.process_source(&source) {
        Ok(unit) => unit,
        Err(e) => {
            eprintln!("error: {}: {}", filename, e);
            return ExitCode::FAILURE;
        }
    };

    report_blames(&filename, &source, &unit.blames, options.color);

    match options.mode {
        ProcessingMode::Lex => print_tokens(&unit),
        ProcessingMode::Parse => {
            if let Some(root) = unit.ast.root().filter(|_| tree) {
                println!("{}", dump(&unit.ast, root));
            }
        }
        ProcessingMode::Transpile | ProcessingMode::Reformat => {
            let target = if in_place { Some(file.as_path()) } else { output.as_deref() };
            if let Some(code) = &unit.output {
                if let Err(e) = emit(code, target) {
                    eprintln!("Error writing output: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    if unit.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("AXION_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_tokens(unit: &ProcessedUnit) {
    println!("Tokens ({}):", unit.tokens.len());
    for token in &unit.tokens {
        println!("  {:?} @ {}..{}", token.kind, token.span.start, token.span.end);
    }
}

fn emit(code: &str, target: Option<&Path>) -> std::io::Result<()> {
    match target {
        Some(path) => fs::write(path, code),
        None => {
            print!("{}", code);
            Ok(())
        }
    }
}

fn report_blames(filename: &str, source: &str, blames: &BlameList, color: bool) {
    if blames.is_empty() {
        return;
    }
    if !color {
        let mut stream = StandardStream::stderr(ColorChoice::Never);
        if let Err(e) = blames.report(&mut stream, source, filename) {
            eprintln!("Error printing diagnostics: {}", e);
        }
        return;
    }
    for blame in blames {
        report_blame(filename, source, blame);
    }
}

/// Report a blame using ariadne
fn report_blame(filename: &str, source: &str, blame: &Blame) {
    let (kind, color) = match blame.severity {
        BlameSeverity::Error => (ReportKind::Error, Color::Red),
        BlameSeverity::Warning => (ReportKind::Warning, Color::Yellow),
        BlameSeverity::Info => (ReportKind::Advice, Color::Blue),
    };
    let start = blame.span.start.min(source.len());
    let end = blame.span.end.max(start + 1).min(source.len().max(start));

    let printed = Report::build(kind, filename, start)
        .with_code(blame.kind.code())
        .with_message(blame.kind.description())
        .with_label(
            Label::new((filename, start..end))
                .with_message(&blame.message)
                .with_color(color),
        )
        .finish()
        .eprint((filename, Source::from(source)));
    if let Err(e) = printed {
        eprintln!("Error printing diagnostics: {}", e);
    }
}
