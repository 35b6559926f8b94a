//! `penman`: command-line front end for the PENMAN core library.
//!
//! Provides two subcommands:
//!
//! - **`lex`**: print the token stream of graph or triple notation.
//! - **`normalize`**: read a triple conjunction and canonicalize, deinvert,
//!   or reify its triples against a role model.
//!
//! Both subcommands read from a file path or from stdin (`-`). Set `RUST_LOG`
//! (e.g. `RUST_LOG=penman=trace`) to see what the library is doing.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use penman::{read_triples, tokenize, write_triples, Grammar, LexError, Model, Token, Triple};
use tracing_subscriber::EnvFilter;

/// penman: PENMAN notation tools
///
/// Tokenize graph notation and normalize triples.
#[derive(Parser)]
#[command(name = "penman", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tokens of a document.
    ///
    /// One token per line as `LINE:COLUMN<TAB>KIND<TAB>VALUE`, or a JSON array
    /// with --json. Exits 1 if the input cannot be tokenized.
    ///
    /// Pass `-` as FILE to read from stdin.
    Lex {
        /// Path to a text file, or `-` for stdin.
        file: PathBuf,

        /// Lexical grammar: graph | triples
        #[arg(short = 'g', long, default_value = "graph", value_name = "GRAMMAR")]
        grammar: Grammar,

        /// Print tokens as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Normalize a conjunction of triples against a role model.
    ///
    /// Reads `role(source, target) ^ ...` and applies the selected passes in
    /// the order canonicalize, deinvert, reify. Each reified node gets a fresh
    /// `_N` identifier. Exits 1 if the input cannot be read as triples.
    ///
    /// Examples:
    ///   penman normalize --canonicalize --deinvert graph.triples
    ///   penman normalize --model amr.json --reify -
    Normalize {
        /// Path to a triples file, or `-` for stdin.
        file: PathBuf,

        /// JSON role model configuration. Without one, the default model is
        /// used.
        #[arg(short = 'm', long, env = "PENMAN_MODEL", value_name = "FILE")]
        model: Option<PathBuf>,

        /// Canonicalize each role.
        #[arg(long)]
        canonicalize: bool,

        /// Flip inverted triples to their base direction.
        #[arg(long)]
        deinvert: bool,

        /// Expand reifiable triples into reified nodes.
        #[arg(long)]
        reify: bool,

        /// Print triples as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Log filter used when `RUST_LOG` is unset. The binary and the library are
/// both the `penman` target.
const DEFAULT_LOG_FILTER: &str = "penman=warn";

/// Which model passes `normalize` runs.
#[derive(Debug, Clone, Copy, Default)]
struct Passes {
    canonicalize: bool,
    deinvert: bool,
    reify: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Lex {
            file,
            grammar,
            json,
        } => {
            let text = read_input(&file);
            let lexed: Result<Vec<Token>, LexError> = tokenize(&text, grammar).collect();
            let tokens = match lexed {
                Ok(tokens) => tokens,
                Err(e) => {
                    eprintln!("error: {}", e);
                    eprintln!("  {}", e.source_line);
                    eprintln!("  {}^", " ".repeat(e.column.saturating_sub(1)));
                    process::exit(1);
                }
            };
            if json {
                println!("{}", to_json(&tokens));
            } else {
                for t in &tokens {
                    println!("{}\t{}\t{}", t.span, t.kind, t.value);
                }
            }
        }

        Command::Normalize {
            file,
            model,
            canonicalize,
            deinvert,
            reify,
            json,
        } => {
            let model = load_model(model.as_deref());
            let text = read_input(&file);
            let triples = read_triples(&text).unwrap_or_else(|e| {
                eprintln!("error: {}", e);
                process::exit(1);
            });
            let passes = Passes {
                canonicalize,
                deinvert,
                reify,
            };
            let normalized = normalize(&model, triples, passes);
            if json {
                println!("{}", to_json(&normalized));
            } else if !normalized.is_empty() {
                println!("{}", write_triples(&normalized));
            }
        }
    }
}

/// Apply `passes` to each triple in order, giving each reified node an
/// identifier not already used in `triples`.
fn normalize(model: &Model, triples: Vec<Triple>, passes: Passes) -> Vec<Triple> {
    let mut used: HashSet<String> = triples
        .iter()
        .flat_map(|t| [t.source.clone(), t.target.clone()])
        .collect();
    let mut counter = 0usize;
    let mut out = Vec::with_capacity(triples.len());

    for mut triple in triples {
        if passes.canonicalize {
            triple = model.canonicalize(&triple);
        }
        if passes.deinvert {
            triple = model.deinvert(&triple);
        }
        if !passes.reify {
            out.push(triple);
            continue;
        }
        match model.reify(&triple) {
            Ok(reified) => {
                let node = loop {
                    counter += 1;
                    let candidate = format!("_{counter}");
                    if used.insert(candidate.clone()) {
                        break candidate;
                    }
                };
                tracing::debug!(%triple, node = %node, "reified");
                // positions, not values: the input may itself use `_`
                let [mut source, mut instance, mut target] = reified;
                source.target = node.clone();
                instance.source = node.clone();
                target.source = node;
                out.extend([source, instance, target]);
            }
            Err(e) => {
                tracing::trace!(%triple, "left as is: {e}");
                out.push(triple);
            }
        }
    }
    out
}

/// Load a model configuration file, or fall back to the default model.
fn load_model(path: Option<&Path>) -> Model {
    let Some(path) = path else {
        return Model::default();
    };
    let json = fs::read_to_string(path)
        .unwrap_or_else(|e| fatal(&format!("failed to read {}: {}", path.display(), e)));
    let model = Model::from_json(&json)
        .unwrap_or_else(|e| fatal(&format!("{}: {}", path.display(), e)));
    tracing::debug!(path = %path.display(), roles = model.roles().count(), "model loaded");
    model
}

/// Read the full contents of a file, or stdin when the path is `"-"`.
fn read_input(path: &Path) -> String {
    if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .unwrap_or_else(|e| fatal(&format!("failed to read stdin: {}", e)));
        buf
    } else {
        fs::read_to_string(path).unwrap_or_else(|e| {
            fatal(&format!("failed to read {}: {}", path.display(), e))
        })
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| fatal(&format!("failed to serialise output: {}", e)))
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("penman: {}", msg);
    process::exit(2);
}

// --- tests -------------------------------------------------------------------
