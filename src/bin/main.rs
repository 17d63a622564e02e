use char_sim_core::{EngineConfig, Profile, ScoreBreakdown, SimilarityEngine};
use clap::Parser;
use crossterm::style::Stylize;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Similarity between two single Chinese characters.
#[derive(Debug, Parser)]
#[command(name = "char-sim", version)]
struct Args {
    /// First character; omit both to start the interactive prompt
    char1: Option<String>,
    /// Second character
    char2: Option<String>,
    /// Profile: shape, pinyin, w2v or all
    #[arg(short, long, default_value = "shape")]
    kind: String,
    /// Decimal places of the result (defaults to the engine setting)
    #[arg(short, long)]
    rounded: Option<u32>,
    /// Directory holding the char_<attribute>.dict files
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// JSON engine configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON file of character vectors enabling the w2v and all profiles
    #[arg(long)]
    vectors: Option<PathBuf>,
    /// Print the score and per-attribute breakdown as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    if args.data_dir.is_some() {
        config.data_dir = args.data_dir.clone();
    }
    if args.vectors.is_some() {
        config.vectors_path = args.vectors.clone();
    }
    let engine = SimilarityEngine::open(&config)?;

    match (&args.char1, &args.char2) {
        (Some(a), Some(b)) => report(&engine, a, b, &args.kind, args.rounded, args.json),
        (None, None) => interactive(&engine, args),
        _ => Err("expected two characters, or none for the interactive prompt".into()),
    }
}

fn report(
    engine: &SimilarityEngine,
    char1: &str,
    char2: &str,
    kind: &str,
    rounded: Option<u32>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let profile = Profile::parse(kind);
    let report = engine.report(char1, char2, profile, rounded)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!(
        "similarity({}, {}) [{}]: {}",
        char1,
        char2,
        profile.to_string().cyan(),
        format!("{}", report.score).green().bold()
    );
    print_breakdown(&report.breakdown);
    Ok(())
}

fn print_breakdown(b: &ScoreBreakdown) {
    let rows = [
        ("struct", b.structure),
        ("fourangle", b.fourangle),
        ("number", b.number),
        ("frequency", b.frequency),
        ("stroke", b.stroke),
        ("order", b.order),
        ("component", b.component),
        ("pinyin", b.pinyin),
    ];
    for (name, score) in rows {
        println!("  {:<10} {:.4}", name.dark_grey(), score);
    }
}

fn interactive(engine: &SimilarityEngine, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    println!("Character similarity. Enter two characters and an optional profile, 'exit' to quit.");
    println!("---------------------------------------------------------------");

    loop {
        print!("\n> ");
        stdout().flush()?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.as_slice() {
            ["exit"] => break,
            [] => continue,
            [a, b] => print_or_warn(report(engine, a, b, &args.kind, args.rounded, args.json)),
            [a, b, kind] => print_or_warn(report(engine, a, b, kind, args.rounded, args.json)),
            _ => println!("{}", "usage: <char1> <char2> [shape|pinyin|w2v|all]".yellow()),
        }
    }
    Ok(())
}

fn print_or_warn(result: Result<(), Box<dyn std::error::Error>>) {
    if let Err(e) = result {
        println!("{} {}", "error:".red(), e);
    }
}
