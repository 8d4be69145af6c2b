//! pdfrank CLI - rank PDF sections for a persona and a job

use std::path::{Path, PathBuf};
use std::process;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfrank::score::{load_embedder, probe_similarity, PROBE_SENTENCES};
use pdfrank::{DocumentStatus, Pipeline, PipelineConfig, Query, RunReport};

#[derive(Parser)]
#[command(name = "pdfrank")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Rank PDF sections by relevance to a persona and a job", long_about = None)]
struct Cli {
    /// Who the ranking is for (e.g. "Travel Planner")
    #[arg(value_name = "PERSONA")]
    persona: Option<String>,

    /// What the persona needs to get done
    #[arg(value_name = "JOB")]
    job: Option<String>,

    /// Directory containing the PDF files
    #[arg(long, env = "INPUT_DIR", default_value = "input")]
    input_dir: PathBuf,

    /// Directory receiving combined_output.json
    #[arg(long, env = "OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,

    /// Local sentence-embedding model (config.json, tokenizer.json, model.safetensors)
    #[arg(long, env = "MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// Number of sections in the output
    #[arg(long, default_value = "5")]
    max_sections: usize,

    /// Heading similarity above which a lower-scoring section is dropped
    #[arg(long, default_value = "0.7")]
    dedup_threshold: f64,

    /// Segment documents one at a time
    #[arg(long)]
    sequential: bool,

    /// Load the embedding model, compare two probe sentences and exit
    #[arg(long)]
    check_model: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.check_model {
        let result = cmd_check_model(cli.model_dir.as_deref());
        exit_on_error(result);
        return;
    }

    let (Some(persona), Some(job)) = (cli.persona.as_deref(), cli.job.as_deref()) else {
        println!("{}", "Usage: pdfrank <PERSONA> <JOB>".yellow());
        println!("       pdfrank --help for more information");
        let _ = Cli::command().print_help();
        process::exit(1);
    };

    let mut config = PipelineConfig::new()
        .with_input_dir(&cli.input_dir)
        .with_output_dir(&cli.output_dir)
        .with_max_sections(cli.max_sections)
        .with_dedup_threshold(cli.dedup_threshold)
        .with_parallel(!cli.sequential);
    if let Some(dir) = &cli.model_dir {
        config = config.with_model_dir(dir);
    }

    let result = cmd_rank(persona, job, config);
    exit_on_error(result);
}

fn exit_on_error(result: Result<(), Box<dyn std::error::Error>>) {
    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}

fn cmd_rank(persona: &str, job: &str, config: PipelineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = Pipeline::new(config);
    let query = Query::new(persona, job);

    println!("{} {}", "Persona:".cyan().bold(), persona);
    println!("{} {}", "Job:".cyan().bold(), job);
    println!("{} {}", "Similarity:".cyan().bold(), pipeline.similarity_mode());

    let documents = pipeline.discover()?.len();
    let pb = ProgressBar::new(documents as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = pipeline.run_with_progress(&query, |status| {
        match status {
            DocumentStatus::Processed { document, sections } => {
                pb.set_message(format!("{} ({} sections)", document, sections));
            }
            DocumentStatus::Failed { document, reason } => {
                pb.println(format!("{} {}: {}", "Skipped".yellow(), document, reason));
            }
        }
        pb.inc(1);
    })?;
    pb.finish_with_message("Done!");

    print_report(&report);
    Ok(())
}

fn print_report(report: &RunReport) {
    println!("\n{}", "Summary:".green().bold());
    println!(
        "  {} documents: {} processed, {} failed",
        "├─".dimmed(),
        report.documents_processed,
        report.documents_failed
    );
    println!(
        "  {} sections: {} extracted, {} valid, {} after dedup",
        "├─".dimmed(),
        report.sections_extracted,
        report.sections_valid,
        report.sections_after_dedup
    );
    println!("  {} selected: {}", "├─".dimmed(), report.sections_selected);
    println!("  {} scoring: {}", "├─".dimmed(), report.similarity_mode);
    println!("  {} {}", "└─".dimmed(), report.output_path.display());
}

fn cmd_check_model(model_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let dir = model_dir.ok_or("no model directory given (use --model-dir or MODEL_DIR)")?;

    println!("{} {}", "Loading model from".cyan(), dir.display());
    let embedder = load_embedder(dir)?;
    let similarity = probe_similarity(embedder.as_ref())?;

    println!("  {} {}", "├─".dimmed(), PROBE_SENTENCES[0]);
    println!("  {} {}", "├─".dimmed(), PROBE_SENTENCES[1]);
    println!("  {} cosine similarity: {:.4}", "└─".dimmed(), similarity);
    println!("{} {}", "Model OK:".green().bold(), embedder.name());
    Ok(())
}
