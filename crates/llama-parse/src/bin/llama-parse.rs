//! llama-parse command line interface
//!
//! Run with: cargo run -p llama-parse -- parse document.pdf

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use llama_parse::credentials::validate_api_key;
use llama_parse::{
    ClientConfig, ConfigFileCredentials, JobContent, JobResult, OutputFormat, ParseClient,
    ParseOptions, TargetPages,
};

#[derive(Parser)]
#[command(name = "llama-parse", version, about = "A CLI for parsing documents with llama parse")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Authenticate with llama parse
    Auth,
    /// Parse documents with llama parse
    Parse(ParseArgs),
}

#[derive(clap::Args)]
#[command(after_help = "Boolean flags are sent to the service only when passed. \
An omitted flag is left out of the upload rather than sent as false, so the \
service applies its own default.")]
struct ParseArgs {
    /// The file path to parse
    file: PathBuf,

    /// The format of the output
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,

    /// The output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// The language of the document
    #[arg(long)]
    ocr_language: Option<String>,

    /// The parsing instructions
    #[arg(long)]
    parsing_instructions: Option<String>,

    /// The page separator
    #[arg(long)]
    page_separator: Option<String>,

    /// Skip diagonal text
    #[arg(long)]
    skip_diagonal_text: bool,

    /// Invalidate cache
    #[arg(long)]
    invalidate_cache: bool,

    /// Do not cache
    #[arg(long)]
    do_not_cache: bool,

    /// Do not unroll columns
    #[arg(long)]
    do_not_unroll_columns: bool,

    /// Fast mode
    #[arg(long)]
    fast_mode: bool,

    /// Use GPT-4o
    #[arg(long = "gpt-4o")]
    gpt4o: bool,

    /// The target pages, as a comma separated list of page numbers.
    /// The first page of the document is page 0
    #[arg(long, value_parser = parse_target_pages)]
    target_pages: Option<TargetPages>,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,
}

impl ParseArgs {
    /// Upload options for this invocation
    ///
    /// A boolean flag becomes `Some(true)` when passed and `None` otherwise; it is
    /// never sent as `false`.
    fn options(&self) -> ParseOptions {
        let flag = |set: bool| set.then_some(true);

        ParseOptions {
            output_format: self.format,
            language: self.ocr_language.clone(),
            parsing_instruction: self.parsing_instructions.clone(),
            page_separator: self.page_separator.clone(),
            skip_diagonal_text: flag(self.skip_diagonal_text),
            invalidate_cache: flag(self.invalidate_cache),
            do_not_cache: flag(self.do_not_cache),
            do_not_unroll_columns: flag(self.do_not_unroll_columns),
            fast_mode: flag(self.fast_mode),
            gpt4o_mode: flag(self.gpt4o),
            target_pages: self.target_pages.clone(),
        }
    }
}

fn parse_target_pages(raw: &str) -> Result<TargetPages, String> {
    raw.parse().map_err(|e: llama_parse::Error| e.to_string())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "llama_parse=debug" } else { "llama_parse=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Auth => {
            init_tracing(false);
            run_auth()
        }
        Command::Parse(args) => {
            init_tracing(args.verbose);
            run_parse(args).await
        }
    };

    if let Err(e) = outcome {
        eprintln!("{} {:#}", style("Error:").red(), e);
        std::process::exit(1);
    }
}

fn run_auth() -> anyhow::Result<()> {
    let term = Term::stderr();

    let api_key = loop {
        term.write_str("Enter your API key: ")?;
        let input = term.read_secure_line()?;
        let input = input.trim().to_string();
        match validate_api_key(&input) {
            Ok(()) => break input,
            Err(message) => term.write_line(&style(message).red().to_string())?,
        }
    };

    let store = ConfigFileCredentials::from_home()?;
    store
        .save(&api_key)
        .with_context(|| format!("Failed to save API key to {}", store.path().display()))?;

    println!("API key saved successfully.");
    Ok(())
}

async fn run_parse(args: ParseArgs) -> anyhow::Result<()> {
    if !args.file.is_file() {
        anyhow::bail!("{}", style("File does not exist").red());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.set_message("Parsing document...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    match parse_document(&args, &spinner).await {
        Ok(result) => {
            let rendered = render_content(&result, args.format)?;
            match args.output {
                Some(ref output) => {
                    tokio::fs::write(output, rendered)
                        .await
                        .with_context(|| format!("Failed to write {}", output.display()))?;
                    spinner.finish_with_message(
                        style(format!("Output saved to {}", output.display()))
                            .green()
                            .to_string(),
                    );
                }
                None => {
                    spinner.finish_with_message("Parsing complete");
                    println!("{}", style("\nParsed content:\n").cyan());
                    println!("{}", rendered);
                }
            }
            Ok(())
        }
        Err(e) => {
            spinner.abandon_with_message(style("Parsing failed").red().to_string());
            Err(e)
        }
    }
}

async fn parse_document(args: &ParseArgs, spinner: &ProgressBar) -> anyhow::Result<JobResult> {
    let options = args.options();
    let credentials = ConfigFileCredentials::from_home()?;
    let client = ParseClient::from_credentials(&credentials, ClientConfig::default())?;

    if args.verbose {
        spinner.println("Sending request to llama parse API...");
    }

    let progress = spinner.clone();
    let on_progress = move |percent: f64| {
        progress.set_message(format!("Parsing document... {:.2}%", percent));
    };

    let result = client.parse(&args.file, &options, Some(&on_progress)).await?;

    tracing::debug!(
        "Used {:?} credits ({:?} pages, cache hit: {:?})",
        result.job_metadata.job_credits_usage(),
        result.job_metadata.job_pages(),
        result.job_metadata.job_is_cache_hit()
    );

    Ok(result)
}

/// JSON output is pretty-printed, text formats are written as-is
fn render_content(result: &JobResult, format: OutputFormat) -> anyhow::Result<String> {
    match (&result.content, format) {
        (content, OutputFormat::Json) => Ok(serde_json::to_string_pretty(content)?),
        (JobContent::Text(text), _) => Ok(text.clone()),
        (pages @ JobContent::Pages(_), _) => Ok(serde_json::to_string_pretty(pages)?),
    }
}
