use std::{path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use occupation_similarity::{
    logging::init_tracing, pipeline, tagging::DEFAULT_AI_KEYWORDS, DisplayOptions, PipelineConfig,
    ServiceConfig, SimilarityService, TfWeighting,
};
use tracing::error;

#[derive(Parser, Debug)]
#[command(
    name = "occupation-similarity",
    about = "Build and query the occupation skill transferability matrix"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the similarity matrix from a raw occupation/skill CSV
    Build(BuildArgs),
    /// Print the occupations most similar to one occupation
    Similar(SimilarArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Raw CSV with occupation and skill columns.
    #[arg(long, env = "OCCSIM_INPUT")]
    input: PathBuf,

    /// Matrix output path (`.cbor` writes a binary snapshot, anything else CSV).
    #[arg(long, env = "OCCSIM_OUTPUT", default_value = "data/occupation_similarity_matrix.csv")]
    output: PathBuf,

    /// Optional path for the AI-tagged copy of the input.
    #[arg(long, env = "OCCSIM_TAGGED_OUTPUT")]
    tagged: Option<PathBuf>,

    /// Shortest token kept by the tokenizer.
    #[arg(long, default_value_t = 2)]
    min_token_len: usize,

    /// Token to ignore (repeatable).
    #[arg(long = "stopword")]
    stopwords: Vec<String>,

    /// AI keyword for tagging (repeatable, replaces the defaults).
    #[arg(long = "ai-keyword")]
    ai_keywords: Vec<String>,

    /// Use 1 + ln(count) term frequency.
    #[arg(long, default_value_t = false)]
    sublinear_tf: bool,

    /// Compute matrix rows on the current thread only.
    #[arg(long, default_value_t = false)]
    sequential: bool,
}

#[derive(Args, Debug)]
struct SimilarArgs {
    /// Occupation to look up (case and surrounding spaces are ignored).
    occupation: String,

    /// Persisted matrix (CSV or `.cbor`).
    #[arg(long, env = "OCCSIM_MATRIX", default_value = "data/occupation_similarity_matrix.csv")]
    matrix: PathBuf,

    /// Number of occupations to print.
    #[arg(long, default_value_t = 10)]
    top_n: usize,

    /// Leave the queried occupation out of its own ranking.
    #[arg(long, default_value_t = false)]
    exclude_self: bool,
}

impl From<BuildArgs> for PipelineConfig {
    fn from(args: BuildArgs) -> Self {
        let ai_keywords = if args.ai_keywords.is_empty() {
            DEFAULT_AI_KEYWORDS.iter().map(|k| k.to_string()).collect()
        } else {
            args.ai_keywords
        };
        Self {
            input: args.input,
            output: args.output,
            tagged_output: args.tagged,
            min_token_len: args.min_token_len,
            stopwords: args.stopwords,
            tf_weighting: if args.sublinear_tf { TfWeighting::Sublinear } else { TfWeighting::Raw },
            ai_keywords,
            parallel: !args.sequential,
            ..Default::default()
        }
    }
}

fn similar(args: SimilarArgs) -> occupation_similarity::Result<()> {
    let service = SimilarityService::new(ServiceConfig { matrix_path: args.matrix });
    let options = DisplayOptions {
        top_n: args.top_n,
        include_self: !args.exclude_self,
        ..Default::default()
    };
    for hit in service.similar(&args.occupation, &options)? {
        println!("{:.6}\t{}", hit.score, hit.label);
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Build(args) => pipeline::run(&PipelineConfig::from(args)).map(|_| ()),
        Command::Similar(args) => similar(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "aborted");
            ExitCode::FAILURE
        }
    }
}
