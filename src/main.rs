use anyhow::Context;
use clap::Parser;
use fieldmatch::{
    build_provider, ApiFormat, AppConfig, Device, MatchRequest, Overrides, ProviderKind,
    Recommender, StrategyKind,
};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Recommend which API methods can populate which schema fields
#[derive(Parser, Debug)]
#[command(name = "fieldmatch", version)]
#[command(about = "Match schema fields to API methods by embedding similarity", long_about = None)]
struct Args {
    /// Input JSON with fieldDescriptions and apiMethods (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to write the recommendations (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON config file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scoring strategy: cosine or projected
    #[arg(long)]
    strategy: Option<StrategyKind>,

    /// Minimum score for a recommendation
    #[arg(long, allow_negative_numbers = true)]
    threshold: Option<f64>,

    /// Best APIs considered per field
    #[arg(long)]
    top_k: Option<usize>,

    /// Seed for the projected strategy's fixed weights
    #[arg(long)]
    seed: Option<u64>,

    /// Embedding provider: hashing or http
    #[arg(long)]
    provider: Option<ProviderKind>,

    /// Embedding model identifier
    #[arg(long)]
    model: Option<String>,

    /// Embedding service URL for the http provider
    #[arg(long)]
    endpoint: Option<String>,

    /// Request format of the embedding service: openai, huggingface or custom
    #[arg(long)]
    format: Option<ApiFormat>,

    /// Compute device: cpu, accelerator or auto
    #[arg(long)]
    device: Option<Device>,

    /// Output dimension of the hashing embedder
    #[arg(long)]
    dimension: Option<usize>,

    /// Log level, used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            strategy: self.strategy,
            threshold: self.threshold,
            top_k: self.top_k,
            seed: self.seed,
            provider: self.provider,
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
            format: self.format,
            device: self.device,
            dimension: self.dimension,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    info!("Starting fieldmatch v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => AppConfig::from_path(path)?,
        None => AppConfig::default(),
    };
    config.apply(&args.overrides())?;

    let request = read_request(args.input.as_ref())?;
    let provider = build_provider(&config.embedder)?;
    let recommender = Recommender::new(provider, config.recommender)?;
    let recommendations = recommender.recommend(&request)?;

    // Nothing reaches the output until the whole pipeline has succeeded
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            recommendations.write_json(&mut writer)?;
            writer.flush()?;
            info!("Recommendations written to {:?}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            recommendations.write_json(&mut writer)?;
            writer.flush()?;
        }
    }

    Ok(())
}

fn read_request(input: Option<&PathBuf>) -> anyhow::Result<MatchRequest> {
    let request = match input {
        Some(path) => MatchRequest::from_path(path)?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read input from stdin")?;
            MatchRequest::from_json(&text)?
        }
    };
    Ok(request)
}
