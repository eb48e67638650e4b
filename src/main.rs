use clap::{Parser, Subcommand};
use std::path::PathBuf;
use topical::{config, serve, site, source, store::TopicStore};

#[derive(Parser)]
#[command(name = "topical")]
#[command(about = "Topic browser: live server and single-file static site")]
#[command(long_about = "\
Topic browser: live server and single-file static site

One source document of topics (title + HTML content + optional category
path) drives both delivery modes. Accepted source shapes:

  [{\"title\": \"...\", \"content\": \"<p>...</p>\", \"path\": [\"Group\", \"Category\"]}]
  {\"title\": \"...\", \"content\": \"...\"}
  {\"type\": \"document\", \"children\": [{\"title\": \"Section\", \"children\": [...]}]}

The format is detected from the file extension (.yaml/.yml → YAML,
otherwise JSON) unless forced with --format. Sources starting with
http:// or https:// are fetched once at startup.

Run 'topical gen-config' to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Topic source: a local file or an http(s) URL
    #[arg(long, default_value = "topics.json", global = true)]
    source: String,

    /// Force the source format instead of detecting it by extension
    #[arg(long, value_enum, global = true)]
    format: Option<source::SourceFormat>,

    /// Path to config.toml (default: ./config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Flattening depth for document-tree sources (default: deepest level)
    #[arg(long, global = true)]
    depth: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the topics over HTTP
    Serve {
        /// Interface to bind
        #[arg(long, default_value = "127.0.0.1")]
        interface: String,
        /// Port to bind (auto-incremented when in use)
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Generate the single-file static site
    Build {
        /// Output file
        #[arg(long, default_value = "site.html")]
        output: PathBuf,
    },
    /// Load and validate the source without serving or building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topical=info")),
        )
        .init();

    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::load_config(cli.config.as_deref())?;

    match &cli.command {
        Command::Serve { interface, port } => {
            let store = load_store(&cli)?;
            report_skipped(&store);
            serve::serve(&store, &config, interface, *port)?;
        }
        Command::Build { output } => {
            println!("==> Loading {}", cli.source);
            let store = load_store(&cli)?;
            report_skipped(&store);
            println!("==> Generating {}", output.display());
            site::generate(&store, &config, output)?;
        }
        Command::Check => {
            println!("==> Checking {}", cli.source);
            let store = load_store(&cli)?;
            println!(
                "{} topics loaded, {} entries skipped",
                store.len(),
                store.skipped()
            );
            println!("==> Source is valid");
        }
        Command::GenConfig => unreachable!(),
    }

    Ok(())
}

/// Fetch, parse, classify, and validate the topic source.
fn load_store(cli: &Cli) -> Result<TopicStore, source::LoadError> {
    let shape = source::load(&cli.source, cli.format)?;
    Ok(TopicStore::load(shape, cli.depth))
}

fn report_skipped(store: &TopicStore) {
    if store.skipped() > 0 {
        tracing::warn!(
            skipped = store.skipped(),
            "entries dropped during validation"
        );
    }
}
