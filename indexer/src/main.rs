use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use search_core::{IndexStore, ParseMode, SearchEngine, DEFAULT_INDEX_FILE};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and query a TF-IDF document index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Strip <...> tags before tokenizing
    Markup,
    /// Tokenize file contents as-is
    Plain,
}

impl From<Mode> for ParseMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Markup => ParseMode::Markup,
            Mode::Plain => ParseMode::Plain,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the index from every file under a directory
    Build {
        /// Directory to index recursively
        #[arg(long, default_value = "files")]
        root: String,
        /// Index file to write
        #[arg(long, default_value = DEFAULT_INDEX_FILE)]
        index: String,
        /// How file contents are turned into text
        #[arg(long, value_enum, default_value_t = Mode::Markup)]
        mode: Mode,
    },
    /// Rank indexed documents against a query
    Search {
        /// Free-text query
        #[arg(long)]
        query: String,
        /// Index file to read
        #[arg(long, default_value = DEFAULT_INDEX_FILE)]
        index: String,
        /// Number of results to print
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { root, index, mode } => {
            let engine = SearchEngine::new(IndexStore::new(&index), mode.into());
            let report = engine.index(&root)?;
            tracing::info!(
                num_docs = report.num_docs,
                unreadable_docs = report.unreadable_docs,
                skipped_docs = report.skipped_docs,
                num_terms = report.num_terms,
                index = %report.index_path.display(),
                "build finished"
            );
            Ok(())
        }
        Commands::Search { query, index, limit } => {
            let engine = SearchEngine::new(IndexStore::new(&index), ParseMode::default());
            let hits = engine.search_top(&query, limit);
            tracing::debug!(query = %query, hits = hits.len(), "search finished");
            for (rank, hit) in hits.iter().enumerate() {
                println!("{:>3}. {:.6} {}", rank + 1, hit.score, hit.doc);
            }
            Ok(())
        }
    }
}
