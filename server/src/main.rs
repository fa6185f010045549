use anyhow::Result;
use axum::Router;
use clap::{Parser, ValueEnum};
use search_core::{ParseMode, DEFAULT_INDEX_FILE};
use server::{build_app, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Markup,
    Plain,
}

#[derive(Parser)]
struct Args {
    /// Index file path
    #[arg(long, default_value = DEFAULT_INDEX_FILE)]
    index: PathBuf,
    /// Document directory rebuilt by POST /index
    #[arg(long, default_value = "files")]
    root: PathBuf,
    /// How documents are parsed on rebuild
    #[arg(long, value_enum, default_value_t = Mode::Markup)]
    mode: Mode,
    /// Directory of static assets (index.html, css, js)
    #[arg(long, default_value = "public")]
    static_dir: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = ServerConfig {
        index_path: args.index,
        root: args.root,
        mode: match args.mode {
            Mode::Markup => ParseMode::Markup,
            Mode::Plain => ParseMode::Plain,
        },
        static_dir: args.static_dir,
        admin_token: std::env::var("ADMIN_TOKEN").ok(),
    };
    let app: Router = build_app(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
