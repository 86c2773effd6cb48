use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Office correspondence register server.
#[derive(Parser)]
#[command(name = "docket-server")]
struct Cli {
    /// Address to bind
    #[arg(long, env = "DOCKET_BIND", default_value = "0.0.0.0")]
    bind: String,

    /// Port to listen on
    #[arg(long, env = "DOCKET_PORT", default_value_t = 4810)]
    port: u16,

    /// SQLite database file (defaults to the user data directory)
    #[arg(long, env = "DOCKET_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Root directory for uploaded attachment files
    #[arg(long, env = "DOCKET_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Maximum accepted upload size in bytes
    #[arg(
        long,
        env = "DOCKET_MAX_UPLOAD_BYTES",
        default_value_t = docket_files::DEFAULT_MAX_UPLOAD_BYTES
    )]
    max_upload_bytes: usize,

    /// Accepted upload file extensions (comma-separated)
    #[arg(
        long,
        env = "DOCKET_ALLOWED_EXTENSIONS",
        value_delimiter = ',',
        default_value = "pdf,doc,docx,xls,xlsx,txt"
    )]
    allowed_extensions: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let db = match &cli.db_path {
        Some(path) => docket_db::Db::open(path)?,
        None => docket_db::Db::open_default()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(docket_db::data_dir);
    let store = Arc::new(docket_files::LocalStore::new(data_dir));
    let upload_policy = docket_files::UploadPolicy {
        max_bytes: cli.max_upload_bytes,
        allowed_extensions: cli.allowed_extensions,
    };

    let addr = SocketAddr::new(cli.bind.parse()?, cli.port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "docket-server listening");

    docket_server::serve(listener, db, store, upload_policy).await
}
