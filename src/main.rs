use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use draftdesk::config::ServerConfig;
use draftdesk::server::{AppState, ROUTE_TABLE, create_router};
use draftdesk::store::{SqliteStore, Store};

#[derive(Parser)]
#[command(name = "draftdesk")]
#[command(about = "Documents, drafts and draft comments over HTTP", long_about = None)]
struct Cli {
    /// TOML config file; flags given on the command line take precedence
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and database schema
    Init {
        /// Data directory for the database
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, short)]
        port: Option<u16>,

        /// Data directory for the database
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// User id recorded as the author of new comments
        #[arg(long)]
        default_user_id: Option<i64>,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => Ok(ServerConfig::from_file(path)?),
        None => Ok(ServerConfig::default()),
    }
}

/// Opens the database and makes sure every table exists.
fn open_store(config: &ServerConfig) -> anyhow::Result<SqliteStore> {
    fs::create_dir_all(&config.data_dir)?;

    let db_path = config.db_path();
    let store = SqliteStore::new(&db_path).and_then(|store| {
        store.initialize()?;
        Ok(store)
    });

    store.map_err(|e| {
        error!("Failed to initialize database {}: {e}", db_path.display());
        e.into()
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("draftdesk=info".parse()?))
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Init { data_dir } => {
            if let Some(data_dir) = data_dir {
                config.data_dir = data_dir;
            }

            open_store(&config)?;
            println!("Database ready at {}", config.db_path().display());
        }
        Commands::Serve {
            host,
            port,
            data_dir,
            default_user_id,
        } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(data_dir) = data_dir {
                config.data_dir = data_dir;
            }
            if let Some(user_id) = default_user_id {
                config.default_user_id = user_id;
            }

            let store = Arc::new(open_store(&config)?);
            info!("Using database {}", config.db_path().display());

            let state = Arc::new(AppState::new(store.clone(), config.default_user_id));
            let app = create_router(state);

            for (method, path) in ROUTE_TABLE {
                info!("route {method} {path}");
            }

            let addr = config.socket_addr()?;
            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            store.close()?;
        }
    }

    Ok(())
}
