use std::path::PathBuf;

use clap::{Parser, Subcommand};

use authdemo::AppState;
use authdemo::api::create_router;
use authdemo::auth::hash_password;
use authdemo::config::{Demo, Settings};
use authdemo::observability::{init_metrics, init_tracing};

#[derive(Parser)]
#[command(name = "authdemo", about = "Authentication strategy demo services", version)]
struct Cli {
    /// Optional settings file; built-in local defaults apply without it
    #[arg(short, long, env = "AUTHDEMO_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one demo service
    Serve {
        #[arg(value_enum)]
        demo: Demo,

        /// Override listen address
        #[arg(long)]
        listen: Option<String>,
    },

    /// Print an Argon2 hash for use as a user's password_hash
    HashPassword { password: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { demo, listen } => {
            let settings = Settings::load_or_default(cli.config.as_deref())?;
            serve(demo, settings, listen).await
        }
        Commands::HashPassword { password } => {
            println!("{}", hash_password(&password)?);
            Ok(())
        }
    }
}

async fn serve(demo: Demo, settings: Settings, listen: Option<String>) -> anyhow::Result<()> {
    init_tracing(&settings.observability)?;
    init_metrics();

    let listen = listen.unwrap_or_else(|| settings.http.listen.clone());

    tracing::info!(
        demo = %demo,
        lookup = ?settings.auth.lookup,
        users = settings.users.len(),
        "starting authdemo"
    );
    if demo == Demo::Bearer {
        tracing::warn!("bearer demo decodes tokens without verifying their signature");
    }

    let state = AppState::new(demo, settings)?;
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    tracing::info!(listen = %listen, "HTTP server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
