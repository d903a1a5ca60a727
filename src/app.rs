use crate::config::Config;
use crate::leagues::Leagues;
use crate::state::AppState;
use crate::utils::fmt_duration;
use crate::web::create_router;
use anyhow::Context;
use std::net::SocketAddr;
use std::process::ExitCode;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

/// Main application struct containing all necessary components
pub struct App {
    config: Config,
    app_state: AppState,
}

impl App {
    /// Connect storage, pick the standings source and load the league table.
    pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
        let storage = crate::storage::connect(&config)
            .await
            .context("Failed to initialize standings storage")?;
        let source = crate::source::from_config(&config)
            .context("Failed to initialize standings source")?;

        let leagues =
            Leagues::from_config(&config.leagues).context("Invalid league configuration")?;
        if leagues.is_empty() {
            warn!("no leagues configured; every standings request will be rejected");
        }
        info!(
            leagues = leagues.len(),
            storage_mode = %storage.mode(),
            source = source.name(),
            "application initialized"
        );

        Ok(App {
            app_state: AppState::new(storage, source, leagues),
            config,
        })
    }

    /// Serve HTTP until SIGINT/SIGTERM, then drain within `shutdown_timeout`.
    pub async fn run(self) -> ExitCode {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!(error = ?e, %addr, "failed to bind web server");
                return ExitCode::FAILURE;
            }
        };
        info!(%addr, "web server listening");

        let (drain_tx, drain_rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, create_router(self.app_state)).with_graceful_shutdown(
            async move {
                shutdown_signal().await;
                let _ = drain_tx.send(());
            },
        );
        let mut server = tokio::spawn(async move { server.await });

        let shutdown_timeout = self.config.shutdown_timeout;
        tokio::select! {
            result = &mut server => return exit_code(result),
            _ = drain_rx => {
                info!(timeout = fmt_duration(shutdown_timeout), "draining in-flight requests");
            }
        }

        match tokio::time::timeout(shutdown_timeout, &mut server).await {
            Ok(result) => {
                let code = exit_code(result);
                info!("web server stopped");
                code
            }
            Err(_) => {
                warn!(timeout = fmt_duration(shutdown_timeout), "graceful shutdown timed out");
                server.abort();
                ExitCode::FAILURE
            }
        }
    }
}

fn exit_code(result: Result<std::io::Result<()>, tokio::task::JoinError>) -> ExitCode {
    match result {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(e)) => {
            error!(error = ?e, "web server failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = ?e, "web server task panicked");
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = ?e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = ?e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
