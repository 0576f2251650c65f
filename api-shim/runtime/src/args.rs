use crate::config::Config;
use anyhow::{Context, Result};
use cf_api_shim_http::{router, ApiState};
use cf_api_shim_k8s_repositories::KubeClientFactory;
use clap::Parser;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing::info;

#[derive(Debug, Parser)]
#[clap(name = "cf-api-shim", about = "Serves the v3 platform API over cluster resources")]
pub struct Args {
    #[clap(
        long,
        default_value = "cf_api_shim=info,warn",
        env = "CF_API_SHIM_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    #[clap(flatten)]
    client: kubert::ClientArgs,

    /// Directory of YAML configuration files.
    #[clap(long, env = "CONFIG")]
    config_dir: PathBuf,
}

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            client,
            config_dir,
        } = self;

        log_format.try_init(log_level)?;

        let config = Config::load(&config_dir)
            .with_context(|| format!("loading configuration from {}", config_dir.display()))?;

        let client = client
            .try_client()
            .await
            .context("building cluster client")?;
        let factory = KubeClientFactory::new(client);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
        let state = ApiState::new(Arc::new(factory), config.handler_config());

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        info!(%addr, root_namespace = %config.root_namespace, "Serving API");

        axum::serve(listener, router(state))
            .with_graceful_shutdown(shutdown())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

/// Completes on SIGINT or SIGTERM. In-flight requests drain after this
/// resolves; dropped connections cancel their requests.
async fn shutdown() {
    let interrupt = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(%error, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {}
        _ = terminate => {}
    }
    info!("Shutting down");
}
