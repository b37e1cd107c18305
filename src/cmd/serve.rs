//! Dashboard server command — `jobboard serve`.

use anyhow::Result;

use jobboard::config::BoardConfig;
use jobboard::server::{ServerConfig, start_server};

pub async fn cmd_serve(
    config: &BoardConfig,
    port: Option<u16>,
    open: bool,
    dev: bool,
) -> Result<()> {
    let server = ServerConfig {
        host: config.toml.server.host.clone(),
        port: port.unwrap_or(config.toml.server.port),
        data_file: config.data_file(),
        id_strategy: config.id_strategy(),
        dev_mode: dev,
    };

    // Spawn browser open before starting the server (which blocks)
    if open {
        let url = format!("http://localhost:{}/api/board", server.port);
        tokio::spawn(async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
            if let Err(e) = open::that(&url) {
                tracing::warn!(error = %e, url = %url, "failed to open browser");
            }
        });
    }

    start_server(server).await
}
