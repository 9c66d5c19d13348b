use anyhow::Result;
use tracing::info;
use votereport::{config::Config, init_logging, server::start_server};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    init_logging();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) configure ────────────────────────────────────────────────
    let config = Config::load()?;
    info!(
        host = %config.host,
        port = config.port,
        url = %config.sheet_url,
        "configuration loaded"
    );

    // ─── 3) serve until signalled ────────────────────────────────────
    start_server(config).await?;

    info!("all done");
    Ok(())
}
