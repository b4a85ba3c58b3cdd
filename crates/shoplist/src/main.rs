use std::{process::ExitCode, sync::Arc};

use shoplist_core::{config::Config, persistence::JsonFileGateway, service::ShoppingService};

fn main() -> ExitCode {
    if let Err(e) = shoplist_core::logging::init("shoplist") {
        eprintln!("{e}");
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(error = %e, "failed to start tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    let code = match rt.block_on(run()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "shoplist failed");
            ExitCode::FAILURE
        }
    };

    // The stdin reader thread blocks until the next newline; do not wait for it.
    rt.shutdown_background();
    code
}

async fn run() -> Result<(), shoplist_core::Error> {
    let cfg = Arc::new(Config::load()?);

    // Restore must finish before the first command is read.
    let gateway = Arc::new(JsonFileGateway::new(cfg.state_file.clone()));
    let service = Arc::new(ShoppingService::bootstrap(gateway)?);

    shoplist_console::router::run(cfg, service)
        .await
        .map_err(|e| shoplist_core::Error::External(format!("console failed: {e}")))?;
    Ok(())
}
