//! Entry point for the status change notify worker.

use core_config::tracing::install_color_eyre;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Error report hooks go in before anything can fail
    install_color_eyre();

    taskboard_notify_worker::run().await
}
