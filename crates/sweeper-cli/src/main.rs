use std::process::ExitCode;

use sweeper_core::app::Driver;
use sweeper_core::config::{StorageSettings, SweepConfig};
use sweeper_core::domain::ConnectionStore;
use sweeper_core::impls::S3Connector;
use sweeper_core::logging::init_logging;
use sweeper_core::ports::SystemClock;

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    // (A) connections.json を読む。読めなければストレージに触らず終了
    let connections = match ConnectionStore::discover() {
        Ok(connections) => connections,
        Err(e) => {
            tracing::error!(error = %e, "cannot load connections");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        total = connections.all().len(),
        active = connections.active().count(),
        "connections loaded"
    );

    // (B) 1 回分の cleanup pass。sweep の失敗はログだけで、終了コードは 0
    let driver = Driver::new(
        S3Connector::new(StorageSettings::default()),
        SystemClock,
        SweepConfig::default(),
    );
    match driver.run(&connections).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "cleanup aborted");
            ExitCode::FAILURE
        }
    }
}
