mod args;

use std::sync::Arc;

use clap::Parser;

use sky_server::service::EmployeeService;
use sky_server::state::AppState;
use sky_server::store::{EmployeeStore, MemoryEmployeeStore, PgEmployeeStore};

use crate::args::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let _telemetry = sky_common::telemetry::init_tracing(
        "sky-server",
        args.otlp_endpoint.as_deref(),
        args.otlp_token.as_deref(),
        &args.log_format,
    );

    let store: Arc<dyn EmployeeStore> = match args.database_url.as_deref() {
        Some(url) => {
            let pg = PgEmployeeStore::connect(url, args.db_max_connections).await?;
            pg.migrate().await?;
            tracing::info!("employee store: postgres");
            Arc::new(pg)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, employees are kept in memory");
            Arc::new(MemoryEmployeeStore::new())
        }
    };

    let employees = Arc::new(EmployeeService::new(store));
    if args.seed_admin && employees.ensure_admin().await? {
        tracing::info!("created default admin account");
    }

    let st = AppState {
        employees,
        jwt: Arc::new(args.jwt_properties()),
    };
    let app = sky_server::build_app(st);

    let listener = tokio::net::TcpListener::bind(&args.listen_addr).await?;
    tracing::info!(addr = %args.listen_addr, "sky-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
