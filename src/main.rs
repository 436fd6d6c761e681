#![forbid(unsafe_code)]
#![warn(
    clippy::unused_async,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions, clippy::doc_markdown)]

use flight_schedules::{AppError, S, db_postgres, parse_env::AppEnv};
use tracing_subscriber::{fmt, prelude::__tracing_subscriber_SubscriberExt};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn setup_tracing(app_env: &AppEnv) -> Result<(), AppError> {
    let logfile = tracing_appender::rolling::never(&app_env.location_logs, "flight_schedules.log");

    let log_fmt = fmt::Layer::default()
        .json()
        .flatten_event(true)
        .with_writer(logfile);

    match tracing::subscriber::set_global_default(
        fmt::Subscriber::builder()
            .with_file(true)
            .with_line_number(true)
            .with_max_level(app_env.log_level)
            .finish()
            .with(log_fmt),
    ) {
        Ok(()) => Ok(()),
        Err(e) => {
            println!("{e:?}");
            Err(AppError::Internal(S!("Unable to start tracing")))
        }
    }
}

/// Create the schema if missing, then report what the tables hold
async fn run(app_env: &AppEnv) -> Result<(), AppError> {
    let postgres = db_postgres::db_pool(app_env).await?;
    db_postgres::migrations(&postgres).await?;
    let mut conn = postgres.acquire().await?;
    db_postgres::log_row_counts(&mut conn).await?;
    drop(conn);
    postgres.close().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let app_env = AppEnv::get_env();
    setup_tracing(&app_env)?;
    if let Err(e) = run(&app_env).await {
        e.log();
        return Err(e);
    }
    Ok(())
}
