use async_trait::async_trait;
use sqlx::{
    ConnectOptions, FromRow, PgConnection, PgPool,
    postgres::{PgPoolOptions, PgRow},
};
use std::{fmt, time::Duration};
use tracing::{debug, info};

mod migrations;
mod model_airplane;
mod model_airport;
mod model_booking;
mod model_flight;

pub use migrations::migrations;
pub use model_airplane::{ModelAirplane, NewAirplane, SeatClasses};
pub use model_airport::{ModelAirport, NewAirport};
pub use model_booking::{ModelBooking, NewBooking};
pub use model_flight::{FLIGHT_STATUS_UPCOMING, ModelFlight, NewFlight};

use crate::{app_error::AppError, parse_env::AppEnv};

/// The tables this crate owns, used to build the shared record queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Airplane,
    Airport,
    Booking,
    Flight,
}

impl Table {
    pub const fn id_column(self) -> &'static str {
        match self {
            Self::Airplane => "airplane_id",
            Self::Airport => "airport_id",
            Self::Booking => "booking_id",
            Self::Flight => "flight_id",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let disp = match self {
            Self::Airplane => "airplane",
            Self::Airport => "airport",
            Self::Booking => "booking",
            Self::Flight => "flight_schedule",
        };
        write!(f, "{disp}")
    }
}

/// Operations common to every persisted row, keyed on the table's identity column
#[async_trait]
pub trait Model: for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin + Sized {
    const TABLE: Table;

    fn id(&self) -> i64;

    /// Write the current field values back to the row, error if the row no longer exists
    async fn update(&self, conn: &mut PgConnection) -> Result<(), AppError>;

    async fn get(conn: &mut PgConnection, id: i64) -> Result<Option<Self>, AppError> {
        let query = format!(
            "SELECT * FROM {} WHERE {} = $1",
            Self::TABLE,
            Self::TABLE.id_column()
        );
        Ok(sqlx::query_as::<_, Self>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await?)
    }

    /// All rows, oldest first
    async fn get_all(conn: &mut PgConnection) -> Result<Vec<Self>, AppError> {
        let query = format!(
            "SELECT * FROM {} ORDER BY {}",
            Self::TABLE,
            Self::TABLE.id_column()
        );
        Ok(sqlx::query_as::<_, Self>(&query).fetch_all(conn).await?)
    }

    async fn count(conn: &mut PgConnection) -> Result<i64, AppError> {
        let query = format!("SELECT COUNT(*) FROM {}", Self::TABLE);
        Ok(sqlx::query_scalar::<_, i64>(&query).fetch_one(conn).await?)
    }

    /// Delete the row, dependent rows are removed by the ON DELETE CASCADE foreign keys
    async fn delete(&self, conn: &mut PgConnection) -> Result<bool, AppError> {
        let query = format!(
            "DELETE FROM {} WHERE {} = $1",
            Self::TABLE,
            Self::TABLE.id_column()
        );
        let deleted = sqlx::query(&query)
            .bind(self.id())
            .execute(conn)
            .await?
            .rows_affected()
            == 1;
        if deleted {
            debug!(table = %Self::TABLE, id = self.id(), "deleted");
        } else {
            debug!(table = %Self::TABLE, id = self.id(), "nothing to delete");
        }
        Ok(deleted)
    }
}

pub async fn db_pool(app_env: &AppEnv) -> Result<PgPool, AppError> {
    let mut options = sqlx::postgres::PgConnectOptions::new()
        .host(&app_env.pg_host)
        .port(app_env.pg_port)
        .database(&app_env.pg_database)
        .username(&app_env.pg_user)
        .password(&app_env.pg_pass);

    match app_env.log_level {
        tracing::Level::TRACE | tracing::Level::DEBUG => (),
        _ => options = options.disable_statement_logging(),
    }

    let acquire_timeout = Duration::from_secs(5);
    let idle_timeout = Duration::from_secs(30);

    Ok(PgPoolOptions::new()
        .max_connections(20)
        .idle_timeout(idle_timeout)
        .acquire_timeout(acquire_timeout)
        .connect_with(options)
        .await?)
}

/// Log how many rows each table holds
pub async fn log_row_counts(conn: &mut PgConnection) -> Result<(), AppError> {
    let airports = ModelAirport::count(&mut *conn).await?;
    let airplanes = ModelAirplane::count(&mut *conn).await?;
    let flights = ModelFlight::count(&mut *conn).await?;
    let bookings = ModelBooking::count(&mut *conn).await?;
    info!(airports, airplanes, flights, bookings, "row counts");
    Ok(())
}
