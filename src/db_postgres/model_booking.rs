use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use tracing::debug;

use super::{Model, ModelFlight, Table};
use crate::app_error::AppError;

/// Only the link to the owning flight, booking details live elsewhere
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewBooking {
    pub flight_id: i64,
}

impl NewBooking {
    pub const fn new(flight_id: i64) -> Self {
        Self { flight_id }
    }

    pub async fn insert(&self, conn: &mut PgConnection) -> Result<ModelBooking, AppError> {
        let query = "INSERT INTO booking(flight_id) VALUES ($1) RETURNING booking_id, flight_id";
        let booking = sqlx::query_as::<_, ModelBooking>(query)
            .bind(self.flight_id)
            .fetch_one(conn)
            .await?;
        debug!(
            booking_id = booking.booking_id,
            flight_id = booking.flight_id,
            "booking inserted"
        );
        Ok(booking)
    }
}

#[derive(sqlx::FromRow, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelBooking {
    pub booking_id: i64,
    pub flight_id: i64,
}

#[async_trait]
impl Model for ModelBooking {
    const TABLE: Table = Table::Booking;

    fn id(&self) -> i64 {
        self.booking_id
    }

    async fn update(&self, conn: &mut PgConnection) -> Result<(), AppError> {
        let query = "UPDATE booking SET flight_id = $1 WHERE booking_id = $2";
        let result = sqlx::query(query)
            .bind(self.flight_id)
            .bind(self.booking_id)
            .execute(conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::UnknownInDb(Self::TABLE));
        }
        Ok(())
    }
}

impl ModelBooking {
    pub async fn flight(&self, conn: &mut PgConnection) -> Result<ModelFlight, AppError> {
        ModelFlight::get(conn, self.flight_id)
            .await?
            .ok_or(AppError::UnknownInDb(Table::Flight))
    }
}
