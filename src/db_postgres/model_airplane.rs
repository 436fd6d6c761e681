use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use std::fmt;
use tracing::debug;

use super::{Model, ModelFlight, Table};
use crate::app_error::AppError;

/// Per class counts as they arrive from outside, the total is always recalculated
#[derive(Debug, Clone, Copy, Deserialize)]
#[allow(clippy::struct_field_names)]
struct SeatCounts {
    economy_seats: i32,
    business_seats: i32,
    first_class_seats: i32,
}

impl From<SeatCounts> for SeatClasses {
    fn from(counts: SeatCounts) -> Self {
        Self::new(
            counts.economy_seats,
            counts.business_seats,
            counts.first_class_seats,
        )
    }
}

/// Economy, business, and first class capacity, total is always the sum of the three
#[derive(sqlx::FromRow, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "SeatCounts")]
#[allow(clippy::struct_field_names)]
pub struct SeatClasses {
    total_seats: i64,
    economy_seats: i32,
    business_seats: i32,
    first_class_seats: i32,
}

impl SeatClasses {
    /// Negative counts are not rejected, and carry through into the total.
    /// The total is summed as i64, so three i32 classes can never overflow it
    pub fn new(economy_seats: i32, business_seats: i32, first_class_seats: i32) -> Self {
        Self {
            total_seats: i64::from(economy_seats)
                + i64::from(business_seats)
                + i64::from(first_class_seats),
            economy_seats,
            business_seats,
            first_class_seats,
        }
    }

    pub const fn total(&self) -> i64 {
        self.total_seats
    }

    pub const fn economy(&self) -> i32 {
        self.economy_seats
    }

    pub const fn business(&self) -> i32 {
        self.business_seats
    }

    pub const fn first_class(&self) -> i32 {
        self.first_class_seats
    }
}

/// An airplane that has not yet been written to the database
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewAirplane {
    pub reg_number: i32,
    #[serde(flatten)]
    seats: SeatClasses,
}

impl NewAirplane {
    /// Economy only, business and first class seats default to 0
    pub fn new(reg_number: i32, economy_seats: i32) -> Self {
        Self::with_seat_classes(reg_number, economy_seats, 0, 0)
    }

    pub fn with_seat_classes(
        reg_number: i32,
        economy_seats: i32,
        business_seats: i32,
        first_class_seats: i32,
    ) -> Self {
        Self {
            reg_number,
            seats: SeatClasses::new(economy_seats, business_seats, first_class_seats),
        }
    }

    pub const fn seats(&self) -> SeatClasses {
        self.seats
    }

    pub async fn insert(&self, conn: &mut PgConnection) -> Result<ModelAirplane, AppError> {
        let query = r"
INSERT INTO
    airplane(reg_number, total_seats, economy_seats, business_seats, first_class_seats)
VALUES
    ($1, $2, $3, $4, $5)
RETURNING
    airplane_id, reg_number, total_seats, economy_seats, business_seats, first_class_seats";
        let airplane = sqlx::query_as::<_, ModelAirplane>(query)
            .bind(self.reg_number)
            .bind(self.seats.total())
            .bind(self.seats.economy())
            .bind(self.seats.business())
            .bind(self.seats.first_class())
            .fetch_one(conn)
            .await?;
        debug!(airplane_id = airplane.airplane_id, "{airplane} inserted");
        Ok(airplane)
    }
}

/// Seat counts are only set through `SeatClasses`, so total_seats always matches the classes
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelAirplane {
    pub airplane_id: i64,
    pub reg_number: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    seats: SeatClasses,
}

impl fmt::Display for ModelAirplane {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "airplane: {}", self.reg_number)
    }
}

#[async_trait]
impl Model for ModelAirplane {
    const TABLE: Table = Table::Airplane;

    fn id(&self) -> i64 {
        self.airplane_id
    }

    async fn update(&self, conn: &mut PgConnection) -> Result<(), AppError> {
        let query = r"
UPDATE
    airplane
SET
    reg_number = $1, total_seats = $2, economy_seats = $3, business_seats = $4, first_class_seats = $5
WHERE
    airplane_id = $6";
        let result = sqlx::query(query)
            .bind(self.reg_number)
            .bind(self.seats.total())
            .bind(self.seats.economy())
            .bind(self.seats.business())
            .bind(self.seats.first_class())
            .bind(self.airplane_id)
            .execute(conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::UnknownInDb(Self::TABLE));
        }
        Ok(())
    }
}

impl ModelAirplane {
    pub const fn seats(&self) -> SeatClasses {
        self.seats
    }

    /// Replace all seat classes at once, total_seats is recalculated
    pub fn set_seat_classes(
        &mut self,
        economy_seats: i32,
        business_seats: i32,
        first_class_seats: i32,
    ) {
        self.seats = SeatClasses::new(economy_seats, business_seats, first_class_seats);
    }

    /// Every flight operated by this airplane, ordered by flight_id
    pub async fn flights(&self, conn: &mut PgConnection) -> Result<Vec<ModelFlight>, AppError> {
        let query = r"
SELECT
    *
FROM
    flight_schedule
WHERE
    airplane_id = $1
ORDER BY
    flight_id";
        Ok(sqlx::query_as::<_, ModelFlight>(query)
            .bind(self.airplane_id)
            .fetch_all(conn)
            .await?)
    }
}
