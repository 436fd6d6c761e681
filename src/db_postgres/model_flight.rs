use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use std::fmt;
use time::PrimitiveDateTime;
use tracing::debug;

use super::{Model, ModelAirplane, ModelAirport, ModelBooking, Table};
use crate::app_error::AppError;

/// Status given to every newly constructed flight
pub const FLIGHT_STATUS_UPCOMING: &str = "upcoming";

/// A flight that has not yet been written to the database.
///
/// Nothing here checks that arrival is after departure, that the two airports differ,
/// or that the referenced airports and airplane exist; the foreign keys reject unknown ids on insert
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewFlight {
    pub departure_date: PrimitiveDateTime,
    pub departure_airport_id: i64,
    pub arrival_date: PrimitiveDateTime,
    pub arrival_airport_id: i64,
    pub airplane_id: i64,
    pub status: String,
    pub booked_first: i32,
    pub booked_business: i32,
    pub booked_economy: i32,
}

impl NewFlight {
    pub fn new(
        departure_date: PrimitiveDateTime,
        departure_airport_id: i64,
        arrival_date: PrimitiveDateTime,
        arrival_airport_id: i64,
        airplane_id: i64,
    ) -> Self {
        Self {
            departure_date,
            departure_airport_id,
            arrival_date,
            arrival_airport_id,
            airplane_id,
            status: FLIGHT_STATUS_UPCOMING.to_owned(),
            booked_first: 0,
            booked_business: 0,
            booked_economy: 0,
        }
    }

    pub async fn insert(&self, conn: &mut PgConnection) -> Result<ModelFlight, AppError> {
        let query = r"
INSERT INTO
    flight_schedule(departure_date, departure_airport_id, arrival_date, arrival_airport_id, status, airplane_id, booked_first, booked_business, booked_economy)
VALUES
    ($1, $2, $3, $4, $5, $6, $7, $8, $9)
RETURNING
    *";
        let flight = sqlx::query_as::<_, ModelFlight>(query)
            .bind(self.departure_date)
            .bind(self.departure_airport_id)
            .bind(self.arrival_date)
            .bind(self.arrival_airport_id)
            .bind(&self.status)
            .bind(self.airplane_id)
            .bind(self.booked_first)
            .bind(self.booked_business)
            .bind(self.booked_economy)
            .fetch_one(conn)
            .await?;
        debug!(flight_id = flight.flight_id, "{flight} inserted");
        Ok(flight)
    }
}

/// Booked counts are not checked against the airplane's seat classes
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelFlight {
    pub flight_id: i64,
    pub departure_date: PrimitiveDateTime,
    pub departure_airport_id: i64,
    pub arrival_date: PrimitiveDateTime,
    pub arrival_airport_id: i64,
    pub status: String,
    pub airplane_id: i64,
    pub booked_first: i32,
    pub booked_business: i32,
    pub booked_economy: i32,
}

impl fmt::Display for ModelFlight {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "flight: {}", self.flight_id)
    }
}

#[async_trait]
impl Model for ModelFlight {
    const TABLE: Table = Table::Flight;

    fn id(&self) -> i64 {
        self.flight_id
    }

    async fn update(&self, conn: &mut PgConnection) -> Result<(), AppError> {
        let query = r"
UPDATE
    flight_schedule
SET
    departure_date = $1,
    departure_airport_id = $2,
    arrival_date = $3,
    arrival_airport_id = $4,
    status = $5,
    airplane_id = $6,
    booked_first = $7,
    booked_business = $8,
    booked_economy = $9
WHERE
    flight_id = $10";
        let result = sqlx::query(query)
            .bind(self.departure_date)
            .bind(self.departure_airport_id)
            .bind(self.arrival_date)
            .bind(self.arrival_airport_id)
            .bind(&self.status)
            .bind(self.airplane_id)
            .bind(self.booked_first)
            .bind(self.booked_business)
            .bind(self.booked_economy)
            .bind(self.flight_id)
            .execute(conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::UnknownInDb(Self::TABLE));
        }
        Ok(())
    }
}

impl ModelFlight {
    pub async fn departure_airport(
        &self,
        conn: &mut PgConnection,
    ) -> Result<ModelAirport, AppError> {
        ModelAirport::get(conn, self.departure_airport_id)
            .await?
            .ok_or(AppError::UnknownInDb(Table::Airport))
    }

    pub async fn arrival_airport(
        &self,
        conn: &mut PgConnection,
    ) -> Result<ModelAirport, AppError> {
        ModelAirport::get(conn, self.arrival_airport_id)
            .await?
            .ok_or(AppError::UnknownInDb(Table::Airport))
    }

    pub async fn airplane(&self, conn: &mut PgConnection) -> Result<ModelAirplane, AppError> {
        ModelAirplane::get(conn, self.airplane_id)
            .await?
            .ok_or(AppError::UnknownInDb(Table::Airplane))
    }

    /// All bookings on this flight, ordered by booking_id
    pub async fn bookings(&self, conn: &mut PgConnection) -> Result<Vec<ModelBooking>, AppError> {
        let query = r"
SELECT
    booking_id, flight_id
FROM
    booking
WHERE
    flight_id = $1
ORDER BY
    booking_id";
        Ok(sqlx::query_as::<_, ModelBooking>(query)
            .bind(self.flight_id)
            .fetch_all(conn)
            .await?)
    }
}

// Run tests with
//
// cargo watch -q -c -w src/ -x 'test model_flight -- --include-ignored'
#[cfg(test)]
#[allow(clippy::pedantic, clippy::nursery, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db_postgres::{
        NewBooking,
        tests::{insert_fixtures, test_setup},
    };
    use time::macros::datetime;

    #[test]
    fn model_flight_new_defaults() {
        let result = NewFlight::new(
            datetime!(2024-01-01 08:00),
            1,
            datetime!(2024-01-01 10:00),
            2,
            1,
        );

        assert_eq!(result.status, "upcoming");
        assert_eq!(result.booked_first, 0);
        assert_eq!(result.booked_business, 0);
        assert_eq!(result.booked_economy, 0);
        assert_eq!(result.departure_airport_id, 1);
        assert_eq!(result.arrival_airport_id, 2);
        assert_eq!(result.airplane_id, 1);
        assert_eq!(result.departure_date, datetime!(2024-01-01 08:00));
        assert_eq!(result.arrival_date, datetime!(2024-01-01 10:00));
    }

    #[test]
    fn model_flight_new_unvalidated() {
        // arrival before departure, same airport at both ends
        let result = NewFlight::new(
            datetime!(2024-01-01 10:00),
            4,
            datetime!(2024-01-01 08:00),
            4,
            99,
        );

        assert_eq!(result.departure_airport_id, result.arrival_airport_id);
        assert!(result.arrival_date < result.departure_date);
        assert_eq!(result.status, FLIGHT_STATUS_UPCOMING);
    }

    #[tokio::test]
    #[ignore = "requires postgres"]
    async fn model_flight_insert_defaults_and_relations() {
        let postgres = test_setup().await;
        let mut transaction = postgres.begin().await.unwrap();
        let fixtures = insert_fixtures(&mut transaction).await;

        assert_eq!(fixtures.flight.status, "upcoming");
        assert_eq!(fixtures.flight.booked_first, 0);
        assert_eq!(fixtures.flight.booked_business, 0);
        assert_eq!(fixtures.flight.booked_economy, 0);
        assert_eq!(fixtures.flight.departure_date, datetime!(2024-01-01 08:00));
        assert_eq!(fixtures.flight.to_string(), format!("flight: {}", fixtures.flight.flight_id));

        let result = fixtures.flight.departure_airport(&mut transaction).await.unwrap();
        assert_eq!(result, fixtures.origin);
        let result = fixtures.flight.arrival_airport(&mut transaction).await.unwrap();
        assert_eq!(result, fixtures.destination);
        let result = fixtures.flight.airplane(&mut transaction).await.unwrap();
        assert_eq!(result, fixtures.airplane);

        transaction.rollback().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires postgres"]
    async fn model_flight_update_status_and_counts() {
        let postgres = test_setup().await;
        let mut transaction = postgres.begin().await.unwrap();
        let mut flight = insert_fixtures(&mut transaction).await.flight;

        flight.status = S!("boarding");
        flight.booked_economy = 3;
        flight.booked_first = 1;
        flight.update(&mut transaction).await.unwrap();

        let result = ModelFlight::get(&mut transaction, flight.flight_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result, flight);

        transaction.rollback().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires postgres"]
    async fn model_flight_unknown_airplane_rejected() {
        let postgres = test_setup().await;
        let mut transaction = postgres.begin().await.unwrap();
        let fixtures = insert_fixtures(&mut transaction).await;

        let result = NewFlight::new(
            datetime!(2024-01-01 08:00),
            fixtures.origin.airport_id,
            datetime!(2024-01-01 10:00),
            fixtures.destination.airport_id,
            fixtures.airplane.airplane_id + 1_000_000,
        )
        .insert(&mut transaction)
        .await;

        match result {
            Err(AppError::SqlxError(sqlx::Error::Database(e))) => {
                assert!(e.is_foreign_key_violation());
            }
            _ => unreachable!("expected foreign key violation"),
        }

        transaction.rollback().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires postgres"]
    async fn model_flight_bookings_and_delete_cascades() {
        let postgres = test_setup().await;
        let mut transaction = postgres.begin().await.unwrap();
        let fixtures = insert_fixtures(&mut transaction).await;

        let first = NewBooking::new(fixtures.flight.flight_id)
            .insert(&mut transaction)
            .await
            .unwrap();
        let second = NewBooking::new(fixtures.flight.flight_id)
            .insert(&mut transaction)
            .await
            .unwrap();

        let result = fixtures.flight.bookings(&mut transaction).await.unwrap();
        assert_eq!(result, vec![first.clone(), second.clone()]);

        assert!(fixtures.flight.delete(&mut transaction).await.unwrap());

        for booking in [first, second] {
            let result = ModelBooking::get(&mut transaction, booking.booking_id)
                .await
                .unwrap();
            assert!(result.is_none());
        }

        // airports and airplane are untouched
        assert!(fixtures.flight.airplane(&mut transaction).await.is_ok());
        assert!(fixtures.flight.departure_airport(&mut transaction).await.is_ok());

        transaction.rollback().await.unwrap();
    }
}
