use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use std::fmt;
use tracing::debug;

use super::{Model, ModelFlight, Table};
use crate::app_error::AppError;

/// An airport that has not yet been written to the database
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewAirport {
    pub name: String,
    pub country: String,
    pub city: String,
}

impl NewAirport {
    /// No validation, empty strings are accepted
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            city: city.into(),
        }
    }

    pub async fn insert(&self, conn: &mut PgConnection) -> Result<ModelAirport, AppError> {
        let query = r"
INSERT INTO
    airport(name, country, city)
VALUES
    ($1, $2, $3)
RETURNING
    airport_id, name, country, city";
        let airport = sqlx::query_as::<_, ModelAirport>(query)
            .bind(&self.name)
            .bind(&self.country)
            .bind(&self.city)
            .fetch_one(conn)
            .await?;
        debug!(airport_id = airport.airport_id, "{airport} inserted");
        Ok(airport)
    }
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelAirport {
    pub airport_id: i64,
    pub name: String,
    pub country: String,
    pub city: String,
}

impl fmt::Display for ModelAirport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "airport: {}", self.name)
    }
}

#[async_trait]
impl Model for ModelAirport {
    const TABLE: Table = Table::Airport;

    fn id(&self) -> i64 {
        self.airport_id
    }

    async fn update(&self, conn: &mut PgConnection) -> Result<(), AppError> {
        let query = r"
UPDATE
    airport
SET
    name = $1, country = $2, city = $3
WHERE
    airport_id = $4";
        let result = sqlx::query(query)
            .bind(&self.name)
            .bind(&self.country)
            .bind(&self.city)
            .bind(self.airport_id)
            .execute(conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::UnknownInDb(Self::TABLE));
        }
        Ok(())
    }
}

impl ModelAirport {
    /// Every flight departing from, or arriving at, this airport, ordered by flight_id
    pub async fn flights(&self, conn: &mut PgConnection) -> Result<Vec<ModelFlight>, AppError> {
        let query = r"
SELECT
    *
FROM
    flight_schedule
WHERE
    departure_airport_id = $1 OR arrival_airport_id = $1
ORDER BY
    flight_id";
        Ok(sqlx::query_as::<_, ModelFlight>(query)
            .bind(self.airport_id)
            .fetch_all(conn)
            .await?)
    }
}
