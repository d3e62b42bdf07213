//! Location repository implementation
//!
//! Read-mostly reference data backing the cascading address dropdowns.
//! Region, province, and municipality listings come back newest first,
//! matching the order the reference data was imported in.

use async_trait::async_trait;
use simledger_core::{
    models::{Address, Barangay, Municipality, Province, Region},
    traits::LocationRepository,
    AppError, AppResult,
};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of LocationRepository
pub struct PgLocationRepository {
    pool: PgPool,
}

impl PgLocationRepository {
    /// Create a new location repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationRepository for PgLocationRepository {
    #[instrument(skip(self))]
    async fn regions(&self) -> AppResult<Vec<Region>> {
        let rows = sqlx::query_as::<sqlx::Postgres, RegionRow>(
            "SELECT id, name FROM regions ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing regions: {}", e);
            AppError::Database(format!("Failed to fetch regions: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn provinces_by_region(&self, region_id: i32) -> AppResult<Vec<Province>> {
        debug!("Listing provinces for region: {}", region_id);

        let rows = sqlx::query_as::<sqlx::Postgres, ProvinceRow>(
            "SELECT id, region_id, name FROM provinces WHERE region_id = $1 ORDER BY id DESC",
        )
        .bind(region_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing provinces: {}", e);
            AppError::Database(format!("Failed to fetch provinces: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn municipalities_by_province(
        &self,
        province_id: i32,
    ) -> AppResult<Vec<Municipality>> {
        debug!("Listing municipalities for province: {}", province_id);

        let rows = sqlx::query_as::<sqlx::Postgres, MunicipalityRow>(
            "SELECT id, province_id, name FROM municipalities WHERE province_id = $1 ORDER BY id DESC",
        )
        .bind(province_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing municipalities: {}", e);
            AppError::Database(format!("Failed to fetch municipalities: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn barangays_by_municipality(
        &self,
        municipality_id: i32,
    ) -> AppResult<Vec<Barangay>> {
        debug!("Listing barangays for municipality: {}", municipality_id);

        let rows = sqlx::query_as::<sqlx::Postgres, BarangayRow>(
            "SELECT id, municipality_id, name FROM barangays WHERE municipality_id = $1 ORDER BY name",
        )
        .bind(municipality_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing barangays: {}", e);
            AppError::Database(format!("Failed to fetch barangays: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn find_province(&self, id: i32) -> AppResult<Option<Province>> {
        let result = sqlx::query_as::<sqlx::Postgres, ProvinceRow>(
            "SELECT id, region_id, name FROM provinces WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding province {}: {}", id, e);
            AppError::Database(format!("Failed to find province: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_municipality(&self, id: i32) -> AppResult<Option<Municipality>> {
        let result = sqlx::query_as::<sqlx::Postgres, MunicipalityRow>(
            "SELECT id, province_id, name FROM municipalities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding municipality {}: {}", id, e);
            AppError::Database(format!("Failed to find municipality: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_barangay(&self, id: i32) -> AppResult<Option<Barangay>> {
        let result = sqlx::query_as::<sqlx::Postgres, BarangayRow>(
            "SELECT id, municipality_id, name FROM barangays WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding barangay {}: {}", id, e);
            AppError::Database(format!("Failed to find barangay: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self, address))]
    async fn create_address(&self, address: &Address) -> AppResult<Address> {
        debug!("Creating address");

        let row = sqlx::query_as::<sqlx::Postgres, AddressRow>(
            r#"
            INSERT INTO addresses (
                region_id, province_id, municipality_id,
                barangay_id, house_number_street
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, region_id, province_id, municipality_id,
                      barangay_id, house_number_street
            "#,
        )
        .bind(address.region_id)
        .bind(address.province_id)
        .bind(address.municipality_id)
        .bind(address.barangay_id)
        .bind(&address.house_number_street)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating address: {}", e);
            AppError::Database(format!("Failed to create address: {}", e))
        })?;

        Ok(row.into())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RegionRow {
    id: i32,
    name: String,
}

impl From<RegionRow> for Region {
    fn from(row: RegionRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProvinceRow {
    id: i32,
    region_id: i32,
    name: String,
}

impl From<ProvinceRow> for Province {
    fn from(row: ProvinceRow) -> Self {
        Self {
            id: row.id,
            region_id: row.region_id,
            name: row.name,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MunicipalityRow {
    id: i32,
    province_id: i32,
    name: String,
}

impl From<MunicipalityRow> for Municipality {
    fn from(row: MunicipalityRow) -> Self {
        Self {
            id: row.id,
            province_id: row.province_id,
            name: row.name,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BarangayRow {
    id: i32,
    municipality_id: i32,
    name: String,
}

impl From<BarangayRow> for Barangay {
    fn from(row: BarangayRow) -> Self {
        Self {
            id: row.id,
            municipality_id: row.municipality_id,
            name: row.name,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    id: i32,
    region_id: Option<i32>,
    province_id: Option<i32>,
    municipality_id: Option<i32>,
    barangay_id: Option<i32>,
    house_number_street: String,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: row.id,
            region_id: row.region_id,
            province_id: row.province_id,
            municipality_id: row.municipality_id,
            barangay_id: row.barangay_id,
            house_number_street: row.house_number_street,
        }
    }
}
