//! Claims repository implementation
//!
//! PostgreSQL adapter for the `ClaimRepository` port. Batches are written in
//! a single transaction and the provider ranking is computed by the database
//! with `GROUP BY / ORDER BY / LIMIT` over the `provider_npi` index.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{Amount, ClaimId, DomainPort, PortError};
use domain_claims::{Claim, ClaimRepository, ProviderLimit, ProviderTotal};

use crate::error::DatabaseError;

/// Repository for persisted claims
#[derive(Debug, Clone)]
pub struct PostgresClaimRepository {
    pool: PgPool,
}

impl PostgresClaimRepository {
    /// Creates a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Retrieves a claim by its identifier
    pub async fn get_by_id(&self, claim_id: ClaimId) -> Result<Claim, DatabaseError> {
        let row = sqlx::query_as::<_, ClaimRow>(
            r#"
            SELECT
                id, claim_number, service_date, submitted_procedure, quadrant,
                plan_group, subscriber, provider_npi, provider_fees, allowed_fees,
                member_coinsurance, member_copay, net_fee, created_at
            FROM claims
            WHERE id = $1
            "#,
        )
        .bind(*claim_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Claim", claim_id))?;

        row.try_into()
    }

    async fn insert_batch(&self, claims: &[Claim]) -> Result<(), DatabaseError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        for claim in claims {
            sqlx::query(
                r#"
                INSERT INTO claims (
                    id, claim_number, service_date, submitted_procedure, quadrant,
                    plan_group, subscriber, provider_npi, provider_fees, allowed_fees,
                    member_coinsurance, member_copay, net_fee, created_at
                ) VALUES (
                    $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14
                )
                "#,
            )
            .bind(*claim.id.as_uuid())
            .bind(claim.claim_number.as_str())
            .bind(claim.service_date)
            .bind(&claim.submitted_procedure)
            .bind(&claim.quadrant)
            .bind(&claim.plan_group)
            .bind(&claim.subscriber)
            .bind(&claim.provider_npi)
            .bind(claim.provider_fees.value())
            .bind(claim.allowed_fees.value())
            .bind(claim.member_coinsurance.value())
            .bind(claim.member_copay.value())
            .bind(claim.net_fee.value())
            .bind(claim.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        debug!(count = claims.len(), "Claims inserted");
        Ok(())
    }

    async fn ranked_providers(&self, limit: ProviderLimit) -> Result<Vec<ProviderTotal>, DatabaseError> {
        let rows = sqlx::query_as::<_, ProviderTotalRow>(
            r#"
            SELECT provider_npi, SUM(net_fee) AS total_net_fee
            FROM claims
            GROUP BY provider_npi
            ORDER BY total_net_fee DESC, provider_npi ASC
            LIMIT $1
            "#,
        )
        .bind(limit.get() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ProviderTotal {
                provider_npi: row.provider_npi,
                total_net_fee: Amount::new(row.total_net_fee),
            })
            .collect())
    }
}

impl DomainPort for PostgresClaimRepository {}

#[async_trait]
impl ClaimRepository for PostgresClaimRepository {
    #[instrument(skip_all, fields(count = claims.len()))]
    async fn insert_claims(&self, claims: &[Claim]) -> Result<(), PortError> {
        Ok(self.insert_batch(claims).await?)
    }

    #[instrument(skip(self))]
    async fn top_providers(&self, limit: ProviderLimit) -> Result<Vec<ProviderTotal>, PortError> {
        Ok(self.ranked_providers(limit).await?)
    }

    async fn count_claims(&self) -> Result<u64, PortError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM claims")
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from)?;

        Ok(count.max(0) as u64)
    }

    async fn health_check(&self) -> Result<(), PortError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(())
    }
}

/// Database row for claim
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClaimRow {
    pub id: Uuid,
    pub claim_number: String,
    pub service_date: NaiveDate,
    pub submitted_procedure: String,
    pub quadrant: Option<String>,
    pub plan_group: Option<String>,
    pub subscriber: Option<String>,
    pub provider_npi: String,
    pub provider_fees: Decimal,
    pub allowed_fees: Decimal,
    pub member_coinsurance: Decimal,
    pub member_copay: Decimal,
    pub net_fee: Decimal,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ClaimRow> for Claim {
    type Error = DatabaseError;

    fn try_from(row: ClaimRow) -> Result<Self, Self::Error> {
        let claim_number = row
            .claim_number
            .parse()
            .map_err(|e: core_kernel::InvalidClaimNumber| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(Claim {
            id: ClaimId::from_uuid(row.id),
            claim_number,
            service_date: row.service_date,
            submitted_procedure: row.submitted_procedure,
            quadrant: row.quadrant,
            plan_group: row.plan_group,
            subscriber: row.subscriber,
            provider_npi: row.provider_npi,
            provider_fees: Amount::new(row.provider_fees),
            allowed_fees: Amount::new(row.allowed_fees),
            member_coinsurance: Amount::new(row.member_coinsurance),
            member_copay: Amount::new(row.member_copay),
            net_fee: Amount::new(row.net_fee),
            created_at: row.created_at,
        })
    }
}

/// Aggregation row for the top providers query
#[derive(Debug, Clone, sqlx::FromRow)]
struct ProviderTotalRow {
    provider_npi: String,
    total_net_fee: Decimal,
}
