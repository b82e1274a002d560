//! Repository for the `access_codes` and `access_code_redemptions` tables.

use academy_core::access_code::check_redeemable;
use academy_core::entitlement::EntitlementStatus;
use academy_core::error::AccessCodeRejection;
use academy_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::entitlement::{AccessCode, CreateAccessCode, Redemption};
use crate::repositories::EntitlementRepo;

const COLUMNS: &str = "\
    id, course_id, code_hash, max_uses, used_count, expires_at, is_active, \
    created_at, updated_at";

pub struct AccessCodeRepo;

impl AccessCodeRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateAccessCode,
    ) -> Result<AccessCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO access_codes (course_id, code_hash, max_uses, expires_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AccessCode>(&query)
            .bind(input.course_id)
            .bind(&input.code_hash)
            .bind(input.max_uses)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Redeem a code for a customer.
    ///
    /// The code row is locked with `FOR UPDATE` for the whole transaction so
    /// concurrent redemptions serialize on it and cannot exceed `max_uses`.
    /// A rejected attempt rolls back without writing anything.
    pub async fn redeem(
        pool: &PgPool,
        course_id: DbId,
        customer_id: DbId,
        code_hash: &str,
        now: Timestamp,
    ) -> Result<Redemption, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {COLUMNS} FROM access_codes \
             WHERE code_hash = $1 AND course_id = $2 \
             FOR UPDATE"
        );
        let Some(code) = sqlx::query_as::<_, AccessCode>(&query)
            .bind(code_hash)
            .bind(course_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(Redemption::Rejected(AccessCodeRejection::Invalid));
        };

        let already: bool = sqlx::query_scalar(
            "SELECT EXISTS ( \
                SELECT 1 FROM access_code_redemptions \
                WHERE access_code_id = $1 AND customer_id = $2)",
        )
        .bind(code.id)
        .bind(customer_id)
        .fetch_one(&mut *tx)
        .await?;

        if already {
            let entitlement = EntitlementRepo::upsert(
                &mut *tx,
                customer_id,
                course_id,
                EntitlementStatus::Active,
                code.expires_at,
            )
            .await?;
            tx.commit().await?;
            return Ok(Redemption::AlreadyRedeemed(entitlement));
        }

        if let Err(rejection) =
            check_redeemable(code.is_active, code.expires_at, code.used_count, code.max_uses, now)
        {
            tracing::debug!(
                access_code_id = code.id,
                customer_id,
                ?rejection,
                "Access code not redeemable"
            );
            return Ok(Redemption::Rejected(rejection));
        }

        sqlx::query(
            "INSERT INTO access_code_redemptions (access_code_id, customer_id) VALUES ($1, $2)",
        )
        .bind(code.id)
        .bind(customer_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE access_codes SET used_count = used_count + 1 WHERE id = $1")
            .bind(code.id)
            .execute(&mut *tx)
            .await?;

        let entitlement = EntitlementRepo::upsert(
            &mut *tx,
            customer_id,
            course_id,
            EntitlementStatus::Active,
            code.expires_at,
        )
        .await?;

        tx.commit().await?;
        Ok(Redemption::Granted(entitlement))
    }
}
