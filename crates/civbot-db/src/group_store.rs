//! Group persistence: atomic accrual, conditional purchases, raids, and
//! the leaderboard query.
//!
//! Every mutation is a single statement (or a single transaction for the
//! raid) evaluated inside the database, never a read-modify-write across
//! two round trips. Conditional updates return whether a row was affected;
//! zero rows means the precondition raced away and the caller reports the
//! operation as failed.

use chrono::{DateTime, Utc};
use civbot_types::{ChatId, Group};
use sqlx::PgPool;

use crate::error::DbError;
use crate::memory::MemoryGroupStore;

/// Dispatch over the available storage backends.
///
/// Async trait methods are not dyn-compatible, so the store is an enum,
/// the same way the workspace dispatches over transports.
#[derive(Debug, Clone)]
pub enum GroupStore {
    /// Production backend.
    Postgres(PostgresGroupStore),
    /// In-memory fake with identical semantics, for tests.
    Memory(MemoryGroupStore),
}

impl GroupStore {
    /// Register a group (or refresh its display name if it exists).
    pub async fn upsert_group(&self, id: &ChatId, name: &str) -> Result<(), DbError> {
        match self {
            Self::Postgres(store) => store.upsert_group(id, name).await,
            Self::Memory(store) => store.upsert_group(id, name),
        }
    }

    /// Apply one passive accrual tick: `bricks += base + bonus * markets`,
    /// creating the group with `base` bricks on first contact and
    /// refreshing its display name either way.
    ///
    /// One atomic upsert-increment statement; returns the new balance.
    pub async fn accrue_passive(
        &self,
        id: &ChatId,
        name: &str,
        base: i64,
        bonus_per_market: i64,
    ) -> Result<i64, DbError> {
        match self {
            Self::Postgres(store) => {
                store.accrue_passive(id, name, base, bonus_per_market).await
            }
            Self::Memory(store) => store.accrue_passive(id, name, base, bonus_per_market),
        }
    }

    /// Fetch a group by chat ID.
    pub async fn get_group(&self, id: &ChatId) -> Result<Option<Group>, DbError> {
        match self {
            Self::Postgres(store) => store.get_group(id).await,
            Self::Memory(store) => store.get_group(id),
        }
    }

    /// Groups ordered by bricks descending, ties by insertion order,
    /// truncated to `limit`.
    pub async fn top_groups(&self, limit: i64) -> Result<Vec<Group>, DbError> {
        match self {
            Self::Postgres(store) => store.top_groups(limit).await,
            Self::Memory(store) => store.top_groups(limit),
        }
    }

    /// Buy a market: deduct `cost` and add one market, only if the balance
    /// covers it. Returns whether the purchase was applied.
    pub async fn try_buy_market(&self, id: &ChatId, cost: i64) -> Result<bool, DbError> {
        match self {
            Self::Postgres(store) => store.try_buy_market(id, cost).await,
            Self::Memory(store) => store.try_buy_market(id, cost),
        }
    }

    /// Buy the wall: deduct `cost` and set `walls = 1`, only if the balance
    /// covers it and no wall exists yet. Returns whether it was applied.
    pub async fn try_buy_wall(&self, id: &ChatId, cost: i64) -> Result<bool, DbError> {
        match self {
            Self::Postgres(store) => store.try_buy_wall(id, cost).await,
            Self::Memory(store) => store.try_buy_wall(id, cost),
        }
    }

    /// Transfer `steal` bricks from defender to attacker and stamp the
    /// attacker's cooldown, all inside one transaction.
    ///
    /// The defender decrement is conditional on `bricks >= steal`; when a
    /// concurrent raid drained the defender first, nothing is applied and
    /// `false` is returned so the caller can retry against fresh balances.
    pub async fn apply_raid(
        &self,
        attacker: &ChatId,
        defender: &ChatId,
        steal: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, DbError> {
        match self {
            Self::Postgres(store) => store.apply_raid(attacker, defender, steal, now).await,
            Self::Memory(store) => store.apply_raid(attacker, defender, steal, now),
        }
    }

    /// Record a webhook `update_id` as processed.
    ///
    /// Returns `true` on first sight; `false` means this delivery is a
    /// duplicate and the event must not be applied again.
    pub async fn begin_event(&self, update_id: i64) -> Result<bool, DbError> {
        match self {
            Self::Postgres(store) => store.begin_event(update_id).await,
            Self::Memory(store) => store.begin_event(update_id),
        }
    }
}

/// `PostgreSQL` implementation of the group store.
#[derive(Debug, Clone)]
pub struct PostgresGroupStore {
    pool: PgPool,
}

impl PostgresGroupStore {
    /// Create a store bound to a connection pool.
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert_group(&self, id: &ChatId, name: &str) -> Result<(), DbError> {
        sqlx::query(
            r"INSERT INTO groups (tg_group_id, name)
              VALUES ($1, $2)
              ON CONFLICT (tg_group_id) DO UPDATE SET name = EXCLUDED.name",
        )
        .bind(id.as_str())
        .bind(name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn accrue_passive(
        &self,
        id: &ChatId,
        name: &str,
        base: i64,
        bonus_per_market: i64,
    ) -> Result<i64, DbError> {
        // New rows have zero markets, so the insert path earns `base`.
        // The conflict path also refreshes the display name, so a renamed
        // chat follows its rename on the next message.
        let (bricks,): (i64,) = sqlx::query_as(
            r"INSERT INTO groups (tg_group_id, name, bricks)
              VALUES ($1, $2, $3)
              ON CONFLICT (tg_group_id)
              DO UPDATE SET bricks = groups.bricks + $3 + $4 * groups.markets,
                            name = EXCLUDED.name
              RETURNING bricks",
        )
        .bind(id.as_str())
        .bind(name)
        .bind(base)
        .bind(bonus_per_market)
        .fetch_one(&self.pool)
        .await?;
        Ok(bricks)
    }

    async fn get_group(&self, id: &ChatId) -> Result<Option<Group>, DbError> {
        let row = sqlx::query_as::<_, GroupRow>(
            r"SELECT tg_group_id, name, bricks, markets, walls, last_attack_at, created_at
              FROM groups
              WHERE tg_group_id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(GroupRow::into_group))
    }

    async fn top_groups(&self, limit: i64) -> Result<Vec<Group>, DbError> {
        let rows = sqlx::query_as::<_, GroupRow>(
            r"SELECT tg_group_id, name, bricks, markets, walls, last_attack_at, created_at
              FROM groups
              ORDER BY bricks DESC, created_at ASC
              LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(GroupRow::into_group).collect())
    }

    async fn try_buy_market(&self, id: &ChatId, cost: i64) -> Result<bool, DbError> {
        let result = sqlx::query(
            r"UPDATE groups
              SET bricks = bricks - $2, markets = markets + 1
              WHERE tg_group_id = $1 AND bricks >= $2",
        )
        .bind(id.as_str())
        .bind(cost)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn try_buy_wall(&self, id: &ChatId, cost: i64) -> Result<bool, DbError> {
        let result = sqlx::query(
            r"UPDATE groups
              SET bricks = bricks - $2, walls = 1
              WHERE tg_group_id = $1 AND bricks >= $2 AND walls = 0",
        )
        .bind(id.as_str())
        .bind(cost)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn apply_raid(
        &self,
        attacker: &ChatId,
        defender: &ChatId,
        steal: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, DbError> {
        let mut tx = self.pool.begin().await?;

        let drained = sqlx::query(
            r"UPDATE groups
              SET bricks = bricks - $2
              WHERE tg_group_id = $1 AND bricks >= $2",
        )
        .bind(defender.as_str())
        .bind(steal)
        .execute(&mut *tx)
        .await?;

        if drained.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }

        let credited = sqlx::query(
            r"UPDATE groups
              SET bricks = bricks + $2, last_attack_at = $3
              WHERE tg_group_id = $1",
        )
        .bind(attacker.as_str())
        .bind(steal)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if credited.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        tracing::debug!(
            attacker = %attacker,
            defender = %defender,
            steal,
            "Raid transfer committed"
        );
        Ok(true)
    }

    async fn begin_event(&self, update_id: i64) -> Result<bool, DbError> {
        let result = sqlx::query(
            r"INSERT INTO processed_updates (update_id)
              VALUES ($1)
              ON CONFLICT (update_id) DO NOTHING",
        )
        .bind(update_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}

/// A row from the `groups` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct GroupRow {
    tg_group_id: String,
    name: String,
    bricks: i64,
    markets: i64,
    walls: i64,
    last_attack_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl GroupRow {
    fn into_group(self) -> Group {
        Group {
            id: ChatId::new(self.tg_group_id),
            name: self.name,
            bricks: self.bricks,
            markets: self.markets,
            walls: self.walls,
            last_attack_at: self.last_attack_at,
            created_at: self.created_at,
        }
    }
}
