//! In-memory fake store with the same semantics as the SQL backend.
//!
//! Used by unit and integration tests so the whole dispatch path runs
//! without a live database. Mutations are applied under one mutex, which
//! gives the same "never lose an increment" guarantee the SQL statements
//! give in production.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use civbot_types::{ChatId, Group};

use crate::error::DbError;

#[derive(Debug, Default)]
struct MemoryInner {
    /// Insertion order is preserved; the leaderboard's stable sort relies
    /// on it for tie-breaking.
    groups: Vec<Group>,
    processed_updates: BTreeSet<i64>,
}

/// In-memory [`GroupStore`](crate::GroupStore) backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryGroupStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryGroupStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_inner<T>(
        &self,
        f: impl FnOnce(&mut MemoryInner) -> T,
    ) -> Result<T, DbError> {
        let mut inner = self.inner.lock().map_err(|_| DbError::LockPoisoned)?;
        Ok(f(&mut inner))
    }

    pub(crate) fn upsert_group(&self, id: &ChatId, name: &str) -> Result<(), DbError> {
        self.with_inner(|inner| {
            if let Some(group) = inner.groups.iter_mut().find(|g| &g.id == id) {
                group.name = name.to_owned();
            } else {
                inner.groups.push(Group::new(id.clone(), name, Utc::now()));
            }
        })
    }

    pub(crate) fn accrue_passive(
        &self,
        id: &ChatId,
        name: &str,
        base: i64,
        bonus_per_market: i64,
    ) -> Result<i64, DbError> {
        self.with_inner(|inner| {
            if let Some(group) = inner.groups.iter_mut().find(|g| &g.id == id) {
                let income =
                    base.saturating_add(bonus_per_market.saturating_mul(group.markets));
                group.bricks = group.bricks.saturating_add(income);
                group.name = name.to_owned();
                group.bricks
            } else {
                let mut group = Group::new(id.clone(), name, Utc::now());
                group.bricks = base;
                let bricks = group.bricks;
                inner.groups.push(group);
                bricks
            }
        })
    }

    pub(crate) fn get_group(&self, id: &ChatId) -> Result<Option<Group>, DbError> {
        self.with_inner(|inner| inner.groups.iter().find(|g| &g.id == id).cloned())
    }

    pub(crate) fn top_groups(&self, limit: i64) -> Result<Vec<Group>, DbError> {
        self.with_inner(|inner| {
            let mut groups = inner.groups.clone();
            // Stable sort: equal balances keep insertion order.
            groups.sort_by(|a, b| b.bricks.cmp(&a.bricks));
            let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
            groups.truncate(limit);
            groups
        })
    }

    pub(crate) fn try_buy_market(&self, id: &ChatId, cost: i64) -> Result<bool, DbError> {
        self.with_inner(|inner| {
            inner
                .groups
                .iter_mut()
                .find(|g| &g.id == id && g.bricks >= cost)
                .map(|group| {
                    group.bricks = group.bricks.saturating_sub(cost);
                    group.markets = group.markets.saturating_add(1);
                })
                .is_some()
        })
    }

    pub(crate) fn try_buy_wall(&self, id: &ChatId, cost: i64) -> Result<bool, DbError> {
        self.with_inner(|inner| {
            inner
                .groups
                .iter_mut()
                .find(|g| &g.id == id && g.bricks >= cost && g.walls == 0)
                .map(|group| {
                    group.bricks = group.bricks.saturating_sub(cost);
                    group.walls = 1;
                })
                .is_some()
        })
    }

    pub(crate) fn apply_raid(
        &self,
        attacker: &ChatId,
        defender: &ChatId,
        steal: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, DbError> {
        self.with_inner(|inner| {
            let defender_ok = inner
                .groups
                .iter()
                .any(|g| &g.id == defender && g.bricks >= steal);
            let attacker_ok = inner.groups.iter().any(|g| &g.id == attacker);
            if !defender_ok || !attacker_ok {
                return false;
            }
            for group in &mut inner.groups {
                if &group.id == defender {
                    group.bricks = group.bricks.saturating_sub(steal);
                } else if &group.id == attacker {
                    group.bricks = group.bricks.saturating_add(steal);
                    group.last_attack_at = Some(now);
                }
            }
            true
        })
    }

    pub(crate) fn begin_event(&self, update_id: i64) -> Result<bool, DbError> {
        self.with_inner(|inner| inner.processed_updates.insert(update_id))
    }
}
