//! SQLite local mirror of the remote entities.
//!
//! One table per entity, keyed by remote id. Refreshes replace a user's rows
//! wholesale inside a transaction; there is no expiry or merge logic.

pub mod models;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::{debug, info};
use std::cell::RefCell;
use thiserror::Error;

use crate::schema;
use models::{LocalBooking, LocalNotification, LocalUser};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a writer waits on a lock held by the other sync loop.
const BUSY_TIMEOUT_MS: u32 = 5_000;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection failed: {0}")]
    Connection(#[from] diesel::ConnectionError),
    #[error("{0}")]
    Query(#[from] diesel::result::Error),
    #[error("applying cache migrations failed: {0}")]
    Migration(String),
}

/// Handle on the local database. Not `Sync`: every thread opens its own.
pub struct Cache {
    conn: RefCell<SqliteConnection>,
}

impl Cache {
    /// Open (or create) the cache at `path` and bring its schema up to date.
    /// `:memory:` gives a private, empty cache.
    pub fn open(path: &str) -> Result<Self, CacheError> {
        let mut conn = SqliteConnection::establish(path)?;
        conn.batch_execute(&format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"))?;
        apply_migrations(&mut conn)?;
        Ok(Cache {
            conn: RefCell::new(conn),
        })
    }

    // =====================
    // Bookings
    // =====================

    /// Replace every cached booking of `user_id` with `rows`.
    pub fn replace_bookings_for_user(&self, user_id: &str, rows: &[LocalBooking]) -> Result<usize, CacheError> {
        use schema::bookings::dsl as B;

        let mut conn = self.conn.borrow_mut();
        let inserted = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let removed = diesel::delete(B::bookings.filter(B::user_id.eq(user_id))).execute(conn)?;
            let mut inserted = 0;
            for row in rows {
                inserted += diesel::replace_into(B::bookings).values(row).execute(conn)?;
            }
            debug!("Cache: bookings of {user_id} replaced (removed={removed}, inserted={inserted})");
            Ok(inserted)
        })?;
        Ok(inserted)
    }

    pub fn bookings_by_user(&self, user_id: &str) -> Result<Vec<LocalBooking>, CacheError> {
        use schema::bookings::dsl as B;

        let rows = B::bookings
            .filter(B::user_id.eq(user_id))
            .select(LocalBooking::as_select())
            .load(&mut *self.conn.borrow_mut())?;
        Ok(rows)
    }

    // =====================
    // Users
    // =====================

    pub fn user_by_id(&self, id: &str) -> Result<Option<LocalUser>, CacheError> {
        use schema::users::dsl as U;

        let row = U::users
            .find(id)
            .select(LocalUser::as_select())
            .first(&mut *self.conn.borrow_mut())
            .optional()?;
        Ok(row)
    }

    pub fn upsert_user(&self, row: &LocalUser) -> Result<(), CacheError> {
        use schema::users::dsl as U;

        diesel::replace_into(U::users)
            .values(row)
            .execute(&mut *self.conn.borrow_mut())?;
        Ok(())
    }

    /// Returns whether a row was removed.
    pub fn delete_user(&self, id: &str) -> Result<bool, CacheError> {
        use schema::users::dsl as U;

        let removed = diesel::delete(U::users.find(id)).execute(&mut *self.conn.borrow_mut())?;
        Ok(removed > 0)
    }

    // =====================
    // Notifications
    // =====================

    pub fn replace_notifications_for_user(
        &self,
        user_id: &str,
        rows: &[LocalNotification],
    ) -> Result<usize, CacheError> {
        use schema::notifications::dsl as N;

        let mut conn = self.conn.borrow_mut();
        let inserted = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let removed = diesel::delete(N::notifications.filter(N::user_id.eq(user_id))).execute(conn)?;
            let mut inserted = 0;
            for row in rows {
                inserted += diesel::replace_into(N::notifications).values(row).execute(conn)?;
            }
            debug!("Cache: notifications of {user_id} replaced (removed={removed}, inserted={inserted})");
            Ok(inserted)
        })?;
        Ok(inserted)
    }

    pub fn notifications_by_user(&self, user_id: &str) -> Result<Vec<LocalNotification>, CacheError> {
        use schema::notifications::dsl as N;

        let rows = N::notifications
            .filter(N::user_id.eq(user_id))
            .select(LocalNotification::as_select())
            .load(&mut *self.conn.borrow_mut())?;
        Ok(rows)
    }

    pub fn notification_by_id(&self, id: &str) -> Result<Option<LocalNotification>, CacheError> {
        use schema::notifications::dsl as N;

        let row = N::notifications
            .find(id)
            .select(LocalNotification::as_select())
            .first(&mut *self.conn.borrow_mut())
            .optional()?;
        Ok(row)
    }

    /// Returns whether a cached row was updated.
    pub fn set_notification_read(&self, id: &str, is_read: bool) -> Result<bool, CacheError> {
        use schema::notifications::dsl as N;

        let updated = diesel::update(N::notifications.find(id))
            .set(N::is_read.eq(is_read))
            .execute(&mut *self.conn.borrow_mut())?;
        Ok(updated > 0)
    }
}

fn apply_migrations(conn: &mut SqliteConnection) -> Result<(), CacheError> {
    match conn.run_pending_migrations(MIGRATIONS) {
        Ok(applied) => {
            if applied.is_empty() {
                debug!("Cache schema is up to date; no migrations were applied");
            } else {
                let names = applied.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ");
                info!("Applied {} cache migration(s): {}", applied.len(), names);
            }
            Ok(())
        }
        Err(e) => Err(CacheError::Migration(e.to_string())),
    }
}
