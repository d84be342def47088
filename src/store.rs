use sqlx::{Sqlite, SqliteConnection, Transaction};

use crate::config::DbPool;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The row changed between read and write.
    #[error("Stale write to {0}")]
    Conflict(&'static str),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// One transaction, opened for a single read-modify-write.
///
/// Repository traits are implemented on this type, so every read and write a
/// service performs goes through the same transaction. Dropping it without
/// calling [`UnitOfWork::commit`] rolls everything back.
///
/// [`UnitOfWork::begin`] takes the database write lock up front, so two
/// writers never both read a row and then race to upgrade their locks. The
/// second one waits and sees the first one's committed state.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    pub async fn begin(pool: &DbPool) -> Result<Self> {
        Ok(Self {
            tx: pool.begin_with("BEGIN IMMEDIATE").await?,
        })
    }

    /// A deferred transaction for lookups that never write.
    pub async fn read(pool: &DbPool) -> Result<Self> {
        Ok(Self {
            tx: pool.begin().await?,
        })
    }

    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }

    pub(crate) fn conn(&mut self) -> &mut SqliteConnection {
        &mut *self.tx
    }
}
