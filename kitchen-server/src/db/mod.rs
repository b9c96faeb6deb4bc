//! redb database shared by the order store and the stock ledger
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | JSON-serialized `Order` | One record per live order |
//! | `stock` | ingredient | `u64` | Stock ledger entries |
//! | `stock_meta` | `"version"` | `u64` | Ledger commit counter |
//!
//! # Durability
//!
//! redb commits are persistent as soon as `commit()` returns (copy-on-write
//! with atomic pointer swap), so a power cut never leaves a half-written
//! ledger record. Writers are serialized by redb itself: a write transaction
//! that reads the ledger sees every earlier commit.

use redb::{Database, TableDefinition};
use shared::ErrorCode;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Orders: key = order_id, value = JSON-serialized Order
pub(crate) const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Stock ledger: key = ingredient, value = count
pub(crate) const STOCK_TABLE: TableDefinition<&str, u64> = TableDefinition::new("stock");

/// Ledger metadata: key = "version", value = commit counter
pub(crate) const STOCK_META_TABLE: TableDefinition<&str, u64> = TableDefinition::new("stock_meta");

pub(crate) const STOCK_VERSION_KEY: &str = "version";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl StorageError {
    /// 将存储错误转换为错误码（前端负责本地化）
    pub fn error_code(&self) -> ErrorCode {
        match self {
            StorageError::Serialization(_) => return ErrorCode::InternalError,
            StorageError::Task(_) => return ErrorCode::InternalError,
            _ => {}
        }

        // redb 错误通过字符串匹配分类
        let err_str = self.to_string().to_lowercase();

        if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc")
        {
            return ErrorCode::StorageFull;
        }

        if err_str.contains("corrupt") || err_str.contains("invalid database") {
            return ErrorCode::StorageCorrupted;
        }

        ErrorCode::SystemBusy
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Handle to the kitchen database
#[derive(Clone)]
pub struct KitchenDb {
    db: Arc<Database>,
}

impl std::fmt::Debug for KitchenDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KitchenDb").finish_non_exhaustive()
    }
}

impl KitchenDb {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests, throwaway sessions)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            // Create all tables if they don't exist
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(STOCK_TABLE)?;
            let _ = write_txn.open_table(STOCK_META_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    pub(crate) fn inner(&self) -> &Database {
        &self.db
    }

    /// Run a redb operation on the blocking pool
    pub(crate) async fn blocking<T, F>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Database) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || f(&db)).await?
    }
}
