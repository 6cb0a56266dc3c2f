//! Product persistence.
//!
//! The durable form is a single JSON array on disk. Every operation does a
//! full read-modify-write with no locking; concurrent writers race and the
//! last one wins. Accepted: the write path is an admin panel with a single
//! operator.

use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;

use crate::domain::{Product, ProductDraft, ProductPatch};
use crate::error::StoreError;

/// Outcome of a delete. The operation always succeeds; `matched` tells the
/// caller whether anything was actually removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub matched: bool,
}

/// Injectable repository over the product collection. Implementations keep
/// most-recent-first ordering: `create` inserts at the front.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, StoreError>;
    async fn get(&self, id: &str) -> Result<Option<Product>, StoreError>;
    async fn create(&self, draft: ProductDraft) -> Result<Product, StoreError>;
    async fn update(&self, patch: ProductPatch) -> Result<Option<Product>, StoreError>;
    async fn delete(&self, id: &str) -> Result<DeleteOutcome, StoreError>;
    /// Replace the whole collection, used by seeding.
    async fn replace_all(&self, products: Vec<Product>) -> Result<(), StoreError>;
}

/// Flat-file store backing the live service.
pub struct JsonStore {
    path: PathBuf,
    last_id: AtomicI64,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_id: AtomicI64::new(0),
        }
    }

    /// Ids are unix-millis strings, bumped past the previous one when two
    /// creations land in the same millisecond.
    fn next_id(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let prev = self
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(if now > last { now } else { last + 1 })
            })
            .unwrap_or(now);
        let id = if now > prev { now } else { prev + 1 };
        id.to_string()
    }

    async fn ensure_file(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).await?;
        }
        if !fs::try_exists(&self.path).await? {
            fs::write(&self.path, b"[]").await?;
        }
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<Product>, StoreError> {
        self.ensure_file().await?;
        let raw = fs::read_to_string(&self.path).await?;
        match serde_json::from_str(&raw) {
            Ok(products) => Ok(products),
            Err(err) => {
                // Unparsable file degrades to an empty catalog rather than
                // failing every request. The warning is the only trace of
                // the data at risk.
                tracing::warn!(
                    path = %self.path.display(),
                    %err,
                    "unparsable product file, serving an empty catalog"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn write_all(&self, products: &[Product]) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(products)?;
        fs::write(&self.path, body).await?;
        Ok(())
    }
}

#[async_trait]
impl ProductStore for JsonStore {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        self.read_all().await
    }

    async fn get(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let target = id.trim();
        let products = self.read_all().await?;
        Ok(products.into_iter().find(|p| p.id.trim() == target))
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let mut products = self.read_all().await?;
        let product = draft.into_product(self.next_id(), Utc::now());
        products.insert(0, product.clone());
        self.write_all(&products).await?;
        Ok(product)
    }

    async fn update(&self, patch: ProductPatch) -> Result<Option<Product>, StoreError> {
        let mut products = self.read_all().await?;
        let target = patch.id.trim().to_owned();
        let Some(existing) = products.iter_mut().find(|p| p.id.trim() == target) else {
            return Ok(None);
        };
        patch.apply_to(existing);
        existing.updated_at = Some(Utc::now());
        let updated = existing.clone();
        self.write_all(&products).await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<DeleteOutcome, StoreError> {
        let target = id.trim();
        let mut products = self.read_all().await?;
        let before = products.len();
        products.retain(|p| p.id.trim() != target);
        let matched = products.len() < before;
        if !matched {
            tracing::warn!(id = target, "delete matched no product");
        }
        // Rewrite regardless so the call stays idempotent.
        self.write_all(&products).await?;
        Ok(DeleteOutcome { matched })
    }

    async fn replace_all(&self, products: Vec<Product>) -> Result<(), StoreError> {
        self.ensure_file().await?;
        self.write_all(&products).await
    }
}

/// In-process store with the same semantics, for tests and embedders.
#[derive(Default)]
pub struct MemoryStore {
    products: Mutex<Vec<Product>>,
    seq: AtomicI64,
}

impl MemoryStore {
    fn guard(&self) -> MutexGuard<'_, Vec<Product>> {
        self.products.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.guard().clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let target = id.trim();
        Ok(self.guard().iter().find(|p| p.id.trim() == target).cloned())
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let id = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let product = draft.into_product(id.to_string(), Utc::now());
        self.guard().insert(0, product.clone());
        Ok(product)
    }

    async fn update(&self, patch: ProductPatch) -> Result<Option<Product>, StoreError> {
        let mut products = self.guard();
        let target = patch.id.trim().to_owned();
        let Some(existing) = products.iter_mut().find(|p| p.id.trim() == target) else {
            return Ok(None);
        };
        patch.apply_to(existing);
        existing.updated_at = Some(Utc::now());
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: &str) -> Result<DeleteOutcome, StoreError> {
        let target = id.trim();
        let mut products = self.guard();
        let before = products.len();
        products.retain(|p| p.id.trim() != target);
        Ok(DeleteOutcome {
            matched: products.len() < before,
        })
    }

    async fn replace_all(&self, products: Vec<Product>) -> Result<(), StoreError> {
        *self.guard() = products;
        Ok(())
    }
}
