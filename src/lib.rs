//! Wax Boutique
//!
//! Self-hosted storefront backend with a flat-file product catalog.
//!
//! ## Features
//! - Product catalog CRUD persisted as a single JSON array
//! - Fuzzy product search (Levenshtein) with section and category filters
//! - Promotional carousel entries with per-slide overrides
//! - Query-time badge derivation (Nouveau / Promo / Best Seller)

pub mod api;
pub mod catalog;
pub mod domain;
pub mod error;
pub mod store;

pub use domain::{Badge, Price, Product, ProductDraft, ProductPatch};
pub use error::{ApiError, StoreError};
pub use store::{DeleteOutcome, JsonStore, MemoryStore, ProductStore};
