//! Domain types for the catalog.
pub mod product;

pub use product::{Badge, Price, Product, ProductDraft, ProductPatch};
