//! Product entity and its create/update payloads.
//!
//! Wire and file format is camelCase JSON. The persisted record is the
//! single source of truth; nothing else holds a divergent copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Promotional label shown on product cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Badge {
    Nouveau,
    Promo,
    #[serde(rename = "Best Seller")]
    BestSeller,
}

/// Price as persisted: either a plain amount or a pre-formatted string
/// such as "25 000 FCFA".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(f64),
    Text(String),
}

impl Default for Price {
    fn default() -> Self {
        Price::Amount(0.0)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub category: String,
    /// Primary image reference (path or data URL, produced client-side).
    #[serde(default)]
    pub image: String,
    /// Optional ordered gallery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub stock: u32,
    /// Explicit badge; when absent the catalog derives one at query time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_promo: Option<bool>,
    /// Featured products live in the carousel, never in the grid.
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carousel_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carousel_subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carousel_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carousel_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create payload. The store assigns the id and createdAt stamp.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[validate(custom = "validate_price")]
    pub price: Price,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    #[validate(custom = "validate_images")]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub badge: Option<Badge>,
    #[serde(default)]
    pub is_promo: Option<bool>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub carousel_title: Option<String>,
    #[serde(default)]
    pub carousel_subtitle: Option<String>,
    #[serde(default)]
    pub carousel_description: Option<String>,
    #[serde(default)]
    pub carousel_image: Option<String>,
}

impl ProductDraft {
    pub fn into_product(self, id: String, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            image: self.image,
            images: self.images,
            stock: self.stock,
            badge: self.badge,
            is_promo: self.is_promo,
            is_featured: self.is_featured,
            carousel_title: self.carousel_title,
            carousel_subtitle: self.carousel_subtitle,
            carousel_description: self.carousel_description,
            carousel_image: self.carousel_image,
            created_at: Some(now),
            updated_at: None,
        }
    }
}

/// Partial update. Every field is overwrite-if-present: `Some` replaces the
/// stored value, absent (or JSON null) preserves it. Clearing a value means
/// sending an explicit empty string or array.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(custom = "validate_price")]
    pub price: Option<Price>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    #[validate(custom = "validate_images")]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub badge: Option<Badge>,
    #[serde(default)]
    pub is_promo: Option<bool>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub carousel_title: Option<String>,
    #[serde(default)]
    pub carousel_subtitle: Option<String>,
    #[serde(default)]
    pub carousel_description: Option<String>,
    #[serde(default)]
    pub carousel_image: Option<String>,
}

impl ProductPatch {
    /// Shallow-merge into an existing record. The id is never touched.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = &self.price {
            product.price = price.clone();
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if let Some(image) = &self.image {
            product.image = image.clone();
        }
        if let Some(images) = &self.images {
            product.images = Some(images.clone());
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(badge) = self.badge {
            product.badge = Some(badge);
        }
        if let Some(is_promo) = self.is_promo {
            product.is_promo = Some(is_promo);
        }
        if let Some(is_featured) = self.is_featured {
            product.is_featured = is_featured;
        }
        if let Some(title) = &self.carousel_title {
            product.carousel_title = Some(title.clone());
        }
        if let Some(subtitle) = &self.carousel_subtitle {
            product.carousel_subtitle = Some(subtitle.clone());
        }
        if let Some(description) = &self.carousel_description {
            product.carousel_description = Some(description.clone());
        }
        if let Some(image) = &self.carousel_image {
            product.carousel_image = Some(image.clone());
        }
    }
}

fn validate_price(price: &Price) -> Result<(), ValidationError> {
    match price {
        Price::Amount(amount) if *amount < 0.0 => Err(ValidationError::new("price_negative")),
        _ => Ok(()),
    }
}

fn validate_images(images: &Vec<String>) -> Result<(), ValidationError> {
    if images.iter().any(|image| image.trim().is_empty()) {
        return Err(ValidationError::new("image_empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_rejects_empty_name() {
        let draft = ProductDraft {
            category: "Chaussures".into(),
            ..Default::default()
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn draft_rejects_negative_price() {
        let draft = ProductDraft {
            name: "Escarpins".into(),
            category: "Chaussures".into(),
            price: Price::Amount(-5.0),
            ..Default::default()
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn draft_accepts_formatted_price_string() {
        let draft = ProductDraft {
            name: "Escarpins".into(),
            category: "Chaussures".into(),
            price: Price::Text("25 000 FCFA".into()),
            ..Default::default()
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn draft_rejects_blank_gallery_entry() {
        let draft = ProductDraft {
            name: "Escarpins".into(),
            category: "Chaussures".into(),
            images: Some(vec!["/a.png".into(), "  ".into()]),
            ..Default::default()
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn patch_overwrites_present_and_preserves_absent() {
        let mut product = ProductDraft {
            name: "Montre Gold".into(),
            category: "Accessoires".into(),
            price: Price::Amount(18000.0),
            stock: 8,
            ..Default::default()
        }
        .into_product("1".into(), Utc::now());

        let patch = ProductPatch {
            id: "1".into(),
            price: Some(Price::Amount(15000.0)),
            ..Default::default()
        };
        patch.apply_to(&mut product);

        assert_eq!(product.price, Price::Amount(15000.0));
        assert_eq!(product.name, "Montre Gold");
        assert_eq!(product.stock, 8);
    }

    #[test]
    fn badge_round_trips_display_names() {
        let json = serde_json::to_string(&Badge::BestSeller).unwrap();
        assert_eq!(json, "\"Best Seller\"");
        let badge: Badge = serde_json::from_str("\"Nouveau\"").unwrap();
        assert_eq!(badge, Badge::Nouveau);
    }

    #[test]
    fn price_accepts_number_or_string() {
        let amount: Price = serde_json::from_str("25000").unwrap();
        assert_eq!(amount, Price::Amount(25000.0));
        let text: Price = serde_json::from_str("\"25 000 FCFA\"").unwrap();
        assert_eq!(text, Price::Text("25 000 FCFA".into()));
    }
}
