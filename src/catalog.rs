//! Customer-facing catalog queries.
//!
//! Pure, order-preserving functions over an in-memory snapshot of the
//! collection: section and category filters, Levenshtein fuzzy search, and
//! query-time badge derivation. Nothing here mutates the store; derived
//! badges are never persisted.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::domain::{Badge, Product};

/// Storefront sections the grid can be scoped to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    All,
    New,
    Bestseller,
    Promo,
}

/// Products created within this window show as "Nouveau".
const NEW_BADGE_WINDOW_DAYS: i64 = 7;
/// Maximum edit distance a fuzzy match tolerates.
const MAX_EDIT_DISTANCE: usize = 3;

/// Badge shown for a product: the explicit badge wins, then recency, then
/// the promo flag.
pub fn effective_badge(product: &Product, now: DateTime<Utc>) -> Option<Badge> {
    if product.badge.is_some() {
        return product.badge;
    }
    if let Some(created) = product.created_at {
        if now - created <= Duration::days(NEW_BADGE_WINDOW_DAYS) {
            return Some(Badge::Nouveau);
        }
    }
    if product.is_promo == Some(true) {
        return Some(Badge::Promo);
    }
    None
}

/// Snapshot with derived badges written onto each record.
pub fn with_derived_badges(products: Vec<Product>, now: DateTime<Utc>) -> Vec<Product> {
    products
        .into_iter()
        .map(|mut product| {
            product.badge = effective_badge(&product, now);
            product
        })
        .collect()
}

fn in_grid(product: &Product) -> bool {
    // Carousel entries never show in the grid.
    !product.is_featured && product.category != "Featured"
}

pub fn filter_by_section(products: Vec<Product>, section: Section) -> Vec<Product> {
    products
        .into_iter()
        .filter(in_grid)
        .filter(|p| match section {
            Section::All => true,
            Section::New => p.badge == Some(Badge::Nouveau),
            Section::Bestseller => p.badge == Some(Badge::BestSeller),
            Section::Promo => p.badge == Some(Badge::Promo) || p.is_promo == Some(true),
        })
        .collect()
}

/// Exact category match, with two synthetic categories that select on the
/// badge instead: "Mieux Noté" and "Nouveautés". "Tout" (or empty) passes
/// everything through.
pub fn filter_by_category(products: Vec<Product>, category: &str) -> Vec<Product> {
    products
        .into_iter()
        .filter(in_grid)
        .filter(|p| match category {
            "" | "Tout" => true,
            "Mieux Noté" => p.badge == Some(Badge::BestSeller),
            "Nouveautés" => p.badge == Some(Badge::Nouveau),
            other => p.category == other,
        })
        .collect()
}

/// Substring-or-bounded-edit-distance match over name and category. The
/// empty query matches everything.
pub fn fuzzy_search(products: Vec<Product>, query: &str) -> Vec<Product> {
    let query = query.to_lowercase();
    if query.is_empty() {
        return products;
    }
    let query_len = query.chars().count();

    products
        .into_iter()
        .filter(|p| {
            let name = p.name.to_lowercase();
            let category = p.category.to_lowercase();

            if name.contains(&query) || (!category.is_empty() && category.contains(&query)) {
                return true;
            }

            // Tolerate misspellings against a name prefix at least two
            // characters longer than the query.
            let window_len = usize::max(query_len + 2, name.chars().count());
            let window: String = name.chars().take(window_len).collect();
            if levenshtein(&query, &window) <= MAX_EDIT_DISTANCE {
                return true;
            }

            !category.is_empty() && levenshtein(&query, &category) <= MAX_EDIT_DISTANCE
        })
        .collect()
}

/// Classic dynamic-programming edit distance over characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());
    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut matrix = vec![vec![0usize; m + 1]; n + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }
    for i in 1..=n {
        for j in 1..=m {
            matrix[i][j] = if b[i - 1] == a[j - 1] {
                matrix[i - 1][j - 1]
            } else {
                1 + matrix[i - 1][j - 1]
                    .min(matrix[i][j - 1])
                    .min(matrix[i - 1][j])
            };
        }
    }
    matrix[n][m]
}

/// The full listing pipeline: badges derived once, then section, category,
/// and search predicates ANDed in that order.
pub fn search(products: Vec<Product>, section: Section, category: &str, query: &str) -> Vec<Product> {
    let snapshot = with_derived_badges(products, Utc::now());
    fuzzy_search(
        filter_by_category(filter_by_section(snapshot, section), category),
        query,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str, category: &str) -> Product {
        Product {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn levenshtein_reference_value() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    #[test]
    fn levenshtein_degenerate_cases() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("sac", "sac"), 0);
    }

    #[test]
    fn empty_query_is_identity() {
        let products = vec![
            product("1", "Escarpins Nubuck", "Chaussures"),
            product("2", "Sac Wax Premium", "Accessoires"),
        ];
        let result = fuzzy_search(products.clone(), "");
        assert_eq!(ids(&result), ids(&products));
    }

    #[test]
    fn exact_name_always_matches_case_insensitive() {
        let products = vec![product("1", "Montre Gold Luxury", "Accessoires")];
        let result = fuzzy_search(products, "MONTRE GOLD LUXURY");
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn misspelled_query_matches_category() {
        let products = vec![product("1", "Escarpins Nubuck", "Chaussures")];
        // Two edits away from "chaussures".
        let result = fuzzy_search(products, "chausure");
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn unrelated_query_matches_nothing() {
        let products = vec![product("1", "Escarpins Nubuck", "Chaussures")];
        assert!(fuzzy_search(products, "ordinateur portable").is_empty());
    }

    #[test]
    fn category_filter_exact_match() {
        let collection = vec![product("1", "Escarpins Nubuck", "Chaussures")];
        assert_eq!(filter_by_category(collection.clone(), "Chaussures").len(), 1);
        assert!(filter_by_category(collection, "Accessoires").is_empty());
    }

    #[test]
    fn synthetic_categories_select_on_badge() {
        let mut best = product("1", "Mocassins Dorés", "Chaussures");
        best.badge = Some(Badge::BestSeller);
        let mut fresh = product("2", "Rideaux Salon", "Maison");
        fresh.badge = Some(Badge::Nouveau);
        let plain = product("3", "Parure de Draps", "Maison");
        let collection = vec![best, fresh, plain];

        assert_eq!(ids(&filter_by_category(collection.clone(), "Mieux Noté")), ["1"]);
        assert_eq!(ids(&filter_by_category(collection.clone(), "Nouveautés")), ["2"]);
        assert_eq!(filter_by_category(collection, "Tout").len(), 3);
    }

    #[test]
    fn section_filters_select_on_badge_or_promo_flag() {
        let mut fresh = product("1", "A", "Maison");
        fresh.badge = Some(Badge::Nouveau);
        let mut best = product("2", "B", "Maison");
        best.badge = Some(Badge::BestSeller);
        let mut flagged = product("3", "C", "Maison");
        flagged.is_promo = Some(true);
        let collection = vec![fresh, best, flagged];

        assert_eq!(ids(&filter_by_section(collection.clone(), Section::New)), ["1"]);
        assert_eq!(ids(&filter_by_section(collection.clone(), Section::Bestseller)), ["2"]);
        assert_eq!(ids(&filter_by_section(collection.clone(), Section::Promo)), ["3"]);
        assert_eq!(filter_by_section(collection, Section::All).len(), 3);
    }

    #[test]
    fn featured_products_never_reach_the_grid() {
        let mut featured = product("1", "Slide Héro", "Chaussures");
        featured.is_featured = true;
        featured.badge = Some(Badge::BestSeller);
        let literal = product("2", "Ancien Slide", "Featured");
        let collection = vec![featured, literal];

        assert!(filter_by_section(collection.clone(), Section::All).is_empty());
        assert!(filter_by_category(collection.clone(), "Tout").is_empty());
        assert!(filter_by_category(collection, "Chaussures").is_empty());
    }

    #[test]
    fn explicit_badge_wins_over_derivation() {
        let mut p = product("1", "A", "Maison");
        p.badge = Some(Badge::BestSeller);
        p.created_at = Some(Utc::now());
        assert_eq!(effective_badge(&p, Utc::now()), Some(Badge::BestSeller));
    }

    #[test]
    fn recent_products_derive_nouveau() {
        let now = Utc::now();
        let mut p = product("1", "A", "Maison");
        p.created_at = Some(now - Duration::days(2));
        assert_eq!(effective_badge(&p, now), Some(Badge::Nouveau));
    }

    #[test]
    fn old_promo_products_derive_promo() {
        let now = Utc::now();
        let mut p = product("1", "A", "Maison");
        p.created_at = Some(now - Duration::days(30));
        p.is_promo = Some(true);
        assert_eq!(effective_badge(&p, now), Some(Badge::Promo));

        p.is_promo = None;
        assert_eq!(effective_badge(&p, now), None);
    }

    #[test]
    fn search_composes_and_preserves_order() {
        let now = Utc::now();
        let mut newer = product("1", "Escarpins Nubuck", "Chaussures");
        newer.created_at = Some(now - Duration::days(1));
        let mut older = product("2", "Escarpins Classiques", "Chaussures");
        older.created_at = Some(now - Duration::days(2));
        let mut other = product("3", "Sac Wax", "Accessoires");
        other.created_at = Some(now - Duration::days(1));

        let result = search(vec![newer, older, other], Section::New, "Chaussures", "escarpins");
        assert_eq!(ids(&result), ["1", "2"]);
    }
}
