//! Storefront views over normalized products: search, category filter and
//! featured ordering.

use std::cmp::Ordering;

use richview_core::Product;

/// Category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

pub const DEFAULT_FEATURED_COUNT: usize = 3;

/// Filters by a case-insensitive substring of name or category, then by
/// exact category unless `category` is `None` or `"all"`.
#[must_use]
pub fn filter_products<'a>(
    products: &'a [Product],
    query: &str,
    category: Option<&str>,
) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    let category = category
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES);

    products
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.category.to_lowercase().contains(&needle)
        })
        .filter(|p| category.is_none_or(|c| p.category == c))
        .collect()
}

/// `"all"` followed by each distinct category in first-seen order.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut out = vec![ALL_CATEGORIES.to_owned()];
    for product in products {
        if !out.iter().any(|c| *c == product.category) {
            out.push(product.category.clone());
        }
    }
    out
}

/// The first `count` products ordered by `position`; products without a
/// position keep their listing order after those with one.
#[must_use]
pub fn featured(products: &[Product], count: usize) -> Vec<&Product> {
    let mut ordered: Vec<&Product> = products.iter().collect();
    ordered.sort_by(|a, b| match (a.position, b.position) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ordered.truncate(count);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn product(id: &str, name: &str, category: &str, position: Option<f64>) -> Product {
        Product {
            id: id.to_owned(),
            name: name.to_owned(),
            description: String::new(),
            price: 1000,
            currency: "NGN".to_owned(),
            image: None,
            badge: "Sale".to_owned(),
            rating: 4.5,
            category: category.to_owned(),
            position,
            metadata: Map::new(),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("1", "Denim Jacket", "Outerwear", Some(3.0)),
            product("2", "Ankara Dress", "Dresses", None),
            product("3", "Leather Jacket", "Outerwear", Some(1.0)),
            product("4", "Silk Scarf", "Accessories", Some(2.0)),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn query_matches_name_or_category_case_insensitively() {
        let products = catalog();
        assert_eq!(ids(&filter_products(&products, "JACKET", None)), vec!["1", "3"]);
        assert_eq!(ids(&filter_products(&products, "dress", None)), vec!["2"]);
    }

    #[test]
    fn category_filter_and_all() {
        let products = catalog();
        assert_eq!(
            ids(&filter_products(&products, "", Some("Outerwear"))),
            vec!["1", "3"]
        );
        assert_eq!(filter_products(&products, "", Some("all")).len(), 4);
        assert_eq!(filter_products(&products, "  ", None).len(), 4);
        assert!(filter_products(&products, "scarf", Some("Outerwear")).is_empty());
    }

    #[test]
    fn categories_in_first_seen_order() {
        assert_eq!(
            categories(&catalog()),
            vec!["all", "Outerwear", "Dresses", "Accessories"]
        );
        assert_eq!(categories(&[]), vec!["all"]);
    }

    #[test]
    fn featured_sorts_by_position_missing_last() {
        let products = catalog();
        assert_eq!(ids(&featured(&products, 3)), vec!["3", "4", "1"]);
        assert_eq!(ids(&featured(&products, 10)), vec!["3", "4", "1", "2"]);
        assert!(featured(&products, 0).is_empty());
    }
}
