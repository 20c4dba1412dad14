//! Category identity resolution
//!
//! Several overlapping identifier schemes grew organically in the stored
//! data: backend-assigned store ids, author-supplied canonical tags,
//! display names (sometimes lowercased), and one legacy literal. Every
//! equality decision in the workspace routes through [`matches`] and every
//! tag written back to a product routes through [`canonical_identifier`],
//! so the read side and write side can never drift apart.
//!
//! Matching is exact-match only. Fuzzy synonym tables (e.g. "watch" ~
//! "smartwatch") were tried and produced false positives; they are gone
//! for good.

use shared::models::Category;

/// Display name of the one category with a bespoke tag mapping.
pub const TODAYS_OFFERS_NAME: &str = "Today's Offers";

/// Legacy literal tag for Today's Offers. Stored product data predates
/// backend-assigned ids, so this exact string must keep round-tripping.
pub const TODAYS_OFFERS_TAG: &str = "today offer";

/// Decide whether a raw product tag denotes the given category.
///
/// The checks are independent, so their order does not affect the result:
/// canonical tag, store id, the Today's-Offers special case, then
/// case-insensitive display name equality.
pub fn matches(category: &Category, tag: &str) -> bool {
    if let Some(canonical) = &category.canonical_tag
        && canonical == tag
    {
        return true;
    }
    if let Some(id) = &category.id
        && id == tag
    {
        return true;
    }
    if category.name == TODAYS_OFFERS_NAME && tag == TODAYS_OFFERS_TAG {
        return true;
    }
    tag.to_lowercase() == category.name.to_lowercase()
}

/// The one identifier written back into product tag lists for this
/// category.
///
/// Today's Offers always serializes as the legacy literal regardless of
/// its store id or canonical tag. Otherwise: canonical tag if present,
/// else store id, else a slug of the name (only reachable for
/// unpersisted drafts).
pub fn canonical_identifier(category: &Category) -> String {
    if category.name == TODAYS_OFFERS_NAME {
        return TODAYS_OFFERS_TAG.to_string();
    }
    if let Some(canonical) = &category.canonical_tag {
        return canonical.clone();
    }
    if let Some(id) = &category.id {
        return id.clone();
    }
    slugify(&category.name)
}

/// Derive a tag slug from a display name: lowercase, runs of
/// non-alphanumeric characters collapsed to a single `-`, no leading or
/// trailing separator.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_sep = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: Some(id.to_string()),
            canonical_tag: None,
            name: name.to_string(),
            color: String::new(),
            image: String::new(),
            description: String::new(),
            is_special: false,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn matches_canonical_tag_first() {
        let mut cat = category("abc123", "Nike");
        cat.canonical_tag = Some("nike".to_string());
        assert!(matches(&cat, "nike"));
        assert!(matches(&cat, "abc123"));
        assert!(matches(&cat, "Nike"));
        assert!(matches(&cat, "NIKE"));
        assert!(!matches(&cat, "nik"));
    }

    #[test]
    fn matches_store_id() {
        let cat = category("c1", "Nike");
        assert!(matches(&cat, "c1"));
        assert!(!matches(&cat, "c2"));
    }

    #[test]
    fn no_fuzzy_or_substring_matching() {
        let watches = category("w1", "Watches");
        assert!(!matches(&watches, "watch"));
        assert!(!matches(&watches, "smartwatches"));
        assert!(!matches(&watches, "watches ")); // no trimming either
    }

    #[test]
    fn distinct_categories_never_share_a_tag() {
        let nike = category("c1", "Nike");
        let adidas = category("c2", "Adidas");
        for tag in ["c1", "c2", "nike", "adidas", "Nike", "Adidas", "sneaker"] {
            assert!(
                !(matches(&nike, tag) && matches(&adidas, tag)),
                "tag {tag:?} matched both"
            );
        }
    }

    #[test]
    fn todays_offers_legacy_literal() {
        // No canonical tag and a store id that looks nothing like the
        // literal: the special-case table still has to hit.
        let cat = category("abc123", TODAYS_OFFERS_NAME);
        assert!(matches(&cat, TODAYS_OFFERS_TAG));
        assert_eq!(canonical_identifier(&cat), TODAYS_OFFERS_TAG);
    }

    #[test]
    fn canonical_identifier_prefers_canonical_tag() {
        let mut cat = category("abc123", "Nike");
        assert_eq!(canonical_identifier(&cat), "abc123");
        cat.canonical_tag = Some("nike".to_string());
        assert_eq!(canonical_identifier(&cat), "nike");
    }

    #[test]
    fn canonical_identifier_round_trips_through_matches() {
        let cats = [
            category("c1", "Nike"),
            {
                let mut c = category("c2", "Shoes");
                c.canonical_tag = Some("shoes".to_string());
                c
            },
            category("c3", TODAYS_OFFERS_NAME),
        ];
        for cat in &cats {
            let ident = canonical_identifier(cat);
            assert!(matches(cat, &ident), "own identifier must match: {ident}");
        }
    }

    #[test]
    fn slugify_collapses_runs() {
        assert_eq!(slugify("Today's Offers"), "today-s-offers");
        assert_eq!(slugify("Out of Stock"), "out-of-stock");
        assert_eq!(slugify("  Shoes  "), "shoes");
        assert_eq!(slugify("A--B__C"), "a-b-c");
        assert_eq!(slugify("!!!"), "");
    }
}
