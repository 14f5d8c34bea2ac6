//! Stall name normalisation and the non-food exclusion list.
//!
//! Google Maps lists every unit in a hawker centre, including banks, clinics
//! and shops. Those are not stalls anyone reviews for food, so they are
//! removed from the catalog by keyword before any evaluation happens.

/// Substrings of a normalised stall name that mark a non-food unit
pub const NON_FOOD_KEYWORDS: &[&str] = &[
    "dbs", "atm", "posb", "axs", "polyclinic", "electronic",
    "provision", "trading", "tailoring", "clothing", "wear",
    "bicycle", "florist", "ware", "swim", "sports", "apparel",
    "nhg", "flower", "ntuc", "gym", "kampung", "925", "silver",
    "gold", "money", "department", "watch", "jewel", "hdb",
    "nkf", "tuition", "library", "fitness", "fairprice",
    "supermarket", "mart", "singtel", "hair", "shoe",
    "furniture", "recycling", "phone", "fashion", "post",
    "aquarium", "tcm",
];

/// Lower-case, trim, and keep only `[a-z0-9 ]`.
///
/// Punctuation is removed rather than replaced, so "Ah-Seng's" becomes
/// "ahsengs".
pub fn normalise_text(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect()
}

/// True when a normalised name contains any non-food keyword
pub fn is_non_food(name_norm: &str) -> bool {
    NON_FOOD_KEYWORDS
        .iter()
        .any(|keyword| name_norm.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_text() {
        assert_eq!(normalise_text("  Ah-Seng's Chicken Rice! "), "ahsengs chicken rice");
        assert_eq!(normalise_text("#01-23 Maxwell"), "0123 maxwell");
        assert_eq!(normalise_text(""), "");
    }

    #[test]
    fn test_is_non_food() {
        assert!(is_non_food(&normalise_text("DBS ATM")));
        assert!(is_non_food(&normalise_text("Kim's Fashion")));
        assert!(!is_non_food(&normalise_text("Tian Tian Hainanese Chicken Rice")));
    }

    #[test]
    fn test_keyword_match_is_substring() {
        // "ware" catches "hardware" too
        assert!(is_non_food("hardware shop"));
    }
}
