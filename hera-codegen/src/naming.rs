//! Identifier case conversions used when turning pack names into routes,
//! component names and constants.
//!
//! Pack identifiers arrive in several shapes (`VEHICLE_SALE`, `dealer-ops`,
//! `credit_limit`, `CreditLimit`); all helpers split them into lower-case
//! words first.

/// Split an identifier into lower-case words.
///
/// Separators are `-`, `_`, `.`, `/` and whitespace; a lower-case letter or
/// digit followed by an upper-case letter also starts a new word.
pub fn words(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in s.chars() {
        if matches!(c, '-' | '_' | '.' | '/') || c.is_whitespace() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        let boundary = c.is_uppercase()
            && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
        if boundary && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        current.extend(c.to_lowercase());
        prev = Some(c);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// `VEHICLE_SALE` → `VehicleSale`.
pub fn to_pascal_case(s: &str) -> String {
    words(s).iter().map(|w| capitalize(w)).collect()
}

/// `VEHICLE_SALE` → `vehicle-sale`.
pub fn to_kebab_case(s: &str) -> String {
    words(s).join("-")
}

/// `credit_limit` → `Credit Limit`.
pub fn to_title_case(s: &str) -> String {
    words(s)
        .iter()
        .map(|w| capitalize(w))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_upper_snake() {
        assert_eq!(words("VEHICLE_SALE"), vec!["vehicle", "sale"]);
    }

    #[test]
    fn splits_camel_and_digits() {
        assert_eq!(words("creditLimit2Go"), vec!["credit", "limit2", "go"]);
        assert_eq!(words("Gateway01Hub"), vec!["gateway01", "hub"]);
    }

    #[test]
    fn pascal_case() {
        assert_eq!(to_pascal_case("VEHICLE_SALE"), "VehicleSale");
        assert_eq!(to_pascal_case("dealer-ops"), "DealerOps");
        assert_eq!(to_pascal_case("CUSTOMER"), "Customer");
    }

    #[test]
    fn kebab_case() {
        assert_eq!(to_kebab_case("VEHICLE_SALE"), "vehicle-sale");
        assert_eq!(to_kebab_case("dealer-ops"), "dealer-ops");
        assert_eq!(to_kebab_case(""), "");
    }

    #[test]
    fn title_case() {
        assert_eq!(to_title_case("credit_limit"), "Credit Limit");
        assert_eq!(to_title_case("VEHICLE_SALE"), "Vehicle Sale");
    }
}
