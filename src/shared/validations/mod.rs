use crate::shared::types::{PageRequest, MAX_OFFSET, MAX_PAGE_LIMIT};

/// Page below 1 becomes 1; a limit outside 1..=100 falls back to `default_limit`.
///
/// The page is capped so that its offset still fits a signed 64-bit bind
/// parameter; such a page is simply empty.
pub fn validate_pagination(page: Option<i64>, limit: Option<i64>, default_limit: u64) -> PageRequest {
    let limit = match limit {
        Some(l) if l >= 1 && l as u64 <= MAX_PAGE_LIMIT => l as u64,
        _ => default_limit.clamp(1, MAX_PAGE_LIMIT),
    };
    let last_page = MAX_OFFSET / limit + 1;
    let page = match page {
        Some(p) if p >= 1 => (p as u64).min(last_page),
        _ => 1,
    };
    PageRequest { page, limit }
}

/// "toyota  corolla" -> "Toyota Corolla"
pub fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn normalize_plate(value: &str) -> String {
    value.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_bounds() {
        assert_eq!(
            validate_pagination(None, None, 10),
            PageRequest { page: 1, limit: 10 }
        );
        assert_eq!(
            validate_pagination(Some(0), Some(0), 10),
            PageRequest { page: 1, limit: 10 }
        );
        assert_eq!(
            validate_pagination(Some(-3), Some(101), 10),
            PageRequest { page: 1, limit: 10 }
        );
        assert_eq!(
            validate_pagination(Some(4), Some(100), 10),
            PageRequest { page: 4, limit: 100 }
        );
    }

    #[test]
    fn huge_page_is_capped_to_a_representable_offset() {
        let page = validate_pagination(Some(i64::MAX), Some(100), 10);
        assert_eq!(page.limit, 100);
        assert_eq!(page.page, MAX_OFFSET / 100 + 1);
        assert!(page.offset() <= MAX_OFFSET);
        assert!(i64::try_from(page.offset()).is_ok());

        let page = validate_pagination(Some(1_152_921_504_606_846_976), Some(10), 10);
        assert!(i64::try_from(page.offset()).is_ok());

        let page = validate_pagination(Some(i64::MAX), Some(1), 10);
        assert_eq!(page.page, i64::MAX as u64);
        assert_eq!(page.offset(), MAX_OFFSET - 1);
    }

    #[test]
    fn title_case_normalizes_words() {
        assert_eq!(title_case("toyota  corolla"), "Toyota Corolla");
        assert_eq!(title_case("OIL change"), "Oil Change");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn plate_is_upper_cased() {
        assert_eq!(normalize_plate(" b 1234 xyz "), "B 1234 XYZ");
    }
}
