//! Expansion of the packed `name-digit;name-digit;...` category field.

use crate::constants::{CATEGORY_DELIMITER, CATEGORY_SUFFIX_LEN};
use crate::error::{EtlError, Result};

/// Where a packed field came from, for error messages.
#[derive(Debug, Clone, Copy)]
pub struct FieldOrigin<'a> {
    pub file: &'a str,
    pub id: &'a str,
}

impl FieldOrigin<'_> {
    fn invalid(&self, token: &str, reason: impl Into<String>) -> EtlError {
        EtlError::InvalidCategory {
            file: self.file.to_string(),
            id: self.id.to_string(),
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

/// Category names from one packed field: every token with its two-character
/// `-0`/`-1` suffix stripped, in field order.
pub fn category_names(packed: &str, origin: FieldOrigin<'_>) -> Result<Vec<String>> {
    packed
        .split(CATEGORY_DELIMITER)
        .map(|token| token_name(token, origin).map(str::to_string))
        .collect()
}

/// Integer flags from one packed field, positionally aligned with `names`.
///
/// Each value is the token's final character read as an integer. With
/// `check_names` every token's name must also match `names` in order.
pub fn category_values(
    packed: &str,
    names: &[String],
    check_names: bool,
    origin: FieldOrigin<'_>,
) -> Result<Vec<i64>> {
    let tokens: Vec<&str> = packed.split(CATEGORY_DELIMITER).collect();
    if tokens.len() != names.len() {
        return Err(origin.invalid(
            packed,
            format!(
                "expected {} category tokens, found {}",
                names.len(),
                tokens.len()
            ),
        ));
    }

    tokens
        .iter()
        .zip(names)
        .map(|(token, expected)| {
            if check_names {
                let name = token_name(token, origin)?;
                if name != expected {
                    return Err(origin.invalid(
                        token,
                        format!("category '{}' where '{}' was expected", name, expected),
                    ));
                }
            }
            token_value(token, origin)
        })
        .collect()
}

fn token_name<'t>(token: &'t str, origin: FieldOrigin<'_>) -> Result<&'t str> {
    let char_count = token.chars().count();
    if char_count <= CATEGORY_SUFFIX_LEN {
        return Err(origin.invalid(token, "token too short to hold a name and a -digit suffix"));
    }
    let cut = token
        .char_indices()
        .nth(char_count - CATEGORY_SUFFIX_LEN)
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    Ok(&token[..cut])
}

fn token_value(token: &str, origin: FieldOrigin<'_>) -> Result<i64> {
    let last = token
        .chars()
        .last()
        .ok_or_else(|| origin.invalid(token, "empty category token"))?;
    last.to_string()
        .parse::<i64>()
        .map_err(|_| origin.invalid(token, format!("non-numeric category value '{}'", last)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: FieldOrigin<'static> = FieldOrigin {
        file: "categories.csv",
        id: "1",
    };

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn derives_names_in_field_order() {
        let derived = category_names("related-1;offer-0;aid_related-1", ORIGIN).unwrap();
        assert_eq!(derived, names(&["related", "offer", "aid_related"]));
    }

    #[test]
    fn k_tokens_yield_k_values() {
        let header = names(&["related", "offer", "aid_related"]);
        let values = category_values("related-1;offer-0;aid_related-1", &header, false, ORIGIN).unwrap();
        assert_eq!(values, vec![1, 0, 1]);
    }

    #[test]
    fn any_integer_digit_is_accepted() {
        // The real dataset carries `related-2` rows; the digit is kept as-is
        let header = names(&["related"]);
        assert_eq!(category_values("related-2", &header, false, ORIGIN).unwrap(), vec![2]);
    }

    #[test]
    fn token_without_digit_suffix_is_rejected() {
        let header = names(&["related", "offer"]);
        let err = category_values("related;offer-0", &header, false, ORIGIN).unwrap_err();
        match err {
            EtlError::InvalidCategory { token, file, id, .. } => {
                assert_eq!(token, "related");
                assert_eq!(file, "categories.csv");
                assert_eq!(id, "1");
            }
            other => panic!("expected InvalidCategory, got {:?}", other),
        }
    }

    #[test]
    fn token_count_mismatch_is_rejected() {
        let header = names(&["related", "offer"]);
        let err = category_values("related-1", &header, false, ORIGIN).unwrap_err();
        assert!(err.to_string().contains("expected 2 category tokens, found 1"));
    }

    #[test]
    fn name_check_only_applies_when_enabled() {
        let header = names(&["related", "offer"]);
        assert_eq!(
            category_values("offer-1;related-0", &header, false, ORIGIN).unwrap(),
            vec![1, 0]
        );
        let err = category_values("offer-1;related-0", &header, true, ORIGIN).unwrap_err();
        assert!(err.to_string().contains("category 'offer' where 'related' was expected"));
    }

    #[test]
    fn short_tokens_cannot_name_a_category() {
        assert!(category_names("related-1;-1", ORIGIN).is_err());
        assert!(category_names("", ORIGIN).is_err());
    }

    #[test]
    fn multibyte_names_are_sliced_on_char_boundaries() {
        assert_eq!(category_names("aidé-1", ORIGIN).unwrap(), names(&["aidé"]));
    }
}
