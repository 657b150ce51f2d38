//! Identifier normalization for CRM metadata lookups
//!
//! Reporting dashboards hand over a mix of raw numeric keys, compound
//! `day`/`campaign`-qualified keys and prefixed string keys from different
//! UI contexts. The CRM endpoints want plain integer ids, so everything is
//! funneled through [`normalize_ids`] before a request body is built.

use std::collections::BTreeSet;

/// A raw identifier as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdToken {
    Number(i64),
    Text(String),
}

impl From<i64> for IdToken {
    fn from(value: i64) -> Self {
        IdToken::Number(value)
    }
}

impl From<i32> for IdToken {
    fn from(value: i32) -> Self {
        IdToken::Number(value.into())
    }
}

impl From<u32> for IdToken {
    fn from(value: u32) -> Self {
        IdToken::Number(value.into())
    }
}

impl From<&str> for IdToken {
    fn from(value: &str) -> Self {
        IdToken::Text(value.to_string())
    }
}

impl From<String> for IdToken {
    fn from(value: String) -> Self {
        IdToken::Text(value)
    }
}

/// Which prefixed key family a normalization run accepts.
///
/// The `field_cf_group_` prefix is a superstring of `field_`, so the
/// `Field` namespace must explicitly reject group tokens or it would
/// misread `field_cf_group_7` as field 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdNamespace {
    Field,
    FieldGroup,
}

const FIELD_PREFIX: &str = "field_";
const FIELD_GROUP_PREFIX: &str = "field_cf_group_";

impl IdNamespace {
    /// Key prefix this namespace strips.
    pub const fn prefix(self) -> &'static str {
        match self {
            IdNamespace::Field => FIELD_PREFIX,
            IdNamespace::FieldGroup => FIELD_GROUP_PREFIX,
        }
    }

    fn accepts(self, token: &str) -> bool {
        match self {
            IdNamespace::Field => {
                token.starts_with(FIELD_PREFIX) && !token.starts_with(FIELD_GROUP_PREFIX)
            }
            IdNamespace::FieldGroup => token.starts_with(FIELD_GROUP_PREFIX),
        }
    }
}

/// Reconcile mixed-format identifier tokens into a deduplicated integer set.
///
/// Rules, applied per token:
/// - numeric tokens pass through;
/// - tokens splitting on `_` into all-numeric parts yield their first part
///   (compound keys encode the real id as the leading segment);
/// - tokens carrying the namespace prefix yield the first segment after it;
/// - everything else is silently dropped.
pub fn normalize_ids<I>(tokens: I, namespace: IdNamespace) -> BTreeSet<i64>
where
    I: IntoIterator,
    I::Item: Into<IdToken>,
{
    let mut ids = BTreeSet::new();
    for token in tokens {
        match token.into() {
            IdToken::Number(id) => {
                ids.insert(id);
            }
            IdToken::Text(text) => {
                if let Some(id) = normalize_text(&text, namespace) {
                    ids.insert(id);
                }
            }
        }
    }
    ids
}

fn normalize_text(token: &str, namespace: IdNamespace) -> Option<i64> {
    if is_numeric(token) {
        return token.parse().ok();
    }

    if token.split('_').all(is_numeric) {
        return token.split('_').next()?.parse().ok();
    }

    if namespace.accepts(token) {
        let rest = &token[namespace.prefix().len()..];
        return rest.split('_').next().filter(|s| is_numeric(s))?.parse().ok();
    }

    None
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(tokens: &[&str]) -> BTreeSet<i64> {
        normalize_ids(tokens.iter().copied(), IdNamespace::Field)
    }

    fn group(tokens: &[&str]) -> BTreeSet<i64> {
        normalize_ids(tokens.iter().copied(), IdNamespace::FieldGroup)
    }

    fn ids(values: &[i64]) -> BTreeSet<i64> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_plain_numbers_pass_through() {
        assert_eq!(
            normalize_ids([1i64, 2, 3], IdNamespace::Field),
            ids(&[1, 2, 3])
        );
        assert_eq!(field(&["1", "2", "3"]), ids(&[1, 2, 3]));
    }

    #[test]
    fn test_prefixed_field_tokens() {
        assert_eq!(field(&["field_1", "field_2"]), ids(&[1, 2]));
    }

    #[test]
    fn test_compound_numeric_tokens_take_first_part() {
        assert_eq!(field(&["1_2", "2_4"]), ids(&[1, 2]));
        assert_eq!(field(&["field_1_2", "field_2_4"]), ids(&[1, 2]));
        assert_eq!(
            field(&["field_1_2_11", "field_2_4_11", "field_3_6_11"]),
            ids(&[1, 2, 3])
        );
    }

    #[test]
    fn test_field_namespace_rejects_group_tokens() {
        assert_eq!(
            field(&["field_cf_group_1_2_11", "field_2", "field_3"]),
            ids(&[2, 3])
        );
    }

    #[test]
    fn test_group_namespace_accepts_only_group_tokens() {
        assert_eq!(
            group(&["field_cf_group_1", "field_2", "field_3", "field_cf_group_4"]),
            ids(&[1, 4])
        );
        assert_eq!(group(&["field_cf_group_7_2"]), ids(&[7]));
    }

    #[test]
    fn test_unrecognized_tokens_dropped_silently() {
        assert_eq!(field(&["banner", "field_x", "", "x_1"]), ids(&[]));
        assert_eq!(group(&["field_cf_group_"]), ids(&[]));
    }

    #[test]
    fn test_duplicates_collapse() {
        let tokens: Vec<IdToken> = vec![
            IdToken::from(1i64),
            IdToken::from("1"),
            IdToken::from("field_1"),
            IdToken::from("1_9"),
        ];
        assert_eq!(normalize_ids(tokens, IdNamespace::Field), ids(&[1]));
    }

    #[test]
    fn test_mixed_number_and_text_tokens() {
        let tokens: Vec<IdToken> = vec![IdToken::from(7i64), IdToken::from("8_2")];
        assert_eq!(normalize_ids(tokens, IdNamespace::Field), ids(&[7, 8]));
    }
}
