//! Distinguish an absent JSON key from an explicit `null` on partial updates.
//!
//! Use with `#[serde(default, deserialize_with = "crate::shared::nullable::double_option")]`
//! on an `Option<Option<T>>` field:
//!
//! | JSON             | Value            |
//! |------------------|------------------|
//! | key missing      | `None`           |
//! | `"key": null`    | `Some(None)`     |
//! | `"key": value`   | `Some(Some(v))`  |

use serde::{Deserialize, Deserializer};

pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Split a double option into "should the column change" and the new value
pub fn split<T>(value: Option<Option<T>>) -> (bool, Option<T>) {
    match value {
        Some(inner) => (true, inner),
        None => (false, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        note: Option<Option<String>>,
    }

    #[test]
    fn test_absent_null_and_value() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.note, None);

        let null: Patch = serde_json::from_str(r#"{"note": null}"#).unwrap();
        assert_eq!(null.note, Some(None));

        let value: Patch = serde_json::from_str(r#"{"note": "hi"}"#).unwrap();
        assert_eq!(value.note, Some(Some("hi".to_string())));
    }

    #[test]
    fn test_split() {
        assert_eq!(split::<i32>(None), (false, None));
        assert_eq!(split::<i32>(Some(None)), (true, None));
        assert_eq!(split(Some(Some(7))), (true, Some(7)));
    }
}
