//! Field deserializers that degrade instead of failing.
//!
//! Catalog rows and model output are not under our control. A bad optional
//! field turns into "absent" so the rest of the row survives.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Either a value of `T` or anything else, which is discarded.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum Lenient<T> {
    Valid(T),
    Invalid(#[allow(dead_code)] IgnoredAny),
}

impl<T> Lenient<T> {
    pub(crate) fn into_option(self) -> Option<T> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Invalid(_) => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Int(i64),
    Float(f64),
    Text(String),
    Invalid(#[allow(dead_code)] IgnoredAny),
}

impl Number {
    fn into_i64(self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(n),
            Self::Float(f) if f.is_finite() => Some(f.round() as i64),
            Self::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.round() as i64))
            }
            _ => None,
        }
    }
}

/// `T`, or `T::default()` when the value has the wrong shape.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Lenient::<T>::deserialize(deserializer)?
        .into_option()
        .unwrap_or_default())
}

/// `Some(T)`, or `None` for null or a value of the wrong shape.
pub fn or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Lenient::<T>::deserialize(deserializer)?.into_option())
}

/// Integer from an integer, a float (rounded) or a numeric string.
pub fn int_or_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Number::deserialize(deserializer)?.into_i64())
}

/// Percentage in `[0, 100]` from any numeric shape; out-of-range values clamp.
pub fn percent_or_none<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(int_or_none(deserializer)?.map(|n| n.clamp(0, 100) as u8))
}

/// Finite float, or `None`.
pub fn float_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(or_none::<D, f64>(deserializer)?.filter(|f| f.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "int_or_none")]
        n: Option<i64>,
        #[serde(default, deserialize_with = "percent_or_none")]
        pct: Option<u8>,
        #[serde(default, deserialize_with = "or_none")]
        small: Option<u8>,
    }

    fn row(json: &str) -> Row {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn numbers_in_any_shape() {
        assert_eq!(row(r#"{"n": 2}"#).n, Some(2));
        assert_eq!(row(r#"{"n": 2.0}"#).n, Some(2));
        assert_eq!(row(r#"{"n": 2.6}"#).n, Some(3));
        assert_eq!(row(r#"{"n": " 4 "}"#).n, Some(4));
        assert_eq!(row(r#"{"n": "soon"}"#).n, None);
        assert_eq!(row(r#"{"n": null}"#).n, None);
        assert_eq!(row(r#"{"n": [1]}"#).n, None);
    }

    #[test]
    fn percent_clamps() {
        assert_eq!(row(r#"{"pct": 120}"#).pct, Some(100));
        assert_eq!(row(r#"{"pct": 87.5}"#).pct, Some(88));
        assert_eq!(row(r#"{"pct": -3}"#).pct, Some(0));
    }

    #[test]
    fn wrong_shape_is_absent() {
        assert_eq!(row(r#"{"small": 4}"#).small, Some(4));
        assert_eq!(row(r#"{"small": 4.5}"#).small, None);
        assert_eq!(row(r#"{"small": 300}"#).small, None);
        assert_eq!(row(r#"{"small": "4"}"#).small, None);
    }
}
