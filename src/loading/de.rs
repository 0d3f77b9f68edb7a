//! Lenient deserializers for feed fields that arrive in more than one shape.

use serde::{Deserialize, Deserializer};

/// Route lists appear either as a comma-separated string or as an array.
pub(super) fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::One(joined) => joined
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        Raw::Many(items) => items,
    })
}

/// Coordinates appear as JSON numbers or quoted strings. Unparseable text
/// becomes NaN and is dropped by the plausibility filter downstream.
pub(super) fn flexible_float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Num(value) => value,
        Raw::Text(text) => text.trim().parse().unwrap_or(f64::NAN),
    })
}
