pub mod article;
pub mod doctor;
pub mod user;

use serde::{Deserialize, Deserializer, de};

/// A path segment of the form `<id>.json`, e.g. the `5.json` in
/// `/more-articles/5.json`. The suffix is optional; the id must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonId(pub i32);

impl JsonId {
    fn parse(segment: &str) -> Option<Self> {
        segment
            .strip_suffix(".json")
            .unwrap_or(segment)
            .parse::<i32>()
            .ok()
            .filter(|id| *id > 0)
            .map(JsonId)
    }
}

impl<'de> Deserialize<'de> for JsonId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let segment = String::deserialize(deserializer)?;
        JsonId::parse(&segment)
            .ok_or_else(|| de::Error::custom(format!("invalid id segment `{}`", segment)))
    }
}
