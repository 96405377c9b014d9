use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Offset pagination as `skip`/`take` query parameters. Values arrive as
/// strings when the struct is flattened into urlencoded query params, so
/// both fields go through the lenient deserializer.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PageParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub skip: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub take: Option<i64>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            skip: Some(0),
            take: Some(10),
        }
    }
}

impl PageParams {
    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0).max(0)
    }

    pub fn take(&self) -> i64 {
        self.take.unwrap_or(10).clamp(0, 100)
    }
}
