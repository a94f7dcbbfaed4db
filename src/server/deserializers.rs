use serde::{Deserialize, Deserializer};

// the game client sends ids either as numbers or as strings depending on the screen
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrInt {
    String(String),
    Int(i64),
}

pub fn deserialize_option_string_from_int<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrInt>::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        StringOrInt::String(s) => s,
        StringOrInt::Int(i) => i.to_string(),
    }))
}

// `?page=abc` falls back to the first page instead of rejecting the request
pub fn deserialize_lenient_page<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|value| value.trim().parse::<i64>().ok()))
}

// previous quiz ids come back in whatever form the client stored them
pub fn deserialize_option_ids<'de, D>(deserializer: D) -> Result<Option<Vec<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(values) = Option::<Vec<StringOrInt>>::deserialize(deserializer)? else {
        return Ok(None);
    };
    values
        .into_iter()
        .map(|value| match value {
            StringOrInt::Int(i) => Ok(i),
            StringOrInt::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| serde::de::Error::custom(format!("invalid id `{s}`"))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
