use serde::{Deserialize, Deserializer};

/// Deserialize a sequence that may have been written as `null`.
///
/// Records written by earlier ledger clients encode an empty list as `null`.
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items: Option<Vec<T>> = Option::deserialize(deserializer)?;
    Ok(items.unwrap_or_default())
}
