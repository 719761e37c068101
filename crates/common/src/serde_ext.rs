use serde::{Deserialize, Deserializer};

/// Deserialize an explicit `null` the same as a missing field.
///
/// Documents written by other encoders store empty lists and maps as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
