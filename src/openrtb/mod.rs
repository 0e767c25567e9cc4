pub mod request;
pub mod response;

use serde::{Deserialize, Deserializer};

/// 显式的 `null` 与缺省字段同样处理，取类型默认值
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
