pub mod adapter_config;
pub mod source;

pub use adapter_config::{AdapterConfig, ForwardedForPolicy};
pub use source::{ConfigSource, FileConfigSource, StaticConfigSource};
