// src/config/source.rs

use std::fs;

use crate::config::AdapterConfig;
use crate::errors::ConfigError;

/// 配置来源
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> Result<AdapterConfig, ConfigError>;
}

/// 从 JSON 文件读取配置
pub struct FileConfigSource {
    pub path: String,
}

impl FileConfigSource {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

impl ConfigSource for FileConfigSource {
    fn load(&self) -> Result<AdapterConfig, ConfigError> {
        let content = fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// 内存中的固定配置，未指定配置文件时使用
pub struct StaticConfigSource(pub AdapterConfig);

impl ConfigSource for StaticConfigSource {
    fn load(&self) -> Result<AdapterConfig, ConfigError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForwardedForPolicy;

    fn write_temp(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn loads_config_from_file() {
        let path = write_temp("infytvhb-ok.json", r#"{"forwarded_for": "prefer_ipv4"}"#);
        let config = FileConfigSource::new(&path).load().unwrap();
        assert_eq!(config.forwarded_for, ForwardedForPolicy::PreferIpv4);
        assert!(config.resolve_macros);
        fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = FileConfigSource::new("/nonexistent/infytvhb.json").load().unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let path = write_temp("infytvhb-bad.json", "{not json");
        let err = FileConfigSource::new(&path).load().unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        fs::remove_file(path).ok();
    }

    #[test]
    fn static_source_returns_its_config() {
        let config = AdapterConfig {
            resolve_macros: false,
            ..Default::default()
        };
        assert_eq!(StaticConfigSource(config.clone()).load().unwrap(), config);
    }
}
