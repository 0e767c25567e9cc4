// src/errors.rs

use serde::Serialize;
use thiserror::Error;

/// 适配器产生的错误，按 imp / 按响应收集，不影响其它 imp 的结果
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdapterError {
    /// 请求侧问题：imp.ext 无法解析，或 DSP 返回 400。不重试
    #[error("{0}")]
    BadInput(String),
    /// DSP 侧问题：非 200/204/400 的状态码，可由宿主按策略重试
    #[error("{0}")]
    BadServerResponse(String),
    /// 响应体无法解析
    #[error("failed to decode bid response: {0}")]
    Decode(String),
    /// 单个 imp 的请求体序列化失败
    #[error("failed to encode outbound request: {0}")]
    Encode(String),
}

impl AdapterError {
    pub fn unexpected_status(status_code: u16) -> String {
        format!(
            "Unexpected status code: {}. Run with request.debug = 1 for more info",
            status_code
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AdapterError::BadInput(_) => "bad_input",
            AdapterError::BadServerResponse(_) => "bad_server_response",
            AdapterError::Decode(_) => "decode_failure",
            AdapterError::Encode(_) => "encode_failure",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, AdapterError::BadServerResponse(_))
    }
}

/// API 与日志中使用的错误表示
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl From<&AdapterError> for ErrorBody {
    fn from(err: &AdapterError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
