use serde::{Serialize, Deserialize};
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AdapterError;

/// **一次转换调用的审计日志**
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TranslationLog {
    pub timestamp: String,        // 记录时间
    pub translation_id: String,   // 本次调用的唯一标识
    pub log_type: String,         // "make_requests" 或 "make_bids"
    pub request_id: String,       // OpenRTB `BidRequest.id`
    pub imp_count: usize,         // 请求中的 imp 数量
    pub outbound_count: usize,    // 生成的出站请求数量
    pub bid_count: usize,         // 标准化后的出价数量
    pub modes: Vec<String>,       // 涉及的 endpoint 类型
    pub errors: Vec<String>,      // 错误类型
    pub status: String,           // "success" / "partial" / "failure" / "no_bid"
}

impl TranslationLog {
    pub fn new(log_type: &str, request_id: &str, imp_count: usize) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            translation_id: Uuid::new_v4().to_string(),
            log_type: log_type.to_string(),
            request_id: request_id.to_string(),
            imp_count,
            outbound_count: 0,
            bid_count: 0,
            modes: Vec::new(),
            errors: Vec::new(),
            status: "success".to_string(),
        }
    }

    /// **记录出站请求使用的 endpoint 类型**
    pub fn add_mode(&mut self, mode: &str) {
        let mode = if mode.is_empty() { "STANDARD" } else { mode };
        if !self.modes.iter().any(|m| m == mode) {
            self.modes.push(mode.to_string());
        }
    }

    /// **记录错误，并据此更新状态**
    pub fn add_errors(&mut self, errors: &[AdapterError]) {
        self.errors.extend(errors.iter().map(|e| e.kind().to_string()));
        self.refresh_status();
    }

    pub fn set_outbound_count(&mut self, count: usize) {
        self.outbound_count = count;
        self.refresh_status();
    }

    pub fn set_bid_count(&mut self, count: usize) {
        self.bid_count = count;
        self.refresh_status();
    }

    fn refresh_status(&mut self) {
        let produced = self.outbound_count + self.bid_count;
        self.status = match (self.errors.is_empty(), produced > 0) {
            (true, true) => "success",
            (true, false) if self.log_type == "make_bids" => "no_bid",
            (true, false) => "success",
            (false, true) => "partial",
            (false, false) => "failure",
        }
        .to_string();
    }
}
