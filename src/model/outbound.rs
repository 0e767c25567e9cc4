// src/model/outbound.rs

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::model::ext::EndpointType;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
}

impl EndpointType {
    pub fn http_method(&self) -> Method {
        if self.is_tag_endpoint() {
            Method::Get
        } else {
            Method::Post
        }
    }
}

/// 构造请求时确定的上下文，响应阶段直接沿用，不再重新解析 imp.ext
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub imp_id: String,
    pub mode: EndpointType,
    /// imp.ext 中的 floor_price，未提供时为 None
    #[serde(default)]
    pub floor_price: Option<f64>,
}

/// 交给宿主去发送的出站 HTTP 请求描述
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: Method,
    pub uri: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub context: RequestContext,
}

/// DSP 返回的原始 HTTP 响应
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResponseData {
    pub status_code: u16,
    #[serde(default)]
    pub body: String,
}
