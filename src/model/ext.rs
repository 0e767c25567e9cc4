// src/model/ext.rs

use serde::{Serialize, Deserialize};

use crate::openrtb::null_as_default;

/// imp.ext 的外层信封，bidder 下才是 InfyTV 自己的参数
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ExtImpBidder {
    pub bidder: serde_json::Value,
}

/// DSP 接入方式。
/// 同一个值既决定出站请求的 HTTP 方法，也决定响应的解析方式。
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(from = "Option<String>", into = "String")]
pub enum EndpointType {
    /// 返回 VAST XML 的广告标签地址
    VastUrl,
    /// Google Ad Manager 广告标签
    Gam,
    /// 标准 OpenRTB 竞价接口
    #[default]
    Standard,
}

impl EndpointType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointType::VastUrl => "VAST_URL",
            EndpointType::Gam => "GAM",
            EndpointType::Standard => "",
        }
    }

    /// VAST_URL 与 GAM 是标签服务器，只接受 GET
    pub fn is_tag_endpoint(&self) -> bool {
        matches!(self, EndpointType::VastUrl | EndpointType::Gam)
    }
}

impl From<Option<String>> for EndpointType {
    fn from(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("VAST_URL") => EndpointType::VastUrl,
            Some("GAM") => EndpointType::Gam,
            _ => EndpointType::Standard,
        }
    }
}

impl From<EndpointType> for String {
    fn from(value: EndpointType) -> Self {
        value.as_str().to_string()
    }
}

/// InfyTV 广告位参数（imp.ext.bidder）
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ImpExtInfyTvHb {
    #[serde(deserialize_with = "null_as_default")]
    pub dsp_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub customer_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tag_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub endpoint_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub base: String,
    #[serde(deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dsp_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub min_cpm: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub max_cpm: f64,
    #[serde(rename = "type")]
    pub endpoint_type: EndpointType,
    #[serde(rename = "floor_price", skip_serializing_if = "Option::is_none")]
    pub floor: Option<f64>,
}

impl ImpExtInfyTvHb {
    /// base 与 path 拼接出 DSP 地址；path 为空时只用 base
    pub fn endpoint_url(&self) -> String {
        if self.path.is_empty() {
            self.base.clone()
        } else {
            format!("{}{}", self.base, self.path)
        }
    }
}
