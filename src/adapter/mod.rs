// src/adapter/mod.rs

pub mod ext_parser;
pub mod macros;
pub mod request_builder;
pub mod response;

use crate::config::AdapterConfig;
use crate::errors::AdapterError;
use crate::model::bids::BidderResponse;
use crate::model::outbound::{OutboundRequest, ResponseData};
use crate::openrtb::request::BidRequest;

/// 宿主调用的 bidder 接口，两步都是纯函数，无网络 I/O
pub trait Bidder: Send + Sync {
    /// 为每个 imp 构造出站请求
    fn make_requests(&self, request: &BidRequest) -> (Vec<OutboundRequest>, Vec<AdapterError>);

    /// 解析 DSP 响应为标准化出价
    fn make_bids(
        &self,
        internal_request: &BidRequest,
        external_request: &OutboundRequest,
        response: &ResponseData,
    ) -> (Option<BidderResponse>, Vec<AdapterError>);
}

/// InfyTV header-bidding 适配器
#[derive(Debug, Clone, Default)]
pub struct InfyTvAdapter {
    config: AdapterConfig,
}

impl InfyTvAdapter {
    pub fn new(config: AdapterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }
}

impl Bidder for InfyTvAdapter {
    fn make_requests(&self, request: &BidRequest) -> (Vec<OutboundRequest>, Vec<AdapterError>) {
        request_builder::build_requests(&self.config, request)
    }

    fn make_bids(
        &self,
        internal_request: &BidRequest,
        external_request: &OutboundRequest,
        response: &ResponseData,
    ) -> (Option<BidderResponse>, Vec<AdapterError>) {
        response::make_bids(&self.config, internal_request, external_request, response)
    }
}
