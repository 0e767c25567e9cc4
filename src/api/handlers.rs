use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::adapter::Bidder;
use crate::api::AppState;
use crate::errors::ErrorBody;
use crate::logging::translation_log::TranslationLog;
use crate::model::bids::BidderResponse;
use crate::model::outbound::{OutboundRequest, ResponseData};
use crate::openrtb::request::BidRequest;

#[derive(Serialize, Debug)]
pub struct MakeRequestsResponse {
    pub requests: Vec<OutboundRequest>,
    pub errors: Vec<ErrorBody>,
}

#[derive(Deserialize, Debug)]
pub struct MakeBidsPayload {
    pub request: BidRequest,
    pub outbound: OutboundRequest,
    pub response: ResponseData,
}

#[derive(Serialize, Debug)]
pub struct MakeBidsResponse {
    pub bids: Option<BidderResponse>,
    pub errors: Vec<ErrorBody>,
}

/// **将 BidRequest 拆分为每个 imp 的出站请求**
pub async fn handle_make_requests(
    State(state): State<Arc<AppState>>,
    Json(bid_request): Json<BidRequest>,
) -> (StatusCode, Json<MakeRequestsResponse>) {
    let (requests, errors) = state.adapter.make_requests(&bid_request);

    let mut log = TranslationLog::new("make_requests", &bid_request.id, bid_request.imp.len());
    for outbound in &requests {
        log.add_mode(outbound.context.mode.as_str());
    }
    log.set_outbound_count(requests.len());
    log.add_errors(&errors);
    state.audit_logger.log(&log).await;

    (
        StatusCode::OK,
        Json(MakeRequestsResponse {
            requests,
            errors: errors.iter().map(ErrorBody::from).collect(),
        }),
    )
}

/// **解析 DSP 响应为标准化出价**
/// 既无出价也无错误时返回不带 body 的 204
pub async fn handle_make_bids(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MakeBidsPayload>,
) -> Response {
    let (bids, errors) = state
        .adapter
        .make_bids(&payload.request, &payload.outbound, &payload.response);

    let bid_count = bids.as_ref().map_or(0, |b| b.bids.len());
    let mut log = TranslationLog::new("make_bids", &payload.request.id, payload.request.imp.len());
    log.add_mode(payload.outbound.context.mode.as_str());
    log.set_bid_count(bid_count);
    log.add_errors(&errors);
    state.audit_logger.log(&log).await;

    if bid_count == 0 && errors.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }

    (
        StatusCode::OK,
        Json(MakeBidsResponse {
            bids,
            errors: errors.iter().map(ErrorBody::from).collect(),
        }),
    )
        .into_response()
}
