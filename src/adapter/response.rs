// src/adapter/response.rs

use axum::http::StatusCode;
use tracing::{debug, warn};

use crate::adapter::macros::resolve_macros;
use crate::config::AdapterConfig;
use crate::errors::AdapterError;
use crate::model::bids::{BidType, BidderResponse, TypedBid};
use crate::model::ext::EndpointType;
use crate::model::outbound::{OutboundRequest, ResponseData};
use crate::openrtb::request::BidRequest;
use crate::openrtb::response::{Bid, BidResponse};

/// DSP 未返回 cid / crid 时的占位值
pub const MISSING_ID: &str = "-";

/// 将 DSP 响应转换为标准化出价。
/// 204 表示无广告可填充，既无出价也无错误。
pub fn make_bids(
    config: &AdapterConfig,
    internal_request: &BidRequest,
    external_request: &OutboundRequest,
    response: &ResponseData,
) -> (Option<BidderResponse>, Vec<AdapterError>) {
    let status = response.status_code;
    if status == StatusCode::NO_CONTENT.as_u16() {
        debug!(request_id = %internal_request.id, "no content from dsp");
        return (None, Vec::new());
    }

    if status == StatusCode::BAD_REQUEST.as_u16() {
        warn!(request_id = %internal_request.id, status, "dsp rejected request");
        return (None, vec![AdapterError::BadInput(AdapterError::unexpected_status(status))]);
    }

    if status != StatusCode::OK.as_u16() {
        warn!(request_id = %internal_request.id, status, "unexpected status from dsp");
        return (None, vec![AdapterError::BadServerResponse(AdapterError::unexpected_status(status))]);
    }

    let bids = match external_request.context.mode {
        EndpointType::VastUrl => vec![vast_bid(internal_request, external_request, &response.body)],
        EndpointType::Gam | EndpointType::Standard => match decode_bid_response(&response.body) {
            Ok(bid_resp) => ortb_bids(bid_resp),
            Err(e) => {
                warn!(request_id = %internal_request.id, error = %e, "failed to decode dsp response");
                return (None, vec![e]);
            }
        },
    };

    let mut bidder_response = BidderResponse::with_capacity(bids.len());
    for mut bid in bids {
        let bid_type = media_type_for_bid(&bid);
        if config.resolve_macros {
            resolve_macros(&mut bid);
        }
        bidder_response.bids.push(TypedBid { bid, bid_type });
    }

    debug!(
        request_id = %internal_request.id,
        imp_id = %external_request.context.imp_id,
        bids = bidder_response.bids.len(),
        "normalized dsp response"
    );
    (Some(bidder_response), Vec::new())
}

/// VAST_URL 返回的是 VAST XML 而不是 JSON，整体作为 adm 合成一个出价
fn vast_bid(internal_request: &BidRequest, external_request: &OutboundRequest, body: &str) -> Bid {
    Bid {
        id: internal_request.id.clone(),
        impid: external_request.context.imp_id.clone(),
        price: external_request.context.floor_price.unwrap_or(0.0),
        adm: Some(body.to_string()),
        cid: Some(MISSING_ID.to_string()),
        crid: Some(MISSING_ID.to_string()),
        ..Default::default()
    }
}

fn decode_bid_response(body: &str) -> Result<BidResponse, AdapterError> {
    // simd_json 会原地改写输入，因此解析副本
    let mut bytes = body.as_bytes().to_vec();
    simd_json::serde::from_slice::<BidResponse>(&mut bytes)
        .map_err(|e| AdapterError::Decode(e.to_string()))
}

fn ortb_bids(bid_resp: BidResponse) -> Vec<Bid> {
    bid_resp
        .seatbid
        .into_iter()
        .flat_map(|seatbid| seatbid.bid)
        .map(|mut bid| {
            backfill(&mut bid.cid);
            backfill(&mut bid.crid);
            bid
        })
        .collect()
}

fn backfill(field: &mut Option<String>) {
    if field.as_deref().map_or(true, str::is_empty) {
        *field = Some(MISSING_ID.to_string());
    }
}

/// 该 DSP 只投放视频
fn media_type_for_bid(_bid: &Bid) -> BidType {
    BidType::Video
}
