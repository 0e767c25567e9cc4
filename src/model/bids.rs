// src/model/bids.rs

use serde::{Serialize, Deserialize};

use crate::openrtb::response::Bid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BidType {
    Banner,
    Video,
    Audio,
    Native,
}

/// 带媒体类型的出价
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TypedBid {
    pub bid: Bid,
    pub bid_type: BidType,
}

/// 返回给宿主的标准化出价集合
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BidderResponse {
    pub currency: String,
    pub bids: Vec<TypedBid>,
}

impl BidderResponse {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            currency: "USD".to_string(),
            bids: Vec::with_capacity(capacity),
        }
    }
}
