// src/adapter/ext_parser.rs

use crate::errors::AdapterError;
use crate::model::ext::{ExtImpBidder, ImpExtInfyTvHb};
use crate::openrtb::request::Imp;

/// 解析 imp.ext：先解出 `{"bidder": ...}` 信封，再解出 InfyTV 参数。
/// 任一步失败都属于请求侧问题，返回 BadInput。
pub fn imp_ext(imp: &Imp) -> Result<ImpExtInfyTvHb, AdapterError> {
    let raw = imp
        .ext
        .as_ref()
        .ok_or_else(|| AdapterError::BadInput(format!("imp {}: missing ext", imp.id)))?;

    let value = serde_json::to_value(&**raw)
        .map_err(|e| AdapterError::BadInput(e.to_string()))?;
    let bidder_ext: ExtImpBidder = serde_json::from_value(value)
        .map_err(|e| AdapterError::BadInput(e.to_string()))?;

    serde_json::from_value(bidder_ext.bidder)
        .map_err(|e| AdapterError::BadInput(e.to_string()))
}
