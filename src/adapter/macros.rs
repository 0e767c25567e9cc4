// src/adapter/macros.rs

use crate::openrtb::response::Bid;

pub const AUCTION_PRICE_MACRO: &str = "${AUCTION_PRICE}";

/// 价格格式化：最短可还原的十进制表示，不补零、不用科学计数法
pub fn format_price(price: f64) -> String {
    format!("{}", price)
}

/// 替换 nurl 与 adm 中的 ${AUCTION_PRICE}
pub fn resolve_macros(bid: &mut Bid) {
    let price = format_price(bid.price);
    for field in [&mut bid.nurl, &mut bid.adm] {
        if let Some(text) = field.as_mut() {
            if text.contains(AUCTION_PRICE_MACRO) {
                *text = text.replace(AUCTION_PRICE_MACRO, &price);
            }
        }
    }
}
