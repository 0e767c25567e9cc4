pub mod bids;
pub mod ext;
pub mod outbound;
