pub mod adapter;
pub mod api;
pub mod config;
pub mod errors;
pub mod logging;
pub mod model;
pub mod openrtb;

pub use adapter::{Bidder, InfyTvAdapter};
