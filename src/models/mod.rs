//! Data models for the asset requests server

pub mod asset_request;

// Re-export commonly used types
pub use asset_request::{AssetRequest, AssetType, NewAssetRequest, RequestStatus};
