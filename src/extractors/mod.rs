//! Request extractors whose rejections use the API error envelope.

mod json;
pub use json::JsonBody;
