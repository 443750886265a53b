//! 基础设施层（Infrastructure Layer)
//!
//! 持有稀缺资源（HTTP 连接池），只暴露能力，不包含业务逻辑。

pub mod image_fetcher;

pub use image_fetcher::{is_supported_image, ImageFetcher, ImagePayloadError};
