pub mod caption_ctx;
pub mod caption_flow;

pub use caption_ctx::CaptionCtx;
pub use caption_flow::CaptionFlow;
