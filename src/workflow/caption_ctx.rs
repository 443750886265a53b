//! 单张图片的上下文封装

/// 图片处理上下文
///
/// 只携带日志和定位需要的信息，不携带资源。
#[derive(Debug, Clone, Copy)]
pub struct CaptionCtx {
    /// 当前序号（从 1 开始）
    pub item_index: usize,
    /// 批次总数
    pub total: usize,
}

impl CaptionCtx {
    pub fn new(item_index: usize, total: usize) -> Self {
        Self { item_index, total }
    }
}
