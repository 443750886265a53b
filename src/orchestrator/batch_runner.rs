//! 批次执行器 - 编排层
//!
//! 把一组描述任务变成一个惰性的结果流：
//!
//! - **严格串行**：同一时刻只有一个请求在途。视觉模型要么是限额的
//!   托管 API，要么是独占 GPU 的本地推理服务，并发没有收益。
//! - **顺序保证**：产出顺序与提交顺序完全一致，消费方按位置/文件名
//!   对回原图。
//! - **失败不中断**：单项失败以失败标记的形式产出，批次继续。
//! - **可取消**：流是惰性的，消费方在两次迭代之间丢弃流即取消，
//!   不会留下处理到一半的请求。
//! - **不可重放**：任务列表被流消费，一个批次只能跑一遍。

use futures::stream::{self, Stream};

use crate::models::caption::{BatchItem, CaptionRequest};
use crate::services::CaptionGenerator;
use crate::workflow::{CaptionCtx, CaptionFlow};

/// 执行一个批次，返回按提交顺序逐项产出的结果流
///
/// # 参数
/// - `flow`: 单张图片的处理流程（生成 + 后处理）
/// - `requests`: 描述任务列表（按提交顺序）
///
/// # 返回
/// 有限流，每个任务恰好产出一项；本层不做重试，
/// 重试策略（如果有）属于 generator 背后的服务。
pub fn stream_batch<G>(
    flow: CaptionFlow<G>,
    requests: Vec<CaptionRequest>,
) -> impl Stream<Item = BatchItem>
where
    G: CaptionGenerator,
{
    let total = requests.len();
    let iter = requests.into_iter().enumerate();

    stream::unfold((iter, flow), move |(mut iter, flow)| async move {
        let (index, request) = iter.next()?;
        let ctx = CaptionCtx::new(index + 1, total);
        let item = flow.run_one(&request, &ctx).await;
        Some((item, (iter, flow)))
    })
}
