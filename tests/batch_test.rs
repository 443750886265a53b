//! 批次执行的集成测试
//!
//! 用脚本化的生成器替代真实视觉模型，验证编排层的契约：
//! 顺序保证、单项失败不中断、惰性与可取消。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::StreamExt;
use image_caption_batch::{
    stream_batch, CaptionFlow, CaptionGenerator, CaptionOutcome, CaptionRequest, ImageSource,
    PostProcessConfig,
};

/// 脚本化的描述生成器
///
/// 按调用次数决定成败，并记录总调用次数。
struct ScriptedGenerator {
    /// 第几次调用失败（从 1 开始，None 表示全部成功）
    fail_on: Option<usize>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl CaptionGenerator for ScriptedGenerator {
    async fn generate(&self, request: &CaptionRequest) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if Some(call) == self.fail_on {
            anyhow::bail!("模拟的模型故障 (第 {} 次调用)", call);
        }
        Ok(format!("This image shows {} in the sun.", request.name))
    }
}

fn request(name: &str, postprocess: PostProcessConfig) -> CaptionRequest {
    CaptionRequest {
        name: name.to_string(),
        image: ImageSource::Url(format!("https://example.com/{}", name)),
        system_message: "You are an expert image captioning assistant.".to_string(),
        user_prompt: "Describe this image.".to_string(),
        postprocess,
    }
}

fn requests(count: usize) -> Vec<CaptionRequest> {
    (1..=count)
        .map(|i| request(&format!("img{}.jpg", i), PostProcessConfig::default()))
        .collect()
}

/// 顺序保证：第 3 项失败时仍然产出 5 项，顺序与提交一致
#[tokio::test]
async fn test_batch_preserves_order_with_mid_batch_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let generator = ScriptedGenerator {
        fail_on: Some(3),
        calls: calls.clone(),
    };
    let flow = CaptionFlow::new(generator, false);

    let items: Vec<_> = stream_batch(flow, requests(5)).collect().await;

    assert_eq!(items.len(), 5);
    for (i, item) in items.iter().enumerate() {
        assert_eq!(item.file_name, format!("img{}.txt", i + 1));
    }
    assert!(matches!(items[2].outcome, CaptionOutcome::Failed(_)));
    for i in [0, 1, 3, 4] {
        assert!(items[i].outcome.is_caption(), "第 {} 项应该成功", i + 1);
    }
    // 每个任务恰好调用一次生成器
    assert_eq!(calls.load(Ordering::SeqCst), 5);
}

/// 失败标记带着可读信息和正确的文件名
#[tokio::test]
async fn test_failure_marker_keeps_file_name_and_message() {
    let generator = ScriptedGenerator {
        fail_on: Some(1),
        calls: Arc::new(AtomicUsize::new(0)),
    };
    let flow = CaptionFlow::new(generator, false);

    let items: Vec<_> = stream_batch(flow, requests(1)).collect().await;

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].file_name, "img1.txt");
    match &items[0].outcome {
        CaptionOutcome::Failed(message) => assert!(message.contains("模拟的模型故障")),
        other => panic!("应该是失败标记, 实际为 {:?}", other),
    }
}

/// 后处理作用在每一项成功结果上
#[tokio::test]
async fn test_postprocess_runs_per_item() {
    let generator = ScriptedGenerator {
        fail_on: None,
        calls: Arc::new(AtomicUsize::new(0)),
    };
    let flow = CaptionFlow::new(generator, false);

    let postprocess = PostProcessConfig {
        prefix: Some("TOK".to_string()),
        suffix: None,
        max_chars: None,
        negative_filters: vec!["this image shows".to_string()],
    };
    let items: Vec<_> =
        stream_batch(flow, vec![request("fox.jpg", postprocess)]).collect().await;

    match &items[0].outcome {
        CaptionOutcome::Caption(text) => {
            assert_eq!(text, "TOK, fox.jpg in the sun");
        }
        other => panic!("应该成功, 实际为 {:?}", other),
    }
}

/// 惰性与取消：只消费前 2 项时，生成器只被调用 2 次
#[tokio::test]
async fn test_dropping_stream_cancels_between_items() {
    let calls = Arc::new(AtomicUsize::new(0));
    let generator = ScriptedGenerator {
        fail_on: None,
        calls: calls.clone(),
    };
    let flow = CaptionFlow::new(generator, false);

    let items: Vec<_> = stream_batch(flow, requests(5)).take(2).collect().await;

    assert_eq!(items.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

/// 空批次产出空流
#[tokio::test]
async fn test_empty_batch() {
    let generator = ScriptedGenerator {
        fail_on: None,
        calls: Arc::new(AtomicUsize::new(0)),
    };
    let flow = CaptionFlow::new(generator, false);

    let items: Vec<_> = stream_batch(flow, Vec::new()).collect().await;
    assert!(items.is_empty());
}
