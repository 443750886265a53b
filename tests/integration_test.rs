use futures::StreamExt;
use image_caption_batch::models::preset;
use image_caption_batch::utils::logging;
use image_caption_batch::{
    stream_batch, CaptionFlow, CaptionRequest, Config, ImageSource, VisionService,
};

/// 用真实视觉模型描述一张远程图片
#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_caption_single_remote_image() {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    let style = preset::get("brief").expect("风格应该存在");
    let request = CaptionRequest {
        name: "cat.jpg".to_string(),
        image: ImageSource::Url(
            "https://upload.wikimedia.org/wikipedia/commons/thumb/3/3a/Cat03.jpg/1200px-Cat03.jpg"
                .to_string(),
        ),
        system_message: style.system_message.to_string(),
        user_prompt: style.user_prompt.to_string(),
        postprocess: style.to_postprocess_config("", "", None, &[]),
    };

    let service = VisionService::new(&config);
    let raw = service
        .caption_image(&request)
        .await
        .expect("视觉模型调用失败");

    println!("原始描述: {}", raw);
    assert!(!raw.is_empty());
}

/// 用真实视觉模型跑一个两张图的小批次
#[tokio::test]
#[ignore]
async fn test_small_live_batch() {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    let style = preset::get("descriptive").expect("风格应该存在");
    let urls = [
        "https://upload.wikimedia.org/wikipedia/commons/thumb/3/3a/Cat03.jpg/1200px-Cat03.jpg",
        "https://upload.wikimedia.org/wikipedia/commons/thumb/4/4d/Cat_November_2010-1a.jpg/1200px-Cat_November_2010-1a.jpg",
    ];

    let requests: Vec<_> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| CaptionRequest {
            name: format!("cat{}.jpg", i + 1),
            image: ImageSource::Url(url.to_string()),
            system_message: style.system_message.to_string(),
            user_prompt: style.user_prompt.to_string(),
            postprocess: style.to_postprocess_config("", "high quality", None, &[]),
        })
        .collect();

    let service = VisionService::new(&config);
    let flow = CaptionFlow::new(service, true);

    let items: Vec<_> = stream_batch(flow, requests).collect().await;

    assert_eq!(items.len(), 2);
    for item in &items {
        println!("{} -> {:?}", item.file_name, item.outcome);
    }
}
