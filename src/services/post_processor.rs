//! 描述文本后处理 - 业务能力层
//!
//! 只负责"清洗一条原始描述"能力，不关心流程
//!
//! 管线阶段严格按以下顺序执行（顺序是契约，后面的阶段假设前面的已经跑过）：
//!
//! 1. 负面短语过滤（整词、大小写不敏感、按列表顺序）
//! 2. 空白与标点归一化（换行/连续空白收敛为单个空格，连续逗号收敛，去掉首尾逗号和空白）
//! 3. 句壳处理（首字符转小写、去掉一个句尾句号，方便嵌入前后缀之间）
//! 4. 前缀/后缀拼接（`[prefix + ", "] + body + [", " + suffix]`，缺失侧不产生孤立分隔符）
//! 5. 再次空白收敛（拼接可能重新引入不规则空白）
//! 6. 首字符大写
//! 7. 限长截断（只在设置了 `max_chars` 且超限时执行一次）
//!
//! 纯函数，无 I/O、无状态，可重复调用无需协调。

use crate::models::caption::PostProcessConfig;
use regex::{Regex, RegexBuilder};

/// 对一条原始描述执行完整后处理管线
///
/// # 参数
/// - `raw`: 模型返回的原始文本（可能为空、含换行、大小写混乱）
/// - `config`: 后处理参数
///
/// # 返回
/// 最终描述文本：无换行、无连续空格、无首尾逗号/空白、
/// 非空时首字符大写、设置了 `max_chars` 时长度不超限。
/// 空输入产出空输出，任何参数缺省都有明确定义的结果。
pub fn process(raw: &str, config: &PostProcessConfig) -> String {
    let filtered = apply_negative_filters(raw, &config.negative_filters);
    let normalized = normalize_separators(&filtered);
    let body = into_clause(&normalized);
    let composed = compose(
        &body,
        config.prefix.as_deref().unwrap_or(""),
        config.suffix.as_deref().unwrap_or(""),
    );
    let composed = collapse_whitespace(&composed).trim().to_string();
    let capitalized = uppercase_first(&composed);

    match config.max_chars {
        Some(limit) => truncate_to_limit(&capitalized, limit),
        None => capitalized,
    }
}

// ========== 管线阶段 ==========

/// 阶段 1：按列表顺序删除每个短语的所有整词出现
///
/// 整词匹配而非子串匹配：过滤 "there is a" 不能弄坏 "thereafter"。
/// 短语内部的空白按任意空白串匹配（原始文本此时还未归一化）。
fn apply_negative_filters(text: &str, filters: &[String]) -> String {
    let mut result = text.to_string();
    for phrase in filters {
        let words: Vec<String> = phrase
            .split_whitespace()
            .map(|w| regex::escape(w))
            .collect();
        if words.is_empty() {
            continue;
        }
        let pattern = format!(r"\b{}\b", words.join(r"\s+"));
        if let Ok(re) = RegexBuilder::new(&pattern).case_insensitive(true).build() {
            result = re.replace_all(&result, "").into_owned();
        }
    }
    result
}

/// 阶段 2：空白与标点归一化
fn normalize_separators(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    let collapsed = collapse_commas(&collapsed);
    collapsed
        .trim_matches(|c: char| c == ',' || c.is_whitespace())
        .to_string()
}

/// 阶段 3：首字符转小写并去掉一个句尾句号
///
/// 让描述变成可以嵌在前后缀之间的小句，避免句中出现多余的大写或句号。
fn into_clause(text: &str) -> String {
    let lowered = lowercase_first(text);
    match lowered.strip_suffix('.') {
        Some(stripped) => stripped.to_string(),
        None => lowered,
    }
}

/// 阶段 4：前缀/后缀拼接
///
/// 前缀去掉首尾空白和一个尾部逗号，后缀去掉首尾空白和一个头部逗号，
/// 非空片段以 ", " 连接，缺失侧不产生孤立的 ", "。
fn compose(body: &str, prefix: &str, suffix: &str) -> String {
    let prefix = prefix.trim();
    let prefix = prefix.strip_suffix(',').unwrap_or(prefix).trim_end();
    let suffix = suffix.trim();
    let suffix = suffix.strip_prefix(',').unwrap_or(suffix).trim_start();

    let segments: Vec<&str> = [prefix, body, suffix]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    segments.join(", ")
}

/// 阶段 7：限长截断（一次性）
///
/// 超限时先硬切到 `max_chars` 个字符并去掉尾部空白；
/// 若切片内最后一个空格的位置不早于限额的 80%，再回退到该空格处
/// （最多只舍弃 20% 的限额），否则接受词中截断保留硬切结果。
/// 未超限的输入原样返回（限额内幂等）。
fn truncate_to_limit(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let hard: String = text.chars().take(max_chars).collect();
    let hard = hard.trim_end().to_string();

    if let Some(space_index) = last_space_index(&hard) {
        if space_index as f64 >= max_chars as f64 * 0.8 {
            let cut: String = hard.chars().take(space_index).collect();
            return cut.trim_end().to_string();
        }
    }

    hard
}

// ========== 辅助函数 ==========

/// 将换行和连续空白收敛为单个空格
fn collapse_whitespace(text: &str) -> String {
    match Regex::new(r"\s+") {
        Ok(re) => re.replace_all(text, " ").into_owned(),
        Err(_) => text.to_string(),
    }
}

/// 将连续逗号（允许夹杂空白）收敛为单个逗号
fn collapse_commas(text: &str) -> String {
    match Regex::new(r",(?:\s*,)+") {
        Ok(re) => re.replace_all(text, ",").into_owned(),
        Err(_) => text.to_string(),
    }
}

/// 首字符转小写（只动第一个字符，其余保持原样）
fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// 首字符转大写（只动第一个字符，其余保持原样）
fn uppercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// 文本中最后一个空格的字符下标
fn last_space_index(text: &str) -> Option<usize> {
    text.chars()
        .enumerate()
        .filter(|(_, c)| *c == ' ')
        .map(|(i, _)| i)
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::caption::PostProcessConfig;

    fn config(
        prefix: &str,
        suffix: &str,
        max_chars: Option<usize>,
        filters: &[&str],
    ) -> PostProcessConfig {
        PostProcessConfig {
            prefix: (!prefix.is_empty()).then(|| prefix.to_string()),
            suffix: (!suffix.is_empty()).then(|| suffix.to_string()),
            max_chars,
            negative_filters: filters.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// 完整场景：过滤 + 归一化 + 前后缀 + 最终大写
    #[test]
    fn test_full_scenario() {
        let result = process(
            "This image shows a cat sitting on a mat.",
            &config("TOK", "high quality", None, &["this image shows"]),
        );
        assert_eq!(result, "TOK, a cat sitting on a mat, high quality");
    }

    /// 整词过滤："thereafter" 不能被 "there is a" 弄坏
    #[test]
    fn test_filter_is_whole_word() {
        let result = process(
            "there is a cat, thereafter",
            &config("", "", None, &["there is a"]),
        );
        assert_eq!(result, "Cat, thereafter");
    }

    /// 过滤短语大小写不敏感，按列表顺序逐个应用
    #[test]
    fn test_filter_case_insensitive_and_ordered() {
        let result = process(
            "The Image Depicts a dog. In This Image the dog runs.",
            &config("", "", None, &["the image depicts", "in this image"]),
        );
        assert_eq!(result, "A dog. the dog runs");
    }

    /// 过滤清空全文时，后续阶段照常运行并产出空串
    #[test]
    fn test_filter_can_empty_the_string() {
        let result = process(
            "this image shows",
            &config("", "", None, &["this image shows"]),
        );
        assert_eq!(result, "");
    }

    /// 空输入产出空输出
    #[test]
    fn test_empty_input() {
        assert_eq!(process("", &PostProcessConfig::default()), "");
        assert_eq!(process("  \n\t ", &PostProcessConfig::default()), "");
    }

    /// 空过滤表时退化为：首字符小写、去句号、空白收敛、首字符大写
    #[test]
    fn test_round_trip_without_filters() {
        let result = process("This is a cat.\n\n", &PostProcessConfig::default());
        assert_eq!(result, "This is a cat");
    }

    /// 已知怪癖：只有第一个字符参与大小写往返，句中大写原样保留
    #[test]
    fn test_interior_capitals_survive() {
        let result = process("A DSLR photo of a Dog.", &PostProcessConfig::default());
        assert_eq!(result, "A DSLR photo of a Dog");
    }

    /// 换行和连续空白收敛为单个空格
    #[test]
    fn test_whitespace_collapse() {
        let result = process(
            "a cat\nsitting  on\r\n  a mat",
            &PostProcessConfig::default(),
        );
        assert_eq!(result, "A cat sitting on a mat");
    }

    /// 过滤残留的连续逗号被收敛，首尾逗号被去掉
    #[test]
    fn test_comma_normalization() {
        let result = process(
            "quality photo, a cat, quality photo, indoors, quality photo,",
            &config("", "", None, &["quality photo"]),
        );
        assert_eq!(result, "A cat, indoors");
    }

    /// 缺一侧前后缀时不产生孤立的 ", "
    #[test]
    fn test_no_orphan_separators() {
        let result = process("a cat", &config("", "high quality", None, &[]));
        assert_eq!(result, "A cat, high quality");
        assert!(!result.contains(", , "));
        assert!(!result.starts_with(", "));

        let result = process("a cat", &config("TOK", "", None, &[]));
        assert_eq!(result, "TOK, a cat");
        assert!(!result.ends_with(", "));
    }

    /// 正文被过滤清空时，前后缀之间也不会留下空段
    #[test]
    fn test_empty_body_between_prefix_and_suffix() {
        let result = process(
            "this image shows",
            &config("TOK", "high quality", None, &["this image shows"]),
        );
        assert_eq!(result, "TOK, high quality");
    }

    /// 前缀尾部逗号、后缀头部逗号各去掉一个
    #[test]
    fn test_prefix_suffix_comma_trimming() {
        let result = process("a cat", &config("TOK, ", " , high quality", None, &[]));
        assert_eq!(result, "TOK, a cat, high quality");
    }

    /// 词边界截断律：限额 50，最后一个空格在下标 42（≥ 80%），应切在 42
    #[test]
    fn test_truncation_cuts_at_word_boundary() {
        let text = "x".repeat(42) + " " + &"y".repeat(17);
        let result = truncate_to_limit(&text, 50);
        assert_eq!(result, "x".repeat(42));
    }

    /// 词中截断律：限额 50，最后一个空格在下标 30（< 80%），应硬切在 50
    #[test]
    fn test_truncation_hard_cut_when_boundary_too_early() {
        let text = "x".repeat(30) + " " + &"y".repeat(29);
        let result = truncate_to_limit(&text, 50);
        assert_eq!(result.chars().count(), 50);
        assert_eq!(result, "x".repeat(30) + " " + &"y".repeat(19));
    }

    /// 限额内幂等：未超限的串原样返回，重复截断结果不变
    #[test]
    fn test_truncation_idempotent_under_limit() {
        let text = "A cat sitting on a mat";
        assert_eq!(truncate_to_limit(text, 50), text);

        let long = "x".repeat(42) + " " + &"y".repeat(17);
        let once = truncate_to_limit(&long, 50);
        let twice = truncate_to_limit(&once, 50);
        assert_eq!(once, twice);
    }

    /// 硬切后的尾部空白被去掉
    #[test]
    fn test_truncation_trims_trailing_whitespace() {
        let text = "x".repeat(49) + "   tail";
        let result = truncate_to_limit(&text, 50);
        assert_eq!(result, "x".repeat(49));
    }

    /// 通过 process 走截断：限额作用于拼接后的完整文本
    #[test]
    fn test_process_applies_limit_to_composed_string() {
        let raw = "a very long description of a cat sitting on a mat in the sun";
        let result = process(raw, &config("TOK", "", Some(30), &[]));
        assert!(result.chars().count() <= 30);
        assert!(result.starts_with("TOK, "));
    }

    /// 只去掉一个句尾句号
    #[test]
    fn test_single_trailing_period_stripped() {
        let result = process("a cat..", &PostProcessConfig::default());
        assert_eq!(result, "A cat.");
    }
}
