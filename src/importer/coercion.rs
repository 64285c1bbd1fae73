// ==========================================
// 商品目录批量导入 - 单元格强制转换
// ==========================================
// 职责: TRIM / 数值 / 布尔 / 逗号列表 / JSON 对象 / 图片地址
// 红线: 不抛错；失败一律降级为默认值 + 警告，返回 (值, 警告列表)
// ==========================================

use crate::config::ImportConfig;
use crate::domain::draft::{AttributePair, DraftWarning, FieldValue, WarningCode};
use crate::domain::field::MetaValueType;
use serde_json::Value;

/// 强制转换结果: (值, 警告列表)
pub type Coerced<T> = (T, Vec<DraftWarning>);

/// 文本: TRIM
pub fn coerce_text(raw: &str) -> String {
    raw.trim().to_string()
}

/// 解析前导数值（TRIM 后取最长的数值前缀，如 "25 pcs" → 25）
///
/// # 返回
/// - Some((值, 是否丢弃了尾随文本))
/// - None: 无数值前缀，或结果非有限值
pub fn parse_number(raw: &str) -> Option<(f64, bool)> {
    let trimmed = raw.trim();
    let prefix = leading_number(trimmed)?;
    let value = prefix.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some((value, prefix.len() < trimmed.len()))
}

/// 截取前导数值文本: [符号] 数字 [. 数字] [e [符号] 数字]
fn leading_number(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    // 指数部分必须带数字，否则不计入（"5e" → 5）
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    Some(&text[..end])
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// 核心数值字段: 无数值前缀取 0
pub fn coerce_number(raw: &str, field_key: &str) -> Coerced<FieldValue> {
    match parse_number(raw) {
        Some((value, truncated)) => (
            FieldValue::Number(value),
            truncation_warning(truncated, raw, field_key),
        ),
        None => (
            FieldValue::Number(0.0),
            vec![DraftWarning::new(
                WarningCode::NumberDefaulted,
                field_key,
                raw.trim(),
            )],
        ),
    }
}

/// 元字段: 文本透传；数值无前缀取 null
pub fn coerce_meta(raw: &str, field_key: &str, value_type: MetaValueType) -> Coerced<FieldValue> {
    match value_type {
        MetaValueType::Text => (FieldValue::Text(coerce_text(raw)), Vec::new()),
        MetaValueType::Number => match parse_number(raw) {
            Some((value, truncated)) => (
                FieldValue::Number(value),
                truncation_warning(truncated, raw, field_key),
            ),
            None => (
                FieldValue::Null,
                vec![DraftWarning::new(
                    WarningCode::MetaNumberInvalid,
                    field_key,
                    raw.trim(),
                )],
            ),
        },
    }
}

fn truncation_warning(truncated: bool, raw: &str, field_key: &str) -> Vec<DraftWarning> {
    if truncated {
        vec![DraftWarning::new(
            WarningCode::NumberTruncated,
            field_key,
            raw.trim(),
        )]
    } else {
        Vec::new()
    }
}

/// 布尔: 闭世界判定，不在真值词表中一律为 false
pub fn coerce_boolean(raw: &str, config: &ImportConfig) -> bool {
    config.is_truthy(raw)
}

/// 逗号列表: 拆分 + TRIM + 去空
pub fn coerce_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

// ==========================================
// JsonOutcome - JSON 对象转换结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum JsonOutcome {
    Parsed {
        value: Value,
        pairs: Vec<AttributePair>, // 按源文本键顺序
    },
    Note(String), // 解析失败，保留原文
}

/// JSON 对象: 成功时同时拆出 {key, value} 属性行；失败保留原文
///
/// # 规则
/// - 只接受 JSON 对象；数组 / 标量 / null 视为失败，原文进 *Note
pub fn coerce_json_object(raw: &str, field_key: &str) -> Coerced<JsonOutcome> {
    let trimmed = raw.trim();

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => {
            let pairs = map
                .iter()
                .map(|(key, value)| AttributePair {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect();
            (
                JsonOutcome::Parsed {
                    value: Value::Object(map),
                    pairs,
                },
                Vec::new(),
            )
        }
        _ => (
            JsonOutcome::Note(trimmed.to_string()),
            vec![DraftWarning::new(WarningCode::JsonInvalid, field_key, trimmed)],
        ),
    }
}

/// 是否 http:// 或 https:// 地址（协议区分大小写，"HTTP://" 不接受）
pub fn is_web_url(token: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|scheme| token.starts_with(scheme) && token.len() > scheme.len())
}

/// 图片地址列表: 拆分 + TRIM + 仅保留 http(s)，超过上限截断
pub fn coerce_image_urls(raw: &str, max_images: usize, field_key: &str) -> Coerced<Vec<String>> {
    let mut warnings = Vec::new();
    let (mut urls, rejected): (Vec<String>, Vec<String>) =
        coerce_comma_list(raw).into_iter().partition(|t| is_web_url(t));

    if !rejected.is_empty() {
        warnings.push(DraftWarning::new(
            WarningCode::InvalidImageUrl,
            field_key,
            &rejected.join(", "),
        ));
    }

    if urls.len() > max_images {
        warnings.push(DraftWarning::new(
            WarningCode::ImagesTruncated,
            field_key,
            &format!("{} > {}", urls.len(), max_images),
        ));
        urls.truncate(max_images);
    }

    (urls, warnings)
}
