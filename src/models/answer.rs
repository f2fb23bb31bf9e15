//! 答案类型转换
//!
//! 提交接口可能会严格校验答案类型，因此 LLM 返回的原始字符串在提交前
//! 需要按固定顺序尝试转换：整数 → 浮点数 → 布尔 → 字符串。

use std::fmt::Display;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// 提交给服务端的答案值
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
}

impl AnswerValue {
    /// 类型名称（用于日志）
    pub fn kind(&self) -> &'static str {
        match self {
            AnswerValue::Integer(_) => "int",
            AnswerValue::Float(_) => "float",
            AnswerValue::Boolean(_) => "bool",
            AnswerValue::Text(_) => "str",
        }
    }
}

impl Display for AnswerValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerValue::Integer(v) => write!(f, "{}", v),
            AnswerValue::Float(v) => write!(f, "{}", v),
            AnswerValue::Boolean(v) => write!(f, "{}", v),
            AnswerValue::Text(v) => write!(f, "{}", v),
        }
    }
}

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("整数正则非法"));
static FLOAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+\.\d+$").expect("浮点数正则非法"));

/// 去掉首尾空白和引号
fn strip_answer(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '"' || c == '\'')
}

/// 将 LLM 返回的原始答案转换为带类型的值
///
/// 检查顺序不可调换。任何转换失败（例如整数溢出、浮点数超出范围）都退回到去掉引号后的字符串。
pub fn coerce_answer(raw: &str) -> AnswerValue {
    let trimmed = strip_answer(raw);

    if INTEGER_RE.is_match(trimmed) {
        if let Ok(v) = trimmed.parse::<i64>() {
            return AnswerValue::Integer(v);
        }
    } else if FLOAT_RE.is_match(trimmed) {
        // 超出 f64 范围会得到 inf，序列化后是 null，按字符串提交
        if let Some(v) = trimmed.parse::<f64>().ok().filter(|v| v.is_finite()) {
            return AnswerValue::Float(v);
        }
    } else if trimmed.eq_ignore_ascii_case("true") {
        return AnswerValue::Boolean(true);
    } else if trimmed.eq_ignore_ascii_case("false") {
        return AnswerValue::Boolean(false);
    }

    AnswerValue::Text(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer() {
        assert_eq!(coerce_answer("42"), AnswerValue::Integer(42));
        assert_eq!(coerce_answer("-7"), AnswerValue::Integer(-7));
        assert_eq!(coerce_answer("  12345\n"), AnswerValue::Integer(12345));
    }

    #[test]
    fn test_float() {
        assert_eq!(coerce_answer("3.14"), AnswerValue::Float(3.14));
        assert_eq!(coerce_answer("-0.5"), AnswerValue::Float(-0.5));
    }

    #[test]
    fn test_boolean_is_case_insensitive() {
        assert_eq!(coerce_answer("True"), AnswerValue::Boolean(true));
        assert_eq!(coerce_answer("FALSE"), AnswerValue::Boolean(false));
    }

    #[test]
    fn test_quotes_are_stripped_before_numeric_check() {
        assert_eq!(coerce_answer("'42'"), AnswerValue::Integer(42));
        assert_eq!(coerce_answer("\"3.5\""), AnswerValue::Float(3.5));
        assert_eq!(coerce_answer("\"true\""), AnswerValue::Boolean(true));
    }

    #[test]
    fn test_fallback_to_string() {
        assert_eq!(coerce_answer("hello"), AnswerValue::Text("hello".to_string()));
        assert_eq!(coerce_answer("'hello world'"), AnswerValue::Text("hello world".to_string()));
        // 不是纯数字
        assert_eq!(coerce_answer("1e5"), AnswerValue::Text("1e5".to_string()));
        assert_eq!(coerce_answer("3."), AnswerValue::Text("3.".to_string()));
        assert_eq!(coerce_answer("1,000"), AnswerValue::Text("1,000".to_string()));
    }

    #[test]
    fn test_integer_overflow_falls_back_to_string() {
        let huge = "123456789012345678901234567890";
        assert_eq!(coerce_answer(huge), AnswerValue::Text(huge.to_string()));
    }

    #[test]
    fn test_float_out_of_range_falls_back_to_string() {
        let huge = format!("{}.5", "9".repeat(400));
        let value = coerce_answer(&huge);
        assert_eq!(value, AnswerValue::Text(huge.clone()));
        assert_ne!(serde_json::to_string(&value).unwrap(), "null");

        let negative = format!("-{}.25", "1".repeat(400));
        assert_eq!(coerce_answer(&negative).kind(), "str");
    }

    #[test]
    fn test_never_panics_on_odd_input() {
        for raw in ["", "   ", "''", "\"", "-", ".", "-.5", "０１２", "🙂", "\u{0}"] {
            let _ = coerce_answer(raw);
        }
        assert_eq!(coerce_answer(""), AnswerValue::Text(String::new()));
    }

    #[test]
    fn test_serializes_untagged() {
        assert_eq!(serde_json::to_string(&AnswerValue::Integer(42)).unwrap(), "42");
        assert_eq!(serde_json::to_string(&AnswerValue::Float(3.14)).unwrap(), "3.14");
        assert_eq!(serde_json::to_string(&AnswerValue::Boolean(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&AnswerValue::Text("hi".into())).unwrap(), "\"hi\"");
    }
}
