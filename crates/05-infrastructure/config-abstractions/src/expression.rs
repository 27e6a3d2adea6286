//! 占位符表达式解析
//!
//! 支持 `${key}` 与 `${key:default}` 两种形式

/// 占位符前缀
pub const PLACEHOLDER_PREFIX: &str = "${";
/// 占位符后缀
pub const PLACEHOLDER_SUFFIX: &str = "}";
/// 默认值分隔符
pub const DEFAULT_VALUE_SEPARATOR: char = ':';

/// 解析后的占位符表达式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyExpr {
    /// 属性键
    pub key: String,
    /// 默认值（可能仍是占位符）
    pub default_value: Option<String>,
}

impl PropertyExpr {
    /// 解析占位符表达式，不是占位符时返回 `None`
    ///
    /// 默认值为第一个 `:` 之后直到结尾 `}` 的全部内容，因此允许嵌套
    /// `${a:${b:c}}`。
    pub fn parse(text: &str) -> Option<Self> {
        let inner = text
            .strip_prefix(PLACEHOLDER_PREFIX)?
            .strip_suffix(PLACEHOLDER_SUFFIX)?;

        match inner.split_once(DEFAULT_VALUE_SEPARATOR) {
            Some((key, default_value)) => Some(Self {
                key: key.to_string(),
                default_value: Some(default_value.to_string()),
            }),
            None => Some(Self {
                key: inner.to_string(),
                default_value: None,
            }),
        }
    }

    /// 是否为占位符表达式
    pub fn is_placeholder(text: &str) -> bool {
        text.starts_with(PLACEHOLDER_PREFIX) && text.ends_with(PLACEHOLDER_SUFFIX)
    }
}
