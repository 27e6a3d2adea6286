//! 属性值类型转换器

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use config_abstractions::DynValue;
use infrastructure_common::{BoxError, PropertyError, PropertyResult, TypeInfo};
use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// 转换函数类型
pub type ConvertFn = Arc<dyn Fn(&str) -> Result<DynValue, BoxError> + Send + Sync>;

#[derive(Clone)]
struct Converter {
    target: TypeInfo,
    convert: ConvertFn,
}

/// 默认转换器表，只读且进程内共享
static DEFAULT_CONVERTERS: Lazy<ConverterRegistry> = Lazy::new(ConverterRegistry::build_defaults);

/// 按目标类型索引的转换器注册表
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<TypeId, Converter>,
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut targets: Vec<&str> = self
            .converters
            .values()
            .map(|c| c.target.name.as_str())
            .collect();
        targets.sort_unstable();
        f.debug_struct("ConverterRegistry")
            .field("targets", &targets)
            .finish()
    }
}

impl ConverterRegistry {
    /// 创建空的注册表
    pub fn empty() -> Self {
        Self::default()
    }

    /// 创建包含默认转换器的注册表
    pub fn with_defaults() -> Self {
        DEFAULT_CONVERTERS.clone()
    }

    /// 注册转换器，同一目标类型后注册的覆盖先注册的
    pub fn register<T, E, F>(&mut self, convert: F) -> &mut Self
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        let target = TypeInfo::of::<T>();
        let convert: ConvertFn = Arc::new(move |text: &str| -> Result<DynValue, BoxError> {
            convert(text)
                .map(|value| Box::new(value) as DynValue)
                .map_err(Into::into)
        });
        self.converters.insert(target.id, Converter { target, convert });
        self
    }

    /// 使用 `FromStr` 注册转换器
    pub fn register_from_str<T>(&mut self) -> &mut Self
    where
        T: FromStr + Any + Send + Sync,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.register::<T, T::Err, _>(|text| text.parse::<T>())
    }

    /// 是否支持目标类型
    pub fn supports(&self, target: &TypeInfo) -> bool {
        self.converters.contains_key(&target.id)
    }

    /// 已注册转换器数量
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// 注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// 转换为动态值
    pub fn convert_dyn(&self, value: &str, target: &TypeInfo) -> PropertyResult<DynValue> {
        let converter =
            self.converters
                .get(&target.id)
                .ok_or_else(|| PropertyError::UnsupportedConversionType {
                    type_name: target.name.clone(),
                })?;

        (converter.convert)(value).map_err(|source| PropertyError::ConversionError {
            value: value.to_string(),
            type_name: target.name.clone(),
            source,
        })
    }

    /// 转换为具体类型
    pub fn convert<T: Any + Send + Sync>(&self, value: &str) -> PropertyResult<T> {
        let target = TypeInfo::of::<T>();
        let converted = self.convert_dyn(value, &target)?;
        config_abstractions::downcast_value::<T>(converted, &target)
    }

    fn build_defaults() -> Self {
        let mut registry = Self::empty();
        registry
            .register_from_str::<String>()
            .register(parse_bool)
            .register_from_str::<char>()
            .register_from_str::<i8>()
            .register_from_str::<i16>()
            .register_from_str::<i32>()
            .register_from_str::<i64>()
            .register_from_str::<i128>()
            .register_from_str::<isize>()
            .register_from_str::<u8>()
            .register_from_str::<u16>()
            .register_from_str::<u32>()
            .register_from_str::<u64>()
            .register_from_str::<u128>()
            .register_from_str::<usize>()
            .register_from_str::<f32>()
            .register_from_str::<f64>()
            .register_from_str::<NaiveDate>()
            .register_from_str::<NaiveTime>()
            .register_from_str::<NaiveDateTime>()
            .register_from_str::<DateTime<FixedOffset>>()
            .register_from_str::<DateTime<Utc>>()
            .register_from_str::<FixedOffset>()
            .register::<Duration, _, _>(humantime::parse_duration);
        registry
    }
}

/// 布尔值只接受不区分大小写的 `true` / `false`
fn parse_bool(text: &str) -> Result<bool, BoxError> {
    if text.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(format!("无效的布尔值: {}", text).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn converts_integer_widths() {
        let registry = ConverterRegistry::with_defaults();
        assert_eq!(registry.convert::<i64>("42").unwrap(), 42_i64);
        assert_eq!(registry.convert::<u8>("255").unwrap(), 255_u8);
        assert!(matches!(
            registry.convert::<u8>("256"),
            Err(PropertyError::ConversionError { .. })
        ));
    }

    #[test]
    fn converts_booleans_case_insensitively() {
        let registry = ConverterRegistry::with_defaults();
        assert!(registry.convert::<bool>("TRUE").unwrap());
        assert!(!registry.convert::<bool>("false").unwrap());
        assert!(registry.convert::<bool>("yes").is_err());
    }

    #[test]
    fn converts_dates_and_durations() {
        let registry = ConverterRegistry::with_defaults();
        assert_eq!(
            registry.convert::<NaiveDate>("2023-07-29").unwrap(),
            NaiveDate::from_ymd_opt(2023, 7, 29).unwrap()
        );
        assert_eq!(
            registry.convert::<Duration>("1h 30m").unwrap(),
            Duration::from_secs(90 * 60)
        );
        assert!(registry.convert::<DateTime<FixedOffset>>("2023-07-29T18:32:00+08:00").is_ok());
    }

    #[test]
    fn unregistered_target_is_unsupported() {
        struct Unknown;
        let registry = ConverterRegistry::with_defaults();
        let err = registry
            .convert_dyn("42", &TypeInfo::of::<Unknown>())
            .err()
            .unwrap();
        assert!(matches!(err, PropertyError::UnsupportedConversionType { .. }));
    }

    #[test]
    fn custom_converter_overrides_default() {
        let mut registry = ConverterRegistry::with_defaults();
        registry.register::<String, BoxError, _>(|text| Ok(text.to_uppercase()));
        assert_eq!(registry.convert::<String>("demo").unwrap(), "DEMO");
        assert_eq!(
            ConverterRegistry::with_defaults().convert::<String>("demo").unwrap(),
            "demo"
        );
    }
}
