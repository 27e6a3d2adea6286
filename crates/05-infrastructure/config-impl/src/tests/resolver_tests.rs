//! 属性解析器测试

use crate::*;
use config_abstractions::PropertyResolver;
use infrastructure_common::{PropertyError, TypeInfo};
use pretty_assertions::assert_eq;
use std::time::Duration;

/// 测试默认值在键缺失时生效
#[test]
fn test_default_value_used_when_key_missing() {
    let resolver = DefaultPropertyResolver::from_map(vec![("a.b", "${c:hello}")]);
    assert_eq!(resolver.get_property("a.b").unwrap().as_deref(), Some("hello"));
}

/// 测试存在的键覆盖默认值
#[test]
fn test_present_key_overrides_default() {
    let resolver = DefaultPropertyResolver::from_map(vec![("a.b", "${c:hello}"), ("c", "world")]);
    assert_eq!(resolver.get_property("a.b").unwrap().as_deref(), Some("world"));
}

/// 测试键本身是占位符表达式
#[test]
fn test_placeholder_expression_as_key() {
    let resolver = DefaultPropertyResolver::from_map(vec![("app.name", "lorn")]);

    assert_eq!(
        resolver.get_required_property("${app.name}").unwrap(),
        "lorn"
    );
    assert_eq!(
        resolver.get_required_property("${app.title:demo}").unwrap(),
        "demo"
    );
    assert!(matches!(
        resolver.get_property("${app.title}"),
        Err(PropertyError::MissingProperty { key }) if key == "app.title"
    ));
}

/// 测试嵌套默认值
#[test]
fn test_nested_default_is_resolved() {
    let resolver = DefaultPropertyResolver::from_map(vec![("fallback", "nested")]);
    assert_eq!(
        resolver.get_property_or("missing", "${other:${fallback}}").unwrap(),
        "nested"
    );
    assert_eq!(
        resolver.get_property("${x:${y:deep}}").unwrap().as_deref(),
        Some("deep")
    );
}

/// 测试缺失必需属性
#[test]
fn test_missing_required_property() {
    let resolver = DefaultPropertyResolver::from_map(Vec::<(String, String)>::new());
    assert_eq!(resolver.get_property("absent").unwrap(), None);
    assert!(matches!(
        resolver.get_required_property("absent"),
        Err(PropertyError::MissingProperty { .. })
    ));
}

/// 测试非占位符值原样返回
#[test]
fn test_raw_value_returned_verbatim() {
    let resolver = DefaultPropertyResolver::from_map(vec![("url", "jdbc:mysql://${host")]);
    assert_eq!(
        resolver.get_property("url").unwrap().as_deref(),
        Some("jdbc:mysql://${host")
    );
}

/// 测试类型转换
#[test]
fn test_typed_conversion() {
    let resolver = DefaultPropertyResolver::from_map(vec![
        ("x", "42"),
        ("enabled", "True"),
        ("timeout", "15m"),
        ("bad", "4x2"),
    ]);

    assert_eq!(resolver.get_required_property_as::<i64>("x").unwrap(), 42);
    assert!(resolver.get_required_property_as::<bool>("enabled").unwrap());
    assert_eq!(
        resolver.get_required_property_as::<Duration>("timeout").unwrap(),
        Duration::from_secs(15 * 60)
    );
    assert_eq!(resolver.get_property_as::<i32>("absent").unwrap(), None);
    assert!(matches!(
        resolver.get_property_as::<i32>("bad"),
        Err(PropertyError::ConversionError { .. })
    ));
}

/// 测试不支持的目标类型
#[test]
fn test_unsupported_conversion_type() {
    #[derive(Debug)]
    struct DataSource;

    let resolver = DefaultPropertyResolver::from_map(vec![("x", "42")]);
    let target = TypeInfo::of::<DataSource>();

    assert!(!resolver.supports(&target));
    assert!(matches!(
        resolver.get_required_property_dyn("x", &target),
        Err(PropertyError::UnsupportedConversionType { .. })
    ));
}

/// 测试自引用占位符不会无限递归
#[test]
fn test_self_reference_is_rejected() {
    let resolver = DefaultPropertyResolver::from_map(vec![("a", "${a}")]);
    assert!(matches!(
        resolver.get_property("a"),
        Err(PropertyError::PlaceholderTooDeep { .. })
    ));
}

/// 测试环境变量覆盖文件属性
#[test]
fn test_environment_overrides_file_values() {
    let store = PropertyStore::from_sources(vec![
        Box::new(MapPropertySource::new(
            "application.yml",
            vec![("app.name", "file"), ("app.title", "${app.name}")],
        )),
        Box::new(EnvironmentPropertySource::from_vars(
            "LORN",
            vec![("LORN_APP_NAME", "env")],
        )),
    ]);
    let resolver = DefaultPropertyResolver::new(store);

    assert_eq!(resolver.get_required_property("app.title").unwrap(), "env");
}
