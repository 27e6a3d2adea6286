//! 默认属性解析器

use crate::converters::ConverterRegistry;
use crate::store::PropertyStore;
use config_abstractions::{DynValue, PropertyExpr, PropertyResolver};
use infrastructure_common::{PropertyError, PropertyResult, TypeInfo};
use tracing::debug;

/// 占位符最大嵌套层级
pub const MAX_PLACEHOLDER_DEPTH: usize = 32;

/// 基于 [`PropertyStore`] 与 [`ConverterRegistry`] 的属性解析器
#[derive(Debug, Clone)]
pub struct DefaultPropertyResolver {
    store: PropertyStore,
    converters: ConverterRegistry,
}

impl DefaultPropertyResolver {
    /// 使用默认转换器创建
    pub fn new(store: PropertyStore) -> Self {
        Self::with_converters(store, ConverterRegistry::with_defaults())
    }

    /// 使用自定义转换器创建
    pub fn with_converters(store: PropertyStore, converters: ConverterRegistry) -> Self {
        debug!("创建属性解析器，{} 个属性", store.len());
        Self { store, converters }
    }

    /// 从键值对创建
    pub fn from_map<K, V>(properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(PropertyStore::from_map(properties))
    }

    /// 底层属性存储
    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    /// 转换器注册表
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    fn lookup(&self, key: &str, depth: usize) -> PropertyResult<Option<String>> {
        if depth > MAX_PLACEHOLDER_DEPTH {
            return Err(PropertyError::PlaceholderTooDeep {
                key: key.to_string(),
                depth: MAX_PLACEHOLDER_DEPTH,
            });
        }

        if let Some(expr) = PropertyExpr::parse(key) {
            return self.resolve_expr(expr, depth + 1).map(Some);
        }

        match self.store.get(key) {
            Some(value) => self.parse_value(value, depth + 1).map(Some),
            None => Ok(None),
        }
    }

    fn lookup_or(&self, key: &str, default_value: &str, depth: usize) -> PropertyResult<String> {
        match self.lookup(key, depth)? {
            Some(value) => Ok(value),
            None => self.parse_value(default_value, depth + 1),
        }
    }

    fn lookup_required(&self, key: &str, depth: usize) -> PropertyResult<String> {
        self.lookup(key, depth)?
            .ok_or_else(|| PropertyError::MissingProperty {
                key: key.to_string(),
            })
    }

    fn parse_value(&self, value: &str, depth: usize) -> PropertyResult<String> {
        match PropertyExpr::parse(value) {
            Some(expr) => self.resolve_expr(expr, depth),
            None => Ok(value.to_string()),
        }
    }

    fn resolve_expr(&self, expr: PropertyExpr, depth: usize) -> PropertyResult<String> {
        match expr.default_value {
            Some(default_value) => self.lookup_or(&expr.key, &default_value, depth),
            None => self.lookup_required(&expr.key, depth),
        }
    }
}

impl PropertyResolver for DefaultPropertyResolver {
    fn get_property(&self, key: &str) -> PropertyResult<Option<String>> {
        self.lookup(key, 0)
    }

    fn get_property_dyn(&self, key: &str, target: &TypeInfo) -> PropertyResult<Option<DynValue>> {
        match self.lookup(key, 0)? {
            Some(value) => self.converters.convert_dyn(&value, target).map(Some),
            None => Ok(None),
        }
    }

    fn supports(&self, target: &TypeInfo) -> bool {
        self.converters.supports(target)
    }

    fn get_property_or(&self, key: &str, default_value: &str) -> PropertyResult<String> {
        self.lookup_or(key, default_value, 0)
    }
}
