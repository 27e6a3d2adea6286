//! 分层属性存储

use config_abstractions::PropertySource;
use std::collections::HashMap;
use tracing::debug;

/// 构造完成后只读的扁平属性存储
///
/// 按优先级升序合并属性源，优先级高的同名键覆盖优先级低的。
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    properties: HashMap<String, String>,
    sources: Vec<String>,
}

impl PropertyStore {
    /// 创建空的属性存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接从键值对创建
    pub fn from_map<K, V>(properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            sources: Vec::new(),
        }
    }

    /// 合并多个属性源
    pub fn from_sources(mut sources: Vec<Box<dyn PropertySource>>) -> Self {
        // 稳定排序：同优先级按加入顺序，后加入的覆盖先加入的
        sources.sort_by_key(|source| source.priority());

        let mut store = Self::new();
        for source in &sources {
            let keys = source.keys();
            debug!(
                "合并属性源: {} (优先级: {}, {} 个键)",
                source.name(),
                source.priority(),
                keys.len()
            );
            for key in keys {
                if let Some(value) = source.get(&key) {
                    store.properties.insert(key, value);
                }
            }
            store.sources.push(source.name().to_string());
        }
        store
    }

    /// 获取原始值
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// 是否包含键
    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// 属性数量
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// 已合并的属性源名称，按合并顺序
    pub fn source_names(&self) -> &[String] {
        &self.sources
    }

    /// 排序后的全部键
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.properties.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// 以 debug 级别输出全部属性
    pub fn dump(&self) {
        for key in self.sorted_keys() {
            debug!("属性 {} = {}", key, self.properties[key]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{EnvironmentPropertySource, MapPropertySource};
    use pretty_assertions::assert_eq;

    #[test]
    fn higher_priority_source_wins() {
        let file = MapPropertySource::new(
            "application.yml",
            vec![("app.name", "from-file"), ("app.port", "8080")],
        );
        let env = EnvironmentPropertySource::from_vars("LORN", vec![("LORN_APP_NAME", "from-env")]);

        // 加入顺序与优先级相反，结果仍由优先级决定
        let store = PropertyStore::from_sources(vec![Box::new(env), Box::new(file)]);

        assert_eq!(store.get("app.name"), Some("from-env"));
        assert_eq!(store.get("app.port"), Some("8080"));
        assert_eq!(
            store.source_names(),
            &["application.yml".to_string(), "EnvironmentPropertySource".to_string()]
        );
    }

    #[test]
    fn equal_priority_keeps_insertion_order() {
        let first = MapPropertySource::new("first", vec![("k", "1")]);
        let second = MapPropertySource::new("second", vec![("k", "2")]);
        let store = PropertyStore::from_sources(vec![Box::new(first), Box::new(second)]);
        assert_eq!(store.get("k"), Some("2"));
    }

    #[test]
    fn sorted_keys_are_ordered() {
        let store = PropertyStore::from_map(vec![("b", "2"), ("a", "1"), ("c", "3")]);
        assert_eq!(store.sorted_keys(), vec!["a", "b", "c"]);
        assert_eq!(store.len(), 3);
    }
}
