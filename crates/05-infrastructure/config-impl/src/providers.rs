//! 属性源实现

use config_abstractions::{PropertySource, ENVIRONMENT_SOURCE_PRIORITY, FILE_SOURCE_PRIORITY};
use serde_json::Value;
use std::collections::HashMap;
use std::ffi::OsString;
use tracing::debug;

/// 内存属性源
///
/// 保存由外部加载器（YAML / properties）整理好的扁平键值
#[derive(Debug, Clone)]
pub struct MapPropertySource {
    name: String,
    properties: HashMap<String, String>,
    priority: i32,
}

impl MapPropertySource {
    /// 创建新的内存属性源
    pub fn new<K, V>(name: impl Into<String>, properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            priority: FILE_SOURCE_PRIORITY,
        }
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl PropertySource for MapPropertySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// 环境变量属性源
///
/// 没有前缀时按原样保存全部环境变量；指定前缀时只保留匹配的变量，
/// 并把 `PREFIX_APP_NAME` 转换为 `app.name`。
#[derive(Debug, Clone)]
pub struct EnvironmentPropertySource {
    prefix: String,
    separator: String,
    priority: i32,
    env_vars: HashMap<String, String>,
}

impl EnvironmentPropertySource {
    /// 从当前进程的环境变量创建
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::from_os_vars(prefix, std::env::vars_os())
    }

    /// 从操作系统原始变量创建，跳过非 UTF-8 的变量
    pub fn from_os_vars(
        prefix: impl Into<String>,
        vars: impl IntoIterator<Item = (OsString, OsString)>,
    ) -> Self {
        let vars = vars
            .into_iter()
            .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (Ok(key), Err(_)) => {
                    debug!("跳过值不是 UTF-8 的环境变量: {}", key);
                    None
                }
                (Err(key), _) => {
                    debug!("跳过名称不是 UTF-8 的环境变量: {:?}", key);
                    None
                }
            });
        Self::from_vars(prefix, vars)
    }

    /// 从给定的变量集合创建
    pub fn from_vars<K, V>(prefix: impl Into<String>, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut source = Self {
            prefix: prefix.into(),
            separator: "_".to_string(),
            priority: ENVIRONMENT_SOURCE_PRIORITY,
            env_vars: HashMap::new(),
        };
        source.load_env_vars(vars);
        source
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 加载环境变量
    fn load_env_vars<K, V>(&mut self, vars: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        debug!("加载环境变量，前缀: {}", self.prefix);

        // 前缀必须带分隔符，`LORNA_X` 不属于 `LORN`
        let qualified_prefix = format!("{}{}", self.prefix, self.separator);
        for (key, value) in vars {
            let key = key.into();
            if self.prefix.is_empty() {
                self.env_vars.insert(key, value.into());
            } else if let Some(rest) = key.strip_prefix(&qualified_prefix) {
                if rest.is_empty() {
                    continue;
                }
                let config_key = self.env_key_to_config_key(rest);
                self.env_vars.insert(config_key, value.into());
            }
        }

        debug!("加载了 {} 个环境变量", self.env_vars.len());
    }

    /// 将去掉前缀后的环境变量键转换为配置键
    fn env_key_to_config_key(&self, env_key: &str) -> String {
        env_key.replace(&self.separator, ".").to_lowercase()
    }
}

impl PropertySource for EnvironmentPropertySource {
    fn name(&self) -> &str {
        "EnvironmentPropertySource"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.env_vars.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.env_vars.keys().cloned().collect()
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// JSON 属性源
///
/// 把嵌套的 JSON 对象展开为点分隔的扁平键，数组元素使用 `key[0]`
#[derive(Debug, Clone)]
pub struct JsonPropertySource {
    name: String,
    properties: HashMap<String, String>,
    priority: i32,
}

impl JsonPropertySource {
    /// 从 JSON 值创建
    pub fn from_value(name: impl Into<String>, value: &Value) -> Self {
        let mut properties = HashMap::new();
        Self::collect_keys(value, String::new(), &mut properties);

        Self {
            name: name.into(),
            properties,
            priority: FILE_SOURCE_PRIORITY,
        }
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 递归收集所有叶子键
    fn collect_keys(value: &Value, prefix: String, properties: &mut HashMap<String, String>) {
        match value {
            Value::Object(obj) => {
                for (key, nested) in obj {
                    let full_key = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    Self::collect_keys(nested, full_key, properties);
                }
            }
            Value::Array(items) => {
                for (index, nested) in items.iter().enumerate() {
                    Self::collect_keys(nested, format!("{}[{}]", prefix, index), properties);
                }
            }
            Value::String(text) => {
                properties.insert(prefix, text.clone());
            }
            Value::Null => {}
            scalar => {
                properties.insert(prefix, scalar.to_string());
            }
        }
    }
}

impl PropertySource for JsonPropertySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
