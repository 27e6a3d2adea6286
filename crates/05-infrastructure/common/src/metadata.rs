//! 类型元数据定义
//!
//! 提供类型的名称与 `TypeId`，作为 Bean 类型、参数类型和转换目标类型的统一描述

use std::any::TypeId;
use std::fmt;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 完全限定的类型名称
    pub name: String,
    /// 类型ID
    pub id: TypeId,
}

impl TypeInfo {
    /// 创建新的类型信息
    pub fn new(type_id: TypeId, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: type_id,
        }
    }

    /// 从类型获取类型信息，支持 `dyn Trait`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            name: std::any::type_name::<T>().to_string(),
            id: TypeId::of::<T>(),
        }
    }

    /// 是否为同一类型
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// 获取简短的类型名称（不包含模块路径和泛型参数）
    pub fn simple_name(&self) -> &str {
        let base = self.name.split('<').next().unwrap_or(&self.name);
        let base = base.split('+').next().unwrap_or(base).trim();
        let base = base.trim_start_matches("dyn ");
        base.rsplit("::").next().unwrap_or(base)
    }

    /// 获取 Bean 默认名称：简短类型名称首字母小写
    pub fn default_bean_name(&self) -> String {
        decapitalize(self.simple_name())
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// 首字母小写
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
