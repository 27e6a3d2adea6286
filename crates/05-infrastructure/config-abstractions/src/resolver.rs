//! 属性解析器抽象接口

use infrastructure_common::{PropertyError, PropertyResult, TypeInfo};
use std::any::Any;

/// 动态转换后的属性值
pub type DynValue = Box<dyn Any + Send + Sync>;

/// 属性解析器 trait
///
/// 负责占位符解析和类型转换。键本身可以是 `${key}` / `${key:default}`
/// 表达式，存储的值如果是占位符也会被递归解析。
pub trait PropertyResolver: Send + Sync {
    /// 获取属性值，不存在时返回 `None`
    fn get_property(&self, key: &str) -> PropertyResult<Option<String>>;

    /// 获取属性值并转换为目标类型
    fn get_property_dyn(&self, key: &str, target: &TypeInfo) -> PropertyResult<Option<DynValue>>;

    /// 是否支持转换到目标类型
    fn supports(&self, target: &TypeInfo) -> bool;

    /// 获取必需的属性值
    fn get_required_property(&self, key: &str) -> PropertyResult<String> {
        self.get_property(key)?
            .ok_or_else(|| PropertyError::MissingProperty {
                key: key.to_string(),
            })
    }

    /// 获取属性值，不存在时解析默认值
    fn get_property_or(&self, key: &str, default_value: &str) -> PropertyResult<String>;

    /// 获取必需的属性值并转换为目标类型
    fn get_required_property_dyn(&self, key: &str, target: &TypeInfo) -> PropertyResult<DynValue> {
        self.get_property_dyn(key, target)?
            .ok_or_else(|| PropertyError::MissingProperty {
                key: key.to_string(),
            })
    }

    /// 获取属性值并转换为 `T`
    fn get_property_as<T: Any + Send + Sync>(&self, key: &str) -> PropertyResult<Option<T>>
    where
        Self: Sized,
    {
        let target = TypeInfo::of::<T>();
        self.get_property_dyn(key, &target)?
            .map(|value| downcast_value::<T>(value, &target))
            .transpose()
    }

    /// 获取必需的属性值并转换为 `T`
    fn get_required_property_as<T: Any + Send + Sync>(&self, key: &str) -> PropertyResult<T>
    where
        Self: Sized,
    {
        self.get_property_as::<T>(key)?
            .ok_or_else(|| PropertyError::MissingProperty {
                key: key.to_string(),
            })
    }
}

/// 将动态值还原为具体类型
pub fn downcast_value<T: Any + Send + Sync>(value: DynValue, target: &TypeInfo) -> PropertyResult<T> {
    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| PropertyError::UnsupportedConversionType {
            type_name: target.name.clone(),
        })
}
