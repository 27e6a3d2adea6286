//! Bean 工厂抽象接口
//!
//! 容器启动完成后对外提供只读的 Bean 查找

use crate::arguments::BeanInstance;
use infrastructure_common::{ContextResult, LookupError, TypeInfo};
use std::any::Any;
use std::sync::Arc;

/// Bean 工厂 trait
pub trait BeanFactory: Send + Sync {
    /// 按名称获取 Bean
    fn get_bean(&self, name: &str) -> ContextResult<BeanInstance>;

    /// 按类型获取唯一 Bean
    fn get_bean_of_type(&self, type_info: &TypeInfo) -> ContextResult<BeanInstance>;

    /// 按类型解析唯一 Bean 的名称
    fn bean_name_of_type(&self, type_info: &TypeInfo) -> ContextResult<String>;

    /// 已注册 Bean 的声明类型
    fn bean_type(&self, name: &str) -> Option<TypeInfo>;

    /// 检查是否存在指定名称的 Bean
    fn contains_bean(&self, name: &str) -> bool {
        self.bean_type(name).is_some()
    }

    /// 全部 Bean 名称
    fn bean_names(&self) -> Vec<String>;

    /// 按名称获取 Bean 并转换为 `T`
    fn get_bean_typed<T: Any + Send + Sync>(&self, name: &str) -> ContextResult<Arc<T>>
    where
        Self: Sized,
    {
        let instance = self.get_bean(name)?;
        instance.downcast::<T>().map_err(|_| {
            LookupError::BeanNotOfRequiredType {
                name: name.to_string(),
                required_type: std::any::type_name::<T>().to_string(),
                actual_type: self
                    .bean_type(name)
                    .map(|t| t.name)
                    .unwrap_or_default(),
            }
            .into()
        })
    }

    /// 按类型获取唯一 Bean 并转换为 `T`
    ///
    /// 实例被后置处理器替换为其他类型时报 `BeanNotOfRequiredType`
    fn get_bean_by_type<T: Any + Send + Sync>(&self) -> ContextResult<Arc<T>>
    where
        Self: Sized,
    {
        let name = self.bean_name_of_type(&TypeInfo::of::<T>())?;
        self.get_bean_typed::<T>(&name)
    }
}
