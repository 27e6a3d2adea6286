//! Bean 定义注册表抽象接口

use crate::definition::BeanDefinition;
use infrastructure_common::{LookupResult, TypeInfo};

/// Bean 定义注册表 trait
///
/// 提供按名称和按类型查找 Bean 定义的能力
pub trait BeanRegistry: Send + Sync {
    /// 按名称查找
    fn find_definition(&self, name: &str) -> Option<&BeanDefinition>;

    /// 按名称查找并校验类型，类型不匹配时报 `BeanNotOfRequiredType`
    fn find_definition_of(
        &self,
        name: &str,
        required_type: &TypeInfo,
    ) -> LookupResult<Option<&BeanDefinition>>;

    /// 所有可赋值给指定类型的定义，按 (order, name) 排序
    fn find_definitions(&self, type_info: &TypeInfo) -> Vec<&BeanDefinition>;

    /// 按类型查找唯一定义
    ///
    /// 没有匹配时返回 `None`；多个匹配时取唯一的 primary，
    /// 否则报 `NoUniqueBeanDefinition`。
    fn find_definition_by_type(&self, type_info: &TypeInfo) -> LookupResult<Option<&BeanDefinition>>;

    /// 全部定义名称，已排序
    fn definition_names(&self) -> Vec<&str>;

    /// 定义数量
    fn definition_count(&self) -> usize;
}
