//! 组件扫描器抽象接口
//!
//! 扫描器只负责把扫描目标转换为候选类型名称集合，类型的元数据
//! 由 [`MetadataSource`] 提供。

use crate::metadata::TypeMetadata;
use infrastructure_common::ContextResult;
use std::collections::BTreeSet;
use std::sync::Arc;

/// 元数据来源 trait
pub trait MetadataSource: Send + Sync {
    /// 按全限定类型名称获取元数据
    fn type_metadata(&self, type_name: &str) -> Option<Arc<TypeMetadata>>;

    /// 全部已知类型名称，已排序
    fn type_names(&self) -> Vec<String>;
}

/// 组件扫描器 trait
pub trait ComponentScanner: Send + Sync {
    /// 扫描指定包路径下的候选类型
    fn scan(&self, base_package: &str, source: &dyn MetadataSource)
        -> ContextResult<BTreeSet<String>>;

    /// 获取扫描器名称
    fn name(&self) -> &str;

    /// 检查是否支持指定的扫描目标
    fn supports(&self, base_package: &str) -> bool;
}
