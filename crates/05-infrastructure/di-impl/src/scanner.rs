//! 按模块路径前缀扫描组件

use di_abstractions::{ComponentScanner, MetadataSource};
use infrastructure_common::{ContextError, ContextResult};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// 包扫描器
///
/// 在元数据来源中查找位于 `base_package` 或其子模块下的类型。
/// 包路径使用 Rust 的 `::` 分隔符。
#[derive(Debug, Clone, Default)]
pub struct PackageScanner;

impl PackageScanner {
    /// 创建默认扫描器
    pub fn new() -> Self {
        Self
    }

    fn in_package(type_name: &str, base_package: &str) -> bool {
        type_name
            .strip_prefix(base_package)
            .is_some_and(|rest| rest.starts_with("::"))
    }
}

impl ComponentScanner for PackageScanner {
    fn scan(
        &self,
        base_package: &str,
        source: &dyn MetadataSource,
    ) -> ContextResult<BTreeSet<String>> {
        if !self.supports(base_package) {
            return Err(ContextError::ScanFailed {
                message: format!("无效的扫描包路径: '{}'", base_package),
            });
        }

        info!("扫描包: {}", base_package);
        let found: BTreeSet<String> = source
            .type_names()
            .into_iter()
            .filter(|name| Self::in_package(name, base_package))
            .collect();

        for name in &found {
            debug!("发现候选类型: {}", name);
        }
        info!("包 {} 中发现 {} 个候选类型", base_package, found.len());
        Ok(found)
    }

    fn name(&self) -> &str {
        "PackageScanner"
    }

    fn supports(&self, base_package: &str) -> bool {
        !base_package.is_empty()
            && base_package
                .split("::")
                .all(|segment| !segment.is_empty() && segment.chars().all(|c| c.is_alphanumeric() || c == '_'))
    }
}
