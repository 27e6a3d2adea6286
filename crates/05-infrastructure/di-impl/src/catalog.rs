//! 内存元数据目录

use di_abstractions::{MetadataSource, TypeMetadata};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// 以全限定类型名称为键的元数据目录
#[derive(Debug, Clone, Default)]
pub struct MetadataCatalog {
    types: BTreeMap<String, Arc<TypeMetadata>>,
}

impl MetadataCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册类型元数据，同名类型后注册的覆盖先注册的
    pub fn register(&mut self, metadata: TypeMetadata) -> &mut Self {
        let name = metadata.name().to_string();
        debug!("登记类型元数据: {}", name);
        if self.types.insert(name.clone(), Arc::new(metadata)).is_some() {
            warn!("类型元数据被覆盖: {}", name);
        }
        self
    }

    /// 构建器风格的注册
    pub fn with_type(mut self, metadata: TypeMetadata) -> Self {
        self.register(metadata);
        self
    }

    /// 已登记的类型数量
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// 是否登记了指定类型
    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }
}

impl MetadataSource for MetadataCatalog {
    fn type_metadata(&self, type_name: &str) -> Option<Arc<TypeMetadata>> {
        self.types.get(type_name).cloned()
    }

    fn type_names(&self) -> Vec<String> {
        self.types.keys().cloned().collect()
    }
}
