//! 后置处理器管道

use di_abstractions::{BeanInstance, BeanPostProcessor};
use infrastructure_common::{BeanCreationError, CreationResult};
use std::sync::Arc;
use tracing::debug;

struct RegisteredProcessor {
    bean_name: String,
    processor: Arc<dyn BeanPostProcessor>,
}

/// 按注册顺序执行的后置处理器链
#[derive(Default)]
pub struct PostProcessorPipeline {
    processors: Vec<RegisteredProcessor>,
}

impl PostProcessorPipeline {
    /// 创建空的处理器管道
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加处理器，同一 Bean 只登记一次
    pub fn register(&mut self, bean_name: impl Into<String>, processor: Arc<dyn BeanPostProcessor>) {
        let bean_name = bean_name.into();
        if self.contains(&bean_name) {
            return;
        }
        debug!("登记后置处理器: {} ({})", bean_name, processor.name());
        self.processors.push(RegisteredProcessor {
            bean_name,
            processor,
        });
    }

    /// 是否已登记指定名称的处理器
    pub fn contains(&self, bean_name: &str) -> bool {
        self.processors.iter().any(|p| p.bean_name == bean_name)
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// 处理器对应的 Bean 名称，按注册顺序
    pub fn bean_names(&self) -> Vec<String> {
        self.processors.iter().map(|p| p.bean_name.clone()).collect()
    }

    /// 依次执行所有处理器，返回最终对外暴露的实例
    pub fn apply(&self, bean_name: &str, instance: BeanInstance) -> CreationResult<BeanInstance> {
        let mut current = instance;
        for registered in &self.processors {
            let processed = registered
                .processor
                .post_process_before_initialization(Arc::clone(&current), bean_name)
                .ok_or_else(|| BeanCreationError::PostProcessorReturnedNone {
                    bean: bean_name.to_string(),
                    processor: registered.bean_name.clone(),
                })?;

            if !Arc::ptr_eq(&processed, &current) {
                debug!(
                    "后置处理器 {} 替换了 Bean '{}' 的实例",
                    registered.bean_name, bean_name
                );
                current = processed;
            }
        }
        Ok(current)
    }
}

impl std::fmt::Debug for PostProcessorPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostProcessorPipeline")
            .field("processors", &self.bean_names())
            .finish()
    }
}
