//! Bean 后置处理器接口

use crate::arguments::BeanInstance;
use std::any::Any;
use std::sync::Arc;

/// Bean 后置处理器 trait
///
/// 每个 Bean 构造完成后依次经过所有后置处理器。返回 `None` 会中止
/// 容器启动；返回不同的实例会替换该 Bean 对外暴露的实例。
pub trait BeanPostProcessor: Send + Sync {
    /// 初始化前处理
    fn post_process_before_initialization(
        &self,
        bean: BeanInstance,
        bean_name: &str,
    ) -> Option<BeanInstance>;

    /// 处理器名称，用于日志和错误信息
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// 把 Bean 实例还原为后置处理器
pub type PostProcessorCast = fn(&BeanInstance) -> Option<Arc<dyn BeanPostProcessor>>;

/// 针对具体类型 `T` 的 [`PostProcessorCast`]
pub fn cast_post_processor<T: BeanPostProcessor + Any>(
    instance: &BeanInstance,
) -> Option<Arc<dyn BeanPostProcessor>> {
    Arc::clone(instance)
        .downcast::<T>()
        .ok()
        .map(|processor| processor as Arc<dyn BeanPostProcessor>)
}
