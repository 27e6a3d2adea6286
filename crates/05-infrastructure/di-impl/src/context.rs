//! 应用上下文

use crate::engine::BeanCreationEngine;
use crate::reader::BeanDefinitionReader;
use crate::registry::DefaultBeanRegistry;
use chrono::{DateTime, Utc};
use config_abstractions::PropertyResolver;
use di_abstractions::{BeanDefinition, BeanFactory, BeanInstance, BeanRegistry, MetadataSource};
use infrastructure_common::{
    ContextResult, LifecycleError, LifecycleResult, LookupError, TypeInfo,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 应用上下文
///
/// 构造时完成全部 Bean 的创建和初始化回调，之后只读，可以在线程间
/// 共享并发查询。
pub struct ApplicationContext {
    id: Uuid,
    started_at: DateTime<Utc>,
    registry: DefaultBeanRegistry,
    resolver: Arc<dyn PropertyResolver>,
    post_processors: Vec<String>,
    creation_order: Vec<String>,
}

impl ApplicationContext {
    /// 读取候选类型并启动上下文
    pub fn new(
        type_names: &BTreeSet<String>,
        source: &dyn MetadataSource,
        resolver: Arc<dyn PropertyResolver>,
    ) -> ContextResult<Self> {
        let registry = BeanDefinitionReader::new(source).read(type_names)?;
        Self::from_registry(registry, resolver)
    }

    /// 从已构建的注册表启动上下文
    pub fn from_registry(
        registry: DefaultBeanRegistry,
        resolver: Arc<dyn PropertyResolver>,
    ) -> ContextResult<Self> {
        let id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            "启动应用上下文 {}，共 {} 个 Bean 定义",
            id,
            registry.definition_count()
        );

        let report = BeanCreationEngine::new(&registry, resolver.as_ref()).bootstrap()?;

        let context = Self {
            id,
            started_at,
            registry,
            resolver,
            post_processors: report.pipeline.bean_names(),
            creation_order: report.creation_order,
        };
        context.run_init_callbacks()?;

        let elapsed = Utc::now() - context.started_at;
        info!(
            "应用上下文 {} 启动完成，耗时 {} ms",
            context.id,
            elapsed.num_milliseconds()
        );
        Ok(context)
    }

    fn run_init_callbacks(&self) -> LifecycleResult<()> {
        for def in self.created_definitions() {
            let (Some(callback), Some(instance)) = (def.init_callback(), def.raw_instance()) else {
                continue;
            };
            debug!("调用 Bean '{}' 的初始化方法 {}", def.name(), callback.method_name());
            callback
                .invoke(instance)
                .map_err(|source| LifecycleError::InitCallbackFailed {
                    bean: def.name().to_string(),
                    method: callback.method_name().to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    fn created_definitions(&self) -> impl DoubleEndedIterator<Item = &BeanDefinition> {
        self.creation_order
            .iter()
            .filter_map(|name| self.registry.find_definition(name))
    }

    /// 关闭上下文，按创建顺序的逆序调用销毁方法
    ///
    /// 所有销毁方法都会被调用；失败会记录日志，返回第一个错误。
    pub fn close(self) -> ContextResult<()> {
        info!("关闭应用上下文 {}", self.id);
        let mut failures = Vec::new();

        for def in self.created_definitions().rev() {
            let (Some(callback), Some(instance)) = (def.destroy_callback(), def.raw_instance())
            else {
                continue;
            };
            debug!("调用 Bean '{}' 的销毁方法 {}", def.name(), callback.method_name());
            if let Err(source) = callback.invoke(instance) {
                warn!(
                    "Bean '{}' 的销毁方法 {} 调用失败: {}",
                    def.name(),
                    callback.method_name(),
                    source
                );
                failures.push(LifecycleError::DestroyCallbackFailed {
                    bean: def.name().to_string(),
                    method: callback.method_name().to_string(),
                    source,
                });
            }
        }

        info!(
            "应用上下文 {} 已关闭，{} 个销毁方法失败",
            self.id,
            failures.len()
        );
        match failures.into_iter().next() {
            Some(first) => Err(first.into()),
            None => Ok(()),
        }
    }

    /// 上下文实例 ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 启动时间
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Bean 定义注册表
    pub fn registry(&self) -> &DefaultBeanRegistry {
        &self.registry
    }

    /// 属性解析器
    pub fn property_resolver(&self) -> &dyn PropertyResolver {
        self.resolver.as_ref()
    }

    /// 按名称查找定义
    pub fn find_definition(&self, name: &str) -> Option<&BeanDefinition> {
        self.registry.find_definition(name)
    }

    /// 可赋值给指定类型的全部定义，按 (order, name) 排序
    pub fn find_definitions(&self, type_info: &TypeInfo) -> Vec<&BeanDefinition> {
        self.registry.find_definitions(type_info)
    }

    /// Bean 的实际创建顺序
    pub fn creation_order(&self) -> &[String] {
        &self.creation_order
    }

    /// 后置处理器对应的 Bean 名称，按执行顺序
    pub fn post_processor_names(&self) -> &[String] {
        &self.post_processors
    }

    /// 以 debug 级别输出全部 Bean 定义
    pub fn dump_definitions(&self) {
        for def in self.registry.sorted_definitions() {
            debug!("{:?}", def);
        }
    }
}

impl BeanFactory for ApplicationContext {
    fn get_bean(&self, name: &str) -> ContextResult<BeanInstance> {
        let def = self
            .registry
            .find_definition(name)
            .ok_or_else(|| LookupError::NoSuchBeanDefinition {
                name: name.to_string(),
            })?;
        Ok(def.required_instance()?)
    }

    fn get_bean_of_type(&self, type_info: &TypeInfo) -> ContextResult<BeanInstance> {
        let def = self
            .registry
            .find_definition_by_type(type_info)?
            .ok_or_else(|| LookupError::NoSuchBeanOfType {
                type_name: type_info.name.clone(),
            })?;
        Ok(def.required_instance()?)
    }

    fn bean_name_of_type(&self, type_info: &TypeInfo) -> ContextResult<String> {
        let def = self
            .registry
            .find_definition_by_type(type_info)?
            .ok_or_else(|| LookupError::NoSuchBeanOfType {
                type_name: type_info.name.clone(),
            })?;
        Ok(def.name().to_string())
    }

    fn bean_type(&self, name: &str) -> Option<TypeInfo> {
        self.registry
            .find_definition(name)
            .map(|def| def.type_info().clone())
    }

    fn bean_names(&self) -> Vec<String> {
        self.registry
            .definition_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

impl std::fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("id", &self.id)
            .field("started_at", &self.started_at)
            .field("beans", &self.registry.definition_count())
            .field("post_processors", &self.post_processors)
            .finish()
    }
}
