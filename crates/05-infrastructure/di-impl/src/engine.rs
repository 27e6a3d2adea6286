//! Bean 创建引擎
//!
//! 按三个阶段依次创建全部单例：
//!
//! 1. `@Configuration` 宿主
//! 2. 后置处理器，创建后立即加入处理器链
//! 3. 其余尚未创建的 Bean
//!
//! 每个阶段内按 (order, name) 排序，依赖通过递归提前创建，
//! 正在创建的 Bean 名称集合用于检测循环依赖。

use crate::pipeline::PostProcessorPipeline;
use crate::registry::DefaultBeanRegistry;
use config_abstractions::PropertyResolver;
use di_abstractions::{
    Annotated, Annotation, Argument, Arguments, BeanDefinition, BeanInstance, BeanRegistry,
    CreationMode, Marker, ParameterMetadata, ATTR_NAME, ATTR_VALUE,
};
use infrastructure_common::{
    BeanCreationError, BoxError, CreationResult, LookupError, ParameterDefect, RestrictedRole,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// 启动完成后的结果
#[derive(Debug)]
pub struct BootstrapReport {
    /// 最终的后置处理器链
    pub pipeline: PostProcessorPipeline,
    /// Bean 的实际创建顺序
    pub creation_order: Vec<String>,
}

/// Bean 创建引擎
pub struct BeanCreationEngine<'a> {
    registry: &'a DefaultBeanRegistry,
    resolver: &'a dyn PropertyResolver,
    pipeline: PostProcessorPipeline,
    creating: HashSet<String>,
    creation_order: Vec<String>,
}

impl<'a> BeanCreationEngine<'a> {
    /// 创建引擎，借用注册表和属性解析器
    pub fn new(registry: &'a DefaultBeanRegistry, resolver: &'a dyn PropertyResolver) -> Self {
        Self {
            registry,
            resolver,
            pipeline: PostProcessorPipeline::new(),
            creating: HashSet::new(),
            creation_order: Vec::new(),
        }
    }

    /// 执行三阶段启动
    pub fn bootstrap(mut self) -> CreationResult<BootstrapReport> {
        let registry = self.registry;

        let configurations = registry.sorted_names_where(BeanDefinition::is_configuration);
        info!("创建 {} 个 @Configuration Bean", configurations.len());
        for name in &configurations {
            self.create_if_absent(name)?;
        }

        let processors = registry.sorted_names_where(BeanDefinition::is_post_processor);
        info!("创建 {} 个 BeanPostProcessor", processors.len());
        for name in &processors {
            let instance = self.create_if_absent(name)?;
            self.register_post_processor(name, &instance)?;
        }

        let remaining = registry.sorted_names_where(|def| !def.is_created());
        info!("创建 {} 个普通 Bean", remaining.len());
        for name in &remaining {
            self.create_if_absent(name)?;
        }

        info!("全部 {} 个 Bean 创建完成", self.creation_order.len());
        Ok(BootstrapReport {
            pipeline: self.pipeline,
            creation_order: self.creation_order,
        })
    }

    /// 当前的后置处理器链
    pub fn pipeline(&self) -> &PostProcessorPipeline {
        &self.pipeline
    }

    /// 到目前为止的创建顺序
    pub fn creation_order(&self) -> &[String] {
        &self.creation_order
    }

    fn create_if_absent(&mut self, name: &str) -> CreationResult<BeanInstance> {
        match self.definition(name)?.instance() {
            Some(instance) => {
                debug!("Bean '{}' 已提前创建，跳过", name);
                Ok(Arc::clone(instance))
            }
            None => self.create_early_singleton(name),
        }
    }

    fn definition(&self, name: &str) -> CreationResult<&'a BeanDefinition> {
        let registry: &'a DefaultBeanRegistry = self.registry;
        registry
            .find_definition(name)
            .ok_or_else(|| BeanCreationError::Dependency {
                bean: name.to_string(),
                source: LookupError::NoSuchBeanDefinition {
                    name: name.to_string(),
                },
            })
    }

    /// 创建单个 Bean，依赖尚未创建时递归创建
    ///
    /// 同一个名称第二次进入时报 `CircularDependency`。正在创建的集合
    /// 不会收缩，成功路径上的 Bean 不会再次进入。
    pub fn create_early_singleton(&mut self, name: &str) -> CreationResult<BeanInstance> {
        let def = self.definition(name)?;
        if !self.creating.insert(def.name().to_string()) {
            return Err(BeanCreationError::CircularDependency {
                bean: def.name().to_string(),
            });
        }

        debug!("创建 Bean '{}' ({})", def.name(), def.type_name());
        let args = self.resolve_arguments(def)?;
        let raw = self.instantiate(def, &args)?;
        let exposed = self.pipeline.apply(def.name(), Arc::clone(&raw))?;
        def.populate(raw, Arc::clone(&exposed))?;
        self.creation_order.push(def.name().to_string());
        Ok(exposed)
    }

    fn resolve_arguments(&mut self, def: &'a BeanDefinition) -> CreationResult<Arguments> {
        let is_configuration = def.is_configuration();
        let is_post_processor = def.is_post_processor();
        let mut values = Vec::with_capacity(def.parameters().len());

        for param in def.parameters() {
            let value = param.direct_annotation(&Marker::Value);
            let autowired = param.direct_annotation(&Marker::Autowired);

            if autowired.is_some() {
                let role = if is_configuration {
                    Some(RestrictedRole::Configuration)
                } else if is_post_processor {
                    Some(RestrictedRole::PostProcessor)
                } else {
                    None
                };
                if let Some(role) = role {
                    return Err(BeanCreationError::RestrictedDependency {
                        bean: def.name().to_string(),
                        type_name: def.type_name().to_string(),
                        role,
                    });
                }
            }

            let argument = match (value, autowired) {
                (Some(_), Some(_)) => {
                    return Err(invalid_parameter(def, param, ParameterDefect::BothMarkers));
                }
                (None, None) => {
                    return Err(invalid_parameter(def, param, ParameterDefect::NoMarker));
                }
                (Some(value), None) => self.resolve_value(def, param, value)?,
                (None, Some(autowired)) => self.resolve_dependency(def, param, autowired)?,
            };
            values.push(argument);
        }
        Ok(Arguments::new(values))
    }

    fn resolve_value(
        &self,
        def: &BeanDefinition,
        param: &ParameterMetadata,
        value: &Annotation,
    ) -> CreationResult<Argument> {
        let expression = value.attribute(ATTR_VALUE).unwrap_or_default();
        let converted = self
            .resolver
            .get_required_property_dyn(expression, param.type_info())
            .map_err(|source| BeanCreationError::Property {
                bean: def.name().to_string(),
                type_name: def.type_name().to_string(),
                source,
            })?;
        Ok(Argument::Value(converted))
    }

    fn resolve_dependency(
        &mut self,
        def: &'a BeanDefinition,
        param: &ParameterMetadata,
        autowired: &Annotation,
    ) -> CreationResult<Argument> {
        let registry: &'a DefaultBeanRegistry = self.registry;
        let required_type = param.type_info();

        let found = match autowired.attribute(ATTR_NAME).filter(|n| !n.is_empty()) {
            Some(bean_name) => registry.find_definition_of(bean_name, required_type),
            None => registry.find_definition_by_type(required_type),
        }
        .map_err(|source| BeanCreationError::Dependency {
            bean: def.name().to_string(),
            source,
        })?;

        let Some(dependency) = found else {
            if autowired.is_required() {
                return Err(BeanCreationError::MissingDependency {
                    bean: def.name().to_string(),
                    type_name: def.type_name().to_string(),
                    required_type: required_type.name.clone(),
                });
            }
            debug!(
                "Bean '{}' 的可选依赖 {} 不存在",
                def.name(),
                required_type.name
            );
            return Ok(Argument::Absent);
        };

        let instance = match dependency.instance() {
            Some(instance) => Arc::clone(instance),
            None => self.create_early_singleton(dependency.name())?,
        };
        Ok(Argument::Bean(instance))
    }

    fn instantiate(&self, def: &BeanDefinition, args: &Arguments) -> CreationResult<BeanInstance> {
        let invocation_failed = |source: BoxError| BeanCreationError::InvocationFailed {
            bean: def.name().to_string(),
            type_name: def.type_name().to_string(),
            source,
        };

        match def.creation() {
            CreationMode::Constructor(constructor) => {
                constructor.invoke(args).map_err(invocation_failed)
            }
            CreationMode::FactoryMethod {
                factory_bean,
                method,
            } => {
                let host = self.definition(factory_bean)?.required_instance()?;
                method
                    .invoke(&host, args)
                    .map_err(invocation_failed)?
                    .ok_or_else(|| {
                        invocation_failed(
                            format!("工厂方法 {} 没有返回实例", method.name()).into(),
                        )
                    })
            }
        }
    }

    fn register_post_processor(&mut self, name: &str, instance: &BeanInstance) -> CreationResult<()> {
        let def = self.definition(name)?;
        let processor = def
            .bean_type()
            .post_processor_cast()
            .and_then(|cast| cast(instance))
            .ok_or_else(|| BeanCreationError::NotAPostProcessor {
                bean: def.name().to_string(),
                type_name: def.type_name().to_string(),
            })?;
        self.pipeline.register(name, processor);
        Ok(())
    }
}

fn invalid_parameter(
    def: &BeanDefinition,
    param: &ParameterMetadata,
    defect: ParameterDefect,
) -> BeanCreationError {
    BeanCreationError::InvalidParameter {
        bean: def.name().to_string(),
        type_name: def.type_name().to_string(),
        parameter: param.name().to_string(),
        defect,
    }
}
