//! Bean 定义读取器
//!
//! 把候选类型名称和元数据转换为 Bean 定义注册表

use crate::registry::DefaultBeanRegistry;
use di_abstractions::{
    Annotated, BeanDefinition, BeanRegistry, ConstructorMetadata, CreationMode, LifecycleCallback,
    Marker, MetadataSource, MethodMetadata, ReturnType, TypeMetadata, Visibility, ATTR_DESTROY_METHOD,
    ATTR_INIT_METHOD, ATTR_VALUE, DEFAULT_ORDER,
};
use infrastructure_common::{BeanDefinitionError, DefinitionResult, FactoryMethodDefect};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Bean 定义读取器
pub struct BeanDefinitionReader<'a> {
    source: &'a dyn MetadataSource,
}

impl<'a> BeanDefinitionReader<'a> {
    /// 基于元数据源创建读取器
    pub fn new(source: &'a dyn MetadataSource) -> Self {
        Self { source }
    }

    /// 读取全部候选类型，按名称顺序处理
    pub fn read(&self, type_names: &BTreeSet<String>) -> DefinitionResult<DefaultBeanRegistry> {
        let mut registry = DefaultBeanRegistry::new();
        for type_name in type_names {
            self.read_type(type_name, &mut registry)?;
        }
        info!(
            "从 {} 个候选类型创建了 {} 个 Bean 定义",
            type_names.len(),
            registry.definition_count()
        );
        Ok(registry)
    }

    fn read_type(&self, type_name: &str, registry: &mut DefaultBeanRegistry) -> DefinitionResult<()> {
        let metadata = self
            .source
            .type_metadata(type_name)
            .ok_or_else(|| BeanDefinitionError::UnknownType {
                type_name: type_name.to_string(),
            })?;

        if metadata.find_annotation(&Marker::Component)?.is_none() {
            debug!("跳过非组件类型: {}", type_name);
            return Ok(());
        }

        let bean_name = bean_name_of_type(&metadata);
        let constructor = suitable_constructor(&metadata)?;
        let configuration = metadata.find_annotation(&Marker::Configuration)?.is_some();

        let definition = BeanDefinition::new(
            bean_name.clone(),
            Arc::clone(&metadata),
            CreationMode::Constructor(constructor.clone()),
        )
        .with_order(order_of(&*metadata)?)
        .with_primary(metadata.has_direct_marker(&Marker::Primary))
        .with_configuration(configuration)
        .with_init_callback(annotated_callback(&metadata, &Marker::PostConstruct)?)
        .with_destroy_callback(annotated_callback(&metadata, &Marker::PreDestroy)?);
        registry.register(definition)?;

        if configuration {
            scan_factory_methods(&bean_name, &metadata, registry)?;
        }
        Ok(())
    }
}

/// 类型的 Bean 名称：`Component.value`，其次是构造型注解的 `value`，
/// 最后是首字母小写的类型简单名称
fn bean_name_of_type(metadata: &TypeMetadata) -> String {
    let explicit = match metadata.direct_annotation(&Marker::Component) {
        Some(component) => component.value_attribute(),
        None => metadata
            .annotations()
            .iter()
            .filter(|annotation| annotation.carries(&Marker::Component))
            .find_map(|annotation| annotation.value_attribute()),
    };

    explicit
        .map(str::to_string)
        .unwrap_or_else(|| metadata.type_info().default_bean_name())
}

/// 唯一的 public 构造器；没有 public 构造器时取唯一的声明构造器
fn suitable_constructor(metadata: &TypeMetadata) -> DefinitionResult<&ConstructorMetadata> {
    let public: Vec<&ConstructorMetadata> = metadata
        .constructors()
        .iter()
        .filter(|c| c.is_public())
        .collect();

    let (candidates, is_public) = if public.is_empty() {
        (metadata.constructors().iter().collect::<Vec<_>>(), false)
    } else {
        (public, true)
    };

    match candidates.as_slice() {
        [] => Err(BeanDefinitionError::NoConstructor {
            type_name: metadata.name().to_string(),
        }),
        [constructor] => Ok(*constructor),
        _ => Err(BeanDefinitionError::MultipleConstructors {
            type_name: metadata.name().to_string(),
            count: candidates.len(),
            public: is_public,
        }),
    }
}

fn order_of(element: &dyn Annotated) -> DefinitionResult<i32> {
    let Some(order) = element.direct_annotation(&Marker::Order) else {
        return Ok(DEFAULT_ORDER);
    };

    let raw = order.attribute(ATTR_VALUE).unwrap_or_default();
    raw.trim()
        .parse::<i32>()
        .map_err(|_| BeanDefinitionError::InvalidMarkerAttribute {
            marker: Marker::Order.to_string(),
            attribute: ATTR_VALUE.to_string(),
            value: raw.to_string(),
            owner: element.owner_name().to_string(),
        })
}

/// 带有 `PostConstruct` / `PreDestroy` 的唯一方法
fn annotated_callback(
    metadata: &TypeMetadata,
    marker: &Marker,
) -> DefinitionResult<Option<LifecycleCallback>> {
    let methods: Vec<&MethodMetadata> = metadata
        .methods()
        .iter()
        .filter(|m| m.has_direct_marker(marker))
        .collect();

    match methods.as_slice() {
        [] => Ok(None),
        [method] => checked_callback(metadata, method).map(Some),
        [first, ..] => Err(BeanDefinitionError::InvalidCallbackMethod {
            type_name: metadata.name().to_string(),
            method: first.name().to_string(),
            reason: format!("found {} methods with @{}", methods.len(), marker),
        }),
    }
}

/// `Bean(initMethod / destroyMethod)` 指定的方法，在返回类型上查找
fn named_callback(
    metadata: &TypeMetadata,
    method_name: Option<&str>,
) -> DefinitionResult<Option<LifecycleCallback>> {
    let Some(method_name) = method_name.filter(|name| !name.is_empty()) else {
        return Ok(None);
    };

    let method = metadata
        .method(method_name)
        .ok_or_else(|| BeanDefinitionError::InvalidCallbackMethod {
            type_name: metadata.name().to_string(),
            method: method_name.to_string(),
            reason: "method not found".to_string(),
        })?;
    checked_callback(metadata, method).map(Some)
}

fn checked_callback(
    metadata: &TypeMetadata,
    method: &MethodMetadata,
) -> DefinitionResult<LifecycleCallback> {
    if !method.parameters().is_empty() {
        return Err(BeanDefinitionError::InvalidCallbackMethod {
            type_name: metadata.name().to_string(),
            method: method.name().to_string(),
            reason: "must not have argument".to_string(),
        });
    }
    Ok(LifecycleCallback::new(method.clone()))
}

fn factory_method_defect(method: &MethodMetadata) -> Option<FactoryMethodDefect> {
    let modifiers = method.modifiers();
    if modifiers.is_abstract {
        Some(FactoryMethodDefect::Abstract)
    } else if modifiers.is_final {
        Some(FactoryMethodDefect::Final)
    } else if modifiers.visibility == Visibility::Private {
        Some(FactoryMethodDefect::Private)
    } else {
        match method.return_type() {
            ReturnType::Primitive(_) => Some(FactoryMethodDefect::PrimitiveReturn),
            ReturnType::Void => Some(FactoryMethodDefect::VoidReturn),
            ReturnType::Object(_) => None,
        }
    }
}

/// 把配置宿主上带 `Bean` 标记的方法注册为工厂方法定义
fn scan_factory_methods(
    factory_bean: &str,
    host: &TypeMetadata,
    registry: &mut DefaultBeanRegistry,
) -> DefinitionResult<()> {
    for method in host.methods() {
        let Some(bean) = method.direct_annotation(&Marker::Bean) else {
            continue;
        };

        if let Some(defect) = factory_method_defect(method) {
            return Err(BeanDefinitionError::InvalidFactoryMethod {
                type_name: host.name().to_string(),
                method: method.name().to_string(),
                defect,
            });
        }
        let ReturnType::Object(returns) = method.return_type() else {
            continue;
        };

        let bean_name = bean
            .value_attribute()
            .unwrap_or_else(|| method.name())
            .to_string();
        debug!(
            "发现工厂方法: {}.{} -> {}",
            host.name(),
            method.name(),
            bean_name
        );

        let definition = BeanDefinition::new(
            bean_name,
            Arc::clone(returns),
            CreationMode::FactoryMethod {
                factory_bean: factory_bean.to_string(),
                method: method.clone(),
            },
        )
        .with_order(order_of(method)?)
        .with_primary(method.has_direct_marker(&Marker::Primary))
        .with_init_callback(named_callback(returns, bean.attribute(ATTR_INIT_METHOD))?)
        .with_destroy_callback(named_callback(returns, bean.attribute(ATTR_DESTROY_METHOD))?);
        registry.register(definition)?;
    }
    Ok(())
}
