//! 组件元数据模型
//!
//! 标记、注解和类型/构造器/方法/参数元数据。容器只通过这里的查询接口
//! 了解组件，不依赖任何反射机制。

use crate::arguments::{Arguments, BeanInstance};
use crate::post_processor::{cast_post_processor, BeanPostProcessor, PostProcessorCast};
use infrastructure_common::{BeanDefinitionError, BoxError, DefinitionResult, TypeInfo};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// 注解属性：默认值
pub const ATTR_VALUE: &str = "value";
/// 注解属性：名称
pub const ATTR_NAME: &str = "name";
/// 注解属性：是否必需
pub const ATTR_REQUIRED: &str = "required";
/// 注解属性：初始化方法名
pub const ATTR_INIT_METHOD: &str = "initMethod";
/// 注解属性：销毁方法名
pub const ATTR_DESTROY_METHOD: &str = "destroyMethod";

/// 标记类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Marker {
    /// 受容器管理的组件
    Component,
    /// 配置宿主，其方法可作为工厂方法
    Configuration,
    /// 工厂方法
    Bean,
    /// 按类型查找时优先
    Primary,
    /// 创建顺序
    Order,
    /// 属性值注入
    Value,
    /// Bean 依赖注入
    Autowired,
    /// 初始化回调
    PostConstruct,
    /// 销毁回调
    PreDestroy,
    /// 自定义标记（如 `Controller` 等构造型）
    Custom(String),
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component => f.write_str("Component"),
            Self::Configuration => f.write_str("Configuration"),
            Self::Bean => f.write_str("Bean"),
            Self::Primary => f.write_str("Primary"),
            Self::Order => f.write_str("Order"),
            Self::Value => f.write_str("Value"),
            Self::Autowired => f.write_str("Autowired"),
            Self::PostConstruct => f.write_str("PostConstruct"),
            Self::PreDestroy => f.write_str("PreDestroy"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// 注解实例
///
/// `meta` 保存注解类型自身携带的注解，用于构造型识别：
/// `Configuration` 与自定义构造型都通过 `meta` 携带 `Component`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    marker: Marker,
    attributes: BTreeMap<String, String>,
    meta: Vec<Annotation>,
}

impl Annotation {
    /// 创建不带属性的注解
    pub fn new(marker: Marker) -> Self {
        Self {
            marker,
            attributes: BTreeMap::new(),
            meta: Vec::new(),
        }
    }

    /// `@Component`
    pub fn component() -> Self {
        Self::new(Marker::Component)
    }

    /// 带 Bean 名称的 `@Component`
    pub fn component_named(name: impl Into<String>) -> Self {
        Self::component().with_attribute(ATTR_VALUE, name)
    }

    /// `@Configuration`
    pub fn configuration() -> Self {
        Self::new(Marker::Configuration).with_meta(Self::component())
    }

    /// 带 Bean 名称的 `@Configuration`
    pub fn configuration_named(name: impl Into<String>) -> Self {
        Self::configuration().with_attribute(ATTR_VALUE, name)
    }

    /// 自定义构造型，例如 `Controller`、`Repository`
    pub fn stereotype(name: impl Into<String>) -> Self {
        Self::new(Marker::Custom(name.into())).with_meta(Self::component())
    }

    /// `@Bean` 工厂方法标记
    pub fn bean() -> Self {
        Self::new(Marker::Bean)
    }

    /// 带 Bean 名称的 `@Bean`
    pub fn bean_named(name: impl Into<String>) -> Self {
        Self::bean().with_attribute(ATTR_VALUE, name)
    }

    /// `@Primary`
    pub fn primary() -> Self {
        Self::new(Marker::Primary)
    }

    /// `@Order`，数值越小越先创建
    pub fn order(order: i32) -> Self {
        Self::new(Marker::Order).with_attribute(ATTR_VALUE, order.to_string())
    }

    /// 属性值注入，表达式形如 `${key}` 或 `${key:default}`
    pub fn value(expression: impl Into<String>) -> Self {
        Self::new(Marker::Value).with_attribute(ATTR_VALUE, expression)
    }

    /// 按类型注入
    pub fn autowired() -> Self {
        Self::new(Marker::Autowired)
    }

    /// 按名称注入
    pub fn autowired_named(bean_name: impl Into<String>) -> Self {
        Self::autowired().with_attribute(ATTR_NAME, bean_name)
    }

    /// 可选注入，缺失时为空
    pub fn autowired_optional() -> Self {
        Self::autowired().with_attribute(ATTR_REQUIRED, "false")
    }

    /// `@PostConstruct`
    pub fn post_construct() -> Self {
        Self::new(Marker::PostConstruct)
    }

    /// `@PreDestroy`
    pub fn pre_destroy() -> Self {
        Self::new(Marker::PreDestroy)
    }

    /// 设置属性
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// 添加元注解
    pub fn with_meta(mut self, annotation: Annotation) -> Self {
        self.meta.push(annotation);
        self
    }

    /// `Bean` 注解的初始化方法
    pub fn with_init_method(self, method: impl Into<String>) -> Self {
        self.with_attribute(ATTR_INIT_METHOD, method)
    }

    /// `Bean` 注解的销毁方法
    pub fn with_destroy_method(self, method: impl Into<String>) -> Self {
        self.with_attribute(ATTR_DESTROY_METHOD, method)
    }

    /// 注解标记
    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    /// 读取属性值
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// 非空的 `value` 属性
    pub fn value_attribute(&self) -> Option<&str> {
        self.attribute(ATTR_VALUE).filter(|value| !value.is_empty())
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// 元注解
    pub fn meta(&self) -> &[Annotation] {
        &self.meta
    }

    /// `Autowired` 的 `required` 属性，默认为 `true`
    pub fn is_required(&self) -> bool {
        !matches!(self.attribute(ATTR_REQUIRED), Some(value) if value.eq_ignore_ascii_case("false"))
    }

    /// 元注解链中是否（间接）携带指定标记
    pub fn carries(&self, marker: &Marker) -> bool {
        self.meta
            .iter()
            .any(|meta| meta.marker == *marker || meta.carries(marker))
    }
}

/// 可携带注解的元素
pub trait Annotated {
    /// 直接声明的注解
    fn annotations(&self) -> &[Annotation];

    /// 错误信息中使用的元素名称
    fn owner_name(&self) -> &str;

    /// 查找直接声明的注解
    fn direct_annotation(&self, marker: &Marker) -> Option<&Annotation> {
        self.annotations().iter().find(|a| a.marker() == marker)
    }

    /// 是否直接声明了标记
    fn has_direct_marker(&self, marker: &Marker) -> bool {
        self.direct_annotation(marker).is_some()
    }

    /// 沿元注解链递归查找标记，找到多个时报 `DuplicateMarker`
    fn find_annotation(&self, marker: &Marker) -> DefinitionResult<Option<&Annotation>> {
        find_in(self.annotations(), marker, self.owner_name())
    }

    /// 沿元注解链判断是否携带标记
    fn has_marker(&self, marker: &Marker) -> DefinitionResult<bool> {
        Ok(self.find_annotation(marker)?.is_some())
    }
}

fn find_in<'a>(
    annotations: &'a [Annotation],
    marker: &Marker,
    owner: &str,
) -> DefinitionResult<Option<&'a Annotation>> {
    let mut found = annotations.iter().find(|a| a.marker() == marker);
    for annotation in annotations {
        if let Some(nested) = find_in(annotation.meta(), marker, owner)? {
            if found.is_some() {
                return Err(BeanDefinitionError::DuplicateMarker {
                    marker: marker.to_string(),
                    owner: owner.to_string(),
                });
            }
            found = Some(nested);
        }
    }
    Ok(found)
}

/// 可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    /// crate 内可见
    Crate,
    Private,
}

/// 构造函数实现
pub type ConstructorFn = Arc<dyn Fn(&Arguments) -> Result<BeanInstance, BoxError> + Send + Sync>;

/// 方法实现：目标实例 + 参数，返回值为空表示 void
pub type MethodFn =
    Arc<dyn Fn(&BeanInstance, &Arguments) -> Result<Option<BeanInstance>, BoxError> + Send + Sync>;

/// 参数元数据
#[derive(Debug, Clone)]
pub struct ParameterMetadata {
    name: String,
    type_info: TypeInfo,
    annotations: Vec<Annotation>,
}

impl ParameterMetadata {
    /// 创建参数元数据
    pub fn new(name: impl Into<String>, type_info: TypeInfo) -> Self {
        Self {
            name: name.into(),
            type_info,
            annotations: Vec::new(),
        }
    }

    /// 未声明任何注解的参数
    pub fn of<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::new(name, TypeInfo::of::<T>())
    }

    /// `@Value(expression)` 参数
    pub fn value<T: 'static>(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::of::<T>(name).with_annotation(Annotation::value(expression))
    }

    /// 按类型注入的必需依赖
    pub fn autowired<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::of::<T>(name).with_annotation(Annotation::autowired())
    }

    /// 按名称注入的必需依赖
    pub fn autowired_named<T: ?Sized + 'static>(
        name: impl Into<String>,
        bean_name: impl Into<String>,
    ) -> Self {
        Self::of::<T>(name).with_annotation(Annotation::autowired_named(bean_name))
    }

    /// 按类型注入的可选依赖
    pub fn optional<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::of::<T>(name).with_annotation(Annotation::autowired_optional())
    }

    /// 添加注解
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// 参数名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 参数类型
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }
}

impl Annotated for ParameterMetadata {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    fn owner_name(&self) -> &str {
        &self.name
    }
}

/// 构造器元数据
#[derive(Clone)]
pub struct ConstructorMetadata {
    visibility: Visibility,
    parameters: Vec<ParameterMetadata>,
    invoker: ConstructorFn,
}

impl ConstructorMetadata {
    /// 创建 public 构造器
    pub fn new<T, F>(parameters: Vec<ParameterMetadata>, constructor: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Arguments) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self {
            visibility: Visibility::Public,
            parameters,
            invoker: Arc::new(move |args: &Arguments| -> Result<BeanInstance, BoxError> {
                constructor(args).map(|instance| Arc::new(instance) as BeanInstance)
            }),
        }
    }

    /// 无参构造器
    pub fn no_args<T, F>(constructor: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::new(Vec::new(), move |_| Ok(constructor()))
    }

    /// 设置可见性
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// 构造器可见性
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// 构造器参数
    pub fn parameters(&self) -> &[ParameterMetadata] {
        &self.parameters
    }

    /// 调用构造器
    pub fn invoke(&self, args: &Arguments) -> Result<BeanInstance, BoxError> {
        (self.invoker)(args)
    }
}

impl fmt::Debug for ConstructorMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorMetadata")
            .field("visibility", &self.visibility)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// 方法修饰符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub visibility: Visibility,
    pub is_abstract: bool,
    pub is_final: bool,
}

/// 方法返回类型
#[derive(Debug, Clone)]
pub enum ReturnType {
    Void,
    Primitive(TypeInfo),
    Object(Arc<TypeMetadata>),
}

/// 方法元数据
#[derive(Clone)]
pub struct MethodMetadata {
    name: String,
    modifiers: Modifiers,
    annotations: Vec<Annotation>,
    parameters: Vec<ParameterMetadata>,
    return_type: ReturnType,
    invoker: Option<MethodFn>,
}

impl MethodMetadata {
    /// 只有声明、没有实现的方法
    pub fn declared(name: impl Into<String>, return_type: ReturnType) -> Self {
        Self {
            name: name.into(),
            modifiers: Modifiers::default(),
            annotations: Vec::new(),
            parameters: Vec::new(),
            return_type,
            invoker: None,
        }
    }

    /// 工厂方法：在宿主实例 `H` 上调用，返回 `R`
    pub fn factory<H, R, F>(
        name: impl Into<String>,
        returns: TypeMetadata,
        parameters: Vec<ParameterMetadata>,
        factory: F,
    ) -> Self
    where
        H: Any + Send + Sync,
        R: Any + Send + Sync,
        F: Fn(&H, &Arguments) -> Result<R, BoxError> + Send + Sync + 'static,
    {
        let mut method = Self::declared(name, ReturnType::Object(Arc::new(returns)));
        method.parameters = parameters;
        method.invoker = Some(Arc::new(
            move |target: &BeanInstance, args: &Arguments| -> Result<Option<BeanInstance>, BoxError> {
                let host = downcast_target::<H>(target)?;
                factory(host, args).map(|instance| Some(Arc::new(instance) as BeanInstance))
            },
        ));
        method
    }

    /// 无参无返回值的回调方法
    pub fn callback<H, F>(name: impl Into<String>, callback: F) -> Self
    where
        H: Any + Send + Sync,
        F: Fn(&H) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let mut method = Self::declared(name, ReturnType::Void);
        method.invoker = Some(Arc::new(
            move |target: &BeanInstance, _args: &Arguments| -> Result<Option<BeanInstance>, BoxError> {
                callback(downcast_target::<H>(target)?).map(|()| None)
            },
        ));
        method
    }

    /// 添加注解
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// 追加参数
    pub fn with_parameter(mut self, parameter: ParameterMetadata) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// 设置可见性
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.modifiers.visibility = visibility;
        self
    }

    /// 标记为抽象方法
    pub fn mark_abstract(mut self) -> Self {
        self.modifiers.is_abstract = true;
        self
    }

    /// 标记为 final 方法
    pub fn mark_final(mut self) -> Self {
        self.modifiers.is_final = true;
        self
    }

    /// 方法名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 方法修饰符
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn parameters(&self) -> &[ParameterMetadata] {
        &self.parameters
    }

    /// 返回类型
    pub fn return_type(&self) -> &ReturnType {
        &self.return_type
    }

    /// 在目标实例上调用
    pub fn invoke(
        &self,
        target: &BeanInstance,
        args: &Arguments,
    ) -> Result<Option<BeanInstance>, BoxError> {
        match &self.invoker {
            Some(invoker) => invoker(target, args),
            None => Err(format!("方法 {} 没有可调用的实现", self.name).into()),
        }
    }
}

impl Annotated for MethodMetadata {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    fn owner_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for MethodMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodMetadata")
            .field("name", &self.name)
            .field("modifiers", &self.modifiers)
            .field("annotations", &self.annotations)
            .field("parameters", &self.parameters)
            .field("return_type", &self.return_type)
            .finish_non_exhaustive()
    }
}

fn downcast_target<H: Any + Send + Sync>(target: &BeanInstance) -> Result<&H, BoxError> {
    target
        .downcast_ref::<H>()
        .ok_or_else(|| format!("目标实例的类型不是 {}", std::any::type_name::<H>()).into())
}

/// 类型元数据
#[derive(Clone)]
pub struct TypeMetadata {
    type_info: TypeInfo,
    annotations: Vec<Annotation>,
    assignable_to: Vec<TypeInfo>,
    post_processor: Option<PostProcessorCast>,
    constructors: Vec<ConstructorMetadata>,
    methods: Vec<MethodMetadata>,
}

impl TypeMetadata {
    /// 为具体类型 `T` 创建元数据，`T` 总是可赋值给自身
    pub fn of<T: Any>() -> Self {
        let type_info = TypeInfo::of::<T>();
        Self {
            assignable_to: vec![type_info.clone()],
            type_info,
            annotations: Vec::new(),
            post_processor: None,
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// 添加注解
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// 添加构造器
    pub fn with_constructor(mut self, constructor: ConstructorMetadata) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// 添加方法
    pub fn with_method(mut self, method: MethodMetadata) -> Self {
        self.methods.push(method);
        self
    }

    /// 声明可赋值给 `U`（通常是 `dyn Trait`）
    pub fn implements<U: ?Sized + 'static>(mut self) -> Self {
        let target = TypeInfo::of::<U>();
        if !self.assignable_to.contains(&target) {
            self.assignable_to.push(target);
        }
        self
    }

    /// 声明该类型是后置处理器，`T` 必须是本类型
    pub fn post_processor<T: BeanPostProcessor + Any>(mut self) -> Self {
        self.post_processor = Some(cast_post_processor::<T>);
        self.implements::<dyn BeanPostProcessor>()
    }

    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 完整类型名
    pub fn name(&self) -> &str {
        &self.type_info.name
    }

    /// 全部构造器
    pub fn constructors(&self) -> &[ConstructorMetadata] {
        &self.constructors
    }

    /// 全部方法
    pub fn methods(&self) -> &[MethodMetadata] {
        &self.methods
    }

    /// 按名称查找方法
    pub fn method(&self, name: &str) -> Option<&MethodMetadata> {
        self.methods.iter().find(|m| m.name() == name)
    }

    /// 可赋值的类型，包括自身和声明实现的 trait
    pub fn assignable_types(&self) -> &[TypeInfo] {
        &self.assignable_to
    }

    /// 是否可赋值给目标类型
    pub fn is_assignable_to(&self, target: &TypeInfo) -> bool {
        self.assignable_to.iter().any(|t| t.id == target.id)
    }

    /// 是否实现了 `BeanPostProcessor`
    pub fn is_post_processor(&self) -> bool {
        self.post_processor.is_some()
    }

    /// 后置处理器转换函数
    pub fn post_processor_cast(&self) -> Option<PostProcessorCast> {
        self.post_processor
    }
}

impl Annotated for TypeMetadata {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    fn owner_name(&self) -> &str {
        &self.type_info.name
    }
}

impl fmt::Debug for TypeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMetadata")
            .field("type", &self.type_info.name)
            .field("annotations", &self.annotations)
            .field("assignable_to", &self.assignable_to)
            .field("post_processor", &self.post_processor.is_some())
            .field("constructors", &self.constructors.len())
            .field("methods", &self.methods)
            .finish()
    }
}
