//! Bean 定义

use crate::arguments::{Arguments, BeanInstance};
use crate::metadata::{ConstructorMetadata, MethodMetadata, ParameterMetadata, TypeMetadata};
use infrastructure_common::{BeanCreationError, BoxError, CreationResult, TypeInfo};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// 未声明 `Order` 时的默认顺序，排在最后
pub const DEFAULT_ORDER: i32 = i32::MAX;

/// Bean 的创建方式
#[derive(Debug, Clone)]
pub enum CreationMode {
    /// 调用类型的构造器
    Constructor(ConstructorMetadata),
    /// 调用配置宿主 Bean 上的工厂方法
    FactoryMethod {
        factory_bean: String,
        method: MethodMetadata,
    },
}

/// 初始化或销毁回调
#[derive(Debug, Clone)]
pub struct LifecycleCallback {
    method: MethodMetadata,
}

impl LifecycleCallback {
    /// 包装生命周期方法
    pub fn new(method: MethodMetadata) -> Self {
        Self { method }
    }

    /// 方法名
    pub fn method_name(&self) -> &str {
        self.method.name()
    }

    /// 在原始实例上调用
    pub fn invoke(&self, instance: &BeanInstance) -> Result<(), BoxError> {
        self.method.invoke(instance, &Arguments::empty()).map(|_| ())
    }
}

/// 实例槽中保存的两个实例
#[derive(Clone)]
struct Populated {
    raw: BeanInstance,
    exposed: BeanInstance,
}

/// Bean 定义
///
/// 除实例槽外全部只读。实例槽从空到填充只发生一次，之后不可变。
pub struct BeanDefinition {
    name: String,
    bean_type: Arc<TypeMetadata>,
    creation: CreationMode,
    order: i32,
    primary: bool,
    configuration: bool,
    init_callback: Option<LifecycleCallback>,
    destroy_callback: Option<LifecycleCallback>,
    instance: OnceCell<Populated>,
}

impl BeanDefinition {
    /// 创建 Bean 定义
    pub fn new(name: impl Into<String>, bean_type: Arc<TypeMetadata>, creation: CreationMode) -> Self {
        Self {
            name: name.into(),
            bean_type,
            creation,
            order: DEFAULT_ORDER,
            primary: false,
            configuration: false,
            init_callback: None,
            destroy_callback: None,
            instance: OnceCell::new(),
        }
    }

    /// 设置创建顺序
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// 设置是否为首选 Bean
    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }

    /// 标记为配置宿主
    pub fn with_configuration(mut self, configuration: bool) -> Self {
        self.configuration = configuration;
        self
    }

    /// 设置初始化回调
    pub fn with_init_callback(mut self, callback: Option<LifecycleCallback>) -> Self {
        self.init_callback = callback;
        self
    }

    /// 设置销毁回调
    pub fn with_destroy_callback(mut self, callback: Option<LifecycleCallback>) -> Self {
        self.destroy_callback = callback;
        self
    }

    /// Bean 名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 声明类型的元数据
    pub fn bean_type(&self) -> &Arc<TypeMetadata> {
        &self.bean_type
    }

    pub fn type_info(&self) -> &TypeInfo {
        self.bean_type.type_info()
    }

    pub fn type_name(&self) -> &str {
        self.bean_type.name()
    }

    /// 创建方式
    pub fn creation(&self) -> &CreationMode {
        &self.creation
    }

    /// 工厂方法所在的宿主 Bean 名称
    pub fn factory_bean(&self) -> Option<&str> {
        match &self.creation {
            CreationMode::FactoryMethod { factory_bean, .. } => Some(factory_bean),
            CreationMode::Constructor(_) => None,
        }
    }

    /// 构造器或工厂方法的参数
    pub fn parameters(&self) -> &[ParameterMetadata] {
        match &self.creation {
            CreationMode::Constructor(constructor) => constructor.parameters(),
            CreationMode::FactoryMethod { method, .. } => method.parameters(),
        }
    }

    /// 创建顺序
    pub fn order(&self) -> i32 {
        self.order
    }

    /// 是否为首选 Bean
    pub fn is_primary(&self) -> bool {
        self.primary
    }

    /// 是否为配置类
    pub fn is_configuration(&self) -> bool {
        self.configuration
    }

    /// 是否为后置处理器
    pub fn is_post_processor(&self) -> bool {
        self.bean_type.is_post_processor()
    }

    /// 是否可赋值给目标类型
    pub fn is_assignable_to(&self, target: &TypeInfo) -> bool {
        self.bean_type.is_assignable_to(target)
    }

    /// 初始化回调
    pub fn init_callback(&self) -> Option<&LifecycleCallback> {
        self.init_callback.as_ref()
    }

    /// 销毁回调
    pub fn destroy_callback(&self) -> Option<&LifecycleCallback> {
        self.destroy_callback.as_ref()
    }

    /// 排序键：先按 order，再按名称
    pub fn sort_key(&self) -> (i32, &str) {
        (self.order, &self.name)
    }

    /// 填充实例槽，只允许一次
    pub fn populate(&self, raw: BeanInstance, exposed: BeanInstance) -> CreationResult<()> {
        self.instance
            .set(Populated { raw, exposed })
            .map_err(|_| BeanCreationError::AlreadyInstantiated {
                bean: self.name.clone(),
            })
    }

    /// 实例是否已创建
    pub fn is_created(&self) -> bool {
        self.instance.get().is_some()
    }

    /// 经过后置处理器后对外暴露的实例
    pub fn instance(&self) -> Option<&BeanInstance> {
        self.instance.get().map(|slot| &slot.exposed)
    }

    /// 构造器或工厂方法直接返回的实例
    pub fn raw_instance(&self) -> Option<&BeanInstance> {
        self.instance.get().map(|slot| &slot.raw)
    }

    /// 获取已创建的实例，尚未创建时报 `NotInstantiated`
    pub fn required_instance(&self) -> CreationResult<BeanInstance> {
        self.instance()
            .cloned()
            .ok_or_else(|| BeanCreationError::NotInstantiated {
                bean: self.name.clone(),
                type_name: self.type_name().to_string(),
            })
    }
}

impl fmt::Debug for BeanDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("BeanDefinition");
        debug
            .field("name", &self.name)
            .field("type", &self.type_name())
            .field("order", &self.order)
            .field("primary", &self.primary)
            .field("configuration", &self.configuration);
        if let Some(factory_bean) = self.factory_bean() {
            debug.field("factory_bean", &factory_bean);
        }
        debug
            .field(
                "init",
                &self.init_callback.as_ref().map(LifecycleCallback::method_name),
            )
            .field(
                "destroy",
                &self.destroy_callback.as_ref().map(LifecycleCallback::method_name),
            )
            .field("created", &self.is_created())
            .finish()
    }
}
