//! 错误类型定义

use std::fmt;
use thiserror::Error;

/// 通用的装箱错误类型，用于包装构造器、工厂方法和转换器抛出的底层错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 属性解析错误类型
#[derive(Error, Debug)]
pub enum PropertyError {
    #[error("配置属性不存在: {key}")]
    MissingProperty { key: String },

    #[error("不支持的属性转换类型: {type_name}")]
    UnsupportedConversionType { type_name: String },

    #[error("属性值转换失败: '{value}' -> {type_name}, 原因: {source}")]
    ConversionError {
        value: String,
        type_name: String,
        source: BoxError,
    },

    #[error("占位符嵌套层级超过 {depth}: {key}")]
    PlaceholderTooDeep { key: String, depth: usize },
}

/// 工厂方法声明缺陷
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryMethodDefect {
    /// 抽象方法
    Abstract,
    /// final 方法
    Final,
    /// 私有方法
    Private,
    /// 返回基本类型
    PrimitiveReturn,
    /// 无返回值
    VoidReturn,
}

impl fmt::Display for FactoryMethodDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Abstract => "must not be abstract",
            Self::Final => "must not be final",
            Self::Private => "must not be private",
            Self::PrimitiveReturn => "must not return primitive type",
            Self::VoidReturn => "must not return void",
        };
        f.write_str(text)
    }
}

/// Bean 定义错误类型
#[derive(Error, Debug)]
pub enum BeanDefinitionError {
    #[error("重复的 Bean 名称: {name} ({type_name})")]
    DuplicateBeanName { name: String, type_name: String },

    #[error("元数据中不存在类型: {type_name}")]
    UnknownType { type_name: String },

    #[error("类型 {type_name} 没有可用的构造器")]
    NoConstructor { type_name: String },

    #[error("类型 {type_name} 存在 {count} 个构造器 (public: {public})")]
    MultipleConstructors {
        type_name: String,
        count: usize,
        public: bool,
    },

    #[error("工厂方法 {type_name}.{method} {defect}")]
    InvalidFactoryMethod {
        type_name: String,
        method: String,
        defect: FactoryMethodDefect,
    },

    #[error("在 {owner} 上找到重复的 @{marker}")]
    DuplicateMarker { marker: String, owner: String },

    #[error("{owner} 上 @{marker} 的属性 {attribute} 无效: {value}")]
    InvalidMarkerAttribute {
        marker: String,
        attribute: String,
        value: String,
        owner: String,
    },

    #[error("回调方法 {type_name}.{method} 无效: {reason}")]
    InvalidCallbackMethod {
        type_name: String,
        method: String,
        reason: String,
    },
}

/// 构造参数声明缺陷
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterDefect {
    /// 同时声明了 @Value 与 @Autowired
    BothMarkers,
    /// 既没有 @Value 也没有 @Autowired
    NoMarker,
}

impl fmt::Display for ParameterDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BothMarkers => f.write_str("cannot specify both @Autowired and @Value"),
            Self::NoMarker => f.write_str("must specify @Autowired or @Value"),
        }
    }
}

/// 不允许注入其他 Bean 的 Bean 角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictedRole {
    /// @Configuration 宿主
    Configuration,
    /// BeanPostProcessor
    PostProcessor,
}

impl fmt::Display for RestrictedRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => f.write_str("@Configuration"),
            Self::PostProcessor => f.write_str("BeanPostProcessor"),
        }
    }
}

/// Bean 创建错误类型
#[derive(Error, Debug)]
pub enum BeanCreationError {
    #[error("创建 Bean '{bean}' 时检测到循环依赖")]
    CircularDependency { bean: String },

    #[error("创建 Bean '{bean}' ({type_name}) 时缺少类型为 '{required_type}' 的依赖")]
    MissingDependency {
        bean: String,
        type_name: String,
        required_type: String,
    },

    #[error("创建 Bean '{bean}' ({type_name}) 时参数 '{parameter}' {defect}")]
    InvalidParameter {
        bean: String,
        type_name: String,
        parameter: String,
        defect: ParameterDefect,
    },

    #[error("{role} Bean '{bean}' ({type_name}) 不能声明 @Autowired 参数")]
    RestrictedDependency {
        bean: String,
        type_name: String,
        role: RestrictedRole,
    },

    #[error("创建 Bean '{bean}' ({type_name}) 时发生异常: {source}")]
    InvocationFailed {
        bean: String,
        type_name: String,
        source: BoxError,
    },

    #[error("后置处理器 {processor} 处理 Bean '{bean}' 时返回空值")]
    PostProcessorReturnedNone { bean: String, processor: String },

    #[error("Bean '{bean}' ({type_name}) 的实例不是 BeanPostProcessor")]
    NotAPostProcessor { bean: String, type_name: String },

    #[error("Bean '{bean}' ({type_name}) 在当前阶段尚未实例化")]
    NotInstantiated { bean: String, type_name: String },

    #[error("Bean '{bean}' 已经实例化")]
    AlreadyInstantiated { bean: String },

    #[error("解析 Bean '{bean}' ({type_name}) 的属性值失败: {source}")]
    Property {
        bean: String,
        type_name: String,
        source: PropertyError,
    },

    #[error("解析 Bean '{bean}' 的依赖失败: {source}")]
    Dependency { bean: String, source: LookupError },
}

impl BeanCreationError {
    /// 获取出错的 Bean 名称
    pub fn bean_name(&self) -> &str {
        match self {
            Self::CircularDependency { bean }
            | Self::MissingDependency { bean, .. }
            | Self::InvalidParameter { bean, .. }
            | Self::RestrictedDependency { bean, .. }
            | Self::InvocationFailed { bean, .. }
            | Self::PostProcessorReturnedNone { bean, .. }
            | Self::NotAPostProcessor { bean, .. }
            | Self::NotInstantiated { bean, .. }
            | Self::AlreadyInstantiated { bean }
            | Self::Property { bean, .. }
            | Self::Dependency { bean, .. } => bean,
        }
    }
}

/// 按类型查找时无法确定唯一 Bean 的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ambiguity {
    /// 存在多个候选，但没有 @Primary
    NoPrimary { candidates: Vec<String> },
    /// 存在多个候选，且有多个 @Primary
    MultiplePrimary { primaries: Vec<String> },
}

impl fmt::Display for Ambiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPrimary { candidates } => {
                write!(f, "no @Primary specified among [{}]", candidates.join(", "))
            }
            Self::MultiplePrimary { primaries } => {
                write!(f, "multiple @Primary specified: [{}]", primaries.join(", "))
            }
        }
    }
}

/// Bean 查找错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("没有名称为 '{name}' 的 Bean 定义")]
    NoSuchBeanDefinition { name: String },

    #[error("没有类型为 '{type_name}' 的 Bean 定义")]
    NoSuchBeanOfType { type_name: String },

    #[error("需要类型 '{required_type}'，但 Bean '{name}' 的实际类型为 '{actual_type}'")]
    BeanNotOfRequiredType {
        name: String,
        required_type: String,
        actual_type: String,
    },

    #[error("找到多个类型为 '{type_name}' 的 Bean: {reason}")]
    NoUniqueBeanDefinition { type_name: String, reason: Ambiguity },
}

/// 调用参数访问错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("参数索引越界: {index} (共 {len} 个参数)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("参数 {index} 的类型不是 {expected}")]
    TypeMismatch { index: usize, expected: String },

    #[error("参数 {index} 为空")]
    Absent { index: usize },

    #[error("参数 {index} 不是 Bean 依赖")]
    NotABean { index: usize },

    #[error("参数 {index} 不是属性值")]
    NotAValue { index: usize },
}

/// 生命周期管理错误类型
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("调用 Bean '{bean}' 的初始化方法 {method} 失败: {source}")]
    InitCallbackFailed {
        bean: String,
        method: String,
        source: BoxError,
    },

    #[error("调用 Bean '{bean}' 的销毁方法 {method} 失败: {source}")]
    DestroyCallbackFailed {
        bean: String,
        method: String,
        source: BoxError,
    },
}

/// 容器错误类型
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("属性错误: {source}")]
    Property {
        #[from]
        source: PropertyError,
    },

    #[error("Bean 定义错误: {source}")]
    Definition {
        #[from]
        source: BeanDefinitionError,
    },

    #[error("Bean 创建错误: {source}")]
    Creation {
        #[from]
        source: BeanCreationError,
    },

    #[error("Bean 查找错误: {source}")]
    Lookup {
        #[from]
        source: LookupError,
    },

    #[error("生命周期错误: {source}")]
    Lifecycle {
        #[from]
        source: LifecycleError,
    },

    #[error("组件扫描失败: {message}")]
    ScanFailed { message: String },

    #[error("容器启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type PropertyResult<T> = Result<T, PropertyError>;
pub type DefinitionResult<T> = Result<T, BeanDefinitionError>;
pub type CreationResult<T> = Result<T, BeanCreationError>;
pub type LookupResult<T> = Result<T, LookupError>;
pub type LifecycleResult<T> = Result<T, LifecycleError>;
pub type ContextResult<T> = Result<T, ContextError>;
