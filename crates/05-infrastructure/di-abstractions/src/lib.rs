//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件元数据、Bean 定义和容器查找的核心接口。
//!
//! ## 核心接口
//!
//! - [`TypeMetadata`] - 类型元数据，替代反射
//! - [`BeanDefinition`] - Bean 定义与实例槽
//! - [`BeanPostProcessor`] - Bean 后置处理器
//! - [`BeanRegistry`] - Bean 定义注册表接口
//! - [`BeanFactory`] - Bean 工厂接口
//! - [`ComponentScanner`] - 组件扫描器接口

pub mod arguments;
pub mod container;
pub mod definition;
pub mod metadata;
pub mod post_processor;
pub mod registry;
pub mod scanner;

pub use arguments::*;
pub use container::*;
pub use definition::*;
pub use metadata::*;
pub use post_processor::*;
pub use registry::*;
pub use scanner::*;
