//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn IoC 容器各层共享的错误类型和类型元数据。
//!
//! ## 核心内容
//!
//! - [`TypeInfo`] - 类型名称与 `TypeId`
//! - [`PropertyError`] - 属性解析错误
//! - [`BeanDefinitionError`] - Bean 定义错误
//! - [`BeanCreationError`] - Bean 创建错误
//! - [`LookupError`] - Bean 查找错误
//! - [`ContextError`] - 容器级错误

pub mod errors;
pub mod metadata;

pub use errors::*;
pub use metadata::*;
