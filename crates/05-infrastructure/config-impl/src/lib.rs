//! # Configuration Implementation
//!
//! 属性解析的具体实现，提供属性源、分层属性存储、类型转换器和占位符解析。
//!
//! ## 主要组件
//!
//! - [`MapPropertySource`] - 内存属性源
//! - [`EnvironmentPropertySource`] - 环境变量属性源
//! - [`JsonPropertySource`] - JSON 属性源
//! - [`PropertyStore`] - 分层属性存储
//! - [`ConverterRegistry`] - 类型转换器注册表
//! - [`DefaultPropertyResolver`] - 默认属性解析器

pub mod converters;
pub mod providers;
pub mod resolver;
pub mod store;

pub use converters::*;
pub use providers::*;
pub use resolver::*;
pub use store::*;

#[cfg(test)]
mod tests;
