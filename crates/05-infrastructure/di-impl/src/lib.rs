//! # 依赖注入具体实现
//!
//! 提供 Bean 定义读取、注册表、三阶段创建引擎、后置处理器管道和
//! 应用上下文的具体实现。
//!
//! ## 主要组件
//!
//! - [`MetadataCatalog`] - 内存元数据目录
//! - [`PackageScanner`] - 按模块路径扫描候选类型
//! - [`BeanDefinitionReader`] - 从元数据构建 Bean 定义
//! - [`DefaultBeanRegistry`] - Bean 定义注册表
//! - [`BeanCreationEngine`] - Bean 创建引擎
//! - [`PostProcessorPipeline`] - 后置处理器管道
//! - [`ApplicationContext`] - 应用上下文

pub mod catalog;
pub mod context;
pub mod engine;
pub mod pipeline;
pub mod reader;
pub mod registry;
pub mod scanner;

pub use catalog::*;
pub use context::*;
pub use engine::*;
pub use pipeline::*;
pub use reader::*;
pub use registry::*;
pub use scanner::*;
