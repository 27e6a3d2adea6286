//! # 基础设施组合层
//!
//! 把组件元数据、包扫描、显式导入、属性源和日志配置组合起来，
//! 一次性启动 [`ApplicationContext`](di_impl::ApplicationContext)。
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use di_abstractions::{Annotation, BeanFactory, ConstructorMetadata, ParameterMetadata, TypeMetadata};
//! use infrastructure_composition::{ContextBuilder, LoggingConfig};
//!
//! struct Greeter {
//!     name: String,
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = ContextBuilder::new()
//!         .register_type(
//!             TypeMetadata::of::<Greeter>()
//!                 .with_annotation(Annotation::component())
//!                 .with_constructor(ConstructorMetadata::new(
//!                     vec![ParameterMetadata::value::<String>("name", "${app.name:demo}")],
//!                     |args| Ok(Greeter { name: args.value(0)? }),
//!                 )),
//!         )
//!         .import_type::<Greeter>()
//!         .add_env_vars("LORN")
//!         .with_logging(LoggingConfig::development())
//!         .build()?;
//!
//!     let greeter = context.get_bean_by_type::<Greeter>()?;
//!     println!("你好, {}", greeter.name);
//!
//!     context.close()?;
//!     Ok(())
//! }
//! ```

pub mod builder;

pub use builder::*;
