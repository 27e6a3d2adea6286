//! # Configuration Abstractions
//!
//! 属性解析抽象层，定义属性源、占位符表达式和属性解析器的核心接口。
//!
//! ## 核心接口
//!
//! - [`PropertySource`] - 属性源接口
//! - [`PropertyResolver`] - 属性解析器接口
//! - [`PropertyExpr`] - 占位符表达式

pub mod expression;
pub mod resolver;
pub mod source;

pub use expression::*;
pub use resolver::*;
pub use source::*;
