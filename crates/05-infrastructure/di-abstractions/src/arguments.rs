//! 构造器与工厂方法的调用参数

use infrastructure_common::ArgumentError;
use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// 容器管理的 Bean 实例
pub type BeanInstance = Arc<dyn Any + Send + Sync>;

/// 已解析的单个参数
pub enum Argument {
    /// 注入的 Bean
    Bean(BeanInstance),
    /// 转换后的属性值
    Value(Box<dyn Any + Send + Sync>),
    /// 可选依赖未找到
    Absent,
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bean(_) => f.write_str("Bean(..)"),
            Self::Value(_) => f.write_str("Value(..)"),
            Self::Absent => f.write_str("Absent"),
        }
    }
}

/// 按参数声明顺序排列的调用参数
#[derive(Debug, Default)]
pub struct Arguments {
    values: Vec<Argument>,
}

impl Arguments {
    /// 按参数顺序创建
    pub fn new(values: Vec<Argument>) -> Self {
        Self { values }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 第 `index` 个参数
    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.values.get(index)
    }

    fn argument(&self, index: usize) -> Result<&Argument, ArgumentError> {
        self.values.get(index).ok_or(ArgumentError::IndexOutOfRange {
            index,
            len: self.values.len(),
        })
    }

    /// 取出注入的 Bean 实例，不做类型转换
    pub fn instance(&self, index: usize) -> Result<BeanInstance, ArgumentError> {
        self.optional_instance(index)?
            .ok_or(ArgumentError::Absent { index })
    }

    /// 取出可选的 Bean 实例
    pub fn optional_instance(&self, index: usize) -> Result<Option<BeanInstance>, ArgumentError> {
        match self.argument(index)? {
            Argument::Bean(instance) => Ok(Some(Arc::clone(instance))),
            Argument::Absent => Ok(None),
            Argument::Value(_) => Err(ArgumentError::NotABean { index }),
        }
    }

    /// 取出注入的 Bean 并转换为 `T`
    pub fn bean<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>, ArgumentError> {
        self.optional_bean(index)?
            .ok_or(ArgumentError::Absent { index })
    }

    /// 取出可选的 Bean 并转换为 `T`
    pub fn optional_bean<T: Any + Send + Sync>(
        &self,
        index: usize,
    ) -> Result<Option<Arc<T>>, ArgumentError> {
        match self.optional_instance(index)? {
            Some(instance) => instance
                .downcast::<T>()
                .map(Some)
                .map_err(|_| ArgumentError::TypeMismatch {
                    index,
                    expected: type_name::<T>().to_string(),
                }),
            None => Ok(None),
        }
    }

    /// 取出属性值
    pub fn value<T: Any + Clone>(&self, index: usize) -> Result<T, ArgumentError> {
        match self.argument(index)? {
            Argument::Value(value) => {
                value
                    .downcast_ref::<T>()
                    .cloned()
                    .ok_or_else(|| ArgumentError::TypeMismatch {
                        index,
                        expected: type_name::<T>().to_string(),
                    })
            }
            Argument::Absent => Err(ArgumentError::Absent { index }),
            Argument::Bean(_) => Err(ArgumentError::NotAValue { index }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct Repo;

    fn sample() -> Arguments {
        Arguments::new(vec![
            Argument::Bean(Arc::new(Repo)),
            Argument::Value(Box::new("demo".to_string())),
            Argument::Absent,
        ])
    }

    #[test]
    fn typed_access() {
        let args = sample();
        assert!(args.bean::<Repo>(0).is_ok());
        assert_eq!(args.value::<String>(1).unwrap(), "demo");
        assert!(args.optional_bean::<Repo>(2).unwrap().is_none());
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn misuse_is_reported() {
        let args = sample();
        assert_eq!(
            args.bean::<String>(0).unwrap_err(),
            ArgumentError::TypeMismatch {
                index: 0,
                expected: "alloc::string::String".to_string(),
            }
        );
        assert_eq!(args.bean::<Repo>(1).unwrap_err(), ArgumentError::NotABean { index: 1 });
        assert_eq!(args.value::<String>(0).unwrap_err(), ArgumentError::NotAValue { index: 0 });
        assert_eq!(args.instance(2).unwrap_err(), ArgumentError::Absent { index: 2 });
        assert_eq!(
            args.value::<i64>(5).unwrap_err(),
            ArgumentError::IndexOutOfRange { index: 5, len: 3 }
        );
    }
}
