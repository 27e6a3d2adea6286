//! 属性源抽象接口

/// 属性源 trait
///
/// 定义从不同数据源获取扁平属性的统一接口。多个属性源合并时，
/// 优先级高的属性源覆盖优先级低的同名键。
pub trait PropertySource: Send + Sync {
    /// 获取属性源名称
    fn name(&self) -> &str;

    /// 获取属性值
    fn get(&self, key: &str) -> Option<String>;

    /// 获取所有属性键
    fn keys(&self) -> Vec<String>;

    /// 获取属性源优先级
    fn priority(&self) -> i32 {
        0
    }

    /// 检查属性键是否存在
    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// 文件类属性源的默认优先级
pub const FILE_SOURCE_PRIORITY: i32 = 100;

/// 环境变量属性源的默认优先级，覆盖文件中声明的同名键
pub const ENVIRONMENT_SOURCE_PRIORITY: i32 = 200;
