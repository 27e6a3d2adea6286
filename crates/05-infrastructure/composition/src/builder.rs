//! 应用上下文构建器

use config_abstractions::PropertySource;
use config_impl::{
    ConverterRegistry, DefaultPropertyResolver, EnvironmentPropertySource, JsonPropertySource,
    MapPropertySource, PropertyStore,
};
use di_abstractions::{ComponentScanner, MetadataSource, TypeMetadata};
use di_impl::{ApplicationContext, MetadataCatalog, PackageScanner};
use infrastructure_common::{ContextError, ContextResult};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// 应用上下文构建器
///
/// 使用建造者模式收集组件元数据、扫描路径、显式导入的类型和属性源，
/// 最后一次性启动 [`ApplicationContext`]。
pub struct ContextBuilder {
    /// 组件元数据
    catalog: MetadataCatalog,
    /// 组件扫描器，未指定时使用 [`PackageScanner`]
    scanners: Vec<Box<dyn ComponentScanner>>,
    /// 扫描根包
    packages: Vec<String>,
    /// 显式导入的类型
    imports: BTreeSet<String>,
    /// 属性源列表
    property_sources: Vec<Box<dyn PropertySource>>,
    /// 自定义转换器
    converters: Option<ConverterRegistry>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl ContextBuilder {
    /// 创建新的上下文构建器
    pub fn new() -> Self {
        Self {
            catalog: MetadataCatalog::new(),
            scanners: Vec::new(),
            packages: Vec::new(),
            imports: BTreeSet::new(),
            property_sources: Vec::new(),
            converters: None,
            logging_enabled: false, // 默认不初始化日志，由调用方决定
            logging_config: LoggingConfig::default(),
        }
    }

    /// 使用已有的元数据目录
    pub fn with_catalog(mut self, catalog: MetadataCatalog) -> Self {
        debug!("使用元数据目录，{} 个类型", catalog.len());
        self.catalog = catalog;
        self
    }

    /// 登记单个类型的元数据
    pub fn register_type(mut self, metadata: TypeMetadata) -> Self {
        self.catalog.register(metadata);
        self
    }

    /// 添加组件扫描器
    pub fn add_component_scanner<T: ComponentScanner + 'static>(mut self, scanner: T) -> Self {
        debug!("添加组件扫描器: {}", scanner.name());
        self.scanners.push(Box::new(scanner));
        self
    }

    /// 扫描指定包及其子模块
    pub fn scan_package(mut self, package: impl Into<String>) -> Self {
        let package = package.into();
        info!("添加扫描包: {}", package);
        self.packages.push(package);
        self
    }

    /// 显式导入类型，不受扫描路径限制
    pub fn import(mut self, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        debug!("导入类型: {}", type_name);
        self.imports.insert(type_name);
        self
    }

    /// 按 Rust 类型导入
    pub fn import_type<T: ?Sized + 'static>(self) -> Self {
        self.import(std::any::type_name::<T>())
    }

    /// 添加自定义属性源
    pub fn add_property_source<T: PropertySource + 'static>(mut self, source: T) -> Self {
        info!(
            "添加属性源: {} (优先级: {})",
            source.name(),
            source.priority()
        );
        self.property_sources.push(Box::new(source));
        self
    }

    /// 添加内存属性
    pub fn with_properties<K, V>(self, properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let index = self.property_sources.len();
        self.add_property_source(MapPropertySource::new(
            format!("MapPropertySource[{}]", index),
            properties,
        ))
    }

    /// 添加环境变量属性源
    pub fn add_env_vars(self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        info!("添加环境变量属性源，前缀: '{}'", prefix);
        self.add_property_source(EnvironmentPropertySource::new(prefix))
    }

    /// 添加 JSON 属性
    pub fn add_json(self, name: impl Into<String>, value: &Value) -> Self {
        self.add_property_source(JsonPropertySource::from_value(name, value))
    }

    /// 添加 JSON 配置文件
    pub fn add_json_file<P: AsRef<Path>>(self, path: P) -> ContextResult<Self> {
        let path = path.as_ref();
        info!("添加 JSON 配置文件: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| ContextError::BootstrapFailed {
            message: format!("读取配置文件 {} 失败: {}", path.display(), e),
        })?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| ContextError::BootstrapFailed {
                message: format!("解析配置文件 {} 失败: {}", path.display(), e),
            })?;
        Ok(self.add_json(path.display().to_string(), &value))
    }

    /// 使用自定义转换器
    pub fn with_converters(mut self, converters: ConverterRegistry) -> Self {
        self.converters = Some(converters);
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true;
        self
    }

    /// 扫描结果与显式导入的并集
    pub fn candidate_types(&self) -> ContextResult<BTreeSet<String>> {
        let default_scanner = PackageScanner::new();
        let scanners: Vec<&dyn ComponentScanner> = if self.scanners.is_empty() {
            vec![&default_scanner]
        } else {
            self.scanners.iter().map(|scanner| &**scanner).collect()
        };

        let mut candidates = self.imports.clone();
        for package in &self.packages {
            let mut scanned = false;
            for scanner in &scanners {
                if !scanner.supports(package) {
                    debug!("扫描器 {} 不支持包 {}", scanner.name(), package);
                    continue;
                }
                candidates.extend(scanner.scan(package, &self.catalog)?);
                scanned = true;
            }
            if !scanned {
                return Err(ContextError::ScanFailed {
                    message: format!("没有扫描器支持包: '{}'", package),
                });
            }
        }
        Ok(candidates)
    }

    /// 构建并启动应用上下文
    pub fn build(self) -> ContextResult<ApplicationContext> {
        // 只有在明确配置了日志时才初始化，避免测试中重复初始化
        if self.logging_enabled {
            self.logging_config.init()?;
        }
        info!("开始构建应用上下文");

        let candidates = self.candidate_types()?;
        info!(
            "共 {} 个候选类型 ({} 个扫描包, {} 个显式导入)",
            candidates.len(),
            self.packages.len(),
            self.imports.len()
        );

        let store = PropertyStore::from_sources(self.property_sources);
        store.dump();
        let resolver = match self.converters {
            Some(converters) => DefaultPropertyResolver::with_converters(store, converters),
            None => DefaultPropertyResolver::new(store),
        };

        let context = ApplicationContext::new(&candidates, &self.catalog, Arc::new(resolver))?;
        context.dump_definitions();
        info!("应用上下文构建完成");
        Ok(context)
    }

    /// 已登记的元数据
    pub fn catalog(&self) -> &dyn MetadataSource {
        &self.catalog
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 开发环境：debug 级别，输出源码位置，可以看到属性和 Bean 定义明细
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 生产环境：info 级别的 JSON 日志
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 安装全局 subscriber，已安装过时报 `BootstrapFailed`
    pub fn init(&self) -> ContextResult<()> {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(self.level)
            .with_target(self.show_target)
            .with_thread_ids(self.show_thread_ids)
            .with_file(self.show_file)
            .with_line_number(self.show_line_number);

        if self.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| ContextError::BootstrapFailed {
            message: format!("日志初始化失败: {}", e),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}
