//! 集成测试共用的示例组件

#![allow(dead_code)]

use di_abstractions::{Annotation, ConstructorMetadata, ParameterMetadata, TypeMetadata};
use di_impl::MetadataCatalog;
use infrastructure_composition::ContextBuilder;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
pub fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info")
            .try_init()
            .ok();
    });
}

pub mod shop {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    /// 内存中的用户仓储
    #[derive(Default)]
    pub struct UserRepository {
        pub users: Mutex<BTreeMap<u64, String>>,
    }

    impl UserRepository {
        pub fn save(&self, id: u64, name: &str) {
            self.users.lock().unwrap().insert(id, name.to_string());
        }

        pub fn find(&self, id: u64) -> Option<String> {
            self.users.lock().unwrap().get(&id).cloned()
        }
    }

    pub struct UserService {
        pub repository: Arc<UserRepository>,
    }

    impl UserService {
        pub fn user_name(&self, id: u64) -> Option<String> {
            self.repository.find(id)
        }
    }

    pub struct UserController {
        pub service: Arc<UserService>,
        pub app_name: String,
    }

    impl UserController {
        pub fn greet(&self, id: u64) -> String {
            match self.service.user_name(id) {
                Some(name) => format!("[{}] hello, {}", self.app_name, name),
                None => format!("[{}] unknown user {}", self.app_name, id),
            }
        }
    }
}

/// `shop` 模块的扫描路径
pub fn shop_package() -> String {
    format!("{}::shop", module_path!())
}

/// 仓储、服务、控制器三个组件
///
/// 服务按类型注入仓储，控制器按名称注入服务并读取 `${app.name:demo}`。
pub fn shop_catalog() -> MetadataCatalog {
    MetadataCatalog::new()
        .with_type(
            TypeMetadata::of::<shop::UserRepository>()
                .with_annotation(Annotation::stereotype("Repository").with_attribute("value", "repo"))
                .with_constructor(ConstructorMetadata::no_args(shop::UserRepository::default)),
        )
        .with_type(
            TypeMetadata::of::<shop::UserService>()
                .with_annotation(Annotation::stereotype("Service").with_attribute("value", "service"))
                .with_constructor(ConstructorMetadata::new(
                    vec![ParameterMetadata::autowired::<shop::UserRepository>("repository")],
                    |args| {
                        Ok(shop::UserService {
                            repository: args.bean(0)?,
                        })
                    },
                )),
        )
        .with_type(
            TypeMetadata::of::<shop::UserController>()
                .with_annotation(Annotation::component_named("controller"))
                .with_constructor(ConstructorMetadata::new(
                    vec![
                        ParameterMetadata::autowired_named::<shop::UserService>(
                            "service", "service",
                        ),
                        ParameterMetadata::value::<String>("appName", "${app.name:demo}"),
                    ],
                    |args| {
                        Ok(shop::UserController {
                            service: args.bean(0)?,
                            app_name: args.value(1)?,
                        })
                    },
                )),
        )
}

/// 扫描 `shop` 包的上下文构建器
pub fn shop_builder() -> ContextBuilder {
    init_test_logger();
    ContextBuilder::new()
        .with_catalog(shop_catalog())
        .scan_package(shop_package())
}
