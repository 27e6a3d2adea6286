//! 容器简化示例
//!
//! 演示包扫描、属性注入、配置类工厂方法、后置处理器和生命周期回调。
//! 可以通过 `LORN_SHOP_CURRENCY=USD` 之类的环境变量覆盖 JSON 中的属性。

use di_abstractions::{
    Annotation, BeanFactory, BeanInstance, BeanPostProcessor, ConstructorMetadata,
    MethodMetadata, ParameterMetadata, TypeMetadata,
};
use infrastructure_composition::{ContextBuilder, LoggingConfig};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;

mod shop {
    use super::*;

    /// 价格表，由配置类创建
    pub struct PriceList {
        pub currency: String,
        pub prices: Mutex<BTreeMap<String, u64>>,
    }

    impl PriceList {
        pub fn load(&self) -> Result<(), infrastructure_common::BoxError> {
            let mut prices = self.prices.lock().map_err(|e| e.to_string())?;
            prices.insert("apple".to_string(), 3);
            prices.insert("pear".to_string(), 5);
            info!("价格表已加载，{} 个商品", prices.len());
            Ok(())
        }

        pub fn price_of(&self, item: &str) -> Option<u64> {
            self.prices.lock().ok()?.get(item).copied()
        }
    }

    pub struct ShopConfig;

    pub struct OrderService {
        pub prices: Arc<PriceList>,
        pub timeout: Duration,
        pub placed: AtomicUsize,
    }

    impl OrderService {
        pub fn place(&self, item: &str, quantity: u64) -> anyhow::Result<u64> {
            let price = self
                .prices
                .price_of(item)
                .ok_or_else(|| anyhow::anyhow!("未知商品: {}", item))?;
            self.placed.fetch_add(1, Ordering::Relaxed);
            Ok(price * quantity)
        }

        pub fn report(&self) -> Result<(), infrastructure_common::BoxError> {
            info!("共处理 {} 个订单", self.placed.load(Ordering::Relaxed));
            Ok(())
        }
    }

    pub struct OrderController {
        pub service: Arc<OrderService>,
    }
}

/// 记录每个 Bean 经过后置处理的顺序
#[derive(Default)]
struct CreationAudit {
    count: AtomicUsize,
}

impl BeanPostProcessor for CreationAudit {
    fn post_process_before_initialization(
        &self,
        bean: BeanInstance,
        bean_name: &str,
    ) -> Option<BeanInstance> {
        let index = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        info!("#{} Bean '{}' 创建完成", index, bean_name);
        Some(bean)
    }
}

fn shop_types() -> Vec<TypeMetadata> {
    use shop::*;

    let price_list = TypeMetadata::of::<PriceList>()
        .with_method(MethodMetadata::callback::<PriceList, _>("load", PriceList::load));

    vec![
        TypeMetadata::of::<ShopConfig>()
            .with_annotation(Annotation::configuration())
            .with_constructor(ConstructorMetadata::no_args(|| ShopConfig))
            .with_method(
                MethodMetadata::factory::<ShopConfig, PriceList, _>(
                    "priceList",
                    price_list,
                    vec![ParameterMetadata::value::<String>("currency", "${shop.currency:CNY}")],
                    |_, args| {
                        Ok(PriceList {
                            currency: args.value(0)?,
                            prices: Mutex::new(BTreeMap::new()),
                        })
                    },
                )
                .with_annotation(Annotation::bean().with_init_method("load")),
            ),
        TypeMetadata::of::<OrderService>()
            .with_annotation(Annotation::stereotype("Service"))
            .with_constructor(ConstructorMetadata::new(
                vec![
                    ParameterMetadata::autowired::<PriceList>("prices"),
                    ParameterMetadata::value::<Duration>("timeout", "${shop.order.timeout:5s}"),
                ],
                |args| {
                    Ok(OrderService {
                        prices: args.bean(0)?,
                        timeout: args.value(1)?,
                        placed: AtomicUsize::new(0),
                    })
                },
            ))
            .with_method(
                MethodMetadata::callback::<OrderService, _>("report", OrderService::report)
                    .with_annotation(Annotation::pre_destroy()),
            ),
        TypeMetadata::of::<OrderController>()
            .with_annotation(Annotation::stereotype("Controller").with_attribute("value", "orders"))
            .with_constructor(ConstructorMetadata::new(
                vec![ParameterMetadata::autowired::<OrderService>("service")],
                |args| {
                    Ok(OrderController {
                        service: args.bean(0)?,
                    })
                },
            )),
    ]
}

fn main() -> anyhow::Result<()> {
    let mut builder = ContextBuilder::new()
        .with_logging(LoggingConfig::default())
        .scan_package(format!("{}::shop", module_path!()))
        .register_type(
            TypeMetadata::of::<CreationAudit>()
                .with_annotation(Annotation::component())
                .with_constructor(ConstructorMetadata::no_args(CreationAudit::default))
                .post_processor::<CreationAudit>(),
        )
        .import_type::<CreationAudit>()
        .add_json(
            "application.json",
            &json!({
                "shop": {
                    "currency": "CNY",
                    "order": { "timeout": "30s" }
                }
            }),
        )
        .add_env_vars("LORN");

    for metadata in shop_types() {
        builder = builder.register_type(metadata);
    }

    let context = builder.build()?;
    info!("上下文 {} 中的 Bean: {:?}", context.id(), context.bean_names());

    let controller = context.get_bean_typed::<shop::OrderController>("orders")?;
    let total = controller.service.place("apple", 4)?;
    info!(
        "订单金额: {} {} (超时 {:?})",
        total, controller.service.prices.currency, controller.service.timeout
    );

    context.close()?;
    Ok(())
}
