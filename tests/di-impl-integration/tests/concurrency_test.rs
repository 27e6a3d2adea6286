//! 并发构建与并发查找测试

mod common;

use common::shop::UserController;
use common::shop_builder;
use di_abstractions::BeanFactory;
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// 测试互不相关的上下文可以并发构建
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_independent_contexts_build_concurrently() -> anyhow::Result<()> {
    let mut handles = Vec::new();
    for i in 0..8 {
        handles.push(tokio::task::spawn_blocking(move || {
            let app_name = format!("shop-{}", i);
            let context = shop_builder()
                .with_properties(vec![("app.name", app_name.clone())])
                .build()?;
            let controller = context.get_bean_typed::<UserController>("controller")?;
            anyhow::ensure!(controller.app_name == app_name, "属性串到了其他上下文");
            anyhow::Ok(context.id())
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await??);
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);
    Ok(())
}

/// 测试启动后的上下文可以在线程间共享查询
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_context_serves_concurrent_lookups() -> anyhow::Result<()> {
    let context = Arc::new(shop_builder().build()?);
    let expected = context.get_bean("service")?;

    let mut handles = Vec::new();
    for _ in 0..16 {
        let context = Arc::clone(&context);
        handles.push(tokio::spawn(async move {
            let controller = context.get_bean_typed::<UserController>("controller")?;
            let service = context.get_bean("service")?;
            anyhow::Ok((controller, service))
        }));
    }

    for handle in handles {
        let (controller, service) = handle.await??;
        assert!(Arc::ptr_eq(&service, &expected));
        assert_eq!(controller.app_name, "demo");
    }
    Ok(())
}
