//! 仓储、服务、控制器的端到端测试

mod common;

use common::shop::{UserController, UserRepository, UserService};
use common::shop_builder;
use di_abstractions::BeanFactory;
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// 测试未配置属性时使用默认值
#[test]
fn test_controller_service_repository_with_default_name() -> anyhow::Result<()> {
    let context = shop_builder().build()?;

    assert_eq!(
        context.bean_names(),
        vec!["controller", "repo", "service"]
    );

    let controller = context.get_bean_typed::<UserController>("controller")?;
    let service = context.get_bean_by_type::<UserService>()?;
    let repository = context.get_bean_by_type::<UserRepository>()?;

    assert!(Arc::ptr_eq(&controller.service, &service));
    assert!(Arc::ptr_eq(&service.repository, &repository));
    assert_eq!(controller.app_name, "demo");

    repository.save(7, "lorn");
    assert_eq!(controller.greet(7), "[demo] hello, lorn");
    assert_eq!(controller.greet(8), "[demo] unknown user 8");

    context.close()?;
    Ok(())
}

/// 测试属性覆盖默认值
#[test]
fn test_property_overrides_default_name() -> anyhow::Result<()> {
    let context = shop_builder()
        .with_properties(vec![("app.name", "shop")])
        .build()?;

    let controller = context.get_bean_typed::<UserController>("controller")?;
    assert_eq!(controller.app_name, "shop");
    Ok(())
}

/// 测试依赖按需提前创建
#[test]
fn test_dependencies_precede_dependents() -> anyhow::Result<()> {
    let context = shop_builder().build()?;

    // 同为默认顺序时按名称排序，控制器最先被选中，但依赖先完成创建
    assert_eq!(
        context.creation_order(),
        ["repo", "service", "controller"]
    );
    Ok(())
}

/// 测试每个定义在启动后都已填充实例
#[test]
fn test_every_definition_is_populated() -> anyhow::Result<()> {
    let context = shop_builder().build()?;

    for name in context.bean_names() {
        let definition = context
            .find_definition(&name)
            .ok_or_else(|| anyhow::anyhow!("缺少定义: {}", name))?;
        assert!(definition.is_created(), "Bean '{}' 未创建", name);
        assert!(context.get_bean(&name).is_ok());
    }
    Ok(())
}
