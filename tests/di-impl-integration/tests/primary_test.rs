//! 按类型查找时 @Primary 的消歧测试

use config_impl::DefaultPropertyResolver;
use di_abstractions::{
    Annotation, BeanFactory, BeanInstance, ConstructorMetadata, MetadataSource, ParameterMetadata,
    TypeMetadata,
};
use di_impl::{ApplicationContext, MetadataCatalog};
use infrastructure_common::{
    Ambiguity, BeanCreationError, ContextError, ContextResult, LookupError, TypeInfo,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::sync::Arc;

trait Store: Send + Sync {}

struct MemoryStore;
struct DiskStore;
struct CloudStore;

/// 按 `dyn Store` 注入，保留原始实例
struct Archive {
    store: BeanInstance,
}

fn store<T: Send + Sync + 'static>(ctor: fn() -> T, primary: bool) -> TypeMetadata {
    let metadata = TypeMetadata::of::<T>()
        .with_annotation(Annotation::component())
        .with_constructor(ConstructorMetadata::no_args(ctor))
        .implements::<dyn Store>();
    if primary {
        metadata.with_annotation(Annotation::primary())
    } else {
        metadata
    }
}

fn catalog(primaries: [bool; 3], with_archive: bool) -> MetadataCatalog {
    let catalog = MetadataCatalog::new()
        .with_type(store(|| MemoryStore, primaries[0]))
        .with_type(store(|| DiskStore, primaries[1]))
        .with_type(store(|| CloudStore, primaries[2]));
    if !with_archive {
        return catalog;
    }
    catalog.with_type(
        TypeMetadata::of::<Archive>()
            .with_annotation(Annotation::component())
            .with_constructor(ConstructorMetadata::new(
                vec![ParameterMetadata::autowired::<dyn Store>("store")],
                |args| {
                    Ok(Archive {
                        store: args.instance(0)?,
                    })
                },
            )),
    )
}

fn start(catalog: &MetadataCatalog) -> ContextResult<ApplicationContext> {
    let type_names: BTreeSet<String> = catalog.type_names().into_iter().collect();
    ApplicationContext::new(
        &type_names,
        catalog,
        Arc::new(DefaultPropertyResolver::from_map(Vec::<(&str, &str)>::new())),
    )
}

fn ambiguity(err: ContextError) -> Ambiguity {
    match err {
        ContextError::Creation {
            source:
                BeanCreationError::Dependency {
                    source: LookupError::NoUniqueBeanDefinition { reason, .. },
                    ..
                },
        }
        | ContextError::Lookup {
            source: LookupError::NoUniqueBeanDefinition { reason, .. },
        } => reason,
        other => panic!("期望无法唯一确定 Bean，实际为: {}", other),
    }
}

/// 测试没有 @Primary 时注入失败
#[test]
fn test_no_primary_among_three() {
    let err = start(&catalog([false, false, false], true)).unwrap_err();
    assert_eq!(
        ambiguity(err),
        Ambiguity::NoPrimary {
            candidates: vec![
                "cloudStore".to_string(),
                "diskStore".to_string(),
                "memoryStore".to_string(),
            ],
        }
    );
}

/// 测试唯一的 @Primary 被选中
#[test]
fn test_single_primary_is_chosen() {
    let context = start(&catalog([false, true, false], true)).unwrap();

    let archive = context.get_bean_by_type::<Archive>().unwrap();
    assert!(archive.store.downcast_ref::<DiskStore>().is_some());

    let by_trait = context.get_bean_of_type(&TypeInfo::of::<dyn Store>()).unwrap();
    assert!(Arc::ptr_eq(&by_trait, &archive.store));
    assert_eq!(context.find_definitions(&TypeInfo::of::<dyn Store>()).len(), 3);
}

/// 测试多个 @Primary 时注入失败
#[test]
fn test_multiple_primaries_among_three() {
    let err = start(&catalog([true, false, true], true)).unwrap_err();
    assert_eq!(
        ambiguity(err),
        Ambiguity::MultiplePrimary {
            primaries: vec!["cloudStore".to_string(), "memoryStore".to_string()],
        }
    );
}

/// 测试启动后按类型查找的消歧
#[test]
fn test_lookup_after_startup_reports_ambiguity() {
    let context = start(&catalog([false, false, false], false)).unwrap();
    let err = context
        .get_bean_of_type(&TypeInfo::of::<dyn Store>())
        .unwrap_err();
    assert!(matches!(ambiguity(err), Ambiguity::NoPrimary { .. }));

    // 具体类型总是唯一的
    assert!(context.get_bean_by_type::<MemoryStore>().is_ok());
}
