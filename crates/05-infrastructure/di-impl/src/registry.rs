//! 默认 Bean 定义注册表

use di_abstractions::{BeanDefinition, BeanRegistry};
use infrastructure_common::{
    Ambiguity, BeanDefinitionError, DefinitionResult, LookupError, LookupResult, TypeInfo,
};
use std::collections::HashMap;
use tracing::debug;

/// 以 Bean 名称为键的定义注册表
///
/// 注册阶段可变，容器启动后只读。实例槽自身保证只填充一次，
/// 因此创建引擎只需要共享引用。
#[derive(Debug, Default)]
pub struct DefaultBeanRegistry {
    definitions: HashMap<String, BeanDefinition>,
}

impl DefaultBeanRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册定义，名称重复时报 `DuplicateBeanName`
    pub fn register(&mut self, definition: BeanDefinition) -> DefinitionResult<()> {
        if self.definitions.contains_key(definition.name()) {
            return Err(BeanDefinitionError::DuplicateBeanName {
                name: definition.name().to_string(),
                type_name: definition.type_name().to_string(),
            });
        }

        debug!("注册 Bean 定义: {:?}", definition);
        self.definitions
            .insert(definition.name().to_string(), definition);
        Ok(())
    }

    /// 按 (order, name) 排序的全部定义
    pub fn sorted_definitions(&self) -> Vec<&BeanDefinition> {
        let mut definitions: Vec<&BeanDefinition> = self.definitions.values().collect();
        definitions.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        definitions
    }

    /// 按 (order, name) 排序并满足条件的定义名称
    pub fn sorted_names_where(&self, predicate: impl Fn(&BeanDefinition) -> bool) -> Vec<String> {
        self.sorted_definitions()
            .into_iter()
            .filter(|def| predicate(def))
            .map(|def| def.name().to_string())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl BeanRegistry for DefaultBeanRegistry {
    fn find_definition(&self, name: &str) -> Option<&BeanDefinition> {
        self.definitions.get(name)
    }

    fn find_definition_of(
        &self,
        name: &str,
        required_type: &TypeInfo,
    ) -> LookupResult<Option<&BeanDefinition>> {
        match self.definitions.get(name) {
            None => Ok(None),
            Some(def) if def.is_assignable_to(required_type) => Ok(Some(def)),
            Some(def) => Err(LookupError::BeanNotOfRequiredType {
                name: name.to_string(),
                required_type: required_type.name.clone(),
                actual_type: def.type_name().to_string(),
            }),
        }
    }

    fn find_definitions(&self, type_info: &TypeInfo) -> Vec<&BeanDefinition> {
        self.sorted_definitions()
            .into_iter()
            .filter(|def| def.is_assignable_to(type_info))
            .collect()
    }

    fn find_definition_by_type(&self, type_info: &TypeInfo) -> LookupResult<Option<&BeanDefinition>> {
        let candidates = self.find_definitions(type_info);
        match candidates.as_slice() {
            [] => return Ok(None),
            [single] => return Ok(Some(*single)),
            _ => {}
        }

        let primaries: Vec<&BeanDefinition> = candidates
            .iter()
            .copied()
            .filter(|def| def.is_primary())
            .collect();

        match primaries.as_slice() {
            [primary] => Ok(Some(*primary)),
            [] => Err(LookupError::NoUniqueBeanDefinition {
                type_name: type_info.name.clone(),
                reason: Ambiguity::NoPrimary {
                    candidates: candidates.iter().map(|d| d.name().to_string()).collect(),
                },
            }),
            _ => Err(LookupError::NoUniqueBeanDefinition {
                type_name: type_info.name.clone(),
                reason: Ambiguity::MultiplePrimary {
                    primaries: primaries.iter().map(|d| d.name().to_string()).collect(),
                },
            }),
        }
    }

    fn definition_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn definition_count(&self) -> usize {
        self.definitions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_abstractions::{ConstructorMetadata, CreationMode, TypeMetadata};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    trait Store: Send + Sync {}

    struct MemoryStore;
    struct DiskStore;
    struct CloudStore;

    fn definition<T: Send + Sync + 'static>(
        name: &str,
        ctor: fn() -> T,
        order: i32,
        primary: bool,
    ) -> BeanDefinition {
        BeanDefinition::new(
            name,
            Arc::new(TypeMetadata::of::<T>().implements::<dyn Store>()),
            CreationMode::Constructor(ConstructorMetadata::no_args(ctor)),
        )
        .with_order(order)
        .with_primary(primary)
    }

    fn registry(primaries: [bool; 3]) -> DefaultBeanRegistry {
        let mut registry = DefaultBeanRegistry::new();
        registry
            .register(definition("memory", || MemoryStore, 2, primaries[0]))
            .unwrap();
        registry
            .register(definition("disk", || DiskStore, 1, primaries[1]))
            .unwrap();
        registry
            .register(definition("cloud", || CloudStore, 1, primaries[2]))
            .unwrap();
        registry
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = registry([false; 3]);
        let err = registry
            .register(definition("disk", || MemoryStore, 0, false))
            .unwrap_err();
        assert!(matches!(err, BeanDefinitionError::DuplicateBeanName { name, .. } if name == "disk"));
    }

    #[test]
    fn definitions_are_sorted_by_order_then_name() {
        let registry = registry([false; 3]);
        let names: Vec<&str> = registry
            .find_definitions(&TypeInfo::of::<dyn Store>())
            .into_iter()
            .map(BeanDefinition::name)
            .collect();
        assert_eq!(names, vec!["cloud", "disk", "memory"]);
    }

    #[test]
    fn single_candidate_needs_no_primary() {
        let registry = registry([false; 3]);
        let def = registry
            .find_definition_by_type(&TypeInfo::of::<DiskStore>())
            .unwrap()
            .unwrap();
        assert_eq!(def.name(), "disk");
        assert!(registry
            .find_definition_by_type(&TypeInfo::of::<String>())
            .unwrap()
            .is_none());
    }

    #[test]
    fn primary_breaks_ties() {
        let target = TypeInfo::of::<dyn Store>();

        let none = registry([false, false, false]);
        assert!(matches!(
            none.find_definition_by_type(&target),
            Err(LookupError::NoUniqueBeanDefinition {
                reason: Ambiguity::NoPrimary { .. },
                ..
            })
        ));

        let one = registry([true, false, false]);
        assert_eq!(
            one.find_definition_by_type(&target).unwrap().unwrap().name(),
            "memory"
        );

        let two = registry([true, false, true]);
        assert_eq!(
            two.find_definition_by_type(&target).unwrap_err(),
            LookupError::NoUniqueBeanDefinition {
                type_name: target.name.clone(),
                reason: Ambiguity::MultiplePrimary {
                    primaries: vec!["cloud".to_string(), "memory".to_string()],
                },
            }
        );
    }

    #[test]
    fn named_lookup_checks_type() {
        let registry = registry([false; 3]);
        assert!(registry
            .find_definition_of("disk", &TypeInfo::of::<dyn Store>())
            .unwrap()
            .is_some());
        assert!(registry
            .find_definition_of("missing", &TypeInfo::of::<dyn Store>())
            .unwrap()
            .is_none());
        assert!(matches!(
            registry.find_definition_of("disk", &TypeInfo::of::<MemoryStore>()),
            Err(LookupError::BeanNotOfRequiredType { .. })
        ));
    }
}
