//! Entity managers and the constructor map used to instantiate them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::attribute::AttributeDescriptor;
use super::entity::ManagerType;

/// Owner of an entity's attribute declarations and business rules.
pub trait EntityManager: Send + Sync {
    /// Attributes declared for the managed entity, in declaration order.
    fn attributes(&self) -> Vec<AttributeDescriptor>;
}

/// Constructor for a manager instance.
pub type ManagerFactory = Arc<dyn Fn() -> Arc<dyn EntityManager> + Send + Sync>;

/// Manager serving attributes declared inline in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredManager {
    attributes: Vec<AttributeDescriptor>,
}

impl DeclaredManager {
    /// Create a manager over the given attributes.
    pub fn new(attributes: Vec<AttributeDescriptor>) -> Self {
        Self { attributes }
    }
}

impl EntityManager for DeclaredManager {
    fn attributes(&self) -> Vec<AttributeDescriptor> {
        self.attributes.clone()
    }
}

/// Map from manager type name to constructor.
///
/// Built by the host before the registry loads; the registry looks each
/// configured manager up here instead of instantiating by name.
#[derive(Clone, Default)]
pub struct ManagerFactories {
    factories: HashMap<ManagerType, ManagerFactory>,
}

impl ManagerFactories {
    /// Create an empty constructor map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor for a manager type.
    ///
    /// A later registration for the same type replaces the earlier one.
    pub fn register<F>(&mut self, manager: impl Into<ManagerType>, factory: F)
    where
        F: Fn() -> Arc<dyn EntityManager> + Send + Sync + 'static,
    {
        self.factories.insert(manager.into(), Arc::new(factory));
    }

    /// Register a constructor (builder style).
    pub fn with<F>(mut self, manager: impl Into<ManagerType>, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn EntityManager> + Send + Sync + 'static,
    {
        self.register(manager, factory);
        self
    }

    /// Check if a constructor exists for the manager type.
    pub fn contains(&self, manager: &ManagerType) -> bool {
        self.factories.contains_key(manager)
    }

    /// Instantiate a manager, if a constructor is registered.
    pub fn create(&self, manager: &ManagerType) -> Option<Arc<dyn EntityManager>> {
        self.factories.get(manager).map(|factory| factory())
    }

    /// Number of registered constructors.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if no constructors are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for ManagerFactories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.factories.keys().map(ManagerType::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ManagerFactories")
            .field("managers", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OrderManager;

    impl EntityManager for OrderManager {
        fn attributes(&self) -> Vec<AttributeDescriptor> {
            vec![
                AttributeDescriptor::number("total").fillable(),
                AttributeDescriptor::text("notes"),
            ]
        }
    }

    #[test]
    fn test_register_and_create() {
        let factories =
            ManagerFactories::new().with("shop::OrderManager", || Arc::new(OrderManager));

        let manager_type = ManagerType::from("shop::OrderManager");
        assert!(factories.contains(&manager_type));
        assert_eq!(factories.len(), 1);

        let manager = factories.create(&manager_type).unwrap();
        assert_eq!(manager.attributes().len(), 2);

        assert!(factories.create(&ManagerType::from("shop::Unknown")).is_none());
    }

    #[test]
    fn test_declared_manager() {
        let manager = DeclaredManager::new(vec![AttributeDescriptor::boolean("active")]);
        let attributes = manager.attributes();

        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes[0].name, "active");
    }
}
