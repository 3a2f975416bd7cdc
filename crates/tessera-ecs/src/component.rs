//! Component type registration and type-erased component values.
//!
//! Components are plain data types attached to entities. Each component type
//! gets a [`ComponentId`] from the [`ComponentRegistry`] owned by the storage
//! engine, and values are held behind a uniform [`ComponentBox`] so one
//! archetype can store heterogeneous kinds while still allowing typed
//! retrieval.

use std::{
    any::{Any, TypeId},
    fmt,
};

use rustc_hash::FxHashMap;

/// Marker trait for types that can be used as components.
///
/// Components are value objects: reading one hands out a copy, and changes
/// become visible only when written back through
/// [`crate::ArchetypeStorage::attach`].
///
/// # Example
///
/// ```
/// use tessera_ecs::Component;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Position { x: f64, y: f64 }
///
/// impl Component for Position {}
/// ```
pub trait Component: Any + Send + Sync + fmt::Debug {}

/// Unique identifier for a component type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl ComponentId {
    /// Create a component ID from a raw value.
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentId({})", self.0)
    }
}

/// Runtime information about a component type.
#[derive(Clone, Debug)]
pub struct ComponentInfo {
    id: ComponentId,
    name: &'static str,
    type_id: TypeId,
}

impl ComponentInfo {
    /// Create component info for a concrete type.
    #[must_use]
    pub fn of<T: Component>(id: ComponentId) -> Self {
        Self {
            id,
            name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    /// Get the component ID.
    #[must_use]
    pub const fn id(&self) -> ComponentId {
        self.id
    }

    /// Full type name, for diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.name)
    }

    /// Check if this info is for the given type.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

/// Registry mapping Rust types to [`ComponentId`]s.
///
/// Ids are assigned in registration order and stay stable for the
/// registry's lifetime.
#[derive(Default)]
pub struct ComponentRegistry {
    type_to_id: FxHashMap<TypeId, ComponentId>,
    /// Indexed by `ComponentId`.
    infos: Vec<ComponentInfo>,
}

impl ComponentRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component type and return its ID.
    ///
    /// If the type is already registered, returns the existing ID.
    pub fn register<T: Component>(&mut self) -> ComponentId {
        let type_id = TypeId::of::<T>();

        if let Some(&id) = self.type_to_id.get(&type_id) {
            return id;
        }

        let id = ComponentId(self.infos.len() as u32);
        self.type_to_id.insert(type_id, id);
        self.infos.push(ComponentInfo::of::<T>(id));

        tracing::trace!(?id, name = std::any::type_name::<T>(), "registered component");
        id
    }

    /// Get the component ID for a type, if registered.
    #[must_use]
    pub fn id_of<T: Component>(&self) -> Option<ComponentId> {
        self.type_to_id.get(&TypeId::of::<T>()).copied()
    }

    /// Get component info by ID.
    #[must_use]
    pub fn info(&self, id: ComponentId) -> Option<&ComponentInfo> {
        self.infos.get(id.as_raw() as usize)
    }

    /// Short type name for an ID, or `"?"` for unknown IDs.
    #[must_use]
    pub fn name(&self, id: ComponentId) -> &'static str {
        self.info(id).map_or("?", ComponentInfo::short_name)
    }

    /// Get the number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Iterate over all registered component infos.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentInfo> {
        self.infos.iter()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("count", &self.len())
            .field("components", &self.infos)
            .finish()
    }
}

/// Object-safe view of a component used for type erasure.
trait ErasedComponent: Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn type_name(&self) -> &'static str;
}

impl<T: Component> ErasedComponent for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// An owned, type-erased component value.
pub struct ComponentBox {
    value: Box<dyn ErasedComponent>,
}

impl ComponentBox {
    /// Box a component value.
    pub fn new<T: Component>(value: T) -> Self {
        Self {
            value: Box::new(value),
        }
    }

    /// Check whether the boxed value is a `T`.
    #[must_use]
    pub fn is<T: Component>(&self) -> bool {
        self.value.as_any().is::<T>()
    }

    /// Borrow the value as a `T`.
    #[must_use]
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.value.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow the value as a `T`.
    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.value.as_any_mut().downcast_mut::<T>()
    }

    /// Unbox the value as a `T`.
    ///
    /// The value is dropped if it is not a `T`.
    #[must_use]
    pub fn downcast<T: Component>(self) -> Option<T> {
        self.value.into_any().downcast::<T>().ok().map(|value| *value)
    }

    /// Type name of the boxed value.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.value.type_name()
    }
}

impl fmt::Debug for ComponentBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.value, f)
    }
}

/// Strip the module path from a type name, keeping generic arguments intact.
fn short_type_name(name: &'static str) -> &'static str {
    let end = name.find('<').unwrap_or(name.len());
    match name[..end].rfind("::") {
        Some(idx) => &name[idx + 2..],
        None => name,
    }
}
