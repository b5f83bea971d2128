use std::any::TypeId;
use std::fmt;

/// Identifier of a mapped entity type.
///
/// Only ever used as a stub lookup key: the entity type itself is never
/// inspected, instantiated nor validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityRef {
    type_id: TypeId,
    name: &'static str,
}

impl EntityRef {
    /// Entity reference of the given type.
    pub fn of<E: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            name: short_type_name::<E>(),
        }
    }

    /// Entity type name, without module path.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Type name without module path nor generic arguments.
pub(crate) fn short_type_name<T>() -> &'static str {
    let complete_name = std::any::type_name::<T>();
    let without_generics = complete_name.split('<').next().unwrap_or(complete_name);
    without_generics.split("::").last().unwrap_or(complete_name)
}
