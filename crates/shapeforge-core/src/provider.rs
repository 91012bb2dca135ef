//! Shape query interface.

use crate::types::{TypeId, TypeShape};

/// Read-only access to type shapes.
///
/// The engine only ever queries shapes through this trait; where the shapes
/// come from (reflection, a schema file, hand-written descriptors) is the
/// provider's business.
pub trait ShapeProvider {
    fn shape(&self, type_id: TypeId) -> Option<&TypeShape>;

    /// Resolve a type by its registered name.
    fn lookup(&self, name: &str) -> Option<TypeId>;

    fn name_of(&self, type_id: TypeId) -> Option<&str> {
        self.shape(type_id).map(|shape| shape.name.as_str())
    }
}

impl<T: ShapeProvider + ?Sized> ShapeProvider for &T {
    fn shape(&self, type_id: TypeId) -> Option<&TypeShape> {
        (*self).shape(type_id)
    }
    fn lookup(&self, name: &str) -> Option<TypeId> {
        (*self).lookup(name)
    }
    fn name_of(&self, type_id: TypeId) -> Option<&str> {
        (*self).name_of(type_id)
    }
}
