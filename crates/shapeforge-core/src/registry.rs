//! In-memory shape provider.
//!
//! Shapes live in an arena indexed by `TypeId`. The leaf types are
//! pre-registered at their fixed ids when the registry is created, so custom
//! types always start at `FIRST_CUSTOM_TYPE`.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::construct::{AddFn, ConstructError, ConstructorModel, InsertFn, ParameterModel};
use crate::kind::LeafKind;
use crate::provider::ShapeProvider;
use crate::types::{
    DictionaryShape, EnumShape, EnumerableShape, FIRST_CUSTOM_TYPE, ShapeKind, TypeId, TypeShape,
};
use crate::value::Value;

/// Errors raised while defining shapes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("type `{0}` is already defined")]
    DuplicateName(String),

    #[error("unknown type id {}", .0.0)]
    UnknownType(TypeId),

    #[error("type id {} was declared as `{declared}`, not `{defined}`", .id.0)]
    NameMismatch {
        id: TypeId,
        declared: String,
        defined: String,
    },

    #[error("type `{0}` is already complete")]
    AlreadyDefined(String),
}

/// Arena-backed shape registry.
#[derive(Clone, Debug)]
pub struct ShapeRegistry {
    shapes: Vec<TypeShape>,
    names: IndexMap<String, TypeId>,
    /// Types reserved by `declare` and not yet given their real shape.
    declared: Vec<TypeId>,
    nullable_wrappers: HashMap<TypeId, TypeId>,
    list_wrappers: HashMap<TypeId, TypeId>,
    array_wrappers: HashMap<TypeId, TypeId>,
    map_wrappers: HashMap<(TypeId, TypeId), TypeId>,
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            shapes: Vec::new(),
            names: IndexMap::new(),
            declared: Vec::new(),
            nullable_wrappers: HashMap::new(),
            list_wrappers: HashMap::new(),
            array_wrappers: HashMap::new(),
            map_wrappers: HashMap::new(),
        };

        // Leaves first, at the ids matching their discriminants
        for kind in LeafKind::ALL {
            let id = registry.insert(TypeShape::leaf(kind));
            debug_assert_eq!(id, TypeId::of_leaf(kind));
        }
        debug_assert_eq!(registry.shapes.len(), FIRST_CUSTOM_TYPE.index());

        registry
    }

    fn insert(&mut self, shape: TypeShape) -> TypeId {
        let id = TypeId(self.shapes.len() as u32);
        self.names.insert(shape.name.clone(), id);
        self.shapes.push(shape);
        id
    }

    /// Register a complete shape under its name.
    pub fn define(&mut self, shape: TypeShape) -> Result<TypeId, ShapeError> {
        if self.names.contains_key(&shape.name) {
            return Err(ShapeError::DuplicateName(shape.name));
        }
        Ok(self.insert(shape))
    }

    /// Reserve an id for a type whose shape refers back to itself.
    ///
    /// The reserved slot holds an empty object shape until [`Self::complete`].
    pub fn declare(&mut self, name: impl Into<String>) -> Result<TypeId, ShapeError> {
        let id = self.define(TypeShape::object(name))?;
        self.declared.push(id);
        Ok(id)
    }

    /// Fill in a type reserved by [`Self::declare`].
    pub fn complete(&mut self, id: TypeId, shape: TypeShape) -> Result<(), ShapeError> {
        let Some(pos) = self.declared.iter().position(|&d| d == id) else {
            return match self.shapes.get(id.index()) {
                Some(existing) => Err(ShapeError::AlreadyDefined(existing.name.clone())),
                None => Err(ShapeError::UnknownType(id)),
            };
        };

        let declared = &self.shapes[id.index()].name;
        if *declared != shape.name {
            return Err(ShapeError::NameMismatch {
                id,
                declared: declared.clone(),
                defined: shape.name,
            });
        }

        self.declared.swap_remove(pos);
        self.shapes[id.index()] = shape;
        Ok(())
    }

    /// Define an enum with the given members.
    pub fn define_enum<I, S>(&mut self, name: &str, members: I) -> Result<TypeId, ShapeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members = members.into_iter().map(Into::into).collect();
        self.define(TypeShape::new(name, ShapeKind::Enum(EnumShape { members })))
    }

    /// Define an open polymorphic type.
    pub fn define_abstract(&mut self, name: &str) -> Result<TypeId, ShapeError> {
        self.define(TypeShape::new(name, ShapeKind::Abstract))
    }

    /// Get or create the nullable wrapper for `element`.
    pub fn nullable_of(&mut self, element: TypeId) -> TypeId {
        if let Some(&id) = self.nullable_wrappers.get(&element) {
            return id;
        }

        let name = format!("{}?", self.display_name(element));
        let id = self.insert(TypeShape::new(name, ShapeKind::Nullable { element }));
        self.nullable_wrappers.insert(element, id);
        id
    }

    /// Get or create a growable list of `element`.
    ///
    /// Lists have a default constructor and an add operation.
    pub fn list_of(&mut self, element: TypeId) -> TypeId {
        if let Some(&id) = self.list_wrappers.get(&element) {
            return id;
        }

        let name = format!("List<{}>", self.display_name(element));
        let shape = TypeShape::new(
            name,
            ShapeKind::Enumerable(EnumerableShape {
                element,
                add: Some(list_add()),
                is_array: false,
            }),
        )
        .with_constructor(ConstructorModel::default_value(Value::List(Vec::new())));
        let id = self.insert(shape);
        self.list_wrappers.insert(element, id);
        id
    }

    /// Get or create a fixed-length array of `element`.
    pub fn array_of(&mut self, element: TypeId) -> TypeId {
        if let Some(&id) = self.array_wrappers.get(&element) {
            return id;
        }

        let name = format!("{}[]", self.display_name(element));
        let shape = TypeShape::new(
            name,
            ShapeKind::Enumerable(EnumerableShape {
                element,
                add: None,
                is_array: true,
            }),
        );
        let id = self.insert(shape);
        self.array_wrappers.insert(element, id);
        id
    }

    /// Get or create a mutable dictionary from `key` to `value`.
    pub fn map_of(&mut self, key: TypeId, value: TypeId) -> TypeId {
        if let Some(&id) = self.map_wrappers.get(&(key, value)) {
            return id;
        }

        let name = format!(
            "Map<{}, {}>",
            self.display_name(key),
            self.display_name(value)
        );
        let shape = TypeShape::new(
            name,
            ShapeKind::Dictionary(DictionaryShape {
                key,
                value,
                insert: Some(map_insert()),
            }),
        )
        .with_constructor(ConstructorModel::default_value(Value::Map(Vec::new())));
        let id = self.insert(shape);
        self.map_wrappers.insert((key, value), id);
        id
    }

    /// Constructor taking one sequence argument, for immutable containers.
    ///
    /// `sequence` must be a list (or, for dictionaries, a map) over the same
    /// element types as the container being built.
    pub fn sequence_constructor(
        sequence: TypeId,
        factory: impl Fn(Value) -> Result<Value, ConstructError> + Send + Sync + 'static,
    ) -> ConstructorModel {
        ConstructorModel::new(
            vec![ParameterModel::required("items", sequence, 0)],
            move |mut args| {
                let items = args.pop().unwrap_or(Value::Null);
                factory(items)
            },
        )
    }

    fn display_name(&self, id: TypeId) -> String {
        self.shapes
            .get(id.index())
            .map_or_else(|| format!("#{}", id.0), |shape| shape.name.clone())
    }

    /// Number of registered types, leaves included.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Iterate over all shapes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeShape)> {
        self.shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| (TypeId(i as u32), shape))
    }

    /// Whether any `declare`d type is still waiting for `complete`.
    pub fn has_incomplete(&self) -> bool {
        !self.declared.is_empty()
    }
}

impl ShapeProvider for ShapeRegistry {
    fn shape(&self, type_id: TypeId) -> Option<&TypeShape> {
        self.shapes.get(type_id.index())
    }

    fn lookup(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }
}

/// Add operation for `Value::List` containers.
pub fn list_add() -> AddFn {
    Arc::new(|target, item| match target {
        Value::List(items) => {
            items.push(item);
            Ok(())
        }
        other => Err(ConstructError::InvalidTarget {
            expected: "list",
            found: other.variant_name(),
        }),
    })
}

/// Insert operation for `Value::Map` containers; an existing key is replaced.
pub fn map_insert() -> InsertFn {
    Arc::new(|target, key, value| match target {
        Value::Map(entries) => {
            if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
                slot.1 = value;
            } else {
                entries.push((key, value));
            }
            Ok(())
        }
        other => Err(ConstructError::InvalidTarget {
            expected: "map",
            found: other.variant_name(),
        }),
    })
}
