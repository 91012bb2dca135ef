//! Constructor and collection resolution.
//!
//! Pure decisions over shapes. The visitor supplies the slot resolution
//! callback so that plans can refer to child strategies.

use std::collections::HashSet;

use shapeforge_core::{
    AddFn, ConstructError, ConstructorModel, DictionaryShape, EnumerableShape, InsertFn,
    ParameterModel, PropertyModel, Record, ShapeKind, ShapeProvider, TypeId, TypeShape, Value,
};

use crate::cache::Slot;
use crate::error::BuildError;

/// How a container is rebuilt from decoded or generated elements.
#[derive(Clone)]
pub enum CollectionPolicy<Op> {
    /// Array target: the length is fixed before elements are built.
    FixedLength,
    /// Default-construct, then add elements one at a time.
    Mutable {
        constructor: ConstructorModel,
        op: Op,
    },
    /// Buffer every element, then call a one-argument constructor once.
    FromSequence { constructor: ConstructorModel },
    /// Enumerable but not reconstructible. Carries the error that decoding
    /// or generating this container reports.
    ReadOnly(BuildError),
}

impl<Op> CollectionPolicy<Op> {
    pub fn kind(&self) -> PolicyKind {
        match self {
            Self::FixedLength => PolicyKind::FixedLength,
            Self::Mutable { .. } => PolicyKind::Mutable,
            Self::FromSequence { .. } => PolicyKind::FromSequence,
            Self::ReadOnly(_) => PolicyKind::ReadOnly,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PolicyKind {
    FixedLength,
    Mutable,
    FromSequence,
    ReadOnly,
}

impl PolicyKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::FixedLength => "fixed-length",
            Self::Mutable => "mutable",
            Self::FromSequence => "from-sequence",
            Self::ReadOnly => "read-only",
        }
    }
}

/// Policy for a sequence container.
///
/// Arrays are always fixed-length. Otherwise a default constructor is usable
/// only together with an add operation; failing that, a single-parameter
/// constructor taking another sequence of the same element type; failing
/// that, the container is read-only.
pub fn collection_policy<P: ShapeProvider>(
    provider: &P,
    type_id: TypeId,
    shape: &TypeShape,
    enumerable: &EnumerableShape,
) -> CollectionPolicy<AddFn> {
    if enumerable.is_array {
        return CollectionPolicy::FixedLength;
    }

    if let Some(add) = &enumerable.add
        && let Some(constructor) = accessible(shape).find(|c| c.arity() == 0)
    {
        return CollectionPolicy::Mutable {
            constructor: constructor.clone(),
            op: add.clone(),
        };
    }

    let from_sequence = accessible(shape).find(|c| {
        single_parameter(c).is_some_and(|param| {
            param != type_id
                && matches!(
                    provider.shape(param).map(|s| &s.kind),
                    Some(ShapeKind::Enumerable(e)) if e.element == enumerable.element
                )
        })
    });
    match from_sequence {
        Some(constructor) => CollectionPolicy::FromSequence {
            constructor: constructor.clone(),
        },
        None => CollectionPolicy::ReadOnly(not_reconstructible(shape)),
    }
}

/// Policy for a key/value container; same ranking as [`collection_policy`],
/// with "sequence" meaning a dictionary over the same key and value types.
pub fn dictionary_policy<P: ShapeProvider>(
    provider: &P,
    type_id: TypeId,
    shape: &TypeShape,
    dictionary: &DictionaryShape,
) -> CollectionPolicy<InsertFn> {
    if let Some(insert) = &dictionary.insert
        && let Some(constructor) = accessible(shape).find(|c| c.arity() == 0)
    {
        return CollectionPolicy::Mutable {
            constructor: constructor.clone(),
            op: insert.clone(),
        };
    }

    let from_pairs = accessible(shape).find(|c| {
        single_parameter(c).is_some_and(|param| {
            param != type_id
                && matches!(
                    provider.shape(param).map(|s| &s.kind),
                    Some(ShapeKind::Dictionary(d))
                        if d.key == dictionary.key && d.value == dictionary.value
                )
        })
    });
    match from_pairs {
        Some(constructor) => CollectionPolicy::FromSequence {
            constructor: constructor.clone(),
        },
        None => CollectionPolicy::ReadOnly(not_reconstructible(shape)),
    }
}

fn not_reconstructible(shape: &TypeShape) -> BuildError {
    BuildError::NoConstructionStrategy {
        type_name: shape.name.clone(),
    }
}

fn accessible(shape: &TypeShape) -> impl Iterator<Item = &ConstructorModel> + Clone {
    shape.constructors.iter().filter(|c| c.accessible)
}

fn single_parameter(constructor: &ConstructorModel) -> Option<TypeId> {
    match constructor.parameters.as_slice() {
        [param] => Some(param.type_id),
        _ => None,
    }
}

/// Accessible constructor with the most parameters.
///
/// Ties keep the earliest in provider order.
pub fn select_constructor(shape: &TypeShape) -> Option<&ConstructorModel> {
    let mut best: Option<&ConstructorModel> = None;
    for constructor in accessible(shape) {
        if best.is_none_or(|b| constructor.arity() > b.arity()) {
            best = Some(constructor);
        }
    }
    best
}

/// Members of `shape` including inherited ones.
///
/// Base members come first. A member redeclared on a derived type replaces
/// the inherited one at the inherited position.
pub fn gather_members<P: ShapeProvider>(
    provider: &P,
    type_id: TypeId,
    shape: &TypeShape,
) -> Result<Vec<PropertyModel>, BuildError> {
    let mut chain = vec![shape];
    let mut seen = HashSet::from([type_id]);
    let mut next = shape.base;
    while let Some(base_id) = next {
        if !seen.insert(base_id) {
            return Err(BuildError::Unsupported {
                type_name: shape.name.clone(),
                reason: "base type chain is cyclic".to_owned(),
            });
        }
        let base = provider
            .shape(base_id)
            .ok_or(BuildError::UnknownType(base_id))?;
        chain.push(base);
        next = base.base;
    }

    let mut members: Vec<PropertyModel> = Vec::new();
    for declaring in chain.iter().rev() {
        for property in &declaring.properties {
            if !property.readable && !property.writable {
                continue;
            }
            match members.iter_mut().find(|m| m.name == property.name) {
                Some(existing) => *existing = property.clone(),
                None => members.push(property.clone()),
            }
        }
    }
    Ok(members)
}

/// One wire-visible member of an object.
#[derive(Clone, Debug)]
pub struct MemberPlan {
    pub property: PropertyModel,
    pub slot: Slot,
    /// Constructor parameter index this member feeds, if any.
    pub parameter: Option<usize>,
}

impl MemberPlan {
    /// Applied after construction rather than passed to the constructor.
    pub fn is_setter(&self) -> bool {
        self.parameter.is_none()
    }

    /// Write `value` through the provider setter, or into the record field.
    pub fn assign(&self, target: &mut Value, value: Value) -> Result<(), ConstructError> {
        if let Some(setter) = &self.property.setter {
            return setter(target, value);
        }
        match target {
            Value::Record(record) => {
                record.set(self.property.name.clone(), value);
                Ok(())
            }
            other => Err(ConstructError::InvalidTarget {
                expected: "record",
                found: other.variant_name(),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ParameterPlan {
    pub parameter: ParameterModel,
    pub slot: Slot,
    /// Wire key: the bound member's name, or the parameter's own name.
    pub key: String,
    /// Index into [`ObjectPlan::members`].
    pub member: Option<usize>,
}

#[derive(Clone, Debug)]
pub enum Construction {
    /// Build through a constructor (possibly zero-arity), then run setters.
    Constructor {
        constructor: ConstructorModel,
        parameters: Vec<ParameterPlan>,
    },
    /// Populate a copy of this instance directly.
    Instance(Value),
}

/// Build plan for an object type.
#[derive(Clone, Debug)]
pub struct ObjectPlan {
    pub type_name: String,
    pub members: Vec<MemberPlan>,
    pub construction: Construction,
}

impl ObjectPlan {
    pub fn parameters(&self) -> &[ParameterPlan] {
        match &self.construction {
            Construction::Constructor { parameters, .. } => parameters,
            Construction::Instance(_) => &[],
        }
    }

    pub fn setters(&self) -> impl Iterator<Item = (usize, &MemberPlan)> {
        self.members.iter().enumerate().filter(|(_, m)| m.is_setter())
    }

    /// Number of values produced per instance (parameters plus setters).
    pub fn child_count(&self) -> usize {
        self.parameters().len() + self.setters().count()
    }
}

/// Plan an object: bind constructor parameters to members and resolve every
/// child type through `resolve`.
///
/// Parameters bind to members by case-insensitive name. Members that are
/// neither bound nor writable are dropped since they cannot be restored.
pub fn plan_object(
    shape: &TypeShape,
    members: Vec<PropertyModel>,
    mut resolve: impl FnMut(TypeId) -> Result<Slot, BuildError>,
) -> Result<ObjectPlan, BuildError> {
    let constructor = select_constructor(shape);

    let mut bound: Vec<Option<usize>> = vec![None; members.len()];
    if let Some(constructor) = constructor {
        for (index, param) in constructor.parameters.iter().enumerate() {
            let matching = members.iter().enumerate().position(|(i, m)| {
                bound[i].is_none() && m.name.eq_ignore_ascii_case(&param.name)
            });
            if let Some(i) = matching {
                bound[i] = Some(index);
            }
        }
    }

    let mut planned = Vec::new();
    let mut member_of_param: Vec<Option<usize>> =
        vec![None; constructor.map_or(0, ConstructorModel::arity)];
    for (property, parameter) in members.into_iter().zip(bound) {
        if parameter.is_none() && !property.writable && !property.init_only {
            continue;
        }
        if let Some(p) = parameter {
            member_of_param[p] = Some(planned.len());
        }
        let slot = resolve(property.type_id)?;
        planned.push(MemberPlan {
            property,
            slot,
            parameter,
        });
    }

    let construction = match constructor {
        Some(constructor) => {
            let mut parameters = Vec::with_capacity(constructor.arity());
            for (param, member) in constructor.parameters.iter().zip(member_of_param) {
                let key = match member {
                    Some(m) => planned[m].property.name.clone(),
                    None => param.name.clone(),
                };
                parameters.push(ParameterPlan {
                    parameter: param.clone(),
                    slot: resolve(param.type_id)?,
                    key,
                    member,
                });
            }
            Construction::Constructor {
                constructor: constructor.clone(),
                parameters,
            }
        }
        None => Construction::Instance(
            shape
                .default_instance
                .clone()
                .unwrap_or_else(|| Value::Record(Record::new(shape.name.clone()))),
        ),
    };

    Ok(ObjectPlan {
        type_name: shape.name.clone(),
        members: planned,
        construction,
    })
}
