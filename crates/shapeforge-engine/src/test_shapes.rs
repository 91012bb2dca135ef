//! Shape fixtures shared by the engine tests.

use std::sync::{Arc, Mutex};

use shapeforge_core::{
    ConstructError, ConstructorModel, DictionaryShape, EnumerableShape, ParameterModel,
    PropertyModel, Record, ShapeKind, ShapeRegistry, TYPE_BOOL, TYPE_BYTES, TYPE_CHAR, TYPE_DATE,
    TYPE_DECIMAL, TYPE_DURATION, TYPE_DYNAMIC, TYPE_F16, TYPE_F32, TYPE_F64, TYPE_I8, TYPE_I32,
    TYPE_I64, TYPE_I128, TYPE_TEXT, TYPE_TIMESTAMP, TYPE_U16, TYPE_U64, TYPE_U128, TYPE_UUID,
    TypeId, TypeShape, Value, list_add,
};

/// `Pair { A: i32, B: text }`, no constructor.
pub fn pair(registry: &mut ShapeRegistry) -> TypeId {
    registry
        .define(
            TypeShape::object("Pair")
                .with_property(PropertyModel::new("A", TYPE_I32))
                .with_property(PropertyModel::new("B", TYPE_TEXT)),
        )
        .unwrap()
}

pub fn pair_value(a: i64, b: &str) -> Value {
    Value::Record(
        Record::new("Pair")
            .with("A", Value::from(a))
            .with("B", Value::from(b)),
    )
}

pub fn color(registry: &mut ShapeRegistry) -> TypeId {
    registry
        .define_enum("Color", ["Red", "Green", "Blue"])
        .unwrap()
}

/// Growable bag of i32: default constructor plus add.
pub fn int_bag(registry: &mut ShapeRegistry) -> TypeId {
    registry
        .define(
            TypeShape::new(
                "IntBag",
                ShapeKind::Enumerable(EnumerableShape {
                    element: TYPE_I32,
                    add: Some(list_add()),
                    is_array: false,
                }),
            )
            .with_constructor(ConstructorModel::default_value(Value::List(Vec::new()))),
        )
        .unwrap()
}

/// Immutable text -> i32 dictionary built from a map of pairs.
pub fn frozen_map(registry: &mut ShapeRegistry) -> TypeId {
    let source = registry.map_of(TYPE_TEXT, TYPE_I32);
    registry
        .define(
            TypeShape::new(
                "FrozenMap",
                ShapeKind::Dictionary(DictionaryShape {
                    key: TYPE_TEXT,
                    value: TYPE_I32,
                    insert: None,
                }),
            )
            .with_constructor(ShapeRegistry::sequence_constructor(source, Ok)),
        )
        .unwrap()
}

/// Immutable i32 sequence built from a list.
pub fn frozen_list(registry: &mut ShapeRegistry) -> TypeId {
    let source = registry.list_of(TYPE_I32);
    registry
        .define(
            TypeShape::new(
                "FrozenList",
                ShapeKind::Enumerable(EnumerableShape {
                    element: TYPE_I32,
                    add: None,
                    is_array: false,
                }),
            )
            .with_constructor(ShapeRegistry::sequence_constructor(source, Ok)),
        )
        .unwrap()
}

/// Enumerable with no way to rebuild it.
pub fn snapshot(registry: &mut ShapeRegistry) -> TypeId {
    registry
        .define(TypeShape::new(
            "Snapshot",
            ShapeKind::Enumerable(EnumerableShape {
                element: TYPE_I32,
                add: None,
                is_array: false,
            }),
        ))
        .unwrap()
}

/// `Node { value: i32, next: Node? }`.
pub fn linked_node(registry: &mut ShapeRegistry) -> TypeId {
    let node = registry.declare("Node").unwrap();
    let next = registry.nullable_of(node);
    registry
        .complete(
            node,
            TypeShape::object("Node")
                .with_property(PropertyModel::new("value", TYPE_I32))
                .with_property(PropertyModel::new("next", next)),
        )
        .unwrap();
    node
}

pub fn node_value(value: i64, next: Value) -> Value {
    Value::Record(
        Record::new("Node")
            .with("value", Value::from(value))
            .with("next", next),
    )
}

/// `Tree { label: text, children: List<Tree> }`: recursion without a
/// nullable edge.
pub fn tree(registry: &mut ShapeRegistry) -> TypeId {
    let tree = registry.declare("Tree").unwrap();
    let children = registry.list_of(tree);
    registry
        .complete(
            tree,
            TypeShape::object("Tree")
                .with_property(PropertyModel::new("label", TYPE_TEXT))
                .with_property(PropertyModel::new("children", children)),
        )
        .unwrap();
    tree
}

/// `Left { right: Right? }` and `Right { left: Left?, many: List<Left> }`.
pub fn mutual(registry: &mut ShapeRegistry) -> (TypeId, TypeId) {
    let left = registry.declare("Left").unwrap();
    let right = registry.declare("Right").unwrap();
    let maybe_left = registry.nullable_of(left);
    let maybe_right = registry.nullable_of(right);
    let many = registry.list_of(left);

    registry
        .complete(
            left,
            TypeShape::object("Left").with_property(PropertyModel::new("right", maybe_right)),
        )
        .unwrap();
    registry
        .complete(
            right,
            TypeShape::object("Right")
                .with_property(PropertyModel::new("left", maybe_left))
                .with_property(PropertyModel::new("many", many)),
        )
        .unwrap();
    (left, right)
}

/// Shared log of provider calls.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// `Account` with a 1- and a 2-parameter constructor and one setter; every
/// provider call is appended to the returned log.
pub fn account(registry: &mut ShapeRegistry) -> (TypeId, CallLog) {
    let log: CallLog = Arc::default();

    let short = {
        let log = Arc::clone(&log);
        ConstructorModel::new(
            vec![ParameterModel::required("id", TYPE_I64, 0)],
            move |args| {
                log.lock().unwrap().push("new/1".to_owned());
                let mut args = args.into_iter();
                Ok(Value::Record(
                    Record::new("Account").with("Id", args.next().unwrap_or(Value::Null)),
                ))
            },
        )
    };
    let full = {
        let log = Arc::clone(&log);
        ConstructorModel::new(
            vec![
                ParameterModel::required("id", TYPE_I64, 0),
                ParameterModel::required("owner", TYPE_TEXT, 1),
            ],
            move |args| {
                log.lock().unwrap().push("new/2".to_owned());
                let mut args = args.into_iter();
                Ok(Value::Record(
                    Record::new("Account")
                        .with("Id", args.next().unwrap_or(Value::Null))
                        .with("Owner", args.next().unwrap_or(Value::Null)),
                ))
            },
        )
    };
    let nickname = {
        let log = Arc::clone(&log);
        PropertyModel::new("Nickname", TYPE_TEXT).with_setter(move |target, value| {
            log.lock().unwrap().push("set Nickname".to_owned());
            let record = target.as_record_mut().ok_or(ConstructError::InvalidTarget {
                expected: "record",
                found: "other",
            })?;
            record.set("Nickname", value);
            Ok(())
        })
    };

    let id = registry
        .define(
            TypeShape::object("Account")
                .with_property(PropertyModel::read_only("Id", TYPE_I64))
                .with_property(PropertyModel::read_only("Owner", TYPE_TEXT))
                .with_property(nickname)
                .with_constructor(short)
                .with_constructor(full),
        )
        .unwrap();
    (id, log)
}

/// One member per leaf kind plus a few wrappers; no constructor.
pub fn kitchen_sink(registry: &mut ShapeRegistry) -> TypeId {
    let tags = registry.list_of(TYPE_TEXT);
    let scores = registry.map_of(TYPE_TEXT, TYPE_I32);
    let digest = registry.array_of(TYPE_U16);
    let maybe_count = registry.nullable_of(TYPE_I32);
    let color = color(registry);

    let members = [
        ("flag", TYPE_BOOL),
        ("tiny", TYPE_I8),
        ("wide", TYPE_I128),
        ("count", TYPE_U64),
        ("huge", TYPE_U128),
        ("half", TYPE_F16),
        ("single", TYPE_F32),
        ("double", TYPE_F64),
        ("price", TYPE_DECIMAL),
        ("initial", TYPE_CHAR),
        ("name", TYPE_TEXT),
        ("blob", TYPE_BYTES),
        ("seen", TYPE_TIMESTAMP),
        ("born", TYPE_DATE),
        ("took", TYPE_DURATION),
        ("key", TYPE_UUID),
        ("extra", TYPE_DYNAMIC),
        ("tags", tags),
        ("scores", scores),
        ("digest", digest),
        ("maybe", maybe_count),
        ("color", color),
    ];
    let shape = members
        .into_iter()
        .fold(TypeShape::object("KitchenSink"), |shape, (name, ty)| {
            shape.with_property(PropertyModel::new(name, ty))
        });
    registry.define(shape).unwrap()
}
