//! End-to-end tests for per-field classification.
//!
//! Each test registers a type with a MappingContext and checks the
//! classification of its fields: identity, relationships, indexes,
//! simple values, native types and property naming.

use neo4j_ogm::{
    ClassType, DefaultConversionService, Direction, FieldDescriptor, IndexLevel, MappingConfig,
    MappingContext, Primitive, PropertyKind, Tag, TypeDescriptor,
};
use neo4j_ogm::mapping::is_native_property_type;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn person() -> ClassType {
    ClassType::node_entity("org.example.Person")
}

fn register(fields: Vec<FieldDescriptor>) -> std::sync::Arc<neo4j_ogm::PersistentEntity> {
    MappingContext::default().register(person(), fields).unwrap()
}

// ============================================================================
// 1. Identity
// ============================================================================

#[test]
fn test_only_graph_id_is_identity() {
    let entity = register(vec![
        FieldDescriptor::new("id", TypeDescriptor::Wrapper(Primitive::I64)).with_tag(Tag::GraphId),
        FieldDescriptor::new("age", Primitive::I32),
        FieldDescriptor::new("name", TypeDescriptor::String).with_tag(Tag::indexed("", IndexLevel::Class)),
    ]);

    let identities: Vec<&str> = entity
        .properties()
        .iter()
        .filter(|p| p.is_identity())
        .map(|p| p.name())
        .collect();
    assert_eq!(identities, vec!["id"]);
}

// ============================================================================
// 2. Relationships: explicit, via, inferred
// ============================================================================

#[test]
fn test_explicit_relationship_matches_tag() {
    let entity = register(vec![
        FieldDescriptor::new("friends", TypeDescriptor::collection_of(person().into()))
            .with_tag(Tag::related_to("KNOWS", Direction::Both)),
    ]);
    let info = entity.property("friends").unwrap().relationship_info().unwrap();
    assert_eq!(info.direction, Direction::Both);
    assert_eq!(info.rel_type, "KNOWS");
    assert_eq!(info.target_type, TypeDescriptor::from(person()));
}

#[test]
fn test_via_relationship_entity() {
    let role: TypeDescriptor = ClassType::relationship_entity("org.example.Role").into();
    let entity = register(vec![
        FieldDescriptor::new("roles", TypeDescriptor::collection_of(role.clone()))
            .with_tag(Tag::related_to_via("ACTS_IN", Direction::Outgoing)),
    ]);
    let p = entity.property("roles").unwrap();
    let info = p.relationship_info().unwrap();
    assert_eq!(info.via.as_ref(), Some(&role));
    assert_eq!(info.rel_type, "ACTS_IN");
    assert!(!p.is_simple_value());
}

#[test]
fn test_inferred_relationship_between_node_entities() {
    let movie: TypeDescriptor = ClassType::node_entity("org.example.Movie").into();
    let entity = register(vec![
        FieldDescriptor::new("favorites", TypeDescriptor::array_of(movie.clone())),
        FieldDescriptor::new("mentor", person()),
    ]);

    let favorites = entity.property("favorites").unwrap().relationship_info().unwrap();
    assert_eq!(favorites.direction, Direction::default());
    assert_eq!(favorites.rel_type, "");
    assert_eq!(favorites.target_type, movie);
    assert!(favorites.multiple);
    assert_eq!(entity.property("mentor").unwrap().relationship_info().unwrap().effective_type("mentor"), "mentor");
    assert_eq!(entity.relationships().count(), 2);
}

#[test]
fn test_plain_owner_does_not_infer() {
    let ctx = MappingContext::default();
    let entity = ctx
        .register(
            ClassType::plain("org.example.Dto"),
            vec![FieldDescriptor::new("person", person())],
        )
        .unwrap();
    let p = entity.property("person").unwrap();
    assert!(!p.is_relationship());
    assert_eq!(p.kind(), &PropertyKind::Unclassified);
}

// ============================================================================
// 3. Indexes
// ============================================================================

#[test]
fn test_index_by_name_scenario() {
    let entity = register(vec![
        FieldDescriptor::new("name", TypeDescriptor::String).with_tag(Tag::indexed("byName", IndexLevel::Instance)),
    ]);
    let info = entity.property("name").unwrap().index_info().unwrap();
    assert_eq!(info.index_name, "byName");
    assert!(!info.fulltext);
    assert_eq!(info.level, IndexLevel::Instance);
    assert_eq!(info.field_name, "name");
    assert_eq!(entity.indexed_properties().count(), 1);
}

#[test]
fn test_field_name_override() {
    let tag = Tag::Indexed {
        index_name: "search".into(),
        fulltext: true,
        field_name: "title_ft".into(),
        level: IndexLevel::Global,
    };
    let entity = register(vec![FieldDescriptor::new("title", TypeDescriptor::String).with_tag(tag)]);
    let info = entity.property("title").unwrap().index_info().unwrap();
    assert_eq!(info.field_name, "title_ft");
    assert_eq!(info.index_type(), neo4j_ogm::IndexType::FullText);
}

// ============================================================================
// 4. Simple values and conversion
// ============================================================================

#[test]
fn test_collections_are_never_serializable() {
    let mut svc = DefaultConversionService::new();
    let tags = TypeDescriptor::collection_of(TypeDescriptor::String);
    svc.add_convertible(tags.clone(), TypeDescriptor::String);
    svc.add_convertible(TypeDescriptor::String, tags.clone());

    let entity = register(vec![FieldDescriptor::new("tags", tags)]);
    let p = entity.property("tags").unwrap();
    assert!(!p.is_simple_value());
    assert!(!p.is_serializable(&svc));
    assert!(!p.is_deserializable(&svc));
}

// ============================================================================
// 5. Naming
// ============================================================================

#[test]
fn test_qualified_property_name() {
    let short = MappingContext::new(MappingConfig::default());
    let entity = short
        .register(ClassType::node_entity("org.example.Person"), vec![FieldDescriptor::new("age", Primitive::I32)])
        .unwrap();
    assert_eq!(entity.property("age").unwrap().qualified_property_name(), "age");

    let long = MappingContext::new(MappingConfig::default().with_short_property_names(false));
    let entity = long
        .register(ClassType::node_entity("org.example.Person"), vec![FieldDescriptor::new("age", Primitive::I32)])
        .unwrap();
    assert_eq!(entity.property("age").unwrap().qualified_property_name(), "Person.age");
}

// ============================================================================
// 6. Properties
// ============================================================================

fn primitive() -> impl Strategy<Value = Primitive> {
    prop_oneof![
        Just(Primitive::Bool),
        Just(Primitive::Char),
        Just(Primitive::I8),
        Just(Primitive::I16),
        Just(Primitive::I32),
        Just(Primitive::I64),
        Just(Primitive::F32),
        Just(Primitive::F64),
    ]
}

fn native_base() -> impl Strategy<Value = TypeDescriptor> {
    prop_oneof![
        primitive().prop_map(TypeDescriptor::Primitive),
        primitive().prop_map(TypeDescriptor::Wrapper),
        Just(TypeDescriptor::String),
    ]
}

proptest! {
    #[test]
    fn prop_native_up_to_one_array_level(base in native_base(), depth in 0usize..4) {
        let mut t = base;
        for _ in 0..depth {
            t = TypeDescriptor::array_of(t);
        }
        prop_assert_eq!(is_native_property_type(&t), depth <= 1);
    }

    #[test]
    fn prop_queries_are_idempotent(base in native_base(), indexed in any::<bool>(), name in "[a-z]{1,8}") {
        let mut field = FieldDescriptor::new(name.clone(), base);
        if indexed {
            field = field.with_tag(Tag::indexed("idx", IndexLevel::Class));
        }
        let entity = register(vec![field]);
        let p = entity.property(&name).unwrap();
        let svc = DefaultConversionService::new();

        let first = (p.is_identity(), p.is_simple_value(), p.is_native_property_type(),
                     p.is_serializable(&svc), p.index_info().cloned(), p.qualified_property_name().to_string());
        let second = (p.is_identity(), p.is_simple_value(), p.is_native_property_type(),
                      p.is_serializable(&svc), p.index_info().cloned(), p.qualified_property_name().to_string());
        prop_assert_eq!(first, second);
        prop_assert_eq!(p.is_indexed(), indexed);
        prop_assert!(p.is_native_property_type());
    }
}
