// Integration tests for the projecting decoder
use agegraph::projection::TypeDescriptor;
use agegraph::{
    EntityKind, Mapped, Mapper, Projectable, ProjectionError, RecordSchema, Scalar, TypeRegistry,
    Unmarshal, UnmarshalError,
};

#[derive(Debug, Default, PartialEq)]
struct Person {
    name: String,
    age: Option<i64>,
    weight: Option<f64>,
}

impl Projectable for Person {
    fn schema() -> RecordSchema<Self> {
        RecordSchema::new()
            .field("Name", |p: &mut Person, v| p.name = v)
            .field("Age", |p: &mut Person, v| p.age = v)
            .field("Weight", |p: &mut Person, v| p.weight = v)
    }
}

#[derive(Debug, Default, PartialEq)]
struct WorkWith {
    weight: i32,
}

impl Projectable for WorkWith {
    fn schema() -> RecordSchema<Self> {
        RecordSchema::new().field("weight", |w: &mut WorkWith, v| w.weight = v)
    }
}

const JOE: &str = r#"{"id": 844424930131969, "label": "Person", "properties": {"name": "Joe", "age": 10, "nickname": "JJ"}}::vertex"#;
const JACK: &str = r#"{"id": 844424930131970, "label": "Person", "properties": {"name": "Jack", "weight": 70}}::vertex"#;
const WORKS_WITH: &str = r#"{"id": 1125899906842625, "label": "workWith", "end_id": 844424930131970, "start_id": 844424930131969, "properties": {"weight": 3}}::edge"#;
const COMPANY: &str = r#"{"id": 1407374883553281, "label": "Company", "properties": {"name": "Acme"}}::vertex"#;

fn person_mapper() -> Mapper {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut mapper = Mapper::new();
    mapper.register_type::<Person>("Person");
    mapper.register_type::<WorkWith>("workWith");
    mapper
}

fn expect_record<T: std::any::Any>(mapped: Mapped) -> T {
    match mapped {
        Mapped::Record(record) => match record.downcast::<T>() {
            Ok(value) => value,
            Err(record) => panic!("record holds {}, not the requested type", record.type_name()),
        },
        Mapped::Entity(entity) => panic!("expected a record, got {}", entity),
    }
}

#[test]
fn test_registered_vertex_projects() {
    let mut mapper = person_mapper();
    let joe: Person = expect_record(mapper.unmarshal(JOE).unwrap());
    assert_eq!(
        joe,
        Person {
            name: "Joe".to_string(),
            age: Some(10),
            weight: None,
        }
    );

    // integer weight widens into the float field
    let jack: Person = expect_record(mapper.unmarshal(JACK).unwrap());
    assert_eq!(jack.weight, Some(70.0));
}

#[test]
fn test_registered_edge_projects() {
    let mut mapper = person_mapper();
    let edge: WorkWith = expect_record(mapper.unmarshal(WORKS_WITH).unwrap());
    assert_eq!(edge, WorkWith { weight: 3 });
}

#[test]
fn test_unregistered_label_is_returned_raw() {
    let mut mapper = person_mapper();
    match mapper.unmarshal(COMPANY).unwrap() {
        Mapped::Entity(entity) => {
            let company = entity.as_vertex().unwrap();
            assert_eq!(company.property("name"), Some(&Scalar::from("Acme")));
        }
        Mapped::Record(record) => panic!("unexpected record {:?}", record),
    }
}

#[test]
fn test_paths_and_scalars_are_returned_raw() {
    let mut mapper = person_mapper();
    let path = format!("[{}, {}, {}]::path", JOE, WORKS_WITH, JACK);

    let mapped = mapper.unmarshal(&path).unwrap();
    let entity = mapped.as_entity().unwrap();
    assert_eq!(entity.kind(), EntityKind::Path);
    let path = entity.as_path().unwrap();
    assert_eq!(path.vertex_at(0).unwrap().label(), "Person");

    let mapped = mapper.unmarshal("[1, 2]").unwrap();
    assert_eq!(mapped.as_entity().map(|e| e.kind()), Some(EntityKind::Scalar));
}

#[test]
fn test_projection_uses_cached_raw_entity() {
    let mut mapper = person_mapper();
    let path = format!("[{}, {}, {}]::path", JOE, WORKS_WITH, JACK);
    mapper.unmarshal(&path).unwrap();
    assert_eq!(mapper.cache_len(), 3);

    let joe: Person = expect_record(mapper.unmarshal(JOE).unwrap());
    assert_eq!(joe.name, "Joe");
    assert_eq!(mapper.cache_len(), 3);
    assert_eq!(mapper.vertex(844424930131969).map(|v| v.label().to_string()), Some("Person".to_string()));
}

#[test]
fn test_type_mismatch_is_reported() {
    let mut mapper = person_mapper();
    let err = mapper
        .unmarshal(r#"{"id": 844424930131975, "label": "Person", "properties": {"name": "Bob", "weight": "not-a-number"}}::vertex"#)
        .unwrap_err();

    assert_eq!(
        err,
        UnmarshalError::Projection(ProjectionError::TypeMismatch {
            key: "weight".to_string(),
            value: Scalar::from("not-a-number"),
            expected_type: "Option<f64>".to_string(),
        })
    );
    assert_eq!(
        err.to_string(),
        "property[weight] value[\"not-a-number\"] type is not convertible to Option<f64>"
    );
}

#[test]
fn test_reregistering_label_replaces_binding() {
    let mut mapper = person_mapper();
    let previous = mapper.register("Person", TypeDescriptor::of::<WorkWith>());
    assert!(previous.map(|d| d.type_name().ends_with("Person")).unwrap_or(false));

    // WorkWith has no name field; Joe's properties are all dropped
    let as_work: WorkWith = expect_record(mapper.unmarshal(JOE).unwrap());
    assert_eq!(as_work, WorkWith::default());
}

#[test]
fn test_shared_registry_and_row_decoding() {
    let mut registry = TypeRegistry::new();
    registry.register_type::<Person>("Person");
    let mut mapper = Mapper::new().with_registry(registry);
    assert!(mapper.registry().contains("Person"));

    let row = mapper.unmarshal_row(&[JOE, WORKS_WITH, "\"x\""]).unwrap();
    assert!(row[0].as_record().is_some());
    assert_eq!(row[1].as_entity().map(|e| e.kind()), Some(EntityKind::Edge));
    assert_eq!(row[2].as_entity().map(|e| e.kind()), Some(EntityKind::Scalar));
}

#[test]
fn test_entity_project_directly() {
    let mut mapper = Mapper::new();
    let mapped = mapper.unmarshal(JACK).unwrap();
    let entity = mapped.as_entity().unwrap();

    let jack = entity.project::<Person>().unwrap();
    assert_eq!(jack.name, "Jack");

    let path = format!("[{}]::path", JACK);
    let mapped = mapper.unmarshal(&path).unwrap();
    assert_eq!(
        mapped.as_entity().unwrap().project::<Person>().unwrap_err(),
        ProjectionError::UnsupportedEntity(EntityKind::Path)
    );
}
