// Integration tests for path decoding and path element access
use agegraph::{
    DecoderConfig, EntityKind, IndexOutOfRange, Path, PathElement, Unmarshal, UnmarshalError,
    Unmarshaler,
};
use std::sync::Arc;

const V0: &str = r#"{"id": 844424930131969, "label": "Person", "properties": {"name": "Joe"}}::vertex"#;
const E01: &str = r#"{"id": 1125899906842625, "label": "workWith", "end_id": 844424930131970, "start_id": 844424930131969, "properties": {"weight": 3}}::edge"#;
const V1: &str = r#"{"id": 844424930131970, "label": "Person", "properties": {"name": "Jack"}}::vertex"#;
const E21: &str = r#"{"id": 1125899906842626, "label": "workWith", "end_id": 844424930131970, "start_id": 844424930131971, "properties": {"weight": 5}}::edge"#;
const V2: &str = r#"{"id": 844424930131971, "label": "Person", "properties": {"name": "Smith"}}::vertex"#;
const E10: &str = r#"{"id": 1125899906842627, "label": "workWith", "end_id": 844424930131969, "start_id": 844424930131970, "properties": {"weight": 1}}::edge"#;

fn path_text(elements: &[&str]) -> String {
    format!("[{}]::path", elements.join(", "))
}

fn decode_path(session: &mut Unmarshaler, text: &str) -> Path {
    let entity = session.unmarshal(text).unwrap();
    match entity.as_path() {
        Some(path) => path.clone(),
        None => panic!("expected a path, got {}", entity),
    }
}

#[test]
fn test_single_hop_path_accessors() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut session = Unmarshaler::new();
    let path = decode_path(&mut session, &path_text(&[V0, E01, V1]));

    assert_eq!(path.len(), 3);
    assert_eq!(path.hops(), 1);

    let v0 = path.vertex_at(0).unwrap();
    let e = path.edge_at(1).unwrap();
    let v1 = path.vertex_at(2).unwrap();
    assert_eq!(v0.id(), 844424930131969);
    assert_eq!(v1.id(), 844424930131970);

    let mut endpoints = [e.start_id(), e.end_id()];
    endpoints.sort();
    let mut vertex_ids = [v0.id(), v1.id()];
    vertex_ids.sort();
    assert_eq!(endpoints, vertex_ids);

    assert_eq!(path.start().map(|v| v.id()), Some(v0.id()));
    assert_eq!(path.end().map(|v| v.id()), Some(v1.id()));
}

#[test]
fn test_wrong_variant_and_out_of_range_indices() {
    let mut session = Unmarshaler::new();
    let path = decode_path(&mut session, &path_text(&[V0, E01, V1]));

    assert_eq!(
        path.vertex_at(1).unwrap_err(),
        IndexOutOfRange {
            index: 1,
            len: 3,
            expected: EntityKind::Vertex
        }
    );
    assert_eq!(path.edge_at(0).unwrap_err().expected, EntityKind::Edge);
    assert_eq!(path.edge_at(2).unwrap_err().index, 2);
    assert!(path.vertex_at(3).is_err());
    assert!(path.edge_at(99).is_err());
    assert!(path.get(3).is_none());
}

#[test]
fn test_reversed_edge_is_connected() {
    // v1 <- e21 - v2: the edge points against the traversal direction
    let mut session = Unmarshaler::new();
    let path = decode_path(&mut session, &path_text(&[V0, E01, V1, E21, V2]));

    assert_eq!(path.hops(), 2);
    let names: Vec<String> = path
        .vertices()
        .filter_map(|v| v.property("name").and_then(|n| n.as_str()).map(str::to_string))
        .collect();
    assert_eq!(names, vec!["Joe", "Jack", "Smith"]);
    assert_eq!(path.edges().count(), 2);
}

#[test]
fn test_single_vertex_path() {
    let mut session = Unmarshaler::new();
    let path = decode_path(&mut session, &path_text(&[V0]));
    assert_eq!(path.len(), 1);
    assert_eq!(path.hops(), 0);
    assert_eq!(path.start(), path.end());
}

#[test]
fn test_path_elements_share_session_cache() {
    let mut session = Unmarshaler::new();
    let joe = session.unmarshal(V0).unwrap();
    let first = decode_path(&mut session, &path_text(&[V0, E01, V1]));
    let second = decode_path(&mut session, &path_text(&[V1, E21, V2]));

    // V0, E01, V1, E21, V2
    assert_eq!(session.cache_len(), 5);
    assert!(Arc::ptr_eq(joe.as_vertex().unwrap(), first.vertex_at(0).unwrap()));
    assert!(Arc::ptr_eq(first.vertex_at(2).unwrap(), second.vertex_at(0).unwrap()));

    for element in &first {
        match element {
            PathElement::Vertex(v) => assert!(session.vertex(v.id()).is_some()),
            PathElement::Edge(e) => assert!(session.edge(e.id()).is_some()),
        }
    }
}

#[test]
fn test_cycle_revisits_the_same_vertex() {
    // v0 -> v1 -> v0
    let mut session = Unmarshaler::new();
    let path = decode_path(&mut session, &path_text(&[V0, E01, V1, E10, V0]));

    assert_eq!(path.len(), 5);
    assert_eq!(path.hops(), 2);
    assert_eq!(session.cache_len(), 4);
    assert!(Arc::ptr_eq(path.vertex_at(0).unwrap(), path.vertex_at(4).unwrap()));
    assert_eq!(path.start(), path.end());
}

#[test]
fn test_disconnected_path_rejected_unless_disabled() {
    let text = path_text(&[V0, E21, V1]);

    let err = Unmarshaler::new().unmarshal(&text).unwrap_err();
    match err {
        UnmarshalError::MalformedEntity(err) => assert_eq!(err.kind, EntityKind::Path),
        other => panic!("expected a malformed path, got {:?}", other),
    }

    let config = DecoderConfig {
        verify_paths: false,
        ..DecoderConfig::default()
    };
    let mut lenient = Unmarshaler::with_config(config).unwrap();
    assert_eq!(decode_path(&mut lenient, &text).len(), 3);
}

#[test]
fn test_path_display_round_trip() {
    let mut session = Unmarshaler::new();
    let path = decode_path(&mut session, &path_text(&[V0, E01, V1]));
    let rendered = path.to_string();
    assert!(rendered.ends_with("]::path"), "{}", rendered);

    let again = decode_path(&mut Unmarshaler::new(), &rendered);
    assert_eq!(again, path);
}

#[test]
fn test_malformed_paths_are_syntax_errors() {
    let mut session = Unmarshaler::new();
    for text in [
        path_text(&[V0, E01]),
        path_text(&[V0, V1]),
        path_text(&[E01, V1]),
        format!("[{}, {}, {}]", V0, E01, V1),
    ] {
        assert!(
            matches!(session.unmarshal(&text), Err(UnmarshalError::Syntax(_))),
            "{}",
            text
        );
    }
    assert_eq!(session.cache_len(), 0);
}
