//! Unit tests for property → field conversions during projection
//!
//! Covers the lossy-conversion rules: widening is accepted, float to
//! integer is rejected, narrowing only when the value fits, including
//! `f64` values too large for `f32`.

#[cfg(test)]
mod projection_conversion_tests {
    use std::collections::HashMap;

    use agegraph::projection::{FromScalar, Projectable, RecordSchema};
    use agegraph::{ProjectionError, Scalar};
    use test_case::test_case;

    #[derive(Debug, Default)]
    struct Measurements {
        count: i64,
        small: i8,
        unsigned: u32,
        ratio: f64,
        single: f32,
        tags: Vec<String>,
        extra: Option<HashMap<String, i64>>,
    }

    impl Projectable for Measurements {
        fn schema() -> RecordSchema<Self> {
            RecordSchema::new()
                .field("count", |m: &mut Measurements, v| m.count = v)
                .field("small", |m: &mut Measurements, v| m.small = v)
                .field("unsigned", |m: &mut Measurements, v| m.unsigned = v)
                .field("ratio", |m: &mut Measurements, v| m.ratio = v)
                .field("single", |m: &mut Measurements, v| m.single = v)
                .field("tags", |m: &mut Measurements, v| m.tags = v)
                .field("extra", |m: &mut Measurements, v| m.extra = v)
        }
    }

    fn project(key: &str, value: Scalar) -> Result<Measurements, ProjectionError> {
        let mut properties = HashMap::new();
        properties.insert(key.to_string(), value);
        Measurements::schema().project(&properties)
    }

    #[test_case("count", Scalar::Float(3.0), "i64" ; "whole float into integer")]
    #[test_case("count", Scalar::from("3"), "i64" ; "numeric string into integer")]
    #[test_case("small", Scalar::Integer(128), "i8" ; "integer overflowing i8")]
    #[test_case("unsigned", Scalar::Integer(-1), "u32" ; "negative into unsigned")]
    #[test_case("ratio", Scalar::from("0.5"), "f64" ; "string into float")]
    #[test_case("single", Scalar::Float(1e300), "f32" ; "float overflowing f32")]
    #[test_case("ratio", Scalar::Null, "f64" ; "null into required float")]
    #[test_case("tags", Scalar::List(vec![Scalar::from("a"), Scalar::Integer(1)]), "Vec<String>" ; "mixed list")]
    #[test_case("extra", Scalar::Bool(true), "Option<HashMap<String, i64>>" ; "boolean into optional map")]
    fn test_rejected_conversions(key: &str, value: Scalar, expected_type: &str) {
        match project(key, value.clone()) {
            Err(ProjectionError::TypeMismatch {
                key: got_key,
                value: got_value,
                expected_type: got_type,
            }) => {
                assert_eq!(got_key, key);
                assert_eq!(got_value, value);
                assert_eq!(got_type, expected_type);
            }
            other => panic!("expected a type mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_accepted_conversions() {
        let mut properties = HashMap::new();
        properties.insert("count".to_string(), Scalar::Integer(i64::MAX));
        properties.insert("small".to_string(), Scalar::Integer(-128));
        properties.insert("unsigned".to_string(), Scalar::Integer(70));
        properties.insert("ratio".to_string(), Scalar::Integer(2));
        properties.insert("single".to_string(), Scalar::Float(70.3));
        properties.insert(
            "tags".to_string(),
            Scalar::List(vec![Scalar::from("a"), Scalar::from("b")]),
        );
        properties.insert("extra".to_string(), Scalar::Null);

        let m = Measurements::schema().project(&properties).unwrap();
        assert_eq!(m.count, i64::MAX);
        assert_eq!(m.small, -128);
        assert_eq!(m.unsigned, 70);
        assert_eq!(m.ratio, 2.0);
        assert_eq!(m.single, 70.3_f32);
        assert_eq!(m.tags, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(m.extra, None);
    }

    #[test]
    fn test_custom_field_type() {
        #[derive(Debug, Default, PartialEq)]
        struct Celsius(f64);

        impl FromScalar for Celsius {
            fn from_scalar(value: &Scalar) -> Option<Self> {
                value.as_f64().map(Celsius)
            }

            fn expected_type() -> String {
                "Celsius".to_string()
            }
        }

        #[derive(Debug, Default)]
        struct Reading {
            temperature: Celsius,
        }

        impl Projectable for Reading {
            fn schema() -> RecordSchema<Self> {
                RecordSchema::new().field("temperature", |r: &mut Reading, v| r.temperature = v)
            }
        }

        let mut properties = HashMap::new();
        properties.insert("temperature".to_string(), Scalar::Float(21.5));
        let reading = Reading::schema().project(&properties).unwrap();
        assert_eq!(reading.temperature, Celsius(21.5));
    }
}
