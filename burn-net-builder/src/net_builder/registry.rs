use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::error::{NetBuilderError, Result};

pub type Factory<U> = fn(JsonValue) -> Result<U>;

/// A builder variant that can be created by name from a JSON configuration.
pub trait RegisteredVariant<U> {
    const NAME: &'static str;

    fn from_config(config: JsonValue) -> Result<U>;
}

/// Maps variant names of one builder family to their factories.
#[derive(Debug)]
pub struct Registry<U> {
    family: &'static str,
    factories: BTreeMap<&'static str, Factory<U>>,
}

impl<U> Registry<U> {
    pub fn new(family: &'static str) -> Self {
        Registry {
            family,
            factories: BTreeMap::new(),
        }
    }

    /// Adds `V` while assembling a registry. Names within a family are unique.
    pub fn with<V: RegisteredVariant<U>>(mut self) -> Self {
        assert!(
            !self.contains(V::NAME),
            "{} variant {:?} registered twice",
            self.family,
            V::NAME
        );
        self.factories.insert(V::NAME, V::from_config);
        self
    }

    pub fn register<V: RegisteredVariant<U>>(&mut self) -> Result<()> {
        if self.contains(V::NAME) {
            return Err(NetBuilderError::DuplicateVariant {
                family: self.family,
                name: V::NAME.to_string(),
            });
        }
        self.factories.insert(V::NAME, V::from_config);
        Ok(())
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    pub fn create(&self, name: &str, config: JsonValue) -> Result<U> {
        match self.factories.get(name) {
            Some(factory) => factory(config),
            None => Err(NetBuilderError::UnknownVariant {
                family: self.family,
                name: name.to_string(),
            }),
        }
    }

    /// Creates a variant from its tagged form, e.g. `{"DuelingQuantile": {...}}`.
    pub fn from_json(&self, value: JsonValue) -> Result<U> {
        let malformed = |found: String| NetBuilderError::MalformedUnion {
            family: self.family,
            found,
        };
        let mut entries = match value {
            JsonValue::Object(map) if map.len() == 1 => map.into_iter(),
            other => return Err(malformed(other.to_string())),
        };
        match entries.next() {
            Some((name, config)) => self.create(&name, config),
            None => Err(malformed("{}".to_string())),
        }
    }

    pub fn from_json_str(&self, json: &str) -> Result<U> {
        self.from_json(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq)]
    enum Shape {
        Square(u32),
        Circle,
    }

    struct Square;
    struct Circle;

    impl RegisteredVariant<Shape> for Square {
        const NAME: &'static str = "Square";

        fn from_config(config: JsonValue) -> Result<Shape> {
            Ok(Shape::Square(serde_json::from_value(config)?))
        }
    }

    impl RegisteredVariant<Shape> for Circle {
        const NAME: &'static str = "Circle";

        fn from_config(_config: JsonValue) -> Result<Shape> {
            Ok(Shape::Circle)
        }
    }

    fn registry() -> Registry<Shape> {
        Registry::new("Shape").with::<Square>().with::<Circle>()
    }

    #[test]
    fn test_lookup_by_name() {
        let registry = registry();
        assert_eq!(registry.names().collect::<Vec<_>>(), ["Circle", "Square"]);
        assert!(registry.contains("Square"));
        assert!(!registry.contains("square"));
        assert_eq!(registry.create("Square", json!(3)).unwrap(), Shape::Square(3));
        assert_eq!(
            registry.from_json(json!({"Circle": null})).unwrap(),
            Shape::Circle
        );
        assert_eq!(
            registry.from_json_str(r#"{"Square": 9}"#).unwrap(),
            Shape::Square(9)
        );
    }

    #[test]
    fn test_lookup_errors() {
        let registry = registry();
        let err = registry.create("Triangle", json!({})).unwrap_err();
        expect![[r#"No Shape variant registered under the name "Triangle""#]]
            .assert_eq(&err.to_string());

        let err = registry
            .from_json(json!({"Square": 1, "Circle": null}))
            .unwrap_err();
        assert!(matches!(err, NetBuilderError::MalformedUnion { .. }));

        let err = registry.from_json(json!("Square")).unwrap_err();
        expect![[r#"Expected a single-key object naming a Shape variant, got: "Square""#]]
            .assert_eq(&err.to_string());

        let err = registry.from_json_str(r#"{"Square": "big"}"#).unwrap_err();
        assert!(matches!(err, NetBuilderError::InvalidConfig(_)));
    }

    #[test]
    fn test_runtime_registration() {
        let mut registry = Registry::new("Shape");
        registry.register::<Square>().unwrap();
        let err = registry.register::<Square>().unwrap_err();
        expect![[r#"A Shape variant is already registered under the name "Square""#]]
            .assert_eq(&err.to_string());
        assert_eq!(registry.names().count(), 1);
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_static_registration_rejects_duplicates() {
        let _ = registry().with::<Circle>();
    }
}
