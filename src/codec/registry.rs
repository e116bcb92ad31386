use crate::codec::{root_entry, CodecError, Node, Record};
use std::any::Any;
use std::collections::HashMap;
use tracing::debug;

type DecodeFn = fn(&Node) -> Result<Box<dyn Any + Send>, CodecError>;

/// Maps type names to decoders so a document can be decoded without the
/// caller naming the target type.
#[derive(Default)]
pub struct TypeRegistry {
    decoders: HashMap<&'static str, DecodeFn>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Record + Send + 'static>(&mut self) -> &mut Self {
        fn decode_boxed<T: Record + Send + 'static>(
            node: &Node,
        ) -> Result<Box<dyn Any + Send>, CodecError> {
            T::decode(node).map(|v| Box::new(v) as Box<dyn Any + Send>)
        }

        debug!("Registered codec type {}", T::record_name());
        self.decoders.insert(T::record_name(), decode_boxed::<T>);
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.decoders.contains_key(type_name)
    }

    pub fn decode_document(&self, document: &Node) -> Result<Box<dyn Any + Send>, CodecError> {
        let (name, inner) = root_entry(document)?;
        let decode = self
            .decoders
            .get(name)
            .ok_or_else(|| CodecError::UnregisteredType(name.to_string()))?;
        decode(inner)
    }

    /// Decodes into the type named by the document's root key.
    pub fn decode(&self, json: &str) -> Result<Box<dyn Any + Send>, CodecError> {
        let document: Node = serde_json::from_str(json)?;
        self.decode_document(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::to_json;
    use crate::record;

    #[derive(Debug, Default, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    record!(Point { x, y });

    #[derive(Debug, Default, PartialEq)]
    struct Label {
        text: String,
    }

    record!(Label { text });

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<Point>().register::<Label>();
        registry
    }

    #[test]
    fn picks_type_from_root_key() {
        let registry = registry();

        let decoded = registry.decode(&to_json(&Point { x: 1, y: -4 })).unwrap();
        assert_eq!(decoded.downcast_ref::<Point>(), Some(&Point { x: 1, y: -4 }));

        let decoded = registry
            .decode(&to_json(&Label { text: "hi".to_string() }))
            .unwrap();
        assert_eq!(decoded.downcast_ref::<Label>().map(|l| l.text.as_str()), Some("hi"));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = registry().decode(r#"{"my::Unknown":{}}"#).unwrap_err();

        assert!(matches!(err, CodecError::UnregisteredType(name) if name == "my::Unknown"));
    }

    #[test]
    fn contains_registered_names() {
        let registry = registry();

        assert!(registry.contains(std::any::type_name::<Point>()));
        assert!(!registry.contains("Point"));
    }

    #[test]
    fn inner_value_must_be_an_object() {
        let key = std::any::type_name::<Point>();
        let err = registry().decode(&format!(r#"{{"{}":[1,2]}}"#, key)).unwrap_err();

        assert!(matches!(err, CodecError::Mismatch { found: "array", .. }));
    }
}
