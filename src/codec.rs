//! Generic object <-> JSON codec.
//!
//! Values are encoded by classification: `None` becomes `null`, strings,
//! numbers, booleans and chars become scalars, sequences become arrays and
//! records become objects keyed by field name. Records are plain structs
//! declared with [`record!`](crate::record), which lists the fields that take
//! part in (de)serialization; unlisted fields are transient.
//!
//! A document always wraps the encoded value under a single root key holding
//! the value's fully-qualified type name, so [`TypeRegistry`] can pick the
//! target type from the document alone.
//!
//! Encodable values are owned trees. There is no `Encode` impl for `Rc` or
//! `Arc`, so cyclic graphs cannot be expressed and are not detected.

mod error;
mod registry;
mod scalar;

pub use error::CodecError;
pub use registry::TypeRegistry;

/// Intermediate tree produced while converting a value.
pub type Node = serde_json::Value;

/// Ordered field map of a record node.
pub type Fields = serde_json::Map<String, Node>;

pub trait Encode {
    fn encode(&self) -> Node;

    /// Name used as the document root key.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

pub trait Decode: Sized {
    fn decode(node: &Node) -> Result<Self, CodecError>;
}

/// A composite type whose listed fields are (de)serialized by name.
pub trait Record: Encode + Decode + Default {
    const FIELDS: &'static [&'static str];

    fn record_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Wraps the encoded value under its type name.
pub fn to_document<T: Encode + ?Sized>(value: &T) -> Node {
    let mut root = Fields::new();
    root.insert(value.type_name().to_string(), value.encode());
    Node::Object(root)
}

pub fn to_json<T: Encode + ?Sized>(value: &T) -> String {
    to_document(value).to_string()
}

/// Decodes the value held under the document's root key as `T`.
///
/// The root key is not checked against `T`: the caller already chose the
/// target type.
pub fn from_document<T: Decode>(document: &Node) -> Result<T, CodecError> {
    let (_, inner) = root_entry(document)?;
    T::decode(inner)
}

pub fn from_json<T: Decode>(json: &str) -> Result<T, CodecError> {
    let document: Node = serde_json::from_str(json)?;
    from_document(&document)
}

pub(crate) fn root_entry(document: &Node) -> Result<(&str, &Node), CodecError> {
    let root = document.as_object().ok_or(CodecError::MissingRoot)?;
    let mut entries = root.iter();
    match (entries.next(), entries.next()) {
        (Some((name, inner)), None) if !name.is_empty() => Ok((name.as_str(), inner)),
        (None, _) => Err(CodecError::MissingRoot),
        _ => Err(CodecError::AmbiguousRoot(root.len())),
    }
}

/// Implements [`Encode`], [`Decode`] and [`Record`] for a struct from the
/// list of fields that take part in serialization.
///
/// The struct must implement `Default`; decoding starts from the default
/// value and assigns every listed field found in the document.
///
/// ```
/// use lightweb::record;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Person {
///     name: String,
///     age: i32,
///     visits: u32, // transient
/// }
///
/// record!(Person { name, age });
///
/// let json = lightweb::codec::to_json(&Person { name: "Ann".into(), age: 4, visits: 9 });
/// let back: Person = lightweb::codec::from_json(&json).unwrap();
/// assert_eq!(back, Person { name: "Ann".into(), age: 4, visits: 0 });
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::codec::Encode for $ty {
            #[allow(unused_mut)]
            fn encode(&self) -> $crate::codec::Node {
                let mut fields = $crate::codec::Fields::new();
                $(
                    fields.insert(
                        stringify!($field).to_string(),
                        $crate::codec::Encode::encode(&self.$field),
                    );
                )*
                $crate::codec::Node::Object(fields)
            }
        }

        impl $crate::codec::Decode for $ty {
            #[allow(unused_mut, unused_variables)]
            fn decode(node: &$crate::codec::Node) -> ::std::result::Result<Self, $crate::codec::CodecError> {
                let fields = node.as_object().ok_or_else(|| {
                    $crate::codec::CodecError::mismatch(
                        ::std::any::type_name::<$ty>(),
                        node,
                    )
                })?;
                let mut value = <$ty as ::std::default::Default>::default();
                $(
                    if let Some(field) = fields.get(stringify!($field)) {
                        value.$field = $crate::codec::Decode::decode(field)
                            .map_err(|e| e.in_field(stringify!($field)))?;
                    }
                )*
                Ok(value)
            }
        }

        impl $crate::codec::Record for $ty {
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),*];
        }
    };
}

/// Implements [`Decode`] through `FromStr` on the raw textual form of the
/// JSON value, and [`Encode`] through `Display` as a string scalar.
#[macro_export]
macro_rules! textual {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::codec::Encode for $ty {
                fn encode(&self) -> $crate::codec::Node {
                    $crate::codec::Node::String(self.to_string())
                }
            }

            impl $crate::codec::Decode for $ty {
                fn decode(node: &$crate::codec::Node) -> ::std::result::Result<Self, $crate::codec::CodecError> {
                    let text = <String as $crate::codec::Decode>::decode(node)?;
                    text.parse::<$ty>().map_err(|e| $crate::codec::CodecError::Text {
                        target: ::std::any::type_name::<$ty>(),
                        reason: e.to_string(),
                    })
                }
            }
        )+
    };
}
