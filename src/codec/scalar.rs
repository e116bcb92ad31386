use crate::codec::{CodecError, Decode, Encode, Fields, Node};
use std::collections::{BTreeMap, HashMap};

macro_rules! integer {
    ($($ty:ty),+) => {
        $(
            impl Encode for $ty {
                fn encode(&self) -> Node {
                    Node::from(*self)
                }
            }

            impl Decode for $ty {
                fn decode(node: &Node) -> Result<Self, CodecError> {
                    let Node::Number(number) = node else {
                        return Err(CodecError::mismatch(stringify!($ty), node));
                    };

                    // Fractional numbers are truncated toward zero. `MAX as f64`
                    // rounds up to 2^N for the 64-bit types, so the upper bound
                    // is the exclusive `MAX + 1`.
                    let converted = if let Some(v) = number.as_i64() {
                        <$ty>::try_from(v).ok()
                    } else if let Some(v) = number.as_u64() {
                        <$ty>::try_from(v).ok()
                    } else {
                        number
                            .as_f64()
                            .map(f64::trunc)
                            .filter(|v| *v >= <$ty>::MIN as f64 && *v < <$ty>::MAX as f64 + 1.0)
                            .map(|v| v as $ty)
                    };

                    converted.ok_or_else(|| CodecError::OutOfRange {
                        target: stringify!($ty),
                        value: number.to_string(),
                    })
                }
            }
        )+
    };
}

integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float {
    ($($ty:ty),+) => {
        $(
            impl Encode for $ty {
                fn encode(&self) -> Node {
                    Node::from(*self)
                }
            }

            impl Decode for $ty {
                fn decode(node: &Node) -> Result<Self, CodecError> {
                    node.as_f64()
                        .map(|v| v as $ty)
                        .ok_or_else(|| CodecError::mismatch(stringify!($ty), node))
                }
            }
        )+
    };
}

float!(f32, f64);

impl Encode for bool {
    fn encode(&self) -> Node {
        Node::Bool(*self)
    }
}

impl Decode for bool {
    fn decode(node: &Node) -> Result<Self, CodecError> {
        match node {
            Node::Bool(b) => Ok(*b),
            Node::String(s) => Ok(s.eq_ignore_ascii_case("true")),
            Node::Null => Err(CodecError::mismatch("bool", node)),
            // Only the text `true` is truthy, so numbers and containers are false.
            other => Ok(other.to_string().eq_ignore_ascii_case("true")),
        }
    }
}

impl Encode for str {
    fn encode(&self) -> Node {
        Node::String(self.to_string())
    }
}

impl Encode for String {
    fn encode(&self) -> Node {
        Node::String(self.clone())
    }
}

/// Strings pass through; any other non-null value decodes to its JSON text.
impl Decode for String {
    fn decode(node: &Node) -> Result<Self, CodecError> {
        match node {
            Node::String(s) => Ok(s.clone()),
            Node::Null => Err(CodecError::mismatch("String", node)),
            other => Ok(other.to_string()),
        }
    }
}

impl Encode for char {
    fn encode(&self) -> Node {
        Node::String(self.to_string())
    }
}

impl Decode for char {
    fn decode(node: &Node) -> Result<Self, CodecError> {
        let text = String::decode(node)?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(CodecError::Text {
                target: "char",
                reason: format!("{:?} is not a single character", text),
            }),
        }
    }
}

impl Encode for () {
    fn encode(&self) -> Node {
        Node::Null
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self) -> Node {
        match self {
            Some(v) => v.encode(),
            None => Node::Null,
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(node: &Node) -> Result<Self, CodecError> {
        match node {
            Node::Null => Ok(None),
            other => T::decode(other).map(Some),
        }
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self) -> Node {
        Node::Array(self.iter().map(Encode::encode).collect())
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode(&self) -> Node {
        self.as_slice().encode()
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self) -> Node {
        self.as_slice().encode()
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(node: &Node) -> Result<Self, CodecError> {
        let Node::Array(items) = node else {
            return Err(CodecError::mismatch("array", node));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| T::decode(item).map_err(|e| e.in_field(&i.to_string())))
            .collect()
    }
}

fn encode_entries<'a, T: Encode + 'a>(entries: impl Iterator<Item = (&'a String, &'a T)>) -> Node {
    Node::Object(
        entries
            .map(|(k, v)| (k.clone(), v.encode()))
            .collect::<Fields>(),
    )
}

fn decode_entries<T: Decode, M: FromIterator<(String, T)>>(node: &Node) -> Result<M, CodecError> {
    let Node::Object(fields) = node else {
        return Err(CodecError::mismatch("object", node));
    };
    fields
        .iter()
        .map(|(k, v)| T::decode(v).map(|v| (k.clone(), v)).map_err(|e| e.in_field(k)))
        .collect()
}

impl<T: Encode> Encode for HashMap<String, T> {
    fn encode(&self) -> Node {
        encode_entries(self.iter())
    }
}

impl<T: Decode> Decode for HashMap<String, T> {
    fn decode(node: &Node) -> Result<Self, CodecError> {
        decode_entries(node)
    }
}

impl<T: Encode> Encode for BTreeMap<String, T> {
    fn encode(&self) -> Node {
        encode_entries(self.iter())
    }
}

impl<T: Decode> Decode for BTreeMap<String, T> {
    fn decode(node: &Node) -> Result<Self, CodecError> {
        decode_entries(node)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self) -> Node {
        (**self).encode()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(node: &Node) -> Result<Self, CodecError> {
        T::decode(node).map(Box::new)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self) -> Node {
        (**self).encode()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(31), 31)]
    #[case(json!(31.9), 31)]
    #[case(json!(-2.5), -2)]
    fn integers_from_numbers(#[case] node: Node, #[case] expected: i32) {
        assert_eq!(i32::decode(&node).unwrap(), expected);
    }

    #[test]
    fn integer_out_of_range() {
        let err = u8::decode(&json!(300)).unwrap_err();

        assert_eq!(err.to_string(), "value 300 is out of range for u8");
    }

    #[rstest]
    #[case(json!(9.223372036854775808e18))]
    #[case(json!(1e19))]
    fn i64_rejects_floats_past_max(#[case] node: Node) {
        assert!(matches!(
            i64::decode(&node),
            Err(CodecError::OutOfRange { target: "i64", .. })
        ));
    }

    #[test]
    fn u64_rejects_float_at_two_to_the_64() {
        assert!(matches!(
            u64::decode(&json!(1.8446744073709551616e19)),
            Err(CodecError::OutOfRange { target: "u64", .. })
        ));
    }

    #[test]
    fn float_at_i32_max_is_accepted() {
        assert_eq!(i32::decode(&json!(2147483647.0)).unwrap(), i32::MAX);
        assert!(i32::decode(&json!(2147483648.0)).is_err());
    }

    #[test]
    fn integer_rejects_strings() {
        assert!(matches!(
            i64::decode(&json!("12")),
            Err(CodecError::Mismatch { expected: "i64", found: "string" })
        ));
    }

    #[rstest]
    #[case(json!(true), true)]
    #[case(json!(false), false)]
    #[case(json!("true"), true)]
    #[case(json!("True"), true)]
    #[case(json!("false"), false)]
    #[case(json!("yes"), false)]
    #[case(json!(1), false)]
    #[case(json!([true]), false)]
    fn booleans(#[case] node: Node, #[case] expected: bool) {
        assert_eq!(bool::decode(&node).unwrap(), expected);
    }

    #[test]
    fn null_bool_is_rejected() {
        assert!(bool::decode(&Node::Null).is_err());
    }

    #[rstest]
    #[case(json!("plain"), "plain")]
    #[case(json!(42), "42")]
    #[case(json!(true), "true")]
    #[case(json!([1, 2]), "[1,2]")]
    fn strings_fall_back_to_text(#[case] node: Node, #[case] expected: &str) {
        assert_eq!(String::decode(&node).unwrap(), expected);
    }

    #[test]
    fn null_string_is_rejected() {
        assert!(String::decode(&Node::Null).is_err());
    }

    #[test]
    fn floats_accept_integers() {
        assert_eq!(f64::decode(&json!(3)).unwrap(), 3.0);
        assert_eq!(f32::decode(&json!(0.5)).unwrap(), 0.5);
    }

    #[test]
    fn options_map_null() {
        assert_eq!(Option::<u32>::decode(&Node::Null).unwrap(), None);
        assert_eq!(Option::<u32>::decode(&json!(4)).unwrap(), Some(4));
        assert_eq!(Some("x").encode(), json!("x"));
        assert_eq!(None::<i32>.encode(), Node::Null);
    }

    #[test]
    fn sequences_report_failing_index() {
        let err = Vec::<u8>::decode(&json!([1, "b"])).unwrap_err();

        assert_eq!(err.to_string(), "field `1`: expected u8, found string");
    }

    #[test]
    fn arrays_and_slices_encode_as_sequences() {
        assert_eq!([1u8, 2, 3].encode(), json!([1, 2, 3]));
        assert_eq!(vec!["a", "b"].encode(), json!(["a", "b"]));
    }

    #[test]
    fn chars_must_be_single() {
        assert_eq!(char::decode(&json!("z")).unwrap(), 'z');
        assert!(char::decode(&json!("zz")).is_err());
    }

    #[test]
    fn boxed_value_keeps_inner_type_name() {
        let boxed: Box<dyn Encode> = Box::new(5u16);

        assert_eq!(boxed.type_name(), "u16");
    }
}
