use crate::codec::Node;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed JSON document: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("document has no root type key")]
    MissingRoot,

    #[error("document must have exactly one root type key, found {0}")]
    AmbiguousRoot(usize),

    #[error("unregistered type `{0}`")]
    UnregisteredType(String),

    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("value {value} is out of range for {target}")]
    OutOfRange { target: &'static str, value: String },

    #[error("can't parse {target} from text: {reason}")]
    Text { target: &'static str, reason: String },

    #[error("field `{path}`: {source}")]
    Field {
        path: String,
        #[source]
        source: Box<CodecError>,
    },
}

impl CodecError {
    pub fn mismatch(expected: &'static str, node: &Node) -> Self {
        CodecError::Mismatch {
            expected,
            found: kind(node),
        }
    }

    /// Prefixes the error with the field it occurred in.
    pub fn in_field(self, field: &str) -> Self {
        match self {
            CodecError::Field { path, source } => CodecError::Field {
                path: format!("{}.{}", field, path),
                source,
            },
            other => CodecError::Field {
                path: field.to_string(),
                source: Box::new(other),
            },
        }
    }
}

fn kind(node: &Node) -> &'static str {
    match node {
        Node::Null => "null",
        Node::Bool(_) => "boolean",
        Node::Number(_) => "number",
        Node::String(_) => "string",
        Node::Array(_) => "array",
        Node::Object(_) => "object",
    }
}
