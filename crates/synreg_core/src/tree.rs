//! Tree shapes on either side of the codec.
//!
//! [`SyntaxNode`] is what a grammar-driven producer hands over (symbolic
//! kinds). [`SerializedNode`] is what comes back out of a stream (numeric
//! codes). A registry converts between the two.

use crate::consts::{KindCode, CODE_TOKEN, NAME_TOKEN};
use crate::errors::CodecError;
use crate::registry::Registry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SyntaxNode>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "payload_serde")]
    pub payload: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializedNode {
    pub code: KindCode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SerializedNode>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "payload_serde")]
    pub payload: Option<Vec<u8>>,
}

impl SyntaxNode {
    pub fn new(kind: impl Into<String>, children: Vec<SyntaxNode>) -> Self {
        Self { kind: kind.into(), children, payload: None }
    }

    pub fn token(text: impl Into<Vec<u8>>) -> Self {
        Self { kind: NAME_TOKEN.to_string(), children: Vec::new(), payload: Some(text.into()) }
    }

    /// Number of nodes in this subtree.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(SyntaxNode::size).sum::<usize>()
    }
}

impl SerializedNode {
    pub fn new(code: KindCode, children: Vec<SerializedNode>) -> Self {
        Self { code, children, payload: None }
    }

    pub fn token(text: impl Into<Vec<u8>>) -> Self {
        Self { code: CODE_TOKEN, children: Vec::new(), payload: Some(text.into()) }
    }

    pub fn size(&self) -> usize {
        1 + self.children.iter().map(SerializedNode::size).sum::<usize>()
    }
}

impl Registry {
    /// Replace symbolic kinds with codes.
    pub fn lower(&self, node: &SyntaxNode) -> Result<SerializedNode, CodecError> {
        let code = self
            .code_of(&node.kind)
            .ok_or_else(|| CodecError::UnknownKind(node.kind.clone()))?;
        let children = node.children.iter().map(|c| self.lower(c)).collect::<Result<_, _>>()?;
        Ok(SerializedNode { code, children, payload: node.payload.clone() })
    }

    /// Replace codes with symbolic kinds.
    pub fn raise(&self, node: &SerializedNode) -> Result<SyntaxNode, CodecError> {
        let kind = self.name_of(node.code).ok_or(CodecError::UnknownCode(node.code))?;
        let children = node.children.iter().map(|c| self.raise(c)).collect::<Result<_, _>>()?;
        Ok(SyntaxNode { kind: kind.to_string(), children, payload: node.payload.clone() })
    }
}

/// Payload as a JSON string when it is UTF-8, else as a byte array.
mod payload_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Bytes(Vec<u8>),
    }

    pub fn serialize<S: Serializer>(p: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match p {
            None => s.serialize_none(),
            Some(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => s.serialize_some(text),
                Err(_) => s.serialize_some(bytes),
            },
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        Ok(Option::<Repr>::deserialize(d)?.map(|r| match r {
            Repr::Text(t) => t.into_bytes(),
            Repr::Bytes(b) => b,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::KindTable;

    #[test]
    fn lower_and_raise() {
        let reg = Registry::build(&[("A", 2)].into_iter().collect::<KindTable>()).unwrap();
        let t = SyntaxNode::new("A", vec![SyntaxNode::token("x"), SyntaxNode::new("Unknown", vec![])]);
        let s = reg.lower(&t).unwrap();
        assert_eq!(s.code, 2);
        assert_eq!(s.children[0], SerializedNode::token("x"));
        assert_eq!(s.children[1].code, 1);
        assert_eq!(reg.raise(&s).unwrap(), t);
        assert_eq!(t.size(), 3);

        let bad = SyntaxNode::new("Missing", vec![]);
        assert_eq!(reg.lower(&bad), Err(CodecError::UnknownKind("Missing".into())));
        assert_eq!(reg.raise(&SerializedNode::new(77, vec![])), Err(CodecError::UnknownCode(77)));
    }

    #[test]
    fn json_payloads() {
        let t = SyntaxNode::new("A", vec![SyntaxNode::token("echo"), SyntaxNode::token(vec![0xffu8, 0x00])]);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"A","children":[{"kind":"Token","payload":"echo"},{"kind":"Token","payload":[255,0]}]}"#
        );
        assert_eq!(serde_json::from_str::<SyntaxNode>(&json).unwrap(), t);
    }
}
