/*! Circuit AST as handed over by the parser.
 *
 * The generator only ever borrows these nodes. Node kinds form a closed enum; the operator and
 * declaration sub-tags are kept as the parser's raw strings and decoded where they are used, so a
 * parser newer than the generator surfaces as a diagnostic instead of a deserialization failure.
 */

use crate::source_location::Span;
use crate::{CoreError, Result};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    #[serde(rename = "NUMBER")]
    Number {
        #[serde(with = "crate::decimal")]
        value: BigUint,
    },
    #[serde(rename = "VARIABLE")]
    Variable {
        name: String,
        #[serde(default)]
        selectors: Vec<Node>,
    },
    #[serde(rename = "PIN")]
    Pin { component: Reference, pin: Reference },
    #[serde(rename = "OP")]
    Op { op: String, values: Vec<Node> },
    #[serde(rename = "DECLARE")]
    Declare {
        #[serde(rename = "declareType")]
        declare_type: String,
        name: Box<Node>,
    },
    #[serde(rename = "FUNCTIONCALL")]
    FunctionCall {
        name: String,
        #[serde(default)]
        params: Vec<Node>,
    },
    #[serde(rename = "BLOCK")]
    Block { statements: Vec<Node> },
    #[serde(rename = "FOR")]
    For {
        init: Box<Node>,
        condition: Box<Node>,
        step: Box<Node>,
        body: Box<Node>,
    },
    #[serde(rename = "WHILE")]
    While { condition: Box<Node>, body: Box<Node> },
    #[serde(rename = "RETURN")]
    Return { value: Box<Node> },
    #[serde(rename = "TEMPLATEDEF")]
    TemplateDef {
        name: String,
        #[serde(default)]
        params: Vec<String>,
        block: Box<Node>,
    },
    #[serde(rename = "FUNCTIONDEF")]
    FunctionDef {
        name: String,
        #[serde(default)]
        params: Vec<String>,
        block: Box<Node>,
    },
    #[serde(rename = "INCLUDE")]
    Include {
        #[serde(default)]
        file: Option<String>,
        #[serde(default)]
        block: Option<Box<Node>>,
    },
    #[serde(rename = "ARRAY")]
    Array { values: Vec<Node> },
}

impl NodeKind {
    /// The parser's tag for this kind, used in diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::Number { .. } => "NUMBER",
            NodeKind::Variable { .. } => "VARIABLE",
            NodeKind::Pin { .. } => "PIN",
            NodeKind::Op { .. } => "OP",
            NodeKind::Declare { .. } => "DECLARE",
            NodeKind::FunctionCall { .. } => "FUNCTIONCALL",
            NodeKind::Block { .. } => "BLOCK",
            NodeKind::For { .. } => "FOR",
            NodeKind::While { .. } => "WHILE",
            NodeKind::Return { .. } => "RETURN",
            NodeKind::TemplateDef { .. } => "TEMPLATEDEF",
            NodeKind::FunctionDef { .. } => "FUNCTIONDEF",
            NodeKind::Include { .. } => "INCLUDE",
            NodeKind::Array { .. } => "ARRAY",
        }
    }
}

/// `name[sel]...` half of a pin access (`comp[i].pin[j]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,
    #[serde(default)]
    pub selectors: Vec<Node>,
}

impl Reference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selectors: Vec::new(),
        }
    }

    pub fn indexed(name: impl Into<String>, selectors: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            selectors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`
    Assign,
    /// `<--`
    SignalAssign,
    /// `<==`
    ConstrainedAssign,
    /// `===`
    Constrain,
    AddAssign,
    MulAssign,
    Add,
    Sub,
    Neg,
    Mul,
    Pow,
    BitAnd,
    Shl,
    Shr,
    Lt,
    Eq,
    /// `cond ? a : b`
    Ternary,
    /// `x++`
    PostIncrement,
    /// `++x`
    PreIncrement,
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "=" => Operator::Assign,
            "<--" => Operator::SignalAssign,
            "<==" => Operator::ConstrainedAssign,
            "===" => Operator::Constrain,
            "+=" => Operator::AddAssign,
            "*=" => Operator::MulAssign,
            "+" => Operator::Add,
            "-" => Operator::Sub,
            "UMINUS" => Operator::Neg,
            "*" => Operator::Mul,
            "**" => Operator::Pow,
            "&" => Operator::BitAnd,
            "<<" => Operator::Shl,
            ">>" => Operator::Shr,
            "<" => Operator::Lt,
            "==" => Operator::Eq,
            "?" => Operator::Ternary,
            "PLUSPLUSRIGHT" => Operator::PostIncrement,
            "PLUSPLUSLEFT" => Operator::PreIncrement,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Assign => "=",
            Operator::SignalAssign => "<--",
            Operator::ConstrainedAssign => "<==",
            Operator::Constrain => "===",
            Operator::AddAssign => "+=",
            Operator::MulAssign => "*=",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Neg => "UMINUS",
            Operator::Mul => "*",
            Operator::Pow => "**",
            Operator::BitAnd => "&",
            Operator::Shl => "<<",
            Operator::Shr => ">>",
            Operator::Lt => "<",
            Operator::Eq => "==",
            Operator::Ternary => "?",
            Operator::PostIncrement => "PLUSPLUSRIGHT",
            Operator::PreIncrement => "PLUSPLUSLEFT",
        }
    }

    /// Number of operands the parser attaches to this operator.
    pub fn arity(&self) -> usize {
        match self {
            Operator::Neg | Operator::PostIncrement | Operator::PreIncrement => 1,
            Operator::Ternary => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    SignalInput,
    SignalOutput,
    Signal,
    Variable,
    Component,
}

impl DeclarationKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "SIGNALIN" => Some(DeclarationKind::SignalInput),
            "SIGNALOUT" => Some(DeclarationKind::SignalOutput),
            "SIGNAL" => Some(DeclarationKind::Signal),
            "VARIABLE" => Some(DeclarationKind::Variable),
            "COMPONENT" => Some(DeclarationKind::Component),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            DeclarationKind::SignalInput => "SIGNALIN",
            DeclarationKind::SignalOutput => "SIGNALOUT",
            DeclarationKind::Signal => "SIGNAL",
            DeclarationKind::Variable => "VARIABLE",
            DeclarationKind::Component => "COMPONENT",
        }
    }
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            span: Span::default(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Parse a node tree from the parser's JSON output.
    pub fn from_json(text: &str) -> Result<Node> {
        crate::from_json_unbounded(text)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(CoreError::from)
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    pub fn number(value: u64) -> Self {
        Self::big_number(BigUint::from(value))
    }

    pub fn big_number(value: BigUint) -> Self {
        Self::new(NodeKind::Number { value })
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::indexed(name, Vec::new())
    }

    pub fn indexed(name: impl Into<String>, selectors: Vec<Node>) -> Self {
        Self::new(NodeKind::Variable {
            name: name.into(),
            selectors,
        })
    }

    pub fn pin(component: Reference, pin: Reference) -> Self {
        Self::new(NodeKind::Pin { component, pin })
    }

    pub fn op(symbol: impl Into<String>, values: Vec<Node>) -> Self {
        Self::new(NodeKind::Op {
            op: symbol.into(),
            values,
        })
    }

    pub fn binary(operator: Operator, lhs: Node, rhs: Node) -> Self {
        Self::op(operator.symbol(), vec![lhs, rhs])
    }

    pub fn unary(operator: Operator, operand: Node) -> Self {
        Self::op(operator.symbol(), vec![operand])
    }

    pub fn declare(kind: DeclarationKind, name: Node) -> Self {
        Self::new(NodeKind::Declare {
            declare_type: kind.tag().to_string(),
            name: Box::new(name),
        })
    }

    pub fn call(name: impl Into<String>, params: Vec<Node>) -> Self {
        Self::new(NodeKind::FunctionCall {
            name: name.into(),
            params,
        })
    }

    pub fn block(statements: Vec<Node>) -> Self {
        Self::new(NodeKind::Block { statements })
    }

    pub fn for_loop(init: Node, condition: Node, step: Node, body: Node) -> Self {
        Self::new(NodeKind::For {
            init: Box::new(init),
            condition: Box::new(condition),
            step: Box::new(step),
            body: Box::new(body),
        })
    }

    pub fn while_loop(condition: Node, body: Node) -> Self {
        Self::new(NodeKind::While {
            condition: Box::new(condition),
            body: Box::new(body),
        })
    }

    pub fn ret(value: Node) -> Self {
        Self::new(NodeKind::Return {
            value: Box::new(value),
        })
    }

    pub fn template(name: impl Into<String>, params: &[&str], block: Node) -> Self {
        Self::new(NodeKind::TemplateDef {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            block: Box::new(block),
        })
    }

    pub fn function(name: impl Into<String>, params: &[&str], block: Node) -> Self {
        Self::new(NodeKind::FunctionDef {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            block: Box::new(block),
        })
    }

    pub fn include(file: Option<&str>, block: Option<Node>) -> Self {
        Self::new(NodeKind::Include {
            file: file.map(str::to_string),
            block: block.map(Box::new),
        })
    }

    pub fn array(values: Vec<Node>) -> Self {
        Self::new(NodeKind::Array { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_operator_symbols_are_stable() {
        for symbol in [
            "=", "<--", "<==", "===", "+=", "*=", "+", "-", "UMINUS", "*", "**", "&", "<<", ">>",
            "<", "==", "?", "PLUSPLUSRIGHT", "PLUSPLUSLEFT",
        ] {
            let op = Operator::from_symbol(symbol).expect(symbol);
            assert_eq!(op.symbol(), symbol);
        }
        assert_eq!(Operator::from_symbol("/"), None);
        assert_eq!(Operator::Ternary.arity(), 3);
        assert_eq!(Operator::PostIncrement.arity(), 1);
        assert_eq!(Operator::Shl.arity(), 2);
    }

    #[test]
    fn test_declaration_tags() {
        assert_eq!(
            DeclarationKind::from_tag("SIGNALIN"),
            Some(DeclarationKind::SignalInput)
        );
        assert_eq!(DeclarationKind::Component.tag(), "COMPONENT");
        assert_eq!(DeclarationKind::from_tag("BUS"), None);
    }

    #[test]
    fn test_parse_parser_json() {
        let json = r#"{
            "type": "OP", "op": "<==",
            "first_line": 3, "first_column": 4, "last_line": 3, "last_column": 20,
            "values": [
                {"type": "DECLARE", "declareType": "SIGNALOUT",
                 "name": {"type": "VARIABLE", "name": "out", "selectors": []}},
                {"type": "OP", "op": "*", "values": [
                    {"type": "VARIABLE", "name": "a"},
                    {"type": "NUMBER", "value": "21888242871839275222246405745257275088548364400416034343698204186575808495616"}
                ]}
            ]
        }"#;

        let node = Node::from_json(json).unwrap();
        assert_eq!(node.span, Span::line(3, 4, 20));

        let NodeKind::Op { op, values } = &node.kind else {
            panic!("expected OP, got {}", node.tag());
        };
        assert_eq!(op, "<==");
        assert_eq!(values[0].tag(), "DECLARE");

        let NodeKind::Op { values: product, .. } = &values[1].kind else {
            panic!("expected OP");
        };
        let expected = BigUint::parse_bytes(
            b"21888242871839275222246405745257275088548364400416034343698204186575808495616",
            10,
        )
        .unwrap();
        assert_eq!(product[1].kind, NodeKind::Number { value: expected });
    }

    #[test]
    fn test_builders_match_json_shape() {
        let built = Node::template(
            "Multiplier",
            &["n"],
            Node::block(vec![Node::declare(
                DeclarationKind::SignalInput,
                Node::variable("a"),
            )]),
        );

        let reparsed = Node::from_json(&built.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, built);
    }

    #[test]
    fn test_parse_deep_operator_chain() {
        // 1 + 1 + ... + 1, nested to the left as the parser emits it.
        let terms = 100;
        let leaf = r#"{"type": "NUMBER", "value": "1"}"#;
        let mut json = leaf.to_string();
        for _ in 1..terms {
            json = format!(r#"{{"type": "OP", "op": "+", "values": [{json}, {leaf}]}}"#);
        }

        let mut node = Node::from_json(&json).unwrap();
        let mut depth = 1;
        while let NodeKind::Op { values, .. } = node.kind {
            node = values.into_iter().next().unwrap();
            depth += 1;
        }
        assert_eq!(depth, terms);
    }

    #[test]
    fn test_trailing_input_is_rejected() {
        assert!(Node::from_json(r#"{"type": "NUMBER", "value": "1"} {}"#).is_err());
    }

    #[test]
    fn test_unknown_node_type_is_rejected() {
        let err = Node::from_json(r#"{"type": "IF", "condition": {}}"#).unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));
    }
}
