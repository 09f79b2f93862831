//! Node tree data model.
//!
//! The serialized form is the JSON interchange format used by the builder
//! front end: `{ "nodeId", "type", "props", "state", "children", "value" }`.
//! Registry templates spell the type tag as `nodeType`, so both spellings are
//! accepted on input.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::BuilderResult;

// ═══════════════════════════════════════════════════════════════════════════════
// SPECIAL TAGS
// ═══════════════════════════════════════════════════════════════════════════════

pub const ROOT_ID: &str = "root";
pub const FRAGMENT_TAG: &str = "fragment";
pub const STRING_LITERAL_TAG: &str = "stringLiteral";

/// Prefix marking a template value as a reference to a prop of the enclosing
/// component definition.
pub const SIGIL: char = '$';

// ═══════════════════════════════════════════════════════════════════════════════
// PROPS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropType {
    String,
    Boolean,
    Number,
    /// Any other type name. Rendered in the string form.
    Other(String),
}

impl From<String> for PropType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "string" => PropType::String,
            "boolean" => PropType::Boolean,
            "number" => PropType::Number,
            _ => PropType::Other(name),
        }
    }
}

impl From<PropType> for String {
    fn from(ty: PropType) -> Self {
        match ty {
            PropType::String => "string".to_string(),
            PropType::Boolean => "boolean".to_string(),
            PropType::Number => "number".to_string(),
            PropType::Other(name) => name,
        }
    }
}

/// A JSON scalar carried by a prop or a literal node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Number(Number),
    Text(String),
    Json(Value),
}

impl PropValue {
    /// JavaScript truthiness: `false`, `0` and `""` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            PropValue::Bool(b) => *b,
            PropValue::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
            PropValue::Text(s) => !s.is_empty(),
            PropValue::Json(v) => !v.is_null(),
        }
    }

    /// Text form used when the value is interpolated into markup.
    pub fn to_text(&self) -> String {
        match self {
            PropValue::Bool(b) => b.to_string(),
            PropValue::Number(n) => number_text(n),
            PropValue::Text(s) => s.clone(),
            PropValue::Json(v) => v.to_string(),
        }
    }

    /// `Some("name")` for a `"$name"` string value.
    pub fn sigil_reference(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => s.strip_prefix(SIGIL),
            _ => None,
        }
    }
}

/// Number text as JavaScript prints it: integral values carry no fraction
/// (`1e3` is `1000`), everything else uses the shortest round-trip form.
fn number_text(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Text(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Text(s)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl From<i64> for PropValue {
    fn from(n: i64) -> Self {
        PropValue::Number(n.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prop {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<PropValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<PropValue>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub prop_type: Option<PropType>,
}

impl Prop {
    pub fn new(name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        Prop {
            name: name.into(),
            value: Some(value.into()),
            initial_value: None,
            prop_type: None,
        }
    }

    pub fn typed(name: impl Into<String>, prop_type: PropType, value: impl Into<PropValue>) -> Self {
        Prop {
            prop_type: Some(prop_type),
            ..Prop::new(name, value)
        }
    }

    /// Schema entry with only a default value, as used by component definitions.
    pub fn schema(name: impl Into<String>, prop_type: PropType, initial: impl Into<PropValue>) -> Self {
        Prop {
            name: name.into(),
            value: None,
            initial_value: Some(initial.into()),
            prop_type: Some(prop_type),
        }
    }

    /// An explicit `value` wins over `initialValue`.
    pub fn effective_value(&self) -> Option<&PropValue> {
        self.value.as_ref().or(self.initial_value.as_ref())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NODES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `fragment`: groups children without adding a nesting level.
    Group,
    /// `stringLiteral`: a scalar text value, or a `$prop` reference.
    Literal(Option<PropValue>),
    /// Host element or component, keyed by its type tag.
    Element(String),
    /// The serialized node carried no type tag.
    Untyped,
}

impl NodeKind {
    pub fn from_tag(tag: &str, value: Option<PropValue>) -> Self {
        match tag {
            FRAGMENT_TAG => NodeKind::Group,
            STRING_LITERAL_TAG => NodeKind::Literal(value),
            _ => NodeKind::Element(tag.to_string()),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            NodeKind::Group => Some(FRAGMENT_TAG),
            NodeKind::Literal(_) => Some(STRING_LITERAL_TAG),
            NodeKind::Element(tag) => Some(tag),
            NodeKind::Untyped => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub struct Node {
    pub id: Option<String>,
    pub kind: NodeKind,
    pub props: Vec<Prop>,
    /// Reserved; carried through serialization untouched.
    pub state: Vec<Value>,
    pub children: Vec<Node>,
}

impl Node {
    fn with_kind(kind: NodeKind) -> Self {
        Node {
            id: None,
            kind,
            props: Vec::new(),
            state: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn root() -> Self {
        Node::group().with_id(ROOT_ID)
    }

    pub fn group() -> Self {
        Node::with_kind(NodeKind::Group)
    }

    pub fn element(tag: impl Into<String>) -> Self {
        Node::with_kind(NodeKind::Element(tag.into()))
    }

    pub fn literal(value: impl Into<PropValue>) -> Self {
        Node::with_kind(NodeKind::Literal(Some(value.into())))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_prop(mut self, prop: Prop) -> Self {
        self.props.push(prop);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> Option<&str> {
        self.kind.tag()
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, NodeKind::Literal(_))
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    /// Pre-order search; first match wins.
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.has_id(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        if self.has_id(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Unlinks the first descendant with `id` from its parent. Direct children
    /// are checked before descending, level by level along the search path.
    pub fn detach(&mut self, id: &str) -> Option<Node> {
        if let Some(index) = self.children.iter().position(|child| child.has_id(id)) {
            return Some(self.children.remove(index));
        }
        self.children.iter_mut().find_map(|child| child.detach(id))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    node_id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    node_type: Option<String>,
    /// Template spelling of the type tag. When both keys are present, `type` wins.
    #[serde(rename = "nodeType", default, skip_serializing)]
    template_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<PropValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    props: Option<Vec<Prop>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    state: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<Node>>,
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        let kind = match raw.node_type.or(raw.template_type).as_deref() {
            Some(tag) => NodeKind::from_tag(tag, raw.value),
            None => NodeKind::Untyped,
        };
        Node {
            id: raw.node_id,
            kind,
            props: raw.props.unwrap_or_default(),
            state: raw.state.unwrap_or_default(),
            children: raw.children.unwrap_or_default(),
        }
    }
}

impl From<Node> for RawNode {
    fn from(node: Node) -> Self {
        let node_type = node.kind.tag().map(str::to_string);
        match node.kind {
            // Literals keep their compact `{ type, value }` shape.
            NodeKind::Literal(value) if node.props.is_empty() && node.children.is_empty() => {
                RawNode {
                    node_id: node.id,
                    node_type,
                    template_type: None,
                    value,
                    props: None,
                    state: None,
                    children: None,
                }
            }
            kind => RawNode {
                node_id: node.id,
                node_type,
                template_type: None,
                value: match kind {
                    NodeKind::Literal(value) => value,
                    _ => None,
                },
                props: Some(node.props),
                state: Some(node.state),
                children: Some(node.children),
            },
        }
    }
}

/// Shallow field overwrite applied by `update_node`. Absent fields are left
/// alone; present ones replace the node's field wholesale. The node id is not
/// updatable, and any key other than the ones below is rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NodeUpdate {
    #[serde(
        rename = "type",
        alias = "nodeType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Vec<Prop>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<PropValue>,
}

impl NodeUpdate {
    pub fn props(props: Vec<Prop>) -> Self {
        NodeUpdate {
            props: Some(props),
            ..NodeUpdate::default()
        }
    }

    pub fn apply_to(self, node: &mut Node) {
        if let Some(tag) = self.node_type {
            let current_value = match &mut node.kind {
                NodeKind::Literal(value) => value.take(),
                _ => None,
            };
            node.kind = NodeKind::from_tag(&tag, current_value);
        }
        if let Some(props) = self.props {
            node.props = props;
        }
        if let Some(state) = self.state {
            node.state = state;
        }
        if let Some(children) = self.children {
            node.children = children;
        }
        if let Some(value) = self.value {
            match &mut node.kind {
                NodeKind::Literal(slot) => *slot = Some(value),
                _ => log::debug!("ignoring literal value update on non-literal node"),
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPONENT DEFINITIONS & TREE
// ═══════════════════════════════════════════════════════════════════════════════

/// A named template: prop schema plus a child template that may reference the
/// props through `$name` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    #[serde(default)]
    pub node_type: String,
    #[serde(default)]
    pub props: Vec<Prop>,
    #[serde(default)]
    pub state: Vec<Value>,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl ComponentDefinition {
    pub fn new(node_type: impl Into<String>) -> Self {
        ComponentDefinition {
            node_type: node_type.into(),
            props: Vec::new(),
            state: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn prop_names(&self) -> impl Iterator<Item = &str> {
        self.props.iter().map(|p| p.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub root: Node,
}

impl Default for Tree {
    fn default() -> Self {
        Tree { root: Node::root() }
    }
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        self.root.find(id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.root.find_mut(id)
    }

    pub fn to_json(&self) -> BuilderResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> BuilderResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
