//! Component registry and tag classification rules.
//!
//! The registry holds the built-in component definitions (parsed once from the
//! embedded `builtins.json`) and a per-instance overlay of custom
//! registrations. Classification of a tag as component / host element never
//! depends on what is registered: it is a fixed rule over the allowlists below.

use lazy_static::lazy_static;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::node::{ComponentDefinition, FRAGMENT_TAG, STRING_LITERAL_TAG};

// ═══════════════════════════════════════════════════════════════════════════════
// CLASSIFICATION TABLES
// ═══════════════════════════════════════════════════════════════════════════════

lazy_static! {
    /// Primitive host elements. Anything outside this set (and the special
    /// tags) is treated as a component.
    static ref HOST_ELEMENTS: HashSet<&'static str> = [
        "div", "span", "p", "h1", "h2", "h3", "h4", "h5", "h6", "section", "article", "nav",
        "aside", "header", "footer", "img", "form", "label", "select", "option", "textarea",
        "ul", "ol", "li", "table", "tr", "td", "th", "br", "hr", "a", "strong", "em", "code",
        "pre",
    ]
    .into_iter()
    .collect();

    /// Components shipped with the registry. Decides the import source only.
    static ref BUILTIN_COMPONENTS: HashSet<&'static str> = [
        "card", "button", "text", "container", "input", "icon", "imagecontainer",
    ]
    .into_iter()
    .collect();

    /// Components rendered with a nested body instead of self-closed.
    static ref CHILDREN_ACCEPTING: HashSet<&'static str> = ["container"].into_iter().collect();

    static ref SELF_CLOSING_TAGS: HashSet<&'static str> =
        ["img", "input", "br", "hr", "meta", "link"].into_iter().collect();

    /// Literal children of these components become the named prop.
    static ref PROMOTED_CHILD_PROPS: HashMap<&'static str, &'static str> =
        [("button", "text"), ("text", "content")].into_iter().collect();

    static ref BUILTIN_DEFINITIONS: HashMap<String, ComponentDefinition> =
        serde_json::from_str(include_str!("builtins.json"))
            .expect("builtins.json is a valid definition map");
}

pub fn is_special_tag(tag: &str) -> bool {
    tag == FRAGMENT_TAG || tag == STRING_LITERAL_TAG
}

pub fn is_host_element(tag: &str) -> bool {
    HOST_ELEMENTS.contains(tag.to_lowercase().as_str())
}

/// A tag is a component iff it is neither special nor a host element.
/// Registration state plays no part in this.
pub fn is_component(tag: &str) -> bool {
    !tag.is_empty() && !is_special_tag(tag) && !is_host_element(tag)
}

pub fn is_builtin_component(tag: &str) -> bool {
    BUILTIN_COMPONENTS.contains(tag.to_lowercase().as_str())
}

pub fn accepts_children(tag: &str) -> bool {
    CHILDREN_ACCEPTING.contains(tag.to_lowercase().as_str())
}

pub fn is_self_closing(tag: &str) -> bool {
    SELF_CLOSING_TAGS.contains(tag.to_lowercase().as_str())
}

/// Name of the prop a literal child is folded into, if the type has one.
pub fn promoted_child_prop(tag: &str) -> Option<&'static str> {
    PROMOTED_CHILD_PROPS.get(tag).copied()
}

/// Emitted component identifier: first letter uppercased.
pub fn component_name(tag: &str) -> String {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    custom: HashMap<String, ComponentDefinition>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces. Custom registrations shadow built-ins of the same name.
    pub fn register(&mut self, node_type: impl Into<String>, definition: ComponentDefinition) {
        let node_type = node_type.into();
        log::debug!("registering component '{}'", node_type);
        self.custom.insert(node_type, definition);
    }

    pub fn get(&self, node_type: &str) -> Option<&ComponentDefinition> {
        self.custom
            .get(node_type)
            .or_else(|| BUILTIN_DEFINITIONS.get(node_type))
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.get(node_type).is_some()
    }

    /// Every known type name, built-in and custom.
    pub fn list_types(&self) -> Vec<String> {
        let names: BTreeSet<&String> = BUILTIN_DEFINITIONS.keys().chain(self.custom.keys()).collect();
        names.into_iter().cloned().collect()
    }

    /// Time-based prefix plus random suffix. Unique enough for interactive
    /// editing, not for high-frequency concurrent generation.
    pub fn new_id(&self) -> String {
        generate_node_id()
    }
}

pub fn generate_node_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}{}", to_base36(millis), &suffix[..11])
}

fn to_base36(mut n: u128) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
