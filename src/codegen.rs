//! Codegen module for the screen builder
//!
//! Compiles a node tree into JSX module text. Two independent paths:
//! - screen rendering (`render_tree`): the whole tree wrapped in one app component,
//!   with one import line per component type used;
//! - definition rendering (`render_definition`): one module per custom component,
//!   with `$prop` references turned into interpolations of the function parameters.
//!
//! Rendering is a pure function of the input and the classification rules in
//! `registry`. Malformed nodes degrade to empty text in lenient mode and raise
//! `BuilderError::MalformedNode` in strict mode.

use lazy_static::lazy_static;
#[cfg(feature = "napi")]
use napi_derive::napi;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{BuilderError, BuilderResult};
use crate::node::{ComponentDefinition, Node, NodeKind, Prop, PropType, PropValue, Tree};
use crate::registry::{
    accepts_children, component_name, is_builtin_component, is_component, is_self_closing,
    promoted_child_prop,
};
use crate::visitor::{walk_children, NodeVisitor};

const INDENT: &str = "  ";

lazy_static! {
    /// Tag names accepted in strict mode.
    static ref TAG_NAME_RE: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_.:-]*$").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderMode {
    /// Malformed nodes render to empty text.
    #[default]
    Lenient,
    /// Malformed nodes are reported as errors.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorOptions {
    pub mode: RenderMode,
    /// Import path prefix for built-in components, relative to the app module.
    pub registry_import_root: String,
    /// Import path prefix for user-defined components, relative to the app module.
    pub user_import_root: String,
    pub app_component_name: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            mode: RenderMode::Lenient,
            registry_import_root: "../../../componentregistry".to_string(),
            user_import_root: "../../../usercomponents".to_string(),
            app_component_name: "GeneratedApp".to_string(),
        }
    }
}

impl GeneratorOptions {
    pub fn strict() -> Self {
        GeneratorOptions {
            mode: RenderMode::Strict,
            ..Self::default()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// IMPORT SYNTHESIS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportSource {
    Registry,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentImport {
    pub node_type: String,
    pub source: ImportSource,
}

/// Collects every distinct component type in first-seen order. A later
/// occurrence of the same type overwrites its source.
#[derive(Default)]
struct ImportCollector {
    imports: Vec<ComponentImport>,
}

impl<'t> NodeVisitor<'t> for ImportCollector {
    fn visit_element(&mut self, node: &'t Node, tag: &'t str) {
        if is_component(tag) {
            let source = if is_builtin_component(tag) {
                ImportSource::Registry
            } else {
                ImportSource::User
            };
            match self.imports.iter_mut().find(|i| i.node_type == tag) {
                Some(existing) => existing.source = source,
                None => self.imports.push(ComponentImport {
                    node_type: tag.to_string(),
                    source,
                }),
            }
        }
        walk_children(self, node);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ATTRIBUTES
// ═══════════════════════════════════════════════════════════════════════════════

/// Serializes props to JSX attribute text, each attribute prefixed by a space.
pub fn serialize_props(props: &[Prop]) -> String {
    props.iter().filter_map(|p| serialize_prop(p, false)).collect()
}

/// Like `serialize_props`, but `"$name"` values become `{name}` interpolations.
pub fn serialize_template_props(props: &[Prop]) -> String {
    props.iter().filter_map(|p| serialize_prop(p, true)).collect()
}

fn serialize_prop(prop: &Prop, resolve_references: bool) -> Option<String> {
    let value = prop.effective_value()?;

    if resolve_references {
        if let Some(reference) = value.sigil_reference() {
            return Some(format!(" {}={{{}}}", prop.name, reference));
        }
    }

    match &prop.prop_type {
        Some(PropType::Boolean) => value.is_truthy().then(|| format!(" {}", prop.name)),
        Some(PropType::Number) => Some(format!(" {}={{{}}}", prop.name, value.to_text())),
        _ => Some(format!(" {}=\"{}\"", prop.name, value.to_text())),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GENERATOR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct MarkupGenerator {
    options: GeneratorOptions,
}

impl MarkupGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        MarkupGenerator { options }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    fn malformed(&self, message: &str) -> BuilderResult<String> {
        match self.options.mode {
            RenderMode::Strict => Err(BuilderError::MalformedNode(message.to_string())),
            RenderMode::Lenient => {
                log::warn!("skipping malformed node: {}", message);
                Ok(String::new())
            }
        }
    }

    fn check_tag(&self, tag: &str) -> BuilderResult<()> {
        if self.options.mode == RenderMode::Strict && !TAG_NAME_RE.is_match(tag) {
            return Err(BuilderError::MalformedNode(format!(
                "invalid tag name '{}'",
                tag
            )));
        }
        Ok(())
    }

    fn render_literal(&self, value: Option<&PropValue>) -> BuilderResult<String> {
        match value {
            Some(value) => Ok(match value.sigil_reference() {
                Some(reference) => format!("{{{}}}", reference),
                // Emitted verbatim, no escaping.
                None => value.to_text(),
            }),
            None => self.malformed("string literal without a value"),
        }
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Screen rendering
    // ───────────────────────────────────────────────────────────────────────────

    /// Component imports for every component type in the tree.
    pub fn collect_imports(&self, tree: &Tree) -> Vec<ComponentImport> {
        let mut collector = ImportCollector::default();
        collector.visit_node(&tree.root);
        collector.imports
    }

    pub fn render_imports(&self, tree: &Tree) -> String {
        self.collect_imports(tree)
            .iter()
            .map(|import| {
                let root = match import.source {
                    ImportSource::Registry => &self.options.registry_import_root,
                    ImportSource::User => &self.options.user_import_root,
                };
                format!(
                    "import {{ {} }} from \"{}/{}.jsx\";\n",
                    component_name(&import.node_type),
                    root,
                    import.node_type
                )
            })
            .collect()
    }

    /// The full app module: imports, then the app component wrapping the tree
    /// in a single `<div>`.
    pub fn render_tree(&self, tree: &Tree) -> BuilderResult<String> {
        let imports = self.render_imports(tree);
        let jsx = self.render_node(&tree.root, 0)?;

        Ok(format!(
            "{}\nexport default function {}() {{\n    return (\n        <div>\n{}\n        </div>\n    );\n}}",
            imports, self.options.app_component_name, jsx
        ))
    }

    pub fn render_node(&self, node: &Node, depth: usize) -> BuilderResult<String> {
        match &node.kind {
            NodeKind::Untyped => self.malformed("node without a type tag"),
            NodeKind::Literal(value) => self.render_literal(value.as_ref()),
            NodeKind::Group => self.render_siblings(&node.children, depth),
            NodeKind::Element(tag) => {
                self.check_tag(tag)?;
                if is_component(tag) {
                    self.render_component(node, tag, depth)
                } else {
                    self.render_host_element(node, tag, depth)
                }
            }
        }
    }

    /// Group children share the group's depth.
    fn render_siblings(&self, children: &[Node], depth: usize) -> BuilderResult<String> {
        let rendered = children
            .iter()
            .map(|child| self.render_node(child, depth))
            .collect::<BuilderResult<Vec<_>>>()?;
        Ok(rendered.join("\n"))
    }

    fn render_body(&self, children: &[Node], depth: usize) -> BuilderResult<String> {
        let mut parts = Vec::with_capacity(children.len());
        for child in children {
            let jsx = self.render_node(child, depth)?;
            if !jsx.is_empty() {
                parts.push(jsx);
            }
        }
        Ok(parts.join("\n"))
    }

    fn render_component(&self, node: &Node, tag: &str, depth: usize) -> BuilderResult<String> {
        let indent = INDENT.repeat(depth);
        let takes_children = accepts_children(tag);

        let mut props = node.props.clone();
        if !takes_children {
            if let Some(prop_name) = promoted_child_prop(tag) {
                for child in &node.children {
                    if let NodeKind::Literal(value) = &child.kind {
                        props.push(Prop {
                            name: prop_name.to_string(),
                            value: value.clone(),
                            initial_value: None,
                            prop_type: Some(PropType::String),
                        });
                    }
                }
            }
        }

        let attrs = serialize_props(&props);
        let name = component_name(tag);

        if !takes_children {
            return Ok(format!("{}<{}{} />", indent, name, attrs));
        }

        let body = self.render_body(&node.children, depth + 1)?;
        Ok(wrap_body(&indent, &name, &attrs, &body))
    }

    fn render_host_element(&self, node: &Node, tag: &str, depth: usize) -> BuilderResult<String> {
        let indent = INDENT.repeat(depth);
        let attrs = serialize_props(&node.props);

        if is_self_closing(tag) {
            return Ok(format!("{}<{}{} />", indent, tag, attrs));
        }

        let body = self.render_body(&node.children, depth + 1)?;
        Ok(wrap_body(&indent, tag, &attrs, &body))
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Definition rendering
    // ───────────────────────────────────────────────────────────────────────────

    /// One module exporting the component function. Nested custom components
    /// used by the template are not imported.
    pub fn render_definition(&self, definition: &ComponentDefinition) -> BuilderResult<String> {
        let name = component_name(&definition.node_type);
        let params: Vec<&str> = definition.prop_names().collect();
        let signature = if params.is_empty() {
            String::new()
        } else {
            format!("{{ {} }}", params.join(", "))
        };

        let rendered = definition
            .children
            .iter()
            .map(|child| self.render_template_node(child, 1, &definition.node_type))
            .collect::<BuilderResult<Vec<_>>>()?;

        Ok(format!(
            "export function {}({}) {{\n    return (\n{}\n    );\n}}",
            name,
            signature,
            rendered.join("\n")
        ))
    }

    fn render_template_node(&self, node: &Node, depth: usize, root_type: &str) -> BuilderResult<String> {
        let tag = match &node.kind {
            NodeKind::Untyped => return self.malformed("template node without a type tag"),
            NodeKind::Literal(value) => return self.render_literal(value.as_ref()),
            NodeKind::Group => return self.render_template_siblings(&node.children, depth, root_type),
            NodeKind::Element(tag) => tag,
        };

        // A top-level wrapper named after the definition itself is unwrapped.
        if depth == 1 && tag == root_type {
            return self.render_template_siblings(&node.children, depth, root_type);
        }

        self.check_tag(tag)?;
        let indent = INDENT.repeat(depth);
        let attrs = serialize_template_props(&node.props);

        if is_self_closing(tag) {
            return Ok(format!("{}<{}{} />", indent, tag, attrs));
        }

        let mut parts = Vec::with_capacity(node.children.len());
        for child in &node.children {
            let jsx = self.render_template_node(child, depth + 1, root_type)?;
            if !jsx.is_empty() {
                parts.push(jsx);
            }
        }
        Ok(wrap_body(&indent, tag, &attrs, &parts.join("\n")))
    }

    fn render_template_siblings(
        &self,
        children: &[Node],
        depth: usize,
        root_type: &str,
    ) -> BuilderResult<String> {
        let rendered = children
            .iter()
            .map(|child| self.render_template_node(child, depth, root_type))
            .collect::<BuilderResult<Vec<_>>>()?;
        Ok(rendered.join("\n"))
    }
}

/// Paired tags; the body is dropped when it is blank.
fn wrap_body(indent: &str, name: &str, attrs: &str, body: &str) -> String {
    if body.trim().is_empty() {
        format!("{}<{}{}></{}>", indent, name, attrs, name)
    } else {
        format!("{}<{}{}>\n{}\n{}</{}>", indent, name, attrs, body, indent, name)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
fn napi_generator(strict: Option<bool>) -> MarkupGenerator {
    if strict.unwrap_or(false) {
        MarkupGenerator::new(GeneratorOptions::strict())
    } else {
        MarkupGenerator::default()
    }
}

#[cfg(feature = "napi")]
#[napi]
pub fn render_tree_native(tree_json: String, strict: Option<bool>) -> napi::Result<String> {
    let tree = Tree::from_json(&tree_json)?;
    Ok(napi_generator(strict).render_tree(&tree)?)
}

#[cfg(feature = "napi")]
#[napi]
pub fn render_definition_native(definition_json: String, strict: Option<bool>) -> napi::Result<String> {
    let definition: ComponentDefinition =
        serde_json::from_str(&definition_json).map_err(BuilderError::from)?;
    Ok(napi_generator(strict).render_definition(&definition)?)
}
