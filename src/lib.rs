//! # Screen Builder Native Core
//!
//! Native half of a visual UI builder. A front end edits a tree of UI nodes;
//! this crate keeps that tree, regenerates a JSX module from it after every
//! edit, and rewrites existing JSX sources at the syntax-tree level.
//!
//! ## Pieces
//!
//! 1. **Registry** (`registry`): built-in component definitions, custom
//!    registrations and the fixed tag classification rules.
//! 2. **Tree** (`node`): nodes addressed by opaque string ids under a single
//!    `"root"` fragment, in the JSON interchange shape the front end speaks.
//! 3. **Builder** (`builder`): add/remove/update/move/register. Every mutation
//!    re-renders the whole tree and hands the text to an `OutputSink`.
//! 4. **Generator** (`codegen`): tree → `GeneratedApp.jsx`, definition →
//!    one module per custom component. Lenient by default; strict mode turns
//!    malformed nodes into errors.
//! 5. **Transforms** (`transform`): rename a component, inject an import,
//!    inject an attribute, all over an oxc `Program`.
//!
//! The library logs through the `log` facade and never installs a logger.

#[cfg(feature = "napi")]
use napi_derive::napi;

pub mod builder;
pub mod codegen;
pub mod config;
pub mod error;
pub mod node;
pub mod registry;
pub mod sink;
pub mod syntax;
pub mod transform;
pub mod visitor;

#[cfg(test)]
mod codegen_tests;

pub use builder::{position_from_index, BuilderService};
pub use codegen::{GeneratorOptions, MarkupGenerator, RenderMode};
pub use config::BuilderConfig;
pub use error::{BuilderError, BuilderResult};
pub use node::{ComponentDefinition, Node, NodeKind, NodeUpdate, Prop, PropType, PropValue, Tree};
pub use registry::ComponentRegistry;
pub use sink::{FsSink, MemorySink, OutputSink};
pub use syntax::{parse_module, print_module};
pub use transform::{
    inject_attribute, inject_import, rename_component, ImportSourceKind, RenameReport,
};

#[cfg(feature = "napi")]
pub use codegen::{render_definition_native, render_tree_native};
#[cfg(feature = "napi")]
pub use transform::{inject_attribute_native, inject_import_native, rename_component_native};

#[cfg(feature = "napi")]
#[napi]
pub fn builder_bridge() -> String {
    "Screen Builder Native Bridge Connected".to_string()
}
