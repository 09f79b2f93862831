//! Syntax-tree rewrites over parsed JSX modules.
//!
//! Each rewrite mutates an oxc `Program` in place. New names and literals are
//! copied into the program's arena so they live as long as the tree does.
//! None of the rewrites fail when nothing matches.

use lazy_static::lazy_static;
#[cfg(feature = "napi")]
use napi_derive::napi;
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ImportDeclaration, ImportDeclarationSpecifier, JSXClosingElement, JSXElementName,
    JSXOpeningElement, Program,
};
use oxc_ast::AstBuilder;
use oxc_ast_visit::VisitMut;
use oxc_span::{Atom, SPAN};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{BuilderError, BuilderResult};
use crate::syntax::parse_module;
#[cfg(feature = "napi")]
use crate::syntax::print_module;

lazy_static! {
    /// `<dir/>` `<stem>` `<.ext>` of an import source.
    static ref IMPORT_PATH_RE: Regex = Regex::new(r"^(?P<dir>.*/)?(?P<stem>[^/]*?)(?P<ext>\.[^./]*)?$").unwrap();
    static ref IDENTIFIER_RE: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();
}

/// Mutable view of a plain JSX tag name. Member and namespaced names are
/// never matched.
fn plain_tag_name<'b, 'a>(name: &'b mut JSXElementName<'a>) -> Option<&'b mut Atom<'a>> {
    match name {
        JSXElementName::Identifier(ident) => Some(&mut ident.name),
        JSXElementName::IdentifierReference(ident) => Some(&mut ident.name),
        _ => None,
    }
}

/// Replaces the file stem of an import source, keeping directory and extension.
fn replace_stem(source: &str, new_stem: &str) -> String {
    match IMPORT_PATH_RE.captures(source) {
        Some(caps) => {
            let dir = caps.name("dir").map(|m| m.as_str()).unwrap_or("");
            let ext = caps.name("ext").map(|m| m.as_str()).unwrap_or("");
            format!("{}{}{}", dir, new_stem, ext)
        }
        None => new_stem.to_string(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RENAME
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameReport {
    pub opening_tags: usize,
    pub closing_tags: usize,
    pub imports: usize,
}

impl RenameReport {
    pub fn total(&self) -> usize {
        self.opening_tags + self.closing_tags + self.imports
    }
}

pub struct ComponentRenamer<'a> {
    pub allocator: &'a Allocator,
    pub old_name: String,
    pub new_name: &'a str,
    pub report: RenameReport,
}

impl<'a> ComponentRenamer<'a> {
    pub fn new(allocator: &'a Allocator, old_name: &str, new_name: &str) -> Self {
        ComponentRenamer {
            allocator,
            old_name: old_name.to_string(),
            new_name: allocator.alloc_str(new_name),
            report: RenameReport::default(),
        }
    }

    fn rename_tag(&self, name: &mut JSXElementName<'a>) -> bool {
        match plain_tag_name(name) {
            Some(atom) if atom.as_str() == self.old_name => {
                *atom = Atom::from(self.new_name);
                true
            }
            _ => false,
        }
    }
}

impl<'a> VisitMut<'a> for ComponentRenamer<'a> {
    fn visit_jsx_opening_element(&mut self, elem: &mut JSXOpeningElement<'a>) {
        if self.rename_tag(&mut elem.name) {
            self.report.opening_tags += 1;
        }
        oxc_ast_visit::walk_mut::walk_jsx_opening_element(self, elem);
    }

    fn visit_jsx_closing_element(&mut self, elem: &mut JSXClosingElement<'a>) {
        if self.rename_tag(&mut elem.name) {
            self.report.closing_tags += 1;
        }
        oxc_ast_visit::walk_mut::walk_jsx_closing_element(self, elem);
    }

    // Any default import is rebound, whatever its local name.
    fn visit_import_declaration(&mut self, decl: &mut ImportDeclaration<'a>) {
        let Some(specifiers) = decl.specifiers.as_mut() else {
            return;
        };
        let Some(ImportDeclarationSpecifier::ImportDefaultSpecifier(_)) = specifiers.first() else {
            return;
        };

        specifiers.truncate(1);
        if let Some(ImportDeclarationSpecifier::ImportDefaultSpecifier(default)) =
            specifiers.first_mut()
        {
            default.local.name = Atom::from(self.new_name);
        }

        let new_source = replace_stem(decl.source.value.as_str(), self.new_name);
        decl.source.value = self.allocator.alloc_str(&new_source).into();
        decl.source.raw = None;
        self.report.imports += 1;
    }
}

/// Renames a component in JSX tags and rebinds default imports to it.
///
/// Every import whose first specifier is a default one is rewritten, not just
/// the one bound to `old_name`. In a module that also has
/// `import React from "react"`, that import becomes a second
/// `import <new_name> from "<new_name>"`, so the output holds two bindings of
/// the same name. Run it on modules whose only default import is the
/// component being renamed.
pub fn rename_component<'a>(
    allocator: &'a Allocator,
    program: &mut Program<'a>,
    old_name: &str,
    new_name: &str,
) -> RenameReport {
    let mut renamer = ComponentRenamer::new(allocator, old_name, new_name);
    renamer.visit_program(program);
    log::debug!(
        "renamed {} -> {}: {} opening, {} closing, {} imports",
        old_name,
        new_name,
        renamer.report.opening_tags,
        renamer.report.closing_tags,
        renamer.report.imports
    );
    renamer.report
}

// ═══════════════════════════════════════════════════════════════════════════════
// IMPORT INJECTION
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportSourceKind {
    Predefined,
    UserDefined,
}

impl ImportSourceKind {
    pub fn directory(&self) -> &'static str {
        match self {
            ImportSourceKind::Predefined => "./components",
            ImportSourceKind::UserDefined => "./user-comps",
        }
    }
}

impl FromStr for ImportSourceKind {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "predefined" => Ok(ImportSourceKind::Predefined),
            "userDefined" => Ok(ImportSourceKind::UserDefined),
            other => Err(BuilderError::Parse(format!(
                "unknown import source kind '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ImportSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportSourceKind::Predefined => write!(f, "predefined"),
            ImportSourceKind::UserDefined => write!(f, "userDefined"),
        }
    }
}

/// Prepends `import name from "<dir>/name"`. Repeated calls add repeated
/// declarations.
pub fn inject_import<'a>(
    allocator: &'a Allocator,
    program: &mut Program<'a>,
    name: &str,
    kind: ImportSourceKind,
) -> BuilderResult<()> {
    if !IDENTIFIER_RE.is_match(name) {
        return Err(BuilderError::Parse(format!(
            "'{}' is not a valid import binding",
            name
        )));
    }

    let snippet = format!("import {} from \"{}/{}\";", name, kind.directory(), name);
    let snippet: &'a str = allocator.alloc_str(&snippet);
    let mut statements = parse_module(allocator, snippet)?.body;

    match statements.pop() {
        Some(statement) => {
            program.body.insert(0, statement);
            log::debug!("injected import of {} from {}", name, kind.directory());
            Ok(())
        }
        None => Err(BuilderError::OperationFailed(format!(
            "import of {} produced no statement",
            name
        ))),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ATTRIBUTE INJECTION
// ═══════════════════════════════════════════════════════════════════════════════

pub struct AttributeInjector<'a> {
    pub ast: AstBuilder<'a>,
    pub component: String,
    pub attribute: &'a str,
    pub value: &'a str,
    pub touched: usize,
}

impl<'a> AttributeInjector<'a> {
    pub fn new(allocator: &'a Allocator, component: &str, attribute: &str, value: &str) -> Self {
        AttributeInjector {
            ast: AstBuilder::new(allocator),
            component: component.to_string(),
            attribute: allocator.alloc_str(attribute),
            value: allocator.alloc_str(value),
            touched: 0,
        }
    }
}

impl<'a> VisitMut<'a> for AttributeInjector<'a> {
    fn visit_jsx_opening_element(&mut self, elem: &mut JSXOpeningElement<'a>) {
        let matches = plain_tag_name(&mut elem.name)
            .map(|atom| atom.as_str() == self.component)
            .unwrap_or(false);
        if matches {
            let attribute = self.ast.jsx_attribute_item_attribute(
                SPAN,
                self.ast.jsx_attribute_name_identifier(SPAN, self.attribute),
                Some(self.ast.jsx_attribute_value_string_literal(SPAN, self.value, None)),
            );
            elem.attributes.push(attribute);
            self.touched += 1;
        }
        oxc_ast_visit::walk_mut::walk_jsx_opening_element(self, elem);
    }
}

/// Appends `attribute="value"` to every opening tag named `component`.
/// Existing attributes of the same name are kept. Returns the number of
/// elements touched.
pub fn inject_attribute<'a>(
    allocator: &'a Allocator,
    program: &mut Program<'a>,
    component: &str,
    attribute: &str,
    value: &str,
) -> usize {
    let mut injector = AttributeInjector::new(allocator, component, attribute, value);
    injector.visit_program(program);
    log::debug!(
        "injected {}=\"{}\" into {} <{}> elements",
        attribute,
        value,
        injector.touched,
        component
    );
    injector.touched
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
#[napi]
pub fn rename_component_native(
    source: String,
    old_name: String,
    new_name: String,
) -> napi::Result<String> {
    let allocator = Allocator::default();
    let mut program = parse_module(&allocator, &source)?;
    rename_component(&allocator, &mut program, &old_name, &new_name);
    Ok(print_module(&program))
}

#[cfg(feature = "napi")]
#[napi]
pub fn inject_import_native(source: String, name: String, kind: String) -> napi::Result<String> {
    let kind: ImportSourceKind = kind.parse()?;
    let allocator = Allocator::default();
    let mut program = parse_module(&allocator, &source)?;
    inject_import(&allocator, &mut program, &name, kind)?;
    Ok(print_module(&program))
}

#[cfg(feature = "napi")]
#[napi]
pub fn inject_attribute_native(
    source: String,
    component: String,
    attribute: String,
    value: String,
) -> napi::Result<String> {
    let allocator = Allocator::default();
    let mut program = parse_module(&allocator, &source)?;
    inject_attribute(&allocator, &mut program, &component, &attribute, &value);
    Ok(print_module(&program))
}
