//! Parse/print helpers around oxc for JSX modules.

use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::error::{BuilderError, BuilderResult};

/// ES module with JSX enabled.
pub fn jsx_source_type() -> SourceType {
    SourceType::default().with_module(true).with_jsx(true)
}

/// Parses `source` into a program living in `allocator`. Any syntax error
/// fails the whole parse.
pub fn parse_module<'a>(allocator: &'a Allocator, source: &'a str) -> BuilderResult<Program<'a>> {
    let ret = Parser::new(allocator, source, jsx_source_type()).parse();
    if !ret.errors.is_empty() {
        let messages: Vec<String> = ret.errors.iter().map(|e| e.to_string()).collect();
        return Err(BuilderError::Parse(messages.join("; ")));
    }
    Ok(ret.program)
}

pub fn print_module(program: &Program<'_>) -> String {
    Codegen::new().build(program).code
}
