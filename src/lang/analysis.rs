//! Analysis hook of the reference language.
//!
//! Walks a parsed module and drives an [`Analyzer`]. Dispatch is a `match` over [`NodeTag`]; token leaves have no
//! tag and are classified through the token registry.
//!
//! ## Notes
//! - A function gets exactly one scope: its parameters and the statements of its body share it.
//! - A nested `{ ... }` statement gets its own block scope.
//! - Declarations are positioned at their name.

use jay_core::lang::tokens::{self, TokenId};
use jay_core::lang::types::{self, PrimitiveType};
use jay_syntax::ast::AstNode;
use jay_syntax::diagnostics::CompileError;

use super::NodeTag;
use crate::frontend::analyzer::Analyzer;
use crate::frontend::symbols::ScopeKind;

/// Analyze the top-level items of one module.
#[tracing::instrument(skip_all, fields(module = analyzer.module()))]
pub fn analyze_module(analyzer: &mut Analyzer<'_>, ast: &AstNode) -> Result<(), CompileError> {
    for item in ast.items() {
        analyze_node(analyzer, item)?;
    }
    Ok(())
}

fn analyze_node(a: &mut Analyzer<'_>, node: &AstNode) -> Result<(), CompileError> {
    match NodeTag::from_name(&node.kind) {
        Some(NodeTag::VariableDecl) => variable_decl(a, node),
        Some(NodeTag::FunctionDecl) => function_decl(a, node),
        Some(NodeTag::Assignment) => assignment(a, node),
        Some(NodeTag::FunctionCall) => function_call(a, node),
        Some(NodeTag::Block) => a.in_scope("block", ScopeKind::Block, |a| {
            node.items().iter().try_for_each(|stmt| analyze_node(a, stmt))
        }),
        // Imports were handled by the parser; expressions are only reachable through `infer`.
        _ => Ok(()),
    }
}

fn variable_decl(a: &mut Analyzer<'_>, node: &AstNode) -> Result<(), CompileError> {
    let name = field(node, "name")?;
    let ty = node.field("type").map(|t| declared_type(a, t)).transpose()?;
    a.register_variable(text(name), name.position, ty)?;
    if let Some(value) = node.field("value") {
        let value_type = infer(a, value)?;
        a.assign(text(name), value_type, value.position)?;
    }
    Ok(())
}

fn function_decl(a: &mut Analyzer<'_>, node: &AstNode) -> Result<(), CompileError> {
    let name = field(node, "name")?;
    let body = field(node, "body")?;

    let mut params: Vec<(&AstNode, PrimitiveType)> = Vec::new();
    for param in node.field("params").map(AstNode::items).unwrap_or_default() {
        let param_name = field(param, "name")?;
        let ty = declared_type(a, field(param, "type")?)?;
        params.push((param_name, ty));
    }
    let return_type = node.field("returns").map(|t| declared_type(a, t)).transpose()?;
    a.register_function(
        text(name),
        name.position,
        params.iter().map(|(_, ty)| *ty).collect(),
        return_type,
    )?;

    a.in_scope(text(name), ScopeKind::Function, |a| {
        for (param_name, ty) in &params {
            a.register_variable(text(param_name), param_name.position, Some(*ty))?;
        }
        body.items().iter().try_for_each(|stmt| analyze_node(a, stmt))
    })
}

fn assignment(a: &mut Analyzer<'_>, node: &AstNode) -> Result<(), CompileError> {
    let name = field(node, "name")?;
    let value = field(node, "value")?;
    a.expect_local(text(name), name.position);
    let value_type = infer(a, value)?;
    a.assign(text(name), value_type, value.position)
}

fn function_call(a: &mut Analyzer<'_>, node: &AstNode) -> Result<(), CompileError> {
    let name = field(node, "name")?;
    match node.field("module") {
        Some(module) => a.expect_remote(text(module), text(name), name.position),
        None => a.expect_local(text(name), name.position),
    }
    if let Some(args) = node.field("args") {
        for arg in args.items() {
            infer(a, arg)?;
        }
    }
    Ok(())
}

/// Type of an expression, recording every name it references. `None` when unknown.
fn infer(a: &mut Analyzer<'_>, expr: &AstNode) -> Result<Option<PrimitiveType>, CompileError> {
    match NodeTag::from_name(&expr.kind) {
        Some(NodeTag::Add | NodeTag::Subtract | NodeTag::Multiply | NodeTag::Divide) => {
            let lhs = infer(a, field(expr, "lhs")?)?;
            let rhs = infer(a, field(expr, "rhs")?)?;
            Ok(match (lhs, rhs) {
                (Some(l), Some(r)) if l == r => Some(l),
                _ => None,
            })
        }
        Some(NodeTag::FunctionCall) => {
            function_call(a, expr)?;
            Ok(None)
        }
        Some(_) => Ok(None),
        None => match tokens::from_str(&expr.kind) {
            Some(TokenId::Identifier) => {
                let name = text(expr);
                a.expect_local(name, expr.position);
                Ok(a.variable_type(name))
            }
            Some(literal) => Ok(types::from_literal(literal)),
            None => Ok(None),
        },
    }
}

fn declared_type(a: &Analyzer<'_>, node: &AstNode) -> Result<PrimitiveType, CompileError> {
    a.resolve_type(text(node), node.position)
}

fn field<'n>(node: &'n AstNode, name: &str) -> Result<&'n AstNode, CompileError> {
    node.field(name)
        .ok_or_else(|| CompileError::grammar(format!("'{}' node has no '{name}'", node.kind)))
}

fn text(node: &AstNode) -> &str {
    node.text().unwrap_or_default()
}
