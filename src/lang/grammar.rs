//! Grammar of the reference language.
//!
//! Every rule is registered under its [`NodeTag`] name. Pure choice rules (`declStatement`, `statement`,
//! `expression`, `basicExpression`, `parenthesis`) pass the chosen node through instead of wrapping it.
//! Binary operators are not rules: `expression` parses each operand once and, when an operator follows, builds an
//! `add`/`subtract`/`multiply`/`divide` node around it. Operators are right-associative.
//!
//! ```text
//! root         = NEWLINE? import* declStatement*
//! import       = IMPORT STRING NEWLINE
//! declStatement = (functionDecl | variableDecl) NEWLINE
//! statement    = (variableDecl | assignment | functionCall | block) NEWLINE     -- NEWLINE optional before '}'
//! variableDecl = VAR IDENTIFIER IDENTIFIER? ('=' expression)?
//! functionDecl = FUNC IDENTIFIER '(' params? ')' IDENTIFIER? block
//! params       = param (',' param)*
//! param        = IDENTIFIER IDENTIFIER
//! block        = '{' NEWLINE? statement* '}'
//! assignment   = IDENTIFIER '=' expression
//! functionCall = IDENTIFIER ('.' IDENTIFIER)? '(' callArgs? ')'
//! callArgs     = expression (',' expression)*
//! expression   = product (('+' | '-') expression)?      -- add | subtract
//! product      = term (('*' | '/') product)?            -- multiply | divide
//! term         = parenthesis | functionCall | basicExpression
//! parenthesis  = '(' expression ')'
//! ```

use jay_core::lang::tokens::{self, TokenId};
use jay_syntax::ast::{AstNode, AstValue};
use jay_syntax::grammar::Grammar;
use jay_syntax::parser::{Atom, ParseResult, Parsed, Parser};

use super::NodeTag;

const ROOT: &str = NodeTag::Root.name();
const IMPORT: &str = NodeTag::Import.name();
const DECL_STATEMENT: &str = NodeTag::DeclStatement.name();
const STATEMENT: &str = NodeTag::Statement.name();
const VARIABLE_DECL: &str = NodeTag::VariableDecl.name();
const FUNCTION_DECL: &str = NodeTag::FunctionDecl.name();
const PARAMS: &str = NodeTag::Params.name();
const PARAM: &str = NodeTag::Param.name();
const BLOCK: &str = NodeTag::Block.name();
const ASSIGNMENT: &str = NodeTag::Assignment.name();
const FUNCTION_CALL: &str = NodeTag::FunctionCall.name();
const CALL_ARGS: &str = NodeTag::CallArgs.name();
const EXPRESSION: &str = NodeTag::Expression.name();
const ADD: &str = NodeTag::Add.name();
const SUBTRACT: &str = NodeTag::Subtract.name();
const MULTIPLY: &str = NodeTag::Multiply.name();
const DIVIDE: &str = NodeTag::Divide.name();
const PARENTHESIS: &str = NodeTag::Parenthesis.name();
const BASIC_EXPRESSION: &str = NodeTag::BasicExpression.name();

/// Operands of a product.
const TERMS: &[Atom<'static>] = &[
    Atom::Rule(PARENTHESIS),
    Atom::Rule(FUNCTION_CALL),
    Atom::Rule(BASIC_EXPRESSION),
];

/// Build the reference grammar.
pub fn grammar() -> Grammar {
    Grammar::new(ROOT)
        .rule(ROOT, root)
        .rule(IMPORT, import)
        .rule(DECL_STATEMENT, decl_statement)
        .rule(STATEMENT, statement)
        .rule(VARIABLE_DECL, variable_decl)
        .rule(FUNCTION_DECL, function_decl)
        .rule(PARAMS, params)
        .rule(PARAM, param)
        .rule(BLOCK, block)
        .rule(ASSIGNMENT, assignment)
        .rule(FUNCTION_CALL, function_call)
        .rule(CALL_ARGS, call_args)
        .rule(EXPRESSION, expression)
        .rule(PARENTHESIS, parenthesis)
        .rule(BASIC_EXPRESSION, basic_expression)
}

fn tok(id: TokenId) -> Atom<'static> {
    Atom::Token(tokens::as_str(id))
}

fn expect(p: &mut Parser<'_>, id: TokenId) -> ParseResult<AstNode> {
    p.token(tokens::as_str(id))
}

fn root(p: &mut Parser<'_>) -> ParseResult<Parsed> {
    p.opt(&[tok(TokenId::Newline)])?;
    let mut items = p.any(&[Atom::Rule(IMPORT)])?;
    items.extend(p.any(&[Atom::Rule(DECL_STATEMENT)])?);
    Ok(AstValue::List(items).into())
}

fn import(p: &mut Parser<'_>) -> ParseResult<Parsed> {
    expect(p, TokenId::Import)?;
    let module = expect(p, TokenId::String)?;
    expect(p, TokenId::Newline)?;
    p.import_module(module.text().unwrap_or_default(), module.position)?;
    Ok(AstValue::composite([("module", Some(module))]).into())
}

fn decl_statement(p: &mut Parser<'_>) -> ParseResult<Parsed> {
    let declaration = Atom::Rule(FUNCTION_DECL);
    let variable = Atom::Rule(VARIABLE_DECL);
    let stmt = p.one(&[
        Atom::Named("declaration", &declaration),
        Atom::Named("declaration", &variable),
    ])?;
    expect(p, TokenId::Newline)?;
    Ok(stmt.into())
}

fn statement(p: &mut Parser<'_>) -> ParseResult<Parsed> {
    let stmt = p.one(&[
        Atom::Rule(VARIABLE_DECL),
        Atom::Rule(ASSIGNMENT),
        Atom::Rule(FUNCTION_CALL),
        Atom::Rule(BLOCK),
    ])?;
    if !p.at(tokens::as_str(TokenId::CurlEnd)) {
        expect(p, TokenId::Newline)?;
    }
    Ok(stmt.into())
}

fn variable_decl(p: &mut Parser<'_>) -> ParseResult<Parsed> {
    expect(p, TokenId::Var)?;
    let name = expect(p, TokenId::Identifier)?;
    let ty = p.opt(&[tok(TokenId::Identifier)])?;
    let initializer = |p: &mut Parser<'_>| -> ParseResult<AstNode> {
        expect(p, TokenId::Equals)?;
        p.rule(EXPRESSION)
    };
    let value = p.opt(&[Atom::Inline(&initializer)])?;
    Ok(AstValue::composite([("name", Some(name)), ("type", ty), ("value", value)]).into())
}

fn function_decl(p: &mut Parser<'_>) -> ParseResult<Parsed> {
    expect(p, TokenId::Func)?;
    let name = expect(p, TokenId::Identifier)?;
    expect(p, TokenId::ParenStart)?;
    let params = p.opt(&[Atom::Rule(PARAMS)])?;
    expect(p, TokenId::ParenEnd)?;
    let returns = p.opt(&[tok(TokenId::Identifier)])?;
    let body = p.rule(BLOCK)?;
    Ok(AstValue::composite([
        ("name", Some(name)),
        ("params", params),
        ("returns", returns),
        ("body", Some(body)),
    ])
    .into())
}

fn params(p: &mut Parser<'_>) -> ParseResult<Parsed> {
    let first = p.rule(PARAM)?;
    let param = Atom::Rule(PARAM);
    let next = |p: &mut Parser<'_>| -> ParseResult<AstNode> {
        expect(p, TokenId::Comma)?;
        p.one(&[Atom::Named("parameter", &param)])
    };
    let mut items = vec![first];
    items.extend(p.any(&[Atom::Inline(&next)])?);
    Ok(AstValue::List(items).into())
}

fn param(p: &mut Parser<'_>) -> ParseResult<Parsed> {
    let name = expect(p, TokenId::Identifier)?;
    let ty = expect(p, TokenId::Identifier)?;
    Ok(AstValue::composite([("name", Some(name)), ("type", Some(ty))]).into())
}

fn block(p: &mut Parser<'_>) -> ParseResult<Parsed> {
    expect(p, TokenId::CurlStart)?;
    p.opt(&[tok(TokenId::Newline)])?;
    let statements = p.any(&[Atom::Rule(STATEMENT)])?;
    expect(p, TokenId::CurlEnd)?;
    Ok(AstValue::List(statements).into())
}

fn assignment(p: &mut Parser<'_>) -> ParseResult<Parsed> {
    let name = expect(p, TokenId::Identifier)?;
    expect(p, TokenId::Equals)?;
    let value = p.rule(EXPRESSION)?;
    Ok(AstValue::composite([("name", Some(name)), ("value", Some(value))]).into())
}

fn function_call(p: &mut Parser<'_>) -> ParseResult<Parsed> {
    let first = expect(p, TokenId::Identifier)?;
    let member = |p: &mut Parser<'_>| -> ParseResult<AstNode> {
        expect(p, TokenId::Dot)?;
        expect(p, TokenId::Identifier)
    };
    let (module, name) = match p.opt(&[Atom::Inline(&member)])? {
        Some(name) => (Some(first), name),
        None => (None, first),
    };
    expect(p, TokenId::ParenStart)?;
    let args = p.opt(&[Atom::Rule(CALL_ARGS)])?;
    expect(p, TokenId::ParenEnd)?;
    Ok(AstValue::composite([("module", module), ("name", Some(name)), ("args", args)]).into())
}

fn call_args(p: &mut Parser<'_>) -> ParseResult<Parsed> {
    let first = p.rule(EXPRESSION)?;
    let next = |p: &mut Parser<'_>| -> ParseResult<AstNode> {
        expect(p, TokenId::Comma)?;
        p.rule(EXPRESSION)
    };
    let mut items = vec![first];
    items.extend(p.any(&[Atom::Inline(&next)])?);
    Ok(AstValue::List(items).into())
}

fn expression(p: &mut Parser<'_>) -> ParseResult<Parsed> {
    let start = p.offset();
    let lhs = product(p)?;
    let operator = p.opt(&[tok(TokenId::Add), tok(TokenId::Sub)])?;
    let Some(operator) = operator else {
        return Ok(lhs.into());
    };
    let rhs = p.rule(EXPRESSION)?;
    let kind = if operator.is(tokens::as_str(TokenId::Add)) { ADD } else { SUBTRACT };
    Ok(binary(start, kind, lhs, rhs).into())
}

/// `term (('*' | '/') product)?`, without a rule frame so the operand is parsed once.
fn product(p: &mut Parser<'_>) -> ParseResult<AstNode> {
    let start = p.offset();
    let lhs = p.one(TERMS)?;
    let Some(operator) = p.opt(&[tok(TokenId::Mul), tok(TokenId::Div)])? else {
        return Ok(lhs);
    };
    let rhs = product(p)?;
    let kind = if operator.is(tokens::as_str(TokenId::Mul)) { MULTIPLY } else { DIVIDE };
    Ok(binary(start, kind, lhs, rhs))
}

fn binary(start: usize, kind: &str, lhs: AstNode, rhs: AstNode) -> AstNode {
    AstNode::new(start, kind, AstValue::composite([("lhs", Some(lhs)), ("rhs", Some(rhs))]))
}

fn basic_expression(p: &mut Parser<'_>) -> ParseResult<Parsed> {
    let expr = p.one(&[
        tok(TokenId::Identifier),
        tok(TokenId::String),
        tok(TokenId::Integer),
        tok(TokenId::Float),
    ])?;
    Ok(expr.into())
}

fn parenthesis(p: &mut Parser<'_>) -> ParseResult<Parsed> {
    expect(p, TokenId::ParenStart)?;
    let inner = p.rule(EXPRESSION)?;
    expect(p, TokenId::ParenEnd)?;
    Ok(inner.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jay_syntax::diagnostics::CompileError;
    use jay_syntax::lexer;
    use jay_syntax::parser::{self, Input};

    fn parse_str(source: &str) -> Result<AstNode, CompileError> {
        let tokens = lexer::lex(source, &crate::lang::token_rules()?)?;
        parser::parse(&grammar(), Input::Tokens(&tokens)).map(|output| output.ast)
    }

    #[test]
    fn test_parse_declarations() {
        let ast = parse_str("var x = \"hi\"\nfunc f(a int, b string) float {\n  g(a)\n}\n").unwrap();
        assert_eq!(ast.kind, ROOT);
        let items = ast.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, VARIABLE_DECL);
        assert_eq!(items[0].field("value").map(|v| v.kind.as_str()), Some("STRING"));
        assert_eq!(items[1].kind, FUNCTION_DECL);
        assert_eq!(items[1].field("params").map(|p| p.items().len()), Some(2));
        assert_eq!(items[1].field("returns").and_then(AstNode::text), Some("float"));
    }

    #[test]
    fn test_single_line_block() {
        let ast = parse_str("func f() { g() }\nfunc g() {}\n").unwrap();
        let body = ast.items()[0].field("body").unwrap();
        assert_eq!(body.kind, BLOCK);
        assert_eq!(body.items()[0].kind, FUNCTION_CALL);
    }

    #[test]
    fn test_imports_come_first() {
        let tokens = lexer::lex("import \"util\"\nvar x\n", &crate::lang::token_rules().unwrap()).unwrap();
        let output = parser::parse(&grammar(), Input::Tokens(&tokens)).unwrap();
        assert_eq!(output.ast.items()[0].kind, IMPORT);
        assert_eq!(output.imports.len(), 1);
        assert_eq!(output.imports[0].module, "util");
        assert_eq!(output.imports[0].position, 7);
    }

    #[test]
    fn test_remote_call_splits_module_and_name() {
        let ast = parse_str("func f() {\n  util.print(1)\n}\n").unwrap();
        let call = &ast.items()[0].field("body").unwrap().items()[0];
        assert_eq!(call.field("module").and_then(AstNode::text), Some("util"));
        assert_eq!(call.field("name").and_then(AstNode::text), Some("print"));
    }

    #[test]
    fn test_expression_shapes() {
        let ast = parse_str("var x = 1 + 2 * (3 - y)\n").unwrap();
        let value = ast.items()[0].field("value").unwrap();
        assert_eq!(value.kind, ADD);
        let rhs = value.field("rhs").unwrap();
        assert_eq!(rhs.kind, MULTIPLY);
        assert_eq!(rhs.field("rhs").map(|n| n.kind.as_str()), Some(SUBTRACT));
    }

    #[test]
    fn test_operators_are_right_associative() {
        let ast = parse_str("var x = a - b / c * d\n").unwrap();
        let value = ast.items()[0].field("value").unwrap();
        assert_eq!(value.kind, SUBTRACT);
        assert_eq!(value.position, 8);
        assert_eq!(value.field("lhs").and_then(AstNode::text), Some("a"));
        let rhs = value.field("rhs").unwrap();
        assert_eq!(rhs.kind, DIVIDE);
        assert_eq!(rhs.position, 12);
        assert_eq!(rhs.field("rhs").map(|n| n.kind.as_str()), Some(MULTIPLY));
    }

    #[test]
    fn test_parenthesised_operand_keeps_outer_position() {
        let ast = parse_str("var x = (1) * 2\n").unwrap();
        let value = ast.items()[0].field("value").unwrap();
        assert_eq!(value.kind, MULTIPLY);
        assert_eq!(value.position, 8);
        assert_eq!(value.field("lhs").map(|n| n.position), Some(9));
    }

    #[test]
    fn test_deep_nesting_parses() {
        let depth = 64;
        let parens = format!("var x = {}1{}\n", "(".repeat(depth), ")".repeat(depth));
        let ast = parse_str(&parens).unwrap();
        assert_eq!(ast.items()[0].field("value").map(|n| n.kind.as_str()), Some("INTEGER"));

        let calls = format!("var y = {}1{}\n", "f(".repeat(depth), ")".repeat(depth));
        let ast = parse_str(&calls).unwrap();
        let mut call = ast.items()[0].field("value").unwrap();
        let mut levels = 0;
        while call.kind == FUNCTION_CALL {
            levels += 1;
            call = &call.field("args").unwrap().items()[0];
        }
        assert_eq!(levels, depth);
    }

    #[test]
    fn test_dangling_operator_is_an_error() {
        let err = parse_str("var x = 1 +\n").unwrap_err();
        assert_eq!(err.offset(), Some(11));
    }

    #[test]
    fn test_missing_newline_between_declarations() {
        let err = parse_str("var x var y\n").unwrap_err();
        assert_eq!(err, CompileError::parse("expected NEWLINE, but got VAR", 6));
    }

    #[test]
    fn test_bad_parameter_reports_label() {
        let err = parse_str("func f(a int, ) {}\n").unwrap_err();
        assert_eq!(err.offset(), Some(14));
    }
}
