#![no_main]

use std::sync::LazyLock;

use jay::frontend::language::Language;
use jay::frontend::module::MemoryLocator;
use jay::lang::Jay;
use jay::parser::{self, Input};
use jay::{Compiler, lexer};
use libfuzzer_sys::fuzz_target;

static JAY: LazyLock<Jay> = LazyLock::new(|| Jay::new().expect("reference language builds"));

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Fuzz the lexer
        if let Ok(tokens) = lexer::lex(s, JAY.token_rules()) {
            // If lexing succeeds, fuzz the parser, then the whole pipeline
            if parser::parse(JAY.grammar(), Input::Tokens(&tokens)).is_ok() {
                let locator = MemoryLocator::new().with_module("main", s);
                let _ = Compiler::new(&*JAY, &locator).compile();
            }
        }
    }
});
