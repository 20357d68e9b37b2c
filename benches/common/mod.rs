#![allow(dead_code)]
use std::fs;

use zoe::ast::Program;
use zoe::{lexer, parser};

pub const WORKLOADS: [(&str, &str); 2] = [
    ("fib", "tests/programs/bench_fib/program.zoe"),
    ("closures", "tests/programs/closure_counter/program.zoe"),
];

pub fn load_source(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|err| panic!("read {path}: {err}"))
}

pub fn load_program(path: &str) -> Program {
    let source = load_source(path);
    let (tokens, lex_diagnostics) = lexer::tokenize(&source);
    assert!(
        lex_diagnostics.is_empty(),
        "lex diagnostics for {path}: {lex_diagnostics:?}"
    );
    let (program, parse_diagnostics) = parser::parse_tokens(tokens);
    assert!(
        parse_diagnostics.is_empty(),
        "parse diagnostics for {path}: {parse_diagnostics:?}"
    );
    program
}
