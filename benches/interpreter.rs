mod common;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use zoe::interpreter::Interpreter;
use zoe::{lexer, parser};

fn bench_interpreter(c: &mut Criterion) {
    for (label, path) in common::WORKLOADS {
        let source = common::load_source(path);
        let program = common::load_program(path);

        c.bench_function(&format!("interpreter_run_only_{label}"), |b| {
            b.iter(|| {
                let mut interpreter = Interpreter::new();
                interpreter.run(black_box(&program)).expect("run");
                black_box(interpreter.drain_output());
            })
        });

        c.bench_function(&format!("interpreter_full_pipeline_{label}"), |b| {
            b.iter(|| {
                let (tokens, diagnostics) = lexer::tokenize(black_box(&source));
                assert!(diagnostics.is_empty());
                let (parsed, diagnostics) = parser::parse_tokens(tokens);
                assert!(diagnostics.is_empty());
                let mut interpreter = Interpreter::new();
                interpreter.run(&parsed).expect("run");
                black_box(interpreter.drain_output());
            })
        });
    }
}

criterion_group!(benches, bench_interpreter);
criterion_main!(benches);
