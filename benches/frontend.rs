mod common;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use zoe::{lexer, parser};

fn bench_frontend(c: &mut Criterion) {
    for (label, path) in common::WORKLOADS {
        let source = common::load_source(path);

        c.bench_function(&format!("frontend_tokenize_{label}"), |b| {
            b.iter(|| {
                let (tokens, diagnostics) = lexer::tokenize(black_box(&source));
                assert!(diagnostics.is_empty());
                black_box(tokens);
            })
        });

        c.bench_function(&format!("frontend_parse_{label}"), |b| {
            let (tokens, _) = lexer::tokenize(&source);
            b.iter(|| {
                let (program, diagnostics) = parser::parse_tokens(black_box(tokens.clone()));
                assert!(diagnostics.is_empty());
                black_box(program);
            })
        });
    }
}

criterion_group!(benches, bench_frontend);
criterion_main!(benches);
