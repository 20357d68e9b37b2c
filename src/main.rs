use std::fs;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use zoe::interpreter::{Interpreter, Value};
use zoe::{lexer, parser};

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => repl(),
        [path] => run_file(path),
        _ => bail!("usage: zoe [script]"),
    }
}

fn run_file(path: &str) -> Result<ExitCode> {
    let source = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let mut interpreter = Interpreter::new();
    Ok(run_source(&mut interpreter, &source, false))
}

fn repl() -> Result<ExitCode> {
    let mut interpreter = Interpreter::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush().context("flushing prompt")?;
        let mut line = String::new();
        let read = stdin.lock().read_line(&mut line).context("reading input")?;
        if read == 0 {
            // EOF ends the session.
            return Ok(ExitCode::SUCCESS);
        }
        if line.trim().is_empty() {
            continue;
        }
        run_source(&mut interpreter, &line, true);
    }
}

/// Runs one source unit through lex -> parse -> evaluate, printing buffered
/// output and `error:` diagnostics. Evaluation never starts while either
/// front-end diagnostic list is non-empty, but both phases always run so all
/// front-end diagnostics are reported together.
fn run_source(interpreter: &mut Interpreter, source: &str, echo_value: bool) -> ExitCode {
    let (tokens, lex_diagnostics) = lexer::tokenize(source);
    let (program, parse_diagnostics) = parser::parse_tokens(tokens);

    for diagnostic in &lex_diagnostics {
        eprintln!("error: {diagnostic}");
    }
    for diagnostic in &parse_diagnostics {
        eprintln!("error: {diagnostic}");
    }
    if !lex_diagnostics.is_empty() || !parse_diagnostics.is_empty() {
        return ExitCode::FAILURE;
    }

    let result = interpreter.run(&program);
    for line in interpreter.drain_output() {
        println!("{line}");
    }
    match result {
        Ok(value) => {
            if echo_value && value != Value::Null {
                println!("{}", value.to_output());
            }
            ExitCode::SUCCESS
        }
        Err(diagnostic) => {
            eprintln!("error: {diagnostic}");
            ExitCode::FAILURE
        }
    }
}
