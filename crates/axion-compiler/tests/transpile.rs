use axion_ast::OutputLang;
use axion_compiler::{Compiler, ProcessingMode, ProcessingOptions};
use axion_parser::parse;
use pretty_assertions::assert_eq;

const PROGRAM: &str = "\
fn fib(n: Int) => Int:
    if n < 2: return n
    return fib(n - 1) + fib(n - 2)

fn main {
    total = 0
    while total < 10 and not done {
        total = total + fib(5) ** 2
    }
    console.write(total, end = '')
}
";

fn process(mode: ProcessingMode, output: OutputLang) -> String {
    let compiler = Compiler::new(ProcessingOptions {
        mode,
        output,
        using_prelude: false,
        ..ProcessingOptions::default()
    });
    let unit = compiler.process_source(PROGRAM).expect("pipeline failed");
    assert!(unit.blames.is_empty(), "{:?}", unit.blames.as_slice());
    unit.output.expect("no output")
}

#[test]
fn test_program_to_csharp() {
    let expected = "\
public int fib(int n) {
    if (n < 2) {
        return n;
    }
    return fib(n - 1) + fib(n - 2);
}
public void main() {
    total = 0;
    while (total < 10 && !done) {
        total = total + Math.Pow(fib(5), 2);
    }
    console.write(total, end: \"\");
}
";
    assert_eq!(process(ProcessingMode::Transpile, OutputLang::CSharp), expected);
}

#[test]
fn test_program_reformat() {
    let expected = "\
fn fib(n: Int) => Int:
    if n < 2: return n
    return fib(n - 1) + fib(n - 2)
fn main {
    total = 0
    while total < 10 and not done {
        total = total + fib(5) ** 2
    }
    console.write(total, end = '')
}
";
    assert_eq!(process(ProcessingMode::Reformat, OutputLang::CSharp), expected);
    assert_eq!(
        process(ProcessingMode::Transpile, OutputLang::Axion),
        expected
    );
}

#[test]
fn test_rendering_is_deterministic() {
    let parsed = parse(PROGRAM).expect("parse defect");
    assert!(parsed.blames.is_empty(), "{:?}", parsed.blames.as_slice());

    let source = parsed.ast.to_source().unwrap();
    assert_eq!(parsed.ast.to_source().unwrap(), source);

    let target = parsed.ast.to_target(OutputLang::CSharp).unwrap();
    assert_eq!(parsed.ast.to_target(OutputLang::CSharp).unwrap(), target);

    // Rendering in one language leaves the tree as it was for the other.
    assert_eq!(parsed.ast.to_source().unwrap(), source);
    assert_eq!(
        process(ProcessingMode::Transpile, OutputLang::CSharp),
        target
    );
}
