//! Rendering parsed code back to Axion and reparsing it.

use axion_ast::dump::{dump, dump_shape};
use axion_lexer::{Lexer, TokenKind};
use axion_parser::parse;
use pretty_assertions::assert_eq;

/// Sources already in the layout the renderer produces.
const CANONICAL: &[&str] = &[
    "x = 1\nif x > 0: print(x)\nelse: print(-x)\n",
    "fn add(a: Int, b: Int = 2) => Int:\n    return a + b\n",
    "while n > 0 {\n    n = n - 1\n}\n",
    "fn f(a: Int, *, key: Str, **kw: Int): pass\n",
    "if a:\n    x\nelif b:\n    y\nelse:\n    z\n",
    "square = fn (x: Int) => Int: x * x\nprint(square(3), end = '')\n",
    "if a {\n    b\n} else {\n    c\n}\n",
    "x = - -a\ny = -(-1)\n",
    "fn main:\n    items = list.of(1, 2.5, \"three\", nil)\n    while not done(items): step()\n",
];

/// Sources the renderer normalizes.
const LOOSE: &[&str] = &[
    "if a { b; c }\n",
    "while x: y; z",
    "fn g (a:Int)=>Int:\n    return a\n",
    "if a: b\nelif c { d }\nelse:\n    e\n",
    "f(a=1,b=(2+3)*4)\n",
    "x = --a\n",
];

fn render(source: &str) -> String {
    let parsed = parse(source).expect("parse defect");
    assert!(
        parsed.blames.is_empty(),
        "Blames for {:?}: {:?}",
        source,
        parsed.blames.as_slice()
    );
    parsed.ast.to_source().expect("render failed")
}

/// Token kinds without layout or statement separators.
fn significant_tokens(source: &str) -> Vec<TokenKind> {
    let (tokens, errors) = Lexer::new(source).tokenize();
    assert!(errors.is_empty(), "Errors: {:?}", errors);
    tokens
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| !k.is_layout() && *k != TokenKind::Semi)
        .collect()
}

#[test]
fn test_canonical_sources_render_unchanged() {
    for source in CANONICAL {
        assert_eq!(render(source), *source);
    }
}

#[test]
fn test_rendering_reaches_a_fixed_point() {
    for source in CANONICAL.iter().chain(LOOSE) {
        let once = render(source);
        let twice = render(&once);
        assert_eq!(once, twice, "for {:?}", source);
    }
}

#[test]
fn test_reparse_gives_same_structure() {
    for source in CANONICAL.iter().chain(LOOSE) {
        let first = parse(source).unwrap();
        let rendered = first.ast.to_source().unwrap();
        let second = parse(&rendered).unwrap();
        assert_eq!(
            dump(&first.ast, first.ast.root().unwrap()),
            dump(&second.ast, second.ast.root().unwrap()),
            "for {:?}",
            source
        );
    }
}

#[test]
fn test_rendering_keeps_tokens() {
    for source in LOOSE {
        let rendered = render(source);
        assert_eq!(
            significant_tokens(source),
            significant_tokens(&rendered),
            "for {:?}",
            source
        );
    }
}

#[test]
fn test_same_tree_renders_identically() {
    for source in CANONICAL.iter().chain(LOOSE) {
        let parsed = parse(source).unwrap();
        let first = parsed.ast.to_source().unwrap();
        assert_eq!(parsed.ast.to_source().unwrap(), first, "for {:?}", source);
    }
}

#[test]
fn test_normalized_layout() {
    assert_eq!(render("if a { b; c }"), "if a {\n    b\n    c\n}\n");
    assert_eq!(render("x = --a"), "x = - -a\n");
    assert_eq!(render("f(a=1,b=(2+3)*4)"), "f(a = 1, b = (2 + 3) * 4)\n");
}

#[test]
fn test_block_forms_share_structure() {
    let forms = [
        "fn f(a: Int): a = 1; return a\n",
        "fn f(a: Int) {\n    a = 1\n    return a\n}\n",
        "fn f(a: Int):\n    a = 1\n    return a\n",
    ];
    let shapes: Vec<String> = forms
        .iter()
        .map(|src| {
            let parsed = parse(src).unwrap();
            assert!(parsed.blames.is_empty(), "{:?}", parsed.blames.as_slice());
            dump_shape(&parsed.ast, parsed.ast.root().unwrap())
        })
        .collect();
    assert_eq!(shapes[0], shapes[1]);
    assert_eq!(shapes[1], shapes[2]);
}
