//! Axion Compiler Library
//!
//! Drives one compilation unit through the front end: lexing, parsing and,
//! depending on the [`ProcessingMode`], rendering the tree to C# or back to
//! Axion. Syntax problems never abort the pipeline; they are collected as
//! blames on the returned [`ProcessedUnit`].

use axion_ast::{Ast, OutputLang, RenderError};
use axion_diagnostics::BlameList;
use axion_lexer::{Lexer, Token};
use axion_parser::{parse_tokens, ParseError, ParserConfig, DEFAULT_MAX_DEPTH};
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Namespaces imported at the top of every transpiled C# unit.
pub const CSHARP_USINGS: &[&str] = &[
    "System",
    "System.IO",
    "System.Linq",
    "System.Text",
    "System.Numerics",
    "System.Threading",
    "System.Diagnostics",
    "System.Collections",
    "System.Collections.Generic",
];

/// How far a unit is taken through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingMode {
    /// Stop after lexing.
    Lex,
    /// Stop after parsing.
    Parse,
    /// Render the tree in the output language.
    #[default]
    Transpile,
    /// Render the tree back into canonical Axion.
    Reformat,
}

/// Driver settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingOptions {
    pub mode: ProcessingMode,
    /// Target of [`ProcessingMode::Transpile`].
    pub output: OutputLang,
    pub max_nesting_depth: usize,
    /// Colour in terminal reports.
    pub color: bool,
    /// Prefix transpiled C# with [`CSHARP_USINGS`].
    pub using_prelude: bool,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            mode: ProcessingMode::default(),
            output: OutputLang::default(),
            max_nesting_depth: DEFAULT_MAX_DEPTH,
            color: true,
            using_prelude: true,
        }
    }
}

/// Errors that stop a unit from being processed
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("parser defect: {0}")]
    Parse(#[from] ParseError),

    #[error("cannot render: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Everything the pipeline produced for one unit.
#[derive(Debug, Clone)]
pub struct ProcessedUnit {
    pub tokens: Vec<Token>,
    /// Empty in [`ProcessingMode::Lex`].
    pub ast: Ast,
    pub blames: BlameList,
    /// Rendered code, for the rendering modes.
    pub output: Option<String>,
}

impl ProcessedUnit {
    pub fn has_errors(&self) -> bool {
        self.blames.has_errors()
    }
}

/// The front-end driver.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: ProcessingOptions,
}

impl Compiler {
    pub fn new(options: ProcessingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ProcessingOptions {
        &self.options
    }

    /// Runs `source` through the pipeline up to the configured mode.
    ///
    /// Rendering is skipped when parsing reported errors, since the tree may
    /// hold recovery placeholders.
    #[instrument(skip_all, fields(mode = ?self.options.mode, bytes = source.len()))]
    pub fn process_source(&self, source: &str) -> CompileResult<ProcessedUnit> {
        let (tokens, errors) = Lexer::new(source).tokenize();
        let mut blames = BlameList::new();
        blames.extend_from_lexer(&errors);
        debug!(tokens = tokens.len(), errors = errors.len(), "lexed unit");

        let mut unit = ProcessedUnit {
            tokens,
            ast: Ast::new(),
            blames,
            output: None,
        };
        if self.options.mode == ProcessingMode::Lex {
            return Ok(unit);
        }

        let config = ParserConfig {
            max_depth: self.options.max_nesting_depth,
        };
        unit.ast = parse_tokens(unit.tokens.clone(), &mut unit.blames, config)?;

        if !unit.has_errors() {
            unit.output = match self.options.mode {
                ProcessingMode::Lex | ProcessingMode::Parse => None,
                ProcessingMode::Transpile => Some(self.transpile(&unit.ast)?),
                ProcessingMode::Reformat => Some(unit.ast.to_source()?),
            };
        }

        info!(
            nodes = unit.ast.len(),
            blames = unit.blames.len(),
            errors = unit.has_errors(),
            "processed unit"
        );
        Ok(unit)
    }

    fn transpile(&self, ast: &Ast) -> CompileResult<String> {
        let body = ast.to_target(self.options.output)?;
        if self.options.output != OutputLang::CSharp || !self.options.using_prelude {
            return Ok(body);
        }

        let mut out = String::new();
        for namespace in CSHARP_USINGS {
            out.push_str("using ");
            out.push_str(namespace);
            out.push_str(";\n");
        }
        out.push('\n');
        out.push_str(&body);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axion_diagnostics::BlameKind;
    use pretty_assertions::assert_eq;

    fn compiler(mode: ProcessingMode) -> Compiler {
        Compiler::new(ProcessingOptions {
            mode,
            using_prelude: false,
            ..ProcessingOptions::default()
        })
    }

    #[test]
    fn test_default_options() {
        let options = ProcessingOptions::default();
        assert_eq!(options.mode, ProcessingMode::Transpile);
        assert_eq!(options.output, OutputLang::CSharp);
        assert_eq!(options.max_nesting_depth, 256);
    }

    #[test]
    fn test_lex_mode_stops_early() {
        let unit = compiler(ProcessingMode::Lex).process_source("a = 1").unwrap();
        assert!(!unit.tokens.is_empty());
        assert!(unit.ast.is_empty());
        assert!(unit.output.is_none());
    }

    #[test]
    fn test_parse_mode() {
        let unit = compiler(ProcessingMode::Parse).process_source("a = 1").unwrap();
        assert!(unit.ast.root().is_some());
        assert!(unit.output.is_none());
    }

    #[test]
    fn test_transpile() {
        let unit = compiler(ProcessingMode::Transpile)
            .process_source("fn add(a: Int, b: Int = 2) => Int:\n    return a + b\n")
            .unwrap();
        assert_eq!(
            unit.output.as_deref(),
            Some("public int add(int a, int b = 2) {\n    return a + b;\n}\n")
        );
    }

    #[test]
    fn test_transpile_keyword_only_defaults_last() {
        let unit = compiler(ProcessingMode::Transpile)
            .process_source("fn f(*, k: Int = 1, j: Int): pass")
            .unwrap();
        assert!(unit.blames.is_empty(), "{:?}", unit.blames.as_slice());
        assert_eq!(
            unit.output.as_deref(),
            Some("public void f(int j, int k = 1) {\n    ;\n}\n")
        );
    }

    #[test]
    fn test_using_prelude() {
        let unit = Compiler::default().process_source("x = 1").unwrap();
        let output = unit.output.unwrap();
        assert!(output.starts_with("using System;\nusing System.IO;\n"));
        assert!(output.ends_with("using System.Collections.Generic;\n\nx = 1;\n"));
    }

    #[test]
    fn test_reformat() {
        let unit = compiler(ProcessingMode::Reformat)
            .process_source("if a { b; c }")
            .unwrap();
        assert_eq!(unit.output.as_deref(), Some("if a {\n    b\n    c\n}\n"));
    }

    #[test]
    fn test_errors_skip_rendering() {
        let unit = compiler(ProcessingMode::Transpile)
            .process_source("fn f(x: Int, x: Int): pass")
            .unwrap();
        assert!(unit.has_errors());
        assert!(unit.output.is_none());
        assert_eq!(
            unit.blames.of_kind(BlameKind::DuplicatedParameter).count(),
            1
        );
    }

    #[test]
    fn test_warnings_still_render() {
        let unit = compiler(ProcessingMode::Reformat)
            .process_source("if true: { }")
            .unwrap();
        assert!(!unit.has_errors());
        assert_eq!(unit.blames.len(), 1);
        assert_eq!(unit.output.as_deref(), Some("if true {\n}\n"));
    }

    #[test]
    fn test_unsupported_construct() {
        let err = compiler(ProcessingMode::Transpile)
            .process_source("fn f(**kw: Int): pass")
            .unwrap_err();
        assert!(matches!(
            err,
            CompileError::Render(RenderError::Unsupported {
                what: "variadic map parameter",
                ..
            })
        ));
    }
}
