use std::fs;
use std::time::Instant;

use simplejs_ir::{CompiledUnit, Frontend, Program};
use simplejs_lexer::{Lexer, normalize_source};
use simplejs_parser::Parser;
use simplejs_syntax::{Diagnostic, SourceFile, Token};

/// Stateless front end; one instance can compile any number of sources.
#[derive(Clone, Copy, Debug, Default)]
pub struct Driver;

impl Frontend for Driver {
    fn compile_text(&self, path: &str, input: &str) -> Result<CompiledUnit, String> {
        let parsed = self.parse_text(path, input)?;
        Ok(CompiledUnit {
            text: parsed.source.text.as_str().to_string(),
            program: parsed.program,
            diagnostics: parsed.diagnostics,
        })
    }
}

impl Driver {
    pub fn new() -> Self {
        Self
    }

    pub fn lex_file(&self, path: &str) -> Result<LexedFile, String> {
        let input = read_source(path)?;
        self.lex_text(path, &input)
    }

    pub fn lex_text(&self, path: &str, input: &str) -> Result<LexedFile, String> {
        let normalized = normalize_source(input);
        let source = SourceFile::new(path, normalized.text);
        let lex = Lexer::new(source.text.as_str()).lex();

        let mut diagnostics = normalized.diagnostics;
        diagnostics.extend(lex.diagnostics);
        Ok(LexedFile {
            path: path.to_string(),
            source,
            tokens: lex.tokens,
            diagnostics,
        })
    }

    pub fn parse_file(&self, path: &str) -> Result<ParsedFile, String> {
        let input = read_source(path)?;
        self.parse_text(path, &input)
    }

    pub fn compile_file(&self, path: &str) -> Result<CompiledUnit, String> {
        let input = read_source(path)?;
        self.compile_text(path, &input)
    }

    pub fn parse_text(&self, path: &str, input: &str) -> Result<ParsedFile, String> {
        self.parse_text_timed(path, input).map(|(parsed, _)| parsed)
    }

    pub fn parse_text_timed(&self, path: &str, input: &str) -> Result<(ParsedFile, Timings), String> {
        let t1 = Instant::now();
        let normalized = normalize_source(input);
        let t2 = Instant::now();
        let source = SourceFile::new(path, normalized.text);
        let lex = Lexer::new(source.text.as_str()).lex();
        let t3 = Instant::now();
        let parse = Parser::new(source.text.as_str(), &lex.tokens).parse();
        let t4 = Instant::now();

        let mut diagnostics = normalized.diagnostics;
        diagnostics.extend(lex.diagnostics);
        diagnostics.extend(parse.diagnostics);

        let timings = Timings {
            normalize_us: (t2 - t1).as_micros(),
            lex_us: (t3 - t2).as_micros(),
            parse_us: (t4 - t3).as_micros(),
        };
        tracing::trace!(
            path,
            tokens = lex.tokens.len(),
            diagnostics = diagnostics.len(),
            lex_us = timings.lex_us as u64,
            parse_us = timings.parse_us as u64,
            "parsed source"
        );

        Ok((
            ParsedFile {
                path: path.to_string(),
                source,
                tokens: lex.tokens,
                program: parse.program,
                diagnostics,
            },
            timings,
        ))
    }
}

fn read_source(path: &str) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read file {path}: {e}"))
}

pub struct LexedFile {
    pub path: String,
    pub source: SourceFile,
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ParsedFile {
    pub path: String,
    pub source: SourceFile,
    pub tokens: Vec<Token>,
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedFile {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Timings {
    pub normalize_us: u128,
    pub lex_us: u128,
    pub parse_us: u128,
}
