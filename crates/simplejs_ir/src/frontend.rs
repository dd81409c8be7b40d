use simplejs_syntax::Diagnostic;

use crate::Program;

#[derive(Clone, Debug)]
pub struct CompiledUnit {
    pub text: String,
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompiledUnit {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }
}

pub trait Frontend {
    fn compile_text(&self, path: &str, input: &str) -> Result<CompiledUnit, String>;
}
