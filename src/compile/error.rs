use thiserror::Error;

/// A single reference or include that could not be resolved during compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Diagnostic {
    #[error("circular reference: {path} in [{}]", .chain.join(", "))]
    CircularReference { path: String, chain: Vec<String> },

    #[error("path not found: {0}")]
    PathNotFound(String),

    #[error("reference chain too deep at {0}")]
    TooDeep(String),

    #[error("invalid $include entry: expected a path string, found {0}")]
    InvalidInclude(&'static str),

    #[error("included path {path} resolves to {found}, expected object")]
    IncludeNotObject { path: String, found: &'static str },
}

/// Every diagnostic recorded by one compilation, one per line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_lines(.diagnostics))]
pub struct CompileError {
    diagnostics: Vec<Diagnostic>,
}

impl CompileError {
    pub(crate) fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

fn join_lines(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
