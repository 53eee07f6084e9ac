//! Template compilation: `$path` references and `$include` directives.
//!
//! A string value starting with `$` is a reference. Its remainder, split on
//! `/`, is a path of keys looked up from the root of the document being
//! compiled, wherever the reference appears:
//!
//! ```json
//! { "theme": { "primary": "blue" }, "colors": { "primary": "$theme/primary" } }
//! ```
//!
//! An object holding an `$include` key (a path string without the sigil, or an
//! array of them) starts out as the merge of the included branches, later
//! entries overriding earlier ones; the object's own keys are then merged on
//! top, so they always win:
//!
//! ```json
//! { "base": { "x": 1 }, "child": { "$include": "base", "y": 2 } }
//! ```
//!
//! Paths are always looked up in the document as written, so a reference
//! cannot reach a key that only an include would contribute.
//!
//! Broken references do not stop compilation. Each one is recorded as a
//! [`Diagnostic`], the offending value is kept as written, and the walk goes on.
//! A reference nested more than [`MAX_REFERENCE_DEPTH`] references deep is
//! treated the same way.

mod error;

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::json::{self, kind_name, Json, JsonError, PathSegment};

pub use error::{CompileError, Diagnostic};

/// Object key holding include paths.
pub const INCLUDE_KEY: &str = "$include";

/// Leading character of a reference string.
pub const REFERENCE_SIGIL: char = '$';

/// How many references may be resolved inside one another before giving up.
pub const MAX_REFERENCE_DEPTH: usize = 256;

/// The result of [`Json::compile`]: the best-effort document plus everything
/// that could not be resolved.
#[derive(Debug, Clone)]
#[must_use = "a compilation may carry unresolved references"]
pub struct Compilation {
    document: Json,
    diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    pub fn document(&self) -> &Json {
        &self.document
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The aggregate error, present iff anything failed to resolve.
    pub fn error(&self) -> Option<CompileError> {
        (!self.is_clean()).then(|| CompileError::new(self.diagnostics.clone()))
    }

    /// Splits into the document and the aggregate outcome.
    ///
    /// The document is returned even when the outcome is an error.
    pub fn into_parts(self) -> (Json, Result<(), CompileError>) {
        let outcome = if self.diagnostics.is_empty() {
            Ok(())
        } else {
            Err(CompileError::new(self.diagnostics))
        };
        (self.document, outcome)
    }

    /// Returns the document only if everything resolved.
    pub fn into_result(self) -> Result<Json, CompileError> {
        match self.into_parts() {
            (document, Ok(())) => Ok(document),
            (_, Err(err)) => Err(err),
        }
    }
}

impl Json {
    /// Expands every reference and include in this document against itself.
    ///
    /// The input is left untouched. Compilation always produces a document;
    /// failures are collected in the returned [`Compilation`].
    ///
    /// ```
    /// use dynjson::Json;
    ///
    /// let js: Json = r#"{
    ///     "theme": {"primary": "blue"},
    ///     "colors": {"primary": "$theme/primary", "accent": "$theme/accent"}
    /// }"#.parse()?;
    ///
    /// let (out, outcome) = js.compile().into_parts();
    /// assert_eq!(out.get("colors").get("primary").as_str(), Some("blue"));
    /// assert_eq!(out.get("colors").get("accent").as_str(), Some("$theme/accent"));
    /// assert_eq!(outcome.unwrap_err().to_string(), "path not found: theme/accent");
    /// # Ok::<(), dynjson::JsonError>(())
    /// ```
    pub fn compile(&self) -> Compilation {
        Compiler::new(self.as_value()).run()
    }
}

/// Returns the path of a reference string, without its sigil.
fn reference(value: &str) -> Option<&str> {
    value.strip_prefix(REFERENCE_SIGIL)
}

/// State for one compilation pass.
///
/// Diagnostics live here rather than anywhere shared, so independent
/// compilations never see each other's failures.
struct Compiler<'a> {
    root: &'a Value,
    /// Paths being resolved, outermost first.
    stack: Vec<String>,
    active: HashSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Compiler<'a> {
    fn new(root: &'a Value) -> Self {
        Self {
            root,
            stack: Vec::new(),
            active: HashSet::new(),
            diagnostics: Vec::new(),
        }
    }

    fn run(mut self) -> Compilation {
        tracing::trace!("compiling document");
        let document = Json::from_value(self.compile(self.root));
        if !self.diagnostics.is_empty() {
            tracing::debug!(
                count = self.diagnostics.len(),
                "compilation left unresolved references"
            );
        }
        Compilation {
            document,
            diagnostics: self.diagnostics,
        }
    }

    fn compile(&mut self, node: &Value) -> Value {
        match node {
            Value::Object(map) if map.contains_key(INCLUDE_KEY) => self.compile_included(map),
            Value::Object(map) => Value::Object(self.compile_entries(map)),
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.compile(item)).collect())
            }
            Value::String(s) => match reference(s) {
                Some(path) => self.compile_path(path).unwrap_or_else(|| node.clone()),
                None => node.clone(),
            },
            other => other.clone(),
        }
    }

    /// Compiles every key except the include directive.
    fn compile_entries(&mut self, map: &Map<String, Value>) -> Map<String, Value> {
        map.iter()
            .filter(|(key, _)| key.as_str() != INCLUDE_KEY)
            .map(|(key, value)| (key.clone(), self.compile(value)))
            .collect()
    }

    fn compile_included(&mut self, map: &Map<String, Value>) -> Value {
        let mut merged = Value::Object(Map::new());

        for path in self.include_paths(&map[INCLUDE_KEY]) {
            let Some(branch) = self.compile_path(path) else {
                continue;
            };
            if let Err(JsonError::TypeMismatch { found, .. }) = json::merge(&mut merged, branch) {
                self.report(Diagnostic::IncludeNotObject {
                    path: path.to_string(),
                    found,
                });
            }
        }

        let local = self.compile_entries(map);
        if let Value::Object(base) = &mut merged {
            json::deep_merge(base, local);
        }
        merged
    }

    /// Normalizes an `$include` value to a list of paths.
    fn include_paths<'v>(&mut self, directive: &'v Value) -> Vec<&'v str> {
        match directive {
            Value::String(path) => vec![path.as_str()],
            Value::Array(items) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(path) => Some(path.as_str()),
                    other => {
                        self.report(Diagnostic::InvalidInclude(kind_name(other)));
                        None
                    }
                })
                .collect(),
            other => {
                self.report(Diagnostic::InvalidInclude(kind_name(other)));
                Vec::new()
            }
        }
    }

    /// Resolves `path` from the root and compiles the branch it names.
    ///
    /// Returns `None` after recording a diagnostic when the path is already
    /// being resolved further up, does not exist, or sits too deep in a chain
    /// of references.
    fn compile_path(&mut self, path: &str) -> Option<Value> {
        if self.active.contains(path) {
            self.report(Diagnostic::CircularReference {
                path: path.to_string(),
                chain: self.stack.clone(),
            });
            return None;
        }

        let segments: Vec<PathSegment> = json::path::split_reference(path);
        let Some(branch) = json::path::lookup(self.root, &segments) else {
            self.report(Diagnostic::PathNotFound(path.to_string()));
            return None;
        };

        if self.stack.len() >= MAX_REFERENCE_DEPTH {
            self.report(Diagnostic::TooDeep(path.to_string()));
            return None;
        }

        self.stack.push(path.to_string());
        self.active.insert(path.to_string());
        let compiled = self.compile(branch);
        self.active.remove(path);
        self.stack.pop();
        Some(compiled)
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(%diagnostic, "unresolved template reference");
        self.diagnostics.push(diagnostic);
    }
}
