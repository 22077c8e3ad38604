// ABOUTME: Jsonnet evaluator invoked once per request with its own state
// ABOUTME: Applies library search paths and external variable bindings before evaluation

use jrsonnet_evaluator::{EvaluationState, FileImportResolver};
use std::path::{Path, PathBuf};

use super::binder::Binding;
use super::error::{Result, TemplateError};

/// Evaluates a template file with a set of bindings.
///
/// Implementations must not let bindings from one call leak into another.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, path: &Path, bindings: &[Binding]) -> Result<String>;
}

#[derive(Debug, Clone, Default)]
pub struct JsonnetEvaluator {
    library_paths: Vec<PathBuf>,
}

impl JsonnetEvaluator {
    /// Later library paths take precedence when several contain the same import
    pub fn new(library_paths: Vec<PathBuf>) -> Self {
        Self { library_paths }
    }

    fn import_resolver(&self) -> FileImportResolver {
        FileImportResolver {
            library_paths: self.library_paths.iter().rev().cloned().collect(),
        }
    }
}

impl Evaluator for JsonnetEvaluator {
    fn evaluate(&self, path: &Path, bindings: &[Binding]) -> Result<String> {
        let state = EvaluationState::default();
        state.with_stdlib();
        state.set_import_resolver(Box::new(self.import_resolver()));

        for binding in bindings {
            match binding {
                Binding::ExtStr { name, value } => {
                    state.add_ext_str(name.as_str().into(), value.as_str().into());
                }
                Binding::ExtCode { name, code } => {
                    state
                        .add_ext_code(name.as_str().into(), code.as_str().into())
                        .map_err(|e| TemplateError::Evaluation(state.stringify_err(&e)))?;
                }
            }
        }

        let file = path.to_path_buf();
        let value = state
            .evaluate_file_raw(&file)
            .map_err(|e| TemplateError::Evaluation(state.stringify_err(&e)))?;
        let rendered = state
            .manifest(value)
            .map_err(|e| TemplateError::Evaluation(state.stringify_err(&e)))?;

        Ok(rendered.to_string())
    }
}
