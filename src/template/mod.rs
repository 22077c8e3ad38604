// ABOUTME: Template module for binding request parameters and evaluating Jsonnet
// ABOUTME: Provides the parameter model, binding rules and the evaluator seam

pub mod binder;
pub mod engine;
pub mod error;
pub mod params;

pub use binder::{bind, Binding, EnvVars, EXT_VAR_ENV_PREFIX};
pub use engine::{Evaluator, JsonnetEvaluator};
pub use error::{Result, TemplateError};
pub use params::{ParamValue, ParameterSet};
