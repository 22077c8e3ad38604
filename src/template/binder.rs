// ABOUTME: Binding rules turning request parameters into Jsonnet external variables
// ABOUTME: Also captures prefixed environment variables as a startup snapshot

use tracing::debug;

use super::error::{Result, TemplateError};
use super::params::{ParamValue, ParameterSet};

/// Environment variables named `JAAS_EXT_VAR_<NAME>` become external variable `<NAME>`
pub const EXT_VAR_ENV_PREFIX: &str = "JAAS_EXT_VAR_";

/// One external variable handed to the evaluator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Plain string, visible as `std.extVar(name)`
    ExtStr { name: String, value: String },
    /// Jsonnet source evaluated to produce the variable's value
    ExtCode { name: String, code: String },
}

impl Binding {
    pub fn name(&self) -> &str {
        match self {
            Binding::ExtStr { name, .. } | Binding::ExtCode { name, .. } => name,
        }
    }
}

/// Bind every parameter in request order.
///
/// Empty and single-valued parameters become string variables, multi-valued
/// parameters become code variables holding a JSON array of strings.
pub fn bind(params: &ParameterSet) -> Result<Vec<Binding>> {
    params
        .iter()
        .map(|(name, value)| bind_param(name, value))
        .collect()
}

fn bind_param(name: &str, value: &ParamValue) -> Result<Binding> {
    match value {
        ParamValue::Empty => Ok(Binding::ExtStr {
            name: name.to_string(),
            value: String::new(),
        }),
        ParamValue::Single(value) => Ok(Binding::ExtStr {
            name: name.to_string(),
            value: value.clone(),
        }),
        ParamValue::Multi(values) => {
            let code = serde_json::to_string(values).map_err(|e| TemplateError::Marshal {
                name: name.to_string(),
                values: values.clone(),
                source: e,
            })?;
            Ok(Binding::ExtCode {
                name: name.to_string(),
                code,
            })
        }
    }
}

/// Snapshot of prefixed environment variables, taken once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars {
    vars: Vec<(String, String)>,
}

impl EnvVars {
    /// Capture the current process environment
    pub fn capture() -> Self {
        Self::from_vars(std::env::vars_os().map(|(key, value)| {
            (
                key.to_string_lossy().into_owned(),
                value.to_string_lossy().into_owned(),
            )
        }))
    }

    /// Keep only prefixed variables, stripping the prefix from their names
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut vars: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(EXT_VAR_ENV_PREFIX)
                    .map(|name| (name.to_string(), value))
            })
            .collect();
        vars.sort();

        for (name, value) in &vars {
            debug!(key = %name, value = %value, "Captured external variable from environment");
        }

        Self { vars }
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// String bindings for every captured variable
    pub fn bindings(&self) -> Vec<Binding> {
        self.vars
            .iter()
            .map(|(name, value)| Binding::ExtStr {
                name: name.clone(),
                value: value.clone(),
            })
            .collect()
    }
}
