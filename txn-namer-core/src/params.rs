// txn-namer-core/src/params.rs
//! Resolves declared request parameters into the transaction-name suffix.
//!
//! Declarations come from configuration as `{name, type}` pairs; the
//! appender resolves each against the request view at naming time, in
//! declaration order, and joins every non-empty value with `/`.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};

use crate::config::ParameterDecl;
use crate::request::RequestView;

/// Where an appended parameter's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Header,
    Cookie,
    Query,
}

impl ParamType {
    /// Parses the configured `type` string. `parameter` is accepted as a
    /// legacy spelling of `query`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "header" => Some(ParamType::Header),
            "cookie" => Some(ParamType::Cookie),
            "query" | "parameter" => Some(ParamType::Query),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Header => "header",
            ParamType::Cookie => "cookie",
            ParamType::Query => "query",
        }
    }
}

/// One validated parameter declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendedParameter {
    pub name: String,
    pub kind: ParamType,
}

/// Applies the declared parameter list to requests.
#[derive(Debug, Default)]
pub struct ParameterAppender {
    parameters: Vec<AppendedParameter>,
}

impl ParameterAppender {
    /// Builds the appender from raw configuration declarations, skipping
    /// (with a warning) entries that are missing a field or name an unknown
    /// type. Duplicate `(name, type)` pairs keep their first position.
    pub fn from_declarations(decls: &[ParameterDecl]) -> Self {
        let mut parameters: Vec<AppendedParameter> = Vec::new();
        for decl in decls {
            let (Some(name), Some(kind_raw)) = (&decl.name, &decl.kind) else {
                warn!("Append Parameters - incorrect syntax for parameter; use \"name:\" and \"type:\" for each entry");
                continue;
            };
            let Some(kind) = ParamType::parse(kind_raw) else {
                warn!("Append Parameters - parameter type '{kind_raw}' is not one of [cookie, header, query]");
                continue;
            };
            let parameter = AppendedParameter {
                name: name.clone(),
                kind,
            };
            if !parameters.contains(&parameter) {
                parameters.push(parameter);
            }
        }
        Self { parameters }
    }

    /// True when at least one declaration survived validation.
    pub fn is_enabled(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// The validated declarations, in evaluation order.
    pub fn parameters(&self) -> &[AppendedParameter] {
        &self.parameters
    }

    /// Resolves every declared parameter against `request` and joins the
    /// non-empty values with `/`. Returns an empty string when nothing
    /// resolves.
    pub fn append(&self, request: &dyn RequestView) -> String {
        let mut values: Vec<&str> = Vec::new();
        for parameter in &self.parameters {
            debug!(
                "Append Parameters - getting parameter type: {} name: {}",
                parameter.kind.as_str(),
                parameter.name
            );
            let value = match parameter.kind {
                ParamType::Header => request.header(&parameter.name),
                ParamType::Cookie => request
                    .cookies()
                    .iter()
                    // Last cookie with a case-insensitive name match wins.
                    .filter(|c| c.name.eq_ignore_ascii_case(&parameter.name))
                    .next_back()
                    .map(|c| c.value.as_str()),
                ParamType::Query => request.query_param(&parameter.name),
            };
            match value {
                Some(v) if !v.is_empty() => {
                    debug!("Append Parameters - appending parameter value to transaction name: {v}");
                    values.push(v);
                }
                _ => {}
            }
        }
        values.join("/")
    }
}
