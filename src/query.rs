//! Dependency-graph queries
//!
//! Query expressions are built here and handed to the build tool verbatim as
//! a single argument, so no shell quoting is involved.

use std::fmt;

use crate::common::error::join_argv;
use crate::common::{output_lines, Error, Result};
use crate::exec::BuildTool;
use crate::label::Label;

/// Flag that keeps implicit and tool dependencies out of query results
pub const NO_IMPLICIT_DEPS: &str = "--noimplicit_deps";

/// A query expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    expression: String,
}

impl Query {
    /// Use a hand-written expression
    pub fn raw(expression: impl Into<String>) -> Result<Self> {
        let expression = expression.into();
        if expression.trim().is_empty() {
            return Err(Error::InvalidQuery("empty expression".to_string()));
        }
        Ok(Self { expression })
    }

    /// `kind("<pattern>", deps(<label>))`
    pub fn deps_of_kind(label: &Label, kind_pattern: &str) -> Result<Self> {
        if kind_pattern.is_empty() {
            return Err(Error::InvalidQuery("empty kind pattern".to_string()));
        }
        if kind_pattern.contains('"') {
            return Err(Error::InvalidQuery(format!(
                "kind pattern must not contain '\"': {}",
                kind_pattern
            )));
        }
        Ok(Self {
            expression: format!("kind(\"{}\", deps({}))", kind_pattern, label),
        })
    }

    /// The expression text passed to the tool
    pub fn as_str(&self) -> &str {
        &self.expression
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

/// Arguments to the query subcommand
pub fn query_args(query: &Query, include_implicit_deps: bool) -> Vec<String> {
    let mut args = vec![query.as_str().to_string()];
    if !include_implicit_deps {
        args.push(NO_IMPLICIT_DEPS.to_string());
    }
    args
}

/// Evaluate `query`, returning one entry per output line
pub fn run_query(tool: &BuildTool, query: &Query, include_implicit_deps: bool) -> Result<Vec<String>> {
    let args = query_args(query, include_implicit_deps);
    let output = tool.output("query", &args)?;

    if !output.status.success() {
        return Err(Error::QueryFailed {
            code: output.status.code().unwrap_or(-1),
            command: join_argv(&tool.argv("query", &args)),
        });
    }

    let results = output_lines(&output.stdout);
    tracing::debug!(query = %query, results = results.len(), "Query evaluated");
    Ok(results)
}
