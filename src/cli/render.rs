//! Expand templates with JSON parameters

use super::{json_to_value, value_to_json, CliError};
use crate::{ParamList, SqlTemplate};

/// Options for the render command
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// The template text
    pub template: String,
    /// JSON object with named parameter values
    pub params: Option<String>,
}

/// Result of a render operation
#[derive(Debug)]
pub struct RenderResult {
    /// The expanded, placeholder-bound SQL
    pub sql: String,
    /// Placeholder name to bound value, as a JSON object
    pub bindings: serde_json::Value,
}

/// Compile and render a template in one step.
pub fn execute_render(options: &RenderOptions) -> Result<RenderResult, CliError> {
    let template = compile(&options.template)?;
    let params = match &options.params {
        Some(json) => parse_params(json)?,
        None => ParamList::new(),
    };

    let (sql, bindings) = template.render(&params);

    let mut map = serde_json::Map::new();
    for (name, value) in bindings {
        map.insert(name, value_to_json(value));
    }
    Ok(RenderResult {
        sql,
        bindings: serde_json::Value::Object(map),
    })
}

/// Compile only; an invalid template surfaces its parse log.
pub fn execute_check(template: &str) -> Result<(), CliError> {
    compile(template).map(|_| ())
}

fn compile(text: &str) -> Result<SqlTemplate, CliError> {
    let template = SqlTemplate::new(text);
    if template.is_valid() {
        Ok(template)
    } else {
        Err(CliError::InvalidTemplate(
            template.parse_log().trim_end().to_string(),
        ))
    }
}

fn parse_params(json: &str) -> Result<ParamList, CliError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Object(map) = value else {
        return Err(CliError::ParamsNotObject);
    };
    let mut params = ParamList::new();
    for (name, value) in map {
        params.append(name, json_to_value(value));
    }
    Ok(params)
}
