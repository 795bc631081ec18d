//! The public face of the engine: compile a template once, render it any
//! number of times against different parameter environments.

use std::collections::BTreeMap;

use crate::ast::Block;
use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::value::{ParamList, Value};

/// Seam to an external prepared-statement binder.
///
/// The engine produces a SQL string with named placeholders (`_1_`, `_2_`,
/// ...) plus the values to bind to them; a driver-specific implementation
/// of this trait carries them the rest of the way.
pub trait StatementBinder {
    type Error;

    /// Hand the expanded SQL to the driver for preparation.
    fn prepare(&mut self, sql: &str) -> Result<(), Self::Error>;

    /// Bind one placeholder to its value.
    fn bind(&mut self, name: &str, value: &Value) -> Result<(), Self::Error>;

    /// Execute the prepared statement.
    fn execute(&mut self) -> Result<(), Self::Error>;
}

/// A compiled SQL template.
///
/// Compilation happens once, up front; the parsed tree is immutable
/// afterwards, so one template may be shared by concurrent renders. A
/// template that failed to compile stays usable as a handle: `is_valid()`
/// reports false, `parse_log()` explains why, and `render` yields empty
/// output with no bindings.
///
/// # Examples
///
/// ```
/// use sqlweave::{ParamList, SqlTemplate, Value};
///
/// let template = SqlTemplate::new("SELECT * FROM t WHERE id = <? value(\"id\") ?>");
/// assert!(template.is_valid());
///
/// let mut params = ParamList::new();
/// params.append("id", Value::Integer(7));
///
/// let (sql, bindings) = template.render(&params);
/// assert_eq!(sql, "SELECT * FROM t WHERE id = _1_");
/// assert_eq!(bindings.get("_1_"), Some(&Value::Integer(7)));
/// ```
#[derive(Debug, Clone)]
pub struct SqlTemplate {
    source: String,
    root: Option<Block>,
    log: String,
}

impl SqlTemplate {
    /// Compile `source`. Always returns a handle; check `is_valid()`.
    pub fn new(source: impl Into<String>) -> Self {
        let mut template = SqlTemplate {
            source: String::new(),
            root: None,
            log: String::new(),
        };
        template.set_source(source);
        template
    }

    /// Replace the template text and reparse in place, discarding the old
    /// tree and diagnostics. Returns the new validity.
    pub fn set_source(&mut self, source: impl Into<String>) -> bool {
        self.source = source.into();
        self.root = None;
        self.log.clear();
        match Parser::new(Lexer::new(&self.source)).parse() {
            Ok(root) => {
                self.root = Some(root);
                true
            }
            Err(error) => {
                self.log.push_str(&error.to_string());
                self.log.push('\n');
                false
            }
        }
    }

    /// The original template text.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_valid(&self) -> bool {
        self.root.is_some()
    }

    /// Newline-delimited diagnostics accumulated while compiling.
    pub fn parse_log(&self) -> &str {
        &self.log
    }

    /// Expand the template against `params`.
    ///
    /// Returns the placeholder-bound SQL (trimmed of surrounding
    /// whitespace) and the placeholder name to value table. An invalid
    /// template renders to an empty string with no bindings.
    pub fn render(&self, params: &ParamList) -> (String, BTreeMap<String, Value>) {
        let Some(root) = &self.root else {
            return (String::new(), BTreeMap::new());
        };
        let mut evaluator = Evaluator::new();
        let sql = evaluator.render(root, params);
        (sql, evaluator.into_bindings())
    }

    /// Render and hand the result to a prepared-statement binder,
    /// optionally executing. Returns `Ok(false)` without touching the
    /// binder when the template is invalid.
    pub fn apply<B: StatementBinder>(
        &self,
        params: &ParamList,
        binder: &mut B,
        execute: bool,
    ) -> Result<bool, B::Error> {
        if !self.is_valid() {
            return Ok(false);
        }
        let (sql, bindings) = self.render(params);
        binder.prepare(&sql)?;
        for (name, value) in &bindings {
            binder.bind(name, value)?;
        }
        if execute {
            binder.execute()?;
        }
        Ok(true)
    }
}
