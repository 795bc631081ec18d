//! # Template syntax tree
//!
//! Types shared between the scanner, the parser, and the evaluator:
//!
//! - **[fragments]** - Raw fragments produced by the template scanner
//! - **[functions]** - Output and condition functions (`value`, `exists`, ...)
//! - **[blocks]** - Control-flow block kinds (`if`, `foreach`, ...)
//! - **[nodes]** - The output-node tree the evaluator walks
//!
//! ## Template shape
//!
//! A template is plain SQL text with `<? ... ?>` directives mixed in:
//!
//! ```text
//! SELECT * FROM invoice
//!  WHERE cust_id = <? value("cust_id") ?>
//! <? if exists("status") ?>
//!    AND status = <? value("status") ?>
//! <? endif ?>
//! ```
//!
//! The scanner splits the text into fragments, the parser folds the
//! fragments into a balanced tree of [`nodes::Node`]s rooted at a generic
//! block, and the evaluator expands that tree against a parameter
//! environment.

pub mod blocks;
pub mod fragments;
pub mod functions;
pub mod nodes;

pub use blocks::BlockKind;
pub use fragments::Fragment;
pub use functions::{Function, FunctionKind};
pub use nodes::{Block, Node};
