use std::collections::BTreeMap;

use regex::Regex;

use crate::ast::{Block, BlockKind, Function, FunctionKind, Node};
use crate::value::{ParamList, Value};

/// Suffix of the derived entry the evaluator injects while iterating a list
/// parameter. Inside `foreach("tags")`, the entry `tags__FOREACH_POS__`
/// holds the current index, and `value("tags")` resolves the element at
/// that position.
pub const POSITION_SUFFIX: &str = "__FOREACH_POS__";

/// Loop-control signal returned by every node evaluation.
///
/// `Break(k)`/`Continue(k)` unwind `k` enclosing `foreach` blocks; each
/// loop boundary decrements the depth, and the outermost unwound loop
/// either terminates or advances to its next iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Normal,
    Break(u32),
    Continue(u32),
}

#[derive(Debug, Default)]
struct EvalInfo {
    counter: usize,
    bindings: BTreeMap<String, Value>,
}

/// Walks a parsed template tree against a parameter environment.
///
/// One evaluator serves one render pass: it owns the placeholder counter
/// and the accumulating bind table. The tree itself is never mutated, so a
/// compiled template can be shared across concurrent renders.
#[derive(Debug, Default)]
pub struct Evaluator {
    info: EvalInfo,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand `root` against `params`, returning the SQL text trimmed of
    /// surrounding whitespace. Bindings accumulate on the evaluator.
    pub fn render(&mut self, root: &Block, params: &ParamList) -> String {
        let mut out = String::new();
        self.eval_block(root, params, &mut out);
        out.trim().to_string()
    }

    /// The placeholder name to bound value table built so far.
    pub fn bindings(&self) -> &BTreeMap<String, Value> {
        &self.info.bindings
    }

    pub fn into_bindings(self) -> BTreeMap<String, Value> {
        self.info.bindings
    }

    fn eval_children(&mut self, children: &[Node], env: &ParamList, out: &mut String) -> Flow {
        for child in children {
            let flow = self.eval_node(child, env, out);
            if flow != Flow::Normal {
                return flow;
            }
        }
        Flow::Normal
    }

    fn eval_node(&mut self, node: &Node, env: &ParamList, out: &mut String) -> Flow {
        match node {
            Node::Text(text) => {
                out.push_str(text);
                Flow::Normal
            }
            // comments vanish from the output but keep token separation
            Node::Comment(_) => {
                out.push(' ');
                Flow::Normal
            }
            Node::Function(function) => self.eval_function(function, env, out),
            Node::Block(block) => self.eval_block(block, env, out),
        }
    }

    fn eval_block(&mut self, block: &Block, env: &ParamList, out: &mut String) -> Flow {
        match &block.kind {
            BlockKind::Generic | BlockKind::Else => self.eval_children(&block.children, env, out),
            BlockKind::If { negated, test } | BlockKind::ElseIf { negated, test } => {
                let mut condition_flow = Flow::Normal;
                let mut truth = self.resolve(test, env, &mut condition_flow).as_bool();
                if *negated {
                    truth = !truth;
                }
                let branch_flow = if truth {
                    self.eval_children(&block.children, env, out)
                } else if let Some(alt) = &block.alt {
                    self.eval_block(alt, env, out)
                } else {
                    Flow::Normal
                };
                if branch_flow != Flow::Normal {
                    branch_flow
                } else {
                    condition_flow
                }
            }
            BlockKind::ForEach { var } => self.eval_foreach(var, &block.children, env, out),
        }
    }

    fn eval_foreach(
        &mut self,
        var: &str,
        children: &[Node],
        env: &ParamList,
        out: &mut String,
    ) -> Flow {
        let items = match env.value(var) {
            Some(Value::List(items)) => items,
            _ => return Flow::Normal,
        };
        let position = format!("{}{}", var, POSITION_SUFFIX);
        for index in 0..items.len() {
            // per-iteration environment: the position entry shadows any
            // previous one for the same variable
            let mut scope = ParamList::new();
            scope.append(position.clone(), Value::Integer(index as i64));
            for (name, value) in env.iter() {
                if name != position {
                    scope.append(name, value.clone());
                }
            }

            match self.eval_children(children, &scope, out) {
                Flow::Normal => {}
                Flow::Break(depth) => {
                    if depth > 1 {
                        return Flow::Break(depth - 1);
                    }
                    return Flow::Normal;
                }
                Flow::Continue(depth) => {
                    if depth > 1 {
                        return Flow::Continue(depth - 1);
                    }
                }
            }
        }
        Flow::Normal
    }

    fn eval_function(&mut self, function: &Function, env: &ParamList, out: &mut String) -> Flow {
        match function.kind {
            FunctionKind::Continue => Flow::Continue(function.depth),
            FunctionKind::Break => Flow::Break(function.depth),
            FunctionKind::Literal => {
                let mut flow = Flow::Normal;
                let value = self.resolve(function, env, &mut flow);
                out.push_str(&value.as_string());
                flow
            }
            _ => {
                let mut flow = Flow::Normal;
                let value = self.resolve(function, env, &mut flow);
                self.info.counter += 1;
                let name = format!("_{}_", self.info.counter);
                out.push_str(&name);
                out.push(' ');
                self.info.bindings.insert(name, value);
                flow
            }
        }
    }

    /// Evaluate a function to its value without emitting output. Used both
    /// for `if`/`elseif` conditions and as the resolution step of output
    /// functions; `continue`/`break` in condition position report through
    /// `flow`.
    fn resolve(&self, function: &Function, env: &ParamList, flow: &mut Flow) -> Value {
        let arg = first_arg(function);
        match function.kind {
            FunctionKind::Value | FunctionKind::Literal => resolve_parameter(arg, env),
            FunctionKind::Exists => Value::Boolean(env.contains(arg)),
            FunctionKind::ReExists => Value::Boolean(name_matches(arg, env)),
            FunctionKind::IsFirst => Value::Boolean(loop_edge(arg, env, false)),
            FunctionKind::IsLast => Value::Boolean(loop_edge(arg, env, true)),
            FunctionKind::Continue => {
                *flow = Flow::Continue(function.depth);
                Value::Null
            }
            FunctionKind::Break => {
                *flow = Flow::Break(function.depth);
                Value::Null
            }
        }
    }
}

fn first_arg(function: &Function) -> &str {
    function.args.first().map(String::as_str).unwrap_or("")
}

/// Resolve a parameter for `value`/`literal`. A list resolves through its
/// loop-position entry when one is in scope, falling back to the first
/// element; a missing parameter or out-of-range position resolves to null.
fn resolve_parameter(name: &str, env: &ParamList) -> Value {
    let Some(value) = env.value(name) else {
        return Value::Null;
    };
    let Some(items) = value.as_list() else {
        return value.clone();
    };
    let position = format!("{}{}", name, POSITION_SUFFIX);
    let index = match env.value(&position) {
        Some(pos) => pos.as_int(),
        None => 0,
    };
    if index < 0 {
        return Value::Null;
    }
    items.get(index as usize).cloned().unwrap_or(Value::Null)
}

/// True when any parameter name matches the pattern; a malformed pattern
/// matches nothing.
fn name_matches(pattern: &str, env: &ParamList) -> bool {
    match Regex::new(pattern) {
        Ok(re) => env.iter().any(|(name, _)| re.is_match(name)),
        Err(_) => false,
    }
}

/// `isfirst`/`islast`: absent parameters test false, scalars test true,
/// and non-empty lists compare the current loop position against the
/// relevant end.
fn loop_edge(name: &str, env: &ParamList, last: bool) -> bool {
    let Some(value) = env.value(name) else {
        return false;
    };
    let Some(items) = value.as_list() else {
        return true;
    };
    if items.is_empty() {
        return false;
    }
    let position = format!("{}{}", name, POSITION_SUFFIX);
    let pos = env.value(&position).map(Value::as_int).unwrap_or(0);
    if last {
        pos + 1 == items.len() as i64
    } else {
        pos == 0
    }
}
