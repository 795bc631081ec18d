use crate::ast::functions::numeric_prefix;
use crate::ast::{Block, BlockKind, Fragment, Function, FunctionKind, Node};
use crate::lexer::Lexer;

/// Errors that make a template structurally invalid
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// `endif`/`endforeach` without a matching open block
    MismatchedEnd(String),
    /// `elseif` or `else` after the chain was already closed by `else`
    AlternateAfterElse(String),
    /// `elseif` or `else` with no enclosing `if`/`elseif`
    AlternateOutsideIf(String),
    /// Directive command that is neither a block keyword nor a function
    UnknownFunction(String),
    /// Function invoked without its required argument
    MissingArgument(String),
    /// `foreach` whose argument contains no quoted variable name
    EmptyLoopVariable,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MismatchedEnd(cmd) => {
                write!(f, "Encountered an unexpected {}.", cmd)
            }
            ParseError::AlternateAfterElse(cmd) => {
                write!(f, "Encountered unexpected {} statement within else block.", cmd)
            }
            ParseError::AlternateOutsideIf(cmd) => {
                write!(
                    f,
                    "Encountered unexpected {} statement outside of if/elseif block.",
                    cmd
                )
            }
            ParseError::UnknownFunction(name) => {
                write!(f, "Unable to identify function '{}'.", name)
            }
            ParseError::MissingArgument(func) => {
                write!(f, "Function {} requires at least one argument.", func)
            }
            ParseError::EmptyLoopVariable => {
                write!(f, "foreach requires a quoted loop variable.")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Split a trimmed directive body into its lower-cased command word and the
/// raw argument region that follows.
///
/// The command is the leading run of `[A-Za-z0-9_]`; everything after it
/// (possibly empty) is returned untouched.
pub fn split_command(body: &str) -> (String, &str) {
    let end = body
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(body.len());
    (body[..end].to_ascii_lowercase(), &body[end..])
}

/// Parse a directive argument region into a list of raw argument strings.
///
/// An optional outer `( ... )` bounds the region; whitespace outside
/// strings is discarded; `'` or `"` open a string in which backslash
/// escapes the next character; commas outside strings separate arguments.
/// A comma always terminates the pending argument, even an empty one; a
/// trailing argument is kept only when non-empty.
pub fn split_arguments(options: &str) -> Vec<String> {
    let mut args = Vec::new();
    if options.is_empty() {
        return args;
    }
    let enclosed = options.starts_with('(');
    let mut iter = options.chars();
    if enclosed {
        iter.next();
    }
    let mut in_string = false;
    let mut string_starter = '"';
    let mut wip = String::new();
    while let Some(c) = iter.next() {
        if in_string {
            if c == '\\' {
                if let Some(escaped) = iter.next() {
                    wip.push(escaped);
                }
            } else if c == string_starter {
                in_string = false;
            } else {
                wip.push(c);
            }
        } else if c == ',' {
            args.push(std::mem::take(&mut wip));
        } else if c.is_whitespace() {
            // whitespace between arguments disappears
        } else if c == '\'' || c == '"' {
            in_string = true;
            string_starter = c;
        } else if enclosed && c == ')' {
            break;
        } else {
            wip.push(c);
        }
    }
    if !wip.is_empty() {
        args.push(wip);
    }
    args
}

/// Extract the loop variable from a `foreach` argument region.
///
/// Only characters inside quotes contribute to the name; parentheses are
/// depth-tracked and a top-level comma or closing paren ends the scan. The
/// historical scanner drops bare characters, so `foreach(tags)` yields an
/// empty name and fails the parse.
pub fn foreach_variable(options: &str) -> String {
    let mut wip = String::new();
    let mut iter = options.trim().chars();
    let mut in_string = false;
    let mut string_starter = '"';
    let mut depth = 0i32;
    while let Some(c) = iter.next() {
        if in_string {
            if c == '\\' {
                if let Some(escaped) = iter.next() {
                    wip.push(escaped);
                }
            } else if c == string_starter {
                in_string = false;
            } else {
                wip.push(c);
            }
        } else if c == '(' {
            depth += 1;
        } else if c == ')' {
            depth -= 1;
            if depth < 1 {
                break;
            }
        } else if c == '\'' || c == '"' {
            in_string = true;
            string_starter = c;
        } else if c == ',' {
            break;
        }
    }
    wip
}

fn build_function(command: &str, args: Vec<String>) -> Result<Function, ParseError> {
    let kind = FunctionKind::identify(command)
        .ok_or_else(|| ParseError::UnknownFunction(command.to_string()))?;
    if kind.requires_argument() && args.is_empty() {
        return Err(ParseError::MissingArgument(kind.keyword().to_string()));
    }
    let depth = match kind {
        FunctionKind::Continue | FunctionKind::Break => {
            let n = args.first().map(|a| numeric_prefix(a) as i64).unwrap_or(1);
            n.max(1) as u32
        }
        _ => 0,
    };
    Ok(Function { kind, args, depth })
}

/// Parse an `if`/`elseif` condition: an optional leading `not ` sets the
/// negation flag, then the next word names the condition function.
fn condition(options: &str) -> Result<(bool, Function), ParseError> {
    let mut wip = options.trim();
    let mut negated = false;
    if wip.as_bytes().len() >= 4 && wip.as_bytes()[..4].eq_ignore_ascii_case(b"not ") {
        negated = true;
        wip = &wip[4..];
    }
    let (cmd, rest) = split_command(wip);
    let args = split_arguments(rest.trim());
    let test = build_function(&cmd, args)?;
    Ok((negated, test))
}

/// Builds the balanced block tree from the scanner's fragment stream.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Parser { lexer }
    }

    /// Consume the whole template and return the root block.
    ///
    /// Blocks still open at end of input are accepted and closed
    /// implicitly, matching the engine's historical behavior.
    pub fn parse(&mut self) -> Result<Block, ParseError> {
        let mut stack = vec![Block::new(BlockKind::Generic)];
        while let Some(fragment) = self.lexer.next_fragment() {
            match fragment {
                Fragment::Text(text) => {
                    top(&mut stack).append(Node::Text(text));
                }
                Fragment::Comment(text) => {
                    top(&mut stack).append(Node::Comment(text));
                }
                Fragment::Directive(body) => {
                    self.directive(&mut stack, &body)?;
                }
            }
        }
        while stack.len() > 1 {
            close_frame(&mut stack);
        }
        Ok(stack.pop().unwrap())
    }

    fn directive(&mut self, stack: &mut Vec<Block>, body: &str) -> Result<(), ParseError> {
        let (cmd, rest) = split_command(body.trim());
        match cmd.as_str() {
            "if" => {
                let (negated, test) = condition(rest)?;
                stack.push(Block::new(BlockKind::If { negated, test }));
            }
            "foreach" => {
                let var = foreach_variable(rest);
                if var.is_empty() {
                    return Err(ParseError::EmptyLoopVariable);
                }
                stack.push(Block::new(BlockKind::ForEach { var }));
            }
            "elseif" | "else" => {
                match &top(stack).kind {
                    BlockKind::Else => {
                        return Err(ParseError::AlternateAfterElse(cmd));
                    }
                    kind if !kind.accepts_alternate() => {
                        return Err(ParseError::AlternateOutsideIf(cmd));
                    }
                    _ => {}
                }
                let block = if cmd == "elseif" {
                    let (negated, test) = condition(rest)?;
                    Block::new(BlockKind::ElseIf { negated, test })
                } else {
                    Block::new(BlockKind::Else)
                };
                stack.push(block);
            }
            "endif" => {
                if !top(stack).kind.closed_by_endif() {
                    return Err(ParseError::MismatchedEnd(cmd));
                }
                // unwind the whole elseif/else chain down to its `if`
                loop {
                    if !close_frame(stack) {
                        break;
                    }
                }
            }
            "endforeach" => {
                if !matches!(top(stack).kind, BlockKind::ForEach { .. }) {
                    return Err(ParseError::MismatchedEnd(cmd));
                }
                close_frame(stack);
            }
            _ => {
                let args = split_arguments(rest.trim());
                let function = build_function(&cmd, args)?;
                top(stack).append(Node::Function(function));
            }
        }
        Ok(())
    }
}

fn top<'s>(stack: &'s mut [Block]) -> &'s mut Block {
    stack.last_mut().unwrap()
}

/// Close the top frame: an `elseif`/`else` becomes the alternate of the
/// frame below it (returning true, the chain continues); anything else
/// becomes a child of its parent (returning false).
fn close_frame(stack: &mut Vec<Block>) -> bool {
    let block = stack.pop().unwrap();
    let chained = matches!(block.kind, BlockKind::ElseIf { .. } | BlockKind::Else);
    let parent = top(stack);
    if chained {
        parent.alt = Some(Box::new(block));
        true
    } else {
        parent.append(Node::Block(block));
        false
    }
}
