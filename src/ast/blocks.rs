use crate::ast::functions::Function;

/// The control-flow role of a block node.
///
/// `If`/`ElseIf` carry their condition function plus the `not` negation
/// flag; `ForEach` carries its loop variable. `Generic` is the synthetic
/// root kind covering the whole template.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    /// Plain container; the tree root and nothing else
    Generic,
    /// `<? if [not] <function> ?>`
    If { negated: bool, test: Function },
    /// `<? elseif [not] <function> ?>`
    ElseIf { negated: bool, test: Function },
    /// `<? else ?>`
    Else,
    /// `<? foreach("var") ?>`
    ForEach { var: String },
}

impl BlockKind {
    /// Whether an `elseif`/`else` may attach to a block of this kind.
    pub fn accepts_alternate(&self) -> bool {
        matches!(self, BlockKind::If { .. } | BlockKind::ElseIf { .. })
    }

    /// Whether `endif` closes a block of this kind.
    pub fn closed_by_endif(&self) -> bool {
        matches!(
            self,
            BlockKind::If { .. } | BlockKind::ElseIf { .. } | BlockKind::Else
        )
    }
}
