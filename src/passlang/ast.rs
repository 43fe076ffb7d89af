//! AST data model for the passlang grammar
//!
//! Every operand-like entity is a closed sum type; recursion goes through
//! boxed arms so each node owns its children outright. The tree is built once
//! by the parser and handed to exactly one interpreter invocation; nothing is
//! shared or mutated after construction.

use crate::passlang::error::ParseError;

/// A binary arithmetic node: `left op right`.
///
/// Binary only; deeper arithmetic nests through [`Operand::Expression`].
/// The operator is one of `+ - * / %`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionNode {
    pub left: Operand,
    pub op: char,
    pub right: Operand,
}

/// An integer-producing value.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(i64),
    Expression(Box<ExpressionNode>),
    RandomRange(Box<RandomRange>),
    RandomChoice(RandomChoice),
    NumOfChecks,
    LoopIterator(usize),
}

/// One of the three slots of a check.
///
/// Like [`Operand`] but additionally allows [`CheckElement::Random`], the
/// explicit "unspecified - pick randomly" marker written `-` in source.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckElement {
    Number(i64),
    Expression(Box<ExpressionNode>),
    Random,
    RandomRange(Box<RandomRange>),
    RandomChoice(RandomChoice),
    NumOfChecks,
    LoopIterator(usize),
}

impl CheckElement {
    /// Reinterpret this element as an [`Operand`].
    ///
    /// Needed where the grammar reuses a parsed check element in operand
    /// position: loop lengths and random-range starts. [`CheckElement::Random`]
    /// has no operand form and is rejected.
    pub fn into_operand(self) -> Result<Operand, ParseError> {
        match self {
            CheckElement::Number(value) => Ok(Operand::Number(value)),
            CheckElement::Expression(node) => Ok(Operand::Expression(node)),
            CheckElement::RandomRange(range) => Ok(Operand::RandomRange(range)),
            CheckElement::RandomChoice(choice) => Ok(Operand::RandomChoice(choice)),
            CheckElement::NumOfChecks => Ok(Operand::NumOfChecks),
            CheckElement::LoopIterator(index) => Ok(Operand::LoopIterator(index)),
            CheckElement::Random => Err(ParseError::InvalidCheckElement),
        }
    }
}

/// An unevaluated check descriptor: three element slots.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckExpr {
    pub world: CheckElement,
    pub x: CheckElement,
    pub y: CheckElement,
}

/// A repetition node. The body is itself a full checks row, so loops nest.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub length: Operand,
    pub body: Vec<ChecksRowElement>,
}

/// One element of a checks row.
#[derive(Debug, Clone, PartialEq)]
pub enum ChecksRowElement {
    Check(CheckExpr),
    Loop(Loop),
    RandomCheckChoice(RandomChoice),
}

/// An inclusive integer interval, evaluated lazily at interpretation time.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomRange {
    pub start: Operand,
    pub finish: Operand,
}

/// What kind of value the elements of a [`RandomChoice`] produce.
///
/// Recorded on the choice itself so an empty or unselected choice still
/// knows whether to fall back to an empty checks list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceMode {
    Operand,
    ChecksRow,
}

/// A weighted random choice among alternatives.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomChoice {
    pub mode: ChoiceMode,
    pub elements: Vec<RandomChoiceElement>,
}

/// The selectable value of one choice element.
#[derive(Debug, Clone, PartialEq)]
pub enum RandomChoiceValue {
    Operand(Operand),
    ChecksRow(Box<ChecksRowElement>),
}

/// One alternative in a [`RandomChoice`].
///
/// Written `value`, `value;chance` or `value;chance;equals` in source, so
/// `equals` is only ever present together with `chance`. An element with an
/// `equals` operand is an exact-match override: it is selected unconditionally
/// when `chance` and `equals` evaluate equal, and never takes part in the
/// percentage math otherwise. An element with neither is a free element and
/// shares the leftover percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomChoiceElement {
    pub value: RandomChoiceValue,
    pub chance: Option<Operand>,
    pub equals: Option<Operand>,
}
