//! Tree-walking interpreter for the passlang AST
//!
//! Evaluation is a pure recursive walk over the tree, except for the two
//! injected policies and a private stack of loop counters. The engine owns no
//! randomness: every sample, including the percentage roll of a weighted
//! choice, goes through the injected range sampler, so seeding is entirely
//! the host's responsibility.

use crate::passlang::ast::{
    CheckElement, CheckExpr, ChecksRowElement, ChoiceMode, ExpressionNode, Loop, Operand,
    RandomChoice, RandomChoiceElement, RandomChoiceValue, RandomRange,
};
use crate::passlang::error::EvalError;
use serde::Serialize;
use std::fmt;

/// Sentinel meaning "unspecified - the check constructor must pick a value".
///
/// Distinct from all legal outputs; literals are unsigned so `-1` can never
/// be produced by an expression slot that the grammar treats as specified.
pub const RANDOM_PLACEHOLDER: i64 = -1;

/// One generated (world, x, y) triple, the engine's unit of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Check {
    pub world: i64,
    pub x: i64,
    pub y: i64,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.world, self.x, self.y)
    }
}

/// Finalizes a raw evaluated triple, replacing [`RANDOM_PLACEHOLDER`] slots
/// with concrete values and validating domain ranges.
pub type CheckConstructor<'a> = Box<dyn FnMut(i64, i64, i64) -> Result<Check, EvalError> + 'a>;

/// Samples one integer uniformly from an inclusive interval; only ever
/// called with `low <= high`.
pub type RangeSampler<'a> = Box<dyn FnMut(i64, i64) -> i64 + 'a>;

/// The outcome of evaluating a random choice: a number in operand mode, a
/// list of checks in checks-row mode.
enum ChoiceOutcome {
    Number(i64),
    Checks(Vec<Check>),
}

/// Tree-walking interpreter.
///
/// One instance evaluates one tree; the loop-counter stack is private state
/// scoped to that invocation and nothing is shared across instances, so
/// concurrent requests just use independent interpreters.
pub struct Interpreter<'a> {
    number_of_checks: i64,
    check_constructor: CheckConstructor<'a>,
    range_sampler: RangeSampler<'a>,
    loop_iterators: Vec<i64>,
}

impl<'a> Interpreter<'a> {
    pub fn new(
        number_of_checks: i64,
        check_constructor: CheckConstructor<'a>,
        range_sampler: RangeSampler<'a>,
    ) -> Self {
        Interpreter {
            number_of_checks,
            check_constructor,
            range_sampler,
            loop_iterators: Vec::new(),
        }
    }

    /// Evaluate a forest of checks-row elements into a flat list of checks.
    pub fn eval_row(&mut self, row: &[ChecksRowElement]) -> Result<Vec<Check>, EvalError> {
        let mut checks = Vec::new();
        for element in row {
            checks.extend(self.eval_element(element)?);
        }
        Ok(checks)
    }

    /// Evaluate one row element; loops and choices may produce any number of
    /// checks, a plain check produces exactly one.
    pub fn eval_element(&mut self, element: &ChecksRowElement) -> Result<Vec<Check>, EvalError> {
        match element {
            ChecksRowElement::Check(check) => Ok(vec![self.eval_check(check)?]),
            ChecksRowElement::Loop(l) => self.eval_loop(l),
            ChecksRowElement::RandomCheckChoice(choice) => {
                match self.eval_random_choice(choice)? {
                    ChoiceOutcome::Checks(checks) => Ok(checks),
                    // Operand values inside a checks-row position cannot be
                    // built by the parser.
                    ChoiceOutcome::Number(_) => Err(EvalError::NoSelection),
                }
            }
        }
    }

    fn eval_check(&mut self, check: &CheckExpr) -> Result<Check, EvalError> {
        let world = self.eval_check_element(&check.world)?;
        let x = self.eval_check_element(&check.x)?;
        let y = self.eval_check_element(&check.y)?;
        (self.check_constructor)(world, x, y)
    }

    fn eval_loop(&mut self, l: &Loop) -> Result<Vec<Check>, EvalError> {
        let length = self.eval_operand(&l.length)?;

        self.loop_iterators.push(0);
        let result = self.run_loop(length, &l.body);
        self.loop_iterators.pop();

        result
    }

    fn run_loop(&mut self, length: i64, body: &[ChecksRowElement]) -> Result<Vec<Check>, EvalError> {
        let mut checks = Vec::new();
        // The counter's stack slot is fixed for the loop's lifetime; nested
        // loops push above it and pop before control returns here.
        let slot = self.loop_iterators.len() - 1;

        for _ in 0..length {
            for element in body {
                checks.extend(self.eval_element(element)?);
                // One increment per body element evaluated, not per outer
                // repetition: a body of k elements run L times drives the
                // counter through 0..L*k.
                self.loop_iterators[slot] += 1;
            }
        }

        Ok(checks)
    }

    fn loop_iterator(&self, index: usize) -> Result<i64, EvalError> {
        self.loop_iterators
            .get(index)
            .copied()
            .ok_or(EvalError::NoSuchLoop(index))
    }

    fn eval_check_element(&mut self, element: &CheckElement) -> Result<i64, EvalError> {
        match element {
            CheckElement::Number(value) => Ok(*value),
            CheckElement::Expression(node) => self.eval_expression(node),
            CheckElement::Random => Ok(RANDOM_PLACEHOLDER),
            CheckElement::RandomRange(range) => self.eval_random_range(range),
            CheckElement::RandomChoice(choice) => match self.eval_random_choice(choice)? {
                ChoiceOutcome::Number(value) => Ok(value),
                ChoiceOutcome::Checks(_) => Err(EvalError::NoSelection),
            },
            CheckElement::NumOfChecks => Ok(self.number_of_checks),
            CheckElement::LoopIterator(index) => self.loop_iterator(*index),
        }
    }

    fn eval_operand(&mut self, operand: &Operand) -> Result<i64, EvalError> {
        match operand {
            Operand::Number(value) => Ok(*value),
            Operand::Expression(node) => self.eval_expression(node),
            Operand::RandomRange(range) => self.eval_random_range(range),
            Operand::RandomChoice(choice) => match self.eval_random_choice(choice)? {
                ChoiceOutcome::Number(value) => Ok(value),
                ChoiceOutcome::Checks(_) => Err(EvalError::NoSelection),
            },
            Operand::NumOfChecks => Ok(self.number_of_checks),
            Operand::LoopIterator(index) => self.loop_iterator(*index),
        }
    }

    fn eval_expression(&mut self, node: &ExpressionNode) -> Result<i64, EvalError> {
        let left = self.eval_operand(&node.left)?;
        let right = self.eval_operand(&node.right)?;

        match node.op {
            '+' => Ok(left.wrapping_add(right)),
            '-' => Ok(left.wrapping_sub(right)),
            '*' => Ok(left.wrapping_mul(right)),
            '/' => {
                if right == 0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    Ok(left / right)
                }
            }
            '%' => {
                if right == 0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    Ok(left % right)
                }
            }
            other => Err(EvalError::InvalidOperator(other)),
        }
    }

    /// Reversed bounds are swapped rather than rejected, so the sampler is
    /// always called with a well-formed interval.
    fn eval_random_range(&mut self, range: &RandomRange) -> Result<i64, EvalError> {
        let start = self.eval_operand(&range.start)?;
        let finish = self.eval_operand(&range.finish)?;

        let (low, high) = if finish < start {
            (finish, start)
        } else {
            (start, finish)
        };
        Ok((self.range_sampler)(low, high))
    }

    /// Weighted selection among the choice's elements.
    ///
    /// Elements carrying an `equals` operand are exact-match overrides: the
    /// first whose `chance` evaluates equal to its `equals` wins outright,
    /// and they never take part in the percentage math. Explicit chances are
    /// paid out of a pool of 100; whatever remains is split evenly among the
    /// free elements. A cumulative pass against a roll from `[1, 100]` then
    /// picks the winner.
    fn eval_random_choice(&mut self, choice: &RandomChoice) -> Result<ChoiceOutcome, EvalError> {
        let roll = (self.range_sampler)(1, 100) as f64;

        let mut free_chance: i64 = 100;
        let mut free_elements: i64 = 0;

        for element in &choice.elements {
            match (&element.chance, &element.equals) {
                (Some(chance), Some(equals)) => {
                    if self.eval_operand(chance)? == self.eval_operand(equals)? {
                        return self.eval_choice_element(element);
                    }
                }
                (Some(chance), None) => {
                    free_chance -= self.eval_operand(chance)?;
                }
                (None, _) => {
                    free_elements += 1;
                }
            }
        }
        if free_chance < 0 {
            return Err(EvalError::ChanceOverflow);
        }

        let mut chance_per_free = 0.0;
        if free_elements > 0 {
            chance_per_free = free_chance as f64 / free_elements as f64;
            if chance_per_free == 0.0 && free_chance > 0 {
                return Err(EvalError::DegenerateChance);
            }
        }

        let mut accumulated = 0.0;
        for element in &choice.elements {
            if element.equals.is_some() {
                continue;
            }
            match &element.chance {
                Some(chance) => accumulated += self.eval_operand(chance)? as f64,
                None => accumulated += chance_per_free,
            }
            if accumulated >= roll {
                return self.eval_choice_element(element);
            }
        }

        // Nothing selected: empty choice, or declared chances below the roll
        // with no free elements to absorb the remainder.
        match choice.mode {
            ChoiceMode::ChecksRow => Ok(ChoiceOutcome::Checks(Vec::new())),
            ChoiceMode::Operand => Err(EvalError::NoSelection),
        }
    }

    fn eval_choice_element(
        &mut self,
        element: &RandomChoiceElement,
    ) -> Result<ChoiceOutcome, EvalError> {
        match &element.value {
            RandomChoiceValue::Operand(operand) => {
                Ok(ChoiceOutcome::Number(self.eval_operand(operand)?))
            }
            RandomChoiceValue::ChecksRow(row_element) => {
                Ok(ChoiceOutcome::Checks(self.eval_element(row_element)?))
            }
        }
    }
}
