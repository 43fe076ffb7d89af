//! Recursive-descent parser for the passlang grammar
//!
//! The parser consumes the token sequence produced by the lexer through an
//! index cursor with one token of lookahead (`peek`/`pop`). There is no
//! backtracking except the single explicit rollback in [`Parser::parse_check`]:
//! a `[...]` group is ambiguous between a whole-check random choice and a
//! random-choice expression used as the world value of an ordinary check, and
//! only the token after the group tells them apart.
//!
//! Spaces are not skipped globally; each production consumes them exactly
//! where the grammar allows. That is what lets `0-2` read as a random range
//! while `0 - 2` inside parentheses reads as subtraction.

use crate::passlang::ast::{
    CheckElement, CheckExpr, ChecksRowElement, ChoiceMode, ExpressionNode, Loop, Operand,
    RandomChoice, RandomChoiceElement, RandomChoiceValue, RandomRange,
};
use crate::passlang::error::ParseError;
use crate::passlang::lexer::Token;

/// Operator binding strength for the arithmetic tree builder.
fn precedence(op: char) -> u8 {
    match op {
        '*' | '/' | '%' => 2,
        _ => 1,
    }
}

/// Recursive-descent parser over a token sequence.
///
/// One parser instance parses one token sequence; create it with the output
/// of [`tokenize`](crate::passlang::lexer::tokenize) and call [`Parser::parse`].
pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, index: 0 }
    }

    fn peek(&self) -> Result<&Token, ParseError> {
        self.tokens
            .get(self.index)
            .ok_or(ParseError::UnexpectedEndOfInput)
    }

    fn pop(&mut self) -> Result<Token, ParseError> {
        let token = self
            .tokens
            .get(self.index)
            .cloned()
            .ok_or(ParseError::UnexpectedEndOfInput)?;
        self.index += 1;
        Ok(token)
    }

    fn skip_space(&mut self) -> Result<(), ParseError> {
        while matches!(self.peek()?, Token::Space) {
            self.pop()?;
        }
        Ok(())
    }

    /// Parse the whole token sequence into a forest of checks-row elements.
    pub fn parse(&mut self) -> Result<Vec<ChecksRowElement>, ParseError> {
        self.parse_checks_row()
    }

    /// `ChecksRow := SP (Check SP)* (End | ')')` - consumes the terminator.
    fn parse_checks_row(&mut self) -> Result<Vec<ChecksRowElement>, ParseError> {
        let mut elements = Vec::new();
        self.skip_space()?;
        while !self.peek()?.is_row_terminator() {
            elements.push(self.parse_check()?);
            self.skip_space()?;
        }
        self.pop()?;
        Ok(elements)
    }

    /// Parse one checks-row element: a check, a loop, or a random check choice.
    fn parse_check(&mut self) -> Result<ChecksRowElement, ParseError> {
        self.skip_space()?;

        if matches!(self.peek()?, Token::OpenBracket) {
            // Speculative parse: a bracket group followed by `.` is not a
            // whole-check choice but the world value of an ordinary check.
            let saved = self.index;
            let choice = self.parse_random_choice(ChoiceMode::ChecksRow)?;
            if matches!(self.peek()?, Token::CheckSeparator) {
                self.index = saved;
            } else {
                return Ok(ChecksRowElement::RandomCheckChoice(choice));
            }
        }

        let world = self.parse_check_element()?;
        if !matches!(self.peek()?, Token::CheckSeparator) {
            if matches!(self.peek()?, Token::OpenParen) {
                return self.parse_loop(world);
            }
            // World-only check: x and y are left for the constructor to pick.
            return Ok(ChecksRowElement::Check(CheckExpr {
                world,
                x: CheckElement::Random,
                y: CheckElement::Random,
            }));
        }
        self.pop()?;

        let x = self.parse_check_element()?;
        if !matches!(self.pop()?, Token::CheckSeparator) {
            return Err(ParseError::ExpectedToken("'.' between check elements"));
        }
        let y = self.parse_check_element()?;

        Ok(ChecksRowElement::Check(CheckExpr { world, x, y }))
    }

    /// `RandomChoice := '[' SP (RandomChoiceElem SP)* ']'`
    fn parse_random_choice(&mut self, mode: ChoiceMode) -> Result<RandomChoice, ParseError> {
        if !matches!(self.pop()?, Token::OpenBracket) {
            return Err(ParseError::ExpectedToken("'[' opening a random choice"));
        }

        let mut elements = Vec::new();
        self.skip_space()?;
        while !matches!(self.peek()?, Token::CloseBracket) {
            elements.push(self.parse_random_choice_element(mode)?);
            self.skip_space()?;
        }
        self.pop()?;

        Ok(RandomChoice { mode, elements })
    }

    /// One alternative: `value (';' chance (';' equals)?)?`, where chance and
    /// equals must follow their semicolon without spaces.
    fn parse_random_choice_element(
        &mut self,
        mode: ChoiceMode,
    ) -> Result<RandomChoiceElement, ParseError> {
        self.skip_space()?;

        let value = match mode {
            ChoiceMode::ChecksRow => RandomChoiceValue::ChecksRow(Box::new(self.parse_check()?)),
            ChoiceMode::Operand => RandomChoiceValue::Operand(self.parse_operand(false)?),
        };

        let mut chance = None;
        let mut equals = None;
        if matches!(self.peek()?, Token::Semicolon) {
            self.pop()?;
            if matches!(self.peek()?, Token::Space) {
                return Err(ParseError::InvalidChanceShape);
            }
            chance = Some(self.parse_operand(false)?);

            if matches!(self.peek()?, Token::Semicolon) {
                self.pop()?;
                if matches!(self.peek()?, Token::Space) {
                    return Err(ParseError::InvalidChanceShape);
                }
                equals = Some(self.parse_operand(false)?);
            }
        }

        Ok(RandomChoiceElement {
            value,
            chance,
            equals,
        })
    }

    /// A loop is a check element (its length) directly followed by a
    /// parenthesized checks row.
    fn parse_loop(&mut self, length: CheckElement) -> Result<ChecksRowElement, ParseError> {
        let length = length.into_operand()?;

        if !matches!(self.pop()?, Token::OpenParen) {
            return Err(ParseError::ExpectedToken("'(' opening a loop body"));
        }
        let body = self.parse_checks_row()?;

        Ok(ChecksRowElement::Loop(Loop { length, body }))
    }

    /// One slot of a check, optionally extended into a random range by a
    /// directly following `-`.
    fn parse_check_element(&mut self) -> Result<CheckElement, ParseError> {
        let element = match self.peek()?.clone() {
            Token::Operand(value) => {
                self.pop()?;
                CheckElement::Number(value)
            }
            Token::OpenParen => CheckElement::Expression(Box::new(self.parse_expression()?)),
            Token::OpenBracket => {
                CheckElement::RandomChoice(self.parse_random_choice(ChoiceMode::Operand)?)
            }
            Token::NumOfChecksVar => {
                self.pop()?;
                CheckElement::NumOfChecks
            }
            Token::LoopIteratorVar(index) => {
                self.pop()?;
                CheckElement::LoopIterator(index)
            }
            Token::Operation('-') => {
                // The bare placeholder never extends into a range.
                self.pop()?;
                return Ok(CheckElement::Random);
            }
            _ => return Err(ParseError::InvalidCheckElement),
        };

        if self.peek()?.is_dash() {
            let start = element.into_operand()?;
            let range = self.parse_random_range(start)?;
            return Ok(CheckElement::RandomRange(Box::new(range)));
        }
        Ok(element)
    }

    /// Like [`Parser::parse_check_element`] without the `Random` placeholder.
    ///
    /// `is_range_finish` forbids the parsed operand from starting another
    /// range: a range has exactly two endpoints.
    fn parse_operand(&mut self, is_range_finish: bool) -> Result<Operand, ParseError> {
        self.skip_space()?;

        let operand = match self.peek()?.clone() {
            Token::Operand(value) => {
                self.pop()?;
                Operand::Number(value)
            }
            Token::OpenParen => Operand::Expression(Box::new(self.parse_expression()?)),
            Token::OpenBracket => {
                Operand::RandomChoice(self.parse_random_choice(ChoiceMode::Operand)?)
            }
            Token::NumOfChecksVar => {
                self.pop()?;
                Operand::NumOfChecks
            }
            Token::LoopIteratorVar(index) => {
                self.pop()?;
                Operand::LoopIterator(index)
            }
            _ => return Err(ParseError::InvalidCheckElement),
        };

        if self.peek()?.is_dash() {
            if is_range_finish {
                return Err(ParseError::InvalidRandomRangeShape);
            }
            let range = self.parse_random_range(operand)?;
            return Ok(Operand::RandomRange(Box::new(range)));
        }
        Ok(operand)
    }

    /// `start` has already been parsed; the cursor sits on the `-` separator.
    fn parse_random_range(&mut self, start: Operand) -> Result<RandomRange, ParseError> {
        if !self.peek()?.is_dash() {
            return Err(ParseError::ExpectedToken("'-' between range endpoints"));
        }
        self.pop()?;

        let finish = self.parse_operand(true)?;

        Ok(RandomRange { start, finish })
    }

    /// `Expression := '(' SP Operand SP (Operator SP Operand SP)+ ')'`
    ///
    /// The flat operand/operator chain is folded into a binary tree by
    /// precedence climbing: `* / %` bind tighter than `+ -`, equal precedence
    /// associates left to right.
    fn parse_expression(&mut self) -> Result<ExpressionNode, ParseError> {
        self.skip_space()?;
        if !matches!(self.pop()?, Token::OpenParen) {
            return Err(ParseError::ExpectedToken("'(' opening an expression"));
        }

        let first = self.parse_operand(false)?;
        self.skip_space()?;
        if !matches!(self.peek()?, Token::Operation(_)) {
            return Err(ParseError::ExpectedToken("an arithmetic operator"));
        }

        let combined = self.climb(first, 0)?;
        if !matches!(self.pop()?, Token::CloseParen) {
            return Err(ParseError::ExpectedToken("')' closing an expression"));
        }

        match combined {
            Operand::Expression(node) => Ok(*node),
            // Unreachable with the operator check above, kept for shape.
            _ => Err(ParseError::ExpectedToken("an arithmetic operator")),
        }
    }

    /// Precedence climbing over the token stream; leaves the cursor on the
    /// first token that is not part of the operand/operator chain.
    fn climb(&mut self, mut lhs: Operand, min_precedence: u8) -> Result<Operand, ParseError> {
        loop {
            self.skip_space()?;
            let op = match self.peek()? {
                Token::Operation(c) if precedence(*c) >= min_precedence => *c,
                _ => return Ok(lhs),
            };
            self.pop()?;

            let mut rhs = self.parse_operand(false)?;
            loop {
                self.skip_space()?;
                match self.peek()? {
                    Token::Operation(next) if precedence(*next) > precedence(op) => {
                        rhs = self.climb(rhs, precedence(op) + 1)?;
                    }
                    _ => break,
                }
            }

            lhs = Operand::Expression(Box::new(ExpressionNode {
                left: lhs,
                op,
                right: rhs,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passlang::lexer::tokenize;

    fn parse(source: &str) -> Result<Vec<ChecksRowElement>, ParseError> {
        Parser::new(tokenize(source)).parse()
    }

    fn parse_one(source: &str) -> ChecksRowElement {
        let mut row = parse(source).expect("parse failed");
        assert_eq!(row.len(), 1, "expected a single row element");
        row.pop().expect("row is non-empty")
    }

    fn number(value: i64) -> CheckElement {
        CheckElement::Number(value)
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(parse(""), Ok(vec![]));
    }

    #[test]
    fn test_plain_check() {
        assert_eq!(
            parse_one("1.2.3"),
            ChecksRowElement::Check(CheckExpr {
                world: number(1),
                x: number(2),
                y: number(3),
            })
        );
    }

    #[test]
    fn test_world_only_check_defaults_to_random() {
        assert_eq!(
            parse_one("4"),
            ChecksRowElement::Check(CheckExpr {
                world: number(4),
                x: CheckElement::Random,
                y: CheckElement::Random,
            })
        );
    }

    #[test]
    fn test_fully_random_check() {
        assert_eq!(
            parse_one("-"),
            ChecksRowElement::Check(CheckExpr {
                world: CheckElement::Random,
                x: CheckElement::Random,
                y: CheckElement::Random,
            })
        );
    }

    #[test]
    fn test_multiple_checks_in_row() {
        let row = parse("1.2.3 4.5.6").expect("parse failed");
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_random_range_binds_without_spaces() {
        assert_eq!(
            parse_one("0-2"),
            ChecksRowElement::Check(CheckExpr {
                world: CheckElement::RandomRange(Box::new(RandomRange {
                    start: Operand::Number(0),
                    finish: Operand::Number(2),
                })),
                x: CheckElement::Random,
                y: CheckElement::Random,
            })
        );
    }

    #[test]
    fn test_range_cannot_chain() {
        assert_eq!(parse("0-2-4"), Err(ParseError::InvalidRandomRangeShape));
    }

    #[test]
    fn test_placeholder_cannot_start_a_range() {
        // `-` pops immediately; what follows parses as a separate check
        let row = parse("- 5").expect("parse failed");
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_loop_with_literal_length() {
        match parse_one("3(-)") {
            ChecksRowElement::Loop(l) => {
                assert_eq!(l.length, Operand::Number(3));
                assert_eq!(l.body.len(), 1);
            }
            other => panic!("expected loop, got {:?}", other),
        }
    }

    #[test]
    fn test_loop_with_expression_length() {
        match parse_one("(n - 1)(-)") {
            ChecksRowElement::Loop(l) => {
                assert_eq!(
                    l.length,
                    Operand::Expression(Box::new(ExpressionNode {
                        left: Operand::NumOfChecks,
                        op: '-',
                        right: Operand::Number(1),
                    }))
                );
            }
            other => panic!("expected loop, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_loops() {
        match parse_one("2(3(i0.i1.0))") {
            ChecksRowElement::Loop(outer) => match &outer.body[0] {
                ChecksRowElement::Loop(inner) => {
                    assert_eq!(inner.length, Operand::Number(3));
                    assert_eq!(
                        inner.body[0],
                        ChecksRowElement::Check(CheckExpr {
                            world: CheckElement::LoopIterator(0),
                            x: CheckElement::LoopIterator(1),
                            y: number(0),
                        })
                    );
                }
                other => panic!("expected inner loop, got {:?}", other),
            },
            other => panic!("expected loop, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_loop_body() {
        assert_eq!(parse("2(1.2.3"), Err(ParseError::UnexpectedEndOfInput));
    }

    #[test]
    fn test_check_missing_second_separator() {
        assert!(parse("1.2").is_err());
    }

    #[test]
    fn test_random_check_choice() {
        match parse_one("[1.2.3 4.5.6;30]") {
            ChecksRowElement::RandomCheckChoice(choice) => {
                assert_eq!(choice.mode, ChoiceMode::ChecksRow);
                assert_eq!(choice.elements.len(), 2);
                assert_eq!(choice.elements[0].chance, None);
                assert_eq!(choice.elements[1].chance, Some(Operand::Number(30)));
                assert_eq!(choice.elements[1].equals, None);
            }
            other => panic!("expected random check choice, got {:?}", other),
        }
    }

    #[test]
    fn test_bracket_group_rolls_back_to_check_world() {
        // `[...]` followed by `.` is a choice used as the world value
        match parse_one("[1 2].5.5") {
            ChecksRowElement::Check(check) => match check.world {
                CheckElement::RandomChoice(choice) => {
                    assert_eq!(choice.mode, ChoiceMode::Operand);
                    assert_eq!(choice.elements.len(), 2);
                }
                other => panic!("expected choice world, got {:?}", other),
            },
            other => panic!("expected check, got {:?}", other),
        }
    }

    #[test]
    fn test_choice_with_equals_override() {
        match parse_one("[1;50;n 2]") {
            ChecksRowElement::RandomCheckChoice(choice) => {
                assert_eq!(choice.elements.len(), 2);
                assert_eq!(choice.elements[0].chance, Some(Operand::Number(50)));
                assert_eq!(choice.elements[0].equals, Some(Operand::NumOfChecks));
                assert_eq!(choice.elements[1].chance, None);
            }
            other => panic!("expected random check choice, got {:?}", other),
        }
    }

    #[test]
    fn test_chance_must_follow_semicolon_without_space() {
        assert_eq!(parse("[1; 50]"), Err(ParseError::InvalidChanceShape));
        assert_eq!(parse("[1;50; n]"), Err(ParseError::InvalidChanceShape));
    }

    #[test]
    fn test_empty_random_choice() {
        match parse_one("[]") {
            ChecksRowElement::RandomCheckChoice(choice) => {
                assert!(choice.elements.is_empty());
            }
            other => panic!("expected random check choice, got {:?}", other),
        }
    }

    #[test]
    fn test_expression_requires_an_operator() {
        assert_eq!(
            parse("(5)"),
            Err(ParseError::ExpectedToken("an arithmetic operator"))
        );
    }

    #[test]
    fn test_expression_precedence_tree() {
        // 1 + 2 * 3 must parse as 1 + (2 * 3)
        match parse_one("(1 + 2 * 3)") {
            ChecksRowElement::Check(check) => match check.world {
                CheckElement::Expression(node) => {
                    assert_eq!(node.op, '+');
                    assert_eq!(node.left, Operand::Number(1));
                    assert_eq!(
                        node.right,
                        Operand::Expression(Box::new(ExpressionNode {
                            left: Operand::Number(2),
                            op: '*',
                            right: Operand::Number(3),
                        }))
                    );
                }
                other => panic!("expected expression, got {:?}", other),
            },
            other => panic!("expected check, got {:?}", other),
        }
    }

    #[test]
    fn test_expression_left_associativity() {
        // 8 - 2 - 1 must parse as (8 - 2) - 1
        match parse_one("(8 - 2 - 1)") {
            ChecksRowElement::Check(check) => match check.world {
                CheckElement::Expression(node) => {
                    assert_eq!(node.op, '-');
                    assert_eq!(node.right, Operand::Number(1));
                    assert_eq!(
                        node.left,
                        Operand::Expression(Box::new(ExpressionNode {
                            left: Operand::Number(8),
                            op: '-',
                            right: Operand::Number(2),
                        }))
                    );
                }
                other => panic!("expected expression, got {:?}", other),
            },
            other => panic!("expected check, got {:?}", other),
        }
    }

    #[test]
    fn test_range_inside_expression_binds_tighter() {
        // `5-1` with no spaces is a range even inside an expression
        match parse_one("(5-1 + 2)") {
            ChecksRowElement::Check(check) => match check.world {
                CheckElement::Expression(node) => {
                    assert_eq!(node.op, '+');
                    assert!(matches!(node.left, Operand::RandomRange(_)));
                    assert_eq!(node.right, Operand::Number(2));
                }
                other => panic!("expected expression, got {:?}", other),
            },
            other => panic!("expected check, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_input_fails_structurally() {
        assert!(parse("(1 +").is_err());
        assert!(parse("[1.2.3").is_err());
        assert!(parse("1.").is_err());
    }
}
