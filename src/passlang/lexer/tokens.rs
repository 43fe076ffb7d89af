//! Token definitions for the passlang grammar
//!
//! This module defines all the tokens that can be produced by the passlang
//! lexer. The tokens are defined using the logos derive macro for efficient
//! tokenization.

use logos::Logos;
use serde::Serialize;
use std::fmt;

/// All possible tokens in the passlang grammar
///
/// `End` is a synthetic token: logos never produces it, the
/// [tokenize](crate::passlang::lexer::tokenize) pipeline appends it so the
/// parser always sees a terminator.
#[derive(Logos, Debug, PartialEq, Clone, Serialize)]
pub enum Token {
    // Grouping
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,

    // Separators
    #[token(";")]
    Semicolon,
    #[token(".")]
    CheckSeparator,
    #[token(" ")]
    Space,

    // Arithmetic operators; `-` doubles as the random placeholder and the
    // random-range separator depending on grammar position
    #[regex(r"[+\-*/%]", |lex| lex.slice().chars().next())]
    Operation(char),

    // Unsigned integer literals; negatives only arise through the `-` operator
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Operand(i64),

    // Built-in variables
    #[token("n")]
    NumOfChecksVar,
    #[regex(r"i[0-9]+", |lex| lex.slice()[1..].parse::<usize>().ok())]
    LoopIteratorVar(usize),

    // Synthetic terminator appended by the tokenize pipeline
    End,
}

impl Token {
    /// Check if this token is the `-` operator
    pub fn is_dash(&self) -> bool {
        matches!(self, Token::Operation('-'))
    }

    /// Check if this token terminates a checks row
    pub fn is_row_terminator(&self) -> bool {
        matches!(self, Token::End | Token::CloseParen)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::OpenParen => write!(f, "<open-paren>"),
            Token::CloseParen => write!(f, "<close-paren>"),
            Token::OpenBracket => write!(f, "<open-bracket>"),
            Token::CloseBracket => write!(f, "<close-bracket>"),
            Token::Semicolon => write!(f, "<semicolon>"),
            Token::CheckSeparator => write!(f, "<check-separator>"),
            Token::Space => write!(f, "<space>"),
            Token::Operation(op) => write!(f, "<operation:{}>", op),
            Token::Operand(value) => write!(f, "<operand:{}>", value),
            Token::NumOfChecksVar => write!(f, "<num-of-checks>"),
            Token::LoopIteratorVar(index) => write!(f, "<loop-iterator:{}>", index),
            Token::End => write!(f, "<end>"),
        }
    }
}
