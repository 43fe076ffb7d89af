//! The passlang language engine
//!
//! This module contains the complete engine: lexer, AST data model,
//! recursive-descent parser, tree-walking interpreter, and the
//! `tokenize -> parse -> interpret` pipeline entry point.
//!
//! The engine itself owns no randomness and no domain knowledge: what a legal
//! world value is, and how an integer interval is sampled, are both injected
//! by the caller (see [interpreter]).

pub mod ast;
pub mod error;
pub mod formats;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod pipeline;
