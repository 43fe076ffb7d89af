//! # passlang
//!
//! A small domain-specific language that compiles a compact textual grammar
//! describing procedurally generated checks - triples of (world, x, y) - into
//! a concrete list of such triples.
//!
//! The pipeline is `tokenize -> parse -> interpret`: the lexer produces a flat
//! token stream, the recursive-descent parser builds a tree of checks-row
//! elements, and the interpreter walks that tree with two injected policies
//! (a check constructor and a range sampler) to produce the final checks.
//!
//! ```text
//! 0-2 (n - 1)(-)
//! ```
//!
//! With `number_of_checks = 3`, the expression above yields one check whose
//! world is sampled from `0..=2`, followed by a loop of `n - 1 = 2` fully
//! random checks.

pub mod passlang;

pub use passlang::error::{EvalError, ParseError, PasslangError};
pub use passlang::interpreter::{Check, Interpreter, RANDOM_PLACEHOLDER};
pub use passlang::pipeline::generate_checks;
