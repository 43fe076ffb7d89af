//! Pipeline entry point: `tokenize -> parse -> interpret`
//!
//! One call runs start to finish on one thread and produces one result;
//! there is no streaming, caching, or incremental re-parsing. Tokens live
//! only during parsing and the tree lives only for the one interpreter
//! invocation.

use crate::passlang::error::PasslangError;
use crate::passlang::interpreter::{Check, CheckConstructor, Interpreter, RangeSampler};
use crate::passlang::lexer::tokenize;
use crate::passlang::parser::Parser;

/// Compile and evaluate a passlang expression into a flat list of checks.
///
/// `number_of_checks` is the value of the built-in `n` variable. The two
/// policies supply everything domain-specific: the constructor resolves
/// [`RANDOM_PLACEHOLDER`](crate::passlang::interpreter::RANDOM_PLACEHOLDER)
/// slots and validates ranges, the sampler answers every inclusive-interval
/// draw. The first parse or eval error aborts the whole call.
pub fn generate_checks(
    number_of_checks: i64,
    source: &str,
    check_constructor: CheckConstructor<'_>,
    range_sampler: RangeSampler<'_>,
) -> Result<Vec<Check>, PasslangError> {
    let tokens = tokenize(source);
    let forest = Parser::new(tokens).parse()?;

    let mut interpreter = Interpreter::new(number_of_checks, check_constructor, range_sampler);
    let checks = interpreter.eval_row(&forest)?;

    Ok(checks)
}
