//! Lexer for the passlang grammar
//!
//! Tokenization is done through the logos lexer library. The pass is single
//! scan, no lookahead beyond what the token patterns themselves need, and it
//! never fails: characters that match no pattern are dropped without a
//! diagnostic. That includes a bare `i` not followed by digits, which the
//! loop-iterator pattern rejects. The permissiveness is deliberate and
//! matches the language's established behavior; promoting stray characters to
//! errors would be a breaking change for existing expressions.

pub mod tokens;

pub use tokens::Token;

/// Tokenize a passlang source string.
///
/// Returns the full token sequence, always terminated by [`Token::End`].
/// Unrecognized characters are silently skipped, so this function cannot
/// fail; all structural validation happens in the parser.
pub fn tokenize(source: &str) -> Vec<Token> {
    use logos::Logos;

    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        if let Ok(token) = result {
            tokens.push(token);
        }
    }
    tokens.push(Token::End);

    tokens
}
