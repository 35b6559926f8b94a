//! Reading and writing conjunctions of triples:
//!
//! ```text
//! instance(a, alpha) ^ ARG0(a, b) ^ instance(b, beta)
//! ```
//!
//! Each conjunct is `role(source, target)`. Role names are kept verbatim, so
//! `ARG0` stays `ARG0`; pass the triples through
//! [`Model::canonicalize`](crate::Model::canonicalize) to get `:ARG0`.

use crate::cursor::{SyntaxError, TokenCursor};
use crate::lexer::{tokenize, Grammar, LexError, Token, TokenKind};
use crate::model::ROLE_MARKER;
use crate::types::Triple;

const TARGET_KINDS: [TokenKind; 4] = [
    TokenKind::Symbol,
    TokenKind::String,
    TokenKind::Integer,
    TokenKind::Float,
];

/// Read a `^`-separated conjunction of triples. Empty input gives no triples.
pub fn read_triples(text: &str) -> Result<Vec<Triple>, SyntaxError> {
    let mut cursor = TokenCursor::new(tokenize(text, Grammar::Triples));
    let mut triples = Vec::new();
    if cursor.is_at_end()? {
        return Ok(triples);
    }
    loop {
        triples.push(read_triple(&mut cursor)?);
        if cursor.is_at_end()? {
            break;
        }
        cursor.expect(TokenKind::Caret)?;
    }
    Ok(triples)
}

fn read_triple<I>(cursor: &mut TokenCursor<I>) -> Result<Triple, SyntaxError>
where
    I: Iterator<Item = Result<Token, LexError>>,
{
    let role = cursor.expect(TokenKind::Symbol)?.value;
    cursor.expect(TokenKind::Lparen)?;
    let source = cursor.expect(TokenKind::Symbol)?.value;
    cursor.expect(TokenKind::Comma)?;
    let target = cursor.expect_one_of(&TARGET_KINDS)?.value;
    cursor.expect(TokenKind::Rparen)?;
    Ok(Triple::new(source, role, target))
}

/// Write triples as a conjunction, one per line, dropping each role's
/// leading `:`.
pub fn write_triples(triples: &[Triple]) -> String {
    triples
        .iter()
        .map(|t| {
            let role = t.role.strip_prefix(ROLE_MARKER).unwrap_or(&t.role);
            format!("{}({}, {})", role, t.source, t.target)
        })
        .collect::<Vec<_>>()
        .join(" ^\n")
}

// --- tests -------------------------------------------------------------------
