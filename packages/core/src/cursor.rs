//! One-token-lookahead cursor over a [`Lexer`](crate::lexer::Lexer) stream,
//! for recursive-descent consumers.

use thiserror::Error;

use crate::lexer::{LexError, Span, Token, TokenKind};

/// Errors raised while consuming tokens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {} at {span}, found {found} {value:?}", one_of(.expected))]
    UnexpectedToken {
        expected: Vec<TokenKind>,
        found: TokenKind,
        value: String,
        span: Span,
    },

    #[error("expected {}, found end of input", one_of(.expected))]
    UnexpectedEnd { expected: Vec<TokenKind> },
}

fn one_of(kinds: &[TokenKind]) -> String {
    match kinds {
        [only] => only.to_string(),
        _ => {
            let names: Vec<String> = kinds.iter().map(|k| k.to_string()).collect();
            format!("one of {}", names.join(", "))
        }
    }
}

/// Sequential consumer of a token stream.
///
/// The only state is a single buffered lookahead token and a count of tokens
/// consumed so far. A lexical error from the underlying stream surfaces from
/// whichever call first needs the offending token, and from every call after
/// it: a failed stream never reads as a clean end of input.
pub struct TokenCursor<I> {
    tokens: I,
    lookahead: Option<Token>,
    failed: Option<LexError>,
    position: usize,
}

impl<I> TokenCursor<I>
where
    I: Iterator<Item = Result<Token, LexError>>,
{
    pub fn new(tokens: I) -> Self {
        Self {
            tokens,
            lookahead: None,
            failed: None,
            position: 0,
        }
    }

    /// Number of tokens consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The next token without consuming it, or `None` at end of input.
    pub fn peek(&mut self) -> Result<Option<&Token>, SyntaxError> {
        if let Some(e) = &self.failed {
            return Err(e.clone().into());
        }
        if self.lookahead.is_none() {
            match self.tokens.next().transpose() {
                Ok(token) => self.lookahead = token,
                Err(e) => {
                    self.failed = Some(e.clone());
                    return Err(e.into());
                }
            }
        }
        Ok(self.lookahead.as_ref())
    }

    /// `true` once every token has been consumed.
    pub fn is_at_end(&mut self) -> Result<bool, SyntaxError> {
        Ok(self.peek()?.is_none())
    }

    /// Consume and return the next token, whatever its kind.
    pub fn advance(&mut self) -> Result<Option<Token>, SyntaxError> {
        self.peek()?;
        let token = self.lookahead.take();
        if token.is_some() {
            self.position += 1;
        }
        Ok(token)
    }

    /// Consume the next token if it is of `kind`, otherwise fail.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, SyntaxError> {
        self.expect_one_of(&[kind])
    }

    /// Consume the next token if its kind is any of `kinds`, otherwise fail.
    pub fn expect_one_of(&mut self, kinds: &[TokenKind]) -> Result<Token, SyntaxError> {
        let Some(token) = self.peek()? else {
            return Err(SyntaxError::UnexpectedEnd {
                expected: kinds.to_vec(),
            });
        };
        if !kinds.contains(&token.kind) {
            return Err(SyntaxError::UnexpectedToken {
                expected: kinds.to_vec(),
                found: token.kind,
                value: token.value.clone(),
                span: token.span,
            });
        }
        self.consume()
    }

    /// Consume the next token if it is of `kind`; otherwise leave the cursor
    /// where it is and return `None`.
    pub fn accept(&mut self, kind: TokenKind) -> Result<Option<Token>, SyntaxError> {
        if matches!(self.peek()?, Some(token) if token.kind == kind) {
            self.consume().map(Some)
        } else {
            Ok(None)
        }
    }

    fn consume(&mut self) -> Result<Token, SyntaxError> {
        match self.advance()? {
            Some(token) => Ok(token),
            None => Err(SyntaxError::UnexpectedEnd { expected: vec![] }),
        }
    }
}

// --- tests -------------------------------------------------------------------
