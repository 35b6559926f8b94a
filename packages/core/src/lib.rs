//! Front end and role model for the PENMAN graph notation.
//!
//! PENMAN describes rooted, directed, edge-labeled graphs: nodes are named by
//! variables, edges by roles, and leaves are constants. This crate covers the
//! lexical layer and the role semantics that a parser and graph library build
//! on.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`types`] | [`Triple`] and the [`Identifier`], [`Role`], [`Constant`] aliases |
//! | [`lexer`] | Tokenizer for graph notation and triple notation |
//! | [`cursor`] | [`TokenCursor`]: one-token lookahead with `expect`/`accept` |
//! | [`model`] | [`Model`]: role legality, inversion, canonicalization, reification |
//! | [`triples`] | Reading and writing `role(source, target) ^ ...` conjunctions |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use penman::{tokenize, Grammar, Model, Triple};
//!
//! for token in tokenize("(a / alpha :ARG0-of b)", Grammar::Graph) {
//!     let token = token?;
//!     println!("{} {:?}", token.kind, token.value);
//! }
//!
//! let model = Model::from_json(r#"{"roles": {":ARG0": {}}}"#)?;
//! let t = model.deinvert(&Triple::new("a", ":ARG0-of", "b"));
//! assert_eq!(t, Triple::new("b", ":ARG0", "a"));
//! ```

pub mod cursor;
pub mod lexer;
pub mod model;
pub mod triples;
pub mod types;

pub use cursor::{SyntaxError, TokenCursor};
pub use lexer::{tokenize, tokenize_lines, Grammar, LexError, Lexer, Span, Token, TokenKind};
pub use model::{Model, ModelConfig, ModelError, Reification};
pub use triples::{read_triples, write_triples};
pub use types::{Constant, Identifier, Role, Triple};
