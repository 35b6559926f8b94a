//! Lexical analysis for PENMAN graph notation and triple notation.
//!
//! The lexer works one line at a time. At each position it tries the active
//! [`Grammar`]'s rules in order and the first rule that matches wins, so rule
//! order encodes precedence (e.g. `FLOAT` before `INTEGER`). Whitespace is
//! skipped and never produces a token. A position no rule matches is a
//! [`LexError`] and ends the token stream.
//!
//! ```rust,ignore
//! use penman::lexer::{tokenize, Grammar, TokenKind};
//!
//! let kinds: Vec<TokenKind> = tokenize("(a / alpha)", Grammar::Graph)
//!     .map(|t| t.map(|t| t.kind))
//!     .collect::<Result<_, _>>()?;
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when the input contains text no rule of the active grammar matches.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unexpected input {text:?} at line {line}, column {column}")]
pub struct LexError {
    /// 1-based line number.
    pub line: usize,
    /// 1-based character column.
    pub column: usize,
    /// The offending character.
    pub text: String,
    /// The full line the error occurred on.
    pub source_line: String,
}

/// Which lexical grammar is active.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    /// Bracketed graph notation: `(a / alpha :ARG0 (b / beta))`.
    #[default]
    Graph,
    /// Conjunctions of triples: `instance(a, alpha) ^ ARG0(a, b)`.
    Triples,
}

impl std::fmt::Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grammar::Graph => write!(f, "graph"),
            Grammar::Triples => write!(f, "triples"),
        }
    }
}

impl std::str::FromStr for Grammar {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "graph" => Ok(Grammar::Graph),
            "triples" => Ok(Grammar::Triples),
            _ => Err(format!(
                "unknown grammar {:?}; expected one of: graph, triples",
                s
            )),
        }
    }
}

/// The type tag of a [`Token`].
///
/// Serialises as an upper snake_case string (e.g. `"LPAREN"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Lparen,
    Rparen,
    Slash,
    Role,
    Symbol,
    String,
    Integer,
    Float,
    /// `~e.1,2`, attached after the symbol or role it annotates.
    Alignment,
    /// `# ...` to end of line (graph notation only).
    Comment,
    Comma,
    /// Separator between triples in a conjunction.
    Caret,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Lparen => "LPAREN",
            TokenKind::Rparen => "RPAREN",
            TokenKind::Slash => "SLASH",
            TokenKind::Role => "ROLE",
            TokenKind::Symbol => "SYMBOL",
            TokenKind::String => "STRING",
            TokenKind::Integer => "INTEGER",
            TokenKind::Float => "FLOAT",
            TokenKind::Alignment => "ALIGNMENT",
            TokenKind::Comment => "COMMENT",
            TokenKind::Comma => "COMMA",
            TokenKind::Caret => "CARET",
        };
        f.write_str(name)
    }
}

/// Where a token sits in the source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    /// 1-based line number.
    pub line: usize,
    /// 1-based character column of the first character.
    pub column: usize,
    /// Character column one past the last character.
    pub end_column: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A classified lexical unit. `value` is the raw matched text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

/// Tokenize a single string. Lines are split on `\n`.
pub fn tokenize(text: &str, grammar: Grammar) -> Lexer<std::str::Split<'_, char>> {
    Lexer::new(text.split('\n'), grammar)
}

/// Tokenize a sequence of lines as if they were joined by `\n`.
///
/// Lines are pulled from `lines` only as tokens are requested.
pub fn tokenize_lines<I, S>(lines: I, grammar: Grammar) -> Lexer<impl Iterator<Item = String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    // an item containing newlines still counts as several lines
    let lines = lines.into_iter().flat_map(|chunk| {
        chunk
            .as_ref()
            .split('\n')
            .map(str::to_owned)
            .collect::<Vec<_>>()
    });
    Lexer::new(lines, grammar)
}

/// A lazy, single-pass token stream over a sequence of lines.
///
/// Yields `Ok(token)` until the input is exhausted, or a single `Err` at the
/// first unlexable position after which the stream ends. Re-tokenize the input
/// for a second pass.
pub struct Lexer<L: Iterator> {
    lines: L,
    grammar: Grammar,
    line: Option<L::Item>,
    line_no: usize,
    offset: usize,
    /// Character column of `offset`, 0-based.
    column: usize,
    done: bool,
}

impl<L, S> Lexer<L>
where
    L: Iterator<Item = S>,
    S: AsRef<str>,
{
    pub fn new(lines: L, grammar: Grammar) -> Self {
        Self {
            lines,
            grammar,
            line: None,
            line_no: 0,
            offset: 0,
            column: 0,
            done: false,
        }
    }
}

impl<L, S> Iterator for Lexer<L>
where
    L: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let step = match &self.line {
                Some(line) => scan(
                    self.grammar,
                    line.as_ref(),
                    self.line_no,
                    self.offset,
                    self.column,
                ),
                None => match self.lines.next() {
                    Some(line) => {
                        self.line = Some(line);
                        self.line_no += 1;
                        self.offset = 0;
                        self.column = 0;
                        continue;
                    }
                    None => {
                        self.done = true;
                        return None;
                    }
                },
            };
            match step {
                Step::Token(token, end) => {
                    self.offset = end;
                    self.column = token.span.end_column - 1;
                    tracing::trace!(kind = %token.kind, value = %token.value, span = %token.span, "token");
                    return Some(Ok(token));
                }
                Step::EndOfLine => self.line = None,
                Step::Error(e) => {
                    tracing::debug!(line = e.line, column = e.column, "lexical error");
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

// --- scanning ----------------------------------------------------------------

enum Step {
    /// A token and the byte offset just past it.
    Token(Token, usize),
    EndOfLine,
    Error(LexError),
}

struct Rule {
    kind: TokenKind,
    re: Regex,
    /// Numeric rules only match when followed by a character that cannot
    /// continue a symbol, so `1abc` lexes as one SYMBOL.
    bounded: bool,
}

struct RuleSet {
    rules: Vec<Rule>,
    symbol_char: fn(char) -> bool,
}

fn rule(kind: TokenKind, pattern: &str) -> Rule {
    Rule {
        kind,
        re: Regex::new(&format!("^(?:{pattern})")).expect("invalid token regex"),
        bounded: matches!(kind, TokenKind::Integer | TokenKind::Float),
    }
}

const FLOAT: &str = r"[-+]?(?:\d+\.\d*(?:[eE][-+]?\d+)?|\.\d+(?:[eE][-+]?\d+)?|\d+[eE][-+]?\d+)";
const INTEGER: &str = r"[-+]?\d+";
const STRING: &str = r#""[^"\\]*(?:\\.[^"\\]*)*""#;

fn graph_symbol_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '/' | ':' | '~' | '"')
}

fn triple_symbol_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | ',' | '^' | '"')
}

static GRAPH_RULES: LazyLock<RuleSet> = LazyLock::new(|| RuleSet {
    rules: vec![
        rule(TokenKind::Comment, r"#.*"),
        rule(TokenKind::Lparen, r"\("),
        rule(TokenKind::Rparen, r"\)"),
        rule(TokenKind::Slash, r"/"),
        rule(TokenKind::Role, r#":[^\s()/:~"]*"#),
        rule(TokenKind::Float, FLOAT),
        rule(TokenKind::Integer, INTEGER),
        rule(TokenKind::String, STRING),
        rule(TokenKind::Symbol, r#"[^\s()/:~"]+"#),
        rule(TokenKind::Alignment, r"~(?:[a-zA-Z]\.?)?\d+(?:,\d+)*"),
    ],
    symbol_char: graph_symbol_char,
});

static TRIPLE_RULES: LazyLock<RuleSet> = LazyLock::new(|| RuleSet {
    rules: vec![
        rule(TokenKind::Lparen, r"\("),
        rule(TokenKind::Rparen, r"\)"),
        rule(TokenKind::Comma, r","),
        rule(TokenKind::Caret, r"\^"),
        rule(TokenKind::String, STRING),
        rule(TokenKind::Float, FLOAT),
        rule(TokenKind::Integer, INTEGER),
        rule(TokenKind::Symbol, r#"[^\s(),\^"]+"#),
    ],
    symbol_char: triple_symbol_char,
});

fn rules_for(grammar: Grammar) -> &'static RuleSet {
    match grammar {
        Grammar::Graph => &GRAPH_RULES,
        Grammar::Triples => &TRIPLE_RULES,
    }
}

/// Skip whitespace from byte `offset` (character column `column`, 0-based)
/// and try to lex one token from `line`.
fn scan(grammar: Grammar, line: &str, line_no: usize, offset: usize, column: usize) -> Step {
    let start = match line[offset..].find(|c: char| !c.is_whitespace()) {
        Some(skip) => offset + skip,
        None => return Step::EndOfLine,
    };
    let column = column + line[offset..start].chars().count() + 1;
    let rest = &line[start..];
    let set = rules_for(grammar);

    for rule in &set.rules {
        let Some(m) = rule.re.find(rest) else {
            continue;
        };
        if m.end() == 0 {
            continue;
        }
        if rule.bounded && rest[m.end()..].chars().next().is_some_and(set.symbol_char) {
            continue;
        }
        let value = m.as_str().to_string();
        let span = Span {
            line: line_no,
            column,
            end_column: column + value.chars().count(),
        };
        let token = Token {
            kind: rule.kind,
            value,
            span,
        };
        return Step::Token(token, start + m.end());
    }

    Step::Error(LexError {
        line: line_no,
        column,
        text: rest.chars().next().map(String::from).unwrap_or_default(),
        source_line: line.to_string(),
    })
}

// --- tests -------------------------------------------------------------------
