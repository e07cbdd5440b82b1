//! Lexer for shell UI sources
//!
//! The lexer converts JavaScript-family source code into a stream of tokens,
//! handling:
//! - Declaration keywords, identifiers, numbers and punctuation
//! - String, template and regular expression literals (scanned by hand so
//!   their contents never leak braces or quotes into the token stream)
//! - Line, block and documentation comments
//! - Source location tracking
//!
//! Only the errors that make structure unrecoverable are reported:
//! unterminated block comments and unterminated strings.

#![allow(clippy::cast_possible_truncation)] // Spans are u32; sources over 4GB are not documented

mod span;
mod token;

pub use span::{LineIndex, Location, Span};
pub use token::TokenKind;

use logos::Logos;
use thiserror::Error;

/// A token with its kind, span, and source text
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The span in the source code
    pub span: Span,
    /// The source text of the token
    pub lexeme: String,
}

impl Token {
    /// Create a new token
    #[must_use]
    pub fn new(kind: TokenKind, span: Span, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            lexeme: lexeme.into(),
        }
    }
}

/// Lexer error types
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("unterminated string literal")]
    UnterminatedString,
}

/// A lexer error with location information
#[derive(Debug, Clone)]
pub struct SpannedError {
    pub error: LexError,
    pub span: Span,
}

impl SpannedError {
    #[must_use]
    pub fn new(error: LexError, span: Span) -> Self {
        Self { error, span }
    }
}

impl std::fmt::Display for SpannedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.error, self.span)
    }
}

impl std::error::Error for SpannedError {}

/// The shelldoc lexer
pub struct Lexer<'source> {
    source: &'source str,
    /// Current position in the source (byte offset)
    position: usize,
    /// Collected errors during lexing
    errors: Vec<SpannedError>,
    /// Whether a `/` here would start an expression (a regex literal)
    regex_allowed: bool,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given source code
    #[must_use]
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            position: 0,
            errors: Vec::new(),
            regex_allowed: true,
        }
    }

    /// Tokenize the entire source, returning all tokens and any errors
    ///
    /// The token list always ends with [`TokenKind::Eof`].
    #[must_use]
    pub fn tokenize(source: &str) -> (Vec<Token>, Vec<SpannedError>) {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.collect_all();
        (tokens, lexer.errors)
    }

    /// Collect all tokens from the source
    fn collect_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Token {
        let token = self.scan_token();
        if !token.kind.is_trivia() {
            self.regex_allowed = regex_may_follow(&token);
        }
        token
    }

    fn scan_token(&mut self) -> Token {
        if self.position >= self.source.len() {
            return self.eof();
        }

        let remaining = &self.source[self.position..];
        let mut logos_lexer = TokenKind::lexer(remaining);

        match logos_lexer.next() {
            Some(Ok(kind)) => {
                let span_range = logos_lexer.span();
                // span_range is relative to remaining slice, accounting for skipped whitespace
                let start = self.position + span_range.start;
                let end = self.position + span_range.end;

                match kind {
                    TokenKind::CommentStart => self.lex_block_comment(start),
                    TokenKind::DoubleQuote => self.lex_string(start, '"'),
                    TokenKind::SingleQuote => self.lex_string(start, '\''),
                    TokenKind::Backtick => self.lex_string(start, '`'),
                    TokenKind::Slash if self.regex_allowed => match self.lex_regex(start) {
                        Some(token) => token,
                        None => {
                            self.position = end;
                            Token::new(kind, Span::between(start, end), "/")
                        }
                    },
                    _ => {
                        self.position = end;
                        Token::new(kind, Span::between(start, end), logos_lexer.slice())
                    }
                }
            }
            Some(Err(())) => {
                // Unknown characters carry no structure; skip them
                let span_range = logos_lexer.span();
                let start = self.position + span_range.start;
                let end = (self.position + span_range.end).max(start + 1);
                let end = self.char_boundary(end);
                self.position = end;
                Token::new(
                    TokenKind::Error,
                    Span::between(start, end),
                    &self.source[start..end],
                )
            }
            None => {
                self.position = self.source.len();
                self.eof()
            }
        }
    }

    /// Scan a block comment that starts at `start` (the `/*`)
    fn lex_block_comment(&mut self, start: usize) -> Token {
        let body_start = start + 2;
        match self.source[body_start..].find("*/") {
            Some(offset) => {
                let end = body_start + offset + 2;
                self.position = end;
                let text = &self.source[start..end];
                let kind = if is_doc_comment(text) {
                    TokenKind::DocComment
                } else {
                    TokenKind::BlockComment
                };
                Token::new(kind, Span::between(start, end), text)
            }
            None => self.unterminated(start, LexError::UnterminatedComment),
        }
    }

    /// Scan a string literal whose opening quote is at `start`
    ///
    /// Quoted strings end at a newline; template literals may span lines.
    fn lex_string(&mut self, start: usize, quote: char) -> Token {
        let mut chars = self.source[start + 1..].char_indices();

        while let Some((offset, c)) = chars.next() {
            match c {
                '\\' => {
                    chars.next();
                }
                '\n' if quote != '`' => {
                    let end = start + 1 + offset;
                    self.errors.push(SpannedError::new(
                        LexError::UnterminatedString,
                        Span::between(start, end),
                    ));
                    self.position = self.source.len();
                    return Token::new(
                        TokenKind::Error,
                        Span::between(start, end),
                        &self.source[start..end],
                    );
                }
                c if c == quote => {
                    let end = start + 1 + offset + 1;
                    self.position = end;
                    return Token::new(
                        TokenKind::Str,
                        Span::between(start, end),
                        &self.source[start..end],
                    );
                }
                _ => {}
            }
        }

        self.unterminated(start, LexError::UnterminatedString)
    }

    /// Record an error that runs to the end of input and stop lexing
    fn unterminated(&mut self, start: usize, error: LexError) -> Token {
        let end = self.source.len();
        self.errors
            .push(SpannedError::new(error, Span::between(start, end)));
        self.position = end;
        Token::new(
            TokenKind::Error,
            Span::between(start, end),
            &self.source[start..end],
        )
    }

    fn eof(&self) -> Token {
        let end = self.source.len();
        Token::new(TokenKind::Eof, Span::between(end, end), "")
    }

    fn char_boundary(&self, mut index: usize) -> usize {
        while index < self.source.len() && !self.source.is_char_boundary(index) {
            index += 1;
        }
        index.min(self.source.len())
    }

    /// Scan a regular expression literal whose opening `/` is at `start`
    ///
    /// Returns `None` when no closing `/` appears on the same line; the caller
    /// then treats the slash as division.
    fn lex_regex(&mut self, start: usize) -> Option<Token> {
        let mut chars = self.source[start + 1..].char_indices();
        let mut in_class = false;
        let close = loop {
            let (offset, c) = chars.next()?;
            match c {
                '\n' | '\r' => return None,
                '\\' => {
                    if matches!(chars.next(), None | Some((_, '\n' | '\r'))) {
                        return None;
                    }
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break offset,
                _ => {}
            }
        };

        let body_end = start + 1 + close + 1;
        let flags = self.source[body_end..]
            .bytes()
            .take_while(u8::is_ascii_alphabetic)
            .count();
        let end = body_end + flags;
        self.position = end;
        Some(Token::new(
            TokenKind::Regex,
            Span::between(start, end),
            &self.source[start..end],
        ))
    }
}

/// Words after which a `/` starts an expression rather than dividing
const EXPRESSION_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case",
    "do", "else", "yield", "await",
];

/// Whether a `/` following `token` opens a regular expression literal
fn regex_may_follow(token: &Token) -> bool {
    match token.kind {
        TokenKind::Ident => EXPRESSION_KEYWORDS.contains(&token.lexeme.as_str()),
        TokenKind::Number
        | TokenKind::Str
        | TokenKind::Regex
        | TokenKind::RParen
        | TokenKind::RBracket
        | TokenKind::Dot
        | TokenKind::Class
        | TokenKind::Function
        | TokenKind::Var
        | TokenKind::Let
        | TokenKind::Const
        | TokenKind::Export
        | TokenKind::Error => false,
        _ => true,
    }
}

/// `/** ... */` is documentation; `/**/` and `/*** banners ***/` are not
fn is_doc_comment(text: &str) -> bool {
    text.starts_with("/**") && !text.starts_with("/***") && text.len() > 4
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, errors) = Lexer::tokenize(source);
        assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_declaration_keywords() {
        assert_eq!(
            lex_kinds("class function var let const export extends"),
            vec![
                TokenKind::Class,
                TokenKind::Function,
                TokenKind::Var,
                TokenKind::Let,
                TokenKind::Const,
                TokenKind::Export,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lex_identifiers() {
        let (tokens, _) = Lexer::tokenize("_init $el classes Über");
        let lexemes: Vec<_> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["_init", "$el", "classes", "Über", ""]);
        assert!(tokens[..4].iter().all(|t| t.kind == TokenKind::Ident));
    }

    #[test]
    fn lex_method_header() {
        assert_eq!(
            lex_kinds("bar(x: int) -> bool {"),
            vec![
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Ident,
                TokenKind::RParen,
                TokenKind::Arrow,
                TokenKind::Ident,
                TokenKind::LBrace,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lex_operators() {
        assert_eq!(
            lex_kinds("a == b => c ... d ? e"),
            vec![
                TokenKind::Ident,
                TokenKind::Op,
                TokenKind::Ident,
                TokenKind::FatArrow,
                TokenKind::Ident,
                TokenKind::Ellipsis,
                TokenKind::Ident,
                TokenKind::Question,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lex_comments() {
        assert_eq!(
            lex_kinds("foo // comment\n/* block */ /** doc */ /**/"),
            vec![
                TokenKind::Ident,
                TokenKind::LineComment,
                TokenKind::Newline,
                TokenKind::BlockComment,
                TokenKind::DocComment,
                TokenKind::BlockComment,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lex_multiline_doc_comment() {
        let (tokens, errors) = Lexer::tokenize("/**\n * Summary.\n * @param x value\n */\nfoo");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::DocComment);
        assert!(tokens[0].lexeme.ends_with("*/"));
        assert_eq!(tokens[1].kind, TokenKind::Newline);
        assert_eq!(tokens[2].lexeme, "foo");
    }

    #[test]
    fn strings_hide_braces() {
        assert_eq!(
            lex_kinds(r#"a = "{" + '}' + `${x}`"#),
            vec![
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::Str,
                TokenKind::Op,
                TokenKind::Str,
                TokenKind::Op,
                TokenKind::Str,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn string_escapes() {
        let (tokens, errors) = Lexer::tokenize(r#"'it\'s' "say \"hi\"""#);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].lexeme, r"'it\'s'");
        assert_eq!(tokens[1].lexeme, r#""say \"hi\"""#);
    }

    #[test]
    fn template_literal_spans_lines() {
        let (tokens, errors) = Lexer::tokenize("`line one\nline two` x");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[1].lexeme, "x");
    }

    #[test]
    fn regex_literals_hide_quotes_and_braces() {
        let (tokens, errors) = Lexer::tokenize(r#"return s.replace(/"/g, '&quot;');"#);
        assert!(errors.is_empty(), "{errors:?}");
        let regex = tokens.iter().find(|t| t.kind == TokenKind::Regex).map(|t| t.lexeme.as_str());
        assert_eq!(regex, Some(r#"/"/g"#));

        assert_eq!(
            lex_kinds(r"const RE = /^\s*\{[/}]/;"),
            vec![
                TokenKind::Const,
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::Regex,
                TokenKind::Semicolon,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn slash_after_operand_is_division() {
        assert_eq!(
            lex_kinds("x = a / b / c;"),
            vec![
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::Ident,
                TokenKind::Slash,
                TokenKind::Ident,
                TokenKind::Slash,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Eof
            ]
        );
        assert_eq!(
            lex_kinds("f(n) / 2"),
            vec![
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::RParen,
                TokenKind::Slash,
                TokenKind::Number,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn unclosed_regex_falls_back_to_slash() {
        let kinds = lex_kinds("x = /oops\ny");
        assert_eq!(kinds[2], TokenKind::Slash);
        assert_eq!(kinds.last(), Some(&TokenKind::Eof));
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let (tokens, errors) = Lexer::tokenize("class A {}\n/* never closed\nclass B {}");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error, LexError::UnterminatedComment);
        assert_eq!(errors[0].span.start, 11);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let (_, errors) = Lexer::tokenize("let s = 'oops\nlet t = 1;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error, LexError::UnterminatedString);
    }

    #[test]
    fn unknown_characters_are_skipped() {
        let (tokens, errors) = Lexer::tokenize("a \\ b");
        assert!(errors.is_empty());
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident,
                TokenKind::Error,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn spans_are_correct() {
        let (tokens, _) = Lexer::tokenize("let foo");
        assert_eq!(tokens[0].span, Span::new(0, 3));
        assert_eq!(tokens[1].span, Span::new(4, 7));
    }
}
