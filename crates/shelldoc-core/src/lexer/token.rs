//! Token types for the shelldoc lexer

use logos::Logos;

/// The kind of token produced by the lexer
///
/// Only the words that introduce declarations are keywords. Contextual words
/// such as `static`, `get` or `extends` lex as [`TokenKind::Ident`] and are
/// matched by their lexeme, since they are also valid member names.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f\u{feff}]+")]
pub enum TokenKind {
    // ========== Keywords ==========
    #[token("class")]
    Class,
    #[token("function")]
    Function,
    #[token("var")]
    Var,
    #[token("let")]
    Let,
    #[token("const")]
    Const,
    #[token("export")]
    Export,

    // ========== Literals ==========
    #[regex(r"[\p{XID_Start}_$][\p{XID_Continue}$]*", priority = 3)]
    Ident,

    #[regex(r"[0-9][0-9A-Za-z_.]*")]
    Number,

    /// A complete string or template literal (produced by the lexer's string mode)
    Str,

    /// A regular expression literal such as `/^\s*\{/g`
    Regex,

    // ========== Delimiters ==========
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,

    // ========== Operators ==========
    #[token("=")]
    Eq,
    #[token("->")]
    Arrow,
    #[token("=>")]
    FatArrow,
    #[token("?")]
    Question,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    /// Any other run of operator characters (`==`, `<`, `>>`, `&&`, ...)
    #[regex(r"[-+%&|^!~<>=?@#]+", priority = 1)]
    Op,

    // ========== String and comment openers (expanded by the lexer) ==========
    #[token("\"")]
    DoubleQuote,
    #[token("'")]
    SingleQuote,
    #[token("`")]
    Backtick,
    #[token("/*")]
    CommentStart,

    // ========== Comments ==========
    /// Line comment: // ...
    #[regex(r"//[^\n]*")]
    LineComment,

    /// Block comment: /* ... */
    BlockComment,

    /// Documentation comment: /** ... */
    DocComment,

    // ========== Special ==========
    #[token("\n")]
    Newline,

    /// End of file (added by lexer, not matched by logos)
    Eof,

    /// Character the lexer does not recognize
    Error,
}

impl TokenKind {
    /// Returns true for tokens that never affect declaration structure
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(
            self,
            Self::LineComment | Self::BlockComment | Self::DocComment | Self::Newline
        )
    }

    /// Returns true for tokens that may name a class member
    ///
    /// Keywords are valid property names (`default()`, `class: 'foo'`).
    #[must_use]
    pub const fn is_word(&self) -> bool {
        matches!(
            self,
            Self::Ident
                | Self::Class
                | Self::Function
                | Self::Var
                | Self::Let
                | Self::Const
                | Self::Export
        )
    }

    /// Net change in bracket nesting depth
    #[must_use]
    pub const fn depth_delta(&self) -> i32 {
        match self {
            Self::LParen | Self::LBracket | Self::LBrace => 1,
            Self::RParen | Self::RBracket | Self::RBrace => -1,
            _ => 0,
        }
    }

    /// Net change in angle bracket depth, counted from operator lexemes
    ///
    /// Kept apart from [`TokenKind::depth_delta`] because a comparison can
    /// unbalance it. It only keeps the comma in `Map<K, V>` out of a
    /// parameter split.
    #[must_use]
    pub fn angle_delta(&self, lexeme: &str) -> i32 {
        if *self != Self::Op {
            return 0;
        }
        let opens = lexeme.matches('<').count();
        let closes = lexeme.matches('>').count();
        i32::try_from(opens).unwrap_or(i32::MAX) - i32::try_from(closes).unwrap_or(i32::MAX)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Class => "class",
            Self::Function => "function",
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
            Self::Export => "export",
            Self::Ident => "identifier",
            Self::Number => "number",
            Self::Str => "string",
            Self::Regex => "regular expression",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::Dot => ".",
            Self::Ellipsis => "...",
            Self::Eq => "=",
            Self::Arrow => "->",
            Self::FatArrow => "=>",
            Self::Question => "?",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Op => "operator",
            Self::DoubleQuote => "\"",
            Self::SingleQuote => "'",
            Self::Backtick => "`",
            Self::CommentStart => "/*",
            Self::LineComment => "line comment",
            Self::BlockComment => "block comment",
            Self::DocComment => "doc comment",
            Self::Newline => "newline",
            Self::Eof => "end of file",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}
