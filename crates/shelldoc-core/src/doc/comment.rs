//! Documentation comment parsing
//!
//! Parsing happens in two passes. [`tokenize`] flattens one `/** ... */`
//! block into tagged values, and [`DocBlock::from_tokens`] gives those values
//! structure. Both JSDoc (`@param {int} x - desc`) and gtk-doc
//! (`@x (int): desc`, `Returns: desc`) annotations are understood.

use std::sync::OnceLock;

use regex::Regex;

use super::types::{Parameter, Returns, Tag};

/// The tag a comment value belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockTag {
    /// Free text outside any tag; one token per paragraph
    Summary,
    Param,
    Returns,
    Type,
    /// `@module`, `@file`, `@fileoverview` or a gtk-doc `SECTION:` header
    Module,
    /// Any other tag, lowercased without the `@`
    Other(String),
}

/// One tagged value from a doc comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockToken {
    pub tag: BlockTag,
    /// Text after the tag, continuation lines joined with a space
    pub value: String,
    /// The tag as written, used when the value turns out to be malformed
    pub raw: String,
}

impl BlockToken {
    fn new(tag: BlockTag, value: &str, raw: &str) -> Self {
        Self {
            tag,
            value: value.trim().to_string(),
            raw: raw.trim().to_string(),
        }
    }

    fn push_line(&mut self, line: &str) {
        let separator = if self.tag == BlockTag::Summary { '\n' } else { ' ' };
        for text in [&mut self.value, &mut self.raw] {
            if !text.is_empty() {
                text.push(separator);
            }
            text.push_str(line);
        }
    }
}

/// gtk-doc section keys; these are never parameters
const SECTION_KEYS: &[&str] = &[
    "short_description",
    "title",
    "see_also",
    "stability",
    "include",
    "section_id",
];

/// Tag words that are never gtk-doc parameter names, even as `@word:`
const NOTE_TAGS: &[&str] = &[
    "since",
    "deprecated",
    "see",
    "throws",
    "exception",
    "example",
    "author",
    "version",
    "todo",
    "note",
    "private",
    "override",
    "default",
];

/// Split one documentation comment into tagged values
///
/// Blank lines end the current tag. Text after a closed tag starts a new
/// summary paragraph.
pub fn tokenize(comment: &str) -> Vec<BlockToken> {
    let body = comment.trim();
    let body = body.strip_prefix("/**").unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body);

    let mut tokens = Vec::new();
    let mut current: Option<BlockToken> = None;
    let mut seen_text = false;

    for line in body.lines() {
        let line = clean_line(line);

        if line.is_empty() {
            if let Some(token) = current.take() {
                tokens.push(token);
            }
            continue;
        }

        let first_line = !seen_text;
        seen_text = true;

        if first_line {
            if let Some(section) = line.strip_prefix("SECTION:") {
                tokens.push(BlockToken::new(BlockTag::Module, section, &line));
                continue;
            }
            if is_symbol_header(&line) {
                continue;
            }
        }

        if let Some(started) = start_tag(&line) {
            if let Some(token) = current.take() {
                tokens.push(token);
            }
            let mut started = started.into_iter();
            current = started.next_back();
            tokens.extend(started);
            continue;
        }

        match current.as_mut() {
            Some(token) => token.push_line(&line),
            None => current = Some(BlockToken::new(BlockTag::Summary, &line, &line)),
        }
    }

    if let Some(token) = current {
        tokens.push(token);
    }
    tokens
}

/// Strip the leading ` * ` decoration, surrounding space and control characters
fn clean_line(line: &str) -> String {
    let line = line.trim();
    let line = line.strip_prefix('*').unwrap_or(line);
    line.chars()
        .map(|c| if c == '\t' { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// A gtk-doc symbol line such as `my_function:` that opens the comment
fn is_symbol_header(line: &str) -> bool {
    line.strip_suffix(':').is_some_and(|name| {
        !name.is_empty()
            && !name.starts_with(|c: char| c.is_ascii_digit())
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '.' | ':'))
    })
}

/// Recognize a line that starts a new tag
///
/// Returns the tokens the line opens; the last one collects continuation
/// lines. `@file Summary text` opens two.
fn start_tag(line: &str) -> Option<Vec<BlockToken>> {
    if let Some(rest) = line.strip_prefix('@') {
        let word_len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
            .unwrap_or(rest.len());
        if word_len == 0 {
            return None;
        }
        let (word, after) = rest.split_at(word_len);
        let lower = word.to_lowercase();

        let token = match lower.as_str() {
            "param" | "arg" | "argument" => BlockToken::new(BlockTag::Param, after, line),
            "return" | "returns" => BlockToken::new(BlockTag::Returns, after, line),
            "type" => BlockToken::new(BlockTag::Type, after, line),
            "module" => BlockToken::new(BlockTag::Module, after, line),
            "file" | "fileoverview" => {
                let mut opened = vec![BlockToken::new(BlockTag::Module, "", line)];
                let summary = after.trim();
                if !summary.is_empty() {
                    opened.push(BlockToken::new(BlockTag::Summary, summary, summary));
                }
                return Some(opened);
            }
            key if SECTION_KEYS.contains(&key) || NOTE_TAGS.contains(&key) => {
                BlockToken::new(BlockTag::Other(lower.clone()), strip_colon(after), line)
            }
            _ if is_gtk_param(after) => BlockToken::new(BlockTag::Param, rest, line),
            _ => BlockToken::new(BlockTag::Other(lower.clone()), strip_colon(after), line),
        };
        return Some(vec![token]);
    }

    for (prefix, tag) in [
        ("Returns", BlockTag::Returns),
        ("Return value", BlockTag::Returns),
        ("Since", BlockTag::Other("since".to_string())),
        ("Deprecated", BlockTag::Other("deprecated".to_string())),
    ] {
        if let Some(after) = line.strip_prefix(prefix) {
            if is_gtk_param(after) {
                let value = if tag == BlockTag::Returns {
                    after
                } else {
                    strip_colon(after)
                };
                return Some(vec![BlockToken::new(tag, value, line)]);
            }
        }
    }

    None
}

/// Text after a gtk-doc name: `:` or ` (type):`
fn is_gtk_param(after: &str) -> bool {
    let after = after.trim_start();
    if after.starts_with(':') {
        return true;
    }
    after
        .strip_prefix('(')
        .and_then(|inner| inner.find(')').map(|end| &inner[end + 1..]))
        .is_some_and(|tail| tail.trim_start().starts_with(':'))
}

fn strip_colon(text: &str) -> &str {
    let text = text.trim_start();
    text.strip_prefix(':').unwrap_or(text)
}

/// Structured documentation for one declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    /// Paragraphs separated by blank lines
    pub summary: String,
    pub params: Vec<Parameter>,
    pub returns: Option<Returns>,
    pub type_hint: Option<String>,
    pub tags: Vec<Tag>,
    /// Documents the file rather than the next declaration
    pub module_level: bool,
}

impl DocBlock {
    /// Parse a raw `/** ... */` comment
    pub fn parse(comment: &str) -> Self {
        Self::from_tokens(tokenize(comment))
    }

    /// Group tagged values into a block
    ///
    /// Malformed params and returns are never dropped: their text is kept in
    /// the summary as written.
    pub fn from_tokens(tokens: impl IntoIterator<Item = BlockToken>) -> Self {
        let mut block = DocBlock::default();
        let mut paragraphs: Vec<String> = Vec::new();

        for token in tokens {
            match token.tag {
                BlockTag::Summary => paragraphs.push(token.value),
                BlockTag::Param => match parse_param(&token.value) {
                    Some(param) => block.params.push(param),
                    None => paragraphs.push(token.raw),
                },
                BlockTag::Returns => match parse_returns(&token.value) {
                    Some(returns) => block.returns = Some(returns),
                    None => paragraphs.push(token.raw),
                },
                BlockTag::Type => {
                    let ty = strip_delimiters(&token.value, '{', '}');
                    if !ty.is_empty() {
                        block.type_hint = Some(ty.to_string());
                    }
                }
                BlockTag::Module => block.module_level = true,
                BlockTag::Other(name) => block.tags.push(Tag {
                    name,
                    value: token.value,
                }),
            }
        }

        block.summary = paragraphs.join("\n\n");
        block
    }
}

fn pattern(cell: &'static OnceLock<Option<Regex>>, source: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(source).ok()).as_ref()
}

fn gtk_param_pattern() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    pattern(
        &CELL,
        r"^(?P<name>[\w$]+)\s*(?:\((?P<ty>[^)]*)\))?\s*:\s*(?P<desc>.*)$",
    )
}

fn jsdoc_param_pattern() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    pattern(
        &CELL,
        r"^(?:\{(?P<ty>[^}]*)\}\s*)?(?P<name>\[[^\]]*\]|[\w$.]+)\s*(?:-\s*)?(?P<desc>.*)$",
    )
}

/// Parse `name (type): desc`, `name: desc` or `{type} name [-] desc`
fn parse_param(value: &str) -> Option<Parameter> {
    let value = value.trim();
    let captures = gtk_param_pattern()
        .and_then(|re| re.captures(value))
        .or_else(|| jsdoc_param_pattern().and_then(|re| re.captures(value)))?;

    let name = captures.name("name").map_or("", |m| m.as_str());
    let name = strip_delimiters(name, '[', ']');
    let name = name.split('=').next().unwrap_or_default().trim();
    let description = captures.name("desc").map_or("", |m| m.as_str()).trim();
    if name.is_empty() || description.is_empty() {
        return None;
    }

    let mut param = Parameter::new(name).with_description(description);
    if let Some(ty) = captures.name("ty").map(|m| m.as_str().trim()) {
        if !ty.is_empty() {
            param = param.with_type(ty);
        }
    }
    Some(param)
}

/// Parse `{type} desc`, `(type): desc`, `: desc` or `desc`
fn parse_returns(value: &str) -> Option<Returns> {
    let mut rest = strip_colon(value).trim_start();
    let mut type_hint = None;

    for (open, close) in [('{', '}'), ('(', ')')] {
        if let Some(inner) = rest.strip_prefix(open) {
            if let Some(end) = inner.find(close) {
                let ty = inner[..end].trim();
                if !ty.is_empty() {
                    type_hint = Some(ty.to_string());
                }
                rest = &inner[end + 1..];
                break;
            }
        }
    }

    let description = strip_colon(rest).trim();
    if type_hint.is_none() && description.is_empty() {
        return None;
    }
    Some(Returns {
        type_hint,
        description: description.to_string(),
    })
}

fn strip_delimiters(text: &str, open: char, close: char) -> &str {
    let text = text.trim();
    text.strip_prefix(open)
        .and_then(|t| t.strip_suffix(close))
        .unwrap_or(text)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(comment: &str) -> Vec<(BlockTag, String)> {
        tokenize(comment)
            .into_iter()
            .map(|t| (t.tag, t.value))
            .collect()
    }

    #[test]
    fn tokenize_jsdoc() {
        let comment = "/**\n * Adds two numbers.\n *\n * @param {int} a - first\n * @param {int} b - second\n *   operand\n * @returns {int} the sum\n */";
        assert_eq!(
            tags(comment),
            vec![
                (BlockTag::Summary, "Adds two numbers.".to_string()),
                (BlockTag::Param, "{int} a - first".to_string()),
                (BlockTag::Param, "{int} b - second operand".to_string()),
                (BlockTag::Returns, "{int} the sum".to_string()),
            ]
        );
    }

    #[test]
    fn tokenize_single_line() {
        assert_eq!(
            tags("/** Current volume. @type {number} */"),
            vec![(BlockTag::Summary, "Current volume. @type {number}".to_string())]
        );
        assert_eq!(
            tags("/** @type {number} */"),
            vec![(BlockTag::Type, "{number}".to_string())]
        );
    }

    #[test]
    fn tokenize_gtk_doc() {
        let comment = "/**\n * show_menu:\n * @menu (PopupMenu): the menu to show\n * @animate: whether to animate\n *\n * Shows the menu.\n *\n * Returns (boolean): %true on success\n * Since: 4.2\n */";
        assert_eq!(
            tags(comment),
            vec![
                (BlockTag::Param, "menu (PopupMenu): the menu to show".to_string()),
                (BlockTag::Param, "animate: whether to animate".to_string()),
                (BlockTag::Summary, "Shows the menu.".to_string()),
                (BlockTag::Returns, "(boolean): %true on success".to_string()),
                (BlockTag::Other("since".to_string()), "4.2".to_string()),
            ]
        );
    }

    #[test]
    fn tokenize_gtk_section() {
        let comment = "/**\n * SECTION:applet\n * @short_description: Base applet class\n *\n * Applets live in panels.\n */";
        assert_eq!(
            tags(comment),
            vec![
                (BlockTag::Module, "applet".to_string()),
                (
                    BlockTag::Other("short_description".to_string()),
                    "Base applet class".to_string()
                ),
                (BlockTag::Summary, "Applets live in panels.".to_string()),
            ]
        );
    }

    #[test]
    fn tokenize_keeps_paragraphs_and_lines() {
        let comment = "/**\n * First line\n * second line\n *\n * Next paragraph\n */";
        assert_eq!(
            tags(comment),
            vec![
                (BlockTag::Summary, "First line\nsecond line".to_string()),
                (BlockTag::Summary, "Next paragraph".to_string()),
            ]
        );
    }

    #[test]
    fn tokenize_fileoverview() {
        assert_eq!(
            tags("/** @fileoverview Panel helpers */"),
            vec![
                (BlockTag::Module, String::new()),
                (BlockTag::Summary, "Panel helpers".to_string()),
            ]
        );
    }

    #[test]
    fn tokenize_other_tags() {
        assert_eq!(
            tags("/**\n * @deprecated use open() instead\n * @see Main.overview\n */"),
            vec![
                (
                    BlockTag::Other("deprecated".to_string()),
                    "use open() instead".to_string()
                ),
                (BlockTag::Other("see".to_string()), "Main.overview".to_string()),
            ]
        );
    }

    #[test]
    fn colon_note_tags_are_not_params() {
        let block = DocBlock::parse(
            "/**\n * @since: 3.0\n * @deprecated: use bar\n * @label: the text\n */",
        );
        assert_eq!(block.params, vec![Parameter::new("label").with_description("the text")]);
        assert_eq!(
            block.tags,
            vec![
                Tag {
                    name: "since".to_string(),
                    value: "3.0".to_string()
                },
                Tag {
                    name: "deprecated".to_string(),
                    value: "use bar".to_string()
                },
            ]
        );
    }

    #[test]
    fn tokenize_strips_control_characters() {
        assert_eq!(
            tags("/** Bell\u{7} here */"),
            vec![(BlockTag::Summary, "Bell here".to_string())]
        );
    }

    #[test]
    fn block_from_jsdoc() {
        let block = DocBlock::parse(
            "/**\n * Adds numbers.\n * @param {int} a - first\n * @param [b=2] second\n * @return {int} sum\n */",
        );
        assert_eq!(block.summary, "Adds numbers.");
        assert_eq!(
            block.params,
            vec![
                Parameter::new("a").with_type("int").with_description("first"),
                Parameter::new("b").with_description("second"),
            ]
        );
        assert_eq!(
            block.returns,
            Some(Returns {
                type_hint: Some("int".to_string()),
                description: "sum".to_string(),
            })
        );
        assert!(!block.module_level);
    }

    #[test]
    fn block_from_gtk_doc() {
        let block = DocBlock::parse(
            "/**\n * @menu (PopupMenu): the menu\n * @open: whether to open\n *\n * Returns: nothing useful\n */",
        );
        assert_eq!(
            block.params,
            vec![
                Parameter::new("menu")
                    .with_type("PopupMenu")
                    .with_description("the menu"),
                Parameter::new("open").with_description("whether to open"),
            ]
        );
        let returns = block.returns.unwrap_or_default();
        assert_eq!(returns.type_hint, None);
        assert_eq!(returns.description, "nothing useful");
    }

    #[test]
    fn malformed_params_stay_in_summary() {
        let block = DocBlock::parse("/**\n * Does things.\n * @param {int} x\n * @param\n */");
        assert!(block.params.is_empty());
        assert_eq!(block.summary, "Does things.\n\n@param {int} x\n\n@param");
    }

    #[test]
    fn malformed_returns_stay_in_summary() {
        let block = DocBlock::parse("/**\n * @returns\n */");
        assert_eq!(block.returns, None);
        assert_eq!(block.summary, "@returns");
    }

    #[test]
    fn returns_type_only() {
        let block = DocBlock::parse("/** @returns {boolean} */");
        assert_eq!(
            block.returns,
            Some(Returns {
                type_hint: Some("boolean".to_string()),
                description: String::new(),
            })
        );
    }

    #[test]
    fn type_and_tags() {
        let block = DocBlock::parse("/**\n * The label.\n * @type {St.Label}\n * @since 3.0\n */");
        assert_eq!(block.type_hint.as_deref(), Some("St.Label"));
        assert_eq!(
            block.tags,
            vec![Tag {
                name: "since".to_string(),
                value: "3.0".to_string(),
            }]
        );
    }

    #[test]
    fn module_level_markers() {
        assert!(DocBlock::parse("/** @module applet */").module_level);
        assert!(DocBlock::parse("/** @file Panel helpers */").module_level);
        assert!(DocBlock::parse("/**\n * SECTION:panel\n */").module_level);
        assert!(!DocBlock::parse("/** Plain. */").module_level);
        assert_eq!(DocBlock::parse("/** @file Panel helpers */").summary, "Panel helpers");
    }

    #[test]
    fn empty_comment() {
        let block = DocBlock::parse("/** */");
        assert!(block.summary.is_empty());
        assert!(block.params.is_empty());
        assert!(block.returns.is_none() && block.type_hint.is_none());
        assert!(block.tags.is_empty());
    }
}
