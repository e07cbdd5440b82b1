//! Documentation extractor - scans source tokens and builds the node tree
//!
//! The scanner keeps an explicit stack of scope frames instead of recursing,
//! so deeply nested input cannot exhaust the call stack. Declarations are
//! only recognized at statement boundaries in module and class scopes;
//! function bodies and plain blocks are skipped by brace matching.

use crate::lexer::{Lexer, LineIndex, Span, Token, TokenKind};

use super::comment::DocBlock;
use super::error::{ExtractError, ExtractErrorKind};
use super::types::{DocumentationNode, NodeKind, Parameter, Returns};

/// Words that may prefix a member of a declared class
const MODIFIERS: &[&str] = &[
    "static",
    "async",
    "public",
    "private",
    "protected",
    "readonly",
    "override",
    "abstract",
    "declare",
];

/// `Lang.Class` metadata keys; these describe the class, not its members
const CLASS_METADATA_KEYS: &[&str] = &[
    "Name",
    "Extends",
    "Implements",
    "Signals",
    "Properties",
    "GTypeName",
];

/// Extracts documentation from shell UI sources
pub struct Extractor<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    lines: LineIndex,
    pos: usize,
    stack: Vec<Frame>,
    root: DocumentationNode,
    /// Doc comment waiting for the declaration that follows it
    pending: Option<DocBlock>,
    at_boundary: bool,
}

impl<'src> Extractor<'src> {
    /// Extract the documentation tree of one source file
    ///
    /// The root is a module node named `module_name`. Undocumented
    /// declarations still produce nodes; malformed comments never fail.
    pub fn extract(source: &'src str, module_name: &str) -> Result<DocumentationNode, ExtractError> {
        let lines = LineIndex::new(source);
        let (tokens, errors) = Lexer::tokenize(source);
        if let Some(error) = errors.first() {
            return Err(ExtractError::from_lex(error, &lines));
        }

        let tokens = tokens
            .into_iter()
            .filter(|t| !matches!(t.kind, TokenKind::LineComment | TokenKind::BlockComment))
            .collect();

        let mut extractor = Extractor {
            source,
            tokens,
            lines,
            pos: 0,
            stack: vec![Frame::module()],
            root: DocumentationNode::module(module_name),
            pending: None,
            at_boundary: true,
        };
        extractor.run()?;
        Ok(extractor.root)
    }

    fn run(&mut self) -> Result<(), ExtractError> {
        loop {
            match self.current().kind {
                TokenKind::Eof => return self.finish(),
                TokenKind::Newline => {
                    if self.top().is_some_and(|f| f.delims.is_empty()) {
                        self.at_boundary = true;
                    }
                    self.pos += 1;
                }
                TokenKind::DocComment => {
                    let block = DocBlock::parse(&self.current().lexeme);
                    self.pos += 1;
                    if block.module_level {
                        self.document_module(block);
                    } else {
                        self.pending = Some(block);
                    }
                }
                _ => {
                    if self.at_boundary && self.declarations_allowed() {
                        let matched = self
                            .match_declaration()
                            .map_err(|open| self.unclosed_delimiter('(', open))?;
                        if let Some(decl) = matched {
                            self.apply(decl);
                            continue;
                        }
                    }
                    self.step()?;
                }
            }
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn top(&self) -> Option<&Frame> {
        self.stack.last()
    }

    fn declarations_allowed(&self) -> bool {
        self.top().is_some_and(|frame| {
            frame.delims.is_empty()
                && matches!(frame.kind, FrameKind::Module | FrameKind::Class { .. })
        })
    }

    fn match_declaration(&self) -> Result<Option<Decl>, Span> {
        let cursor = Cursor::new(&self.tokens, self.source, self.pos);
        match self.top().map(|f| f.kind) {
            Some(FrameKind::Module) => module_declaration(cursor),
            Some(FrameKind::Class { literal }) => class_member(cursor, literal),
            _ => Ok(None),
        }
    }

    /// Consume one token that is not part of a recognized declaration
    fn step(&mut self) -> Result<(), ExtractError> {
        let (kind, span) = {
            let token = self.current();
            (token.kind, token.span)
        };
        self.pos += 1;
        self.pending = None;
        self.at_boundary = false;

        match kind {
            TokenKind::LBrace => {
                self.stack.push(Frame::block(span));
                self.at_boundary = true;
            }
            TokenKind::RBrace => self.close_scope(span)?,
            TokenKind::LParen | TokenKind::LBracket => {
                let delim = if kind == TokenKind::LParen { '(' } else { '[' };
                if let Some(frame) = self.stack.last_mut() {
                    frame.delims.push((delim, span));
                }
            }
            TokenKind::RParen | TokenKind::RBracket => {
                if let Some(frame) = self.stack.last_mut() {
                    frame.delims.pop();
                }
            }
            TokenKind::Semicolon => {
                self.at_boundary = self.top().is_some_and(|f| f.delims.is_empty());
            }
            TokenKind::Comma => {
                self.at_boundary = self.top().is_some_and(|f| {
                    f.delims.is_empty() && matches!(f.kind, FrameKind::Class { .. })
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn close_scope(&mut self, span: Span) -> Result<(), ExtractError> {
        if self.stack.len() <= 1 {
            return Err(self.error(ExtractErrorKind::UnexpectedCloseBrace, span));
        }
        if let Some(frame) = self.stack.pop() {
            if let Some(node) = frame.node {
                attach(&mut self.stack, &mut self.root, node);
            }
        }
        self.at_boundary = true;
        Ok(())
    }

    fn apply(&mut self, decl: Decl) {
        let doc = self.pending.take().unwrap_or_default();
        self.pos = decl.end;
        let label = format!("{} {}", decl.kind.display_name().to_lowercase(), decl.name);
        let body = decl.body;
        let open = decl.open;
        let node = build_node(decl, doc);

        match body {
            Body::None => {
                attach(&mut self.stack, &mut self.root, node);
                self.at_boundary = false;
            }
            Body::Method => {
                attach(&mut self.stack, &mut self.root, node);
                self.stack.push(Frame::new(FrameKind::Method, None, label, open));
                self.at_boundary = true;
            }
            Body::Class { literal } => {
                self.stack
                    .push(Frame::new(FrameKind::Class { literal }, Some(node), label, open));
                self.at_boundary = true;
            }
        }
    }

    fn document_module(&mut self, block: DocBlock) {
        if !block.summary.is_empty() {
            if !self.root.summary.is_empty() {
                self.root.summary.push_str("\n\n");
            }
            self.root.summary.push_str(&block.summary);
        }
        self.root.tags.extend(block.tags);
    }

    fn finish(&self) -> Result<(), ExtractError> {
        let Some(frame) = self.top() else {
            return Ok(());
        };
        if let Some(&(delim, open)) = frame.delims.last() {
            return Err(self.unclosed_delimiter(delim, open));
        }
        if self.stack.len() > 1 {
            return Err(self.error(
                ExtractErrorKind::UnclosedScope {
                    scope: frame.label.clone(),
                },
                frame.opened,
            ));
        }
        Ok(())
    }

    fn error(&self, kind: ExtractErrorKind, span: Span) -> ExtractError {
        ExtractError::new(kind, self.lines.location(span.start))
    }

    fn unclosed_delimiter(&self, delimiter: char, open: Span) -> ExtractError {
        self.error(ExtractErrorKind::UnclosedDelimiter { delimiter }, open)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Module,
    /// `literal` marks object-literal classes (`Foo.prototype = {`)
    Class { literal: bool },
    Method,
    Block,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    /// Class node under construction; attached to its parent on close
    node: Option<DocumentationNode>,
    /// Human-readable name for unclosed scope errors
    label: String,
    opened: Span,
    /// Open parentheses and brackets in this frame
    delims: Vec<(char, Span)>,
}

impl Frame {
    fn new(kind: FrameKind, node: Option<DocumentationNode>, label: String, opened: Span) -> Self {
        Self {
            kind,
            node,
            label,
            opened,
            delims: Vec::new(),
        }
    }

    fn module() -> Self {
        Self::new(FrameKind::Module, None, "module".to_string(), Span::default())
    }

    fn block(opened: Span) -> Self {
        Self::new(FrameKind::Block, None, "block".to_string(), opened)
    }
}

/// Attach a finished node to the nearest enclosing class, or the module
///
/// A property declared twice (a getter and a setter) becomes one node.
fn attach(stack: &mut [Frame], root: &mut DocumentationNode, node: DocumentationNode) {
    let parent = stack
        .iter_mut()
        .rev()
        .find_map(|f| f.node.as_mut())
        .unwrap_or(root);

    if node.kind == NodeKind::Property {
        if let Some(existing) = parent
            .children
            .iter_mut()
            .find(|c| c.kind == NodeKind::Property && c.name == node.name)
        {
            if existing.summary.is_empty() {
                existing.summary = node.summary;
            }
            if existing.type_hint.is_none() {
                existing.type_hint = node.type_hint;
            }
            existing.tags.extend(node.tags);
            return;
        }
    }
    parent.add_child(node);
}

fn build_node(decl: Decl, doc: DocBlock) -> DocumentationNode {
    let mut node = DocumentationNode::new(decl.kind, decl.name);
    node.summary = doc.summary;
    node.tags = doc.tags;

    match decl.kind {
        NodeKind::Property => {
            node.type_hint = decl
                .type_hint
                .or(doc.type_hint)
                .or_else(|| doc.returns.and_then(|r| r.type_hint));
        }
        NodeKind::Method => {
            node.parameters = merge_params(decl.params, doc.params);
            node.returns = merge_returns(decl.returns, doc.returns);
        }
        NodeKind::Class | NodeKind::Module => {
            node.parameters = doc.params;
        }
    }
    node
}

/// Declared parameters in order, documented extras after them
fn merge_params(declared: Vec<Parameter>, mut documented: Vec<Parameter>) -> Vec<Parameter> {
    let mut merged = Vec::with_capacity(declared.len() + documented.len());
    for mut param in declared {
        if let Some(index) = documented.iter().position(|d| d.name == param.name) {
            let doc = documented.remove(index);
            param.description = doc.description;
            if param.type_hint.is_none() {
                param.type_hint = doc.type_hint;
            }
        }
        merged.push(param);
    }
    merged.extend(documented);
    merged
}

fn merge_returns(declared: Option<String>, documented: Option<Returns>) -> Option<Returns> {
    match (declared, documented) {
        (None, documented) => documented,
        (Some(ty), None) => Some(Returns {
            type_hint: Some(ty),
            description: String::new(),
        }),
        (Some(ty), Some(mut returns)) => {
            returns.type_hint = Some(ty);
            Some(returns)
        }
    }
}

/// What follows a declaration header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Body {
    None,
    Method,
    Class { literal: bool },
}

/// A recognized declaration header
#[derive(Debug)]
struct Decl {
    kind: NodeKind,
    name: String,
    params: Vec<Parameter>,
    /// Declared return type
    returns: Option<String>,
    type_hint: Option<String>,
    body: Body,
    /// Token index where scanning resumes
    end: usize,
    /// The `{` that opens the body
    open: Span,
}

impl Decl {
    fn new(kind: NodeKind, name: String, end: usize) -> Self {
        Self {
            kind,
            name,
            params: Vec::new(),
            returns: None,
            type_hint: None,
            body: Body::None,
            end,
            open: Span::default(),
        }
    }

    fn property(name: String, type_hint: Option<String>, end: usize) -> Self {
        let mut decl = Self::new(NodeKind::Property, name, end);
        decl.type_hint = type_hint;
        decl
    }

    fn method(name: String, params: Vec<Parameter>, returns: Option<String>, end: usize) -> Self {
        let mut decl = Self::new(NodeKind::Method, name, end);
        decl.params = params;
        decl.returns = returns;
        decl
    }

    fn with_body(mut self, body: Body, open: Span, end: usize) -> Self {
        self.body = body;
        self.open = open;
        self.end = end;
        self
    }
}

/// Result of a declaration matcher; `Err` is an unclosed `(` at end of file
type Match = Result<Option<Decl>, Span>;

/// Lookahead over significant tokens
///
/// `pos` always sits just after the last consumed token, so a declaration
/// that ends early leaves any following newline for the main loop.
#[derive(Clone, Copy)]
struct Cursor<'a> {
    tokens: &'a [Token],
    source: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token], source: &'a str, pos: usize) -> Self {
        Self {
            tokens,
            source,
            pos,
        }
    }

    /// Index of the next significant token
    fn index(&self) -> usize {
        let last = self.tokens.len() - 1;
        let mut index = self.pos.min(last);
        while index < last && self.tokens[index].kind.is_trivia() {
            index += 1;
        }
        index
    }

    fn peek(&self) -> &'a Token {
        let tokens = self.tokens;
        &tokens[self.index()]
    }

    fn nth(&self, n: usize) -> &'a Token {
        let mut ahead = *self;
        for _ in 0..n {
            ahead.bump();
        }
        ahead.peek()
    }

    /// Kind of the very next token, trivia included
    fn raw_kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    fn bump(&mut self) -> &'a Token {
        let index = self.index();
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.pos = index + 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> Option<&'a Token> {
        (self.peek().kind == kind).then(|| self.bump())
    }

    fn peek_is_word(&self, word: &str) -> bool {
        let token = self.peek();
        token.kind == TokenKind::Ident && token.lexeme == word
    }

    fn eat_word(&mut self, word: &str) -> bool {
        let matched = self.peek_is_word(word);
        if matched {
            self.bump();
        }
        matched
    }

    fn ident(&mut self) -> Option<String> {
        self.eat(TokenKind::Ident).map(|t| t.lexeme.clone())
    }

    /// Identifier or keyword used as a name
    fn word(&mut self) -> Option<String> {
        if self.peek().kind.is_word() {
            Some(self.bump().lexeme.clone())
        } else {
            None
        }
    }

    /// A class member name: word, string, number or `#private`
    fn member_name(&mut self) -> Option<String> {
        let token = self.peek();
        match token.kind {
            kind if kind.is_word() => self.word(),
            TokenKind::Number => Some(self.bump().lexeme.clone()),
            TokenKind::Str => {
                let lexeme = &self.bump().lexeme;
                let inner = lexeme.get(1..lexeme.len().saturating_sub(1)).unwrap_or_default();
                (!inner.is_empty()).then(|| inner.to_string())
            }
            TokenKind::Op if token.lexeme == "#" => {
                self.bump();
                self.ident().map(|name| format!("#{name}"))
            }
            _ => None,
        }
    }

    /// A parenthesized parameter list, if one starts here
    fn params(&mut self) -> Result<Option<Vec<Parameter>>, Span> {
        let Some(open) = self.eat(TokenKind::LParen) else {
            return Ok(None);
        };
        let open = open.span;
        let tokens = self.tokens;
        let mut params = Vec::new();
        let mut segment_start = self.pos;
        let (mut nest, mut angle) = (0i32, 0i32);

        loop {
            let token = tokens.get(self.pos).ok_or(open)?;
            match token.kind {
                TokenKind::Eof => return Err(open),
                TokenKind::RParen if nest == 0 => {
                    params.extend(self.param(segment_start, self.pos));
                    self.pos += 1;
                    return Ok(Some(params));
                }
                TokenKind::Comma if nest == 0 && angle == 0 => {
                    params.extend(self.param(segment_start, self.pos));
                    segment_start = self.pos + 1;
                }
                kind => {
                    nest = (nest + kind.depth_delta()).max(0);
                    angle = (angle + kind.angle_delta(&token.lexeme)).max(0);
                }
            }
            self.pos += 1;
        }
    }

    /// One `[...]name[?] [: type] [= default]` segment of a parameter list
    fn param(&self, start: usize, end: usize) -> Option<Parameter> {
        let tokens: Vec<&Token> = self.tokens[start..end]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .collect();
        let tokens = match tokens.split_first() {
            Some((first, rest)) if first.kind == TokenKind::Ellipsis => rest,
            _ => &tokens[..],
        };

        let mut nest = 0;
        let mut colon = None;
        let mut eq = None;
        for (i, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Colon if nest == 0 && colon.is_none() && eq.is_none() => {
                    colon = Some(i);
                }
                TokenKind::Eq if nest == 0 && eq.is_none() => eq = Some(i),
                kind => nest += kind.depth_delta(),
            }
        }

        let value_end = eq.unwrap_or(tokens.len());
        let name_end = colon.unwrap_or(value_end);
        let name = self.text(&tokens[..name_end])?;
        let mut param = Parameter::new(name.trim_end_matches('?'));
        if let Some(ty) = colon.and_then(|c| self.text(&tokens[c + 1..value_end])) {
            param = param.with_type(ty);
        }
        Some(param)
    }

    /// Source text spanned by `tokens`, whitespace collapsed
    fn text(&self, tokens: &[&Token]) -> Option<String> {
        let first = tokens.first()?;
        let last = tokens.last()?;
        let text = collapse(&self.source[first.span.start as usize..last.span.end as usize]);
        (!text.is_empty()).then_some(text)
    }

    /// Type annotation text up to a stop token at nesting depth zero
    fn type_text(&mut self, stops: &[TokenKind]) -> Option<String> {
        self.pos = self.index();
        let tokens = self.tokens;
        let (mut nest, mut angle) = (0i32, 0i32);
        let mut range: Option<(u32, u32)> = None;

        while let Some(token) = tokens.get(self.pos) {
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Newline if nest == 0 => break,
                kind if kind.is_trivia() => {
                    self.pos += 1;
                    continue;
                }
                kind if nest == 0 && angle == 0 && stops.contains(&kind) => break,
                _ => {}
            }
            let delta = token.kind.depth_delta();
            if nest + delta < 0 {
                break;
            }
            nest += delta;
            angle = (angle + token.kind.angle_delta(&token.lexeme)).max(0);
            range = Some(range.map_or((token.span.start, token.span.end), |(start, _)| {
                (start, token.span.end)
            }));
            self.pos += 1;
        }

        let (start, end) = range?;
        let text = collapse(&self.source[start as usize..end as usize]);
        (!text.is_empty()).then_some(text)
    }

    /// `: T` or `-> T` after a parameter list
    fn return_type(&mut self) -> Option<String> {
        if self.eat(TokenKind::Colon).is_some() || self.eat(TokenKind::Arrow).is_some() {
            self.type_text(&[TokenKind::LBrace, TokenKind::FatArrow, TokenKind::Semicolon])
        } else {
            None
        }
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Declarations recognized at module scope
fn module_declaration(mut c: Cursor<'_>) -> Match {
    if c.eat(TokenKind::Export).is_some() {
        c.eat_word("default");
    }
    if c.peek_is_word("async") && c.nth(1).kind == TokenKind::Function {
        c.bump();
    }

    match c.peek().kind {
        TokenKind::Class => Ok(class_tail(&mut c, None)),
        TokenKind::Function => function_tail(&mut c, None),
        TokenKind::Var | TokenKind::Let | TokenKind::Const => variable_tail(c),
        TokenKind::Ident => Ok(prototype_tail(&mut c)),
        _ => Ok(None),
    }
}

/// `class [Name] [extends ...] {`
fn class_tail(c: &mut Cursor<'_>, name: Option<String>) -> Option<Decl> {
    c.eat(TokenKind::Class)?;
    let own = if c.peek().kind == TokenKind::Ident && !c.peek_is_word("extends") {
        c.ident()
    } else {
        None
    };
    let name = name.or(own)?;

    let mut nest = 0;
    loop {
        let token = c.peek();
        match token.kind {
            TokenKind::Eof | TokenKind::Semicolon => return None,
            TokenKind::LBrace if nest == 0 => break,
            kind => {
                nest += kind.depth_delta();
                c.bump();
            }
        }
    }
    let open = c.bump().span;
    Some(Decl::new(NodeKind::Class, name, c.pos).with_body(Body::Class { literal: false }, open, c.pos))
}

/// `function [*] [name](params) [: T | -> T] {`
fn function_tail(c: &mut Cursor<'_>, name: Option<String>) -> Match {
    if c.eat(TokenKind::Function).is_none() {
        return Ok(None);
    }
    c.eat(TokenKind::Star);
    let own = c.word();
    let Some(name) = name.or(own) else {
        return Ok(None);
    };
    let Some(params) = c.params()? else {
        return Ok(None);
    };
    let returns = c.return_type();
    Ok(c.eat(TokenKind::LBrace).map(|open| {
        Decl::method(name, params, returns, c.pos).with_body(Body::Method, open.span, c.pos)
    }))
}

/// `var|let|const Name [: T] [= value]`
fn variable_tail(mut c: Cursor<'_>) -> Match {
    c.bump();
    let Some(name) = c.ident() else {
        return Ok(None);
    };
    let type_hint = if c.eat(TokenKind::Colon).is_some() {
        c.type_text(&[TokenKind::Eq, TokenKind::Semicolon, TokenKind::Comma])
    } else {
        None
    };

    if c.peek().kind != TokenKind::Eq {
        return Ok(Some(Decl::property(name, type_hint, c.pos)));
    }
    let property_end = c.pos;
    c.bump();
    value_decl(c, name, type_hint, property_end)
}

/// Classify the value assigned to `name`
///
/// Functions, arrows and classes become their own declarations. Anything
/// else is a property whose value is scanned normally from `property_end`.
fn value_decl(
    mut c: Cursor<'_>,
    name: String,
    type_hint: Option<String>,
    property_end: usize,
) -> Match {
    if c.peek_is_word("async") {
        c.bump();
    }

    let matched = match c.peek().kind {
        TokenKind::Class => class_tail(&mut c, Some(name.clone())),
        TokenKind::Function => function_tail(&mut c, Some(name.clone()))?,
        TokenKind::LParen => arrow_tail(c, name.clone())?,
        TokenKind::Ident if c.nth(1).kind == TokenKind::FatArrow => {
            let param = Parameter::new(c.bump().lexeme.clone());
            c.bump();
            Some(arrow_body(c, Decl::method(name.clone(), vec![param], None, c.pos)))
        }
        TokenKind::Ident if c.peek_is_word("new") => lang_class_tail(c, name.clone()),
        _ => None,
    };

    Ok(Some(matched.unwrap_or_else(|| {
        Decl::property(name, type_hint, property_end)
    })))
}

/// `(params) [: T] =>`
fn arrow_tail(mut c: Cursor<'_>, name: String) -> Result<Option<Decl>, Span> {
    let Some(params) = c.params()? else {
        return Ok(None);
    };
    let returns = if c.eat(TokenKind::Colon).is_some() {
        c.type_text(&[TokenKind::FatArrow])
    } else {
        None
    };
    if c.eat(TokenKind::FatArrow).is_none() {
        return Ok(None);
    }
    Ok(Some(arrow_body(c, Decl::method(name, params, returns, c.pos))))
}

/// A block body is skipped as a method; an expression body is scanned
fn arrow_body(mut c: Cursor<'_>, decl: Decl) -> Decl {
    match c.eat(TokenKind::LBrace) {
        Some(open) => decl.with_body(Body::Method, open.span, c.pos),
        None => {
            let end = c.pos;
            Decl { end, ..decl }
        }
    }
}

/// `new Lang.Class({`
fn lang_class_tail(mut c: Cursor<'_>, name: String) -> Option<Decl> {
    if !c.eat_word("new") {
        return None;
    }
    let mut last = c.ident()?;
    while c.eat(TokenKind::Dot).is_some() {
        last = c.ident()?;
    }
    if last != "Class" {
        return None;
    }
    c.eat(TokenKind::LParen)?;
    let open = c.eat(TokenKind::LBrace)?.span;
    Some(Decl::new(NodeKind::Class, name, c.pos).with_body(Body::Class { literal: true }, open, c.pos))
}

/// `Name.prototype = {`
fn prototype_tail(c: &mut Cursor<'_>) -> Option<Decl> {
    let name = c.ident()?;
    c.eat(TokenKind::Dot)?;
    if !c.eat_word("prototype") {
        return None;
    }
    c.eat(TokenKind::Eq)?;
    let open = c.eat(TokenKind::LBrace)?.span;
    Some(Decl::new(NodeKind::Class, name, c.pos).with_body(Body::Class { literal: true }, open, c.pos))
}

/// Whether `token` can begin a member after a modifier or accessor word
fn starts_member(token: &Token) -> bool {
    token.kind.is_word()
        || matches!(
            token.kind,
            TokenKind::Star | TokenKind::Str | TokenKind::Number | TokenKind::LBracket
        )
        || (token.kind == TokenKind::Op && token.lexeme == "#")
}

/// Declarations recognized inside a class body
fn class_member(mut c: Cursor<'_>, literal: bool) -> Match {
    let modifiers: &[&str] = if literal { &["async"] } else { MODIFIERS };
    loop {
        let token = c.peek();
        let is_modifier =
            token.kind == TokenKind::Ident && modifiers.contains(&token.lexeme.as_str());
        if is_modifier && starts_member(c.nth(1)) {
            c.bump();
        } else {
            break;
        }
    }
    c.eat(TokenKind::Star);

    if (c.peek_is_word("get") || c.peek_is_word("set")) && starts_member(c.nth(1)) {
        c.bump();
        let Some(name) = c.member_name() else {
            return Ok(None);
        };
        if c.params()?.is_none() {
            return Ok(None);
        }
        let type_hint = c.return_type();
        return Ok(c.eat(TokenKind::LBrace).map(|open| {
            Decl::property(name, type_hint, c.pos).with_body(Body::Method, open.span, c.pos)
        }));
    }

    let Some(name) = c.member_name() else {
        return Ok(None);
    };
    if literal && CLASS_METADATA_KEYS.contains(&name.as_str()) {
        return Ok(None);
    }
    if !literal {
        c.eat(TokenKind::Question);
        if c.peek().kind == TokenKind::Op && c.peek().lexeme == "!" {
            c.bump();
        }
    }

    match c.peek().kind {
        TokenKind::LParen => {
            let params = c.params()?.unwrap_or_default();
            let returns = c.return_type();
            if let Some(open) = c.eat(TokenKind::LBrace) {
                return Ok(Some(
                    Decl::method(name, params, returns, c.pos).with_body(Body::Method, open.span, c.pos),
                ));
            }
            if !literal && c.peek().kind == TokenKind::Semicolon {
                return Ok(Some(Decl::method(name, params, returns, c.pos)));
            }
            Ok(None)
        }
        TokenKind::Colon if literal => {
            c.bump();
            let property_end = c.pos;
            value_decl(c, name, None, property_end)
        }
        TokenKind::Colon => {
            c.bump();
            let type_hint = c.type_text(&[TokenKind::Eq, TokenKind::Semicolon]);
            if c.peek().kind == TokenKind::Eq {
                let property_end = c.pos;
                c.bump();
                value_decl(c, name, type_hint, property_end)
            } else {
                Ok(Some(Decl::property(name, type_hint, c.pos)))
            }
        }
        TokenKind::Eq if !literal => {
            let property_end = c.pos;
            c.bump();
            value_decl(c, name, None, property_end)
        }
        TokenKind::Semicolon | TokenKind::RBrace if !literal => {
            Ok(Some(Decl::property(name, None, c.pos)))
        }
        _ if !literal && c.raw_kind() == TokenKind::Newline => {
            Ok(Some(Decl::property(name, None, c.pos)))
        }
        _ => Ok(None),
    }
}
