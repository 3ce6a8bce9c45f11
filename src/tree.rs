//! Parse tree produced by the parser and consumed by the extractor. Nodes
//! keep the tokens they were built from so text and positions stay available
//! without re-scanning.

use crate::token::Token;

#[derive(Debug, Default)]
pub struct StylesheetNode {
    pub statements: Vec<StatementNode>,
}

#[derive(Debug)]
pub enum StatementNode {
    Ruleset(RulesetNode),
    Media(MediaNode),
    Page(PageNode),
    FontFace(FontFaceNode),
    Viewport(ViewportNode),
    Keyframes(KeyframesNode),
    Import(ImportNode),
    Charset(Token),
}

/// A selector list plus declaration block. `invalid` is set when the selector
/// part could not be parsed; the body is still consumed so following
/// statements stay aligned, but the whole rule is dropped later.
#[derive(Debug)]
pub struct RulesetNode {
    pub selectors: Vec<CombinedSelectorNode>,
    pub declarations: Vec<DeclarationNode>,
    pub invalid: bool,
}

#[derive(Debug)]
pub struct DeclarationNode {
    pub property: Token,
    pub items: Vec<TermItemNode>,
    pub important: bool,
}

/// Flat value stream: separators and sign markers interleaved with terms,
/// in source order. Folding signs into values and attaching separators to
/// the term they precede happens at extraction.
#[derive(Debug)]
pub enum TermItemNode {
    Space,
    Comma,
    Slash,
    Minus,
    Plus,
    Term(TermNode),
}

#[derive(Debug)]
pub enum TermNode {
    Atom(Token),
    Function(FunctionNode),
}

#[derive(Debug)]
pub struct FunctionNode {
    pub name: Token,
    pub args: Vec<TermItemNode>,
}

#[derive(Debug)]
pub struct CombinedSelectorNode {
    pub first: SelectorNode,
    pub rest: Vec<(CombinatorNode, SelectorNode)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinatorNode {
    Descendant,
    Child,
    Adjacent,
    Sibling,
}

#[derive(Debug)]
pub struct SelectorNode {
    pub parts: Vec<SelectorPartNode>,
}

#[derive(Debug)]
pub enum SelectorPartNode {
    Element(Token),
    Universal(Token),
    Id(Token),
    Class(Token),
    Attribute(AttributeNode),
    Pseudo(PseudoNode),
}

#[derive(Debug)]
pub struct AttributeNode {
    pub name: Token,
    pub op: Option<AttributeOpNode>,
    pub value: Option<Token>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOpNode {
    Equals,
    Includes,
    DashMatch,
    Prefix,
    Suffix,
    Substring,
}

/// `element` records a double colon; single-colon spellings of the legacy
/// pseudo elements are sorted out during extraction by name.
#[derive(Debug)]
pub struct PseudoNode {
    pub element: bool,
    pub name: Token,
    pub arg: Option<String>,
}

#[derive(Debug)]
pub struct MediaNode {
    pub queries: Vec<MediaQueryNode>,
    pub statements: Vec<StatementNode>,
}

/// One comma-separated media query as a row of atoms. `invalid` marks a
/// query that already failed at parse level; semantic checks during
/// extraction can still invalidate a well-formed one.
#[derive(Debug)]
pub struct MediaQueryNode {
    pub atoms: Vec<MediaAtomNode>,
    pub invalid: bool,
}

#[derive(Debug)]
pub enum MediaAtomNode {
    Ident(Token),
    Expression(MediaExpressionNode),
}

#[derive(Debug)]
pub struct MediaExpressionNode {
    pub feature: Token,
    pub terms: Vec<TermItemNode>,
}

#[derive(Debug)]
pub struct ImportNode {
    pub uri: Token,
    pub queries: Vec<MediaQueryNode>,
}

#[derive(Debug)]
pub struct PageNode {
    pub name: Option<Token>,
    pub pseudo: Option<Token>,
    pub declarations: Vec<DeclarationNode>,
    pub margins: Vec<MarginNode>,
}

#[derive(Debug)]
pub struct MarginNode {
    pub area: Token,
    pub declarations: Vec<DeclarationNode>,
}

#[derive(Debug)]
pub struct FontFaceNode {
    pub declarations: Vec<DeclarationNode>,
}

#[derive(Debug)]
pub struct ViewportNode {
    pub declarations: Vec<DeclarationNode>,
}

#[derive(Debug)]
pub struct KeyframesNode {
    pub name: Option<Token>,
    pub blocks: Vec<KeyframeBlockNode>,
}

#[derive(Debug)]
pub struct KeyframeBlockNode {
    pub selectors: Vec<Token>,
    pub declarations: Vec<DeclarationNode>,
}
