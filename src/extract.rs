//! Tree walk turning the parse tree into the stylesheet object model.
//! Validity flows bottom-up through `Option` returns: a leaf problem makes
//! the walk for its construct yield `None`, and each parent decides whether
//! to omit the child (declaration lists) or give itself up (selector lists).

use smallvec::SmallVec;
use url::Url;

use crate::lexer::{is_ident, start_ident_sequence};
use crate::model::{
    Declaration, ImportRecord, KeyframeBlock, MediaExpression, MediaQuery, Origin, Rule,
    RuleFontFace, RuleKeyframes, RuleMargin, RuleMedia, RulePage, RuleSet, RuleViewport, Source,
    StyleSheet,
};
use crate::recovery::{Warning, WarningKind};
use crate::selector::{
    Attribute, AttributeOp, CombinedSelector, Combinator, MarginArea, PagePseudo, PseudoClass,
    PseudoClassType, PseudoElement, PseudoElementType, Selector, SelectorPart,
};
use crate::term::{self, Color, Operator, Rect, Term, TermValue};
use crate::token::{Token, TokenKind};
use crate::tree::{
    AttributeNode, AttributeOpNode, CombinatorNode, CombinedSelectorNode, DeclarationNode,
    FontFaceNode, FunctionNode, ImportNode, KeyframeBlockNode, KeyframesNode, MarginNode,
    MediaAtomNode, MediaExpressionNode, MediaNode, MediaQueryNode, PageNode, PseudoNode,
    RulesetNode, SelectorNode, SelectorPartNode, StatementNode, StylesheetNode, TermItemNode,
    TermNode, ViewportNode,
};

/// Assembly policy consulted whenever a rule is about to be emitted. Lets
/// embedders drop rules they consider empty and control how imported rules
/// are folded into the importing sheet.
pub trait Preparator {
    fn ruleset(&self, selectors: Vec<CombinedSelector>, declarations: Vec<Declaration>)
        -> Option<Rule>;

    fn media(&self, queries: Vec<MediaQuery>, rules: Vec<Rule>) -> Option<Rule>;

    fn page(&self, page: RulePage) -> Option<Rule>;

    fn font_face(&self, declarations: Vec<Declaration>) -> Option<Rule>;

    fn viewport(&self, declarations: Vec<Declaration>) -> Option<Rule>;

    fn keyframes(&self, keyframes: RuleKeyframes) -> Option<Rule>;

    /// Folds the rules of an imported sheet into the importing one,
    /// wrapping them under the import's media condition when there is one.
    fn wrap_import(&self, rules: Vec<Rule>, media: &[MediaQuery]) -> Vec<Rule>;
}

/// Default policy: rules with no content are dropped, media-conditioned
/// imports get a synthetic `@media` wrapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplePreparator;

impl Preparator for SimplePreparator {
    fn ruleset(
        &self,
        selectors: Vec<CombinedSelector>,
        declarations: Vec<Declaration>,
    ) -> Option<Rule> {
        if declarations.is_empty() {
            return None;
        }
        Some(Rule::Set(RuleSet {
            selectors,
            declarations,
        }))
    }

    fn media(&self, queries: Vec<MediaQuery>, rules: Vec<Rule>) -> Option<Rule> {
        if rules.is_empty() {
            return None;
        }
        Some(Rule::Media(RuleMedia { queries, rules }))
    }

    fn page(&self, page: RulePage) -> Option<Rule> {
        if page.declarations.is_empty() && page.margins.is_empty() {
            return None;
        }
        Some(Rule::Page(page))
    }

    fn font_face(&self, declarations: Vec<Declaration>) -> Option<Rule> {
        if declarations.is_empty() {
            return None;
        }
        Some(Rule::FontFace(RuleFontFace { declarations }))
    }

    fn viewport(&self, declarations: Vec<Declaration>) -> Option<Rule> {
        if declarations.is_empty() {
            return None;
        }
        Some(Rule::Viewport(RuleViewport { declarations }))
    }

    fn keyframes(&self, keyframes: RuleKeyframes) -> Option<Rule> {
        if keyframes.blocks.is_empty() {
            return None;
        }
        Some(Rule::Keyframes(keyframes))
    }

    fn wrap_import(&self, rules: Vec<Rule>, media: &[MediaQuery]) -> Vec<Rule> {
        if media.is_empty() || rules.is_empty() {
            return rules;
        }
        vec![Rule::Media(RuleMedia {
            queries: media.to_vec(),
            rules,
        })]
    }
}

#[derive(Debug)]
pub struct Extractor<'s, P> {
    input: &'s str,
    base: Option<Url>,
    origin: Origin,
    preparator: P,
    /// Once a real rule has been emitted, later `@import`s are ignored.
    seen_real_rule: bool,
    imports: Vec<ImportRecord>,
    warnings: Vec<Warning>,
}

impl<'s, P: Preparator> Extractor<'s, P> {
    pub fn new(input: &'s str, base: Option<Url>, origin: Origin, preparator: P) -> Self {
        Self {
            input,
            base,
            origin,
            preparator,
            seen_real_rule: false,
            imports: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn extract(mut self, tree: &StylesheetNode) -> (StyleSheet, Vec<Warning>) {
        let mut rules = Vec::new();
        for statement in &tree.statements {
            if let Some(rule) = self.statement(statement) {
                rules.push(rule);
            }
        }
        let sheet = StyleSheet {
            origin: self.origin,
            rules,
            imports: self.imports,
        };
        (sheet, self.warnings)
    }

    /// Wraps a `style=""` declaration list in one synthetic ruleset tagged
    /// with the owning element.
    pub fn extract_inline(
        mut self,
        declarations: &[DeclarationNode],
        label: &str,
        priority: bool,
    ) -> (StyleSheet, Vec<Warning>) {
        let declarations = self.declarations(declarations);
        let mut parts = SmallVec::new();
        parts.push(SelectorPart::InlineElement {
            label: label.to_string(),
            priority,
        });
        let selector = CombinedSelector {
            head: Selector { parts },
            tail: Vec::new(),
        };
        let sheet = StyleSheet {
            origin: self.origin,
            rules: vec![Rule::Set(RuleSet {
                selectors: vec![selector],
                declarations,
            })],
            imports: Vec::new(),
        };
        (sheet, self.warnings)
    }

    pub fn extract_media(mut self, nodes: &[MediaQueryNode]) -> (Vec<MediaQuery>, Vec<Warning>) {
        let queries = nodes.iter().map(|node| self.media_query(node)).collect();
        (queries, self.warnings)
    }

    fn statement(&mut self, node: &StatementNode) -> Option<Rule> {
        match node {
            StatementNode::Ruleset(node) => self.ruleset(node),
            StatementNode::Media(node) => self.media(node),
            StatementNode::Page(node) => self.page(node),
            StatementNode::FontFace(node) => self.font_face(node),
            StatementNode::Viewport(node) => self.viewport(node),
            StatementNode::Keyframes(node) => self.keyframes(node),
            StatementNode::Import(node) => {
                self.import(node);
                None
            }
            StatementNode::Charset(_) => None,
        }
    }

    fn emit(&mut self, rule: Option<Rule>) -> Option<Rule> {
        if rule.is_some() {
            self.seen_real_rule = true;
        }
        rule
    }

    fn ruleset(&mut self, node: &RulesetNode) -> Option<Rule> {
        if node.invalid {
            return None;
        }
        let mut selectors = Vec::with_capacity(node.selectors.len());
        for selector_node in &node.selectors {
            // One bad selector poisons the whole rule; the selector list is
            // conjunctive within a statement.
            selectors.push(self.combined_selector(selector_node)?);
        }
        let declarations = self.declarations(&node.declarations);
        let rule = self.preparator.ruleset(selectors, declarations);
        self.emit(rule)
    }

    fn media(&mut self, node: &MediaNode) -> Option<Rule> {
        // The media body counts as real content even before any inner rule
        // lands, so imports nested in it are rejected.
        self.seen_real_rule = true;
        let queries = node
            .queries
            .iter()
            .map(|query| self.media_query(query))
            .collect();
        let mut rules = Vec::new();
        for statement in &node.statements {
            if let Some(rule) = self.statement(statement) {
                rules.push(rule);
            }
        }
        self.preparator.media(queries, rules)
    }

    fn page(&mut self, node: &PageNode) -> Option<Rule> {
        let name = node
            .name
            .as_ref()
            .map(|token| token.raw_text(self.input).to_string());
        let pseudo = match &node.pseudo {
            Some(token) => {
                let raw = token.raw_text(self.input);
                match PagePseudo::from_name(raw) {
                    Some(pseudo) => Some(pseudo),
                    None => {
                        self.warn(
                            WarningKind::InvalidPseudo {
                                name: raw.to_string(),
                            },
                            token,
                        );
                        return None;
                    }
                }
            }
            None => None,
        };
        let declarations = self.declarations(&node.declarations);
        let margins = node
            .margins
            .iter()
            .filter_map(|margin| self.margin(margin))
            .collect();
        let rule = self.preparator.page(RulePage {
            name,
            pseudo,
            declarations,
            margins,
        });
        self.emit(rule)
    }

    fn margin(&mut self, node: &MarginNode) -> Option<RuleMargin> {
        let raw = node.area.raw_text(self.input);
        let name = raw.trim_start_matches('@');
        let area = match MarginArea::from_name(name) {
            Some(area) => area,
            None => {
                self.warn(
                    WarningKind::UnknownAtRule {
                        name: name.to_string(),
                    },
                    &node.area,
                );
                return None;
            }
        };
        Some(RuleMargin {
            area,
            declarations: self.declarations(&node.declarations),
        })
    }

    fn font_face(&mut self, node: &FontFaceNode) -> Option<Rule> {
        let declarations = self.declarations(&node.declarations);
        let rule = self.preparator.font_face(declarations);
        self.emit(rule)
    }

    fn viewport(&mut self, node: &ViewportNode) -> Option<Rule> {
        let declarations = self.declarations(&node.declarations);
        let rule = self.preparator.viewport(declarations);
        self.emit(rule)
    }

    fn keyframes(&mut self, node: &KeyframesNode) -> Option<Rule> {
        let name = node
            .name
            .as_ref()
            .map(|token| token.raw_text(self.input).to_string())?;
        let blocks = node
            .blocks
            .iter()
            .filter_map(|block| self.keyframe_block(block))
            .collect();
        // Keyframes do not count as content for import suppression.
        self.preparator.keyframes(RuleKeyframes { name, blocks })
    }

    fn keyframe_block(&mut self, node: &KeyframeBlockNode) -> Option<KeyframeBlock> {
        let mut selectors = Vec::with_capacity(node.selectors.len());
        for token in &node.selectors {
            let text = token.raw_text(self.input);
            let percent = match token.kind {
                TokenKind::Ident if text.eq_ignore_ascii_case("from") => 0.0,
                TokenKind::Ident if text.eq_ignore_ascii_case("to") => 100.0,
                TokenKind::Percentage => {
                    let digits = text.strip_suffix('%').unwrap_or(text);
                    match term::parse_number(digits) {
                        Some((value, _)) => value,
                        None => -1.0,
                    }
                }
                _ => -1.0,
            };
            if !(0.0..=100.0).contains(&percent) {
                self.warn(
                    WarningKind::InvalidKeyframeSelector {
                        value: text.to_string(),
                    },
                    token,
                );
                return None;
            }
            selectors.push(percent);
        }
        Some(KeyframeBlock {
            selectors,
            declarations: self.declarations(&node.declarations),
        })
    }

    fn import(&mut self, node: &ImportNode) {
        if self.seen_real_rule {
            self.warn(WarningKind::ImportAfterContent, &node.uri);
            log::warn!(
                target: "css.extract",
                "{}:{}: @import after content ignored",
                node.uri.line,
                node.uri.column
            );
            return;
        }
        let media = node
            .queries
            .iter()
            .map(|query| self.media_query(query))
            .collect();
        self.imports.push(ImportRecord {
            uri: node.uri.text(self.input).to_string(),
            media,
            source: Some(Source {
                base: self.base.clone(),
                line: node.uri.line,
                column: node.uri.column,
            }),
        });
    }

    fn media_query(&mut self, node: &MediaQueryNode) -> MediaQuery {
        let mut query = MediaQuery::default();
        let mut invalid = node.invalid;
        let mut state = QueryState::Start;
        for atom in &node.atoms {
            if invalid {
                break;
            }
            match atom {
                MediaAtomNode::Ident(token) => {
                    let word = token.raw_text(self.input).to_ascii_lowercase();
                    match word.as_str() {
                        "not" if state == QueryState::Start => {
                            query.negative = true;
                            state = QueryState::TypeOrExpr;
                        }
                        "only" if state == QueryState::Start => {
                            query.only = true;
                            state = QueryState::TypeOrExpr;
                        }
                        "and" if state == QueryState::Type || state == QueryState::Expr => {
                            state = QueryState::And;
                        }
                        "and" | "not" | "only" => {
                            self.warn(WarningKind::InvalidMediaQuery, token);
                            invalid = true;
                        }
                        _ if state == QueryState::Start || state == QueryState::TypeOrExpr => {
                            query.media_type = Some(word);
                            state = QueryState::Type;
                        }
                        _ => {
                            self.warn(WarningKind::InvalidMediaQuery, token);
                            invalid = true;
                        }
                    }
                }
                MediaAtomNode::Expression(expression) => {
                    if matches!(
                        state,
                        QueryState::Start | QueryState::TypeOrExpr | QueryState::And
                    ) {
                        match self.media_expression(expression) {
                            Some(expression) => {
                                query.expressions.push(expression);
                                state = QueryState::Expr;
                            }
                            None => {
                                self.warn(WarningKind::InvalidMediaQuery, &expression.feature);
                                invalid = true;
                            }
                        }
                    } else {
                        self.warn(WarningKind::InvalidMediaQuery, &expression.feature);
                        invalid = true;
                    }
                }
            }
        }
        // A query may not end on a dangling prefix or connector, and may
        // not be empty.
        if matches!(
            state,
            QueryState::Start | QueryState::TypeOrExpr | QueryState::And
        ) {
            invalid = true;
        }
        if invalid {
            log::debug!(target: "css.extract", "invalid media query downgraded to 'not all'");
            return MediaQuery::never();
        }
        query
    }

    fn media_expression(&mut self, node: &MediaExpressionNode) -> Option<MediaExpression> {
        let feature = node.feature.raw_text(self.input).to_ascii_lowercase();
        let terms = self.terms(&node.terms)?;
        Some(MediaExpression { feature, terms })
    }

    fn combined_selector(&mut self, node: &CombinedSelectorNode) -> Option<CombinedSelector> {
        let head = self.selector(&node.first)?;
        let mut tail = Vec::with_capacity(node.rest.len());
        for (combinator, selector) in &node.rest {
            let combinator = match combinator {
                CombinatorNode::Descendant => Combinator::Descendant,
                CombinatorNode::Child => Combinator::Child,
                CombinatorNode::Adjacent => Combinator::Adjacent,
                CombinatorNode::Sibling => Combinator::Sibling,
            };
            tail.push((combinator, self.selector(selector)?));
        }
        Some(CombinedSelector { head, tail })
    }

    fn selector(&mut self, node: &SelectorNode) -> Option<Selector> {
        let mut parts = SmallVec::new();
        let mut pseudo_element_seen = false;
        for part_node in &node.parts {
            let part = match part_node {
                SelectorPartNode::Element(token) => {
                    SelectorPart::Element(token.raw_text(self.input).to_ascii_lowercase())
                }
                SelectorPartNode::Universal(_) => SelectorPart::Universal,
                SelectorPartNode::Id(token) => {
                    let name = token.text(self.input);
                    if !is_valid_identifier(name) {
                        self.warn(WarningKind::InvalidSelector, token);
                        return None;
                    }
                    SelectorPart::Id(name.to_string())
                }
                SelectorPartNode::Class(token) => {
                    SelectorPart::Class(token.text(self.input).to_string())
                }
                SelectorPartNode::Attribute(attribute) => {
                    SelectorPart::Attribute(self.attribute(attribute)?)
                }
                SelectorPartNode::Pseudo(pseudo) => {
                    let part = self.pseudo(pseudo)?;
                    if matches!(part, SelectorPart::PseudoElement(_)) {
                        if pseudo_element_seen {
                            self.warn(WarningKind::DuplicatePseudoElement, &pseudo.name);
                            return None;
                        }
                        pseudo_element_seen = true;
                    }
                    part
                }
            };
            parts.push(part);
        }
        Some(Selector { parts })
    }

    fn attribute(&mut self, node: &AttributeNode) -> Option<Attribute> {
        let name = node.name.raw_text(self.input).to_ascii_lowercase();
        let matcher = match (node.op, &node.value) {
            (Some(op), Some(token)) => {
                let op = match op {
                    AttributeOpNode::Equals => AttributeOp::Equals,
                    AttributeOpNode::Includes => AttributeOp::Includes,
                    AttributeOpNode::DashMatch => AttributeOp::DashMatch,
                    AttributeOpNode::Prefix => AttributeOp::Prefix,
                    AttributeOpNode::Suffix => AttributeOp::Suffix,
                    AttributeOpNode::Substring => AttributeOp::Substring,
                };
                Some((op, token.text(self.input).to_string()))
            }
            _ => None,
        };
        Some(Attribute { name, matcher })
    }

    fn pseudo(&mut self, node: &PseudoNode) -> Option<SelectorPart> {
        let name = node.name.text(self.input);
        let part = if node.element {
            PseudoElementType::from_name(name)
                .filter(|_| node.arg.is_none())
                .map(|kind| SelectorPart::PseudoElement(PseudoElement { kind }))
        } else if let Some(kind) = PseudoClassType::from_name(name) {
            if kind.takes_argument() == node.arg.is_some() {
                Some(SelectorPart::PseudoClass(PseudoClass {
                    kind,
                    arg: node.arg.clone(),
                }))
            } else {
                None
            }
        } else {
            // Single-colon spellings of the legacy pseudo elements.
            PseudoElementType::from_name(name)
                .filter(|_| node.arg.is_none())
                .map(|kind| SelectorPart::PseudoElement(PseudoElement { kind }))
        };
        if part.is_none() {
            self.warn(
                WarningKind::InvalidPseudo {
                    name: name.to_string(),
                },
                &node.name,
            );
            log::debug!(
                target: "css.extract",
                "{}:{}: pseudo '{}' does not resolve",
                node.name.line,
                node.name.column,
                name
            );
        }
        part
    }

    fn declarations(&mut self, nodes: &[DeclarationNode]) -> Vec<Declaration> {
        nodes
            .iter()
            .filter_map(|node| self.declaration(node))
            .collect()
    }

    fn declaration(&mut self, node: &DeclarationNode) -> Option<Declaration> {
        let property = node.property.raw_text(self.input).to_ascii_lowercase();
        match self.terms(&node.items) {
            Some(terms) if !terms.is_empty() => Some(Declaration {
                property,
                terms,
                important: node.important,
                source: Some(Source {
                    base: self.base.clone(),
                    line: node.property.line,
                    column: node.property.column,
                }),
            }),
            _ => {
                log::debug!(
                    target: "css.extract",
                    "{}:{}: dropping declaration '{}', value does not extract",
                    node.property.line,
                    node.property.column,
                    property
                );
                self.warn(WarningKind::InvalidDeclaration { property }, &node.property);
                None
            }
        }
    }

    /// Folds the flat item stream into terms: separators attach to the term
    /// they precede (space being the default), a sign marker negates the
    /// next numeric literal, and each built term goes through the
    /// reclassification pass.
    fn terms(&mut self, items: &[TermItemNode]) -> Option<Vec<Term>> {
        let mut terms: Vec<Term> = Vec::new();
        let mut operator: Option<Operator> = None;
        let mut negate = false;
        for item in items {
            match item {
                TermItemNode::Space => {}
                TermItemNode::Plus => {}
                TermItemNode::Comma => operator = Some(Operator::Comma),
                TermItemNode::Slash => operator = Some(Operator::Slash),
                TermItemNode::Minus => negate = true,
                TermItemNode::Term(node) => {
                    let value = self.term_value(node, negate)?;
                    negate = false;
                    let op = if terms.is_empty() {
                        operator.take()
                    } else {
                        Some(operator.take().unwrap_or(Operator::Space))
                    };
                    terms.push(Term::new(op, value));
                }
            }
        }
        if negate {
            return None;
        }
        Some(terms)
    }

    fn term_value(&mut self, node: &TermNode, negate: bool) -> Option<TermValue> {
        match node {
            TermNode::Atom(token) => self.atom_value(token, negate),
            TermNode::Function(function) => {
                if negate {
                    return None;
                }
                self.function_value(function)
            }
        }
    }

    fn atom_value(&mut self, token: &Token, negate: bool) -> Option<TermValue> {
        let text = token.text(self.input);
        if negate
            && !matches!(
                token.kind,
                TokenKind::Number | TokenKind::Percentage | TokenKind::Dimension
            )
        {
            return None;
        }
        let value = match token.kind {
            TokenKind::Ident => match Color::from_name(text) {
                Some(color) => TermValue::Color(color),
                None => TermValue::Ident(text.to_string()),
            },
            TokenKind::String | TokenKind::UnclosedString => TermValue::String(text.to_string()),
            TokenKind::Number => {
                let (value, integer) = term::parse_number(text)?;
                TermValue::Number {
                    value: if negate { -value } else { value },
                    integer,
                }
            }
            TokenKind::Percentage => {
                let digits = text.strip_suffix('%').unwrap_or(text);
                let (value, _) = term::parse_number(digits)?;
                TermValue::Percent(if negate { -value } else { value })
            }
            TokenKind::Dimension => {
                let (value, unit) = term::split_dimension(text)?;
                TermValue::Dimension {
                    value: if negate { -value } else { value },
                    unit,
                }
            }
            TokenKind::Hash => TermValue::Color(Color::from_hex(text)?),
            TokenKind::Uri | TokenKind::UnclosedUri => TermValue::Uri {
                value: text.to_string(),
                base: token.base.clone(),
            },
            _ => return None,
        };
        Some(value)
    }

    fn function_value(&mut self, node: &FunctionNode) -> Option<TermValue> {
        let name = node.name.text(self.input).to_ascii_lowercase();
        let args = self.terms(&node.args)?;
        let values: Vec<&TermValue> = args.iter().map(|term| &term.value).collect();
        match name.as_str() {
            "rgb" | "rgba" => {
                if let Some(color) = Color::from_rgb_args(&values) {
                    return Some(TermValue::Color(color));
                }
            }
            "hsl" | "hsla" => {
                if let Some(color) = Color::from_hsl_args(&values) {
                    return Some(TermValue::Color(color));
                }
            }
            "rect" => {
                if let Some(rect) = Rect::from_args(&args) {
                    return Some(TermValue::Rect(rect));
                }
            }
            _ => {}
        }
        Some(TermValue::Function { name, args })
    }

    fn warn(&mut self, kind: WarningKind, token: &Token) {
        self.warnings
            .push(Warning::new(kind, token.line, token.column));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryState {
    Start,
    /// After `only` or `not`: a media type or an expression must follow.
    TypeOrExpr,
    Type,
    And,
    Expr,
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let c1 = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    let c2 = chars.next().unwrap_or('\n');
    let c3 = chars.next().unwrap_or('\n');
    start_ident_sequence(c1, c2, c3) && name.chars().all(|c| is_ident(c) || c == '\\')
}
