//! Stylesheet object model: the frozen result of a parse. Construction
//! happens in the extractor; everything here is plain data plus `Display`
//! serialization back to readable CSS.

use std::fmt;

use url::Url;

use crate::selector::{CombinedSelector, MarginArea, PagePseudo};
use crate::term::Term;

/// Where a sheet came from, for cascade purposes downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    #[default]
    Author,
    Agent,
    User,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleSheet {
    pub origin: Origin,
    pub rules: Vec<Rule>,
    /// Import paths honored while extracting, as written in the source.
    pub imports: Vec<ImportRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportRecord {
    pub uri: String,
    pub media: Vec<MediaQuery>,
    pub source: Option<Source>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Set(RuleSet),
    Media(RuleMedia),
    Page(RulePage),
    FontFace(RuleFontFace),
    Viewport(RuleViewport),
    Keyframes(RuleKeyframes),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub selectors: Vec<CombinedSelector>,
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleMedia {
    pub queries: Vec<MediaQuery>,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RulePage {
    pub name: Option<String>,
    pub pseudo: Option<PagePseudo>,
    pub declarations: Vec<Declaration>,
    pub margins: Vec<RuleMargin>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleMargin {
    pub area: MarginArea,
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleFontFace {
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleViewport {
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleKeyframes {
    pub name: String,
    pub blocks: Vec<KeyframeBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeBlock {
    /// Offsets in percent; `from` and `to` normalize to 0 and 100.
    pub selectors: Vec<f32>,
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Lowercased property name.
    pub property: String,
    pub terms: Vec<Term>,
    pub important: bool,
    pub source: Option<Source>,
}

/// Position a declaration was read from, for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub base: Option<Url>,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaQuery {
    pub media_type: Option<String>,
    pub negative: bool,
    pub only: bool,
    pub expressions: Vec<MediaExpression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaExpression {
    pub feature: String,
    pub terms: Vec<Term>,
}

impl MediaQuery {
    /// The downgrade target for malformed queries: matches nothing.
    pub fn never() -> Self {
        Self {
            media_type: Some("all".to_string()),
            negative: true,
            only: false,
            expressions: Vec::new(),
        }
    }
}

impl RuleFontFace {
    fn declaration<'a>(&'a self, property: &str) -> Option<&'a Declaration> {
        self.declarations.iter().find(|d| d.property == property)
    }

    pub fn font_family(&self) -> Option<&Declaration> {
        self.declaration("font-family")
    }

    pub fn sources(&self) -> Option<&Declaration> {
        self.declaration("src")
    }
}

impl fmt::Display for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{rule}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set(rule) => write!(f, "{rule}"),
            Self::Media(rule) => write!(f, "{rule}"),
            Self::Page(rule) => write!(f, "{rule}"),
            Self::FontFace(rule) => write!(f, "{rule}"),
            Self::Viewport(rule) => write!(f, "{rule}"),
            Self::Keyframes(rule) => write!(f, "{rule}"),
        }
    }
}

fn write_declarations(f: &mut fmt::Formatter<'_>, declarations: &[Declaration]) -> fmt::Result {
    for declaration in declarations {
        writeln!(f, "  {declaration}")?;
    }
    Ok(())
}

fn write_indented(f: &mut fmt::Formatter<'_>, inner: impl fmt::Display) -> fmt::Result {
    let text = inner.to_string();
    for line in text.lines() {
        writeln!(f, "  {line}")?;
    }
    Ok(())
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{selector}")?;
        }
        writeln!(f, " {{")?;
        write_declarations(f, &self.declarations)?;
        write!(f, "}}")
    }
}

impl fmt::Display for RuleMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@media ")?;
        for (i, query) in self.queries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{query}")?;
        }
        writeln!(f, " {{")?;
        for rule in &self.rules {
            write_indented(f, rule)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for RulePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@page")?;
        if let Some(name) = &self.name {
            write!(f, " {name}")?;
        }
        if let Some(pseudo) = &self.pseudo {
            if self.name.is_some() {
                write!(f, ":{}", pseudo.name())?;
            } else {
                write!(f, " :{}", pseudo.name())?;
            }
        }
        writeln!(f, " {{")?;
        write_declarations(f, &self.declarations)?;
        for margin in &self.margins {
            write_indented(f, margin)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for RuleMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "@{} {{", self.area.name())?;
        write_declarations(f, &self.declarations)?;
        write!(f, "}}")
    }
}

impl fmt::Display for RuleFontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "@font-face {{")?;
        write_declarations(f, &self.declarations)?;
        write!(f, "}}")
    }
}

impl fmt::Display for RuleViewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "@viewport {{")?;
        write_declarations(f, &self.declarations)?;
        write!(f, "}}")
    }
}

impl fmt::Display for RuleKeyframes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "@keyframes {} {{", self.name)?;
        for block in &self.blocks {
            write_indented(f, block)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for KeyframeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, percent) in self.selectors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            crate::term::write_number(f, *percent, percent.fract() == 0.0)?;
            write!(f, "%")?;
        }
        writeln!(f, " {{")?;
        write_declarations(f, &self.declarations)?;
        write!(f, "}}")
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.property)?;
        for term in &self.terms {
            if term.operator.is_none() {
                write!(f, " ")?;
            }
            write!(f, "{term}")?;
        }
        if self.important {
            write!(f, " !important")?;
        }
        write!(f, ";")
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "not ")?;
        } else if self.only {
            write!(f, "only ")?;
        }
        let mut wrote = false;
        if let Some(media_type) = &self.media_type {
            write!(f, "{media_type}")?;
            wrote = true;
        }
        for expression in &self.expressions {
            if wrote {
                write!(f, " and ")?;
            }
            write!(f, "{expression}")?;
            wrote = true;
        }
        if !wrote {
            write!(f, "all")?;
        }
        Ok(())
    }
}

impl fmt::Display for MediaExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:", self.feature)?;
        for term in &self.terms {
            if term.operator.is_none() {
                write!(f, " ")?;
            }
            write!(f, "{term}")?;
        }
        write!(f, ")")
    }
}
