//! Selector object model: combined selectors, simple-selector parts,
//! attribute matchers and the pseudo name registries.

use std::fmt;

use smallvec::SmallVec;

/// Chain of simple selectors joined by combinators, e.g. `div > p.note`.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedSelector {
    pub head: Selector,
    pub tail: Vec<(Combinator, Selector)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
    Adjacent,
    Sibling,
}

/// One compound selector: element name and/or a run of id/class/attribute/
/// pseudo parts with no combinator between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub parts: SmallVec<[SelectorPart; 4]>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectorPart {
    Element(String),
    Universal,
    Id(String),
    Class(String),
    Attribute(Attribute),
    PseudoClass(PseudoClass),
    PseudoElement(PseudoElement),
    /// Synthetic part tagging a rule built from a `style=""` attribute with
    /// the element it belongs to. `priority` marks it as outranking
    /// equally specific sheet rules.
    InlineElement { label: String, priority: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub matcher: Option<(AttributeOp, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOp {
    Equals,
    Includes,
    DashMatch,
    Prefix,
    Suffix,
    Substring,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PseudoClass {
    pub kind: PseudoClassType,
    pub arg: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PseudoElement {
    pub kind: PseudoElementType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoClassType {
    Active,
    Checked,
    Disabled,
    Empty,
    Enabled,
    FirstChild,
    FirstOfType,
    Focus,
    Hover,
    Indeterminate,
    Lang,
    LastChild,
    LastOfType,
    Link,
    Not,
    NthChild,
    NthLastChild,
    NthLastOfType,
    NthOfType,
    OnlyChild,
    OnlyOfType,
    Root,
    Target,
    Visited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoElementType {
    After,
    Before,
    FirstLetter,
    FirstLine,
}

/// Page selector pseudo-classes (`@page :first` etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePseudo {
    Blank,
    First,
    Left,
    Right,
}

/// The sixteen `@page` margin box areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginArea {
    TopLeftCorner,
    TopLeft,
    TopCenter,
    TopRight,
    TopRightCorner,
    BottomLeftCorner,
    BottomLeft,
    BottomCenter,
    BottomRight,
    BottomRightCorner,
    LeftTop,
    LeftMiddle,
    LeftBottom,
    RightTop,
    RightMiddle,
    RightBottom,
}

impl PseudoClassType {
    /// Unknown names yield `None`, which invalidates the combined selector.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "checked" => Self::Checked,
            "disabled" => Self::Disabled,
            "empty" => Self::Empty,
            "enabled" => Self::Enabled,
            "first-child" => Self::FirstChild,
            "first-of-type" => Self::FirstOfType,
            "focus" => Self::Focus,
            "hover" => Self::Hover,
            "indeterminate" => Self::Indeterminate,
            "lang" => Self::Lang,
            "last-child" => Self::LastChild,
            "last-of-type" => Self::LastOfType,
            "link" => Self::Link,
            "not" => Self::Not,
            "nth-child" => Self::NthChild,
            "nth-last-child" => Self::NthLastChild,
            "nth-last-of-type" => Self::NthLastOfType,
            "nth-of-type" => Self::NthOfType,
            "only-child" => Self::OnlyChild,
            "only-of-type" => Self::OnlyOfType,
            "root" => Self::Root,
            "target" => Self::Target,
            "visited" => Self::Visited,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Checked => "checked",
            Self::Disabled => "disabled",
            Self::Empty => "empty",
            Self::Enabled => "enabled",
            Self::FirstChild => "first-child",
            Self::FirstOfType => "first-of-type",
            Self::Focus => "focus",
            Self::Hover => "hover",
            Self::Indeterminate => "indeterminate",
            Self::Lang => "lang",
            Self::LastChild => "last-child",
            Self::LastOfType => "last-of-type",
            Self::Link => "link",
            Self::Not => "not",
            Self::NthChild => "nth-child",
            Self::NthLastChild => "nth-last-child",
            Self::NthLastOfType => "nth-last-of-type",
            Self::NthOfType => "nth-of-type",
            Self::OnlyChild => "only-child",
            Self::OnlyOfType => "only-of-type",
            Self::Root => "root",
            Self::Target => "target",
            Self::Visited => "visited",
        }
    }

    /// Functional pseudo-classes require an argument, the rest forbid one.
    pub fn takes_argument(&self) -> bool {
        matches!(
            self,
            Self::Lang
                | Self::Not
                | Self::NthChild
                | Self::NthLastChild
                | Self::NthLastOfType
                | Self::NthOfType
        )
    }
}

impl PseudoElementType {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "after" => Self::After,
            "before" => Self::Before,
            "first-letter" => Self::FirstLetter,
            "first-line" => Self::FirstLine,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::After => "after",
            Self::Before => "before",
            Self::FirstLetter => "first-letter",
            Self::FirstLine => "first-line",
        }
    }
}

impl PagePseudo {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "blank" => Self::Blank,
            "first" => Self::First,
            "left" => Self::Left,
            "right" => Self::Right,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::First => "first",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl MarginArea {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "top-left-corner" => Self::TopLeftCorner,
            "top-left" => Self::TopLeft,
            "top-center" => Self::TopCenter,
            "top-right" => Self::TopRight,
            "top-right-corner" => Self::TopRightCorner,
            "bottom-left-corner" => Self::BottomLeftCorner,
            "bottom-left" => Self::BottomLeft,
            "bottom-center" => Self::BottomCenter,
            "bottom-right" => Self::BottomRight,
            "bottom-right-corner" => Self::BottomRightCorner,
            "left-top" => Self::LeftTop,
            "left-middle" => Self::LeftMiddle,
            "left-bottom" => Self::LeftBottom,
            "right-top" => Self::RightTop,
            "right-middle" => Self::RightMiddle,
            "right-bottom" => Self::RightBottom,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TopLeftCorner => "top-left-corner",
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::TopRightCorner => "top-right-corner",
            Self::BottomLeftCorner => "bottom-left-corner",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
            Self::BottomRightCorner => "bottom-right-corner",
            Self::LeftTop => "left-top",
            Self::LeftMiddle => "left-middle",
            Self::LeftBottom => "left-bottom",
            Self::RightTop => "right-top",
            Self::RightMiddle => "right-middle",
            Self::RightBottom => "right-bottom",
        }
    }
}

impl CombinedSelector {
    /// The rightmost compound selector, the one the rule actually styles.
    pub fn subject(&self) -> &Selector {
        self.tail.last().map(|(_, s)| s).unwrap_or(&self.head)
    }
}

impl Selector {
    pub fn element_name(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            SelectorPart::Element(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn pseudo_element(&self) -> Option<PseudoElementType> {
        self.parts.iter().find_map(|part| match part {
            SelectorPart::PseudoElement(p) => Some(p.kind),
            _ => None,
        })
    }
}

impl fmt::Display for CombinedSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        for (combinator, selector) in &self.tail {
            match combinator {
                Combinator::Descendant => write!(f, " ")?,
                Combinator::Child => write!(f, " > ")?,
                Combinator::Adjacent => write!(f, " + ")?,
                Combinator::Sibling => write!(f, " ~ ")?,
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectorPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(name) => write!(f, "{name}"),
            Self::Universal => write!(f, "*"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(class) => write!(f, ".{class}"),
            Self::Attribute(attribute) => write!(f, "{attribute}"),
            Self::PseudoClass(pseudo) => write!(f, "{pseudo}"),
            Self::PseudoElement(pseudo) => write!(f, "::{}", pseudo.kind.name()),
            Self::InlineElement { label, .. } => write!(f, "{label}"),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.matcher {
            None => write!(f, "[{}]", self.name),
            Some((op, value)) => {
                let op = match op {
                    AttributeOp::Equals => "=",
                    AttributeOp::Includes => "~=",
                    AttributeOp::DashMatch => "|=",
                    AttributeOp::Prefix => "^=",
                    AttributeOp::Suffix => "$=",
                    AttributeOp::Substring => "*=",
                };
                write!(f, "[{}{}\"{}\"]", self.name, op, value)
            }
        }
    }
}

impl fmt::Display for PseudoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arg {
            Some(arg) => write!(f, ":{}({})", self.kind.name(), arg),
            None => write!(f, ":{}", self.kind.name()),
        }
    }
}
