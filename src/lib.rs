use std::collections::HashSet;

use url::Url;

mod extract;
mod lexer;
mod model;
mod parser;
mod recovery;
mod selector;
mod source;
mod term;
mod token;
mod tree;

pub use extract::Preparator;
pub use extract::SimplePreparator;
pub use lexer::Lexer;
pub use lexer::LexerState;
pub use lexer::Pos;
pub use lexer::RawToken;
pub use lexer::RecoveryMode;
pub use lexer::Scanned;
pub use model::Declaration;
pub use model::ImportRecord;
pub use model::KeyframeBlock;
pub use model::MediaExpression;
pub use model::MediaQuery;
pub use model::Origin;
pub use model::Rule;
pub use model::RuleFontFace;
pub use model::RuleKeyframes;
pub use model::RuleMargin;
pub use model::RuleMedia;
pub use model::RulePage;
pub use model::RuleSet;
pub use model::RuleViewport;
pub use model::Source;
pub use model::StyleSheet;
pub use recovery::Expect;
pub use recovery::TokenRecovery;
pub use recovery::Warning;
pub use recovery::WarningKind;
pub use recovery::INVALID_STRING_TEXT;
pub use selector::Attribute;
pub use selector::AttributeOp;
pub use selector::CombinedSelector;
pub use selector::Combinator;
pub use selector::MarginArea;
pub use selector::PagePseudo;
pub use selector::PseudoClass;
pub use selector::PseudoClassType;
pub use selector::PseudoElement;
pub use selector::PseudoElementType;
pub use selector::Selector;
pub use selector::SelectorPart;
pub use source::decode_bytes;
pub use source::DefaultFetcher;
pub use source::NetworkFetcher;
pub use source::ParseError;
pub use term::Color;
pub use term::Operator;
pub use term::Rect;
pub use term::Term;
pub use term::TermValue;
pub use token::extract_class_keyword;
pub use token::extract_function;
pub use token::extract_hash;
pub use token::extract_string;
pub use token::extract_unclosed_string;
pub use token::extract_unclosed_uri;
pub use token::extract_uri;
pub use token::Category;
pub use token::Token;
pub use token::TokenKind;

use extract::Extractor;
use parser::Parser;

pub fn parse_stylesheet(css: &str) -> (StyleSheet, Vec<Warning>) {
    pipeline(css, None, Origin::Author)
}

pub fn parse_stylesheet_with_base(css: &str, base: Url) -> (StyleSheet, Vec<Warning>) {
    pipeline(css, Some(base), Origin::Author)
}

/// Decodes the bytes (BOM, declared encoding, or `@charset` prefix) and
/// parses the result.
pub fn parse_bytes(bytes: &[u8], declared_encoding: Option<&str>) -> (StyleSheet, Vec<Warning>) {
    let (css, mut warnings) = decode_bytes(bytes, declared_encoding);
    let (sheet, parse_warnings) = pipeline(&css, None, Origin::Author);
    warnings.extend(parse_warnings);
    (sheet, warnings)
}

/// Fetches a stylesheet, parses it, and folds in every reachable `@import`
/// in source order. Only the root fetch can fail; broken imports turn into
/// warnings on the result.
pub fn parse_url<F>(href: &str, fetcher: &F) -> Result<(StyleSheet, Vec<Warning>), ParseError>
where
    F: NetworkFetcher + ?Sized,
{
    let url = fetcher.resolve(None, href)?;
    let bytes = fetcher.fetch(&url)?;
    let (css, mut warnings) = decode_bytes(&bytes, None);
    let (mut sheet, parse_warnings) = pipeline(&css, Some(url.clone()), Origin::Author);
    warnings.extend(parse_warnings);
    let mut visited = HashSet::new();
    visited.insert(url.clone());
    let mut rules = source::load_imports(
        &sheet.imports,
        Some(&url),
        Origin::Author,
        fetcher,
        &SimplePreparator,
        &mut visited,
        &mut warnings,
    );
    if !rules.is_empty() {
        rules.append(&mut sheet.rules);
        sheet.rules = rules;
    }
    Ok((sheet, warnings))
}

/// Parses a `style=""` attribute value into a single ruleset tagged with
/// the owning element's label.
pub fn parse_inline(css: &str, element_label: &str, priority: bool) -> (StyleSheet, Vec<Warning>) {
    let (tokens, mut warnings) = TokenRecovery::new(css, None).tokenize();
    let (declarations, parse_warnings) = Parser::new(css, tokens).parse_inline_style();
    warnings.extend(parse_warnings);
    let extractor = Extractor::new(css, None, Origin::Author, SimplePreparator);
    let (sheet, extract_warnings) =
        extractor.extract_inline(&declarations, element_label, priority);
    warnings.extend(extract_warnings);
    (sheet, warnings)
}

/// Parses a standalone media query list, as found in a `media` attribute.
pub fn parse_media_query(text: &str) -> (Vec<MediaQuery>, Vec<Warning>) {
    let (tokens, mut warnings) = TokenRecovery::new(text, None).tokenize();
    let (queries, parse_warnings) = Parser::new(text, tokens).parse_media_list();
    warnings.extend(parse_warnings);
    let extractor = Extractor::new(text, None, Origin::Author, SimplePreparator);
    let (queries, extract_warnings) = extractor.extract_media(&queries);
    warnings.extend(extract_warnings);
    (queries, warnings)
}

pub(crate) fn pipeline(css: &str, base: Option<Url>, origin: Origin) -> (StyleSheet, Vec<Warning>) {
    let (tokens, mut warnings) = TokenRecovery::new(css, base.clone()).tokenize();
    let (tree, parse_warnings) = Parser::new(css, tokens).parse_stylesheet();
    warnings.extend(parse_warnings);
    let extractor = Extractor::new(css, base, origin, SimplePreparator);
    let (sheet, extract_warnings) = extractor.extract(&tree);
    warnings.extend(extract_warnings);
    (sheet, warnings)
}
