use css_sheet_parser::parse_media_query;
use css_sheet_parser::parse_stylesheet;
use css_sheet_parser::MediaQuery;
use css_sheet_parser::Rule;
use css_sheet_parser::RuleMedia;
use css_sheet_parser::TermValue;
use css_sheet_parser::Warning;
use css_sheet_parser::WarningKind;
use indoc::indoc;

fn query(text: &str) -> MediaQuery {
    let (mut queries, warnings) = parse_media_query(text);
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    assert_eq!(queries.len(), 1);
    queries.remove(0)
}

fn media(rule: &Rule) -> &RuleMedia {
    match rule {
        Rule::Media(media) => media,
        other => panic!("expected media rule, got {other:?}"),
    }
}

fn kinds(warnings: &[Warning]) -> Vec<&WarningKind> {
    warnings.iter().map(|warning| &warning.kind).collect()
}

#[test]
fn plain_media_type() {
    let q = query("screen");
    assert_eq!(q.media_type.as_deref(), Some("screen"));
    assert!(!q.negative);
    assert!(!q.only);
    assert!(q.expressions.is_empty());
}

#[test]
fn media_type_is_lowercased() {
    assert_eq!(query("SCREEN").media_type.as_deref(), Some("screen"));
}

#[test]
fn not_and_only_prefixes() {
    let q = query("not print");
    assert!(q.negative);
    assert_eq!(q.media_type.as_deref(), Some("print"));

    let q = query("only screen");
    assert!(q.only);
    assert_eq!(q.media_type.as_deref(), Some("screen"));
}

#[test]
fn type_with_feature_expression() {
    let q = query("screen and (min-width: 100px)");
    assert_eq!(q.media_type.as_deref(), Some("screen"));
    assert_eq!(q.expressions.len(), 1);
    assert_eq!(q.expressions[0].feature, "min-width");
    assert_eq!(
        q.expressions[0].terms[0].value,
        TermValue::Dimension {
            value: 100.0,
            unit: "px".to_string()
        }
    );
}

#[test]
fn bare_expression_without_a_type() {
    let q = query("(orientation: portrait)");
    assert_eq!(q.media_type, None);
    assert_eq!(q.expressions.len(), 1);
    assert_eq!(q.expressions[0].feature, "orientation");
    assert_eq!(
        q.expressions[0].terms[0].value,
        TermValue::Ident("portrait".to_string())
    );
}

#[test]
fn valueless_feature_expression() {
    let q = query("tv and (width)");
    assert_eq!(q.media_type.as_deref(), Some("tv"));
    assert_eq!(q.expressions[0].feature, "width");
    assert!(q.expressions[0].terms.is_empty());
}

#[test]
fn comma_separates_queries() {
    let (queries, warnings) = parse_media_query("screen, print");
    assert!(warnings.is_empty());
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].media_type.as_deref(), Some("screen"));
    assert_eq!(queries[1].media_type.as_deref(), Some("print"));
}

#[test]
fn empty_input_is_an_empty_list() {
    let (queries, warnings) = parse_media_query("");
    assert!(queries.is_empty());
    assert!(warnings.is_empty());
}

#[test]
fn misplaced_keyword_warns_and_downgrades() {
    let (queries, warnings) = parse_media_query("and screen");
    assert_eq!(queries, vec![MediaQuery::never()]);
    assert_eq!(kinds(&warnings), vec![&WarningKind::InvalidMediaQuery]);

    let (queries, warnings) = parse_media_query("screen nonsense");
    assert_eq!(queries, vec![MediaQuery::never()]);
    assert_eq!(kinds(&warnings), vec![&WarningKind::InvalidMediaQuery]);
}

#[test]
fn type_after_expression_warns_and_downgrades() {
    let (queries, warnings) = parse_media_query("(orientation: portrait) and screen");
    assert_eq!(queries, vec![MediaQuery::never()]);
    assert_eq!(kinds(&warnings), vec![&WarningKind::InvalidMediaQuery]);
}

#[test]
fn dangling_connector_downgrades_silently() {
    for text in ["screen and", "not", "only"] {
        let (queries, warnings) = parse_media_query(text);
        assert_eq!(queries, vec![MediaQuery::never()], "query {text:?}");
        assert!(warnings.is_empty(), "query {text:?} warned: {warnings:?}");
    }
}

#[test]
fn never_prints_as_not_all() {
    assert_eq!(MediaQuery::never().to_string(), "not all");
}

#[test]
fn query_display_round_trips() {
    let q = query("only screen and (min-width: 100px)");
    assert_eq!(q.to_string(), "only screen and (min-width: 100px)");
    let (queries, warnings) = parse_media_query(&q.to_string());
    assert!(warnings.is_empty());
    assert_eq!(queries, vec![q]);
}

#[test]
fn media_rule_with_nested_rules() {
    let (sheet, warnings) = parse_stylesheet(indoc! {"
        @media screen, print {
          a { color: red }
          b { color: blue }
        }
    "});
    assert!(warnings.is_empty());
    assert_eq!(sheet.rules.len(), 1);
    let rule = media(&sheet.rules[0]);
    assert_eq!(rule.queries.len(), 2);
    assert_eq!(rule.rules.len(), 2);
    assert!(matches!(&rule.rules[0], Rule::Set(_)));
}

#[test]
fn media_rules_nest() {
    let (sheet, warnings) = parse_stylesheet(indoc! {"
        @media screen {
          @media (min-width: 100px) {
            a { color: red }
          }
        }
    "});
    assert!(warnings.is_empty());
    let outer = media(&sheet.rules[0]);
    assert_eq!(outer.queries[0].media_type.as_deref(), Some("screen"));
    let inner = media(&outer.rules[0]);
    assert_eq!(inner.queries[0].expressions[0].feature, "min-width");
    assert_eq!(inner.rules.len(), 1);
}

#[test]
fn empty_media_rule_is_dropped() {
    let (sheet, warnings) = parse_stylesheet("@media screen { }");
    assert!(sheet.rules.is_empty());
    assert!(warnings.is_empty());
}

#[test]
fn import_inside_media_is_rejected() {
    let (sheet, warnings) =
        parse_stylesheet("@media screen { @import \"x.css\"; a { color: red } }");
    assert!(sheet.imports.is_empty());
    assert_eq!(media(&sheet.rules[0]).rules.len(), 1);
    assert_eq!(kinds(&warnings), vec![&WarningKind::ImportAfterContent]);
}

#[test]
fn one_bad_query_does_not_poison_its_siblings() {
    let (sheet, warnings) =
        parse_stylesheet("@media screen and and, print { a { color: red } }");
    let rule = media(&sheet.rules[0]);
    assert_eq!(rule.queries.len(), 2);
    assert_eq!(rule.queries[0], MediaQuery::never());
    assert_eq!(rule.queries[1].media_type.as_deref(), Some("print"));
    assert_eq!(rule.rules.len(), 1);
    assert_eq!(kinds(&warnings), vec![&WarningKind::InvalidMediaQuery]);
}

#[test]
fn broken_expression_resynchronizes_at_the_comma() {
    let (sheet, warnings) =
        parse_stylesheet("@media screen and (}), print { b { color: red } }");
    let rule = media(&sheet.rules[0]);
    assert_eq!(rule.queries.len(), 2);
    assert_eq!(rule.queries[0], MediaQuery::never());
    assert_eq!(rule.queries[1].media_type.as_deref(), Some("print"));
    assert_eq!(rule.rules.len(), 1);
    assert_eq!(kinds(&warnings), vec![&WarningKind::InvalidMediaQuery]);
}

#[test]
fn media_without_a_block_is_skipped() {
    let (sheet, warnings) = parse_stylesheet("@media screen; a { color: red }");
    assert_eq!(sheet.rules.len(), 1);
    assert!(matches!(&sheet.rules[0], Rule::Set(_)));
    assert_eq!(kinds(&warnings), vec![&WarningKind::InvalidStatement]);
}
