use css_sheet_parser::parse_inline;
use css_sheet_parser::parse_stylesheet;
use css_sheet_parser::parse_stylesheet_with_base;
use css_sheet_parser::AttributeOp;
use css_sheet_parser::Color;
use css_sheet_parser::Combinator;
use css_sheet_parser::Declaration;
use css_sheet_parser::MarginArea;
use css_sheet_parser::Operator;
use css_sheet_parser::Origin;
use css_sheet_parser::PagePseudo;
use css_sheet_parser::PseudoClassType;
use css_sheet_parser::PseudoElementType;
use css_sheet_parser::Rule;
use css_sheet_parser::RuleSet;
use css_sheet_parser::SelectorPart;
use css_sheet_parser::StyleSheet;
use css_sheet_parser::TermValue;
use css_sheet_parser::Warning;
use css_sheet_parser::WarningKind;
use indoc::indoc;
use url::Url;

fn clean(css: &str) -> StyleSheet {
    let (sheet, warnings) = parse_stylesheet(css);
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    sheet
}

fn ruleset(rule: &Rule) -> &RuleSet {
    match rule {
        Rule::Set(set) => set,
        other => panic!("expected ruleset, got {other:?}"),
    }
}

fn declaration<'a>(set: &'a RuleSet, property: &str) -> &'a Declaration {
    set.declarations
        .iter()
        .find(|d| d.property == property)
        .unwrap_or_else(|| panic!("no declaration '{property}'"))
}

fn values(declaration: &Declaration) -> Vec<&TermValue> {
    declaration.terms.iter().map(|term| &term.value).collect()
}

fn kinds(warnings: &[Warning]) -> Vec<&WarningKind> {
    warnings.iter().map(|warning| &warning.kind).collect()
}

#[test]
fn basic_ruleset() {
    let sheet = clean("a { color: red }");
    assert_eq!(sheet.rules.len(), 1);
    let set = ruleset(&sheet.rules[0]);
    assert_eq!(set.selectors.len(), 1);
    assert_eq!(
        set.selectors[0].head.parts[0],
        SelectorPart::Element("a".to_string())
    );
    let color = declaration(set, "color");
    assert!(!color.important);
    assert_eq!(color.terms.len(), 1);
    assert_eq!(color.terms[0].operator, None);
    assert_eq!(
        color.terms[0].value,
        TermValue::Color(Color::rgb(255, 0, 0))
    );
    assert_eq!(sheet.to_string(), "a {\n  color: #ff0000;\n}");
}

#[test]
fn element_and_property_names_are_lowercased() {
    let sheet = clean("DIV { COLOR: RED }");
    let set = ruleset(&sheet.rules[0]);
    assert_eq!(
        set.selectors[0].head.parts[0],
        SelectorPart::Element("div".to_string())
    );
    assert_eq!(set.declarations[0].property, "color");
    assert_eq!(
        values(&set.declarations[0]),
        vec![&TermValue::Color(Color::rgb(255, 0, 0))]
    );
}

#[test]
fn bad_declaration_does_not_poison_siblings() {
    let (sheet, warnings) = parse_stylesheet("a{color:red} b{color:!invalid!} c{color:blue}");
    assert_eq!(sheet.rules.len(), 2);
    assert_eq!(
        ruleset(&sheet.rules[0]).selectors[0].head.parts[0],
        SelectorPart::Element("a".to_string())
    );
    assert_eq!(
        ruleset(&sheet.rules[1]).selectors[0].head.parts[0],
        SelectorPart::Element("c".to_string())
    );
    assert_eq!(
        kinds(&warnings),
        vec![&WarningKind::InvalidDeclaration {
            property: "color".to_string()
        }]
    );
}

#[test]
fn declaration_recovery_respects_nested_braces() {
    let (sheet, warnings) = parse_stylesheet("a { margin: { bogus }; color: blue }");
    let set = ruleset(&sheet.rules[0]);
    assert_eq!(set.declarations.len(), 1);
    assert_eq!(set.declarations[0].property, "color");
    assert_eq!(
        values(&set.declarations[0]),
        vec![&TermValue::Color(Color::rgb(0, 0, 255))]
    );
    assert_eq!(
        kinds(&warnings),
        vec![&WarningKind::InvalidDeclaration {
            property: "margin".to_string()
        }]
    );
}

#[test]
fn declaration_without_colon_is_dropped() {
    let (sheet, warnings) = parse_stylesheet("a { margin: 1px; color }");
    let set = ruleset(&sheet.rules[0]);
    assert_eq!(set.declarations.len(), 1);
    assert_eq!(set.declarations[0].property, "margin");
    assert_eq!(
        values(&set.declarations[0]),
        vec![&TermValue::Dimension {
            value: 1.0,
            unit: "px".to_string()
        }]
    );
    assert_eq!(
        kinds(&warnings),
        vec![&WarningKind::InvalidDeclaration {
            property: "color".to_string()
        }]
    );
}

#[test]
fn nested_block_in_a_declaration_list_is_junked_to_its_own_semicolon() {
    let (sheet, warnings) = parse_stylesheet("a { b { color: red } margin: 0; top: 1px }");
    let set = ruleset(&sheet.rules[0]);
    assert_eq!(set.declarations.len(), 1);
    assert_eq!(set.declarations[0].property, "top");
    assert_eq!(
        kinds(&warnings),
        vec![&WarningKind::InvalidDeclaration {
            property: "b".to_string()
        }]
    );
}

#[test]
fn important_flag() {
    let sheet = clean("a { color: red !important; margin: 0 ! important }");
    let set = ruleset(&sheet.rules[0]);
    assert!(declaration(set, "color").important);
    assert!(declaration(set, "margin").important);
    assert_eq!(
        declaration(set, "color").to_string(),
        "color: #ff0000 !important;"
    );
}

#[test]
fn misspelled_important_drops_the_declaration() {
    let (sheet, warnings) = parse_stylesheet("a { color: red !importan }");
    assert!(sheet.rules.is_empty());
    assert_eq!(
        kinds(&warnings),
        vec![&WarningKind::InvalidDeclaration {
            property: "color".to_string()
        }]
    );
}

#[test]
fn trailing_terms_after_important_drop_the_declaration() {
    let (sheet, warnings) = parse_stylesheet("a { color: red !important blue }");
    assert!(sheet.rules.is_empty());
    assert_eq!(
        kinds(&warnings),
        vec![&WarningKind::InvalidDeclaration {
            property: "color".to_string()
        }]
    );
}

#[test]
fn color_reclassification() {
    let sheet = clean(indoc! {"
        a {
          color: #f00;
          background: #ff0000;
          border-color: rgb(255, 0, 0);
          border-top-color: rgb(100%, 0%, 0%);
          outline-color: rgba(0, 0, 0, 0.5);
          text-emphasis-color: hsl(120, 50%, 50%);
          caret-color: transparent;
        }
    "});
    let set = ruleset(&sheet.rules[0]);
    let red = TermValue::Color(Color::rgb(255, 0, 0));
    assert_eq!(values(declaration(set, "color")), vec![&red]);
    assert_eq!(values(declaration(set, "background")), vec![&red]);
    assert_eq!(values(declaration(set, "border-color")), vec![&red]);
    assert_eq!(values(declaration(set, "border-top-color")), vec![&red]);
    assert_eq!(
        values(declaration(set, "outline-color")),
        vec![&TermValue::Color(Color {
            r: 0,
            g: 0,
            b: 0,
            a: 128
        })]
    );
    assert_eq!(
        declaration(set, "outline-color").to_string(),
        "outline-color: rgba(0, 0, 0, 0.50);"
    );
    assert_eq!(
        values(declaration(set, "text-emphasis-color")),
        vec![&TermValue::Color(Color {
            r: 64,
            g: 191,
            b: 64,
            a: 255
        })]
    );
    assert_eq!(
        values(declaration(set, "caret-color")),
        vec![&TermValue::Color(Color::TRANSPARENT)]
    );
}

#[test]
fn unrecognized_color_forms_stay_functions() {
    let sheet = clean("a { color: rgbx(1, 2, 3); border-color: rgb(30deg) }");
    let set = ruleset(&sheet.rules[0]);
    match values(declaration(set, "color"))[0] {
        TermValue::Function { name, args } => {
            assert_eq!(name, "rgbx");
            assert_eq!(args.len(), 3);
        }
        other => panic!("expected function, got {other:?}"),
    }
    match values(declaration(set, "border-color"))[0] {
        TermValue::Function { name, args } => {
            assert_eq!(name, "rgb");
            assert_eq!(args.len(), 1);
        }
        other => panic!("expected function, got {other:?}"),
    }
}

#[test]
fn invalid_hex_color_drops_the_declaration() {
    let (sheet, warnings) = parse_stylesheet("a { color: #12; margin: 0 }");
    let set = ruleset(&sheet.rules[0]);
    assert_eq!(set.declarations.len(), 1);
    assert_eq!(set.declarations[0].property, "margin");
    assert_eq!(
        kinds(&warnings),
        vec![&WarningKind::InvalidDeclaration {
            property: "color".to_string()
        }]
    );
}

#[test]
fn non_ascii_hash_value_drops_the_declaration() {
    let (sheet, warnings) = parse_stylesheet("a { color: #ÿa; margin: 0 }");
    let set = ruleset(&sheet.rules[0]);
    assert_eq!(set.declarations.len(), 1);
    assert_eq!(set.declarations[0].property, "margin");
    assert_eq!(
        kinds(&warnings),
        vec![&WarningKind::InvalidDeclaration {
            property: "color".to_string()
        }]
    );
}

#[test]
fn rect_reclassification() {
    let sheet = clean(indoc! {"
        a {
          clip: rect(1px, 2px, 3px, 4px);
          shape-outside: rect(1px 2px 3px 4px);
          clip-path: rect(auto, auto, 10px, 0);
        }
    "});
    let set = ruleset(&sheet.rules[0]);
    for property in ["clip", "shape-outside", "clip-path"] {
        match values(declaration(set, property))[0] {
            TermValue::Rect(rect) => assert_eq!(rect.edges.len(), 4),
            other => panic!("expected rect in '{property}', got {other:?}"),
        }
    }
    assert_eq!(
        declaration(set, "clip").to_string(),
        "clip: rect(1px, 2px, 3px, 4px);"
    );
}

#[test]
fn rect_with_wrong_arity_stays_a_function() {
    let sheet = clean("a { clip: rect(1px, 2px) }");
    let set = ruleset(&sheet.rules[0]);
    assert!(matches!(
        values(declaration(set, "clip"))[0],
        TermValue::Function { .. }
    ));
}

#[test]
fn minus_negates_numeric_literals() {
    let sheet = clean("a { margin: -5px; top: -2; width: -50% }");
    let set = ruleset(&sheet.rules[0]);
    assert_eq!(
        values(declaration(set, "margin")),
        vec![&TermValue::Dimension {
            value: -5.0,
            unit: "px".to_string()
        }]
    );
    assert_eq!(
        values(declaration(set, "top")),
        vec![&TermValue::Number {
            value: -2.0,
            integer: true
        }]
    );
    assert_eq!(
        values(declaration(set, "width")),
        vec![&TermValue::Percent(-50.0)]
    );
}

#[test]
fn exponent_notation_in_numbers_and_dimensions() {
    let sheet = clean("a { width: 1e3px; top: 15e-1; height: 1em }");
    let set = ruleset(&sheet.rules[0]);
    assert_eq!(
        values(declaration(set, "width")),
        vec![&TermValue::Dimension {
            value: 1000.0,
            unit: "px".to_string()
        }]
    );
    assert_eq!(
        values(declaration(set, "top")),
        vec![&TermValue::Number {
            value: 1.5,
            integer: false
        }]
    );
    assert_eq!(
        values(declaration(set, "height")),
        vec![&TermValue::Dimension {
            value: 1.0,
            unit: "em".to_string()
        }]
    );
    assert_eq!(declaration(set, "width").to_string(), "width: 1000px;");
    assert_eq!(declaration(set, "top").to_string(), "top: 1.5;");
}

#[test]
fn minus_before_non_numeric_drops_the_declaration() {
    let (sheet, warnings) = parse_stylesheet("a { margin: - auto; top: 1px - }");
    assert!(sheet.rules.is_empty());
    assert_eq!(
        kinds(&warnings),
        vec![
            &WarningKind::InvalidDeclaration {
                property: "margin".to_string()
            },
            &WarningKind::InvalidDeclaration {
                property: "top".to_string()
            },
        ]
    );
}

#[test]
fn uri_terms_carry_the_sheet_base() {
    let base = Url::parse("http://example.com/css/site.css").unwrap();
    let (sheet, warnings) = parse_stylesheet_with_base(
        "a { background: url(img.png) url(\"q.png\") }",
        base.clone(),
    );
    assert!(warnings.is_empty());
    let set = ruleset(&sheet.rules[0]);
    let background = values(declaration(set, "background"));
    assert_eq!(
        background[0],
        &TermValue::Uri {
            value: "img.png".to_string(),
            base: Some(base.clone())
        }
    );
    assert_eq!(
        background[1],
        &TermValue::Uri {
            value: "q.png".to_string(),
            base: Some(base)
        }
    );
}

#[test]
fn unclosed_url_still_produces_a_declaration() {
    let (sheet, warnings) = parse_stylesheet("a { background: url(img.png");
    assert!(warnings.is_empty());
    let set = ruleset(&sheet.rules[0]);
    assert_eq!(
        values(declaration(set, "background")),
        vec![&TermValue::Uri {
            value: "img.png".to_string(),
            base: None
        }]
    );
}

#[test]
fn unclosed_string_still_produces_a_declaration() {
    let (sheet, warnings) = parse_stylesheet("a { content: \"abc");
    assert!(warnings.is_empty());
    let set = ruleset(&sheet.rules[0]);
    assert_eq!(
        values(declaration(set, "content")),
        vec![&TermValue::String("abc".to_string())]
    );
}

#[test]
fn legacy_filter_equals_is_tolerated() {
    let sheet = clean("a { filter: alpha(opacity=50) }");
    let set = ruleset(&sheet.rules[0]);
    match values(declaration(set, "filter"))[0] {
        TermValue::Function { name, args } => {
            assert_eq!(name, "alpha");
            assert_eq!(args.len(), 2);
            assert_eq!(args[0].value, TermValue::Ident("opacity".to_string()));
            assert_eq!(args[1].operator, Some(Operator::Space));
            assert_eq!(
                args[1].value,
                TermValue::Number {
                    value: 50.0,
                    integer: true
                }
            );
        }
        other => panic!("expected function, got {other:?}"),
    }
}

#[test]
fn font_shorthand_slash() {
    let sheet = clean("a { font: 12px/1.5 sans-serif }");
    let set = ruleset(&sheet.rules[0]);
    let font = declaration(set, "font");
    assert_eq!(font.terms.len(), 3);
    assert_eq!(font.terms[1].operator, Some(Operator::Slash));
    assert_eq!(
        font.terms[1].value,
        TermValue::Number {
            value: 1.5,
            integer: false
        }
    );
    assert_eq!(font.to_string(), "font: 12px/1.5 sans-serif;");
}

#[test]
fn combinator_chain() {
    let sheet = clean("ul > li + a ~ b i { color: red }");
    let set = ruleset(&sheet.rules[0]);
    let selector = &set.selectors[0];
    assert_eq!(
        selector.head.parts[0],
        SelectorPart::Element("ul".to_string())
    );
    let combinators: Vec<Combinator> = selector.tail.iter().map(|(c, _)| *c).collect();
    assert_eq!(
        combinators,
        vec![
            Combinator::Child,
            Combinator::Adjacent,
            Combinator::Sibling,
            Combinator::Descendant,
        ]
    );
    assert_eq!(selector.to_string(), "ul > li + a ~ b i");
    assert_eq!(selector.subject().element_name(), Some("i"));
}

#[test]
fn compound_selector_parts() {
    let sheet =
        clean(r#"div#nav.item[HREF][rel="next"][lang|="en"]:hover::after { color: red }"#);
    let set = ruleset(&sheet.rules[0]);
    let parts = &set.selectors[0].head.parts;
    assert_eq!(parts.len(), 8);
    assert_eq!(parts[0], SelectorPart::Element("div".to_string()));
    assert_eq!(parts[1], SelectorPart::Id("nav".to_string()));
    assert_eq!(parts[2], SelectorPart::Class("item".to_string()));
    match &parts[3] {
        SelectorPart::Attribute(attribute) => {
            assert_eq!(attribute.name, "href");
            assert_eq!(attribute.matcher, None);
        }
        other => panic!("expected attribute, got {other:?}"),
    }
    match &parts[4] {
        SelectorPart::Attribute(attribute) => {
            assert_eq!(
                attribute.matcher,
                Some((AttributeOp::Equals, "next".to_string()))
            );
        }
        other => panic!("expected attribute, got {other:?}"),
    }
    match &parts[5] {
        SelectorPart::Attribute(attribute) => {
            assert_eq!(
                attribute.matcher,
                Some((AttributeOp::DashMatch, "en".to_string()))
            );
        }
        other => panic!("expected attribute, got {other:?}"),
    }
    match &parts[6] {
        SelectorPart::PseudoClass(pseudo) => {
            assert_eq!(pseudo.kind, PseudoClassType::Hover);
            assert_eq!(pseudo.arg, None);
        }
        other => panic!("expected pseudo class, got {other:?}"),
    }
    match &parts[7] {
        SelectorPart::PseudoElement(pseudo) => {
            assert_eq!(pseudo.kind, PseudoElementType::After);
        }
        other => panic!("expected pseudo element, got {other:?}"),
    }
    assert_eq!(
        set.selectors[0].to_string(),
        r#"div#nav.item[href][rel="next"][lang|="en"]:hover::after"#
    );
}

#[test]
fn numeric_id_invalidates_the_whole_rule() {
    let (sheet, warnings) = parse_stylesheet("a, #123 { color: red } b { color: blue }");
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(
        ruleset(&sheet.rules[0]).selectors[0].head.parts[0],
        SelectorPart::Element("b".to_string())
    );
    assert_eq!(kinds(&warnings), vec![&WarningKind::InvalidSelector]);
}

#[test]
fn legacy_single_colon_pseudo_elements() {
    let sheet = clean("p:before { content: \"*\" }");
    let set = ruleset(&sheet.rules[0]);
    assert_eq!(
        set.selectors[0].head.pseudo_element(),
        Some(PseudoElementType::Before)
    );
    assert_eq!(set.selectors[0].to_string(), "p::before");
}

#[test]
fn second_pseudo_element_drops_the_rule() {
    let (sheet, warnings) = parse_stylesheet("p:after::before { color: red }");
    assert!(sheet.rules.is_empty());
    assert_eq!(kinds(&warnings), vec![&WarningKind::DuplicatePseudoElement]);
}

#[test]
fn pseudo_argument_arity_is_enforced() {
    let (sheet, warnings) = parse_stylesheet("p:hover(2) { color: red } q:lang { color: red }");
    assert!(sheet.rules.is_empty());
    assert_eq!(
        kinds(&warnings),
        vec![
            &WarningKind::InvalidPseudo {
                name: "hover".to_string()
            },
            &WarningKind::InvalidPseudo {
                name: "lang".to_string()
            },
        ]
    );
}

#[test]
fn functional_pseudo_classes_concatenate_their_argument() {
    let sheet = clean("li:nth-child( 2n + 1 ) { color: red }");
    let set = ruleset(&sheet.rules[0]);
    match &set.selectors[0].head.parts[1] {
        SelectorPart::PseudoClass(pseudo) => {
            assert_eq!(pseudo.kind, PseudoClassType::NthChild);
            assert_eq!(pseudo.arg.as_deref(), Some("2n+1"));
        }
        other => panic!("expected pseudo class, got {other:?}"),
    }
    assert_eq!(set.selectors[0].to_string(), "li:nth-child(2n+1)");
}

#[test]
fn negation_pseudo_class() {
    let sheet = clean("a:not(.external) { color: red }");
    let set = ruleset(&sheet.rules[0]);
    match &set.selectors[0].head.parts[1] {
        SelectorPart::PseudoClass(pseudo) => {
            assert_eq!(pseudo.kind, PseudoClassType::Not);
            assert_eq!(pseudo.arg.as_deref(), Some(".external"));
        }
        other => panic!("expected pseudo class, got {other:?}"),
    }
}

#[test]
fn keyframes_blocks() {
    let sheet = clean(indoc! {"
        @keyframes slide {
          from { left: 0 }
          50% { left: 25px }
          from, to { top: 0 }
        }
    "});
    assert_eq!(sheet.rules.len(), 1);
    let keyframes = match &sheet.rules[0] {
        Rule::Keyframes(keyframes) => keyframes,
        other => panic!("expected keyframes, got {other:?}"),
    };
    assert_eq!(keyframes.name, "slide");
    assert_eq!(keyframes.blocks.len(), 3);
    assert_eq!(keyframes.blocks[0].selectors, vec![0.0]);
    assert_eq!(keyframes.blocks[1].selectors, vec![50.0]);
    assert_eq!(keyframes.blocks[2].selectors, vec![0.0, 100.0]);
}

#[test]
fn out_of_range_keyframe_selector_drops_its_block() {
    let (sheet, warnings) = parse_stylesheet(indoc! {"
        @keyframes k {
          150% { left: 0 }
          to { left: 10px }
        }
    "});
    let keyframes = match &sheet.rules[0] {
        Rule::Keyframes(keyframes) => keyframes,
        other => panic!("expected keyframes, got {other:?}"),
    };
    assert_eq!(keyframes.blocks.len(), 1);
    assert_eq!(keyframes.blocks[0].selectors, vec![100.0]);
    assert_eq!(
        kinds(&warnings),
        vec![&WarningKind::InvalidKeyframeSelector {
            value: "150%".to_string()
        }]
    );
}

#[test]
fn vendor_prefixed_keyframes() {
    let sheet = clean("@-webkit-keyframes spin { to { left: 0 } }");
    assert!(matches!(&sheet.rules[0], Rule::Keyframes(k) if k.name == "spin"));
}

#[test]
fn keyframes_without_a_name_are_dropped() {
    let (sheet, warnings) = parse_stylesheet("@keyframes { to { left: 0 } } a { color: red }");
    assert_eq!(sheet.rules.len(), 1);
    assert!(matches!(&sheet.rules[0], Rule::Set(_)));
    assert_eq!(kinds(&warnings), vec![&WarningKind::InvalidStatement]);
}

#[test]
fn page_rule_with_margin_boxes() {
    let sheet = clean(indoc! {r#"
        @page wide:first {
          margin-top: 2px;
          @top-center { content: "head" }
        }
    "#});
    let page = match &sheet.rules[0] {
        Rule::Page(page) => page,
        other => panic!("expected page rule, got {other:?}"),
    };
    assert_eq!(page.name.as_deref(), Some("wide"));
    assert_eq!(page.pseudo, Some(PagePseudo::First));
    assert_eq!(page.declarations.len(), 1);
    assert_eq!(page.margins.len(), 1);
    assert_eq!(page.margins[0].area, MarginArea::TopCenter);
    assert_eq!(page.margins[0].declarations[0].property, "content");
}

#[test]
fn unknown_page_pseudo_drops_the_rule() {
    let (sheet, warnings) = parse_stylesheet("@page :verso { margin: 1px }");
    assert!(sheet.rules.is_empty());
    assert_eq!(
        kinds(&warnings),
        vec![&WarningKind::InvalidPseudo {
            name: "verso".to_string()
        }]
    );
}

#[test]
fn unknown_margin_box_is_dropped_alone() {
    let (sheet, warnings) =
        parse_stylesheet("@page { margin: 1px; @top-middle { content: \"x\" } }");
    let page = match &sheet.rules[0] {
        Rule::Page(page) => page,
        other => panic!("expected page rule, got {other:?}"),
    };
    assert!(page.margins.is_empty());
    assert_eq!(page.declarations.len(), 1);
    assert_eq!(
        kinds(&warnings),
        vec![&WarningKind::UnknownAtRule {
            name: "top-middle".to_string()
        }]
    );
}

#[test]
fn font_face_and_viewport_rules() {
    let sheet = clean(indoc! {r#"
        @font-face {
          font-family: "Custom";
          src: url("custom.woff2");
        }
        @viewport {
          width: 320px;
        }
    "#});
    assert_eq!(sheet.rules.len(), 2);
    let font_face = match &sheet.rules[0] {
        Rule::FontFace(rule) => rule,
        other => panic!("expected font-face, got {other:?}"),
    };
    assert_eq!(
        values(font_face.font_family().unwrap()),
        vec![&TermValue::String("Custom".to_string())]
    );
    assert!(font_face.sources().is_some());
    assert!(matches!(&sheet.rules[1], Rule::Viewport(_)));
}

#[test]
fn unknown_at_rules_are_skipped_whole() {
    let (sheet, warnings) = parse_stylesheet(indoc! {"
        @namespace svg url(http://www.w3.org/2000/svg);
        @supports (display: flex) { b { color: red } }
        a { color: blue }
    "});
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(
        ruleset(&sheet.rules[0]).selectors[0].head.parts[0],
        SelectorPart::Element("a".to_string())
    );
    assert_eq!(
        kinds(&warnings),
        vec![
            &WarningKind::UnknownAtRule {
                name: "namespace".to_string()
            },
            &WarningKind::UnknownAtRule {
                name: "supports".to_string()
            },
        ]
    );
}

#[test]
fn html_comment_markers_are_ignored() {
    let sheet = clean("<!-- a { color: red } -->");
    assert_eq!(sheet.rules.len(), 1);
}

#[test]
fn stray_terminators_warn_and_are_skipped() {
    let (sheet, warnings) = parse_stylesheet("; a { color: red } }");
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(
        kinds(&warnings),
        vec![
            &WarningKind::StrayToken {
                found: ";".to_string()
            },
            &WarningKind::StrayToken {
                found: "}".to_string()
            },
        ]
    );
}

#[test]
fn statement_starting_with_a_stray_literal_is_junked() {
    let (sheet, warnings) = parse_stylesheet("42; a { color: red }");
    assert_eq!(sheet.rules.len(), 1);
    assert!(matches!(&sheet.rules[0], Rule::Set(_)));
    assert_eq!(kinds(&warnings), vec![&WarningKind::InvalidStatement]);
}

#[test]
fn charset_statement_is_transparent() {
    let sheet = clean("@charset \"utf-8\";\na { color: red }");
    assert_eq!(sheet.rules.len(), 1);
}

#[test]
fn inline_style_attribute() {
    let (sheet, warnings) = parse_inline("color: red; margin: 0", "p#intro", true);
    assert!(warnings.is_empty());
    assert_eq!(sheet.rules.len(), 1);
    let set = ruleset(&sheet.rules[0]);
    assert_eq!(
        set.selectors[0].head.parts[0],
        SelectorPart::InlineElement {
            label: "p#intro".to_string(),
            priority: true
        }
    );
    assert_eq!(set.declarations.len(), 2);
}

#[test]
fn inline_style_recovers_from_stray_braces() {
    let (sheet, warnings) = parse_inline("color: red } margin: 0", "div", false);
    let set = ruleset(&sheet.rules[0]);
    assert_eq!(set.declarations.len(), 2);
    assert_eq!(
        kinds(&warnings),
        vec![&WarningKind::StrayToken {
            found: "}".to_string()
        }]
    );
}

#[test]
fn inline_style_with_no_value_warns() {
    let (sheet, warnings) = parse_inline("color:", "div", false);
    assert_eq!(ruleset(&sheet.rules[0]).declarations.len(), 0);
    assert_eq!(
        kinds(&warnings),
        vec![&WarningKind::InvalidDeclaration {
            property: "color".to_string()
        }]
    );
}

#[test]
fn declarations_record_their_source_position() {
    let sheet = clean("a {\n  color: red;\n}");
    let set = ruleset(&sheet.rules[0]);
    let source = set.declarations[0].source.as_ref().unwrap();
    assert_eq!(source.base, None);
    assert_eq!(source.line, 2);
    assert_eq!(source.column, 3);
    assert_eq!(sheet.origin, Origin::Author);
}

#[test]
fn empty_and_blank_inputs_yield_empty_sheets() {
    for input in ["", "   \n\t  ", "/* just a comment */"] {
        let (sheet, warnings) = parse_stylesheet(input);
        assert!(sheet.rules.is_empty());
        assert!(sheet.imports.is_empty());
        assert!(warnings.is_empty(), "input {input:?} warned: {warnings:?}");
    }
}

#[test]
fn rules_with_no_surviving_declarations_are_dropped() {
    let (sheet, warnings) = parse_stylesheet("a { }");
    assert!(sheet.rules.is_empty());
    assert!(warnings.is_empty());
}

#[test]
fn display_output_reparses_to_itself() {
    let source = indoc! {r#"
        a.link#top[href^="http"]:hover::after {
          color: rgba(0, 0, 0, 0.5);
          margin: -5px 0 12.5% auto;
          background: url("bg.png") no-repeat;
          font: 12px/1.5 "Helvetica", sans-serif;
          clip: rect(1px, 2px, 3px, 4px);
        }

        @media screen and (min-width: 100px), print {
          b { color: #abcdef !important }
        }

        @page wide:first {
          margin-top: 2px;
          @top-center { content: "head" }
        }

        @font-face {
          font-family: "Custom";
          src: url("c.woff2");
        }

        @keyframes slide {
          from { left: 0 }
          50.5% { left: 2px }
          to { left: 100px }
        }
    "#};
    let (sheet, warnings) = parse_stylesheet(source);
    assert!(warnings.is_empty(), "{warnings:?}");
    let printed = sheet.to_string();
    let (reparsed, warnings) = parse_stylesheet(&printed);
    assert!(warnings.is_empty(), "{warnings:?}");
    similar_asserts::assert_eq!(printed, reparsed.to_string());
}
