//! Minimal CSS syntax helpers built on `cssparser`: splitting a full
//! stylesheet text into raw top-level rules and probing for `@import`.

use cssparser::AtRuleParser as CssAtRuleParser;
use cssparser::BasicParseErrorKind;
use cssparser::CowRcStr;
use cssparser::ParseError;
use cssparser::Parser;
use cssparser::ParserInput;
use cssparser::ParserState;
use cssparser::QualifiedRuleParser as CssQualifiedRuleParser;
use cssparser::StyleSheetParser;
use cssparser::Token;

/// Top-level parser that re-emits every rule (qualified and at-rule) as its
/// raw text, normalized to `prelude { body }` / `@name prelude;` form.
struct RawRuleParser;

impl CssAtRuleParser<'_> for RawRuleParser {
    type Prelude = (String, String);
    type AtRule = String;
    type Error = ();

    fn parse_prelude<'input>(
        &mut self,
        name: CowRcStr<'input>,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        let start = input.state();
        // Consume the whole prelude and keep the raw slice.
        while input.next_including_whitespace_and_comments().is_ok() {}
        let prelude = input.slice_from(start.position()).trim().to_owned();
        Ok((name.to_string(), prelude))
    }

    fn parse_block<'input>(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::AtRule, ParseError<'input, Self::Error>> {
        let start = input.position();
        while input.next_including_whitespace_and_comments().is_ok() {}
        let body = input.slice_from(start).trim().to_owned();
        let (name, head) = prelude;
        if head.is_empty() {
            Ok(format!("@{name} {{ {body} }}"))
        } else {
            Ok(format!("@{name} {head} {{ {body} }}"))
        }
    }

    fn rule_without_block(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
    ) -> Result<Self::AtRule, Self::Error> {
        let (name, head) = prelude;
        if head.is_empty() {
            Ok(format!("@{name};"))
        } else {
            Ok(format!("@{name} {head};"))
        }
    }
}

impl CssQualifiedRuleParser<'_> for RawRuleParser {
    type Prelude = String;
    type QualifiedRule = String;
    type Error = ();

    fn parse_prelude<'input>(
        &mut self,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        let start = input.state();
        while input.next_including_whitespace_and_comments().is_ok() {}
        let prelude = input.slice_from(start.position()).trim().to_owned();
        if prelude.is_empty() {
            return Err(input.new_error(BasicParseErrorKind::QualifiedRuleInvalid));
        }
        Ok(prelude)
    }

    fn parse_block<'input>(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::QualifiedRule, ParseError<'input, Self::Error>> {
        let start = input.position();
        while input.next_including_whitespace_and_comments().is_ok() {}
        let body = input.slice_from(start).trim().to_owned();
        Ok(format!("{prelude} {{ {body} }}"))
    }
}

/// Split a stylesheet text into its raw top-level rules, in source order.
/// Unparsable fragments are dropped, matching how the engine discards rules
/// it cannot interpret.
pub fn split_rules(css: &str) -> Vec<String> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut top = RawRuleParser;
    let mut rules = Vec::new();
    for rule in StyleSheetParser::new(&mut parser, &mut top).flatten() {
        rules.push(rule);
    }
    rules
}

/// Report whether the stylesheet text carries an `@import` directive at the
/// top level. Tokenized, so occurrences inside comments or string values do
/// not count.
pub fn contains_import(css: &str) -> bool {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    while let Ok(token) = parser.next() {
        if let Token::AtKeyword(keyword) = token
            && keyword.eq_ignore_ascii_case("import")
        {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::{contains_import, split_rules};

    #[test]
    fn splits_top_level_rules_in_order() {
        let rules = split_rules("a { color: red }\nb { color: blue }");
        assert_eq!(rules.len(), 2, "expected two rules, got {rules:?}");
        assert!(rules[0].starts_with('a'), "first rule should be the `a` rule");
        assert!(rules[1].starts_with('b'), "second rule should be the `b` rule");
    }

    #[test]
    fn keeps_at_rules_and_nested_blocks() {
        let css = "@media screen { a { color: red } } p { margin: 0 }";
        let rules = split_rules(css);
        assert_eq!(rules.len(), 2, "expected media rule plus style rule, got {rules:?}");
        assert!(rules[0].starts_with("@media"), "at-rule text was {:?}", rules[0]);
    }

    #[test]
    fn empty_input_yields_no_rules() {
        assert!(split_rules("").is_empty());
        assert!(split_rules("   \n ").is_empty());
    }

    #[test]
    fn detects_import_directive() {
        assert!(contains_import("@import url(\"foo.css\");"));
        assert!(contains_import("a { color: red } @import \"foo.css\";"));
    }

    #[test]
    fn ignores_import_in_comments_and_strings() {
        assert!(!contains_import("/* @import url(foo.css); */ a { color: red }"));
        assert!(!contains_import("a::before { content: \"@import\" }"));
        assert!(!contains_import("a { color: red }"));
    }
}
