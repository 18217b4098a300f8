//! Discovers tagged elements in HTML markup using Tree-sitter.

use std::ops::Range;
use std::sync::OnceLock;

use tree_sitter::{
    Language,
    Node,
    Parser,
    Query,
    QueryCursor,
    StreamingIterator,
};

use super::DocumentError;

/// Query matching every element attribute that has a value
const TAGGED_ELEMENT_QUERY: &str = include_str!("../../queries/html/tagged-element.scm");

/// Compiled query, parsed once per process
static QUERY_CACHE: OnceLock<Option<Query>> = OnceLock::new();

/// Returns the tree-sitter HTML language
fn html_language() -> Language {
    tree_sitter_html::LANGUAGE.into()
}

/// Loads the cached tagged-element query
fn tagged_element_query() -> Option<&'static Query> {
    QUERY_CACHE
        .get_or_init(|| {
            Query::new(&html_language(), TAGGED_ELEMENT_QUERY)
                .map_err(|e| tracing::error!("Failed to parse tagged-element query: {e:?}"))
                .ok()
        })
        .as_ref()
}

/// An element carrying a translation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedElement {
    /// Translation key (attribute value)
    pub key: String,
    /// Tag name (e.g. `h1`, `li`)
    pub tag: String,
    /// Byte range of the whole element in the fragment markup
    pub element_range: Range<usize>,
    /// Byte range of the element's content (between start and end tag)
    pub content_range: Range<usize>,
    /// Visible text, whitespace-collapsed and with entities decoded
    pub text: String,
}

/// Extracts every element whose `attribute` carries a non-empty value, in document order.
///
/// Attribute names are compared ASCII case-insensitively, as HTML does.
///
/// # Errors
/// Returns `DocumentError` if:
/// - Language setup fails
/// - Markup parsing fails
/// - The query could not be compiled
pub fn extract_tagged_elements(
    markup: &str,
    attribute: &str,
) -> Result<Vec<TaggedElement>, DocumentError> {
    let query = tagged_element_query().ok_or(DocumentError::QueryUnavailable)?;
    let (Some(element_index), Some(name_index), Some(value_index)) = (
        query.capture_index_for_name("element"),
        query.capture_index_for_name("attr.name"),
        query.capture_index_for_name("attr.value"),
    ) else {
        return Err(DocumentError::QueryUnavailable);
    };

    let mut parser = Parser::new();
    parser.set_language(&html_language())?;
    let tree = parser.parse(markup, None).ok_or(DocumentError::ParseFailed)?;
    let source = markup.as_bytes();

    let mut elements = Vec::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), source);

    while let Some(match_) = matches.next() {
        let mut element_node = None;
        let mut name_node = None;
        let mut value_node = None;
        for capture in match_.captures {
            if capture.index == element_index {
                element_node = Some(capture.node);
            } else if capture.index == name_index {
                name_node = Some(capture.node);
            } else if capture.index == value_index {
                value_node = Some(capture.node);
            }
        }

        let (Some(element_node), Some(name_node), Some(value_node)) =
            (element_node, name_node, value_node)
        else {
            continue;
        };

        let Ok(name) = name_node.utf8_text(source) else {
            continue;
        };
        if !name.eq_ignore_ascii_case(attribute) {
            continue;
        }

        let Ok(key) = value_node.utf8_text(source) else {
            tracing::warn!("Failed to get attribute value text from node");
            continue;
        };
        if key.is_empty() {
            continue;
        }

        if let Some(element) = build_element(element_node, key, source) {
            elements.push(element);
        }
    }

    elements.sort_by_key(|element| element.element_range.start);
    // 属性が重複している要素は最初の 1 つだけ扱う
    elements.dedup_by_key(|element| element.element_range.start);

    Ok(elements)
}

/// Finds the first direct child of the given kind
fn child_of_kind<'tree>(node: Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|child| child.kind() == kind)
}

/// Elements that never have content
const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Builds a `TaggedElement` from an `element` node
///
/// Void elements yield `None`: there is nowhere to put a translation.
fn build_element(element: Node<'_>, key: &str, source: &[u8]) -> Option<TaggedElement> {
    let start_tag = child_of_kind(element, "start_tag");
    let end_tag = child_of_kind(element, "end_tag");

    let content_start = start_tag.map_or(element.start_byte(), |node| node.end_byte());
    // 終了タグが省略された要素は要素の末尾までを内容とみなす
    let content_end =
        end_tag.map_or(element.end_byte(), |node| node.start_byte()).max(content_start);

    let tag = start_tag
        .and_then(|node| child_of_kind(node, "tag_name"))
        .and_then(|node| node.utf8_text(source).ok())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if end_tag.is_none() && VOID_ELEMENTS.contains(&tag.as_str()) {
        tracing::debug!(key, tag = %tag, "Skipping tagged void element");
        return None;
    }

    let mut pieces = Vec::new();
    collect_text(element, source, &mut pieces);

    Some(TaggedElement {
        key: key.to_string(),
        tag,
        element_range: element.start_byte()..element.end_byte(),
        content_range: content_start..content_end,
        text: join_text_pieces(&pieces, source),
    })
}

/// Collects text leaves (with their byte ranges) below a node
fn collect_text(node: Node<'_>, source: &[u8], pieces: &mut Vec<(Range<usize>, String)>) {
    match node.kind() {
        "text" | "raw_text" => {
            if let Ok(text) = node.utf8_text(source) {
                pieces.push((node.start_byte()..node.end_byte(), text.to_string()));
            }
        }
        "entity" => {
            if let Ok(text) = node.utf8_text(source) {
                let decoded = decode_entity(text).unwrap_or_else(|| text.to_string());
                pieces.push((node.start_byte()..node.end_byte(), decoded));
            }
        }
        "start_tag" | "end_tag" | "self_closing_tag" | "erroneous_end_tag" | "comment" => {}
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                collect_text(child, source, pieces);
            }
        }
    }
}

/// Joins text leaves, keeping one space wherever the source separated them by whitespace
fn join_text_pieces(pieces: &[(Range<usize>, String)], source: &[u8]) -> String {
    let mut text = String::new();
    let mut previous_end: Option<usize> = None;

    for (range, piece) in pieces {
        if let Some(end) = previous_end {
            let separated = source
                .get(end..range.start)
                .is_some_and(|gap| gap.iter().any(u8::is_ascii_whitespace));
            if separated {
                text.push(' ');
            }
        }
        text.push_str(piece);
        previous_end = Some(range.end);
    }

    collapse_whitespace(&text)
}

/// Collapses runs of whitespace into a single space
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decodes a character reference such as `&amp;` or `&#128232;`
fn decode_entity(entity: &str) -> Option<String> {
    let body = entity.strip_prefix('&')?;
    let body = body.strip_suffix(';').unwrap_or(body);

    if let Some(number) = body.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }

    let decoded = match body {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        _ => return None,
    };
    Some(decoded.to_string())
}

/// Escapes text so it is inserted as character data, never as markup.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn keys(elements: &[TaggedElement]) -> Vec<&str> {
        elements.iter().map(|element| element.key.as_str()).collect()
    }

    #[googletest::test]
    fn test_extract_simple_list() {
        let markup = r#"<h1 data-i18n="todo_list">Todo List</h1>
<ul>
    <li data-i18n="todo1">Task 1</li>
    <li data-i18n="todo2">Task 2</li>
</ul>"#;

        let elements = extract_tagged_elements(markup, "data-i18n").unwrap();

        assert_eq!(keys(&elements), vec!["todo_list", "todo1", "todo2"]);
        expect_that!(elements[0].tag, eq("h1"));
        expect_that!(elements[0].text, eq("Todo List"));
        expect_that!(elements[1].tag, eq("li"));
        expect_that!(elements[2].text, eq("Task 2"));
    }

    #[googletest::test]
    fn test_content_range_covers_inner_markup() {
        let markup = r#"<p class="x" data-i18n="greeting">Hello <b>world</b></p>"#;

        let elements = extract_tagged_elements(markup, "data-i18n").unwrap();

        expect_that!(elements.len(), eq(1));
        let element = &elements[0];
        expect_that!(&markup[element.content_range.clone()], eq("Hello <b>world</b>"));
        expect_that!(&markup[element.element_range.clone()], eq(markup));
        expect_that!(element.text, eq("Hello world"));
    }

    #[googletest::test]
    fn test_ignores_other_attributes_and_untagged_elements() {
        let markup = r#"<div class="team"><img src="a.png" alt="Person 1"><p id="x">plain</p><p data-i18n="tel1">tel:</p></div>"#;

        let elements = extract_tagged_elements(markup, "data-i18n").unwrap();

        assert_eq!(keys(&elements), vec!["tel1"]);
    }

    #[googletest::test]
    fn test_custom_attribute_name() {
        let markup = r#"<p data-i18n="a">A</p><p data-key="b">B</p>"#;

        let elements = extract_tagged_elements(markup, "data-key").unwrap();

        assert_eq!(keys(&elements), vec!["b"]);
    }

    #[googletest::test]
    fn test_attribute_name_is_case_insensitive() {
        let markup = r#"<p DATA-I18N="upper">Upper</p>"#;

        let elements = extract_tagged_elements(markup, "data-i18n").unwrap();

        assert_eq!(keys(&elements), vec!["upper"]);
    }

    #[googletest::test]
    fn test_nested_elements_are_in_document_order() {
        let markup = r#"<div data-i18n="outer"><span data-i18n="inner">in</span></div>"#;

        let elements = extract_tagged_elements(markup, "data-i18n").unwrap();

        assert_eq!(keys(&elements), vec!["outer", "inner"]);
        expect_that!(elements[0].text, eq("in"));
    }

    #[googletest::test]
    fn test_empty_attribute_value_is_ignored() {
        let markup = r#"<p data-i18n="">empty</p><p data-i18n='single'>quoted</p>"#;

        let elements = extract_tagged_elements(markup, "data-i18n").unwrap();

        assert_eq!(keys(&elements), vec!["single"]);
    }

    #[googletest::test]
    fn test_void_elements_are_skipped() {
        let markup = concat!(
            r#"<input data-i18n="email_placeholder" type="email">"#,
            r#"<p data-i18n="after">After</p>"#,
            r#"<img data-i18n="logo" src="x.png">"#,
        );

        let elements = extract_tagged_elements(markup, "data-i18n").unwrap();

        assert_eq!(keys(&elements), vec!["after"]);
        expect_that!(elements[0].text, eq("After"));
    }

    #[googletest::test]
    fn test_empty_markup_has_no_elements() {
        let elements = extract_tagged_elements("", "data-i18n").unwrap();

        expect_that!(elements.is_empty(), eq(true));
    }

    #[googletest::test]
    fn test_entities_are_decoded_in_text() {
        let markup = r#"<p data-i18n="amp">Fish &amp; Chips</p>"#;

        let elements = extract_tagged_elements(markup, "data-i18n").unwrap();

        expect_that!(elements[0].text, eq("Fish & Chips"));
    }

    #[rstest]
    #[case("&amp;", Some("&"))]
    #[case("&lt;", Some("<"))]
    #[case("&#128232;", Some("\u{1F4E8}"))]
    #[case("&#128232", Some("\u{1F4E8}"))]
    #[case("&#x41;", Some("A"))]
    #[case("&unknown;", None)]
    fn test_decode_entity(#[case] entity: &str, #[case] expected: Option<&str>) {
        assert_eq!(decode_entity(entity).as_deref(), expected);
    }

    #[rstest]
    #[case("plain", "plain")]
    #[case("<b>bold</b>", "&lt;b&gt;bold&lt;/b&gt;")]
    #[case("a & b", "a &amp; b")]
    #[case("Vítejte", "Vítejte")]
    fn test_escape_text(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_text(input), expected);
    }
}
