//! Support for Android `strings.xml` output.
//!
//! Each pair becomes a `<string>` element; non-default groups are introduced by
//! an XML comment carrying the group name.

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::io::Write;

use crate::{error::Error, traits::Exporter, types::AggregationStore};

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, Default)]
pub struct Format;

impl Exporter for Format {
    /// Write to any writer (file, memory, etc.).
    fn process<W: Write>(&self, mut writer: W, store: &AggregationStore) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        let resources_start = BytesStart::new("resources");
        xml_writer.write_event(Event::Start(resources_start))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        for group in store.groups() {
            if !group.is_default() {
                xml_writer.write_event(Event::Text(BytesText::new(INDENT)))?;
                xml_writer.write_event(Event::Comment(BytesText::from_escaped(format!(
                    " {} ",
                    comment_text(group.name())
                ))))?;
                xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
            }

            for pair in group.pairs() {
                let mut elem = BytesStart::new("string");
                elem.push_attribute(("name", pair.key()));

                xml_writer.write_event(Event::Text(BytesText::new(INDENT)))?;
                xml_writer.write_event(Event::Start(elem))?;
                xml_writer.write_event(Event::Text(BytesText::from_escaped(escape_value(
                    pair.value(),
                ))))?;
                xml_writer.write_event(Event::End(BytesEnd::new("string")))?;
                xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
            }
        }

        xml_writer.write_event(Event::End(BytesEnd::new("resources")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }
}

/// Escapes a value for aapt: backslash escapes for quotes, backslashes and
/// control characters, entity escapes for XML markup.
fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    if value.starts_with('@') || value.starts_with('?') {
        // Would otherwise be read as a resource reference.
        escaped.push('\\');
    }
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str(r"\\"),
            '\'' => escaped.push_str(r"\'"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str(r"\n"),
            '\t' => escaped.push_str(r"\t"),
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// `--` may not appear inside an XML comment.
fn comment_text(group: &str) -> String {
    let mut text = group.to_string();
    while text.contains("--") {
        text = text.replace("--", "- -");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KeyValuePair;
    use indoc::indoc;

    fn render(store: &AggregationStore) -> String {
        let mut output = Vec::new();
        Format.process(&mut output, store).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_empty_store() {
        let expected = indoc! {r#"
            <?xml version="1.0" encoding="utf-8"?>
            <resources>
            </resources>
        "#};
        assert_eq!(render(&AggregationStore::new()), expected);
    }

    #[test]
    fn test_groups_and_pairs_in_store_order() {
        let mut store = AggregationStore::new();
        store.add("", KeyValuePair::new("app_name", "Sheets"));
        store.add("colors", KeyValuePair::new("red", "Red"));
        store.add("colors", KeyValuePair::new("blue", "Blue"));

        let expected = indoc! {r#"
            <?xml version="1.0" encoding="utf-8"?>
            <resources>
                <string name="app_name">Sheets</string>
                <!-- colors -->
                <string name="red">Red</string>
                <string name="blue">Blue</string>
            </resources>
        "#};
        assert_eq!(render(&store), expected);
    }

    #[test]
    fn test_value_escaping() {
        let mut store = AggregationStore::new();
        store.add("", KeyValuePair::new("quote", "Don't \"stop\""));
        store.add("", KeyValuePair::new("markup", "a < b & c"));
        store.add("", KeyValuePair::new("lines", "one\ntwo"));
        store.add("", KeyValuePair::new("mention", "@home"));

        let output = render(&store);
        assert!(output.contains(r#"<string name="quote">Don\'t \"stop\"</string>"#));
        assert!(output.contains(r#"<string name="markup">a &lt; b &amp; c</string>"#));
        assert!(output.contains(r#"<string name="lines">one\ntwo</string>"#));
        assert!(output.contains(r#"<string name="mention">\@home</string>"#));
    }

    #[test]
    fn test_group_comment_never_contains_double_dash() {
        assert_eq!(comment_text("a--b"), "a- -b");
        assert!(!comment_text("a---b").contains("--"));
    }

    #[test]
    fn test_export_is_idempotent() {
        let mut store = AggregationStore::new();
        store.add("g", KeyValuePair::new("k", "v"));
        store.add("", KeyValuePair::new("k", "v"));
        assert_eq!(render(&store), render(&store));
    }
}
