use indoc::indoc;

use crate::{error::Error, traits::Exporter, types::AggregationStore};

const HEADER: &str = indoc! {"
    // This file is automatically generated by sheetres.
    // Do not edit it manually, as your changes will be overwritten.

"};

/// An exporter for Apple's .strings format.
///
/// Every pair is written as `"key" = "value";`. Groups are separated by a blank
/// line and, unless they are the default group, labelled with a `/* group */`
/// comment.
#[derive(Debug, Clone, Copy, Default)]
pub struct Format;

impl Exporter for Format {
    fn process<W: std::io::Write>(
        &self,
        mut writer: W,
        store: &AggregationStore,
    ) -> Result<(), Error> {
        let mut content = String::from(HEADER);

        for (index, group) in store.groups().iter().enumerate() {
            if index > 0 {
                content.push('\n');
            }
            if !group.is_default() {
                content.push_str(&format!("/* {} */\n", group.name().replace("*/", "* /")));
            }
            for pair in group.pairs() {
                content.push_str(&format!(
                    "\"{}\" = \"{}\";\n",
                    escape(pair.key()),
                    escape(pair.value())
                ));
            }
        }

        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str(r"\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str(r"\n"),
            '\r' => escaped.push_str(r"\r"),
            '\t' => escaped.push_str(r"\t"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KeyValuePair;

    fn render(store: &AggregationStore) -> String {
        let mut output = Vec::new();
        Format.process(&mut output, store).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_empty_store_only_has_header() {
        assert_eq!(render(&AggregationStore::new()), HEADER);
    }

    #[test]
    fn test_groups_and_pairs_in_store_order() {
        let mut store = AggregationStore::new();
        store.add("", KeyValuePair::new("app_name", "Sheets"));
        store.add("colors", KeyValuePair::new("red", "Red"));
        store.add("colors", KeyValuePair::new("blue", "Blue"));

        let expected = format!(
            "{}{}",
            HEADER,
            indoc! {r#"
                "app_name" = "Sheets";

                /* colors */
                "red" = "Red";
                "blue" = "Blue";
            "#}
        );
        assert_eq!(render(&store), expected);
    }

    #[test]
    fn test_escaping() {
        let mut store = AggregationStore::new();
        store.add("", KeyValuePair::new("say \"hi\"", "C:\\path\nnext"));

        let output = render(&store);
        assert!(output.contains(r#""say \"hi\"" = "C:\\path\nnext";"#));
    }

    #[test]
    fn test_duplicate_keys_are_all_rendered() {
        let mut store = AggregationStore::new();
        store.add("", KeyValuePair::new("title", "One"));
        store.add("", KeyValuePair::new("title", "Two"));

        let output = render(&store);
        assert_eq!(output.matches("\"title\" = ").count(), 2);
        assert!(output.find("\"One\"").unwrap() < output.find("\"Two\"").unwrap());
    }

    #[test]
    fn test_export_is_idempotent() {
        let mut store = AggregationStore::new();
        store.add("g", KeyValuePair::new("k", "v"));
        assert_eq!(render(&store), render(&store));
    }
}
