use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use crate::error::{ConfigError, ParseResult};
use crate::index::KeyIndex;
use crate::scanner::is_blank;

#[derive(Parser)]
#[grammar = "varsfile.pest"]
pub struct VarsParser;

/// Counters gathered while parsing, used for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Key/value lines read, including ones that overwrote an earlier key
    pub entries: usize,

    /// Section header lines read
    pub sections: usize,
}

impl VarsParser {
    /// Parse a document into a fresh index of the given capacity
    pub fn parse_document(input: &str, capacity: usize) -> ParseResult<KeyIndex> {
        let mut index = KeyIndex::with_capacity(capacity);
        Self::parse_into(input, &mut index)?;
        Ok(index)
    }

    /// Parse a document, inserting every qualified key into `index`.
    ///
    /// A later line with the same qualified key overwrites the earlier value.
    pub fn parse_into(input: &str, index: &mut KeyIndex) -> ParseResult<ParseStats> {
        let pairs = VarsParser::parse(Rule::file, input)?;

        let mut stats = ParseStats::default();
        let mut section: Option<&str> = None;
        let mut qualified = String::new();

        for pair in pairs {
            if pair.as_rule() != Rule::file {
                continue;
            }

            for line in pair.into_inner() {
                match line.as_rule() {
                    Rule::section_header => {
                        // `:/` on its own returns to the global scope
                        section = line.into_inner().next().map(|name| name.as_str());
                        stats.sections += 1;
                    }

                    Rule::entry => {
                        let mut inner = line.into_inner();
                        let Some(key) = inner.next() else {
                            continue;
                        };
                        let value = match inner.next() {
                            Some(value) => Self::value_text(value)?,
                            None => "",
                        };

                        qualified.clear();
                        if let Some(name) = section {
                            qualified.push_str(name);
                            qualified.push('/');
                        }
                        qualified.push_str(key.as_str());

                        index.insert(&qualified, value);
                        stats.entries += 1;
                    }

                    _ => {}
                }
            }
        }

        Ok(stats)
    }

    fn value_text<'i>(pair: Pair<'i, Rule>) -> ParseResult<&'i str> {
        match pair.as_rule() {
            Rule::quoted => Ok(pair.as_str()),

            Rule::unterminated => {
                let (line, column) = pair.line_col();
                Err(ConfigError::unterminated_string(line, column))
            }

            Rule::raw_value => Ok(pair.as_str().trim_end_matches(|c: char| {
                c.is_ascii() && is_blank(c as u8)
            })),

            _ => Err(ConfigError::custom(format!(
                "unexpected value token {:?}",
                pair.as_rule()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> KeyIndex {
        VarsParser::parse_document(input, 16).unwrap()
    }

    #[test]
    fn test_section_qualifies_keys() {
        let index = parse(":/s\nk 1\n");
        assert_eq!(index.get("s/k"), Some("1"));
        assert_eq!(index.get("k"), None);
    }

    #[test]
    fn test_global_key() {
        let index = parse("k 1\n");
        assert_eq!(index.get("k"), Some("1"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_section_reassignment_and_reset() {
        let index = parse("a 1\n:/one\nb 2\n:/two\nc 3\n:/\nd 4");
        assert_eq!(index.get("a"), Some("1"));
        assert_eq!(index.get("one/b"), Some("2"));
        assert_eq!(index.get("two/c"), Some("3"));
        assert_eq!(index.get("d"), Some("4"));
    }

    #[test]
    fn test_value_shapes_stored_verbatim() {
        let index = parse(
            "name \"hello world\"\nspeed 2.5\nflag true\npos (1.0 2.0)\n",
        );
        assert_eq!(index.get("name"), Some("\"hello world\""));
        assert_eq!(index.get("speed"), Some("2.5"));
        assert_eq!(index.get("flag"), Some("true"));
        assert_eq!(index.get("pos"), Some("(1.0 2.0)"));
    }

    #[test]
    fn test_comments_and_trailing_blanks() {
        let index = parse("# header\n  k   42   # answer\nq \"a # b\" # tail\n");
        assert_eq!(index.get("k"), Some("42"));
        assert_eq!(index.get("q"), Some("\"a # b\""));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_escaped_hash_kept() {
        let index = parse("color \\#ff00ff # magenta\n");
        assert_eq!(index.get("color"), Some("\\#ff00ff"));
    }

    #[test]
    fn test_line_endings() {
        let index = parse("a 1\r\nb 2\rc 3\n\n\n");
        assert_eq!(index.get("a"), Some("1"));
        assert_eq!(index.get("b"), Some("2"));
        assert_eq!(index.get("c"), Some("3"));
    }

    #[test]
    fn test_lines_without_key_skipped() {
        let index = parse("!!\n= \n\"orphan\" text\n@ # note\nok yes\n");
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("ok"), Some("yes"));
    }

    #[test]
    fn test_leading_junk_before_key() {
        let index = parse("@speed 5\n:nosection 1\n  == depth 3\n");
        assert_eq!(index.get("speed"), Some("5"));
        assert_eq!(index.get("nosection"), Some("1"));
        assert_eq!(index.get("depth"), Some("3"));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_byte_order_mark_before_first_key() {
        let index = parse("\u{FEFF}width 800\nheight 600\n");
        assert_eq!(index.get("width"), Some("800"));
        assert_eq!(index.get("height"), Some("600"));
    }

    #[test]
    fn test_section_marker_after_junk() {
        let index = parse("\u{FEFF}:/video\nwidth 800\n");
        assert_eq!(index.get("video/width"), Some("800"));
    }

    #[test]
    fn test_key_without_value() {
        let index = parse("lonely\n");
        assert_eq!(index.get("lonely"), Some(""));
    }

    #[test]
    fn test_last_write_wins() {
        let mut index = KeyIndex::with_capacity(16);
        let stats = VarsParser::parse_into("k 1\nk 2\n:/s\nk 3\n", &mut index).unwrap();
        assert_eq!(index.get("k"), Some("2"));
        assert_eq!(index.get("s/k"), Some("3"));
        assert_eq!(index.len(), 2);
        assert_eq!(stats, ParseStats { entries: 3, sections: 1 });
    }

    #[test]
    fn test_unterminated_string() {
        let err = VarsParser::parse_document("ok 1\nbad \"hello\n", 16).unwrap_err();
        assert_eq!(err, ConfigError::unterminated_string(2, 5));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n   \n").is_empty());
    }
}
