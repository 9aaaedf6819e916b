use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

/// Answer given for an entity type absent from the text.
pub const EMPTY_ANSWER: &str = "[]";

/// Compact JSON with a space after each separator: `["A", "B"]`, `{"k": 1}`.
#[derive(Debug, Default, Clone, Copy)]
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Encode entity values as a JSON array of strings, in order.
///
/// Quotes, backslashes and control characters are escaped by the serializer;
/// non-ASCII text is written as-is.
pub fn format_answer(values: &[String]) -> serde_json::Result<String> {
    to_spaced_json(values)
}

/// Serialize `value` with `", "` and `": "` separators on a single line.
pub(crate) fn to_spaced_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buf)
        .map_err(|e| serde_json::Error::io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_spaced_array() {
        let answer = format_answer(&strings(&["A", "B", "C"])).unwrap();
        assert_eq!(answer, r#"["A", "B", "C"]"#);
    }

    #[test]
    fn test_empty_values() {
        assert_eq!(format_answer(&[]).unwrap(), EMPTY_ANSWER);
    }

    #[test]
    fn test_non_ascii_literal() {
        let answer = format_answer(&strings(&["Джаку", "Амира Темура"])).unwrap();
        assert_eq!(answer, r#"["Джаку", "Амира Темура"]"#);
    }

    #[test]
    fn test_special_characters_escaped() {
        let values = strings(&[r#"say "hi""#, r"C:\dir", "two\nlines"]);
        let answer = format_answer(&values).unwrap();

        assert_eq!(answer, r#"["say \"hi\"", "C:\\dir", "two\nlines"]"#);
        let parsed: Vec<String> = serde_json::from_str(&answer).unwrap();
        assert_eq!(parsed, values);
    }
}
