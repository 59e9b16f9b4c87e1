//! Line tokenizer for the fox shell.
//!
//! Splits on single spaces, then re-joins segments opened by a token that
//! starts with `"` and closed by a later token that ends with `"`. Quote
//! characters stay in the token; there is no escaping. A segment that is
//! never closed is still yielded as the last token.

/// Split a line into `(command, args)`. An empty or blank line gives `("", [])`.
pub fn parse(line: &str) -> (String, Vec<String>) {
    let line = line.trim();
    if line.is_empty() {
        return (String::new(), Vec::new());
    }

    let mut tokens = rejoin_quoted(line.split(' ')).into_iter();
    // A non-empty line always yields at least one token.
    let command = tokens.next().unwrap_or_default();
    (command, tokens.collect())
}

fn rejoin_quoted<'a>(pieces: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut buffer: Option<String> = None;

    for piece in pieces {
        match buffer.as_mut() {
            Some(open) => {
                open.push(' ');
                open.push_str(piece);
                if piece.ends_with('"') {
                    tokens.extend(buffer.take());
                }
            }
            None if piece.starts_with('"') => buffer = Some(piece.to_string()),
            None => tokens.push(piece.to_string()),
        }
    }

    tokens.extend(buffer);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(
            parse("adc load -y"),
            ("adc".to_string(), args(&["load", "-y"]))
        );
    }

    #[test]
    fn test_quoted_segment_keeps_quotes() {
        assert_eq!(parse(r#"repeat "a b""#), ("repeat".to_string(), args(&[r#""a b""#])));
    }

    #[test]
    fn test_quoted_segment_in_the_middle() {
        let (cmd, rest) = parse(r#"foo "bar baz" qux"#);
        assert_eq!(cmd, "foo");
        assert_eq!(rest, args(&[r#""bar baz""#, "qux"]));
        assert!(rest[0].contains(r#""bar"#));
        assert!(rest[0].contains(r#"baz""#));
    }

    #[test]
    fn test_opening_token_never_closes_itself() {
        assert_eq!(
            parse(r#"say "hi" there"#),
            ("say".to_string(), args(&[r#""hi" there"#]))
        );
        assert_eq!(parse(r#"say "hi""#), ("say".to_string(), args(&[r#""hi""#])));
        assert_eq!(
            parse(r#"say "hi" "you" end"#),
            ("say".to_string(), args(&[r#""hi" "you""#, "end"]))
        );
    }

    #[test]
    fn test_unclosed_quote_is_final_token() {
        assert_eq!(
            parse(r#"say "never closed here"#),
            ("say".to_string(), args(&[r#""never closed here"#]))
        );
    }

    #[test]
    fn test_lone_quote_opens_segment() {
        assert_eq!(
            parse(r#"say " spaced ""#),
            ("say".to_string(), args(&[r#"" spaced ""#]))
        );
    }

    #[test]
    fn test_double_space_gives_empty_token() {
        assert_eq!(parse("a  b"), ("a".to_string(), args(&["", "b"])));
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(parse("  help \r\n"), ("help".to_string(), Vec::new()));
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse(""), (String::new(), Vec::new()));
        assert_eq!(parse("   "), (String::new(), Vec::new()));
    }
}
