use crate::error::ShellError;

/// Tokenizes one input line into shell words.
///
/// Quotes and escapes are resolved: single quotes are fully literal, double
/// quotes keep backslash special only before `"`, `\` and `$`, and an
/// unquoted backslash takes the next character literally.
pub fn tokenize(input: &str) -> Result<Vec<String>, ShellError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // A word is open once any character or quote pair has been seen, so
    // that `""` still yields an (empty) token.
    let mut in_word = false;
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_single_quote {
            if c == '\'' {
                in_single_quote = false;
            } else {
                current.push(c);
            }
        } else if in_double_quote {
            match c {
                '"' => in_double_quote = false,
                '\\' => match chars.peek() {
                    Some(&next) if matches!(next, '"' | '\\' | '$') => {
                        chars.next();
                        current.push(next);
                    }
                    _ => current.push(c),
                },
                _ => current.push(c),
            }
        } else if c == '\\' {
            let next = chars.next().ok_or(ShellError::Parse("No escaped character"))?;
            current.push(next);
            in_word = true;
        } else if c == '\'' {
            in_single_quote = true;
            in_word = true;
        } else if c == '"' {
            in_double_quote = true;
            in_word = true;
        } else if c.is_whitespace() {
            if in_word {
                tokens.push(std::mem::take(&mut current));
                in_word = false;
            }
        } else {
            current.push(c);
            in_word = true;
        }
    }

    if in_single_quote || in_double_quote {
        return Err(ShellError::Parse("No closing quotation"));
    }
    if in_word {
        tokens.push(current);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &str) -> Vec<String> {
        tokenize(input).unwrap()
    }

    #[test]
    fn test_simple_command() {
        assert_eq!(words("echo hello"), vec!["echo", "hello"]);
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(words("  echo   a \t b  "), vec!["echo", "a", "b"]);
    }

    #[test]
    fn test_quoted_string() {
        assert_eq!(words("echo \"a  b\" c"), vec!["echo", "a  b", "c"]);
    }

    #[test]
    fn test_single_quotes_are_literal() {
        assert_eq!(words(r#"echo 'a\"b $x'"#), vec!["echo", r#"a\"b $x"#]);
    }

    #[test]
    fn test_double_quote_escapes() {
        assert_eq!(words(r#"echo "a\"b" "c\\d" "e\$f" "g\nh""#), vec![
            "echo", "a\"b", "c\\d", "e$f", "g\\nh"
        ]);
    }

    #[test]
    fn test_unquoted_backslash() {
        assert_eq!(words(r"echo a\ b \'c\'"), vec!["echo", "a b", "'c'"]);
    }

    #[test]
    fn test_adjacent_quotes_join() {
        assert_eq!(words(r#"echo 'he'"llo"world"#), vec!["echo", "helloworld"]);
    }

    #[test]
    fn test_empty_quotes_yield_empty_token() {
        assert_eq!(words("echo '' \"\""), vec!["echo", "", ""]);
    }

    #[test]
    fn test_redirection_operators_stay_whole() {
        assert_eq!(words("echo hi 1>> file.txt"), vec!["echo", "hi", "1>>", "file.txt"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(words("   ").is_empty());
    }

    #[test]
    fn test_unterminated_quote() {
        let err = tokenize("echo \"unterminated").unwrap_err();
        assert_eq!(err.to_string(), "Parsing error: No closing quotation");
        assert!(tokenize("echo 'open").is_err());
    }

    #[test]
    fn test_trailing_backslash() {
        let err = tokenize("echo \\").unwrap_err();
        assert_eq!(err.to_string(), "Parsing error: No escaped character");
    }
}
