//! Unit tests for agtype parsing edge cases and error handling
//!
//! Tests malformed values, edge cases, and error conditions to ensure
//! robust parsing without panics.

#[cfg(test)]
mod parser_robustness_tests {
    use agegraph::agtype_parser::{parse_agtype, AgtypeParser, CollectingErrorListener};

    /// Test that malformed values don't cause panics
    #[test]
    fn test_malformed_values_no_panic() {
        let malformed_values = vec![
            "",  // Empty value
            "{",  // Unclosed map
            "}",  // Stray brace
            "[",  // Unclosed list
            "[1,",  // Dangling comma
            "[1 2]",  // Missing comma
            "{\"a\"}",  // Key without value
            "{\"a\": }",  // Missing value
            "{a: 1}",  // Unquoted key
            "\"abc",  // Unterminated string
            "\"\\x\"",  // Bad escape
            "\"\\u12\"",  // Short unicode escape
            "tru",  // Truncated keyword
            "01x",  // Junk after number
            "007",  // Leading zeros
            "[-00]",  // Leading zeros inside an array
            "-",  // Lone minus
            "1.",  // Missing fraction digits
            "{}::",  // Empty annotation
            "{}::vertex::edge",  // Double annotation
            "[{}::vertex,]::path",  // Dangling comma in path
            "[{\"id\": 1}::vertex, {\"id\": 2}::vertex]::path",  // Missing edge
            "[{\"id\": 1}::edge]::path",  // Path starting with an edge
            "9223372036854775808",  // Integer overflow
            "\u{0}",  // NUL byte
        ];

        for value in malformed_values {
            // Should not panic, should return error
            let result = parse_agtype(value);
            assert!(result.is_err(), "expected an error for {:?}", value);
        }
    }

    /// Errors always point somewhere inside (or just past) the input
    #[test]
    fn test_error_position_within_input() {
        let inputs = vec![
            "{\"a\": [1, 2, {\"b\": }]}",
            "[\n1,\n2,\n]",
            "{\"id\": 1, \"label\": \"A\", \"properties\": {}}::vertexx",
            "  \n  \n  ?",
        ];

        for input in inputs {
            let err = parse_agtype(input).unwrap_err();
            let lines: Vec<&str> = input.split('\n').collect();
            assert!(err.line >= 1 && err.line <= lines.len(), "{:?}: {}", input, err);
            assert!(
                err.column <= lines[err.line - 1].chars().count(),
                "{:?}: {}",
                input,
                err
            );
            assert!(!err.offending_text.is_empty());
        }
    }

    /// Deeply nested input is rejected instead of overflowing the stack
    #[test]
    fn test_deep_nesting_rejected() {
        let deep_list = format!("{}{}", "[".repeat(10_000), "]".repeat(10_000));
        let err = parse_agtype(&deep_list).unwrap_err();
        assert_eq!(err.message, "maximum nesting depth exceeded");

        let deep_map = format!("{}1{}", "{\"a\": ".repeat(200), "}".repeat(200));
        assert!(parse_agtype(&deep_map).is_err());
    }

    /// A configured depth limit is honoured exactly
    #[test]
    fn test_custom_depth_limit() {
        let parser = AgtypeParser::new(1);
        let mut listener = CollectingErrorListener::default();
        assert!(parser.parse("[1, 2]", &mut listener).is_some());
        assert!(parser.parse("[[1]]", &mut listener).is_none());
        assert_eq!(listener.errors().len(), 1);
    }

    /// Whitespace is allowed between every token
    #[test]
    fn test_whitespace_tolerance() {
        let spaced = " { \"id\" : 1 ,\n\t\"label\" : \"A\" , \"properties\" : { } } ::vertex ";
        assert!(parse_agtype(spaced).is_ok());

        let path = "[ {\"id\": 1, \"label\": \"A\", \"properties\": {}}::vertex ,\n {\"id\": 3, \"label\": \"r\", \"start_id\": 1, \"end_id\": 2, \"properties\": {}}::edge , {\"id\": 2, \"label\": \"A\", \"properties\": {}}::vertex ] ::path";
        assert!(parse_agtype(path).is_ok());
    }

    /// Very long strings and lists parse without issue
    #[test]
    fn test_large_values() {
        let long_string = format!("\"{}\"", "x".repeat(100_000));
        assert!(parse_agtype(&long_string).is_ok());

        let long_list = format!(
            "[{}]",
            (0..10_000).map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
        );
        assert!(parse_agtype(&long_list).is_ok());
    }
}
