//! Turns raw `key=value` CLI tokens into a parameter map.
//!
//! Supported token forms:
//! - `key=value`   literal assignment
//! - `key=@file`   value read from a file
//! - `key=-`       value read from stdin
//! - `key=\@value` escaped literal starting with `@`
//! - `@file`       whole file parsed as a JSON object and merged
//! - `-`           whole stdin parsed as a JSON object and merged
//!
//! Stdin is a single-consumption resource: across all tokens of one
//! invocation at most one stdin indirection is allowed, and the check runs
//! before any read starts.

use crate::error::Error;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;

/// Parse raw tokens into a map of JSON values.
pub fn parse_args_data<R: Read>(
    mut stdin: R,
    args: &[String],
) -> Result<HashMap<String, Value>, Error> {
    let stdin_requests = args
        .iter()
        .filter(|a| a.as_str() == "-" || matches!(a.split_once('='), Some((_, "-"))))
        .count();
    if stdin_requests > 1 {
        return Err(Error::MultipleStdinConsumption);
    }

    let mut values = HashMap::new();

    for arg in args {
        if arg == "-" {
            let mut buf = String::new();
            stdin.read_to_string(&mut buf)?;
            merge_object(&mut values, &buf)?;
        } else if let Some(path) = arg.strip_prefix('@') {
            let content = std::fs::read_to_string(path)?;
            merge_object(&mut values, &content)?;
        } else if let Some((key, value)) = arg.split_once('=') {
            let value = match value {
                "-" => {
                    let mut buf = String::new();
                    stdin.read_to_string(&mut buf)?;
                    buf
                }
                _ => {
                    if let Some(path) = value.strip_prefix('@') {
                        std::fs::read_to_string(path)?
                    } else if let Some(escaped) = value.strip_prefix("\\@") {
                        format!("@{}", escaped)
                    } else {
                        value.to_string()
                    }
                }
            };
            values.insert(key.to_string(), Value::String(value));
        } else {
            return Err(Error::InvalidArgument {
                token: arg.clone(),
            });
        }
    }

    Ok(values)
}

/// Parse raw tokens and coerce every value to a string. Fails when a value
/// is not a scalar.
pub fn parse_args_data_string<R: Read>(
    stdin: R,
    args: &[String],
) -> Result<HashMap<String, String>, Error> {
    let raw = parse_args_data(stdin, args)?;

    let mut keys: Vec<_> = raw.keys().cloned().collect();
    keys.sort();

    let mut result = HashMap::with_capacity(raw.len());
    for key in keys {
        let value = coerce_scalar(&key, &raw[&key])?;
        result.insert(key, value);
    }
    Ok(result)
}

/// Parse raw tokens and coerce every value to a list of strings. A scalar
/// becomes a one-element list. Empty input yields an empty map.
pub fn parse_args_data_string_lists<R: Read>(
    stdin: R,
    args: &[String],
) -> Result<HashMap<String, Vec<String>>, Error> {
    let raw = parse_args_data(stdin, args)?;

    let mut keys: Vec<_> = raw.keys().cloned().collect();
    keys.sort();

    let mut result = HashMap::with_capacity(raw.len());
    for key in keys {
        let value = match &raw[&key] {
            Value::Array(items) => items
                .iter()
                .map(|item| coerce_scalar(&key, item))
                .collect::<Result<Vec<_>, _>>()?,
            scalar => vec![coerce_scalar(&key, scalar)?],
        };
        result.insert(key, value);
    }
    Ok(result)
}

fn merge_object(values: &mut HashMap<String, Value>, content: &str) -> Result<(), Error> {
    let parsed: Value = serde_json::from_str(content)
        .map_err(|e| Error::MalformedStructuredData(e.to_string()))?;

    match parsed {
        Value::Object(map) => {
            // Last token wins on key collision.
            for (k, v) in map {
                values.insert(k, v);
            }
            Ok(())
        }
        _ => Err(Error::MalformedStructuredData(
            "expected a JSON object of key/value pairs".to_string(),
        )),
    }
}

fn coerce_scalar(key: &str, value: &Value) -> Result<String, Error> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        _ => Err(Error::TypeCoercion {
            key: key.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_stdin_full() {
        let stdin = Cursor::new(r#"{"foo":"bar"}"#);
        let m = parse_args_data(stdin, &args(&["-"])).unwrap();
        assert_eq!(m["foo"], "bar");
    }

    #[test]
    fn test_stdin_value() {
        let stdin = Cursor::new("bar");
        let m = parse_args_data(stdin, &args(&["foo=-"])).unwrap();
        assert_eq!(m["foo"], "bar");
    }

    #[test]
    fn test_file_full() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, r#"{{"foo":"bar"}}"#).unwrap();

        let token = format!("@{}", f.path().display());
        let m = parse_args_data(Cursor::new(""), &args(&[&token])).unwrap();
        assert_eq!(m["foo"], "bar");
    }

    #[test]
    fn test_file_value() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "bar").unwrap();

        let token = format!("foo=@{}", f.path().display());
        let m = parse_args_data(Cursor::new(""), &args(&[&token])).unwrap();
        assert_eq!(m["foo"], "bar");
    }

    #[test]
    fn test_file_value_escaped() {
        let m = parse_args_data(Cursor::new(""), &args(&[r"foo=\@"])).unwrap();
        assert_eq!(m["foo"], "@");

        // exactly one backslash is stripped
        let m = parse_args_data(Cursor::new(""), &args(&[r"foo=\@literal"])).unwrap();
        assert_eq!(m["foo"], "@literal");
    }

    #[test]
    fn test_double_stdin_rejected_before_read() {
        let err = parse_args_data(Cursor::new("payload"), &args(&["-", "foo=-"])).unwrap_err();
        assert!(matches!(err, Error::MultipleStdinConsumption));

        let err = parse_args_data(Cursor::new(""), &args(&["a=-", "b=-"])).unwrap_err();
        assert!(matches!(err, Error::MultipleStdinConsumption));
    }

    #[test]
    fn test_later_literal_overrides_file_key() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, r#"{{"foo":"from-file","baz":"qux"}}"#).unwrap();

        let token = format!("@{}", f.path().display());
        let m = parse_args_data(Cursor::new(""), &args(&[&token, "foo=explicit"])).unwrap();
        assert_eq!(m["foo"], "explicit");
        assert_eq!(m["baz"], "qux");
    }

    #[test]
    fn test_invalid_token() {
        let err = parse_args_data(Cursor::new(""), &args(&["no-equals-sign"])).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = parse_args_data(Cursor::new(""), &args(&["foo=@/nonexistent/f"])).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_stdin_not_an_object() {
        let err = parse_args_data(Cursor::new(r#"["not","an","object"]"#), &args(&["-"]))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedStructuredData(_)));
    }

    #[test]
    fn test_string_coercion() {
        let stdin = Cursor::new(r#"{"n":42,"b":true,"s":"x"}"#);
        let m = parse_args_data_string(stdin, &args(&["-"])).unwrap();
        assert_eq!(m["n"], "42");
        assert_eq!(m["b"], "true");
        assert_eq!(m["s"], "x");
    }

    #[test]
    fn test_string_coercion_rejects_nested() {
        let stdin = Cursor::new(r#"{"nested":{"a":1}}"#);
        let err = parse_args_data_string(stdin, &args(&["-"])).unwrap_err();
        match err {
            Error::TypeCoercion { key } => assert_eq!(key, "nested"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_string_lists() {
        let stdin = Cursor::new(r#"{"many":["a","b"],"one":"c"}"#);
        let m = parse_args_data_string_lists(stdin, &args(&["-"])).unwrap();
        assert_eq!(m["many"], vec!["a", "b"]);
        assert_eq!(m["one"], vec!["c"]);
    }

    #[test]
    fn test_empty_input_is_empty_map() {
        let m = parse_args_data_string_lists(Cursor::new(""), &[]).unwrap();
        assert!(m.is_empty());

        let m = parse_args_data_string(Cursor::new(""), &[]).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn test_file_value_keeps_bytes_untrimmed() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "bar\n").unwrap();

        let token = format!("foo=@{}", f.path().display());
        let m = parse_args_data(Cursor::new(""), &args(&[&token])).unwrap();
        assert_eq!(m["foo"], "bar\n");
    }
}
