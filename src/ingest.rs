//! Readers for the set of strings to index.
//!
//! Two input encodings are supported: newline-terminated records and a
//! stream of JSON strings. Raw bytes are decoded lossily, so invalid UTF-8
//! sequences become U+FFFD replacement characters before they reach any
//! metric kernel.

use std::io::BufRead;
use std::str::FromStr;

use crate::error::{NeardexError, Result};

/// How the input file is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// One string per newline-terminated record.
    Lines,
    /// A stream of JSON string values.
    Json,
}

impl FromStr for InputFormat {
    type Err = NeardexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "lines" => Ok(InputFormat::Lines),
            "json" => Ok(InputFormat::Json),
            _ => Err(NeardexError::UnknownFormat(s.to_string())),
        }
    }
}

/// Read every string from `reader` according to `format`.
pub fn read_strings<R: BufRead>(reader: R, format: InputFormat) -> Result<Vec<String>> {
    match format {
        InputFormat::Lines => read_lines(reader),
        InputFormat::Json => read_json(reader),
    }
}

fn read_lines<R: BufRead>(mut reader: R) -> Result<Vec<String>> {
    let mut strings = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        strings.push(String::from_utf8_lossy(&buf).into_owned());
    }

    Ok(strings)
}

fn read_json<R: BufRead>(reader: R) -> Result<Vec<String>> {
    serde_json::Deserializer::from_reader(reader)
        .into_iter::<String>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Into::into)
}
