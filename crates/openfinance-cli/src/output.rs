use std::io::Write;

use serde_json::Value;

use crate::error::CliError;

/// Writes `value` to stdout as one JSON document.
pub fn render(value: &Value, pretty: bool) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    write_json(&mut stdout.lock(), value, pretty)
}

fn write_json<W: Write>(writer: &mut W, value: &Value, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, value)?;
    } else {
        serde_json::to_writer(&mut *writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compact_output_is_a_single_line() {
        let mut buffer = Vec::new();
        write_json(&mut buffer, &json!({"apiKey": "k", "n": [1, 2]}), false).expect("writes");

        assert_eq!(
            String::from_utf8(buffer).expect("utf8"),
            "{\"apiKey\":\"k\",\"n\":[1,2]}\n"
        );
    }

    #[test]
    fn pretty_output_is_indented() {
        let mut buffer = Vec::new();
        write_json(&mut buffer, &json!({"apiKey": "k"}), true).expect("writes");

        assert_eq!(
            String::from_utf8(buffer).expect("utf8"),
            "{\n  \"apiKey\": \"k\"\n}\n"
        );
    }
}
