// Output formatting for CLI

use anyhow::Result;
use clap::ValueEnum;
use serde_json::Value;
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Pretty,
    /// Compact JSON, one record per line
    Json,
    /// Key-value pairs
    KeyValue,
    /// Table format
    Table,
}

/// Format and output records
pub struct OutputFormatter {
    format: OutputFormat,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Output one record
    pub fn output(&self, record: &Value, writer: &mut dyn Write) -> Result<()> {
        match self.format {
            OutputFormat::Pretty => writeln!(writer, "{}", serde_json::to_string_pretty(record)?)?,
            OutputFormat::Json => writeln!(writer, "{}", serde_json::to_string(record)?)?,
            OutputFormat::KeyValue => self.output_key_value(record, writer)?,
            OutputFormat::Table => self.output_table(record, writer)?,
        }
        Ok(())
    }

    /// Output as key-value pairs, keys sorted
    fn output_key_value(&self, record: &Value, writer: &mut dyn Write) -> Result<()> {
        if let Some(obj) = record.as_object() {
            let mut items: Vec<_> = obj.iter().collect();
            items.sort_by(|a, b| a.0.cmp(b.0));

            for (key, value) in items {
                writeln!(writer, "{}={}", key, format_value(value))?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Output as table
    fn output_table(&self, record: &Value, writer: &mut dyn Write) -> Result<()> {
        if let Some(obj) = record.as_object() {
            let max_key_len = obj.keys().map(|k| k.len()).max().unwrap_or(0);

            writeln!(writer, "{}", "=".repeat(max_key_len + 30))?;
            for (key, value) in obj {
                writeln!(
                    writer,
                    "{:<width$} {}",
                    format!("{}:", key),
                    format_value(value),
                    width = max_key_len + 1
                )?;
            }
            writeln!(writer, "{}", "=".repeat(max_key_len + 30))?;
        }
        Ok(())
    }

    /// Print success message
    pub fn print_success(&self, message: &str) {
        if !self.quiet {
            eprintln!("✓ {}", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if !self.quiet {
            eprintln!("  {}", message);
        }
    }
}

/// Format a JSON value for display
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "(none)".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(obj) => format!("{{{} items}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(format: OutputFormat, record: &Value) -> String {
        let mut out = Vec::new();
        OutputFormatter::new(format, true).output(record, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn key_value_is_sorted() {
        let record = json!({"title": "Song", "album": null, "readers": ["id3v2", "flac"]});
        assert_eq!(
            render(OutputFormat::KeyValue, &record),
            "album=(none)\nreaders=id3v2, flac\ntitle=Song\n\n"
        );
    }

    #[test]
    fn json_is_one_line() {
        let record = json!({"title": "Song"});
        assert_eq!(render(OutputFormat::Json, &record), "{\"title\":\"Song\"}\n");
    }

    #[test]
    fn table_aligns_values() {
        let record = json!({"a": 1, "long": 2});
        let text = render(OutputFormat::Table, &record);
        assert!(text.contains("a:    1\n"));
        assert!(text.contains("long: 2\n"));
    }
}
