//! Output format lookup table.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};

/// Formats a dataset can be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
    Yaml,
    Xml,
    Sql,
    Sqlite,
    Cbor,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 8] = [
        OutputFormat::Csv,
        OutputFormat::Tsv,
        OutputFormat::Json,
        OutputFormat::Yaml,
        OutputFormat::Xml,
        OutputFormat::Sql,
        OutputFormat::Sqlite,
        OutputFormat::Cbor,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Xml => "xml",
            OutputFormat::Sql => "sql",
            OutputFormat::Sqlite => "sqlite",
            OutputFormat::Cbor => "cbor",
        }
    }

    /// File extension of the written file.
    pub const fn extension(self) -> &'static str {
        match self {
            OutputFormat::Sqlite => "sqlite3",
            other => other.as_str(),
        }
    }

    /// Flat formats write one line per source row instead of one table per level.
    pub const fn is_flat(self) -> bool {
        matches!(self, OutputFormat::Csv | OutputFormat::Tsv)
    }

    /// Formats the `minify` option changes.
    pub const fn supports_minify(self) -> bool {
        matches!(
            self,
            OutputFormat::Json | OutputFormat::Xml | OutputFormat::Sql
        )
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().trim_start_matches('.').to_ascii_lowercase();
        let normalized = match normalized.as_str() {
            "yml" => "yaml",
            "sqlite3" | "db" => "sqlite",
            other => other,
        };
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == normalized)
            .ok_or_else(|| anyhow!("unsupported output format: {value}"))
    }
}

/// Encoder settings passed explicitly to every writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Drop indentation and line breaks where the format allows it.
    pub minify: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("yml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!(".sqlite3".parse::<OutputFormat>().unwrap(), OutputFormat::Sqlite);
        assert!("xlsx".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn sqlite_uses_sqlite3_extension() {
        assert_eq!(OutputFormat::Sqlite.extension(), "sqlite3");
        assert_eq!(OutputFormat::Cbor.extension(), "cbor");
    }
}
