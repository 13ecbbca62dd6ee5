//! Parse options sent along with the uploaded document

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Result encoding requested from the service
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    #[default]
    Markdown,
    Text,
}

impl OutputFormat {
    /// Name used both as a form value and as the last segment of the result path
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Text => "text",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "markdown" => Ok(OutputFormat::Markdown),
            "text" => Ok(OutputFormat::Text),
            other => Err(Error::config(format!(
                "Unknown output format '{}' (expected json, markdown or text)",
                other
            ))),
        }
    }
}

/// 0-based page indices, sent as a comma separated list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetPages(Vec<u32>);

impl TargetPages {
    pub fn new(pages: impl IntoIterator<Item = u32>) -> Self {
        Self(pages.into_iter().collect())
    }

    pub fn pages(&self) -> &[u32] {
        &self.0
    }
}

impl fmt::Display for TargetPages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

impl FromStr for TargetPages {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let pages = s
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<u32>().map_err(|_| {
                    Error::config(format!("Invalid page index '{}' in target pages", part))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self(pages))
    }
}

impl TryFrom<String> for TargetPages {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TargetPages> for String {
    fn from(value: TargetPages) -> Self {
        value.to_string()
    }
}

/// Options for a parsing job
///
/// Only `output_format` is required, so there is no `Default`; start from
/// [`ParseOptions::new`]. Unset fields are left out of the upload entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOptions {
    pub output_format: OutputFormat,
    /// OCR language of the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Free-text instruction for the parser
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsing_instruction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_separator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_diagonal_text: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalidate_cache: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub do_not_cache: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub do_not_unroll_columns: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpt4o_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_pages: Option<TargetPages>,
}

impl ParseOptions {
    pub fn new(output_format: OutputFormat) -> Self {
        Self {
            output_format,
            language: None,
            parsing_instruction: None,
            page_separator: None,
            skip_diagonal_text: None,
            invalidate_cache: None,
            do_not_cache: None,
            do_not_unroll_columns: None,
            fast_mode: None,
            gpt4o_mode: None,
            target_pages: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_parsing_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.parsing_instruction = Some(instruction.into());
        self
    }

    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.page_separator = Some(separator.into());
        self
    }

    pub fn with_target_pages(mut self, pages: TargetPages) -> Self {
        self.target_pages = Some(pages);
        self
    }

    /// Multipart text fields for every option that is set, in wire order
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("output_format", self.output_format.to_string())];

        let text = [
            ("language", &self.language),
            ("parsing_instruction", &self.parsing_instruction),
            ("page_separator", &self.page_separator),
        ];
        for (name, value) in text {
            if let Some(value) = value {
                fields.push((name, value.clone()));
            }
        }

        let toggles = [
            ("skip_diagonal_text", self.skip_diagonal_text),
            ("invalidate_cache", self.invalidate_cache),
            ("do_not_cache", self.do_not_cache),
            ("do_not_unroll_columns", self.do_not_unroll_columns),
            ("fast_mode", self.fast_mode),
            ("gpt4o_mode", self.gpt4o_mode),
        ];
        for (name, value) in toggles {
            if let Some(value) = value {
                fields.push((name, value.to_string()));
            }
        }

        if let Some(ref pages) = self.target_pages {
            fields.push(("target_pages", pages.to_string()));
        }

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_output_format_sent_by_default() {
        let fields = ParseOptions::new(OutputFormat::Json).form_fields();
        assert_eq!(fields, vec![("output_format", "json".to_string())]);
    }

    #[test]
    fn test_defined_fields_are_sent() {
        let options = ParseOptions {
            fast_mode: Some(true),
            do_not_cache: Some(false),
            ..ParseOptions::new(OutputFormat::Text)
        }
        .with_language("fr")
        .with_target_pages(TargetPages::new([0, 2, 5]));

        let fields = options.form_fields();
        assert_eq!(
            fields,
            vec![
                ("output_format", "text".to_string()),
                ("language", "fr".to_string()),
                ("do_not_cache", "false".to_string()),
                ("fast_mode", "true".to_string()),
                ("target_pages", "0,2,5".to_string()),
            ]
        );
        assert!(fields.iter().all(|(_, v)| v != "undefined" && !v.is_empty()));
    }

    #[test]
    fn test_target_pages_parse() {
        let pages: TargetPages = "0, 3,7".parse().unwrap();
        assert_eq!(pages.pages(), &[0, 3, 7]);
        assert_eq!(pages.to_string(), "0,3,7");

        assert!("1,two".parse::<TargetPages>().is_err());
        assert!("".parse::<TargetPages>().is_err());
        assert!("-1".parse::<TargetPages>().is_err());
    }

    #[test]
    fn test_output_format_names() {
        for format in [OutputFormat::Json, OutputFormat::Markdown, OutputFormat::Text] {
            assert_eq!(format.as_str().parse::<OutputFormat>().unwrap(), format);
        }
        assert!("html".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default(), OutputFormat::Markdown);
    }

    #[test]
    fn test_serde_skips_unset_fields() {
        let value = serde_json::to_value(ParseOptions::new(OutputFormat::Markdown)).unwrap();
        assert_eq!(value, serde_json::json!({"output_format": "markdown"}));
    }

    #[test]
    fn test_output_format_is_required() {
        let err = serde_json::from_value::<ParseOptions>(serde_json::json!({"language": "fr"}));
        assert!(err.is_err());

        let options: ParseOptions =
            serde_json::from_value(serde_json::json!({"output_format": "text"})).unwrap();
        assert_eq!(options, ParseOptions::new(OutputFormat::Text));
    }
}
