//! Indentation Options
//!
//! The knobs every check reads, and the `.java-indent.toml` file format
//! that overrides them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name looked up from the working directory upwards
pub const OPTIONS_FILE_NAME: &str = ".java-indent.toml";

/// Immutable option set shared by every handler of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndentationOptions {
    /// Nesting step for block bodies
    pub basic_offset: usize,
    /// Extra shift for braces on their own line
    pub brace_adjustment: usize,
    /// Shift of `case` labels from their `switch`
    pub case_indent: usize,
    /// Shift of a wrapped `throws` clause
    pub throws_indent: usize,
    /// Shift of array initializer elements
    pub array_init_indent: usize,
    /// Step for continuation lines
    pub line_wrapping_indentation: usize,
    /// Continuation lines must sit exactly at the wrap column
    pub force_strict_condition: bool,
    pub tab_width: usize,
}

impl IndentationOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for IndentationOptions {
    fn default() -> Self {
        Self {
            basic_offset: 4,
            brace_adjustment: 0,
            case_indent: 4,
            throws_indent: 4,
            array_init_indent: 4,
            line_wrapping_indentation: 4,
            force_strict_condition: false,
            tab_width: 8,
        }
    }
}

/// Errors reading or validating an options file
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read options file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid options file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("invalid exclude pattern '{pattern}'")]
    Exclude {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Contents of one options file; absent keys leave lower layers untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsFile {
    pub basic_offset: Option<usize>,
    pub brace_adjustment: Option<usize>,
    pub case_indent: Option<usize>,
    pub throws_indent: Option<usize>,
    pub array_init_indent: Option<usize>,
    pub line_wrapping_indentation: Option<usize>,
    pub force_strict_condition: Option<bool>,
    pub tab_width: Option<usize>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl OptionsFile {
    pub fn parse(text: &str, path: &Path) -> Result<Self, OptionsError> {
        toml::from_str(text).map_err(|source| OptionsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let text = std::fs::read_to_string(path).map_err(|source| OptionsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Overlay the keys present in this file onto `options`
    pub fn apply(&self, options: &mut IndentationOptions) {
        let overlay = |target: &mut usize, value: Option<usize>| {
            if let Some(value) = value {
                *target = value;
            }
        };
        overlay(&mut options.basic_offset, self.basic_offset);
        overlay(&mut options.brace_adjustment, self.brace_adjustment);
        overlay(&mut options.case_indent, self.case_indent);
        overlay(&mut options.throws_indent, self.throws_indent);
        overlay(&mut options.array_init_indent, self.array_init_indent);
        overlay(&mut options.line_wrapping_indentation, self.line_wrapping_indentation);
        overlay(&mut options.tab_width, self.tab_width);
        if let Some(strict) = self.force_strict_condition {
            options.force_strict_condition = strict;
        }
    }
}

/// Reject option values the checks cannot work with
pub fn validate(options: &IndentationOptions) -> Result<(), OptionsError> {
    if options.tab_width == 0 {
        return Err(OptionsError::Zero { field: "tab_width" });
    }
    Ok(())
}

/// Nearest options file in `start` or one of its ancestors
pub fn find_options_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(OPTIONS_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = IndentationOptions::new();
        assert_eq!(options.basic_offset, 4);
        assert_eq!(options.brace_adjustment, 0);
        assert_eq!(options.case_indent, 4);
        assert_eq!(options.throws_indent, 4);
        assert_eq!(options.array_init_indent, 4);
        assert_eq!(options.line_wrapping_indentation, 4);
        assert!(!options.force_strict_condition);
        assert_eq!(options.tab_width, 8);
    }

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let options = IndentationOptions::default();
        let text = toml::to_string(&options).unwrap();
        let back: IndentationOptions = toml::from_str(&text).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn test_partial_file_overlays() {
        let file = OptionsFile::parse(
            "basic_offset = 2\nforce_strict_condition = true\nexclude = [\"gen/\"]\n",
            Path::new("x.toml"),
        )
        .unwrap();
        let mut options = IndentationOptions::default();
        file.apply(&mut options);
        assert_eq!(options.basic_offset, 2);
        assert!(options.force_strict_condition);
        assert_eq!(options.case_indent, 4);
        assert_eq!(file.exclude, vec!["gen/".to_string()]);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = OptionsFile::parse("basicOffset = 2\n", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, OptionsError::Parse { .. }));
        assert!(err.to_string().contains("x.toml"));
    }

    #[test]
    fn test_zero_tab_width_rejected() {
        let options = IndentationOptions {
            tab_width: 0,
            ..IndentationOptions::default()
        };
        assert!(validate(&options).is_err());
        assert!(validate(&IndentationOptions::default()).is_ok());
    }

    #[test]
    fn test_find_options_file_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_options_file(&nested), None);

        let file = dir.path().join(OPTIONS_FILE_NAME);
        std::fs::write(&file, "case_indent = 0\n").unwrap();
        assert_eq!(find_options_file(&nested), Some(file.clone()));
        assert_eq!(OptionsFile::load(&file).unwrap().case_indent, Some(0));
    }
}
