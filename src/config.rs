//! Configuration management for the Java indentation checker.
//!
//! Handles:
//! - Command-line argument parsing
//! - Layered options resolution (defaults, user config, project file,
//!   explicit file, flags)
//! - Exclude patterns

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use regex::Regex;

use crate::options::{self, IndentationOptions, OptionsError, OptionsFile};

/// Output format for violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Command-line arguments for the Java indentation checker
#[derive(Debug, Default, Parser)]
#[command(name = "java-indent")]
#[command(about = "Checks the indentation of Java source files")]
#[command(version)]
pub struct Args {
    /// Files or directories to check
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Options file to use on top of the discovered ones
    #[arg(long, help = "Path to an options file (TOML)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Indentation step for nested blocks")]
    pub basic_offset: Option<usize>,

    #[arg(long, help = "Extra shift for braces on their own line")]
    pub brace_adjustment: Option<usize>,

    #[arg(long, help = "Shift of case labels from their switch")]
    pub case_indent: Option<usize>,

    #[arg(long, help = "Shift of a wrapped throws clause")]
    pub throws_indent: Option<usize>,

    #[arg(long, help = "Shift of array initializer elements")]
    pub array_init_indent: Option<usize>,

    #[arg(long, help = "Indentation step for continuation lines")]
    pub line_wrapping_indentation: Option<usize>,

    #[arg(long, help = "Tab stop width")]
    pub tab_width: Option<usize>,

    /// Require continuation lines to sit exactly at the wrap column
    #[arg(long)]
    pub strict: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Regex of paths to skip; may be repeated
    #[arg(long = "exclude", value_name = "REGEX")]
    pub excludes: Vec<String>,

    /// Log level for the checker
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub paths: Vec<PathBuf>,
    pub options: IndentationOptions,
    pub excludes: Vec<Regex>,
    pub format: OutputFormat,
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        Self::from_args(Args::parse(), &cwd)
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args, cwd: &Path) -> Result<Self> {
        let mut options = IndentationOptions::default();
        let mut exclude_patterns = Vec::new();

        for path in options_files(cwd, args.config.as_deref()) {
            log::debug!("loading options from {}", path.display());
            let file = OptionsFile::load(&path)?;
            file.apply(&mut options);
            exclude_patterns.extend(file.exclude);
        }

        apply_flags(&args, &mut options);
        options::validate(&options)?;

        exclude_patterns.extend(args.excludes);
        let excludes = compile_excludes(&exclude_patterns)?;

        Ok(Config {
            paths: args.paths,
            options,
            excludes,
            format: args.format,
            log_level: args.log_level,
        })
    }

    /// Whether `path` matches one of the exclude patterns
    pub fn is_excluded(&self, path: &Path) -> bool {
        let text = path.to_string_lossy();
        self.excludes.iter().any(|re| re.is_match(&text))
    }
}

/// Command-line arguments for the language server
#[derive(Debug, Default, Parser)]
#[command(name = "java-indent-ls")]
#[command(about = "Language server reporting Java indentation problems")]
#[command(version)]
pub struct ServerArgs {
    /// Options file used until a workspace root provides its own
    #[arg(long, help = "Path to an options file (TOML)")]
    pub config: Option<PathBuf>,

    /// Log level for the language server
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Startup configuration of the language server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub options: IndentationOptions,
    pub log_level: String,
}

impl ServerConfig {
    pub fn from_args_and_env() -> Result<Self> {
        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        Self::from_args(ServerArgs::parse(), &cwd)
    }

    pub fn from_args(args: ServerArgs, cwd: &Path) -> Result<Self> {
        let mut options = IndentationOptions::default();
        for path in options_files(cwd, args.config.as_deref()) {
            OptionsFile::load(&path)?.apply(&mut options);
        }
        options::validate(&options)?;
        Ok(ServerConfig {
            options,
            log_level: args.log_level,
        })
    }
}

/// Options resolved for a server rooted at `root`, without CLI flags
pub fn options_for_root(root: &Path) -> Result<IndentationOptions> {
    let mut options = IndentationOptions::default();
    for path in options_files(root, None) {
        OptionsFile::load(&path)
            .with_context(|| format!("loading {}", path.display()))?
            .apply(&mut options);
    }
    options::validate(&options)?;
    Ok(options)
}

/// Option files in increasing priority
fn options_files(cwd: &Path, explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    // Add default user config directory
    if let Some(config_dir) = dirs::config_dir() {
        let user = config_dir.join("java-indent").join("config.toml");
        if user.is_file() {
            files.push(user);
        }
    }

    if let Some(project) = options::find_options_file(cwd) {
        files.push(project);
    }

    // Add user-specified file if provided
    if let Some(explicit) = explicit {
        files.push(explicit.to_path_buf());
    }
    files
}

fn apply_flags(args: &Args, options: &mut IndentationOptions) {
    let flags = [
        (&mut options.basic_offset, args.basic_offset),
        (&mut options.brace_adjustment, args.brace_adjustment),
        (&mut options.case_indent, args.case_indent),
        (&mut options.throws_indent, args.throws_indent),
        (&mut options.array_init_indent, args.array_init_indent),
        (&mut options.line_wrapping_indentation, args.line_wrapping_indentation),
        (&mut options.tab_width, args.tab_width),
    ];
    for (target, value) in flags {
        if let Some(value) = value {
            *target = value;
        }
    }
    if args.strict {
        options.force_strict_condition = true;
    }
}

fn compile_excludes(patterns: &[String]) -> Result<Vec<Regex>, OptionsError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| OptionsError::Exclude {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(paths: &[&str]) -> Args {
        Args {
            paths: paths.iter().map(PathBuf::from).collect(),
            log_level: "info".to_string(),
            ..Args::default()
        }
    }

    #[test]
    fn test_flags_override_project_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(options::OPTIONS_FILE_NAME),
            "basic_offset = 2\ncase_indent = 0\n",
        )
        .unwrap();

        let mut args = args(&["src"]);
        args.case_indent = Some(2);
        args.strict = true;
        let config = Config::from_args(args, dir.path()).unwrap();
        assert_eq!(config.options.basic_offset, 2);
        assert_eq!(config.options.case_indent, 2);
        assert!(config.options.force_strict_condition);
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn test_explicit_file_wins_over_project_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(options::OPTIONS_FILE_NAME), "tab_width = 4\n").unwrap();
        let explicit = dir.path().join("custom.toml");
        std::fs::write(&explicit, "tab_width = 2\nexclude = [\"generated\"]\n").unwrap();

        let mut args = args(&["."]);
        args.config = Some(explicit);
        args.excludes = vec!["Test\\.java$".to_string()];
        let config = Config::from_args(args, dir.path()).unwrap();
        assert_eq!(config.options.tab_width, 2);
        assert!(config.is_excluded(Path::new("a/generated/B.java")));
        assert!(config.is_excluded(Path::new("a/BTest.java")));
        assert!(!config.is_excluded(Path::new("a/B.java")));
    }

    #[test]
    fn test_bad_exclude_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(&["."]);
        args.excludes = vec!["(".to_string()];
        assert!(Config::from_args(args, dir.path()).is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(&["."]);
        args.config = Some(dir.path().join("absent.toml"));
        let err = Config::from_args(args, dir.path()).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn test_server_config_reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("server.toml");
        std::fs::write(&explicit, "line_wrapping_indentation = 8\n").unwrap();
        let args = ServerArgs {
            config: Some(explicit),
            log_level: "debug".to_string(),
        };
        let config = ServerConfig::from_args(args, dir.path()).unwrap();
        assert_eq!(config.options.line_wrapping_indentation, 8);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_options_for_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(options::OPTIONS_FILE_NAME), "array_init_indent = 2\n").unwrap();
        let options = options_for_root(dir.path()).unwrap();
        assert_eq!(options.array_init_indent, 2);
    }
}
