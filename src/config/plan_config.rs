use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::config::IgnoreSet;
use crate::ext::BestEffortPathExt;
use crate::parser::DEFAULT_INDENT_WIDTH;

pub const CONFIG_FILE_NAME: &str = "treeplan.yaml";

fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Settings read from `treeplan.yaml` at the managed root.
#[derive(Debug, Clone)]
pub struct PlanConfig {
    indent_width: usize,
    ignore: IgnoreSet,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            ignore: IgnoreSet::default(),
        }
    }
}

impl PlanConfig {
    /// Reads the config from `root`. A missing file means defaults.
    pub async fn read(root: &Path) -> Result<Self, PlanConfigError> {
        Self::from_path(get_config_file_path(root)).await
    }

    pub async fn from_path(path: PathBuf) -> Result<Self, PlanConfigError> {
        debug!("Reading config file: {}", path.best_effort_path_display());
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!("No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(error) => {
                return Err(error).context(ReadSnafu {
                    file_path: path.best_effort_path_display(),
                });
            }
        };
        debug!("Successfully read config file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        contents.as_str().try_into()
    }

    pub fn indent_width(&self) -> usize {
        self.indent_width
    }

    pub fn ignore(&self) -> &IgnoreSet {
        &self.ignore
    }

    fn parse_indent(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<usize, PlanConfigError> {
        match top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed("indent")))) {
            None => Ok(DEFAULT_INDENT_WIDTH),
            Some(Yaml::Value(Scalar::Integer(width))) if *width >= 1 => Ok(*width as usize),
            Some(other) => Err(PlanConfigError::InvalidIndent {
                value: format!("{other:?}"),
            }),
        }
    }

    fn parse_ignore(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<IgnoreSet, PlanConfigError> {
        let Some(section) = top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed("ignore"))))
        else {
            return Ok(IgnoreSet::default());
        };

        let patterns = section
            .as_sequence()
            .ok_or(PlanConfigError::IgnoreNotList)?
            .iter()
            .filter_map(|item| {
                let pattern = item.as_str();
                if pattern.is_none() {
                    debug!("Skipping non-string ignore entry: {:?}", item);
                }
                pattern.map(str::to_string)
            })
            .collect::<Vec<_>>();

        IgnoreSet::new(&patterns).context(PatternSnafu)
    }
}

impl TryFrom<&str> for PlanConfig {
    type Error = PlanConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents)
            .map_err(|e| PlanConfigError::ParseError { source: e })?;
        let Some(document) = documents.first() else {
            return Ok(Self::default());
        };

        let top_level = document
            .as_mapping()
            .ok_or(PlanConfigError::TopLevelNotMap)?;

        Ok(PlanConfig {
            indent_width: Self::parse_indent(top_level)?,
            ignore: Self::parse_ignore(top_level)?,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum PlanConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("The config file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("'indent' should be a positive integer, got {}", value))]
    InvalidIndent { value: String },
    #[snafu(display("'ignore' should be a list of names or patterns"))]
    IgnoreNotList,
    #[snafu(display("Invalid ignore pattern"))]
    PatternError { source: glob::PatternError },
}
