use std::io;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DayDirsError {
    #[error("invalid date `{input}` ({reason}); use YYYY-MM-DD")]
    DateParse { input: String, reason: String },

    #[error("start date {start} is after end date {end}")]
    RangeOrder { start: NaiveDate, end: NaiveDate },

    #[error("invalid name format `{template}`: {reason}")]
    Format { template: String, reason: String },

    #[error("invalid destination {}: {reason}", path.display())]
    Destination { path: PathBuf, reason: String },

    #[error("creating directory {path}")]
    Filesystem {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DayDirsError {
    pub(crate) fn date_parse(input: &str, reason: impl Into<String>) -> Self {
        Self::DateParse {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn format(template: &str, reason: impl Into<String>) -> Self {
        Self::Format {
            template: template.to_owned(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DayDirsError>;
