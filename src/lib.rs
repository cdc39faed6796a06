//! Create one folder per calendar day in a date range, named from a template
//! such as `{iso}_{weekday}`.

pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod logging;
pub mod runner;
pub mod template;

pub use config::RunConfig;
pub use dates::{DateRange, DaySequence, days_between, parse_date};
pub use error::DayDirsError;
pub use runner::{FolderStatus, RunReport, create_folders};
pub use template::{NameTemplate, WEEKDAYS, render_folder_name};
