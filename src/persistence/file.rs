use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::calendar::Calendar;
use crate::config::HolidayConfig;
use crate::error::{HolidayError, HolidayResult};

pub fn load_config_from_json<P: AsRef<Path>>(path: P) -> HolidayResult<HolidayConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| HolidayError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config =
        HolidayConfig::from_json_str(&contents).map_err(|source| HolidayError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        path = %path.display(),
        calendars = config.calendars.len(),
        "configuration loaded"
    );
    Ok(config)
}

/// Writes the configuration back pretty-printed, newline terminated.
pub fn save_config_to_json<P: AsRef<Path>>(config: &HolidayConfig, path: P) -> HolidayResult<()> {
    let path = path.as_ref();
    let write_error = |source: io::Error| HolidayError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut json = config
        .to_json_pretty()
        .map_err(|err| write_error(io::Error::other(err)))?;
    json.push('\n');
    fs::write(path, json).map_err(write_error)?;
    info!(path = %path.display(), "configuration saved");
    Ok(())
}

/// Absolute form of the destination directory; the working directory when `dir` is `None`.
pub fn resolve_output_dir(dir: Option<&Path>) -> HolidayResult<PathBuf> {
    let requested = match dir {
        Some(dir) => dir.to_path_buf(),
        None => env::current_dir().map_err(|source| HolidayError::OutputPath {
            path: PathBuf::from("."),
            source,
        })?,
    };

    let resolved = fs::canonicalize(&requested).map_err(|source| HolidayError::OutputPath {
        path: requested.clone(),
        source,
    })?;
    if !resolved.is_dir() {
        return Err(HolidayError::OutputPath {
            path: resolved,
            source: io::Error::other("not a directory"),
        });
    }
    Ok(resolved)
}

/// Writes `<dir>/<title>.ics` with CRLF line endings and returns the path written.
pub fn write_calendar<P: AsRef<Path>>(calendar: &Calendar, dir: P) -> HolidayResult<PathBuf> {
    let path = dir.as_ref().join(calendar.file_name());
    fs::write(&path, calendar.to_ics_crlf()).map_err(|source| HolidayError::OutputWrite {
        path: path.clone(),
        source,
    })?;
    info!(
        path = %path.display(),
        events = calendar.events.len(),
        "calendar written"
    );
    Ok(path)
}
