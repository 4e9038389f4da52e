pub mod file;

pub use file::{load_config_from_json, resolve_output_dir, save_config_to_json, write_calendar};
