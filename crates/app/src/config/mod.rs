//! Configuration management for the demo application.
//! This module handles parsing and validation of the
//! ~/.config/autotask/demo.json configuration file and of the loose option
//! maps the host passes to applications.

mod io;
mod model;
mod validation;

pub use io::{CONFIG_PATH_ENV, default_config_path, load_config, load_config_from_path, save_config_to_path};
pub use model::{AppConfig, ConfigError, DEFAULT_PORT};
pub use validation::{ValidationError, validate_config};
