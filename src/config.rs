//! Color configuration
//!
//! Default colors come from a scheme compiled into the binary, optionally
//! layered with a `color.conf` file from the working directory.
//!
//! Format: INI-style key/value pairs, keys under `[default_colors]`
//! Lines starting with # or ; are comments
//!
//! Example:
//! ```text
//! [default_colors]
//! token.keyword = #05cbf7
//! token.name.class: #fcba03
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::colors::ColorMap;
use crate::error::Result;
use crate::syntax::TokenKind;

/// Color config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "color.conf";

/// Section holding the default colors
pub const DEFAULT_SECTION: &str = "default_colors";

const BUILTIN_SCHEME: &str = include_str!("default_colors.toml");

/// The compiled-in color scheme
pub fn builtin_defaults() -> Result<ColorMap> {
    let mut sections: HashMap<String, ColorMap> = toml::from_str(BUILTIN_SCHEME)?;
    let colors = sections.remove(DEFAULT_SECTION).unwrap_or_default();
    for kind in TokenKind::ALL {
        if !colors.contains_key(&kind.key()) {
            warn!("Built-in scheme has no color for {}", kind);
        }
    }
    Ok(colors)
}

/// Load the default colors: built-in scheme, then `path` on top of it
///
/// A missing file is not an error.
pub fn load_defaults(path: &Path) -> Result<ColorMap> {
    let mut colors = builtin_defaults()?;

    match fs::read_to_string(path) {
        Ok(contents) => {
            let settings = parse(&contents);
            debug!("Loaded {} colors from {}", settings.len(), path.display());
            for key in settings.keys() {
                if TokenKind::from_name(key).is_none() {
                    warn!("{}: unknown token category '{}'", path.display(), key);
                }
            }
            colors.extend(settings);
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No color config at {}, using built-in colors", path.display());
        }
        Err(e) => warn!("Cannot read {}: {}, using built-in colors", path.display(), e),
    }

    Ok(colors)
}

/// Parse config file contents into key-value pairs of the default section
///
/// Keys before any section header count as part of the default section.
fn parse(contents: &str) -> ColorMap {
    let mut settings = ColorMap::new();
    let mut in_defaults = true;

    for line in contents.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(section) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            in_defaults = section.trim().eq_ignore_ascii_case(DEFAULT_SECTION);
            continue;
        }

        if !in_defaults {
            continue;
        }

        // Parse key = value (or key: value)
        if let Some((key, value)) = line.split_once(|c: char| c == '=' || c == ':') {
            let key = key.trim().to_lowercase();
            let value = value.trim().to_string();
            settings.insert(key, value);
        }
    }

    settings
}
