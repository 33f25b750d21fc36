//! Color resolution
//!
//! A token category gets its color from the first source that has one:
//! a per-category override flag, the user-supplied map, the default scheme.
//! Categories none of them know are black.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::syntax::Rgb;

/// Category key (lowercase label) to hex color
pub type ColorMap = HashMap<String, String>;

/// Per-category override flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryOverride {
    Keyword,
    Class,
    Function,
    Number,
    Comment,
    String,
    Decorator,
    Exception,
    Operator,
}

impl CategoryOverride {
    /// Every override, in precedence order
    pub const ALL: [CategoryOverride; 9] = [
        CategoryOverride::Keyword,
        CategoryOverride::Class,
        CategoryOverride::Function,
        CategoryOverride::Number,
        CategoryOverride::Comment,
        CategoryOverride::String,
        CategoryOverride::Decorator,
        CategoryOverride::Exception,
        CategoryOverride::Operator,
    ];

    /// The category segment this override targets
    pub fn label(&self) -> &'static str {
        match self {
            CategoryOverride::Keyword => "keyword",
            CategoryOverride::Class => "class",
            CategoryOverride::Function => "function",
            CategoryOverride::Number => "number",
            CategoryOverride::Comment => "comment",
            CategoryOverride::String => "string",
            CategoryOverride::Decorator => "decorator",
            CategoryOverride::Exception => "exception",
            CategoryOverride::Operator => "operator",
        }
    }

    /// Whether `category` has this override's label as one of its segments
    pub fn matches(&self, category: &str) -> bool {
        category
            .split('.')
            .any(|segment| segment.eq_ignore_ascii_case(self.label()))
    }
}

/// Parse the user color map argument
///
/// The argument is a JSON object of category to hex color; single quotes are
/// accepted in place of double quotes. Anything malformed yields an empty map.
pub fn parse_user_map(arg: &str) -> ColorMap {
    if arg.trim().is_empty() {
        return ColorMap::new();
    }

    match serde_json::from_str::<HashMap<String, String>>(&arg.replace('\'', "\"")) {
        Ok(map) => map
            .into_iter()
            .map(|(category, color)| (category.to_ascii_lowercase(), color))
            .collect(),
        Err(e) => {
            warn!("Invalid JSON string provided for color codes ({}), ignoring it", e);
            ColorMap::new()
        }
    }
}

/// Three-tier color lookup
#[derive(Debug, Clone)]
pub struct ColorResolver {
    defaults: ColorMap,
    user: ColorMap,
    overrides: Vec<(CategoryOverride, String)>,
}

impl ColorResolver {
    pub fn new(defaults: ColorMap, user: ColorMap, overrides: Vec<(CategoryOverride, String)>) -> Self {
        let mut overrides = overrides;
        overrides.retain(|(_, color)| !color.trim().is_empty());
        overrides.sort_by_key(|(which, _)| CategoryOverride::ALL.iter().position(|o| o == which));
        debug!(
            defaults = defaults.len(),
            user = user.len(),
            overrides = overrides.len(),
            "color resolver ready"
        );
        Self {
            defaults,
            user,
            overrides,
        }
    }

    /// Hex color for a category, or None when no source has one
    pub fn resolve_hex(&self, category: &str) -> Option<&str> {
        let key = category.to_ascii_lowercase();
        self.overrides
            .iter()
            .find(|(which, _)| which.matches(&key))
            .map(|(_, color)| color)
            .or_else(|| self.user.get(&key))
            .or_else(|| self.defaults.get(&key))
            .map(String::as_str)
    }

    /// RGB color for a category
    pub fn resolve(&self, category: &str) -> Rgb {
        Rgb::from_hex_or_black(self.resolve_hex(category))
    }
}
