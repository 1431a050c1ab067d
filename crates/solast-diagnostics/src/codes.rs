// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Code registry.
//!
//! Maps diagnostic codes to titles and categories.

use std::collections::HashMap;

pub struct ErrorCodeRegistry {
    codes: HashMap<&'static str, ErrorCodeInfo>,
}

pub struct ErrorCodeInfo {
    pub code: &'static str,
    pub title: &'static str,
    pub category: ErrorCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Construction,
    Literal,
    Resolution,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Syntax => write!(f, "Syntax"),
            ErrorCategory::Construction => write!(f, "Construction"),
            ErrorCategory::Literal => write!(f, "Literal"),
            ErrorCategory::Resolution => write!(f, "Resolution"),
        }
    }
}

macro_rules! register_codes {
    ($($code:literal => ($title:literal, $cat:expr)),* $(,)?) => {{
        let mut map = HashMap::new();
        $(
            map.insert($code, ErrorCodeInfo {
                code: $code,
                title: $title,
                category: $cat,
            });
        )*
        map
    }};
}

impl Default for ErrorCodeRegistry {
    fn default() -> Self {
        use ErrorCategory::*;

        Self {
            codes: register_codes! {
                // Lexer (E00xx)
                "E0001" => ("unexpected character", Syntax),

                // Parser (E01xx)
                "E0100" => ("unexpected token", Syntax),

                // Builder errors (E03xx)
                "E0300" => ("unsupported production", Construction),
                "E0301" => ("function type name", Construction),

                // Builder warnings (W04xx)
                "W0400" => ("malformed number literal", Literal),
                "W0401" => ("unresolved reference", Resolution),
                "W0402" => ("expression in type name", Construction),
            },
        }
    }
}

impl ErrorCodeRegistry {
    pub fn get(&self, code: &str) -> Option<&ErrorCodeInfo> {
        self.codes.get(code)
    }

    /// Every registered code, sorted.
    pub fn all(&self) -> Vec<&ErrorCodeInfo> {
        let mut all: Vec<_> = self.codes.values().collect();
        all.sort_by_key(|info| info.code);
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        let registry = ErrorCodeRegistry::default();
        let info = registry.get("W0401").unwrap();
        assert_eq!(info.title, "unresolved reference");
        assert_eq!(info.category, ErrorCategory::Resolution);
        assert!(registry.get("E9999").is_none());
    }

    #[test]
    fn all_is_sorted() {
        let registry = ErrorCodeRegistry::default();
        let codes: Vec<&str> = registry.all().iter().map(|i| i.code).collect();
        assert_eq!(codes, ["E0001", "E0100", "E0300", "E0301", "W0400", "W0401", "W0402"]);
    }
}
