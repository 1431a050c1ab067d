// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Canonical table of built-in value types.

use super::{StateMutability, TypeDescription};

/// Result of normalizing an elementary spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elementary {
    /// Canonical type string, e.g. `uint256` for `uint`.
    pub name: String,
    /// Set for `address` (nonpayable) and `address payable` (payable).
    pub mutability: Option<StateMutability>,
    /// False when the spelling is not in the table and passed through as-is.
    pub known: bool,
}

impl Elementary {
    /// Identifier is `t_` plus the canonical name, spaces replaced by `_`.
    pub fn description(&self) -> TypeDescription {
        TypeDescription::new(format!("t_{}", self.name.replace(' ', "_")), self.name.clone())
    }
}

/// Normalize an elementary type spelling.
///
/// Aliases collapse onto their canonical width (`uint` → `uint256`,
/// `byte` → `bytes1`). Whitespace inside the spelling is collapsed, and
/// the token-joined form `addresspayable` is accepted. Unknown spellings
/// pass through unchanged with `known == false`.
pub fn normalize(spelling: &str) -> Elementary {
    let collapsed = spelling.split_whitespace().collect::<Vec<_>>().join(" ");
    let (name, known) = match collapsed.as_str() {
        "uint" => ("uint256".to_string(), true),
        "int" => ("int256".to_string(), true),
        "byte" => ("bytes1".to_string(), true),
        "fixed" => ("fixed128x18".to_string(), true),
        "ufixed" => ("ufixed128x18".to_string(), true),
        "addresspayable" => ("address payable".to_string(), true),
        s if is_canonical(s) => (s.to_string(), true),
        s => (s.to_string(), false),
    };
    let mutability = match name.as_str() {
        "address" => Some(StateMutability::NonPayable),
        "address payable" => Some(StateMutability::Payable),
        _ => None,
    };
    Elementary { name, mutability, known }
}

/// True for every single-word spelling the lexer should treat as a type
/// keyword, aliases included.
pub fn is_elementary(word: &str) -> bool {
    matches!(word, "uint" | "int" | "byte" | "fixed" | "ufixed") || (is_canonical(word) && !word.contains(' '))
}

fn is_canonical(s: &str) -> bool {
    match s {
        "address" | "address payable" | "bool" | "string" | "bytes" => true,
        _ => {
            if let Some(width) = s.strip_prefix("uint").or_else(|| s.strip_prefix("int")) {
                return int_width(width);
            }
            if let Some(width) = s.strip_prefix("bytes") {
                return matches!(width.parse::<u32>(), Ok(n) if (1..=32).contains(&n) && !width.starts_with('0'));
            }
            if let Some(rest) = s.strip_prefix("ufixed").or_else(|| s.strip_prefix("fixed")) {
                if let Some((m, n)) = rest.split_once('x') {
                    let decimals = matches!(n.parse::<u32>(), Ok(n) if n <= 80);
                    return int_width(m) && decimals;
                }
            }
            false
        }
    }
}

fn int_width(width: &str) -> bool {
    if width.starts_with('0') {
        return false;
    }
    matches!(width.parse::<u32>(), Ok(n) if n % 8 == 0 && (8..=256).contains(&n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_normalize() {
        assert_eq!(normalize("uint").name, "uint256");
        assert_eq!(normalize("int").name, "int256");
        assert_eq!(normalize("byte").name, "bytes1");
        assert_eq!(normalize("ufixed").name, "ufixed128x18");
    }

    #[test]
    fn identifiers_are_prefixed() {
        assert_eq!(normalize("uint256").description().type_identifier, "t_uint256");
        assert_eq!(normalize("bytes32").description().type_identifier, "t_bytes32");
        let payable = normalize("address   payable").description();
        assert_eq!(payable.type_identifier, "t_address_payable");
        assert_eq!(payable.type_string, "address payable");
    }

    #[test]
    fn address_mutability() {
        assert_eq!(normalize("address").mutability, Some(StateMutability::NonPayable));
        assert_eq!(normalize("addresspayable").mutability, Some(StateMutability::Payable));
        assert_eq!(normalize("bool").mutability, None);
    }

    #[test]
    fn widths_are_validated() {
        assert!(normalize("uint8").known);
        assert!(normalize("int256").known);
        assert!(!normalize("uint7").known);
        assert!(!normalize("uint264").known);
        assert!(!normalize("bytes33").known);
        assert!(normalize("fixed128x18").known);
        assert!(!normalize("fixed128x81").known);
    }

    #[test]
    fn unknown_spellings_pass_through() {
        let e = normalize("uint7");
        assert_eq!(e.description().type_identifier, "t_uint7");
        assert_eq!(e.description().type_string, "uint7");
    }

    #[test]
    fn lexer_keywords() {
        assert!(is_elementary("uint"));
        assert!(is_elementary("address"));
        assert!(!is_elementary("payable"));
        assert!(!is_elementary("uint7"));
        assert!(!is_elementary("owner"));
    }
}
