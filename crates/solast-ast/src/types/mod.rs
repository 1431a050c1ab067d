// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type descriptions.
//!
//! Every typed node carries a [`TypeDescription`]: a canonical machine
//! identifier plus a display string. Two descriptions are the same type
//! exactly when their identifiers are equal; the display string never
//! takes part in comparisons.

pub mod elementary;
pub mod literal;
mod table;

use std::hash::{Hash, Hasher};

pub use literal::Rational;
pub use table::{Composite, DeclaredKind, TypeTable};

#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDescription {
    pub type_identifier: String,
    pub type_string: String,
}

impl PartialEq for TypeDescription {
    fn eq(&self, other: &Self) -> bool {
        self.type_identifier == other.type_identifier
    }
}

impl Hash for TypeDescription {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_identifier.hash(state);
    }
}

impl std::fmt::Display for TypeDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.type_string)
    }
}

impl TypeDescription {
    pub fn new(type_identifier: impl Into<String>, type_string: impl Into<String>) -> Self {
        Self {
            type_identifier: type_identifier.into(),
            type_string: type_string.into(),
        }
    }

    /// Canonical description of an elementary spelling (`uint`, `address payable`, ...).
    pub fn elementary(spelling: &str) -> Self {
        elementary::normalize(spelling).description()
    }

    pub fn boolean() -> Self {
        Self::new("t_bool", "bool")
    }

    pub fn magic_message() -> Self {
        Self::new("t_magic_message", "msg")
    }

    pub fn magic_block() -> Self {
        Self::new("t_magic_block", "block")
    }

    pub fn string_literal(lexeme: &str) -> Self {
        Self::new("t_string_literal", format!("literal_string {lexeme}"))
    }

    pub fn hex_string_literal(lexeme: &str) -> Self {
        Self::new("t_string_hex_literal", format!("literal_hex_string {lexeme}"))
    }

    /// Number literal type. `lexeme` is the literal as written.
    pub fn rational(value: &Rational, lexeme: &str) -> Self {
        let class = if value.fixed { "fixed_const" } else { "int_const" };
        Self::new(
            format!("rational_{}_by_{}", value.numerator, value.denominator),
            format!("{class} {lexeme}"),
        )
    }

    /// `mapping(<K> => <V>)`, identified as `mapping_$<k>_$<v>$`.
    pub fn mapping(key_name: &str, key: &TypeDescription, value_name: &str, value: &TypeDescription) -> Self {
        Self::new(
            format!("mapping_${}_${}$", key.type_identifier, value.type_identifier),
            format!("mapping({key_name} => {value_name})"),
        )
    }

    /// Array of `base`. A `None` length is a dynamic array.
    pub fn array(base: &TypeDescription, length: Option<&str>) -> Self {
        match length {
            Some(len) => Self::new(
                format!("t_array$_{}_${len}", base.type_identifier),
                format!("{}[{len}]", base.type_string),
            ),
            None => Self::new(
                format!("t_array$_{}_$dyn", base.type_identifier),
                format!("{}[]", base.type_string),
            ),
        }
    }

    /// `keyword` is `contract`, `interface` or `library`.
    pub fn contract(keyword: &str, name: &str, id: crate::NodeId) -> Self {
        Self::new(format!("t_contract$_{name}_${id}"), format!("{keyword} {name}"))
    }

    pub fn structure(name: &str, id: crate::NodeId) -> Self {
        Self::new(format!("t_struct$_{name}_${id}"), format!("struct {name}"))
    }

    pub fn enumeration(name: &str, id: crate::NodeId) -> Self {
        Self::new(format!("t_enum$_{name}_${id}"), format!("enum {name}"))
    }

    pub fn user_defined_value(name: &str, id: crate::NodeId) -> Self {
        Self::new(format!("t_userDefinedValueType$_{name}_${id}"), name)
    }

    /// Tuple of the given components; a `None` component is an omitted slot.
    pub fn tuple(components: &[Option<TypeDescription>]) -> Self {
        let ids: Vec<&str> = components
            .iter()
            .map(|c| c.as_ref().map_or("", |t| t.type_identifier.as_str()))
            .collect();
        let strings: Vec<&str> = components
            .iter()
            .map(|c| c.as_ref().map_or("", |t| t.type_string.as_str()))
            .collect();
        Self::new(
            format!("t_tuple{}", dollar_list(&ids)),
            format!("tuple({})", strings.join(",")),
        )
    }

    pub fn empty_tuple() -> Self {
        Self::tuple(&[])
    }

    /// Function type. `class` is the visibility class (`internal`,
    /// `external`, or `event`/`error` for those declarations).
    pub fn function(
        class: &str,
        mutability: StateMutability,
        parameters: &[TypeDescription],
        returns: &[TypeDescription],
    ) -> Self {
        let ids = |tds: &[TypeDescription]| {
            let ids: Vec<&str> = tds.iter().map(|t| t.type_identifier.as_str()).collect();
            dollar_list(&ids)
        };
        let strings = |tds: &[TypeDescription]| {
            tds.iter().map(|t| t.type_string.as_str()).collect::<Vec<_>>().join(",")
        };

        let mut type_string = format!("function ({})", strings(parameters));
        if mutability != StateMutability::NonPayable {
            type_string.push(' ');
            type_string.push_str(mutability.as_str());
        }
        if !returns.is_empty() {
            type_string.push_str(&format!(" returns ({})", strings(returns)));
        }
        Self::new(
            format!(
                "t_function_{class}_{}{}returns{}",
                mutability.as_str(),
                ids(parameters),
                ids(returns)
            ),
            type_string,
        )
    }

    pub fn is_rational(&self) -> bool {
        self.type_identifier.starts_with("rational_")
    }

    /// Literal types (numbers and strings) that adopt the type of the
    /// other operand in mixed expressions.
    pub fn is_literal(&self) -> bool {
        self.is_rational() || self.type_identifier.starts_with("t_string_literal")
            || self.type_identifier.starts_with("t_string_hex_literal")
    }

    pub fn is_address(&self) -> bool {
        self.type_identifier == "t_address" || self.type_identifier == "t_address_payable"
    }

    /// `bytes` and `bytesN` values index to a single byte.
    pub fn is_byte_array(&self) -> bool {
        self.type_identifier.starts_with("t_bytes")
    }
}

/// `$_a_$_b_$`, or `$__$` when empty.
fn dollar_list(ids: &[&str]) -> String {
    format!("$_{}_$", ids.join("_$_"))
}

/// Function and address state mutability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum StateMutability {
    Pure,
    View,
    Payable,
    #[default]
    NonPayable,
}

impl StateMutability {
    pub fn as_str(self) -> &'static str {
        match self {
            StateMutability::Pure => "pure",
            StateMutability::View => "view",
            StateMutability::Payable => "payable",
            StateMutability::NonPayable => "nonpayable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeId;

    #[test]
    fn equality_ignores_display_string() {
        let a = TypeDescription::new("t_uint256", "uint256");
        let b = TypeDescription::new("t_uint256", "uint");
        assert_eq!(a, b);
        assert_ne!(a, TypeDescription::new("t_uint8", "uint256"));
    }

    #[test]
    fn mapping_identifier_composition() {
        let key = TypeDescription::elementary("address");
        let value = TypeDescription::elementary("uint256");
        let td = TypeDescription::mapping("address", &key, "uint256", &value);
        assert_eq!(td.type_identifier, "mapping_$t_address_$t_uint256$");
        assert_eq!(td.type_string, "mapping(address => uint256)");
    }

    #[test]
    fn number_literals() {
        let r = Rational::parse("12.5");
        let td = TypeDescription::rational(&r, "12.5");
        assert_eq!(td.type_identifier, "rational_125_by_10");
        assert_eq!(td.type_string, "fixed_const 12.5");

        let r = Rational::parse("42");
        let td = TypeDescription::rational(&r, "42");
        assert_eq!(td.type_identifier, "rational_42_by_1");
        assert_eq!(td.type_string, "int_const 42");
    }

    #[test]
    fn arrays() {
        let base = TypeDescription::elementary("uint");
        assert_eq!(TypeDescription::array(&base, None).type_identifier, "t_array$_t_uint256_$dyn");
        let fixed = TypeDescription::array(&base, Some("4"));
        assert_eq!(fixed.type_identifier, "t_array$_t_uint256_$4");
        assert_eq!(fixed.type_string, "uint256[4]");
    }

    #[test]
    fn tuples() {
        assert_eq!(TypeDescription::empty_tuple().type_identifier, "t_tuple$__$");
        assert_eq!(TypeDescription::empty_tuple().type_string, "tuple()");
        let td = TypeDescription::tuple(&[
            Some(TypeDescription::boolean()),
            Some(TypeDescription::elementary("address")),
        ]);
        assert_eq!(td.type_identifier, "t_tuple$_t_bool_$_t_address_$");
        assert_eq!(td.type_string, "tuple(bool,address)");
    }

    #[test]
    fn functions() {
        let td = TypeDescription::function(
            "external",
            StateMutability::View,
            &[TypeDescription::elementary("address")],
            &[TypeDescription::elementary("uint256")],
        );
        assert_eq!(td.type_identifier, "t_function_external_view$_t_address_$returns$_t_uint256_$");
        assert_eq!(td.type_string, "function (address) view returns (uint256)");

        let td = TypeDescription::function("internal", StateMutability::NonPayable, &[], &[]);
        assert_eq!(td.type_identifier, "t_function_internal_nonpayable$__$returns$__$");
        assert_eq!(td.type_string, "function ()");
    }

    #[test]
    fn declared_types_embed_the_declaration_id() {
        let td = TypeDescription::contract("contract", "Token", NodeId(3));
        assert_eq!(td.type_identifier, "t_contract$_Token_$3");
        assert_eq!(td.type_string, "contract Token");
        assert_eq!(TypeDescription::structure("S", NodeId(9)).type_identifier, "t_struct$_S_$9");
        assert_eq!(TypeDescription::enumeration("E", NodeId(2)).type_string, "enum E");
    }
}
