// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Literal values and their encodings.

/// Exact rational value of a number literal.
///
/// Numerator and denominator are decimal digit strings so arbitrarily
/// large literals stay exact. The fraction is never reduced: `12.5` is
/// `125/10`, not `25/2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rational {
    pub numerator: String,
    pub denominator: String,
    /// The lexeme had a decimal point.
    pub fixed: bool,
    /// The lexeme could not be read as a number; the value is `0/1`.
    pub malformed: bool,
}

impl Rational {
    /// Read a number lexeme: decimal (`42`, `12.5`, `.5`), scientific
    /// (`2e18`, `1.5e-3`) or hex (`0xff`). Underscores are ignored.
    pub fn parse(lexeme: &str) -> Rational {
        let clean: String = lexeme.trim().chars().filter(|&c| c != '_').collect();
        let fixed = clean.contains('.');
        match read(&clean) {
            Some((numerator, zeros)) => Rational {
                numerator,
                denominator: power_of_ten(zeros),
                fixed,
                malformed: false,
            },
            None => Rational {
                numerator: "0".into(),
                denominator: "1".into(),
                fixed,
                malformed: true,
            },
        }
    }

    /// Scale by a sub-denomination (`ether`, `days`, ...). Unknown units
    /// leave the value unchanged.
    pub fn scaled(mut self, unit: &str) -> Rational {
        let factor: u64 = match unit {
            "wei" | "seconds" => 1,
            "gwei" => 1_000_000_000,
            "ether" => 1_000_000_000_000_000_000,
            "minutes" => 60,
            "hours" => 3_600,
            "days" => 86_400,
            "weeks" => 604_800,
            "years" => 31_536_000,
            _ => 1,
        };
        if !self.malformed && factor != 1 {
            self.numerator = mul_small(&self.numerator, factor);
        }
        self
    }
}

/// Largest exponent magnitude read from scientific notation. Beyond it
/// the literal is treated as malformed.
const MAX_EXPONENT: i64 = 4096;

/// Returns the numerator digits and the number of decimal places.
fn read(clean: &str) -> Option<(String, usize)> {
    if let Some(hex) = clean.strip_prefix("0x").or_else(|| clean.strip_prefix("0X")) {
        return hex_to_decimal(hex).map(|n| (n, 0));
    }

    let (mantissa, exponent) = match clean.find(['e', 'E']) {
        Some(i) => (&clean[..i], clean[i + 1..].parse::<i64>().ok()?),
        None => (clean, 0),
    };
    if !(-MAX_EXPONENT..=MAX_EXPONENT).contains(&exponent) {
        return None;
    }
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut digits = format!("{int_part}{frac_part}");
    let places = i64::try_from(frac_part.len()).ok()?.checked_sub(exponent)?;
    let places = if places < 0 {
        digits.extend(std::iter::repeat('0').take(usize::try_from(-places).ok()?));
        0
    } else {
        usize::try_from(places).ok()?
    };
    Some((strip_leading_zeros(&digits), places))
}

fn power_of_ten(zeros: usize) -> String {
    format!("1{}", "0".repeat(zeros))
}

fn strip_leading_zeros(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn hex_to_decimal(hex: &str) -> Option<String> {
    if hex.is_empty() {
        return None;
    }
    let mut decimal = "0".to_string();
    for c in hex.chars() {
        let d = c.to_digit(16)?;
        decimal = add_small(&mul_small(&decimal, 16), d as u64);
    }
    Some(decimal)
}

fn mul_small(decimal: &str, factor: u64) -> String {
    let mut carry = 0u128;
    let mut out = Vec::with_capacity(decimal.len() + 20);
    for b in decimal.bytes().rev() {
        let v = (b - b'0') as u128 * factor as u128 + carry;
        out.push(b'0' + (v % 10) as u8);
        carry = v / 10;
    }
    while carry > 0 {
        out.push(b'0' + (carry % 10) as u8);
        carry /= 10;
    }
    out.reverse();
    strip_leading_zeros(&String::from_utf8_lossy(&out))
}

fn add_small(decimal: &str, addend: u64) -> String {
    let mut carry = addend as u128;
    let mut out = Vec::with_capacity(decimal.len() + 1);
    for b in decimal.bytes().rev() {
        let v = (b - b'0') as u128 + carry;
        out.push(b'0' + (v % 10) as u8);
        carry = v / 10;
    }
    while carry > 0 {
        out.push(b'0' + (carry % 10) as u8);
        carry /= 10;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Literal text with its surrounding quotes removed.
///
/// Handles `"..."`, `'...'`, `hex"..."` and `unicode"..."`. Escape
/// sequences are kept verbatim.
pub fn unquote(lexeme: &str) -> String {
    let body = lexeme
        .trim()
        .strip_prefix("hex")
        .or_else(|| lexeme.trim().strip_prefix("unicode"))
        .unwrap_or(lexeme.trim());
    let body = body
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| body.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(body);
    body.to_string()
}

/// Lowercase hex encoding of the value's bytes.
pub fn hex_value(value: &str) -> String {
    hex::encode(value.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fraction(lexeme: &str) -> (String, String) {
        let r = Rational::parse(lexeme);
        (r.numerator, r.denominator)
    }

    #[test]
    fn integers_and_decimals() {
        assert_eq!(fraction("42"), ("42".into(), "1".into()));
        assert_eq!(fraction("12.5"), ("125".into(), "10".into()));
        assert_eq!(fraction("0.05"), ("5".into(), "100".into()));
        assert_eq!(fraction(".5"), ("5".into(), "10".into()));
        assert!(Rational::parse("12.5").fixed);
        assert!(!Rational::parse("42").fixed);
    }

    #[test]
    fn underscores_are_ignored() {
        assert_eq!(fraction("1_000_000"), ("1000000".into(), "1".into()));
    }

    #[test]
    fn scientific_notation_expands_exactly() {
        assert_eq!(fraction("2e3"), ("2000".into(), "1".into()));
        assert_eq!(fraction("1.5e1"), ("15".into(), "1".into()));
        assert_eq!(fraction("25e-2"), ("25".into(), "100".into()));
        assert_eq!(
            fraction("1e30"),
            ("1000000000000000000000000000000".into(), "1".into())
        );
    }

    #[test]
    fn hex_numbers_convert_to_decimal() {
        assert_eq!(fraction("0xff"), ("255".into(), "1".into()));
        assert_eq!(fraction("0x0"), ("0".into(), "1".into()));
        assert_eq!(
            fraction("0xffffffffffffffffffffffffffffffffffffffff"),
            ("1461501637330902918203684832716283019655932542975".into(), "1".into())
        );
    }

    #[test]
    fn malformed_lexemes_degrade_to_zero() {
        for bad in ["", "0x", "1.2.3", "12abc", "1e", "e5"] {
            let r = Rational::parse(bad);
            assert!(r.malformed, "{bad:?} should be malformed");
            assert_eq!((r.numerator.as_str(), r.denominator.as_str()), ("0", "1"));
        }
    }

    #[test]
    fn out_of_range_exponents_are_malformed() {
        for bad in ["1e-9223372036854775808", "1e9223372036854775807", "1e4000000000", "1e-4000000000", "1e4097"] {
            let r = Rational::parse(bad);
            assert!(r.malformed, "{bad:?} should be malformed");
            assert_eq!((r.numerator.as_str(), r.denominator.as_str()), ("0", "1"));
        }
        let edge = Rational::parse("1e-4096");
        assert!(!edge.malformed);
        assert_eq!(edge.denominator.len(), 4097);
        assert_eq!(Rational::parse("1e4096").numerator.len(), 4097);
    }

    #[test]
    fn sub_denominations_scale() {
        assert_eq!(Rational::parse("1").scaled("ether").numerator, "1000000000000000000");
        assert_eq!(Rational::parse("2").scaled("days").numerator, "172800");
        assert_eq!(Rational::parse("5").scaled("wei").numerator, "5");
    }

    #[test]
    fn unquoting() {
        assert_eq!(unquote("\"hello\""), "hello");
        assert_eq!(unquote("'hi'"), "hi");
        assert_eq!(unquote("hex\"414243\""), "414243");
        assert_eq!(unquote("unicode\"caf\""), "caf");
        assert_eq!(unquote("\" hi \""), " hi ");
        assert_eq!(hex_value(&unquote("\" hi \"")), "20686920");
    }

    #[test]
    fn hex_mirroring() {
        assert_eq!(hex_value("hello"), "68656c6c6f");
        assert_eq!(hex_value("true"), "74727565");
    }
}
