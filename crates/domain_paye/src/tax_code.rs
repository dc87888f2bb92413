//! Tax code parsing
//!
//! Turns an HMRC tax code such as `1257L`, `S1257L`, `K500`, `BR` or
//! `1257L W1` into a [`TaxCodeDescriptor`]. Parsing never fails: empty or
//! unrecognised input degrades to the standard UK code. Use
//! [`validate_tax_code`] when the caller needs to reject malformed codes.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::format_gbp;

use crate::error::PayeError;

/// Personal allowance applied when a code carries no digits
pub const DEFAULT_PERSONAL_ALLOWANCE: Decimal = dec!(12570);

/// Amount moved between partners by the marriage allowance
pub const MARRIAGE_ALLOWANCE_TRANSFER: Decimal = dec!(1260);

/// Suffix letters permitted after the numeric part of a standard code
const SUFFIX_LETTERS: &[char] = &['L', 'M', 'N', 'T', 'W', 'Y'];

/// Codes with a fixed treatment
const SPECIAL_CODES: &[&str] = &["BR", "D0", "D1", "NT", "0T"];

const NON_CUMULATIVE_NOTE: &str =
    "Non-cumulative calculation (each pay period calculated independently).";

/// Tax region selecting which band schedule applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// England and Northern Ireland
    #[default]
    Uk,
    /// Scottish rates (`S` prefix)
    Scotland,
    /// Welsh rates (`C` prefix)
    Wales,
}

/// Special tax code treatments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialRate {
    /// All income at the basic rate
    #[serde(rename = "BR")]
    BR,
    /// All income at the higher rate
    #[serde(rename = "D0")]
    D0,
    /// All income at the additional rate
    #[serde(rename = "D1")]
    D1,
    /// No tax deducted
    #[serde(rename = "NT")]
    NT,
    /// No personal allowance, normal bands
    #[serde(rename = "0T")]
    ZeroT,
}

impl SpecialRate {
    /// Returns true if every pound is taxed at a single flat rate
    pub fn is_flat(&self) -> bool {
        !matches!(self, SpecialRate::ZeroT)
    }

    /// The code as written
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialRate::BR => "BR",
            SpecialRate::D0 => "D0",
            SpecialRate::D1 => "D1",
            SpecialRate::NT => "NT",
            SpecialRate::ZeroT => "0T",
        }
    }
}

/// Tax-free allowance granted by a code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum Allowance {
    /// A fixed annual amount; negative for K codes
    Amount(Decimal),
    /// No tax is due on any income (NT)
    Unlimited,
}

impl Allowance {
    /// Returns the amount, or `None` when unlimited
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            Allowance::Amount(value) => Some(*value),
            Allowance::Unlimited => None,
        }
    }
}

impl Default for Allowance {
    fn default() -> Self {
        Allowance::Amount(DEFAULT_PERSONAL_ALLOWANCE)
    }
}

/// Everything a tax code says about how to tax its holder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCodeDescriptor {
    /// Normalised code (uppercased and trimmed)
    pub code: String,
    /// Annual allowance before any high-income taper
    pub base_allowance: Allowance,
    /// Region whose rates apply
    pub region: Region,
    /// Special treatment, if any
    pub special_rate: Option<SpecialRate>,
    /// K code: allowance is negative and added to taxable income
    pub is_negative_allowance: bool,
    /// Trailing `M` or `N` marriage allowance letter present
    pub has_marriage_allowance_adjustment: bool,
    /// +1260 for a recipient (`M`), -1260 for a transferor (`N`), else zero
    pub marriage_allowance_delta: Decimal,
    /// Week 1 / Month 1 (`W1`, `M1` or `X`) basis
    pub is_non_cumulative: bool,
}

impl Default for TaxCodeDescriptor {
    fn default() -> Self {
        Self {
            code: String::new(),
            base_allowance: Allowance::default(),
            region: Region::Uk,
            special_rate: None,
            is_negative_allowance: false,
            has_marriage_allowance_adjustment: false,
            marriage_allowance_delta: Decimal::ZERO,
            is_non_cumulative: false,
        }
    }
}

impl TaxCodeDescriptor {
    /// Returns the flat special rate, if the code taxes all income at one rate
    pub fn flat_special_rate(&self) -> Option<SpecialRate> {
        self.special_rate.filter(SpecialRate::is_flat)
    }

    /// Human readable summary of the code
    pub fn describe(&self) -> String {
        if self.code.is_empty() {
            return String::new();
        }

        let mut parts: Vec<String> = Vec::new();
        match self.region {
            Region::Scotland => parts.push("Scottish rates apply.".to_string()),
            Region::Wales => parts.push("Welsh rates apply.".to_string()),
            Region::Uk => {}
        }

        match (self.special_rate, self.base_allowance) {
            (Some(SpecialRate::BR), _) => {
                parts.push("All income taxed at the basic rate.".to_string())
            }
            (Some(SpecialRate::D0), _) => {
                parts.push("All income taxed at the higher rate.".to_string())
            }
            (Some(SpecialRate::D1), _) => {
                parts.push("All income taxed at the additional rate.".to_string())
            }
            (Some(SpecialRate::NT), _) => parts.push("No tax will be deducted.".to_string()),
            (Some(SpecialRate::ZeroT), _) => parts.push("No personal allowance.".to_string()),
            (None, Allowance::Amount(amount)) if self.is_negative_allowance => parts.push(format!(
                "K code: {} will be added to your taxable income.",
                format_gbp(amount.abs())
            )),
            (None, Allowance::Amount(amount)) => {
                parts.push(format!("Personal allowance of {}.", format_gbp(amount)))
            }
            (None, Allowance::Unlimited) => {}
        }

        if self.has_marriage_allowance_adjustment {
            if self.marriage_allowance_delta > Decimal::ZERO {
                parts.push("Received marriage allowance from partner.".to_string());
            } else {
                parts.push("Transferred marriage allowance to partner.".to_string());
            }
        }

        if self.is_non_cumulative {
            parts.push(NON_CUMULATIVE_NOTE.to_string());
        }

        parts.join(" ")
    }
}

/// Parser carrying the year-specific defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxCodeParser {
    default_allowance: Decimal,
    marriage_allowance: Decimal,
}

impl Default for TaxCodeParser {
    fn default() -> Self {
        Self::new(DEFAULT_PERSONAL_ALLOWANCE, MARRIAGE_ALLOWANCE_TRANSFER)
    }
}

impl TaxCodeParser {
    /// Creates a parser with the given default allowance and marriage allowance transfer
    pub fn new(default_allowance: Decimal, marriage_allowance: Decimal) -> Self {
        Self {
            default_allowance,
            marriage_allowance,
        }
    }

    /// Parses a tax code
    ///
    /// # Arguments
    ///
    /// * `code` - The tax code in any case, optionally with a `W1`, `M1` or
    ///   `X` suffix separated by a space or slash
    pub fn parse(&self, code: &str) -> TaxCodeDescriptor {
        let normalized = code.trim().to_uppercase();
        if normalized.is_empty() {
            return TaxCodeDescriptor {
                base_allowance: Allowance::Amount(self.default_allowance),
                ..TaxCodeDescriptor::default()
            };
        }

        let compact: String = normalized
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/')
            .collect();

        let region = region_of(&compact);
        let is_negative_allowance =
            compact.starts_with('K') || compact.starts_with("SK") || compact.starts_with("CK");

        let (body, suffix_stripped) = strip_non_cumulative_suffix(&compact);
        let is_non_cumulative = suffix_stripped
            || compact.contains("W1")
            || compact.contains("M1")
            || compact.contains('X');

        let rest = match region {
            Region::Scotland | Region::Wales => &body[1..],
            Region::Uk => body,
        };

        let (special_rate, base_allowance) = match rest {
            "BR" => (Some(SpecialRate::BR), Allowance::Amount(Decimal::ZERO)),
            "D0" => (Some(SpecialRate::D0), Allowance::Amount(Decimal::ZERO)),
            "D1" => (Some(SpecialRate::D1), Allowance::Amount(Decimal::ZERO)),
            _ if compact.contains("NT") => (Some(SpecialRate::NT), Allowance::Unlimited),
            _ if rest.starts_with("0T") => {
                (Some(SpecialRate::ZeroT), Allowance::Amount(Decimal::ZERO))
            }
            _ => (None, Allowance::Amount(self.numeric_allowance(body, is_negative_allowance))),
        };

        let marriage_allowance_delta = if special_rate.is_some() {
            Decimal::ZERO
        } else if body.ends_with('M') {
            self.marriage_allowance
        } else if body.ends_with('N') {
            -self.marriage_allowance
        } else {
            Decimal::ZERO
        };

        TaxCodeDescriptor {
            code: normalized,
            base_allowance,
            region,
            special_rate,
            is_negative_allowance,
            has_marriage_allowance_adjustment: !marriage_allowance_delta.is_zero(),
            marriage_allowance_delta,
            is_non_cumulative,
        }
    }

    /// Reads the first run of digits as tens of pounds
    fn numeric_allowance(&self, body: &str, negative: bool) -> Decimal {
        let digits: String = body
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();

        match digits.parse::<u32>() {
            Ok(value) => {
                let amount = Decimal::from(value) * dec!(10);
                if negative {
                    -amount
                } else {
                    amount
                }
            }
            Err(_) => self.default_allowance,
        }
    }
}

/// Parses a tax code using the standard UK defaults
pub fn parse(code: &str) -> TaxCodeDescriptor {
    TaxCodeParser::default().parse(code)
}

/// Checks a tax code against the HMRC code grammar
///
/// Accepted forms, each with an optional `S` or `C` region prefix:
/// - `BR`, `D0`, `D1`, `NT`, `0T`
/// - `K` followed by 1 to 4 digits and an optional suffix letter
/// - 1 to 4 digits followed by one of `L M N T W Y`
///
/// Any form may end with `W1`, `M1` or `X`, optionally separated by a space
/// or slash.
pub fn validate_tax_code(code: &str) -> Result<(), PayeError> {
    let normalized = code.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(PayeError::validation("Tax code is required"));
    }

    let compact: String = normalized
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '/')
        .collect();
    let (body, _) = strip_non_cumulative_suffix(&compact);
    let body = body
        .strip_prefix('S')
        .or_else(|| body.strip_prefix('C'))
        .unwrap_or(body);

    if SPECIAL_CODES.contains(&body) {
        return Ok(());
    }

    let (numeric, suffix_required) = match body.strip_prefix('K') {
        Some(rest) => (rest, false),
        None => (body, true),
    };

    let digit_count = numeric.chars().take_while(char::is_ascii_digit).count();
    let suffix = &numeric[digit_count..];
    let digits_ok = (1..=4).contains(&digit_count);
    let suffix_ok = match suffix.chars().collect::<Vec<_>>().as_slice() {
        [] => !suffix_required,
        [letter] => SUFFIX_LETTERS.contains(letter),
        _ => false,
    };

    if digits_ok && suffix_ok {
        Ok(())
    } else {
        Err(PayeError::invalid_tax_code(code.trim()))
    }
}

fn region_of(code: &str) -> Region {
    if code.starts_with('S') && !code.starts_with("SK") {
        Region::Scotland
    } else if code.starts_with('C') && !code.starts_with("CK") {
        Region::Wales
    } else {
        Region::Uk
    }
}

/// Removes a trailing `W1`, `M1` or `X` marker
fn strip_non_cumulative_suffix(code: &str) -> (&str, bool) {
    if let Some(body) = code.strip_suffix("W1").or_else(|| code.strip_suffix("M1")) {
        (body, true)
    } else if let Some(body) = code.strip_suffix('X') {
        (body, true)
    } else {
        (code, false)
    }
}
