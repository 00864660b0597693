//! VAT (IVA) breakdown calculation.
//!
//! Italian invoices relate three monetary fields: imponibile (taxable base),
//! iva (tax amount) and importo totale (total). Exactly one pair is
//! user-entered and the rest derived:
//! - cost entries are total-driven: the user enters the total and the rate;
//! - revenue entries are base-driven: the user enters the base and the rate.
//!
//! All derived values are rounded to 2 decimal places, midpoint away from
//! zero.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::numeric::parse_flexible_number;

/// VAT rates admitted by the Italian regime handled here.
///
/// Rate 0 is a valid, explicit selection (exempt operations), never an
/// "unset" marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VatRate {
    /// 0% - exempt operations.
    Zero,
    /// 4% - super-reduced rate.
    Reduced4,
    /// 10% - reduced rate.
    Reduced10,
    /// 22% - standard rate.
    Standard22,
}

impl VatRate {
    /// All admitted rates, ascending.
    pub const ALL: [Self; 4] = [Self::Zero, Self::Reduced4, Self::Reduced10, Self::Standard22];

    /// Returns the rate as an integer percentage.
    #[must_use]
    pub const fn percent(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::Reduced4 => 4,
            Self::Reduced10 => 10,
            Self::Standard22 => 22,
        }
    }

    /// Returns the rate as a decimal fraction (e.g. 0.22).
    #[must_use]
    pub fn fraction(self) -> Decimal {
        Decimal::new(i64::from(self.percent()), 2)
    }

    /// Parses a rate from an integer percentage.
    #[must_use]
    pub const fn from_percent(percent: u8) -> Option<Self> {
        match percent {
            0 => Some(Self::Zero),
            4 => Some(Self::Reduced4),
            10 => Some(Self::Reduced10),
            22 => Some(Self::Standard22),
            _ => None,
        }
    }

    /// Parses a rate from raw user input ("22", "22,0", " 4 ").
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let value = parse_flexible_number(input)?;
        Self::ALL
            .into_iter()
            .find(|rate| value == Decimal::from(rate.percent()))
    }
}

impl TryFrom<u8> for VatRate {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_percent(value).ok_or_else(|| format!("invalid VAT rate: {value}"))
    }
}

impl From<VatRate> for u8 {
    fn from(rate: VatRate) -> Self {
        rate.percent()
    }
}

impl std::fmt::Display for VatRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// The three linked monetary fields of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VatBreakdown {
    /// Taxable base (imponibile).
    pub imponibile: Decimal,
    /// Tax amount (iva).
    pub iva: Decimal,
    /// Total amount (importo totale).
    pub importo_totale: Decimal,
}

/// Rounds to 2 decimal places, midpoint away from zero.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Total-driven breakdown (cost entries): derives imponibile and iva from the
/// entered total.
#[must_use]
pub fn breakdown_from_total(importo_totale: Decimal, rate: VatRate) -> VatBreakdown {
    let importo_totale = round2(importo_totale);

    if rate == VatRate::Zero {
        return VatBreakdown {
            imponibile: importo_totale,
            iva: Decimal::ZERO,
            importo_totale,
        };
    }

    let divisor = Decimal::ONE + rate.fraction();
    let imponibile = round2(importo_totale / divisor);
    let iva = round2(importo_totale - imponibile);

    VatBreakdown {
        imponibile,
        iva,
        importo_totale,
    }
}

/// Base-driven breakdown (revenue entries): derives iva and the total from
/// the entered taxable base.
#[must_use]
pub fn breakdown_from_taxable(imponibile: Decimal, rate: VatRate) -> VatBreakdown {
    let imponibile = round2(imponibile);
    let iva = round2(imponibile * rate.fraction());

    VatBreakdown {
        imponibile,
        iva,
        importo_totale: imponibile + iva,
    }
}

/// Total-driven breakdown over possibly-missing inputs.
///
/// `None` means "not yet computable" - the caller must clear derived fields,
/// never substitute zero.
#[must_use]
pub fn compute_from_total(
    importo_totale: Option<Decimal>,
    rate: Option<VatRate>,
) -> Option<VatBreakdown> {
    Some(breakdown_from_total(importo_totale?, rate?))
}

/// Base-driven breakdown over possibly-missing inputs.
#[must_use]
pub fn compute_from_taxable(
    imponibile: Option<Decimal>,
    rate: Option<VatRate>,
) -> Option<VatBreakdown> {
    Some(breakdown_from_taxable(imponibile?, rate?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_driven_standard_rate() {
        let b = breakdown_from_total(dec!(122.00), VatRate::Standard22);
        assert_eq!(b.imponibile, dec!(100.00));
        assert_eq!(b.iva, dec!(22.00));
        assert_eq!(b.importo_totale, dec!(122.00));
    }

    #[test]
    fn test_total_driven_zero_rate() {
        let b = breakdown_from_total(dec!(85.30), VatRate::Zero);
        assert_eq!(b.imponibile, dec!(85.30));
        assert_eq!(b.iva, dec!(0));
        assert_eq!(b.importo_totale, dec!(85.30));
    }

    #[test]
    fn test_base_driven_standard_rate() {
        let b = breakdown_from_taxable(dec!(100.00), VatRate::Standard22);
        assert_eq!(b.iva, dec!(22.00));
        assert_eq!(b.importo_totale, dec!(122.00));
    }

    #[test]
    fn test_base_driven_zero_rate_still_computes() {
        let b = breakdown_from_taxable(dec!(50.00), VatRate::Zero);
        assert_eq!(b.iva, dec!(0.00));
        assert_eq!(b.importo_totale, dec!(50.00));
    }

    #[test]
    fn test_missing_inputs_not_computable() {
        assert_eq!(compute_from_total(None, Some(VatRate::Standard22)), None);
        assert_eq!(compute_from_total(Some(dec!(100)), None), None);
        assert_eq!(compute_from_taxable(None, None), None);
    }

    #[test]
    fn test_rounding_awkward_total() {
        // 100 / 1.22 = 81.9672..., rounds to 81.97; iva restores the total.
        let b = breakdown_from_total(dec!(100.00), VatRate::Standard22);
        assert_eq!(b.imponibile, dec!(81.97));
        assert_eq!(b.iva, dec!(18.03));
        assert_eq!(b.imponibile + b.iva, b.importo_totale);
    }

    #[rstest]
    #[case("0", Some(VatRate::Zero))]
    #[case("4", Some(VatRate::Reduced4))]
    #[case("10", Some(VatRate::Reduced10))]
    #[case("22", Some(VatRate::Standard22))]
    #[case("22,0", Some(VatRate::Standard22))]
    #[case("21", None)]
    #[case("", None)]
    fn test_rate_parse(#[case] input: &str, #[case] expected: Option<VatRate>) {
        assert_eq!(VatRate::parse(input), expected);
    }

    #[test]
    fn test_rate_serde_as_integer() {
        let json = serde_json::to_string(&VatRate::Standard22).unwrap();
        assert_eq!(json, "22");
        let back: VatRate = serde_json::from_str("10").unwrap();
        assert_eq!(back, VatRate::Reduced10);
        assert!(serde_json::from_str::<VatRate>("21").is_err());
    }
}
