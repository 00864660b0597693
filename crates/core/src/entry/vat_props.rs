//! Property-based tests for the VAT calculator.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::vat::{
    VatRate, breakdown_from_taxable, breakdown_from_total, round2,
};

/// Strategy for positive monetary amounts, 0.01 to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy over the four admitted rates.
fn vat_rate() -> impl Strategy<Value = VatRate> {
    prop_oneof![
        Just(VatRate::Zero),
        Just(VatRate::Reduced4),
        Just(VatRate::Reduced10),
        Just(VatRate::Standard22),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Total-driven identity: the recomposed base must restore the entered
    /// total within one cent of rounding slack.
    #[test]
    fn prop_total_driven_identity(total in positive_amount(), rate in vat_rate()) {
        let b = breakdown_from_total(total, rate);
        let recomposed = round2(b.imponibile * (Decimal::ONE + rate.fraction()));
        let diff = (recomposed - round2(total)).abs();
        prop_assert!(
            diff <= Decimal::new(1, 2),
            "total {total} rate {rate}: recomposed {recomposed}"
        );
    }

    /// The three fields always add up exactly: imponibile + iva == totale.
    #[test]
    fn prop_total_driven_parts_sum(total in positive_amount(), rate in vat_rate()) {
        let b = breakdown_from_total(total, rate);
        prop_assert_eq!(b.imponibile + b.iva, b.importo_totale);
    }

    /// Base-driven: iva is exactly the rounded rate share, total the sum.
    #[test]
    fn prop_base_driven_definition(base in positive_amount(), rate in vat_rate()) {
        let b = breakdown_from_taxable(base, rate);
        prop_assert_eq!(b.iva, round2(base * rate.fraction()));
        prop_assert_eq!(b.importo_totale, b.imponibile + b.iva);
    }

    /// Rate 0 always yields zero tax and base == total, in both directions.
    #[test]
    fn prop_zero_rate_collapses(amount in positive_amount()) {
        let total_driven = breakdown_from_total(amount, VatRate::Zero);
        prop_assert_eq!(total_driven.iva, Decimal::ZERO);
        prop_assert_eq!(total_driven.imponibile, total_driven.importo_totale);

        let base_driven = breakdown_from_taxable(amount, VatRate::Zero);
        prop_assert_eq!(base_driven.iva, Decimal::ZERO);
        prop_assert_eq!(base_driven.imponibile, base_driven.importo_totale);
    }

    /// Idempotence: feeding the derived total back into the total-driven
    /// calculator reproduces the same breakdown.
    #[test]
    fn prop_total_driven_idempotent(total in positive_amount(), rate in vat_rate()) {
        let first = breakdown_from_total(total, rate);
        let second = breakdown_from_total(first.importo_totale, rate);
        prop_assert_eq!(first, second);
    }

    /// Derived values always carry at most 2 decimal places.
    #[test]
    fn prop_two_decimal_places(total in positive_amount(), rate in vat_rate()) {
        let b = breakdown_from_total(total, rate);
        prop_assert_eq!(b.imponibile, round2(b.imponibile));
        prop_assert_eq!(b.iva, round2(b.iva));
        prop_assert_eq!(b.importo_totale, round2(b.importo_totale));
    }
}
