//! Pure derivation of booking figures.
//!
//! Inputs are pre-validated. Arithmetic is decimal-exact and checked; nothing
//! is rounded, and overflow is reported instead of panicking.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::FinanceError;
use super::types::{BookingFigures, FinancialInputs, PaymentType};

/// Stateless calculator for booking and invoice figures.
pub struct FinancialCalculator;

impl FinancialCalculator {
    /// Calendar-day difference between check-in and check-out.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use staydesk_core::finance::FinancialCalculator;
    ///
    /// let check_in = NaiveDate::from_ymd_opt(2026, 3, 30).unwrap();
    /// let check_out = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
    /// assert_eq!(FinancialCalculator::nights(check_in, check_out), 3);
    /// ```
    #[must_use]
    pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
        check_out.signed_duration_since(check_in).num_days()
    }

    /// Total amount less commission. Absent commission counts as zero.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceError::AmountOverflow`] if the difference leaves the
    /// decimal range.
    pub fn net_revenue(
        total_amount: Decimal,
        commission: Option<Decimal>,
    ) -> Result<Decimal, FinanceError> {
        total_amount
            .checked_sub(commission.unwrap_or(Decimal::ZERO))
            .ok_or(FinanceError::AmountOverflow {
                figure: "netRevenue",
            })
    }

    /// Amount still owed to the property.
    ///
    /// When a channel collects on the property's behalf the property only
    /// ever receives the net revenue, so the balance is measured against it.
    /// Otherwise the guest owes the full total.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceError::AmountOverflow`] if the balance leaves the
    /// decimal range.
    pub fn outstanding_balance(
        total_amount: Decimal,
        amount_paid: Decimal,
        net_revenue: Decimal,
        payment_type: PaymentType,
    ) -> Result<Decimal, FinanceError> {
        let owed = match payment_type {
            PaymentType::OtaCollect => net_revenue,
            PaymentType::HotelCollect => total_amount,
        };
        owed.checked_sub(amount_paid)
            .ok_or(FinanceError::AmountOverflow {
                figure: "outstandingBalance",
            })
    }

    /// Derives every computed booking field.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceError::AmountOverflow`] if any figure overflows.
    pub fn derive(inputs: &FinancialInputs) -> Result<BookingFigures, FinanceError> {
        let net_revenue = Self::net_revenue(inputs.total_amount, inputs.commission)?;
        Ok(BookingFigures {
            nights: Self::nights(inputs.check_in, inputs.check_out),
            net_revenue,
            outstanding_balance: Self::outstanding_balance(
                inputs.total_amount,
                inputs.amount_paid,
                net_revenue,
                inputs.payment_type,
            )?,
        })
    }

    /// Sums invoice member amounts.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceError::AmountOverflow`] if the sum leaves the decimal
    /// range.
    pub fn total<I>(amounts: I) -> Result<Decimal, FinanceError>
    where
        I: IntoIterator<Item = Decimal>,
    {
        amounts
            .into_iter()
            .try_fold(Decimal::ZERO, Decimal::checked_add)
            .ok_or(FinanceError::AmountOverflow {
                figure: "totalAmount",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_nights_single() {
        assert_eq!(
            FinancialCalculator::nights(date(2026, 1, 10), date(2026, 1, 11)),
            1
        );
    }

    #[test]
    fn test_nights_across_month_and_leap_day() {
        assert_eq!(
            FinancialCalculator::nights(date(2028, 2, 27), date(2028, 3, 2)),
            4
        );
    }

    #[test]
    fn test_net_revenue_default_commission() {
        assert_eq!(
            FinancialCalculator::net_revenue(dec!(300), None).unwrap(),
            dec!(300)
        );
        assert_eq!(
            FinancialCalculator::net_revenue(dec!(300), Some(dec!(30))).unwrap(),
            dec!(270)
        );
    }

    #[test]
    fn test_net_revenue_is_exact() {
        assert_eq!(
            FinancialCalculator::net_revenue(dec!(100.10), Some(dec!(0.20))).unwrap(),
            dec!(99.90)
        );
        assert_eq!(
            FinancialCalculator::net_revenue(dec!(0.3), Some(dec!(0.1))).unwrap(),
            dec!(0.2)
        );
    }

    #[rstest]
    #[case(PaymentType::OtaCollect, dec!(270))]
    #[case(PaymentType::HotelCollect, dec!(300))]
    fn test_outstanding_balance_follows_direction(
        #[case] payment_type: PaymentType,
        #[case] expected: Decimal,
    ) {
        let net = FinancialCalculator::net_revenue(dec!(300), Some(dec!(30))).unwrap();
        assert_eq!(
            FinancialCalculator::outstanding_balance(dec!(300), dec!(0), net, payment_type)
                .unwrap(),
            expected
        );
    }

    #[test]
    fn test_outstanding_balance_can_go_negative_on_overpayment() {
        assert_eq!(
            FinancialCalculator::outstanding_balance(
                dec!(100),
                dec!(120),
                dec!(100),
                PaymentType::HotelCollect
            )
            .unwrap(),
            dec!(-20)
        );
    }

    #[test]
    fn test_derive() {
        let figures = FinancialCalculator::derive(&FinancialInputs {
            check_in: date(2026, 7, 1),
            check_out: date(2026, 7, 4),
            total_amount: dec!(300),
            commission: Some(dec!(30)),
            amount_paid: dec!(50),
            payment_type: PaymentType::OtaCollect,
        })
        .unwrap();
        assert_eq!(figures.nights, 3);
        assert_eq!(figures.net_revenue, dec!(270));
        assert_eq!(figures.outstanding_balance, dec!(220));
    }

    #[test]
    fn test_derive_reports_overflow() {
        let err = FinancialCalculator::derive(&FinancialInputs {
            check_in: date(2026, 7, 1),
            check_out: date(2026, 7, 2),
            total_amount: dec!(0),
            commission: Some(Decimal::MAX),
            amount_paid: Decimal::MAX,
            payment_type: PaymentType::OtaCollect,
        })
        .unwrap_err();
        assert_eq!(
            err,
            FinanceError::AmountOverflow {
                figure: "outstandingBalance"
            }
        );
    }

    #[test]
    fn test_total() {
        assert_eq!(
            FinancialCalculator::total([dec!(100.50), dec!(200.25), dec!(0.25)]).unwrap(),
            dec!(301.00)
        );
        assert_eq!(
            FinancialCalculator::total(Vec::new()).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_total_reports_overflow() {
        assert_eq!(
            FinancialCalculator::total([Decimal::MAX, dec!(1)]),
            Err(FinanceError::AmountOverflow {
                figure: "totalAmount"
            })
        );
    }
}
