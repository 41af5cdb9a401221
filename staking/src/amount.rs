//! Exact conversion between human decimal amounts and integer base units.
//!
//! Amounts are carried as a 256-bit integer count of base units together with
//! the token's decimals, so parsing and formatting never go through floating
//! point.

use crate::error::{Result, StakingError};
use crate::FEE_DENOMINATOR;
use serde::{Serialize, Serializer};
use std::fmt;

mod u256 {
    uint::construct_uint! {
        pub struct U256(4);
    }
}
pub use u256::U256;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount {
    raw: U256,
    decimals: u8,
}

impl TokenAmount {
    pub fn zero(decimals: u8) -> Self {
        Self {
            raw: U256::zero(),
            decimals,
        }
    }

    pub fn from_base_units(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Parses decimal text such as `"1.5"` or `"100"`.
    ///
    /// Fails with [`StakingError::PrecisionExceeded`] when the text carries
    /// more significant fractional digits than the token supports, instead of
    /// silently truncating.
    pub fn parse(text: &str, decimals: u8) -> Result<Self> {
        let text = text.trim();
        let (int_part, frac_part) = text.split_once('.').unwrap_or((text, ""));
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty())
            || !all_digits(int_part)
            || !all_digits(frac_part)
        {
            return Err(StakingError::InvalidAmount(text.to_string()));
        }

        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.len() > decimals as usize {
            return Err(StakingError::PrecisionExceeded { decimals });
        }

        let int_part = if int_part.is_empty() { "0" } else { int_part };
        let digits = format!(
            "{}{}{}",
            int_part,
            frac_part,
            "0".repeat(decimals as usize - frac_part.len())
        );
        let raw = U256::from_dec_str(&digits).map_err(|_| StakingError::Overflow)?;
        Ok(Self { raw, decimals })
    }

    pub fn base_units(&self) -> U256 {
        self.raw
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// `None` on overflow or when the two amounts use different decimals.
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        if self.decimals != other.decimals {
            return None;
        }
        Some(Self {
            raw: self.raw.checked_add(other.raw)?,
            decimals: self.decimals,
        })
    }

    /// Fails with [`StakingError::DecimalsMismatch`] unless the amount was
    /// built for `decimals`.
    pub fn base_units_for(&self, decimals: u8) -> Result<U256> {
        if self.decimals != decimals {
            return Err(StakingError::DecimalsMismatch {
                expected: decimals,
                found: self.decimals,
            });
        }
        Ok(self.raw)
    }

    /// `self / total * 100`, rounded half up to two decimals. Zero when `total` is zero.
    pub fn percent_of(&self, total: &Self) -> String {
        if total.is_zero() {
            return "0.00".to_string();
        }
        let hundredths = self
            .raw
            .checked_mul(U256::from(10_000u64))
            .and_then(|scaled| scaled.checked_add(total.raw / 2))
            .map(|scaled| scaled / total.raw)
            .unwrap_or_else(U256::zero);
        let (whole, frac) = hundredths.div_mod(U256::from(100u64));
        format!("{}.{:02}", whole, frac.low_u64())
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.raw.to_string();
        let decimals = self.decimals as usize;
        if decimals == 0 {
            return f.write_str(&digits);
        }
        let padded = format!("{:0>width$}", digits, width = decimals + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.is_empty() {
            f.write_str(int_part)
        } else {
            write!(f, "{}.{}", int_part, frac_part)
        }
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Deposit fee as reported by the contract, in thousandths.
///
/// Only used to show the user what the contract will take; the contract
/// enforces the real fee.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Fee {
    raw: u64,
}

impl Fee {
    pub fn from_raw(raw: u64) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> u64 {
        self.raw
    }

    pub fn fraction(&self) -> f64 {
        self.raw as f64 / FEE_DENOMINATOR as f64
    }

    /// `amount * fee`, rounded down to the token's precision.
    pub fn apply(&self, amount: &TokenAmount) -> Result<TokenAmount> {
        let raw = amount
            .raw
            .checked_mul(U256::from(self.raw))
            .ok_or(StakingError::Overflow)?
            / U256::from(FEE_DENOMINATOR);
        Ok(TokenAmount::from_base_units(raw, amount.decimals))
    }
}

impl fmt::Display for Fee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tenths = self.raw % 10;
        if tenths == 0 {
            write!(f, "{}%", self.raw / 10)
        } else {
            write!(f, "{}.{}%", self.raw / 10, tenths)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn one_and_a_half_tokens() {
        let amount = TokenAmount::parse("1.5", 18).unwrap();
        assert_eq!(
            amount.base_units(),
            U256::from_dec_str("1500000000000000000").unwrap()
        );
        assert_eq!(amount.to_string(), "1.5");
    }

    #[test]
    fn formats_small_and_whole_values() {
        assert_eq!(TokenAmount::from_base_units(U256::from(1u64), 18).to_string(), "0.000000000000000001");
        assert_eq!(TokenAmount::parse("100", 18).unwrap().to_string(), "100");
        assert_eq!(TokenAmount::parse(".25", 18).unwrap().to_string(), "0.25");
        assert_eq!(TokenAmount::parse("7.", 18).unwrap().to_string(), "7");
        assert_eq!(TokenAmount::zero(18).to_string(), "0");
        assert_eq!(TokenAmount::parse("42", 0).unwrap().to_string(), "42");
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(TokenAmount::parse("", 18), Err(StakingError::InvalidAmount(_))));
        assert!(matches!(TokenAmount::parse("-1", 18), Err(StakingError::InvalidAmount(_))));
        assert!(matches!(TokenAmount::parse("1e18", 18), Err(StakingError::InvalidAmount(_))));
        assert!(matches!(TokenAmount::parse("1.2.3", 18), Err(StakingError::InvalidAmount(_))));
        assert_eq!(
            TokenAmount::parse("0.1234567", 6),
            Err(StakingError::PrecisionExceeded { decimals: 6 })
        );
        // trailing zeros beyond the precision carry no value
        assert!(TokenAmount::parse("0.1234560000", 6).is_ok());
    }

    #[test]
    fn unlimited_approval_fits() {
        let unlimited = U256::from_dec_str(crate::UNLIMITED_APPROVAL).unwrap();
        assert!(unlimited > U256::from(u128::MAX));
    }

    #[test]
    fn fee_on_one_hundred() {
        let fee = Fee::from_raw(20);
        assert_eq!(fee.fraction(), 0.02);
        let amount = TokenAmount::parse("100", 18).unwrap();
        assert_eq!(fee.apply(&amount).unwrap().to_string(), "2");
        assert_eq!(fee.to_string(), "2%");
        assert_eq!(Fee::from_raw(25).to_string(), "2.5%");
    }

    #[test]
    fn share_percent() {
        let deposited = TokenAmount::parse("300", 18).unwrap();
        let mine = TokenAmount::parse("100", 18).unwrap();
        assert_eq!(mine.percent_of(&deposited), "33.33");
        assert_eq!(mine.percent_of(&TokenAmount::zero(18)), "0.00");
        let two = TokenAmount::parse("2", 18).unwrap();
        let three = TokenAmount::parse("3", 18).unwrap();
        assert_eq!(two.percent_of(&three), "66.67");
        let half_hundredth = TokenAmount::from_base_units(U256::from(5u64), 0);
        let whole = TokenAmount::from_base_units(U256::from(10_000u64), 0);
        assert_eq!(half_hundredth.percent_of(&whole), "0.05");
        assert_eq!(
            TokenAmount::from_base_units(U256::from(1u64), 0)
                .percent_of(&TokenAmount::from_base_units(U256::from(20_000u64), 0)),
            "0.01"
        );
    }

    #[test]
    fn mixed_decimals_are_refused() {
        let six = TokenAmount::parse("1.5", 6).unwrap();
        let eighteen = TokenAmount::parse("1.5", 18).unwrap();
        assert_eq!(six.checked_add(&eighteen), None);
        assert_eq!(
            six.base_units_for(18),
            Err(StakingError::DecimalsMismatch { expected: 18, found: 6 })
        );
        assert_eq!(
            eighteen.checked_add(&eighteen).map(|sum| sum.to_string()),
            Some("3".to_string())
        );
        assert_eq!(eighteen.base_units_for(18), Ok(eighteen.base_units()));
    }

    proptest! {
        #[test]
        fn base_units_round_trip(raw in any::<u128>(), decimals in 0u8..=36) {
            let amount = TokenAmount::from_base_units(U256::from(raw), decimals);
            let parsed = TokenAmount::parse(&amount.to_string(), decimals).unwrap();
            prop_assert_eq!(parsed, amount);
        }

        #[test]
        fn fee_never_exceeds_amount(raw in any::<u64>(), fee in 0u64..=1_000) {
            let amount = TokenAmount::from_base_units(U256::from(raw), 18);
            let charged = Fee::from_raw(fee).apply(&amount).unwrap();
            prop_assert!(charged <= amount);
        }
    }
}
