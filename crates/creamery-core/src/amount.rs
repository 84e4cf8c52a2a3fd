//! Arbitrary-precision decimal amounts.
//!
//! Every resource quantity and production rate in the engine is an
//! [`Amount`]. Arithmetic on amounts is exact: no binary floating point
//! appears anywhere in the economy, so repeated multiplication of bonus
//! scalars cannot drift, and magnitudes are not bounded by any fixed
//! exponent range. Serialization goes through the exact base-10 string
//! form (bigdecimal's serde impl), never through a native float.

use bigdecimal::BigDecimal;
use bigdecimal::num_bigint::BigInt;
use std::str::FromStr;

/// Exact decimal quantity. Used for every resource total, cost, rate,
/// and bonus multiplier.
pub type Amount = BigDecimal;

/// Epoch-millisecond wall-clock timestamps.
pub type Millis = i64;

/// Whole-second durations (offline elapsed time, caps).
pub type Seconds = u64;

/// A decimal string that failed to parse.
#[derive(Debug, thiserror::Error)]
#[error("invalid decimal literal: {0:?}")]
pub struct ParseAmountError(pub String);

/// The additive identity.
#[inline]
pub fn zero() -> Amount {
    BigDecimal::from(0u32)
}

/// The multiplicative identity. Absent bonus sources always contribute
/// this, never 0.
#[inline]
pub fn one() -> Amount {
    BigDecimal::from(1u32)
}

/// Parse an exact base-10 decimal string.
pub fn parse_amount(s: &str) -> Result<Amount, ParseAmountError> {
    BigDecimal::from_str(s).map_err(|_| ParseAmountError(s.to_string()))
}

/// `base ^ exp` by binary exponentiation. Exact.
pub fn pow(base: &Amount, mut exp: u64) -> Amount {
    let mut result = one();
    let mut square = base.clone();
    while exp > 0 {
        if exp & 1 == 1 {
            result = &result * &square;
        }
        square = &square * &square;
        exp >>= 1;
    }
    result
}

/// Floor of `a / b`, computed in integer arithmetic so the result is
/// exact at any magnitude. Decimal division would round the quotient to
/// a fixed number of significant digits before the floor could apply.
/// `b` must be non-zero.
pub fn floor_div(a: &Amount, b: &Amount) -> Amount {
    let (mut na, sa) = a.as_bigint_and_exponent();
    let (mut nb, sb) = b.as_bigint_and_exponent();
    // Bring both operands to one power-of-ten scale; the ratio is then a
    // plain integer quotient.
    if sa >= sb {
        nb *= BigInt::from(10u32).pow((sa - sb) as u32);
    } else {
        na *= BigInt::from(10u32).pow((sb - sa) as u32);
    }
    let quotient = &na / &nb;
    let remainder = &na % &nb;
    if remainder != BigInt::from(0) && remainder.sign() != nb.sign() {
        Amount::from(quotient - BigInt::from(1))
    } else {
        Amount::from(quotient)
    }
}
