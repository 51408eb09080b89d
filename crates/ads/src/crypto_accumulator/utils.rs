//! Big-integer modular arithmetic used by the accumulator protocols.

use crate::error::{AdsError, Result};
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

/// Reduces `x` into `[0, m)` for a positive `m`.
pub(crate) fn normalize(x: &BigInt, m: &BigInt) -> BigInt {
    let r = x % m;
    if r.is_negative() {
        r + m
    } else {
        r
    }
}

fn check_modulus(modulus: &BigInt) -> Result<()> {
    if modulus < &BigInt::one() {
        return Err(AdsError::InvalidParameter(format!(
            "modulus must be >= 1, got {}",
            modulus
        )));
    }
    Ok(())
}

/// Computes `base^exponent mod modulus` by square-and-multiply.
///
/// The exponent must be non-negative; a zero exponent yields `1 mod modulus`.
pub fn mod_exp(base: &BigInt, exponent: &BigInt, modulus: &BigInt) -> Result<BigInt> {
    check_modulus(modulus)?;
    if exponent.is_negative() {
        return Err(AdsError::InvalidParameter(format!(
            "exponent must be non-negative, got {}",
            exponent
        )));
    }

    let mut result = BigInt::one() % modulus;
    let mut base = normalize(base, modulus);
    let bits = exponent.bits();
    for i in 0..bits {
        if exponent.bit(i) {
            result = (result * &base) % modulus;
        }
        if i + 1 < bits {
            base = (&base * &base) % modulus;
        }
    }
    Ok(result)
}

/// Iterative extended Euclid. Returns `(g, x, y)` with `a*x + b*y == g`.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    if b.is_zero() {
        return (a.clone(), BigInt::one(), BigInt::zero());
    }

    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
        let next_t = &old_t - &q * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    (old_r, old_s, old_t)
}

/// Returns `x` in `[0, n)` with `a*x ≡ 1 (mod n)`.
pub fn mod_inverse(a: &BigInt, n: &BigInt) -> Result<BigInt> {
    check_modulus(n)?;
    let (g, x, _) = extended_gcd(&normalize(a, n), n);
    if !g.is_one() {
        return Err(AdsError::NotInvertible(format!(
            "gcd({}, {}) = {}",
            a, n, g
        )));
    }
    Ok(normalize(&x, n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn int(v: i64) -> BigInt {
        BigInt::from(v)
    }

    #[test]
    fn test_mod_exp_small_values() {
        assert_eq!(mod_exp(&int(4), &int(13), &int(497)).unwrap(), int(445));
        assert_eq!(mod_exp(&int(2), &int(10), &int(1000)).unwrap(), int(24));
        assert_eq!(mod_exp(&int(7), &int(0), &int(13)).unwrap(), int(1));
        assert_eq!(mod_exp(&int(7), &int(0), &int(1)).unwrap(), int(0));
        assert_eq!(mod_exp(&int(0), &int(5), &int(13)).unwrap(), int(0));
        assert_eq!(mod_exp(&int(-2), &int(3), &int(5)).unwrap(), int(2));
    }

    #[test]
    fn test_mod_exp_matches_exact_power() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let a = int(rng.gen_range(1..=100_000));
            let b: u32 = rng.gen_range(1..=1_000);
            let n = int(rng.gen_range(1..=1_000));
            let expected = num_traits::pow(a.clone(), b as usize) % &n;
            assert_eq!(mod_exp(&a, &BigInt::from(b), &n).unwrap(), expected);
        }
    }

    #[test]
    fn test_mod_exp_rejects_bad_parameters() {
        assert!(matches!(
            mod_exp(&int(3), &int(2), &int(0)),
            Err(AdsError::InvalidParameter(_))
        ));
        assert!(matches!(
            mod_exp(&int(3), &int(2), &int(-7)),
            Err(AdsError::InvalidParameter(_))
        ));
        assert!(matches!(
            mod_exp(&int(3), &int(-1), &int(7)),
            Err(AdsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_extended_gcd() {
        let (g, x, y) = extended_gcd(&int(240), &int(46));
        assert_eq!(g, int(2));
        assert_eq!(int(240) * x + int(46) * y, int(2));

        assert_eq!(extended_gcd(&int(17), &int(0)), (int(17), int(1), int(0)));

        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let a = int(rng.gen_range(0..1_000_000));
            let b = int(rng.gen_range(1..1_000_000));
            let (g, x, y) = extended_gcd(&a, &b);
            assert_eq!(&a * x + &b * y, g);
            assert!((&a % &g).is_zero() && (&b % &g).is_zero());
        }
    }

    #[test]
    fn test_mod_inverse() {
        assert_eq!(mod_inverse(&int(3), &int(11)).unwrap(), int(4));
        assert_eq!(mod_inverse(&int(10), &int(17)).unwrap(), int(12));
        assert_eq!(mod_inverse(&int(-3), &int(11)).unwrap(), int(7));

        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let n = int(rng.gen_range(2..100_000));
            let a = int(rng.gen_range(1..100_000));
            let (g, _, _) = extended_gcd(&a, &n);
            match mod_inverse(&a, &n) {
                Ok(inv) => {
                    assert!(g.is_one());
                    assert_eq!((&a * inv) % &n, int(1));
                }
                Err(e) => {
                    assert!(!g.is_one());
                    assert!(matches!(e, AdsError::NotInvertible(_)));
                }
            }
        }
    }

    #[test]
    fn test_mod_inverse_not_invertible() {
        assert!(matches!(
            mod_inverse(&int(6), &int(9)),
            Err(AdsError::NotInvertible(_))
        ));
        assert!(matches!(
            mod_inverse(&int(0), &int(9)),
            Err(AdsError::NotInvertible(_))
        ));
    }
}
