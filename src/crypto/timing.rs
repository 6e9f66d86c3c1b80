//! Constant-time selection and comparison helpers.
//!
//! These back the session-key decoding paths, which must not branch on
//! secret-derived data.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// Constant-time comparison of equal-length byte slices.
///
/// Slices of different lengths compare unequal after a dummy comparison so
/// the data-dependent work stays the same.
pub fn bytes_equal(a: &[u8], b: &[u8]) -> Choice {
    if a.len() != b.len() {
        let dummy = [0u8; 32];
        let _ = dummy.ct_eq(&[1u8; 32]);
        return Choice::from(0);
    }
    a.ct_eq(b)
}

/// Constant-time selection of one byte.
pub fn select_u8(choice: Choice, when_true: u8, when_false: u8) -> u8 {
    u8::conditional_select(&when_false, &when_true, choice)
}

/// Constant-time selection between two equal-length byte slices.
///
/// Both inputs are always read in full; the output is assembled with
/// bitwise selects, never a data-dependent branch.
pub fn select_bytes(choice: Choice, when_true: &[u8], when_false: &[u8]) -> Vec<u8> {
    debug_assert_eq!(when_true.len(), when_false.len());
    when_true
        .iter()
        .zip(when_false.iter())
        .map(|(&t, &f)| u8::conditional_select(&f, &t, choice))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_equal() {
        assert!(bool::from(bytes_equal(b"same", b"same")));
        assert!(!bool::from(bytes_equal(b"same", b"diff")));
        assert!(!bool::from(bytes_equal(b"short", b"longer")));
        assert!(bool::from(bytes_equal(&[], &[])));
    }

    #[test]
    fn test_select_u8() {
        assert_eq!(select_u8(Choice::from(1), 7, 9), 7);
        assert_eq!(select_u8(Choice::from(0), 7, 9), 9);
    }

    #[test]
    fn test_select_bytes() {
        let a = [1u8, 2, 3];
        let b = [9u8, 8, 7];
        assert_eq!(select_bytes(Choice::from(1), &a, &b), a.to_vec());
        assert_eq!(select_bytes(Choice::from(0), &a, &b), b.to_vec());
    }
}
