//! Random bytes from the operating system

use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::{AddrError, Result};

/// Fill an `N` byte array from the OS random source
pub fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AddrError::Entropy(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes_length() {
        let bytes: [u8; 16] = random_bytes().unwrap();
        assert_eq!(bytes.len(), 16);
    }

    #[test]
    fn test_random_bytes_differ() {
        // 2^-128 chance of a false failure
        let a: [u8; 16] = random_bytes().unwrap();
        let b: [u8; 16] = random_bytes().unwrap();
        assert_ne!(a, b);
    }
}
