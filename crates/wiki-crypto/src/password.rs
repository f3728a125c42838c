use sha2::{Digest, Sha256};

/// Length of a stored password hash: 32 digest bytes as hex.
pub const HASH_HEX_LEN: usize = 64;

/// Hash a plaintext password for storage or lookup.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn deterministic_and_fixed_length() {
        let a = hash_password("pw1");
        let b = hash_password("pw1");
        assert_eq!(a, b);
        assert_eq!(a.len(), HASH_HEX_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn different_passwords_differ() {
        assert_ne!(hash_password("pw1"), hash_password("pw2"));
        assert_ne!(hash_password(""), hash_password(" "));
    }

    #[test]
    fn plaintext_not_stored() {
        let hashed = hash_password("hunter2");
        assert!(!hashed.contains("hunter2"));
    }
}
