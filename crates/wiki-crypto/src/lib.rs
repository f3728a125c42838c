/// Wiki Crypto Library
///
/// Password digests for the credential store. Passwords are hashed with a
/// single unsalted SHA-256 pass and stored as lowercase hex, so equal
/// passwords always produce equal hashes and login is a plain equality lookup.

pub mod password;

pub use password::{HASH_HEX_LEN, hash_password};
