/// Password reset tokens
///
/// A reset token is a 48 character base62 string mailed to the user. Only its
/// SHA-256 hex digest is stored, so a leaked table cannot be replayed.
///
/// # Example
///
/// ```
/// use hirepath_shared::auth::reset_token::{generate_reset_token, hash_reset_token, RESET_TOKEN_LENGTH};
///
/// let (token, hash) = generate_reset_token();
/// assert_eq!(token.len(), RESET_TOKEN_LENGTH);
/// assert_eq!(hash_reset_token(&token), hash);
/// ```

use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

/// Length of a reset token in characters
pub const RESET_TOKEN_LENGTH: usize = 48;

/// Generates a token and its storage hash
///
/// Returns `(plaintext_token, sha256_hex)`.
pub fn generate_reset_token() -> (String, String) {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LENGTH)
        .map(char::from)
        .collect();
    let hash = hash_reset_token(&token);

    (token, hash)
}

/// SHA-256 hex digest used as the lookup key
pub fn hash_reset_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.trim().as_bytes()))
}

/// Cheap shape check before touching the database
pub fn is_well_formed(token: &str) -> bool {
    let token = token.trim();
    token.len() == RESET_TOKEN_LENGTH && token.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_reset_token() {
        let (token, hash) = generate_reset_token();

        assert_eq!(token.len(), RESET_TOKEN_LENGTH);
        assert!(is_well_formed(&token));
        assert_eq!(hash.len(), 64);
        assert_eq!(hash_reset_token(&token), hash);
    }

    #[test]
    fn test_tokens_are_unique() {
        let (a, _) = generate_reset_token();
        let (b, _) = generate_reset_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_ignores_surrounding_whitespace() {
        let (token, hash) = generate_reset_token();
        assert_eq!(hash_reset_token(&format!(" {}\n", token)), hash);
    }

    #[test]
    fn test_is_well_formed() {
        assert!(!is_well_formed("short"));
        assert!(!is_well_formed(&"!".repeat(RESET_TOKEN_LENGTH)));
        assert!(is_well_formed(&"a".repeat(RESET_TOKEN_LENGTH)));
    }
}
