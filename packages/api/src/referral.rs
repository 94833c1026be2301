//! Referral code generation.
//!
//! Codes are short enough to read aloud and share in a URL: six characters
//! drawn uniformly from `0-9A-Z`, giving 36^6 (about 2.2 billion) codes.
//! Uniqueness is not checked here; the store's unique index on
//! `referralCode` rejects a collision and the signup workflow draws again.

use rand::Rng;

/// Number of characters in a referral code.
pub const REFERRAL_CODE_LEN: usize = 6;

const CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generate a referral code from the thread-local RNG.
pub fn generate_referral_code() -> String {
    generate_referral_code_with(&mut rand::thread_rng())
}

/// Generate a referral code from the given RNG.
pub fn generate_referral_code_with<R: Rng>(rng: &mut R) -> String {
    (0..REFERRAL_CODE_LEN)
        .map(|_| char::from(CHARSET[rng.gen_range(0..CHARSET.len())]))
        .collect()
}

/// Whether `code` has the shape of a generated referral code.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == REFERRAL_CODE_LEN && code.bytes().all(|b| CHARSET.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_code_shape() {
        for _ in 0..200 {
            let code = generate_referral_code();
            assert_eq!(code.len(), REFERRAL_CODE_LEN);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
            assert!(is_well_formed(&code));
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = generate_referral_code_with(&mut StdRng::seed_from_u64(7));
        let b = generate_referral_code_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_codes_rarely_collide() {
        let mut rng = StdRng::seed_from_u64(42);
        let codes: HashSet<String> = (0..1000)
            .map(|_| generate_referral_code_with(&mut rng))
            .collect();
        assert!(codes.len() >= 999);
    }

    #[test]
    fn test_is_well_formed() {
        assert!(is_well_formed("ABC123"));
        assert!(!is_well_formed("abc123"));
        assert!(!is_well_formed("ABC12"));
        assert!(!is_well_formed("ABC1234"));
        assert!(!is_well_formed("ABC-12"));
    }
}
