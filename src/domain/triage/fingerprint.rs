//! Cache key derivation for ticket text.

use sha2::{Digest, Sha256};

/// Separates title from description so `("ab", "c")` and `("a", "bc")` differ.
const FIELD_SEPARATOR: char = '\u{1f}';

/// Derives a stable cache key from a ticket's title and description.
///
/// Case-insensitive and ignores surrounding whitespace. Unsalted, so keys
/// survive process restarts.
pub fn fingerprint(title: &str, description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.trim().to_lowercase().as_bytes());
    hasher.update(FIELD_SEPARATOR.to_string().as_bytes());
    hasher.update(description.trim().to_lowercase().as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn same_input_same_key() {
        assert_eq!(
            fingerprint("Impressora", "não liga"),
            fingerprint("Impressora", "não liga")
        );
    }

    #[test]
    fn ignores_case_and_surrounding_whitespace() {
        assert_eq!(fingerprint(" T ", " d "), fingerprint("t", "d"));
        assert_eq!(fingerprint("VPN CAIU", "\tSem acesso\n"), fingerprint("vpn caiu", "sem acesso"));
    }

    #[test]
    fn field_boundary_matters() {
        assert_ne!(fingerprint("ab", "c"), fingerprint("a", "bc"));
    }

    #[test]
    fn key_is_hex_sha256() {
        let key = fingerprint("a", "b");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    proptest! {
        #[test]
        fn padding_and_case_never_change_the_key(
            title in "[a-zA-Z0-9 ]{0,24}",
            description in "[a-zA-Z0-9 ]{0,48}",
            pad in " {0,3}",
        ) {
            let padded_title = format!("{pad}{}{pad}", title.to_uppercase());
            let padded_description = format!("{pad}{description}{pad}");
            prop_assert_eq!(
                fingerprint(&padded_title, &padded_description),
                fingerprint(&title, &description)
            );
        }

        #[test]
        fn distinct_titles_give_distinct_keys(a in "[a-z]{1,16}", b in "[a-z]{1,16}") {
            prop_assume!(a != b);
            prop_assert_ne!(fingerprint(&a, ""), fingerprint(&b, ""));
        }
    }
}
