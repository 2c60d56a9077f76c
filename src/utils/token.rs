use rand::Rng;

/// 32 symboles, sans 0/O/1/I pour éviter les confusions à la saisie
pub const TOKEN_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const TOKEN_LENGTH: usize = 6;

/// Génère un token d'accès au format PREFIX-XXXXXX
pub fn generate_token(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let body: String = (0..TOKEN_LENGTH)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect();

    format!("{}-{}", prefix, body)
}

/// Normalise un token saisi à la main (espaces, minuscules)
pub fn normalize_token(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn matches_format(token: &str, prefix: &str) -> bool {
        match token.split_once('-') {
            Some((head, body)) => {
                head == prefix
                    && body.len() == TOKEN_LENGTH
                    && body.bytes().all(|b| TOKEN_ALPHABET.contains(&b))
            }
            None => false,
        }
    }

    #[test]
    fn test_generated_token_format() {
        for _ in 0..200 {
            let token = generate_token("BREW");
            assert!(matches_format(&token, "BREW"), "unexpected token {token}");
        }
    }

    #[test]
    fn test_alphabet_excludes_ambiguous_characters() {
        let unique: HashSet<u8> = TOKEN_ALPHABET.iter().copied().collect();
        assert_eq!(unique.len(), 32);
        for ambiguous in [b'0', b'O', b'1', b'I'] {
            assert!(!TOKEN_ALPHABET.contains(&ambiguous));
        }
    }

    #[test]
    fn test_tokens_differ() {
        let tokens: HashSet<String> = (0..50).map(|_| generate_token("BREW")).collect();
        assert_eq!(tokens.len(), 50);
    }

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("  brew-7k3n9p \n"), "BREW-7K3N9P");
    }
}
