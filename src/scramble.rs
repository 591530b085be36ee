use rand::seq::SliceRandom;

/// Resample budget before falling back to a deterministic permutation.
const MAX_SHUFFLE_ATTEMPTS: usize = 32;

/// Returns a random permutation of `word` that differs from it.
///
/// Words with fewer than two distinct characters have no such permutation
/// and are returned unchanged.
pub fn scramble(word: &str) -> String {
    let original: Vec<char> = word.chars().collect();
    if !has_two_distinct_chars(&original) {
        return word.to_string();
    }

    let mut rng = rand::thread_rng();
    let mut chars = original.clone();
    for _ in 0..MAX_SHUFFLE_ATTEMPTS {
        chars.shuffle(&mut rng);
        if chars != original {
            return chars.into_iter().collect();
        }
    }

    // Exhausted the random budget; swap the first pair of differing
    // positions, which is always a distinct permutation here.
    let mut chars = original.clone();
    for i in 1..chars.len() {
        if chars[i] != chars[0] {
            chars.swap(0, i);
            break;
        }
    }
    chars.into_iter().collect()
}

fn has_two_distinct_chars(chars: &[char]) -> bool {
    // If every adjacent pair is equal, every character is equal.
    chars.windows(2).any(|w| w[0] != w[1])
}

/// True when `candidate` uses exactly the characters of `word`.
pub fn is_permutation(word: &str, candidate: &str) -> bool {
    let mut a: Vec<char> = word.chars().collect();
    let mut b: Vec<char> = candidate.chars().collect();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scramble_is_permutation_and_differs() {
        for word in ["cat", "balloon", "kaleidoscope", "ab"] {
            for _ in 0..50 {
                let scrambled = scramble(word);
                assert!(is_permutation(word, &scrambled));
                assert_ne!(scrambled, word);
            }
        }
    }

    #[test]
    fn test_scramble_single_char() {
        assert_eq!(scramble("a"), "a");
    }

    #[test]
    fn test_scramble_empty() {
        assert_eq!(scramble(""), "");
    }

    #[test]
    fn test_scramble_repeated_letters_returns_input() {
        // "aaaa" has a single permutation; looping would never terminate.
        assert_eq!(scramble("aaaa"), "aaaa");
    }

    #[test]
    fn test_scramble_two_distinct_repeated() {
        for _ in 0..50 {
            let scrambled = scramble("aab");
            assert!(is_permutation("aab", &scrambled));
            assert_ne!(scrambled, "aab");
        }
    }

    #[test]
    fn test_is_permutation() {
        assert!(is_permutation("cat", "tac"));
        assert!(is_permutation("cat", "cat"));
        assert!(!is_permutation("cat", "car"));
        assert!(!is_permutation("cat", "cata"));
    }
}
