//! Fuzzy answer evaluation

/// Minimum similarity (0-100) for an answer to count
pub const ACCEPT_THRESHOLD: f64 = 80.0;

/// Strip every whitespace character and lowercase
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn sorted_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Length of the longest common subsequence of `a` and `b`, in chars
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diag = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb { diag + 1 } else { above.max(row[j]) };
            diag = above;
        }
    }
    row[b.len()]
}

/// Indel similarity on a 0-100 scale: `2 * lcs / (len_a + len_b)`.
///
/// Two empty strings are identical.
pub fn indel_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    (2 * lcs_len(&a, &b)) as f64 * 100.0 / total as f64
}

/// Token-sort similarity on a 0-100 scale.
///
/// Tokens are sorted before comparison so word order does not matter.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    indel_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Whether `user_answer` is close enough to `correct_title`
pub fn is_answer_correct(user_answer: &str, correct_title: &str) -> bool {
    let user = normalize(user_answer);
    let correct = normalize(correct_title);
    let similarity = token_sort_ratio(&user, &correct);
    tracing::debug!(
        "Calculated similarity {:.1} between '{}' and '{}'",
        similarity,
        user,
        correct
    );
    similarity >= ACCEPT_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(is_answer_correct("Inception", "Inception"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_answer_correct("inception", "Inception"));
        assert!(is_answer_correct("INCEPTION", "Inception"));
    }

    #[test]
    fn test_whitespace_insensitive() {
        assert!(is_answer_correct("Inception ", "Inception"));
        assert!(is_answer_correct("  the  matrix", "The Matrix"));
        assert!(is_answer_correct("thegodfather", "The Godfather"));
    }

    #[test]
    fn test_typo_tolerance() {
        assert!(is_answer_correct("Incepton", "Inception"));
        assert!(is_answer_correct("The Godfathr", "The Godfather"));
    }

    #[test]
    fn test_wrong_title_rejected() {
        assert!(!is_answer_correct("Matrix", "Inception"));
        assert!(!is_answer_correct("Jaws", "Jaws 2: The Revenge"));
    }

    #[test]
    fn test_short_title_missing_one_letter() {
        assert!((indel_ratio("jaw", "jaws") - 600.0 / 7.0).abs() < 1e-9);
        assert!(is_answer_correct("Jaw", "Jaws"));
        assert!(!is_answer_correct("Ja", "Jaws"));
    }

    #[test]
    fn test_indel_ratio_bounds() {
        assert_eq!(indel_ratio("", ""), 100.0);
        assert_eq!(indel_ratio("abc", ""), 0.0);
        assert_eq!(indel_ratio("abc", "xyz"), 0.0);
        assert_eq!(indel_ratio("alien", "alien"), 100.0);
    }

    #[test]
    fn test_normalize_removes_internal_whitespace() {
        assert_eq!(normalize(" Blade\tRunner \n2049 "), "bladerunner2049");
    }

    #[test]
    fn test_token_sort_ignores_word_order() {
        assert_eq!(token_sort_ratio("runner blade", "blade runner"), 100.0);
    }
}
