use unicode_normalization::UnicodeNormalization;

/// Unicode default case folding followed by NFKD decomposition.
pub fn fold(s: &str) -> String {
    caseless::default_case_fold_str(s).nfkd().collect()
}

/// Case- and composition-insensitive equality.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    // Plain ASCII fast path: folding and NFKD are both identity up to case.
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    fold(a) == fold(b)
}
