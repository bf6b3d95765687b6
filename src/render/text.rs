// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Clips `text` to `max_len` characters, ending with `…` when shortened.
pub fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    match max_len {
        0 => String::new(),
        _ if text_len(text) <= max_len => text.to_owned(),
        1 => "…".to_owned(),
        _ => {
            let mut out: String = text.chars().take(max_len - 1).collect();
            out.push('…');
            out
        }
    }
}

pub fn text_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{text_len, truncate_with_ellipsis};

    #[rstest]
    #[case("hello", 0, "")]
    #[case("hello", 1, "…")]
    #[case("h", 1, "h")]
    #[case("hello", 2, "h…")]
    #[case("αβγ", 2, "α…")]
    fn truncation_counts_chars(#[case] text: &str, #[case] width: usize, #[case] expected: &str) {
        assert_eq!(truncate_with_ellipsis(text, width), expected);
    }

    #[test]
    fn length_is_in_chars() {
        assert_eq!(text_len("do i = 1, n"), 11);
        assert_eq!(text_len("αβγ"), 3);
    }
}
