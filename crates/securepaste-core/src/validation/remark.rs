/// Remarks are capped at 50 characters (not bytes).
pub const MAX_REMARK_CHARS: usize = 50;

/// Truncate a remark to at most [`MAX_REMARK_CHARS`] characters on a char boundary.
pub fn truncate_remark(remark: &str) -> String {
    remark.chars().take(MAX_REMARK_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_remarks_untouched() {
        assert_eq!(truncate_remark("hello"), "hello");
        assert_eq!(truncate_remark(""), "");
    }

    #[test]
    fn counts_characters_not_bytes() {
        let remark = "备注".repeat(40);
        let truncated = truncate_remark(&remark);
        assert_eq!(truncated.chars().count(), MAX_REMARK_CHARS);
        assert!(remark.starts_with(&truncated));
    }
}
