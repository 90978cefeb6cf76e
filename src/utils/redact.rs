//! Log redaction helpers
//!
//! Upstream bodies and bearer tokens only ever reach the logs through these.

/// Truncate at a character boundary, marking the cut
pub fn truncate_for_log(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...[truncated]", &s[..idx]),
        None => s.to_string(),
    }
}

/// Show only the first few characters of a secret
pub fn mask_secret(secret: &str) -> String {
    const VISIBLE: usize = 6;

    if secret.chars().count() <= VISIBLE * 2 {
        return "***".to_string();
    }
    let prefix: String = secret.chars().take(VISIBLE).collect();
    format!("{}***", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_passthrough() {
        assert_eq!(truncate_for_log("ok", 10), "ok");
        assert_eq!(truncate_for_log("", 10), "");
    }

    #[test]
    fn test_truncate_unicode_boundary() {
        assert_eq!(truncate_for_log("Conclusão", 8), "Conclusã...[truncated]");
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("sk-proj-abcdefghijklmnop"), "sk-pro***");
        assert_eq!(mask_secret("short"), "***");
    }
}
