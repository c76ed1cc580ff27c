//! User-Agent shortcuts: short keys that expand to full header values.

/// Sent when no `--user-agent` is given.
pub const DEFAULT_USER_AGENT: &str = concat!("xptest/", env!("CARGO_PKG_VERSION"));

/// Shortcut key to User-Agent string. Keys are lowercase; lookup lowercases the input.
const SHORTCUTS: &[(&str, &str)] = &[
    (
        "firefox",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:128.0) Gecko/20100101 Firefox/128.0",
    ),
    (
        "chrome",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    ),
    (
        "safari",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    ),
    (
        "edge",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36 Edg/126.0.0.0",
    ),
    (
        "ie",
        "Mozilla/5.0 (Windows NT 10.0; WOW64; Trident/7.0; rv:11.0) like Gecko",
    ),
    (
        "iphone",
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1",
    ),
    (
        "android",
        "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Mobile Safari/537.36",
    ),
    (
        "googlebot",
        "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
    ),
    (
        "bingbot",
        "Mozilla/5.0 (compatible; bingbot/2.0; +http://www.bing.com/bingbot.htm)",
    ),
    ("curl", "curl/8.8.0"),
];

/// Expand a shortcut key (case-insensitive, exact match) or return the input unchanged.
pub fn resolve_user_agent(value: &str) -> String {
    let key = value.to_lowercase();
    SHORTCUTS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, ua)| (*ua).to_string())
        .unwrap_or_else(|| value.to_string())
}

/// Names of all known shortcuts, in table order. Used for help text.
pub fn shortcut_names() -> impl Iterator<Item = &'static str> {
    SHORTCUTS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcut_resolves_to_full_string() {
        assert!(resolve_user_agent("iphone").contains("iPhone OS"));
        assert!(resolve_user_agent("googlebot").contains("Googlebot/2.1"));
    }

    #[test]
    fn shortcut_lookup_is_case_insensitive() {
        assert_eq!(resolve_user_agent("FireFox"), resolve_user_agent("firefox"));
        assert_eq!(resolve_user_agent("ANDROID"), resolve_user_agent("android"));
        assert_ne!(resolve_user_agent("ANDROID"), "ANDROID");
    }

    #[test]
    fn shortcut_lookup_is_exact() {
        assert_eq!(resolve_user_agent("firefox2"), "firefox2");
        assert_eq!(resolve_user_agent(" chrome"), " chrome");
    }

    #[test]
    fn unknown_value_passes_through() {
        assert_eq!(resolve_user_agent("MyBot/1.0 (+x)"), "MyBot/1.0 (+x)");
        assert_eq!(resolve_user_agent(""), "");
    }

    #[test]
    fn every_shortcut_key_is_lowercase() {
        for name in shortcut_names() {
            assert_eq!(name, name.to_lowercase());
        }
    }

    #[test]
    fn default_user_agent_names_the_tool() {
        assert!(DEFAULT_USER_AGENT.starts_with("xptest/"));
    }
}
