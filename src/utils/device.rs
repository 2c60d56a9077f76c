use serde_json::{json, Value};

const MAX_USER_AGENT_LEN: usize = 512;

/// Plateforme déduite du User-Agent.
/// iOS avant macOS (les UA iOS contiennent "like Mac OS X"), Android avant Linux.
pub fn platform_from_user_agent(user_agent: &str) -> &'static str {
    if ["iPhone", "iPad", "iPod"].iter().any(|p| user_agent.contains(p)) {
        "ios"
    } else if user_agent.contains("Android") {
        "android"
    } else if user_agent.contains("Windows") {
        "windows"
    } else if user_agent.contains("Macintosh") || user_agent.contains("Mac OS X") {
        "macos"
    } else if user_agent.contains("Linux") {
        "linux"
    } else {
        "unknown"
    }
}

/// Métadonnées stockées avec le device_id au moment du binding
pub fn describe_device(user_agent: Option<&str>, name: Option<&str>) -> Value {
    let user_agent = user_agent.map(|ua| ua.chars().take(MAX_USER_AGENT_LEN).collect::<String>());
    let platform = user_agent
        .as_deref()
        .map(platform_from_user_agent)
        .unwrap_or("unknown");

    json!({
        "platform": platform,
        "userAgent": user_agent,
        "name": name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_detection() {
        let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
        let android = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36";
        let mac = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) AppleWebKit/605.1.15";

        assert_eq!(platform_from_user_agent(iphone), "ios");
        assert_eq!(platform_from_user_agent(android), "android");
        assert_eq!(platform_from_user_agent(mac), "macos");
        assert_eq!(platform_from_user_agent("curl/8.4.0"), "unknown");
    }

    #[test]
    fn test_describe_device() {
        let user_agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
        let info = describe_device(Some(user_agent), Some("Office PC"));

        assert_eq!(info["platform"], "windows");
        assert_eq!(info["name"], "Office PC");

        let empty = describe_device(None, None);
        assert_eq!(empty["platform"], "unknown");
        assert!(empty["userAgent"].is_null());
    }
}
