use serde::{Deserialize, Serialize};

/// Prompt used when media arrives without any accompanying text.
pub const DEFAULT_MEDIA_PROMPT: &str = "Process this";

/// One routing cycle's input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    pub user_id: String,
    /// Media supplied out of band by the caller. Takes precedence over any
    /// URL the oracle extracts from the text.
    #[serde(default)]
    pub urls: Vec<String>,
}

impl Query {
    pub fn new(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            user_id: user_id.into(),
            urls: Vec::new(),
        }
    }

    pub fn with_urls(mut self, urls: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.urls = urls.into_iter().map(Into::into).collect();
        self
    }
}

/// Collects every `http://` or `https://` token in `text`, in order.
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut urls = Vec::new();
    let mut rest = text;
    while let Some(start) = next_scheme(rest) {
        let tail = &rest[start..];
        let end = tail.find(char::is_whitespace).unwrap_or(tail.len());
        urls.push(tail[..end].to_string());
        rest = &tail[end..];
    }
    urls
}

fn next_scheme(text: &str) -> Option<usize> {
    match (text.find("http://"), text.find("https://")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Where a chat message was posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
}

/// A chat-platform message with media already resolved to fetchable URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub user_id: String,
    pub from_bot: bool,
    pub chat: ChatKind,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub attachment_url: Option<String>,
    #[serde(default)]
    pub reply_attachment_url: Option<String>,
}

impl InboundMessage {
    /// Private chats always count; group messages need the command or a mention.
    pub fn is_addressed_to(&self, bot_username: &str) -> bool {
        if self.chat == ChatKind::Private {
            return true;
        }
        let Some(text) = self.text.as_deref() else {
            return false;
        };
        text.starts_with("/gemini")
            || (!bot_username.is_empty() && text.contains(&format!("@{bot_username}")))
    }

    /// Reduces the message to a [`Query`], or `None` when it should be ignored.
    pub fn into_query(self, bot_username: &str) -> Option<Query> {
        if self.from_bot || !self.is_addressed_to(bot_username) {
            return None;
        }

        let mut text = self.text.unwrap_or_default();
        if self.chat != ChatKind::Private && !bot_username.is_empty() {
            text = strip_addressing(&text, bot_username);
        }

        let mut urls = extract_urls(&text);
        urls.extend(self.attachment_url);
        urls.extend(self.reply_attachment_url);

        if text.is_empty() {
            if urls.is_empty() {
                return None;
            }
            text = DEFAULT_MEDIA_PROMPT.to_string();
        }

        Some(Query::new(self.user_id, text).with_urls(urls))
    }
}

/// Drops a leading `/gemini` or `/gemini@bot` command (case-insensitive) and the
/// first `@bot` mention.
fn strip_addressing(text: &str, bot_username: &str) -> String {
    let mut rest = text;
    if let Some(after) = strip_prefix_ignore_case(rest, "/gemini") {
        rest = strip_prefix_ignore_case(after, &format!("@{bot_username}")).unwrap_or(after);
        rest = rest.trim_start();
    }
    rest.replacen(&format!("@{bot_username}"), "", 1)
        .trim()
        .to_string()
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(text: &str) -> InboundMessage {
        InboundMessage {
            user_id: "42".to_string(),
            from_bot: false,
            chat: ChatKind::Group,
            text: Some(text.to_string()),
            attachment_url: None,
            reply_attachment_url: None,
        }
    }

    #[test]
    fn test_extract_urls() {
        assert_eq!(
            extract_urls("see https://a.com/x.png and http://b.org/y?z=1\nthen"),
            vec!["https://a.com/x.png", "http://b.org/y?z=1"]
        );
        assert!(extract_urls("no links here").is_empty());
    }

    #[test]
    fn test_group_message_needs_addressing() {
        assert!(group("hello everyone").into_query("geminibot").is_none());
        assert!(group("/gemini hi").is_addressed_to("geminibot"));
        assert!(group("hey @geminibot").is_addressed_to("geminibot"));
    }

    #[test]
    fn test_group_command_and_mention_are_stripped() {
        let query = group("/GEMINI@geminibot   what is rust?").into_query("geminibot").unwrap();
        assert_eq!(query.text, "what is rust?");

        let query = group("@geminibot describe https://x.io/a.jpg")
            .into_query("geminibot")
            .unwrap();
        assert_eq!(query.text, "describe https://x.io/a.jpg");
        assert_eq!(query.urls, vec!["https://x.io/a.jpg"]);
        assert_eq!(query.user_id, "42");
    }

    #[test]
    fn test_url_order_and_default_prompt() {
        let message = InboundMessage {
            user_id: "7".to_string(),
            from_bot: false,
            chat: ChatKind::Private,
            text: None,
            attachment_url: Some("https://files/photo.jpg".to_string()),
            reply_attachment_url: Some("https://files/voice.ogg".to_string()),
        };
        let query = message.into_query("geminibot").unwrap();
        assert_eq!(query.text, DEFAULT_MEDIA_PROMPT);
        assert_eq!(query.urls, vec!["https://files/photo.jpg", "https://files/voice.ogg"]);
    }

    #[test]
    fn test_ignored_messages() {
        let mut from_bot = group("/gemini hi");
        from_bot.from_bot = true;
        assert!(from_bot.into_query("geminibot").is_none());

        // Addressed, but nothing left after stripping
        assert!(group("/gemini").into_query("geminibot").is_none());
    }
}
