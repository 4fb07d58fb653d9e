//! Loose extraction of a decision object from untrusted oracle output.
//!
//! The oracle is asked for raw JSON but frequently wraps it in prose or a code
//! fence. Extraction runs three stages in priority order and the first one that
//! yields a JSON object wins:
//!
//! 1. the whole trimmed text,
//! 2. the interior of the first fenced code block (optionally tagged `json`),
//! 3. the first balanced `{...}` region anywhere in the text.
//!
//! Every stage is total. Nothing here panics on any input.

use serde_json::{Map, Value};

use crate::core::worker::Worker;

/// A JSON object as produced by the oracle, before any coercion.
pub type DecisionObject = Map<String, Value>;

/// Runs the three extraction stages and returns the first JSON object found.
pub fn extract_decision_object(raw: &str) -> Option<DecisionObject> {
    parse_whole(raw)
        .or_else(|| parse_fenced(raw))
        .or_else(|| parse_first_braced(raw))
}

fn parse_object(candidate: &str) -> Option<DecisionObject> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn parse_whole(raw: &str) -> Option<DecisionObject> {
    parse_object(raw)
}

fn parse_fenced(raw: &str) -> Option<DecisionObject> {
    let start = raw.find("```")?;
    let after_open = &raw[start + 3..];
    let body = after_open.strip_prefix("json").unwrap_or(after_open);
    let end = body.find("```")?;
    parse_object(&body[..end])
}

fn parse_first_braced(raw: &str) -> Option<DecisionObject> {
    let start = raw.find('{')?;
    let end = balanced_end(&raw[start..])?;
    parse_object(&raw[start..start + end])
}

/// Byte length of the balanced `{...}` region at the start of `text`,
/// skipping braces inside string literals.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// The three decision fields after coercion, with the worker name still unchecked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDecision {
    /// `None` when the field was absent or not a string.
    pub worker: Option<String>,
    /// `None` when the field was absent, empty or not a string.
    pub prompt: Option<String>,
    pub urls: Vec<String>,
}

impl RawDecision {
    pub fn from_object(object: &DecisionObject) -> Self {
        let worker = object
            .get("worker")
            .and_then(Value::as_str)
            .map(str::to_string);
        let prompt = object
            .get("prompt")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        let urls = match object.get("urls") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };
        Self {
            worker,
            prompt,
            urls,
        }
    }

    /// Resolves the worker name against the closed set.
    pub fn worker(&self) -> Result<Worker, String> {
        match &self.worker {
            Some(name) => name.parse::<Worker>().map_err(|e| e.0),
            None => Err("<missing>".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker_of(raw: &str) -> Option<String> {
        extract_decision_object(raw)
            .and_then(|o| o.get("worker").and_then(Value::as_str).map(str::to_string))
    }

    #[test]
    fn test_plain_json() {
        let raw = r#"  {"worker":"genimg","prompt":"a cat","urls":[]}  "#;
        assert_eq!(worker_of(raw).as_deref(), Some("genimg"));
    }

    #[test]
    fn test_fenced_json_with_tag() {
        let raw = "Sure!\n```json\n{\"worker\":\"code\",\"prompt\":\"sort a list\",\"urls\":[]}\n```\nDone.";
        assert_eq!(worker_of(raw).as_deref(), Some("code"));
    }

    #[test]
    fn test_fenced_json_without_tag() {
        let raw = "```\n{\"worker\":\"clear\"}\n```";
        assert_eq!(worker_of(raw).as_deref(), Some("clear"));
    }

    #[test]
    fn test_braced_region_in_prose() {
        let raw = r#"I think this is {"worker":"img2txt","prompt":"what is {this}?","urls":["https://x/y.png"]} for sure"#;
        let object = extract_decision_object(raw).unwrap();
        assert_eq!(object["prompt"], "what is {this}?");
        assert_eq!(object["urls"][0], "https://x/y.png");
    }

    #[test]
    fn test_nested_object_is_extracted_whole() {
        let raw = r#"answer: {"worker":"textgen","meta":{"a":1},"urls":[]} trailing"#;
        let object = extract_decision_object(raw).unwrap();
        assert_eq!(object["worker"], "textgen");
        assert_eq!(object["meta"]["a"], 1);
    }

    #[test]
    fn test_non_object_json_falls_through() {
        assert!(extract_decision_object("[1, 2, 3]").is_none());
        assert!(extract_decision_object("\"textgen\"").is_none());
        let raw = r#"["noise"] then {"worker":"code"}"#;
        assert_eq!(worker_of(raw).as_deref(), Some("code"));
    }

    #[test]
    fn test_garbage_yields_none() {
        assert!(extract_decision_object("").is_none());
        assert!(extract_decision_object("not json at all").is_none());
        assert!(extract_decision_object("{ unbalanced").is_none());
        assert!(extract_decision_object("}{").is_none());
        assert!(extract_decision_object("```json\n{broken```").is_none());
    }

    #[test]
    fn test_coercion() {
        let object = extract_decision_object(
            r#"{"worker": 7, "prompt": "", "urls": ["a", 3, null, "b"]}"#,
        )
        .unwrap();
        let raw = RawDecision::from_object(&object);
        assert_eq!(raw.worker, None);
        assert_eq!(raw.prompt, None);
        assert_eq!(raw.urls, vec!["a".to_string(), "b".to_string()]);
        assert!(raw.worker().is_err());

        let object = extract_decision_object(r#"{"worker":"vid2txt","urls":"https://v"}"#).unwrap();
        let raw = RawDecision::from_object(&object);
        assert_eq!(raw.worker(), Ok(Worker::VideoToText));
        assert!(raw.urls.is_empty());
    }
}
