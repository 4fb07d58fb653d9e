//! Scripted fakes for the routing engine's boundaries.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use switchboard::prelude::*;

/// Returns a fixed answer and remembers every query it was asked.
pub struct ScriptedOracle {
    response: Result<String, String>,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    pub fn answering(response: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(response.to_string()),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Err(reason.to_string()),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn complete(&self, _system: &str, query: &str) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        self.response.clone().map_err(OracleError)
    }
}

/// One recorded handler invocation: `(user_id, prompt, urls)`.
pub type Call = (String, String, Vec<String>);

/// Records every invocation and answers with `reply`, or fails when `reply` is `None`.
pub struct Recorder {
    reply: Option<String>,
    calls: Mutex<Vec<Call>>,
}

impl Recorder {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn broken() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, user_id: &str, prompt: &str, urls: Vec<String>) -> Result<String, CapabilityError> {
        self.calls
            .lock()
            .unwrap()
            .push((user_id.to_string(), prompt.to_string(), urls));
        self.reply
            .clone()
            .ok_or_else(|| CapabilityError::Other("upstream exploded: secret-token-123".to_string()))
    }
}

#[async_trait]
impl TextCapability for Recorder {
    async fn respond(&self, user_id: &str, prompt: &str) -> Result<String, CapabilityError> {
        self.record(user_id, prompt, Vec::new())
    }
}

#[async_trait]
impl MediaCapability for Recorder {
    async fn describe(&self, user_id: &str, prompt: &str, url: &str) -> Result<String, CapabilityError> {
        self.record(user_id, prompt, vec![url.to_string()])
    }
}

#[async_trait]
impl GalleryCapability for Recorder {
    async fn describe_all(
        &self,
        user_id: &str,
        prompt: &str,
        urls: &[String],
    ) -> Result<String, CapabilityError> {
        self.record(user_id, prompt, urls.to_vec())
    }
}

#[async_trait]
impl ImageGeneration for Recorder {
    async fn generate(&self, user_id: &str, prompt: &str) -> Result<GeneratedImage, CapabilityError> {
        let caption = self.record(user_id, prompt, Vec::new())?;
        Ok(GeneratedImage {
            image_url: "https://files.example/generated.png".to_string(),
            text: caption,
            model_response: "Here's ai generated image of your prompt: https://files.example/generated.png"
                .to_string(),
        })
    }
}

#[async_trait]
impl ImageEditing for Recorder {
    async fn edit(
        &self,
        user_id: &str,
        image_url: &str,
        prompt: &str,
    ) -> Result<EditedImage, CapabilityError> {
        let caption = self.record(user_id, prompt, vec![image_url.to_string()])?;
        Ok(EditedImage {
            original_url: image_url.to_string(),
            edited_image_url: "https://files.example/edited.png".to_string(),
            text: caption,
            model_response: "Here's the edited image: https://files.example/edited.png".to_string(),
        })
    }
}

/// Oracle output routing to `worker` with the given prompt and urls.
pub fn decision_json(worker: &str, prompt: &str, urls: &[&str]) -> String {
    serde_json::json!({ "worker": worker, "prompt": prompt, "urls": urls }).to_string()
}

pub fn dispatcher(oracle: Arc<ScriptedOracle>, registry: CapabilityRegistry) -> Dispatcher {
    Dispatcher::new(oracle, Arc::new(registry))
}
