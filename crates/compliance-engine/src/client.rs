use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CompletionError;

/// Anything that turns a prompt into completion text.
///
/// The pipeline only relies on this one call, so tests swap in
/// [`ScriptedClient`] and never touch the network.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// Test double that replays queued responses in order.
///
/// Each call pops the next entry; an exhausted script behaves like an
/// unreachable service. Every prompt received is recorded.
#[derive(Default)]
pub struct ScriptedClient {
    script: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful completion
    pub fn respond(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()))
    }

    /// Queue a transport failure
    pub fn fail(self, reason: impl Into<String>) -> Self {
        self.push(Err(reason.into()))
    }

    fn push(self, entry: Result<String, String>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(entry);
        }
        self
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(reason)) => Err(CompletionError::Connection(reason)),
            None => Err(CompletionError::Connection("script exhausted".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_client_replays_in_order() {
        let client = ScriptedClient::new().respond("first").fail("down").respond("third");

        assert_eq!(client.complete("a").await.unwrap(), "first");
        assert!(matches!(
            client.complete("b").await,
            Err(CompletionError::Connection(reason)) if reason == "down"
        ));
        assert_eq!(client.complete("c").await.unwrap(), "third");
        assert!(client.complete("d").await.is_err());

        assert_eq!(client.prompts(), vec!["a", "b", "c", "d"]);
    }
}
