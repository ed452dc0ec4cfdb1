//! Completion provider replaying scripted replies per model.

use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use crate::routing::{
    domain::{Completion, CompletionRequest, MessageRole, ProviderError, ProviderErrorKind},
    ports::CompletionProvider,
};

/// One scripted outcome of a completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    /// The call succeeds with this text.
    Text(String),
    /// The call fails with this class of error.
    Fail(ProviderErrorKind),
}

impl ScriptedReply {
    /// Creates a successful reply.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }
}

#[derive(Debug, Default)]
struct Script {
    queues: BTreeMap<String, VecDeque<ScriptedReply>>,
    default_reply: Option<ScriptedReply>,
    calls: Vec<(String, String)>,
}

/// Thread-safe provider answering from per-model reply queues.
///
/// Each call pops the next reply queued for the requested model, falling
/// back to the default reply when the queue is empty. Calls with neither
/// fail as [`ProviderErrorKind::Other`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedCompletionProvider {
    script: Arc<Mutex<Script>>,
}

impl ScriptedCompletionProvider {
    /// Creates a provider with no scripted replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `replies` for `model`, after any already queued.
    #[must_use]
    pub fn with_replies(
        self,
        model: impl Into<String>,
        replies: impl IntoIterator<Item = ScriptedReply>,
    ) -> Self {
        self.lock()
            .queues
            .entry(model.into())
            .or_default()
            .extend(replies);
        self
    }

    /// Sets the reply used for any model whose queue is empty.
    #[must_use]
    pub fn with_default(self, reply: ScriptedReply) -> Self {
        self.lock().default_reply = Some(reply);
        self
    }

    /// Returns the models called so far, in call order.
    #[must_use]
    pub fn called_models(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .map(|(model, _)| model.clone())
            .collect()
    }

    /// Returns the final user message of every call, in call order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .map(|(_, prompt)| prompt.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletionProvider {
    async fn complete(
        &self,
        model: &str,
        request: &CompletionRequest,
    ) -> Result<Completion, ProviderError> {
        let mut script = self.lock();
        let prompt = request
            .messages()
            .iter()
            .rev()
            .find(|message| message.role == MessageRole::User)
            .map(|message| message.content.clone())
            .unwrap_or_default();
        script.calls.push((model.to_owned(), prompt));

        let reply = script
            .queues
            .get_mut(model)
            .and_then(VecDeque::pop_front)
            .or_else(|| script.default_reply.clone());
        match reply {
            Some(ScriptedReply::Text(content)) => Ok(Completion {
                model: model.to_owned(),
                content,
            }),
            Some(ScriptedReply::Fail(kind)) => Err(ProviderError::new(
                kind,
                format!("scripted {kind} failure from {model}"),
            )),
            None => Err(ProviderError::new(
                ProviderErrorKind::Other,
                format!("no scripted reply for {model}"),
            )),
        }
    }
}
