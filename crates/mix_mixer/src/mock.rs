//! Scripted evaluator for testing.
//!
//! Returns queued responses in order and records every snippet it receives,
//! so pipelines can be exercised without a jsonnet program installed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{MixerError, MixerResult};
use crate::eval::Evaluator;
use crate::mixin::Mixin;

/// Predefined result of one evaluation.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    Output(Vec<u8>),
    Failure(String),
}

impl ScriptedResponse {
    pub fn output(content: impl Into<Vec<u8>>) -> Self {
        Self::Output(content.into())
    }

    pub fn json(value: &serde_json::Value) -> Self {
        Self::Output(value.to_string().into_bytes())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }
}

/// Evaluator returning scripted responses.
///
/// Responses are consumed in order and cycle once exhausted. Without any
/// response every snippet evaluates to `{}`.
#[derive(Clone, Default)]
pub struct ScriptedEvaluator {
    responses: Arc<RwLock<Vec<ScriptedResponse>>>,
    response_index: Arc<AtomicUsize>,
    snippets: Arc<RwLock<Vec<Mixin>>>,
}

impl ScriptedEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next evaluation.
    pub fn add_response(self, response: ScriptedResponse) -> Self {
        self.responses.write().push(response);
        self
    }

    /// Snippets received so far, in call order.
    pub fn snippets(&self) -> Vec<Mixin> {
        self.snippets.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.snippets.read().len()
    }

    fn next_response(&self) -> ScriptedResponse {
        let responses = self.responses.read();
        if responses.is_empty() {
            return ScriptedResponse::output("{}");
        }
        let index = self.response_index.fetch_add(1, Ordering::SeqCst);
        responses[index % responses.len()].clone()
    }
}

#[async_trait]
impl Evaluator for ScriptedEvaluator {
    async fn exec(&self, snippet: &Mixin) -> MixerResult<Vec<u8>> {
        self.snippets.write().push(snippet.clone());
        match self.next_response() {
            ScriptedResponse::Output(bytes) => Ok(bytes),
            ScriptedResponse::Failure(message) => Err(MixerError::Evaluation(message)),
        }
    }
}
