//! Mock LLM clients for tests: scripted replies and forced failures.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::TutorError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::Message;

/// Mock LLM returning scripted replies in order, then the fallback reply.
///
/// **Interaction**: Implements `LlmClient`; used wherever `ChatOpenAI`
/// would be, without network access.
pub struct MockLlm {
    script: Mutex<VecDeque<String>>,
    fallback: String,
}

impl MockLlm {
    /// Mock that returns the same reply on every invoke.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: reply.into(),
        }
    }

    /// Mock that returns the given replies in order; once exhausted, repeats
    /// the last one.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut script: VecDeque<String> = replies.into_iter().map(Into::into).collect();
        let fallback = script
            .back()
            .cloned()
            .unwrap_or_else(|| "ok".to_string());
        // The last scripted reply doubles as the fallback.
        script.pop_back();
        Self {
            script: Mutex::new(script),
            fallback,
        }
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, _messages: &[Message]) -> Result<LlmResponse, TutorError> {
        let next = self
            .script
            .lock()
            .map_err(|_| TutorError::Llm("mock script lock poisoned".into()))?
            .pop_front();
        Ok(LlmResponse {
            content: next.unwrap_or_else(|| self.fallback.clone()),
        })
    }
}

/// Mock LLM that fails every invoke with the given message.
pub struct FailingLlm(pub String);

#[async_trait]
impl LlmClient for FailingLlm {
    async fn invoke(&self, _messages: &[Message]) -> Result<LlmResponse, TutorError> {
        Err(TutorError::Llm(self.0.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: with_reply returns the same content on every invoke.
    #[tokio::test]
    async fn mock_llm_fixed_reply() {
        let llm = MockLlm::with_reply("always this");
        for _ in 0..3 {
            let res = llm.invoke(&[Message::user("q")]).await.unwrap();
            assert_eq!(res.content, "always this");
        }
    }

    /// **Scenario**: with_replies yields the script in order, then repeats the last reply.
    #[tokio::test]
    async fn mock_llm_scripted_then_fallback() {
        let llm = MockLlm::with_replies(["first", "second"]);
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "first");
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "second");
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "second");
    }

    /// **Scenario**: FailingLlm always returns TutorError::Llm with its message.
    #[tokio::test]
    async fn failing_llm_errors() {
        let llm = FailingLlm("backend down".into());
        let err = llm.invoke(&[]).await.unwrap_err();
        assert!(err.to_string().contains("backend down"));
    }
}
