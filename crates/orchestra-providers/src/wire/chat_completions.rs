// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat completions format, spoken by OpenAI, xAI and Perplexity.

use orchestra_core::{GenerationRequest, ProviderResult};
use serde::{Deserialize, Serialize};

use super::{join_url, Completion};
use crate::http;

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatTurn<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ChatTurn<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    #[serde(default)]
    pub completion_tokens: Option<u64>,
}

/// History turns followed by the prompt as the final user turn.
pub fn build_request<'a>(model: &'a str, request: &'a GenerationRequest) -> ChatRequest<'a> {
    let mut messages: Vec<ChatTurn<'a>> = request
        .history
        .iter()
        .map(|m| ChatTurn {
            role: match m.role {
                orchestra_core::ChatRole::User => "user",
                orchestra_core::ChatRole::Assistant => "assistant",
            },
            content: &m.content,
        })
        .collect();
    messages.push(ChatTurn {
        role: "user",
        content: &request.prompt,
    });
    ChatRequest { model, messages }
}

impl From<ChatResponse> for Completion {
    fn from(response: ChatResponse) -> Self {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();
        let usage = response.usage.unwrap_or_default();
        Completion {
            content,
            input_tokens: usage.prompt_tokens.unwrap_or(0),
            output_tokens: usage.completion_tokens.unwrap_or(0),
        }
    }
}

/// `POST {base_url}/chat/completions` with bearer auth.
pub async fn call(
    client: &reqwest::Client,
    provider: &str,
    base_url: &str,
    secret: &str,
    model: &str,
    request: &GenerationRequest,
) -> Result<Completion, ProviderResult> {
    let builder = client
        .post(join_url(base_url, "chat/completions"))
        .bearer_auth(secret)
        .json(&build_request(model, request));
    let response: ChatResponse = http::send_json(provider, builder, secret).await?;
    Ok(response.into())
}

#[cfg(test)]
mod tests {
    use orchestra_core::ChatMessage;

    use super::*;

    #[test]
    fn history_precedes_prompt() {
        let request = GenerationRequest::new("and now?").with_history(vec![
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
        ]);
        let body = serde_json::to_value(build_request("gpt-4o", &request)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hello"},
                    {"role": "user", "content": "and now?"}
                ]
            })
        );
    }

    #[test]
    fn missing_usage_defaults_to_zero() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": "hey"}}]}"#).unwrap();
        let completion = Completion::from(response);
        assert_eq!(completion.content, "hey");
        assert_eq!(completion.input_tokens, 0);
        assert_eq!(completion.output_tokens, 0);
    }

    #[test]
    fn empty_choices_give_empty_content() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices": [], "usage": {"prompt_tokens": 3, "completion_tokens": 0}}"#,
        )
        .unwrap();
        let completion = Completion::from(response);
        assert_eq!(completion.content, "");
        assert_eq!(completion.input_tokens, 3);
    }
}
