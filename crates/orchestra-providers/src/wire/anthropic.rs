// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Messages API format.

use orchestra_core::{ChatRole, GenerationRequest, ProviderResult};
use serde::{Deserialize, Serialize};

use super::{join_url, Completion};
use crate::http;

#[derive(Debug, Serialize)]
pub struct MessageRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub messages: Vec<ApiMessage<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ApiMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub usage: Option<ApiUsage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type", default)]
    pub block_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiUsage {
    #[serde(default)]
    pub input_tokens: Option<u64>,
    #[serde(default)]
    pub output_tokens: Option<u64>,
}

pub fn build_request<'a>(
    model: &'a str,
    max_tokens: u32,
    request: &'a GenerationRequest,
) -> MessageRequest<'a> {
    let mut messages: Vec<ApiMessage<'a>> = request
        .history
        .iter()
        .map(|m| ApiMessage {
            role: match m.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            },
            content: &m.content,
        })
        .collect();
    messages.push(ApiMessage {
        role: "user",
        content: &request.prompt,
    });
    MessageRequest {
        model,
        max_tokens,
        messages,
    }
}

impl From<MessageResponse> for Completion {
    fn from(response: MessageResponse) -> Self {
        let content = response
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text)
            .collect::<String>();
        let usage = response.usage.unwrap_or_default();
        Completion {
            content,
            input_tokens: usage.input_tokens.unwrap_or(0),
            output_tokens: usage.output_tokens.unwrap_or(0),
        }
    }
}

/// `POST {base_url}/v1/messages` with `x-api-key` and `anthropic-version`.
#[allow(clippy::too_many_arguments)]
pub async fn call(
    client: &reqwest::Client,
    provider: &str,
    base_url: &str,
    api_version: &str,
    max_tokens: u32,
    secret: &str,
    model: &str,
    request: &GenerationRequest,
) -> Result<Completion, ProviderResult> {
    let builder = client
        .post(join_url(base_url, "v1/messages"))
        .header("x-api-key", secret)
        .header("anthropic-version", api_version)
        .json(&build_request(model, max_tokens, request));
    let response: MessageResponse = http::send_json(provider, builder, secret).await?;
    Ok(response.into())
}
