// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini `generateContent` format.

use orchestra_core::{ChatRole, FailureKind, GenerationRequest, ProviderResult};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::{join_url, Completion};
use crate::http;

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
    pub role: &'static str,
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Part<'a> {
    pub text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: Option<u64>,
    #[serde(default)]
    pub candidates_token_count: Option<u64>,
}

/// Gemini names the assistant role `model`.
pub fn build_request(request: &GenerationRequest) -> GenerateContentRequest<'_> {
    let mut contents: Vec<Content<'_>> = request
        .history
        .iter()
        .map(|m| Content {
            role: match m.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "model",
            },
            parts: vec![Part { text: &m.content }],
        })
        .collect();
    contents.push(Content {
        role: "user",
        parts: vec![Part {
            text: &request.prompt,
        }],
    });
    GenerateContentRequest { contents }
}

impl From<GenerateContentResponse> for Completion {
    fn from(response: GenerateContentResponse) -> Self {
        let content = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .unwrap_or_default();
        let usage = response.usage_metadata.unwrap_or_default();
        Completion {
            content,
            input_tokens: usage.prompt_token_count.unwrap_or(0),
            output_tokens: usage.candidates_token_count.unwrap_or(0),
        }
    }
}

/// `POST {base_url}/models/{model}:generateContent` with `x-goog-api-key`.
pub async fn call(
    client: &reqwest::Client,
    provider: &str,
    base_url: &str,
    secret: &str,
    model: &str,
    request: &GenerationRequest,
) -> Result<Completion, ProviderResult> {
    let url = generate_content_url(base_url, model).ok_or_else(|| {
        ProviderResult::failure(
            FailureKind::Transport,
            format!("{provider} base URL `{base_url}` is not a valid URL"),
        )
    })?;
    let builder = client
        .post(url)
        .header("x-goog-api-key", secret)
        .json(&build_request(request));
    let response: GenerateContentResponse = http::send_json(provider, builder, secret).await?;
    Ok(response.into())
}

/// `model` is percent-encoded as one path segment.
fn generate_content_url(base_url: &str, model: &str) -> Option<Url> {
    let mut url = Url::parse(&join_url(base_url, "models")).ok()?;
    url.path_segments_mut()
        .ok()?
        .push(&format!("{model}:generateContent"));
    Some(url)
}

#[cfg(test)]
mod tests {
    use orchestra_core::ChatMessage;

    use super::*;

    #[test]
    fn assistant_turns_become_model_turns() {
        let request = GenerationRequest::new("next")
            .with_history(vec![ChatMessage::user("q"), ChatMessage::assistant("a")]);
        let body = serde_json::to_value(build_request(&request)).unwrap();
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"][2]["parts"][0]["text"], "next");
    }

    #[test]
    fn parses_candidates_and_usage_metadata() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "Hi"}, {"text": " there"}], "role": "model"}}],
            "usageMetadata": {"promptTokenCount": 7, "candidatesTokenCount": 2, "totalTokenCount": 9}
        }))
        .unwrap();
        let completion = Completion::from(response);
        assert_eq!(completion.content, "Hi there");
        assert_eq!(completion.input_tokens, 7);
        assert_eq!(completion.output_tokens, 2);
    }

    #[test]
    fn model_stays_inside_its_path_segment() {
        let url = generate_content_url(
            "https://generativelanguage.googleapis.com/v1beta/",
            "gemini-2.0-flash",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );

        let url = generate_content_url("http://127.0.0.1:9000", "a/b?c#d").unwrap();
        assert_eq!(url.path(), "/models/a%2Fb%3Fc%23d:generateContent");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn unparseable_base_url_has_no_target() {
        assert!(generate_content_url("not a url", "gemini-2.0-flash").is_none());
    }
}
