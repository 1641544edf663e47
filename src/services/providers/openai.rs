/// OpenAI chat-completions provider
///
/// Sends a single two-message exchange (fixed expert persona plus a prompt
/// describing the target book) and splits the reply into suggestion lines.
/// One call per request: no retries, no local fallback. The HTTP client
/// carries an explicit timeout so a hung upstream surfaces as a
/// distinguishable `ExternalApiTimeout` instead of an open-ended await.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::Book,
    services::providers::SuggestionProvider,
};

const SYSTEM_PROMPT: &str = "You are a knowledgeable book recommendation expert.";
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 200;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f64,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

#[derive(Clone)]
pub struct OpenAiProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl OpenAiProvider {
    /// Creates a provider with a per-request timeout baked into the client
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            model,
        })
    }
}

#[async_trait::async_trait]
impl SuggestionProvider for OpenAiProvider {
    async fn suggest_similar(&self, book: &Book, limit: usize) -> AppResult<Vec<String>> {
        let prompt = build_prompt(book, limit);
        let body = ChatRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        let url = format!("{}/chat/completions", self.api_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OpenAI API returned status {}: {}",
                status, body
            )));
        }

        let completion: ChatResponse = response.json().await.map_err(classify_transport_error)?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::ExternalApi("OpenAI response contained no choices".to_string())
            })?;

        let suggestions = parse_suggestions(&content);

        tracing::info!(
            book_id = book.id,
            requested = limit,
            returned = suggestions.len(),
            provider = "openai",
            "AI suggestions fetched"
        );

        Ok(suggestions)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Prompt describing the target book and the desired list shape
fn build_prompt(book: &Book, limit: usize) -> String {
    format!(
        "Based on the book:\n\
         Title: {}\n\
         Author: {}\n\
         Description: {}\n\
         Genres: {}\n\n\
         Please recommend {} similar books that readers might enjoy.\n\
         Focus on thematic similarities, writing style, and genre elements.\n\
         Format as a simple list with title and author only.",
        book.title,
        book.author,
        book.description,
        book.genres.join(", "),
        limit
    )
}

/// Timeout expiry mapped to its own variant, everything else to a plain
/// transport error
///
/// The client deadline spans the whole exchange, so an expiry can surface
/// from `send` or from reading the body.
fn classify_transport_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::ExternalApiTimeout(format!("chat completion timed out: {}", e))
    } else {
        AppError::HttpClient(e)
    }
}

/// The model's reply, one suggestion per non-empty line
fn parse_suggestions(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_book() -> Book {
        Book {
            id: 42,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            description: "Politics and prophecy on a desert planet".to_string(),
            isbn: None,
            genres: vec!["sci-fi".to_string(), "classic".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_prompt_includes_book_fields() {
        let prompt = build_prompt(&test_book(), 3);
        assert!(prompt.contains("Title: Dune"));
        assert!(prompt.contains("Author: Frank Herbert"));
        assert!(prompt.contains("Genres: sci-fi, classic"));
        assert!(prompt.contains("recommend 3 similar books"));
        assert!(prompt.contains("title and author only"));
    }

    #[test]
    fn test_chat_request_serialization() {
        let prompt = "user prompt".to_string();
        let body = ChatRequest {
            model: "gpt-3.5-turbo",
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        let json: serde_json::Value = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["temperature"], 0.7);
        assert_eq!(json["max_tokens"], 200);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(
            json["messages"][0]["content"],
            "You are a knowledgeable book recommendation expert."
        );
        assert_eq!(json["messages"][1]["role"], "user");
    }

    #[test]
    fn test_chat_response_deserialization() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [
                {
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": "1. Hyperion by Dan Simmons\n2. Foundation by Isaac Asimov"
                    },
                    "finish_reason": "stop"
                }
            ]
        }"#;

        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices.len(), 1);
        assert!(response.choices[0]
            .message
            .content
            .starts_with("1. Hyperion"));
    }

    #[test]
    fn test_parse_suggestions_drops_blank_lines() {
        let content = "1. Hyperion by Dan Simmons\n\n  \n2. Foundation by Isaac Asimov\n";
        let suggestions = parse_suggestions(content);
        assert_eq!(
            suggestions,
            vec![
                "1. Hyperion by Dan Simmons".to_string(),
                "2. Foundation by Isaac Asimov".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_suggestions_preserves_order_and_trims() {
        let content = "  A Memory Called Empire by Arkady Martine\n\tThe Left Hand of Darkness by Ursula K. Le Guin";
        let suggestions = parse_suggestions(content);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0], "A Memory Called Empire by Arkady Martine");
        assert_eq!(
            suggestions[1],
            "The Left Hand of Darkness by Ursula K. Le Guin"
        );
    }

    #[test]
    fn test_provider_reports_name() {
        let provider = OpenAiProvider::new(
            "sk-test".to_string(),
            "http://localhost:0".to_string(),
            "gpt-3.5-turbo".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[tokio::test]
    async fn test_stalled_response_body_maps_to_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Respond with headers only and hold the socket open; the client
        // gives up on its own deadline rather than on EOF.
        tokio::spawn(async move {
            use tokio::io::{AsyncReadExt, AsyncWriteExt};

            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 1000\r\n\r\n",
                )
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let provider = OpenAiProvider::new(
            "sk-test".to_string(),
            format!("http://{addr}"),
            "gpt-3.5-turbo".to_string(),
            Duration::from_millis(250),
        )
        .unwrap();

        let err = provider.suggest_similar(&test_book(), 3).await.unwrap_err();

        assert!(matches!(err, AppError::ExternalApiTimeout(_)));
    }
}
