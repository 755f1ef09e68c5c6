use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use schemars::JsonSchema;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::{
    config::Config,
    constants::prompts::{self, render},
    errors::{AppError, AppResult},
    models::dto::{
        request::SummarizeRequest,
        response::{
            ChatOutput, GenerateFlashcardsOutput, GenerateQuizHintOutput, GenerateQuizOutput,
            SummarizeDocumentOutput,
        },
    },
};

/// The language-model collaborator. Implementations return the raw response
/// shapes; callers validate them before anything reaches the domain.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PromptService: Send + Sync {
    async fn summarize(&self, request: &SummarizeRequest) -> AppResult<SummarizeDocumentOutput>;

    async fn generate_quiz(&self, summary: &str) -> AppResult<GenerateQuizOutput>;

    async fn generate_custom_quiz(&self, topic: &str, num_questions: u8) -> AppResult<GenerateQuizOutput>;

    async fn generate_flashcards(
        &self,
        summary_text: &str,
        max_flashcards: u8,
    ) -> AppResult<GenerateFlashcardsOutput>;

    async fn generate_hint(
        &self,
        question_text: &str,
        document_summary: &str,
    ) -> AppResult<GenerateQuizHintOutput>;

    async fn chat(&self, user_input: &str) -> AppResult<ChatOutput>;
}

pub struct OpenAiPromptService {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiPromptService {
    pub fn new(config: &Config) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_base(&config.openai_api_base);
        if let Some(key) = &config.openai_api_key {
            openai_config = openai_config.with_api_key(key.expose_secret());
        }

        Self {
            client: Client::with_config(openai_config),
            model: config.llm_model.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one user prompt and asks for a JSON reply shaped like `T`.
    async fn complete<T>(&self, name: &str, prompt: String) -> AppResult<T>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let body = request_body::<T>(&self.model, name, &prompt)?;
        log::debug!("Calling {} for {}", self.model, name);

        let response: Value = self.client.chat().create_byot(body).await.map_err(|e| {
            log::error!("{} request failed: {}", name, e);
            AppError::from(e)
        })?;

        parse_completion(name, &response)
    }
}

#[async_trait]
impl PromptService for OpenAiPromptService {
    async fn summarize(&self, request: &SummarizeRequest) -> AppResult<SummarizeDocumentOutput> {
        let focus = request
            .focus
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(|f| render(prompts::SUMMARY_FOCUS_LINE, &[("focus", f)]))
            .unwrap_or_default();

        let prompt = render(
            prompts::SUMMARIZE_DOCUMENT_PROMPT,
            &[
                ("length", request.length.instruction()),
                ("focus", &focus),
                ("documentText", &request.document_text),
            ],
        );
        self.complete("summarize_document", prompt).await
    }

    async fn generate_quiz(&self, summary: &str) -> AppResult<GenerateQuizOutput> {
        let prompt = render(prompts::GENERATE_QUIZ_PROMPT, &[("summary", summary)]);
        self.complete("generate_quiz", prompt).await
    }

    async fn generate_custom_quiz(&self, topic: &str, num_questions: u8) -> AppResult<GenerateQuizOutput> {
        let prompt = render(
            prompts::GENERATE_CUSTOM_QUIZ_PROMPT,
            &[("topic", topic), ("numQuestions", &num_questions.to_string())],
        );
        self.complete("generate_custom_quiz", prompt).await
    }

    async fn generate_flashcards(
        &self,
        summary_text: &str,
        max_flashcards: u8,
    ) -> AppResult<GenerateFlashcardsOutput> {
        let prompt = render(
            prompts::GENERATE_FLASHCARDS_PROMPT,
            &[
                ("summaryText", summary_text),
                ("maxFlashcards", &max_flashcards.to_string()),
            ],
        );
        self.complete("generate_flashcards", prompt).await
    }

    async fn generate_hint(
        &self,
        question_text: &str,
        document_summary: &str,
    ) -> AppResult<GenerateQuizHintOutput> {
        let prompt = render(
            prompts::GENERATE_QUIZ_HINT_PROMPT,
            &[
                ("documentSummary", document_summary),
                ("questionText", question_text),
            ],
        );
        self.complete("generate_quiz_hint", prompt).await
    }

    async fn chat(&self, user_input: &str) -> AppResult<ChatOutput> {
        let prompt = render(prompts::CHAT_PROMPT, &[("userInput", user_input)]);
        self.complete("chat", prompt).await
    }
}

fn request_body<T: JsonSchema>(model: &str, name: &str, prompt: &str) -> AppResult<Value> {
    let schema = serde_json::to_value(schemars::schema_for!(T))?;
    Ok(json!({
        "model": model,
        "messages": [{ "role": "user", "content": prompt }],
        "response_format": {
            "type": "json_schema",
            "json_schema": { "name": name, "schema": schema, "strict": false }
        }
    }))
}

/// Pulls the first choice's content out of a chat completion and decodes it.
/// A reply that is not the requested shape is a validation failure.
fn parse_completion<T: DeserializeOwned>(name: &str, response: &Value) -> AppResult<T> {
    let content = response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::ExternalService(format!("{} returned no content", name)))?;

    serde_json::from_str(content).map_err(|e| {
        log::warn!("{} returned an unexpected shape: {}", name, e);
        AppError::ValidationError(format!("{} returned an unexpected shape: {}", name, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(content: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }

    #[test]
    fn request_body_carries_schema_and_prompt() {
        let body = request_body::<GenerateQuizHintOutput>("gpt-4o-mini", "hint", "Help me").unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["content"], "Help me");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert!(body["response_format"]["json_schema"]["schema"]["properties"]
            .get("hint")
            .is_some());
    }

    #[test]
    fn parse_completion_decodes_first_choice() {
        let response = completion(r#"{"botResponse":"Hello!"}"#);
        let output: ChatOutput = parse_completion("chat", &response).unwrap();
        assert_eq!(output.bot_response, "Hello!");
    }

    #[test]
    fn parse_completion_rejects_wrong_shape() {
        let response = completion(r#"{"answer":"no hint here"}"#);
        let err = parse_completion::<GenerateQuizHintOutput>("hint", &response).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn parse_completion_requires_content() {
        let err = parse_completion::<ChatOutput>("chat", &json!({ "choices": [] })).unwrap_err();
        assert_eq!(err.error_code(), "EXTERNAL_SERVICE_ERROR");
    }

    #[test]
    fn service_uses_configured_model() {
        let config = Config {
            llm_model: "local-model".to_string(),
            openai_api_base: "http://localhost:11434/v1".to_string(),
            ..Config::default()
        };
        assert_eq!(OpenAiPromptService::new(&config).model(), "local-model");
    }
}
