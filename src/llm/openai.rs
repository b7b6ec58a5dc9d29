//! OpenAI chat completions implementation of [`ChatModel`].

use super::{ChatModel, OutputSchema, Prompt, ToolDefinition, ToolSelection};
use crate::config::LlmSettings;
use crate::error::{RecipeError, Result};
use crate::openai::create_client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, ChatCompletionResponseMessage, ChatCompletionTool,
    ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionObject, ResponseFormat,
    ResponseFormatJsonSchema,
};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Chat model backed by an OpenAI-compatible chat completions endpoint.
pub struct OpenAIChatModel {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAIChatModel {
    /// Create a model from settings.
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        Ok(Self::with_client(
            create_client(settings)?,
            &settings.model,
            settings.temperature,
        ))
    }

    /// Create a model around an existing client.
    pub fn with_client(client: Client<OpenAIConfig>, model: &str, temperature: f32) -> Self {
        Self {
            client,
            model: model.to_string(),
            temperature,
        }
    }

    fn messages(prompt: &Prompt) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(2);

        if let Some(system) = &prompt.system {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system.clone())
                    .build()
                    .map_err(|e| RecipeError::Llm(e.to_string()))?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.user.clone())
                .build()
                .map_err(|e| RecipeError::Llm(e.to_string()))?
                .into(),
        );

        Ok(messages)
    }

    async fn send(
        &self,
        request: async_openai::types::CreateChatCompletionRequest,
    ) -> Result<ChatCompletionResponseMessage> {
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| RecipeError::Llm(format!("Chat completion failed: {}", e)))?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| RecipeError::Llm("No response from model".to_string()))
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip_all, fields(model = %self.model))]
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(Self::messages(prompt)?)
            .temperature(self.temperature)
            .build()
            .map_err(|e| RecipeError::Llm(e.to_string()))?;

        let message = self.send(request).await?;
        message
            .content
            .ok_or_else(|| RecipeError::Llm("Empty response from model".to_string()))
    }

    #[instrument(skip_all, fields(model = %self.model, schema = %schema.name))]
    async fn complete_structured(&self, prompt: &Prompt, schema: &OutputSchema) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(Self::messages(prompt)?)
            .temperature(self.temperature)
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: Some(schema.description.clone()),
                    name: schema.name.clone(),
                    schema: Some(schema.schema.clone()),
                    strict: Some(true),
                },
            })
            .build()
            .map_err(|e| RecipeError::Llm(e.to_string()))?;

        let message = self.send(request).await?;

        if let Some(refusal) = message.refusal {
            return Err(RecipeError::SchemaMismatch {
                schema: schema.name.clone(),
                reason: format!("model refused: {}", refusal),
            });
        }

        let content = message.content.ok_or_else(|| RecipeError::SchemaMismatch {
            schema: schema.name.clone(),
            reason: "empty response".to_string(),
        })?;

        debug!(
            "Structured response: {}",
            content.chars().take(500).collect::<String>()
        );
        Ok(content)
    }

    #[instrument(skip_all, fields(model = %self.model, tools = tools.len()))]
    async fn select_tools(
        &self,
        prompt: &Prompt,
        tools: &[ToolDefinition],
    ) -> Result<Vec<ToolSelection>> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(Self::messages(prompt)?)
            .temperature(self.temperature)
            .tools(tool_definitions(tools))
            .build()
            .map_err(|e| RecipeError::Llm(e.to_string()))?;

        let message = self.send(request).await?;

        let selections = message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolSelection {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect::<Vec<_>>();

        debug!("Model selected {} tool(s)", selections.len());
        Ok(selections)
    }
}

/// Convert tool definitions into the OpenAI function-tool format.
fn tool_definitions(tools: &[ToolDefinition]) -> Vec<ChatCompletionTool> {
    tools
        .iter()
        .map(|tool| ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                parameters: Some(tool.parameters.clone()),
                strict: None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::create_client_with_config;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::time::Duration;

    fn model_for(server: &Server) -> OpenAIChatModel {
        let config = OpenAIConfig::new()
            .with_api_base(server.url())
            .with_api_key("test-key");
        let client = create_client_with_config(config, Duration::from_secs(10)).unwrap();
        OpenAIChatModel::with_client(client, "gpt-4.1-mini", 0.0)
    }

    fn completion_body(message: serde_json::Value, finish_reason: &str) -> String {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1_700_000_000u32,
            "model": "gpt-4.1-mini",
            "choices": [{
                "index": 0,
                "finish_reason": finish_reason,
                "message": message
            }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_complete_returns_content() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(
                json!({"role": "assistant", "content": "2 cups rice"}),
                "stop",
            ))
            .create_async()
            .await;

        let model = model_for(&server);
        let text = model.complete(&Prompt::user("Trim this")).await.unwrap();

        assert_eq!(text, "2 cups rice");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_structured_sends_json_schema() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({
                "response_format": {
                    "type": "json_schema",
                    "json_schema": {"name": "has_ingredients", "strict": true}
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(
                json!({"role": "assistant", "content": "{\"has_ingredients\": true}"}),
                "stop",
            ))
            .create_async()
            .await;

        let schema = OutputSchema {
            name: "has_ingredients".to_string(),
            description: "test".to_string(),
            schema: json!({"type": "object"}),
        };

        let model = model_for(&server);
        let raw = model
            .complete_structured(&Prompt::user("Any ingredients?"), &schema)
            .await
            .unwrap();

        assert_eq!(raw, r#"{"has_ingredients": true}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_select_tools_maps_calls() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({
                "tools": [{"type": "function", "function": {"name": "transcribe_audio_english"}}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(
                json!({
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "transcribe_audio_english",
                            "arguments": "{\"audio_path\": \"saved_audios/rice.mp3\"}"
                        }
                    }]
                }),
                "tool_calls",
            ))
            .create_async()
            .await;

        let tools = vec![ToolDefinition {
            name: "transcribe_audio_english".to_string(),
            description: "English audio".to_string(),
            parameters: json!({"type": "object", "properties": {}}),
        }];

        let model = model_for(&server);
        let selections = model
            .select_tools(&Prompt::user("pick"), &tools)
            .await
            .unwrap();

        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].name, "transcribe_audio_english");
        assert!(selections[0].arguments.contains("rice.mp3"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_select_tools_without_calls_is_empty() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(
                json!({"role": "assistant", "content": "I cannot decide."}),
                "stop",
            ))
            .create_async()
            .await;

        let model = model_for(&server);
        let selections = model.select_tools(&Prompt::user("pick"), &[]).await.unwrap();
        assert!(selections.is_empty());
    }
}
