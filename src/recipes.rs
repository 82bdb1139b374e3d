//! # Recipe suggestions
//!
//! Side branch off the inventory: the current item names and quantities are
//! folded into a natural-language prompt and sent to an external completion
//! endpoint. The returned text is passed through verbatim; no structure is
//! enforced on it. A failed call never blocks or rolls back inventory work.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::inventory::InventoryItem;

#[derive(Error, Debug)]
pub enum SuggestError {
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion response carried no choices")]
    EmptyCompletion,
}

/// Single entry point for the pluggable external collaborator: the whole
/// request shape (model, endpoint, parsing) hides behind this.
#[async_trait]
pub trait RecipeSuggester: Send + Sync {
    async fn suggest(&self, items: &[InventoryItem]) -> Result<String, SuggestError>;
}

/// Prompt assembled from names and quantities only; descriptions and
/// vendors stay out of it.
pub fn build_prompt(items: &[InventoryItem]) -> String {
    let items: Vec<_> = items
        .iter()
        .map(|item| json!({ "name": item.name, "quantity": item.quantity }))
        .collect();

    format!(
        "Based on the following pantry items, suggest some recipes or meals that can be prepared:\n{}",
        json!({ "items": items })
    )
}

/// Completion-endpoint client: one POST with `model`, `prompt` and
/// `max_tokens`, bearer-key auth, first choice text returned trimmed.
pub struct CompletionClient {
    http: reqwest::Client,
    url: String,
    model: String,
    api_key: String,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

impl CompletionClient {
    pub fn new(url: String, model: String, api_key: String, max_tokens: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
            model,
            api_key,
            max_tokens,
        }
    }
}

#[async_trait]
impl RecipeSuggester for CompletionClient {
    async fn suggest(&self, items: &[InventoryItem]) -> Result<String, SuggestError> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "prompt": build_prompt(items),
                "max_tokens": self.max_tokens,
            }))
            .send()
            .await?
            .error_for_status()?;

        let completion: CompletionResponse = response.json().await?;

        completion
            .choices
            .first()
            .map(|choice| choice.text.trim().to_string())
            .ok_or(SuggestError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_names_and_quantities_only() {
        let items = vec![InventoryItem {
            name: "eggs".into(),
            quantity: 12,
            description: "large".into(),
            vendor: "Acme".into(),
        }];

        let prompt = build_prompt(&items);

        assert!(prompt.starts_with("Based on the following pantry items"));
        assert!(prompt.contains(r#""name":"eggs""#));
        assert!(prompt.contains(r#""quantity":12"#));
        assert!(!prompt.contains("Acme"));
    }

    #[test]
    fn prompt_for_empty_inventory_still_forms() {
        let prompt = build_prompt(&[]);

        assert!(prompt.contains(r#"{"items":[]}"#));
    }
}
