use crate::models::{ProfileField, ScoredVehicle, UserProfile};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when requesting an explanation
#[derive(Debug, Error)]
pub enum ExplainerError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    Api(String),

    #[error("invalid response format: {0}")]
    InvalidResponse(String),
}

/// Phrases a natural-language explanation for a shortlist.
///
/// Injected wherever explanations are rendered so the deterministic core
/// never touches the network; tests swap in a canned implementation.
/// Failures surface as errors, never as a fabricated explanation.
#[async_trait]
pub trait Explainer: Send + Sync {
    async fn explain(
        &self,
        profile: &UserProfile,
        shortlist: &[ScoredVehicle],
    ) -> Result<String, ExplainerError>;
}

/// Chat-completions client for the hosted explanation model
///
/// Speaks the OpenAI-style `/chat/completions` wire shape: system prompt
/// plus one user message, first choice's content taken as the answer.
pub struct ChatExplainer {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl ChatExplainer {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        timeout_secs: u64,
    ) -> Result<Self, ExplainerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            model,
            client,
        })
    }

    /// Build the budget-aware prompt describing the user and shortlist.
    fn build_prompt(profile: &UserProfile, shortlist: &[ScoredVehicle]) -> String {
        let budget = profile.get(ProfileField::Budget).unwrap_or("unknown");

        let preferences: Vec<String> = profile
            .iter()
            .map(|(field, answer)| format!("{}: {}", field, answer))
            .collect();

        let vehicles: Vec<String> = shortlist
            .iter()
            .map(|scored| {
                format!(
                    "- {} {} ({}), MSRP {}",
                    scored.vehicle.brand,
                    scored.vehicle.model,
                    scored.vehicle.model_year,
                    scored.vehicle.msrp_range,
                )
            })
            .collect();

        format!(
            "The user is shopping for a vehicle with a budget of {}.\n\
             Their preferences: {}.\n\
             Explain why each of these vehicles is a good match. Highlight \
             size, fuel type, towing ability, tech level, and ownership \
             value, and how the MSRP fits their budget.\n{}",
            budget,
            preferences.join("; "),
            vehicles.join("\n"),
        )
    }
}

#[async_trait]
impl Explainer for ChatExplainer {
    async fn explain(
        &self,
        profile: &UserProfile,
        shortlist: &[ScoredVehicle],
    ) -> Result<String, ExplainerError> {
        let url = format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        );

        let payload = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You recommend vehicles with helpful, budget-aware summaries."
                },
                {
                    "role": "user",
                    "content": Self::build_prompt(profile, shortlist)
                }
            ]
        });

        tracing::debug!("Requesting explanation for {} vehicles", shortlist.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExplainerError::Api(format!(
                "explanation request failed: {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;

        body.get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                ExplainerError::InvalidResponse("missing choices[0].message.content".into())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn shortlist() -> Vec<ScoredVehicle> {
        vec![ScoredVehicle {
            vehicle: crate::models::VehicleRecord {
                brand: "Toyota".to_string(),
                model: "RAV4".to_string(),
                model_year: 2024,
                msrp_range: "$28,500 - $38,000".to_string(),
                msrp_min: Some(28500.0),
                msrp_max: Some(38000.0),
                vehicle_type: "SUV".to_string(),
                fuel_type: "Gas".to_string(),
                drive_type: "AWD".to_string(),
                car_size: "Midsize".to_string(),
                extras: HashMap::new(),
            },
            score: 2.7,
        }]
    }

    #[test]
    fn test_prompt_includes_budget_and_vehicles() {
        let mut profile = UserProfile::new();
        profile.set(ProfileField::Budget, "35k");
        profile.set(ProfileField::CarSize, "Midsize");

        let prompt = ChatExplainer::build_prompt(&profile, &shortlist());

        assert!(prompt.contains("budget of 35k"));
        assert!(prompt.contains("Toyota RAV4 (2024)"));
        assert!(prompt.contains("Car Size: Midsize"));
    }

    #[test]
    fn test_prompt_without_budget_says_unknown() {
        let prompt = ChatExplainer::build_prompt(&UserProfile::new(), &shortlist());
        assert!(prompt.contains("budget of unknown"));
    }

    #[tokio::test]
    async fn test_explain_parses_chat_completion() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"A great fit."}}]}"#,
            )
            .create_async()
            .await;

        let explainer =
            ChatExplainer::new(server.url(), "test-key".to_string(), "gpt-4".to_string(), 5)
                .unwrap();

        let result = explainer
            .explain(&UserProfile::new(), &shortlist())
            .await
            .unwrap();

        assert_eq!(result, "A great fit.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_explain_surfaces_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .create_async()
            .await;

        let explainer =
            ChatExplainer::new(server.url(), "test-key".to_string(), "gpt-4".to_string(), 5)
                .unwrap();

        let err = explainer
            .explain(&UserProfile::new(), &shortlist())
            .await
            .unwrap_err();

        assert!(matches!(err, ExplainerError::Api(_)));
    }

    #[tokio::test]
    async fn test_explain_rejects_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let explainer =
            ChatExplainer::new(server.url(), "test-key".to_string(), "gpt-4".to_string(), 5)
                .unwrap();

        let err = explainer
            .explain(&UserProfile::new(), &shortlist())
            .await
            .unwrap_err();

        assert!(matches!(err, ExplainerError::InvalidResponse(_)));
    }
}
