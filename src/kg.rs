use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::config::KgConfig;

/// Reply used when the search returns no usable result.
pub const NO_ANSWER: &str = "Sorry, I could not find an answer to your question.";

const DEFAULT_NAME: &str = "Unknown";
const DEFAULT_DESCRIPTION: &str = "No description available.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    item_list_element: Vec<ItemElement>,
}

#[derive(Debug, Deserialize)]
struct ItemElement {
    result: Option<Entity>,
}

#[derive(Debug, Deserialize)]
struct Entity {
    name: Option<String>,
    description: Option<String>,
    url: Option<String>,
}

/// Resolve the first result into the reply text, substituting defaults for
/// absent fields. The first-item-or-fallback branch is decided here once;
/// callers never inspect the response themselves.
pub fn format_answer(response: &SearchResponse) -> String {
    let entity = response
        .item_list_element
        .first()
        .and_then(|item| item.result.as_ref());

    match entity {
        Some(entity) => {
            let name = entity.name.as_deref().unwrap_or(DEFAULT_NAME);
            let description = entity
                .description
                .as_deref()
                .unwrap_or(DEFAULT_DESCRIPTION);
            let url = entity.url.as_deref().unwrap_or("");
            format!("{}: {}\n{}", name, description, url)
        }
        None => NO_ANSWER.to_string(),
    }
}

pub struct KgClient {
    client: reqwest::Client,
    config: KgConfig,
}

impl KgClient {
    pub fn new(config: KgConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Look up `query` in the knowledge graph and produce the reply text.
    pub async fn get_answer(&self, query: &str) -> Result<String> {
        let url = self.config.effective_base_url();

        debug!("Searching knowledge graph for: {}", query);

        let response = self
            .client
            .get(url)
            .query(&[
                ("query", query),
                ("key", self.config.api_key.as_str()),
                ("limit", "1"),
                ("indent", "true"),
            ])
            .send()
            .await
            .context("Failed to send request to the Knowledge Graph API")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Knowledge Graph API error ({}): {}", status, error_body);
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .context("Failed to parse Knowledge Graph response")?;

        Ok(format_answer(&search_response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> SearchResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_full_result_formatted() {
        let response = parse(
            r#"{"itemListElement":[{"result":{"name":"Test","description":"A test entity","url":"http://example.com"}}]}"#,
        );
        assert_eq!(
            format_answer(&response),
            "Test: A test entity\nhttp://example.com"
        );
    }

    #[test]
    fn test_empty_body_falls_back() {
        assert_eq!(format_answer(&parse("{}")), NO_ANSWER);
    }

    #[test]
    fn test_empty_item_list_falls_back() {
        assert_eq!(format_answer(&parse(r#"{"itemListElement":[]}"#)), NO_ANSWER);
    }

    #[test]
    fn test_item_without_result_falls_back() {
        assert_eq!(format_answer(&parse(r#"{"itemListElement":[{}]}"#)), NO_ANSWER);
    }

    #[test]
    fn test_missing_description_substituted() {
        let response = parse(
            r#"{"itemListElement":[{"result":{"name":"Test","url":"http://example.com"}}]}"#,
        );
        assert_eq!(
            format_answer(&response),
            "Test: No description available.\nhttp://example.com"
        );
    }

    #[test]
    fn test_missing_name_substituted() {
        let response = parse(r#"{"itemListElement":[{"result":{"description":"A test entity"}}]}"#);
        assert_eq!(format_answer(&response), "Unknown: A test entity\n");
    }

    #[test]
    fn test_missing_url_leaves_empty_line() {
        let response = parse(
            r#"{"itemListElement":[{"result":{"name":"Test","description":"A test entity"}}]}"#,
        );
        assert_eq!(format_answer(&response), "Test: A test entity\n");
    }

    #[test]
    fn test_only_first_item_consulted() {
        let response = parse(
            r#"{"itemListElement":[
                {"result":{"name":"First","description":"Primary","url":"http://first.example"}},
                {"result":{"name":"Second","description":"Ignored","url":"http://second.example"}}
            ]}"#,
        );
        assert_eq!(
            format_answer(&response),
            "First: Primary\nhttp://first.example"
        );
    }
}
