extern crate serde_json;

use super::{error::LookupError, remote::Remote};
use crate::{
    config::judge::GRAPHQL_PATH,
    problem::{is_problem_id, Difficulty, ProblemIdentity},
};
use serde_json::{json, Value};
use std::sync::Arc;

const QUERY_QUESTION: &str = r#"
  query questionData($titleSlug: String!) {
    question(titleSlug: $titleSlug) {
      questionId
      questionFrontendId
      title
      titleSlug
      difficulty
    }
  }
"#;

/// Resolves a problem slug into the judge's canonical identity.
///
/// One call per lookup, no retry: a failed lookup simply drops the episode.
pub struct MetadataClient {
    remote: Arc<dyn Remote>,
    base_url: String,
}

fn field<'a>(question: &'a Value, name: &str, slug: &str) -> Result<&'a str, LookupError> {
    question[name]
        .as_str()
        .ok_or_else(|| LookupError::Malformed(slug.to_string(), format!("missing {}", name)))
}

impl MetadataClient {
    pub fn new(remote: Arc<dyn Remote>, base_url: &str) -> Self {
        Self {
            remote,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
    pub async fn resolve(&self, slug: &str) -> Result<ProblemIdentity, LookupError> {
        if slug.is_empty() {
            return Err(LookupError::EmptySlug);
        }
        let body = json!({
            "query": QUERY_QUESTION,
            "variables": { "titleSlug": slug },
        });
        let response = self
            .remote
            .post_json(&format!("{}{}", self.base_url, GRAPHQL_PATH), &body)
            .await
            .map_err(|e| LookupError::Transport(slug.to_string(), e))?
            .ok_or_else(|| LookupError::NoData(slug.to_string()))?;
        let question = &response["data"]["question"];
        if !question.is_object() {
            return Err(LookupError::NoData(slug.to_string()));
        }

        let id = field(question, "questionFrontendId", slug)?;
        if !is_problem_id(id) {
            return Err(LookupError::Malformed(
                slug.to_string(),
                format!("problem id {:?} is not numeric", id),
            ));
        }
        let difficulty = field(question, "difficulty", slug)?
            .parse::<Difficulty>()
            .map_err(|e| LookupError::Malformed(slug.to_string(), e))?;
        let title_slug = question["titleSlug"].as_str().unwrap_or(slug);
        Ok(ProblemIdentity {
            id: id.to_string(),
            title: field(question, "title", slug)?.to_string(),
            difficulty,
            url: format!("{}/problems/{}/", self.base_url, title_slug),
        })
    }
}
