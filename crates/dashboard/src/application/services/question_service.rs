//! Question Service - random question sampling

use url::form_urlencoded;

use quizdash_shared::{QuestionData, RandomQuestionsQuery};

use crate::application::error::ServiceError;
use crate::ports::outbound::ApiPort;

/// Path of the random-question endpoint with its query string.
///
/// `category` is always present, empty meaning "any".
pub fn random_questions_path(query: &RandomQuestionsQuery) -> String {
    let params = form_urlencoded::Serializer::new(String::new())
        .append_pair("category", &query.category)
        .append_pair("limit", &query.limit.to_string())
        .finish();
    format!("/api/questions/random?{}", params)
}

#[derive(Clone)]
pub struct QuestionService<A: ApiPort> {
    api: A,
}

impl<A: ApiPort> QuestionService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub async fn random(&self, query: &RandomQuestionsQuery) -> Result<Vec<QuestionData>, ServiceError> {
        let questions = self.api.get(&random_questions_path(query)).await?;
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;

    use crate::application::Api;
    use crate::ports::outbound::MockRawApiPort;

    #[test]
    fn query_always_carries_category() {
        assert_eq!(
            random_questions_path(&RandomQuestionsQuery::default()),
            "/api/questions/random?category=&limit=5"
        );
        let query = RandomQuestionsQuery {
            category: "Science & Nature".into(),
            limit: 3,
        };
        assert_eq!(
            random_questions_path(&query),
            "/api/questions/random?category=Science+%26+Nature&limit=3"
        );
    }

    #[tokio::test]
    async fn random_decodes_questions() {
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json()
            .withf(|path| path.starts_with("/api/questions/random?"))
            .returning(|_| {
                Ok(json!([{"category": "Art", "question": "Who?", "options": ["A", "B"]}]))
            });

        let questions = QuestionService::new(Api::new(Arc::new(raw)))
            .random(&RandomQuestionsQuery::default())
            .await
            .unwrap();
        assert_eq!(questions[0].text, "Who?");
        assert_eq!(questions[0].options.len(), 2);
    }
}
