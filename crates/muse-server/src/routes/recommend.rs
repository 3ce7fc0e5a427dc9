//! Backend recommendation endpoint.

use axum::Json;
use serde::{Deserialize, Serialize};

use muse_core::{recommend, BackendId};

#[derive(Debug, Deserialize)]
pub struct RecommendBody {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationDto {
    pub id: BackendId,
    pub name: String,
    pub score: f64,
    /// Contributing reasons, joined for display.
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<RecommendationDto>,
    #[serde(rename = "detectedFeatures")]
    pub detected_features: Vec<String>,
}

/// Scoring is pure and CPU-only; no backend is contacted here.
pub async fn recommend_backend(Json(body): Json<RecommendBody>) -> Json<RecommendResponse> {
    let ranking = recommend(&body.prompt);

    Json(RecommendResponse {
        recommendations: ranking
            .scores
            .into_iter()
            .map(|score| RecommendationDto {
                id: score.backend,
                name: score.name,
                score: score.score,
                reason: score.reasons.join("; "),
            })
            .collect(),
        detected_features: ranking.features,
    })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::tests::{post_json, test_app};

    #[tokio::test]
    async fn test_roleplay_prompt_ranked() {
        let app = test_app(Ok("unused".to_string()));
        let (status, body) = post_json(
            app,
            "/recommend-backend",
            json!({"prompt": "You are a pirate, speak like one"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let features: Vec<&str> = body["detectedFeatures"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(features.contains(&"roleplay"));

        let top = &body["recommendations"][0];
        assert_eq!(top["id"], "unity");
        assert!(top["reason"].as_str().unwrap().contains("persona"));
    }

    #[tokio::test]
    async fn test_empty_prompt_gets_defaults() {
        let app = test_app(Ok("unused".to_string()));
        let (status, body) = post_json(app, "/recommend-backend", json!({"prompt": ""})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["detectedFeatures"], json!(["general"]));
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 3);
        assert_eq!(body["recommendations"][0]["id"], "openai");
        assert_eq!(body["recommendations"][0]["score"], 0.6);
    }

    #[tokio::test]
    async fn test_missing_prompt_is_client_error() {
        let app = test_app(Ok("unused".to_string()));
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/recommend-backend")
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from("{}"))
            .unwrap();

        let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
