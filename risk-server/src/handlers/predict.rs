//! Prediction handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use firerisk_core::FeatureRecord;
use serde::Serialize;

use crate::{AppError, AppResult, AppState};

/// Probability at or above which a request is labelled at-risk. This is
/// the endpoint's policy; the classifier's own decision rule is separate.
pub const RISK_THRESHOLD: f64 = 0.5;

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub risk: u8,
    pub probability: f64,
    pub top_features: Vec<String>,
}

pub fn risk_label(probability: f64) -> u8 {
    u8::from(probability >= RISK_THRESHOLD)
}

/// Score a single observation.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<FeatureRecord>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(record) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let probabilities = state.service.predict_proba(&[record])?;
    let probability = probabilities
        .first()
        .copied()
        .ok_or_else(|| AppError::Internal("empty prediction batch".to_string()))?;
    let top_features = state.service.top_features()?;

    Ok(Json(PredictionResponse {
        risk: risk_label(probability),
        probability,
        top_features,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_router, AppState};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use firerisk_core::features::layout::FEATURE_NAMES;
    use firerisk_core::features::{Day, FeatureBatch, Month};
    use firerisk_core::model::forest::ForestParams;
    use firerisk_core::{artifact, ModelMetadata, ModelPipeline, ModelService};
    use http_body_util::BodyExt;
    use ndarray::Array1;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn feature_record(temp: f64, ffmc: f64, month: Month) -> FeatureRecord {
        FeatureRecord {
            ffmc,
            dmc: 26.2,
            dc: 94.3,
            isi: 5.1,
            temp,
            rh: 45.0,
            wind: 4.3,
            rain: 0.0,
            month,
            day: Day::Fri,
        }
    }

    /// Train a small model into a temp dir and serve it.
    fn loaded_state() -> (tempfile::TempDir, AppState) {
        let mut records = Vec::new();
        let mut targets = Vec::new();
        for i in 0..10 {
            let hot = i % 2 == 1;
            records.push(feature_record(
                if hot { 28.0 } else { 9.0 } + i as f64 * 0.2,
                if hot { 94.0 } else { 60.0 },
                if hot { Month::Aug } else { Month::Mar },
            ));
            targets.push(usize::from(hot));
        }
        let params = ForestParams {
            n_estimators: 8,
            max_depth: Some(4),
            min_samples_split: 2,
        };
        let pipeline = ModelPipeline::fit(
            &FeatureBatch::from_records(&records),
            &Array1::from_vec(targets),
            &params,
            11,
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        artifact::save(dir.path(), &pipeline, &ModelMetadata::new("risk", params)).unwrap();

        let service = ModelService::new();
        service.load(dir.path()).unwrap();
        (
            dir,
            AppState {
                service: Arc::new(service),
            },
        )
    }

    fn unloaded_state() -> AppState {
        AppState {
            service: Arc::new(ModelService::new()),
        }
    }

    fn example_payload() -> serde_json::Value {
        serde_json::json!({
            "FFMC": 86.2, "DMC": 26.2, "DC": 94.3, "ISI": 5.1,
            "temp": 18.0, "RH": 45, "wind": 4.3, "rain": 0.0,
            "month": "aug", "day": "fri"
        })
    }

    fn predict_request(body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn test_risk_label_threshold_boundary() {
        assert_eq!(risk_label(0.5), 1);
        assert_eq!(risk_label(0.4999999), 0);
        assert_eq!(risk_label(0.0), 0);
        assert_eq!(risk_label(1.0), 1);
    }

    #[tokio::test]
    async fn test_health_is_ok_even_without_model() {
        let app = create_router(unloaded_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json, serde_json::json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_predict_example_scenario() {
        let (_dir, state) = loaded_state();
        let app = create_router(state);

        let response = app.oneshot(predict_request(&example_payload())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        let risk = json["risk"].as_u64().unwrap();
        let probability = json["probability"].as_f64().unwrap();
        let top_features = json["top_features"].as_array().unwrap();

        assert!(risk == 0 || risk == 1);
        assert!((0.0..=1.0).contains(&probability));
        assert_eq!(risk == 1, probability >= RISK_THRESHOLD);
        assert_eq!(top_features.len(), 3);
        for name in top_features {
            let name = name.as_str().unwrap();
            assert!(FEATURE_NAMES.contains(&name), "unknown feature {name}");
        }
    }

    #[tokio::test]
    async fn test_predict_missing_field_is_client_error() {
        let (_dir, state) = loaded_state();
        let app = create_router(state);

        let mut payload = example_payload();
        payload.as_object_mut().unwrap().remove("day");

        let response = app.oneshot(predict_request(&payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("day"));
    }

    #[tokio::test]
    async fn test_predict_unknown_month_is_client_error() {
        let (_dir, state) = loaded_state();
        let app = create_router(state);

        let mut payload = example_payload();
        payload["month"] = serde_json::json!("xyz");

        let response = app.oneshot(predict_request(&payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_predict_unseen_category_still_answers() {
        let (_dir, state) = loaded_state();
        let app = create_router(state);

        // The fixture model never saw december or sunday.
        let mut payload = example_payload();
        payload["month"] = serde_json::json!("dec");
        payload["day"] = serde_json::json!("sun");

        let response = app.oneshot(predict_request(&payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        let probability = json["probability"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&probability));
    }

    #[tokio::test]
    async fn test_predict_without_model_is_service_unavailable() {
        let app = create_router(unloaded_state());
        let response = app.oneshot(predict_request(&example_payload())).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_repeated_requests_are_identical() {
        let (_dir, state) = loaded_state();

        let first = create_router(state.clone())
            .oneshot(predict_request(&example_payload()))
            .await
            .unwrap();
        let second = create_router(state)
            .oneshot(predict_request(&example_payload()))
            .await
            .unwrap();

        assert_eq!(
            response_json(first).await,
            response_json(second).await
        );
    }
}
