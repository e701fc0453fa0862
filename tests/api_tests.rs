use axum::http::StatusCode;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::json;

mod common;

#[tokio::test]
async fn health_reports_connected_database() {
    let app = common::create_test_app().await;
    let (status, body) = common::get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn sequence_starts_at_first_activity() {
    let app = common::create_test_app().await;
    let (status, body) = common::get_json(&app, "/api/activity/next?moduleId=M1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["activity"]["id"], "M1_L1_Q1");
    assert_eq!(body["moduleComplete"], false);
}

#[tokio::test]
async fn sequence_walk_visits_whole_module_then_terminates() {
    let app = common::create_test_app().await;

    let mut visited = Vec::new();
    let mut last: Option<(String, String)> = None;
    loop {
        let uri = match &last {
            None => "/api/activity/next?moduleId=M1".to_string(),
            Some((id, lesson)) => format!(
                "/api/activity/next?moduleId=M1&lastActivityId={id}&lastLessonId={lesson}"
            ),
        };
        let (status, body) = common::get_json(&app, &uri).await;
        assert_eq!(status, StatusCode::OK);

        if body["activity"].is_null() {
            assert_eq!(body["moduleComplete"], true);
            break;
        }
        let id = body["activity"]["id"].as_str().unwrap().to_string();
        let lesson = body["activity"]["lessonId"].as_str().unwrap().to_string();
        assert!(!visited.contains(&id), "activity {id} served twice");
        visited.push(id.clone());
        last = Some((id, lesson));

        assert!(visited.len() <= 20, "walk did not terminate");
    }

    assert_eq!(
        visited,
        vec!["M1_L1_Q1", "M1_L1_Q2", "M1_L1_Q3", "M1_L2_Q1", "M1_L2_Q2", "M1_L3_Q1"]
    );
}

#[tokio::test]
async fn unknown_module_yields_empty_result() {
    let app = common::create_test_app().await;
    let (status, body) = common::get_json(&app, "/api/activity/next?moduleId=M99").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["activity"].is_null());
    assert_eq!(body["moduleComplete"], false);
}

#[tokio::test]
async fn recommended_returns_activity_with_default_features() {
    let app = common::create_test_app().await;
    let (status, body) = common::get_json(&app, "/api/activity/recommended").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["activity"].is_object());
    // no history: accuracy defaults to 0 so the easy reading path wins
    assert_eq!(body["recommendation"]["difficulty"], "easy");
    assert_eq!(body["features"]["avgAccuracy"], 0.0);

    // the served prediction is logged for the admin view
    let (status, body) = common::get_json(&app, "/api/admin/ml-logs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn submit_grades_against_catalog_options() {
    let app = common::create_test_app().await;

    let (status, body) = common::post_json(
        &app,
        "/api/activity/submit",
        json!({ "activityId": "M1_L1_Q1", "answer": "Pig" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isCorrect"], true);

    let (status, body) = common::post_json(
        &app,
        "/api/activity/submit",
        json!({ "activityId": "M1_L1_Q1", "answer": "Big" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isCorrect"], false);
}

#[tokio::test]
async fn submit_unknown_activity_is_not_found() {
    let app = common::create_test_app().await;
    let (status, body) = common::post_json(
        &app,
        "/api/activity/submit",
        json!({ "activityId": "M9_L9_Q9", "answer": "Pig" }),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn negative_feedback_flags_confusion() {
    let app = common::create_test_app().await;
    let (status, body) = common::post_json(
        &app,
        "/api/activity/submit",
        json!({
            "activityId": "M1_L1_Q1",
            "answer": "Big",
            "feedbackText": "this is confusing and too hard, I don't understand",
        }),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["sentimentScore"].as_f64().unwrap() < -0.3);
    assert_eq!(body["confusionDetected"], true);

    let (status, body) = common::get_json(&app, "/api/admin/nlp-logs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logs"][0]["confusionFlag"], true);
}

#[tokio::test]
async fn progress_counts_distinct_correct_activities() {
    let app = common::create_test_app().await;
    let token = common::register_user(&app, "progress@test.dev").await;

    // same activity answered correctly twice plus one wrong answer
    for answer in ["Pig", "Pig", "Big"] {
        let (status, _) = common::post_json(
            &app,
            "/api/activity/submit",
            json!({ "activityId": "M1_L1_Q1", "answer": answer }),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = common::get_json_with_token(&app, "/api/progress/modules", &token).await;
    assert_eq!(status, StatusCode::OK);
    let modules = body["modules"].as_array().unwrap();
    let m1 = modules.iter().find(|m| m["moduleId"] == "M1").unwrap();
    assert_eq!(m1["completed"], 1);
    assert_eq!(m1["total"], 6);
    assert_eq!(m1["percent"], 16.7);

    let (status, body) = common::get_json_with_token(&app, "/api/progress", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attempts"], 3);
    assert_eq!(body["correct"], 2);
    assert_eq!(body["completedActivities"], 1);
}

#[tokio::test]
async fn anonymous_progress_is_all_zeros() {
    let app = common::create_test_app().await;

    let (status, _) = common::post_json(
        &app,
        "/api/activity/submit",
        json!({ "activityId": "M1_L1_Q1", "answer": "Pig" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // the anonymous submission above must not leak into anonymous progress
    let (status, body) = common::get_json(&app, "/api/progress/modules").await;
    assert_eq!(status, StatusCode::OK);
    for module in body["modules"].as_array().unwrap() {
        assert_eq!(module["completed"], 0);
        assert_eq!(module["percent"], 0.0);
    }
}

#[tokio::test]
async fn register_login_and_duplicate_email() {
    let app = common::create_test_app().await;

    let payload = json!({
        "name": "Alex",
        "email": "alex@test.dev",
        "password": "password123",
        "neuroFlags": ["ADHD"],
    });
    let (status, body) = common::post_json(&app, "/api/auth/register", payload.clone(), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], "alex@test.dev");
    assert_eq!(body["data"]["user"]["neuroFlags"][0], "ADHD");
    assert!(body["data"]["user"].get("passwordHash").is_none());

    let (status, body) = common::post_json(&app, "/api/auth/register", payload, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, _) = common::post_json(
        &app,
        "/api/auth/login",
        json!({ "email": "alex@test.dev", "password": "password123" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = common::post_json(
        &app,
        "/api/auth/login",
        json!({ "email": "alex@test.dev", "password": "wrong" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn register_accepts_legacy_neuro_type_field() {
    let app = common::create_test_app().await;

    let (status, body) = common::post_json(
        &app,
        "/api/auth/register",
        json!({
            "name": "Sam",
            "email": "sam@test.dev",
            "password": "password123",
            "neuroType": "dyslexia",
        }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["neuroFlags"], json!(["dyslexia"]));

    // when both are sent the type folds into the flags without duplicating
    let (status, body) = common::post_json(
        &app,
        "/api/auth/register",
        json!({
            "name": "Ria",
            "email": "ria@test.dev",
            "password": "password123",
            "neuroFlags": ["ADHD", "dyslexia"],
            "neuroType": "dyslexia",
        }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["neuroFlags"], json!(["ADHD", "dyslexia"]));
}

#[tokio::test]
async fn register_validates_input() {
    let app = common::create_test_app().await;

    let (status, _) = common::post_json(
        &app,
        "/api/auth/register",
        json!({ "name": "A", "email": "not-an-email", "password": "password123" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::post_json(
        &app,
        "/api/auth/register",
        json!({ "name": "A", "email": "a@test.dev", "password": "short" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rephrase_without_provider_still_simplifies() {
    let app = common::create_test_app().await;

    let (status, body) = common::post_json(
        &app,
        "/api/rephrase",
        json!({ "question": "Match the picture to the correct word." }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usedFallback"], true);
    assert_ne!(body["simplified"], body["original"]);
}

#[tokio::test]
async fn rephrase_rejects_empty_question() {
    let app = common::create_test_app().await;
    let (status, body) =
        common::post_json(&app, "/api/rephrase", json!({ "question": "  " }), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn attention_scores_valid_png_frame() {
    let app = common::create_test_app().await;

    let mut frame = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    frame.extend(std::iter::repeat(180u8).take(200));
    let data_url = format!("data:image/png;base64,{}", BASE64.encode(&frame));

    let (status, body) =
        common::post_json(&app, "/api/attention", json!({ "frame": data_url }), None).await;
    assert_eq!(status, StatusCode::OK);
    let score = body["score"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&score));
}

#[tokio::test]
async fn attention_rejects_malformed_frames() {
    let app = common::create_test_app().await;

    let (status, body) = common::post_json(
        &app,
        "/api/attention",
        json!({ "frame": "not a frame" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let text_payload = BASE64.encode(b"plain text pretending to be an image");
    let (status, _) = common::post_json(
        &app,
        "/api/attention",
        json!({ "frame": text_payload }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analytics_summarizes_interactions_and_model_usage() {
    let app = common::create_test_app().await;

    for (answer, rating) in [("Pig", 1), ("Big", 3), ("Dig", 5)] {
        let (status, _) = common::post_json(
            &app,
            "/api/activity/submit",
            json!({
                "activityId": "M1_L1_Q1",
                "answer": answer,
                "difficultyRating": rating,
            }),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = common::get_json(&app, "/api/analytics/models").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalInteractions"], 3);
    assert_eq!(body["correct"], 1);
    assert_eq!(body["incorrect"], 2);
    assert_eq!(body["difficultyRatings"]["easy"], 1);
    assert_eq!(body["difficultyRatings"]["medium"], 1);
    assert_eq!(body["difficultyRatings"]["hard"], 1);
}

#[tokio::test]
async fn accuracy_trends_group_by_day() {
    let app = common::create_test_app().await;

    for answer in ["Pig", "Big"] {
        let (status, _) = common::post_json(
            &app,
            "/api/activity/submit",
            json!({ "activityId": "M1_L1_Q1", "answer": answer }),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = common::get_json(&app, "/api/admin/accuracy-trends?days=7").await;
    assert_eq!(status, StatusCode::OK);
    let trends = body["trends"].as_array().unwrap();
    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0]["total"], 2);
    assert_eq!(trends[0]["correct"], 1);
    assert_eq!(trends[0]["accuracy"], 0.5);
}

#[tokio::test]
async fn store_outage_degrades_reads_and_rejects_submissions() {
    let db = neuropath_backend::db::Database::connect_in_memory()
        .await
        .expect("in-memory database");
    let app = neuropath_backend::create_app(db.clone());
    db.pool().close().await;

    // writes surface the outage
    let (status, body) = common::post_json(
        &app,
        "/api/activity/submit",
        json!({ "activityId": "M1_L1_Q1", "answer": "Pig" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");

    // reads keep answering with empty aggregates
    let (status, body) = common::get_json(&app, "/api/activity/recommended").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["activity"].is_object());

    let (status, body) = common::get_json(&app, "/api/progress/modules?userId=u1").await;
    assert_eq!(status, StatusCode::OK);
    let modules = body["modules"].as_array().unwrap();
    assert!(!modules.is_empty());
    for module in modules {
        assert_eq!(module["completed"], 0);
        assert_eq!(module["percent"], 0.0);
    }

    let (status, body) = common::get_json(&app, "/api/progress?userId=u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attempts"], 0);
    assert_eq!(body["correct"], 0);

    let (status, body) = common::get_json(&app, "/api/analytics/models").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalInteractions"], 0);
    assert_eq!(body["usage"]["predictions"], 0);

    let (status, body) = common::get_json(&app, "/api/admin/ml-logs").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["logs"].as_array().unwrap().is_empty());

    let (status, body) = common::get_json(&app, "/api/admin/accuracy-trends?days=7").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["trends"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn requests_with_garbage_token_are_rejected() {
    let app = common::create_test_app().await;
    let (status, body) =
        common::get_json_with_token(&app, "/api/progress", "not-a-real-token").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}
