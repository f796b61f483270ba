mod common;
use reqwest::StatusCode;
use serde_json::json;

use crate::common::{Action, Flow, setup_server, setup_test_db};

#[tokio::test]
async fn route_reading_plan_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        // no session needed
        .step(
            Action::new("plan", "POST", "/api/reading/plan")
                .with_body(json!({ "text": "Pick it up, please." }))
                .assert_json(|body| {
                    assert_eq!(body["rate"], 1.0);
                    let words = body["words"].as_array().expect("words array");
                    let texts: Vec<_> = words.iter().map(|w| w["text"].as_str()).collect();
                    assert_eq!(texts, vec![Some("Pick"), Some("it"), Some("up,"), Some("please.")]);
                    assert_eq!(words[1]["offset"], 5);
                    // pick|it and it|up link, the comma breaks up|please
                    assert!(words[0]["link"].is_string());
                    assert!(words[1]["link"].is_string());
                    assert!(words[2]["link"].is_null());
                    assert_eq!(words[0]["start_ms"], 0);
                    assert_eq!(words[1]["start_ms"], words[0]["duration_ms"]);
                    assert_eq!(words[0]["style"]["highlight"], "pending");
                }),
        )
        .step(
            Action::new("plan_fast", "POST", "/api/reading/plan")
                .with_body(json!({ "text": "Hello there", "rate": 10.0 }))
                .assert_json(|body| assert_eq!(body["rate"], 2.0)),
        )
        .step(
            Action::new("plan_empty", "POST", "/api/reading/plan")
                .with_body(json!({ "text": "   " }))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .run(&mut server, pool)
        .await;
}
