use std::future::IntoFuture;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};

use wc22_dashboard::bindings::Dashboard;
use wc22_dashboard::dataset::load_dataset;
use wc22_dashboard::derive::Quirks;
use wc22_dashboard::server::{AppState, router};

fn test_server() -> TestServer {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("matches.csv");
    let data = load_dataset(&path).expect("fixture should load");
    let dash = Dashboard::with_defaults(Arc::new(data), Quirks::default()).unwrap();
    TestServer::new(router(AppState::new(dash))).unwrap()
}

#[tokio::test]
async fn index_serves_dashboard_page() {
    let server = test_server();
    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains("Fifa World Cup Match Analysis"));
    assert!(html.contains("id=\"goalsprevented-chart\""));
}

#[tokio::test]
async fn options_list_every_match() {
    let server = test_server();
    let response = server.get("/api/options").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body.as_array().map(|a| a.len()), Some(4));
    assert_eq!(body[0]["label"], "Qatar vs Ecuador");
    assert_eq!(body[3]["value"], 3);
}

#[tokio::test]
async fn view_reports_initial_selection() {
    let server = test_server();
    let response = server.get("/api/view").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["selection"], 0);
    assert_eq!(body["slots"]["card2"]["text"], "Ecuador");
    assert_eq!(body["slots"]["score-card1"]["text"], "0 : ");
    assert_eq!(body["slots"]["pie-chart"]["type"], "chart");
    assert_eq!(body["slots"]["pie-chart"]["chart"]["kind"], "donut");
    assert_eq!(body["slots"]["bar-chart"]["chart"]["kind"], "stacked_bar");
}

#[tokio::test]
async fn selection_updates_shared_view() {
    let server = test_server();
    let response = server
        .post("/api/selection")
        .json(&json!({ "index": 2 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["selection"], 2);
    assert_eq!(body["slots"]["card1"]["text"], "Senegal");

    let view = server.get("/api/view").await.json::<Value>();
    assert_eq!(view["generation"], body["generation"]);
    assert_eq!(view["slots"]["card2"]["text"], "Netherlands");
}

#[tokio::test]
async fn out_of_range_selection_is_unprocessable() {
    let server = test_server();
    let before = server.get("/api/view").await.json::<Value>();

    let response = server
        .post("/api/selection")
        .json(&json!({ "index": 99 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json::<Value>();
    assert_eq!(body["status"], 422);
    assert!(body["error"].as_str().unwrap().contains("out of range"));

    let after = server.get("/api/view").await.json::<Value>();
    assert_eq!(before, after);
}

#[tokio::test]
async fn bindings_and_health_are_inspectable() {
    let server = test_server();
    let response = server.get("/api/bindings").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let bindings = response.json::<Value>();
    assert_eq!(bindings[0]["name"], "team_labels");
    assert_eq!(bindings[0]["inputs"][0], "selection");
    assert_eq!(bindings[0]["outputs"][0], "card2");

    let health = server.get("/api/health").await.json::<Value>();
    assert_eq!(health["rows"], 4);
    assert!(health["data_path"].as_str().unwrap().ends_with("matches.csv"));
}

// (team1, team2, attempts1, attempts2) per fixture row.
const FIXTURE_ROWS: [(&str, &str, i64, i64); 4] = [
    ("Qatar", "Ecuador", 8, 10),
    ("England", "Iran", 13, 8),
    ("Senegal", "Netherlands", 14, 10),
    ("United States", "Wales", 6, 7),
];

fn assert_single_row(snapshot: &Value) {
    let row = snapshot["selection"].as_u64().unwrap() as usize;
    let (team1, team2, attempts1, attempts2) = FIXTURE_ROWS[row];
    let slots = &snapshot["slots"];
    let attempts = &slots["pie-chart"]["chart"]["slices"];
    assert_eq!(attempts[0]["value"], attempts1);
    assert_eq!(attempts[1]["value"], attempts2);
    assert_eq!(slots["card1"]["text"], team1);
    assert_eq!(slots["card2"]["text"], team2);
    for chart in [
        "pie-chart",
        "possession-chart",
        "fouls-chart",
        "freekick-chart",
        "goalsprevented-chart",
    ] {
        assert_eq!(slots[chart]["chart"]["slices"][0]["label"], team1, "{chart}");
        assert_eq!(slots[chart]["chart"]["slices"][1]["label"], team2, "{chart}");
    }
    assert_eq!(slots["bar-chart"]["chart"]["categories"], json!([team1, team2]));
}

#[tokio::test]
async fn concurrent_selections_leave_one_complete_snapshot() {
    let server = test_server();

    let (a, b, c) = tokio::join!(
        server
            .post("/api/selection")
            .json(&json!({ "index": 1 }))
            .into_future(),
        server
            .post("/api/selection")
            .json(&json!({ "index": 2 }))
            .into_future(),
        server
            .post("/api/selection")
            .json(&json!({ "index": 3 }))
            .into_future(),
    );

    let responses = [a, b, c]
        .into_iter()
        .map(|r| {
            assert_eq!(r.status_code(), StatusCode::OK);
            r.json::<Value>()
        })
        .collect::<Vec<_>>();
    for snapshot in &responses {
        assert_single_row(snapshot);
    }

    let mut generations = responses
        .iter()
        .map(|r| r["generation"].as_u64().unwrap())
        .collect::<Vec<_>>();
    generations.sort_unstable();
    generations.dedup();
    assert_eq!(generations.len(), 3, "each cycle gets its own generation");

    let view = server.get("/api/view").await.json::<Value>();
    assert_single_row(&view);
    let latest = responses
        .iter()
        .max_by_key(|r| r["generation"].as_u64().unwrap())
        .unwrap();
    assert_eq!(&view, latest);
}
