//! Integration tests for the interests backend.

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::Config;
use crate::db::init_database;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_psk(Some("test-api-key".to_string())).await
    }

    async fn with_psk(psk: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        let pool = init_database(&db_path).await.expect("Failed to init DB");

        let config = Config {
            api_psk: psk.clone(),
            db_path,
            seed_path: None,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
        };

        let state = AppState::new(pool, config)
            .await
            .expect("Failed to build state");
        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let mut client_builder = Client::builder();
        if let Some(key) = psk {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert("x-api-key", key.parse().unwrap());
            client_builder = client_builder.default_headers(headers);
        }

        TestFixture {
            client: client_builder.build().unwrap(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn post_json(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn put_json(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .put(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn insert_topics(&self, topics: Value) -> Value {
        let (status, body) = self.post_json("/api/topics/insert-or-ignore", topics).await;
        assert_eq!(status, 200);
        body
    }
}

fn topic(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "shortDescription": format!("About {}", name),
        "longDescription": "",
        "url": "",
        "imageUrl": format!("https://example.com/{}.svg", id),
    })
}

fn names(data: &Value) -> Vec<String> {
    data.as_array()
        .unwrap()
        .iter()
        .map(|item| {
            item.get("topic")
                .map(|t| &t["name"])
                .unwrap_or(&item["name"])
                .as_str()
                .unwrap()
                .to_string()
        })
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_router_rejects_unauthenticated_without_network() {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.sqlite");
    let pool = init_database(&db_path).await.unwrap();

    let config = Config {
        api_psk: Some("secret-key".to_string()),
        db_path,
        seed_path: None,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "warn".to_string(),
    };
    let app = create_router(AppState::new(pool, config).await.unwrap());

    let resp = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(Request::get("/api/user-data").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_missing_psk() {
    let fixture = TestFixture::with_psk(Some("secret-key".to_string())).await;

    // Request without API key
    let resp = Client::new()
        .get(fixture.url("/api/topics"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_auth_invalid_psk() {
    let fixture = TestFixture::with_psk(Some("correct-key".to_string())).await;

    let resp = Client::new()
        .get(fixture.url("/api/topics"))
        .header("x-api-key", "wrong-key")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_auth_bearer_token() {
    let fixture = TestFixture::with_psk(Some("correct-key".to_string())).await;

    let resp = Client::new()
        .get(fixture.url("/api/topics"))
        .bearer_auth("correct-key")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_auth_disabled_without_psk() {
    let fixture = TestFixture::with_psk(None).await;

    let (status, body) = fixture.get_json("/api/topics").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_topics_empty() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/topics").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["revisionId"], 0);
}

#[tokio::test]
async fn test_insert_or_ignore_reports_ignored_duplicates() {
    let fixture = TestFixture::new().await;

    let body = fixture
        .insert_topics(json!([topic("1", "Compose"), topic("2", "Testing")]))
        .await;
    let outcomes = body["data"].as_array().unwrap();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0]["outcome"], "inserted");
    assert!(outcomes[0]["rowId"].as_i64().unwrap() > 0);
    assert!(outcomes[1]["rowId"].as_i64().unwrap() > outcomes[0]["rowId"].as_i64().unwrap());

    let body = fixture
        .insert_topics(json!([topic("1", "Renamed"), topic("3", "Kotlin")]))
        .await;
    let outcomes = body["data"].as_array().unwrap();
    assert_eq!(outcomes[0]["outcome"], "ignored");
    assert_eq!(outcomes[0]["rowId"], -1);
    assert_eq!(outcomes[1]["outcome"], "inserted");

    let (_, body) = fixture.get_json("/api/topics/1").await;
    assert_eq!(body["data"]["name"], "Compose");
}

#[tokio::test]
async fn test_insert_rejects_blank_id() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post_json("/api/topics/insert-or-ignore", json!([topic(" ", "Nameless")]))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (_, body) = fixture.get_json("/api/topics").await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_upsert_replaces_existing_topic() {
    let fixture = TestFixture::new().await;
    fixture.insert_topics(json!([topic("1", "Compose")])).await;

    let (status, body) = fixture
        .put_json("/api/topics", json!([topic("1", "Jetpack Compose"), topic("2", "UI")]))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"], 2);

    let (_, body) = fixture.get_json("/api/topics").await;
    assert_eq!(names(&body["data"]), vec!["Jetpack Compose", "UI"]);
}

#[tokio::test]
async fn test_get_topic_not_found() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/topics/missing").await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_topics_ignores_unknown_ids() {
    let fixture = TestFixture::new().await;
    fixture
        .insert_topics(json!([topic("1", "Compose"), topic("2", "Testing")]))
        .await;

    let (status, _) = fixture
        .post_json("/api/topics/delete", json!({ "ids": ["1", "nope"] }))
        .await;
    assert_eq!(status, 200);

    let (_, body) = fixture.get_json("/api/topics").await;
    assert_eq!(names(&body["data"]), vec!["Testing"]);

    let (_, before) = fixture.get_json("/api/revision").await;
    let (status, after) = fixture
        .post_json("/api/topics/delete", json!({ "ids": ["nope"] }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(after["revisionId"], before["data"]["revisionId"]);
}

#[tokio::test]
async fn test_followable_topics_sorted_and_followed() {
    let fixture = TestFixture::new().await;
    fixture
        .insert_topics(json!([
            topic("1", "Zebra"),
            topic("2", "Apple"),
            topic("3", "Mango"),
        ]))
        .await;

    let (status, _) = fixture
        .put_json("/api/user-data/followed-topics/3", json!({ "followed": true }))
        .await;
    assert_eq!(status, 200);

    let (status, body) = fixture.get_json("/api/followable-topics").await;
    assert_eq!(status, 200);
    assert_eq!(names(&body["data"]), vec!["Zebra", "Apple", "Mango"]);

    let (_, body) = fixture
        .get_json("/api/followable-topics?sortBy=name")
        .await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(names(&body["data"]), vec!["Apple", "Mango", "Zebra"]);
    assert_eq!(data[0]["isFollowed"], false);
    assert_eq!(data[1]["isFollowed"], true);
    assert_eq!(data[1]["topic"]["id"], "3");
}

#[tokio::test]
async fn test_followable_topics_unknown_sort_field() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .get_json("/api/followable-topics?sortBy=popularity")
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_interests_items_mark_selection() {
    let fixture = TestFixture::new().await;
    fixture
        .insert_topics(json!([topic("1", "Compose"), topic("2", "Android")]))
        .await;
    fixture
        .put_json(
            "/api/user-data/followed-topics",
            json!({ "topicIds": ["1", "not-a-topic"] }),
        )
        .await;

    let (status, body) = fixture
        .get_json("/api/interests?sortBy=name&selectedTopicId=1")
        .await;
    assert_eq!(status, 200);

    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Android");
    assert_eq!(items[0]["isSelected"], false);
    assert_eq!(items[0]["following"], false);
    assert_eq!(items[1]["topicId"], "1");
    assert_eq!(items[1]["isSelected"], true);
    assert_eq!(items[1]["following"], true);
    assert_eq!(items[1]["description"], "About Compose");
    assert_eq!(items[1]["topicImageUrl"], "https://example.com/1.svg");
}

#[tokio::test]
async fn test_interests_previews() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/interests/previews").await;
    assert_eq!(status, 200);

    let items = body["data"].as_array().unwrap();
    assert!(!items.is_empty());
    assert!(items.iter().all(|item| item["topicId"].is_string()));
}

#[tokio::test]
async fn test_user_data_defaults() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/user-data").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["followedTopics"], json!([]));
    assert_eq!(body["data"]["themeBrand"], "DEFAULT");
    assert_eq!(body["data"]["darkThemeConfig"], "FOLLOW_SYSTEM");
    assert_eq!(body["data"]["useDynamicColor"], false);
}

#[tokio::test]
async fn test_user_data_preferences_and_resources() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .put_json(
            "/api/user-data/preferences",
            json!({ "themeBrand": "ANDROID", "darkThemeConfig": "DARK" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["themeBrand"], "ANDROID");
    assert_eq!(body["data"]["darkThemeConfig"], "DARK");
    assert_eq!(body["data"]["shouldHideOnboarding"], false);

    fixture
        .put_json("/api/user-data/bookmarks/news-1", json!({ "bookmarked": true }))
        .await;
    let (_, body) = fixture
        .put_json("/api/user-data/viewed/news-2", json!({ "viewed": true }))
        .await;
    assert_eq!(body["data"]["bookmarkedNewsResources"], json!(["news-1"]));
    assert_eq!(body["data"]["viewedNewsResources"], json!(["news-2"]));

    let (_, body) = fixture
        .put_json("/api/user-data/bookmarks/news-1", json!({ "bookmarked": false }))
        .await;
    assert_eq!(body["data"]["bookmarkedNewsResources"], json!([]));
    assert_eq!(body["data"]["themeBrand"], "ANDROID");
}

#[tokio::test]
async fn test_revision_increments_on_changes() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/revision").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["revisionId"], 0);
    assert_eq!(body["revisionId"], 0);

    let body = fixture.insert_topics(json!([topic("1", "Compose")])).await;
    assert_eq!(body["revisionId"], 1);

    // Nothing new to insert
    let body = fixture.insert_topics(json!([topic("1", "Compose")])).await;
    assert_eq!(body["revisionId"], 1);

    let (_, body) = fixture
        .put_json("/api/user-data/followed-topics/1", json!({ "followed": true }))
        .await;
    assert_eq!(body["revisionId"], 2);

    // Following again leaves the record unchanged
    let (_, body) = fixture
        .put_json("/api/user-data/followed-topics/1", json!({ "followed": true }))
        .await;
    assert_eq!(body["revisionId"], 2);

    let (_, body) = fixture.get_json("/api/revision").await;
    assert_eq!(body["data"]["revisionId"], 2);
}
