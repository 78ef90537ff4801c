//! HTTP routes
//!
//! Thin handlers over [`Store`]. Each request runs exactly one engine
//! operation on the blocking pool; handlers hold no state of their own.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post, MethodRouter};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use markstash_core::{
    BookmarkFields, BookmarkKey, BookmarkPatch, SaveAction, SearchQuery, Store,
};

use crate::cors::cors;
use crate::error::ApiError;

type ApiResult<T> = Result<T, ApiError>;

/// Build the application router
pub fn router(store: Store) -> Router {
    Router::new()
        .route("/ping", only(get(ping)))
        .route("/api/save", only(post(save)))
        .route("/api/bookmarks", only(get(list_bookmarks)))
        .route("/api/update", only(post(update)))
        .route("/api/update/*key", only(post(update_by_path)))
        .route("/api/delete", only(post(delete)))
        .route("/api/categories/list", only(get(list_categories)))
        .route("/api/categories/save", only(post(save_category)))
        .route("/api/domain/categories", only(get(domain_categories)))
        .route("/api/domain/tags", only(get(domain_tags)))
        .route("/api/stats", only(get(stats)))
        .route("/api/search", only(get(search)))
        .fallback(not_found)
        .with_state(store)
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
}

/// Answer unlisted methods with a JSON 405
fn only(route: MethodRouter<Store>) -> MethodRouter<Store> {
    route.fallback(method_not_allowed)
}

async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Not Found")
}

async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

/// Run one engine call off the async runtime
async fn run<T, F>(store: &Store, op: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&Store) -> markstash_core::Result<T> + Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| ApiError::internal(format!("Engine task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Parse a JSON request body, reporting failures as a 400
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))
}

/// Report an unparseable query string as a JSON 400
fn bad_query(rejection: QueryRejection) -> ApiError {
    ApiError::bad_request(rejection.body_text())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ==================== Requests ====================

#[derive(Debug, Deserialize)]
struct SaveRequest {
    #[serde(default)]
    url: Option<String>,
    #[serde(flatten)]
    fields: BookmarkFields,
}

#[derive(Debug, Deserialize)]
struct UpdateRequest {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(flatten)]
    patch: BookmarkPatch,
}

impl UpdateRequest {
    /// `(domain, path)` wins over `key` when both are present
    fn bookmark_key(&self) -> ApiResult<BookmarkKey> {
        let domain = non_empty(self.domain.clone());
        let path = non_empty(self.path.clone());
        if let (Some(domain), Some(path)) = (domain, path) {
            return Ok(BookmarkKey::new(domain, path));
        }

        match non_empty(self.key.clone()) {
            Some(key) => Ok(BookmarkKey::parse(&key)?),
            None => Err(ApiError::bad_request("Missing key")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeleteRequest {
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryRequest {
    #[serde(default)]
    parent_category: Option<String>,
    #[serde(default)]
    sub_category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DomainFilter {
    #[serde(default)]
    domain: Option<String>,
}

impl DomainFilter {
    fn domain(self) -> Option<String> {
        non_empty(self.domain)
    }
}

// ==================== Responses ====================

#[derive(Debug, Serialize)]
struct SaveResponse {
    success: bool,
    domain: String,
    path: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct UpdateResponse {
    success: bool,
    key: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    success: bool,
    message: String,
}

// ==================== Handlers ====================

async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn save(State(store): State<Store>, body: Bytes) -> ApiResult<Json<SaveResponse>> {
    const CONTEXT: &str = "Failed to save bookmark";

    let request: SaveRequest = parse_body(&body).map_err(|e| e.into_internal(CONTEXT))?;
    let url = request.url.unwrap_or_default();

    let saved = run(&store, move |store| store.save(&url, request.fields))
        .await
        .map_err(|e| e.into_internal(CONTEXT))?;

    Ok(Json(SaveResponse {
        success: true,
        domain: saved.key.domain,
        path: saved.key.path,
        message: match saved.action {
            SaveAction::Inserted => "Bookmark saved",
            SaveAction::Updated => "Bookmark updated",
        }
        .to_string(),
    }))
}

async fn list_bookmarks(
    State(store): State<Store>,
    filter: Result<Query<DomainFilter>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(filter) = filter.map_err(bad_query)?;
    match filter.domain() {
        Some(domain) => {
            let bookmarks = run(&store, move |store| store.list(&domain)).await?;
            Ok(Json(json!(bookmarks)))
        }
        None => {
            let all = run(&store, |store| store.list_all()).await?;
            Ok(Json(json!(all)))
        }
    }
}

async fn update(State(store): State<Store>, body: Bytes) -> ApiResult<Json<UpdateResponse>> {
    let request: UpdateRequest = parse_body(&body)?;
    let key = request.bookmark_key()?;
    apply_update(store, key, request.patch).await
}

async fn update_by_path(
    State(store): State<Store>,
    Path(key): Path<String>,
    body: Bytes,
) -> ApiResult<Json<UpdateResponse>> {
    let patch: BookmarkPatch = if body.is_empty() {
        BookmarkPatch::default()
    } else {
        parse_body(&body)?
    };
    let key = BookmarkKey::parse(&key)?;
    apply_update(store, key, patch).await
}

async fn apply_update(
    store: Store,
    key: BookmarkKey,
    patch: BookmarkPatch,
) -> ApiResult<Json<UpdateResponse>> {
    let target = key.clone();
    run(&store, move |store| store.update(&target, patch)).await?;

    Ok(Json(UpdateResponse {
        success: true,
        key: key.to_string(),
        message: "Bookmark updated".to_string(),
    }))
}

async fn delete(State(store): State<Store>, body: Bytes) -> ApiResult<Json<DeleteResponse>> {
    let request: DeleteRequest = parse_body(&body)?;
    let (domain, path) = match (non_empty(request.domain), non_empty(request.path)) {
        (Some(domain), Some(path)) => (domain, path),
        _ => return Err(ApiError::bad_request("Missing domain or path")),
    };

    let key = BookmarkKey::new(domain, path);
    run(&store, move |store| store.delete(&key)).await?;

    Ok(Json(DeleteResponse {
        success: true,
        message: "Bookmark deleted".to_string(),
    }))
}

async fn list_categories(State(store): State<Store>) -> Json<Value> {
    let categories = run(&store, |store| store.categories_list()).await;
    or_empty(categories, "categories/list")
}

async fn save_category(State(store): State<Store>, body: Bytes) -> ApiResult<Json<Value>> {
    const CONTEXT: &str = "Failed to save category";

    let request: CategoryRequest = parse_body(&body).map_err(|e| e.into_internal(CONTEXT))?;
    let parent = request.parent_category.unwrap_or_default();
    let sub = request.sub_category;

    let category = run(&store, move |store| {
        store.save_category(&parent, sub.as_deref())
    })
    .await
    .map_err(|e| e.into_internal(CONTEXT))?;

    Ok(Json(json!({
        "success": true,
        "categories": category,
        "message": "Category saved",
    })))
}

async fn domain_categories(
    State(store): State<Store>,
    filter: Result<Query<DomainFilter>, QueryRejection>,
) -> Json<Value> {
    let filter = match filter {
        Ok(Query(filter)) => filter,
        Err(rejection) => {
            return or_empty::<Value>(Err(bad_query(rejection)), "domain/categories");
        }
    };
    let categories = match filter.domain() {
        Some(domain) => run(&store, move |store| store.domain_categories(&domain)).await,
        None => run(&store, |store| store.categories_list()).await,
    };
    or_empty(categories, "domain/categories")
}

async fn domain_tags(
    State(store): State<Store>,
    filter: Result<Query<DomainFilter>, QueryRejection>,
) -> Json<Value> {
    let filter = match filter {
        Ok(Query(filter)) => filter,
        Err(rejection) => {
            return or_empty::<Value>(Err(bad_query(rejection)), "domain/tags");
        }
    };
    let tags = match filter.domain() {
        Some(domain) => run(&store, move |store| store.domain_tags(&domain)).await,
        None => run(&store, |store| store.tags()).await,
    };
    or_empty(tags, "domain/tags")
}

async fn stats(State(store): State<Store>) -> ApiResult<Json<Value>> {
    let stats = run(&store, |store| store.stats()).await?;
    Ok(Json(json!(stats)))
}

async fn search(
    State(store): State<Store>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(query) = query.map_err(bad_query)?;
    debug!(?query, "Search request");
    let results = run(&store, move |store| store.search(&query)).await?;
    Ok(Json(json!(results)))
}

/// Downgrade a failed listing to an empty array
fn or_empty<T: Serialize>(result: ApiResult<Vec<T>>, endpoint: &str) -> Json<Value> {
    match result {
        Ok(items) => Json(json!(items)),
        Err(err) => {
            warn!(endpoint, error = %err.message, "Listing failed; returning empty array");
            Json(json!([]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use axum::response::Response;
    use tower::ServiceExt;

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn save_bookmark(app: &Router, body: Value) {
        let response = send(app, Method::POST, "/api/save", Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    fn app() -> (Store, Router) {
        let store = Store::in_memory();
        (store.clone(), router(store))
    }

    #[tokio::test]
    async fn test_ping() {
        let (_, app) = app();
        let response = send(&app, Method::GET, "/ping", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(json_body(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_save_then_list_domain() {
        let (_, app) = app();

        let response = send(
            &app,
            Method::POST,
            "/api/save",
            Some(json!({ "url": "https://a.com/p", "title": "T1", "tags": ["x", "y"] })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["domain"], "a.com");
        assert_eq!(body["path"], "/p");
        assert_eq!(body["message"], "Bookmark saved");

        let response = send(
            &app,
            Method::POST,
            "/api/save",
            Some(json!({ "url": "https://a.com/p", "title": "T2" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["message"], "Bookmark updated");

        let response = send(&app, Method::GET, "/api/bookmarks?domain=a.com", None).await;
        let body = json_body(response).await;
        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["title"], "T2");
        assert_eq!(records[0]["path"], "/p");
    }

    #[tokio::test]
    async fn test_save_accepts_null_and_loose_tags() {
        let (store, app) = app();

        save_bookmark(
            &app,
            json!({ "url": "https://a.com/p", "title": "T", "tags": null }),
        )
        .await;
        save_bookmark(
            &app,
            json!({ "url": "https://a.com/q", "title": null, "tags": "x" }),
        )
        .await;

        let records = store.list("a.com").unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.tags.is_empty()));
        assert_eq!(records[1].title, "");
        assert!(store.tags().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_query_strings() {
        let (_, app) = app();
        save_bookmark(
            &app,
            json!({ "url": "https://a.com/1", "title": "One", "tags": ["x"] }),
        )
        .await;

        for uri in [
            "/api/domain/tags?domain=a.com&domain=b.com",
            "/api/domain/categories?domain=a.com&domain=b.com",
        ] {
            let response = send(&app, Method::GET, uri, None).await;
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
            assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
            assert_eq!(json_body(response).await, json!([]), "{}", uri);
        }

        for uri in [
            "/api/bookmarks?domain=a.com&domain=b.com",
            "/api/search?q=a&q=b",
        ] {
            let response = send(&app, Method::GET, uri, None).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
            assert!(json_body(response).await["error"].is_string(), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_save_failures_are_500() {
        let (_, app) = app();

        let response = send(&app, Method::POST, "/api/save", Some(json!({ "title": "T" }))).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("url"));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/save")
            .body(Body::from("not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_list_all_and_delete_cascade() {
        let (_, app) = app();
        save_bookmark(&app, json!({ "url": "https://a.com/p", "title": "A" })).await;
        save_bookmark(&app, json!({ "url": "https://b.com/p", "title": "B" })).await;

        let response = send(
            &app,
            Method::POST,
            "/api/delete",
            Some(json!({ "domain": "a.com", "path": "/p" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["success"], true);

        let response = send(&app, Method::GET, "/api/bookmarks", None).await;
        let body = json_body(response).await;
        let domains: Vec<&String> = body.as_object().unwrap().keys().collect();
        assert_eq!(domains, vec!["b.com"]);
    }

    #[tokio::test]
    async fn test_delete_errors() {
        let (_, app) = app();

        let response = send(
            &app,
            Method::POST,
            "/api/delete",
            Some(json!({ "domain": "a.com" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            Method::POST,
            "/api/delete",
            Some(json!({ "domain": "a.com", "path": "/missing" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_update_by_domain_path_and_key() {
        let (store, app) = app();
        save_bookmark(&app, json!({ "url": "https://a.com/p?x=1", "title": "Old" })).await;

        let response = send(
            &app,
            Method::POST,
            "/api/update",
            Some(json!({ "domain": "a.com", "path": "/p?x=1", "title": "New" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["key"], "a.com/p?x=1");

        let response = send(
            &app,
            Method::POST,
            "/api/update",
            Some(json!({ "key": "https://a.com/p?x=1", "tags": ["later"] })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let record = &store.list("a.com").unwrap()[0];
        assert_eq!(record.title, "New");
        assert_eq!(record.tags, vec!["later"]);
        assert_eq!(store.tags().unwrap()[0].tag, "later");
    }

    #[tokio::test]
    async fn test_update_key_in_path() {
        let (store, app) = app();
        save_bookmark(&app, json!({ "url": "https://a.com/docs", "title": "Old" })).await;

        let response = send(
            &app,
            Method::POST,
            "/api/update/a.com/docs",
            Some(json!({ "title": "New" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.list("a.com").unwrap()[0].title, "New");
    }

    #[tokio::test]
    async fn test_update_errors() {
        let (_, app) = app();

        let response = send(
            &app,
            Method::POST,
            "/api/update",
            Some(json!({ "title": "x" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Missing key");

        let response = send(
            &app,
            Method::POST,
            "/api/update",
            Some(json!({ "key": "a.com/nothing", "title": "x" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/update")
            .body(Body::from("{"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_categories_save_and_list() {
        let (_, app) = app();

        for sub in ["Go", "Rust", "Go"] {
            let response = send(
                &app,
                Method::POST,
                "/api/categories/save",
                Some(json!({ "parentCategory": "Dev", "subCategory": sub })),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = send(&app, Method::GET, "/api/categories/list", None).await;
        let body = json_body(response).await;
        let categories = body.as_array().unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0]["name"], "Dev");
        let subs: Vec<&str> = categories[0]["subcategories"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap())
            .collect();
        assert_eq!(subs, vec!["Go", "Rust"]);

        let response = send(
            &app,
            Method::POST,
            "/api/categories/save",
            Some(json!({ "subCategory": "Go" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_domain_views() {
        let (_, app) = app();
        save_bookmark(
            &app,
            json!({
                "url": "https://a.com/1",
                "title": "One",
                "tags": ["x", "y"],
                "parentCategory": "Dev",
                "subCategory": "Go"
            }),
        )
        .await;
        save_bookmark(
            &app,
            json!({ "url": "https://a.com/2", "title": "Two", "tags": ["y"] }),
        )
        .await;

        let response = send(&app, Method::GET, "/api/domain/tags?domain=a.com", None).await;
        assert_eq!(
            json_body(response).await,
            json!([{ "tag": "y", "count": 2 }, { "tag": "x", "count": 1 }])
        );

        let response = send(&app, Method::GET, "/api/domain/tags", None).await;
        assert_eq!(
            json_body(response).await,
            json!([{ "tag": "x", "count": 1 }, { "tag": "y", "count": 1 }])
        );

        let response = send(
            &app,
            Method::GET,
            "/api/domain/categories?domain=a.com",
            None,
        )
        .await;
        assert_eq!(
            json_body(response).await,
            json!([{ "name": "Dev", "subcategories": [{ "name": "Go" }] }])
        );
    }

    #[tokio::test]
    async fn test_listing_failures_fall_back_to_empty() {
        let (store, app) = app();
        store.backend().put("tags", "{broken").unwrap();
        store.backend().put("category:Dev", "{broken").unwrap();

        for uri in [
            "/api/domain/tags",
            "/api/categories/list",
            "/api/domain/categories",
        ] {
            let response = send(&app, Method::GET, uri, None).await;
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
            assert_eq!(json_body(response).await, json!([]), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_stats() {
        let (_, app) = app();
        save_bookmark(
            &app,
            json!({ "url": "https://a.com/1", "title": "One", "tags": ["x"] }),
        )
        .await;

        let response = send(&app, Method::GET, "/api/stats", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["domains"], 1);
        assert_eq!(body["bookmarks"], 1);
        assert_eq!(body["tags"], 1);
        assert_eq!(body["topDomains"][0]["domain"], "a.com");
        assert!(body["topDomains"][0]["lastUpdated"].is_i64());
        assert_eq!(body["recentBookmarks"][0]["domain"], "a.com");
        assert_eq!(body["recentBookmarks"][0]["path"], "/1");
    }

    #[tokio::test]
    async fn test_stats_corruption_is_500() {
        let (store, app) = app();
        store.backend().put("domain:a.com", "[{").unwrap();

        let response = send(&app, Method::GET, "/api/stats", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_search() {
        let (_, app) = app();
        save_bookmark(
            &app,
            json!({ "url": "https://a.com/1", "title": "Rust Book", "tags": ["lang"] }),
        )
        .await;
        save_bookmark(
            &app,
            json!({ "url": "https://b.com/1", "title": "Cooking", "tags": ["food"] }),
        )
        .await;

        let response = send(&app, Method::GET, "/api/search?q=rUsT", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["results"][0]["domain"], "a.com");
        assert_eq!(body["results"][0]["title"], "Rust Book");

        let response = send(&app, Method::GET, "/api/search?tag=food", None).await;
        assert_eq!(json_body(response).await["results"][0]["domain"], "b.com");

        let response = send(&app, Method::GET, "/api/search", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_sqlite_backed_router_persists() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = markstash_core::Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };

        let app = router(Store::open(&config).unwrap());
        save_bookmark(&app, json!({ "url": "https://a.com/kept", "title": "Kept" })).await;
        drop(app);

        let app = router(Store::open(&config).unwrap());
        let response = send(&app, Method::GET, "/api/bookmarks?domain=a.com", None).await;
        assert_eq!(json_body(response).await[0]["title"], "Kept");
    }

    #[tokio::test]
    async fn test_preflight_and_unknown_routes() {
        let (_, app) = app();

        let response = send(&app, Method::OPTIONS, "/api/save", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers()["access-control-allow-methods"],
            "GET, POST, OPTIONS"
        );

        let response = send(&app, Method::GET, "/nope", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(json_body(response).await, json!({ "error": "Not Found" }));

        let response = send(&app, Method::GET, "/api/save", None).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(json_body(response).await["error"].is_string());
    }
}
