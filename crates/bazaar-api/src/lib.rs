//! JSON REST API for Bazaar.
//!
//! Exposes an axum [`Router`] backed by any [`bazaar_core::store::ItemStore`]
//! and an [`ImageDir`]. CORS, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(bazaar_api::api_router(store.clone(), ImageDir::new("images")))
//! ```

pub mod categories;
pub mod error;
pub mod images;
pub mod items;
pub mod search;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::get,
};
use bazaar_core::store::ItemStore;

pub use error::ApiError;
pub use images::ImageDir;

/// Largest accepted request body; bounds image uploads.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct ApiState<S: ItemStore> {
  pub store:  Arc<S>,
  pub images: Arc<ImageDir>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, images: ImageDir) -> Router<()>
where
  S: ItemStore + Clone + Send + Sync + 'static,
{
  let state = ApiState { store, images: Arc::new(images) };

  Router::new()
    .route("/", get(items::root))
    // Items
    .route("/items", get(items::list::<S>).post(items::create::<S>))
    .route("/items/{item_id}", get(items::get_one::<S>))
    // Search
    .route("/search", get(search::handler::<S>))
    // Categories
    .route("/categories", get(categories::list::<S>))
    // Images
    .route("/image/{image_name}", get(images::get_one::<S>))
    .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use bazaar_core::{image::derive_image_name, policy::DuplicatePolicy};
  use bazaar_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tempfile::TempDir;
  use tower::ServiceExt as _;

  const BOUNDARY: &str = "bazaar-test-boundary";

  struct Harness {
    router: Router,
    images: TempDir,
  }

  async fn harness_with(policy: DuplicatePolicy) -> Harness {
    let store = SqliteStore::open_in_memory()
      .await
      .unwrap()
      .with_duplicate_policy(policy);
    let images = tempfile::tempdir().unwrap();
    let router = api_router(Arc::new(store), ImageDir::new(images.path()));
    Harness { router, images }
  }

  async fn harness() -> Harness { harness_with(DuplicatePolicy::Ignore).await }

  fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
      body.extend_from_slice(
        format!(
          "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .as_bytes(),
      );
    }
    if let Some((filename, bytes)) = image {
      body.extend_from_slice(
        format!(
          "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: image/jpeg\r\n\r\n"
        )
        .as_bytes(),
      );
      body.extend_from_slice(bytes);
      body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
  }

  async fn send(h: &Harness, req: Request<Body>) -> Response {
    h.router.clone().oneshot(req).await.unwrap()
  }

  async fn get(h: &Harness, uri: &str) -> Response {
    send(h, Request::get(uri).body(Body::empty()).unwrap()).await
  }

  async fn post_item(
    h: &Harness,
    name: &str,
    category: &str,
    filename: &str,
    bytes: &[u8],
  ) -> Response {
    let body = multipart_body(
      &[("name", name), ("category", category)],
      Some((filename, bytes)),
    );
    let req = Request::post("/items")
      .header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
      )
      .body(Body::from(body))
      .unwrap();
    send(h, req).await
  }

  async fn body_bytes(resp: Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap()
      .to_vec()
  }

  async fn body_json(resp: Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
  }

  // ── Root ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn root_says_hello() {
    let h = harness().await;
    let resp = get(&h, "/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({ "message": "Hello, world!" }));
  }

  // ── POST /items ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn post_item_stores_item_and_image() {
    let h = harness().await;

    let resp = post_item(&h, "shirt", "clothes", "cat.jpg", b"jpeg bytes").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({ "message": "item received: shirt" }));

    let image_name = derive_image_name("cat.jpg");
    let resp = get(&h, "/items").await;
    assert_eq!(
      body_json(resp).await,
      json!({ "items": [{ "name": "shirt", "category": "clothes", "image_name": image_name }] })
    );

    let on_disk = std::fs::read(h.images.path().join(&image_name)).unwrap();
    assert_eq!(on_disk, b"jpeg bytes");
  }

  #[tokio::test]
  async fn post_item_without_category_is_bad_request() {
    let h = harness().await;
    let body = multipart_body(&[("name", "shirt")], Some(("cat.jpg", b"x")));
    let req = Request::post("/items")
      .header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
      )
      .body(Body::from(body))
      .unwrap();

    let resp = send(&h, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(get(&h, "/items").await).await["items"]
      .as_array()
      .unwrap()
      .is_empty());
  }

  #[tokio::test]
  async fn duplicate_name_is_ignored_by_default() {
    let h = harness().await;
    post_item(&h, "shirt", "clothes", "a.jpg", b"a").await;
    let resp = post_item(&h, "shirt", "shoes", "b.jpg", b"b").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let items = body_json(get(&h, "/items").await).await;
    assert_eq!(items["items"].as_array().unwrap().len(), 1);
    assert_eq!(items["items"][0]["category"], "clothes");
    assert_eq!(items["items"][0]["image_name"], derive_image_name("a.jpg"));
  }

  #[tokio::test]
  async fn duplicate_name_is_conflict_under_reject_policy() {
    let h = harness_with(DuplicatePolicy::Reject).await;
    post_item(&h, "shirt", "clothes", "a.jpg", b"a").await;
    let resp = post_item(&h, "shirt", "shoes", "b.jpg", b"b").await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
  }

  // Same declared filename, different bytes: both items exist, one image file
  // holds the later upload.
  #[tokio::test]
  async fn same_filename_uploads_share_and_overwrite_image() {
    let h = harness().await;
    post_item(&h, "red mug", "kitchen", "mug.jpg", b"red").await;
    post_item(&h, "blue mug", "kitchen", "mug.jpg", b"blue").await;

    let items = body_json(get(&h, "/items").await).await;
    let items = items["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["image_name"], items[1]["image_name"]);

    let resp = get(&h, &format!("/image/{}", derive_image_name("mug.jpg"))).await;
    assert_eq!(body_bytes(resp).await, b"blue");
  }

  // ── GET /items/:item_id ─────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_item_by_position() {
    let h = harness().await;
    post_item(&h, "shirt", "clothes", "a.jpg", b"a").await;
    post_item(&h, "boots", "shoes", "b.jpg", b"b").await;

    let resp = get(&h, "/items/2").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      body_json(resp).await,
      json!({ "name": "boots", "category": "shoes", "image_name": derive_image_name("b.jpg") })
    );
  }

  #[tokio::test]
  async fn out_of_range_positions_are_not_found() {
    let h = harness().await;
    post_item(&h, "shirt", "clothes", "a.jpg", b"a").await;

    for uri in ["/items/0", "/items/2", "/items/-1", "/items/99999999999999999999"] {
      let resp = get(&h, uri).await;
      assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
      assert_eq!(body_json(resp).await, json!({ "message": "item not found" }));
    }
  }

  #[tokio::test]
  async fn non_integer_position_is_bad_request() {
    let h = harness().await;
    let resp = get(&h, "/items/first").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── GET /search ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn search_filters_by_substring() {
    let h = harness().await;
    post_item(&h, "shirt", "clothes", "a.jpg", b"a").await;
    post_item(&h, "t-shirt", "clothes", "b.jpg", b"b").await;
    post_item(&h, "pants", "clothes", "c.jpg", b"c").await;

    let found = body_json(get(&h, "/search?keyword=shirt").await).await;
    let names: Vec<&str> = found["items"]
      .as_array()
      .unwrap()
      .iter()
      .map(|i| i["name"].as_str().unwrap())
      .collect();
    assert_eq!(names, ["shirt", "t-shirt"]);
  }

  #[tokio::test]
  async fn search_without_keyword_lists_everything() {
    let h = harness().await;
    post_item(&h, "shirt", "clothes", "a.jpg", b"a").await;
    post_item(&h, "pants", "clothes", "b.jpg", b"b").await;

    let all = body_json(get(&h, "/items").await).await;
    let found = body_json(get(&h, "/search").await).await;
    assert_eq!(found, all);
  }

  // ── GET /categories ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn categories_are_listed_in_creation_order() {
    let h = harness().await;
    post_item(&h, "shirt", "clothes", "a.jpg", b"a").await;
    post_item(&h, "boots", "shoes", "b.jpg", b"b").await;
    post_item(&h, "hat", "clothes", "c.jpg", b"c").await;

    let body = body_json(get(&h, "/categories").await).await;
    assert_eq!(
      body,
      json!({ "categories": [{ "id": 1, "name": "clothes" }, { "id": 2, "name": "shoes" }] })
    );
  }

  // ── GET /image/:image_name ──────────────────────────────────────────────────

  #[tokio::test]
  async fn image_must_be_jpg() {
    let h = harness().await;
    let resp = get(&h, "/image/picture.png").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn missing_image_falls_back_to_default() {
    let h = harness().await;

    let resp = get(&h, "/image/nothing.jpg").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    std::fs::write(h.images.path().join(images::DEFAULT_IMAGE), b"default").unwrap();
    let resp = get(&h, "/image/nothing.jpg").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      resp.headers().get(header::CONTENT_TYPE).unwrap(),
      "image/jpeg"
    );
    assert_eq!(body_bytes(resp).await, b"default");
  }
}
