pub mod auth;
pub mod error;
pub mod json;
pub mod pages;
pub mod profiles;
pub mod session;
pub mod views;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use auth::{AppState, AppStateInner};

/// All HTML screens, form actions and JSON routes.
pub fn router(state: AppState) -> Router {
    let screens = Router::new()
        .route("/", get(pages::home))
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/logout", post(auth::logout))
        .route("/members", get(profiles::members))
        .route("/members/profile", post(profiles::update_profile))
        .route("/create", get(pages::new_page))
        .route("/pages", get(pages::archive).post(pages::create_page))
        .route("/pages/{title}", get(pages::view_page))
        .route("/pages/{title}/edit", post(pages::edit_page))
        .route("/pages/{title}/delete", post(pages::delete_page));

    let api = Router::new()
        .route("/api/pages", get(json::list_pages))
        .route("/api/pages/{title}", get(json::get_page))
        .route("/api/profiles", get(json::list_profiles))
        .route("/health", get(json::health));

    Router::new()
        .merge(screens)
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use wiki_db::Database;

    fn test_state() -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        let db = Database::open(&dir.path().join("wiki.db")).unwrap();
        let state = Arc::new(AppStateInner {
            db,
            session_secret: "test-secret".into(),
            session_ttl: chrono::Duration::days(1),
        });
        (dir, state)
    }

    async fn body_text(resp: axum::response::Response) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut req =
            Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        req.body(Body::from(body.to_string())).unwrap()
    }

    fn session_cookie(resp: &axum::response::Response) -> String {
        let set_cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn home_lists_pages_and_login() {
        let (_dir, state) = test_state();
        state.db.create_page("Home", "hello", "alice").unwrap();

        let resp = router(state)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_text(resp).await;
        assert!(html.contains(r#"href="/pages/Home""#));
        assert!(html.contains(r#"action="/login""#));
    }

    #[tokio::test]
    async fn unknown_page_is_404() {
        let (_dir, state) = test_state();
        let resp = router(state.clone())
            .oneshot(Request::get("/pages/Nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = router(state)
            .oneshot(Request::get("/api/pages/Nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(body_text(resp).await.contains("not found"));
    }

    #[tokio::test]
    async fn query_link_shows_page() {
        let (_dir, state) = test_state();
        state.db.create_page("Two Words", "body text", "alice").unwrap();

        let resp = router(state)
            .oneshot(Request::get("/?page=Two%20Words").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("body text"));
    }

    #[tokio::test]
    async fn anonymous_cannot_create() {
        let (_dir, state) = test_state();
        let resp = router(state.clone())
            .oneshot(form("/pages", "title=Home&content=hello", None))
            .await
            .unwrap();
        assert!(body_text(resp).await.contains("Please log in to create a new page."));
        assert!(state.db.get_page("Home").unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_signup_reports_message() {
        let (_dir, state) = test_state();
        state.db.register("alice", "pw1").unwrap();

        let resp = router(state)
            .oneshot(form("/signup", "username=alice&password=pw2", None))
            .await
            .unwrap();
        assert!(body_text(resp).await.contains("Username is already taken."));
    }

    #[tokio::test]
    async fn login_cookie_authorizes_writes() {
        let (_dir, state) = test_state();
        state.db.register("alice", "pw1").unwrap();

        let resp = router(state.clone())
            .oneshot(form("/login", "username=alice&password=pw1", None))
            .await
            .unwrap();
        let cookie = session_cookie(&resp);
        assert!(cookie.starts_with("wiki_session="));
        assert!(body_text(resp).await.contains("Login successful"));

        let resp = router(state.clone())
            .oneshot(form("/pages", "title=Home&content=hello", Some(&cookie)))
            .await
            .unwrap();
        assert!(body_text(resp).await.contains("Page created successfully!"));

        let page = state.db.get_page("Home").unwrap().unwrap();
        assert_eq!(page.author, "alice");
    }

    #[tokio::test]
    async fn bad_login_sets_no_cookie() {
        let (_dir, state) = test_state();
        state.db.register("alice", "pw1").unwrap();

        let resp = router(state)
            .oneshot(form("/login", "username=alice&password=nope", None))
            .await
            .unwrap();
        assert!(resp.headers().get(header::SET_COOKIE).is_none());
        assert!(body_text(resp).await.contains("Invalid username or password"));
    }

    #[tokio::test]
    async fn forged_cookie_is_anonymous() {
        let (_dir, state) = test_state();
        let token =
            session::create_token("wrong-secret", "mallory", chrono::Duration::days(1)).unwrap();
        let cookie = format!("wiki_session={token}");

        let resp = router(state.clone())
            .oneshot(form("/members/profile", "description=hi", Some(&cookie)))
            .await
            .unwrap();
        assert!(body_text(resp).await.contains("Please log in to update your profile."));
        assert!(state.db.list_profiles().unwrap().is_empty());
    }

    #[tokio::test]
    async fn anonymous_edit_leaves_page_unchanged() {
        let (_dir, state) = test_state();
        state.db.create_page("Home", "hello", "alice").unwrap();

        let resp = router(state.clone())
            .oneshot(form("/pages/Home/edit", "content=changed", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("Please log in to edit pages."));

        let page = state.db.get_page("Home").unwrap().unwrap();
        assert_eq!(page.content, "hello");
        assert_eq!(page.author, "alice");
    }

    #[tokio::test]
    async fn anonymous_delete_leaves_page_in_place() {
        let (_dir, state) = test_state();
        state.db.create_page("Home", "hello", "alice").unwrap();

        let resp = router(state.clone())
            .oneshot(form("/pages/Home/delete", "", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("Please log in to delete pages."));

        let page = state.db.get_page("Home").unwrap().unwrap();
        assert_eq!(page.content, "hello");
    }

    #[tokio::test]
    async fn failed_session_lookup_is_server_error() {
        let (_dir, state) = test_state();
        state.db.register("alice", "pw1").unwrap();
        let token =
            session::create_token("test-secret", "alice", chrono::Duration::days(1)).unwrap();
        let cookie = format!("wiki_session={token}");

        state
            .db
            .with_conn_mut(|conn| {
                conn.execute_batch("DROP TABLE users")?;
                Ok(())
            })
            .unwrap();

        let resp = router(state.clone())
            .oneshot(form("/members/profile", "description=hi", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body_text(resp).await.contains("Please log in"));
        assert!(state.db.list_profiles().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dot_titles_rejected_on_create() {
        let (_dir, state) = test_state();
        state.db.register("alice", "pw1").unwrap();
        let token =
            session::create_token("test-secret", "alice", chrono::Duration::days(1)).unwrap();
        let cookie = format!("wiki_session={token}");

        for title in [".", ".."] {
            let body = format!("title={}&content=hello", title);
            let resp = router(state.clone())
                .oneshot(form("/pages", &body, Some(&cookie)))
                .await
                .unwrap();
            assert!(body_text(resp).await.contains("Please choose a title other than"));
            assert!(state.db.get_page(title).unwrap().is_none());
        }
        assert!(state.db.list_pages().unwrap().is_empty());
    }

    #[tokio::test]
    async fn health_reports_user_count() {
        let (_dir, state) = test_state();
        state.db.register("alice", "pw1").unwrap();

        let resp = router(state)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["users"], 1);
    }
}
