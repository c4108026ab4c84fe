use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::application::use_cases::auth::purge_revoked_tokens::PurgeRevokedTokens;
use crate::application::use_cases::users::ensure_admin::{AdminSeed, EnsureAdmin};
use crate::presentation::http::router;
use crate::test_support::{TestApp, test_app};

const PASSWORD: &str = "correct-horse";

struct Harness {
    app: Router,
    state: TestApp,
}

struct Response {
    status: StatusCode,
    headers: axum::http::HeaderMap,
    body: Value,
}

impl Harness {
    fn new() -> Self {
        let state = test_app();
        Self {
            app: router(state.ctx.clone()),
            state,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let req = match body {
            Some(v) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&v).unwrap()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        self.dispatch(req).await
    }

    async fn dispatch(&self, req: Request<Body>) -> Response {
        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        Response {
            status,
            headers,
            body,
        }
    }

    /// Registers a regular user and returns `(id, token)`.
    async fn register(&self, username: &str) -> (i64, String) {
        let resp = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "fullName": format!("{username} Tester"),
                    "email": format!("{username}@example.com"),
                    "password": PASSWORD,
                })),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.body);
        (
            resp.body["user"]["id"].as_i64().unwrap(),
            resp.body["token"].as_str().unwrap().to_string(),
        )
    }

    async fn admin(&self) -> (i64, String) {
        let users = self.state.ctx.user_repo();
        EnsureAdmin {
            repo: users.as_ref(),
        }
        .execute(&AdminSeed {
            username: "root".into(),
            full_name: "Site Admin".into(),
            email: "root@example.com".into(),
            password: PASSWORD.into(),
        })
        .await
        .unwrap();
        let resp = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": "root@example.com", "password": PASSWORD })),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
        assert_eq!(resp.body["user"]["roleId"], 1);
        (
            resp.body["user"]["id"].as_i64().unwrap(),
            resp.body["token"].as_str().unwrap().to_string(),
        )
    }

    async fn create_doc(&self, token: &str, title: &str, permission: &str) -> i64 {
        let resp = self
            .send(
                Method::POST,
                "/api/documents",
                Some(token),
                Some(json!({ "title": title, "content": "body", "permission": permission })),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.body);
        resp.body["id"].as_i64().unwrap()
    }
}

fn titles(body: &Value) -> Vec<String> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn register_login_and_me() {
    let h = Harness::new();
    let (id, token) = h.register("alice").await;

    let me = h.send(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["id"], id);
    assert_eq!(me.body["fullName"], "alice Tester");
    assert_eq!(me.body["roleId"], 2);

    let login = h
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "identifier": "alice", "password": PASSWORD })),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert!(login.body["expiresIn"].as_i64().unwrap() > 0);
    let cookie = login.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("access_token="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn token_is_accepted_from_header_variants_and_cookie() {
    let h = Harness::new();
    let (_, token) = h.register("carol").await;

    for (name, value) in [
        (header::AUTHORIZATION.as_str(), token.clone()),
        ("x-access-token", token.clone()),
        (header::COOKIE.as_str(), format!("theme=dark; access_token={token}")),
    ] {
        let req = Request::builder()
            .uri("/api/auth/me")
            .header(name, value)
            .body(Body::empty())
            .unwrap();
        assert_eq!(h.dispatch(req).await.status, StatusCode::OK, "{name}");
    }

    let missing = h.send(Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["code"], "UNAUTHORIZED");

    let garbage = h.send(Method::GET, "/api/auth/me", Some("not-a-jwt"), None).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_only_the_presented_token() {
    let h = Harness::new();
    let (_, first) = h.register("dave").await;
    let second = h
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "dave", "password": PASSWORD })),
        )
        .await
        .body["token"]
        .as_str()
        .unwrap()
        .to_string();

    let out = h.send(Method::POST, "/api/auth/logout", Some(&second), None).await;
    assert_eq!(out.status, StatusCode::OK);
    assert_eq!(out.body["message"], "User logged out");
    assert!(out.headers[header::SET_COOKIE].to_str().unwrap().contains("Max-Age=0"));

    let revoked = h.send(Method::GET, "/api/auth/me", Some(&second), None).await;
    assert_eq!(revoked.status, StatusCode::UNAUTHORIZED);
    let still_valid = h.send(Method::GET, "/api/auth/me", Some(&first), None).await;
    assert_eq!(still_valid.status, StatusCode::OK);

    let purge = PurgeRevokedTokens {
        revocations: h.state.revocations.as_ref(),
    };
    assert_eq!(purge.execute(Utc::now()).await.unwrap(), 0);
    let past_expiry = Utc::now() + Duration::days(4);
    assert_eq!(purge.execute(past_expiry).await.unwrap(), 1);
}

#[tokio::test]
async fn registration_rejects_admin_role_duplicates_and_bad_input() {
    let h = Harness::new();
    h.register("erin").await;

    let admin = h
        .send(
            Method::POST,
            "/api/users",
            None,
            Some(json!({
                "username": "mallory",
                "fullName": "Mallory",
                "email": "mallory@example.com",
                "password": PASSWORD,
                "roleId": 1,
            })),
        )
        .await;
    assert_eq!(admin.status, StatusCode::FORBIDDEN);
    assert_eq!(admin.body["message"], "You can't create an admin account yourself");

    let dup = h
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "username": "erin2",
                "fullName": "Erin Again",
                "email": "ERIN@example.com",
                "password": PASSWORD,
            })),
        )
        .await;
    assert_eq!(dup.status, StatusCode::CONFLICT);
    assert_eq!(
        dup.body["message"],
        "This email is in existence please choose a new one or login"
    );

    let short = h
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "username": "frank",
                "fullName": "Frank",
                "email": "frank@example.com",
                "password": "short",
            })),
        )
        .await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);
    assert_eq!(short.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn failed_login_is_unauthorized() {
    let h = Harness::new();
    h.register("gina").await;
    let resp = h
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "identifier": "gina", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["message"], "Invalid credentials supplied!");
}

#[tokio::test]
async fn private_documents_are_hidden_from_other_regular_users() {
    let h = Harness::new();
    let (_, alice) = h.register("alice").await;
    let (_, bob) = h.register("bob").await;
    let private = h.create_doc(&alice, "diary", "private").await;
    let public = h.create_doc(&alice, "handbook", "public").await;

    let hidden = h
        .send(Method::GET, &format!("/api/documents/{private}"), Some(&bob), None)
        .await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);

    let shown = h
        .send(Method::GET, &format!("/api/documents/{public}"), Some(&bob), None)
        .await;
    assert_eq!(shown.status, StatusCode::OK);
    assert_eq!(
        shown.body["access"],
        json!({ "canView": true, "canEdit": false, "canDelete": false })
    );

    let edit = h
        .send(
            Method::PUT,
            &format!("/api/documents/{public}"),
            Some(&bob),
            Some(json!({ "title": "hijacked" })),
        )
        .await;
    assert_eq!(edit.status, StatusCode::FORBIDDEN);
    let delete = h
        .send(Method::DELETE, &format!("/api/documents/{public}"), Some(&bob), None)
        .await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    let own = h
        .send(Method::GET, &format!("/api/documents/{private}"), Some(&alice), None)
        .await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.body["permission"], "private");
    assert_eq!(own.body["access"]["canDelete"], true);
}

#[tokio::test]
async fn admin_can_edit_and_delete_any_document() {
    let h = Harness::new();
    let (_, alice) = h.register("alice").await;
    let (_, admin) = h.admin().await;
    let doc = h.create_doc(&alice, "draft", "private").await;

    let patched = h
        .send(
            Method::PATCH,
            &format!("/api/documents/{doc}"),
            Some(&admin),
            Some(json!({ "title": "reviewed", "permission": "public" })),
        )
        .await;
    assert_eq!(patched.status, StatusCode::OK);
    assert_eq!(patched.body["title"], "reviewed");
    assert_eq!(patched.body["permission"], "public");
    assert_eq!(patched.body["content"], "body");

    let deleted = h
        .send(Method::DELETE, &format!("/api/documents/{doc}"), Some(&admin), None)
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    let gone = h
        .send(Method::GET, &format!("/api/documents/{doc}"), Some(&alice), None)
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listings_only_include_viewable_documents() {
    let h = Harness::new();
    let (alice_id, alice) = h.register("alice").await;
    let (_, bob) = h.register("bob").await;
    let (_, admin) = h.admin().await;
    h.create_doc(&alice, "alice-private", "private").await;
    h.create_doc(&alice, "alice-public", "public").await;
    h.create_doc(&bob, "bob-private", "private").await;

    let for_bob = h.send(Method::GET, "/api/documents", Some(&bob), None).await;
    assert_eq!(for_bob.status, StatusCode::OK);
    assert_eq!(titles(&for_bob.body), ["bob-private", "alice-public"]);
    assert_eq!(for_bob.body["metadata"]["count"], 2);

    let for_admin = h
        .send(Method::GET, "/api/documents?limit=2&offset=1", Some(&admin), None)
        .await;
    assert_eq!(titles(&for_admin.body), ["alice-public", "alice-private"]);
    assert_eq!(for_admin.body["metadata"], json!({ "count": 3, "limit": 2, "offset": 1 }));

    let alices_for_bob = h
        .send(
            Method::GET,
            &format!("/api/users/{alice_id}/documents"),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(titles(&alices_for_bob.body), ["alice-public"]);

    let search = h
        .send(Method::GET, "/api/documents/search?q=ALICE", Some(&bob), None)
        .await;
    assert_eq!(search.body["metadata"]["count"], 1);
    assert_eq!(search.body["metadata"]["searchTerm"], "ALICE");
    assert_eq!(search.body["result"][0]["title"], "alice-public");
}

#[tokio::test]
async fn users_cannot_delete_themselves() {
    let h = Harness::new();
    let (alice_id, alice) = h.register("alice").await;
    let (admin_id, admin) = h.admin().await;

    for (id, token) in [(alice_id, alice.as_str()), (admin_id, admin.as_str())] {
        let resp = h
            .send(Method::DELETE, &format!("/api/users/{id}"), Some(token), None)
            .await;
        assert_eq!(resp.status, StatusCode::FORBIDDEN);
        assert_eq!(resp.body["message"], "You cant delete yourself");
    }
}

#[tokio::test]
async fn admin_deletes_another_user_and_their_token_stops_working() {
    let h = Harness::new();
    let (alice_id, alice) = h.register("alice").await;
    let (bob_id, bob) = h.register("bob").await;
    let (_, admin) = h.admin().await;

    let by_peer = h
        .send(Method::DELETE, &format!("/api/users/{bob_id}"), Some(&alice), None)
        .await;
    assert_eq!(by_peer.status, StatusCode::FORBIDDEN);

    let resp = h
        .send(Method::DELETE, &format!("/api/users/{bob_id}"), Some(&admin), None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], format!("{bob_id} has been deleted"));

    let me = h.send(Method::GET, "/api/auth/me", Some(&bob), None).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let lookup = h
        .send(Method::GET, &format!("/api/users/{bob_id}"), Some(&alice), None)
        .await;
    assert_eq!(lookup.status, StatusCode::NOT_FOUND);
    let by_email = h
        .send(Method::GET, "/api/users/alice@example.com", Some(&alice), None)
        .await;
    assert_eq!(by_email.body["id"], alice_id);
}

#[tokio::test]
async fn user_updates_respect_ownership_and_roles() {
    let h = Harness::new();
    let (alice_id, alice) = h.register("alice").await;
    let (bob_id, _) = h.register("bob").await;
    let (_, admin) = h.admin().await;

    let own = h
        .send(
            Method::PUT,
            &format!("/api/users/{alice_id}"),
            Some(&alice),
            Some(json!({ "fullName": "Alice Liddell" })),
        )
        .await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.body["message"], format!("{alice_id} updated"));
    assert_eq!(own.body["data"]["fullName"], "Alice Liddell");

    let other = h
        .send(
            Method::PUT,
            &format!("/api/users/{bob_id}"),
            Some(&alice),
            Some(json!({ "fullName": "Not Bob" })),
        )
        .await;
    assert_eq!(other.status, StatusCode::FORBIDDEN);

    let escalate = h
        .send(
            Method::PUT,
            &format!("/api/users/{alice_id}"),
            Some(&alice),
            Some(json!({ "roleId": 1 })),
        )
        .await;
    assert_eq!(escalate.status, StatusCode::FORBIDDEN);

    let taken = h
        .send(
            Method::PUT,
            &format!("/api/users/{alice_id}"),
            Some(&alice),
            Some(json!({ "username": "bob" })),
        )
        .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);

    let promote = h
        .send(
            Method::PUT,
            &format!("/api/users/{bob_id}"),
            Some(&admin),
            Some(json!({ "roleId": 1 })),
        )
        .await;
    assert_eq!(promote.status, StatusCode::OK);
    assert_eq!(promote.body["data"]["roleId"], 1);

    let search = h
        .send(Method::GET, "/api/users/search?q=liddell", Some(&admin), None)
        .await;
    assert_eq!(search.body["metadata"]["count"], 1);
    assert_eq!(search.body["result"][0]["id"], alice_id);
}

#[tokio::test]
async fn roles_are_listed_for_authenticated_users() {
    let h = Harness::new();
    let (_, token) = h.register("hank").await;
    let resp = h.send(Method::GET, "/api/roles", Some(&token), None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.body,
        json!([{ "id": 1, "title": "admin" }, { "id": 2, "title": "regular" }])
    );
}

#[tokio::test]
async fn login_accepts_email_and_username_together() {
    let h = Harness::new();
    let (id, _) = h.register("ivy").await;
    let resp = h
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ivy@example.com", "username": "ivy", "password": PASSWORD })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
    assert_eq!(resp.body["user"]["id"], id);

    // A blank identifier falls through to the next field.
    let blank = h
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "identifier": " ", "username": "ivy", "password": PASSWORD })),
        )
        .await;
    assert_eq!(blank.status, StatusCode::OK, "{}", blank.body);
}

#[tokio::test]
async fn malformed_requests_get_the_error_envelope() {
    let h = Harness::new();
    let (_, token) = h.register("jack").await;

    let bad_id = h
        .send(Method::GET, "/api/documents/abc", Some(&token), None)
        .await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_id.body["code"], "VALIDATION_ERROR");
    assert!(bad_id.body["message"].is_string());

    let missing_title = h
        .send(
            Method::POST,
            "/api/documents",
            Some(&token),
            Some(json!({ "content": "x" })),
        )
        .await;
    assert_eq!(missing_title.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_title.body["code"], "VALIDATION_ERROR");

    let bad_limit = h
        .send(Method::GET, "/api/documents?limit=abc", Some(&token), None)
        .await;
    assert_eq!(bad_limit.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_limit.body["code"], "VALIDATION_ERROR");

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let syntax = h.dispatch(req).await;
    assert_eq!(syntax.status, StatusCode::BAD_REQUEST);
    assert_eq!(syntax.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn numeric_usernames_are_rejected_at_registration() {
    let h = Harness::new();
    let resp = h
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "username": "12345",
                "fullName": "Number Person",
                "email": "numbers@example.com",
                "password": PASSWORD,
            })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["code"], "VALIDATION_ERROR");
}
