//! Session gate middleware.
//!
//! Every non-exempt request must carry a verifiable bearer token. The gate
//! extracts it from the `Authorization` header (falling back to a `token`
//! query parameter so links and redirects keep working), verifies it against
//! the session service, and either binds the caller's identity into the
//! request or rejects: browsers get a redirect to the login page carrying
//! the original URL in a `return` parameter, API callers get a JSON 401.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, Uri, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use url::form_urlencoded;

use crate::auth::session::{AuthError, SessionService};
use crate::prelude::*;
use crate::web::ctx::{Ctx, SessionToken};
use crate::web::negotiate::{ResponseMode, negotiate};

pub const AUTH_HEADER_PREFIX: &str = "Bearer ";

/// Paths reachable without a token.
const EXEMPT_PATHS: [&str; 3] = ["/login", "/signup", "/logout"];
const STATIC_PREFIX: &str = "/static";

#[axum::debug_middleware]
pub async fn mw_session_gate(
    State(sessions): State<SessionService>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if is_exempt(req.uri().path()) {
        return next.run(req).await;
    }

    let mode = negotiate(
        req.headers()
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok()),
    );

    let Some(candidate) = extract_token(req.headers(), req.uri()) else {
        return reject(mode, req.uri(), AuthError::TokenMissing);
    };
    let token = candidate
        .strip_prefix(AUTH_HEADER_PREFIX)
        .unwrap_or(&candidate)
        .to_string();

    match sessions.verify(&token) {
        Ok(user_id) => {
            req.extensions_mut().insert(Ctx::new(user_id));
            if mode == ResponseMode::Html {
                req.extensions_mut().insert(SessionToken(token));
            }
            next.run(req).await
        }
        Err(err) => reject(mode, req.uri(), err),
    }
}

fn is_exempt(path: &str) -> bool {
    EXEMPT_PATHS.contains(&path) || path.starts_with(STATIC_PREFIX)
}

fn extract_token(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
        .or_else(|| {
            uri.query().and_then(|query| {
                form_urlencoded::parse(query.as_bytes())
                    .find(|(key, _)| key == "token")
                    .map(|(_, value)| value.into_owned())
            })
        })
}

fn reject(mode: ResponseMode, uri: &Uri, err: AuthError) -> Response {
    match mode {
        ResponseMode::Html => {
            let mut return_to = String::from(uri.path());
            if let Some(query) = uri.query() {
                return_to.push('?');
                return_to.push_str(query);
            }
            let encoded: String = form_urlencoded::byte_serialize(return_to.as_bytes()).collect();
            Redirect::temporary(&format!("/login?return={encoded}")).into_response()
        }
        ResponseMode::Api => Error::from(err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, middleware, routing::get};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::auth::secret::SigningSecret;

    fn sessions() -> SessionService {
        let dir = tempfile::tempdir().unwrap();
        SessionService::new(&SigningSecret::load_or_generate(&dir.path().join("secret")).unwrap())
    }

    async fn whoami(ctx: Ctx) -> String {
        ctx.user_id.to_string()
    }

    fn app(sessions: SessionService) -> Router {
        Router::new()
            .route("/protected/path", get(whoami))
            .route("/login", get(|| async { "login page" }))
            .layer(middleware::from_fn_with_state(sessions, mw_session_gate))
    }

    fn request(uri: &str, accept: Option<&str>, authorization: Option<&str>) -> Request {
        let mut builder = Request::builder().uri(uri);
        if let Some(accept) = accept {
            builder = builder.header(header::ACCEPT, accept);
        }
        if let Some(authorization) = authorization {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn html_caller_without_token_is_redirected_with_return_url() {
        let response = app(sessions())
            .oneshot(request("/protected/path", Some("text/html"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/login?return=%2Fprotected%2Fpath"
        );
    }

    #[tokio::test]
    async fn return_url_keeps_the_query_string() {
        let response = app(sessions())
            .oneshot(request(
                "/protected/path?page=2",
                Some("text/html"),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/login?return=%2Fprotected%2Fpath%3Fpage%3D2"
        );
    }

    #[tokio::test]
    async fn api_caller_without_token_gets_401() {
        let response = app(sessions())
            .oneshot(request("/protected/path", Some("application/json"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bearer_token_binds_identity() {
        let sessions = sessions();
        let user_id = Uuid::new_v4();
        let token = sessions.issue(user_id).unwrap().access_token;

        let response = app(sessions)
            .oneshot(request(
                "/protected/path",
                Some("application/json"),
                Some(&format!("Bearer {token}")),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, user_id.to_string().as_bytes());
    }

    #[tokio::test]
    async fn header_without_bearer_prefix_is_accepted() {
        let sessions = sessions();
        let user_id = Uuid::new_v4();
        let token = sessions.issue(user_id).unwrap().access_token;

        let response = app(sessions)
            .oneshot(request(
                "/protected/path",
                Some("application/json"),
                Some(&token),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn query_parameter_token_is_accepted() {
        let sessions = sessions();
        let token = sessions.issue(Uuid::new_v4()).unwrap().access_token;

        let response = app(sessions)
            .oneshot(request(
                &format!("/protected/path?token={token}"),
                Some("application/json"),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_token_is_rejected_per_accept_header() {
        let html = app(sessions())
            .oneshot(request(
                "/protected/path",
                Some("text/html"),
                Some("Bearer garbage"),
            ))
            .await
            .unwrap();
        assert_eq!(html.status(), StatusCode::TEMPORARY_REDIRECT);

        let api = app(sessions())
            .oneshot(request(
                "/protected/path",
                Some("application/json"),
                Some("Bearer garbage"),
            ))
            .await
            .unwrap();
        assert_eq!(api.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn token_from_another_secret_is_rejected() {
        let token = sessions().issue(Uuid::new_v4()).unwrap().access_token;

        let response = app(sessions())
            .oneshot(request(
                "/protected/path",
                Some("application/json"),
                Some(&format!("Bearer {token}")),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn exempt_path_passes_without_token() {
        let response = app(sessions())
            .oneshot(request("/login", Some("text/html"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
