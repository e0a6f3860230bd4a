use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brewlog::{
    auth::{secret::SigningSecret, session::SessionService},
    db::{config::DbConfig, connection::DbConnection},
    record::{api::EspressoRecordPost, db::EspressoRecord},
    user::api::{UserLogin, UserLoginRequest, UserRegisterRequest},
    web::{
        auth::{login_user, register_user},
        ctx::{Ctx, SessionToken},
        negotiate::{ResponseMode, negotiate},
        session_gate::mw_session_gate,
    },
};

use brewlog::prelude::*;

#[derive(Clone)]
struct AppState {
    db: DbConnection,
    sessions: SessionService,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,tower_http=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Secret and store come up fully before the listener; serving without
    // deterministic secret material is unsafe.
    let secret = SigningSecret::from_home()?;
    let sessions = SessionService::new(&secret);
    let db = DbConnection::new(&DbConfig::from_env()).setup();
    let state = AppState {
        db,
        sessions: sessions.clone(),
    };

    let protected_routes = Router::new()
        .route("/", get(home_page))
        .route("/records", get(records_page).post(create_record))
        .route("/api/records", get(list_records))
        .route_layer(middleware::from_fn_with_state(sessions, mw_session_gate));

    let app = Router::new()
        .merge(protected_routes)
        .route("/login", get(login_page).post(login))
        .route("/signup", get(signup_page))
        .route("/register", post(register))
        .route("/logout", get(logout))
        .nest_service("/static", ServeDir::new("static"))
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = std::env::var("SERVER_ADDR").unwrap_or_else(|_| String::from("0.0.0.0:8080"));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::debug!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

#[axum::debug_handler]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<UserRegisterRequest>,
) -> Result<Json<serde_json::Value>> {
    register_user(&payload, &state.db)?;
    Ok(Json(json!({ "message": "User registered successfully" })))
}

#[axum::debug_handler]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<UserLoginRequest>,
) -> Result<Json<UserLogin>> {
    let body = login_user(&payload, &state.db, &state.sessions)?;
    Ok(Json(UserLogin::from(body)))
}

/// Stateless sessions make logout a server-side no-op; the token stays
/// valid until it expires. Clients drop their copy.
#[axum::debug_handler]
async fn logout() -> Json<serde_json::Value> {
    Json(json!({ "message": "Logged out successfully" }))
}

#[axum::debug_handler]
async fn create_record(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(payload): Json<EspressoRecordPost>,
) -> Result<Json<EspressoRecord>> {
    let record = payload.into_create(ctx.user_id).save(&state.db)?;
    Ok(Json(record))
}

#[axum::debug_handler]
async fn list_records(State(state): State<AppState>, ctx: Ctx) -> Result<Json<Vec<EspressoRecord>>> {
    Ok(Json(EspressoRecord::fetch_for_user(
        &ctx.user_id,
        None,
        &state.db,
    )?))
}

#[axum::debug_handler]
async fn home_page(
    State(state): State<AppState>,
    ctx: Ctx,
    token: Option<Extension<SessionToken>>,
) -> Result<Html<String>> {
    let records = EspressoRecord::fetch_for_user(&ctx.user_id, Some(3), &state.db)?;
    Ok(records_html(&records, false, token))
}

#[axum::debug_handler]
async fn records_page(
    State(state): State<AppState>,
    ctx: Ctx,
    token: Option<Extension<SessionToken>>,
) -> Result<Html<String>> {
    let records = EspressoRecord::fetch_for_user(&ctx.user_id, None, &state.db)?;
    Ok(records_html(&records, true, token))
}

#[derive(Debug, Deserialize)]
struct LoginPageQuery {
    #[serde(default)]
    registered: Option<String>,
    #[serde(default, rename = "return")]
    return_to: Option<String>,
}

#[axum::debug_handler]
async fn login_page(Query(query): Query<LoginPageQuery>) -> Html<String> {
    let notice = if query.registered.as_deref() == Some("true") {
        "<p>Registration complete. Log in below.</p>"
    } else {
        ""
    };
    let return_to = query.return_to.unwrap_or_else(|| String::from("/"));
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Log in - brewlog</title><link rel="stylesheet" href="/static/style.css"></head>
<body>
<h1>Log in</h1>
{notice}
<form id="login-form">
  <input type="email" name="email" placeholder="Email" required>
  <input type="password" name="password" placeholder="Password" required>
  <button type="submit">Log in</button>
</form>
<p><a href="/signup">Create an account</a></p>
<script>
const returnTo = {return_to};
document.getElementById('login-form').addEventListener('submit', async (event) => {{
  event.preventDefault();
  const form = new FormData(event.target);
  const response = await fetch('/login', {{
    method: 'POST',
    headers: {{ 'Content-Type': 'application/json' }},
    body: JSON.stringify({{ email: form.get('email'), password: form.get('password') }}),
  }});
  if (!response.ok) {{ alert('Invalid email or password'); return; }}
  const data = await response.json();
  const target = new URL(returnTo, window.location.origin);
  target.searchParams.set('token', data.token);
  window.location.href = target.pathname + target.search;
}});
</script>
</body>
</html>"#,
        notice = notice,
        return_to = json!(return_to),
    ))
}

#[axum::debug_handler]
async fn signup_page() -> Html<String> {
    Html(String::from(
        r#"<!DOCTYPE html>
<html>
<head><title>Sign up - brewlog</title><link rel="stylesheet" href="/static/style.css"></head>
<body>
<h1>Sign up</h1>
<form id="signup-form">
  <input type="email" name="email" placeholder="Email" required>
  <input type="password" name="password" placeholder="Password" required>
  <button type="submit">Register</button>
</form>
<p><a href="/login">Already registered? Log in</a></p>
<script>
document.getElementById('signup-form').addEventListener('submit', async (event) => {
  event.preventDefault();
  const form = new FormData(event.target);
  const response = await fetch('/register', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ email: form.get('email'), password: form.get('password') }),
  });
  if (!response.ok) {
    const data = await response.json();
    alert(data.error ? data.error.message : 'Registration failed');
    return;
  }
  window.location.href = '/login?registered=true';
});
</script>
</body>
</html>"#,
    ))
}

fn records_html(
    records: &[EspressoRecord],
    show_all: bool,
    token: Option<Extension<SessionToken>>,
) -> Html<String> {
    let token = token.map(|Extension(SessionToken(token))| token).unwrap_or_default();
    let rows: String = records
        .iter()
        .map(|record| {
            format!(
                "<tr><td>{:.1}g</td><td>{:.1}g</td><td>1:{:.1}</td><td>{}</td><td>{}</td></tr>\n",
                record.coffee,
                record.water,
                record.ratio,
                escape_html(&record.beans_brand),
                escape_html(&record.taste_notes),
            )
        })
        .collect();
    let footer = if show_all {
        format!("<a href=\"/?token={token}\">Back</a>")
    } else {
        format!("<a href=\"/records?token={token}\">Show all</a>")
    };
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Brew log</title><link rel="stylesheet" href="/static/style.css"></head>
<body>
<h1>Brew log</h1>
<table>
<tr><th>Coffee</th><th>Water</th><th>Ratio</th><th>Beans</th><th>Notes</th></tr>
{rows}</table>
{footer}
<p><a href="/logout">Log out</a></p>
</body>
</html>"#,
    ))
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Unmatched paths: browsers go home, API callers get a 404.
async fn not_found(headers: HeaderMap) -> Response {
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok());
    match negotiate(accept) {
        ResponseMode::Html => Redirect::temporary("/").into_response(),
        ResponseMode::Api => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
        }
    }
}
