use std::sync::Arc;

use axum::{Form, extract::State, response::Html};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, info};

use wiki_db::Database;
use wiki_types::RegisterOutcome;
use wiki_types::api::CredentialsForm;

use crate::error::{ApiError, run_db};
use crate::session::{self, Session};
use crate::views::{self, Flash};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub session_secret: String,
    pub session_ttl: chrono::Duration,
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<(CookieJar, Html<String>), ApiError> {
    let username = form.username.trim().to_string();

    let user = run_db(&state, move |db| db.authenticate(&username, &form.password)).await?;

    let (jar, session, flash) = match user {
        Some(user) => {
            let (jar, session) = session::begin(jar, &state, &user.username)?;
            info!("{} logged in", user.username);
            (jar, session, Flash::success("Login successful"))
        }
        None => {
            debug!("Rejected login for {:?}", form.username);
            (jar, Session::Anonymous, Flash::error("Invalid username or password"))
        }
    };

    let pages = run_db(&state, |db| db.list_pages()).await?;
    Ok((jar, Html(views::home(&session, Some(&flash), &pages))))
}

/// POST /signup. Does not log the new user in.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Html<String>, ApiError> {
    let username = form.username.trim().to_string();

    let flash = if username.is_empty() || form.password.is_empty() {
        Flash::error("Please provide both a username and a password.")
    } else {
        match run_db(&state, move |db| db.register(&username, &form.password)).await? {
            RegisterOutcome::Created => Flash::success("Account created! Please log in."),
            RegisterOutcome::AlreadyExists => Flash::error("Username is already taken."),
        }
    };

    let pages = run_db(&state, |db| db.list_pages()).await?;
    Ok(Html(views::home(&session, Some(&flash), &pages)))
}

/// POST /logout
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), ApiError> {
    if let Some(username) = session.username() {
        info!("{} logged out", username);
    }
    let (jar, session) = session::end(jar);

    let pages = run_db(&state, |db| db.list_pages()).await?;
    Ok((
        jar,
        Html(views::home(&session, Some(&Flash::info("Logged out")), &pages)),
    ))
}
