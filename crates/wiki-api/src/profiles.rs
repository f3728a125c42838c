use axum::{Form, extract::State, response::Html};

use wiki_types::api::ProfileForm;

use crate::auth::AppState;
use crate::error::{ApiError, run_db};
use crate::session::Session;
use crate::views::{self, Flash};

/// GET /members
pub async fn members(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, ApiError> {
    render(&state, &session, None).await
}

/// POST /members/profile. Only ever writes the caller's own profile.
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> Result<Html<String>, ApiError> {
    let flash = match session.username() {
        Some(username) => {
            let username = username.to_string();
            run_db(&state, move |db| db.upsert_profile(&username, &form.description)).await?;
            Flash::success("Profile updated")
        }
        None => Flash::error("Please log in to update your profile."),
    };

    render(&state, &session, Some(&flash)).await
}

async fn render(
    state: &AppState,
    session: &Session,
    flash: Option<&Flash>,
) -> Result<Html<String>, ApiError> {
    let username = session.username().map(str::to_string);
    let (profiles, own) = run_db(state, move |db| {
        let own = match username {
            Some(name) => db.get_profile(&name)?.map(|p| p.description),
            None => None,
        };
        Ok((db.list_profiles()?, own))
    })
    .await?;

    Ok(Html(views::members(
        session,
        flash,
        &profiles,
        own.as_deref().unwrap_or_default(),
    )))
}
