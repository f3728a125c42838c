use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::debug;

use wiki_types::WriteOutcome;
use wiki_types::api::{EditPageForm, HomeQuery, NewPageForm};

use crate::auth::AppState;
use crate::error::{ApiError, run_db};
use crate::session::Session;
use crate::views::{self, Flash};

/// GET / and GET /?page=<title>
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<HomeQuery>,
) -> Result<Response, ApiError> {
    if let Some(title) = query.page.filter(|t| !t.is_empty()) {
        return show_page(&state, &session, title, None).await;
    }

    let pages = run_db(&state, |db| db.list_pages()).await?;
    Ok(Html(views::home(&session, None, &pages)).into_response())
}

/// GET /pages
pub async fn archive(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, ApiError> {
    let pages = run_db(&state, |db| db.list_pages()).await?;
    Ok(Html(views::archive(&session, None, &pages)))
}

/// GET /create
pub async fn new_page(session: Session) -> Html<String> {
    Html(views::create_form(&session, None, "", ""))
}

/// POST /pages
pub async fn create_page(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<NewPageForm>,
) -> Result<Response, ApiError> {
    let Some(author) = session.username().map(str::to_string) else {
        return Ok(Html(views::create_form(&session, None, "", "")).into_response());
    };

    let title = form.title.trim().to_string();
    if title.is_empty() || form.content.is_empty() {
        let flash = Flash::error("Please provide both title and content.");
        return Ok(
            Html(views::create_form(&session, Some(&flash), &title, &form.content)).into_response(),
        );
    }

    if !views::is_linkable_title(&title) {
        let flash = Flash::error("Please choose a title other than . or ..");
        return Ok(
            Html(views::create_form(&session, Some(&flash), &title, &form.content)).into_response(),
        );
    }

    let outcome = {
        let (title, content) = (title.clone(), form.content.clone());
        run_db(&state, move |db| db.create_page(&title, &content, &author)).await?
    };

    match outcome {
        WriteOutcome::AlreadyExists => {
            let flash = Flash::error(
                "A page with this title already exists. Use another title or edit the existing page.",
            );
            let html = views::create_form(&session, Some(&flash), &title, &form.content);
            Ok(Html(html).into_response())
        }
        _ => {
            let flash = Flash::success("Page created successfully!");
            show_page(&state, &session, title, Some(flash)).await
        }
    }
}

/// GET /pages/{title}
pub async fn view_page(
    State(state): State<AppState>,
    session: Session,
    Path(title): Path<String>,
) -> Result<Response, ApiError> {
    show_page(&state, &session, title, None).await
}

/// POST /pages/{title}/edit. Editing a missing page is a silent no-op.
pub async fn edit_page(
    State(state): State<AppState>,
    session: Session,
    Path(title): Path<String>,
    Form(form): Form<EditPageForm>,
) -> Result<Response, ApiError> {
    let Some(author) = session.username().map(str::to_string) else {
        let flash = Flash::error("Please log in to edit pages.");
        return show_page(&state, &session, title, Some(flash)).await;
    };

    let outcome = {
        let title = title.clone();
        run_db(&state, move |db| db.update_page(&title, &form.content, &author)).await?
    };

    if outcome == WriteOutcome::NotFound {
        debug!("Edit of missing page '{}'", title);
        return archive(State(state), session).await.map(IntoResponse::into_response);
    }
    show_page(&state, &session, title, Some(Flash::success("Page updated"))).await
}

/// POST /pages/{title}/delete. Any logged-in user may delete any page.
pub async fn delete_page(
    State(state): State<AppState>,
    session: Session,
    Path(title): Path<String>,
) -> Result<Response, ApiError> {
    if !session.is_authenticated() {
        let flash = Flash::error("Please log in to delete pages.");
        return show_page(&state, &session, title, Some(flash)).await;
    }

    let outcome = {
        let title = title.clone();
        run_db(&state, move |db| db.delete_page(&title)).await?
    };

    let flash = outcome.is_applied().then(|| Flash::success("Page deleted"));
    let pages = run_db(&state, |db| db.list_pages()).await?;
    Ok(Html(views::archive(&session, flash.as_ref(), &pages)).into_response())
}

async fn show_page(
    state: &AppState,
    session: &Session,
    title: String,
    flash: Option<Flash>,
) -> Result<Response, ApiError> {
    let lookup = title.clone();
    match run_db(state, move |db| db.get_page(&lookup)).await? {
        Some(page) => Ok(Html(views::page_view(session, flash.as_ref(), &page)).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Html(views::page_not_found(session, &title)),
        )
            .into_response()),
    }
}
