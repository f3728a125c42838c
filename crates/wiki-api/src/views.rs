//! Server-rendered HTML screens.
//!
//! Every response is a whole document: header with the login widget, sidebar
//! navigation, optional flash message, and the main section. Nothing is
//! cached between requests; handlers re-read the lists they show.

use axum::http::StatusCode;
use wiki_types::models::{Page, PageSummary, Profile};

use crate::session::Session;

/// One-shot message shown above the main section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Success(String),
    Error(String),
    Info(String),
}

impl Flash {
    pub fn success(msg: impl Into<String>) -> Self {
        Self::Success(msg.into())
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self::Info(msg.into())
    }

    fn render(&self) -> String {
        let (class, msg) = match self {
            Self::Success(m) => ("flash success", m),
            Self::Error(m) => ("flash error", m),
            Self::Info(m) => ("flash info", m),
        };
        format!(r#"<div class="{class}">{}</div>"#, escape(msg))
    }
}

/// Sidebar entry that is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Home,
    Members,
    Pages,
    Create,
    None,
}

// ── Helpers ───────────────────────────────────────────────────────────

/// Escape text for use in element content and double-quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Link target for a page; the title is percent-encoded as one path segment.
pub fn page_href(title: &str) -> String {
    format!("/pages/{}", urlencoding::encode(title))
}

/// `.` and `..` survive percent-encoding and would be collapsed out of the path.
pub fn is_linkable_title(title: &str) -> bool {
    title != "." && title != ".."
}

fn timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn base_style() -> &'static str {
    r#"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body {
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
        background: #f5f5f5; color: #333; min-height: 100vh;
    }
    header {
        display: flex; justify-content: space-between; align-items: center;
        background: #1a1a2e; color: #fff; padding: 14px 24px;
    }
    header h1 { font-size: 22px; }
    header a { color: #fff; text-decoration: none; }
    header form { display: inline; }
    header .who { font-size: 14px; margin-right: 12px; }
    .layout { display: flex; gap: 24px; padding: 24px; }
    nav { min-width: 180px; }
    nav a {
        display: block; padding: 10px 14px; border-radius: 10px; margin-bottom: 6px;
        color: #333; text-decoration: none; font-size: 15px;
    }
    nav a.active { background: #4a6cf7; color: #fff; }
    nav a:hover:not(.active) { background: #e8e8e8; }
    main {
        flex: 1; background: #fff; border-radius: 16px; padding: 32px;
        box-shadow: 0 4px 24px rgba(0,0,0,0.08);
    }
    main h2 { font-size: 22px; margin-bottom: 16px; color: #1a1a2e; }
    main h3 { font-size: 17px; margin: 20px 0 10px; color: #1a1a2e; }
    main p { margin-bottom: 10px; }
    .form-group { margin-bottom: 16px; }
    .form-group label { display: block; font-size: 14px; font-weight: 500; margin-bottom: 6px; color: #444; }
    .form-group input, .form-group textarea {
        width: 100%; padding: 12px 14px; border: 1.5px solid #ddd;
        border-radius: 10px; font-size: 15px; outline: none; font-family: inherit;
    }
    .form-group textarea { min-height: 160px; }
    .form-group input:focus, .form-group textarea:focus { border-color: #4a6cf7; }
    .btn {
        padding: 10px 18px; border: none; border-radius: 10px;
        font-size: 15px; font-weight: 600; cursor: pointer;
    }
    .btn-primary { background: #4a6cf7; color: #fff; }
    .btn-primary:hover { background: #3b5de7; }
    .btn-secondary { background: #e8e8e8; color: #333; }
    .btn-danger { background: #d32f2f; color: #fff; }
    .flash { padding: 10px 14px; border-radius: 8px; font-size: 14px; margin-bottom: 16px; }
    .flash.success { background: #edf7ed; color: #1e7b34; }
    .flash.error { background: #fff0f0; color: #d32f2f; }
    .flash.info { background: #f0f4ff; color: #3b5de7; }
    .columns { display: flex; gap: 32px; flex-wrap: wrap; }
    .columns > section { flex: 1; min-width: 260px; }
    ul.pages { list-style: none; }
    ul.pages li { padding: 8px 0; border-bottom: 1px solid #eee; }
    ul.pages a { color: #4a6cf7; font-weight: 600; text-decoration: none; }
    .meta { font-size: 13px; color: #888; }
    details { border: 1px solid #eee; border-radius: 10px; padding: 10px 14px; margin-bottom: 8px; }
    details summary { cursor: pointer; font-weight: 600; }
    pre.content {
        white-space: pre-wrap; word-wrap: break-word; font-family: inherit;
        background: #fafafa; border-radius: 10px; padding: 16px; margin: 12px 0;
    }
    .actions { display: flex; gap: 12px; margin-top: 16px; }
    "#
}

fn header(session: &Session) -> String {
    let widget = match session.username() {
        Some(username) => format!(
            r#"<span class="who">Logged in as <strong>{}</strong></span>
    <form method="POST" action="/logout"><button type="submit" class="btn btn-secondary">Logout</button></form>"#,
            escape(username)
        ),
        None => r#"<a href="/">Login / Sign Up</a>"#.to_string(),
    };

    format!(
        r#"<header>
  <h1><a href="/">Wiki System</a></h1>
  <div>{widget}</div>
</header>"#
    )
}

fn sidebar(active: Nav) -> String {
    let entries = [
        (Nav::Home, "/", "Home"),
        (Nav::Members, "/members", "Skeleton Members"),
        (Nav::Pages, "/pages", "All Pages"),
        (Nav::Create, "/create", "Create New Page"),
    ];
    let links: String = entries
        .iter()
        .map(|(nav, href, label)| {
            let class = if *nav == active { r#" class="active""# } else { "" };
            format!(r#"<a href="{href}"{class}>{label}</a>"#)
        })
        .collect::<Vec<_>>()
        .join("\n  ");
    format!("<nav>\n  {links}\n</nav>")
}

fn layout(
    session: &Session,
    active: Nav,
    flash: Option<&Flash>,
    title: &str,
    main: &str,
) -> String {
    let flash_html = flash.map(Flash::render).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title} - Wiki System</title>
<style>{style}</style>
</head><body>
{header}
<div class="layout">
{sidebar}
<main>
  {flash_html}
  {main}
</main>
</div>
</body></html>"#,
        title = escape(title),
        style = base_style(),
        header = header(session),
        sidebar = sidebar(active),
    )
}

fn page_list(pages: &[PageSummary]) -> String {
    if pages.is_empty() {
        return r#"<p class="meta">No pages available yet.</p>"#.to_string();
    }

    let items: String = pages
        .iter()
        .map(|p| {
            format!(
                r#"<li><a href="{href}">{title}</a> <span class="meta">- Last updated by {author} on {updated}</span></li>"#,
                href = escape(&page_href(&p.title)),
                title = escape(&p.title),
                author = escape(&p.author),
                updated = timestamp(&p.updated_at),
            )
        })
        .collect();
    format!(r#"<ul class="pages">{items}</ul>"#)
}

// ── Screens ───────────────────────────────────────────────────────────

pub fn home(session: &Session, flash: Option<&Flash>, pages: &[PageSummary]) -> String {
    let auth_forms = if session.is_authenticated() {
        String::new()
    } else {
        r#"<h3>Login or Sign Up</h3>
  <div class="columns">
    <section>
      <form method="POST" action="/login">
        <div class="form-group"><label>Username</label><input type="text" name="username" required autocomplete="username"></div>
        <div class="form-group"><label>Password</label><input type="password" name="password" required autocomplete="current-password"></div>
        <button type="submit" class="btn btn-primary">Login</button>
      </form>
    </section>
    <section>
      <form method="POST" action="/signup">
        <div class="form-group"><label>New username</label><input type="text" name="username" required autocomplete="username"></div>
        <div class="form-group"><label>New password</label><input type="password" name="password" required autocomplete="new-password"></div>
        <button type="submit" class="btn btn-secondary">Sign Up</button>
      </form>
    </section>
  </div>"#
            .to_string()
    };

    let main = format!(
        r#"<h2>Wiki Home</h2>
  <p>Welcome to the Wiki System!</p>
  {auth_forms}
  <h3>Recently updated pages</h3>
  {list}"#,
        list = page_list(pages),
    );
    layout(session, Nav::Home, flash, "Home", &main)
}

pub fn members(
    session: &Session,
    flash: Option<&Flash>,
    profiles: &[Profile],
    own_description: &str,
) -> String {
    let edit_form = if session.is_authenticated() {
        format!(
            r#"<form method="POST" action="/members/profile">
    <div class="form-group"><label>Describe Yourself</label><textarea name="description">{}</textarea></div>
    <button type="submit" class="btn btn-primary">Update Profile</button>
  </form>"#,
            escape(own_description)
        )
    } else {
        r#"<p class="meta">Log in to add your own profile.</p>"#.to_string()
    };

    let entries: String = if profiles.is_empty() {
        r#"<p class="meta">No profiles yet.</p>"#.to_string()
    } else {
        profiles
            .iter()
            .map(|p| {
                format!(
                    r#"<details><summary>{}</summary><pre class="content">{}</pre></details>"#,
                    escape(&p.username),
                    escape(&p.description)
                )
            })
            .collect()
    };

    let main = format!(
        r#"<h2>Skeleton Members Profiles</h2>
  {edit_form}
  <h3>Members' Profiles</h3>
  {entries}"#
    );
    layout(session, Nav::Members, flash, "Members", &main)
}

pub fn archive(session: &Session, flash: Option<&Flash>, pages: &[PageSummary]) -> String {
    let main = format!("<h2>All Pages</h2>\n  {}", page_list(pages));
    layout(session, Nav::Pages, flash, "All Pages", &main)
}

/// Create form, refilled with whatever was submitted last.
pub fn create_form(session: &Session, flash: Option<&Flash>, title: &str, content: &str) -> String {
    let main = if session.is_authenticated() {
        format!(
            r#"<h2>Create a New Wiki Page</h2>
  <form method="POST" action="/pages">
    <div class="form-group"><label>Page Title</label><input type="text" name="title" value="{}"></div>
    <div class="form-group"><label>Page Content</label><textarea name="content">{}</textarea></div>
    <button type="submit" class="btn btn-primary">Create Page</button>
  </form>"#,
            escape(title),
            escape(content)
        )
    } else {
        r#"<h2>Create a New Wiki Page</h2>
  <div class="flash error">Please log in to create a new page.</div>"#
            .to_string()
    };
    layout(session, Nav::Create, flash, "Create Page", &main)
}

pub fn page_view(session: &Session, flash: Option<&Flash>, page: &Page) -> String {
    let href = escape(&page_href(&page.title));
    let controls = if session.is_authenticated() {
        format!(
            r#"<h3>Edit this page</h3>
  <form method="POST" action="{href}/edit">
    <div class="form-group"><textarea name="content">{content}</textarea></div>
    <div class="actions">
      <button type="submit" class="btn btn-primary">Save Changes</button>
    </div>
  </form>
  <form method="POST" action="{href}/delete" class="actions">
    <button type="submit" class="btn btn-danger">Delete Page</button>
  </form>"#,
            content = escape(&page.content),
        )
    } else {
        r#"<p class="meta">Log in to edit this page.</p>"#.to_string()
    };

    let main = format!(
        r#"<h2>{title}</h2>
  <p class="meta">Last updated by {author} on {updated} &middot; created {created}</p>
  <pre class="content">{content}</pre>
  {controls}"#,
        title = escape(&page.title),
        author = escape(&page.author),
        updated = timestamp(&page.updated_at),
        created = timestamp(&page.created_at),
        content = escape(&page.content),
    );
    layout(session, Nav::None, flash, &page.title, &main)
}

pub fn page_not_found(session: &Session, title: &str) -> String {
    let main = format!(
        r#"<h2>Page not found</h2>
  <p>There is no page titled <strong>{}</strong>.</p>
  <p><a href="/create">Create it</a> or go back to <a href="/pages">all pages</a>.</p>"#,
        escape(title)
    );
    layout(session, Nav::None, None, "Not found", &main)
}

/// Minimal screen for failures where the session may not be known.
pub fn error_page(status: StatusCode) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    let main = format!(
        r#"<h2>{code} {reason}</h2>
  <p>Something went wrong. <a href="/">Back to home</a></p>"#,
        code = status.as_u16(),
    );
    layout(&Session::Anonymous, Nav::None, None, reason, &main)
}
