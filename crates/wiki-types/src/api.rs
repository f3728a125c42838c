use serde::{Deserialize, Serialize};

// -- Auth --

/// Body of both the login and the sign-up forms.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Session token claims. `sub` is the username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

// -- Profiles --

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub description: String,
}

// -- Pages --

#[derive(Debug, Deserialize)]
pub struct NewPageForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct EditPageForm {
    #[serde(default)]
    pub content: String,
}

/// `GET /?page=<title>` keeps the link format of the home listing working.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub page: Option<String>,
}

// -- Misc --

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub users: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
