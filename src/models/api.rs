//! Payloads exchanged with the backend under test.

use serde::{Deserialize, Serialize};

/// Characters cycled through by the search payload.
pub const SEARCH_ALPHABET: &str = "azertyuiopqsdfghjklmwxcvbnAZERTYUIOPQSDFGHJLMWXCVBN0123456789-_";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub login: String,
    pub password: String,
    pub email: String,
}

impl RegisterRequest {
    /// Deterministic synthetic user number `index`.
    pub fn synthetic(index: usize) -> Self {
        Self {
            login: synthetic_login(index),
            password: format!("Password{}", index),
            email: format!("user{}@example.org", index),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

impl LoginRequest {
    pub fn synthetic(index: usize) -> Self {
        Self {
            login: synthetic_login(index),
            password: format!("Password{}", index),
        }
    }
}

pub fn synthetic_login(index: usize) -> String {
    format!("User{}", index)
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchEntry {
    pub login: String,
}

/// Builds the search query sent by every job of the search phase.
///
/// Entry `i` carries a single character picked by `i / len`, so the payload is
/// made of long runs of the same login prefix.
pub fn search_payload(entries: usize) -> Vec<SearchEntry> {
    let alphabet: Vec<char> = SEARCH_ALPHABET.chars().collect();
    let len = alphabet.len();
    (0..entries)
        .map(|i| SearchEntry {
            login: alphabet[(i / len) % len].to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardsQuery {
    pub locale: String,
}

impl BoardsQuery {
    pub fn alternating(index: usize) -> Self {
        let locale = if index % 2 == 0 { "en-US" } else { "fr-FR" };
        Self {
            locale: locale.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub max_players: u32,
    pub salary: u32,
    pub locale: String,
    pub initial_money: u32,
    pub friends_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl CreateGameRequest {
    pub fn new(with_password: bool) -> Self {
        Self {
            max_players: 4,
            salary: 200,
            locale: "en-US".to_string(),
            initial_money: 2500,
            friends_only: false,
            password: with_password.then(|| "password".to_string()),
        }
    }
}
