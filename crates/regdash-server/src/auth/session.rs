use std::collections::HashMap;

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use regdash_core::error::{RegdashError, Result};

use crate::config::AuthSection;

/// Dashboard role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May trigger loads.
    Admin,
    /// May only read published state.
    #[default]
    Viewer,
}

/// Who is making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// No credentials presented.
    Anonymous,
    Authenticated { user_id: String, role: Role },
}

impl Session {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { user_id, .. } => Some(user_id.as_str()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    /// Any authenticated user; returns the user id.
    pub fn require_authenticated(&self) -> Result<&str> {
        self.user_id().ok_or(RegdashError::AuthFailed)
    }

    /// Authenticated with exactly `role` (admins satisfy every role).
    pub fn require_role(&self, role: Role) -> Result<&str> {
        match self {
            Session::Anonymous => Err(RegdashError::AuthFailed),
            Session::Authenticated { user_id, role: have } => {
                if *have == role || *have == Role::Admin {
                    Ok(user_id.as_str())
                } else {
                    Err(RegdashError::NotAllowed(format!("{role:?} role required")))
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct TokenEntry {
    user_id: String,
    role: Role,
}

/// Static bearer-token table built from config.
#[derive(Debug, Default)]
pub struct TokenRegistry {
    tokens: HashMap<String, TokenEntry>,
}

impl TokenRegistry {
    pub fn from_config(cfg: &AuthSection) -> Self {
        let tokens = cfg
            .tokens
            .iter()
            .map(|t| {
                (
                    t.token.clone(),
                    TokenEntry {
                        user_id: t.user_id.clone(),
                        role: t.role,
                    },
                )
            })
            .collect();
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// No token is an anonymous session; an unknown token is an auth failure.
    pub fn resolve(&self, token: Option<&str>) -> Result<Session> {
        let Some(token) = token else {
            return Ok(Session::Anonymous);
        };
        let entry = self.tokens.get(token).ok_or(RegdashError::AuthFailed)?;
        Ok(Session::Authenticated {
            user_id: entry.user_id.clone(),
            role: entry.role,
        })
    }
}

/// Extract `<token>` from `Authorization: Bearer <token>`.
///
/// No header is `Ok(None)`. A header that is present but is not a bearer
/// credential is `AuthFailed`. The scheme name is case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| RegdashError::AuthFailed)?;
    let (scheme, token) = value.split_once(' ').ok_or(RegdashError::AuthFailed)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(RegdashError::AuthFailed);
    }
    Ok(Some(token))
}
