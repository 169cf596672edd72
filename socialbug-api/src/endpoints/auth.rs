use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::{Endpoint, RequestData};

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct Login {
    email: String,
    password: String,
}

impl Login {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl Endpoint for Login {
    type Data = Self;
    type Response = TokenResponse;
    const METHOD: Method = Method::POST;
    const AUTHENTICATED: bool = false;

    fn endpoint(&self) -> Cow<'_, str> {
        "/auth/login".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Register {
    name: String,
    email: String,
    password: String,
}

impl Register {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl Endpoint for Register {
    type Data = Self;
    type Response = TokenResponse;
    const METHOD: Method = Method::POST;
    const AUTHENTICATED: bool = false;

    fn endpoint(&self) -> Cow<'_, str> {
        "/auth/register".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

// Responses

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
}
