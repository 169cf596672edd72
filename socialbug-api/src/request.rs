use reqwest::Method;
use reqwest::multipart::Form;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// How a request carries its data
pub enum RequestData<T> {
    Empty,
    Query(T),
    Json(T),
}

/// A typed call against the REST API
///
/// Implementors describe the path, method and body; [`crate::Client::send`]
/// takes care of authentication, status mapping and decoding.
pub trait Endpoint: Send + Sync {
    type Data: Serialize + ?Sized;
    type Response: DeserializeOwned;

    const METHOD: Method = Method::GET;

    /// Whether the bearer credential must be attached
    const AUTHENTICATED: bool = true;

    /// Path relative to the API base URL, starting with `/`
    fn endpoint(&self) -> Cow<'_, str>;

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Empty
    }

    /// Multipart body, for uploads. Takes precedence over [`Endpoint::data`].
    fn multipart(&self) -> Option<Form> {
        None
    }
}

/// Percent-encode a single path segment
pub(crate) fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
