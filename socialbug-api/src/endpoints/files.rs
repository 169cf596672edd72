use crate::Endpoint;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::borrow::Cow;

/// Multipart upload of a media asset under the `image` field
#[derive(Debug, Clone)]
pub struct UploadFile {
    file_name: String,
    bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

impl Endpoint for UploadFile {
    type Data = ();
    type Response = UploadedFile;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/files/upload".into()
    }

    fn multipart(&self) -> Option<Form> {
        let part = Part::bytes(self.bytes.clone()).file_name(self.file_name.clone());
        let part = match content_type(&self.file_name) {
            Some(mime) => part.mime_str(mime).ok()?,
            None => part,
        };
        Some(Form::new().part("image", part))
    }
}

/// Media type for the upload part, from the file extension
fn content_type(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let mime = match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        _ => return None,
    };
    Some(mime)
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadedFile {
    #[serde(default)]
    pub url: Option<String>,
}
