//! Minimal JSON:API list-document decoding.
//!
//! The collaborators all speak JSON:API: a `data` array of resources,
//! each with a string `id`, a `type` and an `attributes` object. Only
//! what this service reads is modeled.

use super::FetchError;
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Document<A> {
    #[serde(default = "Vec::new")]
    pub data: Vec<Resource<A>>,
}

#[derive(Debug, Deserialize)]
pub struct Resource<A> {
    pub id: String,
    #[serde(rename = "type")]
    #[allow(dead_code)]
    pub kind: String,
    /// Absent for resources that are pure ids (character lists).
    pub attributes: Option<A>,
}

/// Decodes a JSON:API list document from a response body.
pub fn decode_list<A: DeserializeOwned>(body: &[u8]) -> Result<Vec<Resource<A>>, FetchError> {
    let document: Document<A> =
        serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    Ok(document.data)
}

/// Parses a resource id as a decimal integer.
pub fn numeric_id<T: std::str::FromStr>(resource_id: &str) -> Result<T, FetchError> {
    resource_id
        .parse()
        .map_err(|_| FetchError::Decode(format!("non-numeric resource id {resource_id:?}")))
}
