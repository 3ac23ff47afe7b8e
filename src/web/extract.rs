//! Request extractors backed by the toolkit.

use axum::{
    async_trait,
    extract::{FromRef, FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::{Toolkit, ToolkitError};

/// A JSON extractor that applies the toolkit's strict decoding rules.
///
/// The body size limit and the unknown-field policy come from the
/// [`Toolkit`] in router state. Rejections render as error envelopes.
///
/// # Example
///
/// ```ignore
/// use webtoolkit::web::extract::StrictJson;
///
/// async fn create(StrictJson(payload): StrictJson<CreateRequest>) -> impl IntoResponse {
///     // payload has no unknown keys and no trailing data
/// }
/// ```
#[derive(Debug)]
pub struct StrictJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for StrictJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Toolkit: FromRef<S>,
{
    type Rejection = ToolkitError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let toolkit = Toolkit::from_ref(state);
        let value = toolkit.read_json(req).await?;

        Ok(StrictJson(value))
    }
}
