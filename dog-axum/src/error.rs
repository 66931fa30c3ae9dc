use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dog_core::errors::DogError;

#[derive(Debug)]
pub struct DogAxumError(pub anyhow::Error);

impl From<anyhow::Error> for DogAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<DogError> for DogAxumError {
    fn from(e: DogError) -> Self {
        Self(e.into_anyhow())
    }
}

impl IntoResponse for DogAxumError {
    fn into_response(self) -> Response {
        // DogErrors keep their Feathers-ish shape even behind anyhow contexts.
        let safe = match DogError::find_in(&self.0) {
            Some(dog) => dog.sanitize_for_client(),
            None => {
                tracing::error!(error = %self.0, "unhandled error in request");
                DogError::general_error(self.0.to_string())
            }
        };
        let status = StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(safe.to_json())).into_response()
    }
}
