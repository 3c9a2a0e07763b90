use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn with_status(self, status: StatusCode) -> Response {
        let json = match serde_json::to_string(&self) {
            Ok(json) => json,
            Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        };

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        (status, headers, json).into_response()
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        self.with_status(StatusCode::OK)
    }
}

pub fn with_total_count<T: Serialize>(data: T, count: usize) -> Response {
    let mut response = ApiResponse { data }.into_response();
    if response.status() == StatusCode::OK {
        response
            .headers_mut()
            .insert("X-Total-Count", HeaderValue::from(count));
    }
    response
}
