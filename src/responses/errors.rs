use crate::errors::ServerError;
use crate::templates::pages::error_page;
use astra::{Body, Response, ResponseBuilder};
use serde_json::json;
use tracing::error;

pub type ResultResp = Result<Response, ServerError>;

fn log_if_internal(err: &ServerError) {
    if err.status() >= 500 {
        error!(error = %err, "request failed");
    }
}

/// Convert a ServerError into a proper HTML error page.
pub fn html_error_response(err: ServerError) -> Response {
    log_if_internal(&err);
    let status = err.status();
    let page = error_page(status, &err.public_message()).into_string();

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(page))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}

/// Convert a ServerError into a `{"error": ..}` body for API callers.
pub fn json_error_response(err: ServerError) -> Response {
    log_if_internal(&err);
    let body = json!({ "error": err.public_message() }).to_string();

    ResponseBuilder::new()
        .status(err.status())
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
