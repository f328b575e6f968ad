use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use maud::Markup;

pub fn html_response(markup: Markup) -> ResultResp {
    html_response_with_status(200, markup)
}

pub fn html_response_with_status(status: u16, markup: Markup) -> ResultResp {
    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(markup.into_string()))
        .map_err(|_| ServerError::InternalError)
}

pub fn text_response(status: u16, body: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Body::from(body.to_string()))
        .map_err(|_| ServerError::InternalError)
}
