pub mod errors;
pub mod html;
pub mod json;
pub mod redirect;

pub use errors::{html_error_response, json_error_response, ResultResp};

pub use html::{html_response, text_response};
pub use json::json_response;
pub use redirect::{redirect, redirect_with_cookie};
