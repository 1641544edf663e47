pub mod api_key;
pub mod request_id;

pub use api_key::{require_api_key, API_KEY_HEADER};
pub use request_id::{make_span_with_request_id, request_id_middleware, RequestId, REQUEST_ID_HEADER};
