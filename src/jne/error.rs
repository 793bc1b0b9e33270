use crate::jne::datetime::FormatError;

/// Errors raised by the parser and the service client.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No entity kind is registered under the requested payload type name.
    #[error("No entity for this payload type: {0}")]
    UnknownPayloadType(String),
    /// A present date or datetime value did not match the declared format.
    #[error("Invalid date value for field {field}")]
    Format {
        field: String,
        #[source]
        source: FormatError,
    },
    /// A present value had a JSON type the declared parser cannot accept.
    #[error("Expected {expected} for {kind} field {field}")]
    Shape {
        kind: &'static str,
        field: String,
        expected: &'static str,
    },
    /// The HTTP request could not be sent or its body could not be read.
    #[error("Request failed: {0}")]
    Request(String),
    /// The API answered with a non-success status.
    #[error("JNE error response: status code = {status}")]
    HttpStatus { status: u16, body: String },
    /// The response body was not valid JSON.
    #[error("Failed to parse JSON: {0}")]
    Decode(String),
}
