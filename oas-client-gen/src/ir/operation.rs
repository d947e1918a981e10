//! Operation definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP methods the runtime client exposes verbs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Parse a document method key (case-insensitive).
    pub fn parse(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "patch" => Some(HttpMethod::Patch),
            "delete" => Some(HttpMethod::Delete),
            _ => None,
        }
    }

    /// Runtime verb method name.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
        }
    }

    /// Verb word used for fallback method names.
    pub fn verb_word(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "create",
            HttpMethod::Put => "replace",
            HttpMethod::Patch => "update",
            HttpMethod::Delete => "delete",
        }
    }

    /// Whether the runtime verb takes a request body. Only GET goes without.
    pub fn sends_body(self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// A declared `in: query` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParameter {
    /// Parameter name.
    pub name: String,
    /// Whether the parameter is required.
    pub required: bool,
    /// TypeScript type of the parameter value.
    pub ty: String,
}

/// One endpoint template x HTTP method pair, fully mapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiOperation {
    /// Endpoint template, e.g. `/widgets/{id}`.
    pub endpoint: String,

    /// HTTP method.
    pub method: HttpMethod,

    /// The `operationId`, if declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    /// Derived client method name.
    pub method_name: String,

    /// `{token}` placeholders of the endpoint template.
    pub path_params: Vec<String>,

    /// Declared query parameters.
    pub query_params: Vec<QueryParameter>,

    /// Linked request component name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,

    /// Linked response component name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    /// Endpoint is in the configured streamed allow-list.
    pub is_streamed: bool,

    /// Request body is a synthesized multipart form.
    pub is_form_endpoint: bool,

    /// Every property of the linked request is a path parameter.
    pub skip_body: bool,

    /// Selected rendering shape.
    pub shape: MethodShape,
}

impl ApiOperation {
    /// Whether the operation has a linked request or declared query
    /// parameters. This is the request flag of the shape table.
    pub fn has_request(&self) -> bool {
        self.request.is_some() || !self.query_params.is_empty()
    }

    /// Whether the rendered method takes a `request` argument.
    ///
    /// Path placeholders always need one, even for shapes without a body.
    pub fn takes_argument(&self) -> bool {
        self.shape.takes_request() || !self.path_params.is_empty()
    }

    /// Whether the method produces a response value.
    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }
}

/// Client method rendering shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodShape {
    /// Lazy sequence over the iterable verb, one value per decoded chunk.
    StreamedSequence,
    /// Request in, `[value | null, rawResponse]` out.
    RequestResponse,
    /// Request in, `[null, rawResponse]` out.
    RequestOnly,
    /// No request, `[value | null, rawResponse]` out.
    ResponseOnly,
    /// No request, `[null, rawResponse]` out.
    Bare,
}

impl MethodShape {
    /// Select the shape from the three deciding flags.
    pub fn select(has_request: bool, has_response: bool, is_streamed: bool) -> Self {
        match (has_request, has_response, is_streamed) {
            (true, true, true) => MethodShape::StreamedSequence,
            (true, true, false) => MethodShape::RequestResponse,
            (true, false, _) => MethodShape::RequestOnly,
            (false, true, _) => MethodShape::ResponseOnly,
            (false, false, _) => MethodShape::Bare,
        }
    }

    /// Whether the method takes a request argument.
    pub fn takes_request(self) -> bool {
        matches!(
            self,
            MethodShape::StreamedSequence | MethodShape::RequestResponse | MethodShape::RequestOnly
        )
    }

    /// Whether the method converts a response body.
    pub fn yields_value(self) -> bool {
        matches!(
            self,
            MethodShape::StreamedSequence | MethodShape::RequestResponse | MethodShape::ResponseOnly
        )
    }
}
