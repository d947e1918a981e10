//! Operation mapping.
//!
//! Derives, per (endpoint, method) pair, everything the client renderer
//! needs: method name, path and query parameters, request/response linkage,
//! streaming and form flags, and the method shape.

use std::collections::{BTreeSet, HashSet};

use serde_json::Value;

use crate::classifier::{ClassificationContext, FORM_DATA_SUFFIX};
use crate::document::{ApiDocument, RawOperation};
use crate::formatter::primitive_type;
use crate::ir::{ApiOperation, HttpMethod, MethodShape, PropertyShape, QueryParameter};
use crate::naming::{camel_segments, method_name_from_operation_id, pascal_segments};
use crate::resolver::PropertyResolver;

const STREAM_SUFFIX: &str = "Stream";

/// Maps raw document operations to [`ApiOperation`]s.
#[derive(Debug, Clone, Copy)]
pub struct OperationMapper<'a> {
    document: &'a ApiDocument,
    context: &'a ClassificationContext,
    streamed: &'a HashSet<String>,
}

impl<'a> OperationMapper<'a> {
    /// Create a mapper.
    ///
    /// `streamed` holds the endpoint templates configured as streamed.
    pub fn new(
        document: &'a ApiDocument,
        context: &'a ClassificationContext,
        streamed: &'a HashSet<String>,
    ) -> Self {
        Self {
            document,
            context,
            streamed,
        }
    }

    /// Map every operation, in document traversal order.
    pub fn map_all(&self) -> Vec<ApiOperation> {
        self.document
            .operations()
            .iter()
            .map(|raw| self.map(raw))
            .collect()
    }

    /// Map one operation.
    pub fn map(&self, raw: &RawOperation<'_>) -> ApiOperation {
        let form_request = self.context.form_request_for(raw.endpoint, raw.method);
        let request = form_request
            .or_else(|| raw.request_schema_ref())
            .map(str::to_string);
        let response = raw.response_schema_ref().map(str::to_string);
        let path_params = path_params(raw.endpoint);
        let query_params = self.query_params(raw);
        let is_streamed = self.streamed.contains(raw.endpoint);

        let has_request = request.is_some() || !query_params.is_empty();
        let shape = MethodShape::select(has_request, response.is_some(), is_streamed);
        let skip_body = request
            .as_deref()
            .map(|name| self.request_satisfied_by_path(name, &path_params))
            .unwrap_or(false);

        let mut method_name = match raw.operation_id() {
            Some(id) => method_name_from_operation_id(id),
            None => fallback_method_name(
                raw.method,
                raw.endpoint,
                request.as_deref(),
                response.as_deref(),
            ),
        };
        if shape == MethodShape::StreamedSequence {
            method_name.push_str(STREAM_SUFFIX);
        }

        tracing::debug!(
            endpoint = %raw.endpoint,
            method = %raw.method,
            name = %method_name,
            shape = ?shape,
            "mapped operation"
        );

        ApiOperation {
            endpoint: raw.endpoint.to_string(),
            method: raw.method,
            operation_id: raw.operation_id().map(str::to_string),
            method_name,
            path_params,
            query_params,
            request,
            response,
            is_streamed,
            is_form_endpoint: form_request.is_some(),
            skip_body,
            shape,
        }
    }

    fn query_params(&self, raw: &RawOperation<'_>) -> Vec<QueryParameter> {
        let resolver = PropertyResolver::new(self.context);
        let none = BTreeSet::new();

        self.document
            .parameters(raw)
            .into_iter()
            .filter(|param| param.get("in").and_then(Value::as_str) == Some("query"))
            .filter_map(|param| {
                let name = param.get("name").and_then(Value::as_str)?;
                // Older documents put `type` on the parameter itself.
                let schema = param.get("schema").unwrap_or(param);
                let descriptor = resolver.resolve(name, schema, &none);
                Some(QueryParameter {
                    name: name.to_string(),
                    required: param.get("required").and_then(Value::as_bool).unwrap_or(false),
                    ty: query_type(&descriptor.shape),
                })
            })
            .collect()
    }

    /// The linked request has properties and every one is a path parameter.
    fn request_satisfied_by_path(&self, request: &str, path_params: &[String]) -> bool {
        let Some(object) = self.context.component(request).and_then(|c| c.as_object()) else {
            return false;
        };
        if object.properties.is_empty() || path_params.is_empty() {
            return false;
        }
        object
            .properties
            .iter()
            .all(|property| path_params.iter().any(|p| *p == property.name))
    }
}

/// `{token}` placeholders of an endpoint template, in order.
pub fn path_params(endpoint: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut rest = endpoint;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            break;
        };
        let token = &after[..end];
        if !token.is_empty() && !params.iter().any(|p| p == token) {
            params.push(token.to_string());
        }
        rest = &after[end + 1..];
    }
    params
}

/// Query values travel as strings, so dates stay `string` and nested
/// objects degrade to `string`.
fn query_type(shape: &PropertyShape) -> String {
    match shape {
        PropertyShape::Primitive(primitive) => primitive_type(primitive),
        PropertyShape::EnumRef(name) => name.clone(),
        PropertyShape::Array(items) => format!("{}[]", query_type(&items.shape)),
        PropertyShape::DateTime
        | PropertyShape::ObjectRef(_)
        | PropertyShape::RequestRef(_)
        | PropertyShape::Dictionary(_) => "string".to_string(),
    }
}

fn fallback_method_name(
    method: HttpMethod,
    endpoint: &str,
    request: Option<&str>,
    response: Option<&str>,
) -> String {
    let linked = match method {
        HttpMethod::Get => response.map(|name| strip_suffix(name, &["Response"])),
        _ => request.map(|name| strip_suffix(name, &[FORM_DATA_SUFFIX, "Request"])),
    };

    match linked.filter(|name| !name.is_empty()) {
        Some(name) => camel_segments(name),
        None => format!("{}{}", method.verb_word(), pascal_segments(endpoint)),
    }
}

fn strip_suffix<'n>(name: &'n str, suffixes: &[&str]) -> &'n str {
    suffixes
        .iter()
        .find_map(|suffix| name.strip_suffix(*suffix))
        .unwrap_or(name)
}
