//! Read access over a raw API description.
//!
//! The document stays a loosely typed `serde_json::Value` tree. This module
//! only knows where things live (`paths`, `components.schemas`, request and
//! response content) and hands out borrowed nodes in document order.

use serde_json::{Map, Value};

use crate::error::{GenerateError, GenerateResult};
use crate::ir::HttpMethod;

/// Media type used for form-encoded request bodies.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// A parsed API description document.
#[derive(Debug, Clone)]
pub struct ApiDocument {
    root: Value,
}

/// One (endpoint template, HTTP method) pair as it appears in the document.
#[derive(Debug, Clone, Copy)]
pub struct RawOperation<'a> {
    /// Endpoint template, e.g. `/widgets/{id}`.
    pub endpoint: &'a str,
    /// HTTP method.
    pub method: HttpMethod,
    /// The operation object.
    pub node: &'a Value,
    path_item: &'a Value,
}

impl ApiDocument {
    /// Wrap a JSON value. The root must be an object.
    pub fn from_value(root: Value) -> GenerateResult<Self> {
        if !root.is_object() {
            return Err(GenerateError::invalid_document(
                "document root is not a JSON object",
            ));
        }
        Ok(Self { root })
    }

    /// The raw root node.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Named schemas under `components.schemas`, in document order.
    pub fn schemas(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.root
            .pointer("/components/schemas")
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|schemas| schemas.iter().map(|(name, node)| (name.as_str(), node)))
    }

    /// Every supported operation, endpoint by endpoint, in document order.
    ///
    /// Methods the runtime client has no verb for (`head`, `options`, ...)
    /// are skipped.
    pub fn operations(&self) -> Vec<RawOperation<'_>> {
        let Some(paths) = self.root.get("paths").and_then(Value::as_object) else {
            return Vec::new();
        };

        let mut operations = Vec::new();
        for (endpoint, path_item) in paths {
            let Some(methods) = path_item.as_object() else {
                continue;
            };
            for (key, node) in methods {
                match HttpMethod::parse(key) {
                    Some(method) => operations.push(RawOperation {
                        endpoint,
                        method,
                        node,
                        path_item,
                    }),
                    None if key == "parameters" || key == "summary" || key == "description" => {}
                    None => tracing::debug!(endpoint = %endpoint, method = %key, "skipping unsupported method"),
                }
            }
        }
        operations
    }

    /// Resolve a `#/components/parameters/...` reference, if the node is one.
    fn resolve_parameter<'a>(&'a self, node: &'a Value) -> Option<&'a Value> {
        match node.get("$ref").and_then(Value::as_str) {
            Some(reference) => {
                let pointer = reference.strip_prefix('#')?;
                self.root.pointer(pointer)
            }
            None => Some(node),
        }
    }

    /// Declared parameters of an operation: path-item level first, then
    /// operation level, with operation entries replacing same-named ones.
    pub fn parameters<'a>(&'a self, operation: &RawOperation<'a>) -> Vec<&'a Value> {
        let mut params: Vec<&Value> = Vec::new();
        let sources = [
            operation.path_item.get("parameters"),
            operation.node.get("parameters"),
        ];
        for list in sources.into_iter().flatten().filter_map(Value::as_array) {
            for raw in list {
                let Some(param) = self.resolve_parameter(raw) else {
                    tracing::debug!(endpoint = %operation.endpoint, "unresolvable parameter reference");
                    continue;
                };
                let name = param.get("name").and_then(Value::as_str);
                let location = param.get("in").and_then(Value::as_str);
                params.retain(|existing| {
                    existing.get("name").and_then(Value::as_str) != name
                        || existing.get("in").and_then(Value::as_str) != location
                });
                params.push(param);
            }
        }
        params
    }
}

impl<'a> RawOperation<'a> {
    /// The `operationId`, if present and non-empty.
    pub fn operation_id(&self) -> Option<&'a str> {
        self.node
            .get("operationId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }

    fn request_content(&self) -> Option<&'a Map<String, Value>> {
        self.node
            .pointer("/requestBody/content")
            .and_then(Value::as_object)
    }

    fn response_content(&self) -> Option<&'a Map<String, Value>> {
        self.node
            .pointer("/responses/200/content")
            .and_then(Value::as_object)
    }

    /// Schema name referenced by the request body, if any media type uses a `$ref`.
    pub fn request_schema_ref(&self) -> Option<&'a str> {
        self.request_content().and_then(first_schema_ref)
    }

    /// Schema name referenced by the 200 response, if any media type uses a `$ref`.
    pub fn response_schema_ref(&self) -> Option<&'a str> {
        self.response_content().and_then(first_schema_ref)
    }

    /// The inline schema of a multipart request body that has no `$ref`.
    pub fn inline_form_schema(&self) -> Option<&'a Value> {
        let schema = self.request_content()?.get(MULTIPART_FORM_DATA)?.get("schema")?;
        if schema.get("$ref").is_some() {
            None
        } else {
            Some(schema)
        }
    }
}

/// First `$ref` schema name across a content map's media types.
fn first_schema_ref(content: &Map<String, Value>) -> Option<&str> {
    content.values().find_map(|media| {
        media
            .pointer("/schema/$ref")
            .and_then(Value::as_str)
            .and_then(ref_name)
    })
}

/// Strip the document-pointer prefix of a `$ref`, keeping the schema name.
///
/// Returns `None` when nothing usable follows the last `/`.
pub fn ref_name(reference: &str) -> Option<&str> {
    let name = reference.rsplit('/').next()?;
    if name.is_empty() || name == "#" {
        None
    } else {
        Some(name)
    }
}

/// Names listed in a schema's `required` array.
pub fn required_names(schema: &Value) -> Vec<String> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ApiDocument {
        ApiDocument::from_value(json!({
            "paths": {
                "/widgets/{id}": {
                    "parameters": [{ "name": "id", "in": "path", "required": true }],
                    "get": {
                        "operationId": "getWidget",
                        "parameters": [{ "$ref": "#/components/parameters/Limit" }],
                        "responses": {
                            "200": { "content": { "application/json": {
                                "schema": { "$ref": "#/components/schemas/Widget" }
                            } } }
                        }
                    },
                    "head": {}
                },
                "/upload": {
                    "post": {
                        "requestBody": { "content": { "multipart/form-data": {
                            "schema": { "type": "object", "properties": { "file": { "type": "string", "format": "binary" } } }
                        } } }
                    }
                }
            },
            "components": {
                "parameters": { "Limit": { "name": "limit", "in": "query" } },
                "schemas": { "Widget": { "type": "object" }, "Color": { "enum": ["red"] } }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_rejects_non_object_root() {
        assert!(ApiDocument::from_value(json!([1, 2])).is_err());
    }

    #[test]
    fn test_schemas_in_document_order() {
        let doc = sample();
        let names: Vec<_> = doc.schemas().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Widget", "Color"]);
    }

    #[test]
    fn test_operations_skip_unsupported_methods() {
        let doc = sample();
        let ops = doc.operations();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].endpoint, "/widgets/{id}");
        assert_eq!(ops[0].method, HttpMethod::Get);
        assert_eq!(ops[1].method, HttpMethod::Post);
    }

    #[test]
    fn test_response_ref_and_inline_form() {
        let doc = sample();
        let ops = doc.operations();
        assert_eq!(ops[0].response_schema_ref(), Some("Widget"));
        assert_eq!(ops[0].operation_id(), Some("getWidget"));
        assert!(ops[0].inline_form_schema().is_none());
        assert!(ops[1].inline_form_schema().is_some());
        assert!(ops[1].request_schema_ref().is_none());
    }

    #[test]
    fn test_parameters_merge_path_level_and_refs() {
        let doc = sample();
        let ops = doc.operations();
        let params = doc.parameters(&ops[0]);
        let names: Vec<_> = params
            .iter()
            .filter_map(|p| p.get("name").and_then(Value::as_str))
            .collect();
        assert_eq!(names, vec!["id", "limit"]);
    }

    #[test]
    fn test_ref_name() {
        assert_eq!(ref_name("#/components/schemas/Widget"), Some("Widget"));
        assert_eq!(ref_name("Widget"), Some("Widget"));
        assert_eq!(ref_name("#/components/schemas/"), None);
        assert_eq!(ref_name("#"), None);
    }
}
