//! Client class rendering.
//!
//! Every operation becomes one method on the generated client. The method
//! shape decides the signature and how the response body is handled; the
//! runtime base class does the actual HTTP work through its verb methods
//! (`get`, `post`, ...), form variants (`postForm`, ...) and iterable
//! variants (`postIterable`, ...).

use super::code::CodeBuffer;
use super::declaration::Render;
use crate::classifier::ClassificationContext;
use crate::formatter::{dto_type_name, request_type_name};
use crate::ir::{ApiOperation, ComponentKind, MethodShape, PrimitiveType, PropertyShape};
use crate::naming::{property_access, property_key, string_literal};

/// How the response body becomes the returned value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseValue {
    /// Wrap the wire value in a value class: `new Name(data)`.
    Construct { class: String, dto: String },
    /// Return the wire value unchanged (enum, request-typed or unknown body).
    AsIs { ty: String },
}

impl ResponseValue {
    /// Type of the returned value.
    pub fn value_type(&self) -> &str {
        match self {
            ResponseValue::Construct { class, .. } => class,
            ResponseValue::AsIs { ty } => ty,
        }
    }

    /// Type argument for the runtime call.
    pub fn wire_type(&self) -> &str {
        match self {
            ResponseValue::Construct { dto, .. } => dto,
            ResponseValue::AsIs { ty } => ty,
        }
    }

    fn wrap(&self, expr: &str) -> String {
        match self {
            ResponseValue::Construct { class, .. } => format!("new {}({})", class, expr),
            ResponseValue::AsIs { .. } => expr.to_string(),
        }
    }
}

/// Body argument of the runtime call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallBody {
    /// The verb takes no body (GET, or no request at all).
    Omitted,
    /// The whole `request` object.
    Request,
    /// `{}`: every request field already travels in the path.
    Empty,
    /// A `FormData` built from the request fields.
    Form,
    /// `undefined`, keeping the query argument in position.
    Undefined,
}

/// One `formData.append(...)` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    /// `request.x` access expression.
    pub access: String,
    /// Guarded with `!= null`.
    pub optional: bool,
    /// Appended as-is rather than through `String(...)`.
    pub is_file: bool,
}

/// A rendered client method, before text assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMethod {
    pub name: String,
    pub shape: MethodShape,
    /// Type of the `request` parameter, when the method takes one.
    pub request_type: Option<String>,
    /// Runtime method called (`get`, `postForm`, `postIterable`, ...).
    pub verb: String,
    /// Template literal for the call path.
    pub path: String,
    pub body: CallBody,
    /// Object literal passed as query, if any query parameters exist.
    pub query: Option<String>,
    pub form_fields: Vec<FormField>,
    /// Response handling, for shapes that yield a value.
    pub response: Option<ResponseValue>,
}

/// `export class {Client} extends {Runtime} { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientClass {
    pub name: String,
    pub runtime_class: String,
    pub base_url: String,
    pub methods: Vec<ClientMethod>,
}

/// Builds client methods from mapped operations.
#[derive(Debug, Clone, Copy)]
pub struct ClientRenderer<'a> {
    context: &'a ClassificationContext,
}

impl<'a> ClientRenderer<'a> {
    /// Create a renderer over a finished classification.
    pub fn new(context: &'a ClassificationContext) -> Self {
        Self { context }
    }

    /// Build the client class.
    pub fn client_class(
        &self,
        name: &str,
        runtime_class: &str,
        base_url: &str,
        operations: &[ApiOperation],
    ) -> ClientClass {
        ClientClass {
            name: name.to_string(),
            runtime_class: runtime_class.to_string(),
            base_url: base_url.to_string(),
            methods: operations.iter().map(|op| self.method(op)).collect(),
        }
    }

    /// Build one method.
    pub fn method(&self, operation: &ApiOperation) -> ClientMethod {
        let shape = operation.shape;
        let sends_body = operation.method.sends_body();
        let is_form = operation.is_form_endpoint && sends_body && shape.takes_request();

        let body = if !shape.takes_request() || !sends_body {
            CallBody::Omitted
        } else if is_form {
            CallBody::Form
        } else if operation.request.is_none() {
            CallBody::Undefined
        } else if operation.skip_body {
            CallBody::Empty
        } else {
            CallBody::Request
        };

        let verb = match shape {
            MethodShape::StreamedSequence => format!("{}Iterable", operation.method.as_str()),
            _ if body == CallBody::Form => format!("{}Form", operation.method.as_str()),
            _ => operation.method.as_str().to_string(),
        };

        ClientMethod {
            name: operation.method_name.clone(),
            shape,
            request_type: self.request_type(operation),
            verb,
            path: path_template(&operation.endpoint),
            body,
            query: query_literal(operation),
            form_fields: if is_form {
                self.form_fields(operation)
            } else {
                Vec::new()
            },
            response: if shape.yields_value() {
                operation.response.as_deref().map(|name| self.response_value(name))
            } else {
                None
            },
        }
    }

    /// Named request type intersected with the path and query fields.
    fn request_type(&self, operation: &ApiOperation) -> Option<String> {
        if !operation.takes_argument() {
            return None;
        }

        let named = if operation.shape.takes_request() {
            operation.request.as_deref().map(|name| match self.context.kind_of(name) {
                Some(ComponentKind::Enum) => name.to_string(),
                _ => request_type_name(name),
            })
        } else {
            None
        };

        let mut fields: Vec<String> = operation
            .path_params
            .iter()
            .map(|param| format!("{}: string", property_key(param)))
            .collect();
        if operation.shape.takes_request() {
            fields.extend(operation.query_params.iter().map(|param| {
                if param.required {
                    format!("{}: {}", property_key(&param.name), param.ty)
                } else {
                    format!("{}?: {}", property_key(&param.name), param.ty)
                }
            }));
        }
        let literal = if fields.is_empty() {
            None
        } else {
            Some(format!("{{ {} }}", fields.join("; ")))
        };

        match (named, literal) {
            (Some(named), Some(literal)) => Some(format!("{} & {}", named, literal)),
            (Some(named), None) => Some(named),
            (None, Some(literal)) => Some(literal),
            (None, None) => Some("Record<string, never>".to_string()),
        }
    }

    fn response_value(&self, name: &str) -> ResponseValue {
        match self.context.kind_of(name) {
            Some(ComponentKind::Response) | Some(ComponentKind::Model) => ResponseValue::Construct {
                class: name.to_string(),
                dto: dto_type_name(name),
            },
            Some(ComponentKind::Enum) => ResponseValue::AsIs {
                ty: name.to_string(),
            },
            Some(ComponentKind::Request) => ResponseValue::AsIs {
                ty: request_type_name(name),
            },
            None => {
                tracing::debug!(response = %name, "response schema not found, returning unknown");
                ResponseValue::AsIs {
                    ty: "unknown".to_string(),
                }
            }
        }
    }

    fn form_fields(&self, operation: &ApiOperation) -> Vec<FormField> {
        let Some(form) = operation
            .request
            .as_deref()
            .and_then(|name| self.context.component(name))
            .and_then(|component| component.as_object())
        else {
            return Vec::new();
        };

        form.properties
            .iter()
            .map(|property| FormField {
                name: property.name.clone(),
                access: property_access("request", &property.name),
                optional: property.nullable,
                is_file: property.shape == PropertyShape::Primitive(PrimitiveType::File),
            })
            .collect()
    }
}

/// Endpoint template as a template literal with encoded path fields.
fn path_template(endpoint: &str) -> String {
    let mut out = String::from("`");
    let mut rest = endpoint;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        push_literal(&mut out, &rest[..start]);
        let token = &rest[start + 1..start + len];
        out.push_str(&format!(
            "${{encodeURIComponent({})}}",
            property_access("request", token)
        ));
        rest = &rest[start + len + 1..];
    }
    push_literal(&mut out, rest);
    out.push('`');
    out
}

fn push_literal(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '`' | '\\' | '$' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
}

fn query_literal(operation: &ApiOperation) -> Option<String> {
    if !operation.shape.takes_request() || operation.query_params.is_empty() {
        return None;
    }
    let entries: Vec<String> = operation
        .query_params
        .iter()
        .map(|param| {
            format!(
                "{}: {}",
                property_key(&param.name),
                property_access("request", &param.name)
            )
        })
        .collect();
    Some(format!("{{ {} }}", entries.join(", ")))
}

impl ClientMethod {
    fn signature_parameter(&self) -> String {
        match &self.request_type {
            Some(ty) => format!("request: {}", ty),
            None => String::new(),
        }
    }

    fn call_arguments(&self) -> String {
        let mut args = vec![self.path.clone()];
        let body = match self.body {
            CallBody::Omitted => None,
            CallBody::Request => Some("request"),
            CallBody::Empty => Some("{}"),
            CallBody::Form => Some("formData"),
            CallBody::Undefined => Some("undefined"),
        };
        let streamed = self.shape == MethodShape::StreamedSequence;
        match (body, &self.query) {
            (Some(body), _) => args.push(body.to_string()),
            // Iterable verbs always take a body slot before the query.
            (None, Some(_)) if streamed => args.push("undefined".to_string()),
            (None, _) => {}
        }
        if let Some(query) = &self.query {
            args.push(query.clone());
        }
        args.join(", ")
    }

    fn render_form_data(&self, buf: &mut CodeBuffer) {
        if self.body != CallBody::Form {
            return;
        }
        buf.line("const formData = new FormData();");
        for field in &self.form_fields {
            let value = if field.is_file {
                field.access.clone()
            } else {
                format!("String({})", field.access)
            };
            let append = format!("formData.append({}, {});", string_literal(&field.name), value);
            if field.optional {
                buf.open(format!("if ({} != null) {{", field.access));
                buf.line(append);
                buf.close("}");
            } else {
                buf.line(append);
            }
        }
    }

    fn render_streamed(&self, buf: &mut CodeBuffer) {
        let value_type = self
            .response
            .as_ref()
            .map(ResponseValue::value_type)
            .unwrap_or("unknown");
        buf.open(format!(
            "async *{}({}): AsyncGenerator<{}, void, unknown> {{",
            self.name,
            self.signature_parameter(),
            value_type
        ));
        self.render_form_data(buf);
        buf.line("const decoder = new TextDecoder();");
        buf.open(format!(
            "for await (const chunk of this.{}({})) {{",
            self.verb,
            self.call_arguments()
        ));
        buf.line("const lines = decoder.decode(chunk).split(\"\\n\");");
        buf.open("if (lines.length < 3) {");
        buf.line("throw new Error(\"Malformed stream chunk: expected at least 3 lines\");");
        buf.close("}");
        buf.line("const start = lines[2].indexOf(\"{\");");
        buf.open("if (start < 0) {");
        buf.line("throw new Error(\"Malformed stream chunk: no JSON payload on line 3\");");
        buf.close("}");
        match &self.response {
            Some(response) => {
                buf.line(format!(
                    "const data = JSON.parse(lines[2].substring(start)) as {};",
                    response.wire_type()
                ));
                buf.line(format!("yield {};", response.wrap("data")));
            }
            None => {
                buf.line("yield JSON.parse(lines[2].substring(start));");
            }
        }
        buf.close("}");
        buf.close("}");
    }

    fn render_awaited(&self, buf: &mut CodeBuffer) {
        let value = self.response.as_ref();
        let return_type = match value {
            Some(response) => format!("{} | null", response.value_type()),
            None => "null".to_string(),
        };
        buf.open(format!(
            "async {}({}): Promise<[{}, Response]> {{",
            self.name,
            self.signature_parameter(),
            return_type
        ));
        self.render_form_data(buf);
        match value {
            Some(response) => {
                buf.line(format!(
                    "const {{ data, rawResponse }} = await this.{}<{}>({});",
                    self.verb,
                    response.wire_type(),
                    self.call_arguments()
                ));
                buf.line(format!(
                    "return [rawResponse.ok && data != null ? {} : null, rawResponse];",
                    response.wrap("data")
                ));
            }
            None => {
                buf.line(format!(
                    "const {{ rawResponse }} = await this.{}({});",
                    self.verb,
                    self.call_arguments()
                ));
                buf.line("return [null, rawResponse];");
            }
        }
        buf.close("}");
    }
}

impl Render for ClientMethod {
    fn render(&self, buf: &mut CodeBuffer) {
        match self.shape {
            MethodShape::StreamedSequence => self.render_streamed(buf),
            MethodShape::RequestResponse
            | MethodShape::RequestOnly
            | MethodShape::ResponseOnly
            | MethodShape::Bare => self.render_awaited(buf),
        }
    }
}

impl Render for ClientClass {
    fn render(&self, buf: &mut CodeBuffer) {
        buf.open(format!(
            "export class {} extends {} {{",
            self.name, self.runtime_class
        ));
        buf.open("constructor() {");
        buf.line(format!("super({});", string_literal(&self.base_url)));
        buf.close("}");
        for method in &self.methods {
            buf.blank();
            method.render(buf);
        }
        buf.close("}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::SchemaClassifier;
    use crate::document::ApiDocument;
    use crate::emit::options::EmitOptions;
    use crate::operations::OperationMapper;
    use serde_json::{json, Value};
    use std::collections::HashSet;

    fn methods(doc: Value, streamed: &[&str]) -> Vec<ClientMethod> {
        let document = ApiDocument::from_value(doc).unwrap();
        let context = SchemaClassifier::new(&document).classify();
        let streamed: HashSet<String> = streamed.iter().map(|s| s.to_string()).collect();
        let operations = OperationMapper::new(&document, &context, &streamed).map_all();
        let renderer = ClientRenderer::new(&context);
        operations.iter().map(|op| renderer.method(op)).collect()
    }

    fn text(method: &ClientMethod) -> String {
        let mut buf = CodeBuffer::new();
        method.render(&mut buf);
        buf.finish(&EmitOptions::default())
    }

    fn json_body(schema: &str) -> Value {
        json!({ "content": { "application/json": {
            "schema": { "$ref": format!("#/components/schemas/{}", schema) }
        } } })
    }

    fn widget_schemas() -> Value {
        json!({
            "Widget": { "type": "object", "properties": { "id": { "type": "string" } } },
            "CreateWidget": { "type": "object", "properties": { "name": { "type": "string" } } },
            "Color": { "enum": ["red"] }
        })
    }

    #[test]
    fn test_path_template() {
        assert_eq!(
            path_template("/widgets/{id}/parts/{part-id}"),
            "`/widgets/${encodeURIComponent(request.id)}/parts/${encodeURIComponent(request[\"part-id\"])}`"
        );
        assert_eq!(path_template("/widgets"), "`/widgets`");
    }

    #[test]
    fn test_bare_get_with_path() {
        let m = &methods(json!({ "paths": { "/widgets/{id}": { "get": {} } } }), &[])[0];
        assert_eq!(m.shape, MethodShape::Bare);
        assert_eq!(m.request_type.as_deref(), Some("{ id: string }"));
        assert_eq!(m.body, CallBody::Omitted);
        assert_eq!(
            text(m),
            "\
async getWidgetsId(request: { id: string }): Promise<[null, Response]> {
  const { rawResponse } = await this.get(`/widgets/${encodeURIComponent(request.id)}`);
  return [null, rawResponse];
}
"
        );
    }

    #[test]
    fn test_request_response() {
        let m = &methods(
            json!({
                "paths": { "/widgets": { "post": {
                    "operationId": "createWidget",
                    "requestBody": json_body("CreateWidget"),
                    "responses": { "200": json_body("Widget") }
                } } },
                "components": { "schemas": widget_schemas() }
            }),
            &[],
        )[0];
        assert_eq!(m.shape, MethodShape::RequestResponse);
        assert_eq!(
            text(m),
            "\
async createWidget(request: TCreateWidget): Promise<[Widget | null, Response]> {
  const { data, rawResponse } = await this.post<TWidgetDto>(`/widgets`, request);
  return [rawResponse.ok && data != null ? new Widget(data) : null, rawResponse];
}
"
        );
    }

    #[test]
    fn test_enum_response_returned_as_is() {
        let m = &methods(
            json!({
                "paths": { "/color": { "get": { "responses": { "200": json_body("Color") } } } },
                "components": { "schemas": widget_schemas() }
            }),
            &[],
        )[0];
        assert_eq!(m.shape, MethodShape::ResponseOnly);
        assert_eq!(m.response, Some(ResponseValue::AsIs { ty: "Color".into() }));
        assert!(text(m).contains("return [rawResponse.ok && data != null ? data : null, rawResponse];"));
    }

    #[test]
    fn test_query_and_path_intersection() {
        let m = &methods(
            json!({
                "paths": { "/widgets/{id}": { "put": {
                    "operationId": "replaceWidget",
                    "parameters": [{ "name": "dryRun", "in": "query", "schema": { "type": "boolean" } }],
                    "requestBody": json_body("CreateWidget")
                } } },
                "components": { "schemas": widget_schemas() }
            }),
            &[],
        )[0];
        assert_eq!(
            m.request_type.as_deref(),
            Some("TCreateWidget & { id: string; dryRun?: boolean }")
        );
        assert_eq!(m.query.as_deref(), Some("{ dryRun: request.dryRun }"));
        assert!(text(m).contains(
            "await this.put(`/widgets/${encodeURIComponent(request.id)}`, request, { dryRun: request.dryRun });"
        ));
    }

    #[test]
    fn test_get_never_sends_body() {
        let m = &methods(
            json!({
                "paths": { "/widgets": { "get": {
                    "requestBody": json_body("CreateWidget"),
                    "responses": { "200": json_body("Widget") }
                } } },
                "components": { "schemas": widget_schemas() }
            }),
            &[],
        )[0];
        assert_eq!(m.body, CallBody::Omitted);
        assert!(text(m).contains("await this.get<TWidgetDto>(`/widgets`);"));
    }

    #[test]
    fn test_delete_sends_its_request() {
        let m = &methods(
            json!({
                "paths": { "/widgets": { "delete": {
                    "operationId": "deleteWidgets",
                    "requestBody": json_body("DeleteWidgets")
                } } },
                "components": { "schemas": {
                    "DeleteWidgets": { "type": "object", "properties": {
                        "ids": { "type": "array", "items": { "type": "string" } }
                    } }
                } }
            }),
            &[],
        )[0];
        assert_eq!(m.shape, MethodShape::RequestOnly);
        assert_eq!(m.body, CallBody::Request);
        assert!(text(m).contains("await this.delete(`/widgets`, request);"));
    }

    #[test]
    fn test_property_less_request_is_sent() {
        let m = &methods(
            json!({
                "paths": { "/chat": { "post": {
                    "operationId": "chat",
                    "requestBody": json_body("ChatRequest")
                } } },
                "components": { "schemas": { "ChatRequest": { "type": "object" } } }
            }),
            &[],
        )[0];
        assert_eq!(m.body, CallBody::Request);
        assert!(text(m).contains("await this.post(`/chat`, request);"));
    }

    #[test]
    fn test_skip_body() {
        let m = &methods(
            json!({
                "paths": { "/widgets/{id}": { "patch": {
                    "operationId": "touch",
                    "requestBody": json_body("Touch")
                } } },
                "components": { "schemas": {
                    "Touch": { "type": "object", "properties": { "id": { "type": "string" } } }
                } }
            }),
            &[],
        )[0];
        assert_eq!(m.body, CallBody::Empty);
        assert!(text(m).contains("await this.patch(`/widgets/${encodeURIComponent(request.id)}`, {});"));
    }

    #[test]
    fn test_form_method() {
        let m = &methods(
            json!({ "paths": { "/files": { "post": {
                "operationId": "upload",
                "requestBody": { "content": { "multipart/form-data": { "schema": {
                    "type": "object",
                    "required": ["file"],
                    "properties": {
                        "file": { "type": "string", "format": "binary" },
                        "note": { "type": "string", "nullable": true }
                    }
                } } } }
            } } } }),
            &[],
        )[0];
        assert_eq!(m.verb, "postForm");
        assert_eq!(
            text(m),
            "\
async upload(request: TUploadRequestFormData): Promise<[null, Response]> {
  const formData = new FormData();
  formData.append(\"file\", request.file);
  if (request.note != null) {
    formData.append(\"note\", String(request.note));
  }
  const { rawResponse } = await this.postForm(`/files`, formData);
  return [null, rawResponse];
}
"
        );
    }

    #[test]
    fn test_streamed_method() {
        let m = &methods(
            json!({
                "paths": { "/chat": { "post": {
                    "operationId": "chat",
                    "requestBody": json_body("ChatRequest"),
                    "responses": { "200": json_body("ChatResponse") }
                } } },
                "components": { "schemas": {
                    "ChatRequest": { "type": "object" },
                    "ChatResponse": { "type": "object" }
                } }
            }),
            &["/chat"],
        )[0];
        assert_eq!(m.verb, "postIterable");
        let out = text(m);
        assert!(out.starts_with(
            "async *chatStream(request: TChatRequest): AsyncGenerator<ChatResponse, void, unknown> {\n"
        ));
        assert!(out.contains("for await (const chunk of this.postIterable(`/chat`, request)) {"));
        assert!(out.contains("if (lines.length < 3) {"));
        assert!(out.contains("const data = JSON.parse(lines[2].substring(start)) as TChatResponseDto;"));
        assert!(out.contains("yield new ChatResponse(data);"));
    }

    #[test]
    fn test_client_class() {
        let class = ClientClass {
            name: "PetClient".into(),
            runtime_class: "ApiClientBase".into(),
            base_url: "https://pets.example".into(),
            methods: Vec::new(),
        };
        let mut buf = CodeBuffer::new();
        class.render(&mut buf);
        assert_eq!(
            buf.finish(&EmitOptions::default()),
            "export class PetClient extends ApiClientBase {\n  constructor() {\n    super(\"https://pets.example\");\n  }\n}\n"
        );
    }
}
