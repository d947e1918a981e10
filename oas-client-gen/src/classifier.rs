//! Schema classification.
//!
//! Classification runs in two passes over the document:
//!
//! 1. Usage discovery: collect the enum-name set, the request and response
//!    usage sets, and synthesize request components for inline multipart
//!    bodies.
//! 2. Classification: every named schema, in document order, becomes exactly
//!    one of Enum / Request / Response / Model, with its properties resolved.
//!
//! Pass 1 must finish before pass 2 starts. Resolving a property that
//! references an enum before the enum is known would tag it as an object
//! reference.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde_json::Value;

use crate::document::{required_names, ApiDocument, RawOperation};
use crate::ir::{Component, ComponentKind, EnumComponent, HttpMethod, ObjectComponent};
use crate::naming::pascal_segments;
use crate::resolver::PropertyResolver;

/// Suffix of synthesized multipart request components.
pub const FORM_DATA_SUFFIX: &str = "RequestFormData";

/// Per-source classification state.
///
/// A fresh context is built for every API source, so nothing leaks between
/// generated clients.
#[derive(Debug, Clone, Default)]
pub struct ClassificationContext {
    enum_names: HashSet<String>,
    request_usage: HashSet<String>,
    response_usage: HashSet<String>,
    form_requests: HashMap<(String, HttpMethod), String>,
    components: Vec<Component>,
    index: HashMap<String, usize>,
}

impl ClassificationContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_enum(&mut self, name: impl Into<String>) {
        self.enum_names.insert(name.into());
    }

    pub(crate) fn record_request_usage(&mut self, name: impl Into<String>) {
        self.request_usage.insert(name.into());
    }

    pub(crate) fn record_response_usage(&mut self, name: impl Into<String>) {
        self.response_usage.insert(name.into());
    }

    /// Whether a schema name is in the enum-name set.
    pub fn is_enum(&self, name: &str) -> bool {
        self.enum_names.contains(name)
    }

    /// Whether a schema name is used as a request body (and is not an enum).
    pub fn is_request(&self, name: &str) -> bool {
        !self.is_enum(name) && self.request_usage.contains(name)
    }

    /// Whether a schema name is used as a 200 response body.
    pub fn is_response(&self, name: &str) -> bool {
        self.response_usage.contains(name)
    }

    /// Synthesized form request linked to an operation.
    pub fn form_request_for(&self, endpoint: &str, method: HttpMethod) -> Option<&str> {
        self.form_requests
            .get(&(endpoint.to_string(), method))
            .map(String::as_str)
    }

    /// Add a classified component. The first component registered under a
    /// name wins.
    pub(crate) fn insert(&mut self, component: Component) {
        let name = component.name().to_string();
        if self.index.contains_key(&name) {
            tracing::warn!(component = %name, "duplicate component name, keeping the first");
            return;
        }
        self.index.insert(name, self.components.len());
        self.components.push(component);
    }

    /// All components in classification order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Look up a component by name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.index.get(name).map(|&i| &self.components[i])
    }

    /// Kind of a named component.
    pub fn kind_of(&self, name: &str) -> Option<ComponentKind> {
        self.component(name).map(Component::kind)
    }

    /// Components of one kind, in classification order.
    pub fn components_of(&self, kind: ComponentKind) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(move |c| c.kind() == kind)
    }
}

/// Runs both classification passes over a document.
#[derive(Debug, Clone, Copy)]
pub struct SchemaClassifier<'a> {
    document: &'a ApiDocument,
}

impl<'a> SchemaClassifier<'a> {
    /// Create a classifier for a document.
    pub fn new(document: &'a ApiDocument) -> Self {
        Self { document }
    }

    /// Classify every schema into a fresh context.
    pub fn classify(&self) -> ClassificationContext {
        let mut context = ClassificationContext::new();
        self.discover_usage(&mut context);
        self.classify_schemas(&mut context);
        tracing::debug!(
            components = context.components().len(),
            enums = context.enum_names.len(),
            "classification complete"
        );
        context
    }

    /// Pass 1.
    fn discover_usage(&self, context: &mut ClassificationContext) {
        for (name, node) in self.document.schemas() {
            if node.get("enum").is_some() {
                context.record_enum(name);
            }
        }

        let mut pending_forms = Vec::new();
        for operation in self.document.operations() {
            if let Some(name) = operation.response_schema_ref() {
                context.record_response_usage(name);
            }
            if let Some(name) = operation.request_schema_ref() {
                context.record_request_usage(name);
            }
            if let Some(schema) = operation.inline_form_schema() {
                let name = form_request_name(&operation);
                context.record_request_usage(name.clone());
                context
                    .form_requests
                    .insert((operation.endpoint.to_string(), operation.method), name.clone());
                pending_forms.push((name, schema));
            }
        }

        let forms: Vec<Component> = {
            let resolver = PropertyResolver::new(context);
            pending_forms
                .into_iter()
                .map(|(name, schema)| Component::Request(form_component(&resolver, name, schema)))
                .collect()
        };
        for form in forms {
            context.insert(form);
        }
    }

    /// Pass 2.
    fn classify_schemas(&self, context: &mut ClassificationContext) {
        let classified: Vec<Component> = {
            let resolver = PropertyResolver::new(context);
            self.document
                .schemas()
                .map(|(name, node)| classify_schema(context, &resolver, name, node))
                .collect()
        };
        for component in classified {
            context.insert(component);
        }
    }
}

/// Apply the priority rule: enum, then request, then response, then model.
fn classify_schema(
    context: &ClassificationContext,
    resolver: &PropertyResolver<'_>,
    name: &str,
    node: &Value,
) -> Component {
    if let Some(values) = node.get("enum") {
        return Component::Enum(enum_component(name, node, values));
    }

    let object = object_component(resolver, name, node);
    if context.is_request(name) {
        Component::Request(object)
    } else if context.is_response(name) {
        Component::Response(object)
    } else {
        Component::Model(object)
    }
}

fn enum_component(name: &str, node: &Value, values: &Value) -> EnumComponent {
    let values: Vec<Value> = values.as_array().cloned().unwrap_or_default();
    let display_names = node
        .get("x-enumNames")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .map(|label| label.as_str().map(str::to_string))
                .collect::<Vec<_>>()
        });
    let numeric = match node.get("type").and_then(Value::as_str) {
        Some("integer") | Some("number") => true,
        Some(_) => false,
        None => !values.is_empty() && values.iter().all(Value::is_number),
    };

    EnumComponent {
        name: name.to_string(),
        values,
        display_names,
        numeric,
    }
}

fn object_component(resolver: &PropertyResolver<'_>, name: &str, node: &Value) -> ObjectComponent {
    let required: BTreeSet<String> = required_names(node).into_iter().collect();
    let properties = node
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(prop_name, prop)| resolver.resolve(prop_name, prop, &required))
                .collect()
        })
        .unwrap_or_default();

    ObjectComponent {
        name: name.to_string(),
        required,
        properties,
    }
}

fn form_component(resolver: &PropertyResolver<'_>, name: String, schema: &Value) -> ObjectComponent {
    let required: BTreeSet<String> = required_names(schema).into_iter().collect();
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(field, prop)| resolver.resolve_form_field(field, prop, &required))
                .collect()
        })
        .unwrap_or_default();

    ObjectComponent {
        name,
        required,
        properties,
    }
}

/// `{CapitalizedOperationId}RequestFormData`, or `{VerbWord}{Resource}...`
/// when the operation has no id.
fn form_request_name(operation: &RawOperation<'_>) -> String {
    let base = match operation.operation_id() {
        Some(id) => pascal_segments(id),
        None => format!(
            "{}{}",
            pascal_segments(operation.method.verb_word()),
            pascal_segments(operation.endpoint)
        ),
    };
    format!("{}{}", base, FORM_DATA_SUFFIX)
}
