//! Module assembly.

use serde::Serialize;

use super::client::ClientRenderer;
use super::code::CodeBuffer;
use super::component::ComponentRenderer;
use super::declaration::Render;
use super::options::{GenerateOptions, GENERATOR_NAME};
use crate::classifier::{ClassificationContext, SchemaClassifier};
use crate::document::ApiDocument;
use crate::error::{GenerateError, GenerateResult};
use crate::graph::ReferenceGraph;
use crate::ir::ComponentKind;
use crate::naming::string_literal;
use crate::operations::OperationMapper;

/// Prefix of the header line carrying the generation timestamp.
pub const TIMESTAMP_LINE_PREFIX: &str = " * Generated by ";

/// Emission order of component sections.
const SECTION_ORDER: [ComponentKind; 4] = [
    ComponentKind::Request,
    ComponentKind::Response,
    ComponentKind::Enum,
    ComponentKind::Model,
];

/// Counts reported after generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    pub requests: usize,
    pub responses: usize,
    pub enums: usize,
    pub models: usize,
    pub operations: usize,
}

impl GenerationStats {
    fn from_context(context: &ClassificationContext, operations: usize) -> Self {
        Self {
            requests: context.components_of(ComponentKind::Request).count(),
            responses: context.components_of(ComponentKind::Response).count(),
            enums: context.components_of(ComponentKind::Enum).count(),
            models: context.components_of(ComponentKind::Model).count(),
            operations,
        }
    }

    /// Total number of classified components.
    pub fn components(&self) -> usize {
        self.requests + self.responses + self.enums + self.models
    }
}

/// One complete generated client module.
#[derive(Debug, Clone)]
pub struct GeneratedModule {
    /// Module source text.
    pub content: String,
    /// What went into it.
    pub stats: GenerationStats,
}

/// Generate the client module for one document.
///
/// Classification completes before any rendering starts. A reference cycle
/// between object components fails generation unless
/// `allow_recursive_schemas` is set.
pub fn generate_module(
    document: &ApiDocument,
    options: &GenerateOptions,
) -> GenerateResult<GeneratedModule> {
    let context = SchemaClassifier::new(document).classify();
    check_cycles(&context, options.allow_recursive_schemas)?;

    let operations =
        OperationMapper::new(document, &context, &options.streamed_endpoints).map_all();

    let mut buf = CodeBuffer::new();
    render_header(&mut buf, options);
    buf.line(format!(
        "import {{ {} }} from {};",
        options.runtime_class,
        string_literal(&options.runtime_import)
    ));

    let components = ComponentRenderer::new();
    for kind in SECTION_ORDER {
        for component in context.components_of(kind) {
            for declaration in components.render(component) {
                buf.blank();
                declaration.render(&mut buf);
            }
        }
    }

    let client = ClientRenderer::new(&context).client_class(
        &options.client_name,
        &options.runtime_class,
        &options.base_url,
        &operations,
    );
    buf.blank();
    client.render(&mut buf);

    let stats = GenerationStats::from_context(&context, operations.len());
    tracing::info!(
        client = %options.client_name,
        components = stats.components(),
        operations = stats.operations,
        "generated client module"
    );

    Ok(GeneratedModule {
        content: buf.finish(&options.emit),
        stats,
    })
}

fn check_cycles(context: &ClassificationContext, allow: bool) -> GenerateResult<()> {
    let cycles = ReferenceGraph::from_context(context).detect_cycles();
    let Some(first) = cycles.first() else {
        return Ok(());
    };

    if allow {
        for cycle in &cycles {
            tracing::warn!(cycle = %cycle.join(" -> "), "recursive schema reference");
        }
        return Ok(());
    }
    Err(GenerateError::circular_reference(first.clone()))
}

fn render_header(buf: &mut CodeBuffer, options: &GenerateOptions) {
    buf.line("/**");
    buf.line(format!(
        "{}{} on {}",
        TIMESTAMP_LINE_PREFIX,
        GENERATOR_NAME,
        options.emit.timestamp()
    ));
    buf.line(format!(" * Source: {}", options.source_location));
    buf.line(" *");
    buf.line(" * DO NOT EDIT. This file is overwritten every time the client is generated.");
    buf.line(" */");
}

/// Module text with the timestamp line removed, for comparing two
/// generations of the same input.
pub fn without_timestamp(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.starts_with(TIMESTAMP_LINE_PREFIX))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::options::EmitOptions;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn options() -> GenerateOptions {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        GenerateOptions::new("WidgetClient", "https://api.example")
            .with_source_location("widgets.json")
            .with_emit(EmitOptions::new().with_generated_at(at))
    }

    fn document() -> ApiDocument {
        ApiDocument::from_value(json!({
            "paths": {
                "/widgets": { "post": {
                    "operationId": "createWidget",
                    "requestBody": { "content": { "application/json": {
                        "schema": { "$ref": "#/components/schemas/CreateWidget" }
                    } } },
                    "responses": { "200": { "content": { "application/json": {
                        "schema": { "$ref": "#/components/schemas/WidgetResponse" }
                    } } } }
                } }
            },
            "components": { "schemas": {
                "Tag": { "type": "object", "properties": { "label": { "type": "string" } } },
                "Color": { "enum": ["red"] },
                "WidgetResponse": { "type": "object", "properties": { "id": { "type": "string" } } },
                "CreateWidget": { "type": "object", "properties": { "name": { "type": "string" } } }
            } }
        }))
        .unwrap()
    }

    #[test]
    fn test_section_order() {
        let module = generate_module(&document(), &options()).unwrap();
        let c = &module.content;
        let positions: Vec<usize> = [
            "import { ApiClientBase } from \"./ApiClientBase\";",
            "export type TCreateWidget",
            "export type TWidgetResponseDto",
            "export enum Color",
            "export type TTagDto",
            "export class WidgetClient extends ApiClientBase",
        ]
        .iter()
        .map(|needle| c.find(needle).unwrap_or_else(|| panic!("missing {}", needle)))
        .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_header() {
        let module = generate_module(&document(), &options()).unwrap();
        assert!(module
            .content
            .starts_with("/**\n * Generated by oas-client-gen on 2024-01-02T03:04:05Z\n * Source: widgets.json\n"));
    }

    #[test]
    fn test_stats() {
        let module = generate_module(&document(), &options()).unwrap();
        assert_eq!(
            module.stats,
            GenerationStats {
                requests: 1,
                responses: 1,
                enums: 1,
                models: 1,
                operations: 1,
            }
        );
        assert_eq!(module.stats.components(), 4);
    }

    #[test]
    fn test_pinned_timestamp_is_deterministic() {
        let first = generate_module(&document(), &options()).unwrap();
        let second = generate_module(&document(), &options()).unwrap();
        assert_eq!(first.content, second.content);
    }

    #[test]
    fn test_without_timestamp() {
        let a = generate_module(&document(), &GenerateOptions::new("C", "u")).unwrap();
        let later = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let b = generate_module(
            &document(),
            &GenerateOptions::new("C", "u").with_emit(EmitOptions::new().with_generated_at(later)),
        )
        .unwrap();
        assert_ne!(a.content, b.content);
        assert_eq!(without_timestamp(&a.content), without_timestamp(&b.content));
    }

    #[test]
    fn test_cycle_rejected_unless_allowed() {
        let doc = ApiDocument::from_value(json!({ "components": { "schemas": {
            "Node": { "type": "object", "properties": {
                "children": { "type": "array", "items": { "$ref": "#/components/schemas/Node" } }
            } }
        } } }))
        .unwrap();

        let err = generate_module(&doc, &options()).unwrap_err();
        assert!(matches!(err, GenerateError::CircularReference { ref cycle } if cycle == &["Node", "Node"]));

        let module = generate_module(&doc, &options().with_allow_recursive_schemas(true)).unwrap();
        assert!(module.content.contains("this.children = dto.children.map((item) => new Node(item));"));
    }
}
