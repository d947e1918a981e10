//! Structured declarations.
//!
//! Builders produce these values; rendering to text is a separate step so
//! tests can assert on structure without parsing output.

use super::code::CodeBuffer;

/// Something that renders into a [`CodeBuffer`].
pub trait Render {
    /// Append this declaration's lines.
    fn render(&self, buf: &mut CodeBuffer);
}

/// `export enum Name { Label = value, ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDeclaration {
    pub name: String,
    pub members: Vec<EnumMember>,
}

/// One enum member, both parts already rendered as TypeScript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// Member name (quoted when not an identifier).
    pub label: String,
    /// Initializer literal.
    pub value: String,
}

/// A field of a type alias or value class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    /// Property key (quoted when not an identifier).
    pub key: String,
    /// Field type.
    pub ty: String,
    /// Rendered as `key?: ty | null`.
    pub optional: bool,
}

impl FieldDeclaration {
    fn signature(&self) -> String {
        if self.optional {
            format!("{}?: {} | null;", self.key, self.ty)
        } else {
            format!("{}: {};", self.key, self.ty)
        }
    }
}

/// `export type Name = { ... };`
///
/// Used for both `T{Name}Dto` wire aliases and `T{Name}` request aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtoAlias {
    pub name: String,
    pub fields: Vec<FieldDeclaration>,
}

/// `export class Name { ...; constructor(dto: TNameDto) { ... } }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueClass {
    pub name: String,
    /// Name of the wire alias taken by the constructor.
    pub dto_name: String,
    pub fields: Vec<FieldDeclaration>,
    pub assignments: Vec<Assignment>,
}

/// `target = expr;` inside a constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub target: String,
    pub expr: String,
}

/// Any component-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Enum(EnumDeclaration),
    Alias(DtoAlias),
    Class(ValueClass),
}

impl Declaration {
    /// Declared name.
    pub fn name(&self) -> &str {
        match self {
            Declaration::Enum(e) => &e.name,
            Declaration::Alias(a) => &a.name,
            Declaration::Class(c) => &c.name,
        }
    }
}

impl Render for EnumDeclaration {
    fn render(&self, buf: &mut CodeBuffer) {
        buf.open(format!("export enum {} {{", self.name));
        for member in &self.members {
            buf.line(format!("{} = {},", member.label, member.value));
        }
        buf.close("}");
    }
}

impl Render for DtoAlias {
    fn render(&self, buf: &mut CodeBuffer) {
        if self.fields.is_empty() {
            buf.line(format!("export type {} = {{}};", self.name));
            return;
        }
        buf.open(format!("export type {} = {{", self.name));
        for field in &self.fields {
            buf.line(field.signature());
        }
        buf.close("};");
    }
}

impl Render for ValueClass {
    fn render(&self, buf: &mut CodeBuffer) {
        buf.open(format!("export class {} {{", self.name));
        for field in &self.fields {
            buf.line(field.signature());
        }
        if !self.fields.is_empty() {
            buf.blank();
        }

        if self.assignments.is_empty() {
            buf.line(format!("constructor(_dto: {}) {{}}", self.dto_name));
        } else {
            buf.open(format!("constructor(dto: {}) {{", self.dto_name));
            for assignment in &self.assignments {
                buf.line(format!("{} = {};", assignment.target, assignment.expr));
            }
            buf.close("}");
        }
        buf.close("}");
    }
}

impl Render for Declaration {
    fn render(&self, buf: &mut CodeBuffer) {
        match self {
            Declaration::Enum(e) => e.render(buf),
            Declaration::Alias(a) => a.render(buf),
            Declaration::Class(c) => c.render(buf),
        }
    }
}
