//! Class creation form.
//!
//! Draft state for a new class: its name plus ordered field and method
//! rows. Rows are addressed by their id, never by index, so removing one
//! row cannot shift an edit onto its neighbour.

use crate::error::EditError;
use serde::Serialize;
use uml_core::{ElementId, Field, Fields, Method, Methods, Visibility};

/// A single-property change to a field draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Name(String),
    Type(String),
}

impl FieldEdit {
    /// Build an edit from a property key as sent by the host (`name`, `type`).
    pub fn from_key(key: &str, value: &str) -> Result<Self, EditError> {
        match key {
            "name" => Ok(Self::Name(value.to_string())),
            "type" => Ok(Self::Type(value.to_string())),
            other => Err(EditError::UnknownEditKey(other.to_string())),
        }
    }

    fn apply(self, field: &mut Field) {
        match self {
            Self::Name(name) => field.name = name,
            Self::Type(ty) => field.ty = ty,
        }
    }
}

/// A single-property change to a method draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodEdit {
    Name(String),
    Parameters(String),
    ReturnType(String),
}

impl MethodEdit {
    /// Keys: `name`, `parameters`, `returnType`.
    pub fn from_key(key: &str, value: &str) -> Result<Self, EditError> {
        match key {
            "name" => Ok(Self::Name(value.to_string())),
            "parameters" => Ok(Self::Parameters(value.to_string())),
            "returnType" => Ok(Self::ReturnType(value.to_string())),
            other => Err(EditError::UnknownEditKey(other.to_string())),
        }
    }

    fn apply(self, method: &mut Method) {
        match self {
            Self::Name(name) => method.name = name,
            Self::Parameters(params) => method.parameters = params,
            Self::ReturnType(ret) => method.return_type = ret,
        }
    }
}

/// Draft of a class being created.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassForm {
    name: String,
    fields: Fields,
    methods: Methods,
}

impl ClassForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Submission is blocked while the name is blank.
    pub fn can_submit(&self) -> bool {
        !self.name.trim().is_empty()
    }

    // ─── Fields ──────────────────────────────────────────────────────────

    /// Append a blank `string` field and return its id.
    pub fn add_field(&mut self) -> ElementId {
        let field = Field::new();
        let id = field.id;
        self.fields.push(field);
        id
    }

    pub fn remove_field(&mut self, id: ElementId) -> Result<Field, EditError> {
        let idx = self.field_index(id)?;
        Ok(self.fields.remove(idx))
    }

    pub fn edit_field(&mut self, id: ElementId, edit: FieldEdit) -> Result<(), EditError> {
        let idx = self.field_index(id)?;
        edit.apply(&mut self.fields[idx]);
        Ok(())
    }

    /// Advance the field's visibility and return the new value.
    pub fn cycle_field_visibility(&mut self, id: ElementId) -> Result<Visibility, EditError> {
        let idx = self.field_index(id)?;
        let field = &mut self.fields[idx];
        field.visibility = field.visibility.cycle();
        Ok(field.visibility)
    }

    fn field_index(&self, id: ElementId) -> Result<usize, EditError> {
        self.fields
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| EditError::UnknownMember(id.to_string()))
    }

    // ─── Methods ─────────────────────────────────────────────────────────

    /// Append a blank `void` method and return its id.
    pub fn add_method(&mut self) -> ElementId {
        let method = Method::new();
        let id = method.id;
        self.methods.push(method);
        id
    }

    pub fn remove_method(&mut self, id: ElementId) -> Result<Method, EditError> {
        let idx = self.method_index(id)?;
        Ok(self.methods.remove(idx))
    }

    pub fn edit_method(&mut self, id: ElementId, edit: MethodEdit) -> Result<(), EditError> {
        let idx = self.method_index(id)?;
        edit.apply(&mut self.methods[idx]);
        Ok(())
    }

    pub fn cycle_method_visibility(&mut self, id: ElementId) -> Result<Visibility, EditError> {
        let idx = self.method_index(id)?;
        let method = &mut self.methods[idx];
        method.visibility = method.visibility.cycle();
        Ok(method.visibility)
    }

    fn method_index(&self, id: ElementId) -> Result<usize, EditError> {
        self.methods
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| EditError::UnknownMember(id.to_string()))
    }

    /// Consume the draft.
    pub fn into_parts(self) -> (String, Fields, Methods) {
        (self.name, self.fields, self.methods)
    }
}
