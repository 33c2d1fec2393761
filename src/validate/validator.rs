use super::issue::{IssueCode, ValidationIssue};
use crate::base::FieldValue;
use crate::model::{Document, ObjectRecord};
use crate::schema::{FieldSchema, ObjectTypeSchema, ViolationKind};
use tracing::debug;

/// Checks a document against its schema.
///
/// Never fails: every problem comes back as a [`ValidationIssue`]. The
/// document is only read.
pub struct Validator<'a> {
    document: &'a Document,
    required_objects: bool,
    issues: Vec<ValidationIssue>,
}

impl<'a> Validator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            required_objects: true,
            issues: Vec::new(),
        }
    }

    /// Skip the model-level check for object types the schema requires.
    ///
    /// Useful for fragments that are not meant to run on their own.
    pub fn without_required_objects(mut self) -> Self {
        self.required_objects = false;
        self
    }

    /// Run every check and return the issues found, in document order.
    pub fn check_all(mut self) -> Vec<ValidationIssue> {
        let document = self.document;
        if self.required_objects {
            self.check_required_objects();
        }
        for collection in document.collections() {
            let ty = document.schema().object_type(collection.object_type());
            for (i, record) in collection.iter().enumerate() {
                match ty {
                    Some(ty) => {
                        if ty.is_unique() && i > 0 {
                            self.push(
                                ValidationIssue::new(
                                    IssueCode::DuplicateUniqueObject,
                                    ty.name(),
                                    record.name(),
                                    format!("only one {} object is allowed", ty.name()),
                                ),
                            );
                        }
                        self.check_object(ty, record);
                    }
                    None => self.push(ValidationIssue::new(
                        IssueCode::UnknownObjectType,
                        record.object_type(),
                        record.name(),
                        "object type is not defined by the schema",
                    )),
                }
            }
        }
        debug!(
            "validated {} objects: {} errors, {} warnings",
            document.len(),
            self.issues.iter().filter(|i| i.is_error()).count(),
            self.issues.iter().filter(|i| !i.is_error()).count()
        );
        self.issues
    }

    fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    fn check_required_objects(&mut self) {
        let document = self.document;
        for object_type in document.schema().required_types() {
            if document.collection(object_type).is_none() {
                self.push(ValidationIssue::new(
                    IssueCode::RequiredObjectMissing,
                    object_type.as_str(),
                    None,
                    "the model must contain an object of this type",
                ));
            }
        }
    }

    fn check_object(&mut self, ty: &ObjectTypeSchema, record: &ObjectRecord) {
        if ty.is_name_required() && record.name().is_none() {
            self.push(
                ValidationIssue::new(
                    IssueCode::RequiredFieldMissing,
                    ty.name(),
                    None,
                    "required field is not set",
                )
                .with_field("name"),
            );
        }
        for field in ty.required_fields() {
            if !record.contains(&field.key) {
                self.push(
                    ValidationIssue::new(
                        IssueCode::RequiredFieldMissing,
                        ty.name(),
                        record.name(),
                        "required field is not set",
                    )
                    .with_field(field.key.as_str()),
                );
            }
        }

        for (key, value) in record.fields() {
            match ty.resolve_field(key).and_then(|resolved| resolved.schema) {
                Some(field) => self.check_field(ty, record, key, field, value),
                None => self.push(
                    ValidationIssue::new(
                        IssueCode::UnknownField,
                        ty.name(),
                        record.name(),
                        "field is not defined for this object type",
                    )
                    .with_field(key),
                ),
            }
        }
    }

    fn check_field(
        &mut self,
        ty: &ObjectTypeSchema,
        record: &ObjectRecord,
        key: &str,
        field: &FieldSchema,
        value: &FieldValue,
    ) {
        if let Err(violation) = field.check(value) {
            let code = match violation.kind {
                ViolationKind::Type => IssueCode::InvalidType,
                ViolationKind::Enum => IssueCode::InvalidEnum,
                ViolationKind::Range => IssueCode::OutOfRange,
            };
            self.push(
                ValidationIssue::new(
                    code,
                    ty.name(),
                    record.name(),
                    format!("value '{}' {}", value, violation.constraint),
                )
                .with_field(key),
            );
            return;
        }

        if field.is_reference() {
            let target = value.to_string();
            if self
                .document
                .resolve_reference(&field.object_list, &target)
                .is_none()
            {
                self.push(
                    ValidationIssue::new(
                        IssueCode::DanglingReference,
                        ty.name(),
                        record.name(),
                        format!(
                            "'{}' does not name any object in {}",
                            target,
                            field.object_list.join(", ")
                        ),
                    )
                    .with_field(key),
                );
            }
        }
    }
}

/// Validate a document with the default checks.
pub fn validate(document: &Document) -> Vec<ValidationIssue> {
    Validator::new(document).check_all()
}

impl Document {
    /// Validate this document with the default checks.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        validate(self)
    }
}
