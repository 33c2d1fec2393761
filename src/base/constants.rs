//! Domain constants.

/// File extension of the text model format.
pub const TEXT_EXTENSION: &str = "idf";

/// File extension of the structured model format.
pub const STRUCTURED_EXTENSION: &str = "epJSON";

/// File name of a schema resource inside its version directory.
pub const SCHEMA_FILE_NAME: &str = "Energy+.schema.epJSON";

/// Environment variable naming an extra directory of schema resources.
pub const SCHEMA_DIR_ENV: &str = "EPMODEL_SCHEMA_DIR";

/// Object type carrying the model's schema version.
pub const VERSION_OBJECT_TYPE: &str = "Version";

/// Field of the version object holding the version string.
pub const VERSION_FIELD: &str = "version_identifier";

/// Canonical key of the name field of named object types.
pub const NAME_FIELD: &str = "name";

/// Strings accepted in place of a number on numeric-or-sentinel fields
/// whose schema does not list its own sentinels.
pub const DEFAULT_SENTINELS: &[&str] = &["Autosize", "Autocalculate"];
