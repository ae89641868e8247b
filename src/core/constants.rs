//! core::constants
//!
//! Naming tokens and primitive default values shared by the mapper
//! generator and the generated code.
//!
//! These are plain `const` items. Reading them never touches the build
//! metadata resource, so they are usable before (and independently of) any
//! call into [`crate::core::metadata`].

/// Suffix appended to a mapper interface name to form the generated class name.
pub const MAPPER_CLASS_SUFFIX: &str = "SelmaGeneratedClass";

/// Name of the source parameter in generated mapping methods.
pub const IN_VAR: &str = "in";

/// Name of the destination variable in generated mapping methods.
pub const OUT_VAR: &str = "out";

/// Identifier of the per-mapping instance cache used to break cycles.
pub const INSTANCE_CACHE: &str = "instanceCache";

pub const DEFAULT_BOOLEAN: bool = false;
pub const DEFAULT_BYTE: i8 = 0;
pub const DEFAULT_SHORT: i16 = 0;
pub const DEFAULT_INT: i32 = 0;
pub const DEFAULT_LONG: i64 = 0;
pub const DEFAULT_CHAR: char = '\0';
pub const DEFAULT_FLOAT: f32 = 0.0;
pub const DEFAULT_DOUBLE: f64 = 0.0;

/// Build the generated class name for a mapper.
///
/// # Example
///
/// ```
/// use selma::core::constants::generated_class_name;
///
/// assert_eq!(generated_class_name("OrderMapper"), "OrderMapperSelmaGeneratedClass");
/// ```
pub fn generated_class_name(mapper: &str) -> String {
    format!("{}{}", mapper, MAPPER_CLASS_SUFFIX)
}

/// A single named constant, as listed by `selma constants`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ConstantEntry {
    pub name: &'static str,
    pub kind: &'static str,
    pub value: String,
}

/// All constants in declaration order.
pub fn table() -> Vec<ConstantEntry> {
    fn entry(name: &'static str, kind: &'static str, value: impl ToString) -> ConstantEntry {
        ConstantEntry {
            name,
            kind,
            value: value.to_string(),
        }
    }

    vec![
        entry("MAPPER_CLASS_SUFFIX", "string", MAPPER_CLASS_SUFFIX),
        entry("IN_VAR", "string", IN_VAR),
        entry("OUT_VAR", "string", OUT_VAR),
        entry("INSTANCE_CACHE", "string", INSTANCE_CACHE),
        entry("DEFAULT_BOOLEAN", "boolean", DEFAULT_BOOLEAN),
        entry("DEFAULT_BYTE", "byte", DEFAULT_BYTE),
        entry("DEFAULT_SHORT", "short", DEFAULT_SHORT),
        entry("DEFAULT_INT", "int", DEFAULT_INT),
        entry("DEFAULT_LONG", "long", DEFAULT_LONG),
        entry("DEFAULT_CHAR", "char", DEFAULT_CHAR.escape_default()),
        entry("DEFAULT_FLOAT", "float", DEFAULT_FLOAT),
        entry("DEFAULT_DOUBLE", "double", DEFAULT_DOUBLE),
    ]
}
