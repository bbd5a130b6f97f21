// License: MIT

use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Primitive element type carried by scalars and uniform vectors.
///
/// The discriminant doubles as the wire code, so reordering variants
/// breaks every encoded buffer in existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ElementType {
    U8 = 0x01,
    U16 = 0x02,
    U32 = 0x03,
    U64 = 0x04,
    I8 = 0x05,
    I16 = 0x06,
    I32 = 0x07,
    I64 = 0x08,
    F32 = 0x09,
    F64 = 0x0A,
    C32 = 0x0B,
    C64 = 0x0C,
    Bool = 0x0D,
    String = 0x0E,
}

/// Static facts about one element type.
#[derive(Debug)]
pub struct ElementInfo {
    pub element: ElementType,
    pub name: &'static str,
    /// Encoded width in bytes, `None` for length-prefixed strings.
    pub width: Option<usize>,
}

static REGISTRY: Lazy<IndexMap<u8, ElementInfo>> = Lazy::new(|| {
    let entries = [
        (ElementType::U8, "u8", Some(1)),
        (ElementType::U16, "u16", Some(2)),
        (ElementType::U32, "u32", Some(4)),
        (ElementType::U64, "u64", Some(8)),
        (ElementType::I8, "i8", Some(1)),
        (ElementType::I16, "i16", Some(2)),
        (ElementType::I32, "i32", Some(4)),
        (ElementType::I64, "i64", Some(8)),
        (ElementType::F32, "f32", Some(4)),
        (ElementType::F64, "f64", Some(8)),
        (ElementType::C32, "c32", Some(8)),
        (ElementType::C64, "c64", Some(16)),
        (ElementType::Bool, "bool", Some(1)),
        (ElementType::String, "string", None),
    ];

    entries
        .into_iter()
        .map(|(element, name, width)| (element.code(), ElementInfo { element, name, width }))
        .collect()
});

impl ElementType {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<ElementType> {
        REGISTRY.get(&code).map(|info| info.element)
    }

    pub fn from_name(name: &str) -> Option<ElementType> {
        REGISTRY
            .values()
            .find(|info| info.name.eq_ignore_ascii_case(name))
            .map(|info| info.element)
    }

    pub fn info(self) -> &'static ElementInfo {
        // Every variant is registered above.
        &REGISTRY[&self.code()]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn width(self) -> Option<usize> {
        self.info().width
    }

    /// All element types in wire-code order.
    pub fn all() -> impl Iterator<Item = ElementType> {
        REGISTRY.values().map(|info| info.element)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies which variant a value holds and, for scalars and uniform
/// vectors, its element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    /// Placeholder stored by `MapValue::entry` for a freshly created slot.
    Null,
    Scalar(ElementType),
    UniformVector(ElementType),
    Vector,
    Map,
}

pub(crate) const TAG_NULL: u8 = 0x00;
pub(crate) const TAG_UNIFORM_VECTOR: u8 = 0x20;
pub(crate) const TAG_VECTOR: u8 = 0x30;
pub(crate) const TAG_MAP: u8 = 0x40;

impl TypeTag {
    /// Leading byte of this value's encoding.
    pub fn wire_code(self) -> u8 {
        match self {
            TypeTag::Null => TAG_NULL,
            TypeTag::Scalar(element) => element.code(),
            TypeTag::UniformVector(_) => TAG_UNIFORM_VECTOR,
            TypeTag::Vector => TAG_VECTOR,
            TypeTag::Map => TAG_MAP,
        }
    }

    pub fn element_type(self) -> Option<ElementType> {
        match self {
            TypeTag::Scalar(element) | TypeTag::UniformVector(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, TypeTag::Vector | TypeTag::Map)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Null => f.write_str("null"),
            TypeTag::Scalar(element) => write!(f, "scalar<{}>", element),
            TypeTag::UniformVector(element) => write!(f, "uniform_vector<{}>", element),
            TypeTag::Vector => f.write_str("vector"),
            TypeTag::Map => f.write_str("map"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_code() {
        let codes: Vec<u8> = ElementType::all().map(ElementType::code).collect();
        assert_eq!(codes, (0x01..=0x0E).collect::<Vec<u8>>());

        for element in ElementType::all() {
            assert_eq!(ElementType::from_code(element.code()), Some(element));
            assert_eq!(ElementType::from_name(element.name()), Some(element));
        }
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(ElementType::from_code(0x00), None);
        assert_eq!(ElementType::from_code(0x0F), None);
        assert_eq!(ElementType::from_code(TAG_MAP), None);
        assert_eq!(ElementType::from_name("f128"), None);
    }

    #[test]
    fn test_widths() {
        assert_eq!(ElementType::C64.width(), Some(16));
        assert_eq!(ElementType::Bool.width(), Some(1));
        assert_eq!(ElementType::String.width(), None);
    }

    #[test]
    fn test_tag_display_and_wire_codes() {
        assert_eq!(TypeTag::Scalar(ElementType::F32).to_string(), "scalar<f32>");
        assert_eq!(TypeTag::UniformVector(ElementType::U8).to_string(), "uniform_vector<u8>");
        assert_eq!(TypeTag::Map.to_string(), "map");

        assert_eq!(TypeTag::Scalar(ElementType::I16).wire_code(), 0x06);
        assert_eq!(TypeTag::UniformVector(ElementType::I16).wire_code(), TAG_UNIFORM_VECTOR);
        assert!(TypeTag::Vector.is_container());
        assert!(!TypeTag::Null.is_container());
    }

    #[test]
    fn test_tag_serde_names() {
        let json = serde_json::to_string(&TypeTag::Scalar(ElementType::C32)).unwrap();
        assert_eq!(json, r#"{"scalar":"c32"}"#);

        let back: TypeTag = serde_json::from_str(r#""map""#).unwrap();
        assert_eq!(back, TypeTag::Map);
    }
}
