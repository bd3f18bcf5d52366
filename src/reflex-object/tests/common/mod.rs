#![allow(dead_code)]

use reflex_object::{
    math::{Mat4, Vec4},
    Attributed, Rtti, TypeManager,
};

#[derive(Clone, Debug, Default, PartialEq, Rtti, Attributed)]
#[rtti(name = "AttributedFoo", bases("Attributed"), eq)]
#[table(name = "NestedScope")]
#[table(name = "NestedScopeArray", size = 5)]
pub struct AttributedFoo {
    #[attribute(name = "ExternalInteger")]
    pub external_integer: i32,
    #[attribute(name = "ExternalFloat")]
    pub external_float: f32,
    #[attribute(name = "ExternalString")]
    pub external_string: String,
    #[attribute(name = "ExternalVector")]
    pub external_vector: Vec4,
    #[attribute(name = "ExternalMatrix")]
    pub external_matrix: Mat4,

    #[attribute(name = "ExternalIntegerArray")]
    pub external_integer_array: [i32; 5],
    #[attribute(name = "ExternalFloatArray")]
    pub external_float_array: [f32; 5],
    #[attribute(name = "ExternalStringArray")]
    pub external_string_array: [String; 5],
    #[attribute(name = "ExternalVectorArray")]
    pub external_vector_array: [Vec4; 5],
    #[attribute(name = "ExternalMatrixArray")]
    pub external_matrix_array: [Mat4; 5],

    // Not reflected.
    pub scratch: u64,
}

pub const FOO_FIELDS: [&str; 10] = [
    "ExternalInteger",
    "ExternalFloat",
    "ExternalString",
    "ExternalVector",
    "ExternalMatrix",
    "ExternalIntegerArray",
    "ExternalFloatArray",
    "ExternalStringArray",
    "ExternalVectorArray",
    "ExternalMatrixArray",
];

/// Registers the fixture types, tolerating earlier
/// registration by other tests in the same binary.
pub fn register() {
    let _ = TypeManager::register::<AttributedFoo>();
}
