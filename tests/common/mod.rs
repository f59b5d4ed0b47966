//! Shared fixtures for integration tests
//!
//! Builders for the mock live values used across the end-to-end scenarios:
//! a two-transform tensor descriptor (embed then pass_through, bottom `[0]`,
//! top `[3, 4]`) and the view/tuple wrappers around it.

// Not every test binary uses every fixture
#![allow(dead_code)]

use tilescope::value::mock::MockValue;

/// Type signature of the scenario descriptor: two transforms in storage
/// order, implicit bottom `[0]`, top ids `[3, 4]`.
pub const DESC_TYPE: &str = "ck_tile::tensor_descriptor<\
    ck_tile::tuple<ck_tile::embed<ck_tile::tuple<int, int>, ck_tile::tuple<int, int>>, \
                   ck_tile::pass_through<int>>, \
    ck_tile::tuple<ck_tile::sequence<0>, ck_tile::sequence<1>>, \
    ck_tile::tuple<ck_tile::sequence<1, 2>, ck_tile::sequence<3>>, \
    ck_tile::sequence<3, 4>, \
    ck_tile::constant<8192l>>";

pub fn view_type() -> String {
    format!("ck_tile::tensor_view<float*, {DESC_TYPE}>")
}

pub fn tuple_of_view_type() -> String {
    format!("ck_tile::tuple<{}>", view_type())
}

/// The scenario descriptor with all count fields and transform parameters
/// readable.
pub fn descriptor_value() -> MockValue {
    let embed = MockValue::opaque("ck_tile::embed<ck_tile::tuple<int, int>, ck_tile::tuple<int, int>>")
        .with_field(
            "up_lengths_",
            MockValue::container(
                "ck_tile::tuple<int, int>",
                vec![MockValue::int("int", 64), MockValue::int("int", 16)],
            ),
        )
        .with_field(
            "coefficients_",
            MockValue::container(
                "ck_tile::tuple<int, int>",
                vec![MockValue::int("int", 16), MockValue::int("int", 1)],
            ),
        );
    let pass_through = MockValue::opaque("ck_tile::pass_through<int>");

    MockValue::opaque(DESC_TYPE)
        .with_field("element_space_size_", MockValue::int("long", 8192))
        .with_field("ntransform_", MockValue::int("int", 2))
        .with_field("ndim_hidden_", MockValue::int("int", 5))
        .with_field("ndim_top_", MockValue::int("int", 2))
        .with_field(
            "transforms_",
            MockValue::container("ck_tile::tuple<...>", vec![embed, pass_through]),
        )
}

/// A tensor_view wrapping the scenario descriptor.
pub fn view_value() -> MockValue {
    MockValue::opaque(view_type())
        .with_field("desc_", descriptor_value())
        .with_field(
            "buf_view_",
            MockValue::opaque("ck_tile::buffer_view<(ck_tile::address_space_enum)1, float*>"),
        )
}

/// A one-element tuple wrapping the view.
pub fn tuple_of_view_value() -> MockValue {
    MockValue::container(tuple_of_view_type(), vec![view_value()])
}
