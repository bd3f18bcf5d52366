use reflex_math::{text::*, Mat4, Vec4};

#[test]
fn vec4_format() {
    assert_eq!(
        format_vec4(Vec4::new(1.0, 2.5, -3.0, 0.0)),
        "vec4(1.000000, 2.500000, -3.000000, 0.000000)"
    );
    assert_eq!(format_f32(1.5), "1.500000");
}

#[test]
fn vec4_parse() {
    assert_eq!(
        parse_vec4("vec4(1.000000, 2.500000, -3.000000, 0.000000)").unwrap(),
        Vec4::new(1.0, 2.5, -3.0, 0.0)
    );
    assert_eq!(parse_vec4(" vec4(1,2,3,4) ").unwrap(), Vec4::new(1.0, 2.0, 3.0, 4.0));
    assert_eq!(parse_vec4("vec3(1, 2, 3)"), Err(ParseError::Prefix("vec4")));
    assert_eq!(parse_vec4("vec4(1, 2, 3"), Err(ParseError::Parens));
    assert!(parse_vec4("vec4(1, 2, 3)").is_err());
}

#[test]
fn mat4_is_column_major() {
    let m = Mat4::from_cols(
        Vec4::new(1.0, 2.0, 3.0, 4.0),
        Vec4::new(5.0, 6.0, 7.0, 8.0),
        Vec4::new(9.0, 10.0, 11.0, 12.0),
        Vec4::new(13.0, 14.0, 15.0, 16.0),
    );

    let text = format_mat4(m);
    assert!(text.starts_with("mat4x4((1.000000, 2.000000, 3.000000, 4.000000), (5.000000"));
    assert_eq!(parse_mat4(&text).unwrap(), m);
}

#[test]
fn mat4_parse_errors() {
    assert!(parse_mat4("mat4x4((1, 0, 0, 0), (0, 1, 0, 0), (0, 0, 1, 0))").is_err());
    assert!(parse_mat4("mat4x4((1, 0, 0, 0), (0, 1, 0, 0), (0, 0, 1, 0), (0, 0, 0))").is_err());
    assert_eq!(
        parse_mat4("mat4x4((1, 0, 0, 0), (0, 1, 0, 0), (0, 0, 1, 0), (0, 0, 0, 1))").unwrap(),
        Mat4::IDENTITY
    );
}
