use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FxrError::format(0x10, "x")
            .to_string()
            .contains("format error at offset 0x10:")
    );
    assert!(
        FxrError::reservation("x")
            .to_string()
            .contains("reservation error:")
    );
    assert!(
        FxrError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(FxrError::schema("x").to_string().contains("schema error:"));
}

#[test]
fn unsupported_names_the_game() {
    let err = FxrError::unsupported("action type 614", Game::DarkSouls3);
    assert_eq!(
        err.to_string(),
        "action type 614 is not supported for Dark Souls III"
    );
}

#[test]
fn eof_counts_as_format_error() {
    let err = FxrError::UnexpectedEof {
        offset: 4,
        need: 4,
        have: 1,
    };
    assert!(err.is_format());
    assert!(!FxrError::validation("x").is_format());
}
