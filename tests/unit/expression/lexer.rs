use super::*;

fn kinds(src: &str) -> Vec<TokenKind> {
    lex(src).unwrap().into_iter().map(|t| t.kind).collect()
}

#[test]
fn lexes_dotted_identifiers_as_one_token() {
    assert_eq!(
        kinds("head.rx + var.phase"),
        vec![
            TokenKind::Ident("head.rx".to_owned()),
            TokenKind::Plus,
            TokenKind::Ident("var.phase".to_owned()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lexes_scientific_and_leading_dot_numbers() {
    assert_eq!(
        kinds("1.5e2 .25 3E-1"),
        vec![
            TokenKind::Number(150.0),
            TokenKind::Number(0.25),
            TokenKind::Number(0.3),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lexes_two_char_operators() {
    assert_eq!(
        kinds("a<=b&&c!=d||e>=f==g"),
        vec![
            TokenKind::Ident("a".to_owned()),
            TokenKind::Le,
            TokenKind::Ident("b".to_owned()),
            TokenKind::AndAnd,
            TokenKind::Ident("c".to_owned()),
            TokenKind::Ne,
            TokenKind::Ident("d".to_owned()),
            TokenKind::OrOr,
            TokenKind::Ident("e".to_owned()),
            TokenKind::Ge,
            TokenKind::Ident("f".to_owned()),
            TokenKind::EqEq,
            TokenKind::Ident("g".to_owned()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn skips_unknown_characters() {
    assert_eq!(
        kinds("1 # 2 é"),
        vec![TokenKind::Number(1.0), TokenKind::Number(2.0), TokenKind::Eof]
    );
}

#[test]
fn rejects_dangling_exponent() {
    let err = lex("2e+").unwrap_err();
    assert_eq!(err.offset, 1);
}
