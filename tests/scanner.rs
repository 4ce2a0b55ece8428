use treelox as lox;

use lox::scanner::Scanner;
use lox::token::{Token, TokenType};

fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
    let (tokens, errors) = Scanner::new(source.as_bytes().to_vec()).scan_tokens();

    assert!(errors.is_empty(), "unexpected lex errors: {:?}", errors);
    assert_eq!(tokens.len(), expected.len());

    for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
        assert_eq!(actual.token_type, *expected_type);
        assert_eq!(actual.lexeme, *expected_lexeme);
    }
}

#[test]
fn symbols() {
    assert_token_sequence(
        "({*.,+*})",
        &[
            (TokenType::LEFT_PAREN, "("),
            (TokenType::LEFT_BRACE, "{"),
            (TokenType::STAR, "*"),
            (TokenType::DOT, "."),
            (TokenType::COMMA, ","),
            (TokenType::PLUS, "+"),
            (TokenType::STAR, "*"),
            (TokenType::RIGHT_BRACE, "}"),
            (TokenType::RIGHT_PAREN, ")"),
            (TokenType::EOF, ""),
        ],
    );
}

#[test]
fn one_and_two_char_operators() {
    assert_token_sequence(
        "! != = == < <= > >= / //ignored",
        &[
            (TokenType::BANG, "!"),
            (TokenType::BANG_EQUAL, "!="),
            (TokenType::EQUAL, "="),
            (TokenType::EQUAL_EQUAL, "=="),
            (TokenType::LESS, "<"),
            (TokenType::LESS_EQUAL, "<="),
            (TokenType::GREATER, ">"),
            (TokenType::GREATER_EQUAL, ">="),
            (TokenType::SLASH, "/"),
            (TokenType::EOF, ""),
        ],
    );
}

#[test]
fn keywords_and_identifiers() {
    assert_token_sequence(
        "class fun var forloop for",
        &[
            (TokenType::CLASS, "class"),
            (TokenType::FUN, "fun"),
            (TokenType::VAR, "var"),
            (TokenType::IDENTIFIER, "forloop"),
            (TokenType::FOR, "for"),
            (TokenType::EOF, ""),
        ],
    );
}

#[test]
fn number_literal_payload() {
    let (tokens, errors) = Scanner::new(b"12.5 42".to_vec()).scan_tokens();

    assert!(errors.is_empty());
    assert_eq!(tokens.len(), 3);

    match &tokens[0].token_type {
        TokenType::NUMBER(n) => assert_eq!(*n, 12.5),
        other => panic!("expected NUMBER, got {:?}", other),
    }

    match &tokens[1].token_type {
        TokenType::NUMBER(n) => assert_eq!(*n, 42.0),
        other => panic!("expected NUMBER, got {:?}", other),
    }
}

#[test]
fn string_literal_strips_quotes() {
    let (tokens, errors) = Scanner::new(b"\"hello world\"".to_vec()).scan_tokens();

    assert!(errors.is_empty());

    let token: &Token = &tokens[0];

    assert_eq!(token.lexeme, "\"hello world\"");

    match &token.token_type {
        TokenType::STRING(s) => assert_eq!(s, "hello world"),
        other => panic!("expected STRING, got {:?}", other),
    }
}

#[test]
fn multiline_string_tracks_lines() {
    let (tokens, errors) = Scanner::new(b"\"a\nb\"\nx".to_vec()).scan_tokens();

    assert!(errors.is_empty());

    // identifier after the two-line string sits on line 3
    assert_eq!(tokens[1].token_type, TokenType::IDENTIFIER);
    assert_eq!(tokens[1].line, 3);
}

#[test]
fn unexpected_characters_are_reported_and_skipped() {
    let (tokens, errors) = Scanner::new(b",.$(#".to_vec()).scan_tokens();

    // scanning continues after each bad byte; EOF still terminates the stream
    assert_eq!(errors.len(), 2);
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[0].token_type, TokenType::COMMA);
    assert_eq!(tokens[1].token_type, TokenType::DOT);
    assert_eq!(tokens[2].token_type, TokenType::LEFT_PAREN);
    assert_eq!(tokens[3].token_type, TokenType::EOF);

    for e in &errors {
        assert!(e.to_string().contains("Unexpected character"));
    }
}

#[test]
fn unterminated_string() {
    let (tokens, errors) = Scanner::new(b"\"oops".to_vec()).scan_tokens();

    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("Unterminated string."));
    assert_eq!(tokens.last().unwrap().token_type, TokenType::EOF);
}

#[test]
fn comments_and_whitespace_produce_no_tokens() {
    assert_token_sequence(
        "// a comment\n\t  \r\n// another\n",
        &[(TokenType::EOF, "")],
    );
}
