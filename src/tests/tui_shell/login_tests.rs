use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::*;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_str(screen: &mut LoginScreen, s: &str) {
    for c in s.chars() {
        screen.handle_key(key(KeyCode::Char(c)));
    }
}

#[test]
fn enter_moves_to_password_then_submits() {
    let mut screen = LoginScreen::default();
    type_str(&mut screen, "alice");
    assert!(matches!(screen.handle_key(key(KeyCode::Enter)), LoginAction::None));
    assert!(screen.focus_password);

    type_str(&mut screen, "s3cret");
    assert_eq!(screen.password.masked(), "******");
    match screen.handle_key(key(KeyCode::Enter)) {
        LoginAction::Submit { username, password } => {
            assert_eq!(username, "alice");
            assert_eq!(password, "s3cret");
        }
        _ => panic!("expected submit"),
    }
    assert!(screen.busy);
    assert!(matches!(screen.handle_key(key(KeyCode::Enter)), LoginAction::None));
}

#[test]
fn blank_username_is_rejected_locally() {
    let mut screen = LoginScreen::default();
    screen.handle_key(key(KeyCode::Tab));
    type_str(&mut screen, "pw");
    assert!(matches!(screen.handle_key(key(KeyCode::Enter)), LoginAction::None));
    assert!(!screen.focus_password);
    assert!(screen.error.is_some());
    assert!(!screen.busy);
}

#[test]
fn esc_quits() {
    let mut screen = LoginScreen::with_notice(Some("Logged out.".to_string()));
    assert!(matches!(screen.handle_key(key(KeyCode::Esc)), LoginAction::Quit));
}
