use domain::UserCredential;
use hmc_auth::{AuthError, ChangePassword, change_password, verify_credentials};

fn stored() -> UserCredential {
    UserCredential {
        username: "admin".to_string(),
        password: "0123".to_string(),
    }
}

fn request(old: &str, new: &str) -> ChangePassword {
    ChangePassword {
        username: "admin".to_string(),
        old_password: old.to_string(),
        new_password: new.to_string(),
    }
}

#[test]
fn matching_credentials_verify() {
    assert!(verify_credentials(&stored(), "admin", "0123"));
    assert!(!verify_credentials(&stored(), "admin", "123"));
    assert!(!verify_credentials(&stored(), "root", "0123"));
}

#[test]
fn change_password_keeps_username() {
    let changed = change_password(Some(&stored()), &request("0123", "s3cret")).expect("change");
    assert_eq!(changed.username, "admin");
    assert_eq!(changed.password, "s3cret");
}

#[test]
fn wrong_old_password_rejected() {
    let err = change_password(Some(&stored()), &request("bad", "s3cret")).expect_err("reject");
    assert_eq!(err, AuthError::InvalidCredentials);
}

#[test]
fn missing_user_record_rejected() {
    let err = change_password(None, &request("0123", "s3cret")).expect_err("reject");
    assert_eq!(err, AuthError::NotConfigured);
}

#[test]
fn unsafe_new_password_rejected() {
    for bad in ["", "  ", "a;b", "x]y", " padded"] {
        let err = change_password(Some(&stored()), &request("0123", bad)).expect_err(bad);
        assert!(matches!(err, AuthError::InvalidNewPassword(_)), "{bad:?}");
    }
}
