//! Unit tests for session configuration parsing.

use super::*;
use crate::domain::DEFAULT_HASH_COST;
use mockable::MockEnv;
use rstest::{fixture, rstest};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp key file");
    file.write_all(&vec![b'k'; len]).expect("write key");
    file
}

fn path_of(file: &NamedTempFile) -> String {
    file.path()
        .to_str()
        .expect("temporary path should be valid UTF-8")
        .to_owned()
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn release_defaults(key_path: String) -> HashMap<&'static str, String> {
    HashMap::from([
        (KEY_FILE_ENV, key_path),
        (COOKIE_SECURE_ENV, "1".to_owned()),
    ])
}

fn expect_error(
    result: Result<SessionSettings, SessionConfigError>,
    label: &str,
) -> SessionConfigError {
    match result {
        Ok(_) => panic!("{label}"),
        Err(error) => error,
    }
}

#[fixture]
fn long_key() -> NamedTempFile {
    key_file(SESSION_KEY_MIN_LEN)
}

#[rstest]
fn release_with_explicit_settings_succeeds(long_key: NamedTempFile) {
    let env = mock_env(release_defaults(path_of(&long_key)));

    let settings =
        session_settings_from_env(&env, BuildMode::Release).expect("release settings load");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
    assert_eq!(settings.hash_cost, DEFAULT_HASH_COST);
    assert_eq!(settings.secret.as_bytes().len(), SESSION_KEY_MIN_LEN);
}

#[rstest]
fn release_missing_cookie_secure_is_rejected(long_key: NamedTempFile) {
    let mut vars = release_defaults(path_of(&long_key));
    vars.remove(COOKIE_SECURE_ENV);

    let err = expect_error(
        session_settings_from_env(&mock_env(vars), BuildMode::Release),
        "expected missing cookie secure to fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::MissingEnv {
            name: COOKIE_SECURE_ENV
        }
    ));
}

#[rstest]
#[case("maybe")]
#[case("")]
fn release_invalid_cookie_secure_is_rejected(long_key: NamedTempFile, #[case] value: &str) {
    let mut vars = release_defaults(path_of(&long_key));
    vars.insert(COOKIE_SECURE_ENV, value.to_owned());

    let err = expect_error(
        session_settings_from_env(&mock_env(vars), BuildMode::Release),
        "expected invalid cookie secure to fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::InvalidEnv {
            name: COOKIE_SECURE_ENV,
            ..
        }
    ));
}

#[rstest]
fn debug_missing_cookie_secure_defaults_to_secure(long_key: NamedTempFile) {
    let vars = HashMap::from([(KEY_FILE_ENV, path_of(&long_key))]);

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug defaults");
    assert!(settings.cookie_secure);
}

#[rstest]
fn release_same_site_none_requires_secure(long_key: NamedTempFile) {
    let mut vars = release_defaults(path_of(&long_key));
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());

    let err = expect_error(
        session_settings_from_env(&mock_env(vars), BuildMode::Release),
        "expected insecure SameSite=None to fail",
    );
    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn debug_same_site_none_without_secure_is_tolerated(long_key: NamedTempFile) {
    let vars = HashMap::from([
        (KEY_FILE_ENV, path_of(&long_key)),
        (COOKIE_SECURE_ENV, "0".to_owned()),
        (SAMESITE_ENV, "none".to_owned()),
    ]);

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug tolerates");
    assert_eq!(settings.same_site, SameSite::None);
    assert!(!settings.cookie_secure);
}

#[rstest]
fn release_invalid_same_site_is_rejected(long_key: NamedTempFile) {
    let mut vars = release_defaults(path_of(&long_key));
    vars.insert(SAMESITE_ENV, "sideways".to_owned());

    let err = expect_error(
        session_settings_from_env(&mock_env(vars), BuildMode::Release),
        "expected invalid SameSite to fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::InvalidEnv {
            name: SAMESITE_ENV,
            ..
        }
    ));
}

#[rstest]
fn release_short_key_is_rejected() {
    let short = key_file(SESSION_KEY_MIN_LEN - 1);
    let env = mock_env(release_defaults(path_of(&short)));

    let err = expect_error(
        session_settings_from_env(&env, BuildMode::Release),
        "expected short key to fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length, min_len, .. }
            if length == SESSION_KEY_MIN_LEN - 1 && min_len == SESSION_KEY_MIN_LEN
    ));
}

#[rstest]
fn debug_short_key_is_accepted() {
    let short = key_file(8);
    let vars = HashMap::from([(KEY_FILE_ENV, path_of(&short))]);

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug accepts");
    assert_eq!(settings.secret.as_bytes().len(), 8);
}

#[rstest]
#[case(BuildMode::Release)]
#[case(BuildMode::Debug)]
fn missing_key_without_ephemeral_fails(#[case] mode: BuildMode) {
    let missing = std::env::temp_dir().join(format!("absent-key-{}", uuid::Uuid::new_v4()));
    let vars = HashMap::from([
        (KEY_FILE_ENV, missing.display().to_string()),
        (COOKIE_SECURE_ENV, "1".to_owned()),
    ]);

    let err = expect_error(
        session_settings_from_env(&mock_env(vars), mode),
        "expected missing key to fail",
    );
    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn debug_ephemeral_key_is_random() {
    let missing = std::env::temp_dir().join(format!("absent-key-{}", uuid::Uuid::new_v4()));
    let vars = HashMap::from([
        (KEY_FILE_ENV, missing.display().to_string()),
        (ALLOW_EPHEMERAL_ENV, "1".to_owned()),
    ]);
    let env = mock_env(vars);

    let first = session_settings_from_env(&env, BuildMode::Debug).expect("ephemeral key");
    let second = session_settings_from_env(&env, BuildMode::Debug).expect("ephemeral key");
    assert_eq!(first.secret.as_bytes().len(), EPHEMERAL_KEY_LEN);
    assert_ne!(first.secret.as_bytes(), second.secret.as_bytes());
}

#[rstest]
fn release_rejects_ephemeral_keys(long_key: NamedTempFile) {
    let mut vars = release_defaults(path_of(&long_key));
    vars.insert(ALLOW_EPHEMERAL_ENV, "1".to_owned());

    let err = expect_error(
        session_settings_from_env(&mock_env(vars), BuildMode::Release),
        "expected ephemeral toggle to fail",
    );
    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
#[case("4", 4)]
#[case("31", 31)]
#[case(" 10 ", 10)]
fn hash_cost_in_range_is_used(long_key: NamedTempFile, #[case] raw: &str, #[case] expected: u32) {
    let mut vars = release_defaults(path_of(&long_key));
    vars.insert(HASH_COST_ENV, raw.to_owned());

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Release).expect("cost accepted");
    assert_eq!(settings.hash_cost, expected);
}

#[rstest]
#[case("3")]
#[case("32")]
#[case("twelve")]
fn hash_cost_out_of_range_fails_in_release(long_key: NamedTempFile, #[case] raw: &str) {
    let mut vars = release_defaults(path_of(&long_key));
    vars.insert(HASH_COST_ENV, raw.to_owned());

    let err = expect_error(
        session_settings_from_env(&mock_env(vars), BuildMode::Release),
        "expected invalid cost to fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::InvalidEnv {
            name: HASH_COST_ENV,
            ..
        }
    ));
}

#[rstest]
fn hash_cost_out_of_range_defaults_in_debug(long_key: NamedTempFile) {
    let vars = HashMap::from([
        (KEY_FILE_ENV, path_of(&long_key)),
        (HASH_COST_ENV, "99".to_owned()),
    ]);

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug defaults");
    assert_eq!(settings.hash_cost, DEFAULT_HASH_COST);
}
