use eujim_portal::{AppConfig, config::Env};
use serial_test::serial;
use std::{env, panic, path::PathBuf};

// --- Setup/Teardown Utilities ---

const PORTAL_VARS: [&str; 7] = [
    "APP_ENV",
    "PORTAL_BIND_ADDR",
    "PORTAL_API_URL",
    "PORTAL_JWT_SECRET",
    "PORTAL_SESSION_DIR",
    "PORTAL_SESSION_TTL_HOURS",
    "PORTAL_PAGE_SIZE",
];

/// Utility to run a test function and restore environment variables afterward
fn run_with_env<T, R>(test: T, cleanup_vars: &[&'static str]) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(String, Option<String>)> = cleanup_vars
        .iter()
        .map(|&var| (var.to_string(), env::var(var).ok()))
        .collect();

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals.into_iter().rev() {
        unsafe {
            if let Some(val) = original_value {
                env::set_var(&key, val);
            } else {
                env::remove_var(&key);
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

fn clear_portal_vars() {
    unsafe {
        for var in PORTAL_VARS {
            env::remove_var(var);
        }
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_production_fail_fast() {
    let result = run_with_env(
        || {
            panic::catch_unwind(|| {
                clear_portal_vars();
                unsafe {
                    env::set_var("APP_ENV", "production");
                    env::set_var("PORTAL_API_URL", "https://api.example.com");
                }
                // PORTAL_JWT_SECRET is missing
                AppConfig::load()
            })
        },
        &PORTAL_VARS,
    );

    assert!(
        result.is_err(),
        "Production config loading should panic on a missing secret"
    );
}

#[test]
#[serial]
fn test_app_config_production_requires_api_url() {
    let result = run_with_env(
        || {
            panic::catch_unwind(|| {
                clear_portal_vars();
                unsafe {
                    env::set_var("APP_ENV", "production");
                    env::set_var("PORTAL_JWT_SECRET", "prod-secret");
                }
                AppConfig::load()
            })
        },
        &PORTAL_VARS,
    );

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    let config = run_with_env(
        || {
            clear_portal_vars();
            unsafe {
                env::set_var("APP_ENV", "local");
            }
            AppConfig::load()
        },
        &PORTAL_VARS,
    );

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
    assert_eq!(config.api_url, "http://localhost:8000");
    assert_eq!(config.jwt_secret, AppConfig::default().jwt_secret);
    assert_eq!(config.session_dir, None);
    assert_eq!(config.session_ttl, chrono::Duration::hours(24));
    assert_eq!(config.page_size, 10);
}

#[test]
#[serial]
fn test_app_config_reads_overrides() {
    let config = run_with_env(
        || {
            clear_portal_vars();
            unsafe {
                env::set_var("APP_ENV", "production");
                env::set_var("PORTAL_API_URL", "https://api.example.com");
                env::set_var("PORTAL_JWT_SECRET", "prod-secret");
                env::set_var("PORTAL_BIND_ADDR", "127.0.0.1:8080");
                env::set_var("PORTAL_SESSION_DIR", "/var/lib/portal/sessions");
                env::set_var("PORTAL_SESSION_TTL_HOURS", "2");
                env::set_var("PORTAL_PAGE_SIZE", "25");
            }
            AppConfig::load()
        },
        &PORTAL_VARS,
    );

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.api_url, "https://api.example.com");
    assert_eq!(config.jwt_secret, "prod-secret");
    assert_eq!(config.bind_addr, "127.0.0.1:8080");
    assert_eq!(
        config.session_dir,
        Some(PathBuf::from("/var/lib/portal/sessions"))
    );
    assert_eq!(config.session_ttl, chrono::Duration::hours(2));
    assert_eq!(config.page_size, 25);
}

#[test]
#[serial]
fn test_app_config_page_size_zero_is_raised_to_one() {
    let config = run_with_env(
        || {
            clear_portal_vars();
            unsafe {
                env::set_var("PORTAL_PAGE_SIZE", "0");
            }
            AppConfig::load()
        },
        &PORTAL_VARS,
    );

    assert_eq!(config.page_size, 1);
}

#[test]
#[serial]
fn test_app_config_rejects_unparseable_ttl() {
    let result = run_with_env(
        || {
            panic::catch_unwind(|| {
                clear_portal_vars();
                unsafe {
                    env::set_var("PORTAL_SESSION_TTL_HOURS", "a day");
                }
                AppConfig::load()
            })
        },
        &PORTAL_VARS,
    );

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_app_config_rejects_non_positive_ttl() {
    for raw in ["-1", "0"] {
        let result = run_with_env(
            || {
                panic::catch_unwind(|| {
                    clear_portal_vars();
                    unsafe {
                        env::set_var("PORTAL_SESSION_TTL_HOURS", raw);
                    }
                    AppConfig::load()
                })
            },
            &PORTAL_VARS,
        );

        assert!(result.is_err(), "TTL {} should be rejected", raw);
    }
}

#[test]
#[serial]
fn test_app_config_rejects_out_of_range_ttl() {
    let result = run_with_env(
        || {
            panic::catch_unwind(|| {
                clear_portal_vars();
                unsafe {
                    env::set_var("PORTAL_SESSION_TTL_HOURS", (i64::MAX / 1000).to_string());
                }
                AppConfig::load()
            })
        },
        &PORTAL_VARS,
    );

    let payload = result.expect_err("out-of-range TTL should be rejected");
    let message = payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_default();
    assert!(message.contains("FATAL: PORTAL_SESSION_TTL_HOURS"), "{}", message);
}
