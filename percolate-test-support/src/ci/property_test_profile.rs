//! Property-test run profile read from the environment.
//!
//! Every property suite in the workspace sizes its runs through this profile
//! so CI can scale case counts without touching the suites.

use std::env;

/// Environment variable overriding the number of proptest cases.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable enabling forked proptest execution.
pub const PERCOLATE_PBT_FORK_ENV_KEY: &str = "PERCOLATE_PBT_FORK";

/// Case count and fork mode for one property suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Reads overrides from the environment, falling back to the defaults when
    /// a variable is unset or malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use percolate_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(32, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: override_or(PROGTEST_CASES_ENV_KEY, default_cases, parse_cases),
            fork: override_or(PERCOLATE_PBT_FORK_ENV_KEY, default_fork, parse_flag),
        }
    }

    /// Number of cases per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether cases run in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }
}

fn override_or<T: Copy>(
    key: &'static str,
    default: T,
    parse: impl Fn(&str) -> Result<T, String>,
) -> T {
    let Ok(raw) = env::var(key) else {
        return default;
    };
    parse(&raw).unwrap_or_else(|reason| {
        tracing::warn!(
            env = key,
            raw = %raw,
            reason = %reason,
            "ignoring malformed property-test override",
        );
        default
    })
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("cases must be > 0".to_owned()),
        Ok(cases) => Ok(cases),
        Err(error) => Err(format!("parse error: {error}")),
    }
}

fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected one of: true/false/1/0/yes/no/on/off".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::{Mutex, MutexGuard};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Holds the environment lock and restores both variables on drop.
    struct ScopedEnv {
        saved: Vec<(&'static str, Option<String>)>,
        _lock: MutexGuard<'static, ()>,
    }

    impl ScopedEnv {
        fn new(cases: Option<&str>, fork: Option<&str>) -> Self {
            let lock = ENV_LOCK.lock().expect("env lock");
            let mut saved = Vec::new();
            for (key, value) in [
                (PROGTEST_CASES_ENV_KEY, cases),
                (PERCOLATE_PBT_FORK_ENV_KEY, fork),
            ] {
                saved.push((key, env::var(key).ok()));
                // SAFETY: tests serialise environment access with ENV_LOCK.
                unsafe {
                    match value {
                        Some(raw) => env::set_var(key, raw),
                        None => env::remove_var(key),
                    }
                }
            }
            Self { saved, _lock: lock }
        }
    }

    impl Drop for ScopedEnv {
        fn drop(&mut self) {
            for (key, original) in &self.saved {
                // SAFETY: the lock is still held while restoring.
                unsafe {
                    match original {
                        Some(value) => env::set_var(key, value),
                        None => env::remove_var(key),
                    }
                }
            }
        }
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let _env = ScopedEnv::new(None, None);
        let profile = ProptestRunProfile::load(64, false);
        assert_eq!(profile.cases(), 64);
        assert!(!profile.fork());
    }

    #[rstest]
    #[case("1", 1)]
    #[case(" 250 ", 250)]
    #[case("25000", 25_000)]
    fn case_overrides_are_honoured(#[case] raw: &str, #[case] expected: u32) {
        let _env = ScopedEnv::new(Some(raw), None);
        assert_eq!(ProptestRunProfile::load(64, false).cases(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-1")]
    #[case("many")]
    fn malformed_case_overrides_fall_back(#[case] raw: &str) {
        let _env = ScopedEnv::new(Some(raw), None);
        assert_eq!(ProptestRunProfile::load(64, false).cases(), 64);
    }

    #[rstest]
    #[case("true", true)]
    #[case("ON", true)]
    #[case("1", true)]
    #[case("no", false)]
    #[case("0", false)]
    fn fork_overrides_are_honoured(#[case] raw: &str, #[case] expected: bool) {
        let _env = ScopedEnv::new(None, Some(raw));
        assert_eq!(ProptestRunProfile::load(64, !expected).fork(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("maybe")]
    #[case("2")]
    fn malformed_fork_overrides_fall_back(#[case] raw: &str) {
        let _env = ScopedEnv::new(None, Some(raw));
        assert!(ProptestRunProfile::load(64, true).fork());
    }
}
