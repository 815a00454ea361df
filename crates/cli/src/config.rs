//! Policy configuration loading

use std::path::Path;

use anyhow::Result;
use optimizer_lib::Policy;

/// Load the recommendation policy
///
/// Layers an optional policy file under `CCO_`-prefixed environment
/// variables (e.g. `CCO_IDLE_CPU_PCT_BELOW=15`, nested fields via `__`).
/// Missing fields fall back to the built-in defaults.
pub fn load_policy(path: Option<&Path>) -> Result<Policy> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }
    builder = builder.add_source(
        config::Environment::with_prefix("CCO")
            .separator("__")
            .try_parsing(true),
    );
    let cfg = builder.build()?;

    Ok(cfg.try_deserialize().unwrap_or_else(|_| Policy::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let policy = load_policy(None).unwrap();
        assert_eq!(policy.idle_cpu_pct_below, 20.0);
        assert_eq!(policy.min_observation_hours, 24.0);
    }

    #[test]
    fn policy_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"idle_cpu_pct_below": 12.5, "off_hours": {"start_hour": 22}}"#)
            .unwrap();

        let policy = load_policy(Some(file.path())).unwrap();
        assert_eq!(policy.idle_cpu_pct_below, 12.5);
        assert_eq!(policy.off_hours.start_hour, 22);
        // Untouched fields keep their defaults
        assert_eq!(policy.undersized_cpu_pct_above, 80.0);
    }
}
