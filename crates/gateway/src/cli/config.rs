use anyhow::Context;

use aegis_domain::config::{Config, ConfigSeverity};

/// Validate the config and print a report.
///
/// Returns `false` when any error-severity issue was found so the
/// caller can exit non-zero; warnings alone still pass.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();
    if issues.is_empty() {
        println!("Config OK ({config_path})");
        return true;
    }

    let mut errors = 0;
    let mut warnings = 0;
    for issue in &issues {
        println!("{issue}");
        match issue.severity {
            ConfigSeverity::Error => errors += 1,
            ConfigSeverity::Warning => warnings += 1,
        }
    }
    println!("\n{errors} error(s), {warnings} warning(s) in {config_path}");

    errors == 0
}

/// Dump the resolved config (with all defaults filled in) as TOML.
pub fn show(config: &Config) -> anyhow::Result<()> {
    let rendered = toml::to_string_pretty(config).context("serializing config")?;
    print!("{rendered}");
    Ok(())
}
