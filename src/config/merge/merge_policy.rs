//! Defaults seeded into every builder before any source is layered on.

use crate::config::NavigatorConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = NavigatorConfig::default();
    Config::builder()
        .set_default("filter.pattern", defaults.filter.pattern)?
        .set_default("filter.case_sensitive", defaults.filter.case_sensitive)?
        .set_default("loader.parallel", defaults.loader.parallel)?
        .set_default(
            "watch.poll_interval_ms",
            defaults.watch.poll_interval_ms as i64,
        )?
        .set_default("watch.audit", defaults.watch.audit)
}
