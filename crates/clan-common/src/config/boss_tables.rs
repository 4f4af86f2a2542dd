//! Boss HP tables, read once at startup

use clan_core::BossTables;
use config::{Config, File, FileFormat};

use super::ConfigError;

/// Load and validate the boss tables from a JSON file
///
/// # Errors
/// Returns `ConfigError::BossTables` if the file is missing, malformed or
/// describes an impossible table. Callers treat this as fatal.
pub fn load_boss_tables(path: &str) -> Result<BossTables, ConfigError> {
    let tables: BossTables = Config::builder()
        .add_source(File::new(path, FileFormat::Json))
        .build()
        .and_then(|c| c.try_deserialize::<BossTables>())
        .map_err(|e| ConfigError::BossTables(format!("{path}: {e}")))?;

    tables
        .validate()
        .map_err(|e| ConfigError::BossTables(format!("{path}: {e}")))?;

    tracing::info!(
        path,
        jp_stages = tables.jp.stage_count(),
        tw_stages = tables.tw.stage_count(),
        cn_stages = tables.cn.stage_count(),
        "Boss tables loaded"
    );
    Ok(tables)
}
