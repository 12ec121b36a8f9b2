use crate::config::ApiConfig;
use std::path::PathBuf;

/// Returns the path of the SQLite database
///
/// A `database.path` in the config wins. Otherwise:
///
/// - **macOS**: `~/Library/Application Support/musikfuerfirmen/db.sqlite`
/// - **Linux**: `~/.local/share/musikfuerfirmen/db.sqlite`
/// - **Windows**: `%LOCALAPPDATA%\musikfuerfirmen\db.sqlite`
pub fn get_db_path(config: &ApiConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = config
        .database
        .as_ref()
        .and_then(|db| db.path.as_deref())
        .filter(|p| !p.trim().is_empty())
    {
        return Ok(PathBuf::from(path));
    }

    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("musikfuerfirmen").join("db.sqlite"))
}

/// Open (and migrate) the database
pub fn initialize_database(
    config: &ApiConfig,
) -> anyhow::Result<std::sync::Arc<crate::database::Database>> {
    let db_path = get_db_path(config)?;
    let db = crate::database::Database::new(&db_path)?;
    tracing::info!("Database initialized at: {:?}", db_path);
    Ok(std::sync::Arc::new(db))
}
