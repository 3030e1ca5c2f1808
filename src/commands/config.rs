//! Configuration commands

use tauri::{command, State};

use crate::core::config::AppConfig;
use crate::AppState;

#[command]
pub async fn get_config(state: State<'_, AppState>) -> Result<AppConfig, String> {
    Ok(state.config.read().await.clone())
}

#[command]
pub async fn save_config(
    new_config: AppConfig,
    state: State<'_, AppState>,
) -> Result<(), String> {
    new_config.validate().map_err(|e| e.to_string())?;
    new_config.save().map_err(|e| e.to_string())?;

    *state.config.write().await = new_config;
    tracing::info!("Configuration updated");
    Ok(())
}

#[command]
pub async fn reset_config(state: State<'_, AppState>) -> Result<AppConfig, String> {
    let config = AppConfig::reset().map_err(|e| e.to_string())?;
    *state.config.write().await = config.clone();
    Ok(config)
}
