//! `bugua check`: configuration summary and store connectivity.

use crate::bootstrap::AppBootstrap;
use anyhow::Result;
use colored::Colorize;

pub async fn run(app: &AppBootstrap) -> Result<()> {
    println!("config:   {}", app.config_path.display());
    match app.paths.data_dir() {
        Ok(dir) => println!("data:     {}", dir.display()),
        Err(e) => println!("data:     {}", e.to_string().red()),
    }
    if let Ok(dir) = app.paths.logs_dir() {
        println!("logs:     {}", dir.display());
    }
    println!("storage:  {}", app.stores.backend);
    match app.config.gemini.as_ref().filter(|g| !g.api_key.trim().is_empty()) {
        Some(gemini) => println!("oracle:   Gemini ({})", gemini.model()),
        None => println!("oracle:   {}", "not configured (set GEMINI_API_KEY)".yellow()),
    }
    println!(
        "capture:  {}",
        if app.config.capture.enabled { "svg" } else { "off" }
    );

    let status = app.records_service().check_connection().await;
    if status.success {
        println!("store:    {} {}", "OK".green().bold(), status.message);
    } else {
        println!("store:    {} {}", "FAILED".red().bold(), status.message);
    }
    Ok(())
}
