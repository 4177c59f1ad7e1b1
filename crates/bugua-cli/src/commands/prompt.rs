//! `bugua prompt`: manage the reading template.

use crate::bootstrap::AppBootstrap;
use anyhow::{Context, Result};
use bugua_application::PromptSource;
use colored::Colorize;
use std::path::Path;

pub async fn show(app: &AppBootstrap) -> Result<()> {
    let prompt = app.records_service().prompt().await?;
    let source = match prompt.source {
        PromptSource::Stored => "stored",
        PromptSource::BuiltIn => "built-in default",
    };
    println!("{}", format!("# source: {}", source).bright_black());
    println!("{}", prompt.text);
    Ok(())
}

pub async fn set(app: &AppBootstrap, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let missing = app.records_service().set_prompt(&text).await?;
    println!("{}", "已儲存系統提示詞。".green());
    for marker in missing {
        println!(
            "{}",
            format!("警告：缺少 {{{{{}}}}}，解卦將回報設定異常。", marker).yellow()
        );
    }
    Ok(())
}

pub async fn reset(app: &AppBootstrap) -> Result<()> {
    app.records_service().reset_prompt().await?;
    println!("{}", "已恢復預設系統提示詞。".green());
    Ok(())
}
