//! `bugua records`: list, inspect, edit and delete stored readings.

use crate::bootstrap::AppBootstrap;
use crate::display;
use anyhow::Result;
use bugua_core::RecordUpdate;
use colored::Colorize;

pub async fn list(app: &AppBootstrap) -> Result<()> {
    let records = app.records_service().list().await?;
    if records.is_empty() {
        println!("{}", "尚無卦象紀錄。".bright_black());
        return Ok(());
    }
    for record in &records {
        display::print_record_row(record);
    }
    println!("{}", format!("共 {} 筆", records.len()).bright_black());
    Ok(())
}

pub async fn show(app: &AppBootstrap, key: &str) -> Result<()> {
    let record = app.records_service().show(key).await?;
    display::print_record(&record);
    Ok(())
}

pub async fn edit(app: &AppBootstrap, key: &str, update: RecordUpdate) -> Result<()> {
    let record = app.records_service().edit(key, update).await?;
    println!("{}", "已更新。".green());
    display::print_record(&record);
    Ok(())
}

pub async fn delete(app: &AppBootstrap, key: &str) -> Result<()> {
    app.records_service().delete(key).await?;
    println!("{} {}", "已刪除".green(), key);
    Ok(())
}
