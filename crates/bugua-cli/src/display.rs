//! Terminal rendering.

use bugua_application::{ReadingOutcome, ReadingSource};
use bugua_core::{Board, ChatMessage, ChatRole, DivinationRecord, Piece, PieceColor, Slot};
use colored::{ColoredString, Colorize};

/// 吉 in red, 凶 dimmed, anything else in blue.
pub fn verdict(luck_level: &str) -> ColoredString {
    if luck_level.contains('吉') {
        luck_level.red().bold()
    } else if luck_level.contains('凶') {
        luck_level.dimmed()
    } else {
        luck_level.blue()
    }
}

pub fn piece(piece: &Piece) -> ColoredString {
    match piece.color {
        PieceColor::Red => piece.label.as_str().red().bold(),
        PieceColor::Black => piece.label.as_str().white().bold(),
    }
}

fn cell(board: &Board, slot: Slot) -> String {
    match board.get(slot) {
        Some(p) => format!("[{}]", piece(p)),
        None => format!("[{}]", slot.label().bright_black()),
    }
}

/// The five slots drawn as a cross.
pub fn board(board: &Board) -> String {
    format!(
        "     {}\n{} {} {}\n     {}",
        cell(board, Slot::Top),
        cell(board, Slot::Left),
        cell(board, Slot::Center),
        cell(board, Slot::Right),
        cell(board, Slot::Bottom),
    )
}

pub fn print_reading(outcome: &ReadingOutcome) {
    let result = &outcome.result;
    println!();
    println!("{}", "════════ 神諭 ════════".bright_magenta().bold());
    println!("卦名：{}", result.hexagram_name.bold());
    println!("吉凶：{}", verdict(&result.luck_level));
    println!();
    for line in result.analysis.lines() {
        println!("  {}", line);
    }
    println!();
    println!("建議：{}", result.advice.green());
    let source = match outcome.source {
        ReadingSource::Cache => "(已存卦象)",
        ReadingSource::Oracle => "(新解)",
        ReadingSource::Degraded => "(未存檔)",
    };
    println!("{} {}", outcome.key.as_str().bright_black(), source.bright_black());
    println!();
}

pub fn print_record_row(record: &DivinationRecord) {
    println!(
        "{}  {:<8} {:<10} {}",
        record.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black(),
        verdict(&record.result.luck_level),
        record.result.hexagram_name,
        record.id().cyan()
    );
}

pub fn print_record(record: &DivinationRecord) {
    println!("{}", record.id().cyan().bold());
    println!("卦碼：{}", record.gua_code);
    println!(
        "類別：{} {}",
        record.category.icon(),
        record.category.label()
    );
    if let Some(gender) = record.gender {
        println!("性別：{}", gender.label());
    }
    println!("時間：{}", record.created_at.to_rfc3339());
    println!("卦名：{}", record.result.hexagram_name);
    println!("吉凶：{}", verdict(&record.result.luck_level));
    println!("分析：");
    for line in record.result.analysis.lines() {
        println!("  {}", line);
    }
    println!("建議：{}", record.result.advice);
    match &record.layout_image {
        Some(image) => println!("圖像：{} bytes", image.len()),
        None => println!("圖像：{}", "無".bright_black()),
    }
}

pub fn print_chat_message(message: &ChatMessage) {
    match message.role {
        ChatRole::User => println!("{} {}", "你>".green(), message.text),
        ChatRole::Model => {
            for line in message.text.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
}
