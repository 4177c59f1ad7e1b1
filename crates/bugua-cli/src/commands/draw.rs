//! `bugua draw`: one interactive reading, then chat.

use crate::bootstrap::AppBootstrap;
use crate::display;
use crate::repl::{CMD_EXIT, CMD_HELP, CMD_HISTORY, CMD_NEW, Prompter};
use anyhow::Result;
use bugua_application::ChatSession;
use bugua_core::piece::{DECK_SIZE, piece_type_for_label};
use bugua_core::round::Rejection;
use bugua_core::{Category, GamePhase, Gender, InputMode, Round, SelectionOutcome, Slot};
use colored::Colorize;

pub struct DrawOptions {
    pub mode: InputMode,
    pub category: Option<Category>,
    pub gender: Option<Gender>,
    pub seed: Option<u64>,
    pub no_chat: bool,
}

enum ChatExit {
    Quit,
    NewRound,
}

pub async fn run(app: &AppBootstrap, options: DrawOptions) -> Result<()> {
    let usecase = app.divination_usecase();
    let mut prompter = Prompter::new()?;
    let mut round = Round::new(options.mode);
    let mut seed = options.seed;

    loop {
        if round.phase() == GamePhase::Shuffling {
            match seed.take() {
                Some(seed) => round.shuffle_from_seed(seed),
                None => round.shuffle(),
            };
        }

        let filled = match round.mode() {
            InputMode::Flip => pick_flip(&mut round, &mut prompter)?,
            InputMode::Manual => pick_manual(&mut round, &mut prompter)?,
        };
        if !filled {
            println!("{}", "已取消。".bright_black());
            return Ok(());
        }
        println!("{}", display::board(round.board()));

        let Some((category, gender)) =
            choose_question(&mut prompter, options.category, options.gender)?
        else {
            println!("{}", "已取消。".bright_black());
            return Ok(());
        };
        round.choose_category(category);
        round.choose_gender(gender);

        println!("{}", "神諭解讀中……".bright_black());
        let outcome = match usecase.reveal(&mut round).await {
            Ok(outcome) => outcome,
            Err(e) => {
                println!("{}", e.to_string().yellow());
                continue;
            }
        };
        display::print_reading(&outcome);

        if options.no_chat {
            return Ok(());
        }
        let mut chat = app.chat_session(outcome.key.clone(), outcome.result.clone());
        match chat_loop(&mut chat, &mut prompter).await? {
            ChatExit::Quit => return Ok(()),
            ChatExit::NewRound => round.reset(),
        }
    }
}

/// Returns false if the player gave up.
fn pick_flip(round: &mut Round, prompter: &mut Prompter) -> Result<bool> {
    println!("{}", "心中默念所問之事，從 32 張蓋牌中翻出五張。".bright_magenta());
    while round.phase() == GamePhase::Picking {
        print_deck(round);
        let prompt = format!("翻第 {}/5 張 (1-{})> ", round.selection_count() + 1, DECK_SIZE);
        let Some(line) = prompter.read(&prompt)? else {
            return Ok(false);
        };
        let Ok(number) = line.parse::<usize>() else {
            println!("{}", format!("請輸入 1 到 {} 的數字。", DECK_SIZE).yellow());
            continue;
        };
        if number == 0 {
            println!("{}", format!("請輸入 1 到 {} 的數字。", DECK_SIZE).yellow());
            continue;
        }
        report(round.select_at(number - 1));
    }
    Ok(true)
}

fn print_deck(round: &Round) {
    for (row_index, pieces) in round.deck().chunks(8).enumerate() {
        let cells: Vec<String> = pieces
            .iter()
            .enumerate()
            .map(|(i, piece)| {
                let number = row_index * 8 + i + 1;
                if round.is_consumed(&piece.id) {
                    format!("{}", "[--]".bright_black())
                } else {
                    format!("[{:>2}]", number)
                }
            })
            .collect();
        println!("{}", cells.join(" "));
    }
}

/// Returns false if the player gave up.
fn pick_manual(round: &mut Round, prompter: &mut Prompter) -> Result<bool> {
    println!(
        "{}",
        "輸入「位置 棋子」擺放，例如：中 帥、left 馬。全部擺好後輸入 done。".bright_magenta()
    );
    while round.phase() == GamePhase::Picking {
        println!("{}", display::board(round.board()));
        let Some(line) = prompter.read("擺放> ")? else {
            return Ok(false);
        };
        if line.eq_ignore_ascii_case("done") || line == "完成" {
            match round.confirm_board() {
                Ok(_) => {}
                Err(e) => println!("{}", e.to_string().yellow()),
            }
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let [slot, label] = parts.as_slice() else {
            println!("{}", "格式：位置 棋子（例如：上 兵）".yellow());
            continue;
        };
        let slot: Slot = match slot.parse() {
            Ok(slot) => slot,
            Err(e) => {
                println!("{}", e.yellow());
                continue;
            }
        };
        let Some(piece_type) = piece_type_for_label(label) else {
            println!("{}", format!("沒有「{}」這個棋子", label).yellow());
            continue;
        };
        report(round.place(slot, piece_type));
    }
    Ok(true)
}

fn report(outcome: SelectionOutcome) {
    match outcome {
        SelectionOutcome::Placed { slot, piece, .. } => {
            println!("{} ← {}", slot.label(), display::piece(&piece));
        }
        SelectionOutcome::Ignored(rejection) => {
            println!("{}", describe_rejection(rejection).yellow());
        }
    }
}

fn describe_rejection(rejection: Rejection) -> String {
    match rejection {
        Rejection::WrongPhase(phase) => format!("現在無法操作（{}）", phase),
        Rejection::WrongMode(mode) => format!("{:?} 模式不支援此操作", mode),
        Rejection::UnknownPiece => "沒有這張牌。".to_string(),
        Rejection::AlreadyConsumed => "這張牌已經翻過了。".to_string(),
        Rejection::BoardFull => "五個位置都已擺滿。".to_string(),
        Rejection::NoTargetSlot => "請先指定位置。".to_string(),
        Rejection::TypeExhausted => "這種棋子已經全部上盤了。".to_string(),
    }
}

fn choose_question(
    prompter: &mut Prompter,
    category: Option<Category>,
    gender: Option<Gender>,
) -> Result<Option<(Category, Gender)>> {
    let category = match category {
        Some(category) => category,
        None => {
            let all = Category::all();
            for (i, c) in all.iter().enumerate() {
                println!("  {}. {} {}", i + 1, c.icon(), c.label());
            }
            match read_choice(prompter, "所問何事> ", &all)? {
                Some(category) => category,
                None => return Ok(None),
            }
        }
    };
    let gender = match gender {
        Some(gender) => gender,
        None => {
            let all = [Gender::Male, Gender::Female];
            println!("  1. {}  2. {}", Gender::Male.label(), Gender::Female.label());
            match read_choice(prompter, "性別> ", &all)? {
                Some(gender) => gender,
                None => return Ok(None),
            }
        }
    };
    Ok(Some((category, gender)))
}

/// Accepts a 1-based number or anything the type parses from.
fn read_choice<T>(prompter: &mut Prompter, prompt: &str, options: &[T]) -> Result<Option<T>>
where
    T: Copy + std::str::FromStr,
{
    loop {
        let Some(line) = prompter.read(prompt)? else {
            return Ok(None);
        };
        if let Some(choice) = line
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| options.get(i))
        {
            return Ok(Some(*choice));
        }
        if let Ok(choice) = line.parse::<T>() {
            return Ok(Some(choice));
        }
        println!("{}", "請重新選擇。".yellow());
    }
}

async fn chat_loop(chat: &mut ChatSession, prompter: &mut Prompter) -> Result<ChatExit> {
    println!(
        "{}",
        format!("對卦象有疑問嗎？直接提問。{} 結束，{} 重新起卦。", CMD_EXIT, CMD_NEW).bright_black()
    );
    loop {
        let Some(line) = prompter.read("問> ")? else {
            return Ok(ChatExit::Quit);
        };
        match line.as_str() {
            "" => continue,
            CMD_EXIT => return Ok(ChatExit::Quit),
            CMD_NEW => return Ok(ChatExit::NewRound),
            CMD_HISTORY => {
                chat.messages().iter().for_each(display::print_chat_message);
                continue;
            }
            CMD_HELP => {
                println!("{}  結束", CMD_EXIT);
                println!("{}   重新起卦", CMD_NEW);
                println!("{} 顯示對話", CMD_HISTORY);
                continue;
            }
            _ => {}
        }

        match chat.send(&line).await {
            Ok(reply) => {
                for line in reply.lines() {
                    println!("{}", line.bright_blue());
                }
            }
            Err(e) => println!("{}", e.to_string().yellow()),
        }
    }
}
