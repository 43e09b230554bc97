//! Presentation adapter: screens to Telegram text and inline keyboards

use lb_core::{Callback, Screen, Section};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::html;

/// Telegram's maximum message length in characters
pub const MESSAGE_LIMIT: usize = 4096;

const MAIN_MENU_PROMPT: &str = "Главное меню:";
const EQUIPMENT_PROMPT: &str = "Выбери оборудование:";
const LEVEL1_PROMPT: &str = "Выбери:";
const PUMP_NUMBER_LABEL: &str = "Номер насоса";
const NO_ENTRIES: &str = "Записей не найдено.";
const BACK_LABEL: &str = "🔙 Назад";
const HOME_LABEL: &str = "🏠 Главное меню";
const BLANK_LABEL: &str = "—";
const NOT_AVAILABLE: &str = "Раздел пока в разработке";

/// A screen ready to go out: HTML text split to fit, plus its keyboard
#[derive(Debug, Clone)]
pub struct RenderedScreen {
    /// Message texts, never empty; the keyboard belongs to the last one
    pub chunks: Vec<String>,
    pub markup: InlineKeyboardMarkup,
}

/// Render a screen as HTML text with its inline keyboard
pub fn render(screen: &Screen) -> RenderedScreen {
    RenderedScreen {
        chunks: split_message(&text(screen), MESSAGE_LIMIT),
        markup: markup(screen),
    }
}

/// Short answer shown for a section without a handler
pub fn notice_text(_section: Section) -> &'static str {
    NOT_AVAILABLE
}

/// Button caption for a main-menu section
pub fn section_label(section: Section) -> &'static str {
    match section {
        Section::Pumps => "📂 Насосы",
        Section::Disinfectants => "🧪 Расчёт дезсредств",
        Section::Info => "📚 Полезная информация",
        Section::Norms => "📏 Нормы",
    }
}

fn text(screen: &Screen) -> String {
    match screen {
        Screen::MainMenu => MAIN_MENU_PROMPT.to_string(),
        Screen::Equipment { .. } => EQUIPMENT_PROMPT.to_string(),
        Screen::Level1 { equipment, .. } => {
            format!("{}\n{}", html::escape(equipment), LEVEL1_PROMPT)
        }
        Screen::Level2 { equipment, level1, .. } => {
            format!("{} → {}", html::escape(equipment), html::escape(level1))
        }
        Screen::Result { equipment, level1, level2, entries, .. } => {
            let mut text = format!(
                "🔧 {}\n- {}\n- {}\n\n",
                html::bold(&html::escape(equipment)),
                html::escape(level1),
                html::escape(level2),
            );
            
            if entries.is_empty() {
                text.push_str(NO_ENTRIES);
            }
            for entry in entries {
                text.push_str(&format!(
                    "🔹 {}: {}\n📝 {}\n\n",
                    PUMP_NUMBER_LABEL,
                    html::escape(&entry.pump_number),
                    html::escape(&entry.note),
                ));
            }
            
            text.trim_end().to_string()
        }
    }
}

fn markup(screen: &Screen) -> InlineKeyboardMarkup {
    if let Screen::MainMenu = screen {
        return InlineKeyboardMarkup::new(Section::ALL.into_iter().map(|section| {
            vec![button(section_label(section), &Callback::Section(section))]
        }));
    }
    
    let mut rows: Vec<Vec<InlineKeyboardButton>> = screen
        .choices()
        .iter()
        .map(|choice| {
            let label = if choice.label.is_empty() {
                BLANK_LABEL
            } else {
                choice.label.as_str()
            };
            vec![button(label, &choice.callback)]
        })
        .collect();
    
    if let Some(back) = screen.back() {
        rows.push(vec![button(BACK_LABEL, back)]);
    }
    rows.push(vec![button(HOME_LABEL, &Callback::Home)]);
    
    InlineKeyboardMarkup::new(rows)
}

fn button(label: &str, callback: &Callback) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label.to_string(), callback.encode())
}

/// Split text at line boundaries into chunks of at most `max_chars` characters
///
/// Blank lines that fall on a chunk boundary open the next chunk when they
/// fit. Lines longer than the limit are cut without breaking HTML entities.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }
    
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    let mut started = false;
    
    for line in text.lines() {
        let line_len = line.chars().count();
        
        if started && current_len + 1 + line_len > max_chars {
            let body = current.trim_end_matches('\n');
            let carried = current.len() - body.len();
            if !body.is_empty() {
                chunks.push(body.to_string());
            }
            
            // trailing blank lines move to the head of the next chunk
            current = "\n".repeat(carried.saturating_sub(1));
            current_len = current.len();
            started = carried > 0;
            
            if started && current_len + 1 + line_len > max_chars {
                current.clear();
                current_len = 0;
                started = false;
            }
        }
        
        if line_len > max_chars {
            chunks.extend(cut_line(line, max_chars));
            current.clear();
            current_len = 0;
            started = false;
            continue;
        }
        
        if started {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
        started = true;
    }
    
    let body = current.trim_end_matches('\n');
    if !body.is_empty() {
        chunks.push(body.to_string());
    }
    
    chunks
}

/// Cut one overlong line on char boundaries, never inside an `&...;` entity
fn cut_line(line: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut pieces = Vec::new();
    let mut start = 0;
    
    while start < chars.len() {
        let mut end = (start + max_chars).min(chars.len());
        if end < chars.len() {
            if let Some(amp) = chars[start..end].iter().rposition(|&c| c == '&') {
                let amp = start + amp;
                if amp > start && !chars[amp..end].contains(&';') {
                    end = amp;
                }
            }
        }
        pieces.push(chars[start..end].iter().collect());
        start = end;
    }
    
    pieces
}
