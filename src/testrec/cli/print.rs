use colored::{ColoredString, Colorize};
use testrec::api::{CmdMessage, DatabaseFile, MessageLevel};
use testrec::config::{RecordConfig, CONFIG_KEYS};
use testrec::model::{Record, TestResult};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ID_WIDTH: usize = 7;
const NAME_WIDTH: usize = 32;
const TYPE_WIDTH: usize = 18;
const RESULT_WIDTH: usize = 9;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_records(records: &[Record]) {
    if records.is_empty() {
        println!("No records found.");
        return;
    }

    println!(
        "{}",
        format!(
            "{}{}{}{}{}",
            pad("ID", ID_WIDTH),
            pad("System Name", NAME_WIDTH),
            pad("Test Type", TYPE_WIDTH),
            pad("Result", RESULT_WIDTH),
            "Status"
        )
        .bold()
    );

    for record in records {
        let line = format!(
            "{}{}{}",
            pad(&record.id.to_string(), ID_WIDTH),
            pad(&record.system_name, NAME_WIDTH),
            pad(&record.test_type, TYPE_WIDTH),
        );
        let result = colored_result(record.result, &pad(record.result.as_str(), RESULT_WIDTH));
        if record.active {
            println!("{}{}active", line, result);
        } else {
            println!("{}{}{}", line.dimmed(), result.dimmed(), "deleted".red());
        }
    }
}

pub(super) fn print_record(record: &Record) {
    println!("{} {}", format!("#{}", record.id).yellow(), record.system_name.bold());
    println!("--------------------------------");
    println!("Test type: {}", record.test_type);
    println!("Result:    {}", colored_result(record.result, record.result.as_str()));
    let status = if record.active {
        "active".normal()
    } else {
        "deleted".red()
    };
    println!("Status:    {}", status);
}

pub(super) fn print_files(files: &[DatabaseFile]) {
    if files.is_empty() {
        println!("No database files found.");
        return;
    }
    for file in files {
        let path = file.path.display().to_string();
        if file.valid_header {
            println!("{}", path);
        } else {
            println!("{} {}", path.dimmed(), "(not a record database)".yellow());
        }
    }
}

pub(super) fn print_config(config: &RecordConfig) {
    for key in CONFIG_KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn colored_result(result: TestResult, text: &str) -> ColoredString {
    match result {
        TestResult::Passed | TestResult::Success => text.green(),
        TestResult::Failed => text.red(),
        TestResult::Pending => text.yellow(),
    }
}

/// Truncate to `width` columns (leaving one for spacing) and pad to `width`.
fn pad(s: &str, width: usize) -> String {
    let cell = truncate_to_width(s, width.saturating_sub(1));
    let padding = width.saturating_sub(cell.width());
    format!("{}{}", cell, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_padded() {
        assert_eq!(pad("abc", 6), "abc   ");
    }

    #[test]
    fn long_text_is_truncated_with_ellipsis() {
        let cell = pad("A very long system name indeed", 10);
        assert_eq!(cell.width(), 10);
        assert!(cell.trim_end().ends_with('…'));
    }

    #[test]
    fn exact_fit_is_not_truncated() {
        assert_eq!(truncate_to_width("abcd", 4), "abcd");
    }
}
