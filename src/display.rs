//! Terminal output formatting for search results.

use crate::search::Candidate;
use crossterm::execute;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use std::io::{stdout, Write};

/// Color scheme for the result panel
pub struct ColorScheme {
    pub timestamp: Color,
    pub contact: Color,
    pub sender: Color,
    pub body: Color,
    pub source: Color,
    pub separator: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            timestamp: Color::Cyan,
            contact: Color::Magenta,
            sender: Color::Green,
            body: Color::Yellow,
            source: Color::DarkGrey,
            separator: Color::DarkGrey,
        }
    }
}

/// Formats and displays the winning first message
pub struct ResultDisplay {
    colors: ColorScheme,
}

impl ResultDisplay {
    pub fn new() -> Self {
        Self {
            colors: ColorScheme::default(),
        }
    }

    /// Display the winning candidate to stdout
    pub fn display(&self, target: &str, candidate: &Candidate) -> std::io::Result<()> {
        let mut stdout = stdout();

        self.print_separator(&mut stdout)?;

        execute!(
            stdout,
            SetAttribute(Attribute::Bold),
            Print(format!("First message for {}", target)),
            SetAttribute(Attribute::Reset)
        )?;
        println!();

        self.print_field(
            &mut stdout,
            "Date",
            &candidate.message.timestamp_display,
            self.colors.timestamp,
        )?;
        self.print_field(
            &mut stdout,
            "Contact",
            &candidate.message.contact,
            self.colors.contact,
        )?;
        self.print_field(
            &mut stdout,
            "Sender",
            &candidate.message.sender.to_string(),
            self.colors.sender,
        )?;
        self.print_field(&mut stdout, "Message", &candidate.message.body, self.colors.body)?;

        execute!(
            stdout,
            SetForegroundColor(self.colors.source),
            Print(format!("(from {})", candidate.source_label)),
            ResetColor
        )?;
        println!();

        self.print_separator(&mut stdout)?;
        stdout.flush()?;
        Ok(())
    }

    /// Display the not-found outcome
    pub fn display_not_found(&self) -> std::io::Result<()> {
        let mut stdout = stdout();
        self.print_separator(&mut stdout)?;
        execute!(
            stdout,
            SetForegroundColor(Color::Red),
            SetAttribute(Attribute::Bold),
            Print("No messages found for this contact."),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
        println!();
        self.print_separator(&mut stdout)?;
        stdout.flush()?;
        Ok(())
    }

    fn print_field(
        &self,
        stdout: &mut std::io::Stdout,
        label: &str,
        value: &str,
        color: Color,
    ) -> std::io::Result<()> {
        execute!(
            stdout,
            SetForegroundColor(color),
            SetAttribute(Attribute::Bold),
            Print(format!("{}: ", label)),
            SetAttribute(Attribute::Reset),
            ResetColor,
            Print(value)
        )?;
        println!();
        Ok(())
    }

    fn print_separator(&self, stdout: &mut std::io::Stdout) -> std::io::Result<()> {
        execute!(
            stdout,
            SetForegroundColor(self.colors.separator),
            Print("━".repeat(70)),
            ResetColor
        )?;
        println!();
        Ok(())
    }
}

impl Default for ResultDisplay {
    fn default() -> Self {
        Self::new()
    }
}
