use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;

fn fg(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color)))
}

pub fn get_styles() -> Styles {
    Styles::styled()
        .usage(fg(AnsiColor::Magenta).bold().underline())
        .header(fg(AnsiColor::Magenta).bold().underline())
        .literal(fg(AnsiColor::Yellow).bold())
        .invalid(fg(AnsiColor::Red).bold())
        .error(fg(AnsiColor::Red).bold())
        .valid(fg(AnsiColor::Yellow).bold())
        .placeholder(fg(AnsiColor::BrightBlack))
}
