//! Styles shared by every screen.
//!
//! Built once from the color configuration at startup and handed to the
//! render functions by reference.

use ratatui::{
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Padding},
};

use crate::config::ColorConfig;

#[derive(Debug, Clone)]
pub struct Styles {
    pub bar_borders: Borders,
    pub bar_border_type: BorderType,
    pub bar_padding: Padding,
    pub border: Style,
    pub title: Style,
    pub scroll_info: Style,
    pub prompt: Style,
    pub counter: Style,
    pub selection: Style,
    pub match_highlight: Style,
    pub marked: Style,
    pub preview_border: Style,
    pub status: Style,
}

impl Styles {
    pub fn from_colors(colors: &ColorConfig) -> Self {
        Self {
            bar_borders: Borders::ALL,
            bar_border_type: BorderType::Plain,
            bar_padding: Padding::horizontal(1),
            border: Style::default().fg(colors.border),
            title: Style::default()
                .fg(colors.title)
                .add_modifier(Modifier::BOLD),
            scroll_info: Style::default().fg(colors.scroll_info),
            prompt: Style::default()
                .fg(colors.prompt)
                .add_modifier(Modifier::BOLD),
            counter: Style::default().fg(colors.counter),
            selection: Style::default()
                .bg(colors.selection_bg)
                .fg(colors.selection_fg)
                .add_modifier(Modifier::BOLD),
            match_highlight: Style::default()
                .fg(colors.match_highlight)
                .add_modifier(Modifier::BOLD),
            marked: Style::default().fg(colors.marked),
            preview_border: Style::default().fg(colors.preview_border),
            status: Style::default().fg(colors.status_fg).bg(colors.status_bg),
        }
    }

    /// The boxed part of the pager's title and scroll bars.
    pub fn bar_block(&self) -> Block<'static> {
        Block::default()
            .borders(self.bar_borders)
            .border_type(self.bar_border_type)
            .border_style(self.border)
            .padding(self.bar_padding)
    }

    /// Rows taken by a bar holding one line of text.
    pub fn bar_height(&self) -> u16 {
        let borders = u16::from(self.bar_borders.contains(Borders::TOP))
            + u16::from(self.bar_borders.contains(Borders::BOTTOM));
        1 + borders + self.bar_padding.top + self.bar_padding.bottom
    }

    /// Columns a bar adds around its text.
    pub fn bar_chrome_width(&self) -> u16 {
        let borders = u16::from(self.bar_borders.contains(Borders::LEFT))
            + u16::from(self.bar_borders.contains(Borders::RIGHT));
        borders + self.bar_padding.left + self.bar_padding.right
    }
}

impl Default for Styles {
    fn default() -> Self {
        Self::from_colors(&ColorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_metrics() {
        let styles = Styles::default();
        assert_eq!(styles.bar_height(), 3);
        assert_eq!(styles.bar_chrome_width(), 4);
    }

    #[test]
    fn test_bar_metrics_follow_padding() {
        let mut styles = Styles::default();
        styles.bar_padding = Padding::new(2, 2, 1, 0);
        styles.bar_borders = Borders::TOP | Borders::BOTTOM;
        assert_eq!(styles.bar_height(), 4);
        assert_eq!(styles.bar_chrome_width(), 4);
    }
}
