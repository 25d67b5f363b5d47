use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Single-line text field with a label in its border.
pub struct InputWidget<'a> {
    label: &'a str,
    value: &'a str,
    focused: bool,
    editing: bool,
    invalid: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(label: &'a str, value: &'a str) -> Self {
        Self {
            label,
            value,
            focused: false,
            editing: false,
            invalid: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn editing(mut self, editing: bool) -> Self {
        self.editing = editing;
        self
    }

    pub fn invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.label)
            .borders(Borders::ALL)
            .border_style(Theme::field_border(self.focused, self.invalid));

        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.editing {
            // Cursor sits after the last character
            Line::from(vec![
                Span::styled(self.value, Theme::highlight()),
                Span::styled(" ", Theme::selected()),
            ])
        } else if self.focused {
            Line::from(Span::styled(self.value, Theme::selected()))
        } else {
            Line::from(Span::styled(self.value, Theme::normal()))
        };

        Paragraph::new(line).render(inner, buf);
    }
}

/// Field that cycles through a fixed set of labels.
pub struct SelectWidget<'a> {
    label: &'a str,
    options: &'a [String],
    selected: usize,
    focused: bool,
}

impl<'a> SelectWidget<'a> {
    pub fn new(label: &'a str, options: &'a [String], selected: usize) -> Self {
        Self {
            label,
            options,
            selected,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for SelectWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.label)
            .borders(Borders::ALL)
            .border_style(Theme::field_border(self.focused, false));

        let inner = block.inner(area);
        block.render(area, buf);

        let value = self
            .options
            .get(self.selected)
            .map(|s| s.as_str())
            .unwrap_or("");
        let display = if self.focused {
            format!("< {} >", value)
        } else {
            value.to_string()
        };

        let style = if self.focused {
            Theme::highlight()
        } else {
            Theme::normal()
        };

        let para = Paragraph::new(Span::styled(display, style));
        para.render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn input_renders_label_and_value() {
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        InputWidget::new("pH", "6.5").render(area, &mut buf);

        assert!(row_text(&buf, 0).contains("pH"));
        assert!(row_text(&buf, 1).contains("6.5"));
    }

    #[test]
    fn select_shows_arrows_when_focused() {
        let options = vec!["Balanced".to_string(), "Unbalanced".to_string()];
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        SelectWidget::new("NPK", &options, 1)
            .focused(true)
            .render(area, &mut buf);

        assert!(row_text(&buf, 1).contains("< Unbalanced >"));
    }
}
