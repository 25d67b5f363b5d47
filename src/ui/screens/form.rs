use crate::app::FormState;
use crate::logic::KnowledgeBase;
use crate::models::{AttributeSpec, Optimal};
use crate::ui::components::{InputWidget, SelectWidget};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

const COLUMNS: usize = 3;
const FIELD_HEIGHT: u16 = 3;

pub struct FormScreen<'a> {
    pub knowledge_base: &'a KnowledgeBase,
    pub state: &'a FormState,
    pub status: Option<&'a str>,
}

impl<'a> FormScreen<'a> {
    pub fn new(knowledge_base: &'a KnowledgeBase, state: &'a FormState) -> Self {
        Self {
            knowledge_base,
            state,
            status: None,
        }
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status = status;
        self
    }
}

impl Widget for FormScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Min(3),    // Form
                Constraint::Length(3), // Help
                Constraint::Length(1), // Status
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let title = Line::from(vec![
            Span::styled("Soil Fertility", Theme::title()),
            Span::styled(" - Sample Measurements", Theme::dim()),
        ]);
        Paragraph::new(title).render(chunks[0], buf);

        self.render_form(chunks[1], buf);
        self.render_help(chunks[2], buf);

        if let Some(status) = self.status {
            let style = if self.state.invalid_field.is_some() {
                Theme::error()
            } else {
                Theme::warning()
            };
            Paragraph::new(Span::styled(status, style)).render(chunks[3], buf);
        }

        let nav = Line::from(vec![
            Span::styled("[↑↓/Tab]", Theme::nav_key()),
            Span::styled("Navigate ", Theme::dim()),
            Span::styled("[Enter]", Theme::nav_key()),
            Span::styled("Edit ", Theme::dim()),
            Span::styled("[←→]", Theme::nav_key()),
            Span::styled("Choose ", Theme::dim()),
            Span::styled("[e]", Theme::nav_key()),
            Span::styled("Evaluate ", Theme::dim()),
            Span::styled("[r]", Theme::nav_key()),
            Span::styled("Reset ", Theme::dim()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::dim()),
        ]);
        Paragraph::new(nav).render(chunks[4], buf);
    }
}

impl FormScreen<'_> {
    fn render_form(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Measurements")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let specs = self.knowledge_base.attributes();
        let rows = specs.len().div_ceil(COLUMNS);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, COLUMNS as u32); COLUMNS])
            .split(inner);

        if (inner.height as usize) < rows * FIELD_HEIGHT as usize {
            self.render_compact(specs, rows, &columns, buf);
            return;
        }

        for (col, column_area) in columns.iter().enumerate() {
            let field_areas = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![Constraint::Length(FIELD_HEIGHT); rows])
                .split(*column_area);

            for (row, field_area) in field_areas.iter().enumerate() {
                let index = col * rows + row;
                if let Some(spec) = specs.get(index) {
                    self.render_field(index, spec, *field_area, buf);
                }
            }
        }
    }

    /// One `name: value` line per field, scrolled so the focused row shows.
    fn render_compact(
        &self,
        specs: &[AttributeSpec],
        rows: usize,
        columns: &[Rect],
        buf: &mut Buffer,
    ) {
        let visible = columns.first().map_or(0, |c| c.height as usize);
        if visible == 0 {
            return;
        }
        let focused_row = self.state.focused % rows;
        let offset = (focused_row + 1).saturating_sub(visible);

        for (col, column_area) in columns.iter().enumerate() {
            for line in 0..visible.min(rows - offset) {
                let index = col * rows + offset + line;
                let Some(spec) = specs.get(index) else {
                    continue;
                };
                let area = Rect::new(
                    column_area.x,
                    column_area.y + line as u16,
                    column_area.width,
                    1,
                );
                Paragraph::new(self.compact_line(index, spec)).render(area, buf);
            }
        }
    }

    fn compact_line(&self, index: usize, spec: &AttributeSpec) -> Line<'_> {
        let focused = index == self.state.focused;
        let value = self
            .state
            .values
            .get(index)
            .map(|v| v.as_str())
            .unwrap_or("");

        let label_style = if self.state.invalid_field == Some(index) {
            Theme::error()
        } else if focused {
            Theme::highlight()
        } else {
            Theme::dim()
        };
        let mut spans = vec![Span::styled(format!("{}: ", spec.name), label_style)];

        let categorical = matches!(
            &spec.optimal,
            Optimal::Category { choices, .. } if !choices.is_empty()
        );
        if focused && self.state.editing {
            spans.push(Span::styled(self.state.edit_buffer.clone(), Theme::highlight()));
            spans.push(Span::styled(" ", Theme::selected()));
        } else if focused && categorical {
            spans.push(Span::styled(format!("< {} >", value), Theme::highlight()));
        } else if focused {
            spans.push(Span::styled(value.to_string(), Theme::selected()));
        } else {
            spans.push(Span::styled(value.to_string(), Theme::normal()));
        }
        Line::from(spans)
    }

    fn render_field(&self, index: usize, spec: &AttributeSpec, area: Rect, buf: &mut Buffer) {
        let focused = index == self.state.focused;
        let label = spec.display_label();
        let value = self
            .state
            .values
            .get(index)
            .map(|v| v.as_str())
            .unwrap_or("");

        match &spec.optimal {
            Optimal::Category { choices, .. } if !choices.is_empty() => {
                let selected = choices.iter().position(|c| c == value).unwrap_or(0);
                SelectWidget::new(&label, choices, selected)
                    .focused(focused)
                    .render(area, buf);
            }
            _ => {
                let editing = focused && self.state.editing;
                let shown = if editing {
                    self.state.edit_buffer.as_str()
                } else {
                    value
                };
                InputWidget::new(&label, shown)
                    .focused(focused)
                    .editing(editing)
                    .invalid(self.state.invalid_field == Some(index))
                    .render(area, buf);
            }
        }
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Optimal")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(spec) = self.knowledge_base.attributes().get(self.state.focused) else {
            return;
        };

        let line = Line::from(vec![
            Span::styled(format!("{}: ", spec.display_label()), Theme::dim()),
            Span::styled(spec.optimal.describe(), Theme::highlight()),
        ]);
        Paragraph::new(line).render(inner, buf);
    }
}
