use crate::logic::KnowledgeBase;
use crate::models::{MeasurementSet, Verdict};
use crate::ui::Theme;
use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap,
    },
};

pub struct ResultsScreen<'a> {
    pub verdict: Option<&'a Verdict>,
    pub knowledge_base: &'a KnowledgeBase,
    pub measurements: &'a MeasurementSet,
    pub selected_index: usize,
    pub evaluated_at: Option<DateTime<Local>>,
    pub status: Option<&'a str>,
}

impl<'a> ResultsScreen<'a> {
    pub fn new(
        verdict: Option<&'a Verdict>,
        knowledge_base: &'a KnowledgeBase,
        measurements: &'a MeasurementSet,
    ) -> Self {
        Self {
            verdict,
            knowledge_base,
            measurements,
            selected_index: 0,
            evaluated_at: None,
            status: None,
        }
    }

    pub fn with_selection(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn with_timestamp(mut self, evaluated_at: Option<DateTime<Local>>) -> Self {
        self.evaluated_at = evaluated_at;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status = status;
        self
    }
}

impl Widget for ResultsScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Length(1), // Verdict
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Status
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let title = Line::from(vec![Span::styled("Results", Theme::title())]);
        Paragraph::new(title).render(chunks[0], buf);

        let Some(verdict) = self.verdict else {
            Paragraph::new(Span::styled("No sample evaluated yet", Theme::dim()))
                .render(chunks[1], buf);
            return;
        };

        let mut banner = Line::from(vec![
            Span::styled("The soil is predicted to be: ", Theme::normal()),
            Span::styled(verdict.status(), Theme::verdict(verdict.is_fertile())),
        ]);
        if let Some(at) = self.evaluated_at {
            banner.push_span(Span::styled(
                format!("  (evaluated {})", at.format("%Y-%m-%d %H:%M:%S")),
                Theme::dim(),
            ));
        }
        Paragraph::new(banner).render(chunks[1], buf);

        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(chunks[2]);

        self.render_list(verdict, content[0], buf);
        self.render_details(verdict, content[1], buf);

        if let Some(status) = self.status {
            Paragraph::new(Span::styled(status, Theme::dim())).render(chunks[3], buf);
        }

        let nav = Line::from(vec![
            Span::styled("[↑↓]", Theme::nav_key()),
            Span::styled("Navigate ", Theme::dim()),
            Span::styled("[s]", Theme::nav_key()),
            Span::styled("Save Report ", Theme::dim()),
            Span::styled("[Esc]", Theme::nav_key()),
            Span::styled("Back to Form ", Theme::dim()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::dim()),
        ]);
        Paragraph::new(nav).render(chunks[4], buf);
    }
}

impl ResultsScreen<'_> {
    fn render_list(&self, verdict: &Verdict, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Issues with the following parameters")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        if verdict.is_fertile() {
            let para = Paragraph::new(Span::styled(
                "All measurements are within their optimal ranges",
                Theme::success(),
            ))
            .wrap(Wrap { trim: true });
            para.render(inner, buf);
            return;
        }

        let items: Vec<ListItem> = verdict
            .diagnostics()
            .iter()
            .map(|diag| {
                ListItem::new(Line::from(vec![
                    Span::styled("! ", Theme::error()),
                    Span::styled(diag.attribute.as_str(), Theme::normal()),
                ]))
            })
            .collect();

        let mut state = ListState::default().with_selected(Some(self.selected_index));
        let list = List::new(items).highlight_style(Theme::selected());
        StatefulWidget::render(list, inner, buf, &mut state);
    }

    fn render_details(&self, verdict: &Verdict, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Details")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(diag) = verdict.diagnostics().get(self.selected_index) else {
            return;
        };

        let mut lines = vec![
            Line::from(vec![Span::styled(diag.attribute.as_str(), Theme::title())]),
            Line::from(vec![]),
        ];

        if let Some(spec) = self.knowledge_base.get(&diag.attribute) {
            let measured = self
                .measurements
                .get(&diag.attribute)
                .map(|m| m.to_string())
                .unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled("Measured: ", Theme::dim()),
                Span::styled(measured, Theme::warning()),
                Span::styled("  Optimal: ", Theme::dim()),
                Span::styled(spec.optimal.describe(), Theme::highlight()),
            ]));
            lines.push(Line::from(vec![]));
        }

        lines.push(Line::from(vec![Span::styled("Issue:", Theme::dim())]));
        lines.push(Line::from(vec![Span::styled(
            diag.issue.as_str(),
            Theme::normal(),
        )]));
        lines.push(Line::from(vec![]));

        lines.push(Line::from(vec![Span::styled("Recommendation:", Theme::dim())]));
        lines.push(Line::from(vec![Span::styled(
            diag.recommendation.as_str(),
            Theme::success(),
        )]));
        lines.push(Line::from(vec![]));

        lines.push(Line::from(vec![Span::styled(
            "Organic Matter Suggestion:",
            Theme::dim(),
        )]));
        lines.push(Line::from(vec![Span::styled(
            diag.organic_matter.as_str(),
            Theme::success(),
        )]));

        let para = Paragraph::new(lines).wrap(Wrap { trim: true });
        para.render(inner, buf);
    }
}
