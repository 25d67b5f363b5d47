use crate::config::Config;
use crate::error::Result;
use crate::logic::input::{default_text, parse_form};
use crate::logic::report::write_report;
use crate::logic::{FertilityEvaluator, KnowledgeBase};
use crate::models::{AttributeSpec, MeasurementSet, Optimal, Verdict};
use chrono::{DateTime, Local};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Results,
}

pub struct FormState {
    pub focused: usize,
    pub editing: bool,
    pub edit_buffer: String,
    pub values: Vec<String>,
    pub invalid_field: Option<usize>,
}

impl FormState {
    pub fn new(kb: &KnowledgeBase) -> Self {
        Self {
            focused: 0,
            editing: false,
            edit_buffer: String::new(),
            values: kb.attributes().iter().map(default_text).collect(),
            invalid_field: None,
        }
    }

    pub fn next_field(&mut self) {
        if !self.values.is_empty() {
            self.focused = (self.focused + 1) % self.values.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.values.is_empty() {
            self.focused = (self.focused + self.values.len() - 1) % self.values.len();
        }
    }

    pub fn start_editing(&mut self) {
        self.editing = true;
        self.edit_buffer = self.values.get(self.focused).cloned().unwrap_or_default();
    }

    pub fn cancel_editing(&mut self) {
        self.editing = false;
        self.edit_buffer.clear();
    }

    pub fn finish_editing(&mut self) {
        self.editing = false;
        if let Some(value) = self.values.get_mut(self.focused) {
            *value = std::mem::take(&mut self.edit_buffer);
        }
        if self.invalid_field == Some(self.focused) {
            self.invalid_field = None;
        }
    }
}

pub struct ResultsState {
    pub selected_index: usize,
}

impl ResultsState {
    pub fn new() -> Self {
        Self { selected_index: 0 }
    }

    pub fn next(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }
}

pub struct App {
    pub screen: Screen,
    pub should_quit: bool,
    pub config: Config,
    pub knowledge_base: KnowledgeBase,

    // Last evaluation
    pub measurements: MeasurementSet,
    pub verdict: Option<Verdict>,
    pub evaluated_at: Option<DateTime<Local>>,

    // Screen states
    pub form_state: FormState,
    pub results_state: ResultsState,

    // UI state
    pub status_message: Option<String>,
}

impl App {
    pub fn new(config: Config, knowledge_base: KnowledgeBase) -> Self {
        let form_state = FormState::new(&knowledge_base);
        Self {
            screen: Screen::Form,
            should_quit: false,
            config,
            knowledge_base,
            measurements: MeasurementSet::new(),
            verdict: None,
            evaluated_at: None,
            form_state,
            results_state: ResultsState::new(),
            status_message: None,
        }
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn focused_spec(&self) -> Option<&AttributeSpec> {
        self.knowledge_base
            .attributes()
            .get(self.form_state.focused)
    }

    /// Step the focused categorical field through its choices.
    pub fn cycle_choice(&mut self, forward: bool) {
        let Some(spec) = self.knowledge_base.attributes().get(self.form_state.focused) else {
            return;
        };
        let Optimal::Category { choices, .. } = &spec.optimal else {
            return;
        };
        if choices.is_empty() {
            return;
        }

        let Some(current) = self.form_state.values.get_mut(self.form_state.focused) else {
            return;
        };
        let index = choices.iter().position(|c| c == current).unwrap_or(0);
        let next = if forward {
            (index + 1) % choices.len()
        } else {
            (index + choices.len() - 1) % choices.len()
        };
        *current = choices[next].clone();
    }

    /// Parse the form and evaluate it. Parse failures are shown in the
    /// status line and leave the previous result untouched.
    pub fn evaluate(&mut self) {
        let entries = self
            .knowledge_base
            .attributes()
            .iter()
            .zip(self.form_state.values.iter())
            .map(|(spec, value)| (spec.name.as_str(), value.as_str()));

        let measurements = match parse_form(&self.knowledge_base, entries) {
            Ok(m) => m,
            Err(e) => {
                self.form_state.invalid_field = self.field_index_for_error(&e);
                if let Some(index) = self.form_state.invalid_field {
                    self.form_state.focused = index;
                }
                self.set_status(&e.to_string());
                return;
            }
        };

        let verdict = FertilityEvaluator::new(&self.knowledge_base).evaluate(&measurements);
        let now = Local::now();
        self.set_status(&format!(
            "Evaluated at {}: {}",
            now.format("%H:%M:%S"),
            verdict.status()
        ));
        tracing::debug!("Form evaluated: {}", verdict.status());

        self.form_state.invalid_field = None;
        self.measurements = measurements;
        self.verdict = Some(verdict);
        self.evaluated_at = Some(now);
        self.results_state = ResultsState::new();
        self.switch_screen(Screen::Results);
    }

    fn field_index_for_error(&self, err: &crate::error::SoilError) -> Option<usize> {
        use crate::error::SoilError;
        let name = match err {
            SoilError::InvalidMeasurement { attribute, .. } => attribute,
            SoilError::MissingMeasurement(attribute) => attribute,
            _ => return None,
        };
        self.knowledge_base.names().position(|n| n == name)
    }

    pub fn report_path(&self) -> PathBuf {
        self.config.report_path(None)
    }

    /// Write the report for the last evaluation. Returns the path written,
    /// or None when there is nothing to report.
    pub fn save_report(&mut self) -> Result<Option<PathBuf>> {
        let Some(verdict) = self.verdict.as_ref() else {
            self.set_status("Evaluate the sample first");
            return Ok(None);
        };
        if verdict.is_fertile() {
            self.set_status("Soil is fertile - no report to save");
            return Ok(None);
        }

        let path = self.report_path();
        write_report(&path, verdict)?;
        self.set_status(&format!("Report saved to {}", path.display()));
        Ok(Some(path))
    }

    pub fn reset_form(&mut self) {
        self.form_state = FormState::new(&self.knowledge_base);
        self.set_status("Form reset to default values");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Config::default(), KnowledgeBase::standard())
    }

    fn set_value(app: &mut App, name: &str, value: &str) {
        let index = app.knowledge_base.names().position(|n| n == name).unwrap();
        app.form_state.values[index] = value.to_string();
    }

    #[test]
    fn form_starts_with_defaults() {
        let app = app();
        assert_eq!(app.form_state.values.len(), 23);
        assert_eq!(app.form_state.values[0], "6.5");
        assert_eq!(app.screen, Screen::Form);
    }

    #[test]
    fn field_navigation_wraps() {
        let mut app = app();
        app.form_state.prev_field();
        assert_eq!(app.form_state.focused, 22);
        app.form_state.next_field();
        assert_eq!(app.form_state.focused, 0);
    }

    #[test]
    fn editing_replaces_value() {
        let mut app = app();
        app.form_state.start_editing();
        assert_eq!(app.form_state.edit_buffer, "6.5");
        app.form_state.edit_buffer = "5.0".into();
        app.form_state.finish_editing();
        assert_eq!(app.form_state.values[0], "5.0");
        assert!(!app.form_state.editing);
    }

    #[test]
    fn cycle_choice_on_categorical_field() {
        let mut app = app();
        let npk = app.knowledge_base.names().position(|n| n == "NPK").unwrap();
        app.form_state.focused = npk;

        app.cycle_choice(true);
        assert_eq!(app.form_state.values[npk], "Unbalanced");
        app.cycle_choice(true);
        assert_eq!(app.form_state.values[npk], "Balanced");
        app.cycle_choice(false);
        assert_eq!(app.form_state.values[npk], "Unbalanced");

        // Numeric fields are left alone
        app.form_state.focused = 0;
        app.cycle_choice(true);
        assert_eq!(app.form_state.values[0], "6.5");
    }

    #[test]
    fn default_form_reports_out_of_range_defaults() {
        let mut app = app();
        app.evaluate();

        let verdict = app.verdict.as_ref().unwrap();
        // Stock Cu and Magnesium values sit below their ranges
        assert_eq!(verdict.violating_attributes(), vec!["Cu", "Magnesium"]);
        assert_eq!(app.screen, Screen::Results);
        assert!(app.evaluated_at.is_some());
    }

    #[test]
    fn bad_input_does_not_evaluate() {
        let mut app = app();
        set_value(&mut app, "K", "two");
        app.evaluate();

        assert!(app.verdict.is_none());
        assert_eq!(app.screen, Screen::Form);
        let k = app.knowledge_base.names().position(|n| n == "K").unwrap();
        assert_eq!(app.form_state.invalid_field, Some(k));
        assert_eq!(app.form_state.focused, k);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Invalid value for K: 'two'")
        );
    }

    #[test]
    fn fertile_sample_has_no_report() {
        let mut app = app();
        set_value(&mut app, "Cu", "10");
        set_value(&mut app, "Magnesium", "100");
        app.evaluate();

        assert_eq!(app.verdict, Some(Verdict::Fertile));
        assert_eq!(app.save_report().unwrap(), None);
    }

    #[test]
    fn save_report_writes_configured_path() {
        // The environment override would redirect the report
        if std::env::var("SOILFERT_REPORT_DIR").is_ok() {
            return;
        }

        let dir = std::env::temp_dir().join(format!("soilfert-app-{}", std::process::id()));
        let mut config = Config::default();
        config.report.directory = Some(dir.clone());
        let mut app = App::new(config, KnowledgeBase::standard());

        app.evaluate();
        let path = app.save_report().unwrap().unwrap();
        assert_eq!(path, dir.join("soil_report.txt"));
        let report = std::fs::read_to_string(&path).unwrap();
        assert!(report.starts_with("Cu:\n"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
