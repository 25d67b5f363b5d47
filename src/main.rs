mod app;
mod cli;
mod config;
mod error;
mod logic;
mod models;
mod ui;

use anyhow::Context;
use app::{App, Screen};
use clap::Parser;
use cli::{Cli, Commands, OutputFormat, RangesFormat};
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dialoguer::{Input, Select};
use logic::{report, validation, FertilityEvaluator, KnowledgeBase};
use models::{Measurement, MeasurementSet, Optimal};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ui::screens::{FormScreen, ResultsScreen};

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let load = || -> anyhow::Result<(Config, KnowledgeBase)> {
        let config =
            Config::load(cli.config.as_ref()).context("could not load configuration")?;
        let kb = config
            .knowledge_base()
            .context("could not load knowledge base")?;
        Ok((config, kb))
    };

    match cli.command.as_ref().unwrap_or(&Commands::Form) {
        Commands::Init => {
            Config::setup_interactive().context("setup failed")?;
        }
        Commands::Form => {
            let (config, kb) = load()?;
            run_form(config, kb)?;
        }
        Commands::Evaluate {
            input,
            format,
            report,
            strict,
        } => {
            let (_, kb) = load()?;
            evaluate_file(&kb, input, *format, report.as_deref(), *strict)?;
        }
        Commands::Prompt { report } => {
            let (config, kb) = load()?;
            run_prompt(&config, &kb, report.as_ref())?;
        }
        Commands::Ranges { format } => {
            let (_, kb) = load()?;
            print_ranges(&kb, *format)?;
        }
    }

    Ok(())
}

fn evaluate_file(
    kb: &KnowledgeBase,
    input: &Path,
    format: OutputFormat,
    report_path: Option<&Path>,
    strict: bool,
) -> anyhow::Result<()> {
    let measurements = logic::input::load_measurements(input)
        .with_context(|| format!("could not read measurements from {}", input.display()))?;

    if strict {
        validation::ensure_valid(kb, &measurements)?;
    } else {
        for issue in validation::check_measurements(kb, &measurements) {
            tracing::warn!("Not evaluated: {}", issue);
        }
    }

    let verdict = FertilityEvaluator::new(kb).evaluate(&measurements);
    tracing::debug!(
        "{} -> {} {:?}",
        input.display(),
        verdict.status(),
        verdict.violating_attributes()
    );

    match format {
        OutputFormat::Text => print!("{}", report::render_summary(&verdict)),
        OutputFormat::Json => println!("{}", report::render_json(&verdict)?),
    }

    if let Some(path) = report_path {
        if verdict.is_fertile() {
            tracing::info!("Sample is fertile, no report written");
        } else {
            report::write_report(path, &verdict)?;
            eprintln!("Report saved to {}", path.display());
        }
    }

    Ok(())
}

fn run_prompt(
    config: &Config,
    kb: &KnowledgeBase,
    report_override: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let mut measurements = MeasurementSet::new();

    for spec in kb.attributes() {
        let label = format!("Enter {}", spec.display_label());
        let value = match &spec.optimal {
            Optimal::Category { choices, label: optimal } if !choices.is_empty() => {
                let default = choices.iter().position(|c| c == optimal).unwrap_or(0);
                let index = Select::new()
                    .with_prompt(&label)
                    .items(choices)
                    .default(default)
                    .interact()?;
                Measurement::Label(choices[index].clone())
            }
            _ => {
                let text: String = Input::new()
                    .with_prompt(&label)
                    .default(logic::input::default_text(spec))
                    .validate_with(|input: &String| -> Result<(), String> {
                        logic::input::parse_measurement(spec, input)
                            .map(|_| ())
                            .map_err(|e| e.to_string())
                    })
                    .interact_text()?;
                logic::input::parse_measurement(spec, &text)?
            }
        };
        measurements.insert(spec.name.clone(), value);
    }

    let verdict = FertilityEvaluator::new(kb).evaluate(&measurements);
    println!();
    print!("{}", report::render_summary(&verdict));

    if !verdict.is_fertile() {
        let path = config.report_path(report_override);
        report::write_report(&path, &verdict)?;
        println!();
        println!("Report saved to {}", path.display());
    }

    Ok(())
}

fn print_ranges(kb: &KnowledgeBase, format: RangesFormat) -> anyhow::Result<()> {
    match format {
        RangesFormat::Yaml => print!("{}", kb.to_yaml()?),
        RangesFormat::Text => {
            let width = kb
                .attributes()
                .iter()
                .map(|s| s.display_label().len())
                .max()
                .unwrap_or(0);
            for spec in kb.attributes() {
                println!(
                    "{:<width$}  {}",
                    spec.display_label(),
                    spec.optimal.describe(),
                    width = width
                );
            }
        }
    }
    Ok(())
}

fn run_form(config: Config, kb: KnowledgeBase) -> anyhow::Result<()> {
    let mut app = App::new(config, kb);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| {
            let area = f.area();

            match app.screen {
                Screen::Form => {
                    let screen = FormScreen::new(&app.knowledge_base, &app.form_state)
                        .with_status(app.status_message.as_deref());
                    f.render_widget(screen, area);
                }
                Screen::Results => {
                    let screen = ResultsScreen::new(
                        app.verdict.as_ref(),
                        &app.knowledge_base,
                        &app.measurements,
                    )
                    .with_selection(app.results_state.selected_index)
                    .with_timestamp(app.evaluated_at)
                    .with_status(app.status_message.as_deref());
                    f.render_widget(screen, area);
                }
            }
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Global key handling
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.quit();
                    }
                    KeyCode::Char('q') if !app.form_state.editing => {
                        app.quit();
                    }
                    _ => match app.screen {
                        Screen::Form => handle_form_input(app, key.code),
                        Screen::Results => handle_results_input(app, key.code),
                    },
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_form_input(app: &mut App, code: KeyCode) {
    if app.form_state.editing {
        // Editing mode
        match code {
            KeyCode::Esc => app.form_state.cancel_editing(),
            KeyCode::Enter => app.form_state.finish_editing(),
            KeyCode::Backspace => {
                app.form_state.edit_buffer.pop();
            }
            KeyCode::Char(c) => app.form_state.edit_buffer.push(c),
            _ => {}
        }
        return;
    }

    let categorical = app.focused_spec().map_or(false, |s| {
        matches!(&s.optimal, Optimal::Category { choices, .. } if !choices.is_empty())
    });

    // Navigation mode
    match code {
        KeyCode::Up | KeyCode::BackTab => app.form_state.prev_field(),
        KeyCode::Down | KeyCode::Tab => app.form_state.next_field(),
        KeyCode::Left if categorical => app.cycle_choice(false),
        KeyCode::Right if categorical => app.cycle_choice(true),
        KeyCode::Enter if categorical => app.cycle_choice(true),
        KeyCode::Enter => app.form_state.start_editing(),
        KeyCode::Char('e') => app.evaluate(),
        KeyCode::Char('r') => app.reset_form(),
        KeyCode::Esc => app.clear_status(),
        _ => {}
    }
}

fn handle_results_input(app: &mut App, code: KeyCode) {
    let count = app.verdict.as_ref().map_or(0, |v| v.diagnostics().len());
    match code {
        KeyCode::Up => app.results_state.prev(),
        KeyCode::Down => app.results_state.next(count),
        KeyCode::Char('s') => {
            if let Err(e) = app.save_report() {
                tracing::warn!("Failed to save report: {}", e);
                app.set_status(&format!("Save failed: {}", e));
            }
        }
        KeyCode::Esc | KeyCode::Backspace => app.switch_screen(Screen::Form),
        _ => {}
    }
}
