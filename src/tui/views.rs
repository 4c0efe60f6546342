//! Screen rendering

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
};

use super::form::Form;
use super::{App, Screen};
use crate::exercises::Goal;
use crate::session::{SessionSnapshot, TimerPhase};

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    // Header
    let header = Paragraph::new(format!("Fitness Buddy  {}", app.route.path()))
        .style(Style::default().fg(Color::Cyan).bold())
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    match &app.screen {
        Screen::Introduction => render_introduction(frame, chunks[1]),
        Screen::Login(form) => render_form(
            frame,
            chunks[1],
            "Welcome Back!",
            "Enter Your Username and password",
            form,
            app.is_logging_in(),
        ),
        Screen::Signup(form) => render_form(frame, chunks[1], "Create Account", "Enter your details to sign up", form, false),
        Screen::Home { selected } => render_home(app, frame, chunks[1], *selected),
        Screen::Workout(planner) => {
            let title = planner.goal().map(|g| g.title()).unwrap_or("Workout");
            let items: Vec<ListItem> = if planner.plan().is_empty() {
                vec![ListItem::new("No workouts generated yet. Press g to generate.")]
            } else {
                planner
                    .plan()
                    .iter()
                    .map(|e| {
                        ListItem::new(vec![
                            Line::from(e.name.clone().bold()),
                            Line::from(format!("  {} sets of {} reps", e.sets, e.reps)),
                            Line::from(format!("  {}", e.description).dark_gray()),
                        ])
                    })
                    .collect()
            };
            let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
            frame.render_widget(list, chunks[1]);
        }
        Screen::Exercise(screen) => render_exercise(frame, chunks[1], &screen.snapshot()),
        Screen::ExerciseError(e) => {
            let text = Paragraph::new(format!("Error loading exercises. Please try again later.\n\n{}", e))
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(text, chunks[1]);
        }
    }

    // Notice line
    let notice = match &app.notice {
        Some(n) if n.title.is_empty() => Line::from(n.message.clone()),
        Some(n) => Line::from(vec![format!("{} ", n.title).bold(), n.message.clone().into()]),
        None => Line::from(""),
    };
    frame.render_widget(
        Paragraph::new(notice).block(Block::default().borders(Borders::ALL)),
        chunks[2],
    );

    // Footer
    let footer = Paragraph::new(key_hints(app))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[3]);

    if let Some(prompt) = &app.prompt {
        let popup = centered(area, 40, 7);
        let choices: Vec<String> = prompt
            .choices()
            .iter()
            .map(|c| format!("[{}] {}", c.label().chars().next().unwrap_or(' ').to_ascii_lowercase(), c.label()))
            .collect();
        let body = Paragraph::new(format!("{}\n\n{}", prompt.message(), choices.join("   ")))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(prompt.title()));
        frame.render_widget(Clear, popup);
        frame.render_widget(body, popup);
    }
}

fn key_hints(app: &App) -> &'static str {
    if app.prompt.is_some() {
        return "n: next set | r: reset timer";
    }
    match &app.screen {
        Screen::Introduction => "l: login | s: signup | q: quit",
        Screen::Login(_) if app.is_logging_in() => "esc: cancel",
        Screen::Login(_) | Screen::Signup(_) => "tab: next field | enter: submit | esc: back",
        Screen::Home { .. } => "up/down: select | enter: open | q: quit",
        Screen::Workout(_) => "g: generate | enter: start | esc: home",
        Screen::Exercise(_) => "space: start/pause | r: reset | n: next set | k: skip set | <-/->: exercise | esc: home",
        Screen::ExerciseError(_) => "esc: home",
    }
}

fn render_introduction(frame: &mut Frame, area: Rect) {
    let text = Paragraph::new("Welcome to Fitness Buddy\n\nPress l to log in or s to sign up.")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(text, area);
}

fn render_form(frame: &mut Frame, area: Rect, title: &str, subtitle: &str, form: &Form, loading: bool) {
    let mut lines = vec![Line::from(subtitle.to_string()), Line::from("")];
    for (i, field) in form.fields.iter().enumerate() {
        let marker = if i == form.focus { "> " } else { "  " };
        lines.push(Line::from(vec![
            marker.into(),
            format!("{:<18}", field.label).bold(),
            field.display().into(),
        ]));
    }
    if loading {
        lines.push(Line::from(""));
        lines.push(Line::from("Logging in...".yellow()));
    } else if let Some(error) = &form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(error.to_string().red()));
    }
    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(paragraph, area);
}

fn render_home(app: &App, frame: &mut Frame, area: Rect, selected: usize) {
    let goals = Goal::all().iter().map(|g| match g {
        Goal::WeightLoss => "Weight Loss".to_string(),
        Goal::MuscleGain => "Muscle Gain".to_string(),
    });
    let demos = app.demo.iter().map(|e| format!("Start: {}  ({})", e.name, e.description));

    let items: Vec<ListItem> = goals
        .chain(demos)
        .enumerate()
        .map(|(i, label)| {
            let style = if i == selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            ListItem::new(label).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Select Your Fitness Goal / Try These Exercises"),
    );
    frame.render_widget(list, area);
}

fn render_exercise(frame: &mut Frame, area: Rect, snap: &SessionSnapshot) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let details = Paragraph::new(vec![
        Line::from(snap.exercise.name.clone().bold()),
        Line::from(format!(
            "Set {} of {} | {} reps | exercise {}/{}",
            snap.current_set, snap.exercise.sets, snap.exercise.reps, snap.exercise_index + 1, snap.exercise_count
        )),
        Line::from(snap.exercise.description.clone().dark_gray()),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(details, rows[0]);

    let (label, seconds, color) = match snap.phase {
        TimerPhase::Cooldown => ("Cooldown Time", snap.cooldown_remaining.unwrap_or(0), Color::Blue),
        TimerPhase::Running => ("Running", snap.remaining_seconds, Color::Green),
        TimerPhase::Expired => ("Time is up!", 0, Color::Red),
        TimerPhase::Finished => ("Workout Complete!", 0, Color::Cyan),
        TimerPhase::Idle => ("Paused", snap.remaining_seconds, Color::Yellow),
    };
    let timer = Paragraph::new(format!("\n{}s", seconds))
        .style(Style::default().fg(color).bold())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(label));
    frame.render_widget(timer, rows[1]);

    let ratio = if snap.exercise.sets == 0 {
        0.0
    } else {
        (snap.current_set as f64 / snap.exercise.sets as f64).min(1.0)
    };
    let next = if snap.is_last_exercise() { "Finish" } else { "Next" };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!("Sets  (->: {})", next)))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio);
    frame.render_widget(gauge, rows[2]);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
