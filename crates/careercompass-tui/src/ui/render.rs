use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use careercompass_core::{nav_links, Route};

use crate::app::{App, AppState};

use super::screens::{auth, courses, dashboard, landing};
use super::styles;

const BRAND: &str = "CareerCompass";

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Navbar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_navbar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_navbar(frame: &mut Frame, app: &App, area: Rect) {
    let kind = app.user_kind();

    let mut spans = vec![
        Span::styled(format!("  {}", BRAND), styles::title_style()),
        Span::raw("   "),
    ];
    for (i, link) in nav_links(kind).iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let selected = link.route() == app.route && app.route != Route::NotFound;
        spans.push(Span::styled(
            format!("[{}] {}", i + 1, link.name),
            styles::nav_style(selected),
        ));
    }

    let actions = if kind.is_some() {
        "[o] Sign Out  [?] Help"
    } else {
        "[s] Sign In  [g] Get Started  [?] Help"
    };
    let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding = (area.width as usize).saturating_sub(used + actions.len() + 2);
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(actions, styles::muted_style()));

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.route {
        Route::Home => landing::render(frame, app, area),
        Route::StudentLogin
        | Route::StudentRegister
        | Route::InstitutionLogin
        | Route::InstitutionRegister => auth::render(frame, app, area),
        Route::StudentDashboard => dashboard::render_student(frame, app, area),
        Route::InstitutionDashboard => dashboard::render_institution(frame, app, area),
        Route::StudentCourses => courses::render(frame, app, area),
        Route::NotFound => render_not_found(frame, area),
    }
}

fn render_not_found(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled("404", styles::title_style())).centered(),
        Line::from(""),
        Line::from(Span::styled("Oops! Page not found", styles::heading_style())).centered(),
        Line::from(""),
        Line::from(vec![
            Span::styled("[h]", styles::help_key_style()),
            Span::styled(" Return to Home", styles::muted_style()),
        ])
        .centered(),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width as usize;
    let shortcuts = " [q]uit ";

    let left = match app.current_toast() {
        Some(toast) => Line::from(vec![
            Span::styled(
                format!(" {} ", toast.notification.title),
                styles::toast_style(toast.notification.variant),
            ),
            Span::styled(toast.notification.description.clone(), styles::muted_style()),
        ]),
        None => {
            let text = match app.identity() {
                Some(identity) => format!(" Signed in as {} ({}) ", identity.display_name, identity.kind),
                None => format!(" © {} CareerCompass. All rights reserved. ", chrono::Local::now().format("%Y")),
            };
            Line::from(Span::styled(text, styles::muted_style()))
        }
    };

    let left_len: usize = left.spans.iter().map(|s| s.content.chars().count()).sum();
    let padding = width.saturating_sub(left_len).saturating_sub(shortcuts.len());

    let mut spans = left.spans;
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(shortcuts, styles::muted_style()));

    let paragraph = Paragraph::new(Line::from(spans)).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 26, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(BRAND, styles::title_style())).centered(),
        Line::from(Span::styled(format!("version {}", version), styles::muted_style())).centered(),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-3", "Navbar links"),
        help_line("h", "Home"),
        help_line("s / g", "Sign in / Get started"),
        help_line("i", "Institution sign in"),
        help_line("↑/↓", "Move selection or form field"),
        help_line("Enter", "Select / submit"),
        help_line("Esc", "Go back"),
        Line::from(""),
        Line::from(Span::styled(" Dashboard & Courses", styles::highlight_style())),
        help_line("c", "Browse all courses"),
        help_line("/", "Search courses or institutions"),
        help_line("b/m/p", "Toggle BSc / MS / PhD filter"),
        help_line("x", "Reset filters"),
        Line::from(""),
        Line::from(Span::styled(" Session", styles::highlight_style())),
        help_line("o", "Sign out"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 8, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(BRAND, styles::title_style())).centered(),
        Line::from(""),
        Line::from(Span::styled(
            "Are you sure you want to quit?",
            styles::highlight_style(),
        ))
        .centered(),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ])
        .centered(),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}
