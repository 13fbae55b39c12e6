use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use careercompass_core::nav_links;
use careercompass_core::utils::format_date;

use crate::app::App;
use crate::ui::styles;

pub fn render_student(frame: &mut Frame, app: &App, area: Rect) {
    let Some(identity) = app.identity() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Welcome
            Constraint::Length(4), // Stats
            Constraint::Min(6),    // Lists
        ])
        .split(area);

    let welcome = vec![
        Line::from(Span::styled(" Welcome back,", styles::muted_style())),
        Line::from(vec![
            Span::styled(format!(" {}", identity.display_name), styles::title_style()),
            Span::raw("   "),
            Span::styled("[c]", styles::help_key_style()),
            Span::styled(" Browse All Courses", styles::muted_style()),
        ]),
    ];
    frame.render_widget(Paragraph::new(welcome), chunks[0]);

    render_stats(frame, app, chunks[1]);

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    render_recent_courses(frame, app, lists[0]);
    render_applications(frame, app, lists[1]);
}

fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.dashboard_stats();
    let cells = [
        ("Courses Viewed", stats.courses_viewed),
        ("Applications", stats.applications),
        ("Accepted Offers", stats.accepted_offers),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for ((label, value), column) in cells.iter().zip(columns.iter()) {
        let lines = vec![
            Line::from(Span::styled(*label, styles::muted_style())),
            Line::from(Span::styled(value.to_string(), styles::heading_style())),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border_style(false));
        frame.render_widget(Paragraph::new(lines).block(block), *column);
    }
}

fn render_recent_courses(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    for course in &app.recent_courses {
        lines.push(Line::from(vec![
            Span::styled(course.name.as_str(), styles::list_item_style()),
            Span::styled(format!("  {}", course.viewed), styles::muted_style()),
        ]));
        lines.push(Line::from(Span::styled(
            format!("{} • {}", course.level, course.institution),
            styles::muted_style(),
        )));
        lines.push(Line::from(""));
    }
    if app.recent_courses.is_empty() {
        lines.push(Line::from(Span::styled("No courses viewed yet", styles::muted_style())));
        lines.push(Line::from(Span::styled("[c] Browse courses", styles::highlight_style())));
    }

    let block = Block::default()
        .title(" Recently Viewed Courses ")
        .title_style(styles::heading_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_applications(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    for application in &app.applications {
        lines.push(Line::from(vec![
            Span::styled(application.course.as_str(), styles::list_item_style()),
            Span::raw("  "),
            Span::styled(
                format!("[{}]", application.status),
                styles::status_badge_style(application.status),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "{} • {}   Submitted: {}",
                application.level,
                application.institution,
                format_date(application.submitted)
            ),
            styles::muted_style(),
        )));
        lines.push(Line::from(""));
    }
    if app.applications.is_empty() {
        lines.push(Line::from(Span::styled("No applications yet", styles::muted_style())));
        lines.push(Line::from(Span::styled("[c] Apply for courses", styles::highlight_style())));
    }

    let block = Block::default()
        .title(" Your Applications ")
        .title_style(styles::heading_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_institution(frame: &mut Frame, app: &App, area: Rect) {
    let Some(identity) = app.identity() else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(" Welcome back,", styles::muted_style())),
        Line::from(Span::styled(format!(" {}", identity.display_name), styles::title_style())),
        Line::from(""),
        Line::from(Span::styled(
            " Manage your programs and review incoming applications.",
            styles::muted_style(),
        )),
        Line::from(""),
    ];
    for (i, link) in nav_links(Some(identity.kind)).iter().enumerate().skip(1) {
        lines.push(Line::from(vec![
            Span::styled(format!(" [{}]", i + 1), styles::help_key_style()),
            Span::styled(format!(" {}", link.name), styles::list_item_style()),
        ]));
    }

    let block = Block::default()
        .title(" Institution Dashboard ")
        .title_style(styles::heading_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
