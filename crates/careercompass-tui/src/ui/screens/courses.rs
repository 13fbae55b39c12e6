use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use careercompass_core::models::Level;
use careercompass_core::utils::{format_date, truncate_string};

use crate::app::{App, AppState};
use crate::ui::input::level_key;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Heading + level filters
            Constraint::Length(3), // Search
            Constraint::Min(6),    // List + detail
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_search(frame, app, chunks[1]);

    if app.filtered_courses().is_empty() {
        render_empty(frame, chunks[2]);
        return;
    }

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    render_course_list(frame, app, body[0]);
    render_course_detail(frame, app, body[1]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut filters = vec![Span::raw(" ")];
    for level in Level::ALL {
        let key = level_key(level);
        let selected = app.course_filter.level == Some(level);
        filters.push(Span::styled(format!("[{}]", key), styles::help_key_style()));
        filters.push(Span::styled(format!(" {} ", level), styles::level_badge_style(selected)));
        filters.push(Span::raw("  "));
    }
    if app.course_filter.is_active() {
        filters.push(Span::styled("[x] Reset Filters", styles::muted_style()));
    }

    let lines = vec![
        Line::from(vec![
            Span::styled(" Browse Courses", styles::title_style()),
            Span::styled(
                "  Discover programs from top institutions worldwide",
                styles::muted_style(),
            ),
        ]),
        Line::from(filters),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let searching = matches!(app.state, AppState::Searching);
    let text = if app.course_filter.search.is_empty() && !searching {
        Span::styled("Search courses or institutions... [/]", styles::muted_style())
    } else {
        let cursor = if searching { "▌" } else { "" };
        Span::styled(
            format!("{}{}", app.course_filter.search, cursor),
            styles::search_style(),
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(searching));
    frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);
}

fn render_empty(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("No courses found", styles::heading_style())).centered(),
        Line::from(Span::styled(
            "Try adjusting your search or filters",
            styles::muted_style(),
        ))
        .centered(),
        Line::from(""),
        Line::from(Span::styled("[x] Reset Filters", styles::highlight_style())).centered(),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_course_list(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new([Cell::from("Level"), Cell::from("Course"), Cell::from("Institution")])
        .style(styles::title_style())
        .height(1);

    let courses = app.filtered_courses();
    let rows: Vec<Row> = courses
        .iter()
        .enumerate()
        .map(|(i, course)| {
            let style = if i == app.course_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(course.level.as_str()),
                Cell::from(course.name.as_str()),
                Cell::from(truncate_string(&course.institution, 30)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(45),
        Constraint::Fill(1),
    ];

    let title = format!(" Courses ({} of {}) ", courses.len(), app.courses.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.course_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_course_detail(frame: &mut Frame, app: &App, area: Rect) {
    let content = match app.selected_course() {
        Some(course) => vec![
            Line::from(vec![
                Span::styled(format!(" {} ", course.level), styles::level_badge_style(true)),
                Span::styled(
                    format!("  Deadline: {}", format_date(course.deadline)),
                    styles::muted_style(),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(course.name.as_str(), styles::title_style())),
            Line::from(vec![
                Span::styled(course.institution.as_str(), styles::list_item_style()),
                Span::styled(" • ", styles::muted_style()),
                Span::styled(course.location.as_str(), styles::list_item_style()),
            ]),
            Line::from(""),
            Line::from(Span::styled(course.description.as_str(), styles::muted_style())),
            Line::from(""),
            Line::from(vec![
                Span::styled("Duration: ", styles::muted_style()),
                Span::raw(course.duration.as_str()),
            ]),
        ],
        None => vec![Line::from(Span::styled("Select a course", styles::muted_style()))],
    };

    let block = Block::default()
        .title(" Details ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(
        Paragraph::new(content).wrap(Wrap { trim: true }).block(block),
        area,
    );
}
