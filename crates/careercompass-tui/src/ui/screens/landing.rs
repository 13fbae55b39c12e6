use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

const FEATURES: [(&str, &str); 3] = [
    (
        "For Students",
        "Browse accredited courses from BSc to PhD and apply directly to your dream institutions.",
    ),
    (
        "For Institutions",
        "Showcase your educational offerings and connect with qualified applicants from around the world.",
    ),
    (
        "Seamless Process",
        "Our streamlined application process makes it easy to manage educational journeys from start to finish.",
    ),
];

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(12), // Hero
            Constraint::Min(6),     // Features
        ])
        .split(area);

    render_hero(frame, app, chunks[0]);
    render_features(frame, chunks[1]);
}

fn render_hero(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Find Your Perfect Educational Path",
            styles::title_style(),
        ))
        .centered(),
        Line::from(""),
        Line::from(Span::styled(
            "CareerCompass connects students with world-class institutions for a",
            styles::muted_style(),
        ))
        .centered(),
        Line::from(Span::styled(
            "seamless educational journey from BSc to PhD.",
            styles::muted_style(),
        ))
        .centered(),
        Line::from(""),
    ];

    for (i, (label, _)) in app.landing_actions().iter().enumerate() {
        let text = if i == app.landing_selection {
            format!(" ▶ {} ◀ ", label)
        } else {
            format!("   {}   ", label)
        };
        let style = if i == app.landing_selection {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        lines.push(Line::from(Span::styled(text, style)).centered());
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_features(frame: &mut Frame, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for ((title, description), column) in FEATURES.iter().zip(columns.iter()) {
        let block = Block::default()
            .title(format!(" {} ", title))
            .title_style(styles::heading_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false));
        let paragraph = Paragraph::new(*description)
            .style(styles::muted_style())
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(paragraph, *column);
    }
}
