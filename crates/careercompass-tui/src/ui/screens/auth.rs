use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use careercompass_core::utils::mask;
use careercompass_core::UserKind;

use crate::app::{App, FormFocus, FormMode};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

/// Visible width of an input box.
const FIELD_WIDTH: usize = 28;

const INSTITUTION_BENEFITS: [&str; 3] = [
    "Showcase your educational programs to a global audience",
    "Manage applications and student inquiries",
    "Post BSc, MS, and PhD program details",
];

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    let transitioning = app.is_transitioning();
    let focus = form.focus();

    let mut lines = vec![
        Line::from(Span::styled(form.title(), styles::title_style())).centered(),
        Line::from(Span::styled(form.subtitle(), styles::muted_style())).centered(),
        Line::from(""),
    ];

    for (i, field) in form.fields.iter().enumerate() {
        let focused = focus == FormFocus::Field(i);
        let style = if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        let shown = if field.secret {
            mask(&field.value, FIELD_WIDTH)
        } else if field.value.is_empty() && !focused {
            String::new()
        } else {
            tail(&field.value, FIELD_WIDTH)
        };
        let cursor = if focused { "▌" } else { "" };

        lines.push(Line::from(Span::styled(format!("  {}", field.label), styles::muted_style())));
        if shown.is_empty() && !focused && !field.placeholder.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("  [", styles::muted_style()),
                Span::styled(format!("{:<width$}", field.placeholder, width = FIELD_WIDTH + 1), styles::muted_style()),
                Span::styled("]", styles::muted_style()),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::styled("  [", styles::muted_style()),
                Span::styled(format!("{}{:<width$}", shown, cursor, width = FIELD_WIDTH + 1 - shown.chars().count()), style),
                Span::styled("]", styles::muted_style()),
            ]));
        }
    }

    if form.mode == FormMode::Register && form.kind == UserKind::Institution {
        lines.push(Line::from(""));
        for benefit in INSTITUTION_BENEFITS {
            lines.push(Line::from(vec![
                Span::styled("  ✓ ", styles::success_style()),
                Span::styled(benefit, styles::muted_style()),
            ]));
        }
    }

    // Submit button
    lines.push(Line::from(""));
    let label = form.submit_label(transitioning);
    let button = if focus == FormFocus::Submit && !transitioning {
        Span::styled(format!(" ▶ {} ◀ ", label), styles::selected_style())
    } else if transitioning {
        Span::styled(format!("   {}   ", label), styles::muted_style())
    } else {
        Span::styled(format!("   {}   ", label), styles::list_item_style())
    };
    lines.push(Line::from(vec![Span::raw("["), button, Span::raw("]")]).centered());

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(error.as_str(), styles::error_style())).centered());
    }

    // Cross-links
    lines.push(Line::from(""));
    for (i, (text, _)) in form.links().iter().enumerate() {
        let style = if focus == FormFocus::Link(i) {
            styles::selected_style()
        } else {
            styles::highlight_style()
        };
        lines.push(Line::from(Span::styled(text.clone(), style)).centered());
    }

    let height = lines.len() as u16 + 2;
    let dialog = centered_rect_fixed(64, height, area);
    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), dialog);
}

/// Last `width` characters, so the cursor end stays visible while typing.
fn tail(value: &str, width: usize) -> String {
    let count = value.chars().count();
    value.chars().skip(count.saturating_sub(width)).collect()
}
