//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use careercompass_core::models::Level;
use careercompass_core::{nav_links, Route};

use crate::app::{App, AppState, FormFocus};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle search mode
    if matches!(app.state, AppState::Searching) {
        handle_search_input(app, key);
        return Ok(false);
    }

    // Forms own the keyboard while shown
    if app.form.is_some() {
        handle_form_input(app, key);
        return Ok(false);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            if let Some(link) = nav_links(app.user_kind()).get(index) {
                app.go_path(link.href);
            }
            return Ok(false);
        }
        KeyCode::Char('h') | KeyCode::Esc => {
            app.go(Route::Home);
            return Ok(false);
        }
        KeyCode::Char('o') if app.identity().is_some() => {
            app.logout();
            return Ok(false);
        }
        KeyCode::Char('s') if app.identity().is_none() => {
            app.go(Route::StudentLogin);
            return Ok(false);
        }
        KeyCode::Char('g') if app.identity().is_none() => {
            app.go(Route::StudentRegister);
            return Ok(false);
        }
        KeyCode::Char('i') if app.identity().is_none() => {
            app.go(Route::InstitutionLogin);
            return Ok(false);
        }
        _ => {}
    }

    // Screen-specific keys
    match app.route {
        Route::Home => handle_landing_input(app, key),
        Route::StudentDashboard => {
            if key.code == KeyCode::Char('c') {
                app.go(Route::StudentCourses);
            }
        }
        Route::StudentCourses => handle_courses_input(app, key),
        _ => {}
    }

    Ok(false)
}

fn handle_landing_input(app: &mut App, key: KeyEvent) {
    let actions = app.landing_actions();
    let max_index = actions.len().saturating_sub(1);
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.landing_selection = app.landing_selection.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.landing_selection = (app.landing_selection + 1).min(max_index);
        }
        KeyCode::Enter => {
            if let Some((_, route)) = actions.get(app.landing_selection) {
                app.go(*route);
            }
        }
        _ => {}
    }
}

fn handle_courses_input(app: &mut App, key: KeyEvent) {
    let max_index = app.filtered_courses().len().saturating_sub(1);
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.course_selection = app.course_selection.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.course_selection = (app.course_selection + 1).min(max_index);
        }
        KeyCode::Home => {
            app.course_selection = 0;
        }
        KeyCode::End => {
            app.course_selection = max_index;
        }
        KeyCode::Char('/') => {
            app.state = AppState::Searching;
        }
        KeyCode::Char('x') => app.reset_course_filters(),
        KeyCode::Char(c) => {
            if let Some(level) = level_for_key(c) {
                toggle_level(app, level);
            }
        }
        _ => {}
    }
}

/// Filter shortcut for a level: the lowercased first letter of its label.
pub fn level_key(level: Level) -> char {
    level
        .as_str()
        .chars()
        .next()
        .map(|c| c.to_ascii_lowercase())
        .unwrap_or(' ')
}

fn level_for_key(c: char) -> Option<Level> {
    Level::ALL.into_iter().find(|level| level_key(*level) == c)
}

fn toggle_level(app: &mut App, level: Level) {
    app.course_filter.toggle_level(level);
    app.course_selection = 0;
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.course_filter.search.clear();
            app.clamp_course_selection();
        }
        KeyCode::Enter => {
            app.state = AppState::Normal;
            // Keep search query active
        }
        KeyCode::Backspace => {
            app.course_filter.search.pop();
        }
        KeyCode::Char(c) => {
            app.course_filter.search.push(c);
            // Reset selection when search changes
            app.course_selection = 0;
        }
        _ => {}
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    let transitioning = app.is_transitioning();
    let Some(form) = app.form.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Esc => {
            app.go(Route::Home);
        }
        KeyCode::Down | KeyCode::Tab => form.focus_next(),
        KeyCode::Up | KeyCode::BackTab => form.focus_prev(),
        KeyCode::Enter => match form.focus() {
            FormFocus::Field(i) if i + 1 < form.fields.len() => form.focus_next(),
            FormFocus::Field(_) => {
                form.focus_submit();
                app.submit_form();
            }
            FormFocus::Submit => {
                if !transitioning {
                    app.submit_form();
                }
            }
            FormFocus::Link(i) => {
                let route = form.links()[i].1;
                app.go(route);
            }
        },
        KeyCode::Backspace => {
            if let Some(field) = form.focused_field_mut() {
                field.value.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(field) = form.focused_field_mut() {
                if field.accepts(c) {
                    field.value.push(c);
                }
            }
        }
        _ => {}
    }
}

// ============================================================================
// Tests
// ============================================================================
