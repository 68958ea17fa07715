use crate::types::{NewNode, NewPod, ScaleRequest};
use crate::ui::app::{App, AppMode, FormKind, Pane};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

/// Work the main loop performs against the store or the launcher.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    RefreshNodes,
    RefreshPods,
    RefreshAll,
    InsertNode(NewNode),
    DeleteNode(i64),
    InsertPod(NewPod),
    DeletePod(i64),
    Autoscale(ScaleRequest),
}

impl Action {
    /// Status bar text while the action is in flight.
    pub fn describe(&self) -> String {
        match self {
            Action::Quit => "Quitting".to_string(),
            Action::RefreshNodes => "Loading nodes".to_string(),
            Action::RefreshPods => "Loading pods".to_string(),
            Action::RefreshAll => "Loading nodes and pods".to_string(),
            Action::InsertNode(n) => format!("Adding node {}", n.name),
            Action::DeleteNode(id) => format!("Deleting node {}", id),
            Action::InsertPod(p) => format!("Adding pod {}", p.name),
            Action::DeletePod(id) => format!("Deleting pod {}", id),
            Action::Autoscale(r) => format!("Scaling {}", r.deployment),
        }
    }
}

pub async fn event_loop(tx: mpsc::Sender<AppEvent>) {
    use crossterm::event::EventStream;

    let mut event_stream = EventStream::new();
    let mut tick_interval = tokio::time::interval(std::time::Duration::from_millis(250));

    loop {
        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if tx.send(AppEvent::Key(key)).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                    _ => {}
                }
            }
            _ = tick_interval.tick() => {
                if tx.send(AppEvent::Tick).await.is_err() {
                    break;
                }
            }
        }
    }
}

pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Option<Action> {
    match app.mode {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Filter => handle_filter_mode(app, key),
        AppMode::Form => handle_form_mode(app, key),
        AppMode::Message => {
            app.dismiss_message();
            None
        }
        AppMode::Help => {
            app.help_visible = false;
            app.mode = AppMode::Normal;
            None
        }
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _)
        | (KeyCode::Char('Q'), _)
        | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            return Some(Action::Quit);
        }
        (KeyCode::Tab, _) => {
            app.focus = app.focus.next();
        }
        (KeyCode::BackTab, _) => {
            app.focus = app.focus.previous();
        }
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => {
            app.select_previous();
        }
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => {
            app.select_next();
        }
        (KeyCode::Char('r'), _) => {
            return Some(match app.focus {
                Pane::Nodes => Action::RefreshNodes,
                Pane::Pods => Action::RefreshPods,
                Pane::Scale => Action::RefreshAll,
            });
        }
        (KeyCode::Char('R'), _) => {
            return Some(Action::RefreshAll);
        }
        (KeyCode::Char('a'), _) => {
            let kind = match app.focus {
                Pane::Nodes => FormKind::Node,
                Pane::Pods => FormKind::Pod,
                Pane::Scale => FormKind::Scale,
            };
            app.open_form(kind);
        }
        (KeyCode::Char('d'), _) | (KeyCode::Delete, _) => {
            // No selection, nothing to delete
            return match app.focus {
                Pane::Nodes => app.selected_node_id().map(Action::DeleteNode),
                Pane::Pods => app.selected_pod_id().map(Action::DeletePod),
                Pane::Scale => None,
            };
        }
        (KeyCode::Char('s'), _) => {
            app.open_form(FormKind::Scale);
        }
        (KeyCode::Enter, _) if app.focus == Pane::Scale => {
            app.open_form(FormKind::Scale);
        }
        (KeyCode::Char('f'), _) => {
            app.mode = AppMode::Filter;
            app.filter_pattern.clear();
            app.clamp_selection();
        }
        (KeyCode::Char('?'), _) => {
            app.help_visible = true;
            app.mode = AppMode::Help;
        }
        _ => {}
    }
    None
}

fn handle_filter_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => {
            app.mode = AppMode::Normal;
            app.filter_pattern.clear();
        }
        KeyCode::Enter => {
            app.mode = AppMode::Normal;
        }
        KeyCode::Char(c) => {
            app.filter_pattern.push(c);
        }
        KeyCode::Backspace => {
            app.filter_pattern.pop();
        }
        _ => {}
    }
    app.clamp_selection();
    None
}

fn handle_form_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    let form = app.form.as_mut()?;
    match key.code {
        KeyCode::Esc => {
            app.cancel_form();
        }
        KeyCode::Enter => {
            if !form.advance() {
                return app.submit_form();
            }
        }
        KeyCode::Tab | KeyCode::Down => {
            form.advance();
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.back();
        }
        KeyCode::Char(c) => {
            form.push(c);
        }
        KeyCode::Backspace => {
            form.pop();
        }
        _ => {}
    }
    None
}
