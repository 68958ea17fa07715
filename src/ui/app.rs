use crate::types::{NewNode, NewPod, Node, Pod, ScaleRequest};
use crate::ui::events::Action;
use chrono::{DateTime, Local};
use ratatui::widgets::TableState;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Nodes,
    Pods,
    Scale,
}

impl Pane {
    pub fn next(self) -> Self {
        match self {
            Pane::Nodes => Pane::Pods,
            Pane::Pods => Pane::Scale,
            Pane::Scale => Pane::Nodes,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Pane::Nodes => Pane::Scale,
            Pane::Pods => Pane::Nodes,
            Pane::Scale => Pane::Pods,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    Filter,
    Form,
    Message,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Node,
    Pod,
    Scale,
}

impl FormKind {
    pub fn title(self) -> &'static str {
        match self {
            FormKind::Node => "Add Node",
            FormKind::Pod => "Add Pod",
            FormKind::Scale => "Autoscale Deployment",
        }
    }

    pub fn labels(self) -> [&'static str; 3] {
        match self {
            FormKind::Node => ["Node Name", "Status", "Kubelet Version"],
            FormKind::Pod => ["Pod Name", "Namespace", "Status"],
            FormKind::Scale => ["Deployment", "Namespace", "CPU %"],
        }
    }
}

/// Three-field input dialog used for inserts and the autoscale request.
#[derive(Debug, Clone, PartialEq)]
pub struct InputForm {
    pub kind: FormKind,
    pub values: [String; 3],
    pub active: usize,
}

impl InputForm {
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            values: Default::default(),
            active: 0,
        }
    }

    pub fn with_values(kind: FormKind, values: [String; 3]) -> Self {
        Self {
            kind,
            values,
            active: 0,
        }
    }

    pub fn push(&mut self, c: char) {
        self.values[self.active].push(c);
    }

    pub fn pop(&mut self) {
        self.values[self.active].pop();
    }

    /// Move to the next field; `false` when already on the last one.
    pub fn advance(&mut self) -> bool {
        if self.active + 1 < self.values.len() {
            self.active += 1;
            true
        } else {
            false
        }
    }

    pub fn back(&mut self) {
        self.active = self.active.saturating_sub(1);
    }

    pub fn into_action(self) -> Action {
        let [a, b, c] = self.values;
        match self.kind {
            FormKind::Node => Action::InsertNode(NewNode {
                name: a,
                status: b,
                kubelet_version: c,
            }),
            FormKind::Pod => Action::InsertPod(NewPod {
                name: a,
                namespace: b,
                status: c,
            }),
            FormKind::Scale => Action::Autoscale(ScaleRequest {
                deployment: a,
                namespace: b,
                cpu: c,
            }),
        }
    }
}

pub struct App {
    // Snapshots of the store as of the last successful refresh
    pub nodes: Vec<Node>,
    pub pods: Vec<Pod>,
    pub nodes_refreshed: Option<DateTime<Local>>,
    pub pods_refreshed: Option<DateTime<Local>>,

    // UI state
    pub node_state: TableState,
    pub pod_state: TableState,
    pub focus: Pane,
    pub mode: AppMode,
    pub form: Option<InputForm>,
    pub message: Option<String>,
    pub busy: Option<String>,
    pub help_visible: bool,

    // Filter state (f key - shows only matching rows in both tables)
    pub filter_pattern: String,

    // Last autoscale request, shown in the scale panel and reused by the form
    pub scale_fields: [String; 3],
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            pods: Vec::new(),
            nodes_refreshed: None,
            pods_refreshed: None,
            node_state: TableState::default(),
            pod_state: TableState::default(),
            focus: Pane::Nodes,
            mode: AppMode::Normal,
            form: None,
            message: None,
            busy: None,
            help_visible: false,
            filter_pattern: String::new(),
            scale_fields: Default::default(),
        }
    }

    pub fn set_nodes(&mut self, nodes: Vec<Node>) {
        self.nodes = nodes;
        self.nodes_refreshed = Some(Local::now());
        self.clamp_selection();
    }

    pub fn set_pods(&mut self, pods: Vec<Pod>) {
        self.pods = pods;
        self.pods_refreshed = Some(Local::now());
        self.clamp_selection();
    }

    pub fn filter_regex(&self) -> Option<Regex> {
        if self.filter_pattern.is_empty() {
            return None;
        }
        // Case-insensitive by default
        Regex::new(&format!("(?i){}", self.filter_pattern)).ok()
    }

    pub fn filtered_nodes(&self) -> Vec<&Node> {
        matching_nodes(&self.nodes, self.filter_regex().as_ref())
    }

    pub fn filtered_pods(&self) -> Vec<&Pod> {
        matching_pods(&self.pods, self.filter_regex().as_ref())
    }

    /// Keep selections inside the visible rows, selecting the first row when
    /// a table gains rows and nothing was selected.
    pub fn clamp_selection(&mut self) {
        let node_rows = self.filtered_nodes().len();
        let pod_rows = self.filtered_pods().len();
        clamp(&mut self.node_state, node_rows);
        clamp(&mut self.pod_state, pod_rows);
    }

    pub fn selected_node_id(&self) -> Option<i64> {
        let idx = self.node_state.selected()?;
        self.filtered_nodes().get(idx).map(|n| n.id)
    }

    pub fn selected_pod_id(&self) -> Option<i64> {
        let idx = self.pod_state.selected()?;
        self.filtered_pods().get(idx).map(|p| p.id)
    }

    pub fn select_next(&mut self) {
        match self.focus {
            Pane::Nodes => {
                let len = self.filtered_nodes().len();
                step(&mut self.node_state, len, true);
            }
            Pane::Pods => {
                let len = self.filtered_pods().len();
                step(&mut self.pod_state, len, true);
            }
            Pane::Scale => {}
        }
    }

    pub fn select_previous(&mut self) {
        match self.focus {
            Pane::Nodes => {
                let len = self.filtered_nodes().len();
                step(&mut self.node_state, len, false);
            }
            Pane::Pods => {
                let len = self.filtered_pods().len();
                step(&mut self.pod_state, len, false);
            }
            Pane::Scale => {}
        }
    }

    pub fn open_form(&mut self, kind: FormKind) {
        self.form = Some(match kind {
            FormKind::Scale => InputForm::with_values(kind, self.scale_fields.clone()),
            _ => InputForm::new(kind),
        });
        self.mode = AppMode::Form;
    }

    /// Close the form and turn it into its action.
    pub fn submit_form(&mut self) -> Option<Action> {
        self.mode = AppMode::Normal;
        let form = self.form.take()?;
        if form.kind == FormKind::Scale {
            self.scale_fields = form.values.clone();
        }
        Some(form.into_action())
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.mode = AppMode::Normal;
    }

    pub fn show_message(&mut self, text: impl Into<String>) {
        self.message = Some(text.into());
        self.mode = AppMode::Message;
    }

    pub fn dismiss_message(&mut self) {
        self.message = None;
        self.mode = AppMode::Normal;
    }
}

pub fn matching_nodes<'a>(nodes: &'a [Node], re: Option<&Regex>) -> Vec<&'a Node> {
    nodes
        .iter()
        .filter(|n| {
            re.is_none_or(|re| {
                re.is_match(&n.name) || re.is_match(&n.status) || re.is_match(&n.kubelet_version)
            })
        })
        .collect()
}

pub fn matching_pods<'a>(pods: &'a [Pod], re: Option<&Regex>) -> Vec<&'a Pod> {
    pods.iter()
        .filter(|p| {
            re.is_none_or(|re| {
                re.is_match(&p.name) || re.is_match(&p.namespace) || re.is_match(&p.status)
            })
        })
        .collect()
}

fn clamp(state: &mut TableState, len: usize) {
    match state.selected() {
        _ if len == 0 => state.select(None),
        Some(i) if i >= len => state.select(Some(len - 1)),
        None => state.select(Some(0)),
        _ => {}
    }
}

fn step(state: &mut TableState, len: usize, forward: bool) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) if forward => {
            if i >= len - 1 {
                0
            } else {
                i + 1
            }
        }
        Some(i) => {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }
        None => 0,
    };
    state.select(Some(i));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, name: &str, status: &str) -> Node {
        Node {
            id,
            name: name.to_string(),
            status: status.to_string(),
            kubelet_version: "v1.29.2".to_string(),
        }
    }

    #[test]
    fn test_set_nodes_replaces_snapshot() {
        let mut app = App::new();
        app.set_nodes(vec![node(1, "a", "Ready"), node(2, "b", "Ready")]);
        app.set_nodes(vec![node(3, "c", "NotReady")]);
        assert_eq!(app.nodes.len(), 1);
        assert_eq!(app.selected_node_id(), Some(3));
        assert!(app.nodes_refreshed.is_some());
    }

    #[test]
    fn test_selection_clamped_after_shrink() {
        let mut app = App::new();
        app.set_nodes(vec![node(1, "a", "Ready"), node(2, "b", "Ready")]);
        app.select_next();
        assert_eq!(app.selected_node_id(), Some(2));
        app.set_nodes(vec![node(1, "a", "Ready")]);
        assert_eq!(app.selected_node_id(), Some(1));
        app.set_nodes(Vec::new());
        assert_eq!(app.selected_node_id(), None);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let mut app = App::new();
        app.set_nodes(vec![
            node(1, "aks-pool-0", "Ready"),
            node(2, "aks-pool-1", "NotReady"),
        ]);
        app.filter_pattern = "notready".to_string();
        let ids: Vec<i64> = app.filtered_nodes().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_invalid_filter_shows_everything() {
        let mut app = App::new();
        app.set_nodes(vec![node(1, "a", "Ready")]);
        app.filter_pattern = "(".to_string();
        assert_eq!(app.filtered_nodes().len(), 1);
    }

    #[test]
    fn test_selection_follows_filtered_rows() {
        let mut app = App::new();
        app.set_nodes(vec![node(1, "alpha", "Ready"), node(2, "beta", "Ready")]);
        app.filter_pattern = "beta".to_string();
        app.clamp_selection();
        assert_eq!(app.selected_node_id(), Some(2));
    }

    #[test]
    fn test_scale_form_remembers_fields() {
        let mut app = App::new();
        app.open_form(FormKind::Scale);
        for c in "frontend".chars() {
            app.form.as_mut().unwrap().push(c);
        }
        let action = app.submit_form().unwrap();
        assert!(matches!(action, Action::Autoscale(ref r) if r.deployment == "frontend"));
        assert_eq!(app.scale_fields[0], "frontend");

        app.open_form(FormKind::Scale);
        assert_eq!(app.form.as_ref().unwrap().values[0], "frontend");
    }

    #[test]
    fn test_pane_cycle() {
        assert_eq!(Pane::Nodes.next().next().next(), Pane::Nodes);
        assert_eq!(Pane::Nodes.previous(), Pane::Scale);
    }
}
