//! Application state and navigation logic.

use anyhow::Result;
use tokio::sync::watch;

use crate::data::workflow::stage_reveal_delay;
use crate::data::{CheckState, History, NotificationId, WorkflowGraph};
use crate::driver::DriverHandle;
use crate::engine::EngineSnapshot;
use crate::random::RandomSource;
use crate::ui::Theme;

/// Commands the dashboard can issue to whatever drives the engine.
///
/// Implemented by [`DriverHandle`]; tests substitute a recording stub.
pub trait EngineControl {
    /// Receiver that is marked changed after every engine mutation.
    fn subscribe(&self) -> watch::Receiver<EngineSnapshot>;

    /// Pause or resume ticking. Returns true if now paused.
    fn toggle_pause(&self) -> bool;

    /// Dismiss a notification; false if it was already gone.
    fn dismiss(&self, id: NotificationId) -> bool;

    /// Begin auto-fixing a quality check; false if nothing to fix.
    fn start_fix(&self, index: usize) -> bool;

    /// Connection map used for highlighting.
    fn workflow(&self) -> WorkflowGraph;
}

impl<R: RandomSource + 'static> EngineControl for DriverHandle<R> {
    fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
        DriverHandle::subscribe(self)
    }

    fn toggle_pause(&self) -> bool {
        DriverHandle::toggle_pause(self)
    }

    fn dismiss(&self, id: NotificationId) -> bool {
        DriverHandle::dismiss(self, id)
    }

    fn start_fix(&self, index: usize) -> bool {
        DriverHandle::start_fix(self, index)
    }

    fn workflow(&self) -> WorkflowGraph {
        self.with_engine(|engine| engine.workflow().clone())
    }
}

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Metrics table and health indicators.
    Overview,
    /// Agent statuses and workflow connections.
    Agents,
    /// Agent communication feed.
    Feed,
    /// Quality checks and uploads.
    Quality,
}

impl View {
    pub const ALL: [View; 4] = [View::Overview, View::Agents, View::Feed, View::Quality];

    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Agents,
            View::Agents => View::Feed,
            View::Feed => View::Quality,
            View::Quality => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Overview => View::Quality,
            View::Agents => View::Overview,
            View::Feed => View::Agents,
            View::Quality => View::Feed,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Agents => "Agents",
            View::Feed => "Feed",
            View::Quality => "Quality",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            View::Overview => 0,
            View::Agents => 1,
            View::Feed => 2,
            View::Quality => 3,
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Engine
    control: Box<dyn EngineControl>,
    receiver: watch::Receiver<EngineSnapshot>,
    initial_returned: bool,
    pub data: Option<EngineSnapshot>,
    pub history: History,
    last_recorded_tick: Option<u64>,
    pub workflow: WorkflowGraph,

    // Navigation state
    pub selected_metric_index: usize,
    pub selected_agent_index: usize,
    pub selected_check_index: usize,
    pub feed_offset: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, std::time::Instant)>,

    started_at: std::time::Instant,
}

impl App {
    /// Create a new App driven by `control`.
    pub fn new(control: Box<dyn EngineControl>, theme: Theme) -> Self {
        let receiver = control.subscribe();
        let workflow = control.workflow();
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            show_detail_overlay: false,
            control,
            receiver,
            initial_returned: false,
            data: None,
            history: History::new(),
            last_recorded_tick: None,
            workflow,
            selected_metric_index: 0,
            selected_agent_index: 0,
            selected_check_index: 0,
            feed_offset: 0,
            theme,
            status_message: None,
            started_at: std::time::Instant::now(),
        }
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, std::time::Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Pull the latest snapshot if the engine changed since the last poll.
    ///
    /// Returns true if new data was received. History is recorded once per
    /// fast tick, not on every notification change.
    pub fn poll_snapshot(&mut self) -> bool {
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        if !self.receiver.has_changed().unwrap_or(false) {
            return false;
        }

        let snapshot = self.receiver.borrow_and_update().clone();
        if self.last_recorded_tick != Some(snapshot.tick_count) {
            self.history.record(&snapshot.metrics);
            self.last_recorded_tick = Some(snapshot.tick_count);
        }

        self.clamp_selection(&snapshot);
        self.data = Some(snapshot);
        true
    }

    fn clamp_selection(&mut self, snapshot: &EngineSnapshot) {
        let clamp = |index: usize, len: usize| index.min(len.saturating_sub(1));
        self.selected_metric_index = clamp(self.selected_metric_index, snapshot.metrics.len());
        self.selected_agent_index = clamp(self.selected_agent_index, snapshot.agents.len());
        self.selected_check_index =
            clamp(self.selected_check_index, snapshot.quality_checks.len());
        self.feed_offset = clamp(self.feed_offset, snapshot.feed.len());
    }

    /// Agents rows appear one by one when the dashboard opens.
    pub fn stage_revealed(&self, index: usize) -> bool {
        self.started_at.elapsed() >= stage_reveal_delay(index)
    }

    /// Whether the engine reports ticking as suspended.
    pub fn is_paused(&self) -> bool {
        self.data.as_ref().is_some_and(|d| d.paused)
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    fn list_len(&self) -> usize {
        let Some(ref data) = self.data else {
            return 0;
        };
        match self.current_view {
            View::Overview => data.metrics.len(),
            View::Agents => data.agents.len(),
            View::Feed => data.feed.len(),
            View::Quality => data.quality_checks.len(),
        }
    }

    fn selection_mut(&mut self) -> &mut usize {
        match self.current_view {
            View::Overview => &mut self.selected_metric_index,
            View::Agents => &mut self.selected_agent_index,
            View::Feed => &mut self.feed_offset,
            View::Quality => &mut self.selected_check_index,
        }
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.list_len().saturating_sub(1);
        let selection = self.selection_mut();
        *selection = (*selection + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        let selection = self.selection_mut();
        *selection = selection.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        *self.selection_mut() = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        let last = self.list_len().saturating_sub(1);
        *self.selection_mut() = last;
    }

    /// Name of the agent under the cursor in the Agents view.
    pub fn selected_agent(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .agents
            .get(self.selected_agent_index)
            .map(|a| a.id.as_str())
    }

    /// Agents downstream of the selected agent in the workflow map.
    pub fn connected_agents(&self) -> Vec<String> {
        let (Some(agent), Some(data)) = (self.selected_agent(), self.data.as_ref()) else {
            return Vec::new();
        };
        let known: Vec<String> = data.agents.iter().map(|a| a.id.clone()).collect();
        self.workflow
            .connections_of(agent, &known)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Open the detail overlay for the selected agent.
    pub fn enter_detail(&mut self) {
        if self.current_view == View::Agents && self.selected_agent().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close overlay first, then return to Overview.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        self.current_view = View::Overview;
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Pause or resume real-time updates.
    pub fn toggle_pause(&mut self) {
        let paused = self.control.toggle_pause();
        let message = if paused {
            "Real-time updates paused"
        } else {
            "Real-time updates resumed"
        };
        self.set_status_message(message.to_string());
    }

    /// Dismiss the most recent notification, if any.
    pub fn dismiss_newest(&mut self) -> bool {
        let Some(id) = self
            .data
            .as_ref()
            .and_then(|d| d.notifications.last())
            .map(|n| n.id)
        else {
            return false;
        };
        self.control.dismiss(id)
    }

    /// Start an auto-fix on the selected quality check.
    pub fn fix_selected(&mut self) {
        let Some(check) = self
            .data
            .as_ref()
            .and_then(|d| d.quality_checks.get(self.selected_check_index))
        else {
            return;
        };

        let name = check.name.clone();
        let fixable = matches!(check.state, CheckState::Critical | CheckState::Warning);
        if fixable && self.control.start_fix(self.selected_check_index) {
            self.set_status_message(format!("Fixing: {}", name));
        } else {
            self.set_status_message(format!("Nothing to fix: {}", name));
        }
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &std::path::Path) -> Result<()> {
        let Some(ref data) = self.data else {
            anyhow::bail!("No data to export");
        };
        write_snapshot(data, path)
    }
}

/// Write a snapshot as pretty-printed JSON.
pub fn write_snapshot(snapshot: &EngineSnapshot, path: &std::path::Path) -> Result<()> {
    use std::io::Write;

    let json = serde_json::to_string_pretty(snapshot)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}
