//! Dashboard state and the controller that owns it

use std::sync::{Arc, Weak};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::events::{events, EventBus};
use crate::model::{Dataset, Mode};
use crate::navigation::{DashboardSubscriber, Range, RangeSelector};
use crate::view::{compose, slice, ViewSeries};

/// State mutated by user interaction and the one-time load
#[derive(Debug, Clone)]
struct DashboardState {
    dataset: Option<Arc<Dataset>>,
    mode: Mode,
    selector: RangeSelector,
}

impl DashboardState {
    fn view_len(&self) -> usize {
        self.dataset
            .as_ref()
            .map(|d| d.view_len(self.mode))
            .unwrap_or(0)
    }
}

/// Snapshot handed to subscribers after every change
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardContext {
    pub mode: Mode,
    pub range: Range,
    /// Length of the composed view before slicing
    pub view_len: usize,
    /// Slider position of the start handle, in percent
    pub start_percent: f64,
    /// Slider position of the end handle, in percent
    pub end_percent: f64,
    pub loaded: bool,
}

/// Owns mode, range and dataset; derives views on demand.
///
/// Every mutation runs to completion under the state lock, then
/// subscribers and the event bus are notified with the lock released.
pub struct Dashboard {
    state: Arc<RwLock<DashboardState>>,
    subscribers: Arc<RwLock<Vec<Weak<dyn DashboardSubscriber>>>>,
    event_bus: Arc<EventBus>,
}

impl Dashboard {
    /// Create an empty dashboard in combined mode with a one-week window
    pub fn new() -> Self {
        Self::with_selector(RangeSelector::new())
    }

    /// Create an empty dashboard whose range resets to `window` hours
    pub fn with_window(window: usize) -> Self {
        Self::with_selector(RangeSelector::with_window(window))
    }

    fn with_selector(selector: RangeSelector) -> Self {
        let state = DashboardState {
            dataset: None,
            mode: Mode::default(),
            selector,
        };

        Self {
            state: Arc::new(RwLock::new(state)),
            subscribers: Arc::new(RwLock::new(Vec::new())),
            event_bus: Arc::new(EventBus::new()),
        }
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// Store the dataset. Only the first load is accepted; returns whether
    /// this call populated the store.
    pub fn load_dataset(&self, source_name: &str, dataset: Dataset) -> bool {
        let mut state = self.state.write();
        if state.dataset.is_some() {
            warn!(source = source_name, "dataset already loaded, ignoring reload");
            return false;
        }

        let solar_points = dataset.solar.len();
        let wind_points = dataset.wind.len();
        state.dataset = Some(Arc::new(dataset));
        let length = state.view_len();
        state.selector.reset(length);
        let range = state.selector.range();
        drop(state);

        info!(source = source_name, solar_points, wind_points, "dataset loaded");
        self.event_bus.publish(events::DatasetLoaded {
            source_name: source_name.to_string(),
            solar_points,
            wind_points,
        });
        self.event_bus.publish(events::RangeChanged { range });
        self.notify_subscribers();
        true
    }

    /// Record that loading failed; the dashboard keeps rendering empty views
    pub fn report_load_failure(&self, source_name: &str, error: &str) {
        self.event_bus.publish(events::DatasetLoadFailed {
            source_name: source_name.to_string(),
            error: error.to_string(),
        });
        self.notify_subscribers();
    }

    /// Switch display mode, resetting the range if the view length changes
    pub fn set_mode(&self, mode: Mode) {
        let mut state = self.state.write();
        let from = state.mode;
        if from == mode {
            return;
        }

        let old_len = state.view_len();
        state.mode = mode;
        let new_len = state.view_len();
        let reset = old_len != new_len;
        if reset {
            state.selector.reset(new_len);
        }
        let range = state.selector.range();
        drop(state);

        debug!(%from, to = %mode, old_len, new_len, "mode changed");
        self.event_bus.publish(events::ModeChanged { from, to: mode });
        if reset {
            self.event_bus.publish(events::RangeChanged { range });
        }
        self.notify_subscribers();
    }

    /// Drag the start handle
    pub fn set_start(&self, value: usize) {
        let mut state = self.state.write();
        state.selector.set_start(value);
        let range = state.selector.range();
        drop(state);

        self.event_bus.publish(events::RangeChanged { range });
        self.notify_subscribers();
    }

    /// Drag the end handle
    pub fn set_end(&self, value: usize) {
        let mut state = self.state.write();
        state.selector.set_end(value);
        let range = state.selector.range();
        drop(state);

        self.event_bus.publish(events::RangeChanged { range });
        self.notify_subscribers();
    }

    pub fn mode(&self) -> Mode {
        self.state.read().mode
    }

    pub fn range(&self) -> Range {
        self.state.read().selector.range()
    }

    pub fn is_loaded(&self) -> bool {
        self.state.read().dataset.is_some()
    }

    pub fn dataset(&self) -> Option<Arc<Dataset>> {
        self.state.read().dataset.clone()
    }

    /// Composed series for the current mode; empty before the load
    pub fn view(&self) -> ViewSeries {
        let state = self.state.read();
        match &state.dataset {
            Some(dataset) => compose(&dataset.solar, &dataset.wind, state.mode),
            None => ViewSeries::empty(state.mode),
        }
    }

    /// Composed series cut down to the current range
    pub fn visible(&self) -> ViewSeries {
        let range = self.range();
        slice(&self.view(), range)
    }

    /// Get current dashboard context
    pub fn context(&self) -> DashboardContext {
        let state = self.state.read();
        let view_len = state.view_len();
        let (start_percent, end_percent) = state.selector.positions(view_len);
        DashboardContext {
            mode: state.mode,
            range: state.selector.range(),
            view_len,
            start_percent,
            end_percent,
            loaded: state.dataset.is_some(),
        }
    }

    /// Add a subscriber; it is dropped once the caller releases it
    pub fn add_subscriber(&self, subscriber: Arc<dyn DashboardSubscriber>) {
        self.subscribers.write().push(Arc::downgrade(&subscriber));
    }

    fn notify_subscribers(&self) {
        let context = self.context();
        let live: Vec<Arc<dyn DashboardSubscriber>> = {
            let mut subscribers = self.subscribers.write();

            // Remove any dead weak references
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        // Called without the lock; subscribers may call back into the dashboard
        for subscriber in live {
            subscriber.on_dashboard_change(&context);
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use crate::events::handler_from_fn;
    use crate::model::TimePoint;

    fn series(len: usize) -> Vec<TimePoint> {
        (0..len)
            .map(|i| TimePoint::new(format!("{}", i), i as f64, i as f64 + 1.0, 0.0))
            .collect()
    }

    fn loaded(solar: usize, wind: usize) -> Dashboard {
        let dashboard = Dashboard::new();
        assert!(dashboard.load_dataset("test", Dataset::new(series(solar), series(wind))));
        dashboard
    }

    #[derive(Default)]
    struct Recorder {
        contexts: Mutex<Vec<DashboardContext>>,
    }

    impl DashboardSubscriber for Recorder {
        fn on_dashboard_change(&self, context: &DashboardContext) {
            self.contexts.lock().push(context.clone());
        }
    }

    #[test]
    fn test_empty_dashboard_renders_nothing() {
        let dashboard = Dashboard::new();
        assert!(!dashboard.is_loaded());
        assert_eq!(dashboard.mode(), Mode::Combined);
        assert!(dashboard.view().is_empty());
        assert!(dashboard.visible().is_empty());

        dashboard.set_start(10);
        dashboard.set_end(3);
        assert!(dashboard.visible().is_empty());
        assert!(dashboard.range().start < dashboard.range().end);
    }

    #[test]
    fn test_load_resets_range_to_one_week() {
        let dashboard = loaded(200, 150);
        assert_eq!(dashboard.range(), Range::new(0, 168));
        assert_eq!(dashboard.view().len(), 200);
        assert_eq!(dashboard.visible().len(), 169);
    }

    #[test]
    fn test_second_load_is_ignored() {
        let dashboard = loaded(10, 10);
        assert!(!dashboard.load_dataset("again", Dataset::new(series(3), series(3))));
        assert_eq!(dashboard.dataset().unwrap().solar.len(), 10);
    }

    #[test]
    fn test_mode_switch_resets_range_when_length_changes() {
        let dashboard = loaded(200, 150);
        dashboard.set_mode(Mode::Solar);
        dashboard.set_end(199);
        dashboard.set_start(100);
        // Solar and combined share a length
        assert_eq!(dashboard.range(), Range::new(100, 199));

        dashboard.set_mode(Mode::Wind);
        assert_eq!(dashboard.range(), Range::new(0, 149));
        assert_eq!(dashboard.visible().len(), 150);
    }

    #[test]
    fn test_mode_switch_keeps_range_when_length_matches() {
        let dashboard = loaded(200, 150);
        dashboard.set_start(20);
        dashboard.set_mode(Mode::Solar);
        assert_eq!(dashboard.range(), Range::new(20, 168));
    }

    #[test]
    fn test_handle_clamping_through_controller() {
        let dashboard = loaded(200, 150);
        dashboard.set_start(170);
        assert_eq!(dashboard.range(), Range::new(167, 168));

        dashboard.set_start(50);
        dashboard.set_end(0);
        assert_eq!(dashboard.range(), Range::new(50, 51));
        assert_eq!(dashboard.visible().len(), 2);
    }

    #[test]
    fn test_views_are_recomputed_deterministically() {
        let dashboard = loaded(40, 25);
        dashboard.set_start(5);
        assert_eq!(dashboard.view(), dashboard.view());
        assert_eq!(dashboard.visible(), dashboard.visible());
    }

    #[test]
    fn test_context_reports_handle_positions() {
        let dashboard = loaded(169, 10);
        let context = dashboard.context();
        assert!(context.loaded);
        assert_eq!(context.view_len, 169);
        assert_eq!(context.start_percent, 0.0);
        assert_eq!(context.end_percent, 100.0);
    }

    #[test]
    fn test_subscribers_notified_and_pruned() {
        let dashboard = Dashboard::new();
        let recorder = Arc::new(Recorder::default());
        dashboard.add_subscriber(recorder.clone());

        dashboard.load_dataset("test", Dataset::new(series(30), series(30)));
        dashboard.set_mode(Mode::Wind);
        dashboard.set_end(10);

        let contexts = recorder.contexts.lock().clone();
        assert_eq!(contexts.len(), 3);
        assert_eq!(contexts[1].mode, Mode::Wind);
        assert_eq!(contexts[2].range, Range::new(0, 10));

        drop(contexts);
        drop(recorder);
        dashboard.set_start(2);
        assert!(dashboard.subscribers.read().is_empty());
    }

    /// Pulls the end handle back whenever it lies past `limit`
    struct EndLimiter {
        dashboard: Weak<Dashboard>,
        limit: usize,
        calls: Mutex<usize>,
    }

    impl DashboardSubscriber for EndLimiter {
        fn on_dashboard_change(&self, context: &DashboardContext) {
            *self.calls.lock() += 1;
            if context.range.end > self.limit {
                if let Some(dashboard) = self.dashboard.upgrade() {
                    dashboard.set_end(self.limit);
                }
            }
        }
    }

    #[test]
    fn test_subscriber_can_move_handle() {
        let dashboard = Arc::new(Dashboard::new());
        let limiter = Arc::new(EndLimiter {
            dashboard: Arc::downgrade(&dashboard),
            limit: 100,
            calls: Mutex::new(0),
        });
        dashboard.add_subscriber(limiter.clone());

        dashboard.load_dataset("test", Dataset::new(series(200), series(200)));

        assert_eq!(dashboard.range(), Range::new(0, 100));
        // Load notification plus the one from the nested set_end
        assert_eq!(*limiter.calls.lock(), 2);
    }

    #[test]
    fn test_event_handler_can_use_dashboard() {
        let dashboard = Arc::new(Dashboard::new());
        let weak = Arc::downgrade(&dashboard);
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        dashboard
            .event_bus()
            .subscribe::<events::ModeChanged>(handler_from_fn(move |_| {
                if let Some(dashboard) = weak.upgrade() {
                    dashboard.set_start(3);
                    *sink.lock() = Some(dashboard.range());
                }
            }));

        dashboard.load_dataset("test", Dataset::new(series(50), series(50)));
        dashboard.set_mode(Mode::Solar);

        assert_eq!(*seen.lock(), Some(Range::new(3, 49)));
    }

    #[test]
    fn test_events_published() {
        let dashboard = Dashboard::new();
        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = failures.clone();
        dashboard
            .event_bus()
            .subscribe::<events::DatasetLoadFailed>(handler_from_fn(move |event| {
                if let Some(failed) = event.as_any().downcast_ref::<events::DatasetLoadFailed>() {
                    sink.lock().push(failed.error.clone());
                }
            }));

        dashboard.report_load_failure("feed.json", "connection refused");
        assert_eq!(*failures.lock(), vec!["connection refused".to_string()]);
        assert!(!dashboard.is_loaded());
    }
}
