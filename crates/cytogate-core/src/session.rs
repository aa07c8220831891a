//! Owned view/selection state for one window.
//!
//! The session never calls a backend itself. Operations that need one return
//! a job; the caller runs it (inline or on a worker) and hands the response
//! back through the matching `apply_*` method. Each job carries a token, and
//! a response whose token no longer matches is dropped.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dataset::{ChannelPair, Dataset};
use crate::error::Result;
use crate::geom::{Point, ScreenPoint};
use crate::render::{build_scene, FrameInput, Scene};
use crate::selection::{
    build_request, Classification, ClassificationRequest, FilterIntersection, FilterStore,
    GestureEvent, LassoCapture, PointerButton,
};
use crate::view::{AxisMapper, AxisScale, DataBounds, PlotRect, ViewState, ZoomDirection};

/// Tags a points or classification request. `context` changes with every
/// dataset load, `sequence` with every request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestToken {
    pub context: u64,
    pub sequence: u64,
}

#[derive(Clone, Debug)]
pub struct PointsJob {
    pub token: RequestToken,
    pub pair: ChannelPair,
}

#[derive(Clone, Debug)]
pub struct ClassificationJob {
    pub token: RequestToken,
    pub request: ClassificationRequest,
}

/// Intersection request, tagged with the filter revision it was built from.
#[derive(Clone, Debug)]
pub struct IntersectionJob {
    pub revision: u64,
    pub slots: Vec<Vec<usize>>,
}

/// What happened to a response handed back to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Superseded by a newer request; ignored.
    Stale,
    /// The call failed; previous state kept.
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// User-facing message produced by a session operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Self::Info(s) | Self::Warning(s) => s,
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionSummary {
    pub selected: usize,
    pub total: usize,
    pub percent: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterSummary {
    pub filters: usize,
    pub total: usize,
    pub passing: usize,
    pub percent: f64,
    pub excluded: usize,
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

pub struct Session {
    dataset: Option<Arc<Dataset>>,
    context: u64,
    sequence: u64,

    channel_selection: Vec<String>,
    pair: Option<ChannelPair>,
    pending_points: Option<RequestToken>,
    points: Vec<Point>,
    bounds: DataBounds,

    view: ViewState,
    plot: PlotRect,
    lasso: LassoCapture,

    selection: Vec<usize>,
    pending_classification: Option<RequestToken>,

    filters: FilterStore,
    intersection: FilterIntersection,
    summary_suppressed: bool,
    show_excluded: bool,
    excluded: Vec<bool>,

    notices: Vec<Notice>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            dataset: None,
            context: 0,
            sequence: 0,
            channel_selection: Vec::new(),
            pair: None,
            pending_points: None,
            points: Vec::new(),
            bounds: DataBounds::default(),
            view: ViewState::default(),
            plot: PlotRect::from_canvas(0.0, 0.0),
            lasso: LassoCapture::new(),
            selection: Vec::new(),
            pending_classification: None,
            filters: FilterStore::new(),
            intersection: FilterIntersection::Inactive,
            summary_suppressed: false,
            show_excluded: false,
            excluded: Vec::new(),
            notices: Vec::new(),
        }
    }

    // -- accessors ---------------------------------------------------------

    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        self.dataset.as_ref()
    }

    pub fn pair(&self) -> Option<&ChannelPair> {
        self.pair.as_ref()
    }

    pub fn channel_selection(&self) -> &[String] {
        &self.channel_selection
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn bounds(&self) -> &DataBounds {
        &self.bounds
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn plot(&self) -> PlotRect {
        self.plot
    }

    pub fn lasso(&self) -> &LassoCapture {
        &self.lasso
    }

    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    pub fn filters(&self) -> &FilterStore {
        &self.filters
    }

    pub fn intersection(&self) -> &FilterIntersection {
        &self.intersection
    }

    pub fn show_excluded(&self) -> bool {
        self.show_excluded
    }

    /// `mask[i]` is true when event `i` fails the combined filter. Empty while
    /// the overlay is off.
    pub fn excluded_mask(&self) -> &[bool] {
        &self.excluded
    }

    pub fn is_waiting(&self) -> bool {
        self.pending_points.is_some() || self.pending_classification.is_some()
    }

    /// Messages produced since the last call.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");
        self.notices.push(Notice::Info(message));
    }

    fn warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.notices.push(Notice::Warning(message));
    }

    fn next_token(&mut self) -> RequestToken {
        self.sequence += 1;
        RequestToken {
            context: self.context,
            sequence: self.sequence,
        }
    }

    pub fn mapper(&self) -> Option<AxisMapper> {
        AxisMapper::new(&self.bounds, &self.view, self.plot)
    }

    // -- dataset and channel pair -----------------------------------------

    /// Install a freshly loaded dataset. Saved filters belong to the previous
    /// dataset and are dropped. Returns the fetch for the first two channels.
    pub fn load_dataset(&mut self, dataset: Dataset) -> Option<PointsJob> {
        self.context += 1;
        self.filters.load_new_dataset();
        self.intersection = FilterIntersection::Inactive;
        self.summary_suppressed = false;
        self.pair = None;
        self.pending_points = None;
        self.pending_classification = None;
        self.points.clear();
        self.bounds = DataBounds::default();
        self.view = ViewState::default();
        self.lasso.cancel();
        self.selection.clear();
        self.excluded.clear();
        self.show_excluded = false;

        let default_pair = dataset.default_pair();
        self.info(format!(
            "Loaded {} ({} events, {} channels)",
            dataset.path().display(),
            dataset.event_count(),
            dataset.channel_count()
        ));
        self.dataset = Some(Arc::new(dataset));

        self.channel_selection = default_pair
            .as_ref()
            .map(|p| vec![p.x.clone(), p.y.clone()])
            .unwrap_or_default();
        default_pair.map(|pair| self.request_pair(pair))
    }

    /// Toggle a channel in the two-slot channel picker.
    ///
    /// Clicking a selected channel removes it. A third channel pushes out the
    /// oldest one. Once two channels are picked, returns the points fetch.
    pub fn select_channel(&mut self, channel: &str) -> Option<PointsJob> {
        let known = self
            .dataset
            .as_ref()
            .is_some_and(|d| d.channel_index(channel).is_some());
        if !known {
            self.warning(format!("Unknown channel {channel}"));
            return None;
        }

        if let Some(pos) = self.channel_selection.iter().position(|c| c == channel) {
            self.channel_selection.remove(pos);
            return None;
        }
        if self.channel_selection.len() >= 2 {
            self.channel_selection.remove(0);
        }
        self.channel_selection.push(channel.to_string());

        match self.channel_selection.as_slice() {
            [x, y] => {
                let pair = ChannelPair::new(x.clone(), y.clone());
                Some(self.request_pair(pair))
            }
            _ => None,
        }
    }

    /// Start switching the plot to `pair`. Any outstanding classification is
    /// for the old pair and is invalidated.
    pub fn request_pair(&mut self, pair: ChannelPair) -> PointsJob {
        let token = self.next_token();
        self.pending_points = Some(token);
        self.pending_classification = None;
        debug!(pair = %pair, sequence = token.sequence, "Requesting points");
        PointsJob { token, pair }
    }

    pub fn apply_points(
        &mut self,
        token: RequestToken,
        pair: ChannelPair,
        result: Result<Vec<Point>>,
    ) -> Outcome {
        if self.pending_points != Some(token) {
            debug!(pair = %pair, sequence = token.sequence, "Discarding stale points");
            return Outcome::Stale;
        }
        self.pending_points = None;

        let points = match result {
            Ok(points) => points,
            Err(e) => {
                self.warning(format!("Failed to load points for {pair}: {e}"));
                return Outcome::Failed;
            }
        };

        self.points = points;
        self.view.reset();
        self.recompute_bounds();
        self.lasso.cancel();
        self.pending_classification = None;

        self.selection = match self.filters.get(&pair) {
            Some(saved) => {
                let saved = saved.to_vec();
                self.warning(format!(
                    "{pair} already has a filter ({} events); showing it as the current selection",
                    saved.len()
                ));
                saved
            }
            None => Vec::new(),
        };
        self.pair = Some(pair);
        self.recompute_excluded();
        Outcome::Applied
    }

    /// Apply points synchronously, for callers without a worker.
    pub fn set_points(&mut self, pair: ChannelPair, points: Vec<Point>) -> Outcome {
        let job = self.request_pair(pair);
        self.apply_points(job.token, job.pair, Ok(points))
    }

    fn recompute_bounds(&mut self) {
        self.bounds = DataBounds::compute(&self.points, self.view.x_scale, self.view.y_scale);
    }

    // -- pointer input -----------------------------------------------------

    /// A new lasso supersedes any classification still in flight; a pan
    /// leaves it pending.
    pub fn pointer_pressed(&mut self, button: PointerButton, pos: ScreenPoint) {
        let started = matches!(self.lasso.press(button, pos), GestureEvent::Started);
        if started && self.lasso.is_drawing() {
            self.pending_classification = None;
        }
    }

    pub fn pointer_moved(&mut self, pos: ScreenPoint) {
        if let GestureEvent::PanBy(delta) = self.lasso.move_to(pos) {
            self.view.pan_by(&self.bounds, self.plot, delta);
        }
    }

    /// Finish the current gesture. A completed lasso yields a classification
    /// job unless it has fewer than three usable vertices, in which case the
    /// selection is simply cleared.
    pub fn pointer_released(&mut self, button: PointerButton) -> Option<ClassificationJob> {
        match self.lasso.release(button) {
            GestureEvent::Completed(path) => {
                let mapper = self.mapper()?;
                match build_request(&path, &mapper, &self.points) {
                    Some(request) => {
                        let token = self.next_token();
                        self.pending_classification = Some(token);
                        Some(ClassificationJob { token, request })
                    }
                    None => {
                        self.selection.clear();
                        self.pending_classification = None;
                        None
                    }
                }
            }
            GestureEvent::Discarded => {
                self.selection.clear();
                self.pending_classification = None;
                None
            }
            _ => None,
        }
    }

    pub fn apply_classification(
        &mut self,
        token: RequestToken,
        result: Result<Classification>,
    ) -> Outcome {
        if self.pending_classification != Some(token) {
            debug!(sequence = token.sequence, "Discarding stale classification");
            return Outcome::Stale;
        }
        self.pending_classification = None;

        match result {
            Ok(classification) => {
                self.selection = classification.indices;
                let summary = self.selection_summary();
                self.info(format!(
                    "Selected {} of {} events ({:.1}%)",
                    summary.selected, summary.total, summary.percent
                ));
                Outcome::Applied
            }
            Err(e) => {
                self.warning(format!("Selection failed, keeping previous selection: {e}"));
                Outcome::Failed
            }
        }
    }

    // -- filters -----------------------------------------------------------

    /// Save the current selection as the active pair's filter.
    pub fn confirm_selection(&mut self) -> Option<IntersectionJob> {
        let Some(pair) = self.pair.clone() else {
            self.warning("Select two channels before confirming a selection");
            return None;
        };
        if self.selection.is_empty() {
            self.warning("Nothing selected; draw a region first");
            return None;
        }
        let saved = std::mem::take(&mut self.selection);
        let count = saved.len();
        self.filters.save_selection(&pair, saved);
        self.lasso.clear_outline();
        self.info(format!(
            "Saved filter for {pair} ({count} events, {} filter(s) active)",
            self.filters.len()
        ));
        self.intersection_job()
    }

    /// Drop the lasso and the unsaved selection.
    pub fn clear_selection(&mut self) {
        self.lasso.cancel();
        self.selection.clear();
        self.pending_classification = None;
    }

    /// Remove the active pair's saved filter.
    pub fn reset_filter(&mut self) -> Option<IntersectionJob> {
        let pair = self.pair.clone()?;
        if !self.filters.clear_selection(&pair) {
            self.warning(format!("No filter saved for {pair}"));
            return None;
        }
        self.clear_selection();
        self.info(format!("Removed filter for {pair}"));
        self.intersection_job()
    }

    /// Intersection request for the current filters. With no filters the
    /// result is known locally (everything passes) and no job is needed.
    pub fn intersection_job(&mut self) -> Option<IntersectionJob> {
        if self.filters.is_empty() {
            self.intersection = FilterIntersection::Inactive;
            self.summary_suppressed = false;
            self.recompute_excluded();
            return None;
        }
        Some(IntersectionJob {
            revision: self.filters.revision(),
            slots: self.filters.slot_indices(),
        })
    }

    pub fn apply_intersection(&mut self, revision: u64, result: Result<Vec<usize>>) -> Outcome {
        if revision != self.filters.revision() {
            debug!(
                revision,
                current = self.filters.revision(),
                "Discarding stale intersection"
            );
            return Outcome::Stale;
        }
        match result {
            Ok(indices) => {
                self.intersection = FilterIntersection::Active(indices);
                self.summary_suppressed = false;
                self.recompute_excluded();
                Outcome::Applied
            }
            Err(e) => {
                self.summary_suppressed = true;
                self.warning(format!("Could not combine filters: {e}"));
                Outcome::Failed
            }
        }
    }

    pub fn set_show_excluded(&mut self, show: bool) {
        self.show_excluded = show;
        self.recompute_excluded();
    }

    fn recompute_excluded(&mut self) {
        self.excluded.clear();
        if !self.show_excluded {
            return;
        }
        match &self.intersection {
            FilterIntersection::Inactive => self.excluded.resize(self.points.len(), false),
            FilterIntersection::Active(passing) => {
                self.excluded.resize(self.points.len(), true);
                for &i in passing {
                    if let Some(flag) = self.excluded.get_mut(i) {
                        *flag = false;
                    }
                }
            }
        }
    }

    // -- view --------------------------------------------------------------

    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.plot = PlotRect::from_canvas(width, height);
    }

    /// Flip one axis between linear and log. The view and any lasso reset;
    /// the selection indices are scale independent and stay.
    pub fn toggle_scale(&mut self, axis: Axis) {
        match axis {
            Axis::X => self.view.x_scale = self.view.x_scale.toggled(),
            Axis::Y => self.view.y_scale = self.view.y_scale.toggled(),
        }
        self.view.reset();
        self.recompute_bounds();
        self.lasso.cancel();
        self.pending_classification = None;
        if self.pair.is_some() && !self.bounds.is_valid() {
            self.warning("No positive values to show on a log axis");
        }
    }

    pub fn set_scale(&mut self, axis: Axis, scale: AxisScale) {
        let current = match axis {
            Axis::X => self.view.x_scale,
            Axis::Y => self.view.y_scale,
        };
        if current != scale {
            self.toggle_scale(axis);
        }
    }

    pub fn zoom_at(&mut self, pos: ScreenPoint, direction: ZoomDirection) -> bool {
        self.view.zoom_at(&self.bounds, self.plot, pos, direction)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.view.zoom_step(ZoomDirection::In)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.view.zoom_step(ZoomDirection::Out)
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
        self.lasso.clear_outline();
    }

    // -- summaries and export ---------------------------------------------

    pub fn selection_summary(&self) -> SelectionSummary {
        let total = self.points.len();
        SelectionSummary {
            selected: self.selection.len(),
            total,
            percent: percent(self.selection.len(), total),
        }
    }

    /// `None` while no dataset is loaded or after the last intersection failed.
    pub fn filter_summary(&self) -> Option<FilterSummary> {
        let dataset = self.dataset.as_ref()?;
        if self.summary_suppressed {
            return None;
        }
        let total = dataset.event_count();
        let passing = match &self.intersection {
            FilterIntersection::Inactive => total,
            FilterIntersection::Active(v) => v.len(),
        };
        Some(FilterSummary {
            filters: self.filters.len(),
            total,
            passing,
            percent: percent(passing, total),
            excluded: total.saturating_sub(passing),
        })
    }

    /// Events to export: the combined filter when any filter is saved,
    /// otherwise the current selection.
    pub fn export_indices(&mut self) -> Option<Vec<usize>> {
        if self.dataset.is_none() {
            self.warning("No dataset loaded");
            return None;
        }
        match self.filters.intersection() {
            FilterIntersection::Active(indices) if indices.is_empty() => {
                self.warning("No events pass all filters; nothing to export");
                None
            }
            FilterIntersection::Active(indices) => Some(indices),
            FilterIntersection::Inactive if !self.selection.is_empty() => {
                Some(self.selection.clone())
            }
            FilterIntersection::Inactive => {
                self.warning("No filter or selection to export");
                None
            }
        }
    }

    /// Draw commands for the current frame.
    pub fn render(&self) -> Scene {
        let mapper = self.mapper();
        build_scene(&FrameInput {
            mapper: mapper.as_ref(),
            plot: self.plot,
            zoom: self.view.zoom,
            points: &self.points,
            excluded: self.show_excluded.then_some(self.excluded.as_slice()),
            selected: &self.selection,
            lasso: self.lasso.visible_path(),
        })
    }
}
