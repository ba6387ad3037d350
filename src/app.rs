//! Gallery session controller.
//!
//! Owns every state object, routes input through the mode machine and
//! executes the resulting actions against the API client and history. All
//! mutation is synchronous; the only suspension points are transport calls
//! and the resize quiet period.

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::api::{GalleryClient, Transport};
use crate::config::Config;
use crate::error::{GalleryError, Result};
use crate::format::{path_crumbs, PathCrumb};
use crate::history::{History, Location, SessionHistory};
use crate::layout::JustifiedLayout;
use crate::models::{MediaCollection, MediaQuery, MediaRecord, MediaType, Row, RowModel};
use crate::state::{FilterState, GestureRecognizer, SelectionState, TagState};
use crate::ui::{
    frame_bounds, Action, FrameBounds, InfoPanel, InfoSection, InputEvent, InteractionMode,
    LightboxNavigator, MediaTarget, ModeMachine, Presentation, ResizeDebouncer,
};

const NO_MEDIA: &str = "No images found.";
const LOAD_FAILED: &str = "Error loading images.";

/// What the grid area currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryView {
    Grid(Vec<RowModel>),
    /// The query matched nothing.
    Empty,
    /// The last media fetch failed; any filter action retries.
    Failed(String),
}

impl GalleryView {
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Grid(_) => None,
            Self::Empty => Some(NO_MEDIA),
            Self::Failed(msg) => Some(msg),
        }
    }
}

/// Rename prompt opened from tag edit mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPrompt {
    pub tag: String,
    pub input: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptState {
    /// Add-tags input; survives closing and reopening the prompt.
    pub input: String,
    pub edit: Option<EditPrompt>,
    /// Inline error of the last failed submission.
    pub error: Option<String>,
}

/// A fetch that has been started and is waiting for its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub seq: u64,
    pub query: MediaQuery,
    pub push_state: bool,
}

pub struct GalleryApp<T, H> {
    client: GalleryClient<T>,
    history: H,
    layout: JustifiedLayout,

    collection: MediaCollection,
    filter: FilterState,
    current_path: Option<String>,
    selection: SelectionState,
    gestures: GestureRecognizer,
    modes: ModeMachine,

    lightbox: LightboxNavigator,
    presentation: Option<Presentation>,
    info_panel: InfoPanel,
    info_tags: Vec<String>,

    resize: ResizeDebouncer,
    window_height: f64,
    scroll_offset: f64,

    rows: Vec<Row>,
    view: GalleryView,
    all_tags: Vec<String>,
    prompt: PromptState,
    toasts: Vec<String>,
    load_seq: u64,
}

impl<T: Transport, H: History> GalleryApp<T, H> {
    pub fn new(config: &Config, transport: T, history: H, window: (f64, f64)) -> Self {
        Self {
            client: GalleryClient::new(transport, config.server_url.clone()),
            history,
            layout: config.layout(),
            collection: MediaCollection::new(),
            filter: FilterState::new(),
            current_path: None,
            selection: SelectionState::new(),
            gestures: GestureRecognizer::new(config.long_press()),
            modes: ModeMachine::new(),
            lightbox: LightboxNavigator::new(config.server_url.clone()),
            presentation: None,
            info_panel: InfoPanel::new(config.info_panel_width),
            info_tags: Vec::new(),
            resize: ResizeDebouncer::new(config.resize_debounce(), window.0),
            window_height: window.1,
            scroll_offset: 0.0,
            rows: Vec::new(),
            view: GalleryView::Empty,
            all_tags: Vec::new(),
            prompt: PromptState::default(),
            toasts: Vec::new(),
            load_seq: 0,
        }
    }

    // Read side

    pub fn view(&self) -> &GalleryView {
        &self.view
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn collection(&self) -> &MediaCollection {
        &self.collection
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn modes(&self) -> &ModeMachine {
        &self.modes
    }

    pub fn mode(&self) -> InteractionMode {
        self.modes.mode()
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn client(&self) -> &GalleryClient<T> {
        &self.client
    }

    pub fn prompt(&self) -> &PromptState {
        &self.prompt
    }

    /// Item shown in the lightbox, if it is open.
    pub fn presentation(&self) -> Option<&Presentation> {
        self.presentation.as_ref()
    }

    pub fn info_panel(&self) -> &InfoPanel {
        &self.info_panel
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Every known tag with its filter state, for the tag sidebar.
    pub fn tag_buttons(&self) -> Vec<(String, TagState)> {
        self.all_tags
            .iter()
            .map(|tag| (tag.clone(), self.filter.tag_state(tag)))
            .collect()
    }

    /// Breadcrumb for the active path filter.
    pub fn path_crumbs(&self) -> Vec<PathCrumb> {
        path_crumbs(self.current_path.as_deref())
    }

    pub fn stats(&self) -> String {
        format!(
            "{} items • Window: {}x{}px",
            self.collection.len(),
            self.resize.width(),
            self.window_height
        )
    }

    /// Info panel content for the lightbox item, when the panel is open.
    pub fn info_sections(&self) -> Option<Vec<InfoSection>> {
        if !self.info_panel.is_open() {
            return None;
        }
        let index = self.collection.cursor()?;
        let record = self.collection.current()?;
        Some(self.info_panel.sections(
            record,
            index,
            self.collection.len(),
            &self.info_tags,
        ))
    }

    /// Size limits for the lightbox media inside a `frame_w` x `frame_h`
    /// frame, accounting for rotation and the info panel.
    pub fn lightbox_bounds(&self, frame_w: f64, frame_h: f64) -> Option<FrameBounds> {
        let shown = self.presentation.as_ref()?;
        Some(frame_bounds(
            frame_w,
            frame_h,
            shown.rotation,
            self.info_panel.width_offset(),
        ))
    }

    /// Success notices queued since the last call.
    pub fn take_toasts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.toasts)
    }

    // Loading

    /// Loads whatever `location` names. A lightbox location only reloads the
    /// unfiltered list when the hash is not already known; that reload resets
    /// filters like any other.
    pub async fn load_location(&mut self, location: Location, push_state: bool) -> Result<()> {
        match location {
            Location::Lightbox(hash) => {
                if self.collection.get_media(&hash).is_none() {
                    let ticket = self.begin_load(MediaQuery::default(), false);
                    let result = self.client.fetch_media(&ticket.query).await;
                    self.finish_load(ticket, result).await?;
                }
                self.show_media(MediaTarget::hash(hash), push_state).await?;
                self.modes.open_lightbox();
                Ok(())
            }
            Location::Search(query) => self.load_media_by_filter(query, push_state).await,
            Location::Root => {
                self.load_media_by_filter(MediaQuery::default(), push_state)
                    .await
            }
        }
    }

    /// Back/forward navigation: reload without pushing history.
    pub async fn popstate(&mut self, location: Location) -> Result<()> {
        self.load_location(location, false).await
    }

    pub async fn load_media_by_filter(&mut self, query: MediaQuery, push_state: bool) -> Result<()> {
        let ticket = self.begin_load(query, push_state);
        let result = self.client.fetch_media(&ticket.query).await;
        self.finish_load(ticket, result).await
    }

    /// Synchronous half of a reload: resets filters to `query`, drops the
    /// selection and every transient mode, and closes the lightbox.
    pub fn begin_load(&mut self, query: MediaQuery, push_state: bool) -> LoadTicket {
        self.filter.apply_query(&query);
        self.current_path = query.path.clone();
        self.selection.clear();
        self.gestures.reset();
        self.modes.reset();
        self.prompt.edit = None;
        if self.lightbox.is_open() {
            self.close_lightbox(push_state);
        }

        self.load_seq += 1;
        debug!(seq = self.load_seq, query = %query.to_query_string(), "Load started");
        LoadTicket {
            seq: self.load_seq,
            query,
            push_state,
        }
    }

    /// Applies a completed fetch. Whichever ticket completes last wins.
    pub async fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<(String, MediaRecord)>>,
    ) -> Result<()> {
        if ticket.seq != self.load_seq {
            debug!(
                seq = ticket.seq,
                latest = self.load_seq,
                "Applying response of a superseded load"
            );
        }

        let data = match result {
            Ok(data) => data,
            Err(err) => {
                warn!(error = ?err, seq = ticket.seq, "Failed to load media");
                self.view = GalleryView::Failed(LOAD_FAILED.to_string());
                return Err(err);
            }
        };

        self.collection.set_new_media(data);
        self.selection.clear();
        if ticket.push_state {
            self.history.push(Location::for_query(&ticket.query));
        }
        self.relayout();
        info!(
            seq = ticket.seq,
            count = self.collection.len(),
            "Loaded media"
        );

        self.refresh_tags().await;
        Ok(())
    }

    /// Recomputes rows for the current width; the view follows.
    pub fn relayout(&mut self) {
        if self.collection.is_empty() {
            self.rows.clear();
            self.view = GalleryView::Empty;
            return;
        }
        let ratios = self.collection.aspect_ratios();
        let width = self.layout.content_width(self.resize.width());
        self.rows = self.layout.compute_rows(&ratios, width);
        self.view = GalleryView::Grid(self.layout.place(&ratios, &self.rows));
        debug!(rows = self.rows.len(), width, "Relayout");
    }

    async fn refresh_tags(&mut self) {
        match self.client.fetch_all_tags().await {
            Ok(tags) => self.all_tags = tags,
            Err(err) => warn!(error = ?err, "Failed to load tag list"),
        }
    }

    async fn reload_current_filters(&mut self) -> Result<()> {
        let query = self.filter.to_query(self.current_path.clone());
        self.load_media_by_filter(query, true).await
    }

    // Filters

    /// Advances a tag through inactive → active → inverse and reloads.
    pub async fn cycle_tag_filter(&mut self, tag: &str) -> Result<()> {
        let state = self.filter.cycle_tag(tag);
        debug!(tag, ?state, "Tag filter cycled");
        self.reload_current_filters().await
    }

    pub async fn add_tag_filter(&mut self, tag: &str) -> Result<()> {
        self.filter.set_tag_active(tag);
        self.reload_current_filters().await
    }

    pub async fn add_type_filter(&mut self, media_type: MediaType) -> Result<()> {
        self.filter.add_type(media_type);
        self.reload_current_filters().await
    }

    pub async fn set_path_filter(&mut self, path: Option<String>) -> Result<()> {
        let query = self.filter.to_query(path);
        self.load_media_by_filter(query, true).await
    }

    // Input

    /// Routes one input through the mode machine and performs the action.
    pub async fn handle_event(&mut self, event: InputEvent) -> Result<()> {
        let Some(action) = self.modes.handle(&event) else {
            return Ok(());
        };

        match action {
            Action::ShowMedia(index) => {
                let index = match index.or_else(|| self.collection.cursor()) {
                    Some(index) => index,
                    None => {
                        self.modes.reset();
                        return Err(GalleryError::EmptyCollection);
                    }
                };
                if let Err(err) = self.show_media(MediaTarget::index(index), true).await {
                    self.modes.reset();
                    return Err(err);
                }
            }
            Action::CloseLightbox => self.close_lightbox(true),
            Action::NextMedia => {
                let shown = self.lightbox.next(&mut self.collection, &mut self.history)?;
                self.presentation = Some(shown);
                self.refresh_info_tags().await;
            }
            Action::PrevMedia => {
                let shown = self.lightbox.prev(&mut self.collection, &mut self.history)?;
                self.presentation = Some(shown);
                self.refresh_info_tags().await;
            }
            Action::ToggleInfoPanel => {
                if self.info_panel.toggle() {
                    self.refresh_info_tags().await;
                }
            }
            Action::Rotate { clockwise } => self.rotate(clockwise).await?,

            Action::ShowSelectionUi | Action::HideSelectionUi => {
                self.gestures.reset();
                debug!(count = self.selection.count(), "Selection UI toggled");
            }
            Action::SelectAllOrClear => {
                let n = self.collection.len();
                if self.selection.count() == n {
                    self.selection.deselect_all(n);
                } else {
                    self.selection.select_all(n);
                }
            }
            Action::ClearOrSelectAll => {
                let n = self.collection.len();
                if self.selection.count() == 0 {
                    self.selection.select_all(n);
                } else {
                    self.selection.deselect_all(n);
                }
            }

            Action::OpenTagPrompt => self.prompt.error = None,
            Action::CloseTagPrompt => {}
            Action::SubmitTagPrompt => self.submit_tag_prompt().await,

            Action::EnterTagEdit => {}
            Action::ExitTagEdit | Action::CloseTagEditPrompt => {
                self.prompt.edit = None;
                self.prompt.error = None;
            }
            Action::OpenTagEditPrompt(tag) => {
                self.prompt.edit = Some(EditPrompt {
                    input: tag.clone(),
                    tag,
                });
                self.prompt.error = None;
            }
            Action::SubmitTagRename => self.submit_tag_rename().await,
            Action::SubmitTagRemoval => self.submit_tag_removal().await,

            Action::CycleTagFilter(tag) => self.cycle_tag_filter(&tag).await?,
            Action::AddTagFilter(tag) => self.add_tag_filter(&tag).await?,
            Action::AddTypeFilter(media_type) => self.add_type_filter(media_type).await?,
            Action::SetPathFilter(path) => self.set_path_filter(path).await?,
        }
        Ok(())
    }

    /// Replaces the text of whichever prompt is open.
    pub fn set_prompt_input(&mut self, text: &str) {
        match self.prompt.edit.as_mut() {
            Some(edit) if self.modes.edit_prompt_open() => edit.input = text.to_string(),
            _ if self.modes.tag_prompt_open() => self.prompt.input = text.to_string(),
            _ => {}
        }
    }

    pub fn on_scroll(&mut self, offset: f64) {
        self.scroll_offset = offset;
    }

    // Lightbox

    async fn show_media(&mut self, target: MediaTarget, update_history: bool) -> Result<()> {
        let was_open = self.lightbox.is_open();
        let shown = self.lightbox.show(
            &mut self.collection,
            &mut self.history,
            &target,
            update_history,
        )?;
        if !was_open {
            self.lightbox.remember_scroll(self.scroll_offset);
        }
        self.presentation = Some(shown);
        self.refresh_info_tags().await;
        Ok(())
    }

    fn close_lightbox(&mut self, push_state: bool) {
        let dismissal = self.lightbox.close(&mut self.history, push_state);
        if dismissal.stop_video {
            debug!("Releasing video source");
        }
        if let Some(offset) = dismissal.restore_scroll {
            self.scroll_offset = offset;
        }
        self.presentation = None;
        self.info_panel.close();
        self.info_tags.clear();
    }

    async fn refresh_info_tags(&mut self) {
        if !self.info_panel.is_open() {
            return;
        }
        let Some(hash) = self.collection.current_hash().map(str::to_string) else {
            return;
        };
        self.info_tags = match self.client.fetch_tags_for(&hash).await {
            Ok(tags) => tags,
            Err(err) => {
                warn!(error = ?err, %hash, "Failed to load media tags");
                Vec::new()
            }
        };
    }

    /// Rotates the lightbox item a quarter turn. The local record is only
    /// updated after the server accepted the rotation.
    pub async fn rotate(&mut self, clockwise: bool) -> Result<()> {
        let Some(record) = self.collection.current() else {
            return Err(GalleryError::EmptyCollection);
        };
        let hash = record.hash.clone();
        let rotation = record.effective_rotation().rotated(clockwise);

        if let Err(err) = self.client.rotate(&hash, clockwise).await {
            warn!(error = ?err, %hash, "Rotate failed");
            return Err(err);
        }
        self.collection.set_rotation(&hash, rotation)?;
        if let Some(shown) = self.presentation.as_mut().filter(|p| p.hash == hash) {
            shown.rotation = rotation;
        }
        info!(%hash, degrees = rotation.degrees(), "Rotated");
        Ok(())
    }

    // Tag mutations

    async fn submit_tag_prompt(&mut self) {
        let tags: Vec<String> = self
            .prompt
            .input
            .split(' ')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        let hashes = self
            .collection
            .get_hashes_at_indices(self.selection.indices());

        match self.client.add_tags(&tags, &hashes).await {
            Ok(_) => {
                let msg = format!(
                    "Successfully added {} tags to {} items",
                    tags.len(),
                    hashes.len()
                );
                self.prompt_succeeded(msg).await;
            }
            Err(err) => self.prompt_failed("Error adding tag", err),
        }
    }

    async fn submit_tag_rename(&mut self) {
        let Some(edit) = self.prompt.edit.clone() else {
            return;
        };
        match self.client.rename_tag(&edit.tag, &edit.input).await {
            Ok(_) => {
                let msg = format!("Successfully edited {} as {}", edit.tag, edit.input);
                self.prompt.edit = None;
                self.prompt_succeeded(msg).await;
            }
            Err(err) => self.prompt_failed("Error editing tag", err),
        }
    }

    async fn submit_tag_removal(&mut self) {
        let Some(edit) = self.prompt.edit.clone() else {
            return;
        };
        match self.client.delete_tags(&[edit.tag]).await {
            Ok(_) => {
                self.prompt.edit = None;
                self.prompt_succeeded("Successfully removed 1 tags".to_string())
                    .await;
            }
            Err(err) => self.prompt_failed("Error removing tag", err),
        }
    }

    /// Detaches one tag from the lightbox item (info panel remove button).
    pub async fn remove_tag_from_current(&mut self, tag: &str) -> Result<()> {
        let hash = self
            .collection
            .current_hash()
            .map(str::to_string)
            .ok_or(GalleryError::EmptyCollection)?;
        if let Err(err) = self
            .client
            .remove_tags_from(&[tag.to_string()], &[hash.clone()])
            .await
        {
            warn!(error = ?err, tag, %hash, "Failed to remove tag from media");
            return Err(err);
        }
        self.toasts
            .push(format!("Successfully removed tag '{tag}' from media"));
        self.refresh_tags().await;
        self.refresh_info_tags().await;
        Ok(())
    }

    async fn prompt_succeeded(&mut self, msg: String) {
        info!("{}", msg);
        self.modes.prompt_succeeded();
        self.prompt.error = None;
        self.toasts.push(msg);
        self.refresh_tags().await;
    }

    fn prompt_failed(&mut self, prefix: &str, err: GalleryError) {
        warn!(error = ?err, "{}", prefix);
        self.prompt.error = Some(format!("{prefix}: {err}"));
    }

    // Selection gestures; ignored unless checkboxes are visible

    pub fn checkbox_down(&mut self, index: usize) -> Option<bool> {
        self.modes
            .selection_ui_visible()
            .then(|| self.gestures.pointer_down(&mut self.selection, index))
    }

    pub fn checkbox_enter(&mut self, index: usize) -> usize {
        if !self.modes.selection_ui_visible() {
            return 0;
        }
        self.gestures.pointer_enter(&mut self.selection, index)
    }

    pub fn pointer_up(&mut self) {
        self.gestures.pointer_up();
    }

    pub fn pointer_left_viewport(&mut self) {
        self.gestures.pointer_left_viewport();
    }

    pub fn touch_start(&mut self, index: usize, now: Instant) {
        if self.modes.selection_ui_visible() {
            self.gestures.touch_start(&self.selection, index, now);
        }
    }

    pub fn long_press_deadline(&self) -> Option<Instant> {
        self.gestures.long_press_deadline()
    }

    pub fn poll_long_press(&mut self, now: Instant) -> usize {
        self.gestures.poll_long_press(&mut self.selection, now)
    }

    pub fn touch_move(&mut self) {
        self.gestures.touch_move();
    }

    pub fn touch_end(&mut self, index: usize) -> Option<bool> {
        if !self.modes.selection_ui_visible() {
            self.gestures.touch_cancel();
            return None;
        }
        self.gestures.touch_end(&mut self.selection, index)
    }

    pub fn touch_cancel(&mut self) {
        self.gestures.touch_cancel();
    }

    // Resize

    /// Records a window size change. Returns whether a relayout is pending.
    pub fn on_resize(&mut self, width: f64, height: f64) -> bool {
        self.window_height = height;
        self.resize.observe(width, Instant::now())
    }

    /// Waits for the resize quiet period, then closes the info panel and
    /// relayouts. Returns whether anything settled.
    pub async fn settle_resize(&mut self) -> bool {
        let Some(width) = self.resize.settle().await else {
            return false;
        };
        self.info_panel.close();
        if !self.collection.is_empty() {
            self.relayout();
        }
        debug!(width, "Resize applied");
        true
    }
}

impl<T: Transport> GalleryApp<T, SessionHistory> {
    /// Steps back in the session history and reloads that location.
    pub async fn back(&mut self) -> Result<bool> {
        let Some(location) = self.history.back().cloned() else {
            return Ok(false);
        };
        self.popstate(location).await?;
        Ok(true)
    }

    pub async fn forward(&mut self) -> Result<bool> {
        let Some(location) = self.history.forward().cloned() else {
            return Ok(false);
        };
        self.popstate(location).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::time::Duration;

    use super::*;
    use crate::api::{HttpRequest, HttpResponse, Method};
    use crate::models::Rotation;
    use crate::ui::Key;

    #[derive(Default)]
    struct Scripted {
        responses: RefCell<VecDeque<HttpResponse>>,
        sent: RefCell<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn reply(self, status: u16, body: &str) -> Self {
            self.responses.borrow_mut().push_back(HttpResponse {
                status,
                body: body.to_string(),
            });
            self
        }
    }

    impl Transport for Scripted {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.sent.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| GalleryError::Transport("no scripted response".into()))
        }
    }

    const MEDIA: &str = r#"{"data": [
        ["h0", {"name": "a.jpg", "aspectRatio": 1.5, "width": 1500, "height": 1000}],
        ["h1", {"name": "b.jpg", "aspectRatio": 0.75, "width": 750, "height": 1000}],
        ["h2", {"name": "c.mp4", "aspectRatio": 1.78, "video": true, "duration": "0:31"}]
    ]}"#;
    const TAGS: &str = r#"{"success": true, "data": ["cat", "dog"]}"#;
    const OK: &str = r#"{"success": true, "msg": "ok"}"#;

    fn app(transport: Scripted) -> GalleryApp<Scripted, SessionHistory> {
        GalleryApp::new(
            &Config::default(),
            transport,
            SessionHistory::default(),
            (1016.0, 800.0),
        )
    }

    async fn loaded(extra: Scripted) -> GalleryApp<Scripted, SessionHistory> {
        let mut app = app(extra);
        app.load_location(Location::Root, true).await.unwrap();
        app
    }

    fn sent_urls(app: &GalleryApp<Scripted, SessionHistory>) -> Vec<String> {
        app.client()
            .transport()
            .sent
            .borrow()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_initial_load_lays_out_rows() {
        let app = loaded(Scripted::default().reply(200, MEDIA).reply(200, TAGS)).await;

        assert_eq!(app.collection().len(), 3);
        assert!(matches!(app.view(), GalleryView::Grid(rows) if !rows.is_empty()));
        let covered: usize = app.rows().iter().map(|r| r.len()).sum();
        assert_eq!(covered, 3);
        assert_eq!(app.tag_buttons().len(), 2);
        assert_eq!(app.stats(), "3 items • Window: 1016x800px");
        assert_eq!(app.history().current(), &Location::Root);
        assert_eq!(sent_urls(&app)[0], "http://127.0.0.1:5000/api/media");
    }

    #[tokio::test]
    async fn test_empty_result_shows_message() {
        let app = loaded(
            Scripted::default()
                .reply(200, r#"{"data": []}"#)
                .reply(200, TAGS),
        )
        .await;
        assert_eq!(app.view(), &GalleryView::Empty);
        assert_eq!(app.view().message(), Some("No images found."));
    }

    #[tokio::test]
    async fn test_failed_load_keeps_collection() {
        let mut app = loaded(
            Scripted::default()
                .reply(200, MEDIA)
                .reply(200, TAGS)
                .reply(500, "boom"),
        )
        .await;

        let err = app.cycle_tag_filter("cat").await.unwrap_err();
        assert!(matches!(err, GalleryError::Status { status: 500, .. }));
        assert!(matches!(app.view(), GalleryView::Failed(_)));
        assert_eq!(app.collection().len(), 3);
        // The filter was updated before the fetch
        assert_eq!(app.filter().tag_state("cat"), TagState::Active);
    }

    #[tokio::test]
    async fn test_tag_cycle_pushes_search_location() {
        let mut app = loaded(
            Scripted::default()
                .reply(200, MEDIA)
                .reply(200, TAGS)
                .reply(200, MEDIA),
        )
        .await;

        app.handle_event(InputEvent::TagButton("cat".into()))
            .await
            .unwrap();
        assert_eq!(app.history().current().to_url(), "/search?tag=cat");
        assert_eq!(
            sent_urls(&app).last().unwrap(),
            "http://127.0.0.1:5000/api/media?tag=cat"
        );
    }

    #[tokio::test]
    async fn test_select_all_then_clear() {
        let mut app = loaded(Scripted::default().reply(200, MEDIA).reply(200, TAGS)).await;
        app.handle_event(InputEvent::Key(Key::Char('s'))).await.unwrap();
        app.handle_event(InputEvent::Key(Key::Char('a'))).await.unwrap();
        assert_eq!(app.selection().count(), 3);
        app.handle_event(InputEvent::Key(Key::Char('a'))).await.unwrap();
        assert_eq!(app.selection().count(), 0);

        app.handle_event(InputEvent::Key(Key::Char('A'))).await.unwrap();
        assert_eq!(app.selection().count(), 3);
        app.handle_event(InputEvent::Key(Key::Char('A'))).await.unwrap();
        assert_eq!(app.selection().count(), 0);
    }

    #[tokio::test]
    async fn test_checkboxes_ignored_outside_select() {
        let mut app = loaded(Scripted::default().reply(200, MEDIA).reply(200, TAGS)).await;
        assert_eq!(app.checkbox_down(1), None);
        assert_eq!(app.selection().count(), 0);

        app.handle_event(InputEvent::ToggleSelect).await.unwrap();
        assert_eq!(app.checkbox_down(0), Some(true));
        assert_eq!(app.checkbox_enter(2), 2);
        app.pointer_up();
        assert_eq!(app.selection().indices(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_lightbox_open_close_restores_scroll() {
        let mut app = loaded(Scripted::default().reply(200, MEDIA).reply(200, TAGS)).await;
        app.on_scroll(640.0);
        app.handle_event(InputEvent::OpenMedia(2)).await.unwrap();
        assert_eq!(app.mode(), InteractionMode::Lightbox);
        assert_eq!(app.history().current(), &Location::Lightbox("h2".into()));

        app.on_scroll(0.0);
        app.handle_event(InputEvent::Key(Key::ArrowRight))
            .await
            .unwrap();
        assert_eq!(app.presentation().unwrap().hash, "h0");

        app.handle_event(InputEvent::Key(Key::Escape)).await.unwrap();
        assert!(app.presentation().is_none());
        assert_eq!(app.scroll_offset(), 640.0);
        assert_eq!(app.history().current(), &Location::Root);
    }

    #[tokio::test]
    async fn test_lightbox_location_fetches_when_unknown() {
        let mut app = app(Scripted::default().reply(200, MEDIA).reply(200, TAGS));
        app.load_location(Location::Lightbox("h1".into()), false)
            .await
            .unwrap();
        assert_eq!(app.mode(), InteractionMode::Lightbox);
        assert_eq!(app.presentation().unwrap().index, 1);
        assert_eq!(app.history().len(), 1);

        // Known hash: no second fetch
        app.load_location(Location::Lightbox("h0".into()), false)
            .await
            .unwrap();
        assert_eq!(
            sent_urls(&app),
            [
                "http://127.0.0.1:5000/api/media",
                "http://127.0.0.1:5000/api/tags"
            ]
        );
    }

    #[tokio::test]
    async fn test_rotate_updates_after_server_accepts() {
        let mut app = loaded(
            Scripted::default()
                .reply(200, MEDIA)
                .reply(200, TAGS)
                .reply(200, OK)
                .reply(400, r#"{"success": false, "msg": "nope"}"#),
        )
        .await;
        app.handle_event(InputEvent::OpenMedia(0)).await.unwrap();

        app.handle_event(InputEvent::Rotate { clockwise: false })
            .await
            .unwrap();
        assert_eq!(app.presentation().unwrap().rotation, Rotation::Deg270);
        assert_eq!(
            app.collection().get_media("h0").unwrap().rotation,
            Some(Rotation::Deg270)
        );
        let bounds = app.lightbox_bounds(1000.0, 800.0).unwrap();
        assert_eq!(bounds.max_width, 768.0);

        assert!(app.rotate(true).await.is_err());
        assert_eq!(app.presentation().unwrap().rotation, Rotation::Deg270);
        assert!(sent_urls(&app).contains(&"http://127.0.0.1:5000/api/rotate/h0/left".to_string()));
    }

    #[tokio::test]
    async fn test_info_panel_sections_follow_cursor() {
        let mut app = loaded(
            Scripted::default()
                .reply(200, MEDIA)
                .reply(200, TAGS)
                .reply(200, r#"{"success": true, "data": ["cat"]}"#),
        )
        .await;
        app.handle_event(InputEvent::OpenMedia(1)).await.unwrap();
        assert!(app.info_sections().is_none());

        app.handle_event(InputEvent::Key(Key::Char('i'))).await.unwrap();
        let sections = app.info_sections().unwrap();
        let index = sections[2].entries[0].value.clone();
        assert_eq!(index, crate::ui::InfoValue::Text("2 of 3".into()));
        assert_eq!(
            sections[2].entries[2].value,
            crate::ui::InfoValue::Tags(vec!["cat".into()])
        );
        // Upright media ignores the panel width
        assert_eq!(app.lightbox_bounds(1000.0, 800.0).unwrap().max_width, 900.0);
    }

    #[tokio::test]
    async fn test_tag_prompt_failure_keeps_prompt_open() {
        let mut app = loaded(
            Scripted::default()
                .reply(200, MEDIA)
                .reply(200, TAGS)
                .reply(
                    400,
                    r#"{"success": false, "msg": "At least one media must be selected!"}"#,
                ),
        )
        .await;
        app.handle_event(InputEvent::ToggleSelect).await.unwrap();
        app.handle_event(InputEvent::OpenTags).await.unwrap();
        app.set_prompt_input("sunset beach");
        app.handle_event(InputEvent::ConfirmPrompt).await.unwrap();

        assert_eq!(app.mode(), InteractionMode::TagPrompt);
        assert_eq!(
            app.prompt().error.as_deref(),
            Some("Error adding tag: At least one media must be selected!")
        );

        // Cancel keeps the typed text for next time
        app.handle_event(InputEvent::CancelPrompt).await.unwrap();
        assert_eq!(app.mode(), InteractionMode::Select);
        assert_eq!(app.prompt().input, "sunset beach");
    }

    #[tokio::test]
    async fn test_tag_prompt_success_sends_selection() {
        let mut app = loaded(
            Scripted::default()
                .reply(200, MEDIA)
                .reply(200, TAGS)
                .reply(200, OK)
                .reply(200, r#"{"success": true, "data": ["cat", "dog", "sea"]}"#),
        )
        .await;
        app.handle_event(InputEvent::ToggleSelect).await.unwrap();
        app.checkbox_down(2);
        app.pointer_up();
        app.handle_event(InputEvent::Key(Key::Char('t'))).await.unwrap();
        app.set_prompt_input("sea");
        app.handle_event(InputEvent::ConfirmPrompt).await.unwrap();

        assert_eq!(app.mode(), InteractionMode::Select);
        assert_eq!(
            app.take_toasts(),
            vec!["Successfully added 1 tags to 1 items".to_string()]
        );
        assert_eq!(app.tag_buttons().len(), 3);

        let sent = app.client().transport().sent.borrow();
        let add = sent.iter().find(|r| r.method == Method::Post).unwrap();
        assert_eq!(
            add.body,
            Some(serde_json::json!({ "tag": ["sea"], "hashes": ["h2"] }))
        );
    }

    #[tokio::test]
    async fn test_tag_edit_rename() {
        let mut app = loaded(
            Scripted::default()
                .reply(200, MEDIA)
                .reply(200, TAGS)
                .reply(200, OK)
                .reply(200, r#"{"success": true, "data": ["kitty", "dog"]}"#),
        )
        .await;
        app.handle_event(InputEvent::ToggleTagEdit).await.unwrap();
        app.handle_event(InputEvent::TagButton("cat".into()))
            .await
            .unwrap();
        assert_eq!(app.prompt().edit.as_ref().unwrap().input, "cat");

        app.set_prompt_input("kitty");
        app.handle_event(InputEvent::ConfirmPrompt).await.unwrap();
        assert!(app.prompt().edit.is_none());
        assert!(app.modes().tag_edit_active());
        assert!(!app.modes().edit_prompt_open());
        assert_eq!(
            app.take_toasts(),
            vec!["Successfully edited cat as kitty".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_relayouts_after_quiet_period() {
        let mut app = loaded(Scripted::default().reply(200, MEDIA).reply(200, TAGS)).await;
        let before = app.rows().to_vec();

        assert!(!app.on_resize(1016.0, 600.0));
        assert!(app.on_resize(316.0, 600.0));
        let start = Instant::now();
        assert!(app.settle_resize().await);
        assert_eq!(Instant::now() - start, Duration::from_millis(350));
        assert_ne!(app.rows(), &before[..]);
    }

    #[tokio::test]
    async fn test_back_reloads_without_push() {
        let mut app = loaded(
            Scripted::default()
                .reply(200, MEDIA)
                .reply(200, TAGS)
                // Tag list stays cached across reloads
                .reply(200, MEDIA)
                .reply(200, MEDIA),
        )
        .await;
        app.add_type_filter(MediaType::Video).await.unwrap();
        assert_eq!(
            app.history().current().to_url(),
            "/search?types=video"
        );
        let depth = app.history().len();

        assert!(app.back().await.unwrap());
        assert_eq!(app.history().len(), depth);
        assert_eq!(app.history().current(), &Location::Root);
        assert!(app.filter().types().is_empty());
    }
}
