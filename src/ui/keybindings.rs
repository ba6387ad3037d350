// Interaction modes and input dispatch for the gallery
// Exactly one mode is active; input is resolved by (mode, event) first.
//
// Keybindings:
// - Browsing: Left/Right open the lightbox at the cursor, s: select mode,
//   e: tag edit mode
// - Lightbox: Escape: close, Left/Right: prev/next, i: info panel
// - Select: s/Escape: leave, a: select all (or clear if all selected),
//   A: clear (or select all if none selected), t: add tags, e: tag edit
// - TagPrompt: Escape: cancel
// - TagEdit: e: leave (Escape closes an open rename prompt)
//
// Non-key events come from buttons: OpenMedia, ToggleSelect, OpenTags,
// ToggleTagEdit, TagButton, TypeButton, PathButton and the prompt buttons.

use tracing::debug;

use crate::models::MediaType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Browsing,
    Lightbox,
    Select,
    TagPrompt,
    TagEdit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Enter,
    Char(char),
}

/// Everything the user can do, as seen by the mode machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    /// Click on a grid item.
    OpenMedia(usize),
    CloseLightbox,
    /// Click on the lightbox backdrop outside the media.
    BackgroundClick,
    ToggleInfoPanel,
    Rotate { clockwise: bool },
    ToggleSelect,
    OpenTags,
    ConfirmPrompt,
    CancelPrompt,
    /// The extra "Remove" button of the tag rename prompt.
    RemovePrompt,
    ToggleTagEdit,
    TagButton(String),
    TypeButton(MediaType),
    PathButton(Option<String>),
}

/// Side effect the controller performs after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show the given index, or the current cursor when `None`.
    ShowMedia(Option<usize>),
    CloseLightbox,
    NextMedia,
    PrevMedia,
    ToggleInfoPanel,
    Rotate { clockwise: bool },
    ShowSelectionUi,
    HideSelectionUi,
    /// Deselect everything if all is selected, otherwise select all.
    SelectAllOrClear,
    /// Select everything if nothing is selected, otherwise deselect all.
    ClearOrSelectAll,
    OpenTagPrompt,
    CloseTagPrompt,
    SubmitTagPrompt,
    EnterTagEdit,
    ExitTagEdit,
    OpenTagEditPrompt(String),
    CloseTagEditPrompt,
    SubmitTagRename,
    SubmitTagRemoval,
    CycleTagFilter(String),
    /// Make the tag an active filter regardless of its current state.
    AddTagFilter(String),
    AddTypeFilter(MediaType),
    SetPathFilter(Option<String>),
}

/// Where a transition leaves the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Stay,
    Mode(InteractionMode),
    /// Back to whatever was active before the tag prompt.
    Prior,
}

/// Owner of the active interaction mode.
#[derive(Debug, Clone, Default)]
pub struct ModeMachine {
    mode: InteractionMode,
    prior: Option<InteractionMode>,
    edit_prompt_open: bool,
}

impl ModeMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Whether checkboxes and the select bar should be rendered. Stays true
    /// while the tag prompt suspends select mode.
    pub fn selection_ui_visible(&self) -> bool {
        self.mode == InteractionMode::Select
            || (self.mode == InteractionMode::TagPrompt
                && self.prior == Some(InteractionMode::Select))
    }

    pub fn tag_edit_active(&self) -> bool {
        self.mode == InteractionMode::TagEdit
    }

    pub fn tag_prompt_open(&self) -> bool {
        self.mode == InteractionMode::TagPrompt
    }

    pub fn edit_prompt_open(&self) -> bool {
        self.mode == InteractionMode::TagEdit && self.edit_prompt_open
    }

    /// Resolves one input against the active mode, applies the transition
    /// and returns what the controller has to do. `None` is a no-op.
    pub fn handle(&mut self, event: &InputEvent) -> Option<Action> {
        let (target, action) = self.resolve(event)?;
        let from = self.mode;

        match target {
            Target::Stay => {}
            Target::Mode(InteractionMode::TagPrompt) => {
                self.prior = Some(from);
                self.mode = InteractionMode::TagPrompt;
            }
            Target::Mode(mode) => self.mode = mode,
            Target::Prior => {
                self.mode = self.prior.take().unwrap_or_default();
            }
        }

        match &action {
            Action::OpenTagEditPrompt(_) => self.edit_prompt_open = true,
            Action::CloseTagEditPrompt | Action::ExitTagEdit => self.edit_prompt_open = false,
            _ => {}
        }

        if from != self.mode {
            debug!(?from, to = ?self.mode, ?event, "Mode transition");
        }
        Some(action)
    }

    /// The `(mode, event)` table. Unmatched pairs are no-ops.
    fn resolve(&self, event: &InputEvent) -> Option<(Target, Action)> {
        use InputEvent as E;
        use InteractionMode as M;

        let stay = |action| Some((Target::Stay, action));

        match (self.mode, event) {
            // Filters are reachable from the grid whether or not select is on
            (M::Browsing | M::Select, E::TagButton(tag)) => {
                stay(Action::CycleTagFilter(tag.clone()))
            }
            (M::Browsing | M::Select | M::Lightbox, E::TypeButton(t)) => {
                stay(Action::AddTypeFilter(*t))
            }
            (M::Browsing | M::Select | M::Lightbox, E::PathButton(p)) => {
                stay(Action::SetPathFilter(p.clone()))
            }

            (M::Browsing, E::OpenMedia(idx)) => Some((
                Target::Mode(M::Lightbox),
                Action::ShowMedia(Some(*idx)),
            )),
            (M::Browsing, E::Key(Key::ArrowLeft | Key::ArrowRight)) => {
                Some((Target::Mode(M::Lightbox), Action::ShowMedia(None)))
            }
            (M::Browsing, E::Key(Key::Char('s')) | E::ToggleSelect) => {
                Some((Target::Mode(M::Select), Action::ShowSelectionUi))
            }
            (M::Browsing | M::Select, E::Key(Key::Char('e')) | E::ToggleTagEdit) => {
                Some((Target::Mode(M::TagEdit), Action::EnterTagEdit))
            }

            (
                M::Lightbox,
                E::Key(Key::Escape) | E::CloseLightbox | E::BackgroundClick,
            ) => Some((Target::Mode(M::Browsing), Action::CloseLightbox)),
            (M::Lightbox, E::Key(Key::ArrowRight)) => stay(Action::NextMedia),
            (M::Lightbox, E::Key(Key::ArrowLeft)) => stay(Action::PrevMedia),
            (M::Lightbox, E::Key(Key::Char('i')) | E::ToggleInfoPanel) => {
                stay(Action::ToggleInfoPanel)
            }
            (M::Lightbox, E::Rotate { clockwise }) => stay(Action::Rotate {
                clockwise: *clockwise,
            }),
            // Tag buttons in the info panel only ever add a filter
            (M::Lightbox, E::TagButton(tag)) => stay(Action::AddTagFilter(tag.clone())),

            (M::Select, E::Key(Key::Char('s') | Key::Escape) | E::ToggleSelect) => {
                Some((Target::Mode(M::Browsing), Action::HideSelectionUi))
            }
            (M::Select, E::Key(Key::Char('a'))) => stay(Action::SelectAllOrClear),
            (M::Select, E::Key(Key::Char('A'))) => stay(Action::ClearOrSelectAll),
            // The tag button opens the prompt from the grid too; `t` is select-only
            (M::Browsing, E::OpenTags) | (M::Select, E::Key(Key::Char('t')) | E::OpenTags) => {
                Some((Target::Mode(M::TagPrompt), Action::OpenTagPrompt))
            }

            (M::TagPrompt, E::Key(Key::Escape) | E::CancelPrompt) => {
                Some((Target::Prior, Action::CloseTagPrompt))
            }
            (M::TagPrompt, E::Key(Key::Enter) | E::ConfirmPrompt) => {
                stay(Action::SubmitTagPrompt)
            }

            (M::TagEdit, _) if self.edit_prompt_open => match event {
                E::Key(Key::Enter) | E::ConfirmPrompt => stay(Action::SubmitTagRename),
                E::RemovePrompt => stay(Action::SubmitTagRemoval),
                E::Key(Key::Escape) | E::CancelPrompt => stay(Action::CloseTagEditPrompt),
                // Typing into the prompt must not leave the mode
                _ => None,
            },
            (M::TagEdit, E::Key(Key::Char('e')) | E::ToggleTagEdit) => {
                Some((Target::Mode(M::Browsing), Action::ExitTagEdit))
            }
            (M::TagEdit, E::TagButton(tag)) => stay(Action::OpenTagEditPrompt(tag.clone())),

            _ => None,
        }
    }

    /// Closes the tag prompt after a successful submission, restoring the
    /// mode it was opened from.
    pub fn prompt_succeeded(&mut self) {
        if self.mode == InteractionMode::TagPrompt {
            self.mode = self.prior.take().unwrap_or_default();
        } else if self.mode == InteractionMode::TagEdit {
            self.edit_prompt_open = false;
        }
    }

    /// Lightbox opened by navigation (a `/lightbox/<hash>` location) rather
    /// than by input.
    pub fn open_lightbox(&mut self) {
        self.reset();
        self.mode = InteractionMode::Lightbox;
    }

    /// Back to plain browsing, as every filtered reload does.
    pub fn reset(&mut self) {
        if self.mode != InteractionMode::Browsing {
            debug!(from = ?self.mode, "Mode reset to browsing");
        }
        self.mode = InteractionMode::Browsing;
        self.prior = None;
        self.edit_prompt_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> InputEvent {
        InputEvent::Key(Key::Char(c))
    }

    #[test]
    fn test_tag_prompt_restores_select() {
        let mut modes = ModeMachine::new();
        assert_eq!(modes.handle(&key('s')), Some(Action::ShowSelectionUi));
        assert_eq!(modes.handle(&key('t')), Some(Action::OpenTagPrompt));
        assert_eq!(modes.mode(), InteractionMode::TagPrompt);
        assert!(modes.selection_ui_visible());

        assert_eq!(
            modes.handle(&InputEvent::Key(Key::Escape)),
            Some(Action::CloseTagPrompt)
        );
        assert_eq!(modes.mode(), InteractionMode::Select);
    }

    #[test]
    fn test_prompt_success_restores_select() {
        let mut modes = ModeMachine::new();
        modes.handle(&InputEvent::ToggleSelect);
        modes.handle(&InputEvent::OpenTags);
        // Typing into the prompt is ignored by the machine
        assert_eq!(modes.handle(&key('s')), None);
        modes.prompt_succeeded();
        assert_eq!(modes.mode(), InteractionMode::Select);
        assert!(modes.selection_ui_visible());
    }

    #[test]
    fn test_prompt_entered_from_browsing_returns_to_browsing() {
        let mut modes = ModeMachine::new();
        assert_eq!(modes.handle(&key('t')), None);
        assert_eq!(
            modes.handle(&InputEvent::OpenTags),
            Some(Action::OpenTagPrompt)
        );
        assert_eq!(modes.mode(), InteractionMode::TagPrompt);
        assert!(!modes.selection_ui_visible());

        assert_eq!(
            modes.handle(&InputEvent::CancelPrompt),
            Some(Action::CloseTagPrompt)
        );
        assert_eq!(modes.mode(), InteractionMode::Browsing);
    }

    #[test]
    fn test_confirm_keeps_prompt_open() {
        let mut modes = ModeMachine::new();
        modes.handle(&InputEvent::ToggleSelect);
        modes.handle(&InputEvent::OpenTags);
        assert_eq!(
            modes.handle(&InputEvent::ConfirmPrompt),
            Some(Action::SubmitTagPrompt)
        );
        assert_eq!(modes.mode(), InteractionMode::TagPrompt);
    }

    #[test]
    fn test_same_key_differs_by_mode() {
        let mut modes = ModeMachine::new();
        // 'a' means nothing while browsing
        assert_eq!(modes.handle(&key('a')), None);
        modes.handle(&key('s'));
        assert_eq!(modes.handle(&key('a')), Some(Action::SelectAllOrClear));
        assert_eq!(modes.handle(&key('A')), Some(Action::ClearOrSelectAll));

        // Arrows do nothing in select mode
        assert_eq!(modes.handle(&InputEvent::Key(Key::ArrowRight)), None);
    }

    #[test]
    fn test_lightbox_round_trip() {
        let mut modes = ModeMachine::new();
        assert_eq!(
            modes.handle(&InputEvent::OpenMedia(4)),
            Some(Action::ShowMedia(Some(4)))
        );
        assert_eq!(modes.mode(), InteractionMode::Lightbox);
        assert_eq!(
            modes.handle(&InputEvent::Key(Key::ArrowLeft)),
            Some(Action::PrevMedia)
        );
        assert_eq!(modes.handle(&key('i')), Some(Action::ToggleInfoPanel));
        assert_eq!(
            modes.handle(&InputEvent::TagButton("dog".into())),
            Some(Action::AddTagFilter("dog".into()))
        );
        // Select is unreachable from the lightbox
        assert_eq!(modes.handle(&key('s')), None);
        assert_eq!(
            modes.handle(&InputEvent::BackgroundClick),
            Some(Action::CloseLightbox)
        );
        assert_eq!(modes.mode(), InteractionMode::Browsing);

        assert_eq!(
            modes.handle(&InputEvent::Key(Key::ArrowRight)),
            Some(Action::ShowMedia(None))
        );
    }

    #[test]
    fn test_tag_edit_redirects_tag_buttons() {
        let mut modes = ModeMachine::new();
        let tag = InputEvent::TagButton("cat".into());
        assert_eq!(
            modes.handle(&tag),
            Some(Action::CycleTagFilter("cat".into()))
        );

        assert_eq!(modes.handle(&key('e')), Some(Action::EnterTagEdit));
        assert!(modes.tag_edit_active());
        assert_eq!(
            modes.handle(&tag),
            Some(Action::OpenTagEditPrompt("cat".into()))
        );
        assert!(modes.edit_prompt_open());

        // Typing 'e' into the prompt stays in the mode
        assert_eq!(modes.handle(&key('e')), None);
        assert_eq!(
            modes.handle(&InputEvent::RemovePrompt),
            Some(Action::SubmitTagRemoval)
        );
        assert_eq!(
            modes.handle(&InputEvent::CancelPrompt),
            Some(Action::CloseTagEditPrompt)
        );
        assert!(!modes.edit_prompt_open());

        assert_eq!(modes.handle(&key('e')), Some(Action::ExitTagEdit));
        assert_eq!(modes.mode(), InteractionMode::Browsing);
    }

    #[test]
    fn test_tag_edit_from_select_hides_selection() {
        let mut modes = ModeMachine::new();
        modes.handle(&InputEvent::ToggleSelect);
        assert_eq!(
            modes.handle(&InputEvent::ToggleTagEdit),
            Some(Action::EnterTagEdit)
        );
        assert!(!modes.selection_ui_visible());
    }

    #[test]
    fn test_open_lightbox_from_navigation() {
        let mut modes = ModeMachine::new();
        modes.handle(&InputEvent::ToggleSelect);
        modes.open_lightbox();
        assert_eq!(modes.mode(), InteractionMode::Lightbox);
        assert!(!modes.selection_ui_visible());
        assert_eq!(modes.handle(&InputEvent::CloseLightbox), Some(Action::CloseLightbox));
    }

    #[test]
    fn test_reset_clears_prior() {
        let mut modes = ModeMachine::new();
        modes.handle(&InputEvent::ToggleSelect);
        modes.handle(&InputEvent::OpenTags);
        modes.reset();
        assert_eq!(modes.mode(), InteractionMode::Browsing);
        assert!(!modes.selection_ui_visible());
        assert!(!modes.tag_prompt_open());
    }
}
