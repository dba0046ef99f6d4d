//! The session state machine.
//!
//! [`Session`] owns the [`SessionState`] and applies intents as transitions.
//! Transitions never perform I/O: anything that has to happen outside the
//! state machine is returned as an [`Effect`] for the runtime to execute.

use tracing::{debug, info, warn};

use crate::commit::{CommitCandidate, GenerationRequest};
use crate::config::SessionOptions;
use crate::error::GenerationError;
use crate::git::Git;
use crate::session::{
    ConfirmationGate, Direction, Editor, Effect, Epoch, Intent, Selector, SessionState,
};

const NOT_A_REPOSITORY: &str = "Not in a git repository";

#[derive(Debug)]
pub struct Session {
    options: SessionOptions,
    state: SessionState,
    epoch: Epoch,
    request: Option<GenerationRequest>,
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            state: SessionState::Loading,
            epoch: Epoch::default(),
            request: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Epoch of the current (or last) generation round.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Begin the first round for `diff`. The request is reused by every refresh.
    pub fn start(&mut self, diff: impl Into<String>) -> Effect {
        self.request = Some(GenerationRequest::new(diff, self.options.count));
        self.begin_round()
    }

    /// End the session with an error unless it already ended.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.state.is_terminal() {
            return;
        }
        let message = message.into();
        warn!("Session failed: {}", message);
        self.state = SessionState::Error(message);
    }

    /// Accept the result of a generation round.
    ///
    /// Returns false when the result was discarded: no round has been
    /// started yet, the epoch is older than the current round, or the
    /// session is no longer loading.
    pub fn on_generated(
        &mut self,
        epoch: Epoch,
        result: Result<Vec<CommitCandidate>, GenerationError>,
    ) -> bool {
        if self.request.is_none()
            || epoch != self.epoch
            || !matches!(self.state, SessionState::Loading)
        {
            debug!(
                "Discarding generation result {} (current {}, state {})",
                epoch,
                self.epoch,
                self.state.name()
            );
            return false;
        }

        self.state = match result {
            Ok(candidates) => match Selector::new(candidates.len()) {
                Some(selector) => {
                    info!("Generated {} commit messages", candidates.len());
                    SessionState::Browsing {
                        candidates,
                        selector,
                    }
                }
                None => SessionState::Error("No commit messages were generated".to_string()),
            },
            Err(e) => SessionState::Error(e.to_string()),
        };
        true
    }

    /// Apply one intent and return the effect the runtime must perform.
    pub fn apply(&mut self, intent: Intent) -> Effect {
        if self.state.is_terminal() {
            return Effect::None;
        }

        if intent == Intent::Quit {
            debug!("Quit from {}", self.state.name());
            self.state = SessionState::Done;
            return Effect::Exit;
        }

        if intent == Intent::Refresh && matches!(self.state, SessionState::Browsing { .. }) {
            return self.begin_round();
        }

        let state = std::mem::replace(&mut self.state, SessionState::Done);
        let (next, effect) = self.transition(state, intent);
        self.state = next;
        effect
    }

    fn begin_round(&mut self) -> Effect {
        let Some(request) = self.request.clone() else {
            return Effect::None;
        };
        // Candidates of the previous round are dropped here.
        self.state = SessionState::Loading;
        self.epoch = self.epoch.next();
        Effect::Generate {
            epoch: self.epoch,
            request,
        }
    }

    fn transition(&self, state: SessionState, intent: Intent) -> (SessionState, Effect) {
        match state {
            SessionState::Browsing {
                candidates,
                selector,
            } => self.browse(candidates, selector, intent),
            SessionState::Editing { draft, editor } => self.edit(draft, editor, intent),
            SessionState::Confirming { pending, gate } => self.confirm(pending, gate, intent),
            state => (state, Effect::None),
        }
    }

    fn browse(
        &self,
        candidates: Vec<CommitCandidate>,
        mut selector: Selector,
        intent: Intent,
    ) -> (SessionState, Effect) {
        match intent {
            Intent::Next => {
                selector.advance(Direction::Next);
            }
            Intent::Previous => {
                selector.advance(Direction::Previous);
            }
            Intent::Activate => {
                if let Some(selected) = selector.activate(&candidates).cloned() {
                    return self.select(selected);
                }
            }
            _ => {}
        }
        (
            SessionState::Browsing {
                candidates,
                selector,
            },
            Effect::None,
        )
    }

    /// Route an activated candidate to the editor, the gate or straight to commit.
    fn select(&self, selected: CommitCandidate) -> (SessionState, Effect) {
        debug!("Selected: {}", selected.subject);
        if self.options.edit {
            let editor = Editor::new(&selected.subject);
            (
                SessionState::Editing {
                    draft: selected,
                    editor,
                },
                Effect::None,
            )
        } else {
            self.finish(selected)
        }
    }

    fn edit(&self, draft: CommitCandidate, mut editor: Editor, intent: Intent) -> (SessionState, Effect) {
        match intent {
            Intent::Change(value) => editor.change(value),
            Intent::Type(request) => editor.apply(request),
            Intent::Activate => {
                let pending = draft.with_subject(editor.submit());
                if pending.has_subject() {
                    return self.finish(pending);
                }
                debug!("Ignoring submit with an empty subject");
            }
            _ => {}
        }
        (SessionState::Editing { draft, editor }, Effect::None)
    }

    fn confirm(
        &self,
        pending: CommitCandidate,
        mut gate: ConfirmationGate,
        intent: Intent,
    ) -> (SessionState, Effect) {
        match intent {
            Intent::Toggle => gate.toggle(),
            Intent::Activate => {
                return if gate.submit() {
                    (SessionState::Done, Effect::Commit(pending))
                } else {
                    info!("Commit declined");
                    (SessionState::Done, Effect::Exit)
                };
            }
            _ => {}
        }
        (SessionState::Confirming { pending, gate }, Effect::None)
    }

    /// Ask for confirmation when enabled, otherwise commit.
    fn finish(&self, pending: CommitCandidate) -> (SessionState, Effect) {
        if self.options.confirmation {
            (
                SessionState::Confirming {
                    pending,
                    gate: ConfirmationGate::default(),
                },
                Effect::None,
            )
        } else {
            (SessionState::Done, Effect::Commit(pending))
        }
    }
}

/// Check the repository and load the staged diff, then start the first round.
///
/// Failures move the session to `Error` and return [`Effect::None`].
pub async fn prepare<G: Git + ?Sized>(session: &mut Session, git: &G) -> Effect {
    if !git.is_in_repository().await {
        session.fail(NOT_A_REPOSITORY);
        return Effect::None;
    }

    match git.staged_diff().await {
        Ok(diff) => {
            debug!("Staged diff: {} bytes", diff.len());
            session.start(diff)
        }
        Err(e) => {
            session.fail(e.to_string());
            Effect::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShellError;
    use crate::git::MockGit;
    use tui_input::InputRequest;

    fn candidates() -> Vec<CommitCandidate> {
        vec![
            CommitCandidate::new("feat: first", "- one"),
            CommitCandidate::new("fix: second", ""),
            CommitCandidate::new("docs: third", "- three"),
        ]
    }

    fn options(edit: bool, confirmation: bool) -> SessionOptions {
        SessionOptions::new(edit, confirmation, 3).unwrap()
    }

    /// A session already browsing the standard candidates.
    fn browsing(edit: bool, confirmation: bool) -> Session {
        let mut session = Session::new(options(edit, confirmation));
        let Effect::Generate { epoch, .. } = session.start("+diff\n") else {
            panic!("start must request generation");
        };
        assert!(session.on_generated(epoch, Ok(candidates())));
        session
    }

    fn selected_index(session: &Session) -> usize {
        match session.state() {
            SessionState::Browsing { selector, .. } => selector.selected(),
            other => panic!("Expected Browsing, got {other:?}"),
        }
    }

    #[test]
    fn start_enters_loading_with_request() {
        let mut session = Session::new(options(true, true));
        match session.start("+line\n") {
            Effect::Generate { epoch, request } => {
                assert_eq!(epoch, session.epoch());
                assert_eq!(request.diff, "+line\n");
                assert_eq!(request.count, 3);
            }
            other => panic!("Expected Generate, got {other:?}"),
        }
        assert!(matches!(session.state(), SessionState::Loading));
    }

    #[test]
    fn success_enters_browsing_at_first_candidate() {
        let session = browsing(true, true);
        assert_eq!(selected_index(&session), 0);
    }

    #[test]
    fn failure_enters_error() {
        let mut session = Session::new(options(true, true));
        let Effect::Generate { epoch, .. } = session.start("+x\n") else {
            panic!("start must request generation");
        };
        session.on_generated(
            epoch,
            Err(GenerationError::Backend("HTTP 401".to_string())),
        );
        match session.state() {
            SessionState::Error(message) => assert!(message.contains("HTTP 401")),
            other => panic!("Expected Error, got {other:?}"),
        }
        assert_eq!(session.apply(Intent::Activate), Effect::None);
    }

    #[test]
    fn empty_result_enters_error() {
        let mut session = Session::new(options(true, true));
        let Effect::Generate { epoch, .. } = session.start("+x\n") else {
            panic!("start must request generation");
        };
        session.on_generated(epoch, Ok(Vec::new()));
        assert!(matches!(session.state(), SessionState::Error(_)));
    }

    #[test]
    fn navigation_is_cyclic() {
        let mut session = browsing(true, true);
        session.apply(Intent::Previous);
        assert_eq!(selected_index(&session), 2);
        session.apply(Intent::Next);
        assert_eq!(selected_index(&session), 0);
    }

    #[test]
    fn refresh_clears_candidates_and_bumps_epoch() {
        let mut session = browsing(true, true);
        let before = session.epoch();

        match session.apply(Intent::Refresh) {
            Effect::Generate { epoch, request } => {
                assert!(epoch > before);
                assert_eq!(request.diff, "+diff\n");
            }
            other => panic!("Expected Generate, got {other:?}"),
        }
        assert!(matches!(session.state(), SessionState::Loading));
    }

    #[test]
    fn stale_result_is_discarded() {
        let mut session = browsing(true, true);
        let old = session.epoch();
        session.apply(Intent::Refresh);

        assert!(!session.on_generated(old, Ok(candidates())));
        assert!(matches!(session.state(), SessionState::Loading));

        let current = session.epoch();
        assert!(session.on_generated(current, Ok(candidates())));
        assert!(matches!(session.state(), SessionState::Browsing { .. }));
    }

    #[test]
    fn result_before_first_round_is_discarded() {
        let mut session = Session::new(options(false, false));
        let ghost = vec![CommitCandidate::new("feat: ghost", "")];

        assert!(!session.on_generated(Epoch::default(), Ok(ghost)));
        assert!(matches!(session.state(), SessionState::Loading));

        let Effect::Generate { epoch, .. } = session.start("+x\n") else {
            panic!("start must request generation");
        };
        assert!(session.on_generated(epoch, Ok(candidates())));
        assert!(matches!(session.state(), SessionState::Browsing { .. }));
    }

    #[test]
    fn refresh_outside_browsing_is_ignored() {
        let mut session = browsing(false, true);
        session.apply(Intent::Activate);
        assert_eq!(session.apply(Intent::Refresh), Effect::None);
        assert!(matches!(session.state(), SessionState::Confirming { .. }));
    }

    #[test]
    fn edit_then_confirm_commits_edited_subject() {
        let mut session = browsing(true, true);
        session.apply(Intent::Next);
        session.apply(Intent::Activate);

        match session.state() {
            SessionState::Editing { editor, draft } => {
                assert_eq!(editor.value(), "fix: second");
                assert_eq!(draft.subject, "fix: second");
            }
            other => panic!("Expected Editing, got {other:?}"),
        }

        session.apply(Intent::Change("fix: second, properly".to_string()));
        assert_eq!(session.apply(Intent::Activate), Effect::None);
        match session.state() {
            SessionState::Confirming { pending, gate } => {
                assert_eq!(pending.subject, "fix: second, properly");
                assert!(gate.accepted());
            }
            other => panic!("Expected Confirming, got {other:?}"),
        }

        let effect = session.apply(Intent::Activate);
        assert_eq!(
            effect,
            Effect::Commit(CommitCandidate::new("fix: second, properly", ""))
        );
        assert!(matches!(session.state(), SessionState::Done));
    }

    #[test]
    fn edit_without_confirmation_commits_on_submit() {
        let mut session = browsing(true, false);
        session.apply(Intent::Activate);
        session.apply(Intent::Type(InputRequest::InsertChar('!')));

        let effect = session.apply(Intent::Activate);
        assert_eq!(
            effect,
            Effect::Commit(CommitCandidate::new("feat: first!", "- one"))
        );
        assert!(matches!(session.state(), SessionState::Done));
    }

    #[test]
    fn no_edit_with_confirmation_goes_to_gate() {
        let mut session = browsing(false, true);
        session.apply(Intent::Next);
        session.apply(Intent::Next);
        session.apply(Intent::Activate);
        match session.state() {
            SessionState::Confirming { pending, .. } => assert_eq!(pending.subject, "docs: third"),
            other => panic!("Expected Confirming, got {other:?}"),
        }
    }

    #[test]
    fn no_edit_no_confirmation_commits_immediately() {
        let mut session = browsing(false, false);
        let effect = session.apply(Intent::Activate);
        assert_eq!(effect, Effect::Commit(candidates()[0].clone()));
        assert!(matches!(session.state(), SessionState::Done));
    }

    #[test]
    fn no_edit_no_confirmation_commits_activated_index() {
        let mut session = browsing(false, false);
        session.apply(Intent::Next);
        let effect = session.apply(Intent::Activate);
        assert_eq!(effect, Effect::Commit(candidates()[1].clone()));
        assert!(matches!(session.state(), SessionState::Done));
    }

    #[test]
    fn edited_first_candidate_reaches_gate_with_submitted_subject() {
        let mut session = browsing(true, true);
        session.apply(Intent::Activate);
        match session.state() {
            SessionState::Editing { editor, .. } => assert_eq!(editor.value(), "feat: first"),
            other => panic!("Expected Editing, got {other:?}"),
        }

        session.apply(Intent::Change("fix: correct off-by-one".to_string()));
        session.apply(Intent::Activate);
        match session.state() {
            SessionState::Confirming { pending, .. } => {
                assert_eq!(pending.subject, "fix: correct off-by-one")
            }
            other => panic!("Expected Confirming, got {other:?}"),
        }

        assert_eq!(
            session.apply(Intent::Activate),
            Effect::Commit(CommitCandidate::new("fix: correct off-by-one", "- one"))
        );
        assert!(matches!(session.state(), SessionState::Done));
    }

    #[test]
    fn declining_exits_without_commit() {
        let mut session = browsing(false, true);
        session.apply(Intent::Activate);
        session.apply(Intent::Toggle);

        assert_eq!(session.apply(Intent::Activate), Effect::Exit);
        assert!(matches!(session.state(), SessionState::Done));
    }

    #[test]
    fn double_toggle_still_commits() {
        let mut session = browsing(false, true);
        session.apply(Intent::Activate);
        session.apply(Intent::Toggle);
        session.apply(Intent::Toggle);

        assert!(matches!(session.apply(Intent::Activate), Effect::Commit(_)));
    }

    #[test]
    fn empty_subject_submit_is_ignored() {
        let mut session = browsing(true, true);
        session.apply(Intent::Activate);
        session.apply(Intent::Change("   ".to_string()));

        assert_eq!(session.apply(Intent::Activate), Effect::None);
        assert!(matches!(session.state(), SessionState::Editing { .. }));
    }

    #[test]
    fn quit_ends_session_from_any_live_state() {
        let mut loading = Session::new(options(true, true));
        loading.start("+x\n");
        assert_eq!(loading.apply(Intent::Quit), Effect::Exit);
        assert!(matches!(loading.state(), SessionState::Done));

        let mut editing = browsing(true, true);
        editing.apply(Intent::Activate);
        assert_eq!(editing.apply(Intent::Quit), Effect::Exit);

        // Nothing happens after the session has ended.
        assert_eq!(editing.apply(Intent::Quit), Effect::None);
    }

    #[test]
    fn late_result_after_quit_is_discarded() {
        let mut session = Session::new(options(true, true));
        let Effect::Generate { epoch, .. } = session.start("+x\n") else {
            panic!("start must request generation");
        };
        session.apply(Intent::Quit);
        assert!(!session.on_generated(epoch, Ok(candidates())));
        assert!(matches!(session.state(), SessionState::Done));
    }

    #[tokio::test]
    async fn prepare_outside_repository_fails() {
        let mut git = MockGit::new();
        git.expect_is_in_repository().times(1).returning(|| false);
        git.expect_staged_diff().times(0);

        let mut session = Session::new(options(true, true));
        assert_eq!(prepare(&mut session, &git).await, Effect::None);
        match session.state() {
            SessionState::Error(message) => assert_eq!(message, NOT_A_REPOSITORY),
            other => panic!("Expected Error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn prepare_diff_failure_fails() {
        let mut git = MockGit::new();
        git.expect_is_in_repository().returning(|| true);
        git.expect_staged_diff().returning(|| Err(ShellError::NotInstalled));

        let mut session = Session::new(options(true, true));
        prepare(&mut session, &git).await;
        assert!(matches!(session.state(), SessionState::Error(_)));
    }

    #[tokio::test]
    async fn prepare_starts_first_round() {
        let mut git = MockGit::new();
        git.expect_is_in_repository().returning(|| true);
        git.expect_staged_diff()
            .returning(|| Ok("+staged\n".to_string()));

        let mut session = Session::new(options(true, true));
        let effect = prepare(&mut session, &git).await;
        assert!(matches!(effect, Effect::Generate { ref request, .. } if request.diff == "+staged\n"));
    }
}
