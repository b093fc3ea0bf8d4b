//! The editor application context
//!
//! One [`Editor`] owns everything a page session needs: the live document,
//! the persistence gateway, the password gate, the synchronizer and the
//! current view. Hosts forward user actions to it and redraw from
//! [`Editor::view`].
//!
//! Every structural mutation follows the same sequence: pull pending view
//! edits into the document, mutate, render, persist. Errors are turned into
//! notifications here before they are returned.

use std::collections::BTreeSet;

use access_gate::AccessGate;
use chrono::{DateTime, Utc};
use content_store::{BlockKind, ContentKey, ContentStore, Document};
use services_notification::Notifier;
use services_persistence::{
    export_file_name, ExportBundle, PersistenceGateway, RemoteSource, WorkoutStats,
};
use services_storage::KeyValueStore;
use tracing::{debug, info, warn};
use uuid::Uuid;
use view_sync::ViewSynchronizer;
use view_types::{EditMode, Layout, ViewError, ViewTree};
use workout_model::{DayId, Exercise, ExerciseId, WorkoutError};

use crate::autosave::AutosaveTimer;
use crate::config::EditorConfig;
use crate::error::{SessionError, SessionResult};
use crate::prompt::{PromptRequest, Prompter};
use crate::session::{EditSession, Transition};

/// Completion of the main program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub checked: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent
    pub percent: u32,
}

impl Progress {
    pub fn new(checked: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0
        } else {
            ((checked * 200 + total) / (total * 2)) as u32
        };
        Self {
            checked,
            total,
            percent,
        }
    }
}

pub struct Editor<N: Notifier, P: Prompter> {
    config: EditorConfig,
    content: ContentStore,
    gateway: PersistenceGateway,
    gate: AccessGate,
    sync: ViewSynchronizer,
    session: EditSession,
    autosave: AutosaveTimer,
    view: ViewTree,
    notifier: N,
    prompter: P,
}

impl<N: Notifier, P: Prompter> Editor<N, P> {
    /// Opens `store`, loads the document and renders the read-only view
    pub fn open(
        config: EditorConfig,
        layout: Layout,
        store: Box<dyn KeyValueStore>,
        remote: Box<dyn RemoteSource>,
        mut notifier: N,
        prompter: P,
    ) -> SessionResult<Self> {
        let gateway = PersistenceGateway::open(store, remote, config.storage.clone(), &mut notifier);
        Self::with_gateway(config, layout, gateway, notifier, prompter)
    }

    /// Starts a session on an already opened gateway
    pub fn with_gateway(
        config: EditorConfig,
        layout: Layout,
        mut gateway: PersistenceGateway,
        mut notifier: N,
        prompter: P,
    ) -> SessionResult<Self> {
        let gate = AccessGate::new(config.credential_key.as_str(), config.default_password.as_str());
        if let Err(e) = gate.init(gateway.store_mut()) {
            warn!(error = %e, "credential could not be initialised");
            notifier.warning("Password storage is unavailable.");
        }

        let document = gateway.load(&mut notifier)?;
        let sync = ViewSynchronizer::new(layout)
            .with_locked_keys(config.locked_keys.iter().cloned())
            .with_editable_pages(config.editable_pages.iter().cloned());

        let mut editor = Self {
            session: EditSession::new(config.mode_switch_policy),
            autosave: AutosaveTimer::new(config.autosave_idle_ms),
            view: ViewTree::new(EditMode::Viewing),
            content: ContentStore::new(document),
            config,
            gateway,
            gate,
            sync,
            notifier,
            prompter,
        };
        editor.rerender();
        info!(
            entries = editor.content.document().len(),
            volatile = editor.gateway.is_volatile(),
            "editor ready"
        );
        Ok(editor)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mode(&self) -> EditMode {
        self.session.mode()
    }

    pub fn view(&self) -> &ViewTree {
        &self.view
    }

    /// Host-side edits of mutable nodes; picked up by the next save
    pub fn view_mut(&mut self) -> &mut ViewTree {
        &mut self.view
    }

    pub fn document(&self) -> &Document {
        self.content.document()
    }

    pub fn gateway(&self) -> &PersistenceGateway {
        &self.gateway
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn prompter_mut(&mut self) -> &mut P {
        &mut self.prompter
    }

    pub fn stats(&self) -> WorkoutStats {
        self.gateway.stats()
    }

    // Mode transitions

    /// Returns `Ok(false)` when the password prompt was cancelled
    pub fn enter_content_mode(&mut self) -> SessionResult<bool> {
        let result = self.enter(EditMode::ContentEditing);
        self.reported(result)
    }

    pub fn exit_content_mode(&mut self) -> SessionResult<()> {
        let result = self.exit(EditMode::ContentEditing);
        self.reported(result)
    }

    /// Returns `Ok(false)` when the password prompt was cancelled
    pub fn enter_program_mode(&mut self) -> SessionResult<bool> {
        let result = self.enter(EditMode::ProgramEditing);
        self.reported(result)
    }

    pub fn exit_program_mode(&mut self) -> SessionResult<()> {
        let result = self.exit(EditMode::ProgramEditing);
        self.reported(result)
    }

    fn enter(&mut self, target: EditMode) -> SessionResult<bool> {
        match self.session.request(target) {
            Transition::AlreadyActive => return Ok(true),
            Transition::Refuse { active } => return Err(SessionError::ModeConflict { active }),
            Transition::Switch { from } => {
                self.flush()?;
                info!(from = %from, to = %target, "switching edit mode");
            }
            Transition::Unlock => {
                let Some(password) = self
                    .prompter
                    .prompt(&PromptRequest::password("Enter the editor password"))
                else {
                    debug!(mode = %target, "password prompt cancelled");
                    return Ok(false);
                };
                if !self.gate.verify(self.gateway.store_mut(), &password)? {
                    return Err(SessionError::AuthFailed);
                }
            }
        }

        self.session.set_mode(target);
        self.rerender();
        self.notifier.success(match target {
            EditMode::ProgramEditing => "Program editing enabled",
            _ => "Content editing enabled",
        });
        Ok(true)
    }

    /// Leaves `expected` even when the final save fails
    fn exit(&mut self, expected: EditMode) -> SessionResult<()> {
        self.session.require(expected)?;
        let saved = self.flush();
        self.session.set_mode(EditMode::Viewing);
        self.rerender();
        saved?;
        self.notifier.success("Changes saved");
        Ok(())
    }

    // Content mutations

    /// Prompts for the text of a new block on `page`
    ///
    /// Returns `Ok(None)` when the prompt was cancelled.
    pub fn add_block(
        &mut self,
        page: &str,
        kind: BlockKind,
        now_ms: u64,
    ) -> SessionResult<Option<ContentKey>> {
        let result = self.add_block_inner(page, kind, now_ms);
        self.reported(result)
    }

    fn add_block_inner(
        &mut self,
        page: &str,
        kind: BlockKind,
        now_ms: u64,
    ) -> SessionResult<Option<ContentKey>> {
        self.session.require(EditMode::ContentEditing)?;
        if self.sync.layout().page(page).is_none() || !self.sync.is_editable_page(page) {
            return Err(SessionError::UnknownPage(page.to_string()));
        }

        let label = match kind {
            BlockKind::Paragraph => "Paragraph text",
            BlockKind::Heading => "Heading text",
        };
        let Some(text) = self.prompter.prompt(&PromptRequest::text(label)) else {
            return Ok(None);
        };
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        self.pull_view_edits();
        let key = self.content.add_fragment(page, kind, text, now_ms);
        self.rerender();
        self.persist()?;
        self.notifier.success("Block added");
        Ok(Some(key))
    }

    /// Prompts with the current text of `key` and replaces it
    ///
    /// Returns `Ok(false)` when cancelled or left blank.
    pub fn edit_block(&mut self, key: &str) -> SessionResult<bool> {
        let result = self.edit_block_inner(key);
        self.reported(result)
    }

    fn edit_block_inner(&mut self, key: &str) -> SessionResult<bool> {
        self.session.require(EditMode::ContentEditing)?;
        let node = self
            .view
            .fragment(key)
            .ok_or_else(|| ViewError::UnknownKey(key.to_string()))?;
        if !node.editable {
            return Err(ViewError::NotEditable(key.to_string()).into());
        }

        let request = PromptRequest::text("Edit block").with_initial(node.html.clone());
        let Some(text) = self.prompter.prompt(&request) else {
            return Ok(false);
        };
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }

        self.pull_view_edits();
        self.content.set_fragment(key, text)?;
        self.rerender();
        self.persist()?;
        Ok(true)
    }

    /// Deletes a fragment or a whole block after confirmation
    pub fn delete_block(&mut self, key: &str) -> SessionResult<bool> {
        let result = self.delete_block_inner(key);
        self.reported(result)
    }

    fn delete_block_inner(&mut self, key: &str) -> SessionResult<bool> {
        self.session.require(EditMode::ContentEditing)?;
        let mut view = self.view.clone();
        view.unmount(key)?;
        if !self.prompter.confirm("Delete this block?") {
            return Ok(false);
        }

        let document = self.sync.extract(&view, self.content.document());
        self.content.replace(document);
        self.rerender();
        self.persist()?;
        self.notifier.info("Block deleted");
        Ok(true)
    }

    // Program mutations

    /// Prompts for a day name and appends the day to `schedule`
    ///
    /// Returns `Ok(None)` when the prompt was cancelled.
    pub fn add_day(&mut self, schedule: &str) -> SessionResult<Option<DayId>> {
        let result = self.add_day_inner(schedule);
        self.reported(result)
    }

    fn add_day_inner(&mut self, schedule: &str) -> SessionResult<Option<DayId>> {
        self.session.require(EditMode::ProgramEditing)?;
        if self.view.schedule(schedule).is_none() {
            return Err(SessionError::UnknownSchedule(schedule.to_string()));
        }
        let Some(name) = self.prompter.prompt(&PromptRequest::text("Day name")) else {
            return Ok(None);
        };
        if name.trim().is_empty() {
            return Err(WorkoutError::EmptyDayName.into());
        }

        self.pull_view_edits();
        let id = self.content.ensure_schedule(schedule)?.add_day(&name)?;
        self.rerender();
        self.persist()?;
        self.notifier.success("Day added");
        Ok(Some(id))
    }

    /// Appends a placeholder exercise to `day`
    pub fn add_exercise(&mut self, day: DayId) -> SessionResult<ExerciseId> {
        let result = self.add_exercise_inner(day);
        self.reported(result)
    }

    fn add_exercise_inner(&mut self, day: DayId) -> SessionResult<ExerciseId> {
        self.session.require(EditMode::ProgramEditing)?;
        let schedule = self.schedule_of(day)?;

        self.pull_view_edits();
        let id = self
            .content
            .schedule_mut(schedule.as_str())?
            .add_exercise(day, &self.config.placeholder)?;
        self.rerender();
        self.persist()?;
        self.notifier.info("Exercise added");
        Ok(id)
    }

    /// Deletes the row shown at `position` in `day`
    ///
    /// The row is resolved before pending edits are pulled, so a partially
    /// filled row above it cannot shift the target. Returns `None` when the
    /// row was itself incomplete and dropped by the pull.
    pub fn delete_exercise_row(
        &mut self,
        day: DayId,
        position: usize,
    ) -> SessionResult<Option<Exercise>> {
        let result = self.delete_exercise_row_inner(day, position);
        self.reported(result)
    }

    fn delete_exercise_row_inner(
        &mut self,
        day: DayId,
        position: usize,
    ) -> SessionResult<Option<Exercise>> {
        self.session.require(EditMode::ProgramEditing)?;
        let schedule = self.schedule_of(day)?;
        let target = self
            .view
            .day(day)
            .and_then(|d| d.rows.get(position))
            .map(|row| row.id)
            .ok_or(WorkoutError::RowNotFound { day, position })?;

        self.pull_view_edits();
        let data = self.content.schedule_mut(schedule.as_str())?;
        let index = data
            .day(day)
            .and_then(|d| d.exercises.iter().position(|e| e.id == target));
        let removed = match index {
            Some(index) => Some(data.delete_exercise_row(day, index)?),
            None => None,
        };
        self.rerender();
        self.persist()?;
        self.notifier.info("Exercise deleted");
        Ok(removed)
    }

    /// Deletes `day` after confirmation
    pub fn delete_day(&mut self, day: DayId) -> SessionResult<bool> {
        let result = self.delete_day_inner(day);
        self.reported(result)
    }

    fn delete_day_inner(&mut self, day: DayId) -> SessionResult<bool> {
        self.session.require(EditMode::ProgramEditing)?;
        let schedule = self.schedule_of(day)?;
        let name = self
            .view
            .day(day)
            .map(|d| d.name.clone())
            .unwrap_or_default();
        if !self.prompter.confirm(&format!("Delete day \"{name}\"?")) {
            return Ok(false);
        }

        self.pull_view_edits();
        let data = self.content.schedule_mut(schedule.as_str())?;
        if data.day(day).is_some() {
            data.delete_day(day)?;
        }
        self.rerender();
        self.persist()?;
        self.notifier.info("Day deleted");
        Ok(true)
    }

    // Autosave

    /// Records an edit in the view; arms the autosave timer while editing
    pub fn note_input(&mut self, now_ms: u64) {
        if self.session.mode().is_editing() {
            self.autosave.note_input(now_ms);
        }
    }

    /// Saves once the idle window has elapsed; returns whether it did
    pub fn tick(&mut self, now_ms: u64) -> SessionResult<bool> {
        if !self.autosave.poll(now_ms) || !self.session.mode().is_editing() {
            return Ok(false);
        }
        let result = self.flush();
        self.reported(result)?;
        debug!(now_ms, "autosaved");
        Ok(true)
    }

    pub fn on_visibility_hidden(&mut self) -> SessionResult<()> {
        self.flush_if_editing()
    }

    pub fn on_unload(&mut self) -> SessionResult<()> {
        self.flush_if_editing()
    }

    fn flush_if_editing(&mut self) -> SessionResult<()> {
        if !self.session.mode().is_editing() {
            return Ok(());
        }
        let result = self.flush();
        self.reported(result)
    }

    // Completion tracking

    /// Marks or unmarks an exercise; allowed in every mode
    pub fn toggle_completion(&mut self, exercise: ExerciseId, checked: bool) -> SessionResult<()> {
        let result = self.toggle_completion_inner(exercise, checked);
        self.reported(result)
    }

    fn toggle_completion_inner(&mut self, exercise: ExerciseId, checked: bool) -> SessionResult<()> {
        self.view.toggle_completion(exercise, checked)?;
        self.gateway.set_mark(&exercise.mark_id(), checked)?;
        Ok(())
    }

    /// Unchecks every exercise of the main program and counts the cycle
    pub fn reset_progress(&mut self, now: DateTime<Utc>) -> SessionResult<WorkoutStats> {
        let result = self.reset_progress_inner(now);
        self.reported(result)
    }

    fn reset_progress_inner(&mut self, now: DateTime<Utc>) -> SessionResult<WorkoutStats> {
        self.pull_view_edits();
        let ids: Vec<String> = self
            .content
            .schedule(&self.config.main_schedule)
            .map(|data| data.exercises().map(|e| e.id.mark_id()).collect())
            .unwrap_or_default();
        for id in &ids {
            self.gateway.set_mark(id, false)?;
        }
        let stats = self.gateway.record_reset(now)?;
        self.rerender();
        info!(cleared = ids.len(), total = stats.total_workouts, "progress reset");
        self.notifier.success("Progress reset. Good luck with the next cycle!");
        Ok(stats)
    }

    pub fn progress(&self) -> Progress {
        let rows = self
            .view
            .schedule(&self.config.main_schedule)
            .map(|s| s.days.iter().flat_map(|d| d.rows.iter()).collect::<Vec<_>>())
            .unwrap_or_default();
        Progress::new(rows.iter().filter(|r| r.checked).count(), rows.len())
    }

    // Import and export

    /// Bundle of the saved document and the marks; pending edits are saved first
    pub fn export_snapshot(&mut self, now: DateTime<Utc>) -> SessionResult<ExportBundle> {
        let result = self.export_snapshot_inner(now);
        self.reported(result)
    }

    fn export_snapshot_inner(&mut self, now: DateTime<Utc>) -> SessionResult<ExportBundle> {
        if self.session.mode().is_editing() {
            self.flush()?;
        }
        Ok(self.gateway.export_snapshot(now)?)
    }

    /// Pretty-printed bundle, ready to be offered as a download
    pub fn export_json(&mut self, now: DateTime<Utc>) -> SessionResult<String> {
        let bundle = self.export_snapshot(now)?;
        let result = bundle
            .to_json()
            .map_err(|e| SessionError::Save(e.into()));
        let json = self.reported(result)?;
        self.notifier.success("Data exported");
        Ok(json)
    }

    pub fn export_file_name(&self, now: DateTime<Utc>) -> String {
        export_file_name(now)
    }

    /// Replaces the document (and marks, when present) from a backup file
    pub fn import_snapshot_json(&mut self, text: &str) -> SessionResult<()> {
        let result = self.import_inner(text);
        self.reported(result)
    }

    fn import_inner(&mut self, text: &str) -> SessionResult<()> {
        let document = self.gateway.import_json(text)?;
        self.content.replace(document);
        self.autosave.cancel();
        self.rerender();
        self.notifier.success("Data imported");
        Ok(())
    }

    // Credentials

    pub fn change_password(&mut self, current: &str, new_password: &str) -> SessionResult<()> {
        let result = self.change_password_inner(current, new_password);
        self.reported(result)
    }

    fn change_password_inner(&mut self, current: &str, new_password: &str) -> SessionResult<()> {
        if new_password.is_empty() {
            return Err(SessionError::EmptyInput);
        }
        if !self
            .gate
            .change_password(self.gateway.store_mut(), current, new_password)?
        {
            return Err(SessionError::AuthFailed);
        }
        self.notifier.success("Password changed");
        Ok(())
    }

    // Internals

    fn reported<T>(&mut self, result: SessionResult<T>) -> SessionResult<T> {
        if let Err(e) = &result {
            warn!(error = %e, mode = %self.session.mode(), "editor operation failed");
            self.notifier.notify(e.level(), &e.user_message());
        }
        result
    }

    /// Writes mounted edits back into the document
    fn pull_view_edits(&mut self) {
        if self.session.mode().is_editing() {
            let document = self.sync.extract(&self.view, self.content.document());
            self.content.replace(document);
        }
    }

    fn persist(&mut self) -> SessionResult<()> {
        self.gateway.save(self.content.document())?;
        Ok(())
    }

    fn flush(&mut self) -> SessionResult<()> {
        self.autosave.cancel();
        self.pull_view_edits();
        self.persist()
    }

    fn rerender(&mut self) {
        let checked = self.checked_exercises();
        let revision = self.view.revision + 1;
        self.view = self
            .sync
            .render_with_marks(self.content.document(), self.session.mode(), &checked)
            .with_revision(revision);
    }

    fn checked_exercises(&self) -> BTreeSet<ExerciseId> {
        match self.gateway.marks() {
            Ok(marks) => marks
                .into_iter()
                .filter(|(_, checked)| *checked)
                .filter_map(|(id, _)| Uuid::parse_str(&id).ok())
                .map(ExerciseId::from_uuid)
                .collect(),
            Err(e) => {
                warn!(error = %e, "completion marks unreadable");
                BTreeSet::new()
            }
        }
    }

    fn schedule_of(&self, day: DayId) -> SessionResult<ContentKey> {
        self.view
            .schedules()
            .find(|s| s.days.iter().any(|d| d.id == day))
            .map(|s| s.key.clone())
            .ok_or_else(|| ViewError::UnknownDay(day).into())
    }
}
