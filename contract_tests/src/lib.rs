//! # Editor Contract Tests
//!
//! Cross-crate tests pinning the behaviour the site relies on: the
//! document and bundle wire formats, render/extract round trips, schedule
//! edits, the password gate and whole editing sessions.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: Wire formats are written out as JSON literals
//! - **Testability first**: A contract test fails when a format or flow drifts
//! - **Whole flows**: Sessions run through [`editor_core::Editor`] with scripted hosts
//!
//! ## Structure
//!
//! - `sync`: render/extract properties and garbage collection
//! - `schedule`: workout model edits addressed by id and by name
//! - `persistence`: document, mark and bundle formats; import rejection
//! - `access`: credential stability across reloads
//! - `session`: end-to-end editor scenarios

pub mod access;
pub mod persistence;
pub mod schedule;
pub mod session;
pub mod sync;

/// Common fixtures for contract tests
pub mod test_helpers {
    use content_store::Document;
    use editor_core::{Editor, EditorConfig, ScriptedPrompter};
    use services_notification::NotificationService;
    use services_persistence::{Offline, PersistenceGateway};
    use services_storage::KeyValueStore;
    use view_types::{EditMode, Layout, PageLayout};

    pub type TestEditor = Editor<NotificationService, ScriptedPrompter>;

    /// One content page and one schedule page
    pub fn scenario_layout() -> Layout {
        Layout::new()
            .with_page(PageLayout::new("home").with_fragment("title", "h1"))
            .with_page(PageLayout::new("plan").with_schedule("workout_data", None))
    }

    pub fn scenario_config() -> EditorConfig {
        EditorConfig {
            locked_keys: Vec::new(),
            editable_pages: vec!["home".to_string()],
            ..EditorConfig::default()
        }
    }

    pub fn document(json: &str) -> Document {
        Document::from_json(json).expect("fixture document")
    }

    /// Opens an editor on `store`, falling back to `defaults`
    pub fn open_editor(store: Box<dyn KeyValueStore>, defaults: Document) -> TestEditor {
        let config = scenario_config();
        let mut notifier = NotificationService::new();
        let gateway = PersistenceGateway::open(
            store,
            Box::new(Offline),
            config.storage.clone(),
            &mut notifier,
        )
        .with_defaults(Some(defaults));
        Editor::with_gateway(
            config,
            scenario_layout(),
            gateway,
            notifier,
            ScriptedPrompter::new(),
        )
        .expect("editor opens")
    }

    /// Enters `mode` with the default password
    pub fn unlock(editor: &mut TestEditor, mode: EditMode) {
        editor.prompter_mut().answer("admin");
        let entered = match mode {
            EditMode::ProgramEditing => editor.enter_program_mode(),
            _ => editor.enter_content_mode(),
        };
        assert!(entered.expect("mode entered"), "password prompt cancelled");
        assert_eq!(editor.mode(), mode);
    }

    /// The document as last written to the store
    pub fn stored_document(editor: &TestEditor) -> Option<Document> {
        let key = editor.gateway().keys().content.clone();
        editor
            .gateway()
            .store()
            .get(&key)
            .expect("store readable")
            .map(|json| Document::from_json(&json).expect("stored document parses"))
    }
}
