//! Render/extract contract tests
//!
//! Extraction of a fresh render must reproduce the document, in every mode,
//! and keys whose nodes are gone must not survive an extraction.

#[cfg(test)]
mod tests {
    use content_store::{BlockKind, ContentStore, Document};
    use proptest::prelude::*;
    use view_sync::ViewSynchronizer;
    use view_types::{EditMode, Layout};
    use workout_model::{Day, Exercise, WorkoutData};

    use crate::test_helpers::*;

    const MODES: [EditMode; 3] = [
        EditMode::Viewing,
        EditMode::ContentEditing,
        EditMode::ProgramEditing,
    ];

    const STATIC_KEYS: [&str; 8] = [
        "start_title",
        "start_p1",
        "guidelines_rest_title",
        "guidelines_rest_p1",
        "advice_sleep_p1",
        "faq_q1",
        "faq_a1",
        "heavy_duty_title",
    ];

    const PAGES: [&str; 5] = ["start", "guidelines", "advice", "faq", "program"];

    fn site_sync() -> ViewSynchronizer {
        ViewSynchronizer::new(Layout::workout_site())
    }

    fn arb_exercise() -> impl Strategy<Value = Exercise> {
        ("[A-Za-z][A-Za-z ]{0,10}[a-z]", "[1-9]", "[1-9]{1,2}(-[1-9]{1,2})?")
            .prop_map(|(name, sets, reps)| Exercise::new(name, sets, reps))
    }

    fn arb_day() -> impl Strategy<Value = Day> {
        ("[A-Za-z]{1,10}", prop::collection::vec(arb_exercise(), 0..4)).prop_map(
            |(name, exercises)| {
                let mut day = Day::new(name);
                day.exercises = exercises;
                day
            },
        )
    }

    fn arb_schedule() -> impl Strategy<Value = WorkoutData> {
        prop::collection::vec(arb_day(), 0..4).prop_map(|days| WorkoutData { days })
    }

    /// Documents whose every key has a mount point in the site layout
    fn arb_document() -> impl Strategy<Value = Document> {
        (
            prop::collection::btree_map(
                prop::sample::select(STATIC_KEYS.to_vec()),
                "[ -~]{0,40}",
                0..STATIC_KEYS.len(),
            ),
            prop::collection::vec(
                (prop::sample::select(PAGES.to_vec()), any::<bool>(), "[ -~]{0,40}"),
                0..4,
            ),
            prop::option::of(arb_schedule()),
            prop::option::of(arb_schedule()),
        )
            .prop_map(|(statics, dynamics, main, auxiliary)| {
                let mut store = ContentStore::new(Document::new());
                for (key, html) in statics {
                    store.document_mut().insert(key, html);
                }
                for (i, (page, heading, html)) in dynamics.into_iter().enumerate() {
                    let kind = if heading {
                        BlockKind::Heading
                    } else {
                        BlockKind::Paragraph
                    };
                    store.add_fragment(page, kind, html, 1_700_000_000_000 + i as u64);
                }
                if let Some(main) = main {
                    store.document_mut().insert("workout_data", main);
                }
                if let Some(auxiliary) = auxiliary {
                    store.document_mut().insert("endurance_workout_data", auxiliary);
                }
                store.document().clone()
            })
    }

    proptest! {
        /// Extracting a fresh render returns the document unchanged
        #[test]
        fn prop_render_extract_identity(doc in arb_document()) {
            let sync = site_sync();
            for mode in MODES {
                let view = sync.render(&doc, mode);
                prop_assert_eq!(&sync.extract(&view, &doc), &doc, "mode {}", mode);
            }
        }

        /// A second render/extract pass changes nothing
        #[test]
        fn prop_sync_idempotent(doc in arb_document()) {
            let sync = site_sync();
            let once = sync.extract(&sync.render(&doc, EditMode::ContentEditing), &doc);
            let twice = sync.extract(&sync.render(&once, EditMode::ContentEditing), &once);
            prop_assert_eq!(twice, once);
        }

        /// No key is mounted twice
        #[test]
        fn prop_render_mounts_each_key_once(doc in arb_document()) {
            let sync = site_sync();
            let view = sync.render(&doc, EditMode::ContentEditing);
            let mut keys: Vec<String> =
                view.mounted_keys().iter().map(|k| k.as_str().to_string()).collect();
            let mounted = keys.len();
            keys.sort();
            keys.dedup();
            prop_assert_eq!(keys.len(), mounted);
        }
    }

    #[test]
    fn test_scenario_a_sync_level() {
        let sync = ViewSynchronizer::new(scenario_layout());
        let mut store = ContentStore::new(document(r#"{"title": "Hi"}"#));

        let key = store.add_fragment("home", BlockKind::Paragraph, "Hello", 1_700_000_000_000);
        let view = sync.render(store.document(), EditMode::ContentEditing);
        let extracted = sync.extract(&view, store.document());

        let mut expected = document(r#"{"title": "Hi"}"#);
        expected.insert(key.clone(), "Hello");
        assert_eq!(extracted, expected);

        let mut view = view;
        view.unmount(key.as_str()).unwrap();
        assert_eq!(
            sync.extract(&view, &extracted),
            document(r#"{"title": "Hi"}"#)
        );
    }

    #[test]
    fn test_orphan_gc_removes_unmountable_keys() {
        let sync = site_sync();
        let doc = document(
            r#"{
                "start_title": "Hi",
                "retired_p1": "Nowhere to mount",
                "nowhere_dynamic_1_0_p": "Unknown page"
            }"#,
        );
        let view = sync.render(&doc, EditMode::ContentEditing);
        assert_eq!(
            sync.extract(&view, &doc),
            document(r#"{"start_title": "Hi"}"#)
        );
    }

    #[test]
    fn test_unmounted_block_drops_children() {
        let sync = site_sync();
        let doc = document(
            r#"{
                "guidelines_title": "Rules",
                "guidelines_rest_title": "Rest",
                "guidelines_rest_p1": "Sleep well"
            }"#,
        );
        let mut view = sync.render(&doc, EditMode::ContentEditing);
        view.unmount("guidelines_rest_block").unwrap();
        assert_eq!(
            sync.extract(&view, &doc),
            document(r#"{"guidelines_title": "Rules"}"#)
        );
    }

    #[test]
    fn test_partial_rows_dropped_on_extract() {
        let sync = site_sync();
        let mut data = WorkoutData::new();
        data.days.push(
            Day::new("Mon")
                .with_exercise(Exercise::new("Squat", "3", "5"))
                .with_exercise(Exercise::new("Row", "3", "8")),
        );
        let row = data.days[0].exercises[1].id;
        let mut doc = Document::new();
        doc.insert("workout_data", data);

        let mut view = sync.render(&doc, EditMode::ProgramEditing);
        view.set_cell(row, view_types::Cell::Reps, "  ").unwrap();
        let extracted = sync.extract(&view, &doc);

        let days = &extracted.schedule("workout_data").unwrap().days;
        assert_eq!(days[0].exercises.len(), 1);
        assert_eq!(days[0].exercises[0].name, "Squat");
    }
}
