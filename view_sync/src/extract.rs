//! View to document

use crate::render::ViewSynchronizer;
use content_store::{ContentValue, Document};
use tracing::debug;
use view_types::{DayNode, FragmentNode, ScheduleNode, ViewNode, ViewTree};
use workout_model::{Day, Exercise, WorkoutData};

impl ViewSynchronizer {
    /// Writes every mounted node of `view` back into a document
    ///
    /// Keys of `prior` that no mounted node backs are dropped. A schedule
    /// node with no days is only written when `prior` already had its key.
    pub fn extract(&self, view: &ViewTree, prior: &Document) -> Document {
        let mut doc = Document::new();

        for node in view.pages.iter().flat_map(|p| p.nodes.iter()) {
            match node {
                ViewNode::Fragment(fragment) => write_fragment(&mut doc, fragment),
                ViewNode::Block(block) => {
                    for child in &block.children {
                        write_fragment(&mut doc, child);
                    }
                }
                ViewNode::Schedule(schedule) => {
                    if let Some(title) = &schedule.title {
                        write_fragment(&mut doc, title);
                    }
                    if !schedule.days.is_empty() || prior.contains_key(schedule.key.as_str()) {
                        doc.insert(schedule.key.clone(), schedule_data(schedule));
                    }
                }
            }
        }

        for key in prior.keys().filter(|k| !doc.contains_key(k.as_str())) {
            debug!(key = %key, "dropped unmounted key");
        }
        doc
    }
}

fn write_fragment(doc: &mut Document, node: &FragmentNode) {
    doc.insert(node.key.clone(), ContentValue::Fragment(node.html.clone()));
}

fn schedule_data(node: &ScheduleNode) -> WorkoutData {
    let mut data = WorkoutData {
        days: node.days.iter().map(day_data).collect(),
    };
    data.retain_valid();
    data
}

fn day_data(node: &DayNode) -> Day {
    Day {
        id: node.id,
        name: node.name.trim().to_string(),
        exercises: node
            .rows
            .iter()
            .map(|row| Exercise {
                id: row.id,
                name: row.name.trim().to_string(),
                sets: row.sets.trim().to_string(),
                reps: row.reps.trim().to_string(),
            })
            .collect(),
    }
}
