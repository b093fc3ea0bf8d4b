//! Document to view

use content_store::{BlockKind, ContentKey, Document, KeyKind};
use std::collections::BTreeSet;
use tracing::debug;
use view_types::{
    Affordance, BlockNode, DayNode, EditMode, FragmentNode, FragmentSlot, Layout, PageLayout,
    PageView, RowNode, ScheduleNode, Slot, ViewNode, ViewTree,
};
use workout_model::{Day, ExerciseId, WorkoutData};

/// Renders documents onto a [`Layout`] and extracts them back
#[derive(Debug, Clone)]
pub struct ViewSynchronizer {
    pub(crate) layout: Layout,
    locked_keys: BTreeSet<String>,
    editable_pages: BTreeSet<String>,
}

impl ViewSynchronizer {
    /// Every page accepts content edits and no key is locked
    pub fn new(layout: Layout) -> Self {
        let editable_pages = layout.pages.iter().map(|p| p.id.clone()).collect();
        Self {
            layout,
            locked_keys: BTreeSet::new(),
            editable_pages,
        }
    }

    /// Keys that stay read-only in content mode
    pub fn with_locked_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locked_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Pages whose fragments are editable in content mode
    pub fn with_editable_pages<I, S>(mut self, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.editable_pages = pages.into_iter().map(Into::into).collect();
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn is_locked(&self, key: &str) -> bool {
        self.locked_keys.contains(key)
    }

    pub fn is_editable_page(&self, page: &str) -> bool {
        self.editable_pages.contains(page)
    }

    /// Renders with no completion marks set
    pub fn render(&self, doc: &Document, mode: EditMode) -> ViewTree {
        self.render_with_marks(doc, mode, &BTreeSet::new())
    }

    /// Builds the full view of `doc`
    ///
    /// Static slots without a fragment in `doc` are left unmounted. Dynamic
    /// fragments whose page is missing from the layout, or whose type is
    /// unknown, are not mounted either.
    pub fn render_with_marks(
        &self,
        doc: &Document,
        mode: EditMode,
        checked: &BTreeSet<ExerciseId>,
    ) -> ViewTree {
        let mut tree = ViewTree::new(mode);
        for page in &self.layout.pages {
            tree.pages.push(self.render_page(page, doc, mode, checked));
        }
        debug!(
            mode = %mode,
            mounted = tree.mounted_keys().len(),
            "rendered view"
        );
        tree
    }

    fn render_page(
        &self,
        page: &PageLayout,
        doc: &Document,
        mode: EditMode,
        checked: &BTreeSet<ExerciseId>,
    ) -> PageView {
        let content_page = mode == EditMode::ContentEditing && self.is_editable_page(&page.id);
        let mut nodes = Vec::new();

        for slot in &page.slots {
            match slot {
                Slot::Fragment(fragment) => {
                    if let Some(node) = self.fragment_node(fragment, doc, content_page) {
                        nodes.push(ViewNode::Fragment(node));
                    }
                }
                Slot::Block { children, .. } => {
                    let children: Vec<FragmentNode> = children
                        .iter()
                        .filter_map(|child| self.fragment_node(child, doc, content_page))
                        .collect();
                    if let (Some(key), false) = (slot.block_key(), children.is_empty()) {
                        nodes.push(ViewNode::Block(BlockNode { key, children }));
                    }
                }
                Slot::Schedule { key, title } => {
                    let title = title
                        .as_ref()
                        .and_then(|t| self.fragment_node(t, doc, content_page));
                    nodes.push(ViewNode::Schedule(schedule_node(
                        key,
                        title,
                        doc.schedule(key.as_str()),
                        mode == EditMode::ProgramEditing,
                        checked,
                    )));
                }
            }
        }

        for (key, html) in doc.dynamic_fragments(&page.id) {
            let KeyKind::Dynamic { kind, .. } = key.kind() else {
                continue;
            };
            let node = FragmentNode {
                key: key.clone(),
                tag: kind.as_str().to_string(),
                html: html.to_string(),
                editable: false,
                affordances: Vec::new(),
            };
            let node = self.decorate(node, content_page);
            if page.wraps_blocks {
                nodes.push(ViewNode::Block(BlockNode {
                    key: key.block_key(),
                    children: vec![node],
                }));
            } else {
                nodes.push(ViewNode::Fragment(node));
            }
        }

        let controls = if content_page {
            vec![
                Affordance::AddBlock {
                    page: page.id.clone(),
                    kind: BlockKind::Paragraph,
                },
                Affordance::AddBlock {
                    page: page.id.clone(),
                    kind: BlockKind::Heading,
                },
            ]
        } else {
            Vec::new()
        };

        PageView {
            id: page.id.clone(),
            nodes,
            controls,
        }
    }

    fn fragment_node(
        &self,
        slot: &FragmentSlot,
        doc: &Document,
        content_page: bool,
    ) -> Option<FragmentNode> {
        let html = doc.fragment(slot.key.as_str())?;
        let node = FragmentNode {
            key: slot.key.clone(),
            tag: slot.tag.clone(),
            html: html.to_string(),
            editable: false,
            affordances: Vec::new(),
        };
        Some(self.decorate(node, content_page))
    }

    fn decorate(&self, mut node: FragmentNode, content_page: bool) -> FragmentNode {
        if content_page && !self.is_locked(node.key.as_str()) {
            node.editable = true;
            node.affordances = vec![
                Affordance::Edit {
                    key: node.key.clone(),
                },
                Affordance::Delete {
                    key: node.key.clone(),
                },
            ];
        }
        node
    }
}

fn schedule_node(
    key: &ContentKey,
    title: Option<FragmentNode>,
    data: Option<&WorkoutData>,
    program_mode: bool,
    checked: &BTreeSet<ExerciseId>,
) -> ScheduleNode {
    let days = data
        .map(|d| {
            d.days
                .iter()
                .map(|day| day_node(day, program_mode, checked))
                .collect()
        })
        .unwrap_or_default();
    let affordances = if program_mode {
        vec![Affordance::AddDay {
            schedule: key.clone(),
        }]
    } else {
        Vec::new()
    };
    ScheduleNode {
        key: key.clone(),
        title,
        days,
        affordances,
    }
}

fn day_node(day: &Day, program_mode: bool, checked: &BTreeSet<ExerciseId>) -> DayNode {
    let rows = day
        .exercises
        .iter()
        .enumerate()
        .map(|(position, exercise)| {
            let mut affordances = vec![Affordance::ToggleCompletion {
                exercise: exercise.id,
            }];
            if program_mode {
                affordances.push(Affordance::DeleteRow {
                    day: day.id,
                    position,
                });
            }
            RowNode {
                id: exercise.id,
                name: exercise.name.clone(),
                sets: exercise.sets.clone(),
                reps: exercise.reps.clone(),
                checked: checked.contains(&exercise.id),
                editable: program_mode,
                affordances,
            }
        })
        .collect();

    let affordances = if program_mode {
        vec![
            Affordance::AddExercise { day: day.id },
            Affordance::DeleteDay { day: day.id },
        ]
    } else {
        Vec::new()
    };

    DayNode {
        id: day.id,
        name: day.name.clone(),
        editable: program_mode,
        rows,
        affordances,
    }
}
