//! View tree nodes, affordances and host-driven edits

use crate::mode::EditMode;
use content_store::{BlockKind, ContentKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use workout_model::{DayId, ExerciseId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("No mounted node for key: {0}")]
    UnknownKey(String),

    #[error("No mounted day: {0}")]
    UnknownDay(DayId),

    #[error("No mounted exercise: {0}")]
    UnknownExercise(ExerciseId),

    #[error("Node is read-only: {0}")]
    NotEditable(String),
}

/// An action the user may trigger on a node or page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Affordance {
    Edit { key: ContentKey },
    Delete { key: ContentKey },
    AddBlock { page: String, kind: BlockKind },
    AddDay { schedule: ContentKey },
    AddExercise { day: DayId },
    DeleteRow { day: DayId, position: usize },
    DeleteDay { day: DayId },
    ToggleCompletion { exercise: ExerciseId },
}

/// Column of an exercise row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Name,
    Sets,
    Reps,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentNode {
    pub key: ContentKey,
    pub tag: String,
    pub html: String,
    pub editable: bool,
    #[serde(default)]
    pub affordances: Vec<Affordance>,
}

/// Presentation wrapper; its children are the content sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockNode {
    pub key: ContentKey,
    pub children: Vec<FragmentNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowNode {
    pub id: ExerciseId,
    pub name: String,
    pub sets: String,
    pub reps: String,
    pub checked: bool,
    pub editable: bool,
    #[serde(default)]
    pub affordances: Vec<Affordance>,
}

impl RowNode {
    fn cell_mut(&mut self, cell: Cell) -> &mut String {
        match cell {
            Cell::Name => &mut self.name,
            Cell::Sets => &mut self.sets,
            Cell::Reps => &mut self.reps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayNode {
    pub id: DayId,
    pub name: String,
    pub editable: bool,
    pub rows: Vec<RowNode>,
    #[serde(default)]
    pub affordances: Vec<Affordance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleNode {
    pub key: ContentKey,
    pub title: Option<FragmentNode>,
    pub days: Vec<DayNode>,
    #[serde(default)]
    pub affordances: Vec<Affordance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewNode {
    Fragment(FragmentNode),
    Block(BlockNode),
    Schedule(ScheduleNode),
}

impl ViewNode {
    fn fragments(&self) -> Box<dyn Iterator<Item = &FragmentNode> + '_> {
        match self {
            ViewNode::Fragment(f) => Box::new(std::iter::once(f)),
            ViewNode::Block(b) => Box::new(b.children.iter()),
            ViewNode::Schedule(s) => Box::new(s.title.iter()),
        }
    }

    fn fragments_mut(&mut self) -> Box<dyn Iterator<Item = &mut FragmentNode> + '_> {
        match self {
            ViewNode::Fragment(f) => Box::new(std::iter::once(f)),
            ViewNode::Block(b) => Box::new(b.children.iter_mut()),
            ViewNode::Schedule(s) => Box::new(s.title.iter_mut()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    pub id: String,
    pub nodes: Vec<ViewNode>,
    /// Trailing control area; dynamic fragments are mounted just before it
    #[serde(default)]
    pub controls: Vec<Affordance>,
}

/// The complete rendered site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewTree {
    /// Increases with every render the editor publishes
    pub revision: u64,
    pub mode: EditMode,
    pub pages: Vec<PageView>,
}

impl ViewTree {
    pub fn new(mode: EditMode) -> Self {
        Self {
            revision: 0,
            mode,
            pages: Vec::new(),
        }
    }

    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    pub fn is_valid_successor(&self, previous: &ViewTree) -> bool {
        self.revision > previous.revision
    }

    pub fn page(&self, id: &str) -> Option<&PageView> {
        self.pages.iter().find(|p| p.id == id)
    }

    fn nodes(&self) -> impl Iterator<Item = &ViewNode> {
        self.pages.iter().flat_map(|p| p.nodes.iter())
    }

    fn nodes_mut(&mut self) -> impl Iterator<Item = &mut ViewNode> {
        self.pages.iter_mut().flat_map(|p| p.nodes.iter_mut())
    }

    /// Every mounted fragment, including block children and schedule titles
    pub fn fragments(&self) -> impl Iterator<Item = &FragmentNode> {
        self.nodes().flat_map(|n| n.fragments())
    }

    pub fn fragment(&self, key: &str) -> Option<&FragmentNode> {
        self.fragments().find(|f| f.key.as_str() == key)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &BlockNode> {
        self.nodes().filter_map(|n| match n {
            ViewNode::Block(b) => Some(b),
            _ => None,
        })
    }

    pub fn schedules(&self) -> impl Iterator<Item = &ScheduleNode> {
        self.nodes().filter_map(|n| match n {
            ViewNode::Schedule(s) => Some(s),
            _ => None,
        })
    }

    pub fn schedule(&self, key: &str) -> Option<&ScheduleNode> {
        self.schedules().find(|s| s.key.as_str() == key)
    }

    fn days_mut(&mut self) -> impl Iterator<Item = &mut DayNode> {
        self.nodes_mut()
            .filter_map(|n| match n {
                ViewNode::Schedule(s) => Some(s),
                _ => None,
            })
            .flat_map(|s| s.days.iter_mut())
    }

    pub fn day(&self, id: DayId) -> Option<&DayNode> {
        self.schedules()
            .flat_map(|s| s.days.iter())
            .find(|d| d.id == id)
    }

    pub fn row(&self, id: ExerciseId) -> Option<&RowNode> {
        self.schedules()
            .flat_map(|s| s.days.iter())
            .flat_map(|d| d.rows.iter())
            .find(|r| r.id == id)
    }

    /// Keys of every mounted content source
    pub fn mounted_keys(&self) -> Vec<&ContentKey> {
        let mut keys: Vec<&ContentKey> = self.fragments().map(|f| &f.key).collect();
        keys.extend(self.schedules().map(|s| &s.key));
        keys
    }

    /// Every affordance in the tree, in document order
    pub fn affordances(&self) -> Vec<&Affordance> {
        let mut all = Vec::new();
        for page in &self.pages {
            for node in &page.nodes {
                all.extend(node.fragments().flat_map(|f| f.affordances.iter()));
                if let ViewNode::Schedule(s) = node {
                    all.extend(s.affordances.iter());
                    for day in &s.days {
                        all.extend(day.affordances.iter());
                        all.extend(day.rows.iter().flat_map(|r| r.affordances.iter()));
                    }
                }
            }
            all.extend(page.controls.iter());
        }
        all
    }

    pub fn has_affordance(&self, affordance: &Affordance) -> bool {
        self.affordances().into_iter().any(|a| a == affordance)
    }

    /// Replaces the HTML of an editable fragment
    pub fn set_html(&mut self, key: &str, html: impl Into<String>) -> Result<(), ViewError> {
        let node = self
            .nodes_mut()
            .flat_map(|n| n.fragments_mut())
            .find(|f| f.key.as_str() == key)
            .ok_or_else(|| ViewError::UnknownKey(key.to_string()))?;
        if !node.editable {
            return Err(ViewError::NotEditable(key.to_string()));
        }
        node.html = html.into();
        Ok(())
    }

    pub fn rename_day(&mut self, id: DayId, name: impl Into<String>) -> Result<(), ViewError> {
        let day = self
            .days_mut()
            .find(|d| d.id == id)
            .ok_or(ViewError::UnknownDay(id))?;
        if !day.editable {
            return Err(ViewError::NotEditable(id.to_string()));
        }
        day.name = name.into();
        Ok(())
    }

    pub fn set_cell(
        &mut self,
        id: ExerciseId,
        cell: Cell,
        value: impl Into<String>,
    ) -> Result<(), ViewError> {
        let row = self
            .days_mut()
            .flat_map(|d| d.rows.iter_mut())
            .find(|r| r.id == id)
            .ok_or(ViewError::UnknownExercise(id))?;
        if !row.editable {
            return Err(ViewError::NotEditable(id.to_string()));
        }
        *row.cell_mut(cell) = value.into();
        Ok(())
    }

    /// Marks or unmarks an exercise; allowed in every mode
    pub fn toggle_completion(&mut self, id: ExerciseId, checked: bool) -> Result<(), ViewError> {
        let row = self
            .days_mut()
            .flat_map(|d| d.rows.iter_mut())
            .find(|r| r.id == id)
            .ok_or(ViewError::UnknownExercise(id))?;
        row.checked = checked;
        Ok(())
    }

    /// Removes a fragment or block node from the tree
    ///
    /// A block disappears once its last child is unmounted.
    pub fn unmount(&mut self, key: &str) -> Result<(), ViewError> {
        for page in &mut self.pages {
            let Some(index) = page.nodes.iter().position(|n| match n {
                ViewNode::Fragment(f) => f.key.as_str() == key,
                ViewNode::Block(b) => {
                    b.key.as_str() == key || b.children.iter().any(|c| c.key.as_str() == key)
                }
                ViewNode::Schedule(_) => false,
            }) else {
                continue;
            };

            let child = match &page.nodes[index] {
                ViewNode::Fragment(f) if f.editable => None,
                ViewNode::Block(b) if b.key.as_str() == key => {
                    if b.children.iter().any(|c| !c.editable) {
                        return Err(ViewError::NotEditable(key.to_string()));
                    }
                    None
                }
                ViewNode::Block(b) => match b.children.iter().position(|c| c.key.as_str() == key) {
                    Some(position) if b.children[position].editable => Some(position),
                    _ => return Err(ViewError::NotEditable(key.to_string())),
                },
                _ => return Err(ViewError::NotEditable(key.to_string())),
            };

            let now_empty = match (child, &mut page.nodes[index]) {
                (Some(position), ViewNode::Block(b)) => {
                    b.children.remove(position);
                    b.children.is_empty()
                }
                _ => true,
            };
            if now_empty {
                page.nodes.remove(index);
            }
            return Ok(());
        }
        Err(ViewError::UnknownKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(key: &str, editable: bool) -> FragmentNode {
        FragmentNode {
            key: key.into(),
            tag: "p".to_string(),
            html: format!("<b>{key}</b>"),
            editable,
            affordances: Vec::new(),
        }
    }

    fn row(editable: bool) -> RowNode {
        RowNode {
            id: ExerciseId::new(),
            name: "Squat".to_string(),
            sets: "3".to_string(),
            reps: "5".to_string(),
            checked: false,
            editable,
            affordances: Vec::new(),
        }
    }

    fn tree(editable: bool) -> ViewTree {
        let day = DayNode {
            id: DayId::new(),
            name: "Mon".to_string(),
            editable,
            rows: vec![row(editable)],
            affordances: Vec::new(),
        };
        ViewTree {
            revision: 1,
            mode: EditMode::Viewing,
            pages: vec![PageView {
                id: "guidelines".to_string(),
                nodes: vec![
                    ViewNode::Fragment(fragment("guidelines_title", editable)),
                    ViewNode::Block(BlockNode {
                        key: "rest_block".into(),
                        children: vec![fragment("rest_title", editable), fragment("rest_p1", editable)],
                    }),
                    ViewNode::Schedule(ScheduleNode {
                        key: "workout_data".into(),
                        title: None,
                        days: vec![day],
                        affordances: Vec::new(),
                    }),
                ],
                controls: Vec::new(),
            }],
        }
    }

    #[test]
    fn test_lookup() {
        let view = tree(true);
        assert!(view.fragment("rest_p1").is_some());
        assert!(view.fragment("missing").is_none());
        assert_eq!(view.blocks().count(), 1);
        let keys: Vec<&str> = view.mounted_keys().iter().map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["guidelines_title", "rest_title", "rest_p1", "workout_data"]
        );
    }

    #[test]
    fn test_set_html_requires_editable() {
        let mut view = tree(false);
        assert_eq!(
            view.set_html("rest_p1", "x"),
            Err(ViewError::NotEditable("rest_p1".to_string()))
        );

        let mut view = tree(true);
        view.set_html("rest_p1", "x").unwrap();
        assert_eq!(view.fragment("rest_p1").unwrap().html, "x");
        assert!(matches!(view.set_html("nope", "x"), Err(ViewError::UnknownKey(_))));
    }

    #[test]
    fn test_day_and_cell_edits() {
        let mut view = tree(true);
        let day = view.schedules().next().unwrap().days[0].id;
        let row = view.day(day).unwrap().rows[0].id;

        view.rename_day(day, "Tue").unwrap();
        view.set_cell(row, Cell::Reps, "8").unwrap();
        assert_eq!(view.day(day).unwrap().name, "Tue");
        assert_eq!(view.row(row).unwrap().reps, "8");
        assert!(matches!(
            view.rename_day(DayId::new(), "x"),
            Err(ViewError::UnknownDay(_))
        ));
    }

    #[test]
    fn test_read_only_schedule_rejects_edits() {
        let mut view = tree(false);
        let day = view.schedules().next().unwrap().days[0].id;
        let row = view.day(day).unwrap().rows[0].id;

        assert!(matches!(view.rename_day(day, "x"), Err(ViewError::NotEditable(_))));
        assert!(matches!(view.set_cell(row, Cell::Name, "x"), Err(ViewError::NotEditable(_))));
        view.toggle_completion(row, true).unwrap();
        assert!(view.row(row).unwrap().checked);
    }

    #[test]
    fn test_unmount_top_level_fragment() {
        let mut view = tree(true);
        view.unmount("guidelines_title").unwrap();
        assert!(view.fragment("guidelines_title").is_none());
        assert!(matches!(view.unmount("guidelines_title"), Err(ViewError::UnknownKey(_))));
    }

    #[test]
    fn test_unmount_last_child_removes_block() {
        let mut view = tree(true);
        view.unmount("rest_title").unwrap();
        assert_eq!(view.blocks().count(), 1);
        view.unmount("rest_p1").unwrap();
        assert_eq!(view.blocks().count(), 0);
    }

    #[test]
    fn test_unmount_block_by_key() {
        let mut view = tree(true);
        view.unmount("rest_block").unwrap();
        assert!(view.fragment("rest_title").is_none());
        assert!(view.fragment("rest_p1").is_none());
    }

    #[test]
    fn test_unmount_read_only_rejected() {
        let mut view = tree(false);
        assert!(matches!(view.unmount("rest_p1"), Err(ViewError::NotEditable(_))));
        assert!(matches!(view.unmount("rest_block"), Err(ViewError::NotEditable(_))));
        assert!(view.fragment("rest_p1").is_some());
    }

    #[test]
    fn test_revision_ordering() {
        let older = tree(true);
        let newer = tree(true).with_revision(2);
        assert!(newer.is_valid_successor(&older));
        assert!(!older.is_valid_successor(&newer));
    }

    #[test]
    fn test_affordance_serialization() {
        let affordance = Affordance::AddBlock {
            page: "faq".to_string(),
            kind: BlockKind::Heading,
        };
        let json = serde_json::to_string(&affordance).unwrap();
        assert_eq!(json, r#"{"action":"add_block","page":"faq","kind":"h3"}"#);
    }
}
