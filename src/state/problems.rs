//! Annotation problem list with multi-select.

use std::collections::BTreeSet;

use crate::error::{Result, WorkspaceError};
use crate::model::{Problem, ProblemId};
use crate::zoom_math::Point;

/// Tri-state of the "select all" checkbox, derived from the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    Unchecked,
    Indeterminate,
    Checked,
}

/// Ordered problem slots plus selection and the active slot.
///
/// The supervisor slot is always first, can never be selected and survives
/// every delete operation.
#[derive(Debug, Clone)]
pub struct ProblemList {
    problems: Vec<Problem>,
    selected: BTreeSet<ProblemId>,
    active: Option<ProblemId>,
}

impl Default for ProblemList {
    fn default() -> Self {
        Self::new()
    }
}

impl ProblemList {
    /// A list containing only the supervisor slot.
    pub fn new() -> Self {
        Self {
            problems: vec![Problem::supervisor()],
            selected: BTreeSet::new(),
            active: None,
        }
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn get(&self, id: ProblemId) -> Option<&Problem> {
        self.problems.iter().find(|p| p.id == id)
    }

    fn contains(&self, id: ProblemId) -> bool {
        self.get(id).is_some()
    }

    /// Number of selectable (non-supervisor) problems.
    pub fn numbered_count(&self) -> usize {
        self.problems.iter().filter(|p| !p.id.is_supervisor()).count()
    }

    pub fn selected(&self) -> &BTreeSet<ProblemId> {
        &self.selected
    }

    pub fn is_selected(&self, id: ProblemId) -> bool {
        self.selected.contains(&id)
    }

    pub fn active(&self) -> Option<ProblemId> {
        self.active
    }

    /// Append a new slot numbered one past the highest existing number.
    ///
    /// Numbering is max-based, so deleting `problem3` out of five still yields
    /// `problem6` next.
    pub fn add_problem(&mut self) -> ProblemId {
        let next = self
            .problems
            .iter()
            .filter_map(|p| p.id.number())
            .max()
            .unwrap_or(0)
            + 1;
        let problem = Problem::numbered(next);
        let id = problem.id;
        self.problems.push(problem);
        log::debug!("Added {}", id);
        id
    }

    /// Flip selection of `id`. The supervisor and unknown ids are ignored.
    pub fn toggle_select(&mut self, id: ProblemId) {
        if id.is_supervisor() {
            return;
        }
        if !self.contains(id) {
            log::warn!("Ignoring selection toggle for unknown {}", id);
            return;
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Select every numbered slot, or clear the selection.
    pub fn select_all(&mut self, flag: bool) {
        if flag {
            self.selected = self
                .problems
                .iter()
                .map(|p| p.id)
                .filter(|id| !id.is_supervisor())
                .collect();
        } else {
            self.selected.clear();
        }
    }

    pub fn select_all_state(&self) -> SelectAllState {
        let selected = self.selected.len();
        if selected == 0 {
            SelectAllState::Unchecked
        } else if selected < self.numbered_count() {
            SelectAllState::Indeterminate
        } else {
            SelectAllState::Checked
        }
    }

    /// Remove every selected slot. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let before = self.problems.len();
        let selected = std::mem::take(&mut self.selected);
        self.problems.retain(|p| !selected.contains(&p.id));

        if self.active.is_some_and(|id| selected.contains(&id)) {
            self.active = None;
        }

        let removed = before - self.problems.len();
        log::debug!("Deleted {} selected problems", removed);
        removed
    }

    /// Remove every slot except the supervisor.
    pub fn delete_all(&mut self) -> usize {
        let before = self.problems.len();
        self.problems.retain(|p| p.id.is_supervisor());
        self.selected.clear();
        self.active = None;
        before - self.problems.len()
    }

    /// Mark `id` as the slot that receives the next picked coordinate.
    pub fn set_active(&mut self, id: ProblemId) -> Result<()> {
        if !self.contains(id) {
            return Err(WorkspaceError::UnknownProblem(id.to_string()));
        }
        self.active = Some(id);
        log::debug!("Active problem: {}", id);
        Ok(())
    }

    /// Store a picked point on a slot.
    pub fn assign_point(&mut self, id: ProblemId, point: Point) -> Result<()> {
        let problem = self
            .problems
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| WorkspaceError::UnknownProblem(id.to_string()))?;
        problem.point = Some(point);
        log::debug!("📍 {} -> ({:.1}, {:.1})", id, point.x, point.y);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with(n: usize) -> ProblemList {
        let mut list = ProblemList::new();
        for _ in 0..n {
            list.add_problem();
        }
        list
    }

    fn ids(list: &ProblemList) -> Vec<String> {
        list.problems().iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_new_list_has_only_supervisor() {
        let list = ProblemList::new();
        assert_eq!(ids(&list), vec!["supervisor"]);
        assert_eq!(list.select_all_state(), SelectAllState::Unchecked);
    }

    #[test]
    fn test_numbering_is_max_based() {
        let mut list = list_with(5);
        list.toggle_select(ProblemId::Numbered(3));
        list.delete_selected();

        let id = list.add_problem();
        assert_eq!(id.to_string(), "problem6");
        assert_eq!(
            ids(&list),
            vec!["supervisor", "problem1", "problem2", "problem4", "problem5", "problem6"]
        );
    }

    #[test]
    fn test_numbering_restarts_after_delete_all() {
        let mut list = list_with(3);
        list.delete_all();
        assert_eq!(list.add_problem(), ProblemId::Numbered(1));
    }

    #[test]
    fn test_supervisor_cannot_be_selected() {
        let mut list = list_with(1);
        list.toggle_select(ProblemId::Supervisor);
        assert!(list.selected().is_empty());

        list.select_all(true);
        assert!(!list.is_selected(ProblemId::Supervisor));
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut list = list_with(2);
        list.toggle_select(ProblemId::Numbered(1));
        assert!(list.is_selected(ProblemId::Numbered(1)));
        list.toggle_select(ProblemId::Numbered(1));
        assert!(!list.is_selected(ProblemId::Numbered(1)));
    }

    #[test]
    fn test_toggle_unknown_is_ignored() {
        let mut list = list_with(1);
        list.toggle_select(ProblemId::Numbered(9));
        assert!(list.selected().is_empty());
    }

    #[test]
    fn test_select_all_then_delete_leaves_supervisor() {
        let mut list = list_with(4);
        list.select_all(true);
        assert_eq!(list.select_all_state(), SelectAllState::Checked);

        assert_eq!(list.delete_selected(), 4);
        assert_eq!(ids(&list), vec!["supervisor"]);
        assert!(list.selected().is_empty());
    }

    #[test]
    fn test_select_all_tri_state() {
        let mut list = list_with(3);
        assert_eq!(list.select_all_state(), SelectAllState::Unchecked);

        list.toggle_select(ProblemId::Numbered(2));
        assert_eq!(list.select_all_state(), SelectAllState::Indeterminate);

        list.toggle_select(ProblemId::Numbered(1));
        list.toggle_select(ProblemId::Numbered(3));
        assert_eq!(list.select_all_state(), SelectAllState::Checked);

        list.select_all(false);
        assert_eq!(list.select_all_state(), SelectAllState::Unchecked);
    }

    #[test]
    fn test_delete_all_clears_selection_and_active() {
        let mut list = list_with(3);
        list.toggle_select(ProblemId::Numbered(1));
        list.set_active(ProblemId::Numbered(2)).unwrap();

        assert_eq!(list.delete_all(), 3);
        assert_eq!(ids(&list), vec!["supervisor"]);
        assert!(list.selected().is_empty());
        assert_eq!(list.active(), None);
    }

    #[test]
    fn test_deleting_active_problem_clears_active() {
        let mut list = list_with(2);
        list.set_active(ProblemId::Numbered(2)).unwrap();
        list.toggle_select(ProblemId::Numbered(2));
        list.delete_selected();
        assert_eq!(list.active(), None);
    }

    #[test]
    fn test_set_active_unknown_fails() {
        let mut list = ProblemList::new();
        assert!(list.set_active(ProblemId::Numbered(1)).is_err());
        assert!(list.set_active(ProblemId::Supervisor).is_ok());
        assert_eq!(list.active(), Some(ProblemId::Supervisor));
    }

    #[test]
    fn test_assign_point() {
        let mut list = list_with(1);
        list.assign_point(ProblemId::Numbered(1), Point::new(3.0, 4.0))
            .unwrap();
        let problem = list.get(ProblemId::Numbered(1)).unwrap();
        assert_eq!(problem.point, Some(Point::new(3.0, 4.0)));
        assert_eq!(problem.value, "미지정");
    }
}
