//! Group state machine: nested console groups and cascading collapse.
//!
//! Every `group`/`groupCollapsed` call opens a scope. Entries are stamped
//! with the active scope stack when attached, and an entry is visible only if
//! none of its enclosing scopes is effectively collapsed.
//!
//! # Effective collapse
//!
//! A group is effectively collapsed iff its own flag or the flag of any
//! strict ancestor is set. Collapse dominates: a collapsed ancestor hides
//! everything nested under it regardless of the nested groups' own flags,
//! and expanding the ancestor restores each nested group to what its own
//! flag (and its remaining ancestors) implies.

use crate::model::GroupId;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone)]
struct GroupRecord {
    parent: Option<GroupId>,
    collapsed: bool,
    /// Groups opened while this one was active, in creation order.
    descendants: Vec<GroupId>,
}

/// Tracks open scopes, per-group collapse flags, and the effective
/// collapsed set.
///
/// # Invariants
/// - IDs are assigned densely from 0 in open order.
/// - A group's descendant list only grows while it is on the active stack.
/// - `hidden` contains exactly the effectively collapsed groups.
#[derive(Debug, Clone, Default)]
pub struct GroupStateMachine {
    groups: Vec<GroupRecord>,
    active: Vec<GroupId>,
    hidden: HashSet<GroupId>,
}

impl GroupStateMachine {
    /// Create an empty state machine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new group nested in the currently active ones.
    pub fn open(&mut self, collapsed: bool) -> GroupId {
        let id = GroupId::new(self.groups.len() as u64);

        for ancestor in &self.active {
            self.groups[ancestor.index()].descendants.push(id);
        }
        self.groups.push(GroupRecord {
            parent: self.active.last().copied(),
            collapsed,
            descendants: Vec::new(),
        });
        self.active.push(id);

        // Once any group on the chain is collapsed, it and everything inside
        // it is hidden.
        let mut cascade = false;
        for gid in &self.active {
            if cascade || self.groups[gid.index()].collapsed {
                self.hidden.insert(*gid);
                cascade = true;
            } else {
                self.hidden.remove(gid);
            }
        }

        debug!(group = %id, collapsed, depth = self.active.len(), "Opened group");
        id
    }

    /// Close the innermost active group.
    ///
    /// Returns `None` (and changes nothing) when no group is open.
    pub fn close(&mut self) -> Option<GroupId> {
        self.active.pop()
    }

    /// Set a group's own collapse flag and recompute effective collapse for
    /// it and every group ever nested under it.
    ///
    /// Returns `false` if the group is unknown.
    pub fn set_collapsed(&mut self, id: GroupId, collapsed: bool) -> bool {
        let Some(record) = self.groups.get_mut(id.index()) else {
            return false;
        };
        record.collapsed = collapsed;

        self.refresh(id);
        // Descendants are in creation order, so each one's parent has already
        // been refreshed by the time it is reached.
        let descendants = self.groups[id.index()].descendants.clone();
        for gid in descendants {
            self.refresh(gid);
        }

        debug!(group = %id, collapsed, "Toggled group");
        true
    }

    fn refresh(&mut self, id: GroupId) {
        let record = &self.groups[id.index()];
        let parent_hidden = record.parent.is_some_and(|p| self.hidden.contains(&p));
        if record.collapsed || parent_hidden {
            self.hidden.insert(id);
        } else {
            self.hidden.remove(&id);
        }
    }

    /// Whether an entry stamped with `stack` is currently visible.
    pub fn is_visible(&self, stack: &[GroupId]) -> bool {
        !stack.iter().any(|gid| self.hidden.contains(gid))
    }

    /// Whether the group is effectively collapsed (itself or an ancestor).
    pub fn is_effectively_collapsed(&self, id: GroupId) -> bool {
        self.hidden.contains(&id)
    }

    /// The group's own collapse flag, if it exists.
    pub fn is_collapsed(&self, id: GroupId) -> Option<bool> {
        self.groups.get(id.index()).map(|g| g.collapsed)
    }

    /// Currently open groups, outermost first.
    pub fn active_stack(&self) -> &[GroupId] {
        &self.active
    }

    /// Groups opened while `id` was active, in creation order.
    pub fn descendants(&self, id: GroupId) -> &[GroupId] {
        self.groups
            .get(id.index())
            .map(|g| g.descendants.as_slice())
            .unwrap_or(&[])
    }

    /// Number of groups ever opened since the last reset.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group was opened since the last reset.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Forget all groups.
    pub fn reset(&mut self) {
        self.groups.clear();
        self.active.clear();
        self.hidden.clear();
    }
}
