use std::collections::{BTreeMap, BTreeSet};

use crate::rings::modules::RingModuleKind;

/// One concrete, addressable ring in the derived view.
///
/// Instances form a forest via index-based parent links into the owning
/// [`RingStack`]. Created on user action, destroyed on explicit removal;
/// no automatic garbage collection.
#[derive(Clone, Debug)]
pub struct RingInstance {
    /// Globally unique id per creation.
    pub instance_id: String,
    /// Builder that draws this ring.
    pub kind: RingModuleKind,
    /// Display label.
    pub label: String,
    /// Index of the parent instance, if any.
    pub parent: Option<usize>,
}

impl RingInstance {
    /// Root instance (no parent) for a module kind.
    pub fn root(instance_id: impl Into<String>, kind: RingModuleKind) -> Self {
        let label = kind.label();
        Self {
            instance_id: instance_id.into(),
            kind,
            label,
            parent: None,
        }
    }
}

/// Arena of ring instances; order is lane order, innermost first.
///
/// Child lookups and ancestor/descendant sets are derived on demand rather
/// than kept as redundant structures.
#[derive(Clone, Debug, Default)]
pub struct RingStack {
    instances: Vec<RingInstance>,
}

impl RingStack {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the stack has no instances.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instance at `idx`.
    pub fn get(&self, idx: usize) -> Option<&RingInstance> {
        self.instances.get(idx)
    }

    /// Iterate instances in lane order.
    pub fn iter(&self) -> impl Iterator<Item = &RingInstance> {
        self.instances.iter()
    }

    /// Index of an instance id.
    pub fn index_of(&self, instance_id: &str) -> Option<usize> {
        self.instances
            .iter()
            .position(|r| r.instance_id == instance_id)
    }

    /// Append an instance; returns its index.
    pub fn push(&mut self, inst: RingInstance) -> usize {
        self.instances.push(inst);
        self.instances.len() - 1
    }

    /// Insert an instance before `idx`, shifting parent links to match.
    pub fn insert_before(&mut self, idx: usize, inst: RingInstance) {
        let idx = idx.min(self.instances.len());
        for r in &mut self.instances {
            if let Some(p) = r.parent
                && p >= idx
            {
                r.parent = Some(p + 1);
            }
        }
        self.instances.insert(idx, inst);
    }

    /// Remove an instance by id.
    ///
    /// Its children are reparented to the removed instance's own parent and
    /// index links are compacted.
    pub fn remove(&mut self, instance_id: &str) -> Option<RingInstance> {
        let idx = self.index_of(instance_id)?;
        let removed_parent = self.instances[idx].parent;
        let removed = self.instances.remove(idx);

        for r in &mut self.instances {
            r.parent = match r.parent {
                Some(p) if p == idx => removed_parent.map(|rp| if rp > idx { rp - 1 } else { rp }),
                Some(p) if p > idx => Some(p - 1),
                other => other,
            };
        }

        Some(removed)
    }

    /// Rewrite the parent link of the instance at `idx`.
    pub fn set_parent(&mut self, idx: usize, parent: Option<usize>) {
        if let Some(inst) = self.instances.get_mut(idx) {
            inst.parent = parent;
        }
    }

    /// Direct children of the instance at `idx`.
    pub fn children_of(&self, idx: usize) -> Vec<usize> {
        self.instances
            .iter()
            .enumerate()
            .filter_map(|(i, r)| (r.parent == Some(idx)).then_some(i))
            .collect()
    }

    /// All ancestors of `idx`, nearest first.
    pub fn ancestors_of(&self, idx: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut cur = self.instances.get(idx).and_then(|r| r.parent);
        while let Some(p) = cur {
            out.push(p);
            cur = self.instances.get(p).and_then(|r| r.parent);
        }
        out
    }

    /// All descendants of `idx` (depth-first).
    pub fn descendants_of(&self, idx: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = self.children_of(idx);
        while let Some(i) = stack.pop() {
            out.push(i);
            stack.extend(self.children_of(i));
        }
        out
    }

    /// The relevant set around a focus: the focus itself plus all its
    /// ancestors and descendants in the forest.
    pub fn relevant_set(&self, focus_idx: usize) -> BTreeSet<usize> {
        let mut out = BTreeSet::new();
        out.insert(focus_idx);
        out.extend(self.ancestors_of(focus_idx));
        out.extend(self.descendants_of(focus_idx));
        out
    }
}

/// Per-instance presentation resolved by the focus window plan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingVisual {
    /// Group opacity.
    pub opacity: f32,
    /// Multiplier on the lane stroke width.
    pub stroke_mul: f64,
    /// Whether the instance sits in the relevant set.
    pub relevant: bool,
}

impl Default for RingVisual {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            stroke_mul: 1.0,
            relevant: true,
        }
    }
}

/// Compute the visible window and per-instance fade around a focus.
///
/// Only a sliding window of `max_visible` lanes around the focused instance
/// is kept; instances further than `fade_count` lanes from focus are culled
/// entirely (absent from the result, so they produce no scene nodes).
/// Instances in range fade linearly with distance; instances outside the
/// relevant set get an additional penalty.
pub fn plan_window(
    stack: &RingStack,
    focus_id: Option<&str>,
    max_visible: usize,
    fade_count: usize,
) -> BTreeMap<String, RingVisual> {
    let mut out = BTreeMap::new();
    if stack.is_empty() {
        return out;
    }

    let focus_idx = focus_id
        .and_then(|id| stack.index_of(id))
        .unwrap_or(stack.len() / 2);

    let max_visible = max_visible.max(1);
    let half = max_visible / 2;
    let win_start = focus_idx.saturating_sub(half);
    let win_end = (win_start + max_visible - 1).min(stack.len() - 1);
    let win_start = win_end.saturating_sub(max_visible - 1);

    let relevant: BTreeSet<usize> = if focus_id.is_some() {
        stack.relevant_set(focus_idx)
    } else {
        (0..stack.len()).collect()
    };

    for i in win_start..=win_end {
        let dist = focus_idx.abs_diff(i);
        if dist > fade_count {
            continue;
        }

        let t = dist as f64 / fade_count.max(1) as f64;
        let base_opacity = 1.0 - t * 0.75;
        let base_mul = if dist == 0 { 1.25 } else { 1.0 - t * 0.4 };

        let is_relevant = relevant.contains(&i);
        let (opacity, stroke_mul) = if is_relevant {
            (base_opacity, base_mul)
        } else {
            (base_opacity * 0.35, base_mul * 0.7)
        };

        let inst = &stack.instances[i];
        out.insert(
            inst.instance_id.clone(),
            RingVisual {
                opacity: opacity as f32,
                stroke_mul,
                relevant: is_relevant,
            },
        );
    }

    out
}

#[cfg(test)]
#[path = "../../tests/unit/rings/instances.rs"]
mod tests;
