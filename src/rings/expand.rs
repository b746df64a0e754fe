use crate::domain::channels::CHANNELS;
use crate::rings::modules::RingModuleKind;

/// Derived child modules revealed by clicking a ring.
///
/// A center expands into every channel touching one of its gates; a channel
/// expands into its two gates; gates and custom rings are leaves.
pub fn expansion_for(kind: &RingModuleKind) -> Vec<RingModuleKind> {
    match kind {
        RingModuleKind::Center(center) => {
            let gates: Vec<_> = center.gates().collect();
            CHANNELS
                .iter()
                .copied()
                .filter(|&(a, b)| gates.contains(&a) || gates.contains(&b))
                .map(|(a, b)| RingModuleKind::Channel(a, b))
                .collect()
        }
        RingModuleKind::Channel(a, b) => {
            vec![RingModuleKind::Gate(*a), RingModuleKind::Gate(*b)]
        }
        RingModuleKind::Gate(_) | RingModuleKind::Custom { .. } => Vec::new(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rings/expand.rs"]
mod tests;
