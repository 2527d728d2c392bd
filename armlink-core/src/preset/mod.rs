//! Preset resolution
//!
//! Turns the host's preset register into at most one set of joint targets
//! per preset change. Re-requesting the active preset does nothing, so the
//! host may leave the register set without re-triggering the pose.

use armlink_protocol::Preset;

use crate::config::{PresetPosition, PresetTable};

/// Tracks the active preset and resolves requests against the pose table
#[derive(Debug, Clone)]
pub struct PresetResolver {
    table: PresetTable,
    active: Preset,
}

impl PresetResolver {
    pub fn new(table: PresetTable) -> Self {
        Self {
            table,
            active: Preset::None,
        }
    }

    /// Currently active preset
    pub fn active(&self) -> Preset {
        self.active
    }

    /// Pose table
    pub fn table(&self) -> &PresetTable {
        &self.table
    }

    /// Handle the requested preset for this pass
    ///
    /// Returns the pose to apply when `requested` names a preset other than
    /// the active one. Requesting `Preset::None` clears the active preset
    /// without moving anything.
    pub fn select(&mut self, requested: Preset) -> Option<PresetPosition> {
        if requested.is_none() {
            self.active = Preset::None;
            return None;
        }
        if requested == self.active {
            return None;
        }

        let pose = self.table.position(requested).copied()?;
        self.active = requested;
        Some(pose)
    }

    /// Forget the active preset
    pub fn clear(&mut self) {
        self.active = Preset::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armlink_protocol::Joint;

    #[test]
    fn test_new_preset_is_applied() {
        let mut resolver = PresetResolver::new(PresetTable::default());
        let pose = resolver.select(Preset::Grip).unwrap();
        assert_eq!(pose.get(Joint::Lift), Some(1900));
        assert_eq!(pose.get(Joint::Tilt), Some(1210));
        assert_eq!(pose.get(Joint::Gripper), Some(2300));
        assert_eq!(resolver.active(), Preset::Grip);
    }

    #[test]
    fn test_repeated_preset_is_ignored() {
        let mut resolver = PresetResolver::new(PresetTable::default());
        assert!(resolver.select(Preset::Home).is_some());
        assert!(resolver.select(Preset::Home).is_none());
        assert_eq!(resolver.active(), Preset::Home);
    }

    #[test]
    fn test_none_clears_without_pose() {
        let mut resolver = PresetResolver::new(PresetTable::default());
        resolver.select(Preset::Lift);
        assert!(resolver.select(Preset::None).is_none());
        assert_eq!(resolver.active(), Preset::None);

        // Same preset again after clearing is a new request
        assert!(resolver.select(Preset::Lift).is_some());
    }

    #[test]
    fn test_clear_allows_reapply() {
        let mut resolver = PresetResolver::new(PresetTable::default());
        resolver.select(Preset::Capture);
        resolver.clear();
        assert_eq!(resolver.active(), Preset::None);
        assert!(resolver.select(Preset::Capture).is_some());
    }

    #[test]
    fn test_switching_presets() {
        let mut resolver = PresetResolver::new(PresetTable::default());
        resolver.select(Preset::Hold);
        let pose = resolver.select(Preset::Capture).unwrap();
        assert_eq!(pose.get(Joint::Gripper), Some(500));
        assert_eq!(resolver.active(), Preset::Capture);
    }
}
