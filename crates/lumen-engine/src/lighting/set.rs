use super::types::{DirLight, LightType, LightingCounts, PointLight, SpotLight};

/// Host-side light collection for one frame.
///
/// Lights are kept per kind in push order; that order is the index order the
/// shader sees after upload.
#[derive(Debug, Clone, Default)]
pub struct LightSet {
    points: Vec<PointLight>,
    spots: Vec<SpotLight>,
    dirs: Vec<DirLight>,
}

impl LightSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_point(&mut self, light: PointLight) -> &mut Self {
        self.points.push(light);
        self
    }

    pub fn push_spot(&mut self, light: SpotLight) -> &mut Self {
        self.spots.push(light);
        self
    }

    pub fn push_dir(&mut self, light: DirLight) -> &mut Self {
        self.dirs.push(light);
        self
    }

    /// Drops all lights but keeps allocations for the next frame.
    pub fn clear(&mut self) {
        self.points.clear();
        self.spots.clear();
        self.dirs.clear();
    }

    #[inline]
    pub fn points(&self) -> &[PointLight] {
        &self.points
    }

    #[inline]
    pub fn spots(&self) -> &[SpotLight] {
        &self.spots
    }

    #[inline]
    pub fn dirs(&self) -> &[DirLight] {
        &self.dirs
    }

    #[inline]
    pub fn len(&self, kind: LightType) -> usize {
        match kind {
            LightType::Point => self.points.len(),
            LightType::Spot => self.spots.len(),
            LightType::Dir => self.dirs.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.spots.is_empty() && self.dirs.is_empty()
    }

    /// Count record matching the current contents.
    ///
    /// Counts saturate at `u32::MAX`; a set that large cannot be uploaded anyway.
    pub fn counts(&self) -> LightingCounts {
        let clamp = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        LightingCounts::new(
            clamp(self.points.len()),
            clamp(self.spots.len()),
            clamp(self.dirs.len()),
        )
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn point(x: f32) -> PointLight {
        PointLight::new(Vec3::new(x, 0.0, 0.0), Vec3::ONE, 1.0)
    }

    #[test]
    fn empty_set_has_zero_counts() {
        let set = LightSet::new();
        assert!(set.is_empty());
        assert_eq!(set.counts(), LightingCounts::default());
    }

    #[test]
    fn counts_follow_pushes() {
        let mut set = LightSet::new();
        set.push_point(point(0.0))
            .push_point(point(1.0))
            .push_spot(SpotLight::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::ONE, 1.0, 0.2, 0.4))
            .push_dir(DirLight::new(Vec3::NEG_Y, Vec3::ONE, 0.5));

        let c = set.counts();
        assert_eq!(c, LightingCounts::new(2, 1, 1));
        assert_eq!(c._pad, 0);
        assert_eq!(set.len(LightType::Point), 2);
        assert!(!set.is_empty());
    }

    #[test]
    fn push_order_is_preserved() {
        let mut set = LightSet::new();
        set.push_point(point(3.0)).push_point(point(7.0));
        assert_eq!(set.points()[0].position[0], 3.0);
        assert_eq!(set.points()[1].position[0], 7.0);
    }

    #[test]
    fn clear_resets_counts() {
        let mut set = LightSet::new();
        set.push_point(point(0.0));
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.counts().total(), 0);
    }
}
