/// Texel filter used by [`SamplerState`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
}

/// How out-of-range texel indices are resolved.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum AddressMode {
    #[default]
    ClampToEdge,
    Repeat,
    MirrorRepeat,
}

impl AddressMode {
    /// Maps a texel index onto `0..len`. An empty axis resolves to 0.
    pub(crate) fn resolve(self, index: i64, len: u32) -> u32 {
        if len == 0 {
            return 0;
        }
        let n = i64::from(len);
        let i = match self {
            AddressMode::ClampToEdge => index.clamp(0, n - 1),
            AddressMode::Repeat => index.rem_euclid(n),
            AddressMode::MirrorRepeat => {
                let m = index.rem_euclid(2 * n);
                if m < n { m } else { 2 * n - 1 - m }
            }
        };
        i as u32
    }
}

/// Sampler configuration shared by the GPU quad renderer and the CPU
/// reference sampler.
///
/// The default (linear filtering, clamp-to-edge) is what the quad viewer
/// uses for photos.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct SamplerState {
    pub mag_filter: FilterMode,
    pub min_filter: FilterMode,
    pub address_mode_u: AddressMode,
    pub address_mode_v: AddressMode,
}

impl SamplerState {
    /// Nearest filtering in both directions, clamp-to-edge.
    pub const fn nearest() -> Self {
        Self {
            mag_filter: FilterMode::Nearest,
            min_filter: FilterMode::Nearest,
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
        }
    }

    pub const fn with_address_mode(mut self, mode: AddressMode) -> Self {
        self.address_mode_u = mode;
        self.address_mode_v = mode;
        self
    }

    /// Descriptor for the equivalent `wgpu::Sampler`.
    pub fn to_wgpu<'a>(&self, label: Option<&'a str>) -> wgpu::SamplerDescriptor<'a> {
        wgpu::SamplerDescriptor {
            label,
            address_mode_u: self.address_mode_u.into(),
            address_mode_v: self.address_mode_v.into(),
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: self.mag_filter.into(),
            min_filter: self.min_filter.into(),
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }
    }
}

impl From<FilterMode> for wgpu::FilterMode {
    fn from(mode: FilterMode) -> Self {
        match mode {
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
            FilterMode::Linear => wgpu::FilterMode::Linear,
        }
    }
}

impl From<AddressMode> for wgpu::AddressMode {
    fn from(mode: AddressMode) -> Self {
        match mode {
            AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            AddressMode::Repeat => wgpu::AddressMode::Repeat,
            AddressMode::MirrorRepeat => wgpu::AddressMode::MirrorRepeat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_to_edge_pins_indices() {
        assert_eq!(AddressMode::ClampToEdge.resolve(-3, 4), 0);
        assert_eq!(AddressMode::ClampToEdge.resolve(2, 4), 2);
        assert_eq!(AddressMode::ClampToEdge.resolve(9, 4), 3);
    }

    #[test]
    fn repeat_wraps_both_directions() {
        assert_eq!(AddressMode::Repeat.resolve(5, 4), 1);
        assert_eq!(AddressMode::Repeat.resolve(-1, 4), 3);
    }

    #[test]
    fn mirror_repeat_reflects() {
        // 0 1 2 3 | 3 2 1 0 | 0 1 ...
        let got: Vec<u32> = (0..10).map(|i| AddressMode::MirrorRepeat.resolve(i, 4)).collect();
        assert_eq!(got, [0, 1, 2, 3, 3, 2, 1, 0, 0, 1]);
        assert_eq!(AddressMode::MirrorRepeat.resolve(-1, 4), 0);
    }

    #[test]
    fn extreme_indices_stay_in_range() {
        for mode in [AddressMode::ClampToEdge, AddressMode::Repeat, AddressMode::MirrorRepeat] {
            for index in [i64::MIN, i64::MAX] {
                assert!(mode.resolve(index, 4) < 4, "{mode:?} {index}");
            }
            assert_eq!(mode.resolve(7, 0), 0);
        }
    }

    #[test]
    fn default_is_linear_clamp() {
        let s = SamplerState::default();
        assert_eq!(s.mag_filter, FilterMode::Linear);
        assert_eq!(s.min_filter, FilterMode::Linear);
        assert_eq!(s.address_mode_u, AddressMode::ClampToEdge);
        assert_eq!(s.address_mode_v, AddressMode::ClampToEdge);
    }

    #[test]
    fn wgpu_descriptor_mirrors_state() {
        let s = SamplerState::nearest().with_address_mode(AddressMode::Repeat);
        let d = s.to_wgpu(Some("test"));
        assert_eq!(d.label, Some("test"));
        assert_eq!(d.mag_filter, wgpu::FilterMode::Nearest);
        assert_eq!(d.min_filter, wgpu::FilterMode::Nearest);
        assert_eq!(d.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(d.address_mode_v, wgpu::AddressMode::Repeat);
        assert_eq!(d.address_mode_w, wgpu::AddressMode::ClampToEdge);
    }
}
