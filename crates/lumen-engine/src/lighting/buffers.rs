use std::mem::size_of;
use std::num::NonZeroU64;

use bytemuck::Pod;

use crate::render::RenderCtx;

use super::set::LightSet;
use super::types::{DirLight, LightingCounts, PointLight, SpotLight};
use super::{COUNTS_BINDING, DIR_LIGHTS_BINDING, POINT_LIGHTS_BINDING, SPOT_LIGHTS_BINDING};

/// Smallest record capacity of a light storage buffer.
///
/// Storage bindings must not be zero-sized, so an empty set still gets room.
const MIN_CAPACITY: usize = 16;

/// GPU storage for a [`LightSet`], laid out for the bindings in `lighting.wgsl`.
///
/// Buffers are created lazily on the first upload and grown (power of two)
/// when a set no longer fits. The bind group is rebuilt whenever a buffer is
/// replaced, so callers should fetch it after each [`LightBuffers::upload`].
#[derive(Default)]
pub struct LightBuffers {
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,

    points: GrowableStorage,
    spots: GrowableStorage,
    dirs: GrowableStorage,
    counts_ubo: Option<wgpu::Buffer>,

    uploaded: LightingCounts,
}

impl LightBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind group layout entries matching `lighting.wgsl`.
    pub fn layout_entries(visibility: wgpu::ShaderStages) -> [wgpu::BindGroupLayoutEntry; 4] {
        [
            storage_entry::<PointLight>(POINT_LIGHTS_BINDING, visibility),
            storage_entry::<SpotLight>(SPOT_LIGHTS_BINDING, visibility),
            storage_entry::<DirLight>(DIR_LIGHTS_BINDING, visibility),
            wgpu::BindGroupLayoutEntry {
                binding: COUNTS_BINDING,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(size_of::<LightingCounts>() as u64),
                },
                count: None,
            },
        ]
    }

    /// Layout used for [`LightBuffers::bind_group`]. Available after the first upload.
    pub fn bind_group_layout(&self) -> Option<&wgpu::BindGroupLayout> {
        self.bind_group_layout.as_ref()
    }

    /// Bind group for `@group(LIGHTING_GROUP)`. Available after the first upload.
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }

    /// Counts written by the most recent upload.
    pub fn uploaded_counts(&self) -> LightingCounts {
        self.uploaded
    }

    /// Writes `set` into the GPU buffers, reallocating as needed.
    pub fn upload(&mut self, ctx: &RenderCtx<'_>, set: &LightSet) {
        self.ensure_layout(ctx);

        let mut reallocated = false;
        reallocated |= self.points.ensure_capacity::<PointLight>(ctx, "lumen point lights", set.points().len());
        reallocated |= self.spots.ensure_capacity::<SpotLight>(ctx, "lumen spot lights", set.spots().len());
        reallocated |= self.dirs.ensure_capacity::<DirLight>(ctx, "lumen dir lights", set.dirs().len());

        if self.counts_ubo.is_none() {
            self.counts_ubo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("lumen lighting counts ubo"),
                size: size_of::<LightingCounts>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            reallocated = true;
        }

        if reallocated || self.bind_group.is_none() {
            self.rebuild_bind_group(ctx);
        }

        self.points.write(ctx, set.points());
        self.spots.write(ctx, set.spots());
        self.dirs.write(ctx, set.dirs());

        let counts = set.counts();
        if let Some(ubo) = self.counts_ubo.as_ref() {
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&counts));
        }
        if counts != self.uploaded {
            log::trace!("light counts changed: {:?} -> {:?}", self.uploaded, counts);
        }
        self.uploaded = counts;
    }

    fn ensure_layout(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group_layout.is_some() {
            return;
        }
        let entries = Self::layout_entries(wgpu::ShaderStages::VERTEX_FRAGMENT);
        self.bind_group_layout = Some(ctx.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("lumen lighting bgl"),
                entries: &entries,
            },
        ));
        self.bind_group = None;
    }

    fn rebuild_bind_group(&mut self, ctx: &RenderCtx<'_>) {
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(points) = self.points.buffer.as_ref() else { return };
        let Some(spots) = self.spots.buffer.as_ref() else { return };
        let Some(dirs) = self.dirs.buffer.as_ref() else { return };
        let Some(counts) = self.counts_ubo.as_ref() else { return };

        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen lighting bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: POINT_LIGHTS_BINDING,
                    resource: points.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: SPOT_LIGHTS_BINDING,
                    resource: spots.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: DIR_LIGHTS_BINDING,
                    resource: dirs.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: COUNTS_BINDING,
                    resource: counts.as_entire_binding(),
                },
            ],
        }));
    }
}

fn storage_entry<T>(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: true },
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(size_of::<T>() as u64),
        },
        count: None,
    }
}

/// Record capacity for `required` records.
fn capacity_for(required: usize) -> usize {
    required.next_power_of_two().max(MIN_CAPACITY)
}

#[derive(Default)]
struct GrowableStorage {
    buffer: Option<wgpu::Buffer>,
    capacity: usize,
}

impl GrowableStorage {
    /// Returns `true` when the buffer was (re)created.
    fn ensure_capacity<T: Pod>(&mut self, ctx: &RenderCtx<'_>, label: &str, required: usize) -> bool {
        if required <= self.capacity && self.buffer.is_some() {
            return false;
        }

        let new_cap = capacity_for(required);
        log::debug!("{label}: growing storage {} -> {new_cap} records", self.capacity);

        self.buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (new_cap * size_of::<T>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.capacity = new_cap;
        true
    }

    fn write<T: Pod>(&self, ctx: &RenderCtx<'_>, records: &[T]) {
        if records.is_empty() {
            return;
        }
        let Some(buffer) = self.buffer.as_ref() else { return };
        ctx.queue.write_buffer(buffer, 0, bytemuck::cast_slice(records));
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::coords::Viewport;

    #[test]
    fn capacity_has_a_floor() {
        assert_eq!(capacity_for(0), MIN_CAPACITY);
        assert_eq!(capacity_for(1), MIN_CAPACITY);
        assert_eq!(capacity_for(MIN_CAPACITY), MIN_CAPACITY);
    }

    #[test]
    fn capacity_rounds_up_to_power_of_two() {
        assert_eq!(capacity_for(17), 32);
        assert_eq!(capacity_for(100), 128);
    }

    #[test]
    fn layout_entries_match_shader_bindings() {
        let entries = LightBuffers::layout_entries(wgpu::ShaderStages::FRAGMENT);
        let bindings: Vec<u32> = entries.iter().map(|e| e.binding).collect();
        assert_eq!(
            bindings,
            [POINT_LIGHTS_BINDING, SPOT_LIGHTS_BINDING, DIR_LIGHTS_BINDING, COUNTS_BINDING]
        );

        match entries[1].ty {
            wgpu::BindingType::Buffer { ty, min_binding_size, .. } => {
                assert_eq!(ty, wgpu::BufferBindingType::Storage { read_only: true });
                assert_eq!(min_binding_size.map(NonZeroU64::get), Some(64));
            }
            other => panic!("unexpected binding type {other:?}"),
        }
        match entries[3].ty {
            wgpu::BindingType::Buffer { ty, .. } => {
                assert_eq!(ty, wgpu::BufferBindingType::Uniform);
            }
            other => panic!("unexpected binding type {other:?}"),
        }
    }

    // ── device-backed ─────────────────────────────────────────────────────

    fn points(n: usize) -> LightSet {
        let mut set = LightSet::new();
        for i in 0..n {
            set.push_point(PointLight::new(Vec3::splat(i as f32), Vec3::ONE, 1.0));
        }
        set
    }

    #[test]
    fn upload_grows_buffers_and_rebuilds_the_bind_group() {
        let (device, queue) = wgpu::Device::noop(&wgpu::DeviceDescriptor::default());
        let ctx = RenderCtx::new(
            &device,
            &queue,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            Viewport::new(64.0, 64.0),
        );
        let mut buffers = LightBuffers::new();
        assert!(buffers.bind_group().is_none());

        buffers.upload(&ctx, &points(1));
        assert_eq!(buffers.uploaded_counts(), LightingCounts::new(1, 0, 0));
        assert_eq!(buffers.points.capacity, 16);
        assert_eq!(buffers.spots.capacity, 16);
        assert_eq!(buffers.dirs.capacity, 16);
        assert!(buffers.bind_group_layout().is_some());
        let first = buffers.bind_group().cloned().unwrap();

        buffers.upload(&ctx, &points(17));
        assert_eq!(buffers.uploaded_counts(), LightingCounts::new(17, 0, 0));
        assert_eq!(buffers.points.capacity, 32);
        assert_eq!(buffers.spots.capacity, 16);
        let grown = buffers.bind_group().cloned().unwrap();
        assert_ne!(first, grown);

        buffers.upload(&ctx, &LightSet::new());
        assert_eq!(buffers.uploaded_counts(), LightingCounts::new(0, 0, 0));
        assert_eq!(buffers.points.capacity, 32);
        assert_eq!(buffers.bind_group(), Some(&grown));
    }
}
