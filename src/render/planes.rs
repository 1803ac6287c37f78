use super::helpers;
use fnv::FnvHashMap;
use glam::{EulerRot, Mat4, Quat, Vec3};
use plane_core::{MeshDesc, Plane, TextureId};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PlaneUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) resolution: [f32; 2],
    pub(crate) pointer: [f32; 2],
    pub(crate) time: f32,
    pub(crate) offset: f32,
    pub(crate) plane_aspect: f32,
    pub(crate) image_aspect: f32,
    pub(crate) reveal: f32,
    pub(crate) hover: f32,
    pub(crate) slide_blend: f32,
    pub(crate) slide_progress: f32,
}

impl PlaneUniforms {
    pub(crate) fn new(view_proj: Mat4, plane: &Plane, image_aspect: f32) -> Self {
        let t = &plane.transform;
        let rotation = Quat::from_euler(EulerRot::XYZ, t.rotation.x, t.rotation.y, t.rotation.z);
        let model = Mat4::from_scale_rotation_translation(
            Vec3::new(t.scale.x, t.scale.y, 1.0),
            rotation,
            t.position,
        );
        let p = &plane.params;
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            resolution: p.resolution.to_array(),
            pointer: p.pointer.to_array(),
            time: p.time,
            offset: p.offset,
            plane_aspect: p.plane_aspect,
            image_aspect,
            reveal: p.reveal,
            hover: p.hover,
            slide_blend: p.slide_blend,
            slide_progress: p.slide_progress,
        }
    }
}

/// Uniform buffer and bind group for one draw position.
pub(crate) struct PlaneSlot {
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

pub(crate) type TexturePair = (TextureId, TextureId);

pub(crate) struct PlaneResources {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
    uniforms_bgl: wgpu::BindGroupLayout,
    textures_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    slots: Vec<PlaneSlot>,
    texture_groups: FnvHashMap<TexturePair, wgpu::BindGroup>,
}

pub(crate) fn create_plane_resources(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    mesh: MeshDesc,
) -> PlaneResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("plane_shader"),
        source: wgpu::ShaderSource::Wgsl(plane_core::PLANE_WGSL.into()),
    });
    let uniforms_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("plane_uniforms_bgl"),
        entries: &[helpers::uniform_entry(
            0,
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        )],
    });
    let textures_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("plane_textures_bgl"),
        entries: &[
            helpers::texture_entry(0),
            helpers::texture_entry(1),
            helpers::sampler_entry(2),
        ],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("plane_pl"),
        bind_group_layouts: &[&uniforms_bgl, &textures_bgl],
        push_constant_ranges: &[],
    });
    let vertex_layout = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 4]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2],
    };
    let pipeline = helpers::make_plane_pipeline(device, &pl, &shader, vertex_layout, color_format);

    let (vertices, indices) = mesh.grid();
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("plane_vertices"),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("plane_indices"),
        contents: bytemuck::cast_slice(&indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    PlaneResources {
        pipeline,
        vertex_buffer,
        index_buffer,
        index_count: indices.len() as u32,
        uniforms_bgl,
        textures_bgl,
        sampler: helpers::create_linear_sampler(device),
        slots: Vec::new(),
        texture_groups: FnvHashMap::default(),
    }
}

impl PlaneResources {
    /// Make sure at least `count` draw slots exist.
    pub(crate) fn reserve_slots(&mut self, device: &wgpu::Device, count: usize) {
        while self.slots.len() < count {
            let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("plane_uniforms"),
                size: std::mem::size_of::<PlaneUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("plane_uniforms_bg"),
                layout: &self.uniforms_bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });
            self.slots.push(PlaneSlot {
                uniform_buffer,
                bind_group,
            });
        }
    }

    pub(crate) fn slot(&self, index: usize) -> Option<&PlaneSlot> {
        self.slots.get(index)
    }

    pub(crate) fn ensure_texture_group(
        &mut self,
        device: &wgpu::Device,
        pair: TexturePair,
        primary: &wgpu::TextureView,
        incoming: &wgpu::TextureView,
    ) {
        if self.texture_groups.contains_key(&pair) {
            return;
        }
        let group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("plane_textures_bg"),
            layout: &self.textures_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(primary),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(incoming),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        self.texture_groups.insert(pair, group);
    }

    pub(crate) fn texture_group(&self, pair: TexturePair) -> Option<&wgpu::BindGroup> {
        self.texture_groups.get(&pair)
    }

    pub(crate) fn invalidate_texture_groups(&mut self) {
        self.texture_groups.clear();
    }
}
