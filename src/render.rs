use crate::constants::CLEAR_RGBA;
use crate::dom::Media;
use plane_core::{RenderBackend, SceneConfig, SceneFrame, TextureId, Viewport};
use web_sys as web;

mod helpers;
mod planes;
mod textures;

use planes::{create_plane_resources, PlaneResources, PlaneUniforms};
use textures::TextureStore;

// ===================== WebGPU backend =====================

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    canvas: web::HtmlCanvasElement,
    planes: PlaneResources,
    textures: TextureStore,
    max_pixel_ratio: f32,
    clear_color: wgpu::Color,
}

impl GpuState {
    pub async fn new(
        canvas: web::HtmlCanvasElement,
        viewport: Viewport,
        scene: &SceneConfig,
    ) -> anyhow::Result<Self> {
        let (width, height) = viewport.physical_size(scene.max_pixel_ratio);
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        // the page shows through wherever no plane is drawn
        let alpha_mode = [
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ]
        .into_iter()
        .find(|m| caps.alpha_modes.contains(m))
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("[gpu] surface {}x{} {:?}", width, height, format);

        let planes = create_plane_resources(&device, format, scene.mesh);
        let textures = TextureStore::new(&device, &queue);
        let [r, g, b, a] = CLEAR_RGBA;

        Ok(Self {
            surface,
            device,
            queue,
            config,
            canvas,
            planes,
            textures,
            max_pixel_ratio: scene.max_pixel_ratio,
            clear_color: wgpu::Color { r, g, b, a },
        })
    }

    pub fn register_texture(&mut self, media: Media) -> TextureId {
        self.textures.register(media)
    }

    /// Pull new image and video frames into their textures.
    pub fn refresh_textures(&mut self) {
        if self.textures.refresh(&self.device, &self.queue) {
            self.planes.invalidate_texture_groups();
        }
    }

    // aspect of the decoded source once known, else what layout reported
    fn image_aspect(&self, id: TextureId, fallback: f32) -> f32 {
        match self.textures.size(id) {
            Some((w, h)) if h > 0 => w as f32 / h as f32,
            _ => fallback,
        }
    }
}

impl RenderBackend for GpuState {
    type Error = wgpu::SurfaceError;

    fn resize(&mut self, viewport: Viewport) {
        let (width, height) = viewport.physical_size(self.max_pixel_ratio);
        if width == self.config.width && height == self.config.height {
            return;
        }
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn submit(&mut self, frame: &SceneFrame<'_>) -> Result<(), Self::Error> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                self.surface.configure(&self.device, &self.config);
                return Err(e);
            }
            Err(e) => return Err(e),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // planes that never had a layout rectangle have nothing to show yet
        let view_proj = frame.camera.view_projection();
        let visible: Vec<_> = frame.draw_order().filter(|p| p.rect.is_some()).collect();
        self.planes.reserve_slots(&self.device, visible.len());
        let mut draws = Vec::with_capacity(visible.len());
        for (slot, plane) in visible.iter().enumerate() {
            let pair = (plane.params.primary, plane.params.incoming);
            self.planes.ensure_texture_group(
                &self.device,
                pair,
                self.textures.view(pair.0),
                self.textures.view(pair.1),
            );
            let aspect = self.image_aspect(pair.0, plane.params.image_aspect);
            if let Some(s) = self.planes.slot(slot) {
                let u = PlaneUniforms::new(view_proj, plane, aspect);
                self.queue
                    .write_buffer(&s.uniform_buffer, 0, bytemuck::bytes_of(&u));
                draws.push((slot, pair));
            }
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("plane_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.planes.pipeline);
            rpass.set_vertex_buffer(0, self.planes.vertex_buffer.slice(..));
            rpass.set_index_buffer(self.planes.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            for (slot, pair) in draws {
                let (Some(s), Some(textures)) =
                    (self.planes.slot(slot), self.planes.texture_group(pair))
                else {
                    continue;
                };
                rpass.set_bind_group(0, &s.bind_group, &[]);
                rpass.set_bind_group(1, textures, &[]);
                rpass.draw_indexed(0..self.planes.index_count, 0, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}
