//! GPU copies of the page's images and videos.
//!
//! Images upload once, after they finish decoding. Videos upload every
//! frame they have data for. Until a source is ready its id resolves to a
//! transparent 1x1 placeholder.

use super::helpers;
use crate::constants::VIDEO_HAVE_CURRENT_DATA;
use crate::dom::Media;
use plane_core::TextureId;

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

struct Uploaded {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: (u32, u32),
}

struct Entry {
    media: Media,
    uploaded: Option<Uploaded>,
}

pub(crate) struct TextureStore {
    entries: Vec<Entry>,
    placeholder: wgpu::TextureView,
}

impl TextureStore {
    pub(crate) fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let (texture, placeholder) = helpers::create_color_texture(
            device,
            "placeholder_tex",
            1,
            1,
            FORMAT,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        );
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &[0u8; 4],
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        Self {
            entries: Vec::new(),
            placeholder,
        }
    }

    pub(crate) fn register(&mut self, media: Media) -> TextureId {
        self.entries.push(Entry {
            media,
            uploaded: None,
        });
        TextureId(self.entries.len() as u32 - 1)
    }

    pub(crate) fn view(&self, id: TextureId) -> &wgpu::TextureView {
        self.entries
            .get(id.0 as usize)
            .and_then(|e| e.uploaded.as_ref())
            .map_or(&self.placeholder, |u| &u.view)
    }

    /// Pixel size of an uploaded texture.
    pub(crate) fn size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.entries
            .get(id.0 as usize)?
            .uploaded
            .as_ref()
            .map(|u| u.size)
    }

    /// Upload whatever became ready. Returns true when any texture object
    /// was (re)created, which invalidates bind groups built from it.
    pub(crate) fn refresh(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> bool {
        let mut recreated = false;
        for (i, entry) in self.entries.iter_mut().enumerate() {
            let (size, source) = match &entry.media {
                Media::Image(img) => {
                    if entry.uploaded.is_some() || !img.complete() {
                        continue;
                    }
                    (
                        (img.natural_width(), img.natural_height()),
                        wgpu::ExternalImageSource::HTMLImageElement(img.clone()),
                    )
                }
                Media::Video(video) => {
                    if video.ready_state() < VIDEO_HAVE_CURRENT_DATA {
                        continue;
                    }
                    (
                        (video.video_width(), video.video_height()),
                        wgpu::ExternalImageSource::HTMLVideoElement(video.clone()),
                    )
                }
            };
            if size.0 == 0 || size.1 == 0 {
                continue;
            }
            if entry.uploaded.as_ref().map(|u| u.size) != Some(size) {
                let (texture, view) = helpers::create_color_texture(
                    device,
                    &format!("media_tex_{i}"),
                    size.0,
                    size.1,
                    FORMAT,
                    wgpu::TextureUsages::TEXTURE_BINDING
                        | wgpu::TextureUsages::COPY_DST
                        | wgpu::TextureUsages::RENDER_ATTACHMENT,
                );
                log::info!("[textures] #{} {}x{}", i, size.0, size.1);
                entry.uploaded = Some(Uploaded {
                    texture,
                    view,
                    size,
                });
                recreated = true;
            }
            let Some(uploaded) = entry.uploaded.as_ref() else {
                continue;
            };
            queue.copy_external_image_to_texture(
                &wgpu::CopyExternalImageSourceInfo {
                    source,
                    origin: wgpu::Origin2d::ZERO,
                    flip_y: false,
                },
                wgpu::CopyExternalImageDestInfo {
                    texture: &uploaded.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                    color_space: wgpu::PredefinedColorSpace::Srgb,
                    premultiplied_alpha: false,
                },
                wgpu::Extent3d {
                    width: size.0,
                    height: size.1,
                    depth_or_array_layers: 1,
                },
            );
        }
        recreated
    }
}
