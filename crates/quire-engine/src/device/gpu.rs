use anyhow::{Context, Result};

use crate::render::WgpuBackend;

use super::GpuInit;

/// Owns wgpu core objects for offscreen rendering.
///
/// - creates and stores Instance/Adapter/Device/Queue
/// - hands out [`WgpuBackend`]s sharing its device and queue
/// - allocates color targets they can draw into
pub struct HeadlessGpu {
    /// Kept alive for the lifetime of the adapter.
    _instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,
}

/// Color texture plus a view usable as a render attachment.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl HeadlessGpu {
    /// Creates a device without a presentation surface.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(init: GpuInit) -> Result<Self> {
        // Use all backends to allow wgpu to select the optimal platform backend.
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: init.force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("quire-engine device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        Ok(Self {
            _instance: instance,
            adapter,
            device,
            queue,
            format: init.target_format,
        })
    }

    /// Blocking wrapper around [`HeadlessGpu::new`].
    pub fn new_blocking(init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::new(init))
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Blocks until every submitted command buffer has finished executing.
    pub fn wait_idle(&self) -> Result<()> {
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .context("GPU poll failed")?;
        Ok(())
    }

    /// Backend drawing with this device in the configured target format.
    pub fn backend(&self) -> WgpuBackend {
        WgpuBackend::new(self.device.clone(), self.queue.clone(), self.format)
    }

    /// Allocates a `width x height` color target (physical pixels, at least 1x1).
    pub fn create_target(&self, width: u32, height: u32) -> OffscreenTarget {
        let (width, height) = (width.max(1), height.max(1));
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("quire offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        OffscreenTarget {
            texture,
            view,
            width,
            height,
        }
    }
}

impl OffscreenTarget {
    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Clears the target to `color`. Drawing uses `LoadOp::Load`, so frames
    /// start from whatever was cleared here.
    pub fn clear(&self, gpu: &HeadlessGpu, color: wgpu::Color) {
        let mut encoder = gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("quire clear encoder"),
        });
        {
            let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quire clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AlphaMode, Canvas};

    #[test]
    fn frames_complete_on_the_device() {
        // Machines without an adapter have nothing to exercise.
        let Ok(gpu) = HeadlessGpu::new_blocking(GpuInit::default()) else {
            eprintln!("no GPU adapter available, skipping");
            return;
        };
        let target = gpu.create_target(64, 64);
        assert_eq!(target.size(), (64, 64));

        let mut backend = gpu.backend();
        backend.set_target(target.view().clone());
        let mut canvas = Canvas::new(backend);
        for _ in 0..3 {
            target.clear(&gpu, wgpu::Color::BLACK);
            let mut f = canvas.begin_frame(64.0, 64.0, 1.0, AlphaMode::Straight).unwrap();
            f.begin_path();
            f.circle(32.0, 32.0, 20.0);
            f.fill();
            f.end().unwrap();
            gpu.wait_idle().unwrap();
        }
        assert_eq!(canvas.frames_submitted(), 3);
    }
}
