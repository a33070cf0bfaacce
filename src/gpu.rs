use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::{Adapter, AdapterInfo, Device, DeviceDescriptor, Instance, Queue, Surface};

/// Shared GPU context
///
/// Device and queue are `Arc`-shared so the context can be cloned cheaply
/// into each scene; scenes allocate their own pipelines and buffers from it
/// and drop them when they deinitialize.
#[derive(Clone)]
pub struct GpuContext {
    adapter: Arc<Adapter>,
    device: Arc<Device>,
    queue: Arc<Queue>,
}

impl GpuContext {
    /// Create a GPU context compatible with the given surface
    ///
    /// The surface must come from the same `Instance`.
    pub async fn new(instance: &Instance, surface: &Surface<'_>) -> Result<Self> {
        let adapter = Self::request_adapter(instance, surface).await?;
        let (device, queue) = Self::request_device(&adapter).await?;

        Ok(Self {
            adapter: Arc::new(adapter),
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Adapter identification for the environment report
    pub fn adapter_info(&self) -> AdapterInfo {
        self.adapter.get_info()
    }

    async fn request_adapter(instance: &Instance, surface: &Surface<'_>) -> Result<Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible graphics adapter found")
    }

    async fn request_device(adapter: &Adapter) -> Result<(Device, Queue)> {
        adapter
            .request_device(&DeviceDescriptor {
                label: Some("framebench device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("failed to create graphics device")
    }
}
