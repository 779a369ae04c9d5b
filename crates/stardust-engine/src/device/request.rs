//! Adapter and device acquisition.
//!
//! Both requests resolve through wgpu callbacks. They are driven with `pollster`
//! and raced against a timer, so a stalled driver surfaces as
//! [`RenderError::RequestTimeout`] instead of hanging the process.

use std::future::Future;
use std::pin::pin;
use std::time::Duration;

use futures::future::{self, Either};
use futures_timer::Delay;

use super::init::REQUIRED_BIND_GROUPS;
use super::{ContextInit, RenderError};

/// Source of the adapter and device a render context is built on.
pub trait DeviceSource {
    type Adapter;
    /// Device plus its queue.
    type Device;

    fn request_adapter(
        &self,
        init: &ContextInit,
    ) -> impl Future<Output = Result<Self::Adapter, RenderError>>;

    fn adapter_limits(&self, adapter: &Self::Adapter) -> wgpu::Limits;

    fn request_device(
        &self,
        adapter: &Self::Adapter,
        init: &ContextInit,
    ) -> impl Future<Output = Result<Self::Device, RenderError>>;
}

/// Rejects adapters that cannot bind at least one bind group.
pub fn check_adapter_limits(limits: &wgpu::Limits) -> Result<(), RenderError> {
    if limits.max_bind_groups < REQUIRED_BIND_GROUPS {
        return Err(RenderError::InsufficientCapability {
            available: limits.max_bind_groups,
            required: REQUIRED_BIND_GROUPS,
        });
    }
    Ok(())
}

/// Requests the adapter, checks its limits, then requests the device.
///
/// An adapter that fails the limit check never gets a device request.
pub fn acquire_device<S: DeviceSource>(
    source: &S,
    init: &ContextInit,
) -> Result<(S::Adapter, S::Device), RenderError> {
    let adapter = block_on_timeout(source.request_adapter(init), init.request_timeout).ok_or(
        RenderError::RequestTimeout {
            operation: "adapter request",
            timeout: init.request_timeout,
        },
    )??;

    check_adapter_limits(&source.adapter_limits(&adapter))?;

    let device = block_on_timeout(source.request_device(&adapter, init), init.request_timeout)
        .ok_or(RenderError::RequestTimeout {
            operation: "device request",
            timeout: init.request_timeout,
        })??;

    Ok((adapter, device))
}

/// Blocks on `fut` for at most `timeout`. `None` means the timer won.
fn block_on_timeout<F: Future>(fut: F, timeout: Duration) -> Option<F::Output> {
    let request = pin!(fut);
    match pollster::block_on(future::select(request, Delay::new(timeout))) {
        Either::Left((output, _)) => Some(output),
        Either::Right(_) => None,
    }
}

/// wgpu-backed source: adapters compatible with the context's surface.
pub(crate) struct WgpuDeviceSource<'a, 'w> {
    pub instance: &'a wgpu::Instance,
    pub surface: &'a wgpu::Surface<'w>,
}

impl DeviceSource for WgpuDeviceSource<'_, '_> {
    type Adapter = wgpu::Adapter;
    type Device = (wgpu::Device, wgpu::Queue);

    fn request_adapter(
        &self,
        init: &ContextInit,
    ) -> impl Future<Output = Result<wgpu::Adapter, RenderError>> {
        let options = wgpu::RequestAdapterOptions {
            power_preference: init.power_preference,
            compatible_surface: Some(self.surface),
            force_fallback_adapter: false,
        };

        async move {
            self.instance
                .request_adapter(&options)
                .await
                .map_err(|e| RenderError::AdapterUnavailable(e.to_string()))
        }
    }

    fn adapter_limits(&self, adapter: &wgpu::Adapter) -> wgpu::Limits {
        adapter.limits()
    }

    fn request_device(
        &self,
        adapter: &wgpu::Adapter,
        init: &ContextInit,
    ) -> impl Future<Output = Result<(wgpu::Device, wgpu::Queue), RenderError>> {
        let descriptor = wgpu::DeviceDescriptor {
            label: Some("stardust device"),
            required_features: wgpu::Features::empty(),
            required_limits: init.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        };

        async move {
            adapter
                .request_device(&descriptor)
                .await
                .map_err(|e| RenderError::DeviceCreation(e.to_string()))
        }
    }
}
