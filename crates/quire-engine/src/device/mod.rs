//! Headless GPU bootstrap.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue without a surface
//! - allocating offscreen color targets for the wgpu backend

mod gpu;
mod init;

pub use gpu::{HeadlessGpu, OffscreenTarget};
pub use init::GpuInit;
