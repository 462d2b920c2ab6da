// ============================================================
// Layer 5: Backend Selection
// ============================================================
// Training code is generic over `AutodiffBackend`; this module
// picks the concrete backend and device from the configuration
// and hands them to a generic job.

use anyhow::Result;
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, Autodiff, NdArray, Wgpu},
    tensor::backend::AutodiffBackend,
};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub type GpuBackend = Autodiff<Wgpu>;
pub type CpuBackend = Autodiff<NdArray>;

/// Where tensors live during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// GPU through WGPU (Vulkan / Metal / DX12)
    #[default]
    Wgpu,
    /// CPU through ndarray
    Cpu,
}

/// A computation that runs on any autodiff backend.
pub trait BackendJob {
    type Output;

    fn run<B: AutodiffBackend>(self, device: B::Device) -> Result<Self::Output>;
}

impl DeviceKind {
    /// Run `job` on the backend this kind stands for
    pub fn dispatch<J: BackendJob>(self, job: J) -> Result<J::Output> {
        match self {
            DeviceKind::Wgpu => {
                let device = WgpuDevice::default();
                tracing::info!("Using WGPU device: {:?}", device);
                job.run::<GpuBackend>(device)
            }
            DeviceKind::Cpu => {
                tracing::info!("Using CPU (ndarray) device");
                job.run::<CpuBackend>(NdArrayDevice::Cpu)
            }
        }
    }
}
