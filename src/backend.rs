//! Backend selection for the Burn framework.
//!
//! The tensor backend is fixed at build time through cargo features; exactly
//! one of `ndarray` (default), `wgpu`, `cuda` must be active. Whether the
//! host actually has an accelerator is a runtime question answered by
//! [`Compute::detect`] and mapped onto a concrete device by [`device_for`].

use std::fmt;

use tracing::debug;

#[cfg(feature = "cuda")]
pub type DefaultBackend = burn::backend::Cuda;

#[cfg(all(feature = "wgpu", not(feature = "cuda")))]
pub type DefaultBackend = burn::backend::Wgpu;

#[cfg(all(feature = "ndarray", not(any(feature = "cuda", feature = "wgpu"))))]
pub type DefaultBackend = burn::backend::NdArray;

#[cfg(not(any(feature = "ndarray", feature = "wgpu", feature = "cuda")))]
compile_error!("At least one backend (ndarray, wgpu, or cuda) must be enabled!");

/// Host compute capability.
///
/// Detected once per invocation and injected into device construction, so
/// code paths stay testable on hosts without accelerators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compute {
    /// A hardware accelerator (discrete GPU) is present
    Accelerated,
    /// Processor only
    GeneralPurpose,
}

impl Compute {
    /// Probe the host for a usable accelerator
    pub fn detect() -> Self {
        let nvidia = has_nvidia_gpu();
        let amd = has_amd_gpu();
        debug!(nvidia, amd, "accelerator probe");

        if nvidia || amd {
            Compute::Accelerated
        } else {
            Compute::GeneralPurpose
        }
    }
}

impl fmt::Display for Compute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compute::Accelerated => write!(f, "accelerated"),
            Compute::GeneralPurpose => write!(f, "general-purpose"),
        }
    }
}

/// Map a compute capability onto a device of the compiled backend
pub fn device_for(compute: Compute) -> <DefaultBackend as burn::tensor::backend::Backend>::Device {
    #[cfg(feature = "cuda")]
    {
        // The CUDA backend has no processor device; a missing accelerator
        // surfaces as a device failure once the first tensor is created.
        let _ = compute;
        burn::backend::cuda::CudaDevice::default()
    }

    #[cfg(all(feature = "wgpu", not(feature = "cuda")))]
    {
        match compute {
            Compute::Accelerated => burn::backend::wgpu::WgpuDevice::default(),
            Compute::GeneralPurpose => burn::backend::wgpu::WgpuDevice::Cpu,
        }
    }

    #[cfg(all(feature = "ndarray", not(any(feature = "cuda", feature = "wgpu"))))]
    {
        // Single-device backend; the capability only affects logging.
        let _ = compute;
        burn::backend::ndarray::NdArrayDevice::Cpu
    }
}

/// Get a human-readable name for the compiled backend
pub fn backend_name() -> &'static str {
    #[cfg(feature = "cuda")]
    {
        "CUDA (GPU)"
    }

    #[cfg(all(feature = "wgpu", not(feature = "cuda")))]
    {
        "WGPU"
    }

    #[cfg(all(feature = "ndarray", not(any(feature = "cuda", feature = "wgpu"))))]
    {
        "NdArray (CPU)"
    }
}

/// Check for NVIDIA GPU (CUDA)
fn has_nvidia_gpu() -> bool {
    #[cfg(target_os = "linux")]
    {
        std::path::Path::new("/proc/driver/nvidia/version").exists()
            || std::path::Path::new("/dev/nvidia0").exists()
            || std::env::var("CUDA_VISIBLE_DEVICES")
                .map(|v| !v.is_empty() && v != "-1")
                .unwrap_or(false)
            || std::process::Command::new("nvidia-smi")
                .output()
                .map(|o| o.status.success())
                .unwrap_or(false)
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("nvidia-smi.exe")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[cfg(target_os = "macos")]
    {
        false // No NVIDIA support on modern macOS
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        false
    }
}

/// Check for AMD GPU (ROCm)
fn has_amd_gpu() -> bool {
    #[cfg(target_os = "linux")]
    {
        std::path::Path::new("/sys/module/amdgpu").exists()
            || std::env::var("HIP_VISIBLE_DEVICES")
                .map(|v| !v.is_empty())
                .unwrap_or(false)
            || std::process::Command::new("rocm-smi")
                .output()
                .map(|o| o.status.success())
                .unwrap_or(false)
    }

    #[cfg(not(target_os = "linux"))]
    {
        false // ROCm is only a realistic target on Linux
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_does_not_panic() {
        let compute = Compute::detect();
        assert!(matches!(
            compute,
            Compute::Accelerated | Compute::GeneralPurpose
        ));
    }

    #[test]
    fn test_compute_display() {
        assert_eq!(Compute::Accelerated.to_string(), "accelerated");
        assert_eq!(Compute::GeneralPurpose.to_string(), "general-purpose");
    }

    #[test]
    fn test_device_for_both_capabilities() {
        // Either capability must map onto a constructible device.
        let _ = device_for(Compute::Accelerated);
        let _ = device_for(Compute::GeneralPurpose);
    }

    #[test]
    fn test_backend_name() {
        assert!(!backend_name().is_empty());
    }
}
