use candle_core::Device;

use crate::error::Result;

/// Pick the inference device: CUDA or Metal when compiled in and present,
/// otherwise CPU. `cpu` forces CPU regardless of available accelerators.
pub fn select_device(cpu: bool) -> Result<Device> {
    if cpu {
        return Ok(Device::Cpu);
    }
    if candle_core::utils::cuda_is_available() {
        return Ok(Device::new_cuda(0)?);
    }
    if candle_core::utils::metal_is_available() {
        return Ok(Device::new_metal(0)?);
    }
    Ok(Device::Cpu)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_cpu_selects_cpu() {
        let device = select_device(true).unwrap();
        assert!(matches!(device, Device::Cpu));
    }
}
