//! Registration boundary between the reduction family and the surrounding
//! engine's operator registry.
//!
//! The registry itself lives outside this crate; here we define the narrow
//! trait the core talks to, the gradient-name convention, and the explicit,
//! ordered registration list that wires up all four operators and their
//! gradients. Registration produces pure descriptor and functor values, so
//! running it twice populates the registry maps with identical entries.

use std::sync::Arc;

use log::debug;
use num_traits::Float;

use crate::ops::reduction::functor::{GradFunctor, ReduceFunctor};
use crate::ops::reduction::maker::{descriptor, OpDescriptor, REDUCE_OP_TABLE};
use crate::ops::reduction::op::{forward_functor, grad_functor};

/// Marker appended to a variable name to address its gradient, e.g. the
/// gradient of "Out" lives under "Out@GRAD". The convention is owned by the
/// surrounding framework; this helper only applies it.
pub const GRAD_SUFFIX: &str = "@GRAD";

pub fn grad_var_name(name: &str) -> String {
    format!("{name}{GRAD_SUFFIX}")
}

/// Device backends a kernel can be registered for. Only the CPU path is
/// implemented here; the kernel contract itself is device-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    Cpu,
}

/// A functor handed to the registry under an operator name.
pub enum KernelEntry<T> {
    Forward(Arc<dyn ReduceFunctor<T>>),
    Grad(Arc<dyn GradFunctor<T>>),
}

/// The slice of the engine's operator registry this crate consumes. The core
/// supplies descriptors and functors; it does not implement the registry.
pub trait OpRegistry<T> {
    /// Registers a forward operator together with its gradient operator.
    fn register_op(&mut self, desc: OpDescriptor);

    /// Registers the kernel functor for one operator name on one device.
    fn register_kernel(&mut self, op_name: &'static str, device: Device, kernel: KernelEntry<T>);
}

/// Registers the whole reduction family: for each table row, the operator
/// descriptor, the forward CPU kernel, and the gradient CPU kernel, in
/// table order.
pub fn register_reduce_ops<T, R>(registry: &mut R)
where
    T: Float + 'static,
    R: OpRegistry<T>,
{
    for meta in &REDUCE_OP_TABLE {
        debug!("registering {} (grad: {})", meta.name, meta.grad_name);
        registry.register_op(descriptor(meta));
        registry.register_kernel(
            meta.name,
            Device::Cpu,
            KernelEntry::Forward(forward_functor(meta.kind)),
        );
        registry.register_kernel(
            meta.grad_name,
            Device::Cpu,
            KernelEntry::Grad(grad_functor(meta.kind)),
        );
    }
}
