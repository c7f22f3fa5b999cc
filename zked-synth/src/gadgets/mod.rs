//! Common circuit gadgets.
//!
//! Every gadget links the fresh wires returned by [`Driver::mul`] back to its
//! operands, so the outputs are fully determined by the inputs.
//!
//! [`Driver::mul`]: crate::driver::Driver::mul

pub mod arithmetic;
pub mod boolean;
pub mod range;
pub mod select;

pub use arithmetic::*;
pub use boolean::*;
pub use range::*;
pub use select::*;
