pub mod encoding;
pub mod engine;
pub mod op;
pub mod value;

pub use engine::{execute, VirtualMachine, VmError, VmState};
pub use op::Op;
pub use value::Value;
