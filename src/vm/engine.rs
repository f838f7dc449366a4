use crate::config::VmConfig;
use crate::vm::op::Op;
use crate::vm::value::Value;
use log::{debug, trace};
use thiserror::Error;

const INITIAL_STACK_CAPACITY: usize = 64;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmError {
    #[error("invalid opcode at position {0}")]
    InvalidOpcode(usize),
    #[error("stack underflow")]
    StackUnderflow,
    #[error("stack overflow (limit of {limit} values)")]
    StackOverflow { limit: usize },
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo operand is not a whole number")]
    NonIntegralOperand,
}

/// Lifecycle of a single run. `Halted` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VmState<V> {
    Running,
    Halted(V),
    Failed(VmError),
}

impl<V> VmState<V> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, VmState::Running)
    }
}

/// Executes one program over a private operand stack.
///
/// A machine is bound to the program it was created for and is consumed by
/// [`VirtualMachine::run`], so every run starts from an empty stack.
pub struct VirtualMachine<'p, V> {
    program: &'p [Op<V>],
    stack: Vec<V>,
    pc: usize,
    state: VmState<V>,
    max_stack_depth: Option<usize>,
}

impl<'p, V: Value> VirtualMachine<'p, V> {
    pub fn new(program: &'p [Op<V>]) -> Self {
        Self::with_config(program, &VmConfig::default())
    }

    pub fn with_config(program: &'p [Op<V>], config: &VmConfig) -> Self {
        let capacity = config
            .max_stack_depth
            .map_or(INITIAL_STACK_CAPACITY, |limit| limit.min(INITIAL_STACK_CAPACITY));
        Self {
            program,
            stack: Vec::with_capacity(capacity),
            pc: 0,
            state: VmState::Running,
            max_stack_depth: config.max_stack_depth,
        }
    }

    pub fn state(&self) -> VmState<V> {
        self.state
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// Runs the program to completion or to its first error.
    ///
    /// # Returns
    /// * `Ok(V)` - the top of the stack, or zero if the program left it empty.
    /// * `Err(VmError)` - the error raised by the first failing instruction.
    pub fn run(mut self) -> Result<V, VmError> {
        loop {
            match self.step() {
                VmState::Running => {}
                VmState::Halted(val) => return Ok(val),
                VmState::Failed(err) => return Err(err),
            }
        }
    }

    /// Executes the instruction under the pointer, or halts once the pointer
    /// has moved past the end of the program. Stepping a terminal machine
    /// returns its final state unchanged.
    pub fn step(&mut self) -> VmState<V> {
        if self.state.is_terminal() {
            return self.state;
        }

        let program = self.program;
        let Some(&op) = program.get(self.pc) else {
            let result = self.stack.last().copied().unwrap_or_else(V::zero);
            debug!(
                "Halted after {} instructions with {} value(s) on the stack, result {}",
                self.pc,
                self.stack.len(),
                result
            );
            self.state = VmState::Halted(result);
            return self.state;
        };

        let position = self.pc;
        trace!("{:>4}: {} stack={:?}", position, op, self.stack);
        match self.dispatch(position, op) {
            Ok(()) => self.pc += 1,
            Err(err) => {
                debug!("Execution failed at position {} ({}): {}", position, op, err);
                self.state = VmState::Failed(err);
            }
        }
        self.state
    }

    fn dispatch(&mut self, position: usize, op: Op<V>) -> Result<(), VmError> {
        match op {
            Op::Invalid => Err(VmError::InvalidOpcode(position)),
            Op::Push(val) => self.push(val),
            Op::Add => self.apply_binary_op(|a, b| Ok(a.plus(b))),
            Op::Sub => self.apply_binary_op(|a, b| Ok(a.minus(b))),
            Op::Mul => self.apply_binary_op(|a, b| Ok(a.times(b))),
            Op::Div => self.apply_binary_op(V::divide),
            Op::Mod => self.apply_binary_op(V::remainder),
            Op::Cmp => self.apply_binary_op(|a, b| Ok(a.compare(b))),
        }
    }

    #[inline]
    fn push(&mut self, val: V) -> Result<(), VmError> {
        match self.max_stack_depth {
            Some(limit) if self.stack.len() >= limit => Err(VmError::StackOverflow { limit }),
            _ => {
                self.stack.push(val);
                Ok(())
            }
        }
    }

    #[inline]
    fn pop(&mut self) -> Result<V, VmError> {
        self.stack.pop().ok_or(VmError::StackUnderflow)
    }

    /// Pops `b` (top) then `a` and pushes `op(a, b)`. Nothing is pushed when
    /// `op` fails.
    #[inline]
    fn apply_binary_op<F>(&mut self, op: F) -> Result<(), VmError>
    where
        F: Fn(V, V) -> Result<V, VmError>,
    {
        if self.stack.len() < 2 {
            return Err(VmError::StackUnderflow);
        }
        let b = self.pop()?;
        let a = self.pop()?;
        self.push(op(a, b)?)
    }
}

/// Runs `program` on a fresh machine with the default configuration.
pub fn execute<V: Value>(program: &[Op<V>]) -> Result<V, VmError> {
    VirtualMachine::new(program).run()
}
