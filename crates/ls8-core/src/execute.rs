//! Fetch-decode-execute engine.
//!
//! Each cycle fetches the byte at PC, resolves it through the opcode
//! table, and runs the matching handler. Handlers never touch PC
//! directly: every handler returns a [`Control`] value and the engine
//! applies it centrally, so a handler cannot forget to advance past its
//! operands.
//!
//! Faults are precise: fetch and operand decode happen before any state
//! mutation, so a faulting step leaves the machine exactly as it was.

use crate::{alu, Fault, GeneralRegister, Machine, Opcode, OutputSink, TraceSink};

/// PC disposition returned by every instruction handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Advance the PC by the instruction's full width in bytes.
    Advance(u16),
    /// Set the PC to an absolute address (`CALL`/`RET`).
    Jump(u16),
}

impl Control {
    /// Advance past `opcode` and its operand bytes, with the width taken
    /// from the encoded operand-count field.
    #[must_use]
    pub fn advance_past(opcode: Opcode) -> Self {
        Self::Advance(1 + u16::from(opcode.operand_count()))
    }
}

/// Status of one retired instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// Instruction retired; the machine is ready for the next fetch.
    Retired,
    /// `HLT` retired; no further instructions execute.
    Halted,
}

/// Run-loop configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RunConfig {
    /// Optional cap on retired instructions, as a safety net for programs
    /// that never reach `HLT`. `None` runs without a cap.
    pub step_budget: Option<u64>,
}

/// Aggregated result of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Number of instructions retired, `HLT` included.
    pub steps: u64,
}

/// Executes one instruction.
///
/// # Errors
///
/// Returns [`Fault::UnknownInstruction`] when the fetched byte has no
/// opcode-table entry, or any fault raised by the handler. The machine
/// state is unchanged on error.
pub fn step(machine: &mut Machine, output: &mut dyn OutputSink) -> Result<StepOutcome, Fault> {
    let pc = machine.pc();
    let byte = machine.memory().read(pc)?;
    let opcode = Opcode::from_byte(byte).ok_or(Fault::UnknownInstruction { opcode: byte, pc })?;

    let control = match opcode {
        Opcode::Hlt => execute_hlt(machine),
        Opcode::Ldi => execute_ldi(machine)?,
        Opcode::Prn => execute_prn(machine, output)?,
        Opcode::Push => execute_push(machine)?,
        Opcode::Pop => execute_pop(machine)?,
        Opcode::Call => execute_call(machine)?,
        Opcode::Ret => execute_ret(machine)?,
        Opcode::Add | Opcode::Mul => execute_alu(opcode, machine)?,
    };

    match control {
        Control::Advance(width) => machine.set_pc(pc + width),
        Control::Jump(target) => machine.set_pc(target),
    }

    Ok(if machine.is_halted() {
        StepOutcome::Halted
    } else {
        StepOutcome::Retired
    })
}

/// Runs the machine until `HLT` retires.
///
/// # Errors
///
/// Propagates any fault from [`step`], and returns
/// [`Fault::StepBudgetExhausted`] when a configured budget runs out
/// before `HLT`.
pub fn run(
    machine: &mut Machine,
    output: &mut dyn OutputSink,
    config: &RunConfig,
) -> Result<RunOutcome, Fault> {
    run_traced(machine, output, config, &mut NullTrace)
}

/// Runs the machine until `HLT` retires, notifying `trace` before each
/// fetch.
///
/// This is the only run loop; [`run`] delegates here with a no-op
/// trace, so budget semantics live in one place.
///
/// # Errors
///
/// Same contract as [`run`].
pub fn run_traced(
    machine: &mut Machine,
    output: &mut dyn OutputSink,
    config: &RunConfig,
    trace: &mut dyn TraceSink,
) -> Result<RunOutcome, Fault> {
    let mut steps: u64 = 0;

    while !machine.is_halted() {
        if let Some(budget) = config.step_budget {
            if steps >= budget {
                return Err(Fault::StepBudgetExhausted { budget });
            }
        }

        trace.on_step(machine);
        step(machine, output)?;
        steps += 1;
    }

    Ok(RunOutcome { steps })
}

struct NullTrace;

impl TraceSink for NullTrace {
    fn on_step(&mut self, _machine: &Machine) {}
}

/// Reads the register operand at `PC + offset`.
fn register_operand(machine: &Machine, offset: u16) -> Result<GeneralRegister, Fault> {
    let pc = machine.pc();
    let byte = machine.memory().read(pc + offset)?;
    GeneralRegister::from_byte(byte).ok_or(Fault::InvalidRegister { index: byte, pc })
}

/// Reads the immediate operand at `PC + offset`.
fn immediate_operand(machine: &Machine, offset: u16) -> Result<u8, Fault> {
    machine.memory().read(machine.pc() + offset)
}

fn execute_hlt(machine: &mut Machine) -> Control {
    machine.halt();
    Control::advance_past(Opcode::Hlt)
}

fn execute_ldi(machine: &mut Machine) -> Result<Control, Fault> {
    let reg = register_operand(machine, 1)?;
    let value = immediate_operand(machine, 2)?;
    machine.registers_mut().set(reg, value);
    Ok(Control::advance_past(Opcode::Ldi))
}

fn execute_prn(machine: &mut Machine, output: &mut dyn OutputSink) -> Result<Control, Fault> {
    let reg = register_operand(machine, 1)?;
    output.print_value(machine.registers().get(reg));
    Ok(Control::advance_past(Opcode::Prn))
}

fn execute_alu(opcode: Opcode, machine: &mut Machine) -> Result<Control, Fault> {
    let reg_a = register_operand(machine, 1)?;
    let reg_b = register_operand(machine, 2)?;

    let result = alu::apply(
        opcode,
        machine.registers().get(reg_a),
        machine.registers().get(reg_b),
    )?;
    machine.registers_mut().set(reg_a, result);

    Ok(Control::advance_past(opcode))
}

fn execute_push(machine: &mut Machine) -> Result<Control, Fault> {
    let reg = register_operand(machine, 1)?;
    let value = machine.registers().get(reg);
    machine.push_byte(value)?;
    Ok(Control::advance_past(Opcode::Push))
}

fn execute_pop(machine: &mut Machine) -> Result<Control, Fault> {
    let reg = register_operand(machine, 1)?;
    let value = machine.pop_byte()?;
    machine.registers_mut().set(reg, value);
    Ok(Control::advance_past(Opcode::Pop))
}

fn execute_call(machine: &mut Machine) -> Result<Control, Fault> {
    let reg = register_operand(machine, 1)?;
    let target = machine.registers().get(reg);

    // Return address is the instruction after CALL's operand; it must
    // itself be a valid 8-bit address to live on the stack.
    let return_pc = machine.pc() + 2;
    let return_addr =
        u8::try_from(return_pc).map_err(|_| Fault::OutOfBoundsAccess { addr: return_pc })?;
    machine.push_byte(return_addr)?;

    Ok(Control::Jump(u16::from(target)))
}

fn execute_ret(machine: &mut Machine) -> Result<Control, Fault> {
    let return_addr = machine.pop_byte()?;
    Ok(Control::Jump(u16::from(return_addr)))
}
