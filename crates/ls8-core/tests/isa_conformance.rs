//! End-to-end conformance tests for the LS-8 instruction set.

#![allow(clippy::pedantic, clippy::nursery)]

use ls8_core::{
    run, CapturedOutput, Fault, GeneralRegister, Machine, Opcode, RunConfig,
    STACK_POINTER_INIT,
};
use proptest::prelude::*;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

/// Loads `program` into a fresh machine and runs it to completion.
fn run_program(program: &[u8]) -> (Machine, CapturedOutput) {
    let mut machine = Machine::new();
    machine.load_program(program).expect("program fits in memory");
    let mut output = CapturedOutput::new();

    run(&mut machine, &mut output, &RunConfig::default()).expect("program halts cleanly");

    (machine, output)
}

#[test]
fn mult_program_prints_seventy_two() {
    // LDI R0,8 / LDI R1,9 / MUL R0,R1 / PRN R0 / HLT
    let program = [
        0b1000_0010, 0b0000_0000, 0b0000_1000,
        0b1000_0010, 0b0000_0001, 0b0000_1001,
        0b1010_0010, 0b0000_0000, 0b0000_0001,
        0b0100_0111, 0b0000_0000,
        0b0000_0001,
    ];

    let (machine, output) = run_program(&program);

    assert_eq!(output.lines(), vec!["72"]);
    assert_eq!(machine.registers().get(GeneralRegister::R0), 72);
}

#[test]
fn push_pop_moves_value_between_registers_and_restores_sp() {
    // LDI R2,5 / PUSH R2 / POP R3 / HLT
    let program = [
        Opcode::Ldi.as_byte(), 2, 5,
        Opcode::Push.as_byte(), 2,
        Opcode::Pop.as_byte(), 3,
        Opcode::Hlt.as_byte(),
    ];

    let (machine, _) = run_program(&program);

    assert_eq!(machine.registers().get(GeneralRegister::R3), 5);
    assert_eq!(machine.registers().sp(), STACK_POINTER_INIT);
}

#[test]
fn stack_pops_in_reverse_push_order() {
    // Push R0 then R1, pop into R2 then R3: R2 gets R1's value first.
    let program = [
        Opcode::Ldi.as_byte(), 0, 10,
        Opcode::Ldi.as_byte(), 1, 20,
        Opcode::Push.as_byte(), 0,
        Opcode::Push.as_byte(), 1,
        Opcode::Pop.as_byte(), 2,
        Opcode::Pop.as_byte(), 3,
        Opcode::Hlt.as_byte(),
    ];

    let (machine, _) = run_program(&program);

    assert_eq!(machine.registers().get(GeneralRegister::R2), 20);
    assert_eq!(machine.registers().get(GeneralRegister::R3), 10);
    assert_eq!(machine.registers().sp(), STACK_POINTER_INIT);
}

#[test]
fn call_and_ret_resume_after_call_operands() {
    // 0: LDI R0,5   3: LDI R1,11   6: CALL R1   8: PRN R0   10: HLT
    // 11: ADD R0,R0   14: RET
    let program = [
        Opcode::Ldi.as_byte(), 0, 5,
        Opcode::Ldi.as_byte(), 1, 11,
        Opcode::Call.as_byte(), 1,
        Opcode::Prn.as_byte(), 0,
        Opcode::Hlt.as_byte(),
        Opcode::Add.as_byte(), 0, 0,
        Opcode::Ret.as_byte(),
    ];

    let (machine, output) = run_program(&program);

    assert_eq!(output.lines(), vec!["10"]);
    assert_eq!(machine.registers().sp(), STACK_POINTER_INIT);
    assert_eq!(machine.pc(), 11);
}

#[test]
fn halt_stops_execution_before_later_instructions() {
    // The PRN after HLT must never run.
    let program = [
        Opcode::Ldi.as_byte(), 0, 1,
        Opcode::Hlt.as_byte(),
        Opcode::Prn.as_byte(), 0,
    ];

    let (machine, output) = run_program(&program);

    assert!(machine.is_halted());
    assert!(output.values().is_empty());
}

#[test]
fn unknown_opcode_fails_the_run() {
    let program = [Opcode::Ldi.as_byte(), 0, 1, 0b1111_1111];
    let mut machine = Machine::new();
    machine.load_program(&program).expect("program fits in memory");
    let mut output = CapturedOutput::new();

    let fault = run(&mut machine, &mut output, &RunConfig::default())
        .expect_err("undispatchable byte must fail the run");

    assert_eq!(
        fault,
        Fault::UnknownInstruction {
            opcode: 0b1111_1111,
            pc: 3
        }
    );
    // The LDI before the bad byte still retired.
    assert_eq!(machine.registers().get(GeneralRegister::R0), 1);
}

#[rstest]
#[case::add(Opcode::Add, 200, 100, 44)]
#[case::add_identity(Opcode::Add, 0, 0, 0)]
#[case::mul(Opcode::Mul, 8, 9, 72)]
#[case::mul_wrap(Opcode::Mul, 16, 16, 0)]
fn alu_results_wrap_modulo_256(
    #[case] opcode: Opcode,
    #[case] a: u8,
    #[case] b: u8,
    #[case] expected: u8,
) {
    let program = [
        Opcode::Ldi.as_byte(), 0, a,
        Opcode::Ldi.as_byte(), 1, b,
        opcode.as_byte(), 0, 1,
        Opcode::Hlt.as_byte(),
    ];

    let (machine, _) = run_program(&program);

    assert_eq!(machine.registers().get(GeneralRegister::R0), expected);
}

proptest! {
    #[test]
    fn property_ldi_readback(index in 0_u8..8, value in any::<u8>()) {
        let program = [
            Opcode::Ldi.as_byte(), index, value,
            Opcode::Hlt.as_byte(),
        ];

        let (machine, _) = run_program(&program);

        let reg = GeneralRegister::from_byte(index).expect("index in 0..8");
        prop_assert_eq!(machine.registers().get(reg), value);
    }

    #[test]
    fn property_add_and_mul_match_wrapping_arithmetic(a in any::<u8>(), b in any::<u8>()) {
        let add_program = [
            Opcode::Ldi.as_byte(), 0, a,
            Opcode::Ldi.as_byte(), 1, b,
            Opcode::Add.as_byte(), 0, 1,
            Opcode::Hlt.as_byte(),
        ];
        let (machine, _) = run_program(&add_program);
        prop_assert_eq!(machine.registers().get(GeneralRegister::R0), a.wrapping_add(b));

        let mul_program = [
            Opcode::Ldi.as_byte(), 0, a,
            Opcode::Ldi.as_byte(), 1, b,
            Opcode::Mul.as_byte(), 0, 1,
            Opcode::Hlt.as_byte(),
        ];
        let (machine, _) = run_program(&mul_program);
        prop_assert_eq!(machine.registers().get(GeneralRegister::R0), a.wrapping_mul(b));
    }

    #[test]
    fn property_push_pop_round_trips_any_value(value in any::<u8>()) {
        let program = [
            Opcode::Ldi.as_byte(), 4, value,
            Opcode::Push.as_byte(), 4,
            Opcode::Pop.as_byte(), 5,
            Opcode::Hlt.as_byte(),
        ];

        let (machine, _) = run_program(&program);

        prop_assert_eq!(machine.registers().get(GeneralRegister::R5), value);
        prop_assert_eq!(machine.registers().sp(), STACK_POINTER_INIT);
    }
}
