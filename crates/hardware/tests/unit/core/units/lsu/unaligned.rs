//! Accesses crossing the word boundary: two transactions, one retirement.

use iss_core::common::{DataSlot, RegId};
use iss_core::config::Xlen;
use iss_core::core::units::lsu::unaligned::{Split, is_aligned, split};
use iss_core::core::units::lsu::{IoStatus, MisalignedAccess, Resume};
use proptest::prelude::*;

use crate::common::harness::{RAM_BASE, TestContext, scripted};
use crate::common::mocks::port::ScriptedPort;

const X5: RegId = RegId::Gpr(5);

#[test]
fn word_at_offset_six_splits_two_and_two() {
    let mut iss = scripted(Xlen::Rv32, ScriptedPort::new());

    assert_eq!(iss.load(RAM_BASE + 6, 4, X5), Ok(IoStatus::Pending));

    assert_eq!(iss.port.log.len(), 1);
    assert_eq!((iss.port.log[0].addr, iss.port.log[0].size), (RAM_BASE + 6, 2));
    assert_eq!(
        iss.lsu.misaligned(),
        Some(&MisalignedAccess {
            size: 2,
            slot: DataSlot::new(X5).advance(2),
            addr: RAM_BASE + 8,
            is_write: false,
        })
    );
    assert!(iss.exec.is_held());
    assert!(!iss.exec.is_full_mode());
    assert_eq!(iss.exec.retired(), 0);

    iss.cycle();

    assert_eq!(iss.port.log.len(), 2);
    assert_eq!((iss.port.log[1].addr, iss.port.log[1].size), (RAM_BASE + 8, 2));
    assert_eq!(iss.lsu.misaligned(), None);
    assert!(iss.exec.is_full_mode());
    assert_eq!(iss.exec.retired(), 1);
    assert_eq!(iss.regs.get(X5), 0x0908_0706);
}

#[test]
fn aligned_word_is_not_split() {
    let mut iss = scripted(Xlen::Rv32, ScriptedPort::new());
    assert_eq!(iss.load(RAM_BASE + 8, 4, X5), Ok(IoStatus::Ok));
    assert_eq!(iss.port.log.len(), 1);
    assert_eq!(iss.timing.misaligned_events, 0);
}

#[test]
fn boundary_follows_xlen() {
    assert!(!is_aligned(RAM_BASE + 2, 4, Xlen::Rv32));
    assert!(is_aligned(RAM_BASE + 2, 4, Xlen::Rv64));
    assert!(is_aligned(RAM_BASE + 4, 4, Xlen::Rv64));
    assert!(!is_aligned(RAM_BASE + 6, 4, Xlen::Rv64));
    assert_eq!(
        split(RAM_BASE + 5, 8, Xlen::Rv64),
        Some(Split {
            size0: 3,
            addr1: RAM_BASE + 8,
            size1: 5
        })
    );
}

#[test]
fn split_charges_both_latencies_and_the_extra_event() {
    let mut iss = scripted(
        Xlen::Rv32,
        ScriptedPort::scripted(&[(IoStatus::Ok, 2), (IoStatus::Ok, 5)]),
    );

    let _ = iss.load(RAM_BASE + 6, 4, X5).unwrap();
    assert_eq!(iss.timing.misaligned_events, 1);
    assert_eq!(iss.timing.stall_cycles, 2);

    iss.cycle();
    assert_eq!(iss.timing.stall_cycles, 7);
    assert_eq!(iss.timing.load_events, 1);
    assert_eq!(iss.timing.cycles, 1);
}

#[test]
fn invalid_first_half_issues_nothing_more() {
    let mut iss = scripted(
        Xlen::Rv32,
        ScriptedPort::scripted(&[(IoStatus::Invalid, 0)]),
    );

    assert_eq!(iss.load(RAM_BASE + 6, 4, X5), Ok(IoStatus::Invalid));
    assert_eq!(iss.lsu.misaligned(), None);
    assert_eq!(iss.lsu.armed_resume(), None);
    assert!(!iss.exec.is_held());

    let _ = iss.run_until_idle(5);
    iss.cycle();
    assert_eq!(iss.port.log.len(), 1);
    assert_eq!(iss.exec.retired(), 0);
}

#[test]
fn invalid_second_half_drops_the_access() {
    let mut iss = scripted(
        Xlen::Rv32,
        ScriptedPort::scripted(&[(IoStatus::Ok, 0), (IoStatus::Invalid, 0)]),
    );

    let _ = iss.load(RAM_BASE + 6, 4, X5).unwrap();
    iss.cycle();

    assert_eq!(iss.port.log.len(), 2);
    assert_eq!(iss.lsu.armed_resume(), None);
    assert_eq!(iss.lsu.misaligned(), None);
    assert!(!iss.lsu.is_busy());
    assert_eq!(iss.exec.retired(), 0);
}

#[test]
fn pending_first_half_issues_second_after_the_response() {
    let mut iss = scripted(
        Xlen::Rv32,
        ScriptedPort::scripted(&[(IoStatus::Pending, 1), (IoStatus::Ok, 0)]),
    );

    assert_eq!(iss.load(RAM_BASE + 6, 4, X5), Ok(IoStatus::Pending));
    assert_eq!(iss.exec.stalled(), 1);
    assert!(iss.exec.is_held());

    // The response only releases the stall; the hold still owns the instruction.
    iss.cycle();
    assert_eq!(iss.port.log.len(), 1);
    assert_eq!(iss.exec.retired(), 0);
    assert!(iss.lsu.misaligned().is_some());

    iss.cycle();
    assert_eq!(iss.port.log.len(), 2);
    assert_eq!(iss.exec.retired(), 1);
    assert_eq!(iss.regs.get(X5), 0x0908_0706);
}

#[test]
fn both_halves_pending() {
    let mut iss = scripted(
        Xlen::Rv32,
        ScriptedPort::scripted(&[(IoStatus::Pending, 3), (IoStatus::Pending, 4)]),
    );

    let _ = iss.load(RAM_BASE + 6, 4, X5).unwrap();
    assert_eq!(iss.run_until_idle(10), 3);

    assert_eq!(iss.port.log.len(), 2);
    assert_eq!(iss.exec.retired(), 1);
    assert_eq!(iss.exec.stalled(), 0);
    assert_eq!(iss.timing.stall_cycles, 7);
    assert_eq!(iss.regs.get(X5), 0x0908_0706);
    assert!(iss.exec.is_full_mode());
}

#[test]
fn pending_second_half_returns_to_full_mode() {
    let mut iss = scripted(
        Xlen::Rv32,
        ScriptedPort::scripted(&[(IoStatus::Ok, 0), (IoStatus::Pending, 1)]),
    );

    let _ = iss.load(RAM_BASE + 6, 4, X5).unwrap();
    assert!(!iss.exec.is_full_mode());

    let _ = iss.run_until_idle(10);
    assert_eq!(iss.exec.retired(), 1);
    assert!(iss.exec.is_full_mode());

    assert_eq!(iss.load(RAM_BASE, 4, X5), Ok(IoStatus::Ok));
    assert!(iss.exec.is_full_mode());
}

#[test]
fn armed_continuation_survives_until_the_second_half() {
    let mut iss = scripted(Xlen::Rv64, ScriptedPort::new());

    let _ = iss.load_signed(RAM_BASE + 6, 4, X5).unwrap();
    assert_eq!(
        iss.lsu.armed_resume(),
        Some(Resume::LoadSigned { reg: X5, size: 4 })
    );

    iss.cycle();
    assert_eq!(iss.lsu.armed_resume(), None);
}

#[test]
fn split_store_lands_in_ram() {
    let mut ctx = TestContext::new();
    ctx.set_reg(X5, 0x4433_2211);

    assert_eq!(ctx.iss.store(RAM_BASE + 0xE, 4, X5), Ok(IoStatus::Pending));
    assert_eq!(ctx.peek(RAM_BASE + 0xE, 4), vec![0x11, 0x22, 0, 0]);

    assert_eq!(ctx.iss.run_until_idle(10), 1);
    assert_eq!(ctx.peek(RAM_BASE + 0xE, 4), vec![0x11, 0x22, 0x33, 0x44]);
    assert_eq!(ctx.iss.exec.retired(), 1);
}

#[test]
fn split_load_against_async_ram() {
    let mut ctx = TestContext::new().async_memory(2);
    ctx.poke(RAM_BASE + 0x1E, &[0xAA, 0xBB, 0xCC, 0xDD]);

    assert_eq!(ctx.iss.load(RAM_BASE + 0x1E, 4, X5), Ok(IoStatus::Pending));
    assert_eq!(ctx.iss.run_until_idle(20), 5);

    assert_eq!(ctx.get_reg(X5), 0xDDCC_BBAA);
    assert_eq!(ctx.iss.timing.stall_cycles, 4);
    assert_eq!(ctx.iss.exec.retired(), 1);
}

#[test]
fn busy_between_halves() {
    let mut iss = scripted(Xlen::Rv32, ScriptedPort::new());
    let _ = iss.load(RAM_BASE + 6, 4, X5).unwrap();

    assert!(iss.lsu.is_busy());
    assert!(iss.load(RAM_BASE, 4, RegId::Gpr(6)).is_err());
}

proptest! {
    #[test]
    fn split_halves_cover_the_access(offset in 0u64..64, size in 1usize..=8, rv64 in any::<bool>()) {
        let xlen = if rv64 { Xlen::Rv64 } else { Xlen::Rv32 };
        let addr = RAM_BASE + offset;
        if let Some(s) = split(addr, size, xlen) {
            prop_assert!(s.size0 > 0 && s.size0 < size);
            prop_assert_eq!(s.size0 + s.size1, size);
            prop_assert_eq!(s.addr1, addr + s.size0 as u64);
            prop_assert_eq!(s.addr1 % xlen.bytes() as u64, 0);
        } else {
            let word = addr & xlen.addr_mask();
            prop_assert_eq!((addr + size as u64 - 1) & xlen.addr_mask(), word);
        }
    }

    #[test]
    fn loads_retire_once_with_halves_in_address_order(offset in 0u64..32, size in 1usize..=8) {
        let mut iss = scripted(Xlen::Rv64, ScriptedPort::new());
        let addr = RAM_BASE + offset;

        let status = iss.load(addr, size, X5).unwrap();
        prop_assert_ne!(status, IoStatus::Invalid);
        let _ = iss.run_until_idle(8);

        let log = &iss.port.log;
        prop_assert_eq!(log[0].addr, addr);
        prop_assert_eq!(log.iter().map(|t| t.size).sum::<usize>(), size);
        if log.len() == 2 {
            prop_assert_eq!(log[0].addr + log[0].size as u64, log[1].addr);
            prop_assert_eq!(log[1].addr % 8, 0);
        } else {
            prop_assert_eq!(log.len(), 1);
        }
        prop_assert_eq!(iss.exec.retired(), 1);

        let expected = (0..size).fold(0u64, |acc, i| {
            acc | (u64::from(ScriptedPort::pattern(addr + i as u64)) << (8 * i))
        });
        prop_assert_eq!(iss.regs.get(X5), expected);
    }
}
