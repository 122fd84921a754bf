//! RAM target protocol.

use iss_core::config::ResponseMode;
use iss_core::core::units::lsu::{AtomicOp, IoOpcode, IoReq, IoStatus};
use iss_core::soc::{MemoryPort, Ram};

const BASE: u64 = 0x1000;

fn ram(mode: ResponseMode, latency: u64) -> Ram {
    Ram::new(BASE, 0x100, latency, mode)
}

fn read(addr: u64, size: usize) -> IoReq {
    let mut req = IoReq::new();
    req.set_addr(addr);
    req.set_size(size);
    req
}

fn write(addr: u64, bytes: &[u8]) -> IoReq {
    let mut req = read(addr, bytes.len());
    req.set_is_write(true);
    req.data_mut().copy_from_slice(bytes);
    req
}

fn atomic(addr: u64, size: usize, op: AtomicOp, operand: u64, initiator: u64) -> IoReq {
    let mut req = read(addr, size);
    req.set_opcode(IoOpcode::Atomic(op));
    req.set_is_write(!op.is_load_reserve());
    req.set_initiator(initiator);
    req.data_mut()
        .copy_from_slice(&operand.to_le_bytes()[..size]);
    req
}

#[test]
fn sync_write_then_read() {
    let mut ram = ram(ResponseMode::Sync, 3);

    let mut w = write(BASE + 4, &[1, 2, 3, 4]);
    assert_eq!(ram.submit(&mut w), IoStatus::Ok);
    assert_eq!(w.latency(), 3);

    let mut r = read(BASE + 5, 2);
    assert_eq!(ram.submit(&mut r), IoStatus::Ok);
    assert_eq!(r.data(), &[2, 3]);
}

#[test]
fn out_of_range_is_invalid() {
    let mut ram = ram(ResponseMode::Sync, 0);
    assert_eq!(ram.submit(&mut read(BASE - 1, 1)), IoStatus::Invalid);
    assert_eq!(ram.submit(&mut read(BASE + 0xFE, 4)), IoStatus::Invalid);
    assert_eq!(ram.submit(&mut read(BASE + 0xFC, 4)), IoStatus::Ok);
}

#[test]
fn async_retires_after_latency() {
    let mut ram = ram(ResponseMode::Async, 3);
    ram.load(BASE, &[0xAB]);

    let mut req = read(BASE, 1);
    assert_eq!(ram.submit(&mut req), IoStatus::Pending);
    assert_eq!(req.data(), &[0]);

    assert!(!ram.tick(&mut req));
    assert!(!ram.tick(&mut req));
    assert!(ram.tick(&mut req));
    assert_eq!(req.data(), &[0xAB]);
    assert_eq!(req.latency(), 3);

    assert!(!ram.tick(&mut req));
}

#[test]
fn async_zero_latency_still_takes_a_tick() {
    let mut ram = ram(ResponseMode::Async, 0);
    let mut req = read(BASE, 1);
    assert_eq!(ram.submit(&mut req), IoStatus::Pending);
    assert!(ram.tick(&mut req));
}

#[test]
fn async_refuses_a_second_outstanding_transaction() {
    let mut ram = ram(ResponseMode::Async, 2);
    assert_eq!(ram.submit(&mut read(BASE, 1)), IoStatus::Pending);
    assert_eq!(ram.submit(&mut read(BASE + 1, 1)), IoStatus::Invalid);
}

#[test]
fn sync_port_never_retires_on_tick() {
    let mut ram = ram(ResponseMode::Sync, 0);
    assert!(!ram.tick(&mut read(BASE, 1)));
}

#[test]
fn amo_returns_old_value_and_updates_memory() {
    let mut ram = ram(ResponseMode::Sync, 0);
    ram.load(BASE, &10u32.to_le_bytes());

    let mut req = atomic(BASE, 4, AtomicOp::Add, 5, 0);
    assert_eq!(ram.submit(&mut req), IoStatus::Ok);
    assert_eq!(req.second_data(), &10u32.to_le_bytes());
    assert_eq!(ram.read_bytes(BASE, 4).unwrap(), &15u32.to_le_bytes());
}

#[test]
fn lr_sc_pair_succeeds_once() {
    let mut ram = ram(ResponseMode::Sync, 0);

    let mut lr = atomic(BASE + 8, 4, AtomicOp::Lr, 0, 1);
    assert_eq!(ram.submit(&mut lr), IoStatus::Ok);
    assert_eq!(ram.reservation(1), Some(BASE + 8));

    let mut sc = atomic(BASE + 8, 4, AtomicOp::Sc, 0x77, 1);
    assert_eq!(ram.submit(&mut sc), IoStatus::Ok);
    assert_eq!(sc.second_data(), &0u32.to_le_bytes());
    assert_eq!(ram.read_bytes(BASE + 8, 1).unwrap(), &[0x77]);
    assert_eq!(ram.reservation(1), None);

    let mut again = atomic(BASE + 8, 4, AtomicOp::Sc, 0x88, 1);
    assert_eq!(ram.submit(&mut again), IoStatus::Ok);
    assert_eq!(again.second_data(), &1u32.to_le_bytes());
    assert_eq!(ram.read_bytes(BASE + 8, 1).unwrap(), &[0x77]);
}

#[test]
fn plain_write_breaks_reservation() {
    let mut ram = ram(ResponseMode::Sync, 0);
    assert_eq!(ram.submit(&mut atomic(BASE, 4, AtomicOp::Lr, 0, 0)), IoStatus::Ok);

    assert_eq!(ram.submit(&mut write(BASE, &[0xFF])), IoStatus::Ok);
    assert_eq!(ram.reservation(0), None);

    let mut sc = atomic(BASE, 4, AtomicOp::Sc, 1, 0);
    assert_eq!(ram.submit(&mut sc), IoStatus::Ok);
    assert_eq!(sc.second_data(), &1u32.to_le_bytes());
}

#[test]
fn reservations_are_per_initiator() {
    let mut ram = ram(ResponseMode::Sync, 0);
    assert_eq!(ram.submit(&mut atomic(BASE, 4, AtomicOp::Lr, 0, 0)), IoStatus::Ok);

    let mut other = atomic(BASE, 4, AtomicOp::Sc, 9, 1);
    assert_eq!(ram.submit(&mut other), IoStatus::Ok);
    assert_eq!(other.second_data(), &1u32.to_le_bytes());
    assert_eq!(ram.reservation(0), Some(BASE));
}

#[test]
fn backdoor_ignores_unmapped_ranges() {
    let mut ram = ram(ResponseMode::Sync, 0);
    ram.load(BASE + 0xFF, &[1, 2]);
    assert_eq!(ram.read_bytes(BASE + 0xFF, 1).unwrap(), &[0]);
    assert!(ram.read_bytes(BASE + 0xFF, 2).is_none());
}
