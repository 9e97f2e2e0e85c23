//! End-to-end microcycle scenarios: small hand-built microprograms run
//! through the full EBOX, checking registers and CRADR after each edge.

use emu_core::Word36;
use kl10_ebox::Ebox;
use kl10_ebox::cr::{AdaSel, AdbSel, ArCtl, ArSel, DispFunc, Microword, ad};
use kl10_ebox::datapath::{self, DataPath};
use kl10_ebox::fm::FastMemory;
use kl10_ebox::regs::Registers;

const M36: u64 = Word36::MASK;

fn ebox() -> Ebox {
    Ebox::new(0o10000)
}

#[test]
fn three_way_jump_loop() {
    let mut e = ebox();
    for (at, to) in [(0o100, 0o200), (0o200, 0o300), (0o300, 0o100)] {
        let mut cr = Microword::default();
        cr.set_j(to);
        e.load_cram(at, cr.word());
    }
    e.set_cradr(0o100);

    let mut seen = Vec::new();
    for _ in 0..4 {
        e.cycle();
        seen.push(e.cradr());
    }
    assert_eq!(seen, vec![0o200, 0o300, 0o100, 0o200]);
}

#[test]
fn ad_adds_pc_and_br_into_arr() {
    let mut e = ebox();
    e.regs.set_pc(0o123456);
    e.regs.set_br(0o246100);
    e.regs.set_arr(0o654321);

    let mut cr = Microword::default();
    cr.set_ad(ad::A_PLUS_B);
    cr.set_ada(AdaSel::Pc);
    cr.set_adb(AdbSel::Br);
    cr.set_ar(ArSel::Ad);
    cr.set_ar_ctl(ArCtl { arl: false, arr: true });
    cr.set_j(0o765);
    e.load_cram(0o100, cr.word());
    e.set_cradr(0o100);

    e.cycle();
    assert_eq!(e.regs.arr(), (0o123456 + 0o246100) & 0o777777);
    assert_eq!(e.regs.arl(), 0, "left half held");
    assert_eq!(e.cradr(), 0o765);
}

#[test]
fn xcry_takes_the_extension_carry() {
    let mut e = ebox();
    e.regs.set_arr(0o654321);
    e.regs.set_br(0o246100);
    e.regs.set_mq(0o10);
    e.regs.set_brx(0o777777);
    e.regs.set_arx(0o777777777770);

    let mut cr = Microword::default();
    cr.set_ad(ad::A_XCRY);
    cr.set_ada(AdaSel::Ar);
    cr.set_adb(AdbSel::Br);
    cr.set_ar(ArSel::Ad);
    cr.set_ar_ctl(ArCtl { arl: false, arr: true });
    e.load_cram(0o100, cr.word());
    e.set_cradr(0o100);

    // The extension half adds ARX+BRX and overflows.
    let dp = datapath::settle(&e.regs, &e.fm, &e.cr());
    assert!(dp.adx_cout);

    e.cycle();
    assert_eq!(e.regs.arr(), (0o654321 + 1) & 0o777777);
}

#[test]
fn boolean_smoke_set_through_the_data_path() {
    let a = 0o654321;
    let b = 0o246100;
    let mut regs = Registers::new();
    regs.set_arr(a);
    regs.set_br(b);
    let fm = FastMemory::new();

    let settle_code = |code: u8| -> DataPath {
        let mut cr = Microword::default();
        cr.set_ad(code);
        cr.set_ada(AdaSel::Ar);
        cr.set_adb(AdbSel::Br);
        datapath::settle(&regs, &fm, &cr)
    };

    let cases: &[(u8, u64)] = &[
        (ad::A, a),
        (ad::B, b),
        (ad::OR, a | b),
        (ad::AND, a & b),
        (ad::XOR, a ^ b),
        (ad::EQV, !(a ^ b) & M36),
        (ad::SETCA, !a & M36),
        (ad::SETCB, !b & M36),
        (ad::ZEROS, 0),
        (ad::ONES, M36),
        (ad::NOR, !(a | b) & M36),
        (ad::ORCA, (!a | b) & M36),
        (ad::ORCB, (a | !b) & M36),
        (ad::ANDCA, (!a & b) & M36),
        (ad::ANDCB, (a & !b) & M36),
        (ad::ORC, !(a & b) & M36),
    ];
    for &(code, expect) in cases {
        let dp = settle_code(code);
        assert_eq!(dp.ad36(), expect, "code {code:02o}");
        assert!(!dp.ad_cout, "code {code:02o} must not carry");
    }
}

#[test]
fn call_and_return_through_the_ebox() {
    let mut e = ebox();

    // 100: CALL 500; 500: J 501; 501: RETURN (J ignored); 101: J 101.
    let mut call = Microword::default();
    call.set_j(0o500);
    call.set_call();
    e.load_cram(0o100, call.word());

    let mut step = Microword::default();
    step.set_j(0o501);
    e.load_cram(0o500, step.word());

    let mut ret = Microword::default();
    ret.set_j(0o777);
    ret.set_disp(DispFunc::Return);
    e.load_cram(0o501, ret.word());

    e.set_cradr(0o100);
    e.cycle();
    assert_eq!(e.cradr(), 0o500);
    e.cycle();
    assert_eq!(e.cradr(), 0o501);
    e.cycle();
    assert_eq!(e.cradr(), 0o101, "RETURN ignores J and pops the stack");
}

#[test]
fn page_fail_traps_to_1777_and_returns_to_retry() {
    let mut e = ebox();
    let mut loop100 = Microword::default();
    loop100.set_j(0o100);
    e.load_cram(0o100, loop100.word());

    let mut handler = Microword::default();
    handler.set_disp(DispFunc::Return);
    e.load_cram(0o1777, handler.word());

    e.set_cradr(0o100);
    e.force_page_fail();
    e.cycle();
    assert_eq!(e.cradr(), 0o1777);
    e.cycle();
    assert_eq!(e.cradr(), 0o100, "handler returns to the faulting word");
}
