use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sm83_core::{Memory, OpcodeTables, Sm83};

/// Tight loop touching loads, ALU, the prefixed table and the stack.
const LOOP_PROGRAM: &[u8] = &[
    0x31, 0xFE, 0xFF, // LD SP,$FFFE
    0x21, 0x00, 0xC0, // LD HL,$C000
    0x3E, 0x42, // loop: LD A,$42
    0x77, // LD (HL),A
    0x04, // INC B
    0x80, // ADD A,B
    0xCB, 0x7C, // BIT 7,H
    0xCB, 0x11, // RL C
    0xC5, // PUSH BC
    0xD1, // POP DE
    0x18, 0xF3, // JR loop
];

fn bench_memory() -> Memory {
    let mut memory = Memory::new();
    memory.load(0, LOOP_PROGRAM).unwrap();
    memory
}

fn bench_single_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("sm83_step");

    group.bench_function("single_instruction", |b| {
        let mut cpu = Sm83::new(bench_memory());
        b.iter(|| {
            cpu.regs.pc = 0x0006;
            cpu.step().unwrap();
            black_box(cpu.regs.a());
        });
    });

    group.bench_function("prefixed_instruction", |b| {
        let mut cpu = Sm83::new(bench_memory());
        b.iter(|| {
            cpu.regs.pc = 0x000B;
            cpu.step().unwrap();
            black_box(cpu.regs.f());
        });
    });

    group.finish();
}

fn bench_multiple_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("sm83_multiple_steps");

    for step_count in [10, 100, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(step_count),
            step_count,
            |b, &count| {
                let mut cpu = Sm83::new(bench_memory());
                b.iter(|| {
                    cpu.reset();
                    for _ in 0..count {
                        cpu.step().unwrap();
                    }
                    black_box(cpu.instructions());
                });
            },
        );
    }

    group.finish();
}

fn bench_table_build(c: &mut Criterion) {
    c.bench_function("sm83_tables", |b| {
        b.iter(|| black_box(OpcodeTables::sm83()));
    });
}

criterion_group!(
    benches,
    bench_single_step,
    bench_multiple_steps,
    bench_table_build
);
criterion_main!(benches);
