use criterion::{criterion_group, criterion_main, Criterion, black_box};
use hyperbola::board::movegen::{generate_all, MoveList};
use hyperbola::board::Position;
use hyperbola::perft::perft;

fn bench_perft(c: &mut Criterion) {
    let mut start = Position::startpos();
    c.bench_function("perft_4_startpos", |ben| {
        ben.iter(|| black_box(perft(black_box(&mut start), 4)))
    });

    let mut kiwi = Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    c.bench_function("perft_3_kiwipete", |ben| {
        ben.iter(|| black_box(perft(black_box(&mut kiwi), 3)))
    });

    let kiwi = Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    c.bench_function("generate_all_kiwipete", |ben| {
        let mut list = MoveList::new();
        ben.iter(|| {
            list.clear();
            generate_all(black_box(&kiwi), &mut list);
            black_box(list.len())
        })
    });
}

criterion_group!(benches, bench_perft);
criterion_main!(benches);
