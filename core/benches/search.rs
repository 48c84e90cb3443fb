use std::hint::black_box;

use arcade_core::*;
use criterion::{Criterion, criterion_group, criterion_main};

fn tic_tac_toe(c: &mut Criterion) {
    let empty = TicTacToeBoard::new();
    c.bench_function("minimax empty board", |b| {
        b.iter(|| optimal_moves(black_box(&empty), Player::Computer))
    });

    let mut center = TicTacToeBoard::new();
    center.place(4, Player::Human);
    c.bench_function("minimax after center", |b| {
        b.iter(|| optimal_moves(black_box(&center), Player::Computer))
    });
}

fn connect_four(c: &mut Criterion) {
    let mut board = ConnectFourBoard::new();
    let opening = [
        (3, Player::Human),
        (3, Player::Computer),
        (2, Player::Human),
        (4, Player::Computer),
    ];
    for (col, player) in opening {
        board.drop(col, player);
    }
    c.bench_function("connect-4 tactics", |b| {
        b.iter(|| tactical_moves(black_box(&board), Player::Computer))
    });
}

criterion_group!(benches, tic_tac_toe, connect_four);
criterion_main!(benches);
