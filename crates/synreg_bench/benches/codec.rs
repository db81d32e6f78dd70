use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use synreg_core::{decode, encode, Registry, SyntaxNode};

/// Random tree over the registry's non-token kinds, roughly `budget` nodes.
fn random_tree(rng: &mut StdRng, names: &[String], budget: &mut usize, depth: usize) -> SyntaxNode {
    *budget = budget.saturating_sub(1);
    if *budget == 0 || depth > 24 || rng.random_bool(0.3) {
        let len = rng.random_range(0..16);
        return SyntaxNode::token((0..len).map(|_| rng.random_range(b'a'..=b'z')).collect::<Vec<u8>>());
    }
    let kind = names[rng.random_range(0..names.len())].clone();
    let n = rng.random_range(1..6);
    let children = (0..n).map(|_| random_tree(rng, names, budget, depth + 1)).collect();
    SyntaxNode::new(kind, children)
}

fn bench_codec(c: &mut Criterion) {
    let reg = Registry::builtin().unwrap();
    let names: Vec<String> = reg.iter().filter(|k| !k.is_token()).map(|k| k.name.to_string()).collect();
    let mut rng = StdRng::seed_from_u64(7);
    let mut budget = 20_000;
    let tree = random_tree(&mut rng, &names, &mut budget, 0);
    let bytes = encode(&tree, &reg).unwrap();

    c.bench_function("encode", |b| b.iter(|| black_box(encode(&tree, &reg).unwrap())));
    c.bench_function("decode", |b| b.iter(|| black_box(decode(&bytes, &reg).unwrap())));
    c.bench_function("decode+raise", |b| {
        b.iter(|| black_box(reg.raise(&decode(&bytes, &reg).unwrap()).unwrap()))
    });
    c.bench_function("build_builtin", |b| b.iter(|| black_box(Registry::builtin().unwrap())));
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
