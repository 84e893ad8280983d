use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use socialist_millionaire::groups::modp1536;
use socialist_millionaire::protocol::prover::prove_knowledge;
use socialist_millionaire::protocol::verifier::verify_knowledge;
use socialist_millionaire::protocol::ProofLabel;
use socialist_millionaire::{tlv, Message, NonceGenerator, SecureRng, Session, Version};

fn exchange(version: Version) {
    let mut alice = Session::new(version);
    let mut bob = Session::new(version);
    alice.set_secret(1234u32.into()).unwrap();
    bob.set_secret(1234u32.into()).unwrap();

    let smp1 = alice.compare().unwrap();
    let smp2 = bob.receive(smp1).unwrap().unwrap();
    let smp3 = alice.receive(smp2).unwrap().unwrap();
    let smp4 = bob.receive(smp3).unwrap().unwrap();
    assert!(alice.receive(smp4).unwrap().is_none());
}

fn bench_full_exchange(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_exchange");
    group.sample_size(10);
    group.bench_function("v2", |b| b.iter(|| exchange(black_box(Version::V2))));
    group.bench_function("v3", |b| b.iter(|| exchange(black_box(Version::V3))));
    group.finish();
}

fn bench_knowledge_proof(c: &mut Criterion) {
    let group = modp1536();
    let mut nonces = NonceGenerator::new(SecureRng::new(), Version::V3.parameter_length());
    let [x, r] = nonces.exponents::<2>().unwrap();
    let public = group.exp_generator(&x);
    let proof = prove_knowledge(group, &r, &x, ProofLabel::InitiatorG2);

    c.bench_function("knowledge_proof_generation", |b| {
        b.iter(|| prove_knowledge(group, black_box(&r), black_box(&x), ProofLabel::InitiatorG2))
    });

    c.bench_function("knowledge_proof_verification", |b| {
        b.iter(|| {
            verify_knowledge(
                group,
                black_box(&proof),
                black_box(&public),
                ProofLabel::InitiatorG2,
            )
        })
    });
}

fn bench_tlv_codec(c: &mut Criterion) {
    let mut alice = Session::new(Version::V3);
    let mut bob = Session::new(Version::V3);
    alice.set_secret(1u32.into()).unwrap();
    bob.set_secret(1u32.into()).unwrap();
    let smp2: Message = bob.receive(alice.compare().unwrap()).unwrap().unwrap();
    let encoded = tlv::encode(&smp2).unwrap();

    c.bench_function("tlv_encode_smp2", |b| {
        b.iter(|| tlv::encode(black_box(&smp2)).unwrap())
    });

    c.bench_function("tlv_decode_smp2", |b| {
        b.iter(|| tlv::decode(black_box(&encoded)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_full_exchange,
    bench_knowledge_proof,
    bench_tlv_codec
);
criterion_main!(benches);
