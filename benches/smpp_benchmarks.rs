// ABOUTME: Benchmark suite for the PDU codec and request correlation hot paths
// ABOUTME: Measures decoding, encoding and the pending-response table under load

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use smpp_session::codec::{Encodable, decode_pdu};
use smpp_session::datatypes::tlv::{Tlv, tags};
use smpp_session::datatypes::*;
use smpp_session::Frame;
use smpp_session::session::{PendingResponses, SequenceGenerator};
use std::sync::Arc;
use std::time::Duration;

fn sample_submit_sm() -> SubmitSm {
    let mut submit = SubmitSm::new(
        Address::international("447700900001"),
        Address::international("447700900002"),
        b"Hello World".to_vec(),
    );
    submit.sequence_number = 1;
    submit.optional_parameters = OptionalParameters::new()
        .with(Tlv::from_u16(tags::USER_MESSAGE_REFERENCE, 42))
        .with(Tlv::from_u16(tags::SOURCE_PORT, 9200));
    submit
}

fn sample_deliver_sm() -> DeliverSm {
    let mut deliver = DeliverSm::new("447700900002", "447700900001", b"Hello back".to_vec());
    deliver.sequence_number = 2;
    deliver
}

fn sample_bind() -> Bind {
    let mut bind = Bind::new(BindType::Transceiver, "test_system", "password");
    bind.sequence_number = 3;
    bind
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    group.measurement_time(Duration::from_secs(10));

    let cases: [(&str, Frame); 4] = [
        ("submit_sm", sample_submit_sm().into()),
        ("deliver_sm", sample_deliver_sm().into()),
        ("bind_transceiver", sample_bind().into()),
        ("enquire_link", EnquireLink::new(4).into()),
    ];
    for (name, frame) in cases {
        let bytes = frame.to_bytes().unwrap();
        group.bench_function(name, |b| b.iter(|| decode_pdu(black_box(&bytes)).unwrap()));
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.measurement_time(Duration::from_secs(10));

    let submit_sm = sample_submit_sm();
    group.bench_function("submit_sm", |b| b.iter(|| black_box(&submit_sm).to_bytes()));

    let deliver_sm = sample_deliver_sm();
    group.bench_function("deliver_sm", |b| b.iter(|| black_box(&deliver_sm).to_bytes()));

    let bind = sample_bind();
    group.bench_function("bind_transceiver", |b| b.iter(|| black_box(&bind).to_bytes()));

    group.finish();
}

fn bench_message_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_sizes");
    group.measurement_time(Duration::from_secs(10));

    for size in [10, 50, 100, 160, 254] {
        let mut submit = sample_submit_sm();
        submit.short_message = vec![b'A'; size].into();
        let bytes = submit.to_bytes().unwrap();

        group.bench_with_input(BenchmarkId::new("submit_sm_decode", size), &bytes, |b, bytes| {
            b.iter(|| decode_pdu(black_box(bytes)).unwrap())
        });
    }

    group.finish();
}

fn bench_correlation(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation");

    let sequence = SequenceGenerator::new();
    group.bench_function("next_sequence_number", |b| b.iter(|| sequence.next()));

    let pending = Arc::new(PendingResponses::new());
    group.bench_function("register_and_fulfil", |b| {
        b.iter(|| {
            let sequence_number = sequence.next();
            let slot = pending.register(sequence_number, CommandId::EnquireLink).unwrap();
            pending.fulfil(
                sequence_number,
                EnquireLinkResponse::new(sequence_number).into(),
            );
            drop(black_box(slot));
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_decode,
    bench_encode,
    bench_message_sizes,
    bench_correlation
);
criterion_main!(benches);
