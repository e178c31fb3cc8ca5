use criterion::{black_box, criterion_group, criterion_main, Criterion};

use flexit_bacnet::encoding::{encode_read_property_multiple_frame, encode_write_property_frame};
use flexit_bacnet::property::{self, PropertyDescriptor};
use flexit_bacnet::value::WriteValue;

fn encode_read_property_multiple_benchmark(c: &mut Criterion) {
    c.bench_function("encode_read_property_multiple_frame (full catalogue)", |b| {
        b.iter(|| black_box(encode_read_property_multiple_frame(1, property::DEVICE_PROPERTIES)))
    });
}

fn encode_read_property_multiple_single_benchmark(c: &mut Criterion) {
    let descriptors: [PropertyDescriptor; 1] = [property::VENTILATION_MODE];
    c.bench_function("encode_read_property_multiple_frame (single descriptor)", |b| {
        b.iter(|| black_box(encode_read_property_multiple_frame(1, &descriptors)))
    });
}

fn encode_write_property_benchmark(c: &mut Criterion) {
    c.bench_function("encode_write_property_frame", |b| {
        b.iter(|| {
            black_box(encode_write_property_frame(
                1,
                &property::VENTILATION_MODE,
                WriteValue::Unsigned(3),
            ))
        })
    });
}

criterion_group!(
    benches,
    encode_read_property_multiple_benchmark,
    encode_read_property_multiple_single_benchmark,
    encode_write_property_benchmark,
);
criterion_main!(benches);
