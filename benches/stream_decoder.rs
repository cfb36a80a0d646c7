use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ollama_chat::core::stream_decoder::{parse_record, RecordDecoder, RecordEvent};

fn make_body(records: usize, token: &str) -> Vec<u8> {
    let mut body = String::new();
    for i in 0..records {
        body.push_str(&format!("data: {{\"token\": \"{token}{i} \"}}\n"));
    }
    body.push_str("data: {\"done\": true}\n");
    body.into_bytes()
}

fn decode_body(body: &[u8], chunk_size: usize) -> usize {
    let mut decoder = RecordDecoder::new();
    let mut tokens = 0;
    for chunk in body.chunks(chunk_size) {
        for record in decoder.push(chunk) {
            if matches!(parse_record(&record), RecordEvent::Token(_)) {
                tokens += 1;
            }
        }
    }
    for record in decoder.finish() {
        if matches!(parse_record(&record), RecordEvent::Token(_)) {
            tokens += 1;
        }
    }
    tokens
}

fn bench_stream_decoder(c: &mut Criterion) {
    // Multi-byte tokens so small chunks regularly split a character.
    let token = "héllo wörld 😀";

    for &records in &[200usize, 2000usize] {
        let body = make_body(records, token);
        let mut group = c.benchmark_group(format!("stream_decoder_{records}"));
        group.throughput(Throughput::Bytes(body.len() as u64));

        // 7 bytes approximates worst-case fragmentation; 4096 a typical socket read.
        for &chunk_size in &[7usize, 64usize, 4096usize] {
            group.bench_with_input(
                BenchmarkId::new("chunk", chunk_size),
                &chunk_size,
                |b, &size| b.iter(|| decode_body(&body, size)),
            );
        }
        group.finish();
    }
}

criterion_group!(benches, bench_stream_decoder);
criterion_main!(benches);
